// ── Configured transport ──
//
// Picks the transport named in a `FirewallConfig` at runtime while the
// client stays generic.

use sfos_api::{CurlTransport, HttpTransport, Transport};

use crate::config::{FirewallConfig, TransportKind};
use crate::error::CoreError;

/// Either built-in transport, chosen by [`TransportKind`].
#[derive(Debug, Clone)]
pub enum ConfiguredTransport {
    Http(HttpTransport),
    Curl(CurlTransport),
}

impl ConfiguredTransport {
    pub fn from_config(config: &FirewallConfig) -> Result<Self, CoreError> {
        let transport = config.transport_config();
        Ok(match config.transport {
            TransportKind::Http => Self::Http(HttpTransport::new(&config.url, &transport)?),
            TransportKind::Curl => Self::Curl(CurlTransport::new(&config.url, &transport)?),
        })
    }

    pub fn kind(&self) -> TransportKind {
        match self {
            Self::Http(_) => TransportKind::Http,
            Self::Curl(_) => TransportKind::Curl,
        }
    }
}

impl Transport for ConfiguredTransport {
    async fn submit(&self, payload: Vec<u8>) -> Result<Vec<u8>, sfos_api::Error> {
        match self {
            Self::Http(http) => http.submit(payload).await,
            Self::Curl(curl) => curl.submit(payload).await,
        }
    }
}
