use thiserror::Error;

/// Top-level error type for the `sfos-api` crate.
///
/// Covers every failure mode of a single XML API round trip:
/// transport, decoding, authentication and application-level rejection.
/// `sfos-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// `Login/status` was anything other than the success literal.
    #[error("Authentication failed: {status}")]
    Authentication { status: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The controller answered with a non-success HTTP status.
    #[error("HTTP {status} from firewall API: {body}")]
    HttpStatus { status: u16, body: String },

    /// The external command used as transport could not run or exited non-zero.
    #[error("Transport command failed: {message}")]
    TransportCommand { message: String },

    /// The firewall returned a zero-length body.
    #[error("Received empty response from firewall API")]
    EmptyResponse,

    /// Local I/O while staging a request or response.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS configuration or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// Request XML could not be produced.
    #[error("XML serialization error: {0}")]
    Xml(String),

    /// Response bytes were not a `<Response>` document, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Application ─────────────────────────────────────────────────
    /// Envelope-level `<Error code="...">` element.
    #[error("Firewall API error {code}: {message}")]
    Api { code: String, message: String },

    /// Per-resource `<Status code="...">` was not `200` on a `Set`.
    #[error("Operation failed (status {code}): {message}")]
    OperationFailed { code: String, message: String },
}

impl Error {
    /// Returns `true` if the firewall rejected the credentials.
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if the round trip itself could not be completed.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport(_)
                | Self::HttpStatus { .. }
                | Self::TransportCommand { .. }
                | Self::EmptyResponse
                | Self::Io(_)
                | Self::Tls(_)
        )
    }

    /// Returns `true` if the firewall understood the request and refused it.
    pub fn is_application(&self) -> bool {
        matches!(self, Self::Api { .. } | Self::OperationFailed { .. })
    }

    /// The remote error or status code, if the firewall supplied one.
    pub fn remote_code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } | Self::OperationFailed { code, .. } => Some(code.as_str()),
            _ => None,
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Self::Xml(err.to_string())
    }
}
