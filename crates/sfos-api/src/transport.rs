// Transport seam
//
// A transport takes one finished request document and returns the raw
// response bytes. `HttpTransport` posts it with reqwest; `CurlTransport`
// shells out to curl, staging both documents in temp files that are
// removed when the call returns, on success and failure alike.

use std::future::Future;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::error::Error;

/// Path of the XML API controller below the configured endpoint.
pub const API_CONTROLLER_PATH: &str = "webconsole/APIController";

/// Name of the multipart form field carrying the request document.
pub const REQUEST_FIELD: &str = "reqxml";

/// Executes a single request/response exchange.
///
/// Implementations must be safe to share; the client never issues
/// overlapping calls itself, but callers may.
pub trait Transport: Send + Sync {
    fn submit(&self, payload: Vec<u8>) -> impl Future<Output = Result<Vec<u8>, Error>> + Send;
}

/// TLS verification mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsMode {
    /// Use the system certificate store.
    #[default]
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (appliances ship self-signed).
    DangerAcceptInvalid,
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("sfos/", env!("CARGO_PKG_VERSION")));

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

/// `{endpoint}/webconsole/APIController`, tolerating a trailing slash on the endpoint.
pub fn controller_url(endpoint: &Url) -> Result<Url, Error> {
    let base = endpoint.as_str().trim_end_matches('/');
    Ok(Url::parse(&format!("{base}/{API_CONTROLLER_PATH}"))?)
}

// ── HTTP ────────────────────────────────────────────────────────────

/// Posts the request as `multipart/form-data` with reqwest.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    url: Url,
}

impl HttpTransport {
    /// Create a transport for the firewall at `endpoint` (e.g. `https://fw:4444`).
    pub fn new(endpoint: &Url, config: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: config.build_client()?,
            url: controller_url(endpoint)?,
        })
    }

    /// Create a transport with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, endpoint: &Url) -> Result<Self, Error> {
        Ok(Self {
            http,
            url: controller_url(endpoint)?,
        })
    }

    /// The full controller URL requests are posted to.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl Transport for HttpTransport {
    async fn submit(&self, payload: Vec<u8>) -> Result<Vec<u8>, Error> {
        debug!("POST {}", self.url);

        let form = reqwest::multipart::Form::new()
            .part(REQUEST_FIELD, reqwest::multipart::Part::bytes(payload));

        let resp = self
            .http
            .post(self.url.clone())
            .multipart(form)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.bytes().await.map_err(Error::Transport)?;
        Ok(body.to_vec())
    }
}

// ── curl ────────────────────────────────────────────────────────────

/// Runs an external `curl` per request.
///
/// The request is written to a temp file and passed as `-F reqxml=<file`;
/// curl writes the answer to a second temp file. Both are deleted when
/// `submit` returns.
#[derive(Debug, Clone)]
pub struct CurlTransport {
    program: PathBuf,
    url: Url,
    insecure: bool,
    timeout: Duration,
}

impl CurlTransport {
    pub fn new(endpoint: &Url, config: &TransportConfig) -> Result<Self, Error> {
        if let TlsMode::CustomCa(_) = config.tls {
            return Err(Error::Tls(
                "custom CA certificates are not supported by the curl transport".into(),
            ));
        }
        Ok(Self {
            program: PathBuf::from("curl"),
            url: controller_url(endpoint)?,
            insecure: config.tls == TlsMode::DangerAcceptInvalid,
            timeout: config.timeout,
        })
    }

    /// Use a different executable instead of `curl` from `PATH`.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl Transport for CurlTransport {
    async fn submit(&self, payload: Vec<u8>) -> Result<Vec<u8>, Error> {
        let mut request_file = tempfile::Builder::new()
            .prefix("sfos_request")
            .tempfile()?;
        request_file.write_all(&payload)?;
        request_file.flush()?;

        let response_file = tempfile::Builder::new()
            .prefix("sfos_response")
            .tempfile()?;

        let mut cmd = tokio::process::Command::new(&self.program);
        if self.insecure {
            cmd.arg("-k");
        }
        cmd.arg("--silent")
            .arg("--show-error")
            .arg("--max-time")
            .arg(self.timeout.as_secs().max(1).to_string())
            .arg(self.url.as_str())
            .arg("-F")
            .arg(format!(
                "{REQUEST_FIELD}=<{}",
                request_file.path().display()
            ))
            .arg("-o")
            .arg(response_file.path())
            .kill_on_drop(true);

        debug!(program = %self.program.display(), url = %self.url, "running transport command");

        let output = cmd.output().await.map_err(|e| Error::TransportCommand {
            message: format!("failed to run {}: {e}", self.program.display()),
        })?;

        if !output.status.success() {
            return Err(Error::TransportCommand {
                message: format!(
                    "{} exited with {}, stderr: {}",
                    self.program.display(),
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        let body = tokio::fs::read(response_file.path()).await?;
        Ok(body)
    }
}
