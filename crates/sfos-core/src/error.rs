// ── Core error types ──
//
// User-facing errors from sfos-core. Consumers see failure classes, not
// multipart bodies or XML parser positions. The `From<sfos_api::Error>`
// impl folds every wire-layer error into one of these classes.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach firewall{}: {reason}", url_suffix(.url))]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{kind} '{name}' not found")]
    NotFound { kind: String, name: String },

    #[error("Could not decode firewall response: {message}")]
    Decode {
        message: String,
        /// Raw response text, when one was received.
        body: Option<String>,
    },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Rejected by firewall{}: {message}", code_suffix(.code.as_deref()))]
    Rejected {
        /// Remote error or status code.
        code: Option<String>,
        message: String,
    },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    /// Any of the above, tagged with the call that produced it.
    #[error("{operation} {kind} '{name}': {source}")]
    Operation {
        operation: &'static str,
        kind: &'static str,
        name: String,
        #[source]
        source: Box<CoreError>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

fn url_suffix(url: &str) -> String {
    if url.is_empty() {
        String::new()
    } else {
        format!(" at {url}")
    }
}

fn code_suffix(code: Option<&str>) -> String {
    match code {
        Some(code) if !code.is_empty() => format!(" (code {code})"),
        _ => String::new(),
    }
}

impl CoreError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }

    pub(crate) fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
            body: None,
        }
    }

    /// Tag this error with the call that produced it.
    pub(crate) fn context(self, operation: &'static str, kind: &'static str, name: &str) -> Self {
        Self::Operation {
            operation,
            kind,
            name: name.to_owned(),
            source: Box::new(self),
        }
    }

    /// The error without any operation context.
    pub fn root(&self) -> &CoreError {
        match self {
            Self::Operation { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), Self::NotFound { .. })
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self.root(), Self::AuthenticationFailed { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self.root(), Self::ValidationFailed { .. })
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self.root(), Self::Rejected { .. })
    }
}

// ── Conversion from wire-layer errors ────────────────────────────────

impl From<sfos_api::Error> for CoreError {
    fn from(err: sfos_api::Error) -> Self {
        match err {
            sfos_api::Error::Authentication { status } => {
                CoreError::AuthenticationFailed { message: status }
            }
            sfos_api::Error::Transport(ref e) => CoreError::ConnectionFailed {
                url: e.url().map(ToString::to_string).unwrap_or_default(),
                reason: if e.is_timeout() {
                    "request timed out".into()
                } else {
                    e.to_string()
                },
            },
            sfos_api::Error::HttpStatus { status, body } => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("HTTP {status}: {}", body.trim()),
            },
            sfos_api::Error::TransportCommand { message } => CoreError::ConnectionFailed {
                url: String::new(),
                reason: message,
            },
            sfos_api::Error::EmptyResponse => CoreError::ConnectionFailed {
                url: String::new(),
                reason: "empty response body".into(),
            },
            sfos_api::Error::Io(e) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("I/O error: {e}"),
            },
            sfos_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            sfos_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            sfos_api::Error::Xml(message) => CoreError::Decode {
                message: format!("failed to encode request: {message}"),
                body: None,
            },
            sfos_api::Error::Deserialization { message, body } => CoreError::Decode {
                message,
                body: Some(body),
            },
            sfos_api::Error::Api { code, message }
            | sfos_api::Error::OperationFailed { code, message } => CoreError::Rejected {
                code: Some(code),
                message,
            },
        }
    }
}
