// Request/Response envelope codec
//
// Every call is one `<Request>` carrying `<Login>` plus exactly one of
// `<Set operation="...">`, `<Get>` or `<Remove>`. The answer is a
// `<Response>` with `Login/status`, an optional `<Error>`, per-kind
// `<Status>` blocks (on Set) and zero or more entity elements.

use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;
use crate::xml::{self, XmlNode};

/// The only `Login/status` value that means the credentials were accepted.
pub const LOGIN_SUCCESS: &str = "Authentication Successful";

/// The only per-kind `Status/@code` that means a `Set` was applied.
pub const STATUS_OK: &str = "200";

/// Username/password pair embedded in every request.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }

    /// Same username, password replaced for log output.
    pub(crate) fn redacted(&self) -> Self {
        Self {
            username: self.username.clone(),
            password: SecretString::from("********".to_owned()),
        }
    }

    fn to_node(&self) -> XmlNode {
        XmlNode::new("Login")
            .with_child(XmlNode::text_element("Username", self.username.as_str()))
            .with_child(XmlNode::text_element(
                "Password",
                self.password.expose_secret(),
            ))
    }
}

/// `operation` attribute of a `<Set>` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOperation {
    Add,
    Update,
}

impl SetOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Update => "update",
        }
    }
}

/// The operation body of a request. Each verb has its own shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// One or more full entities.
    Set {
        operation: SetOperation,
        entities: Vec<XmlNode>,
    },
    /// A kind element holding only filter fields.
    Get { filter: XmlNode },
    /// A kind element holding only the key.
    Remove { key: XmlNode },
}

impl RequestBody {
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Set { .. } => "Set",
            Self::Get { .. } => "Get",
            Self::Remove { .. } => "Remove",
        }
    }

    fn to_node(&self) -> XmlNode {
        let mut node = XmlNode::new(self.verb());
        match self {
            Self::Set {
                operation,
                entities,
            } => {
                node = node.with_attr("operation", operation.as_str());
                node.children.extend(entities.iter().cloned());
            }
            Self::Get { filter } => node.children.push(filter.clone()),
            Self::Remove { key } => node.children.push(key.clone()),
        }
        node
    }
}

/// Build the full request document.
pub fn encode_request(credentials: &Credentials, body: &RequestBody) -> Result<Vec<u8>, Error> {
    let request = XmlNode::new("Request")
        .with_child(credentials.to_node())
        .with_child(body.to_node());
    Ok(xml::write_document(&request)?)
}

/// A `code` attribute plus message text, as used by `<Error>` and `<Status>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteStatus {
    pub code: String,
    pub message: String,
}

impl RemoteStatus {
    fn from_node(node: &XmlNode) -> Self {
        Self {
            code: node.attr("code").unwrap_or_default().trim().to_owned(),
            message: node.text().to_owned(),
        }
    }
}

/// Decoded `<Response>`.
#[derive(Debug, Clone, Default)]
pub struct Envelope {
    pub api_version: Option<String>,
    pub login_status: String,
    pub error: Option<RemoteStatus>,
    /// `<Kind><Status/></Kind>` blocks, falling back to a root-level `<Status>`.
    pub statuses: Vec<RemoteStatus>,
    /// Every `<Kind>` element directly under the root.
    pub entities: Vec<XmlNode>,
}

impl Envelope {
    /// Decode a response body for the resource kind whose element is `kind`.
    pub fn decode(body: &[u8], kind: &str) -> Result<Self, Error> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(Error::EmptyResponse);
        }

        let root = xml::parse(body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: String::from_utf8_lossy(body).into_owned(),
        })?;

        if root.tag != "Response" {
            return Err(Error::Deserialization {
                message: format!("expected <Response> root element, found <{}>", root.tag),
                body: String::from_utf8_lossy(body).into_owned(),
            });
        }

        let login_status = root
            .child("Login")
            .and_then(|l| l.child("status"))
            .and_then(|s| s.text.clone())
            .unwrap_or_default();

        let error = root
            .child("Error")
            .map(RemoteStatus::from_node)
            .filter(|e| !e.code.is_empty() || !e.message.is_empty());

        let entities: Vec<XmlNode> = root.children_named(kind).cloned().collect();

        let mut statuses: Vec<RemoteStatus> = entities
            .iter()
            .filter_map(|e| e.child("Status"))
            .map(RemoteStatus::from_node)
            .collect();
        if statuses.is_empty() {
            statuses.extend(root.child("Status").map(RemoteStatus::from_node));
        }

        Ok(Self {
            api_version: root.attr("APIVersion").map(str::to_owned),
            login_status,
            error,
            statuses,
            entities,
        })
    }

    pub fn check_login(&self) -> Result<(), Error> {
        if self.login_status == LOGIN_SUCCESS {
            Ok(())
        } else {
            Err(Error::Authentication {
                status: if self.login_status.is_empty() {
                    "no login status in response".into()
                } else {
                    self.login_status.clone()
                },
            })
        }
    }

    pub fn check_error(&self) -> Result<(), Error> {
        match &self.error {
            Some(err) => Err(Error::Api {
                code: err.code.clone(),
                message: err.message.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Every status block must carry code 200, and there must be at least one.
    pub fn check_status(&self) -> Result<(), Error> {
        if self.statuses.is_empty() {
            return Err(Error::OperationFailed {
                code: String::new(),
                message: "response carried no status block".into(),
            });
        }
        match self.statuses.iter().find(|s| s.code != STATUS_OK) {
            Some(bad) => Err(Error::OperationFailed {
                code: bad.code.clone(),
                message: bad.message.clone(),
            }),
            None => Ok(()),
        }
    }
}
