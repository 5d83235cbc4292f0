// ── IP host group ──

use serde::{Deserialize, Serialize};

use super::common::{IpFamily, require_name};
use crate::error::CoreError;

/// A named set of IP hosts (`IPHostGroup`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpHostGroup {
    pub name: String,
    pub description: String,
    pub ip_family: IpFamily,
    /// Member host names, sorted after a read.
    pub hosts: Vec<String>,
}

impl IpHostGroup {
    pub const KIND: &'static str = "IPHostGroup";

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        require_name(Self::KIND, &self.name)?;
        if self.hosts.iter().any(|h| h.trim().is_empty()) {
            return Err(CoreError::validation(format!(
                "host group '{}' contains an empty host name",
                self.name
            )));
        }
        Ok(())
    }
}
