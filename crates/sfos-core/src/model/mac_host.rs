// ── MAC host ──

use serde::{Deserialize, Serialize};

use super::common::require_name;
use super::mac_address::MacAddress;
use crate::error::CoreError;

/// Single address or list.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum MacHostType {
    #[default]
    #[strum(serialize = "MACAddress")]
    #[serde(rename = "MACAddress")]
    MacAddress,
    #[strum(serialize = "MACLIST")]
    #[serde(rename = "MACLIST")]
    MacList,
}

/// A named MAC address object (`MACHost`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacHost {
    pub name: String,
    pub description: String,
    pub host_type: MacHostType,
    /// Set for [`MacHostType::MacAddress`].
    pub mac_address: Option<MacAddress>,
    /// Set for [`MacHostType::MacList`], in first-seen order.
    pub mac_list: Vec<MacAddress>,
}

impl MacHost {
    pub const KIND: &'static str = "MACHost";

    pub fn single(name: impl Into<String>, mac: MacAddress) -> Self {
        Self {
            name: name.into(),
            host_type: MacHostType::MacAddress,
            mac_address: Some(mac),
            ..Self::default()
        }
    }

    pub fn list(name: impl Into<String>, macs: Vec<MacAddress>) -> Self {
        Self {
            name: name.into(),
            host_type: MacHostType::MacList,
            mac_list: macs,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        require_name(Self::KIND, &self.name)?;
        match self.host_type {
            MacHostType::MacAddress if self.mac_address.is_none() => {
                Err(CoreError::validation(format!(
                    "MAC host '{}' requires a MAC address",
                    self.name
                )))
            }
            MacHostType::MacList if self.mac_list.is_empty() => Err(CoreError::validation(
                format!("MAC host '{}' requires at least one MAC address", self.name),
            )),
            _ => Ok(()),
        }
    }
}
