// ── IP host ──

use serde::{Deserialize, Serialize};

use super::common::{IpFamily, require_name};
use crate::error::CoreError;

/// Which address shape an [`IpHost`] describes.
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
pub enum HostType {
    /// A single address.
    #[default]
    #[strum(serialize = "IP")]
    #[serde(rename = "IP")]
    Ip,
    /// Address plus subnet mask.
    Network,
    #[strum(serialize = "IPRange")]
    #[serde(rename = "IPRange")]
    IpRange,
    /// Comma-separated addresses.
    #[strum(serialize = "IPList")]
    #[serde(rename = "IPList")]
    IpList,
    #[strum(to_string = "System Host", serialize = "SystemHost")]
    #[serde(rename = "System Host", alias = "SystemHost")]
    SystemHost,
}

/// A named address object (`IPHost`).
///
/// Only the address fields that belong to `host_type` are meaningful; the
/// others are ignored on write and empty after a read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpHost {
    pub name: String,
    pub description: String,
    pub ip_family: IpFamily,
    pub host_type: HostType,
    pub ip_address: String,
    pub subnet: String,
    pub start_ip_address: String,
    pub end_ip_address: String,
    /// Comma-joined addresses for [`HostType::IpList`].
    pub list_of_ip_addresses: String,
    /// Groups this host belongs to, sorted.
    pub host_groups: Vec<String>,
}

impl IpHost {
    pub const KIND: &'static str = "IPHost";

    pub fn ip(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host_type: HostType::Ip,
            ip_address: address.into(),
            ..Self::default()
        }
    }

    pub fn network(
        name: impl Into<String>,
        address: impl Into<String>,
        subnet: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            host_type: HostType::Network,
            ip_address: address.into(),
            subnet: subnet.into(),
            ..Self::default()
        }
    }

    pub fn range(name: impl Into<String>, start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host_type: HostType::IpRange,
            start_ip_address: start.into(),
            end_ip_address: end.into(),
            ..Self::default()
        }
    }

    pub fn list<I, S>(name: impl Into<String>, addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = addresses
            .into_iter()
            .map(|a| a.as_ref().trim().to_owned())
            .filter(|a| !a.is_empty())
            .collect::<Vec<_>>()
            .join(",");
        Self {
            name: name.into(),
            host_type: HostType::IpList,
            list_of_ip_addresses: joined,
            ..Self::default()
        }
    }

    /// Check that the fields required by `host_type` are present.
    pub fn validate(&self) -> Result<(), CoreError> {
        require_name(Self::KIND, &self.name)?;

        let missing = |field: &str| {
            CoreError::validation(format!(
                "{} host '{}' requires {field}",
                self.host_type, self.name
            ))
        };
        match self.host_type {
            HostType::Ip if self.ip_address.trim().is_empty() => Err(missing("an IP address")),
            HostType::Network if self.ip_address.trim().is_empty() => {
                Err(missing("an IP address"))
            }
            HostType::Network if self.subnet.trim().is_empty() => Err(missing("a subnet")),
            HostType::IpRange
                if self.start_ip_address.trim().is_empty()
                    || self.end_ip_address.trim().is_empty() =>
            {
                Err(missing("start and end addresses"))
            }
            HostType::IpList if self.list_of_ip_addresses.trim().is_empty() => {
                Err(missing("at least one address"))
            }
            _ => Ok(()),
        }
    }
}
