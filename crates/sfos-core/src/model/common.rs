// ── Common types shared across the domain model ──

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Address family of a host, group or rule.
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
    strum::AsRefStr,
)]
pub enum IpFamily {
    #[default]
    #[strum(serialize = "IPv4")]
    #[serde(rename = "IPv4")]
    Ipv4,
    #[strum(serialize = "IPv6")]
    #[serde(rename = "IPv6")]
    Ipv6,
}

/// Every object is keyed by its name; an empty one cannot be addressed.
pub(crate) fn require_name(kind: &str, name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        Err(CoreError::validation(format!("{kind} name must not be empty")))
    } else {
        Ok(())
    }
}

/// Parse a wire enum value, naming the element in the error.
pub(crate) fn parse_wire<T: std::str::FromStr>(element: &str, value: &str) -> Result<T, CoreError> {
    value
        .parse()
        .map_err(|_| CoreError::decode(format!("unexpected {element} value '{value}'")))
}

/// Address family as returned by the firewall. Absent means IPv4.
pub(crate) fn parse_ip_family(value: &str) -> Result<IpFamily, CoreError> {
    if value.is_empty() {
        Ok(IpFamily::default())
    } else {
        parse_wire("IPFamily", value)
    }
}
