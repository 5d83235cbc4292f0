// ── Firewall rule ──

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::common::{IpFamily, require_name};
use crate::error::CoreError;

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
pub enum RuleStatus {
    #[default]
    Enable,
    Disable,
}

impl RuleStatus {
    pub fn is_enabled(self) -> bool {
        self == Self::Enable
    }
}

impl From<bool> for RuleStatus {
    fn from(enabled: bool) -> Self {
        if enabled { Self::Enable } else { Self::Disable }
    }
}

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
pub enum RuleAction {
    #[default]
    Accept,
    Drop,
    Reject,
}

/// Where a rule sits in the rule table.
///
/// `After` and `Before` name the neighbouring rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "position", content = "rule")]
pub enum RulePosition {
    Top,
    #[default]
    Bottom,
    After(String),
    Before(String),
}

impl RulePosition {
    /// The `Position` element value.
    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::Top => "Top",
            Self::Bottom => "Bottom",
            Self::After(_) => "After",
            Self::Before(_) => "Before",
        }
    }

    /// The referenced rule, for `After` and `Before`.
    pub fn reference(&self) -> Option<&str> {
        match self {
            Self::After(name) | Self::Before(name) => Some(name),
            Self::Top | Self::Bottom => None,
        }
    }
}

/// Rule family. Values this crate does not know are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum PolicyType {
    #[default]
    Network,
    User,
    Other(String),
}

impl PolicyType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Network => "Network",
            Self::User => "User",
            Self::Other(other) => other,
        }
    }
}

impl fmt::Display for PolicyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_owned()))
    }
}

impl From<String> for PolicyType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Network" => Self::Network,
            "User" => Self::User,
            _ => Self::Other(s),
        }
    }
}

impl From<PolicyType> for String {
    fn from(policy: PolicyType) -> Self {
        match policy {
            PolicyType::Other(other) => other,
            known => known.as_str().to_owned(),
        }
    }
}

/// Traffic matching and handling of a rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkPolicy {
    pub action: RuleAction,
    pub log_traffic: bool,
    pub skip_local_destined: bool,
    /// Schedule name; `All The Time` on a stock firewall.
    pub schedule: String,
    pub source_zones: Vec<String>,
    pub destination_zones: Vec<String>,
    pub source_networks: Vec<String>,
    pub destination_networks: Vec<String>,
    /// Optional scanning, QoS and heartbeat settings keyed by element name
    /// (e.g. `WebFilter`, `ScanVirus`). Unset keys keep the firewall default.
    pub settings: IndexMap<String, String>,
}

/// A firewall rule (`FirewallRule`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallRule {
    pub name: String,
    pub description: String,
    pub ip_family: IpFamily,
    pub status: RuleStatus,
    pub position: RulePosition,
    pub policy_type: PolicyType,
    pub network_policy: Option<NetworkPolicy>,
}

impl FirewallRule {
    pub const KIND: &'static str = "FirewallRule";

    pub fn validate(&self) -> Result<(), CoreError> {
        require_name(Self::KIND, &self.name)?;
        if let Some(reference) = self.position.reference() {
            if reference.trim().is_empty() {
                return Err(CoreError::validation(format!(
                    "rule '{}' position {} requires a rule name",
                    self.name,
                    self.position.as_wire()
                )));
            }
            if reference == self.name {
                return Err(CoreError::validation(format!(
                    "rule '{}' cannot be positioned relative to itself",
                    self.name
                )));
            }
        }
        if let Some(policy) = &self.network_policy {
            if let Some(key) = policy.settings.keys().find(|k| !is_known_setting(k)) {
                return Err(CoreError::validation(format!(
                    "rule '{}' has unknown network policy setting '{key}'",
                    self.name
                )));
            }
        }
        Ok(())
    }
}

fn is_known_setting(key: &str) -> bool {
    sfos_api::NetworkPolicy::default()
        .settings()
        .iter()
        .any(|(tag, _)| *tag == key)
}
