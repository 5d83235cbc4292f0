// ── Domain model ──
//
// Typed views of the four firewall object kinds. Variant fields are enums,
// MAC addresses are validated, and each type knows which of its fields are
// required before it may be sent.

pub mod common;
pub mod firewall_rule;
pub mod ip_host;
pub mod ip_host_group;
pub mod mac_address;
pub mod mac_host;

pub use common::IpFamily;
pub use firewall_rule::{
    FirewallRule, NetworkPolicy, PolicyType, RuleAction, RulePosition, RuleStatus,
};
pub use ip_host::{HostType, IpHost};
pub use ip_host_group::IpHostGroup;
pub use mac_address::{MacAddress, parse_mac_list};
pub use mac_host::{MacHost, MacHostType};
