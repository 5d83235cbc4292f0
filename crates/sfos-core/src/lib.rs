// sfos-core: Typed objects and the `Firewall` facade on top of sfos-api.

pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod model;
pub mod transport;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{FirewallConfig, TlsVerification, TransportKind};
pub use controller::Firewall;
pub use convert::WireModel;
pub use error::CoreError;
pub use transport::ConfiguredTransport;

pub use model::{
    FirewallRule, HostType, IpFamily, IpHost, IpHostGroup, MacAddress, MacHost, MacHostType,
    NetworkPolicy, PolicyType, RuleAction, RulePosition, RuleStatus, parse_mac_list,
};

// Wire-level pieces callers need to plug in their own transport.
pub use sfos_api::{Credentials, Transport};
