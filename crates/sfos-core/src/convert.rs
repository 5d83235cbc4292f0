// ── Domain <-> wire conversions ──
//
// The wire types in sfos-api are plain strings; the domain types here are
// typed. Writing is infallible once a value has been validated. Reading
// fails with `CoreError::Decode` when the firewall returns a value this
// crate cannot represent.

use sfos_api::resources::firewall_rule::{POSITION_AFTER, POSITION_BEFORE};
use sfos_api::resources::mac_host::{TYPE_LIST, TYPE_SINGLE};
use sfos_api::{Resource, resources as wire};

use crate::error::CoreError;
use crate::model::common::{parse_ip_family, parse_wire};
use crate::model::{
    FirewallRule, HostType, IpHost, IpHostGroup, MacAddress, MacHost, MacHostType, NetworkPolicy,
    PolicyType, RuleAction, RulePosition, RuleStatus,
};

/// A domain type with a wire counterpart.
pub trait WireModel: Sized + Send + Sync {
    type Wire: Resource;

    fn name(&self) -> &str;

    /// Reject values that must never reach the firewall.
    fn validate(&self) -> Result<(), CoreError>;

    fn to_wire(&self) -> Self::Wire;

    fn from_wire(wire: Self::Wire) -> Result<Self, CoreError>;
}

// ── IPHost ───────────────────────────────────────────────────────────

impl WireModel for IpHost {
    type Wire = wire::IpHost;

    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self) -> Result<(), CoreError> {
        IpHost::validate(self)
    }

    fn to_wire(&self) -> wire::IpHost {
        wire::IpHost {
            name: self.name.clone(),
            description: self.description.clone(),
            ip_family: self.ip_family.to_string(),
            host_type: self.host_type.to_string(),
            ip_address: self.ip_address.clone(),
            subnet: self.subnet.clone(),
            start_ip_address: self.start_ip_address.clone(),
            end_ip_address: self.end_ip_address.clone(),
            list_of_ip_addresses: self.list_of_ip_addresses.clone(),
            host_groups: self.host_groups.clone(),
            transaction_id: String::new(),
        }
    }

    fn from_wire(wire: wire::IpHost) -> Result<Self, CoreError> {
        Ok(Self {
            ip_family: parse_ip_family(&wire.ip_family)?,
            host_type: parse_wire::<HostType>("HostType", &wire.host_type)?,
            name: wire.name,
            description: wire.description,
            ip_address: wire.ip_address,
            subnet: wire.subnet,
            start_ip_address: wire.start_ip_address,
            end_ip_address: wire.end_ip_address,
            list_of_ip_addresses: wire.list_of_ip_addresses,
            host_groups: wire.host_groups,
        })
    }
}

// ── IPHostGroup ──────────────────────────────────────────────────────

impl WireModel for IpHostGroup {
    type Wire = wire::IpHostGroup;

    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self) -> Result<(), CoreError> {
        IpHostGroup::validate(self)
    }

    fn to_wire(&self) -> wire::IpHostGroup {
        wire::IpHostGroup {
            name: self.name.clone(),
            description: self.description.clone(),
            ip_family: self.ip_family.to_string(),
            hosts: self.hosts.clone(),
            transaction_id: String::new(),
        }
    }

    fn from_wire(wire: wire::IpHostGroup) -> Result<Self, CoreError> {
        Ok(Self {
            ip_family: parse_ip_family(&wire.ip_family)?,
            name: wire.name,
            description: wire.description,
            hosts: wire.hosts,
        })
    }
}

// ── MACHost ──────────────────────────────────────────────────────────

fn read_mac(value: &str) -> Result<MacAddress, CoreError> {
    MacAddress::parse(value).map_err(|e| CoreError::decode(e.to_string()))
}

impl WireModel for MacHost {
    type Wire = wire::MacHost;

    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self) -> Result<(), CoreError> {
        MacHost::validate(self)
    }

    fn to_wire(&self) -> wire::MacHost {
        let host_type = match self.host_type {
            MacHostType::MacAddress => TYPE_SINGLE,
            MacHostType::MacList => TYPE_LIST,
        };
        wire::MacHost {
            name: self.name.clone(),
            description: self.description.clone(),
            host_type: host_type.to_owned(),
            mac_address: self
                .mac_address
                .as_ref()
                .map(|m| m.as_str().to_owned())
                .unwrap_or_default(),
            mac_list: self.mac_list.iter().map(|m| m.as_str().to_owned()).collect(),
            transaction_id: String::new(),
        }
    }

    fn from_wire(wire: wire::MacHost) -> Result<Self, CoreError> {
        let mac_address = if wire.mac_address.is_empty() {
            None
        } else {
            Some(read_mac(&wire.mac_address)?)
        };
        let mac_list = wire
            .mac_list
            .iter()
            .map(|m| read_mac(m))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            host_type: parse_wire::<MacHostType>("Type", &wire.host_type)?,
            name: wire.name,
            description: wire.description,
            mac_address,
            mac_list,
        })
    }
}

// ── FirewallRule ─────────────────────────────────────────────────────

fn switch(enabled: bool) -> String {
    RuleStatus::from(enabled).to_string()
}

/// `Enable`/`Disable` toggle; absent reads as off.
fn read_switch(element: &str, value: &str) -> Result<bool, CoreError> {
    if value.is_empty() {
        return Ok(false);
    }
    parse_wire::<RuleStatus>(element, value).map(RuleStatus::is_enabled)
}

fn read_position(wire: &wire::FirewallRule) -> Result<RulePosition, CoreError> {
    let missing = || {
        CoreError::decode(format!(
            "rule '{}' has position {} without a rule reference",
            wire.name, wire.position
        ))
    };
    match wire.position.as_str() {
        "Top" => Ok(RulePosition::Top),
        "Bottom" => Ok(RulePosition::Bottom),
        POSITION_AFTER => wire.after.clone().map(RulePosition::After).ok_or_else(missing),
        POSITION_BEFORE => wire
            .before
            .clone()
            .map(RulePosition::Before)
            .ok_or_else(missing),
        other => Err(CoreError::decode(format!(
            "unexpected Position value '{other}'"
        ))),
    }
}

impl From<&NetworkPolicy> for wire::NetworkPolicy {
    fn from(policy: &NetworkPolicy) -> Self {
        let mut out = wire::NetworkPolicy {
            action: policy.action.to_string(),
            log_traffic: switch(policy.log_traffic),
            skip_local_destined: switch(policy.skip_local_destined),
            schedule: policy.schedule.clone(),
            source_zones: policy.source_zones.clone(),
            destination_zones: policy.destination_zones.clone(),
            source_networks: policy.source_networks.clone(),
            destination_networks: policy.destination_networks.clone(),
            ..wire::NetworkPolicy::default()
        };
        for (tag, value) in out.settings_mut() {
            if let Some(set) = policy.settings.get(tag) {
                value.clone_from(set);
            }
        }
        out
    }
}

impl TryFrom<wire::NetworkPolicy> for NetworkPolicy {
    type Error = CoreError;

    fn try_from(wire: wire::NetworkPolicy) -> Result<Self, Self::Error> {
        let settings = wire
            .settings()
            .into_iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(tag, value)| (tag.to_owned(), value.clone()))
            .collect();
        Ok(Self {
            action: parse_wire::<RuleAction>("Action", &wire.action)?,
            log_traffic: read_switch("LogTraffic", &wire.log_traffic)?,
            skip_local_destined: read_switch("SkipLocalDestined", &wire.skip_local_destined)?,
            settings,
            schedule: wire.schedule,
            source_zones: wire.source_zones,
            destination_zones: wire.destination_zones,
            source_networks: wire.source_networks,
            destination_networks: wire.destination_networks,
        })
    }
}

impl WireModel for FirewallRule {
    type Wire = wire::FirewallRule;

    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self) -> Result<(), CoreError> {
        FirewallRule::validate(self)
    }

    fn to_wire(&self) -> wire::FirewallRule {
        let (after, before) = match &self.position {
            RulePosition::After(name) => (Some(name.clone()), None),
            RulePosition::Before(name) => (None, Some(name.clone())),
            RulePosition::Top | RulePosition::Bottom => (None, None),
        };
        wire::FirewallRule {
            name: self.name.clone(),
            description: self.description.clone(),
            ip_family: self.ip_family.to_string(),
            status: self.status.to_string(),
            position: self.position.as_wire().to_owned(),
            policy_type: self.policy_type.to_string(),
            after,
            before,
            network_policy: self.network_policy.as_ref().map(wire::NetworkPolicy::from),
            transaction_id: String::new(),
        }
    }

    fn from_wire(wire: wire::FirewallRule) -> Result<Self, CoreError> {
        let position = read_position(&wire)?;
        Ok(Self {
            ip_family: parse_ip_family(&wire.ip_family)?,
            status: parse_wire::<RuleStatus>("Status", &wire.status)?,
            policy_type: PolicyType::from(wire.policy_type),
            network_policy: wire.network_policy.map(NetworkPolicy::try_from).transpose()?,
            name: wire.name,
            description: wire.description,
            position,
        })
    }
}
