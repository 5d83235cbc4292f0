// IPHost adapter
//
// `HostType` selects which address fields are meaningful:
//   IP          -> IPAddress
//   Network     -> IPAddress + Subnet
//   IPRange     -> StartIPAddress + EndIPAddress
//   IPList      -> ListOfIPAddresses (comma-joined)
//   System Host -> nothing

use crate::resources::{Resource, dedup_sorted, entity_node, transaction_id_of};
use crate::xml::XmlNode;

/// Wire shape of an `<IPHost>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IpHost {
    pub name: String,
    pub description: String,
    pub ip_family: String,
    pub host_type: String,
    pub ip_address: String,
    pub subnet: String,
    pub start_ip_address: String,
    pub end_ip_address: String,
    pub list_of_ip_addresses: String,
    pub host_groups: Vec<String>,
    pub transaction_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ActiveFields {
    ip_address: bool,
    subnet: bool,
    range: bool,
    list: bool,
}

impl ActiveFields {
    const ALL: Self = Self {
        ip_address: true,
        subnet: true,
        range: true,
        list: true,
    };

    /// `None` for a host type this client does not know; nothing is suppressed then.
    fn for_host_type(host_type: &str) -> Option<Self> {
        let none = Self {
            ip_address: false,
            subnet: false,
            range: false,
            list: false,
        };
        match host_type {
            "IP" => Some(Self {
                ip_address: true,
                ..none
            }),
            "Network" => Some(Self {
                ip_address: true,
                subnet: true,
                ..none
            }),
            "IPRange" => Some(Self { range: true, ..none }),
            "IPList" => Some(Self { list: true, ..none }),
            "System Host" | "SystemHost" => Some(none),
            _ => None,
        }
    }
}

impl IpHost {
    fn active_fields(&self) -> ActiveFields {
        ActiveFields::for_host_type(&self.host_type).unwrap_or(ActiveFields::ALL)
    }
}

/// Re-join a comma list without surrounding whitespace or empty items.
fn tidy_ip_list(raw: &str) -> String {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

impl Resource for IpHost {
    const TAG: &'static str = "IPHost";

    fn name(&self) -> &str {
        &self.name
    }

    fn to_node(&self) -> XmlNode {
        let active = self.active_fields();
        let mut node = entity_node(Self::TAG, &self.transaction_id)
            .with_child(XmlNode::text_element("Name", self.name.as_str()))
            .with_child(XmlNode::text_element(
                "Description",
                self.description.as_str(),
            ));
        node.push_non_empty("IPFamily", &self.ip_family);
        node.children
            .push(XmlNode::text_element("HostType", self.host_type.as_str()));

        if active.ip_address {
            node.push_non_empty("IPAddress", &self.ip_address);
        }
        if active.subnet {
            node.push_non_empty("Subnet", &self.subnet);
        }
        if active.range {
            node.push_non_empty("StartIPAddress", &self.start_ip_address);
            node.push_non_empty("EndIPAddress", &self.end_ip_address);
        }
        if active.list {
            node.push_non_empty("ListOfIPAddresses", &self.list_of_ip_addresses);
        }
        if !self.host_groups.is_empty() {
            node.children.push(XmlNode::list(
                "HostGroupList",
                "HostGroup",
                self.host_groups.iter().cloned(),
            ));
        }
        node
    }

    fn from_node(node: &XmlNode) -> Self {
        Self {
            name: node.child_text("Name"),
            description: node.child_text("Description"),
            ip_family: node.child_text("IPFamily"),
            host_type: node.child_text("HostType"),
            ip_address: node.child_text("IPAddress"),
            subnet: node.child_text("Subnet"),
            start_ip_address: node.child_text("StartIPAddress"),
            end_ip_address: node.child_text("EndIPAddress"),
            list_of_ip_addresses: node.child_text("ListOfIPAddresses"),
            host_groups: node.child_list("HostGroupList", "HostGroup"),
            transaction_id: transaction_id_of(node),
        }
    }

    fn clear_transaction_id(&mut self) {
        self.transaction_id.clear();
    }

    fn normalize(&mut self) {
        let active = self.active_fields();
        if !active.ip_address {
            self.ip_address.clear();
        }
        if !active.subnet {
            self.subnet.clear();
        }
        if !active.range {
            self.start_ip_address.clear();
            self.end_ip_address.clear();
        }
        if active.list {
            self.list_of_ip_addresses = tidy_ip_list(&self.list_of_ip_addresses);
        } else {
            self.list_of_ip_addresses.clear();
        }
        self.host_groups = dedup_sorted(std::mem::take(&mut self.host_groups));
    }
}
