// IPHostGroup adapter

use crate::resources::{Resource, dedup_sorted, entity_node, transaction_id_of};
use crate::xml::XmlNode;

/// Wire shape of an `<IPHostGroup>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IpHostGroup {
    pub name: String,
    pub description: String,
    pub ip_family: String,
    /// Member host names. Ordered on the wire, a set in meaning.
    pub hosts: Vec<String>,
    pub transaction_id: String,
}

impl Resource for IpHostGroup {
    const TAG: &'static str = "IPHostGroup";

    fn name(&self) -> &str {
        &self.name
    }

    fn to_node(&self) -> XmlNode {
        let mut node = entity_node(Self::TAG, &self.transaction_id)
            .with_child(XmlNode::text_element("Name", self.name.as_str()))
            .with_child(XmlNode::text_element(
                "Description",
                self.description.as_str(),
            ));
        node.push_non_empty("IPFamily", &self.ip_family);
        if !self.hosts.is_empty() {
            node.children
                .push(XmlNode::list("HostList", "Host", self.hosts.iter().cloned()));
        }
        node
    }

    fn from_node(node: &XmlNode) -> Self {
        Self {
            name: node.child_text("Name"),
            description: node.child_text("Description"),
            ip_family: node.child_text("IPFamily"),
            hosts: node.child_list("HostList", "Host"),
            transaction_id: transaction_id_of(node),
        }
    }

    fn clear_transaction_id(&mut self) {
        self.transaction_id.clear();
    }

    /// Hosts come back in whatever order the firewall stores them; sort
    /// after de-duplicating so desired state compares equal.
    fn normalize(&mut self) {
        self.hosts = dedup_sorted(std::mem::take(&mut self.hosts));
    }
}
