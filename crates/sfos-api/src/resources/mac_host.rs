// MACHost adapter
//
// `Type` is either `MACAddress` (a single `<MACAddress>`) or `MACLIST`
// (`<MACList><MACAddress/>...</MACList>`). Only the active one is written
// and only the active one survives a read.

use crate::resources::{Resource, dedup_first_seen, entity_node, transaction_id_of};
use crate::xml::XmlNode;

pub const TYPE_SINGLE: &str = "MACAddress";
pub const TYPE_LIST: &str = "MACLIST";

/// Wire shape of a `<MACHost>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MacHost {
    pub name: String,
    pub description: String,
    pub host_type: String,
    pub mac_address: String,
    pub mac_list: Vec<String>,
    pub transaction_id: String,
}

impl MacHost {
    fn is_list(&self) -> bool {
        self.host_type.eq_ignore_ascii_case(TYPE_LIST)
    }

    fn is_single(&self) -> bool {
        self.host_type.eq_ignore_ascii_case(TYPE_SINGLE)
    }
}

impl Resource for MacHost {
    const TAG: &'static str = "MACHost";

    fn name(&self) -> &str {
        &self.name
    }

    fn to_node(&self) -> XmlNode {
        let mut node = entity_node(Self::TAG, &self.transaction_id)
            .with_child(XmlNode::text_element("Name", self.name.as_str()))
            .with_child(XmlNode::text_element(
                "Description",
                self.description.as_str(),
            ))
            .with_child(XmlNode::text_element("Type", self.host_type.as_str()));

        if self.is_list() {
            node.children.push(XmlNode::list(
                "MACList",
                "MACAddress",
                self.mac_list.iter().cloned(),
            ));
        } else if self.is_single() {
            node.push_non_empty("MACAddress", &self.mac_address);
        }
        node
    }

    fn from_node(node: &XmlNode) -> Self {
        Self {
            name: node.child_text("Name"),
            description: node.child_text("Description"),
            host_type: node.child_text("Type"),
            mac_address: node.child_text("MACAddress"),
            mac_list: node.child_list("MACList", "MACAddress"),
            transaction_id: transaction_id_of(node),
        }
    }

    fn clear_transaction_id(&mut self) {
        self.transaction_id.clear();
    }

    fn normalize(&mut self) {
        if self.is_list() {
            self.mac_address.clear();
            self.mac_list = dedup_first_seen(std::mem::take(&mut self.mac_list));
        } else if self.is_single() {
            self.mac_list.clear();
        }
    }
}
