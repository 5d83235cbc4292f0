// Resource adapters
//
// One module per resource kind. Each owns the element shape of its entity,
// which fields are written for which variant, and how a fetched entity is
// normalized so that unchanged remote state always reads back identically.

pub mod firewall_rule;
pub mod ip_host;
pub mod ip_host_group;
pub mod mac_host;

pub use firewall_rule::{FirewallRule, NetworkPolicy};
pub use ip_host::IpHost;
pub use ip_host_group::IpHostGroup;
pub use mac_host::MacHost;

use indexmap::IndexSet;

use crate::xml::XmlNode;

/// Attribute echoed back by the firewall on every entity.
pub const TRANSACTION_ID_ATTR: &str = "transactionid";

/// A firewall object addressable by its unique `Name`.
pub trait Resource: Clone + Send + Sync {
    /// Element name of this kind in requests and responses (e.g. `IPHost`).
    const TAG: &'static str;

    fn name(&self) -> &str;

    /// Full entity element for a `Set` block.
    fn to_node(&self) -> XmlNode;

    /// Tolerant decode: missing elements become empty values.
    fn from_node(node: &XmlNode) -> Self;

    fn clear_transaction_id(&mut self);

    /// Make a fetched entity stable across reads.
    fn normalize(&mut self);

    /// `<Kind><Name>name</Name></Kind>`, the body of `Get` and `Remove`.
    fn key_node(name: &str) -> XmlNode {
        XmlNode::new(Self::TAG).with_child(XmlNode::text_element("Name", name))
    }
}

/// Drop duplicates, keeping the first occurrence of each value.
pub fn dedup_first_seen(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .collect::<IndexSet<String>>()
        .into_iter()
        .collect()
}

/// Drop duplicates and sort, for lists the firewall returns in arbitrary order.
pub fn dedup_sorted(values: Vec<String>) -> Vec<String> {
    let mut unique = dedup_first_seen(values);
    unique.sort();
    unique
}

pub(crate) fn entity_node(tag: &str, transaction_id: &str) -> XmlNode {
    XmlNode::new(tag).with_attr(TRANSACTION_ID_ATTR, transaction_id)
}

pub(crate) fn transaction_id_of(node: &XmlNode) -> String {
    node.attr(TRANSACTION_ID_ATTR).unwrap_or_default().to_owned()
}
