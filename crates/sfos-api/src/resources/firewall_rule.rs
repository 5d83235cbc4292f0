// FirewallRule adapter
//
// A rule carries its placement (`Position` plus an optional `After` or
// `Before` reference) and an embedded `<NetworkPolicy>`. The zone and
// network lists keep the order the firewall returns.

use crate::resources::{Resource, entity_node, transaction_id_of};
use crate::xml::XmlNode;

pub const POSITION_AFTER: &str = "After";
pub const POSITION_BEFORE: &str = "Before";

/// Wire shape of a `<FirewallRule>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FirewallRule {
    pub name: String,
    pub description: String,
    pub ip_family: String,
    pub status: String,
    pub position: String,
    pub policy_type: String,
    /// Rule name referenced when `position` is `After`.
    pub after: Option<String>,
    /// Rule name referenced when `position` is `Before`.
    pub before: Option<String>,
    pub network_policy: Option<NetworkPolicy>,
    pub transaction_id: String,
}

/// `<NetworkPolicy>` block of a rule.
///
/// The optional settings are omitted from the request when empty so the
/// firewall applies its own defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkPolicy {
    pub action: String,
    pub log_traffic: String,
    pub skip_local_destined: String,
    pub schedule: String,
    pub source_zones: Vec<String>,
    pub destination_zones: Vec<String>,
    pub source_networks: Vec<String>,
    pub destination_networks: Vec<String>,
    pub dscp_marking: String,
    pub web_filter: String,
    pub web_category_base_qos_policy: String,
    pub block_quick_quic: String,
    pub scan_virus: String,
    pub zero_day_protection: String,
    pub proxy_mode: String,
    pub decrypt_https: String,
    pub application_control: String,
    pub application_base_qos_policy: String,
    pub intrusion_prevention: String,
    pub traffic_shaping_policy: String,
    pub scan_smtp: String,
    pub scan_smtps: String,
    pub scan_imap: String,
    pub scan_imaps: String,
    pub scan_pop3: String,
    pub scan_pop3s: String,
    pub scan_ftp: String,
    pub source_security_heartbeat: String,
    pub minimum_source_hb_permitted: String,
    pub dest_security_heartbeat: String,
    pub minimum_destination_hb_permitted: String,
}

/// Number of optional scalar settings in a `<NetworkPolicy>`.
pub const SETTING_COUNT: usize = 23;

impl NetworkPolicy {
    pub const TAG: &'static str = "NetworkPolicy";

    /// Optional scalar settings as `(element, value)`, in the order the
    /// firewall emits them.
    pub fn settings(&self) -> [(&'static str, &String); SETTING_COUNT] {
        [
            ("DSCPMarking", &self.dscp_marking),
            ("WebFilter", &self.web_filter),
            ("WebCategoryBaseQoSPolicy", &self.web_category_base_qos_policy),
            ("BlockQuickQuic", &self.block_quick_quic),
            ("ScanVirus", &self.scan_virus),
            ("ZeroDayProtection", &self.zero_day_protection),
            ("ProxyMode", &self.proxy_mode),
            ("DecryptHTTPS", &self.decrypt_https),
            ("ApplicationControl", &self.application_control),
            ("ApplicationBaseQoSPolicy", &self.application_base_qos_policy),
            ("IntrusionPrevention", &self.intrusion_prevention),
            ("TrafficShappingPolicy", &self.traffic_shaping_policy),
            ("ScanSMTP", &self.scan_smtp),
            ("ScanSMTPS", &self.scan_smtps),
            ("ScanIMAP", &self.scan_imap),
            ("ScanIMAPS", &self.scan_imaps),
            ("ScanPOP3", &self.scan_pop3),
            ("ScanPOP3S", &self.scan_pop3s),
            ("ScanFTP", &self.scan_ftp),
            ("SourceSecurityHeartbeat", &self.source_security_heartbeat),
            ("MinimumSourceHBPermitted", &self.minimum_source_hb_permitted),
            ("DestSecurityHeartbeat", &self.dest_security_heartbeat),
            (
                "MinimumDestinationHBPermitted",
                &self.minimum_destination_hb_permitted,
            ),
        ]
    }

    pub fn settings_mut(&mut self) -> [(&'static str, &mut String); SETTING_COUNT] {
        [
            ("DSCPMarking", &mut self.dscp_marking),
            ("WebFilter", &mut self.web_filter),
            (
                "WebCategoryBaseQoSPolicy",
                &mut self.web_category_base_qos_policy,
            ),
            ("BlockQuickQuic", &mut self.block_quick_quic),
            ("ScanVirus", &mut self.scan_virus),
            ("ZeroDayProtection", &mut self.zero_day_protection),
            ("ProxyMode", &mut self.proxy_mode),
            ("DecryptHTTPS", &mut self.decrypt_https),
            ("ApplicationControl", &mut self.application_control),
            (
                "ApplicationBaseQoSPolicy",
                &mut self.application_base_qos_policy,
            ),
            ("IntrusionPrevention", &mut self.intrusion_prevention),
            ("TrafficShappingPolicy", &mut self.traffic_shaping_policy),
            ("ScanSMTP", &mut self.scan_smtp),
            ("ScanSMTPS", &mut self.scan_smtps),
            ("ScanIMAP", &mut self.scan_imap),
            ("ScanIMAPS", &mut self.scan_imaps),
            ("ScanPOP3", &mut self.scan_pop3),
            ("ScanPOP3S", &mut self.scan_pop3s),
            ("ScanFTP", &mut self.scan_ftp),
            (
                "SourceSecurityHeartbeat",
                &mut self.source_security_heartbeat,
            ),
            (
                "MinimumSourceHBPermitted",
                &mut self.minimum_source_hb_permitted,
            ),
            ("DestSecurityHeartbeat", &mut self.dest_security_heartbeat),
            (
                "MinimumDestinationHBPermitted",
                &mut self.minimum_destination_hb_permitted,
            ),
        ]
    }

    pub fn to_node(&self) -> XmlNode {
        let mut node = XmlNode::new(Self::TAG)
            .with_child(XmlNode::text_element("Action", self.action.as_str()))
            .with_child(XmlNode::text_element(
                "LogTraffic",
                self.log_traffic.as_str(),
            ))
            .with_child(XmlNode::text_element(
                "SkipLocalDestined",
                self.skip_local_destined.as_str(),
            ))
            .with_child(XmlNode::text_element("Schedule", self.schedule.as_str()))
            // Zone containers are always present, even when empty.
            .with_child(XmlNode::list(
                "SourceZones",
                "Zone",
                self.source_zones.iter().cloned(),
            ))
            .with_child(XmlNode::list(
                "DestinationZones",
                "Zone",
                self.destination_zones.iter().cloned(),
            ));

        if !self.source_networks.is_empty() {
            node.children.push(XmlNode::list(
                "SourceNetworks",
                "Network",
                self.source_networks.iter().cloned(),
            ));
        }
        if !self.destination_networks.is_empty() {
            node.children.push(XmlNode::list(
                "DestinationNetworks",
                "Network",
                self.destination_networks.iter().cloned(),
            ));
        }
        for (tag, value) in self.settings() {
            node.push_non_empty(tag, value);
        }
        node
    }

    pub fn from_node(node: &XmlNode) -> Self {
        let mut policy = Self {
            action: node.child_text("Action"),
            log_traffic: node.child_text("LogTraffic"),
            skip_local_destined: node.child_text("SkipLocalDestined"),
            schedule: node.child_text("Schedule"),
            source_zones: node.child_list("SourceZones", "Zone"),
            destination_zones: node.child_list("DestinationZones", "Zone"),
            source_networks: node.child_list("SourceNetworks", "Network"),
            destination_networks: node.child_list("DestinationNetworks", "Network"),
            ..Self::default()
        };
        for (tag, value) in policy.settings_mut() {
            *value = node.child_text(tag);
        }
        policy
    }
}

/// `<After><Name>x</Name></After>`, or `None` when absent or blank.
fn read_reference(node: &XmlNode, tag: &str) -> Option<String> {
    node.child(tag)
        .map(|r| r.child_text("Name"))
        .filter(|name| !name.is_empty())
}

fn reference_node(tag: &str, name: &str) -> XmlNode {
    XmlNode::new(tag).with_child(XmlNode::text_element("Name", name))
}

impl FirewallRule {
    /// The `After` reference, but only if `position` is `After`.
    fn active_after(&self) -> Option<&str> {
        (self.position == POSITION_AFTER)
            .then_some(self.after.as_deref())
            .flatten()
    }

    fn active_before(&self) -> Option<&str> {
        (self.position == POSITION_BEFORE)
            .then_some(self.before.as_deref())
            .flatten()
    }
}

impl Resource for FirewallRule {
    const TAG: &'static str = "FirewallRule";

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
            .with_child(XmlNode::text_element("IPFamily", self.ip_family.as_str()))
            .with_child(XmlNode::text_element("Status", self.status.as_str()))
            .with_child(XmlNode::text_element("Position", self.position.as_str()))
            .with_child(XmlNode::text_element(
                "PolicyType",
                self.policy_type.as_str(),
            ));

        if let Some(after) = self.active_after() {
            node.children.push(reference_node("After", after));
        }
        if let Some(before) = self.active_before() {
            node.children.push(reference_node("Before", before));
        }
        if let Some(policy) = &self.network_policy {
            node.children.push(policy.to_node());
        }
        node
    }

    fn from_node(node: &XmlNode) -> Self {
        Self {
            name: node.child_text("Name"),
            description: node.child_text("Description"),
            ip_family: node.child_text("IPFamily"),
            status: node.child_text("Status"),
            position: node.child_text("Position"),
            policy_type: node.child_text("PolicyType"),
            after: read_reference(node, "After"),
            before: read_reference(node, "Before"),
            network_policy: node.child(NetworkPolicy::TAG).map(NetworkPolicy::from_node),
            transaction_id: transaction_id_of(node),
        }
    }

    fn clear_transaction_id(&mut self) {
        self.transaction_id.clear();
    }

    fn normalize(&mut self) {
        if self.position != POSITION_AFTER {
            self.after = None;
        }
        if self.position != POSITION_BEFORE {
            self.before = None;
        }
    }
}
