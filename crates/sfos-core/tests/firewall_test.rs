#![allow(clippy::unwrap_used)]
// Integration tests for the `Firewall` facade using wiremock.

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use url::Url;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sfos_core::{
    CoreError, Firewall, FirewallConfig, FirewallRule, HostType, IpHost, IpHostGroup, MacAddress,
    MacHost, NetworkPolicy, RuleAction, RulePosition, parse_mac_list,
};

// ── Helpers ─────────────────────────────────────────────────────────

const CONTROLLER: &str = "/webconsole/APIController";

async fn setup() -> (MockServer, Firewall) {
    let server = MockServer::start().await;
    let config = FirewallConfig::new(
        Url::parse(&server.uri()).unwrap(),
        "admin",
        SecretString::from("s3cret".to_owned()),
    );
    let firewall = Firewall::new(&config).unwrap();
    (server, firewall)
}

fn response(inner: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Response APIVersion="1905.1">
  <Login><status>Authentication Successful</status></Login>
  {inner}
</Response>"#
    )
}

fn set_ok(kind: &str) -> String {
    response(&format!(
        r#"<{kind} transactionid=""><Status code="200">Configuration applied successfully.</Status></{kind}>"#
    ))
}

async fn respond_with(server: &MockServer, body: String) {
    Mock::given(method("POST"))
        .and(path(CONTROLLER))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn last_request_body(server: &MockServer) -> String {
    let requests = server.received_requests().await.unwrap();
    String::from_utf8_lossy(&requests.last().unwrap().body).into_owned()
}

// ── Validation happens before the network ───────────────────────────

#[tokio::test]
async fn test_invalid_values_never_reach_the_firewall() {
    let (server, firewall) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(set_ok("IPHost")))
        .expect(0)
        .mount(&server)
        .await;

    let network_without_subnet = IpHost::network("lan", "10.0.0.0", "");
    let err = firewall
        .create_ip_host(&network_without_subnet)
        .await
        .unwrap_err();
    assert!(err.is_validation(), "{err:?}");

    let empty_list = MacHost::list("printers", Vec::new());
    assert!(firewall.create_mac_host(&empty_list).await.unwrap_err().is_validation());

    let dangling = FirewallRule {
        name: "r1".into(),
        position: RulePosition::After(String::new()),
        ..FirewallRule::default()
    };
    assert!(firewall.update_firewall_rule(&dangling).await.unwrap_err().is_validation());

    assert!(firewall.delete_ip_host_group("").await.unwrap_err().is_validation());
    assert!(firewall.read_ip_host("").await.unwrap_err().is_validation());
    assert!(firewall.lookup_mac_host(" ").await.unwrap_err().is_validation());
}

#[tokio::test]
async fn test_bulk_create_validates_every_rule_first() {
    let (server, firewall) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(set_ok("FirewallRule")))
        .expect(0)
        .mount(&server)
        .await;

    let good = FirewallRule {
        name: "ok".into(),
        ..FirewallRule::default()
    };
    let bad = FirewallRule {
        name: "bad".into(),
        position: RulePosition::Before(" ".into()),
        ..FirewallRule::default()
    };
    let err = firewall.create_firewall_rules(&[good, bad]).await.unwrap_err();
    match err {
        CoreError::Operation { name, .. } => assert_eq!(name, "bad"),
        other => panic!("expected Operation context, got: {other:?}"),
    }
}

// ── IP hosts ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_and_read_ip_host() {
    let (server, firewall) = setup().await;

    Mock::given(method("POST"))
        .and(path(CONTROLLER))
        .and(body_string_contains("<Set operation=\"add\">"))
        .respond_with(ResponseTemplate::new(200).set_body_string(set_ok("IPHost")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(CONTROLLER))
        .and(body_string_contains("<Get>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(response(
            r#"<IPHost transactionid="">
                 <Name>web1</Name><Description></Description><IPFamily>IPv4</IPFamily>
                 <HostType>IP</HostType><IPAddress>192.168.1.10</IPAddress>
                 <HostGroupList><HostGroup>servers</HostGroup><HostGroup>dmz</HostGroup></HostGroupList>
               </IPHost>"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let mut host = IpHost::ip("web1", "192.168.1.10");
    host.host_groups = vec!["dmz".into(), "servers".into()];
    firewall.create_ip_host(&host).await.unwrap();

    let read = firewall.read_ip_host("web1").await.unwrap().unwrap();
    assert_eq!(read, host);
    assert_eq!(read.host_type, HostType::Ip);
}

#[tokio::test]
async fn test_lookup_missing_is_not_found() {
    let (server, firewall) = setup().await;
    respond_with(
        &server,
        response("<IPHost><Status>Number of records Zero.</Status></IPHost>"),
    )
    .await;

    assert_eq!(firewall.read_ip_host("ghost").await.unwrap(), None);

    let err = firewall.lookup_ip_host("ghost").await.unwrap_err();
    assert!(err.is_not_found(), "{err:?}");
    assert_eq!(err.to_string(), "lookup IPHost 'ghost': IPHost 'ghost' not found");
}

#[tokio::test]
async fn test_authentication_failure_carries_context() {
    let (server, firewall) = setup().await;
    respond_with(
        &server,
        r#"<Response><Login><status>Authentication Failure</status></Login></Response>"#.to_owned(),
    )
    .await;

    let err = firewall
        .update_ip_host(&IpHost::ip("web1", "192.168.1.11"))
        .await
        .unwrap_err();
    assert!(err.is_authentication());
    match err {
        CoreError::Operation {
            operation,
            kind,
            name,
            ..
        } => {
            assert_eq!(operation, "update");
            assert_eq!(kind, "IPHost");
            assert_eq!(name, "web1");
        }
        other => panic!("expected Operation context, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_rejected_create() {
    let (server, firewall) = setup().await;
    respond_with(
        &server,
        response(
            r#"<IPHostGroup transactionid=""><Status code="502">Entity having same name already exists.</Status></IPHostGroup>"#,
        ),
    )
    .await;

    let err = firewall
        .create_ip_host_group(&IpHostGroup::new("web"))
        .await
        .unwrap_err();
    assert!(err.is_rejected());
    match err.root() {
        CoreError::Rejected { code, message } => {
            assert_eq!(code.as_deref(), Some("502"));
            assert_eq!(message, "Entity having same name already exists.");
        }
        other => panic!("expected Rejected, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_bulk_create_ip_hosts() {
    let (server, firewall) = setup().await;
    Mock::given(method("POST"))
        .and(path(CONTROLLER))
        .and(body_string_contains("<Set operation=\"add\">"))
        .respond_with(ResponseTemplate::new(200).set_body_string(response(
            r#"<IPHost transactionid=""><Status code="200">Configuration applied successfully.</Status></IPHost>
               <IPHost transactionid=""><Status code="200">Configuration applied successfully.</Status></IPHost>"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let hosts = [
        IpHost::ip("web1", "192.168.1.10"),
        IpHost::network("lan", "10.0.0.0", "255.255.255.0"),
    ];
    firewall.create_ip_hosts(&hosts).await.unwrap();

    let body = last_request_body(&server).await;
    assert_eq!(body.matches("<IPHost ").count(), 2);
    assert!(body.contains("<Subnet>255.255.255.0</Subnet>"));
}

#[tokio::test]
async fn test_bulk_create_ip_hosts_partial_rejection() {
    let (server, firewall) = setup().await;
    respond_with(
        &server,
        response(
            r#"<IPHost transactionid=""><Status code="200">Configuration applied successfully.</Status></IPHost>
               <IPHost transactionid=""><Status code="502">Entity having same name already exists.</Status></IPHost>"#,
        ),
    )
    .await;

    let hosts = [IpHost::ip("a", "10.0.0.1"), IpHost::ip("b", "10.0.0.2")];
    let err = firewall.create_ip_hosts(&hosts).await.unwrap_err();
    assert!(err.is_rejected());
    match err {
        CoreError::Operation { name, .. } => assert_eq!(name, "a, b"),
        other => panic!("expected Operation context, got: {other:?}"),
    }
}

// ── MAC hosts ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_mac_host_update_uses_name_element_and_list() {
    let (server, firewall) = setup().await;
    respond_with(&server, set_ok("MACHost")).await;

    let host = MacHost::list(
        "printers",
        parse_mac_list("AA:BB:CC:DD:EE:FF, 11:22:33:44:55:66").unwrap(),
    );
    firewall.update_mac_host(&host).await.unwrap();

    let body = last_request_body(&server).await;
    assert!(body.contains("<Set operation=\"update\">"));
    assert!(body.contains("<Name>printers</Name>"));
    assert!(body.contains("<Type>MACLIST</Type>"));
    assert!(body.contains("<MACAddress>11:22:33:44:55:66</MACAddress>"));
}

#[tokio::test]
async fn test_read_single_mac_host() {
    let (server, firewall) = setup().await;
    respond_with(
        &server,
        response(
            r#"<MACHost transactionid=""><Name>cam</Name><Description>door</Description>
               <Type>MACAddress</Type><MACAddress>00:16:76:49:33:CE</MACAddress></MACHost>"#,
        ),
    )
    .await;

    let host = firewall.lookup_mac_host("cam").await.unwrap();
    assert_eq!(
        host,
        MacHost {
            description: "door".into(),
            ..MacHost::single("cam", MacAddress::parse("00:16:76:49:33:CE").unwrap())
        }
    );
}

// ── Firewall rules ──────────────────────────────────────────────────

#[tokio::test]
async fn test_read_firewall_rule_keeps_list_order() {
    let (server, firewall) = setup().await;
    respond_with(
        &server,
        response(
            r#"<FirewallRule transactionid="">
                 <Name>lan-out</Name><Description></Description><IPFamily>IPv4</IPFamily>
                 <Status>Enable</Status><Position>After</Position><PolicyType>Network</PolicyType>
                 <After><Name>allow-dns</Name></After>
                 <NetworkPolicy>
                   <Action>Accept</Action><LogTraffic>Enable</LogTraffic>
                   <SkipLocalDestined>Disable</SkipLocalDestined><Schedule>All The Time</Schedule>
                   <SourceZones><Zone>LAN</Zone><Zone>DMZ</Zone></SourceZones>
                   <DestinationZones><Zone>WAN</Zone></DestinationZones>
                   <WebFilter>Allow All</WebFilter>
                 </NetworkPolicy>
               </FirewallRule>"#,
        ),
    )
    .await;

    let rule = firewall.lookup_firewall_rule("lan-out").await.unwrap();
    assert_eq!(rule.position, RulePosition::After("allow-dns".into()));
    let policy = rule.network_policy.unwrap();
    assert_eq!(policy.action, RuleAction::Accept);
    assert!(policy.log_traffic);
    assert!(!policy.skip_local_destined);
    assert_eq!(policy.source_zones, vec!["LAN", "DMZ"]);
    assert_eq!(policy.settings.get("WebFilter").map(String::as_str), Some("Allow All"));
}

#[tokio::test]
async fn test_bulk_create_sends_one_request() {
    let (server, firewall) = setup().await;
    Mock::given(method("POST"))
        .and(path(CONTROLLER))
        .respond_with(ResponseTemplate::new(200).set_body_string(response(
            r#"<FirewallRule transactionid=""><Status code="200">Configuration applied successfully.</Status></FirewallRule>
               <FirewallRule transactionid=""><Status code="200">Configuration applied successfully.</Status></FirewallRule>"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let policy = NetworkPolicy {
        action: RuleAction::Drop,
        schedule: "All The Time".into(),
        source_zones: vec!["WAN".into()],
        destination_zones: vec!["LAN".into()],
        ..NetworkPolicy::default()
    };
    let rules = [
        FirewallRule {
            name: "block-a".into(),
            position: RulePosition::Top,
            network_policy: Some(policy.clone()),
            ..FirewallRule::default()
        },
        FirewallRule {
            name: "block-b".into(),
            position: RulePosition::After("block-a".into()),
            network_policy: Some(policy),
            ..FirewallRule::default()
        },
    ];
    firewall.create_firewall_rules(&rules).await.unwrap();

    let body = last_request_body(&server).await;
    assert_eq!(body.matches("<FirewallRule ").count(), 2);
    assert!(body.contains("<After>"));
}
