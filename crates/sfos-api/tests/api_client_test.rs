#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use url::Url;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sfos_api::{ApiClient, Credentials, Error, HttpTransport, IpHost, IpHostGroup, MacHost};

// ── Helpers ─────────────────────────────────────────────────────────

const CONTROLLER: &str = "/webconsole/APIController";

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let endpoint = Url::parse(&server.uri()).unwrap();
    let transport = HttpTransport::with_client(reqwest::Client::new(), &endpoint).unwrap();
    let credentials = Credentials::new("admin", SecretString::from("s3cret".to_owned()));
    (server, ApiClient::new(credentials, transport))
}

fn response(inner: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Response APIVersion="1905.1" IPS_CAT_VER="1">
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

const LOGIN_FAILED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Response APIVersion="1905.1"><Login><status>Authentication Failure</status></Login></Response>"#;

fn web1() -> IpHost {
    IpHost {
        name: "web1".into(),
        ip_family: "IPv4".into(),
        host_type: "IP".into(),
        ip_address: "192.168.1.10".into(),
        ..IpHost::default()
    }
}

async fn mount_body(server: &MockServer, body: String) {
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

// ── Create / Read ───────────────────────────────────────────────────

#[tokio::test]
async fn test_create_then_read_host() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(CONTROLLER))
        .and(body_string_contains(r#"<Set operation="add">"#))
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
               </IPHost>"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    client.create(&web1()).await.unwrap();

    let create_body = String::from_utf8_lossy(&server.received_requests().await.unwrap()[0].body)
        .into_owned();
    assert!(create_body.contains("name=\"reqxml\""));
    assert!(create_body.contains("<Username>admin</Username>"));
    assert!(create_body.contains("<IPAddress>192.168.1.10</IPAddress>"));
    assert!(!create_body.contains("<Subnet>"));

    let host: IpHost = client.read("web1").await.unwrap().unwrap();
    assert_eq!(host, web1());
}

#[tokio::test]
async fn test_read_missing_returns_none() {
    let (server, client) = setup().await;
    mount_body(
        &server,
        response("<IPHost><Status>Number of records Zero.</Status></IPHost>"),
    )
    .await;

    let host: Option<IpHost> = client.read("ghost").await.unwrap();
    assert_eq!(host, None);
}

#[tokio::test]
async fn test_read_empty_name_never_matches_placeholder() {
    let (server, client) = setup().await;
    mount_body(
        &server,
        response("<IPHost><Status>Number of records Zero.</Status></IPHost>"),
    )
    .await;

    let host: Option<IpHost> = client.read("").await.unwrap();
    assert_eq!(host, None);
}

#[tokio::test]
async fn test_read_filters_by_exact_name() {
    let (server, client) = setup().await;
    mount_body(
        &server,
        response(
            r#"<IPHostGroup><Name>Web</Name><HostList><Host>x</Host></HostList></IPHostGroup>
               <IPHostGroup><Name>web</Name><HostList><Host>b</Host><Host>a</Host></HostList></IPHostGroup>"#,
        ),
    )
    .await;

    let group: IpHostGroup = client.read("web").await.unwrap().unwrap();
    assert_eq!(group.name, "web");
    assert_eq!(group.hosts, vec!["a", "b"]);
}

#[tokio::test]
async fn test_read_deduplicates_mac_list() {
    let (server, client) = setup().await;
    mount_body(
        &server,
        response(
            r#"<MACHost transactionid="">
                 <Name>printers</Name><Type>MACLIST</Type>
                 <MACList>
                   <MACAddress>AA:BB:CC:DD:EE:FF</MACAddress>
                   <MACAddress>AA:BB:CC:DD:EE:FF</MACAddress>
                   <MACAddress>11:22:33:44:55:66</MACAddress>
                 </MACList>
               </MACHost>"#,
        ),
    )
    .await;

    let host: MacHost = client.read("printers").await.unwrap().unwrap();
    assert_eq!(host.mac_list, vec!["AA:BB:CC:DD:EE:FF", "11:22:33:44:55:66"]);
}

// ── Update / Delete ─────────────────────────────────────────────────

#[tokio::test]
async fn test_update_clears_transaction_id() {
    let (server, client) = setup().await;
    mount_body(&server, set_ok("IPHost")).await;

    let mut host = web1();
    host.transaction_id = "abc-123".into();
    client.update(&host).await.unwrap();

    let body = last_request_body(&server).await;
    assert!(body.contains(r#"<Set operation="update">"#));
    assert!(body.contains(r#"<IPHost transactionid="">"#));
    assert!(!body.contains("abc-123"));
}

#[tokio::test]
async fn test_update_rejected_status() {
    let (server, client) = setup().await;
    mount_body(
        &server,
        response(
            r#"<IPHost transactionid=""><Status code="500">Operation could not be performed on Entity.</Status></IPHost>"#,
        ),
    )
    .await;

    let result = client.update(&web1()).await;
    match result {
        Err(Error::OperationFailed { code, message }) => {
            assert_eq!(code, "500");
            assert_eq!(message, "Operation could not be performed on Entity.");
        }
        other => panic!("expected OperationFailed, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_delete_sends_remove_by_name() {
    let (server, client) = setup().await;
    mount_body(&server, set_ok("IPHost")).await;

    client.delete::<IpHost>("web1").await.unwrap();

    let body = last_request_body(&server).await;
    assert!(body.contains("<Remove>"));
    assert!(body.contains("<Name>web1</Name>"));
    assert!(!body.contains("<IPAddress>"));
}

// ── Failure classes ─────────────────────────────────────────────────

#[tokio::test]
async fn test_login_failure_fails_every_operation() {
    let (server, client) = setup().await;
    mount_body(&server, LOGIN_FAILED.to_owned()).await;

    let create = client.create(&web1()).await;
    let read = client.read::<IpHost>("web1").await;
    let update = client.update(&web1()).await;
    let delete = client.delete::<IpHost>("web1").await;

    assert!(matches!(create, Err(Error::Authentication { .. })), "{create:?}");
    assert!(matches!(read, Err(Error::Authentication { .. })), "{read:?}");
    assert!(matches!(update, Err(Error::Authentication { .. })), "{update:?}");
    assert!(matches!(delete, Err(Error::Authentication { .. })), "{delete:?}");
}

#[tokio::test]
async fn test_error_element_is_application_failure() {
    let (server, client) = setup().await;
    mount_body(
        &server,
        response(r#"<Error code="529">Input request file is Invalid</Error>"#),
    )
    .await;

    let err = client.delete::<IpHost>("web1").await.unwrap_err();
    assert!(err.is_application());
    assert_eq!(err.remote_code(), Some("529"));
}

#[tokio::test]
async fn test_empty_body_is_transport_failure() {
    let (server, client) = setup().await;
    mount_body(&server, String::new()).await;

    let err = client.create(&web1()).await.unwrap_err();
    assert!(matches!(err, Error::EmptyResponse), "{err:?}");
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_garbage_body_keeps_raw_text() {
    let (server, client) = setup().await;
    mount_body(&server, "<html>maintenance</htm".to_owned()).await;

    let err = client.read::<IpHost>("web1").await.unwrap_err();
    match err {
        Error::Deserialization { body, .. } => assert!(body.contains("maintenance")),
        other => panic!("expected Deserialization, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_http_error_status() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path(CONTROLLER))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = client.read::<IpHost>("web1").await.unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 502, .. }), "{err:?}");
    assert!(err.is_transport());
}

// ── Bulk ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_many_requires_every_status_ok() {
    let (server, client) = setup().await;
    mount_body(
        &server,
        response(
            r#"<IPHost transactionid=""><Status code="200">Configuration applied successfully.</Status></IPHost>
               <IPHost transactionid=""><Status code="502">Entity having same name already exists.</Status></IPHost>"#,
        ),
    )
    .await;

    let mut second = web1();
    second.name = "web2".into();
    let err = client.create_many(&[web1(), second]).await.unwrap_err();
    assert_eq!(err.remote_code(), Some("502"));

    let body = last_request_body(&server).await;
    assert_eq!(body.matches("<IPHost ").count(), 2);
}

// ── curl transport ──────────────────────────────────────────────────

#[cfg(unix)]
mod curl {
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    use pretty_assertions::assert_eq;
    use secrecy::SecretString;
    use url::Url;

    use sfos_api::{ApiClient, Credentials, CurlTransport, Error, IpHost, TransportConfig};

    // Shell prologue shared by the stand-ins: picks the `-F` request file
    // and the `-o` response file out of the arguments and records both paths.
    fn record_paths(dir: &Path) -> String {
        format!(
            r#"#!/bin/sh
out=""
req=""
while [ $# -gt 0 ]; do
  case "$1" in
    -o) out="$2"; shift ;;
    -F) req="${{2#reqxml=<}}"; shift ;;
  esac
  shift
done
printf '%s' "$req" > "{dir}/request-path"
printf '%s' "$out" > "{dir}/response-path"
"#,
            dir = dir.display()
        )
    }

    fn write_script(path: PathBuf, body: &str) -> PathBuf {
        std::fs::write(&path, body).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    // Stands in for curl: copies the request aside and writes a canned
    // response to the `-o` target.
    fn fake_curl(dir: &Path, response: &str) -> PathBuf {
        let body = format!(
            "{prologue}cp \"$req\" \"{dir}/request-copy\"\ncat > \"$out\" <<'XML'\n{response}\nXML\n",
            prologue = record_paths(dir),
            dir = dir.display()
        );
        write_script(dir.join("fake-curl"), &body)
    }

    // Leaves a partial response behind, then fails like an unreachable host.
    fn failing_curl(dir: &Path) -> PathBuf {
        let body = format!(
            "{prologue}printf '<Resp' > \"$out\"\necho 'curl: (7) Failed to connect' >&2\nexit 7\n",
            prologue = record_paths(dir)
        );
        write_script(dir.join("failing-curl"), &body)
    }

    fn assert_staging_files_removed(dir: &Path) {
        for record in ["request-path", "response-path"] {
            let staged = std::fs::read_to_string(dir.join(record)).unwrap();
            assert!(!staged.is_empty(), "{record} was not recorded");
            assert!(!Path::new(&staged).exists(), "{staged} left behind");
        }
    }

    fn client_with(program: &Path) -> ApiClient<CurlTransport> {
        let endpoint = Url::parse("https://fw.example:4444").unwrap();
        let transport = CurlTransport::new(&endpoint, &TransportConfig::default())
            .unwrap()
            .with_program(program);
        let credentials = Credentials::new("admin", SecretString::from("s3cret".to_owned()));
        ApiClient::new(credentials, transport)
    }

    #[tokio::test]
    async fn test_curl_read_and_temp_file_cleanup() {
        let dir = tempfile::tempdir().unwrap();
        let program = fake_curl(
            dir.path(),
            r#"<Response><Login><status>Authentication Successful</status></Login>
<IPHost transactionid=""><Name>web1</Name><HostType>IP</HostType><IPAddress>10.1.1.1</IPAddress></IPHost>
</Response>"#,
        );
        let client = client_with(&program);

        let host: IpHost = client.read("web1").await.unwrap().unwrap();
        assert_eq!(host.ip_address, "10.1.1.1");

        let request_copy = std::fs::read_to_string(dir.path().join("request-copy")).unwrap();
        assert!(request_copy.contains("<Get>"));
        assert!(request_copy.contains("<Name>web1</Name>"));

        assert_staging_files_removed(dir.path());
    }

    #[tokio::test]
    async fn test_curl_failure_reports_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let client = client_with(&failing_curl(dir.path()));

        let err = client.delete::<IpHost>("web1").await.unwrap_err();
        match &err {
            Error::TransportCommand { message } => {
                assert!(message.contains("Failed to connect"), "{message}");
            }
            other => panic!("expected TransportCommand, got: {other:?}"),
        }
        assert!(err.is_transport());
        assert_staging_files_removed(dir.path());
    }
}
