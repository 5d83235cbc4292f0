// sfos-api: Async Rust client for the Sophos Firewall XML API.
//
// Builds `<Request>` envelopes, ships them through a pluggable transport,
// decodes the `<Response>` envelope and hands normalized wire entities back.

pub mod client;
pub mod envelope;
pub mod error;
pub mod resources;
pub mod transport;
pub mod xml;

pub use client::ApiClient;
pub use envelope::{Credentials, Envelope, RemoteStatus, RequestBody, SetOperation};
pub use error::Error;
pub use resources::{FirewallRule, IpHost, IpHostGroup, MacHost, NetworkPolicy, Resource};
pub use transport::{CurlTransport, HttpTransport, TlsMode, Transport, TransportConfig};
pub use xml::XmlNode;
