// ── Firewall facade ──
//
// Create / read / update / delete per object kind, one round trip each.
// Values are validated before anything is sent; every failure leaves with
// the operation, kind and name attached.

use std::sync::Arc;

use tracing::debug;

use sfos_api::{ApiClient, Credentials, Resource, Transport};

use crate::config::FirewallConfig;
use crate::convert::WireModel;
use crate::error::CoreError;
use crate::model::common::require_name;
use crate::model::{FirewallRule, IpHost, IpHostGroup, MacHost};
use crate::transport::ConfiguredTransport;

/// Entry point for managing objects on one firewall.
///
/// Cheaply cloneable; clones share the underlying client. Calls made
/// concurrently on clones are independent requests.
pub struct Firewall<T: Transport = ConfiguredTransport> {
    client: Arc<ApiClient<T>>,
}

impl<T: Transport> Clone for Firewall<T> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl Firewall {
    /// Build the transport named in `config`. Does not contact the firewall.
    pub fn new(config: &FirewallConfig) -> Result<Self, CoreError> {
        let transport = ConfiguredTransport::from_config(config)?;
        debug!(url = %config.url, transport = %transport.kind(), "firewall client ready");
        let credentials = Credentials::new(config.username.clone(), config.password.clone());
        Ok(Self::with_transport(credentials, transport))
    }
}

impl<T: Transport> Firewall<T> {
    pub fn with_transport(credentials: Credentials, transport: T) -> Self {
        Self {
            client: Arc::new(ApiClient::new(credentials, transport)),
        }
    }

    pub fn client(&self) -> &ApiClient<T> {
        &self.client
    }

    // ── Generic operations ───────────────────────────────────────────

    async fn create<M: WireModel>(&self, value: &M) -> Result<(), CoreError> {
        let result: Result<(), CoreError> = async {
            value.validate()?;
            self.client.create(&value.to_wire()).await?;
            Ok(())
        }
        .await;
        result.map_err(|e| e.context("create", <M::Wire as Resource>::TAG, value.name()))
    }

    async fn create_many<M: WireModel>(&self, values: &[M]) -> Result<(), CoreError> {
        let result: Result<(), CoreError> = async {
            for value in values {
                value
                    .validate()
                    .map_err(|e| e.context("create", <M::Wire as Resource>::TAG, value.name()))?;
            }
            let wire: Vec<M::Wire> = values.iter().map(WireModel::to_wire).collect();
            self.client.create_many(&wire).await?;
            Ok(())
        }
        .await;
        result.map_err(|e| match e {
            CoreError::Operation { .. } => e,
            other => {
                let names = values.iter().map(WireModel::name).collect::<Vec<_>>();
                other.context("create", <M::Wire as Resource>::TAG, &names.join(", "))
            }
        })
    }

    async fn read<M: WireModel>(&self, name: &str) -> Result<Option<M>, CoreError> {
        let result: Result<Option<M>, CoreError> = async {
            require_name(<M::Wire as Resource>::TAG, name)?;
            let wire = self.client.read::<M::Wire>(name).await?;
            wire.map(M::from_wire).transpose()
        }
        .await;
        result.map_err(|e| e.context("read", <M::Wire as Resource>::TAG, name))
    }

    async fn lookup<M: WireModel>(&self, name: &str) -> Result<M, CoreError> {
        self.read::<M>(name).await?.ok_or_else(|| {
            CoreError::NotFound {
                kind: <M::Wire as Resource>::TAG.to_owned(),
                name: name.to_owned(),
            }
            .context("lookup", <M::Wire as Resource>::TAG, name)
        })
    }

    async fn update<M: WireModel>(&self, value: &M) -> Result<(), CoreError> {
        let result: Result<(), CoreError> = async {
            value.validate()?;
            self.client.update(&value.to_wire()).await?;
            Ok(())
        }
        .await;
        result.map_err(|e| e.context("update", <M::Wire as Resource>::TAG, value.name()))
    }

    async fn delete<M: WireModel>(&self, name: &str) -> Result<(), CoreError> {
        let result: Result<(), CoreError> = async {
            require_name(<M::Wire as Resource>::TAG, name)?;
            self.client.delete::<M::Wire>(name).await?;
            Ok(())
        }
        .await;
        result.map_err(|e| e.context("delete", <M::Wire as Resource>::TAG, name))
    }

    // ── IP hosts ─────────────────────────────────────────────────────

    pub async fn create_ip_host(&self, host: &IpHost) -> Result<(), CoreError> {
        self.create(host).await
    }

    /// `Ok(None)` when no host has exactly this name.
    pub async fn read_ip_host(&self, name: &str) -> Result<Option<IpHost>, CoreError> {
        self.read(name).await
    }

    /// Like [`read_ip_host`](Self::read_ip_host), but absence is an error.
    pub async fn lookup_ip_host(&self, name: &str) -> Result<IpHost, CoreError> {
        self.lookup(name).await
    }

    /// Create several hosts in one request. Nothing is sent if any host
    /// fails validation.
    pub async fn create_ip_hosts(&self, hosts: &[IpHost]) -> Result<(), CoreError> {
        self.create_many(hosts).await
    }

    pub async fn update_ip_host(&self, host: &IpHost) -> Result<(), CoreError> {
        self.update(host).await
    }

    pub async fn delete_ip_host(&self, name: &str) -> Result<(), CoreError> {
        self.delete::<IpHost>(name).await
    }

    // ── IP host groups ───────────────────────────────────────────────

    pub async fn create_ip_host_group(&self, group: &IpHostGroup) -> Result<(), CoreError> {
        self.create(group).await
    }

    pub async fn read_ip_host_group(&self, name: &str) -> Result<Option<IpHostGroup>, CoreError> {
        self.read(name).await
    }

    pub async fn lookup_ip_host_group(&self, name: &str) -> Result<IpHostGroup, CoreError> {
        self.lookup(name).await
    }

    pub async fn update_ip_host_group(&self, group: &IpHostGroup) -> Result<(), CoreError> {
        self.update(group).await
    }

    pub async fn delete_ip_host_group(&self, name: &str) -> Result<(), CoreError> {
        self.delete::<IpHostGroup>(name).await
    }

    // ── MAC hosts ────────────────────────────────────────────────────

    pub async fn create_mac_host(&self, host: &MacHost) -> Result<(), CoreError> {
        self.create(host).await
    }

    pub async fn read_mac_host(&self, name: &str) -> Result<Option<MacHost>, CoreError> {
        self.read(name).await
    }

    pub async fn lookup_mac_host(&self, name: &str) -> Result<MacHost, CoreError> {
        self.lookup(name).await
    }

    pub async fn update_mac_host(&self, host: &MacHost) -> Result<(), CoreError> {
        self.update(host).await
    }

    pub async fn delete_mac_host(&self, name: &str) -> Result<(), CoreError> {
        self.delete::<MacHost>(name).await
    }

    // ── Firewall rules ───────────────────────────────────────────────

    pub async fn create_firewall_rule(&self, rule: &FirewallRule) -> Result<(), CoreError> {
        self.create(rule).await
    }

    /// Create several rules in one request. Nothing is sent if any rule
    /// fails validation; the call fails if any rule is refused.
    pub async fn create_firewall_rules(&self, rules: &[FirewallRule]) -> Result<(), CoreError> {
        self.create_many(rules).await
    }

    pub async fn read_firewall_rule(&self, name: &str) -> Result<Option<FirewallRule>, CoreError> {
        self.read(name).await
    }

    pub async fn lookup_firewall_rule(&self, name: &str) -> Result<FirewallRule, CoreError> {
        self.lookup(name).await
    }

    pub async fn update_firewall_rule(&self, rule: &FirewallRule) -> Result<(), CoreError> {
        self.update(rule).await
    }

    pub async fn delete_firewall_rule(&self, name: &str) -> Result<(), CoreError> {
        self.delete::<FirewallRule>(name).await
    }
}
