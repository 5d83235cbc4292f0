// XML API client
//
// Composes the envelope codec, a resource adapter and a transport into the
// four generic operations. Each call is exactly one round trip. Login is
// checked before anything else in the response is trusted.

use tracing::{debug, trace, warn};

use crate::envelope::{Credentials, Envelope, RequestBody, SetOperation, encode_request};
use crate::error::Error;
use crate::resources::Resource;
use crate::transport::{HttpTransport, Transport};
use crate::xml::XmlNode;

/// Client for the firewall's XML API, generic over how requests travel.
///
/// The credentials are embedded in every request; the API has no session.
pub struct ApiClient<T: Transport = HttpTransport> {
    transport: T,
    credentials: Credentials,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(credentials: Credentials, transport: T) -> Self {
        Self {
            transport,
            credentials,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn username(&self) -> &str {
        &self.credentials.username
    }

    // ── Request helper ───────────────────────────────────────────────

    /// Encode, submit and decode one request, then gate on login and the
    /// envelope-level `<Error>`. Status blocks are left to the caller.
    async fn execute(&self, kind: &str, body: RequestBody) -> Result<Envelope, Error> {
        let payload = encode_request(&self.credentials, &body)?;

        debug!(verb = body.verb(), kind, "sending request");
        if tracing::enabled!(tracing::Level::TRACE) {
            let redacted = encode_request(&self.credentials.redacted(), &body)?;
            trace!(request = %String::from_utf8_lossy(&redacted), "request body");
        }

        let response = self.transport.submit(payload).await?;
        trace!(response = %String::from_utf8_lossy(&response), "response body");

        let envelope = Envelope::decode(&response, kind)?;
        debug!(
            bytes = response.len(),
            kind,
            api_version = envelope.api_version.as_deref().unwrap_or("unknown"),
            "received response"
        );
        envelope.check_login()?;
        envelope.check_error()?;
        Ok(envelope)
    }

    async fn set(
        &self,
        kind: &str,
        operation: SetOperation,
        entities: Vec<XmlNode>,
    ) -> Result<(), Error> {
        let envelope = self
            .execute(kind, RequestBody::Set { operation, entities })
            .await?;
        envelope.check_status()
    }

    // ── Operations ───────────────────────────────────────────────────

    /// `Set operation="add"` for one entity.
    pub async fn create<R: Resource>(&self, resource: &R) -> Result<(), Error> {
        debug!(kind = R::TAG, name = resource.name(), "create");
        self.set(R::TAG, SetOperation::Add, vec![resource.to_node()])
            .await
    }

    /// `Set operation="add"` for several entities in one request.
    ///
    /// Succeeds only if every returned status block is 200.
    pub async fn create_many<R: Resource>(&self, resources: &[R]) -> Result<(), Error> {
        debug!(kind = R::TAG, count = resources.len(), "create many");
        let entities = resources.iter().map(R::to_node).collect();
        self.set(R::TAG, SetOperation::Add, entities).await
    }

    /// Fetch the entity named exactly `name` (case-sensitive).
    ///
    /// Returns `Ok(None)` when the firewall holds no such entity.
    pub async fn read<R: Resource>(&self, name: &str) -> Result<Option<R>, Error> {
        debug!(kind = R::TAG, name, "read");
        let envelope = self
            .execute(
                R::TAG,
                RequestBody::Get {
                    filter: R::key_node(name),
                },
            )
            .await?;

        let entities: Vec<R> = envelope.entities.iter().map(R::from_node).collect();
        // Placeholder elements without a name (e.g. a "no records" status) are not entities.
        let skipped = entities
            .iter()
            .filter(|r| !r.name().is_empty() && r.name() != name)
            .count();
        if skipped > 0 {
            warn!(
                kind = R::TAG,
                name, skipped, "response contained entities with other names"
            );
        }

        // A nameless placeholder never matches, not even an empty lookup name.
        let found = entities
            .into_iter()
            .find(|r| !r.name().is_empty() && r.name() == name);
        Ok(found.map(|mut r| {
            r.normalize();
            r
        }))
    }

    /// `Set operation="update"` with the full entity.
    ///
    /// Any `transactionid` carried over from a previous read is cleared first.
    pub async fn update<R: Resource>(&self, resource: &R) -> Result<(), Error> {
        debug!(kind = R::TAG, name = resource.name(), "update");
        let mut resource = resource.clone();
        resource.clear_transaction_id();
        self.set(R::TAG, SetOperation::Update, vec![resource.to_node()])
            .await
    }

    /// `Remove` by name. Only login and the `<Error>` element are checked.
    pub async fn delete<R: Resource>(&self, name: &str) -> Result<(), Error> {
        debug!(kind = R::TAG, name, "delete");
        self.execute(
            R::TAG,
            RequestBody::Remove {
                key: R::key_node(name),
            },
        )
        .await?;
        Ok(())
    }
}
