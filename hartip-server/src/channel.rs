//! HART interface channel objects
//!
//! A [`HartChannel`] represents one of the 16 physical interface
//! channels, numbered by instance identifier (channel N is instance
//! N + 1). The channel owns no field data; its dynamic-variable fields
//! live in a companion data object in the shared registry, created
//! lazily on first access.
//!
//! Dispatch contract: every request that reaches execution produces
//! exactly one well-formed reply. The reply service code and a non-zero
//! default status are set before the service body runs, so a failure at
//! any point still encodes as a valid two-byte error reply.

use crate::fallback::{DefaultFallback, FallbackHandler};
use crate::router::{NullRouter, Router};
use hartip_application::fields::READ_VAR_FIELDS;
use hartip_application::parse::parse_embedded;
use hartip_application::produce::encode_reply;
use hartip_application::service::{self, ServiceTable};
use hartip_core::{HartError, HartResult, Record, TagName, Value, keys, status};
use hartip_object::{DATA_CLASS_ID, Registry};
use std::fmt;
use std::sync::Arc;

/// Class identifier of the HART interface object
pub const CHANNEL_CLASS_ID: u16 = 0x35D;

/// One HART interface channel
///
/// Instance identifiers run 1..=16 for a 16-channel interface module;
/// staying in range is the caller's responsibility, the channel and the
/// registry accept any instance number.
pub struct HartChannel {
    name: String,
    instance_id: u32,
    registry: Arc<Registry>,
    services: ServiceTable,
    router: Arc<dyn Router>,
    fallback: Arc<dyn FallbackHandler>,
}

impl HartChannel {
    /// Create a channel with no routing and the default fallback
    pub fn new(
        name: impl Into<String>,
        instance_id: u32,
        registry: Arc<Registry>,
    ) -> HartResult<Self> {
        Self::with_collaborators(
            name,
            instance_id,
            registry,
            Arc::new(NullRouter),
            Arc::new(DefaultFallback),
        )
    }

    /// Create a channel with explicit routing and fallback collaborators
    pub fn with_collaborators(
        name: impl Into<String>,
        instance_id: u32,
        registry: Arc<Registry>,
        router: Arc<dyn Router>,
        fallback: Arc<dyn FallbackHandler>,
    ) -> HartResult<Self> {
        debug_assert!(instance_id >= 1, "channel instances are numbered from 1");
        Ok(Self {
            name: name.into(),
            instance_id,
            registry,
            services: ServiceTable::new()?,
            router,
            fallback,
        })
    }

    pub fn instance_id(&self) -> u32 {
        self.instance_id
    }

    /// Zero-based channel number (instance identifier minus one)
    pub fn channel_number(&self) -> u32 {
        self.instance_id.saturating_sub(1)
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Handle one request record and store the encoded reply in `input`
    ///
    /// Returns whether dispatch succeeded, not whether the service
    /// succeeded; a service failure is reported through the reply's
    /// status byte. The only fatal outcomes are a malformed embedded
    /// request and an internal invariant violation.
    pub async fn request(&self, record: &mut Record) -> HartResult<bool> {
        // Unconnected Send: act as our own connection manager, parse the
        // embedded request and execute it against this object. A parse
        // failure here is fatal for the whole request; the transport
        // layer owns the resulting protocol error.
        if record.usint(keys::SERVICE) == Some(service::UC_SND_REQ) {
            if let Err(err) = parse_embedded(&self.services, record) {
                log::error!("{} failed to parse embedded request: {err}", self.name);
                return Err(err);
            }
            let Some(Value::Record(mut embedded)) = record.remove(keys::REQUEST) else {
                return Err(HartError::FieldMissing(keys::REQUEST.to_string()));
            };
            log::debug!("{} executing embedded request: {embedded}", self.name);
            let result = self.dispatch(&mut embedded).await;
            record.insert(keys::REQUEST, Value::Record(embedded));
            return result;
        }

        self.dispatch(record).await
    }

    async fn dispatch(&self, record: &mut Record) -> HartResult<bool> {
        // Not for us? Forward to the resolved target and return its
        // result unchanged. A resolution miss is swallowed so the
        // service logic below can answer with a proper status.
        if let Some(target) = self.router.route(record).await {
            log::debug!("{} routing request onward: {record}", self.name);
            return target.request(record).await;
        }

        let Some(entry) = self.services.infer(record) else {
            return self.fallback.request(record).await;
        };
        let code = entry.code;
        let service_name = entry.name;
        let recognized = record.usint(keys::SERVICE);
        if recognized == Some(entry.reply_code) || !entry.executable() {
            if recognized.is_none() {
                record.insert(keys::SERVICE, Value::Usint(code));
            }
            return self.fallback.request(record).await;
        }
        if recognized.is_none() {
            record.insert(keys::SERVICE, Value::Usint(code));
        }

        log::debug!("{} request: {record}", self.name);

        // Beyond this point a reply is always produced. The reply code
        // and a non-zero status go in before execution, so an error at
        // any point leaves a well-formed failure reply, never an
        // undefined status.
        record.insert(keys::SERVICE, Value::Usint(code | service::REPLY_BIT));
        record.insert(keys::STATUS, Value::Usint(status::SERVICE_UNSUPPORTED));

        let outcome = match code {
            service::RD_VAR_REQ => self.execute_read_var(record).await,
            other => Err(HartError::Internal(format!(
                "service 0x{other:02X} registered as executable but has no body"
            ))),
        };

        if let Err(err) = outcome {
            let current = record.usint(keys::STATUS).unwrap_or(status::SUCCESS);
            debug_assert_ne!(
                current,
                status::SUCCESS,
                "a non-zero status must be set before any fallible operation"
            );
            if current == status::SUCCESS {
                return Err(HartError::Internal(format!(
                    "service 0x{:02X} {} failed with a success status still set: {err}",
                    code | service::REPLY_BIT,
                    service_name
                )));
            }
            log::error!(
                "{} service 0x{:02X} {} failed: {err}\nrequest: {record}",
                self.name,
                code | service::REPLY_BIT,
                service_name
            );
        }

        let bytes = self.produce(record)?;
        record.insert(keys::INPUT, Value::Bytes(bytes));
        log::debug!(
            "{} response: service 0x{:02X} {} {record}",
            self.name,
            record.usint(keys::SERVICE).unwrap_or(0),
            service_name
        );
        Ok(true)
    }

    /// Read Dynamic Variable body
    ///
    /// Resolves each payload field's symbolic tag against the registry,
    /// creating the channel's data object and attributes on first
    /// access, and copies the current values into the `read_var`
    /// sub-record. The status flips to success only after all fields
    /// are in.
    async fn execute_read_var(&self, record: &mut Record) -> HartResult<()> {
        record.insert(service::RD_VAR_CTX, Value::Record(Record::new()));
        for field in READ_VAR_FIELDS.iter() {
            let tag = TagName::new(self.instance_id, field.name);
            let key = self
                .registry
                .resolve_or_create(
                    &tag.to_string(),
                    DATA_CLASS_ID,
                    self.instance_id,
                    field.kind,
                    field.default.clone(),
                )
                .await?;
            let attribute = self.registry.lookup(key).await.ok_or_else(|| {
                HartError::Internal(format!(
                    "tag {tag} resolved to {key} but no attribute exists there"
                ))
            })?;
            let value = attribute.read(0).await?;
            log::debug!("{} <-- {key} == {value}", field.name);
            record.insert_path(&format!("{}.{}", service::RD_VAR_CTX, field.name), value);
        }
        record.insert(keys::STATUS, Value::Usint(status::SUCCESS));
        Ok(())
    }

    /// Encode a record to bytes, delegating unknown shapes to the
    /// fallback encoder
    pub fn produce(&self, record: &mut Record) -> HartResult<Vec<u8>> {
        match encode_reply(record) {
            Err(HartError::UnknownService(_)) => self.fallback.produce(record),
            other => other,
        }
    }
}

impl fmt::Display for HartChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (0x{:04X}/{})",
            self.name, CHANNEL_CLASS_ID, self.instance_id
        )
    }
}
