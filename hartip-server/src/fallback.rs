//! Fallback handling for unrecognized service codes
//!
//! Service codes outside the channel's own table are delegated to a
//! [`FallbackHandler`], which supplies both the execution and the
//! encoding for those shapes. The default handler answers every code
//! with a two-byte "service unsupported" reply.

use async_trait::async_trait;
use hartip_application::service::REPLY_BIT;
use hartip_core::{HartError, HartResult, Record, Value, keys, status};

/// Generic request execution and encoding for services not implemented
/// by the channel itself
#[async_trait]
pub trait FallbackHandler: Send + Sync {
    /// Execute the record and store its encoded reply under `input`
    async fn request(&self, record: &mut Record) -> HartResult<bool>;

    /// Encode a record whose shape the channel's own encoder rejected
    fn produce(&self, record: &Record) -> HartResult<Vec<u8>>;
}

/// Fallback that answers every service with status 0x08
pub struct DefaultFallback;

#[async_trait]
impl FallbackHandler for DefaultFallback {
    async fn request(&self, record: &mut Record) -> HartResult<bool> {
        let code = record
            .usint(keys::SERVICE)
            .ok_or_else(|| HartError::FieldMissing(keys::SERVICE.to_string()))?;
        record.insert(keys::SERVICE, Value::Usint(code | REPLY_BIT));
        record.insert(
            keys::STATUS,
            Value::Usint(status::SERVICE_UNSUPPORTED),
        );
        let bytes = self.produce(record)?;
        record.insert(keys::INPUT, Value::Bytes(bytes));
        Ok(true)
    }

    fn produce(&self, record: &Record) -> HartResult<Vec<u8>> {
        let code = record
            .usint(keys::SERVICE)
            .ok_or_else(|| HartError::FieldMissing(keys::SERVICE.to_string()))?;
        let reply_status = record
            .usint(keys::STATUS)
            .ok_or_else(|| HartError::FieldMissing(keys::STATUS.to_string()))?;
        Ok(vec![code, reply_status])
    }
}
