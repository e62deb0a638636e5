//! Reply encoding
//!
//! The encoder mirrors the grammar structure exactly: service code, then
//! status, then the payload only when the status is zero, in descriptor
//! order. The service/status prefix is never omitted and a non-zero
//! status never carries payload bytes; the byte layout is a contract
//! with the client.

use crate::fields::READ_VAR_FIELDS;
use crate::service::{RD_VAR_CTX, RD_VAR_REQ, RD_VAR_RPY};
use hartip_codec::CipEncoder;
use hartip_core::{HartError, HartResult, Record, Value, keys, status};

/// Encode a record to its request- or reply-shape bytes
///
/// A record without a `service` field but carrying the `read_var`
/// context is treated as a request and gets its `service` defaulted.
/// Reply payload fields absent from the `read_var` sub-record fall back
/// to the descriptor default.
///
/// # Errors
/// Returns `UnknownService` for shapes not encoded here, so the caller
/// can delegate to its fallback encoder. Returns `FieldMissing` for a
/// reply record lacking a status.
pub fn encode_reply(record: &mut Record) -> HartResult<Vec<u8>> {
    let service = record.usint(keys::SERVICE);

    if service == Some(RD_VAR_REQ) || (service.is_none() && record.contains(RD_VAR_CTX)) {
        if service.is_none() {
            record.insert(keys::SERVICE, Value::Usint(RD_VAR_REQ));
        }
        let mut encoder = CipEncoder::new();
        encoder.encode_u8(RD_VAR_REQ);
        return Ok(encoder.into_bytes());
    }

    if service == Some(RD_VAR_RPY) {
        let reply_status = record
            .usint(keys::STATUS)
            .ok_or_else(|| HartError::FieldMissing(keys::STATUS.to_string()))?;
        let mut encoder = CipEncoder::new();
        encoder.encode_u8(RD_VAR_RPY);
        encoder.encode_u8(reply_status);
        if reply_status == status::SUCCESS {
            let read_var = record.record(RD_VAR_CTX);
            for field in READ_VAR_FIELDS.iter() {
                let value = read_var
                    .and_then(|sub| sub.get(field.name))
                    .cloned()
                    .unwrap_or_else(|| field.default.clone());
                encoder.encode_value(field.kind, &value)?;
            }
        }
        return Ok(encoder.into_bytes());
    }

    Err(HartError::UnknownService(service.unwrap_or(0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::read_var_reply;
    use hartip_codec::Source;

    #[test]
    fn test_request_shape_is_one_byte() {
        let mut record = Record::new();
        record.insert(keys::SERVICE, Value::Usint(RD_VAR_REQ));
        assert_eq!(encode_reply(&mut record).unwrap(), vec![RD_VAR_REQ]);
    }

    #[test]
    fn test_context_only_record_defaults_to_request() {
        let mut record = Record::new();
        record.insert(RD_VAR_CTX, Value::Record(Record::new()));

        assert_eq!(encode_reply(&mut record).unwrap(), vec![RD_VAR_REQ]);
        // The defaulted service code is kept on the record.
        assert_eq!(record.usint(keys::SERVICE), Some(RD_VAR_REQ));
    }

    #[test]
    fn test_failure_reply_is_exactly_two_bytes() {
        let mut record = Record::new();
        record.insert(keys::SERVICE, Value::Usint(RD_VAR_RPY));
        record.insert(keys::STATUS, Value::Usint(status::SERVICE_UNSUPPORTED));
        // A populated payload must not leak into a failure reply.
        record.insert_path("read_var.PV", Value::Real(99.0));

        let bytes = encode_reply(&mut record).unwrap();
        assert_eq!(bytes, vec![RD_VAR_RPY, status::SERVICE_UNSUPPORTED]);
    }

    #[test]
    fn test_success_reply_fills_missing_fields_with_defaults() {
        let mut record = Record::new();
        record.insert(keys::SERVICE, Value::Usint(RD_VAR_RPY));
        record.insert(keys::STATUS, Value::Usint(status::SUCCESS));
        record.insert_path("read_var.PV", Value::Real(3.5));

        let bytes = encode_reply(&mut record).unwrap();
        assert_eq!(bytes.len(), 37);
        assert_eq!(bytes[0], RD_VAR_RPY);
        assert_eq!(bytes[1], status::SUCCESS);
        // PV sits after the three one-byte status fields.
        assert_eq!(&bytes[5..9], &3.5f32.to_le_bytes());
        // SV was absent and encodes as its default.
        assert_eq!(&bytes[9..13], &0.0f32.to_le_bytes());
    }

    #[test]
    fn test_encode_then_decode_round_trip() {
        let mut record = Record::new();
        record.insert(keys::SERVICE, Value::Usint(RD_VAR_RPY));
        record.insert(keys::STATUS, Value::Usint(status::SUCCESS));
        for (i, field) in READ_VAR_FIELDS.iter().enumerate() {
            let value = match field.kind {
                hartip_codec::ScalarKind::Usint => Value::Usint(i as u8),
                hartip_codec::ScalarKind::Real => Value::Real(i as f32 * 1.5 - 4.0),
            };
            record.insert_path(&format!("{}.{}", RD_VAR_CTX, field.name), value);
        }

        let bytes = encode_reply(&mut record).unwrap();
        let mut decoded = Record::new();
        read_var_reply()
            .unwrap()
            .run(&mut Source::new(&bytes), &mut decoded)
            .unwrap();

        assert_eq!(decoded.record(RD_VAR_CTX), record.record(RD_VAR_CTX));
        assert_eq!(decoded.usint(keys::SERVICE), Some(RD_VAR_RPY));
    }

    #[test]
    fn test_unknown_shape_is_delegated() {
        let mut record = Record::new();
        record.insert(keys::SERVICE, Value::Usint(0x4D));
        let err = encode_reply(&mut record).unwrap_err();
        assert!(matches!(err, HartError::UnknownService(0x4D)));
    }
}
