//! Service grammars and embedded-request parsing
//!
//! Two grammars exist per implemented service: the request shape and the
//! reply shape. The reply grammar encodes the "payload follows only on
//! success" rule as a branch on the just-decoded status byte, so failure
//! replies consume exactly two bytes no matter what trails them.

use crate::fields::READ_VAR_FIELDS;
use crate::service::{RD_VAR_CTX, ServiceTable};
use hartip_codec::{Grammar, Next, Op, ScalarKind, Source, State};
use hartip_core::{HartError, HartResult, Record, keys};

/// Read Dynamic Variable request: one service-code byte
///
/// Marks the record with the `read_var` context tag so a record parsed
/// from a bare request is recognizable before any reply fields exist.
pub fn read_var_request() -> HartResult<Grammar> {
    Grammar::new(
        "read_var_request",
        vec![
            State {
                op: Op::Consume {
                    kind: ScalarKind::Usint,
                    path: keys::SERVICE.to_string(),
                },
                next: Next::To(1),
            },
            State {
                op: Op::Mark {
                    path: RD_VAR_CTX.to_string(),
                },
                next: Next::Terminal,
            },
        ],
    )
}

/// Read Dynamic Variable reply: service, status, then the payload iff
/// the status is zero
pub fn read_var_reply() -> HartResult<Grammar> {
    // States 0..=2 are the fixed prefix; payload fields start at 3.
    let mut states = vec![
        State {
            op: Op::Consume {
                kind: ScalarKind::Usint,
                path: keys::SERVICE.to_string(),
            },
            next: Next::To(1),
        },
        State {
            op: Op::Consume {
                kind: ScalarKind::Usint,
                path: keys::STATUS.to_string(),
            },
            next: Next::Branch {
                field: keys::STATUS.to_string(),
                equals: 0x00,
                then: 3,
                otherwise: 2,
            },
        },
        State {
            op: Op::Mark {
                path: RD_VAR_CTX.to_string(),
            },
            next: Next::Terminal,
        },
    ];
    let last = READ_VAR_FIELDS.len() - 1;
    for (i, field) in READ_VAR_FIELDS.iter().enumerate() {
        states.push(State {
            op: Op::Consume {
                kind: field.kind,
                path: format!("{}.{}", RD_VAR_CTX, field.name),
            },
            next: if i == last {
                Next::Terminal
            } else {
                Next::To(4 + i)
            },
        });
    }
    Grammar::new("read_var_reply", states)
}

/// Parse the embedded request of an Unconnected Send record
///
/// The raw bytes under `request.input` are run through the grammar
/// selected by their leading service code, populating the `request`
/// sub-record in place. Any failure is fatal for the request: the error
/// carries a diagnostic with the consumed-byte offset and a dump of the
/// consumed and pending bytes, and is logged here before propagating.
pub fn parse_embedded(table: &ServiceTable, record: &mut Record) -> HartResult<()> {
    let path = format!("{}.{}", keys::REQUEST, keys::INPUT);
    let bytes: Vec<u8> = record
        .get_path(&path)
        .and_then(|value| value.as_bytes())
        .map(<[u8]>::to_vec)
        .ok_or_else(|| HartError::FieldMissing(path))?;

    let mut source = Source::new(&bytes);
    let result = run_embedded(table, &mut source, record);
    if let Err(err) = &result {
        log::error!("embedded request parse failed: {err}");
    }
    result
}

fn run_embedded(
    table: &ServiceTable,
    source: &mut Source<'_>,
    record: &mut Record,
) -> HartResult<()> {
    let code = source.peek().ok_or_else(|| {
        HartError::Decode(format!("embedded request is empty\n{}", source.context()))
    })?;
    let entry = table.by_code(code).ok_or_else(|| {
        HartError::Decode(format!(
            "no grammar for embedded service 0x{code:02X}\n{}",
            source.context()
        ))
    })?;
    let grammar = if code == entry.code {
        entry.request.as_ref()
    } else {
        entry.reply.as_ref()
    }
    .ok_or_else(|| {
        HartError::Decode(format!(
            "no grammar for embedded service 0x{code:02X}\n{}",
            source.context()
        ))
    })?;

    let embedded = record
        .record_mut(keys::REQUEST)
        .ok_or_else(|| HartError::FieldMissing(keys::REQUEST.to_string()))?;
    grammar.run(source, embedded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{RD_VAR_REQ, RD_VAR_RPY};
    use hartip_core::Value;

    fn reply_bytes(status: u8, payload: &[u8]) -> Vec<u8> {
        let mut bytes = vec![RD_VAR_RPY, status];
        bytes.extend_from_slice(payload);
        bytes
    }

    #[test]
    fn test_request_grammar_marks_context() {
        let grammar = read_var_request().unwrap();
        let bytes = [RD_VAR_REQ];
        let mut source = Source::new(&bytes);
        let mut record = Record::new();

        grammar.run(&mut source, &mut record).unwrap();
        assert_eq!(record.usint(keys::SERVICE), Some(RD_VAR_REQ));
        assert!(record.contains(RD_VAR_CTX));
        assert_eq!(source.consumed(), 1);
    }

    #[test]
    fn test_reply_grammar_success_consumes_full_payload() {
        let grammar = read_var_reply().unwrap();
        let mut payload = Vec::new();
        for field in READ_VAR_FIELDS.iter() {
            match field.kind {
                ScalarKind::Usint => payload.push(7),
                ScalarKind::Real => payload.extend_from_slice(&2.5f32.to_le_bytes()),
            }
        }
        let bytes = reply_bytes(0x00, &payload);
        assert_eq!(bytes.len(), 37);

        let mut source = Source::new(&bytes);
        let mut record = Record::new();
        grammar.run(&mut source, &mut record).unwrap();

        assert_eq!(source.consumed(), 37);
        assert_eq!(record.get_path("read_var.PV").unwrap().as_real(), Some(2.5));
        assert_eq!(
            record.get_path("read_var.FV_status").unwrap().as_usint(),
            Some(7)
        );
        assert_eq!(record.record(RD_VAR_CTX).unwrap().len(), 20);
    }

    #[test]
    fn test_reply_grammar_failure_stops_at_two_bytes() {
        let grammar = read_var_reply().unwrap();
        // Trailing garbage must not be consumed on a failure reply.
        let bytes = reply_bytes(0x08, &[0xDE, 0xAD, 0xBE, 0xEF]);

        let mut source = Source::new(&bytes);
        let mut record = Record::new();
        grammar.run(&mut source, &mut record).unwrap();

        assert_eq!(source.consumed(), 2);
        assert_eq!(record.usint(keys::STATUS), Some(0x08));
        assert!(record.record(RD_VAR_CTX).unwrap().is_empty());
    }

    #[test]
    fn test_parse_embedded_populates_request() {
        let table = ServiceTable::new().unwrap();
        let mut record = Record::new();
        record.insert_path(
            "request.input",
            Value::Bytes(vec![RD_VAR_REQ]),
        );

        parse_embedded(&table, &mut record).unwrap();
        let embedded = record.record(keys::REQUEST).unwrap();
        assert_eq!(embedded.usint(keys::SERVICE), Some(RD_VAR_REQ));
        assert!(embedded.contains(RD_VAR_CTX));
    }

    #[test]
    fn test_parse_embedded_truncated_reports_offset() {
        let table = ServiceTable::new().unwrap();
        let mut record = Record::new();
        // Success reply truncated in the middle of the first REAL field.
        record.insert_path(
            "request.input",
            Value::Bytes(vec![RD_VAR_RPY, 0x00, 0x01, 0x02, 0x03, 0x00, 0x00]),
        );

        let err = parse_embedded(&table, &mut record).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("PV"));
        assert!(message.contains("at 5 total bytes"));
    }

    #[test]
    fn test_parse_embedded_empty_and_unknown() {
        let table = ServiceTable::new().unwrap();

        let mut record = Record::new();
        record.insert_path("request.input", Value::Bytes(Vec::new()));
        assert!(parse_embedded(&table, &mut record).is_err());

        let mut record = Record::new();
        record.insert_path("request.input", Value::Bytes(vec![0xEE]));
        let err = parse_embedded(&table, &mut record).unwrap_err();
        assert!(err.to_string().contains("0xEE"));
    }
}
