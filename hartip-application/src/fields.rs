//! Dynamic-variable payload layout
//!
//! The ordered field table of the Read Dynamic Variable reply payload.
//! Order is part of the wire contract; the scalar type of each default
//! is retained for all data written to the backing attribute.

use hartip_codec::ScalarKind;
use hartip_core::Value;

/// One payload field: wire type, tag field name, default value
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub kind: ScalarKind,
    pub name: &'static str,
    pub default: Value,
}

/// Read Dynamic Variable reply payload, in wire order
pub const READ_VAR_FIELDS: [FieldSpec; 20] = [
    FieldSpec { kind: ScalarKind::Usint, name: "HART_command_status", default: Value::Usint(0) },
    FieldSpec { kind: ScalarKind::Usint, name: "HART_fld_dev_status", default: Value::Usint(0) },
    FieldSpec { kind: ScalarKind::Usint, name: "HART_ext_dev_status", default: Value::Usint(0) },
    FieldSpec { kind: ScalarKind::Real, name: "PV", default: Value::Real(0.0) },
    FieldSpec { kind: ScalarKind::Real, name: "SV", default: Value::Real(0.0) },
    FieldSpec { kind: ScalarKind::Real, name: "TV", default: Value::Real(0.0) },
    FieldSpec { kind: ScalarKind::Real, name: "FV", default: Value::Real(0.0) },
    FieldSpec { kind: ScalarKind::Usint, name: "PV_units", default: Value::Usint(0) },
    FieldSpec { kind: ScalarKind::Usint, name: "SV_units", default: Value::Usint(0) },
    FieldSpec { kind: ScalarKind::Usint, name: "TV_units", default: Value::Usint(0) },
    FieldSpec { kind: ScalarKind::Usint, name: "FV_units", default: Value::Usint(0) },
    FieldSpec { kind: ScalarKind::Usint, name: "PV_assignment_code", default: Value::Usint(0) },
    FieldSpec { kind: ScalarKind::Usint, name: "SV_assignment_code", default: Value::Usint(0) },
    FieldSpec { kind: ScalarKind::Usint, name: "TV_assignment_code", default: Value::Usint(0) },
    FieldSpec { kind: ScalarKind::Usint, name: "FV_assignment_code", default: Value::Usint(0) },
    FieldSpec { kind: ScalarKind::Usint, name: "PV_status", default: Value::Usint(0) },
    FieldSpec { kind: ScalarKind::Usint, name: "SV_status", default: Value::Usint(0) },
    FieldSpec { kind: ScalarKind::Usint, name: "TV_status", default: Value::Usint(0) },
    FieldSpec { kind: ScalarKind::Usint, name: "FV_status", default: Value::Usint(0) },
    FieldSpec { kind: ScalarKind::Real, name: "loop_current", default: Value::Real(0.0) },
];

/// Total payload width in bytes (excluding service and status)
pub fn payload_len() -> usize {
    READ_VAR_FIELDS.iter().map(|f| f.kind.width()).sum()
}
