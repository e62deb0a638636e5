//! CIP scalar type codec
//!
//! CIP scalars are little-endian on the wire. Only the two types used by
//! the dynamic-variable payload are implemented: the one-byte unsigned
//! integer (USINT) and the four-byte IEEE-754 float (REAL).

use crate::source::Source;
use bytes::{BufMut, BytesMut};
use hartip_core::{HartError, HartResult, Value};
use std::fmt;

/// Fixed-width scalar type of a wire field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// One-byte unsigned integer
    Usint,
    /// Four-byte IEEE-754 float, little-endian
    Real,
}

impl ScalarKind {
    /// Encoded width in bytes
    pub const fn width(&self) -> usize {
        match self {
            ScalarKind::Usint => 1,
            ScalarKind::Real => 4,
        }
    }

    /// Whether `value` carries this scalar type
    pub fn matches(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (ScalarKind::Usint, Value::Usint(_)) | (ScalarKind::Real, Value::Real(_))
        )
    }

    /// Decode one value of this type from the source
    pub fn decode(&self, source: &mut Source<'_>) -> HartResult<Value> {
        match self {
            ScalarKind::Usint => Ok(Value::Usint(source.read_u8()?)),
            ScalarKind::Real => {
                let bytes = source.read_exact(4)?;
                Ok(Value::Real(f32::from_le_bytes([
                    bytes[0], bytes[1], bytes[2], bytes[3],
                ])))
            }
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarKind::Usint => write!(f, "USINT"),
            ScalarKind::Real => write!(f, "REAL"),
        }
    }
}

/// Encoder for CIP scalar values
pub struct CipEncoder {
    buffer: BytesMut,
}

impl CipEncoder {
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::new(),
        }
    }

    pub fn encode_u8(&mut self, value: u8) {
        self.buffer.put_u8(value);
    }

    pub fn encode_f32(&mut self, value: f32) {
        self.buffer.put_f32_le(value);
    }

    /// Encode `value` as the given scalar type
    pub fn encode_value(&mut self, kind: ScalarKind, value: &Value) -> HartResult<()> {
        match (kind, value) {
            (ScalarKind::Usint, Value::Usint(v)) => self.encode_u8(*v),
            (ScalarKind::Real, Value::Real(v)) => self.encode_f32(*v),
            _ => {
                return Err(HartError::TypeMismatch(format!(
                    "cannot encode {} value as {}",
                    value.kind_name(),
                    kind
                )));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer.freeze().to_vec()
    }
}

impl Default for CipEncoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_usint() {
        let mut encoder = CipEncoder::new();
        encoder.encode_u8(0xCB);
        assert_eq!(encoder.into_bytes(), vec![0xCB]);
    }

    #[test]
    fn test_encode_real_little_endian() {
        let mut encoder = CipEncoder::new();
        encoder.encode_f32(1.0);
        assert_eq!(encoder.into_bytes(), vec![0x00, 0x00, 0x80, 0x3F]);
    }

    #[test]
    fn test_decode_real_round_trip() {
        let mut encoder = CipEncoder::new();
        encoder.encode_f32(-42.5);
        let bytes = encoder.into_bytes();

        let mut source = Source::new(&bytes);
        let value = ScalarKind::Real.decode(&mut source).unwrap();
        assert_eq!(value, Value::Real(-42.5));
        assert_eq!(source.remaining(), 0);
    }

    #[test]
    fn test_decode_short_input() {
        let bytes = [0x00, 0x00];
        let mut source = Source::new(&bytes);
        assert!(ScalarKind::Real.decode(&mut source).is_err());
    }

    #[test]
    fn test_encode_value_type_mismatch() {
        let mut encoder = CipEncoder::new();
        let err = encoder
            .encode_value(ScalarKind::Real, &Value::Usint(1))
            .unwrap_err();
        assert!(matches!(err, HartError::TypeMismatch(_)));
    }
}
