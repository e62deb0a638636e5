//! Message record types
//!
//! A [`Record`] is the mutable, insertion-ordered, nested key/value
//! structure that represents one in-flight request or reply as it moves
//! through decode, dispatch and encode. Scalar fields decoded off the
//! wire, sub-records for service payloads, and the final encoded reply
//! bytes all live in the same record under well-known keys.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Well-known record keys used by the dispatch pipeline
pub mod keys {
    /// One-byte service code; bit 0x80 set denotes a reply
    pub const SERVICE: &str = "service";
    /// One-byte error status; 0x00 is success
    pub const STATUS: &str = "status";
    /// Embedded, self-addressed request (Unconnected Send)
    pub const REQUEST: &str = "request";
    /// Raw encoded byte buffer
    pub const INPUT: &str = "input";
}

/// A single value held in a [`Record`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// One-byte unsigned integer
    Usint(u8),
    /// Four-byte IEEE-754 float
    Real(f32),
    /// Nested sub-record
    Record(Record),
    /// Raw byte buffer
    Bytes(#[serde(with = "serde_bytes")] Vec<u8>),
}

impl Value {
    pub fn as_usint(&self) -> Option<u8> {
        match self {
            Value::Usint(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_real(&self) -> Option<f32> {
        match self {
            Value::Real(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_record_mut(&mut self) -> Option<&mut Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Name of the variant, for diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Usint(_) => "Usint",
            Value::Real(_) => "Real",
            Value::Record(_) => "Record",
            Value::Bytes(_) => "Bytes",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Usint(v) => write!(f, "{}", v),
            Value::Real(v) => write!(f, "{}", v),
            Value::Record(r) => write!(f, "{}", r),
            Value::Bytes(b) => {
                write!(f, "[")?;
                for (i, byte) in b.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{:02X}", byte)?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Insertion-ordered, nested key/value record
///
/// Keys keep their first-insertion position; replacing a value does not
/// reorder it. Dotted paths (`"read_var.PV"`) address values in nested
/// sub-records, creating intermediate sub-records on insert.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    entries: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Insert or replace a value, preserving the key's original position
    pub fn insert(&mut self, key: &str, value: Value) {
        match self.entries.iter().position(|(k, _)| k == key) {
            Some(index) => self.entries[index].1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Get a one-byte unsigned value by key
    pub fn usint(&self, key: &str) -> Option<u8> {
        self.get(key).and_then(Value::as_usint)
    }

    /// Get a float value by key
    pub fn real(&self, key: &str) -> Option<f32> {
        self.get(key).and_then(Value::as_real)
    }

    /// Get a byte buffer by key
    pub fn bytes(&self, key: &str) -> Option<&[u8]> {
        self.get(key).and_then(Value::as_bytes)
    }

    /// Get a nested sub-record by key
    pub fn record(&self, key: &str) -> Option<&Record> {
        self.get(key).and_then(Value::as_record)
    }

    pub fn record_mut(&mut self, key: &str) -> Option<&mut Record> {
        self.get_mut(key).and_then(Value::as_record_mut)
    }

    /// Resolve a dotted path through nested sub-records
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.get(first)?;
        for segment in segments {
            current = current.as_record()?.get(segment)?;
        }
        Some(current)
    }

    /// Insert at a dotted path, creating intermediate sub-records
    pub fn insert_path(&mut self, path: &str, value: Value) {
        match path.split_once('.') {
            None => self.insert(path, value),
            Some((head, rest)) => {
                if self.record_mut(head).is_none() {
                    self.insert(head, Value::Record(Record::new()));
                }
                // The sub-record was just ensured above.
                if let Some(sub) = self.record_mut(head) {
                    sub.insert_path(rest, value);
                }
            }
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        write!(f, "}}")
    }
}
