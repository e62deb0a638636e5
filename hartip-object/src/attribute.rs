//! Typed attribute storage cells

use hartip_codec::ScalarKind;
use hartip_core::{HartError, HartResult, Value};
use std::fmt;
use tokio::sync::RwLock;

/// A named, typed, indexable storage cell with a default value
///
/// An attribute starts with one element holding its default. Values are
/// read and written through the lock so one channel's traffic can mutate
/// an attribute while another channel's creation proceeds elsewhere in
/// the registry.
#[derive(Debug)]
pub struct Attribute {
    name: String,
    kind: ScalarKind,
    default: Value,
    values: RwLock<Vec<Value>>,
}

impl Attribute {
    /// Create an attribute seeded with its default value
    ///
    /// # Errors
    /// Returns `TypeMismatch` if the default does not carry the declared
    /// scalar type.
    pub fn new(name: impl Into<String>, kind: ScalarKind, default: Value) -> HartResult<Self> {
        let name = name.into();
        if !kind.matches(&default) {
            return Err(HartError::TypeMismatch(format!(
                "attribute {} declared {} but default is {}",
                name,
                kind,
                default.kind_name()
            )));
        }
        let seed = default.clone();
        Ok(Self {
            name,
            kind,
            default,
            values: RwLock::new(vec![seed]),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ScalarKind {
        self.kind
    }

    pub fn default(&self) -> &Value {
        &self.default
    }

    /// Number of elements currently stored
    pub async fn len(&self) -> usize {
        self.values.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.values.read().await.is_empty()
    }

    /// Read the element at `index`
    pub async fn read(&self, index: usize) -> HartResult<Value> {
        let values = self.values.read().await;
        values.get(index).cloned().ok_or_else(|| {
            HartError::FieldMissing(format!("{}[{}] out of range", self.name, index))
        })
    }

    /// Write the element at `index`, or append when `index` equals the
    /// current length
    pub async fn write(&self, index: usize, value: Value) -> HartResult<()> {
        if !self.kind.matches(&value) {
            return Err(HartError::TypeMismatch(format!(
                "attribute {} holds {} but write carries {}",
                self.name,
                self.kind,
                value.kind_name()
            )));
        }
        let mut values = self.values.write().await;
        if index < values.len() {
            values[index] = value;
            Ok(())
        } else if index == values.len() {
            values.push(value);
            Ok(())
        } else {
            Err(HartError::FieldMissing(format!(
                "{}[{}] out of range",
                self.name, index
            )))
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}
