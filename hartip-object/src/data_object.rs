//! Per-channel data objects

use crate::attribute::Attribute;
use hartip_core::{HartError, HartResult};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Class identifier of the companion data object class
pub const DATA_CLASS_ID: u16 = 0xF35D;

/// Companion object holding one channel's attribute collection
///
/// A channel object owns no data itself; its fields live in a `HartData`
/// instance sharing the channel's instance identifier, created lazily on
/// first field access. Attribute identifiers are allocated in increasing
/// numeric order starting at 1 and never reused.
#[derive(Debug, Default)]
pub struct HartData {
    name: String,
    instance_id: u32,
    attributes: BTreeMap<u32, Arc<Attribute>>,
}

impl HartData {
    pub fn new(name: impl Into<String>, instance_id: u32) -> Self {
        Self {
            name: name.into(),
            instance_id,
            attributes: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instance_id(&self) -> u32 {
        self.instance_id
    }

    /// Identifier the next appended attribute will receive
    pub fn next_attribute_id(&self) -> u32 {
        self.attributes.keys().max().map_or(1, |max| max + 1)
    }

    /// Append an attribute under an explicit identifier
    ///
    /// # Errors
    /// Returns `RegistryCorrupt` if the identifier is already taken;
    /// identifiers are never reused.
    pub fn insert(&mut self, id: u32, attribute: Arc<Attribute>) -> HartResult<()> {
        if self.attributes.contains_key(&id) {
            return Err(HartError::RegistryCorrupt(format!(
                "{} attribute {} already exists",
                self.name, id
            )));
        }
        self.attributes.insert(id, attribute);
        Ok(())
    }

    pub fn attribute(&self, id: u32) -> Option<Arc<Attribute>> {
        self.attributes.get(&id).cloned()
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    /// Attribute identifiers in increasing order
    pub fn attribute_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.attributes.keys().copied()
    }
}

impl fmt::Display for HartData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:04X}/{})", self.name, DATA_CLASS_ID, self.instance_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hartip_codec::ScalarKind;
    use hartip_core::Value;

    fn cell(name: &str) -> Arc<Attribute> {
        Arc::new(Attribute::new(name, ScalarKind::Usint, Value::Usint(0)).unwrap())
    }

    #[test]
    fn test_ids_increase_from_one() {
        let mut data = HartData::new("HART_0_Data", 1);
        assert_eq!(data.next_attribute_id(), 1);

        for expected in 1..=3 {
            let id = data.next_attribute_id();
            assert_eq!(id, expected);
            data.insert(id, cell("x")).unwrap();
        }
        let ids: Vec<u32> = data.attribute_ids().collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_ids_never_reused() {
        let mut data = HartData::new("HART_0_Data", 1);
        data.insert(1, cell("a")).unwrap();
        data.insert(2, cell("b")).unwrap();
        assert!(data.insert(2, cell("c")).is_err());
        assert_eq!(data.next_attribute_id(), 3);
    }
}
