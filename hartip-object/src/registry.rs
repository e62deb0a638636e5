//! Process-wide attribute registry
//!
//! The registry is the shared directory of every data object and symbolic
//! tag in the process. Requests from different channels may run on
//! different tasks and race to create the same tag on first access; all
//! creation goes through one write lock so that at most one attribute is
//! ever created per symbolic name.

use crate::attribute::Attribute;
use crate::data_object::HartData;
use hartip_codec::ScalarKind;
use hartip_core::{HartError, HartResult, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Three-part numeric key addressing one attribute globally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributeKey {
    pub class: u16,
    pub instance: u32,
    pub attribute: u32,
}

impl AttributeKey {
    pub fn new(class: u16, instance: u32, attribute: u32) -> Self {
        Self {
            class,
            instance,
            attribute,
        }
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(0x{:04X}, {}, {})",
            self.class, self.instance, self.attribute
        )
    }
}

#[derive(Default)]
struct Inner {
    objects: HashMap<(u16, u32), HartData>,
    tags: HashMap<String, AttributeKey>,
}

/// Shared directory of data objects and tag redirects
///
/// Instance identifier bounds are not enforced here; callers addressing
/// a 16-channel interface are responsible for staying within 1..=16.
#[derive(Default)]
pub struct Registry {
    inner: RwLock<Inner>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an existing tag redirect, without side effects
    pub async fn resolve(&self, tag: &str) -> Option<AttributeKey> {
        let inner = self.inner.read().await;
        inner.tags.get(tag).copied()
    }

    /// Direct key-based attribute access
    pub async fn lookup(&self, key: AttributeKey) -> Option<Arc<Attribute>> {
        let inner = self.inner.read().await;
        inner
            .objects
            .get(&(key.class, key.instance))
            .and_then(|object| object.attribute(key.attribute))
    }

    /// Register a redirect from a symbolic tag to an existing key
    ///
    /// Registering the same tag twice with the same key is a no-op;
    /// pointing an existing tag somewhere else is a corruption.
    pub async fn redirect(&self, tag: &str, key: AttributeKey) -> HartResult<AttributeKey> {
        let mut inner = self.inner.write().await;
        if let Some(existing) = inner.tags.get(tag) {
            if *existing != key {
                return Err(HartError::RegistryCorrupt(format!(
                    "tag {tag} already points at {existing}, refusing {key}"
                )));
            }
            return Ok(key);
        }
        inner.tags.insert(tag.to_string(), key);
        Ok(key)
    }

    /// Create the backing attribute for a tag and register its redirect
    ///
    /// Reuses the data object for (class, instance) when it already
    /// exists, appends an attribute under the next sequential identifier,
    /// and verifies the tag resolves to the just-created key before
    /// returning. The whole sequence holds the write lock, so concurrent
    /// callers for the same tag cannot both create.
    pub async fn create_and_redirect(
        &self,
        tag: &str,
        class: u16,
        instance: u32,
        kind: ScalarKind,
        default: Value,
    ) -> HartResult<AttributeKey> {
        let mut guard = self.inner.write().await;

        // A concurrent caller may have won the race before this lock was
        // granted; reuse its key rather than creating a second attribute.
        if let Some(existing) = guard.tags.get(tag) {
            return Ok(*existing);
        }

        let inner = &mut *guard;
        let object = inner.objects.entry((class, instance)).or_insert_with(|| {
            let name = tag.split('.').next().unwrap_or(tag);
            HartData::new(name, instance)
        });
        let attribute_id = object.next_attribute_id();
        let attribute = Arc::new(Attribute::new(tag, kind, default)?);
        object.insert(attribute_id, attribute)?;
        log::info!(
            "{:<24} instance {:>3}, attribute {:>3} added (tag: {})",
            object.name(),
            instance,
            attribute_id,
            tag
        );

        let key = AttributeKey::new(class, instance, attribute_id);
        inner.tags.insert(tag.to_string(), key);

        match inner.tags.get(tag) {
            Some(found) if *found == key => Ok(key),
            found => Err(HartError::RegistryCorrupt(format!(
                "created tag {tag} pointing at {key} but resolution yields {found:?}"
            ))),
        }
    }

    /// Resolve a tag, creating its backing storage on a miss
    pub async fn resolve_or_create(
        &self,
        tag: &str,
        class: u16,
        instance: u32,
        kind: ScalarKind,
        default: Value,
    ) -> HartResult<AttributeKey> {
        if let Some(key) = self.resolve(tag).await {
            return Ok(key);
        }
        self.create_and_redirect(tag, class, instance, kind, default)
            .await
    }

    /// Number of registered tag redirects
    pub async fn tag_count(&self) -> usize {
        self.inner.read().await.tags.len()
    }

    /// Number of data objects
    pub async fn object_count(&self) -> usize {
        self.inner.read().await.objects.len()
    }

    /// Number of attributes held by one data object, if it exists
    pub async fn attribute_count(&self, class: u16, instance: u32) -> Option<usize> {
        let inner = self.inner.read().await;
        inner
            .objects
            .get(&(class, instance))
            .map(HartData::attribute_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_object::DATA_CLASS_ID;

    #[tokio::test]
    async fn test_resolve_miss_then_create() {
        let registry = Registry::new();
        assert_eq!(registry.resolve("HART_2_Data.PV").await, None);

        let key = registry
            .resolve_or_create(
                "HART_2_Data.PV",
                DATA_CLASS_ID,
                3,
                ScalarKind::Real,
                Value::Real(0.0),
            )
            .await
            .unwrap();
        assert_eq!(key, AttributeKey::new(DATA_CLASS_ID, 3, 1));
        assert_eq!(registry.resolve("HART_2_Data.PV").await, Some(key));

        let attribute = registry.lookup(key).await.unwrap();
        assert_eq!(attribute.read(0).await.unwrap(), Value::Real(0.0));
    }

    #[tokio::test]
    async fn test_identifiers_sequential_within_instance() {
        let registry = Registry::new();
        for (i, field) in ["PV", "SV", "TV"].iter().enumerate() {
            let key = registry
                .resolve_or_create(
                    &format!("HART_0_Data.{field}"),
                    DATA_CLASS_ID,
                    1,
                    ScalarKind::Real,
                    Value::Real(0.0),
                )
                .await
                .unwrap();
            assert_eq!(key.attribute, i as u32 + 1);
        }
        assert_eq!(registry.attribute_count(DATA_CLASS_ID, 1).await, Some(3));
        assert_eq!(registry.object_count().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_first_access_creates_once() {
        let registry = Arc::new(Registry::new());
        let first = registry.clone();
        let second = registry.clone();

        let (a, b) = tokio::join!(
            tokio::spawn(async move {
                first
                    .resolve_or_create(
                        "HART_4_Data.PV",
                        DATA_CLASS_ID,
                        5,
                        ScalarKind::Real,
                        Value::Real(0.0),
                    )
                    .await
            }),
            tokio::spawn(async move {
                second
                    .resolve_or_create(
                        "HART_4_Data.PV",
                        DATA_CLASS_ID,
                        5,
                        ScalarKind::Real,
                        Value::Real(0.0),
                    )
                    .await
            }),
        );

        let a = a.unwrap().unwrap();
        let b = b.unwrap().unwrap();
        assert_eq!(a, b);
        assert_eq!(registry.tag_count().await, 1);
        assert_eq!(registry.attribute_count(DATA_CLASS_ID, 5).await, Some(1));
    }

    #[tokio::test]
    async fn test_redirect_refuses_repointing() {
        let registry = Registry::new();
        let key = registry
            .create_and_redirect(
                "HART_0_Data.PV",
                DATA_CLASS_ID,
                1,
                ScalarKind::Real,
                Value::Real(0.0),
            )
            .await
            .unwrap();

        // Same mapping again is fine.
        registry.redirect("HART_0_Data.PV", key).await.unwrap();

        let elsewhere = AttributeKey::new(DATA_CLASS_ID, 9, 9);
        assert!(registry.redirect("HART_0_Data.PV", elsewhere).await.is_err());
    }

    #[tokio::test]
    async fn test_out_of_range_instances_accepted() {
        // Bounds are the caller's responsibility; the registry happily
        // creates storage for any instance number.
        let registry = Registry::new();
        let key = registry
            .resolve_or_create(
                "HART_39_Data.PV",
                DATA_CLASS_ID,
                40,
                ScalarKind::Real,
                Value::Real(0.0),
            )
            .await
            .unwrap();
        assert_eq!(key.instance, 40);
    }
}
