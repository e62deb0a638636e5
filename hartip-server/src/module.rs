//! Interface module configuration and channel bank
//!
//! A physical HART interface module carries a fixed set of channels.
//! [`HartModule`] builds one channel object per instance over a shared
//! registry, so a simulator or gateway can stand up the whole module in
//! one call and route incoming requests by instance identifier.

use crate::channel::HartChannel;
use crate::fallback::{DefaultFallback, FallbackHandler};
use crate::router::{NullRouter, Router};
use hartip_core::HartResult;
use hartip_object::Registry;
use std::sync::Arc;

/// Module configuration
#[derive(Debug, Clone)]
pub struct ModuleConfig {
    /// Name prefix for the channel objects (`<prefix>.ch<N>`)
    pub name: String,
    /// Number of channels; instances are numbered 1..=channels
    pub channels: u32,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            name: "hart".to_string(),
            channels: 16,
        }
    }
}

/// One interface module's worth of channel objects
pub struct HartModule {
    channels: Vec<Arc<HartChannel>>,
    registry: Arc<Registry>,
}

impl HartModule {
    /// Create a module with default configuration and no routing
    pub fn new(registry: Arc<Registry>) -> HartResult<Self> {
        Self::with_config(ModuleConfig::default(), registry)
    }

    /// Create a module with custom configuration
    pub fn with_config(config: ModuleConfig, registry: Arc<Registry>) -> HartResult<Self> {
        Self::with_collaborators(
            config,
            registry,
            Arc::new(NullRouter),
            Arc::new(DefaultFallback),
        )
    }

    /// Create a module whose channels share routing and fallback
    /// collaborators
    pub fn with_collaborators(
        config: ModuleConfig,
        registry: Arc<Registry>,
        router: Arc<dyn Router>,
        fallback: Arc<dyn FallbackHandler>,
    ) -> HartResult<Self> {
        let mut channels = Vec::with_capacity(config.channels as usize);
        for instance in 1..=config.channels {
            channels.push(Arc::new(HartChannel::with_collaborators(
                format!("{}.ch{}", config.name, instance - 1),
                instance,
                registry.clone(),
                router.clone(),
                fallback.clone(),
            )?));
        }
        Ok(Self { channels, registry })
    }

    /// Channel by instance identifier (1-based)
    pub fn channel(&self, instance_id: u32) -> Option<&Arc<HartChannel>> {
        if instance_id == 0 {
            return None;
        }
        self.channels.get(instance_id as usize - 1)
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_module_has_sixteen_channels() {
        let module = HartModule::new(Arc::new(Registry::new())).unwrap();
        assert_eq!(module.channel_count(), 16);
        assert_eq!(module.channel(1).unwrap().channel_number(), 0);
        assert_eq!(module.channel(16).unwrap().channel_number(), 15);
        assert!(module.channel(0).is_none());
        assert!(module.channel(17).is_none());
    }

    #[tokio::test]
    async fn test_channels_share_one_registry() {
        use hartip_core::{Record, Value, keys};
        use hartip_application::service::RD_VAR_REQ;

        let module = HartModule::new(Arc::new(Registry::new())).unwrap();
        for instance in [1, 2] {
            let mut record = Record::new();
            record.insert(keys::SERVICE, Value::Usint(RD_VAR_REQ));
            module
                .channel(instance)
                .unwrap()
                .request(&mut record)
                .await
                .unwrap();
        }
        assert_eq!(module.registry().object_count().await, 2);
        assert!(module.registry().resolve("HART_0_Data.PV").await.is_some());
        assert!(module.registry().resolve("HART_1_Data.PV").await.is_some());
    }
}
