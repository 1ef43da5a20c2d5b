//! # Process-Wide Shared Tier
//!
//! The root of the two-tier fallback chain: a singleton registry created
//! lazily on first access and bootstrapped exactly once with the built-in
//! default candidates. Local registries delegate misses here; this registry
//! never delegates further.

use crate::config::EngineConfig;
use crate::extension::ExtensionComponent;
use crate::providers::{
    BinaryDataProvider, DefaultFaultMapper, FormEncodingProvider, PlainTextEntityProvider,
    ServiceDescriptionFilter,
};
use crate::registry::ExtensionRegistry;
use std::sync::{Arc, OnceLock};
use tracing::info;

static SHARED_REGISTRY: OnceLock<Arc<ExtensionRegistry>> = OnceLock::new();

/// The process-wide fallback catalog. Lives for the rest of the process
/// once created; local registries hold a reference and are destroyed with
/// their service instance.
pub fn shared_registry() -> Arc<ExtensionRegistry> {
    Arc::clone(SHARED_REGISTRY.get_or_init(|| {
        let registry = ExtensionRegistry::root_with_config(EngineConfig::default());
        install_shared_defaults(&registry);
        Arc::new(registry)
    }))
}

/// Install the built-in default candidate set into a root registry: body
/// converters for the common wire formats, the fallback fault-to-response
/// mapper, and the service description filter. Exposed so embedding hosts
/// and tests can build scoped shared tiers carrying the same defaults.
pub fn install_shared_defaults(registry: &ExtensionRegistry) {
    registry.register_all(vec![
        Arc::new(BinaryDataProvider::new()) as Arc<dyn ExtensionComponent>,
        Arc::new(FormEncodingProvider::new()),
        Arc::new(PlainTextEntityProvider::new()),
        Arc::new(DefaultFaultMapper::new()),
        Arc::new(ServiceDescriptionFilter::new()),
    ]);
    info!("🧰 SHARED TIER: installed default extension candidates");
}
