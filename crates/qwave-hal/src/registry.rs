//! Backend registry for creating backends by name.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::backend::{BackendConfig, BackendFactory, QuantumBackend};
use crate::error::{HalError, HalResult};

/// Factory function type for registered backends.
type Factory = Box<dyn Fn(BackendConfig) -> HalResult<Box<dyn QuantumBackend>> + Send + Sync>;

/// Central registry for quantum backends.
///
/// Callers that need exact extraction go through
/// [`QuantumBackend::as_simulator_mut`] on the created backend.
pub struct BackendRegistry {
    factories: FxHashMap<String, Factory>,
}

impl BackendRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            factories: FxHashMap::default(),
        }
    }

    /// Register a backend type under `name`.
    pub fn register<B>(&mut self, name: impl Into<String>)
    where
        B: BackendFactory + 'static,
    {
        let name = name.into();
        debug!("Registering backend: {}", name);
        self.factories.insert(
            name,
            Box::new(|config| {
                let backend = B::from_config(config)?;
                Ok(Box::new(backend))
            }),
        );
    }

    /// Register a backend with a custom constructor.
    pub fn register_factory(
        &mut self,
        name: impl Into<String>,
        factory: impl Fn(BackendConfig) -> HalResult<Box<dyn QuantumBackend>> + Send + Sync + 'static,
    ) {
        let name = name.into();
        debug!("Registering factory backend: {}", name);
        self.factories.insert(name, Box::new(factory));
    }

    /// Create a backend by name.
    pub fn create(&self, name: &str, config: BackendConfig) -> HalResult<Box<dyn QuantumBackend>> {
        let factory = self.factories.get(name).ok_or_else(|| {
            HalError::BackendUnavailable(format!("No backend registered with name '{name}'"))
        })?;
        factory(config)
    }

    /// List all registered backend names, sorted.
    pub fn available_backends(&self) -> Vec<String> {
        let mut names: Vec<_> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a backend is registered under `name`.
    pub fn has_backend(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_registry() {
        let registry = BackendRegistry::new();
        assert!(registry.available_backends().is_empty());
        assert!(!registry.has_backend("statevector"));
    }

    #[test]
    fn test_register_factory() {
        let mut registry = BackendRegistry::new();
        registry.register_factory("test", |_config| {
            Err(HalError::BackendUnavailable("test only".into()))
        });

        assert!(registry.has_backend("test"));
        assert_eq!(registry.available_backends(), vec!["test"]);
    }

    #[test]
    fn test_create_unknown_backend() {
        let registry = BackendRegistry::new();
        let err = registry
            .create("nonexistent", BackendConfig::new("nonexistent"))
            .err()
            .unwrap();
        assert!(err.is_lookup());
    }

    #[test]
    fn test_available_backends_sorted() {
        let mut registry = BackendRegistry::new();
        registry.register_factory("zebra", |_| {
            Err(HalError::BackendUnavailable("test".into()))
        });
        registry.register_factory("alpha", |_| {
            Err(HalError::BackendUnavailable("test".into()))
        });

        let backends = registry.available_backends();
        assert_eq!(backends, vec!["alpha", "zebra"]);
    }
}
