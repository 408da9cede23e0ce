//! Provider factory and cache.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::module::ModuleId;
use crate::provider::{ComputationProvider, ScriptProvider};
use crate::providers::{
    congruence::CongruenceSolver, crt::CrtSolver, cubic::CubicSolver,
    multiplier::MultiplierSolver, polydiv::PolyDivSolver, project::ActivityEntry,
    project::AlgebraProvider, quadratic::QuadraticSolver, sturm::SturmSolver,
    trig::TrigCalculator,
};

/// Factory trait resolving module ids to computation providers.
pub trait ProviderFactory: Send + Sync {
    /// Get or create the provider for a module id.
    fn get(&self, id: &str) -> Option<Arc<dyn ComputationProvider>>;
}

/// Default factory with lazy creation and cache.
pub struct DefaultProviders {
    cache: RwLock<HashMap<ModuleId, Arc<dyn ComputationProvider>>>,
}

impl DefaultProviders {
    /// Create a new default factory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
        }
    }

    fn create_provider(id: ModuleId) -> Arc<dyn ComputationProvider> {
        match id {
            ModuleId::Congruence => Arc::new(ScriptProvider::new(Arc::new(CongruenceSolver))),
            ModuleId::Crt => Arc::new(ScriptProvider::new(Arc::new(CrtSolver))),
            ModuleId::Cubic => Arc::new(ScriptProvider::new(Arc::new(CubicSolver))),
            ModuleId::Multiplier => Arc::new(ScriptProvider::new(Arc::new(MultiplierSolver))),
            ModuleId::PolyLongDiv => Arc::new(ScriptProvider::new(Arc::new(PolyDivSolver))),
            ModuleId::TrigCalc => Arc::new(ScriptProvider::new(Arc::new(TrigCalculator))),
            ModuleId::Quadratic => Arc::new(ScriptProvider::new(Arc::new(QuadraticSolver))),
            ModuleId::Sturm => Arc::new(ScriptProvider::new(Arc::new(SturmSolver))),
            ModuleId::ProjectActivity => Arc::new(ActivityEntry),
            ModuleId::ProjectAlgebra => Arc::new(AlgebraProvider),
        }
    }
}

impl Default for DefaultProviders {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderFactory for DefaultProviders {
    fn get(&self, id: &str) -> Option<Arc<dyn ComputationProvider>> {
        let id = ModuleId::parse(id)?;

        // Check cache first
        if let Some(provider) = self.cache.read().get(&id) {
            return Some(Arc::clone(provider));
        }

        let provider = Self::create_provider(id);
        self.cache.write().insert(id, Arc::clone(&provider));
        tracing::debug!(module = %id, "provider created");
        Some(provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_creates_every_module() {
        let factory = DefaultProviders::new();
        for id in ModuleId::ALL {
            let provider = factory.get(id.as_str()).unwrap();
            assert_eq!(provider.name(), id.as_str());
        }
    }

    #[test]
    fn factory_caches() {
        let factory = DefaultProviders::new();
        let p1 = factory.get("congruence").unwrap();
        let p2 = factory.get("congruence").unwrap();
        assert!(Arc::ptr_eq(&p1, &p2));
    }

    #[test]
    fn factory_unknown_name() {
        let factory = DefaultProviders::new();
        assert!(factory.get("unknown_module").is_none());
        assert!(factory.get("").is_none());
    }

    #[test]
    fn activity_entry_has_no_main() {
        let factory = DefaultProviders::new();
        assert!(!factory.get("PROJ_ACTIVITY").unwrap().has_main());
        assert!(factory.get("proj").unwrap().has_main());
    }
}
