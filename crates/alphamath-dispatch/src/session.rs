//! UI-thread session state: the active module and mode.

use alphamath_core::{ModuleDescriptor, ModuleId, ModuleRegistry};

use crate::error::DispatchError;
use crate::interfaces::DispatchRequest;

/// Build a request only when the module exists and its argument policy is met.
pub fn request_for(
    module_id: &str,
    argument: &str,
    mode: Option<&str>,
) -> Result<DispatchRequest, DispatchError> {
    let descriptor = ModuleRegistry::global()
        .by_id(module_id)
        .ok_or_else(|| DispatchError::NotFound(module_id.to_string()))?;
    if descriptor.requires_argument && argument.trim().is_empty() {
        return Err(DispatchError::MissingArgument {
            module: module_id.to_string(),
            hint: descriptor.hint.to_string(),
        });
    }
    Ok(DispatchRequest {
        module_id: Some(module_id.to_string()),
        argument: Some(argument.to_string()),
        mode: mode.map(str::to_string),
    })
}

/// Explicit replacement for a global "active module". Owned by the UI thread.
#[derive(Debug, Default)]
pub struct Session {
    active: Option<ModuleId>,
    mode: Option<String>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `module` already selected (label or id).
    pub fn with_module(module: &str) -> Result<Self, DispatchError> {
        let mut session = Self::new();
        session.select(module)?;
        Ok(session)
    }

    /// Select a module by label or id. An unknown name leaves the selection unchanged.
    pub fn select(&mut self, label_or_id: &str) -> Result<&'static ModuleDescriptor, DispatchError> {
        let registry = ModuleRegistry::global();
        let descriptor = registry
            .resolve(label_or_id.trim())
            .ok_or_else(|| DispatchError::NotFound(label_or_id.trim().to_string()))?;
        self.active = Some(descriptor.id);
        tracing::debug!(module = %descriptor.id, "module selected");
        Ok(descriptor)
    }

    pub fn clear(&mut self) {
        self.active = None;
        self.mode = None;
    }

    #[must_use]
    pub fn active(&self) -> Option<ModuleId> {
        self.active
    }

    #[must_use]
    pub fn descriptor(&self) -> Option<&'static ModuleDescriptor> {
        self.active
            .and_then(|id| ModuleRegistry::global().by_id(id.as_str()))
    }

    pub fn set_mode(&mut self, mode: Option<String>) {
        self.mode = mode.filter(|m| !m.trim().is_empty());
    }

    #[must_use]
    pub fn mode(&self) -> Option<&str> {
        self.mode.as_deref()
    }

    /// Whether the shell should ask for input before submitting.
    #[must_use]
    pub fn needs_input(&self) -> bool {
        alphamath_core::requires_argument(self.active.map(ModuleId::as_str))
    }

    /// Request for the active module; the mode only applies to the algebra backend.
    ///
    /// The gateway validates it, so no module or a missing argument still
    /// produces a request.
    #[must_use]
    pub fn request(&self, argument: &str) -> DispatchRequest {
        let mode = match self.active {
            Some(ModuleId::ProjectAlgebra) => self.mode.clone(),
            _ => None,
        };
        DispatchRequest {
            module_id: self.active.map(|id| id.as_str().to_string()),
            argument: Some(argument.to_string()),
            mode,
        }
    }
}
