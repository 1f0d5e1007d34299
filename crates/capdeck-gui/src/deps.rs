//! Dependency injection for `SelectionController`.
//!
//! All dependencies are injected as trait objects to maintain adapter neutrality.

use std::sync::Arc;

use capdeck_core::{ActiveSetSynchronizer, CapabilityEventEmitter, DEFAULT_CLI_PACKAGE, RegistryPort};

/// Dependencies required to construct a `SelectionController`.
///
/// Fields are private to enforce construction via `GuiDeps::new()`.
///
/// # Example
///
/// ```ignore
/// let sync = Arc::new(ActiveSetSynchronizer::new(registry.clone(), emitter.clone()));
/// let deps = GuiDeps::new(registry, sync, emitter);
/// let controller = SelectionController::new(deps, catalog);
/// ```
pub struct GuiDeps {
    /// Registry used for detail lookups and discovery search.
    pub(crate) registry: Arc<dyn RegistryPort>,
    /// Sole writer of the active-set mirror.
    pub(crate) synchronizer: Arc<ActiveSetSynchronizer>,
    /// Emitter for add/edit/remove notifications.
    pub(crate) emitter: Arc<dyn CapabilityEventEmitter>,
    /// Launcher package embedded in submitted launch configs.
    pub(crate) cli_package: String,
}

impl GuiDeps {
    pub fn new(
        registry: Arc<dyn RegistryPort>,
        synchronizer: Arc<ActiveSetSynchronizer>,
        emitter: Arc<dyn CapabilityEventEmitter>,
    ) -> Self {
        Self {
            registry,
            synchronizer,
            emitter,
            cli_package: DEFAULT_CLI_PACKAGE.to_string(),
        }
    }

    /// Override the launcher package (`@smithery/cli@latest` by default).
    #[must_use]
    pub fn with_cli_package(mut self, cli_package: impl Into<String>) -> Self {
        self.cli_package = cli_package.into();
        self
    }
}
