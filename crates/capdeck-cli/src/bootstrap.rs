//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the CLI adapter:
//! - Settings (defaults, then `CAPDECK_*` environment, then flags)
//! - HTTP registry client (via capdeck-registry)
//! - Active-set synchronizer (via capdeck-core)
//! - Selection controller (via capdeck-gui)
//!
//! Command handlers receive the composed `CliContext` and drive the
//! controller exactly as an interactive front end would.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use capdeck_core::{
    ActiveSetSynchronizer, CapabilityEvent, CapabilityEventEmitter, Catalog, RegistryPort, Settings,
    validate_settings,
};
use capdeck_gui::{GuiDeps, SelectionController};
use capdeck_registry::{DefaultRegistryClient, RegistryClientConfig};
use tracing::debug;

use crate::error::CliError;

/// Emitter that mirrors capability events into the log.
#[derive(Debug, Clone, Default)]
pub struct LogEmitter;

impl CapabilityEventEmitter for LogEmitter {
    fn emit(&self, event: CapabilityEvent) {
        let payload = serde_json::to_string(&event).unwrap_or_default();
        debug!(event = event.event_name(), %payload, "Capability event");
    }

    fn clone_box(&self) -> Box<dyn CapabilityEventEmitter> {
        Box::new(self.clone())
    }
}

/// Stack defaults, environment (through `lookup`) and flag overrides, then
/// validate the result.
pub fn resolve_settings<F>(lookup: F, overrides: Settings) -> Result<Settings, CliError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut settings = Settings::with_defaults();
    settings.overlay(Settings::from_lookup(lookup)?);
    settings.overlay(overrides);
    validate_settings(&settings)?;
    Ok(settings)
}

/// Load the catalog file named in settings, or the bundled catalog.
pub fn load_catalog(settings: &Settings) -> Result<Catalog> {
    match settings.catalog_path.as_deref() {
        Some(path) => {
            let json = std::fs::read_to_string(Path::new(path))
                .with_context(|| format!("Failed to read catalog file {path}"))?;
            Catalog::from_json(&json).with_context(|| format!("Invalid catalog file {path}"))
        }
        None => Catalog::builtin().context("Bundled catalog is invalid"),
    }
}

/// Fully composed application context for CLI commands.
pub struct CliContext {
    /// The selection controller every handler drives.
    pub controller: SelectionController,
    /// Effective settings.
    pub settings: Settings,
    /// Print JSON instead of tables.
    pub json: bool,
}

impl CliContext {
    /// Compose a context around any registry implementation.
    pub fn with_registry(
        registry: Arc<dyn RegistryPort>,
        catalog: Catalog,
        settings: Settings,
        json: bool,
    ) -> Self {
        let emitter: Arc<dyn CapabilityEventEmitter> = Arc::new(LogEmitter);
        let synchronizer = Arc::new(
            ActiveSetSynchronizer::new(registry.clone(), emitter.clone()).with_token(settings.token.clone()),
        );
        let deps = GuiDeps::new(registry, synchronizer, emitter)
            .with_cli_package(settings.effective_cli_package());

        Self {
            controller: SelectionController::new(deps, catalog),
            settings,
            json,
        }
    }

    pub const fn controller(&self) -> &SelectionController {
        &self.controller
    }
}

/// Bootstrap the CLI application.
///
/// This is the composition root. It:
/// 1. Loads the catalog
/// 2. Creates the HTTP registry client from settings
/// 3. Wires synchronizer and controller around it
pub fn bootstrap(settings: Settings, json: bool) -> Result<CliContext> {
    let catalog = load_catalog(&settings)?;

    let config = RegistryClientConfig::from_settings(&settings);
    let client = DefaultRegistryClient::new(&config)
        .map_err(|e| CliError::Config(e.to_string()))?;
    debug!(
        backend = settings.effective_backend_url(),
        registry = settings.effective_registry_url(),
        servers = catalog.len(),
        "CLI context bootstrapped"
    );

    Ok(CliContext::with_registry(Arc::new(client), catalog, settings, json))
}
