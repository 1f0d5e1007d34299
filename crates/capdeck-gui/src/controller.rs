//! Selection controller: dropdown and modal state machines over the
//! active-set synchronizer.
//!
//! The controller holds only transient UI state. The active set is read from
//! the synchronizer on demand, so every view reflects the last completed
//! refresh and never an optimistic guess.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use capdeck_core::{
    ActiveSet, ActiveSetSnapshot, CapabilityEvent, Catalog, LaunchConfig, MutationOutcome,
    ServerSearchPage, build_submission, derive_fields,
};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::catalog_view::{CatalogView, build_catalog_view, summary_label};
use crate::deps::GuiDeps;
use crate::dropdown::{DropdownPhase, DropdownState, Key};
use crate::error::GuiError;
use crate::modal::{ModalMode, ModalState, ModalView};

/// Inline modal message after a submit future was dropped mid-flight.
pub const SUBMIT_INTERRUPTED: &str =
    "Submission was interrupted; refresh to see whether the backend applied it";

/// Page size used for registry discovery.
pub const DISCOVERY_PAGE_SIZE: u32 = 20;

/// What a key press did.
#[derive(Debug, Clone)]
pub enum KeyOutcome {
    /// The dropdown is closed or the list is empty.
    Ignored,
    /// Highlight moved (or reset) to this index.
    Highlighted(usize),
    /// Enter on an active item removed it.
    Removed(MutationOutcome),
    /// Enter on an available item opened the Add modal. `None` when a newer
    /// modal replaced it before its details arrived.
    ModalOpened(Option<ModalView>),
}

/// A registry search page and how many of its servers were new to the catalog.
#[derive(Debug, Clone)]
pub struct Discovery {
    pub page: ServerSearchPage,
    pub added: usize,
}

/// Everything a front end needs to render one frame.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerView {
    pub summary: String,
    pub phase: DropdownPhase,
    pub search: String,
    pub highlighted: usize,
    pub search_focused: bool,
    pub items: CatalogView,
    pub sync: ActiveSetSnapshot,
    pub modal: Option<ModalView>,
}

#[derive(Default)]
struct ControllerState {
    dropdown: DropdownState,
    modal: Option<ModalState>,
    catalog: Catalog,
    /// Last launch config this controller submitted per server id.
    last_configs: HashMap<String, LaunchConfig>,
    next_ticket: u64,
}

/// UI-facing facade over catalog, synchronizer and form engine.
pub struct SelectionController {
    deps: GuiDeps,
    state: Mutex<ControllerState>,
}

impl SelectionController {
    pub fn new(deps: GuiDeps, catalog: Catalog) -> Self {
        Self {
            deps,
            state: Mutex::new(ControllerState {
                catalog,
                ..ControllerState::default()
            }),
        }
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut ControllerState) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    fn active(&self) -> ActiveSet {
        self.deps.synchronizer.active()
    }

    // ========================================================================
    // Views
    // ========================================================================

    /// Filtered catalog for the current search text.
    pub fn catalog_view(&self) -> CatalogView {
        let active = self.active();
        self.with_state(|s| build_catalog_view(&s.catalog, &active, s.dropdown.search()))
    }

    pub fn modal(&self) -> Option<ModalView> {
        self.with_state(|s| s.modal.as_ref().map(ModalState::view))
    }

    pub fn view(&self) -> ControllerView {
        let sync = self.deps.synchronizer.snapshot();
        self.with_state(|s| ControllerView {
            summary: summary_label(sync.servers.len()),
            phase: s.dropdown.phase(),
            search: s.dropdown.search().to_string(),
            highlighted: s.dropdown.highlighted(),
            search_focused: s.dropdown.is_search_focused(),
            items: build_catalog_view(&s.catalog, &sync.servers, s.dropdown.search()),
            modal: s.modal.as_ref().map(ModalState::view),
            sync,
        })
    }

    // ========================================================================
    // List loading
    // ========================================================================

    /// Reload the active set. Also the "try again" action after a failed load.
    pub async fn refresh(&self) -> Result<ActiveSet, GuiError> {
        Ok(self.deps.synchronizer.refresh().await?)
    }

    /// Search the registry and append unseen results to the catalog.
    pub async fn discover(&self, query: &str, page: u32) -> Result<Discovery, GuiError> {
        let found = self
            .deps
            .registry
            .search_servers(query, page, DISCOVERY_PAGE_SIZE)
            .await?;
        let added = self.with_state(|s| s.catalog.extend_discovered(found.servers.iter().cloned()));
        info!(query, page, added, "Catalog extended from registry search");
        Ok(Discovery { page: found, added })
    }

    // ========================================================================
    // Dropdown
    // ========================================================================

    pub fn open_dropdown(&self) {
        self.with_state(|s| s.dropdown.open());
    }

    pub fn close_dropdown(&self) {
        self.with_state(|s| s.dropdown.close());
    }

    pub fn set_search(&self, text: impl Into<String>) {
        let text = text.into();
        self.with_state(|s| s.dropdown.set_search(text));
    }

    /// Apply the list keyboard contract.
    pub async fn on_key(&self, key: Key) -> Result<KeyOutcome, GuiError> {
        let active = self.active();
        let target = self.with_state(|s| {
            if !s.dropdown.is_open() {
                return None;
            }
            let view = build_catalog_view(&s.catalog, &active, s.dropdown.search());
            let index = s.dropdown.navigate(key, view.len());
            match key {
                Key::Enter => view
                    .item_at(index)
                    .map(|item| Ok((item.id().to_string(), item.is_active))),
                _ => Some(Err(index)),
            }
        });

        match target {
            None => Ok(KeyOutcome::Ignored),
            Some(Err(index)) => Ok(KeyOutcome::Highlighted(index)),
            Some(Ok((id, true))) => Ok(KeyOutcome::Removed(self.remove(&id).await?)),
            Some(Ok((id, false))) => Ok(KeyOutcome::ModalOpened(self.open_add(&id).await?)),
        }
    }

    // ========================================================================
    // Modal
    // ========================================================================

    /// Open the Add modal for `id`.
    pub async fn open_add(&self, id: &str) -> Result<Option<ModalView>, GuiError> {
        self.open_modal(ModalMode::Add, id).await
    }

    /// Open the Edit modal for an active server.
    pub async fn open_edit(&self, id: &str) -> Result<Option<ModalView>, GuiError> {
        if !self.deps.synchronizer.snapshot().contains(id) {
            return Err(GuiError::NotFound {
                entity: "active server",
                id: id.to_string(),
            });
        }
        self.open_modal(ModalMode::Edit, id).await
    }

    async fn open_modal(&self, mode: ModalMode, id: &str) -> Result<Option<ModalView>, GuiError> {
        let (ticket, existing) = self.with_state(|s| {
            s.dropdown.close();
            s.next_ticket += 1;
            let ticket = s.next_ticket;
            let display_name = s
                .catalog
                .get(id)
                .map_or_else(|| id.to_string(), |d| d.label().to_string());
            s.modal = Some(ModalState::loading(mode, id.to_string(), display_name, ticket));
            let existing = match mode {
                ModalMode::Edit => s.last_configs.get(id).and_then(LaunchConfig::decode_config),
                ModalMode::Add => None,
            };
            (ticket, existing.unwrap_or_default())
        });
        debug!(server_id = %id, ?mode, ticket, "Opening configuration modal");

        let detail = self.deps.registry.fetch_detail(id).await;

        self.with_state(|s| {
            let Some(modal) = s.modal.as_mut().filter(|m| m.ticket == ticket) else {
                debug!(server_id = %id, ticket, "Discarding details for a superseded modal");
                return Ok(None);
            };
            match detail {
                Ok(detail) => {
                    let form = derive_fields(detail.config_schema(), &existing);
                    modal.loaded(Some(&detail), form, None);
                }
                Err(e) => {
                    warn!(server_id = %id, error = %e, "Server details unavailable");
                    modal.loaded(None, derive_fields(None, &existing), Some(e.to_string()));
                }
            }
            Ok(Some(modal.view()))
        })
    }

    fn with_modal<R>(
        &self,
        f: impl FnOnce(&mut ModalState) -> Result<R, GuiError>,
    ) -> Result<R, GuiError> {
        self.with_state(|s| {
            let modal = s.modal.as_mut().ok_or(GuiError::NoModalOpen)?;
            modal.ensure_editable()?;
            f(modal)
        })
    }

    /// Set a field to a typed value.
    pub fn set_field(&self, name: &str, value: Value) -> Result<ModalView, GuiError> {
        self.with_modal(|modal| {
            modal.form.set_value(name, value)?;
            Ok(modal.view())
        })
    }

    /// Set a field from text input, coerced to the field's type.
    pub fn set_field_raw(&self, name: &str, raw: &str) -> Result<ModalView, GuiError> {
        self.with_modal(|modal| {
            modal.form.set_raw_value(name, raw)?;
            Ok(modal.view())
        })
    }

    /// Flip a secret field's visibility. Returns the new visibility.
    pub fn toggle_secret(&self, name: &str) -> Result<bool, GuiError> {
        self.with_modal(|modal| {
            modal
                .form
                .toggle_secret_visibility(name)
                .ok_or_else(|| GuiError::NotFound {
                    entity: "secret field",
                    id: name.to_string(),
                })
        })
    }

    /// Close the modal. An in-flight detail lookup for it is discarded.
    pub fn close_modal(&self) {
        self.with_state(|s| s.modal = None);
    }

    /// Validate the form and submit it through the synchronizer.
    ///
    /// On success the modal closes. On any failure it stays open with
    /// `submit_error` set.
    pub async fn submit(&self) -> Result<MutationOutcome, GuiError> {
        let cli_package = self.deps.cli_package.clone();
        let (ticket, mode, server_id, launch) = self.with_modal(|modal| {
            match build_submission(&modal.form, &modal.server_id, &cli_package) {
                Ok(launch) => {
                    modal.submitting = true;
                    modal.submit_error = None;
                    Ok((modal.ticket, modal.mode, modal.server_id.clone(), launch))
                }
                Err(e) => {
                    modal.submit_error = Some(e.to_string());
                    Err(GuiError::Validation(e))
                }
            }
        })?;

        let unlock = SubmitGuard {
            controller: self,
            ticket,
            armed: true,
        };
        let result = self
            .deps
            .synchronizer
            .add_or_update(server_id.clone(), launch.clone())
            .await;
        unlock.disarm();

        let outcome = self.with_state(|s| {
            let applied = match &result {
                Ok(outcome) => outcome.result.applied(&server_id),
                Err(e) => e.result().is_some_and(|r| r.applied(&server_id)),
            };
            if applied {
                s.last_configs.insert(server_id.clone(), launch);
            }

            let failure = match &result {
                Ok(outcome) if outcome.result.installation_failed_for(&server_id) => {
                    Some(GuiError::InstallationFailed {
                        server_id: server_id.clone(),
                    })
                }
                Ok(_) => None,
                Err(e) => Some(GuiError::Sync(e.clone())),
            };

            // The user may have closed or replaced the modal meanwhile.
            let same_session = s.modal.as_ref().is_some_and(|m| m.ticket == ticket);
            match failure {
                Some(err) => {
                    if let Some(modal) = s.modal.as_mut().filter(|_| same_session) {
                        modal.submitting = false;
                        modal.submit_error = Some(err.to_string());
                    }
                    Err(err)
                }
                None => {
                    if same_session {
                        s.modal = None;
                    }
                    Ok(())
                }
            }
        });

        match (outcome, result) {
            (Ok(()), Ok(outcome)) => {
                let servers = outcome.active.iter().cloned();
                let event = match mode {
                    ModalMode::Add => CapabilityEvent::server_added(server_id.as_str(), servers),
                    ModalMode::Edit => CapabilityEvent::server_updated(server_id.as_str(), servers),
                };
                info!(server_id = %server_id, ?mode, "Server configuration submitted");
                self.deps.emitter.emit(event);
                Ok(outcome)
            }
            (Err(err), _) => {
                warn!(server_id = %server_id, error = %err, "Submission failed");
                Err(err)
            }
            (Ok(()), Err(e)) => Err(GuiError::Sync(e)),
        }
    }

    /// Remove an active server directly from the list.
    ///
    /// Removing an id that is already gone succeeds.
    pub async fn remove(&self, id: &str) -> Result<MutationOutcome, GuiError> {
        let outcome = self.deps.synchronizer.remove(id).await?;
        self.with_state(|s| s.last_configs.remove(id));
        info!(server_id = %id, removed = outcome.result.removed.len(), "Server removed");
        self.deps.emitter.emit(CapabilityEvent::server_removed(
            id,
            outcome.active.iter().cloned(),
        ));
        Ok(outcome)
    }

    /// Configuration values last submitted for `id`, decoded.
    pub fn last_config(&self, id: &str) -> Option<Map<String, Value>> {
        self.with_state(|s| s.last_configs.get(id).and_then(LaunchConfig::decode_config))
    }
}

/// Releases the modal of the submit that armed it if that submit is dropped.
struct SubmitGuard<'a> {
    controller: &'a SelectionController,
    ticket: u64,
    armed: bool,
}

impl SubmitGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let ticket = self.ticket;
        self.controller.with_state(|s| {
            if let Some(modal) = s.modal.as_mut().filter(|m| m.ticket == ticket) {
                warn!(server_id = %modal.server_id, ticket, "Submission dropped before completing");
                modal.submitting = false;
                modal.submit_error = Some(SUBMIT_INTERRUPTED.to_string());
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capdeck_core::testing::InMemoryRegistry;
    use capdeck_core::{
        ActiveSetSynchronizer, CapabilityEventEmitter, ChannelEmitter, RegistryPort,
        RegistryPortError, ServerDescriptor, ServerDetail,
    };
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc::UnboundedReceiver;

    struct Fixture {
        controller: SelectionController,
        registry: Arc<InMemoryRegistry>,
        events: UnboundedReceiver<CapabilityEvent>,
    }

    fn search_detail(id: &str) -> ServerDetail {
        serde_json::from_value(json!({
            "qualifiedName": id,
            "connections": [{
                "type": "stdio",
                "configSchema": {
                    "properties": {
                        "apiKey": {"type": "string"},
                        "enabled": {"type": "boolean"}
                    },
                    "required": ["apiKey"]
                }
            }]
        }))
        .unwrap()
    }

    fn fixture(registry: InMemoryRegistry) -> Fixture {
        let registry = Arc::new(registry);
        let (emitter, events) = ChannelEmitter::new();
        let emitter: Arc<dyn CapabilityEventEmitter> = Arc::new(emitter);
        let port: Arc<dyn RegistryPort> = registry.clone();
        let sync = Arc::new(ActiveSetSynchronizer::new(port.clone(), Arc::new(capdeck_core::NoopEmitter)));
        let catalog = Catalog::new(vec![
            ServerDescriptor::new("srvA", "Alpha"),
            ServerDescriptor::new("srvB", "Beta"),
            ServerDescriptor::new("srvC", "Gamma"),
        ])
        .unwrap();
        Fixture {
            controller: SelectionController::new(GuiDeps::new(port, sync, emitter), catalog),
            registry,
            events,
        }
    }

    #[tokio::test]
    async fn test_enter_on_available_item_opens_add_modal() {
        let mut fx = fixture(InMemoryRegistry::new().with_detail(search_detail("srvA")));
        fx.controller.refresh().await.unwrap();
        fx.controller.open_dropdown();

        let outcome = fx.controller.on_key(Key::Enter).await.unwrap();
        let KeyOutcome::ModalOpened(Some(view)) = outcome else {
            panic!("Expected modal, got {outcome:?}");
        };
        assert_eq!(view.server_id, "srvA");
        assert_eq!(view.mode, ModalMode::Add);
        assert_eq!(fx.controller.view().phase, DropdownPhase::Closed);
        assert!(fx.events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_enter_on_active_item_removes_it() {
        let mut fx = fixture(InMemoryRegistry::new().with_active(["srvB"]));
        fx.controller.refresh().await.unwrap();
        fx.controller.open_dropdown();

        let outcome = fx.controller.on_key(Key::Enter).await.unwrap();
        assert!(matches!(outcome, KeyOutcome::Removed(ref o) if o.result.removed == vec!["srvB"]));
        assert!(fx.registry.active_ids().is_empty());
        assert_eq!(fx.events.try_recv().unwrap().event_name(), "server:removed");
    }

    #[tokio::test]
    async fn test_keys_ignored_while_closed() {
        let fx = fixture(InMemoryRegistry::new());
        let outcome = fx.controller.on_key(Key::Enter).await.unwrap();
        assert!(matches!(outcome, KeyOutcome::Ignored));
        assert_eq!(fx.registry.mutate_calls(), 0);
    }

    #[tokio::test]
    async fn test_validation_keeps_modal_open() {
        let fx = fixture(InMemoryRegistry::new().with_detail(search_detail("srvA")));
        fx.controller.open_add("srvA").await.unwrap();

        let err = fx.controller.submit().await.unwrap_err();
        assert!(matches!(err, GuiError::Validation(_)));

        let modal = fx.controller.modal().unwrap();
        assert!(modal.submit_error.unwrap().contains("apiKey"));
        assert!(!modal.submitting);
        assert_eq!(fx.registry.mutate_calls(), 0);
    }

    #[tokio::test]
    async fn test_submit_closes_modal_and_emits_added() {
        let mut fx = fixture(InMemoryRegistry::new().with_detail(search_detail("srvA")));
        fx.controller.open_add("srvA").await.unwrap();
        fx.controller.set_field("apiKey", json!("xyz")).unwrap();
        fx.controller.set_field_raw("enabled", "yes").unwrap();

        let outcome = fx.controller.submit().await.unwrap();
        assert!(outcome.active.contains("srvA"));
        assert!(fx.controller.modal().is_none());
        assert_eq!(
            fx.controller.last_config("srvA"),
            json!({"apiKey": "xyz", "enabled": true}).as_object().cloned()
        );

        let event = fx.events.try_recv().unwrap();
        assert_eq!(event.event_name(), "server:added");
        assert_eq!(event.servers(), Some(&["srvA".to_string()][..]));
    }

    #[tokio::test]
    async fn test_edit_prepopulates_from_last_submission() {
        let fx = fixture(InMemoryRegistry::new().with_detail(search_detail("srvA")));
        fx.controller.open_add("srvA").await.unwrap();
        fx.controller.set_field("apiKey", json!("xyz")).unwrap();
        fx.controller.submit().await.unwrap();

        let view = fx.controller.open_edit("srvA").await.unwrap().unwrap();
        assert_eq!(view.mode, ModalMode::Edit);
        assert_eq!(view.field("apiKey").unwrap().display, "***");
        assert!(fx.controller.toggle_secret("apiKey").unwrap());
        assert_eq!(fx.controller.modal().unwrap().field("apiKey").unwrap().display, "xyz");
    }

    #[tokio::test]
    async fn test_edit_requires_active_server() {
        let fx = fixture(InMemoryRegistry::new());
        let err = fx.controller.open_edit("srvA").await.unwrap_err();
        assert!(matches!(err, GuiError::NotFound { .. }));
        assert!(fx.controller.modal().is_none());
    }

    #[tokio::test]
    async fn test_missing_detail_opens_schemaless_modal() {
        let fx = fixture(InMemoryRegistry::new());
        let view = fx.controller.open_add("srvC").await.unwrap().unwrap();

        assert!(view.fields.is_empty());
        assert!(view.schema_error.unwrap().contains("srvC"));
        assert!(!view.loading);
        assert_eq!(fx.registry.detail_calls(), 1);
    }

    #[tokio::test]
    async fn test_failed_mutation_keeps_modal_open() {
        let fx = fixture(InMemoryRegistry::new().with_detail(search_detail("srvA")));
        fx.controller.open_add("srvA").await.unwrap();
        fx.controller.set_field("apiKey", json!("xyz")).unwrap();
        fx.registry.fail_next_mutate(RegistryPortError::status(500, "Configuration file not found"));

        let err = fx.controller.submit().await.unwrap_err();
        assert!(matches!(err, GuiError::Sync(_)));

        let modal = fx.controller.modal().unwrap();
        assert!(modal.submit_error.unwrap().contains("Configuration file not found"));
        assert!(!modal.submitting);
        assert!(fx.controller.view().sync.servers.is_empty());
    }

    #[tokio::test]
    async fn test_install_failure_reports_inline() {
        let fx = fixture(InMemoryRegistry::new().with_detail(search_detail("srvA")));
        fx.registry.fail_installation_of("srvA");
        fx.controller.open_add("srvA").await.unwrap();
        fx.controller.set_field("apiKey", json!("xyz")).unwrap();

        let err = fx.controller.submit().await.unwrap_err();
        assert!(matches!(err, GuiError::InstallationFailed { ref server_id } if server_id == "srvA"));
        assert_eq!(fx.controller.modal().unwrap().submit_error.as_deref(), Some("srvA failed to install"));
        assert!(fx.controller.last_config("srvA").is_none());
    }

    #[tokio::test]
    async fn test_dropped_submit_releases_modal() {
        let fx = fixture(InMemoryRegistry::new().with_detail(search_detail("srvA")));
        fx.controller.open_add("srvA").await.unwrap();
        fx.controller.set_field("apiKey", json!("x")).unwrap();
        fx.registry.push_list_delay(Duration::from_millis(200));

        let timed_out = tokio::time::timeout(Duration::from_millis(20), fx.controller.submit()).await;
        assert!(timed_out.is_err());

        let modal = fx.controller.modal().unwrap();
        assert!(!modal.submitting);
        assert_eq!(modal.submit_error.as_deref(), Some(SUBMIT_INTERRUPTED));
        assert!(fx.controller.view().sync.error().is_some());
        assert!(fx.controller.set_field("apiKey", json!("xyz")).is_ok());

        let active = fx.controller.refresh().await.unwrap();
        assert!(active.contains("srvA"));

        let outcome = fx.controller.submit().await.unwrap();
        assert_eq!(outcome.result.updated, vec!["srvA"]);
        assert!(fx.controller.modal().is_none());
        assert_eq!(
            fx.controller.last_config("srvA"),
            json!({"apiKey": "xyz"}).as_object().cloned()
        );
    }

    #[tokio::test]
    async fn test_field_edits_need_open_modal() {
        let fx = fixture(InMemoryRegistry::new());
        let err = fx.controller.set_field("apiKey", json!("x")).unwrap_err();
        assert!(matches!(err, GuiError::NoModalOpen));
    }

    #[tokio::test]
    async fn test_discover_extends_catalog() {
        let fx = fixture(InMemoryRegistry::new().with_catalog(vec![
            ServerDescriptor::new("srvA", "Alpha"),
            ServerDescriptor::new("@acme/maps", "Maps"),
        ]));

        let discovery = fx.controller.discover("", 1).await.unwrap();
        assert_eq!(discovery.added, 1);
        assert_eq!(discovery.page.total_count, 2);
        assert_eq!(fx.controller.catalog_view().available.len(), 4);
    }
}
