//! Active-set synchronizer - sole writer of the local active-set mirror.
//!
//! Every mutation is followed by a full re-fetch, and the mirror is replaced
//! wholesale on each successful refresh. Consumers observe the mirror through
//! `subscribe()` (a `watch` channel) or `snapshot()`.
//!
//! # Ordering
//!
//! - Refreshes are serialized behind a FIFO gate; a second caller waits for
//!   the first instead of interleaving writes.
//! - Each refresh takes a ticket when it is issued. A waiting refresh whose
//!   ticket is older than the last completed cycle is answered from that
//!   cycle without another fetch, so results land in issue order.
//! - Mutations are serialized behind their own gate, which is held across the
//!   induced refresh.
//! - A refresh or mutation dropped before it finishes leaves the phase at
//!   `Error`, never at `Loading`, so the UI keeps a retry affordance.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

use crate::domain::{ActiveSet, LaunchConfig, MutationRequest, MutationResult};
use crate::events::CapabilityEvent;
use crate::ports::{CapabilityEventEmitter, RegistryPort, RegistryPortError, RegistryPortResult};

/// Phase of the most recent refresh cycle.
///
/// `Success` and `Error` persist until the next cycle starts, so a UI can
/// render the outcome (or a retry affordance) after the call returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncPhase {
    #[default]
    Idle,
    Loading,
    Success,
    Error {
        message: String,
    },
}

/// What subscribers see.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSetSnapshot {
    /// Active ids as of the last successful refresh.
    pub servers: ActiveSet,
    pub phase: SyncPhase,
    /// Ticket of the refresh that produced `servers` (0 before the first).
    pub revision: u64,
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl ActiveSetSnapshot {
    pub fn contains(&self, id: &str) -> bool {
        self.servers.contains(id)
    }

    pub const fn is_loading(&self) -> bool {
        matches!(self.phase, SyncPhase::Loading)
    }

    /// Message of the last failed refresh, while that failure is current.
    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            SyncPhase::Error { message } => Some(message),
            _ => None,
        }
    }
}

/// Result of a mutation plus the active set fetched right after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationOutcome {
    pub result: MutationResult,
    pub active: ActiveSet,
}

/// Errors from synchronized mutations.
#[derive(Debug, Clone, Error)]
pub enum SyncError {
    /// The mutation call itself failed. The mirror was still refreshed.
    #[error("Mutation failed: {0}")]
    Mutation(#[source] RegistryPortError),

    /// The backend accepted the mutation but the follow-up refresh failed.
    #[error("Mutation applied but refresh failed: {source}")]
    Refresh {
        result: MutationResult,
        #[source]
        source: RegistryPortError,
    },
}

impl SyncError {
    /// The underlying port error.
    pub const fn port_error(&self) -> &RegistryPortError {
        match self {
            Self::Mutation(source) | Self::Refresh { source, .. } => source,
        }
    }

    /// What the backend reported, when the mutation got that far.
    pub const fn result(&self) -> Option<&MutationResult> {
        match self {
            Self::Mutation(_) => None,
            Self::Refresh { result, .. } => Some(result),
        }
    }
}

/// Phase message after a refresh future was dropped mid-fetch.
pub const REFRESH_CANCELLED: &str = "Refresh cancelled before it completed";

/// Phase message after a mutation future was dropped before its refresh.
pub const MUTATION_INTERRUPTED: &str = "Mutation interrupted before the active set was refreshed";

/// Moves the phase to `Error` if dropped while still armed.
struct InterruptGuard<'a> {
    state: &'a watch::Sender<ActiveSetSnapshot>,
    message: &'static str,
    armed: bool,
}

impl<'a> InterruptGuard<'a> {
    const fn new(state: &'a watch::Sender<ActiveSetSnapshot>, message: &'static str) -> Self {
        Self {
            state,
            message,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InterruptGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!(reason = self.message, "Active-set cycle dropped");
            self.state.send_modify(|s| {
                s.phase = SyncPhase::Error {
                    message: self.message.to_string(),
                };
            });
        }
    }
}

#[derive(Debug)]
struct RefreshMark {
    completed: u64,
    outcome: RegistryPortResult<()>,
}

/// Owns the active-set mirror.
pub struct ActiveSetSynchronizer {
    registry: Arc<dyn RegistryPort>,
    emitter: Arc<dyn CapabilityEventEmitter>,
    token: Option<String>,
    state: watch::Sender<ActiveSetSnapshot>,
    refresh_gate: Mutex<RefreshMark>,
    mutation_gate: Mutex<()>,
    issued: AtomicU64,
}

impl ActiveSetSynchronizer {
    pub fn new(registry: Arc<dyn RegistryPort>, emitter: Arc<dyn CapabilityEventEmitter>) -> Self {
        let (state, _) = watch::channel(ActiveSetSnapshot::default());
        Self {
            registry,
            emitter,
            token: None,
            state,
            refresh_gate: Mutex::new(RefreshMark {
                completed: 0,
                outcome: Ok(()),
            }),
            mutation_gate: Mutex::new(()),
            issued: AtomicU64::new(0),
        }
    }

    /// Token passed to every `list_active` call.
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> ActiveSetSnapshot {
        self.state.borrow().clone()
    }

    /// Active ids as of the last successful refresh.
    pub fn active(&self) -> ActiveSet {
        self.state.borrow().servers.clone()
    }

    /// Receiver notified on every phase change and mirror replacement.
    pub fn subscribe(&self) -> watch::Receiver<ActiveSetSnapshot> {
        self.state.subscribe()
    }

    /// Re-fetch the active set and replace the mirror with it.
    ///
    /// On failure the previous mirror is kept and the phase becomes `Error`.
    pub async fn refresh(&self) -> RegistryPortResult<ActiveSet> {
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let mut mark = self.refresh_gate.lock().await;

        if mark.completed >= ticket {
            debug!(ticket, completed = mark.completed, "Refresh answered by a newer cycle");
            return mark.outcome.clone().map(|()| self.active());
        }

        self.state.send_modify(|s| s.phase = SyncPhase::Loading);
        debug!(ticket, "Refreshing active set");

        let cancelled = InterruptGuard::new(&self.state, REFRESH_CANCELLED);
        let outcome = self.registry.list_active(self.token.as_deref()).await;
        cancelled.disarm();
        mark.completed = ticket;

        match outcome {
            Ok(servers) => {
                info!(ticket, count = servers.len(), "Active set refreshed");
                self.state.send_modify(|s| {
                    s.servers.clone_from(&servers);
                    s.phase = SyncPhase::Success;
                    s.revision = ticket;
                    s.refreshed_at = Some(Utc::now());
                });
                mark.outcome = Ok(());
                self.emitter.emit(CapabilityEvent::active_set_refreshed(
                    servers.iter().cloned(),
                    ticket,
                ));
                Ok(servers)
            }
            Err(e) => {
                warn!(ticket, error = %e, "Active set refresh failed");
                self.state.send_modify(|s| {
                    s.phase = SyncPhase::Error {
                        message: e.to_string(),
                    };
                });
                mark.outcome = Err(e.clone());
                self.emitter.emit(CapabilityEvent::refresh_failed(e.to_string()));
                Err(e)
            }
        }
    }

    /// Submit a batch, then refresh regardless of how the batch went.
    pub async fn apply(&self, request: MutationRequest) -> Result<MutationOutcome, SyncError> {
        let _serial = self.mutation_gate.lock().await;
        let interrupted = InterruptGuard::new(&self.state, MUTATION_INTERRUPTED);

        let mutated = self.registry.mutate(&request).await;
        match &mutated {
            Ok(result) => {
                info!(
                    added = ?result.added,
                    updated = ?result.updated,
                    removed = ?result.removed,
                    "Mutation accepted"
                );
                if result.has_installation_failures() {
                    warn!(failed = ?result.installation_failed, "Servers failed to install");
                    self.emitter.emit(CapabilityEvent::installation_failed(
                        result.installation_failed.clone(),
                    ));
                }
            }
            Err(e) => warn!(error = %e, "Mutation failed, refreshing anyway"),
        }

        let refreshed = self.refresh().await;
        interrupted.disarm();

        match (mutated, refreshed) {
            (Err(e), _) => Err(SyncError::Mutation(e)),
            (Ok(result), Err(source)) => Err(SyncError::Refresh { result, source }),
            (Ok(result), Ok(active)) => Ok(MutationOutcome { result, active }),
        }
    }

    /// Add `id`, or replace its launch config if it is already active.
    pub async fn add_or_update(
        &self,
        id: impl Into<String>,
        launch: LaunchConfig,
    ) -> Result<MutationOutcome, SyncError> {
        self.apply(MutationRequest::add_one(id, launch)).await
    }

    /// Remove `id`. Removing an absent id succeeds and changes nothing.
    pub async fn remove(&self, id: impl Into<String>) -> Result<MutationOutcome, SyncError> {
        self.apply(MutationRequest::remove_one(id)).await
    }
}
