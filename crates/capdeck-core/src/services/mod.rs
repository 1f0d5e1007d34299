//! Core services - the application's business logic layer.
//!
//! Services orchestrate between ports and domain logic. They don't know
//! about concrete implementations; the HTTP client and the event transport
//! are injected as trait objects.

mod active_set;

pub use active_set::{
    ActiveSetSnapshot, ActiveSetSynchronizer, MUTATION_INTERRUPTED, MutationOutcome, REFRESH_CANCELLED,
    SyncError, SyncPhase,
};
