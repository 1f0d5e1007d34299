//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from
//! infrastructure. They contain no implementation details and use only
//! domain types.
//!
//! # Design Rules
//!
//! - No `reqwest` or `url` types in any signature
//! - Every failure is a `RegistryPortError`; adapters map their own errors
//! - Event transport (channels, terminals) stays behind `CapabilityEventEmitter`

mod error;
mod event_emitter;
mod registry;

pub use error::{RegistryPortError, RegistryPortResult};
pub use event_emitter::{CapabilityEventEmitter, ChannelEmitter, NoopEmitter};
pub use registry::RegistryPort;

#[cfg(test)]
pub use event_emitter::MockCapabilityEventEmitter;
