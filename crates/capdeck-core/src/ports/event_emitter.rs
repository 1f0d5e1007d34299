//! Event emitter trait for broadcasting capability events.
//!
//! Implementations handle transport details (channels, terminal output,
//! SSE, ...). This replaces an ambient shared store: whoever needs to react
//! to active-set changes is handed an emitter or a snapshot receiver.

use tokio::sync::mpsc;

use crate::events::CapabilityEvent;

/// Trait for emitting capability events.
///
/// # Implementations
///
/// - `NoopEmitter` - For tests and contexts with no listener
/// - `ChannelEmitter` - Forwards events into an unbounded tokio channel
#[cfg_attr(test, mockall::automock)]
pub trait CapabilityEventEmitter: Send + Sync {
    /// Emit an event. Must not block.
    fn emit(&self, event: CapabilityEvent);

    /// Clone this emitter into a boxed trait object.
    fn clone_box(&self) -> Box<dyn CapabilityEventEmitter>;
}

/// A no-op event emitter.
#[derive(Debug, Clone, Default)]
pub struct NoopEmitter;

impl NoopEmitter {
    /// Create a new no-op emitter.
    pub const fn new() -> Self {
        Self
    }
}

impl CapabilityEventEmitter for NoopEmitter {
    fn emit(&self, _event: CapabilityEvent) {}

    fn clone_box(&self) -> Box<dyn CapabilityEventEmitter> {
        Box::new(self.clone())
    }
}

/// Emitter that forwards every event into an unbounded channel.
///
/// Events are dropped silently once the receiver is gone.
#[derive(Debug, Clone)]
pub struct ChannelEmitter {
    tx: mpsc::UnboundedSender<CapabilityEvent>,
}

impl ChannelEmitter {
    /// Create an emitter and the receiver that observes it.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<CapabilityEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl CapabilityEventEmitter for ChannelEmitter {
    fn emit(&self, event: CapabilityEvent) {
        let _ = self.tx.send(event);
    }

    fn clone_box(&self) -> Box<dyn CapabilityEventEmitter> {
        Box::new(self.clone())
    }
}
