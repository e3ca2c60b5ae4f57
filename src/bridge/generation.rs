//! Generation identity and cancellation ownership.
//!
//! Each accepted request value starts a generation. Generations are
//! numbered per connection; the outbound writer remembers the newest
//! promoted number so relays of older generations can be told apart.

use tokio_util::sync::CancellationToken;

/// Identifier of one generation within a bridge instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GenerationId(u64);

impl GenerationId {
    /// Sentinel for "no generation yet"; real generations start at 1.
    pub const NONE: GenerationId = GenerationId(0);

    /// The id following this one.
    pub fn successor(self) -> GenerationId {
        GenerationId(self.0 + 1)
    }

    /// Get the raw id value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for GenerationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "gen-{}", self.0)
    }
}

/// One accepted request value together with its cancellation handle.
///
/// Dropping a `Generation` does not cancel it; cancellation is always an
/// explicit act of the controller.
#[derive(Debug)]
pub struct Generation {
    /// Position of this generation in the connection's sequence.
    pub id: GenerationId,
    /// The request value that started it.
    pub value: f32,
    cancel: CancellationToken,
}

impl Generation {
    /// Start a new generation for `value`.
    pub fn new(id: GenerationId, value: f32) -> Self {
        Self {
            id,
            value,
            cancel: CancellationToken::new(),
        }
    }

    /// Clone the cancellation handle for the relay task.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Cancel this generation's backend stream.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}
