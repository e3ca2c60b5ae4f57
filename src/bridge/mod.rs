//! Supersession bridge subsystem.
//!
//! # Data Flow
//! ```text
//! Client frame
//!     → parse.rs (text → finite f32, or discard)
//!     → controller.rs (cancel current generation, open new stream)
//!     → relay.rs (one task per stream, records → JSON)
//!     → outbound.rs (gated, serialized writes to the client)
//!
//! Generations:
//!     value n accepted → generation n promoted → stream n opened
//!     value n+1 accepted → generation n cancelled → n+1 promoted → ...
//! ```
//!
//! # Design Decisions
//! - The connection task owns reads; relays own only their stream
//! - The write gate lives with the sink, under the same lock
//! - At most one generation per connection is ever current

pub mod controller;
pub mod generation;
pub mod outbound;
pub mod parse;
pub mod relay;

pub use controller::{run_bridge, GenerationController};
pub use generation::{Generation, GenerationId};
