//! CSPRNG facade and state machine.
//!
//! The public contract of the accumulator: mix events in, watch the
//! entropy level, draw output once the gate opens. Single logical
//! owner per instance; the shared handle serializes concurrent use
//! under one lock.

mod engine;
mod shared;

pub use engine::{Csprng, CsprngError, State};
pub use shared::SharedCsprng;
