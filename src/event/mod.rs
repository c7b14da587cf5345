//! Input events and event collection.
//!
//! This module provides the event type fed into the accumulator and
//! trait-based abstractions for collecting events. The event source is
//! treated as a collaborator that supplies raw action data, not as a
//! source of entropy directly; crediting is the estimator's job.

mod keystroke;
mod source;

pub use keystroke::Event;
pub use source::{EventSource, ReaderSource, ScriptedSource, SourceError};
