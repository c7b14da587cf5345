//! Event source abstraction for input collection.
//!
//! This module provides a trait-based abstraction over the input device,
//! allowing for both real interactive input and scripted implementations
//! for testing. Sources are glue: the core makes no assumption about how
//! events arrive, only that each call delivers one discrete event.

use super::Event;
use std::collections::VecDeque;
use std::io::BufRead;
use thiserror::Error;

/// Errors that can occur while collecting events.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("event source not open")]
    NotOpen,
    #[error("event source exhausted")]
    Exhausted,
    #[error("failed to read event: {0}")]
    ReadFailed(String),
}

/// Trait for event source implementations.
///
/// This abstraction allows swapping between real keyboard input
/// and scripted implementations for testing.
pub trait EventSource {
    /// Opens the source and prepares it for delivery.
    fn open(&mut self) -> Result<(), SourceError>;

    /// Delivers the next discrete event.
    fn next_event(&mut self) -> Result<Event, SourceError>;

    /// Checks if the source is currently open.
    fn is_open(&self) -> bool;

    /// Closes the source and releases resources.
    fn close(&mut self);
}

/// Scripted event source for testing and demonstration.
///
/// Replays a fixed list of payloads with synthetic arrival times.
/// NOT a source of entropy - only for exercising the pipeline.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    script: VecDeque<(Vec<u8>, u64)>,
    open: bool,
    sequence: u64,
}

impl ScriptedSource {
    /// Creates a source that replays `(payload, arrival_micros)` pairs.
    pub fn new(script: impl IntoIterator<Item = (Vec<u8>, u64)>) -> Self {
        Self {
            script: script.into_iter().collect(),
            open: false,
            sequence: 0,
        }
    }

    /// Creates a source replaying one payload per byte of `text`, spaced
    /// by a fixed interval plus a small deterministic wobble.
    pub fn from_text(text: &str, base_interval_micros: u64) -> Self {
        let script = text
            .bytes()
            .enumerate()
            .map(|(i, b)| {
                let wobble = (b as u64).wrapping_mul(i as u64 + 1) % 977;
                (vec![b], (i as u64 + 1) * base_interval_micros + wobble)
            })
            .collect::<Vec<_>>();
        Self::new(script)
    }

    /// Returns the number of events remaining.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl EventSource for ScriptedSource {
    fn open(&mut self) -> Result<(), SourceError> {
        self.open = true;
        self.sequence = 0;
        tracing::info!(events = self.script.len(), "ScriptedSource opened");
        Ok(())
    }

    fn next_event(&mut self) -> Result<Event, SourceError> {
        if !self.open {
            return Err(SourceError::NotOpen);
        }
        let (bytes, arrival) = self.script.pop_front().ok_or(SourceError::Exhausted)?;
        self.sequence += 1;
        Ok(Event::with_arrival(bytes, arrival, self.sequence))
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn close(&mut self) {
        self.open = false;
        tracing::info!("ScriptedSource closed");
    }
}

/// Event source backed by buffered line input.
///
/// Each line read becomes one event, stamped with its real arrival
/// time. This is the interactive path for the CLI driver: the operator
/// types, and inter-line timing contributes jitter entropy.
pub struct ReaderSource<R: BufRead> {
    reader: R,
    open: bool,
    sequence: u64,
}

impl<R: BufRead> ReaderSource<R> {
    /// Creates a source reading line-delimited events from `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            open: false,
            sequence: 0,
        }
    }
}

impl<R: BufRead> EventSource for ReaderSource<R> {
    fn open(&mut self) -> Result<(), SourceError> {
        self.open = true;
        self.sequence = 0;
        Ok(())
    }

    fn next_event(&mut self) -> Result<Event, SourceError> {
        if !self.open {
            return Err(SourceError::NotOpen);
        }
        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .map_err(|e| SourceError::ReadFailed(e.to_string()))?;
        if read == 0 {
            return Err(SourceError::Exhausted);
        }
        // Strip the newline; the keystroke content is the payload.
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        self.sequence += 1;
        Ok(Event::new(line.into_bytes(), self.sequence))
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn close(&mut self) {
        self.open = false;
    }
}
