//! Shared test utilities for `funchain_chain` integration tests.
//!
//! Import via `mod test_utils;` in test files.

#![allow(
    dead_code,
    missing_docs,
    reason = "shared test utilities, not all items used in every test binary"
)]

use funchain_chain::cleanup::Cleanup;
use funchain_system::output::Fault;
use funchain_system::value::Value;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

// ═══════════════════════════════════════════════════════════════════════════════
// RECORDERS
// ═══════════════════════════════════════════════════════════════════════════════

/// Ordered log of events recorded by steps, hooks and cleanups.
#[derive(Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<String>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one event.
    pub fn record(&self, event: impl Into<String>) {
        self.events.lock().push(event.into());
    }

    /// Returns all events in recording order.
    pub fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }

    /// Returns a cleanup that records `label`.
    pub fn cleanup(&self, label: &'static str) -> Cleanup {
        let log = self.clone();
        Box::new(move || log.record(label))
    }
}

/// Counts how many times something ran.
#[derive(Clone, Default)]
pub struct Counter {
    count: Arc<AtomicUsize>,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hit(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }

    pub fn get(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMMON STEPS
// ═══════════════════════════════════════════════════════════════════════════════

/// Produces `42` with an empty error slot.
pub fn answer() -> (i64, Fault) {
    (42, Fault::none())
}

/// Produces `7`.
pub fn seven() -> i64 {
    7
}

/// Multiplies two integers.
pub fn multiply(a: i64, b: i64) -> i64 {
    a * b
}

/// Renders an integer.
pub fn render(n: i64) -> String {
    n.to_string()
}

/// Always fails with "boom".
pub fn boom() -> Fault {
    Fault::new("boom")
}

/// Renders a value list for comparisons in hook logs.
pub fn show(values: &[Value]) -> String {
    let items: Vec<String> = values.iter().map(ToString::to_string).collect();
    format!("[{}]", items.join(", "))
}
