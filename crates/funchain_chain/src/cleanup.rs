//! Deferred cleanups.
//!
//! Cleanups are zero-argument procedures registered with
//! [`Chain::defer`](crate::Chain::defer). They run once per execution, after
//! the chain reaches a terminal state, in reverse registration order.

use funchain_system::invoke::contain;

/// A deferred cleanup procedure.
pub type Cleanup = Box<dyn Fn() + Send + Sync>;

/// Guard that runs a list of cleanups when dropped.
///
/// Cleanups run last-registered-first, each inside its own panic boundary.
/// Because the work happens in [`Drop`], the cleanups also run when the
/// guarded scope is left early or unwinds.
///
/// ```
/// use funchain_chain::cleanup::{Cleanup, CleanupStack};
/// use std::sync::{Arc, Mutex};
///
/// let order = Arc::new(Mutex::new(Vec::new()));
/// let cleanups: Vec<Cleanup> = (1..=3)
///     .map(|n| {
///         let order = order.clone();
///         Box::new(move || order.lock().unwrap().push(n)) as Cleanup
///     })
///     .collect();
///
/// drop(CleanupStack::new(&cleanups));
/// assert_eq!(*order.lock().unwrap(), [3, 2, 1]);
/// ```
#[must_use = "cleanups run when the guard is dropped"]
pub struct CleanupStack<'a> {
    cleanups: &'a [Cleanup],
}

impl<'a> CleanupStack<'a> {
    /// Guards `cleanups`.
    pub fn new(cleanups: &'a [Cleanup]) -> Self {
        Self { cleanups }
    }

    /// Returns the number of guarded cleanups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cleanups.len()
    }

    /// Returns `true` if there is nothing to run.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cleanups.is_empty()
    }
}

impl Drop for CleanupStack<'_> {
    fn drop(&mut self) {
        for (index, cleanup) in self.cleanups.iter().enumerate().rev() {
            if let Err(message) = contain(cleanup) {
                tracing::warn!(index, %message, "cleanup panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn recording(log: &Arc<Mutex<Vec<&'static str>>>, label: &'static str) -> Cleanup {
        let log = log.clone();
        Box::new(move || log.lock().push(label))
    }

    #[test]
    fn runs_in_reverse_order_on_drop() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let cleanups = vec![recording(&log, "c1"), recording(&log, "c2"), recording(&log, "c3")];

        let guard = CleanupStack::new(&cleanups);
        assert_eq!(guard.len(), 3);
        assert!(log.lock().is_empty());
        drop(guard);

        assert_eq!(*log.lock(), ["c3", "c2", "c1"]);
    }

    fn failing_cleanup() {
        panic!("cleanup failed");
    }

    #[test]
    fn panicking_cleanup_does_not_stop_the_rest() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let cleanups = vec![
            recording(&log, "first"),
            Box::new(failing_cleanup) as Cleanup,
            recording(&log, "last"),
        ];

        drop(CleanupStack::new(&cleanups));
        assert_eq!(*log.lock(), ["last", "first"]);
    }

    #[test]
    fn runs_when_scope_unwinds() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let cleanups = vec![recording(&log, "ran")];

        let result: Result<(), String> = contain(|| {
            let _guard = CleanupStack::new(&cleanups);
            panic!("driver failure");
        });

        assert_eq!(result, Err("driver failure".to_string()));
        assert_eq!(*log.lock(), ["ran"]);
    }
}
