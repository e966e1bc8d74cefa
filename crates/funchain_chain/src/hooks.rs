//! Lifecycle hooks fired around each step.
//!
//! Hooks are observers: they see the values flowing through a chain but
//! cannot change them. Three lists are kept, one per [`HookKind`]:
//!
//! | Kind | Fired | Receives |
//! |------|-------|----------|
//! | [`Before`](HookKind::Before) | before every step | the step's arguments |
//! | [`After`](HookKind::After) | after every step, failed or not | arguments and outputs |
//! | [`Error`](HookKind::Error) | after a failed step | outputs and the error |
//!
//! Hooks fire in registration order. Each one runs inside its own panic
//! boundary, so a panicking hook is logged and its siblings still run.
//!
//! # Example
//!
//! ```
//! use funchain_chain::Chain;
//! use funchain_system::value::Value;
//!
//! let mut chain = Chain::new();
//! chain
//!     .then(|| 2i64)
//!     .before(|args: &[Value]| tracing::info!(count = args.len(), "step starting"))
//!     .on_error(|_outputs: &[Value], err| tracing::error!(%err, "step failed"));
//!
//! assert!(chain.execute().is_ok());
//! ```

use core::fmt;

use funchain_system::callable::InvokeError;
use funchain_system::invoke::contain;
use funchain_system::value::Value;

/// Hook fired before a step with its arguments.
pub type BeforeHook = Box<dyn Fn(&[Value]) + Send + Sync>;

/// Hook fired after a step with its arguments and outputs.
pub type AfterHook = Box<dyn Fn(&[Value], &[Value]) + Send + Sync>;

/// Hook fired after a failed step with its outputs and error.
pub type ErrorHook = Box<dyn Fn(&[Value], &InvokeError) + Send + Sync>;

/// The lifecycle point a hook is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    /// Before each step.
    Before,
    /// After each step.
    After,
    /// After a failed step.
    Error,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookKind::Before => f.write_str("before"),
            HookKind::After => f.write_str("after"),
            HookKind::Error => f.write_str("error"),
        }
    }
}

/// The three hook lists of a chain.
///
/// Empty entries (`None`) are kept so registration order is preserved, and
/// skipped when firing.
#[derive(Default)]
pub struct Hooks {
    before: Vec<Option<BeforeHook>>,
    after: Vec<Option<AfterHook>>,
    error: Vec<Option<ErrorHook>>,
}

impl Hooks {
    /// Creates empty hook lists.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends entries to the before-step list.
    pub fn extend_before(&mut self, hooks: impl IntoIterator<Item = Option<BeforeHook>>) {
        self.before.extend(hooks);
    }

    /// Appends entries to the after-step list.
    pub fn extend_after(&mut self, hooks: impl IntoIterator<Item = Option<AfterHook>>) {
        self.after.extend(hooks);
    }

    /// Appends entries to the error list.
    pub fn extend_error(&mut self, hooks: impl IntoIterator<Item = Option<ErrorHook>>) {
        self.error.extend(hooks);
    }

    /// Returns the number of registered entries of `kind`, empty ones included.
    #[must_use]
    pub fn count(&self, kind: HookKind) -> usize {
        match kind {
            HookKind::Before => self.before.len(),
            HookKind::After => self.after.len(),
            HookKind::Error => self.error.len(),
        }
    }

    /// Fires the before-step hooks of step `step`.
    pub fn fire_before(&self, step: usize, args: &[Value]) {
        fire(HookKind::Before, step, &self.before, |hook| hook(args));
    }

    /// Fires the after-step hooks of step `step`.
    pub fn fire_after(&self, step: usize, args: &[Value], outputs: &[Value]) {
        fire(HookKind::After, step, &self.after, |hook| hook(args, outputs));
    }

    /// Fires the error hooks of step `step`.
    pub fn fire_error(&self, step: usize, outputs: &[Value], err: &InvokeError) {
        fire(HookKind::Error, step, &self.error, |hook| hook(outputs, err));
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("before", &self.before.len())
            .field("after", &self.after.len())
            .field("error", &self.error.len())
            .finish()
    }
}

fn fire<H: ?Sized>(kind: HookKind, step: usize, hooks: &[Option<Box<H>>], call: impl Fn(&H)) {
    for (index, hook) in hooks.iter().enumerate() {
        let Some(hook) = hook else {
            continue;
        };
        if let Err(message) = contain(|| call(&**hook)) {
            tracing::warn!(%kind, step, index, %message, "hook panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, Arc<Mutex<Vec<String>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        (log.clone(), log)
    }

    #[test]
    fn empty_entries_are_counted_and_skipped() {
        let (log, seen) = recorder();
        let mut hooks = Hooks::new();
        hooks.extend_before([
            None,
            Some(Box::new(move |args: &[Value]| seen.lock().push(args.len().to_string())) as BeforeHook),
            None,
        ]);

        assert_eq!(hooks.count(HookKind::Before), 3);
        hooks.fire_before(0, &[Value::Nil, Value::Nil]);
        assert_eq!(*log.lock(), ["2"]);
    }

    fn exploding_after(_: &[Value], _: &[Value]) {
        panic!("first");
    }

    #[test]
    fn panicking_hook_does_not_stop_siblings() {
        let (log, seen) = recorder();
        let mut hooks = Hooks::new();
        hooks.extend_after([
            Some(Box::new(exploding_after) as AfterHook),
            Some(Box::new(move |_: &[Value], outputs: &[Value]| {
                seen.lock().push(outputs[0].to_string());
            }) as AfterHook),
        ]);

        hooks.fire_after(1, &[], &[Value::Int(5)]);
        assert_eq!(*log.lock(), ["5"]);
    }

    #[test]
    fn error_hooks_receive_the_error() {
        let (log, seen) = recorder();
        let mut hooks = Hooks::new();
        hooks.extend_error([Some(Box::new(move |_: &[Value], err: &InvokeError| {
            seen.lock().push(err.to_string());
        }) as ErrorHook)]);

        hooks.fire_error(0, &[], &InvokeError::Step("boom".into()));
        assert_eq!(*log.lock(), ["boom"]);
    }

    #[test]
    fn hook_kind_display() {
        assert_eq!(HookKind::Before.to_string(), "before");
        assert_eq!(HookKind::Error.to_string(), "error");
    }
}
