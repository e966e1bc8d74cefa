//! Chain structure and builder API.
//!
//! A [`Chain`] is an ordered list of steps plus the cleanups and hooks that
//! surround its execution. Building is append-only; execution (see
//! [`executor`](crate::executor)) never mutates the chain, so a chain can be
//! executed any number of times.

use core::fmt;

use funchain_system::callable::{IntoCallable, InvokeError, Signature};
use funchain_system::invoke::Step;
use funchain_system::value::Value;

use crate::cleanup::Cleanup;
use crate::hooks::{AfterHook, BeforeHook, ErrorHook, HookKind, Hooks};

/// Execution settings of a [`Chain`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    /// Label recorded on the execution span.
    pub name: String,
    /// Reject excess trailing arguments instead of dropping them.
    pub strict_arity: bool,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            name: "chain".to_string(),
            strict_arity: false,
        }
    }
}

impl ChainConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the span label.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets whether excess arguments are a parameter error.
    #[must_use]
    pub fn with_strict_arity(mut self, strict: bool) -> Self {
        self.strict_arity = strict;
        self
    }
}

/// An ordered composition of steps.
///
/// Each step's ordinary outputs become the next step's arguments. The first
/// step receives no arguments.
///
/// # Example
///
/// ```
/// use funchain_chain::Chain;
/// use funchain_system::output::Fault;
///
/// let mut chain = Chain::new();
/// chain
///     .then(|| (42i64, Fault::none()))
///     .then(|n: i64| n.to_string());
///
/// let mut result = String::new();
/// chain.execute_into(&mut [&mut result]).unwrap();
/// assert_eq!(result, "42");
/// ```
#[derive(Default)]
pub struct Chain {
    pub(crate) steps: Vec<Step>,
    pub(crate) cleanups: Vec<Cleanup>,
    pub(crate) hooks: Hooks,
    pub(crate) config: ChainConfig,
}

impl Chain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a chain from `steps`, skipping any that are not callable.
    #[must_use]
    pub fn from_steps(steps: impl IntoIterator<Item = Step>) -> Self {
        let mut chain = Self::new();
        chain.append(steps);
        chain
    }

    /// Returns the chain's configuration.
    #[must_use]
    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Replaces the chain's configuration.
    pub fn with_config(&mut self, config: ChainConfig) -> &mut Self {
        self.config = config;
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Steps
    // ─────────────────────────────────────────────────────────────────────────

    /// Appends a callable step.
    pub fn then<M>(&mut self, step: impl IntoCallable<M>) -> &mut Self {
        self.steps.push(Step::new(step));
        self
    }

    /// Appends `steps`, skipping any that are not callable.
    pub fn append(&mut self, steps: impl IntoIterator<Item = Step>) -> &mut Self {
        for step in steps {
            if let Step::Inert(value) = &step {
                tracing::debug!(kind = %value.kind(), "skipping non-callable step");
                continue;
            }
            self.steps.push(step);
        }
        self
    }

    /// Appends `step` as is, callable or not.
    ///
    /// A non-callable step fails with [`InvokeError::NotCallable`] when the
    /// chain reaches it.
    pub fn push_step(&mut self, step: Step) -> &mut Self {
        self.steps.push(step);
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Cleanups and hooks
    // ─────────────────────────────────────────────────────────────────────────

    /// Registers a cleanup to run after every execution.
    pub fn defer(&mut self, cleanup: impl Fn() + Send + Sync + 'static) -> &mut Self {
        self.cleanups.push(Box::new(cleanup));
        self
    }

    /// Registers several cleanups, in order.
    pub fn defer_all(&mut self, cleanups: impl IntoIterator<Item = Cleanup>) -> &mut Self {
        self.cleanups.extend(cleanups);
        self
    }

    /// Registers a hook fired before each step with its arguments.
    pub fn before(&mut self, hook: impl Fn(&[Value]) + Send + Sync + 'static) -> &mut Self {
        self.hooks.extend_before([Some(Box::new(hook) as BeforeHook)]);
        self
    }

    /// Registers a hook fired after each step with its arguments and outputs.
    pub fn after(
        &mut self,
        hook: impl Fn(&[Value], &[Value]) + Send + Sync + 'static,
    ) -> &mut Self {
        self.hooks.extend_after([Some(Box::new(hook) as AfterHook)]);
        self
    }

    /// Registers a hook fired when a step fails.
    pub fn on_error(
        &mut self,
        hook: impl Fn(&[Value], &InvokeError) + Send + Sync + 'static,
    ) -> &mut Self {
        self.hooks.extend_error([Some(Box::new(hook) as ErrorHook)]);
        self
    }

    /// Registers before-step hooks; `None` entries are skipped when firing.
    pub fn before_hooks(&mut self, hooks: impl IntoIterator<Item = Option<BeforeHook>>) -> &mut Self {
        self.hooks.extend_before(hooks);
        self
    }

    /// Registers after-step hooks; `None` entries are skipped when firing.
    pub fn after_hooks(&mut self, hooks: impl IntoIterator<Item = Option<AfterHook>>) -> &mut Self {
        self.hooks.extend_after(hooks);
        self
    }

    /// Registers error hooks; `None` entries are skipped when firing.
    pub fn error_hooks(&mut self, hooks: impl IntoIterator<Item = Option<ErrorHook>>) -> &mut Self {
        self.hooks.extend_error(hooks);
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Introspection
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if the chain has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns the steps in execution order.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Returns each step's name, in order.
    #[must_use]
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(Step::name).collect()
    }

    /// Returns the signatures of the callable steps, in order.
    #[must_use]
    pub fn signatures(&self) -> Vec<Signature> {
        self.steps.iter().filter_map(Step::signature).collect()
    }

    /// Returns the number of registered cleanups.
    #[must_use]
    pub fn cleanup_count(&self) -> usize {
        self.cleanups.len()
    }

    /// Returns the number of registered hooks of `kind`, empty entries included.
    #[must_use]
    pub fn hook_count(&self, kind: HookKind) -> usize {
        self.hooks.count(kind)
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("steps", &self.steps)
            .field("cleanups", &self.cleanups.len())
            .field("hooks", &self.hooks)
            .field("config", &self.config)
            .finish()
    }
}

/// Builds a [`Chain`] from a list of callables.
///
/// ```
/// use funchain_chain::chain;
///
/// let chain = chain![|| 3i64, |n: i64| n * 2];
/// assert_eq!(chain.len(), 2);
/// ```
#[macro_export]
macro_rules! chain {
    () => {
        $crate::Chain::new()
    };
    ($($step:expr),+ $(,)?) => {{
        let mut chain = $crate::Chain::new();
        $(chain.then($step);)+
        chain
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use funchain_system::value::ValueKind;

    fn double(n: i64) -> i64 {
        n * 2
    }

    #[test]
    fn from_steps_skips_inert_steps() {
        let chain = Chain::from_steps([Step::new(double), Step::inert(5i64), Step::new(double)]);
        assert_eq!(chain.len(), 2);
        assert!(chain.steps().iter().all(Step::is_callable));
    }

    #[test]
    fn push_step_keeps_inert_steps() {
        let mut chain = Chain::new();
        chain.push_step(Step::inert("x"));
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.step_names(), ["<inert>"]);
        assert!(chain.signatures().is_empty());
    }

    #[test]
    fn builder_counts_registrations() {
        let mut chain = Chain::new();
        chain
            .then(double)
            .defer(|| {})
            .defer_all([Box::new(|| {}) as Cleanup])
            .before(|_| {})
            .before_hooks([None])
            .after(|_, _| {})
            .on_error(|_, _| {});

        assert_eq!(chain.cleanup_count(), 2);
        assert_eq!(chain.hook_count(HookKind::Before), 2);
        assert_eq!(chain.hook_count(HookKind::After), 1);
        assert_eq!(chain.hook_count(HookKind::Error), 1);
    }

    #[test]
    fn signatures_describe_steps() {
        let chain = chain![double, |s: String| s.len()];
        let signatures = chain.signatures();
        assert_eq!(signatures.len(), 2);
        assert_eq!(signatures[0].params, [ValueKind::Int]);
        assert_eq!(signatures[1].params, [ValueKind::Str]);
        assert!(chain.step_names()[0].ends_with("double"));
    }

    #[test]
    fn empty_macro_builds_empty_chain() {
        let chain = chain![];
        assert!(chain.is_empty());
    }

    #[test]
    fn config_builder() {
        let config = ChainConfig::new().with_name("ingest").with_strict_arity(true);
        let mut chain = Chain::new();
        chain.with_config(config.clone());
        assert_eq!(chain.config(), &config);
        assert_eq!(ChainConfig::default().name, "chain");
    }
}
