//! Chain execution.
//!
//! [`Chain::execute`] runs the steps in order on the calling thread:
//!
//! ```text
//! args = []
//! for each step:
//!     before hooks(args)
//!     (outputs, error) = invoke(step, args)
//!     after hooks(args, outputs)
//!     if error: error hooks(outputs, error); stop  -> Err(ChainError)
//!     args = outputs
//! bind args into destinations                      -> Ok(args)
//! cleanups, last registered first (always)
//! ```
//!
//! Panics raised by steps become [`InvokeError::Panicked`]; panics raised by
//! hooks and cleanups are logged and otherwise ignored.

use funchain_system::callable::InvokeError;
use funchain_system::invoke::invoke_with;
use funchain_system::param::Arguments;
use funchain_system::value::Value;

use crate::bind::{BindTarget, bind_all};
use crate::chain::Chain;
use crate::cleanup::CleanupStack;

/// A failed chain execution.
///
/// Carries the failing step's position and name, the outputs it produced
/// before failing, and its error.
#[derive(Debug, thiserror::Error)]
#[error("step {step} ({name}) failed: {source}")]
pub struct ChainError {
    step: usize,
    name: &'static str,
    outputs: Vec<Value>,
    source: InvokeError,
}

impl ChainError {
    /// Returns the zero-based position of the failing step.
    #[must_use]
    pub fn step(&self) -> usize {
        self.step
    }

    /// Returns the failing step's name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the ordinary outputs of the failing step.
    #[must_use]
    pub fn outputs(&self) -> &[Value] {
        &self.outputs
    }

    /// Returns the step's error.
    #[must_use]
    pub fn kind(&self) -> &InvokeError {
        &self.source
    }

    /// Splits into the failing step's outputs and error.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Value>, InvokeError) {
        (self.outputs, self.source)
    }
}

impl Chain {
    /// Runs the chain and returns the final step's outputs.
    ///
    /// An empty chain succeeds with no outputs.
    ///
    /// # Errors
    ///
    /// Returns a [`ChainError`] for the first step that fails. Later steps
    /// are not run.
    pub fn execute(&self) -> Result<Vec<Value>, ChainError> {
        self.execute_into(&mut [])
    }

    /// Runs the chain and binds the final outputs into `outputs`.
    ///
    /// On success, output `i` is written into `outputs[i]` for every position
    /// both sides have. Destinations that cannot hold their output are
    /// skipped. Nothing is bound when the chain fails.
    ///
    /// # Errors
    ///
    /// Returns a [`ChainError`] for the first step that fails.
    pub fn execute_into(
        &self,
        outputs: &mut [&mut dyn BindTarget],
    ) -> Result<Vec<Value>, ChainError> {
        let span = tracing::debug_span!("chain", name = %self.config.name, steps = self.steps.len());
        let _enter = span.enter();
        let _cleanups = CleanupStack::new(&self.cleanups);

        let mut current = Vec::new();
        for (index, step) in self.steps.iter().enumerate() {
            tracing::trace!(step = index, name = step.name(), args = current.len(), "running step");
            self.hooks.fire_before(index, &current);

            let args = Arguments::new(current.clone()).strict(self.config.strict_arity);
            let outcome = invoke_with(step, args);
            self.hooks.fire_after(index, &current, &outcome.outputs);

            if let Some(error) = outcome.error {
                tracing::debug!(step = index, name = step.name(), %error, "step failed");
                self.hooks.fire_error(index, &outcome.outputs, &error);
                return Err(ChainError {
                    step: index,
                    name: step.name(),
                    outputs: outcome.outputs,
                    source: error,
                });
            }
            current = outcome.outputs;
        }

        let bound = bind_all(&current, outputs);
        tracing::trace!(outputs = current.len(), bound, "chain finished");
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ChainConfig;
    use funchain_system::output::Fault;
    use funchain_system::param::ParamError;

    #[test]
    fn empty_chain_returns_no_outputs() {
        assert_eq!(Chain::new().execute().unwrap(), Vec::<Value>::new());
    }

    #[test]
    fn outputs_feed_the_next_step() {
        let mut chain = Chain::new();
        chain
            .then(|| (3i64, 4i64))
            .then(|a: i64, b: i64| a * b)
            .then(|n: i64| n + 1);
        assert_eq!(chain.execute().unwrap(), [Value::Int(13)]);
    }

    #[test]
    fn error_carries_step_position_and_outputs() {
        let mut chain = Chain::new();
        chain
            .then(|| 1i64)
            .then(|n: i64| (n, Fault::new("bad input")))
            .then(|_: i64| -> i64 { unreachable!("later steps never run") });

        let err = chain.execute().unwrap_err();
        assert_eq!(err.step(), 1);
        assert_eq!(err.outputs(), [Value::Int(1)]);
        assert!(matches!(err.kind(), InvokeError::Step(_)));
        assert!(err.to_string().ends_with("failed: bad input"));
    }

    #[test]
    fn strict_config_reports_excess_arguments() {
        let mut chain = Chain::new();
        chain
            .with_config(ChainConfig::new().with_strict_arity(true))
            .then(|| (1i64, 2i64))
            .then(|n: i64| n);

        let err = chain.execute().unwrap_err();
        assert!(matches!(
            err.kind(),
            InvokeError::Param(ParamError::ExcessArguments {
                expected: 1,
                supplied: 2,
            })
        ));
    }

    #[test]
    fn into_parts_returns_outputs_and_error() {
        let mut chain = Chain::new();
        chain.then(|| -> Result<i64, String> { Err("boom".to_string()) });

        let (outputs, error) = chain.execute().unwrap_err().into_parts();
        assert!(outputs.is_empty());
        assert_eq!(error.to_string(), "boom");
    }
}
