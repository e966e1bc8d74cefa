//! The dynamic invoker.
//!
//! [`invoke`] runs one [`Step`] against an argument vector:
//!
//! 1. rejects non-callable steps ([`InvokeError::NotCallable`])
//! 2. rejects callables with more than one error slot
//!    ([`InvokeError::MultipleErrorOutputs`]) without running them
//! 3. binds and pads the arguments (see [`param`](crate::param))
//! 4. runs the callable inside a panic boundary ([`contain`])
//! 5. splits the produced slots into ordinary outputs and the optional error
//!
//! The invoker never panics on behalf of a callable; every failure is
//! reported through [`StepOutcome::error`].
//!
//! [`contain`] catches the unwind but does not touch the process-wide panic
//! hook, so the default hook still prints `thread '..' panicked at ..` to
//! stderr for panics that end up as ordinary errors. Install a quieter hook
//! with [`std::panic::set_hook`] if that output is unwanted.

use core::any::Any;
use core::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::callable::{BoxedCallable, Callable, IntoCallable, InvokeError, Signature};
use crate::output::SlotValue;
use crate::param::{Arguments, IntoValue};
use crate::value::Value;

/// A registered chain step.
pub enum Step {
    /// An invocable step.
    Callable(BoxedCallable),
    /// A value registered where a callable was expected.
    Inert(Value),
}

impl Step {
    /// Creates a callable step from any [`IntoCallable`] type.
    pub fn new<M>(callable: impl IntoCallable<M>) -> Self {
        Step::Callable(Box::new(callable.into_callable()))
    }

    /// Creates a non-callable step holding `value`.
    pub fn inert(value: impl IntoValue) -> Self {
        Step::Inert(value.into_value())
    }

    /// Returns `true` if this step can be invoked.
    #[must_use]
    pub fn is_callable(&self) -> bool {
        matches!(self, Step::Callable(_))
    }

    /// Returns the step's name for debugging and tracing.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Step::Callable(callable) => callable.name(),
            Step::Inert(_) => "<inert>",
        }
    }

    /// Returns the callable's signature, or `None` for an inert step.
    #[must_use]
    pub fn signature(&self) -> Option<Signature> {
        match self {
            Step::Callable(callable) => Some(callable.signature()),
            Step::Inert(_) => None,
        }
    }
}

impl From<BoxedCallable> for Step {
    fn from(callable: BoxedCallable) -> Self {
        Step::Callable(callable)
    }
}

impl From<Value> for Step {
    fn from(value: Value) -> Self {
        Step::Inert(value)
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Callable(callable) => f.debug_tuple("Callable").field(&callable.name()).finish(),
            Step::Inert(value) => f.debug_tuple("Inert").field(value).finish(),
        }
    }
}

/// Result of invoking one step.
#[derive(Debug, Default)]
pub struct StepOutcome {
    /// Ordinary outputs, in declared order.
    pub outputs: Vec<Value>,
    /// The step's error, if any.
    pub error: Option<InvokeError>,
}

impl StepOutcome {
    /// An outcome with no outputs and the given error.
    #[must_use]
    pub fn failed(error: InvokeError) -> Self {
        Self {
            outputs: Vec::new(),
            error: Some(error),
        }
    }

    /// Returns `true` when no error was produced.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Converts into a `Result`, discarding outputs on failure.
    ///
    /// # Errors
    ///
    /// Returns the step's [`InvokeError`] if one was produced.
    pub fn into_result(self) -> Result<Vec<Value>, InvokeError> {
        match self.error {
            None => Ok(self.outputs),
            Some(err) => Err(err),
        }
    }
}

/// Invokes `step` with `args`, dropping excess arguments.
pub fn invoke(step: &Step, args: Vec<Value>) -> StepOutcome {
    invoke_with(step, Arguments::new(args))
}

/// Invokes `step` with a prepared argument cursor.
pub fn invoke_with(step: &Step, args: Arguments) -> StepOutcome {
    let callable = match step {
        Step::Callable(callable) => callable,
        Step::Inert(value) => {
            return StepOutcome::failed(InvokeError::NotCallable { kind: value.kind() });
        }
    };
    invoke_callable(&**callable, args)
}

/// Invokes a callable directly.
pub fn invoke_callable(callable: &dyn Callable, args: Arguments) -> StepOutcome {
    if let Err(err) = callable.signature().error_position() {
        return StepOutcome::failed(err);
    }

    match contain(|| callable.call(args)) {
        Ok(Ok(slots)) => split(slots),
        Ok(Err(err)) => StepOutcome::failed(err),
        Err(message) => StepOutcome::failed(InvokeError::Panicked { message }),
    }
}

/// Separates ordinary outputs from the error slot.
///
/// A callable that fills more error slots than its signature declares keeps
/// only the first error.
fn split(slots: Vec<SlotValue>) -> StepOutcome {
    let mut outcome = StepOutcome {
        outputs: Vec::with_capacity(slots.len()),
        error: None,
    };
    for slot in slots {
        match slot {
            SlotValue::Value(value) => outcome.outputs.push(value),
            SlotValue::Error(Some(err)) if outcome.error.is_none() => {
                outcome.error = Some(InvokeError::Step(err));
            }
            SlotValue::Error(Some(err)) => {
                tracing::debug!(%err, "dropping extra error output");
            }
            SlotValue::Error(None) => {}
        }
    }
    outcome
}

/// Runs `f`, converting a panic into its rendered payload.
///
/// The global panic hook still runs before the unwind is caught.
///
/// # Errors
///
/// Returns the panic message if `f` panicked.
pub fn contain<R>(f: impl FnOnce() -> R) -> Result<R, String> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|payload| panic_message(payload.as_ref()))
}

/// Renders a panic payload.
#[must_use]
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
