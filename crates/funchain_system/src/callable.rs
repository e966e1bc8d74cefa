//! Callable execution primitives.
//!
//! A [`Callable`] is a unit of computation that consumes an argument vector
//! and produces output slots. Plain Rust functions and closures become
//! callables through [`IntoCallable`]:
//!
//! ```
//! use funchain_system::callable::{Callable, IntoCallable};
//! use funchain_system::output::SlotKind;
//! use funchain_system::value::ValueKind;
//!
//! fn area(width: u32, height: u32) -> u64 {
//!     u64::from(width) * u64::from(height)
//! }
//!
//! let callable = area.into_callable();
//! let signature = callable.signature();
//! assert_eq!(signature.params, [ValueKind::UInt, ValueKind::UInt]);
//! assert_eq!(signature.outputs, [SlotKind::Value(ValueKind::UInt)]);
//! ```
//!
//! Each adapter is generated per arity (0 to 8 parameters) and knows its
//! parameter kinds and error-slot position without runtime reflection.

use core::fmt;
use core::marker::PhantomData;

use variadics_please::all_tuples;

use crate::output::{IntoOutputs, SlotKind, SlotValue};
use crate::param::{Arguments, FromValue, ParamError};
use crate::value::ValueKind;

/// Errors that can occur when invoking a step.
#[derive(Debug, thiserror::Error)]
pub enum InvokeError {
    /// The step is not invocable.
    #[error("step is not callable: got a {kind} value")]
    NotCallable {
        /// Kind of the value registered in place of a callable.
        kind: ValueKind,
    },

    /// The callable declares more than one error-capable output.
    #[error("callable declares {count} error outputs, at most one is allowed")]
    MultipleErrorOutputs {
        /// Number of declared error slots.
        count: usize,
    },

    /// The arguments could not be bound to the callable's parameters.
    #[error("parameter error: {0}")]
    Param(#[from] ParamError),

    /// The callable panicked.
    #[error("panic occurred: {message}")]
    Panicked {
        /// Rendered panic payload.
        message: String,
    },

    /// The callable returned an error through its error slot.
    #[error(transparent)]
    Step(crate::output::BoxError),
}

impl InvokeError {
    /// Returns `true` for configuration faults detected before the callable ran.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            InvokeError::NotCallable { .. }
                | InvokeError::MultipleErrorOutputs { .. }
                | InvokeError::Param(_)
        )
    }
}

/// The declared shape of a callable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// Callable name, for logging.
    pub name: &'static str,
    /// Declared parameter kinds, in order.
    pub params: Vec<ValueKind>,
    /// Declared output slots, in order.
    pub outputs: Vec<SlotKind>,
}

impl Signature {
    /// Creates a signature.
    #[must_use]
    pub fn new(name: &'static str, params: Vec<ValueKind>, outputs: Vec<SlotKind>) -> Self {
        Self {
            name,
            params,
            outputs,
        }
    }

    /// Returns the declared parameter count.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Returns the position of the single error slot, if one is declared.
    ///
    /// # Errors
    ///
    /// Returns [`InvokeError::MultipleErrorOutputs`] when more than one
    /// error slot is declared.
    pub fn error_position(&self) -> Result<Option<usize>, InvokeError> {
        let mut found = None;
        let mut count = 0;
        for (position, slot) in self.outputs.iter().enumerate() {
            if slot.is_error() {
                count += 1;
                found.get_or_insert(position);
            }
        }
        if count > 1 {
            return Err(InvokeError::MultipleErrorOutputs { count });
        }
        Ok(found)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        f.write_str(") -> (")?;
        for (i, slot) in self.outputs.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{slot}")?;
        }
        f.write_str(")")
    }
}

/// An invocable unit of computation.
///
/// Most users won't implement `Callable` directly. Instead, use functions or
/// closures with [`IntoCallable`]. Implement it by hand for shapes the
/// generated adapters don't cover, such as variadic steps:
///
/// ```
/// use funchain_system::callable::{Callable, InvokeError, Signature};
/// use funchain_system::output::{SlotKind, SlotValue};
/// use funchain_system::param::Arguments;
/// use funchain_system::value::{Value, ValueKind};
///
/// struct CountArgs;
///
/// impl Callable for CountArgs {
///     fn signature(&self) -> Signature {
///         Signature::new("count_args", Vec::new(), vec![SlotKind::Value(ValueKind::UInt)])
///     }
///
///     fn call(&self, args: Arguments) -> Result<Vec<SlotValue>, InvokeError> {
///         let count = args.supplied() as u64;
///         Ok(vec![SlotValue::Value(Value::UInt(count))])
///     }
/// }
/// ```
pub trait Callable: Send + Sync + 'static {
    /// Returns the declared shape of this callable.
    fn signature(&self) -> Signature;

    /// Binds `args` and runs the callable.
    ///
    /// # Errors
    ///
    /// Returns [`InvokeError::Param`] if the arguments cannot be bound.
    /// Errors reported through an error slot are returned as a
    /// [`SlotValue::Error`], not as `Err`.
    fn call(&self, args: Arguments) -> Result<Vec<SlotValue>, InvokeError>;

    /// Returns the callable's name for debugging and tracing.
    fn name(&self) -> &'static str {
        self.signature().name
    }
}

/// Boxed type-erased callable.
pub type BoxedCallable = Box<dyn Callable>;

/// Converts a type into a [`Callable`].
///
/// # Marker Types
///
/// The `Marker` type parameter allows multiple implementations for the same
/// function type (functions with different parameter counts).
pub trait IntoCallable<Marker>: Sized {
    /// The resulting callable type.
    type Callable: Callable;

    /// Converts this into a callable.
    fn into_callable(self) -> Self::Callable;
}

/// Marker for types that already implement [`Callable`].
pub struct CallableMarker;

impl<C: Callable> IntoCallable<CallableMarker> for C {
    type Callable = C;

    fn into_callable(self) -> Self::Callable {
        self
    }
}

/// A callable wrapping a function or closure.
///
/// Created via [`IntoCallable`].
pub struct FunctionCallable<F, Marker> {
    func: F,
    name: &'static str,
    _marker: PhantomData<fn() -> Marker>,
}

impl<F, Marker> FunctionCallable<F, Marker> {
    /// Creates a new function callable with the given name.
    pub fn new(func: F, name: &'static str) -> Self {
        Self {
            func,
            name,
            _marker: PhantomData,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// IntoCallable implementations for functions with 0-8 parameters
// ─────────────────────────────────────────────────────────────────────────────

macro_rules! impl_callable_fn {
    ($(($P:ident, $p:ident)),*) => {
        impl<Func, Ret, $($P),*> IntoCallable<fn($($P,)*) -> Ret> for Func
        where
            Func: Fn($($P),*) -> Ret + Send + Sync + 'static,
            Ret: IntoOutputs,
            $($P: FromValue,)*
        {
            type Callable = FunctionCallable<Func, fn($($P,)*) -> Ret>;

            fn into_callable(self) -> Self::Callable {
                FunctionCallable::new(self, core::any::type_name::<Func>())
            }
        }

        impl<Func, Ret, $($P),*> Callable for FunctionCallable<Func, fn($($P,)*) -> Ret>
        where
            Func: Fn($($P),*) -> Ret + Send + Sync + 'static,
            Ret: IntoOutputs,
            $($P: FromValue,)*
        {
            fn signature(&self) -> Signature {
                Signature::new(self.name, vec![$($P::kind()),*], Ret::slots())
            }

            fn call(&self, mut args: Arguments) -> Result<Vec<SlotValue>, InvokeError> {
                $(let $p = args.take::<$P>()?;)*
                args.finish()?;
                Ok((self.func)($($p),*).into_slots())
            }

            fn name(&self) -> &'static str {
                self.name
            }
        }
    };
}

all_tuples!(impl_callable_fn, 0, 8, P, p);
