//! Output slots of a callable.
//!
//! A callable's return type is described as an ordered list of slots. Each
//! slot is either an ordinary value or an error-capable slot:
//!
//! | Return type | Slots |
//! |-------------|-------|
//! | `()` | none |
//! | `i64`, `String`, `Value`, `Vec<T>`, ... | `[Value]` |
//! | [`Fault`] | `[Error]` |
//! | `(i64, Fault)` | `[Value, Error]` |
//! | `Result<(String, i64), E>` | `[Value, Value, Error]` |
//!
//! The invoker accepts at most one error slot per callable; anything else is
//! rejected before the callable runs.

use core::fmt;

use indexmap::IndexMap;
use variadics_please::all_tuples;

use crate::param::{FromValue, IntoValue};
use crate::value::{Value, ValueKind};

/// Boxed error carried by an error slot.
pub type BoxError = Box<dyn core::error::Error + Send + Sync + 'static>;

/// Declared kind of a single output position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    /// An ordinary output of the given kind.
    Value(ValueKind),
    /// An error-capable output.
    Error,
}

impl SlotKind {
    /// Returns `true` for [`SlotKind::Error`].
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, SlotKind::Error)
    }
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotKind::Value(kind) => write!(f, "{kind}"),
            SlotKind::Error => f.write_str("error"),
        }
    }
}

/// A produced output position.
#[derive(Debug)]
pub enum SlotValue {
    /// An ordinary output.
    Value(Value),
    /// An error slot; `None` when the callable reported no error.
    Error(Option<BoxError>),
}

/// A nilable error output.
///
/// `Fault` is the error-capable slot type for tuple returns, where a
/// [`Result`] cannot express "values *and* an error":
///
/// ```
/// use funchain_system::output::Fault;
///
/// fn parse(input: String) -> (i64, Fault) {
///     match input.parse() {
///         Ok(n) => (n, Fault::none()),
///         Err(err) => (0, Fault::new(err)),
///     }
/// }
///
/// assert!(parse("12".into()).1.is_none());
/// assert!(parse("x".into()).1.is_some());
/// ```
#[derive(Debug, Default)]
pub struct Fault(Option<BoxError>);

impl Fault {
    /// No error.
    #[must_use]
    pub fn none() -> Self {
        Self(None)
    }

    /// Wraps an error.
    pub fn new(err: impl Into<BoxError>) -> Self {
        Self(Some(err.into()))
    }

    /// Returns `true` when no error is carried.
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }

    /// Returns `true` when an error is carried.
    #[must_use]
    pub fn is_some(&self) -> bool {
        self.0.is_some()
    }

    /// Returns the carried error, if any.
    #[must_use]
    pub fn into_inner(self) -> Option<BoxError> {
        self.0
    }
}

impl<E: Into<BoxError>> From<Result<(), E>> for Fault {
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self::none(),
            Err(err) => Self::new(err),
        }
    }
}

/// A type occupying exactly one output position.
pub trait OutputSlot: 'static {
    /// The declared kind of the position.
    fn slot_kind() -> SlotKind;

    /// Converts the returned value into its slot.
    fn into_slot(self) -> SlotValue;
}

/// A return type that can be split into output slots.
pub trait IntoOutputs: 'static {
    /// Declared output positions, in order.
    fn slots() -> Vec<SlotKind>;

    /// Converts the returned value into its slots.
    fn into_slots(self) -> Vec<SlotValue>;
}

impl OutputSlot for Fault {
    fn slot_kind() -> SlotKind {
        SlotKind::Error
    }

    fn into_slot(self) -> SlotValue {
        SlotValue::Error(self.0)
    }
}

impl IntoOutputs for Fault {
    fn slots() -> Vec<SlotKind> {
        vec![SlotKind::Error]
    }

    fn into_slots(self) -> Vec<SlotValue> {
        vec![self.into_slot()]
    }
}

impl IntoOutputs for () {
    fn slots() -> Vec<SlotKind> {
        Vec::new()
    }

    fn into_slots(self) -> Vec<SlotValue> {
        Vec::new()
    }
}

// Single-value returns. Each type occupies one ordinary slot.
macro_rules! impl_value_slot {
    ($($ty:ty),* $(,)?) => {
        $(
            impl OutputSlot for $ty {
                fn slot_kind() -> SlotKind {
                    SlotKind::Value(<$ty as FromValue>::kind())
                }

                fn into_slot(self) -> SlotValue {
                    SlotValue::Value(self.into_value())
                }
            }

            impl IntoOutputs for $ty {
                fn slots() -> Vec<SlotKind> {
                    vec![<$ty as OutputSlot>::slot_kind()]
                }

                fn into_slots(self) -> Vec<SlotValue> {
                    vec![self.into_slot()]
                }
            }
        )*
    };
}

impl_value_slot!(
    Value, bool, String, f32, f64, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize,
);

impl<T: FromValue + IntoValue> OutputSlot for Option<T> {
    fn slot_kind() -> SlotKind {
        SlotKind::Value(T::kind())
    }

    fn into_slot(self) -> SlotValue {
        SlotValue::Value(self.into_value())
    }
}

impl<T: FromValue + IntoValue> IntoOutputs for Option<T> {
    fn slots() -> Vec<SlotKind> {
        vec![Self::slot_kind()]
    }

    fn into_slots(self) -> Vec<SlotValue> {
        vec![self.into_slot()]
    }
}

impl<T: IntoValue + 'static> OutputSlot for Vec<T> {
    fn slot_kind() -> SlotKind {
        SlotKind::Value(ValueKind::List)
    }

    fn into_slot(self) -> SlotValue {
        SlotValue::Value(self.into_value())
    }
}

impl<T: IntoValue + 'static> IntoOutputs for Vec<T> {
    fn slots() -> Vec<SlotKind> {
        vec![Self::slot_kind()]
    }

    fn into_slots(self) -> Vec<SlotValue> {
        vec![self.into_slot()]
    }
}

impl<T: IntoValue + 'static> OutputSlot for IndexMap<String, T> {
    fn slot_kind() -> SlotKind {
        SlotKind::Value(ValueKind::Map)
    }

    fn into_slot(self) -> SlotValue {
        SlotValue::Value(self.into_value())
    }
}

impl<T: IntoValue + 'static> IntoOutputs for IndexMap<String, T> {
    fn slots() -> Vec<SlotKind> {
        vec![Self::slot_kind()]
    }

    fn into_slots(self) -> Vec<SlotValue> {
        vec![self.into_slot()]
    }
}

/// The `Ok` payload's slots followed by one error slot.
///
/// An `Err` produces only the error slot: there are no ordinary outputs to
/// report alongside it.
impl<T, E> IntoOutputs for Result<T, E>
where
    T: IntoOutputs,
    E: Into<BoxError> + 'static,
{
    fn slots() -> Vec<SlotKind> {
        let mut slots = T::slots();
        slots.push(SlotKind::Error);
        slots
    }

    fn into_slots(self) -> Vec<SlotValue> {
        match self {
            Ok(value) => {
                let mut slots = value.into_slots();
                slots.push(SlotValue::Error(None));
                slots
            }
            Err(err) => vec![SlotValue::Error(Some(err.into()))],
        }
    }
}

// Tuple returns: one slot per element, in declaration order.
macro_rules! impl_into_outputs_tuple {
    ($(($S:ident, $s:ident)),*) => {
        impl<$($S: OutputSlot),*> IntoOutputs for ($($S,)*) {
            fn slots() -> Vec<SlotKind> {
                vec![$($S::slot_kind()),*]
            }

            fn into_slots(self) -> Vec<SlotValue> {
                let ($($s,)*) = self;
                vec![$($s.into_slot()),*]
            }
        }
    };
}

// Generate impls for tuples of size 1 to 8
all_tuples!(impl_into_outputs_tuple, 1, 8, S, s);
