//! Parameter adaptation.
//!
//! This module binds a loosely-typed argument vector to the concrete
//! parameter list of a callable. Each parameter type implements [`FromValue`],
//! which declares:
//!
//! - the [`ValueKind`] it accepts (reported in a callable's signature)
//! - the zero value used when the argument vector is too short
//! - the exact-value conversion from a supplied [`Value`]
//!
//! # Adaptation Policy
//!
//! ```text
//! args:    [ Int(7) ]
//! params:  ( i64,   i64 )
//! bound:   ( 7,     0   )   <- missing position padded with i64::zero()
//!
//! args:    [ Int(7), Str("x"), Bool(true) ]
//! params:  ( i64 )
//! bound:   ( 7 )            <- excess arguments dropped (or rejected when strict)
//! ```
//!
//! Conversions never change the value: integers move between widths and
//! signedness only when they fit, and no conversion crosses kinds
//! (int to float, number to string, ...).

use core::fmt;

use indexmap::IndexMap;

use crate::value::{Value, ValueError, ValueKind};

/// A type that a step parameter can be declared as.
pub trait FromValue: Sized + 'static {
    /// The value kind this type accepts.
    fn kind() -> ValueKind;

    /// The value bound to this parameter when no argument was supplied.
    fn zero() -> Self;

    /// Converts a supplied argument, preserving its exact value.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError`] when the value's kind is not accepted or the
    /// value does not fit the target type.
    fn from_value(value: Value) -> Result<Self, ValueError>;
}

/// A type that can be turned into a [`Value`].
pub trait IntoValue {
    /// Performs the conversion.
    fn into_value(self) -> Value;
}

impl FromValue for Value {
    fn kind() -> ValueKind {
        ValueKind::Any
    }

    fn zero() -> Self {
        Value::Nil
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        Ok(value)
    }
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl FromValue for bool {
    fn kind() -> ValueKind {
        ValueKind::Bool
    }

    fn zero() -> Self {
        false
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(ValueError::mismatch(ValueKind::Bool, &other)),
        }
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl FromValue for String {
    fn kind() -> ValueKind {
        ValueKind::Str
    }

    fn zero() -> Self {
        String::new()
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Str(s) => Ok(s),
            other => Err(ValueError::mismatch(ValueKind::Str, &other)),
        }
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::Str(self)
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::Str(self.to_owned())
    }
}

impl FromValue for f64 {
    fn kind() -> ValueKind {
        ValueKind::Float
    }

    fn zero() -> Self {
        0.0
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Float(n) => Ok(n),
            other => Err(ValueError::mismatch(ValueKind::Float, &other)),
        }
    }
}

impl IntoValue for f64 {
    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl FromValue for f32 {
    fn kind() -> ValueKind {
        ValueKind::Float
    }

    fn zero() -> Self {
        0.0
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Float(n) => {
                // Narrowing is checked by the round trip below.
                let narrowed = n as f32;
                if n.is_nan() || f64::from(narrowed) == n {
                    Ok(narrowed)
                } else {
                    Err(ValueError::out_of_range(n, "f32"))
                }
            }
            other => Err(ValueError::mismatch(ValueKind::Float, &other)),
        }
    }
}

impl IntoValue for f32 {
    fn into_value(self) -> Value {
        Value::Float(f64::from(self))
    }
}

// Integers accept both `Int` and `UInt` values and reject anything that does
// not fit exactly.
macro_rules! impl_integer_value {
    ($($ty:ty => $kind:ident ($variant:ident, $wide:ty)),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn kind() -> ValueKind {
                    ValueKind::$kind
                }

                fn zero() -> Self {
                    0
                }

                fn from_value(value: Value) -> Result<Self, ValueError> {
                    match value {
                        Value::Int(n) => <$ty>::try_from(n)
                            .map_err(|_| ValueError::out_of_range(n, stringify!($ty))),
                        Value::UInt(n) => <$ty>::try_from(n)
                            .map_err(|_| ValueError::out_of_range(n, stringify!($ty))),
                        other => Err(ValueError::mismatch(ValueKind::$kind, &other)),
                    }
                }
            }

            impl IntoValue for $ty {
                fn into_value(self) -> Value {
                    // Lossless: every listed type fits its wide counterpart.
                    Value::$variant(<$wide>::try_from(self).unwrap_or_default())
                }
            }
        )*
    };
}

impl_integer_value! {
    i8 => Int(Int, i64),
    i16 => Int(Int, i64),
    i32 => Int(Int, i64),
    i64 => Int(Int, i64),
    isize => Int(Int, i64),
    u8 => UInt(UInt, u64),
    u16 => UInt(UInt, u64),
    u32 => UInt(UInt, u64),
    u64 => UInt(UInt, u64),
    usize => UInt(UInt, u64),
}

/// `None` is the zero value and binds from [`Value::Nil`].
impl<T: FromValue> FromValue for Option<T> {
    fn kind() -> ValueKind {
        T::kind()
    }

    fn zero() -> Self {
        None
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Nil => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        self.map_or(Value::Nil, IntoValue::into_value)
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn kind() -> ValueKind {
        ValueKind::List
    }

    fn zero() -> Self {
        Vec::new()
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(ValueError::mismatch(ValueKind::List, &other)),
        }
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<T: FromValue> FromValue for IndexMap<String, T> {
    fn kind() -> ValueKind {
        ValueKind::Map
    }

    fn zero() -> Self {
        IndexMap::new()
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Map(map) => map
                .into_iter()
                .map(|(key, item)| T::from_value(item).map(|item| (key, item)))
                .collect(),
            other => Err(ValueError::mismatch(ValueKind::Map, &other)),
        }
    }
}

impl<T: IntoValue> IntoValue for IndexMap<String, T> {
    fn into_value(self) -> Value {
        Value::Map(
            self.into_iter()
                .map(|(key, item)| (key, item.into_value()))
                .collect(),
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Arguments
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur while binding arguments to parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamError {
    /// The argument at `position` could not be converted to the parameter type.
    #[error("argument {position}: {source}")]
    ArgumentMismatch {
        /// Zero-based parameter position.
        position: usize,
        /// Why the conversion failed.
        #[source]
        source: ValueError,
    },

    /// More arguments were supplied than the callable declares (strict mode only).
    #[error("expected at most {expected} arguments, got {supplied}")]
    ExcessArguments {
        /// Declared parameter count.
        expected: usize,
        /// Supplied argument count.
        supplied: usize,
    },
}

/// Cursor over an argument vector, consumed parameter by parameter.
///
/// Callables pull one value per declared parameter with [`take`](Self::take)
/// and then call [`finish`](Self::finish), which applies the excess-argument
/// policy.
pub struct Arguments {
    values: std::vec::IntoIter<Value>,
    supplied: usize,
    taken: usize,
    strict: bool,
}

impl Arguments {
    /// Creates a cursor that drops excess arguments.
    #[must_use]
    pub fn new(values: Vec<Value>) -> Self {
        Self {
            supplied: values.len(),
            values: values.into_iter(),
            taken: 0,
            strict: false,
        }
    }

    /// Sets whether excess arguments are rejected instead of dropped.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Returns the number of supplied arguments.
    #[must_use]
    pub fn supplied(&self) -> usize {
        self.supplied
    }

    /// Binds the next parameter, padding with [`FromValue::zero`] when the
    /// supplied arguments are exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::ArgumentMismatch`] if the argument cannot be
    /// converted to `T`.
    pub fn take<T: FromValue>(&mut self) -> Result<T, ParamError> {
        let position = self.taken;
        self.taken += 1;
        match self.values.next() {
            Some(value) => T::from_value(value)
                .map_err(|source| ParamError::ArgumentMismatch { position, source }),
            None => Ok(T::zero()),
        }
    }

    /// Applies the excess-argument policy once all parameters are bound.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::ExcessArguments`] in strict mode when arguments
    /// remain unconsumed.
    pub fn finish(&mut self) -> Result<(), ParamError> {
        let excess = self.values.len();
        if excess == 0 {
            return Ok(());
        }
        if self.strict {
            return Err(ParamError::ExcessArguments {
                expected: self.taken,
                supplied: self.supplied,
            });
        }
        tracing::trace!(excess, declared = self.taken, "dropping excess arguments");
        Ok(())
    }
}

impl fmt::Debug for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arguments")
            .field("supplied", &self.supplied)
            .field("taken", &self.taken)
            .field("strict", &self.strict)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_convert_across_widths_when_exact() {
        assert_eq!(i32::from_value(Value::Int(-5)), Ok(-5));
        assert_eq!(u8::from_value(Value::Int(200)), Ok(200));
        assert_eq!(i64::from_value(Value::UInt(9)), Ok(9));
    }

    #[test]
    fn integers_reject_lossy_conversion() {
        assert_eq!(
            u8::from_value(Value::Int(300)),
            Err(ValueError::out_of_range(300, "u8"))
        );
        assert!(u32::from_value(Value::Int(-1)).is_err());
        assert!(i64::from_value(Value::UInt(u64::MAX)).is_err());
    }

    #[test]
    fn no_cross_kind_coercion() {
        assert_eq!(
            i64::from_value(Value::Float(1.0)),
            Err(ValueError::TypeMismatch {
                expected: ValueKind::Int,
                found: ValueKind::Float,
            })
        );
        assert!(f64::from_value(Value::Int(1)).is_err());
        assert!(String::from_value(Value::Int(1)).is_err());
    }

    #[test]
    fn f32_rejects_precision_loss() {
        assert_eq!(f32::from_value(Value::Float(0.5)), Ok(0.5));
        assert!(f32::from_value(Value::Float(0.1)).is_err());
    }

    #[test]
    fn zero_values() {
        assert_eq!(i64::zero(), 0);
        assert_eq!(String::zero(), "");
        assert!(!bool::zero());
        assert_eq!(Option::<i64>::zero(), None);
        assert!(Vec::<String>::zero().is_empty());
        assert_eq!(Value::zero(), Value::Nil);
    }

    #[test]
    fn option_binds_nil_as_none() {
        assert_eq!(Option::<i64>::from_value(Value::Nil), Ok(None));
        assert_eq!(Option::<i64>::from_value(Value::Int(3)), Ok(Some(3)));
        assert_eq!(Option::<i64>::kind(), ValueKind::Int);
    }

    #[test]
    fn list_reports_first_bad_element() {
        let value = Value::List(vec![Value::Int(1), Value::Str("x".into())]);
        assert!(matches!(
            Vec::<i64>::from_value(value),
            Err(ValueError::TypeMismatch {
                found: ValueKind::Str,
                ..
            })
        ));
    }

    #[test]
    fn into_value_widens() {
        assert_eq!(7u8.into_value(), Value::UInt(7));
        assert_eq!((-7i16).into_value(), Value::Int(-7));
        assert_eq!(Some("a").into_value(), Value::Str("a".into()));
        assert_eq!(None::<i32>.into_value(), Value::Nil);
        assert_eq!(
            vec![1i64, 2].into_value(),
            Value::List(vec![Value::Int(1), Value::Int(2)])
        );
    }

    #[test]
    fn arguments_pad_missing_positions() {
        let mut args = Arguments::new(vec![Value::Int(7)]);
        assert_eq!(args.take::<i64>(), Ok(7));
        assert_eq!(args.take::<i64>(), Ok(0));
        assert_eq!(args.take::<String>(), Ok(String::new()));
        assert_eq!(args.finish(), Ok(()));
    }

    #[test]
    fn arguments_report_position_of_mismatch() {
        let mut args = Arguments::new(vec![Value::Int(1), Value::Bool(true)]);
        assert_eq!(args.take::<i64>(), Ok(1));
        let err = args.take::<String>().unwrap_err();
        assert!(matches!(err, ParamError::ArgumentMismatch { position: 1, .. }));
    }

    #[test]
    fn arguments_drop_excess_by_default() {
        let mut args = Arguments::new(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(args.take::<i64>(), Ok(1));
        assert_eq!(args.finish(), Ok(()));
    }

    #[test]
    fn strict_arguments_reject_excess() {
        let mut args = Arguments::new(vec![Value::Int(1), Value::Int(2)]).strict(true);
        assert_eq!(args.take::<i64>(), Ok(1));
        assert_eq!(
            args.finish(),
            Err(ParamError::ExcessArguments {
                expected: 1,
                supplied: 2,
            })
        );
    }
}
