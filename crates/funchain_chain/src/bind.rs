//! Binding final outputs into caller-provided destinations.
//!
//! After a successful run, [`Chain::execute_into`](crate::Chain::execute_into)
//! writes output `i` into destination `i`. Any [`FromValue`] type is a
//! destination; a destination that cannot hold its output is skipped and
//! keeps its previous value. A destination that panics while binding is
//! skipped as well.

use funchain_system::invoke::contain;
use funchain_system::param::FromValue;
use funchain_system::value::{Value, ValueError};

/// Errors that prevent a single output from being bound.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    /// The destination does not accept writes.
    #[error("destination is not writable")]
    NotWritable,

    /// The output cannot be converted to the destination type.
    #[error("incompatible destination: {0}")]
    Incompatible(#[from] ValueError),
}

/// A writable destination for one chain output.
pub trait BindTarget {
    /// Stores `value` into this destination.
    ///
    /// # Errors
    ///
    /// Returns a [`BindError`] if the value cannot be stored. The destination
    /// is left unchanged in that case.
    fn bind(&mut self, value: &Value) -> Result<(), BindError>;
}

impl<T: FromValue> BindTarget for T {
    fn bind(&mut self, value: &Value) -> Result<(), BindError> {
        *self = T::from_value(value.clone())?;
        Ok(())
    }
}

/// A placeholder destination that ignores its output.
///
/// Use it to skip a position:
///
/// ```
/// use funchain_chain::Chain;
/// use funchain_chain::bind::Discard;
///
/// let mut chain = Chain::new();
/// chain.then(|| (1i64, "two".to_string()));
/// let mut second = String::new();
/// chain.execute_into(&mut [&mut Discard, &mut second]).unwrap();
/// assert_eq!(second, "two");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl BindTarget for Discard {
    fn bind(&mut self, _value: &Value) -> Result<(), BindError> {
        Err(BindError::NotWritable)
    }
}

/// Binds `values[i]` into `targets[i]` for every position both have.
///
/// Returns the number of destinations written.
pub fn bind_all(values: &[Value], targets: &mut [&mut dyn BindTarget]) -> usize {
    let mut bound = 0;
    for (position, (value, target)) in values.iter().zip(targets.iter_mut()).enumerate() {
        match contain(|| target.bind(value)) {
            Ok(Ok(())) => bound += 1,
            Ok(Err(err)) => tracing::debug!(position, %err, "skipping output destination"),
            Err(panic) => tracing::warn!(position, %panic, "output destination panicked"),
        }
    }
    bound
}
