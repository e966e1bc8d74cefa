//! Dynamic invocation primitives for funchain (Layer 1).
//!
//! `funchain_system` turns ordinary Rust functions into steps that can be
//! driven with a loosely-typed argument vector:
//!
//! - [`value`] - The [`Value`] type carried between steps
//! - [`param`] - Parameter adaptation (conversion, zero padding, excess policy)
//! - [`output`] - Output slots and the single error-capable position
//! - [`callable`] - The [`Callable`](callable::Callable) trait and function adapters
//! - [`invoke`] - The dynamic invoker with panic containment
//!
//! # Architecture
//!
//! - **Layer 1** (`funchain_system`): invocation of a single step (this crate)
//! - **Layer 2** (`funchain_chain`): chain building, hooks, cleanups and execution
//!
//! # Example
//!
//! ```
//! use funchain_system::invoke::{Step, invoke};
//! use funchain_system::value::Value;
//!
//! let step = Step::new(|n: i64| n.to_string());
//! let outcome = invoke(&step, vec![Value::Int(42)]);
//!
//! assert!(outcome.is_ok());
//! assert_eq!(outcome.outputs, [Value::Str("42".into())]);
//! ```

/// Function and closure adapters.
pub mod callable;

/// The dynamic invoker.
pub mod invoke;

/// Output slot declaration and splitting.
pub mod output;

/// Parameter adaptation.
pub mod param;

/// Loosely-typed values.
pub mod value;

pub use invoke::{Step, StepOutcome, invoke};
pub use value::Value;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::callable::*;
    pub use crate::invoke::*;
    pub use crate::output::*;
    pub use crate::param::*;
    pub use crate::value::*;
}
