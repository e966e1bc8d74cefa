//! Compose ordinary functions into chains whose outputs feed the next step.
//!
//! `funchain` re-exports the workspace crates:
//!
//! - [`funchain_system`] - values, parameter adaptation and the dynamic invoker
//! - [`funchain_chain`] - the [`Chain`](prelude::Chain) builder, hooks, cleanups and driver
//! - [`funchain_tracing`] - subscriber installation
//!
//! # Example
//!
//! ```
//! use funchain::prelude::*;
//!
//! fn load() -> (i64, Fault) {
//!     (42, Fault::none())
//! }
//!
//! fn render(n: i64) -> String {
//!     format!("answer: {n}")
//! }
//!
//! let chain = funchain::chain![load, render];
//!
//! let mut text = String::new();
//! chain.execute_into(&mut [&mut text]).unwrap();
//! assert_eq!(text, "answer: 42");
//! ```
//!
//! # Missing arguments
//!
//! A step that receives fewer outputs than it declares parameters gets the
//! zero value of each missing one. [`Value`](prelude::Value) parameters are
//! padded with `Nil`, so error-only steps compose freely:
//!
//! ```
//! use funchain::prelude::*;
//!
//! let mut chain = Chain::new();
//! chain
//!     .then(Fault::none)
//!     .then(|n: i64, arg: Value| {
//!         assert_eq!(n, 0);
//!         assert!(arg.is_nil());
//!         Fault::none()
//!     })
//!     .then(|| -> Result<String, String> { Ok("hello".into()) })
//!     .then(|s: String| -> Result<String, String> { Ok(s + "world") });
//!
//! assert_eq!(chain.execute().unwrap(), [Value::Str("helloworld".into())]);
//! ```

/// Layer 1: dynamic invocation primitives.
pub use funchain_system;

/// Layer 2: chain builder and driver.
pub use funchain_chain;

/// Subscriber configuration.
pub use funchain_tracing;

pub use funchain_chain::chain;

/// Re-export all common types for easy access.
///
/// ```
/// use funchain::prelude::*;
///
/// let config = TracingConfig::new().with_format(TracingFormat::Json);
/// assert_eq!(config.format, TracingFormat::Json);
/// ```
pub mod prelude {
    pub use funchain_chain::prelude::*;
    pub use funchain_system::prelude::*;
    pub use funchain_tracing::{TracingConfig, TracingFormat};
}
