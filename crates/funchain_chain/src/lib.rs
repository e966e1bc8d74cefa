//! Chain builder and driver for funchain (Layer 2).
//!
//! `funchain_chain` composes steps from [`funchain_system`] into a [`Chain`]
//! whose outputs flow from one step to the next:
//!
//! - [`mod@chain`] - The [`Chain`] builder and [`ChainConfig`]
//! - [`executor`] - Sequential execution and [`ChainError`]
//! - [`hooks`] - Before, after and error observers
//! - [`cleanup`] - Deferred cleanups run in reverse order
//! - [`bind`] - Writing final outputs into caller variables
//!
//! # Example
//!
//! ```
//! use funchain_chain::Chain;
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicBool, Ordering};
//!
//! let closed = Arc::new(AtomicBool::new(false));
//! let flag = closed.clone();
//!
//! let mut chain = Chain::new();
//! chain
//!     .then(|| -> Result<i64, String> { Err("boom".into()) })
//!     .then(|n: i64| n + 1)
//!     .defer(move || flag.store(true, Ordering::SeqCst));
//!
//! let err = chain.execute().unwrap_err();
//! assert_eq!(err.kind().to_string(), "boom");
//! assert!(closed.load(Ordering::SeqCst));
//! ```

/// Output binding.
pub mod bind;

/// Chain structure and builder API.
pub mod chain;

/// Deferred cleanups.
pub mod cleanup;

/// Chain execution.
pub mod executor;

/// Lifecycle hooks.
pub mod hooks;

pub use bind::{BindTarget, Discard};
pub use chain::{Chain, ChainConfig};
pub use executor::ChainError;
pub use hooks::HookKind;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::bind::*;
    pub use crate::chain;
    pub use crate::chain::*;
    pub use crate::cleanup::*;
    pub use crate::executor::*;
    pub use crate::hooks::*;
}
