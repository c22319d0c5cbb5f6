//! Request-time dispatch: auto-loading before action handlers.
//!
//! # Data Flow
//! ```text
//! Matched route (axum)
//!     → wrapper.rs (route's LoadPlan, root to leaf)
//!         → context.rs Params (id value by position)
//!         → loader.rs Loader::load(id, loaded so far)
//!             record  → attach to Loaded, next step
//!             none    → 404 Not Found, stop
//!             error   → 500, stop
//!     → action handler (extracts Loaded / Params)
//! ```
//!
//! # Design Decisions
//! - A miss is a normal outcome, not an error log
//! - No shared mutable state between concurrent requests

pub mod context;
pub mod loader;
pub mod wrapper;

pub use context::{Loaded, Params};
pub use loader::{FnLoader, LoadResult, Loader, Record, ScopedFnLoader};
