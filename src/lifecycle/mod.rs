//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Init logging/metrics → Declare resources → Compile → Listen
//!
//! Shutdown (shutdown.rs):
//!     Shutdown::trigger() or Ctrl+C (signals.rs)
//!     → ShutdownSignal::wait() resolves
//!     → axum stops accepting, drains in-flight requests
//! ```
//!
//! # Design Decisions
//! - Routes are frozen before the listener binds; no registration while serving
//! - A signal subscribed after the trigger still observes it

pub mod shutdown;
pub mod signals;

pub use shutdown::{Shutdown, ShutdownSignal};
