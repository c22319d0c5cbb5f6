//! HTTP serving subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum serve, graceful shutdown)
//!     → request.rs (x-request-id assigned and propagated)
//!     → TraceLayer span, request timeout
//!     → compiled resource router (load chain → action handler)
//!       or introspection.rs (route listing)
//! ```

pub mod introspection;
pub mod request;
pub mod server;

pub use request::{RequestIdExt, UuidRequestId, X_REQUEST_ID};
pub use server::HttpServer;
