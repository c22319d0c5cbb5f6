//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Assembly phase:
//!     registry → logging.rs (route registered / superseded / nested)
//!     compile  → metrics.rs (resource_routes_compiled)
//!
//! Request phase:
//!     load chain → logging.rs (loader invoked, miss, failure)
//!                → metrics.rs (resource_loads_total by outcome)
//!     tower-http TraceLayer → request spans with x-request-id
//! ```
//!
//! # Design Decisions
//! - Structured logging via `tracing`; filter from `RUST_LOG` or config
//! - Metrics are recorded unconditionally; exposition is opt-in

pub mod logging;
pub mod metrics;
