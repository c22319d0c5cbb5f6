//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!     → http::HttpServer, observability
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; routes are compiled once at startup
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::ServerConfig;
pub use schema::ListenerConfig;
pub use schema::TimeoutConfig;
pub use schema::ObservabilityConfig;
pub use schema::IntrospectionConfig;
pub use loader::{load_config, parse_config, ConfigError};
