//! Resource-oriented routing for axum.
//!
//! Declare resources with the seven standard actions, nest them, attach
//! auto-loaders, then compile the lot into an axum [`Router`](axum::Router).

pub mod config;
pub mod demo;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resource;

pub use config::ServerConfig;
pub use dispatch::{Loaded, Loader, Params};
pub use error::{DispatchError, RouteError};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use resource::{Action, ResourceId, ResourceMut, Resources, RouteInfo};
