//! Error types.
//!
//! Declaration errors surface synchronously from the registry while the
//! application is assembled. Dispatch errors are produced per request by the
//! load chain and rendered as HTTP responses.

use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    BoxError,
};
use thiserror::Error;

use crate::resource::ResourceId;

/// Errors raised while declaring, augmenting or nesting resources.
#[derive(Debug, Error)]
pub enum RouteError {
    /// Path composition was asked for an empty ancestor chain.
    #[error("cannot compose a path for an empty resource chain")]
    EmptyChain,

    /// An unnamed (root) resource was placed below another resource.
    #[error("resource {0} has no name and cannot be nested")]
    UnnamedChild(ResourceId),

    /// The child already has a parent.
    #[error("resource {child} is already nested under {parent}")]
    AlreadyNested { child: ResourceId, parent: ResourceId },

    /// Nesting would make a resource its own ancestor.
    #[error("nesting {child} under {parent} would create a cycle")]
    CyclicNesting { parent: ResourceId, child: ResourceId },

    /// The id does not belong to this registry.
    #[error("unknown resource {0}")]
    UnknownResource(ResourceId),

    /// axum has no method filter for this verb.
    #[error("unsupported HTTP method {0}")]
    UnsupportedMethod(Method),

    #[error("invalid custom route subpath {0:?}")]
    InvalidSubpath(String),

    #[error("invalid id parameter {0:?}")]
    InvalidIdParam(String),

    #[error("invalid resource name {0:?}")]
    InvalidName(String),
}

/// Outcomes of the load chain that stop a request before its handler runs.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A loader yielded no record.
    #[error("{resource} not found")]
    NotFound { resource: String },

    /// A loader failed for a reason other than absence.
    #[error("loading {resource} failed: {source}")]
    Load {
        resource: String,
        #[source]
        source: BoxError,
    },

    /// The matched route carried no value for a loader's id parameter.
    #[error("missing path parameter {param} for {resource}")]
    MissingParam { resource: String, param: String },
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        match self {
            DispatchError::NotFound { .. } => {
                (StatusCode::NOT_FOUND, "Not Found").into_response()
            }
            DispatchError::Load { .. } | DispatchError::MissingParam { .. } => {
                tracing::error!(error = %self, "Load chain failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}
