//! The load chain wrapped around each route handler.
//!
//! # Responsibilities
//! - Build, per route, the ordered list of loaders whose id is in the path
//! - Restore the route's declared parameter names onto the positional
//!   parameters axum matched
//! - Run the loaders root to leaf, attaching each record to the request context
//! - Stop at the first miss (404) or failure (500); the handler never runs
//!
//! # Design Decisions
//! - Plans are built once when the router is compiled and shared via `Arc`
//! - Loaders of one request run sequentially; a child may read its parent's record
//! - Every compiled route is wrapped, so `Params` always carries declared names

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::MethodRouter,
};

use crate::dispatch::context::{Loaded, Params};
use crate::dispatch::loader::Loader;
use crate::error::DispatchError;
use crate::observability::metrics;

/// One loader invocation within a route's chain.
#[derive(Clone)]
pub struct LoadStep {
    /// Resource name, for logs and metrics.
    pub resource: String,
    /// Context key the record is stored under.
    pub key: String,
    /// Position of the id value among the route's path parameters.
    pub position: usize,
    pub loader: Arc<dyn Loader>,
}

/// The parameter names and ordered loaders for one route.
#[derive(Clone, Default)]
pub struct LoadPlan {
    names: Vec<String>,
    steps: Vec<LoadStep>,
}

impl LoadPlan {
    pub fn new(names: Vec<String>, steps: Vec<LoadStep>) -> Self {
        Self { names, steps }
    }

    /// Declared path parameter names, by position.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Run every step in order, extending `loaded` with each record.
    pub async fn resolve(&self, params: &Params, loaded: &mut Loaded) -> Result<(), DispatchError> {
        for step in &self.steps {
            let id = params
                .nth(step.position)
                .ok_or_else(|| DispatchError::MissingParam {
                    resource: step.resource.clone(),
                    param: step.key.clone(),
                })?
                .to_string();

            tracing::debug!(resource = %step.resource, id = %id, "Loading record");

            match step.loader.load(id.clone(), loaded).await {
                Ok(Some(record)) => {
                    metrics::record_load(&step.resource, "found");
                    loaded.insert(step.key.clone(), record);
                }
                Ok(None) => {
                    metrics::record_load(&step.resource, "missing");
                    tracing::debug!(resource = %step.resource, id = %id, "No record, short-circuiting");
                    return Err(DispatchError::NotFound {
                        resource: step.resource.clone(),
                    });
                }
                Err(source) => {
                    metrics::record_load(&step.resource, "error");
                    return Err(DispatchError::Load {
                        resource: step.resource.clone(),
                        source,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Middleware running a route's [`LoadPlan`] before its handler.
pub async fn load_chain_middleware(
    State(plan): State<Arc<LoadPlan>>,
    params: Params,
    mut request: Request,
    next: Next,
) -> Response {
    let mut loaded = request
        .extensions()
        .get::<Loaded>()
        .cloned()
        .unwrap_or_default();

    let params = params.renamed(&plan.names);
    let result = plan.resolve(&params, &mut loaded).await;
    request.extensions_mut().insert(params);

    match result {
        Ok(()) => {
            request.extensions_mut().insert(loaded);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

/// Wrap `endpoint` so `plan` runs before it.
pub fn wrap<S>(endpoint: MethodRouter<S>, plan: LoadPlan) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    endpoint.route_layer(middleware::from_fn_with_state(
        Arc::new(plan),
        load_chain_middleware,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::loader::FnLoader;
    use std::convert::Infallible;
    use std::sync::Mutex;

    fn recording_step(
        resource: &str,
        position: usize,
        log: Arc<Mutex<Vec<String>>>,
        hit: bool,
    ) -> LoadStep {
        let name = resource.to_string();
        let loader = FnLoader::new(move |id: String| {
            let log = log.clone();
            let name = name.clone();
            async move {
                log.lock().unwrap().push(format!("{}:{}", name, id));
                Ok::<_, Infallible>(hit.then(|| format!("{} {}", name, id)))
            }
        });
        LoadStep {
            resource: resource.to_string(),
            key: resource.to_string(),
            position,
            loader: Arc::new(loader),
        }
    }

    fn names() -> Vec<String> {
        vec!["forum".into(), "thread".into()]
    }

    fn params() -> Params {
        Params::new(vec![
            ("forum".into(), "12".into()),
            ("thread".into(), "1".into()),
        ])
    }

    #[tokio::test]
    async fn test_resolve_runs_root_to_leaf() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let plan = LoadPlan::new(names(), vec![
            recording_step("forum", 0, log.clone(), true),
            recording_step("thread", 1, log.clone(), true),
        ]);

        let mut loaded = Loaded::default();
        plan.resolve(&params(), &mut loaded).await.unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["forum:12", "thread:1"]);
        assert_eq!(loaded.get::<String>("forum").unwrap(), "forum 12");
        assert_eq!(loaded.get::<String>("thread").unwrap(), "thread 1");
    }

    #[tokio::test]
    async fn test_resolve_stops_at_first_miss() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let plan = LoadPlan::new(names(), vec![
            recording_step("forum", 0, log.clone(), false),
            recording_step("thread", 1, log.clone(), true),
        ]);

        let mut loaded = Loaded::default();
        let result = plan.resolve(&params(), &mut loaded).await;

        assert!(matches!(result, Err(DispatchError::NotFound { ref resource }) if resource == "forum"));
        assert_eq!(*log.lock().unwrap(), vec!["forum:12"]);
        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn test_missing_position_is_an_error() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let plan = LoadPlan::new(names(), vec![recording_step("thread", 5, log, true)]);

        let result = plan.resolve(&params(), &mut Loaded::default()).await;
        assert!(matches!(result, Err(DispatchError::MissingParam { .. })));
    }
}
