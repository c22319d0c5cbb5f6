//! Loaders resolve an id from the URL into a record.
//!
//! A loader answers one of three ways: a record (`Ok(Some)`), no record
//! (`Ok(None)`, a miss that ends the request with 404), or a failure
//! (`Err`, forwarded as a server error). Records are type-erased so that
//! every resource in a chain can load its own type.

use std::any::Any;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use axum::BoxError;
use futures_util::future::BoxFuture;

use crate::dispatch::context::Loaded;

/// A loaded record, keyed in [`Loaded`] by the owning resource's id parameter.
pub type Record = Arc<dyn Any + Send + Sync>;

/// Result of a single load.
pub type LoadResult = Result<Option<Record>, BoxError>;

/// Resolves an id value into a record.
///
/// `scope` holds the records already loaded for ancestors of this resource
/// during the current request.
pub trait Loader: Send + Sync + 'static {
    fn load(&self, id: String, scope: &Loaded) -> BoxFuture<'static, LoadResult>;
}

fn erase<T, E>(result: Result<Option<T>, E>) -> LoadResult
where
    T: Send + Sync + 'static,
    E: Into<BoxError>,
{
    match result {
        Ok(Some(record)) => Ok(Some(Arc::new(record) as Record)),
        Ok(None) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Adapts `Fn(id) -> Future<Output = Result<Option<T>, E>>`.
pub struct FnLoader<F, T, E> {
    f: F,
    _marker: PhantomData<fn() -> (T, E)>,
}

impl<F, T, E> FnLoader<F, T, E> {
    pub fn new(f: F) -> Self {
        Self {
            f,
            _marker: PhantomData,
        }
    }
}

impl<F, Fut, T, E> Loader for FnLoader<F, T, E>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Option<T>, E>> + Send + 'static,
    T: Send + Sync + 'static,
    E: Into<BoxError> + 'static,
{
    fn load(&self, id: String, _scope: &Loaded) -> BoxFuture<'static, LoadResult> {
        let fut = (self.f)(id);
        Box::pin(async move { erase(fut.await) })
    }
}

/// Adapts `Fn(id, Loaded) -> Future<...>` for loaders that look their
/// record up within an ancestor's record.
pub struct ScopedFnLoader<F, T, E> {
    f: F,
    _marker: PhantomData<fn() -> (T, E)>,
}

impl<F, T, E> ScopedFnLoader<F, T, E> {
    pub fn new(f: F) -> Self {
        Self {
            f,
            _marker: PhantomData,
        }
    }
}

impl<F, Fut, T, E> Loader for ScopedFnLoader<F, T, E>
where
    F: Fn(String, Loaded) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Option<T>, E>> + Send + 'static,
    T: Send + Sync + 'static,
    E: Into<BoxError> + 'static,
{
    fn load(&self, id: String, scope: &Loaded) -> BoxFuture<'static, LoadResult> {
        let fut = (self.f)(id, scope.clone());
        Box::pin(async move { erase(fut.await) })
    }
}
