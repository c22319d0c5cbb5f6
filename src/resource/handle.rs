//! Fluent handle for declaring a resource's routes.

use std::future::Future;
use std::sync::Arc;

use axum::{
    handler::Handler,
    http::Method,
    routing::{on, MethodFilter},
    BoxError,
};

use crate::dispatch::context::Loaded;
use crate::dispatch::loader::{FnLoader, Loader, ScopedFnLoader};
use crate::error::RouteError;
use crate::resource::action::Action;
use crate::resource::path;
use crate::resource::registry::Resources;
use crate::resource::ResourceId;

/// A mutable view of one resource inside a [`Resources`] registry.
///
/// Every declaration registers its route immediately. Methods consume and
/// return the handle so declarations chain:
///
/// ```ignore
/// resources
///     .resource("forums")?
///     .index(list_forums)
///     .show(show_forum)
///     .load(find_forum);
/// ```
pub struct ResourceMut<'a, S = ()> {
    resources: &'a mut Resources<S>,
    id: ResourceId,
}

fn action_filter(action: Action) -> MethodFilter {
    match action {
        Action::Index | Action::New | Action::Show | Action::Edit => MethodFilter::GET,
        Action::Create => MethodFilter::POST,
        Action::Update => MethodFilter::PUT,
        Action::Destroy => MethodFilter::DELETE,
    }
}

macro_rules! verb_helpers {
    ($($(#[$doc:meta])* $verb:ident, $verb_at:ident => $filter:ident, $method:ident;)*) => {
        $(
            $(#[$doc])*
            pub fn $verb<H, T>(self, handler: H) -> Self
            where
                H: Handler<T, S>,
                T: 'static,
            {
                self.custom(MethodFilter::$filter, Method::$method, None, handler)
            }

            /// Like the base-path helper, at `subpath` below the resource base.
            pub fn $verb_at<H, T>(self, subpath: &str, handler: H) -> Result<Self, RouteError>
            where
                H: Handler<T, S>,
                T: 'static,
            {
                path::validate_subpath(subpath)?;
                Ok(self.custom(MethodFilter::$filter, Method::$method, Some(subpath), handler))
            }
        )*
    };
}

impl<'a, S> ResourceMut<'a, S>
where
    S: Clone + Send + Sync + 'static,
{
    pub(crate) fn bind(resources: &'a mut Resources<S>, id: ResourceId) -> Self {
        Self { resources, id }
    }

    pub fn id(&self) -> ResourceId {
        self.id
    }

    pub fn name(&self) -> &str {
        self.resources.name(self.id).unwrap_or_default()
    }

    pub fn id_param(&self) -> &str {
        self.resources.id_param(self.id).unwrap_or_default()
    }

    /// Override the id parameter (and context key) of this resource.
    ///
    /// Loaded records are keyed by id parameter. If an ancestor uses the
    /// same one, both load, but the handler's [`Loaded`] keeps only this
    /// resource's record under that key; the ancestor's id is still
    /// reachable through [`Params::nth`](crate::dispatch::Params::nth).
    pub fn with_id(self, id_param: &str) -> Result<Self, RouteError> {
        self.resources.set_id_param(self.id, id_param)?;
        Ok(self)
    }

    /// Declare `handler` for a standard action, replacing any previous one.
    pub fn action<H, T>(self, action: Action, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.resources
            .insert_action(self.id, action, on(action_filter(action), handler));
        self
    }

    /// `GET /<name>`
    pub fn index<H, T>(self, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.action(Action::Index, handler)
    }

    /// `GET /<name>/new`
    pub fn new<H, T>(self, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.action(Action::New, handler)
    }

    /// `POST /<name>`
    pub fn create<H, T>(self, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.action(Action::Create, handler)
    }

    /// `GET /<name>/:id`
    pub fn show<H, T>(self, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.action(Action::Show, handler)
    }

    /// `GET /<name>/:id/edit`
    pub fn edit<H, T>(self, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.action(Action::Edit, handler)
    }

    /// `PUT /<name>/:id`
    pub fn update<H, T>(self, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.action(Action::Update, handler)
    }

    /// `DELETE /<name>/:id`
    pub fn destroy<H, T>(self, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.action(Action::Destroy, handler)
    }

    verb_helpers! {
        /// Custom `GET` route at the resource base.
        get, get_at => GET, GET;
        /// Custom `POST` route at the resource base.
        post, post_at => POST, POST;
        /// Custom `PUT` route at the resource base.
        put, put_at => PUT, PUT;
        /// Custom `PATCH` route at the resource base.
        patch, patch_at => PATCH, PATCH;
        /// Custom `DELETE` route at the resource base.
        delete, delete_at => DELETE, DELETE;
    }

    /// Custom route for any verb. `None` registers at the resource base.
    pub fn route<H, T>(self, method: Method, subpath: Option<&str>, handler: H) -> Result<Self, RouteError>
    where
        H: Handler<T, S>,
        T: 'static,
    {
        let filter = MethodFilter::try_from(method.clone())
            .map_err(|_| RouteError::UnsupportedMethod(method.clone()))?;
        if let Some(subpath) = subpath {
            path::validate_subpath(subpath)?;
        }
        Ok(self.custom(filter, method, subpath, handler))
    }

    fn custom<H, T>(self, filter: MethodFilter, method: Method, subpath: Option<&str>, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.resources.insert_custom(
            self.id,
            method,
            subpath.map(str::to_string),
            on(filter, handler),
        );
        self
    }

    /// Auto-load this resource's record from its id before member routes.
    pub fn load<F, Fut, T, E>(self, f: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<T>, E>> + Send + 'static,
        T: Send + Sync + 'static,
        E: Into<BoxError> + 'static,
    {
        self.loader(FnLoader::new(f))
    }

    /// Like [`load`](Self::load), with access to records already loaded
    /// for ancestors.
    pub fn load_scoped<F, Fut, T, E>(self, f: F) -> Self
    where
        F: Fn(String, Loaded) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<T>, E>> + Send + 'static,
        T: Send + Sync + 'static,
        E: Into<BoxError> + 'static,
    {
        self.loader(ScopedFnLoader::new(f))
    }

    /// Assign or replace this resource's loader.
    pub fn loader(self, loader: impl Loader) -> Self {
        self.resources.set_loader(self.id, Arc::new(loader));
        self
    }

    /// Nest `child` under this resource. Returns this (parent) handle.
    pub fn add(self, child: ResourceId) -> Result<Self, RouteError> {
        self.resources.nest(self.id, child)?;
        Ok(self)
    }

    /// Alias of [`add`](Self::add).
    pub fn map(self, child: ResourceId) -> Result<Self, RouteError> {
        self.add(child)
    }
}
