//! Resource registry and route registration.
//!
//! # Responsibilities
//! - Own every resource of the application in an arena
//! - Return the same resource for repeated look-ups by name
//! - Register routes as actions and custom routes are declared
//! - Re-register a subtree whenever its ancestor chain changes
//! - Compile the route table into an axum `Router`
//!
//! # Design Decisions
//! - Parents own children by id; the parent link is a plain index
//! - Registration is single-writer (`&mut self`) and happens before serving
//! - Load plans are built at compile time, so loaders may be set in any order

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use axum::{http::Method, routing::MethodRouter, Router};
use serde::Serialize;

use crate::dispatch::loader::Loader;
use crate::dispatch::wrapper::{self, LoadPlan, LoadStep};
use crate::error::RouteError;
use crate::observability::metrics;
use crate::resource::action::Action;
use crate::resource::handle::ResourceMut;
use crate::resource::inflect::singularize;
use crate::resource::path::{self, ComposedPath, Link, Tail};
use crate::resource::table::{RouteEntry, RouteKey, RouteTable, Target};
use crate::resource::ResourceId;

pub(crate) struct CustomRoute<S> {
    pub(crate) method: Method,
    pub(crate) subpath: Option<String>,
    pub(crate) endpoint: MethodRouter<S>,
}

pub(crate) struct Resource<S> {
    pub(crate) name: String,
    pub(crate) id_param: String,
    pub(crate) actions: BTreeMap<Action, MethodRouter<S>>,
    pub(crate) custom: Vec<CustomRoute<S>>,
    pub(crate) loader: Option<Arc<dyn Loader>>,
    pub(crate) parent: Option<ResourceId>,
    pub(crate) children: Vec<ResourceId>,
}

impl<S> Resource<S> {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            id_param: default_id_param(name),
            actions: BTreeMap::new(),
            custom: Vec::new(),
            loader: None,
            parent: None,
            children: Vec::new(),
        }
    }

    fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "(root)"
        } else {
            &self.name
        }
    }
}

/// `forums` → `forum`, `api/blog-posts` → `blog_post`, root → `id`.
pub fn default_id_param(name: &str) -> String {
    let last = name.rsplit('/').find(|s| !s.is_empty()).unwrap_or_default();
    if last.is_empty() {
        return "id".to_string();
    }
    singularize(last)
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// A registered route, as reported by [`Resources::routes`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteInfo {
    pub method: String,
    pub path: String,
    pub resource: String,
    /// Standard action name, or `custom`.
    pub action: String,
}

/// The set of resources making up an application.
///
/// Declare resources with [`Resources::resource`] (named) or
/// [`Resources::root`], nest them, then call [`Resources::into_router`].
pub struct Resources<S = ()> {
    nodes: Vec<Resource<S>>,
    by_name: HashMap<String, ResourceId>,
    table: RouteTable,
}

impl<S> Default for Resources<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Resources<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            by_name: HashMap::new(),
            table: RouteTable::new(),
        }
    }

    /// Declare or look up the resource called `name`.
    ///
    /// The first call creates an empty resource; later calls return the same
    /// one so it can be augmented. An empty name declares a new root resource.
    pub fn resource(&mut self, name: &str) -> Result<ResourceMut<'_, S>, RouteError> {
        let name = name.trim_matches('/');
        if name.is_empty() {
            return Ok(self.root());
        }
        path::validate_name(name)?;

        let existing = self.by_name.get(name).copied();
        let id = match existing {
            Some(id) => id,
            None => {
                let id = self.push(Resource::new(name));
                self.by_name.insert(name.to_string(), id);
                id
            }
        };
        Ok(ResourceMut::bind(self, id))
    }

    /// Declare a new root resource, mounted at `/`.
    pub fn root(&mut self) -> ResourceMut<'_, S> {
        let id = self.push(Resource::new(""));
        ResourceMut::bind(self, id)
    }

    /// A handle to an already declared resource.
    pub fn get_mut(&mut self, id: ResourceId) -> Result<ResourceMut<'_, S>, RouteError> {
        self.node(id)?;
        Ok(ResourceMut::bind(self, id))
    }

    pub fn lookup(&self, name: &str) -> Option<ResourceId> {
        self.by_name.get(name.trim_matches('/')).copied()
    }

    pub fn name(&self, id: ResourceId) -> Option<&str> {
        self.nodes.get(id.0).map(|n| n.name.as_str())
    }

    pub fn id_param(&self, id: ResourceId) -> Option<&str> {
        self.nodes.get(id.0).map(|n| n.id_param.as_str())
    }

    pub fn parent(&self, id: ResourceId) -> Option<ResourceId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    pub fn children(&self, id: ResourceId) -> &[ResourceId] {
        self.nodes
            .get(id.0)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
    }

    /// Number of declared resources.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nest `child` under `parent` and move the child's subtree beneath the
    /// parent's member path. Returns `parent`.
    pub fn nest(&mut self, parent: ResourceId, child: ResourceId) -> Result<ResourceId, RouteError> {
        self.node(parent)?;
        let child_node = self.node(child)?;

        if child_node.name.is_empty() {
            return Err(RouteError::UnnamedChild(child));
        }
        if let Some(existing) = child_node.parent {
            return Err(RouteError::AlreadyNested {
                child,
                parent: existing,
            });
        }
        if parent == child || self.ancestors(parent).contains(&child) {
            return Err(RouteError::CyclicNesting { parent, child });
        }

        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);

        tracing::debug!(
            parent = %self.nodes[parent.0].display_name(),
            child = %self.nodes[child.0].name,
            "Resource nested"
        );

        self.refresh(child);
        Ok(parent)
    }

    /// The composed path of `action` on resource `id`.
    pub fn path_for(&self, id: ResourceId, action: Action) -> Result<String, RouteError> {
        self.node(id)?;
        Ok(path::compose(&self.chain(id), Tail::Action(action))?.path)
    }

    /// Every registered route, sorted by path then method.
    pub fn routes(&self) -> Vec<RouteInfo> {
        let mut routes: Vec<RouteInfo> = self
            .table
            .iter()
            .map(|(key, entry)| RouteInfo {
                method: key.method.to_string(),
                path: entry.path.clone(),
                resource: self.nodes[entry.owner.0].display_name().to_string(),
                action: match entry.target {
                    Target::Action(action) => action.name().to_string(),
                    Target::Custom(_) => "custom".to_string(),
                },
            })
            .collect();
        routes.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.method.cmp(&b.method)));
        routes
    }

    /// Freeze the registered routes into an axum router.
    ///
    /// Routes are matched with positional parameter names, so `/a/:x` and
    /// `/a/:y` share a matcher; handlers still see the declared names.
    pub fn into_router(self) -> Router<S> {
        let mut by_path: BTreeMap<String, MethodRouter<S>> = BTreeMap::new();
        let mut count = 0;

        for (key, entry) in self.table.iter() {
            let owner = &self.nodes[entry.owner.0];
            let endpoint = match entry.target {
                Target::Action(action) => owner.actions.get(&action).cloned(),
                Target::Custom(index) => owner.custom.get(index).map(|c| c.endpoint.clone()),
            };
            let Some(endpoint) = endpoint else {
                continue;
            };

            let plan = self.load_plan(entry);
            tracing::debug!(
                method = %key.method,
                path = %entry.path,
                loaders = plan.len(),
                "Compiling route"
            );
            let endpoint = wrapper::wrap(endpoint, plan);

            let merged = match by_path.remove(&key.matcher) {
                Some(existing) => existing.merge(endpoint),
                None => endpoint,
            };
            by_path.insert(key.matcher.clone(), merged);
            count += 1;
        }

        let router = by_path
            .into_iter()
            .fold(Router::new(), |router, (path, endpoint)| router.route(&path, endpoint));

        metrics::record_routes_compiled(count);
        tracing::info!(routes = count, resources = self.nodes.len(), "Resource routes compiled");
        router
    }

    pub(crate) fn node(&self, id: ResourceId) -> Result<&Resource<S>, RouteError> {
        self.nodes.get(id.0).ok_or(RouteError::UnknownResource(id))
    }

    pub(crate) fn set_id_param(&mut self, id: ResourceId, id_param: &str) -> Result<(), RouteError> {
        path::validate_id_param(id_param)?;
        self.node(id)?;
        self.nodes[id.0].id_param = id_param.to_string();
        self.refresh(id);
        Ok(())
    }

    pub(crate) fn set_loader(&mut self, id: ResourceId, loader: Arc<dyn Loader>) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.loader = Some(loader);
        }
    }

    pub(crate) fn insert_action(&mut self, id: ResourceId, action: Action, endpoint: MethodRouter<S>) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.actions.insert(action, endpoint);
            self.register_action(id, action);
        }
    }

    pub(crate) fn insert_custom(
        &mut self,
        id: ResourceId,
        method: Method,
        subpath: Option<String>,
        endpoint: MethodRouter<S>,
    ) {
        let Some(node) = self.nodes.get_mut(id.0) else {
            return;
        };
        let index = match node
            .custom
            .iter()
            .position(|c| c.method == method && c.subpath == subpath)
        {
            Some(index) => {
                node.custom[index].endpoint = endpoint;
                index
            }
            None => {
                node.custom.push(CustomRoute {
                    method,
                    subpath,
                    endpoint,
                });
                node.custom.len() - 1
            }
        };
        self.register_custom(id, index);
    }

    fn push(&mut self, resource: Resource<S>) -> ResourceId {
        let id = ResourceId(self.nodes.len());
        tracing::debug!(resource = %resource.display_name(), id = %id, "Resource declared");
        self.nodes.push(resource);
        id
    }

    /// Ancestors of `id`, nearest first.
    fn ancestors(&self, id: ResourceId) -> Vec<ResourceId> {
        let mut out = Vec::new();
        let mut current = self.parent(id);
        while let Some(ancestor) = current {
            out.push(ancestor);
            current = self.parent(ancestor);
        }
        out
    }

    /// The chain from the outermost root down to `id` inclusive.
    fn chain(&self, id: ResourceId) -> Vec<Link<'_>> {
        let mut ids = self.ancestors(id);
        ids.reverse();
        ids.push(id);
        ids.into_iter()
            .map(|rid| {
                let node = &self.nodes[rid.0];
                Link {
                    id: rid,
                    name: &node.name,
                    id_param: &node.id_param,
                }
            })
            .collect()
    }

    /// `id` and all its descendants, parents before children.
    fn subtree(&self, id: ResourceId) -> Vec<ResourceId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// Withdraw and re-register every route of `id`'s subtree.
    fn refresh(&mut self, id: ResourceId) {
        let subtree = self.subtree(id);
        let owners: HashSet<ResourceId> = subtree.iter().copied().collect();
        let withdrawn = self.table.remove_owned_by(&owners);

        for rid in &subtree {
            self.register_resource(*rid);
        }

        tracing::debug!(
            resource = %self.nodes[id.0].display_name(),
            resources = subtree.len(),
            withdrawn,
            "Subtree routes re-registered"
        );
    }

    fn register_resource(&mut self, id: ResourceId) {
        let actions: Vec<Action> = self.nodes[id.0].actions.keys().copied().collect();
        for action in actions {
            self.register_action(id, action);
        }
        for index in 0..self.nodes[id.0].custom.len() {
            self.register_custom(id, index);
        }
    }

    fn register_action(&mut self, id: ResourceId, action: Action) {
        let composed = path::compose(&self.chain(id), Tail::Action(action));
        match composed {
            Ok(composed) => self.register(id, action.method(), composed, Target::Action(action)),
            Err(error) => tracing::error!(%error, action = %action, "Route not registered"),
        }
    }

    fn register_custom(&mut self, id: ResourceId, index: usize) {
        let route = &self.nodes[id.0].custom[index];
        let method = route.method.clone();
        let composed = path::compose(&self.chain(id), Tail::Custom(route.subpath.as_deref()));
        match composed {
            Ok(composed) => self.register(id, method, composed, Target::Custom(index)),
            Err(error) => tracing::error!(%error, method = %method, "Route not registered"),
        }
    }

    fn register(&mut self, owner: ResourceId, method: Method, composed: ComposedPath, target: Target) {
        let key = RouteKey::new(method, &composed.path);
        tracing::debug!(
            method = %key.method,
            path = %composed.path,
            resource = %self.nodes[owner.0].display_name(),
            "Route registered"
        );

        let entry = RouteEntry {
            path: composed.path,
            owner,
            target,
            params: composed.params,
        };
        if let Some(previous) = self.table.insert(key.clone(), entry) {
            if previous.owner != owner || previous.target != target {
                tracing::debug!(
                    method = %key.method,
                    path = %previous.path,
                    previous = %self.nodes[previous.owner.0].display_name(),
                    "Route superseded"
                );
            }
        }
    }

    /// Loaders to run for `entry`, in path order.
    ///
    /// Records are keyed by id parameter; when two resources in the chain
    /// share one, the inner record replaces the outer.
    fn load_plan(&self, entry: &RouteEntry) -> LoadPlan {
        let names = entry.params.iter().map(|slot| slot.name.clone()).collect();
        let steps: Vec<LoadStep> = entry
            .params
            .iter()
            .enumerate()
            .filter_map(|(position, slot)| {
                let owner = &self.nodes[slot.owner?.0];
                let loader = owner.loader.clone()?;
                Some(LoadStep {
                    resource: owner.display_name().to_string(),
                    key: owner.id_param.clone(),
                    position,
                    loader,
                })
            })
            .collect();

        let mut keys = HashSet::new();
        for step in &steps {
            if !keys.insert(step.key.as_str()) {
                tracing::warn!(
                    path = %entry.path,
                    key = %step.key,
                    resource = %step.resource,
                    "Loaded record shadows an ancestor's record with the same id parameter"
                );
            }
        }
        LoadPlan::new(names, steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn ok() -> &'static str {
        "ok"
    }

    fn paths(resources: &Resources) -> Vec<(String, String)> {
        resources
            .routes()
            .into_iter()
            .map(|r| (r.method, r.path))
            .collect()
    }

    #[test]
    fn test_default_id_param() {
        assert_eq!(default_id_param("forums"), "forum");
        assert_eq!(default_id_param("api/blog-posts"), "blog_post");
        assert_eq!(default_id_param(""), "id");
    }

    #[test]
    fn test_lookup_returns_same_resource() {
        let mut resources: Resources = Resources::new();
        let first = resources.resource("foo").unwrap().id();
        let second = resources.resource("foo").unwrap().id();
        let by_slash = resources.resource("/foo/").unwrap().id();

        assert_eq!(first, second);
        assert_eq!(first, by_slash);
        assert_eq!(resources.len(), 1);
        assert!(resources.routes().is_empty());
        assert_eq!(resources.lookup("foo"), Some(first));
    }

    #[test]
    fn test_all_actions_register_seven_routes() {
        let mut resources: Resources = Resources::new();
        resources
            .resource("forums")
            .unwrap()
            .index(ok)
            .new(ok)
            .create(ok)
            .show(ok)
            .edit(ok)
            .update(ok)
            .destroy(ok);

        let routes = paths(&resources);
        assert_eq!(routes.len(), 7);
        for expected in [
            ("GET", "/forums"),
            ("GET", "/forums/new"),
            ("POST", "/forums"),
            ("GET", "/forums/:forum"),
            ("GET", "/forums/:forum/edit"),
            ("PUT", "/forums/:forum"),
            ("DELETE", "/forums/:forum"),
        ] {
            assert!(
                routes.contains(&(expected.0.to_string(), expected.1.to_string())),
                "missing {:?}",
                expected
            );
        }
    }

    #[test]
    fn test_redeclaring_action_replaces() {
        let mut resources: Resources = Resources::new();
        resources.resource("forums").unwrap().show(ok);
        resources.resource("forums").unwrap().show(ok);
        assert_eq!(resources.routes().len(), 1);
    }

    #[test]
    fn test_differently_named_params_compile() {
        let mut resources: Resources = Resources::new();
        resources
            .resource("users")
            .unwrap()
            .show(ok)
            .put_at(":uid", ok)
            .unwrap();
        resources.root().show(ok);
        resources.root().with_id("forum").unwrap().edit(ok);

        assert_eq!(
            paths(&resources),
            vec![
                ("GET".to_string(), "/:forum/edit".to_string()),
                ("GET".to_string(), "/:id".to_string()),
                ("PUT".to_string(), "/users/:uid".to_string()),
                ("GET".to_string(), "/users/:user".to_string()),
            ]
        );
        let _router = resources.into_router();
    }

    #[test]
    fn test_nesting_moves_routes() {
        let mut resources: Resources = Resources::new();
        let forums = resources.resource("forums").unwrap().index(ok).show(ok).id();
        let threads = resources.resource("threads").unwrap().index(ok).show(ok).id();

        assert_eq!(resources.nest(forums, threads).unwrap(), forums);
        assert_eq!(resources.parent(threads), Some(forums));
        assert_eq!(resources.children(forums), &[threads]);

        let routes = paths(&resources);
        assert_eq!(
            routes,
            vec![
                ("GET".to_string(), "/forums".to_string()),
                ("GET".to_string(), "/forums/:forum".to_string()),
                ("GET".to_string(), "/forums/:forum/threads".to_string()),
                ("GET".to_string(), "/forums/:forum/threads/:thread".to_string()),
            ]
        );
    }

    #[test]
    fn test_nesting_is_order_independent() {
        // nest first, declare later
        let mut early: Resources = Resources::new();
        let a = early.resource("a").unwrap().with_id("a_id").unwrap().id();
        let b = early.resource("b").unwrap().with_id("b_id").unwrap().id();
        let c = early.resource("c").unwrap().with_id("c_id").unwrap().id();
        early.nest(b, c).unwrap();
        early.nest(a, b).unwrap();
        early.get_mut(c).unwrap().show(ok);

        // declare first, nest root-to-leaf
        let mut late: Resources = Resources::new();
        let a2 = late.resource("a").unwrap().with_id("a_id").unwrap().id();
        let b2 = late.resource("b").unwrap().with_id("b_id").unwrap().id();
        let c2 = late.resource("c").unwrap().with_id("c_id").unwrap().show(ok).id();
        late.nest(a2, b2).unwrap();
        late.nest(b2, c2).unwrap();

        let expected = "/a/:a_id/b/:b_id/c/:c_id";
        assert_eq!(early.path_for(c, Action::Show).unwrap(), expected);
        assert_eq!(paths(&early), paths(&late));
        assert_eq!(paths(&late)[0].1, expected);
    }

    #[test]
    fn test_nesting_errors() {
        let mut resources: Resources = Resources::new();
        let users = resources.resource("users").unwrap().id();
        let forums = resources.resource("forums").unwrap().id();
        let root = resources.root().id();

        assert!(matches!(
            resources.nest(users, root),
            Err(RouteError::UnnamedChild(_))
        ));
        assert!(matches!(
            resources.nest(users, users),
            Err(RouteError::CyclicNesting { .. })
        ));

        resources.nest(users, forums).unwrap();
        assert!(matches!(
            resources.nest(users, forums),
            Err(RouteError::AlreadyNested { .. })
        ));
        assert!(matches!(
            resources.nest(forums, users),
            Err(RouteError::CyclicNesting { .. })
        ));
        assert!(matches!(
            resources.nest(users, ResourceId(99)),
            Err(RouteError::UnknownResource(_))
        ));
    }

    #[test]
    fn test_changing_id_param_reregisters_subtree() {
        let mut resources: Resources = Resources::new();
        let forums = resources.resource("forums").unwrap().show(ok).id();
        let threads = resources.resource("threads").unwrap().show(ok).id();
        resources.nest(forums, threads).unwrap();

        resources.get_mut(forums).unwrap().with_id("fid").unwrap();

        assert_eq!(
            paths(&resources),
            vec![
                ("GET".to_string(), "/forums/:fid".to_string()),
                ("GET".to_string(), "/forums/:fid/threads/:thread".to_string()),
            ]
        );
    }

    #[test]
    fn test_root_resource_and_invalid_names() {
        let mut resources: Resources = Resources::new();
        let root = resources.resource("").unwrap().index(ok).show(ok).id();
        assert_eq!(resources.id_param(root), Some("id"));
        assert_eq!(resources.lookup(""), None);
        assert_eq!(
            paths(&resources),
            vec![
                ("GET".to_string(), "/".to_string()),
                ("GET".to_string(), "/:id".to_string()),
            ]
        );

        assert!(matches!(
            resources.resource("forums/:id"),
            Err(RouteError::InvalidName(_))
        ));
    }
}
