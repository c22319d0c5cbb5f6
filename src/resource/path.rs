//! Path composition across a resource's ancestor chain.
//!
//! # Responsibilities
//! - Concatenate `/<name>/:<id>` for every ancestor, root to leaf
//! - Append the leaf's `/<name>` and the action shape or custom subpath
//! - Record which resource owns each path parameter, in order
//! - Translate composed paths into axum's `{param}` syntax
//!
//! # Design Decisions
//! - Paths are kept in `:param` form for listing
//! - axum parameters are named by position (`{p0}`, `{p1}`, ...); the
//!   declared names travel with the route and are restored per request, so
//!   routes that differ only in parameter names share one matcher path
//! - Adjacent slashes collapse; trailing slash is dropped except for `/`
//! - An unnamed resource contributes no name segment and may only be the root

use crate::error::RouteError;
use crate::resource::action::{Action, Scope};
use crate::resource::ResourceId;

/// One element of an ancestor chain.
#[derive(Debug, Clone, Copy)]
pub struct Link<'a> {
    pub id: ResourceId,
    pub name: &'a str,
    pub id_param: &'a str,
}

/// What the leaf of the chain contributes after its base path.
#[derive(Debug, Clone, Copy)]
pub enum Tail<'a> {
    Action(Action),
    Custom(Option<&'a str>),
}

/// A path parameter position in a composed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSlot {
    pub name: String,
    /// Resource whose id this slot carries, if any.
    pub owner: Option<ResourceId>,
}

/// A fully composed route path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedPath {
    pub path: String,
    pub params: Vec<ParamSlot>,
}

/// Compose the path for `tail` on the last element of `chain`.
pub fn compose(chain: &[Link<'_>], tail: Tail<'_>) -> Result<ComposedPath, RouteError> {
    let (leaf, ancestors) = chain.split_last().ok_or(RouteError::EmptyChain)?;

    let mut raw = String::new();
    let mut params = Vec::new();

    for (depth, link) in ancestors.iter().enumerate() {
        if link.name.is_empty() && depth > 0 {
            return Err(RouteError::UnnamedChild(link.id));
        }
        push_segment(&mut raw, link.name);
        push_param(&mut raw, &mut params, link.id_param, Some(link.id));
    }

    if leaf.name.is_empty() && !ancestors.is_empty() {
        return Err(RouteError::UnnamedChild(leaf.id));
    }
    push_segment(&mut raw, leaf.name);

    match tail {
        Tail::Action(action) => {
            raw.push_str(&action.shape(leaf.id_param));
            if action.scope() == Scope::Member {
                params.push(ParamSlot {
                    name: leaf.id_param.to_string(),
                    owner: Some(leaf.id),
                });
            }
        }
        Tail::Custom(Some(subpath)) => {
            raw.push('/');
            raw.push_str(subpath);
            for segment in subpath.split('/') {
                if let Some(name) = segment.strip_prefix(':') {
                    let owner = (name == leaf.id_param).then_some(leaf.id);
                    params.push(ParamSlot {
                        name: name.to_string(),
                        owner,
                    });
                }
            }
        }
        Tail::Custom(None) => {}
    }

    Ok(ComposedPath {
        path: normalize(&raw),
        params,
    })
}

fn push_segment(raw: &mut String, name: &str) {
    if !name.is_empty() {
        raw.push('/');
        raw.push_str(name);
    }
}

fn push_param(raw: &mut String, params: &mut Vec<ParamSlot>, name: &str, owner: Option<ResourceId>) {
    raw.push_str("/:");
    raw.push_str(name);
    params.push(ParamSlot {
        name: name.to_string(),
        owner,
    });
}

/// Collapse adjacent slashes and drop a trailing slash.
pub fn normalize(raw: &str) -> String {
    let segments: Vec<&str> = raw.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}

/// Rewrite `:param` segments into axum's matcher syntax, naming each
/// parameter by its position.
///
/// `/users/:user/forums/:forum` becomes `/users/{p0}/forums/{p1}`.
pub fn to_axum_path(path: &str) -> String {
    if path == "/" {
        return path.to_string();
    }
    let mut position = 0;
    path.split('/')
        .map(|segment| {
            if segment.starts_with(':') {
                let matcher = format!("{{p{}}}", position);
                position += 1;
                matcher
            } else {
                segment.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn is_ident(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Check a resource name: slash separated plain segments, no parameters.
pub fn validate_name(name: &str) -> Result<(), RouteError> {
    let valid = name
        .split('/')
        .filter(|s| !s.is_empty())
        .all(|s| !s.starts_with([':', '*']) && !s.contains(['{', '}']));
    if valid {
        Ok(())
    } else {
        Err(RouteError::InvalidName(name.to_string()))
    }
}

/// Check an id parameter name.
pub fn validate_id_param(id_param: &str) -> Result<(), RouteError> {
    if is_ident(id_param) {
        Ok(())
    } else {
        Err(RouteError::InvalidIdParam(id_param.to_string()))
    }
}

/// Check a custom route subpath.
///
/// Segments are literals or `:name` parameters. Catch-all segments are
/// not supported.
pub fn validate_subpath(subpath: &str) -> Result<(), RouteError> {
    let invalid = || RouteError::InvalidSubpath(subpath.to_string());
    let segments: Vec<&str> = subpath.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return Err(invalid());
    }

    for segment in segments {
        if segment.contains(['{', '}']) || segment.starts_with('*') {
            return Err(invalid());
        }
        if let Some(name) = segment.strip_prefix(':') {
            if !is_ident(name) {
                return Err(invalid());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(id: usize, name: &'static str, id_param: &'static str) -> Link<'static> {
        Link {
            id: ResourceId(id),
            name,
            id_param,
        }
    }

    fn path_of(chain: &[Link<'_>], tail: Tail<'_>) -> String {
        compose(chain, tail).unwrap().path
    }

    #[test]
    fn test_single_resource_paths() {
        let chain = [link(0, "forums", "forum")];
        let paths: Vec<_> = Action::ALL
            .iter()
            .map(|a| path_of(&chain, Tail::Action(*a)))
            .collect();
        assert_eq!(
            paths,
            vec![
                "/forums",
                "/forums/new",
                "/forums",
                "/forums/:forum",
                "/forums/:forum/edit",
                "/forums/:forum",
                "/forums/:forum",
            ]
        );
    }

    #[test]
    fn test_root_resource_has_no_name_segment() {
        let chain = [link(0, "", "id")];
        assert_eq!(path_of(&chain, Tail::Action(Action::Index)), "/");
        assert_eq!(path_of(&chain, Tail::Action(Action::New)), "/new");
        assert_eq!(path_of(&chain, Tail::Action(Action::Show)), "/:id");
        assert_eq!(path_of(&chain, Tail::Action(Action::Edit)), "/:id/edit");
    }

    #[test]
    fn test_deep_chain() {
        let chain = [link(0, "a", "a_id"), link(1, "b", "b_id"), link(2, "c", "c_id")];
        let composed = compose(&chain, Tail::Action(Action::Show)).unwrap();
        assert_eq!(composed.path, "/a/:a_id/b/:b_id/c/:c_id");
        let owners: Vec<_> = composed.params.iter().map(|p| p.owner).collect();
        assert_eq!(
            owners,
            vec![Some(ResourceId(0)), Some(ResourceId(1)), Some(ResourceId(2))]
        );

        assert_eq!(
            path_of(&chain, Tail::Action(Action::Index)),
            "/a/:a_id/b/:b_id/c"
        );
    }

    #[test]
    fn test_repeated_param_names_compose() {
        let chain = [link(0, "a", "id"), link(1, "b", "id")];
        let composed = compose(&chain, Tail::Action(Action::Update)).unwrap();
        assert_eq!(composed.path, "/a/:id/b/:id");
        assert_eq!(composed.params.len(), 2);
    }

    #[test]
    fn test_root_as_outermost_ancestor() {
        let chain = [link(0, "", "id"), link(1, "threads", "thread")];
        assert_eq!(
            path_of(&chain, Tail::Action(Action::Show)),
            "/:id/threads/:thread"
        );
    }

    #[test]
    fn test_unnamed_nested_resource_is_rejected() {
        let chain = [link(0, "forums", "forum"), link(1, "", "id")];
        assert!(matches!(
            compose(&chain, Tail::Action(Action::Index)),
            Err(RouteError::UnnamedChild(ResourceId(1)))
        ));
    }

    #[test]
    fn test_custom_tails() {
        let chain = [link(0, "user", "user")];
        assert_eq!(path_of(&chain, Tail::Custom(None)), "/user");
        assert_eq!(path_of(&chain, Tail::Custom(Some("clone"))), "/user/clone");

        let composed = compose(&chain, Tail::Custom(Some("food/:name"))).unwrap();
        assert_eq!(composed.path, "/user/food/:name");
        assert_eq!(
            composed.params,
            vec![ParamSlot {
                name: "name".into(),
                owner: None
            }]
        );

        let composed = compose(&chain, Tail::Custom(Some(":user/avatar"))).unwrap();
        assert_eq!(composed.params[0].owner, Some(ResourceId(0)));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("//forums//"), "/forums");
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize(""), "/");
    }

    #[test]
    fn test_to_axum_path() {
        assert_eq!(to_axum_path("/"), "/");
        assert_eq!(to_axum_path("/forums/:forum/edit"), "/forums/{p0}/edit");
        assert_eq!(
            to_axum_path("/users/:user/forums/:forum/threads"),
            "/users/{p0}/forums/{p1}/threads"
        );
        assert_eq!(to_axum_path("/users/:uid"), to_axum_path("/users/:user"));
    }

    #[test]
    fn test_validation() {
        assert!(validate_subpath("clone").is_ok());
        assert!(validate_subpath("/food/:name").is_ok());
        assert!(validate_subpath("files/*rest").is_err());
        assert!(validate_subpath("").is_err());
        assert!(validate_subpath("/").is_err());
        assert!(validate_subpath("food/:").is_err());
        assert!(validate_subpath("{id}").is_err());

        assert!(validate_id_param("uid").is_ok());
        assert!(validate_id_param("").is_err());
        assert!(validate_id_param("a-b").is_err());

        assert!(validate_name("api/forums").is_ok());
        assert!(validate_name("forums/:id").is_err());
    }
}
