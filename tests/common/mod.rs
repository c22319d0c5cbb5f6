//! Shared fixtures for integration tests.
//!
//! `forum_actions` and `thread_actions` declare handlers that echo the
//! action and the ids they were reached with. `Forum::get` and
//! `Thread::get` are loaders over a fixed data set.

#![allow(dead_code)]

use std::convert::Infallible;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use tower::ServiceExt;

use resource_router::{Params, ResourceMut};

fn id(params: &Params, name: &str) -> String {
    params.get(name).unwrap_or_default().to_string()
}

/// All seven actions; member actions echo the `forum` parameter.
pub fn forum_actions(forum: ResourceMut<'_>) -> ResourceMut<'_> {
    forum
        .index(|| async { "forum index" })
        .new(|| async { "new forum" })
        .create(|| async { "create forum" })
        .show(|params: Params| async move { format!("show forum {}", id(&params, "forum")) })
        .edit(|params: Params| async move { format!("edit forum {}", id(&params, "forum")) })
        .update(|params: Params| async move { format!("update forum {}", id(&params, "forum")) })
        .destroy(|params: Params| async move { format!("destroy forum {}", id(&params, "forum")) })
}

pub fn thread_actions(thread: ResourceMut<'_>) -> ResourceMut<'_> {
    thread
        .index(|params: Params| async move {
            format!("thread index of forum {}", id(&params, "forum"))
        })
        .show(|params: Params| async move {
            format!(
                "show thread {} of forum {}",
                id(&params, "thread"),
                id(&params, "forum")
            )
        })
}

#[derive(Debug, Clone)]
pub struct Forum {
    pub title: String,
}

impl Forum {
    pub async fn get(id: String) -> Result<Option<Forum>, Infallible> {
        Ok((id == "12").then(|| Forum {
            title: "Ferrets".into(),
        }))
    }
}

#[derive(Debug, Clone)]
pub struct Thread {
    pub title: String,
}

impl Thread {
    pub async fn get(id: String) -> Result<Option<Thread>, Infallible> {
        Ok((id == "1").then(|| Thread {
            title: "Tobi rules".into(),
        }))
    }
}

/// Send one request through `router` and collect the body as text.
pub async fn send(router: &Router, method: Method, uri: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

pub async fn get(router: &Router, uri: &str) -> (StatusCode, String) {
    send(router, Method::GET, uri).await
}
