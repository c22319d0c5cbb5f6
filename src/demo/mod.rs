//! A small message board built on the resource router.
//!
//! ```text
//! GET  /                                             home
//! GET  /users, /users/:user                          users
//! *    /users/:user/forums[/new|/:forum[/edit]]      forums (all seven actions)
//! *    /users/:user/forums/:forum/threads[/:thread]  threads
//! GET  /users/:user/forums/:forum/threads/count      custom collection route
//! POST /users/:user/forums/:forum/threads/:thread/lock
//! ```
//!
//! Users, forums and threads each have a loader; forum and thread lookups
//! are scoped to the record loaded for their parent.

pub mod handlers;
pub mod store;

use std::convert::Infallible;

use crate::dispatch::Loaded;
use crate::error::RouteError;
use crate::resource::Resources;

pub use store::{Board, Forum, Thread, TitleForm, User};

fn parse_id(id: &str) -> Option<u64> {
    id.parse().ok()
}

/// Declare the board's resources, with loaders reading from `board`.
pub fn resources(board: &Board) -> Result<Resources<Board>, RouteError> {
    let mut resources = Resources::new();

    resources.root().index(handlers::home);

    let store = board.clone();
    let users = resources
        .resource("users")?
        .index(handlers::list_users)
        .show(handlers::show_user)
        .load(move |id: String| {
            let store = store.clone();
            async move { Ok::<_, Infallible>(parse_id(&id).and_then(|id| store.user(id))) }
        })
        .id();

    let store = board.clone();
    let forums = resources
        .resource("forums")?
        .index(handlers::list_forums)
        .new(handlers::new_forum)
        .create(handlers::create_forum)
        .show(handlers::show_forum)
        .edit(handlers::edit_forum)
        .update(handlers::update_forum)
        .destroy(handlers::destroy_forum)
        .load_scoped(move |id: String, scope: Loaded| {
            let store = store.clone();
            async move {
                let forum = scope
                    .get::<User>("user")
                    .zip(parse_id(&id))
                    .and_then(|(user, id)| store.forum_of(user.id, id));
                Ok::<_, Infallible>(forum)
            }
        })
        .id();

    let store = board.clone();
    let threads = resources
        .resource("threads")?
        .index(handlers::list_threads)
        .create(handlers::create_thread)
        .show(handlers::show_thread)
        .destroy(handlers::destroy_thread)
        .get_at("count", handlers::count_threads)?
        .post_at(":thread/lock", handlers::lock_thread)?
        .load_scoped(move |id: String, scope: Loaded| {
            let store = store.clone();
            async move {
                let thread = scope
                    .get::<Forum>("forum")
                    .zip(parse_id(&id))
                    .and_then(|(forum, id)| store.thread_of(forum.id, id));
                Ok::<_, Infallible>(thread)
            }
        })
        .id();

    resources.get_mut(users)?.add(forums)?;
    resources.get_mut(forums)?.map(threads)?;

    Ok(resources)
}
