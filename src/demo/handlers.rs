//! Action handlers of the message board.
//!
//! Member handlers read their records from [`Loaded`]; the load chain has
//! already answered 404 for anything missing.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::demo::store::{Board, Forum, Thread, TitleForm, User};
use crate::dispatch::Loaded;

fn record<T: Clone + Send + Sync + 'static>(loaded: &Loaded, key: &str) -> Result<T, StatusCode> {
    loaded.get::<T>(key).cloned().ok_or_else(|| {
        tracing::error!(key, "Handler ran without its loaded record");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

pub async fn home() -> &'static str {
    "message board"
}

pub async fn list_users(State(board): State<Board>) -> Json<Vec<User>> {
    Json(board.users())
}

pub async fn show_user(loaded: Loaded) -> Result<Json<User>, StatusCode> {
    record::<User>(&loaded, "user").map(Json)
}

pub async fn list_forums(State(board): State<Board>, loaded: Loaded) -> Result<Json<Vec<Forum>>, StatusCode> {
    let user = record::<User>(&loaded, "user")?;
    Ok(Json(board.forums_of(user.id)))
}

pub async fn new_forum() -> &'static str {
    "new forum"
}

pub async fn create_forum(
    State(board): State<Board>,
    loaded: Loaded,
    Json(form): Json<TitleForm>,
) -> Result<Response, StatusCode> {
    let user = record::<User>(&loaded, "user")?;
    let forum = board.add_forum(user.id, &form.title);
    Ok((StatusCode::CREATED, Json(forum)).into_response())
}

pub async fn show_forum(loaded: Loaded) -> Result<Json<Forum>, StatusCode> {
    record::<Forum>(&loaded, "forum").map(Json)
}

pub async fn edit_forum(loaded: Loaded) -> Result<String, StatusCode> {
    let forum = record::<Forum>(&loaded, "forum")?;
    Ok(format!("edit forum {}", forum.title))
}

pub async fn update_forum(
    State(board): State<Board>,
    loaded: Loaded,
    Json(form): Json<TitleForm>,
) -> Result<Json<Forum>, StatusCode> {
    let forum = record::<Forum>(&loaded, "forum")?;
    board
        .rename_forum(forum.id, &form.title)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

pub async fn destroy_forum(State(board): State<Board>, loaded: Loaded) -> Result<StatusCode, StatusCode> {
    let forum = record::<Forum>(&loaded, "forum")?;
    board.remove_forum(forum.id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_threads(State(board): State<Board>, loaded: Loaded) -> Result<Json<Vec<Thread>>, StatusCode> {
    let forum = record::<Forum>(&loaded, "forum")?;
    Ok(Json(board.threads_of(forum.id)))
}

pub async fn count_threads(State(board): State<Board>, loaded: Loaded) -> Result<String, StatusCode> {
    let forum = record::<Forum>(&loaded, "forum")?;
    Ok(board.threads_of(forum.id).len().to_string())
}

pub async fn create_thread(
    State(board): State<Board>,
    loaded: Loaded,
    Json(form): Json<TitleForm>,
) -> Result<Response, StatusCode> {
    let forum = record::<Forum>(&loaded, "forum")?;
    let thread = board.add_thread(forum.id, &form.title);
    Ok((StatusCode::CREATED, Json(thread)).into_response())
}

pub async fn show_thread(loaded: Loaded) -> Result<Json<Thread>, StatusCode> {
    record::<Thread>(&loaded, "thread").map(Json)
}

pub async fn lock_thread(State(board): State<Board>, loaded: Loaded) -> Result<Json<Thread>, StatusCode> {
    let thread = record::<Thread>(&loaded, "thread")?;
    board
        .lock_thread(thread.id)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

pub async fn destroy_thread(State(board): State<Board>, loaded: Loaded) -> Result<StatusCode, StatusCode> {
    let thread = record::<Thread>(&loaded, "thread")?;
    board.remove_thread(thread.id);
    Ok(StatusCode::NO_CONTENT)
}
