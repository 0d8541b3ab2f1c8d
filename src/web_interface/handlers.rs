//! Request handlers.
//!
//! Each handler turns one request into storage calls and answers with a page
//! or a redirect to the index. Failures are logged here and nowhere below.

use std::convert::Infallible;

use log::{error, info, warn};
use warp::http::{StatusCode, Uri};
use warp::reply::{self, Reply, Response};
use warp::{reject, Rejection};

use super::templates;
use super::types::{AppState, FormParams};
use crate::error_handling::types::WebError;
use crate::model::Post;

/// GET /
pub async fn index(state: AppState) -> Result<Response, Rejection> {
    info!("Processing /");
    let ctx = state.request_context();
    let result = state
        .storage
        .get_all(&ctx)
        .await
        .map(|posts| reply::html(templates::index_page(&posts)).into_response())
        .map_err(WebError::from);
    Ok(respond("/", result))
}

/// GET /write
pub async fn write() -> Result<Response, Rejection> {
    info!("Processing /write");
    Ok(reply::html(templates::write_page(None)).into_response())
}

/// GET /edit?id=
pub async fn edit(state: AppState, params: FormParams) -> Result<Response, Rejection> {
    info!("Processing /edit");
    Ok(respond("/edit", edit_post(&state, &params).await))
}

/// POST /save
pub async fn save(state: AppState, params: FormParams) -> Result<Response, Rejection> {
    info!("Processing /save");
    Ok(respond("/save", save_post(&state, &params).await))
}

/// POST /delete
pub async fn delete(state: AppState, params: FormParams) -> Result<Response, Rejection> {
    info!("Processing /delete");
    Ok(respond("/delete", delete_post(&state, &params).await))
}

// A concurrent delete surfaces here as NotFound, which maps to 404.
async fn edit_post(state: &AppState, params: &FormParams) -> Result<Response, WebError> {
    let id = params.required_id()?;
    let post = state.storage.find(&state.request_context(), id).await?;
    Ok(reply::html(templates::write_page(Some(&post))).into_response())
}

async fn save_post(state: &AppState, params: &FormParams) -> Result<Response, WebError> {
    let title = params.required("title")?;
    let text = params.required("text")?;
    let ctx = state.request_context();
    match params.id()? {
        Some(id) => {
            let mut post = state.storage.find(&ctx, id).await?;
            post.edit(title, text);
            state.storage.save(&ctx, &post).await?;
            info!("Saved post {}", post.id);
        }
        None => {
            let mut post = Post::local(title, text);
            state.storage.add(&ctx, &mut post).await?;
            info!("Added post {}", post.id);
        }
    }
    Ok(redirect_to_index())
}

async fn delete_post(state: &AppState, params: &FormParams) -> Result<Response, WebError> {
    let id = params.required_id()?;
    state.storage.delete(&state.request_context(), id).await?;
    info!("Deleted post {}", id);
    Ok(redirect_to_index())
}

fn redirect_to_index() -> Response {
    warp::redirect::found(Uri::from_static("/")).into_response()
}

fn respond(path: &str, result: Result<Response, WebError>) -> Response {
    match result {
        Ok(res) => res,
        Err(e) => {
            let status = e.status();
            if status.is_server_error() {
                error!("error during processing {}: {}", path, e);
            } else {
                warn!("rejected {}: {}", path, e);
            }
            error_response(status)
        }
    }
}

fn error_response(status: StatusCode) -> Response {
    let message = match status {
        StatusCode::NOT_FOUND => "Not found",
        StatusCode::BAD_REQUEST => "Bad request",
        StatusCode::METHOD_NOT_ALLOWED => "Method not allowed",
        StatusCode::PAYLOAD_TOO_LARGE => "The form is too large",
        StatusCode::SERVICE_UNAVAILABLE => "The server is busy, try again later",
        _ if status.is_client_error() => "Bad request",
        _ => "Something went wrong",
    };
    reply::with_status(
        reply::html(templates::error_page(status.as_u16(), message)),
        status,
    )
    .into_response()
}

/// Turns unmatched routes and other rejections into HTML error pages.
pub async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    let status = if err.find::<reject::MethodNotAllowed>().is_some() {
        StatusCode::METHOD_NOT_ALLOWED
    } else if err.find::<reject::PayloadTooLarge>().is_some() {
        StatusCode::PAYLOAD_TOO_LARGE
    } else if err.find::<reject::LengthRequired>().is_some() {
        StatusCode::LENGTH_REQUIRED
    } else if err.find::<reject::UnsupportedMediaType>().is_some() {
        StatusCode::UNSUPPORTED_MEDIA_TYPE
    } else if err.is_not_found() {
        return Ok(error_response(StatusCode::NOT_FOUND));
    } else {
        StatusCode::BAD_REQUEST
    };
    warn!("rejected request with {}: {:?}", status, err);
    Ok(error_response(status))
}
