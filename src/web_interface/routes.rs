use std::collections::HashMap;
use std::convert::Infallible;

use warp::reply::{Reply, Response};
use warp::{Filter, Rejection};

use super::assets;
use super::handlers;
use super::types::{AppState, FormParams};

/// Largest form body accepted on any route.
pub const MAX_FORM_BYTES: u64 = 1024 * 1024;

fn with_state(state: AppState) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

/// Matches only requests that carry no body at all.
fn empty_body() -> impl Filter<Extract = (HashMap<String, String>,), Error = Rejection> + Clone {
    warp::header::optional::<u64>("content-length")
        .and(warp::header::optional::<String>("transfer-encoding"))
        .and_then(|length: Option<u64>, encoding: Option<String>| async move {
            match (length.unwrap_or(0), encoding) {
                (0, None) => Ok::<_, Rejection>(HashMap::<String, String>::new()),
                _ => Err(warp::reject()),
            }
        })
}

/// Query string merged with an optional form-encoded body.
///
/// A body that is present but too large, unsized or not form-encoded is
/// rejected rather than read as empty.
pub fn form_params() -> impl Filter<Extract = (FormParams,), Error = Rejection> + Clone {
    let body = empty_body()
        .or(warp::body::content_length_limit(MAX_FORM_BYTES)
            .and(warp::body::form::<HashMap<String, String>>()))
        .unify();
    warp::query::<HashMap<String, String>>()
        .and(body)
        .map(FormParams::merge)
}

/// /
pub fn index_route(
    state: AppState,
) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    warp::path::end()
        .and(with_state(state))
        .and_then(handlers::index)
}

/// /write
pub fn write_route() -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    warp::path("write")
        .and(warp::path::end())
        .and_then(handlers::write)
}

/// /edit?id=
pub fn edit_route(
    state: AppState,
) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    warp::path("edit")
        .and(warp::path::end())
        .and(with_state(state))
        .and(form_params())
        .and_then(handlers::edit)
}

/// /save
pub fn save_route(
    state: AppState,
) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    warp::path("save")
        .and(warp::path::end())
        .and(with_state(state))
        .and(form_params())
        .and_then(handlers::save)
}

/// /delete
pub fn delete_route(
    state: AppState,
) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    warp::path("delete")
        .and(warp::path::end())
        .and(with_state(state))
        .and(form_params())
        .and_then(handlers::delete)
}

/// GET /assets/<path>
pub fn assets_route() -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    warp::path("assets")
        .and(warp::get())
        .and(warp::path::tail())
        .and_then(assets::serve)
}

/// Every route of the application, with error pages and access logging.
pub fn routes(state: AppState) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    index_route(state.clone())
        .or(write_route())
        .unify()
        .or(edit_route(state.clone()))
        .unify()
        .or(save_route(state.clone()))
        .unify()
        .or(delete_route(state))
        .unify()
        .or(assets_route())
        .unify()
        .recover(handlers::handle_rejection)
        .unify()
        .with(warp::log("scribe::web"))
}
