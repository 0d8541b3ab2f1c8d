//! Static assets embedded from the `assets/` directory.

use rust_embed::RustEmbed;
use warp::path::Tail;
use warp::reply::{self, Reply, Response};
use warp::Rejection;

#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/assets/"]
struct Assets;

/// GET /assets/<path>
pub async fn serve(path: Tail) -> Result<Response, Rejection> {
    let name = path.as_str();
    let file = Assets::get(name).ok_or_else(warp::reject::not_found)?;
    let mime = mime_guess::from_path(name).first_or_octet_stream();
    Ok(reply::with_header(file.data.into_owned(), "content-type", mime.as_ref()).into_response())
}
