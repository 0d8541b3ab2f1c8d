use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sea_orm::DbErr;
use warp::http::StatusCode;
use warp::test::request;

use super::routes::MAX_FORM_BYTES;
use super::*;
use crate::error_handling::types::StorageError;
use crate::model::{Post, PostId};
use crate::storage::context::Context;
use crate::storage::database_storage::DatabaseStorage;
use crate::storage::storage_trait::Storage;

const FORM: &str = "application/x-www-form-urlencoded";

async fn app() -> (Arc<DatabaseStorage>, AppState) {
    let storage = DatabaseStorage::in_memory().await.unwrap();
    storage.init(&Context::background()).await.unwrap();
    let storage = Arc::new(storage);
    let state = AppState::new(storage.clone(), Duration::from_secs(5));
    (storage, state)
}

fn body_text<B: AsRef<[u8]>>(res: &warp::http::Response<B>) -> String {
    String::from_utf8_lossy(res.body().as_ref()).into_owned()
}

async fn all_posts(storage: &DatabaseStorage) -> Vec<Post> {
    storage.get_all(&Context::background()).await.unwrap()
}

async fn seed(storage: &DatabaseStorage, title: &str) -> Post {
    let mut post = Post::local(title, "seeded");
    storage
        .add(&Context::background(), &mut post)
        .await
        .unwrap();
    post
}

#[tokio::test]
async fn test_index_without_posts() {
    let (_, state) = app().await;
    let res = request().path("/").reply(&routes(state)).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body_text(&res).contains("No posts yet."));
}

#[tokio::test]
async fn test_index_lists_posts() {
    let (storage, state) = app().await;
    seed(&storage, "First").await;
    seed(&storage, "Second").await;
    let res = request().path("/").reply(&routes(state)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_text(&res);
    assert!(body.contains("First"));
    assert!(body.contains("Second"));
}

#[tokio::test]
async fn test_write_renders_empty_form() {
    let (_, state) = app().await;
    let res = request().path("/write").reply(&routes(state)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_text(&res);
    assert!(body.contains("New post"));
    assert!(body.contains(r#"action="/save""#));
}

#[tokio::test]
async fn test_save_creates_then_updates_in_place() {
    let (storage, state) = app().await;
    let filter = routes(state);

    let res = request()
        .method("POST")
        .path("/save")
        .header("content-type", FORM)
        .body("id=&title=Hello&text=World")
        .reply(&filter)
        .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(res.headers()["location"], "/");

    let posts = all_posts(&storage).await;
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].title, "Hello");
    let id = posts[0].id;
    let created = posts[0].time;

    let res = request()
        .method("POST")
        .path("/save")
        .header("content-type", FORM)
        .body(format!("id={}&title=Hello+again&text=Updated", id))
        .reply(&filter)
        .await;
    assert_eq!(res.status(), StatusCode::FOUND);

    let posts = all_posts(&storage).await;
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id, id);
    assert_eq!(posts[0].title, "Hello again");
    assert_eq!(posts[0].text, "Updated");
    assert!(posts[0].time >= created);
}

#[tokio::test]
async fn test_save_accepts_query_parameters() {
    let (storage, state) = app().await;
    let res = request()
        .path("/save?title=From+query&text=works")
        .reply(&routes(state))
        .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    let posts = all_posts(&storage).await;
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].title, "From query");
}

#[tokio::test]
async fn test_save_without_title_is_bad_request() {
    let (storage, state) = app().await;
    let res = request()
        .method("POST")
        .path("/save")
        .header("content-type", FORM)
        .body("text=orphan")
        .reply(&routes(state))
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(all_posts(&storage).await.is_empty());
}

#[tokio::test]
async fn test_save_with_unknown_id_is_not_found() {
    let (storage, state) = app().await;
    let res = request()
        .method("POST")
        .path("/save")
        .header("content-type", FORM)
        .body("id=77&title=Ghost&text=none")
        .reply(&routes(state))
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(all_posts(&storage).await.is_empty());
}

#[tokio::test]
async fn test_edit_prefills_existing_post() {
    let (storage, state) = app().await;
    let post = seed(&storage, "Editable").await;
    let res = request()
        .path(&format!("/edit?id={}", post.id))
        .reply(&routes(state))
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_text(&res);
    assert!(body.contains(r#"value="Editable""#));
    assert!(body.contains(&format!(r#"name="id" value="{}""#, post.id)));
}

#[tokio::test]
async fn test_edit_rejects_missing_malformed_and_unknown_ids() {
    let (_, state) = app().await;
    let filter = routes(state);
    for path in ["/edit", "/edit?id=", "/edit?id=abc", "/edit?id=404"] {
        let res = request().path(path).reply(&filter).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "path {}", path);
    }
}

#[tokio::test]
async fn test_delete_removes_post_and_is_idempotent() {
    let (storage, state) = app().await;
    let filter = routes(state);
    let post = seed(&storage, "Doomed").await;

    for _ in 0..2 {
        let res = request()
            .method("POST")
            .path("/delete")
            .header("content-type", FORM)
            .body(format!("id={}", post.id))
            .reply(&filter)
            .await;
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(res.headers()["location"], "/");
    }
    assert!(!storage
        .exists(&Context::background(), post.id)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_delete_without_id_is_not_found() {
    let (storage, state) = app().await;
    seed(&storage, "Survivor").await;
    let res = request()
        .method("POST")
        .path("/delete")
        .reply(&routes(state))
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(all_posts(&storage).await.len(), 1);
}

#[tokio::test]
async fn test_save_and_delete_reject_malformed_ids() {
    let (storage, state) = app().await;
    let filter = routes(state);
    let post = seed(&storage, "Keeper").await;

    let res = request()
        .method("POST")
        .path("/save")
        .header("content-type", FORM)
        .body("id=abc&title=Changed&text=nope")
        .reply(&filter)
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = request()
        .method("POST")
        .path("/delete?id=abc")
        .reply(&filter)
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let posts = all_posts(&storage).await;
    assert_eq!(posts, vec![post]);
}

#[tokio::test]
async fn test_long_post_is_stored_whole() {
    let (storage, state) = app().await;
    let text = "x".repeat(70 * 1024);
    let res = request()
        .method("POST")
        .path("/save")
        .header("content-type", FORM)
        .body(format!("title=Big&text={}", text))
        .reply(&routes(state))
        .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    let posts = all_posts(&storage).await;
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].text.len(), text.len());
}

#[tokio::test]
async fn test_oversized_form_is_payload_too_large() {
    let (storage, state) = app().await;
    let text = "x".repeat(MAX_FORM_BYTES as usize);
    let res = request()
        .method("POST")
        .path("/save")
        .header("content-type", FORM)
        .body(format!("title=Huge&text={}", text))
        .reply(&routes(state))
        .await;
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body_text(&res).contains("too large"));
    assert!(all_posts(&storage).await.is_empty());
}

#[tokio::test]
async fn test_non_form_body_is_unsupported_media_type() {
    let (storage, state) = app().await;
    let res = request()
        .method("POST")
        .path("/save?title=a&text=b")
        .header("content-type", "application/json")
        .body(r#"{"title":"a"}"#)
        .reply(&routes(state))
        .await;
    assert_eq!(res.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(all_posts(&storage).await.is_empty());
}

#[tokio::test]
async fn test_assets_only_answer_get() {
    let (_, state) = app().await;
    let res = request()
        .method("POST")
        .path("/assets/css/style.css")
        .reply(&routes(state))
        .await;
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let (_, state) = app().await;
    let res = request().path("/nope").reply(&routes(state)).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(body_text(&res).contains("Not found"));
}

#[tokio::test]
async fn test_serves_embedded_stylesheet() {
    let (_, state) = app().await;
    let filter = routes(state);
    let res = request().path("/assets/css/style.css").reply(&filter).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "text/css");

    let res = request().path("/assets/css/missing.css").reply(&filter).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

/// Fails every call the way a broken database would.
struct BrokenStorage;

fn broken() -> StorageError {
    StorageError::query("can't list posts")(DbErr::Custom("disk I/O error".into()))
}

#[async_trait]
impl Storage for BrokenStorage {
    async fn exists(&self, _ctx: &Context, _id: PostId) -> Result<bool, StorageError> {
        Err(broken())
    }
    async fn find(&self, _ctx: &Context, _id: PostId) -> Result<Post, StorageError> {
        Err(broken())
    }
    async fn get_all(&self, _ctx: &Context) -> Result<Vec<Post>, StorageError> {
        Err(broken())
    }
    async fn add(&self, _ctx: &Context, _post: &mut Post) -> Result<(), StorageError> {
        Err(broken())
    }
    async fn save(&self, _ctx: &Context, _post: &Post) -> Result<(), StorageError> {
        Err(broken())
    }
    async fn delete(&self, _ctx: &Context, _id: PostId) -> Result<(), StorageError> {
        Err(broken())
    }
}

/// Never answers; only the request deadline ends a call.
struct StalledStorage;

async fn stall<T>(ctx: &Context) -> Result<T, StorageError> {
    ctx.run(std::future::pending()).await
}

#[async_trait]
impl Storage for StalledStorage {
    async fn exists(&self, ctx: &Context, _id: PostId) -> Result<bool, StorageError> {
        stall(ctx).await
    }
    async fn find(&self, ctx: &Context, _id: PostId) -> Result<Post, StorageError> {
        stall(ctx).await
    }
    async fn get_all(&self, ctx: &Context) -> Result<Vec<Post>, StorageError> {
        stall(ctx).await
    }
    async fn add(&self, ctx: &Context, _post: &mut Post) -> Result<(), StorageError> {
        stall(ctx).await
    }
    async fn save(&self, ctx: &Context, _post: &Post) -> Result<(), StorageError> {
        stall(ctx).await
    }
    async fn delete(&self, ctx: &Context, _id: PostId) -> Result<(), StorageError> {
        stall(ctx).await
    }
}

#[tokio::test]
async fn test_storage_failure_is_internal_error() {
    let state = AppState::new(Arc::new(BrokenStorage), Duration::from_secs(5));
    let filter = routes(state);

    let res = request().path("/").reply(&filter).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_text(&res);
    assert!(body.contains("Something went wrong"));
    assert!(!body.contains("disk I/O error"));

    let res = request()
        .path("/save?title=a&text=b")
        .reply(&filter)
        .await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_request_deadline_is_service_unavailable() {
    let state = AppState::new(Arc::new(StalledStorage), Duration::from_millis(20));
    let res = request().path("/edit?id=1").reply(&routes(state)).await;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
}
