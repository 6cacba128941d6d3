//! Route definitions for community posts.
//!
//! Listing public posts requires no authentication; every other endpoint does.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::community;
use crate::state::AppState;

/// Routes mounted at `/community`.
///
/// ```text
/// GET    /posts              -> list_public (no auth)
/// POST   /posts              -> create_post
/// PUT    /posts/{id}         -> update_post
/// DELETE /posts/{id}         -> delete_post
/// POST   /posts/{id}/like    -> like_post
/// GET    /feed               -> list_feed
/// GET    /mine               -> list_mine
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/posts",
            get(community::list_public).post(community::create_post),
        )
        .route(
            "/posts/{id}",
            put(community::update_post).delete(community::delete_post),
        )
        .route("/posts/{id}/like", post(community::like_post))
        .route("/feed", get(community::list_feed))
        .route("/mine", get(community::list_mine))
}

/// Moderation routes mounted at `/admin`.
///
/// ```text
/// GET    /authors/{id}/posts -> list_by_author (admin only)
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new().route("/authors/{id}/posts", get(community::list_by_author))
}
