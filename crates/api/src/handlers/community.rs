//! Handlers for `/api/v1/community`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use freeflow_core::envelope::Envelope;
use freeflow_core::pagination::PageRequest;
use freeflow_core::types::DbId;
use freeflow_db::models::community_post::{CreateCommunityPost, UpdateCommunityPost};

use crate::actions::community;
use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::session::Session;
use crate::state::AppState;

/// GET /api/v1/community/posts (public, no auth)
pub async fn list_public(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> AppResult<impl IntoResponse> {
    let page = community::list_public(state.client.as_ref(), page).await?;
    Ok(super::paged_response(page))
}

/// POST /api/v1/community/posts
pub async fn create_post(
    session: Session,
    Json(input): Json<CreateCommunityPost>,
) -> AppResult<impl IntoResponse> {
    let post = community::create(&session, &input).await?;
    Ok((StatusCode::CREATED, Json(Envelope::ok(post))))
}

/// GET /api/v1/community/feed
pub async fn list_feed(
    session: Session,
    Query(page): Query<PageRequest>,
) -> AppResult<impl IntoResponse> {
    let page = community::list_members_feed(&session, page).await?;
    Ok(super::paged_response(page))
}

/// GET /api/v1/community/mine
pub async fn list_mine(session: Session) -> AppResult<impl IntoResponse> {
    let items = community::list_by_author(&session, session.user_id).await?;
    Ok(Json(Envelope::ok(items)))
}

/// PUT /api/v1/community/posts/{id}
pub async fn update_post(
    session: Session,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCommunityPost>,
) -> AppResult<impl IntoResponse> {
    let post = community::update(&session, id, &input).await?;
    Ok(Json(Envelope::ok(post)))
}

/// DELETE /api/v1/community/posts/{id}
pub async fn delete_post(
    session: Session,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    community::delete(&session, id).await?;
    Ok(Json(Envelope::<()>::ok_empty()))
}

/// POST /api/v1/community/posts/{id}/like
pub async fn like_post(
    session: Session,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let post = community::like(&session, id).await?;
    Ok(Json(Envelope::ok(post)))
}

/// GET /api/v1/admin/authors/{id}/posts (admin only)
///
/// Every post by an author regardless of visibility, for moderation.
pub async fn list_by_author(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(author_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let session = Session::new(state.client.clone(), admin.user_id, admin.role);
    let items = community::list_by_author(&session, author_id).await?;
    Ok(Json(Envelope::ok(items)))
}
