//! Community post actions.
//!
//! The public feed needs no session; everything else acts as the session user.
//! Private posts are invisible to anyone but their author and admins.

use freeflow_core::envelope::{
    with_envelope, with_list_envelope, with_paged_envelope, with_unit_envelope, Envelope,
};
use freeflow_core::pagination::{Page, PageRequest};
use freeflow_core::roles::ensure_owner;
use freeflow_core::types::DbId;
use freeflow_db::models::community_post::{
    CommunityPost, CreateCommunityPost, UpdateCommunityPost,
};
use freeflow_db::repositories::CommunityPostRepo;
use freeflow_db::{BackendClient, DbError};

use crate::session::{not_found, Session};

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

pub async fn list_public(
    client: &dyn BackendClient,
    page: PageRequest,
) -> Result<Page<CommunityPost>, DbError> {
    CommunityPostRepo::list_public(client, page).await
}

/// Public and members-only posts, for signed-in users.
pub async fn list_members_feed(
    session: &Session,
    page: PageRequest,
) -> Result<Page<CommunityPost>, DbError> {
    CommunityPostRepo::list_for_members(session.client(), page).await
}

/// Every post by `author_id`. Users see their own; admins see anyone's.
pub async fn list_by_author(
    session: &Session,
    author_id: DbId,
) -> Result<Vec<CommunityPost>, DbError> {
    ensure_owner(author_id, session.user_id, &session.role)?;
    CommunityPostRepo::list_by_author(session.client(), author_id).await
}

pub async fn create(
    session: &Session,
    input: &CreateCommunityPost,
) -> Result<CommunityPost, DbError> {
    let post = CommunityPostRepo::create(session.client(), session.user_id, input).await?;
    tracing::info!(author_id = %session.user_id, post_id = %post.id, "Community post created");
    Ok(post)
}

pub async fn update(
    session: &Session,
    id: DbId,
    input: &UpdateCommunityPost,
) -> Result<CommunityPost, DbError> {
    session.load_owned::<CommunityPost>(id).await?;
    CommunityPostRepo::update(session.client(), id, input)
        .await?
        .ok_or_else(|| not_found::<CommunityPost>(id))
}

pub async fn delete(session: &Session, id: DbId) -> Result<(), DbError> {
    session.load_owned::<CommunityPost>(id).await?;
    if !CommunityPostRepo::delete(session.client(), id).await? {
        return Err(not_found::<CommunityPost>(id));
    }
    tracing::info!(user_id = %session.user_id, post_id = %id, "Community post deleted");
    Ok(())
}

/// Like any post the session can see.
pub async fn like(session: &Session, id: DbId) -> Result<CommunityPost, DbError> {
    let post = CommunityPostRepo::find_by_id(session.client(), id)
        .await?
        .filter(|post| post.is_visible_to(session.user_id, session.is_admin()))
        .ok_or_else(|| not_found::<CommunityPost>(id))?;
    CommunityPostRepo::like(session.client(), &post)
        .await?
        .ok_or_else(|| not_found::<CommunityPost>(id))
}

// ---------------------------------------------------------------------------
// Envelope actions
// ---------------------------------------------------------------------------

pub async fn list_public_posts(
    client: &dyn BackendClient,
    page: PageRequest,
) -> Envelope<Vec<CommunityPost>> {
    with_paged_envelope(list_public(client, page)).await
}

pub async fn list_feed_posts(
    session: &Session,
    page: PageRequest,
) -> Envelope<Vec<CommunityPost>> {
    with_paged_envelope(list_members_feed(session, page)).await
}

pub async fn list_posts_by_author(
    session: &Session,
    author_id: DbId,
) -> Envelope<Vec<CommunityPost>> {
    with_list_envelope(list_by_author(session, author_id)).await
}

pub async fn create_post(
    session: &Session,
    input: CreateCommunityPost,
) -> Envelope<CommunityPost> {
    with_envelope(create(session, &input)).await
}

pub async fn update_post(
    session: &Session,
    id: DbId,
    input: UpdateCommunityPost,
) -> Envelope<CommunityPost> {
    with_envelope(update(session, id, &input)).await
}

pub async fn delete_post(session: &Session, id: DbId) -> Envelope<()> {
    with_unit_envelope(delete(session, id)).await
}

pub async fn like_post(session: &Session, id: DbId) -> Envelope<CommunityPost> {
    with_envelope(like(session, id)).await
}
