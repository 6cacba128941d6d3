//! Repository for the `community_posts` table.

use freeflow_core::pagination::{Page, PageRequest};
use freeflow_core::query::Query;
use freeflow_core::status::{
    validate_post_visibility, VISIBILITY_MEMBERS, VISIBILITY_PUBLIC,
};
use freeflow_core::types::DbId;
use freeflow_core::validation::{require_non_empty, require_non_empty_opt};
use serde_json::json;

use crate::client::BackendClient;
use crate::models::community_post::{CommunityPost, CreateCommunityPost, UpdateCommunityPost};
use crate::repositories::crud::{self, to_row};
use crate::DbError;

/// Provides CRUD operations for community posts.
pub struct CommunityPostRepo;

impl CommunityPostRepo {
    /// One page of public posts, newest first.
    pub async fn list_public(
        client: &dyn BackendClient,
        page: PageRequest,
    ) -> Result<Page<CommunityPost>, DbError> {
        let query = Query::from("community_posts")
            .eq("visibility", VISIBILITY_PUBLIC)
            .order("created_at", false);
        crud::list_page(client, query, page).await
    }

    /// One page of the posts any signed-in user may read (public and
    /// members-only), newest first.
    pub async fn list_for_members(
        client: &dyn BackendClient,
        page: PageRequest,
    ) -> Result<Page<CommunityPost>, DbError> {
        let query = Query::from("community_posts")
            .in_list("visibility", [VISIBILITY_PUBLIC, VISIBILITY_MEMBERS])
            .order("created_at", false);
        crud::list_page(client, query, page).await
    }

    /// Every post by `author_id` regardless of visibility, newest first.
    pub async fn list_by_author(
        client: &dyn BackendClient,
        author_id: DbId,
    ) -> Result<Vec<CommunityPost>, DbError> {
        let query = Query::from("community_posts")
            .eq("author_id", author_id)
            .order("created_at", false);
        crud::list(client, query).await
    }

    pub async fn find_by_id(
        client: &dyn BackendClient,
        id: DbId,
    ) -> Result<Option<CommunityPost>, DbError> {
        crud::find_by_id(client, id).await
    }

    pub async fn create(
        client: &dyn BackendClient,
        author_id: DbId,
        input: &CreateCommunityPost,
    ) -> Result<CommunityPost, DbError> {
        require_non_empty("title", &input.title)?;
        require_non_empty("body", &input.body)?;
        let visibility = input.visibility.as_deref().unwrap_or(VISIBILITY_PUBLIC);
        validate_post_visibility(visibility)?;

        let row = to_row(&json!({
            "author_id": author_id,
            "title": input.title.trim(),
            "body": input.body,
            "visibility": visibility,
            "tags": input.tags.clone().unwrap_or_default(),
            "likes_count": 0,
            "comments_count": 0,
        }))?;
        crud::create(client, row).await
    }

    /// Update a post. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        client: &dyn BackendClient,
        id: DbId,
        input: &UpdateCommunityPost,
    ) -> Result<Option<CommunityPost>, DbError> {
        require_non_empty_opt("title", input.title.as_deref())?;
        require_non_empty_opt("body", input.body.as_deref())?;
        if let Some(visibility) = input.visibility.as_deref() {
            validate_post_visibility(visibility)?;
        }
        crud::update_by_id(client, id, to_row(input)?).await
    }

    /// Delete a post. Returns `true` if a row was removed.
    pub async fn delete(client: &dyn BackendClient, id: DbId) -> Result<bool, DbError> {
        crud::delete_by_id::<CommunityPost>(client, id).await
    }

    /// Increment the `likes_count` of an already loaded post by one.
    ///
    /// The loaded count is written back plus one, so concurrent likes may
    /// collapse into one. Returns `None` if the post was deleted meanwhile.
    pub async fn like(
        client: &dyn BackendClient,
        post: &CommunityPost,
    ) -> Result<Option<CommunityPost>, DbError> {
        let patch = to_row(&json!({ "likes_count": post.likes_count + 1 }))?;
        crud::update_by_id(client, post.id, patch).await
    }
}
