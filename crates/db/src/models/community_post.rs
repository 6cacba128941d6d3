//! Community post entity model and DTOs.

use serde::{Deserialize, Serialize};
use freeflow_core::status::VISIBILITY_PRIVATE;
use freeflow_core::types::{DbId, Timestamp};

use super::Entity;

/// A row from the `community_posts` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityPost {
    pub id: DbId,
    pub author_id: DbId,
    pub title: String,
    pub body: String,
    pub visibility: String,
    pub tags: Vec<String>,
    pub likes_count: i64,
    pub comments_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCommunityPost {
    pub title: String,
    pub body: String,
    /// Defaults to `public`.
    pub visibility: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCommunityPost {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl CommunityPost {
    /// Whether a signed-in user may see this post. Private posts are
    /// limited to their author and admins.
    pub fn is_visible_to(&self, user_id: DbId, is_admin: bool) -> bool {
        self.visibility != VISIBILITY_PRIVATE || self.author_id == user_id || is_admin
    }
}

impl Entity for CommunityPost {
    const TABLE: &'static str = "community_posts";
    const NAME: &'static str = "Community post";
    const OWNER_COLUMN: &'static str = "author_id";

    fn id(&self) -> DbId {
        self.id
    }

    fn owner_id(&self) -> DbId {
        self.author_id
    }
}
