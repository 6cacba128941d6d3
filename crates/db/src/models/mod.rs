//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `Serialize + Deserialize` entity struct matching the table row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//! - A list filter struct where the table has filtered listings

use serde::de::DeserializeOwned;
use serde::Serialize;
use freeflow_core::types::DbId;

pub mod booking;
pub mod community_post;
pub mod dashboard;
pub mod invoice;
pub mod task;
pub mod transaction;

/// A typed table row.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync {
    /// Backing table name.
    const TABLE: &'static str;
    /// Human-readable entity name used in not-found messages.
    const NAME: &'static str;
    /// Column holding the owning user's id.
    const OWNER_COLUMN: &'static str = "user_id";

    fn id(&self) -> DbId;
    fn owner_id(&self) -> DbId;
}
