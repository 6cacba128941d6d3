//! The acting user plus the injected backend client.
//!
//! Every action receives a [`Session`] instead of reaching for a global
//! client, so tests can hand in a [`freeflow_db::MemoryClient`] and HTTP
//! handlers can build one from the request.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use freeflow_core::error::CoreError;
use freeflow_core::roles::{ensure_owner, ROLE_ADMIN};
use freeflow_core::types::DbId;
use freeflow_db::models::Entity;
use freeflow_db::repositories::crud;
use freeflow_db::{BackendClient, DbError, SharedClient};

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Clone)]
pub struct Session {
    client: SharedClient,
    pub user_id: DbId,
    pub role: String,
}

impl Session {
    pub fn new(client: SharedClient, user_id: DbId, role: impl Into<String>) -> Self {
        Self {
            client,
            user_id,
            role: role.into(),
        }
    }

    pub fn client(&self) -> &dyn BackendClient {
        self.client.as_ref()
    }

    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    /// Fail with `Forbidden` unless the session user owns `entity` or is an admin.
    pub fn authorize<E: Entity>(&self, entity: &E) -> Result<(), CoreError> {
        ensure_owner(entity.owner_id(), self.user_id, &self.role)
    }

    /// Load `id` and check ownership: `NotFound` if absent, `Forbidden` if foreign.
    pub async fn load_owned<E: Entity>(&self, id: DbId) -> Result<E, DbError> {
        let entity = crud::find_by_id::<E>(self.client(), id)
            .await?
            .ok_or_else(|| not_found::<E>(id))?;
        self.authorize(&entity)?;
        Ok(entity)
    }
}

/// The `NotFound` error for entity type `E`.
pub fn not_found<E: Entity>(id: DbId) -> DbError {
    DbError::Core(CoreError::NotFound {
        entity: E::NAME,
        id,
    })
}

impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        Ok(Session::new(state.client.clone(), user.user_id, user.role))
    }
}
