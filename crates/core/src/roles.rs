//! Well-known role names and the ownership rule.
//!
//! Role names match the `role` claim the managed backend puts in its access
//! tokens. Regular signed-in users carry `authenticated`.

use crate::error::CoreError;
use crate::types::DbId;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_AUTHENTICATED: &str = "authenticated";

/// Allow access when `user_id` owns the record or `role` is admin.
pub fn ensure_owner(owner_id: DbId, user_id: DbId, role: &str) -> Result<(), CoreError> {
    if owner_id == user_id || role == ROLE_ADMIN {
        Ok(())
    } else {
        Err(CoreError::Forbidden("Permission denied".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn owner_is_allowed() {
        let id = Uuid::new_v4();
        assert!(ensure_owner(id, id, ROLE_AUTHENTICATED).is_ok());
    }

    #[test]
    fn admin_is_allowed_on_foreign_records() {
        assert!(ensure_owner(Uuid::new_v4(), Uuid::new_v4(), ROLE_ADMIN).is_ok());
    }

    #[test]
    fn other_user_is_forbidden() {
        let result = ensure_owner(Uuid::new_v4(), Uuid::new_v4(), ROLE_AUTHENTICATED);
        assert!(matches!(result, Err(CoreError::Forbidden(_))));
    }
}
