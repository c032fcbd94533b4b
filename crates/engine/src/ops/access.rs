use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};

use crate::{EngineError, ResultEngine, users, wishes, wishlists};

use super::Engine;

/// Generates a `require_*` lookup that fails with `KeyNotFound` and a
/// `require_*_owner` variant that additionally fails with `Forbidden` when the
/// row belongs to someone else.
macro_rules! impl_owned_lookup {
    ($require_fn:ident, $require_owner_fn:ident, $module:ident, $not_found:literal, $not_owner:literal) => {
        pub(super) async fn $require_fn(
            &self,
            db: &DatabaseTransaction,
            id: i32,
        ) -> ResultEngine<$module::Model> {
            $module::Entity::find_by_id(id)
                .one(db)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound($not_found.to_string()))
        }

        pub(super) async fn $require_owner_fn(
            &self,
            db: &DatabaseTransaction,
            id: i32,
            user_id: i32,
        ) -> ResultEngine<$module::Model> {
            let model = self.$require_fn(db, id).await?;
            if model.owner_id != user_id {
                return Err(EngineError::Forbidden($not_owner.to_string()));
            }
            Ok(model)
        }
    };
}

impl Engine {
    impl_owned_lookup!(
        require_wish,
        require_wish_owner,
        wishes,
        "wish not found",
        "this is not your wish"
    );

    impl_owned_lookup!(
        require_wishlist,
        require_wishlist_owner,
        wishlists,
        "wishlist not found",
        "this is not your wishlist"
    );

    pub(super) async fn require_user(
        &self,
        db: &DatabaseTransaction,
        user_id: i32,
    ) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not found".to_string()))
    }

    pub(super) async fn find_user_by_username(
        &self,
        db: &DatabaseTransaction,
        username: &str,
    ) -> ResultEngine<Option<users::Model>> {
        users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(db)
            .await
            .map_err(Into::into)
    }

    pub(super) async fn find_user_by_email(
        &self,
        db: &DatabaseTransaction,
        email: &str,
    ) -> ResultEngine<Option<users::Model>> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(db)
            .await
            .map_err(Into::into)
    }

    pub(super) async fn require_user_by_username(
        &self,
        db: &DatabaseTransaction,
        username: &str,
    ) -> ResultEngine<users::Model> {
        self.find_user_by_username(db, username)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not found".to_string()))
    }

    /// Fail with `ExistingKey` when `username` or `email` belongs to a user
    /// other than `except`. Username is checked first.
    pub(super) async fn ensure_identity_free(
        &self,
        db: &DatabaseTransaction,
        username: Option<&str>,
        email: Option<&str>,
        except: Option<i32>,
    ) -> ResultEngine<()> {
        if let Some(username) = username
            && let Some(found) = self.find_user_by_username(db, username).await?
            && Some(found.id) != except
        {
            return Err(EngineError::ExistingKey(USERNAME_TAKEN.to_string()));
        }
        if let Some(email) = email
            && let Some(found) = self.find_user_by_email(db, email).await?
            && Some(found.id) != except
        {
            return Err(EngineError::ExistingKey(EMAIL_TAKEN.to_string()));
        }
        Ok(())
    }
}

pub(super) const USERNAME_TAKEN: &str = "a user with this username already exists";
pub(super) const EMAIL_TAKEN: &str = "a user with this email already exists";
pub(super) const USER_TAKEN: &str = "a user with these details already exists";
