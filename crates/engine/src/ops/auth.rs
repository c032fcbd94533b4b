use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};

use crate::{
    CreateUser, EngineError, ResultEngine, User,
    password::{DUMMY_HASH, generate_token, hash_token, verify_password},
    sessions,
    util::normalize_username,
};

use super::{Engine, with_tx};

impl Engine {
    /// Register a new user. Same as [`Engine::create_user`].
    pub async fn sign_up(&self, cmd: CreateUser) -> ResultEngine<User> {
        self.create_user(cmd).await
    }

    /// Check credentials and open a session.
    ///
    /// Returns the bearer token. Only its digest is stored, so the token
    /// cannot be recovered later.
    pub async fn sign_in(&self, username: &str, password: &str) -> ResultEngine<String> {
        let Ok(username) = normalize_username(username) else {
            return Err(EngineError::InvalidCredentials);
        };
        with_tx!(self, |db_tx| {
            let user = self.find_user_by_username(&db_tx, &username).await?;
            let verified = match &user {
                Some(user) => verify_password(password, &user.password),
                None => {
                    let _ = verify_password(password, DUMMY_HASH);
                    false
                }
            };
            let user = match user {
                Some(user) if verified => user,
                _ => {
                    tracing::debug!(%username, "rejected sign in");
                    return Err(EngineError::InvalidCredentials);
                }
            };

            let token = generate_token();
            let now = Utc::now();
            sessions::ActiveModel {
                token_hash: ActiveValue::Set(hash_token(&token)),
                user_id: ActiveValue::Set(user.id),
                created_at: ActiveValue::Set(now),
                expires_at: ActiveValue::Set(now + self.session_ttl),
            }
            .insert(&db_tx)
            .await?;

            tracing::debug!(user_id = user.id, "session opened");
            Ok(token)
        })
    }

    /// Resolve a bearer token to its user.
    ///
    /// Unknown and expired tokens are both `InvalidCredentials`; an expired
    /// session is removed on the way out.
    pub async fn authenticate(&self, token: &str) -> ResultEngine<User> {
        let db_tx = self.database.begin().await?;
        let Some(session) = sessions::Entity::find_by_id(hash_token(token))
            .one(&db_tx)
            .await?
        else {
            return Err(EngineError::InvalidCredentials);
        };

        if session.expires_at <= Utc::now() {
            sessions::Entity::delete_by_id(session.token_hash)
                .exec(&db_tx)
                .await?;
            db_tx.commit().await?;
            return Err(EngineError::InvalidCredentials);
        }

        let user = match self.require_user(&db_tx, session.user_id).await {
            Ok(user) => user,
            Err(EngineError::KeyNotFound(_)) => return Err(EngineError::InvalidCredentials),
            Err(err) => return Err(err),
        };
        db_tx.commit().await?;
        Ok(user.into())
    }

    /// Close the session of `token`. Unknown tokens are ignored.
    pub async fn sign_out(&self, token: &str) -> ResultEngine<()> {
        sessions::Entity::delete_by_id(hash_token(token))
            .exec(&self.database)
            .await?;
        Ok(())
    }

    /// Drop every expired session. Returns how many were removed.
    pub async fn purge_expired_sessions(&self) -> ResultEngine<u64> {
        let res = sessions::Entity::delete_many()
            .filter(sessions::Column::ExpiresAt.lte(Utc::now()))
            .exec(&self.database)
            .await?;
        Ok(res.rows_affected)
    }
}
