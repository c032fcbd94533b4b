use chrono::Utc;
use sea_orm::{
    ActiveValue, Condition, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::{Expr, LikeExpr},
};

use crate::{
    CreateUser, DEFAULT_ABOUT, DEFAULT_AVATAR, EngineError, ResultEngine, UpdateUser, User, Wish,
    password::hash_password,
    users,
    util::{
        normalize_email, normalize_optional_text, normalize_password, normalize_url,
        normalize_username,
    },
    wishes,
};

use super::{
    Engine,
    access::{EMAIL_TAKEN, USER_TAKEN, USERNAME_TAKEN},
    with_tx,
};

fn unique_user_violation(err: DbErr) -> EngineError {
    EngineError::from_unique_violation(
        err,
        &[("username", USERNAME_TAKEN), ("email", EMAIL_TAKEN)],
        USER_TAKEN,
    )
}

/// `%` and `_` in user input match literally.
fn like_pattern(query: &str) -> LikeExpr {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for ch in query.chars() {
        if matches!(ch, '%' | '_' | '!') {
            escaped.push('!');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    LikeExpr::new(escaped).escape('!')
}

/// The folding used both for `username_search` and for search queries.
fn search_key(value: &str) -> String {
    value.to_lowercase()
}

/// A blank value resets the field to its default.
fn about_or_default(about: Option<&str>) -> ResultEngine<String> {
    Ok(normalize_optional_text(about, "about", 2, 200)?
        .unwrap_or_else(|| DEFAULT_ABOUT.to_string()))
}

fn avatar_or_default(avatar: Option<&str>) -> ResultEngine<String> {
    match avatar.map(str::trim).filter(|s| !s.is_empty()) {
        Some(avatar) => normalize_url(avatar, "avatar"),
        None => Ok(DEFAULT_AVATAR.to_string()),
    }
}

fn lookup_username(username: &str) -> ResultEngine<String> {
    normalize_username(username).map_err(|_| EngineError::KeyNotFound("user not found".to_string()))
}

impl Engine {
    /// Register a new user.
    ///
    /// Username is checked for collisions before email, so a request where
    /// both are taken reports the username.
    pub async fn create_user(&self, cmd: CreateUser) -> ResultEngine<User> {
        let username = normalize_username(&cmd.username)?;
        let email = normalize_email(&cmd.email)?;
        let password = hash_password(normalize_password(&cmd.password)?);
        let about = about_or_default(cmd.about.as_deref())?;
        let avatar = avatar_or_default(cmd.avatar.as_deref())?;

        with_tx!(self, |db_tx| {
            self.ensure_identity_free(&db_tx, Some(&username), Some(&email), None)
                .await?;

            let now = Utc::now();
            let model = users::ActiveModel {
                id: ActiveValue::NotSet,
                username_search: ActiveValue::Set(search_key(&username)),
                username: ActiveValue::Set(username),
                email: ActiveValue::Set(email),
                password: ActiveValue::Set(password),
                about: ActiveValue::Set(about),
                avatar: ActiveValue::Set(avatar),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            }
            .insert(&db_tx)
            .await
            .map_err(unique_user_violation)?;

            tracing::info!(user_id = model.id, username = %model.username, "user created");
            Ok(User::from(model))
        })
    }

    pub async fn user_by_id(&self, user_id: i32) -> ResultEngine<User> {
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await.map(User::from)
        })
    }

    pub async fn user_by_username(&self, username: &str) -> ResultEngine<User> {
        let username = lookup_username(username)?;
        with_tx!(self, |db_tx| {
            self.require_user_by_username(&db_tx, &username)
                .await
                .map(User::from)
        })
    }

    /// Case-insensitive substring search on username or email.
    ///
    /// Both stored columns are already lowercase, so only the query is
    /// folded. A blank query matches nobody.
    pub async fn find_users(&self, query: &str) -> ResultEngine<Vec<User>> {
        let query = search_key(query.trim());
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let models = users::Entity::find()
            .filter(
                Condition::any()
                    .add(Expr::col(users::Column::UsernameSearch).like(like_pattern(&query)))
                    .add(Expr::col(users::Column::Email).like(like_pattern(&query))),
            )
            .order_by_asc(users::Column::Username)
            .all(&self.database)
            .await?;

        Ok(models.into_iter().map(User::from).collect())
    }

    /// Update the given fields of a user and return the fresh profile.
    ///
    /// A blank `about` or `avatar` resets it to the default, as on sign up.
    /// Taking a username/email that another user has is `ExistingKey`;
    /// re-submitting your own is fine.
    pub async fn update_user(&self, user_id: i32, cmd: UpdateUser) -> ResultEngine<User> {
        let username = cmd.username.as_deref().map(normalize_username).transpose()?;
        let email = cmd.email.as_deref().map(normalize_email).transpose()?;
        let password = cmd
            .password
            .as_deref()
            .map(|p| normalize_password(p).map(hash_password))
            .transpose()?;
        let about = cmd
            .about
            .as_deref()
            .map(|about| about_or_default(Some(about)))
            .transpose()?;
        let avatar = cmd
            .avatar
            .as_deref()
            .map(|avatar| avatar_or_default(Some(avatar)))
            .transpose()?;

        with_tx!(self, |db_tx| {
            let model = self.require_user(&db_tx, user_id).await?;
            self.ensure_identity_free(&db_tx, username.as_deref(), email.as_deref(), Some(user_id))
                .await?;

            let mut active: users::ActiveModel = model.into();
            if let Some(username) = username {
                active.username_search = ActiveValue::Set(search_key(&username));
                active.username = ActiveValue::Set(username);
            }
            if let Some(email) = email {
                active.email = ActiveValue::Set(email);
            }
            if let Some(password) = password {
                active.password = ActiveValue::Set(password);
            }
            if let Some(about) = about {
                active.about = ActiveValue::Set(about);
            }
            if let Some(avatar) = avatar {
                active.avatar = ActiveValue::Set(avatar);
            }
            active.updated_at = ActiveValue::Set(Utc::now());

            let model = active
                .update(&db_tx)
                .await
                .map_err(unique_user_violation)?;
            Ok(User::from(model))
        })
    }

    /// Wishes of `user_id`, newest first, seen by their owner.
    pub async fn own_wishes(&self, user_id: i32) -> ResultEngine<Vec<Wish>> {
        with_tx!(self, |db_tx| {
            let user = self.require_user(&db_tx, user_id).await?;
            let models = wishes::Entity::find()
                .filter(wishes::Column::OwnerId.eq(user.id))
                .order_by_desc(wishes::Column::CreatedAt)
                .order_by_desc(wishes::Column::Id)
                .all(&db_tx)
                .await?;
            self.hydrate_wishes(&db_tx, models, Some(user.id)).await
        })
    }

    /// Wishes of the user called `username`, newest first, seen by `viewer_id`.
    pub async fn wishes_of(
        &self,
        username: &str,
        viewer_id: Option<i32>,
    ) -> ResultEngine<Vec<Wish>> {
        let username = lookup_username(username)?;
        with_tx!(self, |db_tx| {
            let user = self.require_user_by_username(&db_tx, &username).await?;
            let models = wishes::Entity::find()
                .filter(wishes::Column::OwnerId.eq(user.id))
                .order_by_desc(wishes::Column::CreatedAt)
                .order_by_desc(wishes::Column::Id)
                .all(&db_tx)
                .await?;
            self.hydrate_wishes(&db_tx, models, viewer_id).await
        })
    }
}
