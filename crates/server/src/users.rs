//! Profiles and user search.

use api_types::{
    user::{FindUsers, UserProfile, UserPublic, UserUpdate},
    wish::WishView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use engine::{UpdateUser, User};

use crate::{ServerError, server::ServerState, views};

pub async fn me(Extension(user): Extension<User>) -> Json<UserProfile> {
    Json(views::profile(user))
}

pub async fn update_me(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<UserUpdate>,
) -> Result<Json<UserProfile>, ServerError> {
    let cmd = UpdateUser {
        username: payload.username,
        email: payload.email,
        password: payload.password,
        about: payload.about,
        avatar: payload.avatar,
    };
    if cmd.is_empty() {
        return Err(ServerError::Generic("nothing to update".to_string()));
    }

    let user = state.engine.update_user(user.id, cmd).await?;
    Ok(Json(views::profile(user)))
}

pub async fn my_wishes(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<WishView>>, ServerError> {
    let wishes = state.engine.own_wishes(user.id).await?;
    Ok(Json(views::wishes(wishes)))
}

pub async fn by_username(
    Path(username): Path<String>,
    State(state): State<ServerState>,
) -> Result<Json<UserPublic>, ServerError> {
    let user = state.engine.user_by_username(&username).await?;
    Ok(Json(views::public_user(user)))
}

pub async fn wishes_of(
    Extension(user): Extension<User>,
    Path(username): Path<String>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<WishView>>, ServerError> {
    let wishes = state.engine.wishes_of(&username, Some(user.id)).await?;
    Ok(Json(views::wishes(wishes)))
}

pub async fn find(
    State(state): State<ServerState>,
    Json(payload): Json<FindUsers>,
) -> Result<Json<Vec<UserPublic>>, ServerError> {
    let users = state.engine.find_users(&payload.query).await?;
    Ok(Json(users.into_iter().map(views::public_user).collect()))
}
