//! Sign up, sign in and sign out.

use api_types::{
    auth::{SignIn, SignInResponse, SignUp},
    user::UserProfile,
};
use axum::{Extension, Json, extract::State, http::StatusCode};
use engine::CreateUser;

use crate::{
    ServerError,
    server::{ServerState, SessionToken},
    views,
};

pub async fn sign_up(
    State(state): State<ServerState>,
    Json(payload): Json<SignUp>,
) -> Result<(StatusCode, Json<UserProfile>), ServerError> {
    let user = state
        .engine
        .sign_up(CreateUser {
            username: payload.username,
            email: payload.email,
            password: payload.password,
            about: payload.about,
            avatar: payload.avatar,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(views::profile(user))))
}

pub async fn sign_in(
    State(state): State<ServerState>,
    Json(payload): Json<SignIn>,
) -> Result<Json<SignInResponse>, ServerError> {
    let access_token = state
        .engine
        .sign_in(&payload.username, &payload.password)
        .await?;

    Ok(Json(SignInResponse { access_token }))
}

pub async fn sign_out(
    Extension(token): Extension<SessionToken>,
    State(state): State<ServerState>,
) -> Result<StatusCode, ServerError> {
    state.engine.sign_out(&token.0).await?;
    Ok(StatusCode::NO_CONTENT)
}
