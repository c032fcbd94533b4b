//! Wishes API endpoints.

use api_types::wish::{WishNew, WishUpdate, WishView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{CreateWish, Money, UpdateWish, User};

use crate::{ServerError, server::ServerState, views};

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<WishNew>,
) -> Result<(StatusCode, Json<WishView>), ServerError> {
    let wish = state
        .engine
        .create_wish(
            user.id,
            CreateWish {
                name: payload.name,
                link: payload.link,
                image: payload.image,
                price: Money::new(payload.price_minor),
                description: payload.description,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(views::wish(wish))))
}

pub async fn latest(State(state): State<ServerState>) -> Result<Json<Vec<WishView>>, ServerError> {
    let wishes = state.engine.latest_wishes(None).await?;
    Ok(Json(views::wishes(wishes)))
}

pub async fn top(State(state): State<ServerState>) -> Result<Json<Vec<WishView>>, ServerError> {
    let wishes = state.engine.top_wishes(None).await?;
    Ok(Json(views::wishes(wishes)))
}

pub async fn get(
    Extension(user): Extension<User>,
    Path(id): Path<i32>,
    State(state): State<ServerState>,
) -> Result<Json<WishView>, ServerError> {
    let wish = state.engine.wish(id, Some(user.id)).await?;
    Ok(Json(views::wish(wish)))
}

pub async fn update(
    Extension(user): Extension<User>,
    Path(id): Path<i32>,
    State(state): State<ServerState>,
    Json(payload): Json<WishUpdate>,
) -> Result<Json<WishView>, ServerError> {
    let wish = state
        .engine
        .update_wish(
            id,
            user.id,
            UpdateWish {
                name: payload.name,
                link: payload.link,
                image: payload.image,
                price: payload.price_minor.map(Money::new),
                description: payload.description,
            },
        )
        .await?;

    Ok(Json(views::wish(wish)))
}

pub async fn delete(
    Extension(user): Extension<User>,
    Path(id): Path<i32>,
    State(state): State<ServerState>,
) -> Result<Json<WishView>, ServerError> {
    let wish = state.engine.delete_wish(id, user.id).await?;
    Ok(Json(views::wish(wish)))
}

pub async fn copy(
    Extension(user): Extension<User>,
    Path(id): Path<i32>,
    State(state): State<ServerState>,
) -> Result<(StatusCode, Json<WishView>), ServerError> {
    let wish = state.engine.copy_wish(id, user.id).await?;
    Ok((StatusCode::CREATED, Json(views::wish(wish))))
}
