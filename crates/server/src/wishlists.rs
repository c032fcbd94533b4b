//! Wishlists API endpoints.

use api_types::wishlist::{WishlistNew, WishlistUpdate, WishlistView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{CreateWishlist, UpdateWishlist, User};

use crate::{ServerError, server::ServerState, views};

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Vec<WishlistView>>, ServerError> {
    let lists = state.engine.wishlists().await?;
    Ok(Json(lists.into_iter().map(views::wishlist).collect()))
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<WishlistNew>,
) -> Result<(StatusCode, Json<WishlistView>), ServerError> {
    let list = state
        .engine
        .create_wishlist(
            user.id,
            CreateWishlist {
                name: payload.name,
                description: payload.description,
                image: payload.image,
                items_id: payload.items_id,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(views::wishlist(list))))
}

pub async fn get(
    Path(id): Path<i32>,
    State(state): State<ServerState>,
) -> Result<Json<WishlistView>, ServerError> {
    let list = state.engine.wishlist(id).await?;
    Ok(Json(views::wishlist(list)))
}

pub async fn update(
    Extension(user): Extension<User>,
    Path(id): Path<i32>,
    State(state): State<ServerState>,
    Json(payload): Json<WishlistUpdate>,
) -> Result<Json<WishlistView>, ServerError> {
    let list = state
        .engine
        .update_wishlist(
            id,
            user.id,
            UpdateWishlist {
                name: payload.name,
                description: payload.description,
                image: payload.image,
                items_id: payload.items_id,
            },
        )
        .await?;

    Ok(Json(views::wishlist(list)))
}

pub async fn delete(
    Extension(user): Extension<User>,
    Path(id): Path<i32>,
    State(state): State<ServerState>,
) -> Result<Json<WishlistView>, ServerError> {
    let list = state.engine.delete_wishlist(id, user.id).await?;
    Ok(Json(views::wishlist(list)))
}
