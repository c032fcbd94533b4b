//! Offers API endpoints.

use api_types::offer::{OfferNew, OfferView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{CreateOffer, Money, User};

use crate::{ServerError, server::ServerState, views};

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<OfferNew>,
) -> Result<(StatusCode, Json<OfferView>), ServerError> {
    let offer = state
        .engine
        .create_offer(
            user.id,
            CreateOffer {
                item_id: payload.item_id,
                amount: Money::new(payload.amount_minor),
                hidden: payload.hidden,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(views::offer(offer))))
}

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<OfferView>>, ServerError> {
    let offers = state.engine.offers(Some(user.id)).await?;
    Ok(Json(offers.into_iter().map(views::offer).collect()))
}

pub async fn get(
    Extension(user): Extension<User>,
    Path(id): Path<i32>,
    State(state): State<ServerState>,
) -> Result<Json<OfferView>, ServerError> {
    let offer = state.engine.offer(id, Some(user.id)).await?;
    Ok(Json(views::offer(offer)))
}
