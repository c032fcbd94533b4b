use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr};

use crate::{
    CreateOffer, EngineError, Money, Offer, ResultEngine, offers, util::require_positive, wishes,
};

use super::{Engine, with_tx};

impl Engine {
    /// Offer money toward someone else's wish.
    ///
    /// The amount must fit in what is still missing. The offer insert and the
    /// raise of the wish happen in the same transaction, and the raise is
    /// conditional on the price so concurrent offers cannot overfund.
    pub async fn create_offer(&self, user_id: i32, cmd: CreateOffer) -> ResultEngine<Offer> {
        let amount = require_positive(cmd.amount, "amount")?;

        with_tx!(self, |db_tx| {
            let user = self.require_user(&db_tx, user_id).await?;
            let wish = self.require_wish(&db_tx, cmd.item_id).await?;
            if wish.owner_id == user.id {
                return Err(EngineError::Forbidden(
                    "you cannot offer money for your own wish".to_string(),
                ));
            }

            let remaining = Money::new(wish.price_minor).remaining(Money::new(wish.raised_minor));
            if !remaining.is_positive() {
                return Err(EngineError::InvalidState(
                    "the money for this wish is already raised".to_string(),
                ));
            }
            if amount > remaining {
                return Err(EngineError::InvalidState(format!(
                    "amount exceeds the remaining {remaining}"
                )));
            }

            let raised = wishes::Entity::update_many()
                .col_expr(
                    wishes::Column::RaisedMinor,
                    Expr::col(wishes::Column::RaisedMinor).add(amount.minor()),
                )
                .col_expr(wishes::Column::UpdatedAt, Expr::value(Utc::now()))
                .filter(wishes::Column::Id.eq(wish.id))
                .filter(
                    Expr::col(wishes::Column::RaisedMinor)
                        .lte(Expr::col(wishes::Column::PriceMinor).sub(amount.minor())),
                )
                .exec(&db_tx)
                .await?;
            if raised.rows_affected != 1 {
                return Err(EngineError::InvalidState(
                    "amount exceeds the remaining sum".to_string(),
                ));
            }

            let now = Utc::now();
            let model = offers::ActiveModel {
                id: ActiveValue::NotSet,
                user_id: ActiveValue::Set(user.id),
                wish_id: ActiveValue::Set(wish.id),
                amount_minor: ActiveValue::Set(amount.minor()),
                hidden: ActiveValue::Set(cmd.hidden),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            }
            .insert(&db_tx)
            .await?;

            tracing::debug!(
                offer_id = model.id,
                wish_id = wish.id,
                amount = %amount,
                "offer created"
            );
            self.hydrate_offers(&db_tx, vec![model], Some(user.id))
                .await?
                .pop()
                .ok_or_else(|| EngineError::KeyNotFound("offer not found".to_string()))
        })
    }

    /// Every offer, newest first.
    pub async fn offers(&self, viewer_id: Option<i32>) -> ResultEngine<Vec<Offer>> {
        with_tx!(self, |db_tx| {
            let models = offers::Entity::find()
                .order_by_desc(offers::Column::CreatedAt)
                .order_by_desc(offers::Column::Id)
                .all(&db_tx)
                .await?;
            self.hydrate_offers(&db_tx, models, viewer_id).await
        })
    }

    pub async fn offer(&self, offer_id: i32, viewer_id: Option<i32>) -> ResultEngine<Offer> {
        with_tx!(self, |db_tx| {
            let model = offers::Entity::find_by_id(offer_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("offer not found".to_string()))?;
            self.hydrate_offers(&db_tx, vec![model], viewer_id)
                .await?
                .pop()
                .ok_or_else(|| EngineError::KeyNotFound("offer not found".to_string()))
        })
    }
}
