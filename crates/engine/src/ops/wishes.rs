use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    prelude::*, sea_query::Expr,
};

use crate::{
    CreateWish, EngineError, Money, ResultEngine, UpdateWish, Wish, WishSummary, offers,
    util::{normalize_text, normalize_url, require_positive},
    wishes, wishlist_items,
};

use super::{Engine, LATEST_WISHES_LIMIT, TOP_WISHES_LIMIT, hydrate::unique_ids, with_tx};

pub(super) const CANNOT_CHANGE_PRICE: &str = "cannot change price: funds already raised";

fn normalize_name(value: &str) -> ResultEngine<String> {
    normalize_text(value, "name", 1, 250)
}

fn normalize_description(value: &str) -> ResultEngine<String> {
    normalize_text(value, "description", 1, 1024)
}

impl Engine {
    /// Add a wish owned by `owner_id`.
    pub async fn create_wish(&self, owner_id: i32, cmd: CreateWish) -> ResultEngine<Wish> {
        let name = normalize_name(&cmd.name)?;
        let link = normalize_url(&cmd.link, "link")?;
        let image = normalize_url(&cmd.image, "image")?;
        let price = require_positive(cmd.price, "price")?;
        let description = normalize_description(&cmd.description)?;

        with_tx!(self, |db_tx| {
            let owner = self.require_user(&db_tx, owner_id).await?;
            let model = self
                .insert_wish(&db_tx, owner.id, name, link, image, price, description)
                .await?;
            tracing::debug!(wish_id = model.id, owner_id = owner.id, "wish created");
            self.hydrate_wish(&db_tx, model, Some(owner.id)).await
        })
    }

    #[allow(clippy::too_many_arguments)]
    async fn insert_wish(
        &self,
        db: &DatabaseTransaction,
        owner_id: i32,
        name: String,
        link: String,
        image: String,
        price: Money,
        description: String,
    ) -> ResultEngine<wishes::Model> {
        let now = Utc::now();
        wishes::ActiveModel {
            id: ActiveValue::NotSet,
            owner_id: ActiveValue::Set(owner_id),
            name: ActiveValue::Set(name),
            link: ActiveValue::Set(link),
            image: ActiveValue::Set(image),
            price_minor: ActiveValue::Set(price.minor()),
            raised_minor: ActiveValue::Set(0),
            copied: ActiveValue::Set(0),
            description: ActiveValue::Set(description),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        }
        .insert(db)
        .await
        .map_err(Into::into)
    }

    /// Return a wish with its owner and offers.
    pub async fn wish(&self, wish_id: i32, viewer_id: Option<i32>) -> ResultEngine<Wish> {
        with_tx!(self, |db_tx| {
            let model = self.require_wish(&db_tx, wish_id).await?;
            self.hydrate_wish(&db_tx, model, viewer_id).await
        })
    }

    /// The most recently created wishes, newest first.
    pub async fn latest_wishes(&self, viewer_id: Option<i32>) -> ResultEngine<Vec<Wish>> {
        with_tx!(self, |db_tx| {
            let models = wishes::Entity::find()
                .order_by_desc(wishes::Column::CreatedAt)
                .order_by_desc(wishes::Column::Id)
                .limit(LATEST_WISHES_LIMIT)
                .all(&db_tx)
                .await?;
            self.hydrate_wishes(&db_tx, models, viewer_id).await
        })
    }

    /// The most copied wishes. Ties go to the newest.
    pub async fn top_wishes(&self, viewer_id: Option<i32>) -> ResultEngine<Vec<Wish>> {
        with_tx!(self, |db_tx| {
            let models = wishes::Entity::find()
                .order_by_desc(wishes::Column::Copied)
                .order_by_desc(wishes::Column::CreatedAt)
                .order_by_desc(wishes::Column::Id)
                .limit(TOP_WISHES_LIMIT)
                .all(&db_tx)
                .await?;
            self.hydrate_wishes(&db_tx, models, viewer_id).await
        })
    }

    /// Update a wish. Only its owner may do it, and the price is frozen once
    /// someone has offered money.
    pub async fn update_wish(
        &self,
        wish_id: i32,
        user_id: i32,
        cmd: UpdateWish,
    ) -> ResultEngine<Wish> {
        let name = cmd.name.as_deref().map(normalize_name).transpose()?;
        let link = cmd
            .link
            .as_deref()
            .map(|link| normalize_url(link, "link"))
            .transpose()?;
        let image = cmd
            .image
            .as_deref()
            .map(|image| normalize_url(image, "image"))
            .transpose()?;
        let price = cmd
            .price
            .map(|price| require_positive(price, "price"))
            .transpose()?;
        let description = cmd
            .description
            .as_deref()
            .map(normalize_description)
            .transpose()?;

        with_tx!(self, |db_tx| {
            let model = self.require_wish_owner(&db_tx, wish_id, user_id).await?;

            if let Some(price) = price
                && price.minor() != model.price_minor
                && model.raised_minor > 0
            {
                return Err(EngineError::InvalidState(CANNOT_CHANGE_PRICE.to_string()));
            }

            let mut active: wishes::ActiveModel = model.into();
            if let Some(name) = name {
                active.name = ActiveValue::Set(name);
            }
            if let Some(link) = link {
                active.link = ActiveValue::Set(link);
            }
            if let Some(image) = image {
                active.image = ActiveValue::Set(image);
            }
            if let Some(price) = price {
                active.price_minor = ActiveValue::Set(price.minor());
            }
            if let Some(description) = description {
                active.description = ActiveValue::Set(description);
            }
            active.updated_at = ActiveValue::Set(Utc::now());

            let model = active.update(&db_tx).await?;
            self.hydrate_wish(&db_tx, model, Some(user_id)).await
        })
    }

    /// Delete a wish together with its offers and wishlist entries.
    ///
    /// Returns the wish as it was before deletion.
    pub async fn delete_wish(&self, wish_id: i32, user_id: i32) -> ResultEngine<Wish> {
        with_tx!(self, |db_tx| {
            let model = self.require_wish_owner(&db_tx, wish_id, user_id).await?;
            let wish = self.hydrate_wish(&db_tx, model, Some(user_id)).await?;

            offers::Entity::delete_many()
                .filter(offers::Column::WishId.eq(wish_id))
                .exec(&db_tx)
                .await?;
            wishlist_items::Entity::delete_many()
                .filter(wishlist_items::Column::WishId.eq(wish_id))
                .exec(&db_tx)
                .await?;
            wishes::Entity::delete_by_id(wish_id).exec(&db_tx).await?;

            tracing::debug!(wish_id, user_id, "wish deleted");
            Ok(wish)
        })
    }

    /// Copy someone else's wish into the caller's wishes.
    ///
    /// The copy starts with nothing raised and is not copied itself; the
    /// source's `copied` counter goes up by one.
    pub async fn copy_wish(&self, wish_id: i32, user_id: i32) -> ResultEngine<Wish> {
        with_tx!(self, |db_tx| {
            let source = self.require_wish(&db_tx, wish_id).await?;
            if source.owner_id == user_id {
                return Err(EngineError::InvalidState(
                    "cannot copy your own wish".to_string(),
                ));
            }
            let user = self.require_user(&db_tx, user_id).await?;

            let already_copied = wishes::Entity::find()
                .filter(wishes::Column::OwnerId.eq(user.id))
                .filter(wishes::Column::Name.eq(source.name.clone()))
                .filter(wishes::Column::Link.eq(source.link.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if already_copied {
                return Err(EngineError::ExistingKey(
                    "you already have this wish".to_string(),
                ));
            }

            let copy = self
                .insert_wish(
                    &db_tx,
                    user.id,
                    source.name.clone(),
                    source.link.clone(),
                    source.image.clone(),
                    Money::new(source.price_minor),
                    source.description.clone(),
                )
                .await?;

            wishes::Entity::update_many()
                .col_expr(
                    wishes::Column::Copied,
                    Expr::col(wishes::Column::Copied).add(1),
                )
                .filter(wishes::Column::Id.eq(source.id))
                .exec(&db_tx)
                .await?;

            tracing::debug!(source_id = source.id, copy_id = copy.id, "wish copied");
            self.hydrate_wish(&db_tx, copy, Some(user.id)).await
        })
    }

    /// Load wishes by id, in the order given. Duplicate ids are dropped and
    /// any unknown id is `KeyNotFound`.
    pub async fn wishes_by_ids(&self, ids: &[i32]) -> ResultEngine<Vec<WishSummary>> {
        with_tx!(self, |db_tx| {
            let models = self.load_wishes_in_order(&db_tx, ids).await?;
            Ok(models.iter().map(WishSummary::from).collect::<Vec<_>>())
        })
    }

    pub(super) async fn load_wishes_in_order(
        &self,
        db: &DatabaseTransaction,
        ids: &[i32],
    ) -> ResultEngine<Vec<wishes::Model>> {
        let ids = unique_ids(ids.iter().copied());
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut found: HashMap<i32, wishes::Model> = wishes::Entity::find()
            .filter(wishes::Column::Id.is_in(ids.clone()))
            .all(db)
            .await?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();

        ids.into_iter()
            .map(|id| {
                found
                    .remove(&id)
                    .ok_or_else(|| EngineError::KeyNotFound(format!("wish {id} not found")))
            })
            .collect()
    }
}
