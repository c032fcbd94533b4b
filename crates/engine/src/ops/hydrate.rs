//! Association loading: turns stored rows into the engine views.
//!
//! Every helper loads related rows with one `IN (...)` query per relation,
//! never one query per row.

use std::collections::{HashMap, HashSet};

use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, prelude::*};

use crate::{
    EngineError, Money, Offer, ResultEngine, User, Wish, WishSummary, Wishlist, offers, users,
    wishes, wishlist_items, wishlists,
};

use super::Engine;

pub(super) fn unique_ids(ids: impl IntoIterator<Item = i32>) -> Vec<i32> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

fn lookup_user(users: &HashMap<i32, User>, id: i32) -> ResultEngine<User> {
    users
        .get(&id)
        .cloned()
        .ok_or_else(|| EngineError::KeyNotFound("user not found".to_string()))
}

impl Engine {
    pub(super) async fn users_by_ids(
        &self,
        db: &DatabaseTransaction,
        ids: impl IntoIterator<Item = i32>,
    ) -> ResultEngine<HashMap<i32, User>> {
        let ids = unique_ids(ids);
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let models = users::Entity::find()
            .filter(users::Column::Id.is_in(ids))
            .all(db)
            .await?;
        Ok(models
            .into_iter()
            .map(|model| (model.id, User::from(model)))
            .collect())
    }

    /// Build offer views for `models`, redacting hidden authors for `viewer_id`.
    ///
    /// `wishes_by_id` must contain the wish of every offer.
    fn offer_views(
        models: Vec<offers::Model>,
        wishes_by_id: &HashMap<i32, wishes::Model>,
        users_by_id: &HashMap<i32, User>,
        viewer_id: Option<i32>,
    ) -> ResultEngine<Vec<Offer>> {
        models
            .into_iter()
            .map(|model| {
                let wish = wishes_by_id
                    .get(&model.wish_id)
                    .ok_or_else(|| EngineError::KeyNotFound("wish not found".to_string()))?;
                let user = if model.user_visible_to(viewer_id, wish.owner_id) {
                    Some(lookup_user(users_by_id, model.user_id)?)
                } else {
                    None
                };
                Ok(Offer {
                    id: model.id,
                    amount: Money::new(model.amount_minor),
                    hidden: model.hidden,
                    user,
                    item: WishSummary::from(wish),
                    created_at: model.created_at,
                    updated_at: model.updated_at,
                })
            })
            .collect()
    }

    /// Load owners, offers and offering users for `models`, keeping their order.
    pub(super) async fn hydrate_wishes(
        &self,
        db: &DatabaseTransaction,
        models: Vec<wishes::Model>,
        viewer_id: Option<i32>,
    ) -> ResultEngine<Vec<Wish>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }
        let wish_ids: Vec<i32> = models.iter().map(|m| m.id).collect();
        let offer_models = offers::Entity::find()
            .filter(offers::Column::WishId.is_in(wish_ids))
            .order_by_desc(offers::Column::CreatedAt)
            .order_by_desc(offers::Column::Id)
            .all(db)
            .await?;

        let users_by_id = self
            .users_by_ids(
                db,
                models
                    .iter()
                    .map(|m| m.owner_id)
                    .chain(offer_models.iter().map(|o| o.user_id)),
            )
            .await?;
        let wishes_by_id: HashMap<i32, wishes::Model> =
            models.iter().map(|m| (m.id, m.clone())).collect();

        let mut offers_by_wish: HashMap<i32, Vec<Offer>> = HashMap::new();
        for offer in Self::offer_views(offer_models, &wishes_by_id, &users_by_id, viewer_id)? {
            offers_by_wish.entry(offer.item.id).or_default().push(offer);
        }

        models
            .into_iter()
            .map(|model| {
                Ok(Wish {
                    owner: lookup_user(&users_by_id, model.owner_id)?,
                    offers: offers_by_wish.remove(&model.id).unwrap_or_default(),
                    price: Money::new(model.price_minor),
                    raised: Money::new(model.raised_minor),
                    id: model.id,
                    name: model.name,
                    link: model.link,
                    image: model.image,
                    copied: model.copied,
                    description: model.description,
                    created_at: model.created_at,
                    updated_at: model.updated_at,
                })
            })
            .collect()
    }

    pub(super) async fn hydrate_wish(
        &self,
        db: &DatabaseTransaction,
        model: wishes::Model,
        viewer_id: Option<i32>,
    ) -> ResultEngine<Wish> {
        self.hydrate_wishes(db, vec![model], viewer_id)
            .await?
            .pop()
            .ok_or_else(|| EngineError::KeyNotFound("wish not found".to_string()))
    }

    pub(super) async fn hydrate_offers(
        &self,
        db: &DatabaseTransaction,
        models: Vec<offers::Model>,
        viewer_id: Option<i32>,
    ) -> ResultEngine<Vec<Offer>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }
        let wish_ids = unique_ids(models.iter().map(|m| m.wish_id));
        let wishes_by_id: HashMap<i32, wishes::Model> = wishes::Entity::find()
            .filter(wishes::Column::Id.is_in(wish_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();
        let users_by_id = self
            .users_by_ids(db, models.iter().map(|m| m.user_id))
            .await?;

        Self::offer_views(models, &wishes_by_id, &users_by_id, viewer_id)
    }

    /// Load owners and ordered items for `models`, keeping their order.
    pub(super) async fn hydrate_wishlists(
        &self,
        db: &DatabaseTransaction,
        models: Vec<wishlists::Model>,
    ) -> ResultEngine<Vec<Wishlist>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }
        let list_ids: Vec<i32> = models.iter().map(|m| m.id).collect();
        let item_rows = wishlist_items::Entity::find()
            .filter(wishlist_items::Column::WishlistId.is_in(list_ids))
            .order_by_asc(wishlist_items::Column::WishlistId)
            .order_by_asc(wishlist_items::Column::Position)
            .all(db)
            .await?;

        let wish_ids = unique_ids(item_rows.iter().map(|row| row.wish_id));
        let wishes_by_id: HashMap<i32, WishSummary> = if wish_ids.is_empty() {
            HashMap::new()
        } else {
            wishes::Entity::find()
                .filter(wishes::Column::Id.is_in(wish_ids))
                .all(db)
                .await?
                .iter()
                .map(|m| (m.id, WishSummary::from(m)))
                .collect()
        };

        let mut items_by_list: HashMap<i32, Vec<WishSummary>> = HashMap::new();
        for row in item_rows {
            if let Some(wish) = wishes_by_id.get(&row.wish_id) {
                items_by_list
                    .entry(row.wishlist_id)
                    .or_default()
                    .push(wish.clone());
            }
        }

        let users_by_id = self
            .users_by_ids(db, models.iter().map(|m| m.owner_id))
            .await?;

        models
            .into_iter()
            .map(|model| {
                Ok(Wishlist {
                    owner: lookup_user(&users_by_id, model.owner_id)?,
                    items: items_by_list.remove(&model.id).unwrap_or_default(),
                    id: model.id,
                    name: model.name,
                    description: model.description,
                    image: model.image,
                    created_at: model.created_at,
                    updated_at: model.updated_at,
                })
            })
            .collect()
    }

    pub(super) async fn hydrate_wishlist(
        &self,
        db: &DatabaseTransaction,
        model: wishlists::Model,
    ) -> ResultEngine<Wishlist> {
        self.hydrate_wishlists(db, vec![model])
            .await?
            .pop()
            .ok_or_else(|| EngineError::KeyNotFound("wishlist not found".to_string()))
    }
}
