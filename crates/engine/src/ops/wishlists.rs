use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};

use crate::{
    CreateWishlist, ResultEngine, UpdateWishlist, Wishlist,
    util::{normalize_text, normalize_url},
    wishlist_items, wishlists,
};

use super::{Engine, with_tx};

fn normalize_name(value: &str) -> ResultEngine<String> {
    normalize_text(value, "name", 1, 250)
}

/// Wishlist descriptions may be empty.
fn normalize_description(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    normalize_text(trimmed, "description", 0, 1500)
}

impl Engine {
    /// Replace the items of `wishlist_id` with `items_id`, in that order.
    async fn store_items(
        &self,
        db: &DatabaseTransaction,
        wishlist_id: i32,
        items_id: &[i32],
    ) -> ResultEngine<()> {
        let wishes = self.load_wishes_in_order(db, items_id).await?;

        wishlist_items::Entity::delete_many()
            .filter(wishlist_items::Column::WishlistId.eq(wishlist_id))
            .exec(db)
            .await?;
        if wishes.is_empty() {
            return Ok(());
        }

        let rows = wishes
            .iter()
            .zip(0..)
            .map(|(wish, position)| wishlist_items::ActiveModel {
                wishlist_id: ActiveValue::Set(wishlist_id),
                wish_id: ActiveValue::Set(wish.id),
                position: ActiveValue::Set(position),
            });
        wishlist_items::Entity::insert_many(rows)
            .exec_without_returning(db)
            .await?;
        Ok(())
    }

    pub async fn create_wishlist(
        &self,
        owner_id: i32,
        cmd: CreateWishlist,
    ) -> ResultEngine<Wishlist> {
        let name = normalize_name(&cmd.name)?;
        let description = cmd
            .description
            .as_deref()
            .map(normalize_description)
            .transpose()?
            .unwrap_or_default();
        let image = normalize_url(&cmd.image, "image")?;

        with_tx!(self, |db_tx| {
            let owner = self.require_user(&db_tx, owner_id).await?;
            let now = Utc::now();
            let model = wishlists::ActiveModel {
                id: ActiveValue::NotSet,
                owner_id: ActiveValue::Set(owner.id),
                name: ActiveValue::Set(name),
                description: ActiveValue::Set(description),
                image: ActiveValue::Set(image),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            }
            .insert(&db_tx)
            .await?;
            self.store_items(&db_tx, model.id, &cmd.items_id).await?;

            tracing::debug!(wishlist_id = model.id, owner_id = owner.id, "wishlist created");
            self.hydrate_wishlist(&db_tx, model).await
        })
    }

    /// Every wishlist, newest first.
    pub async fn wishlists(&self) -> ResultEngine<Vec<Wishlist>> {
        with_tx!(self, |db_tx| {
            let models = wishlists::Entity::find()
                .order_by_desc(wishlists::Column::CreatedAt)
                .order_by_desc(wishlists::Column::Id)
                .all(&db_tx)
                .await?;
            self.hydrate_wishlists(&db_tx, models).await
        })
    }

    pub async fn wishlist(&self, wishlist_id: i32) -> ResultEngine<Wishlist> {
        with_tx!(self, |db_tx| {
            let model = self.require_wishlist(&db_tx, wishlist_id).await?;
            self.hydrate_wishlist(&db_tx, model).await
        })
    }

    pub async fn update_wishlist(
        &self,
        wishlist_id: i32,
        user_id: i32,
        cmd: UpdateWishlist,
    ) -> ResultEngine<Wishlist> {
        let name = cmd.name.as_deref().map(normalize_name).transpose()?;
        let description = cmd
            .description
            .as_deref()
            .map(normalize_description)
            .transpose()?;
        let image = cmd
            .image
            .as_deref()
            .map(|image| normalize_url(image, "image"))
            .transpose()?;

        with_tx!(self, |db_tx| {
            let model = self
                .require_wishlist_owner(&db_tx, wishlist_id, user_id)
                .await?;

            let mut active: wishlists::ActiveModel = model.into();
            if let Some(name) = name {
                active.name = ActiveValue::Set(name);
            }
            if let Some(description) = description {
                active.description = ActiveValue::Set(description);
            }
            if let Some(image) = image {
                active.image = ActiveValue::Set(image);
            }
            active.updated_at = ActiveValue::Set(Utc::now());
            let model = active.update(&db_tx).await?;

            if let Some(items_id) = &cmd.items_id {
                self.store_items(&db_tx, model.id, items_id).await?;
            }
            self.hydrate_wishlist(&db_tx, model).await
        })
    }

    /// Delete a wishlist. The wishes in it are left alone.
    pub async fn delete_wishlist(&self, wishlist_id: i32, user_id: i32) -> ResultEngine<Wishlist> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_wishlist_owner(&db_tx, wishlist_id, user_id)
                .await?;
            let wishlist = self.hydrate_wishlist(&db_tx, model).await?;

            wishlist_items::Entity::delete_many()
                .filter(wishlist_items::Column::WishlistId.eq(wishlist_id))
                .exec(&db_tx)
                .await?;
            wishlists::Entity::delete_by_id(wishlist_id)
                .exec(&db_tx)
                .await?;

            tracing::debug!(wishlist_id, user_id, "wishlist deleted");
            Ok(wishlist)
        })
    }
}
