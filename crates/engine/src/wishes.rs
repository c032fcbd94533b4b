//! The module contains `Wish`, an item a user wants to receive as a gift.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

use crate::{Money, offers::Offer, users::User};

/// A wish with its owner and the offers made toward it.
#[derive(Clone, Debug, PartialEq)]
pub struct Wish {
    pub id: i32,
    pub name: String,
    pub link: String,
    pub image: String,
    pub price: Money,
    pub raised: Money,
    pub copied: i32,
    pub description: String,
    pub owner: User,
    pub offers: Vec<Offer>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Wish {
    /// Amount still needed before the wish is fully funded.
    pub fn remaining(&self) -> Money {
        self.price.remaining(self.raised)
    }
}

/// Flat view of a wish, used where a wish is nested in another item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WishSummary {
    pub id: i32,
    pub name: String,
    pub link: String,
    pub image: String,
    pub price: Money,
    pub raised: Money,
    pub copied: i32,
    pub description: String,
    pub owner_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "wishes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub owner_id: i32,
    pub name: String,
    pub link: String,
    pub image: String,
    pub price_minor: i64,
    pub raised_minor: i64,
    pub copied: i32,
    pub description: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Owner,
    #[sea_orm(has_many = "super::offers::Entity")]
    Offers,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::offers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Offers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Model> for WishSummary {
    fn from(model: &Model) -> Self {
        Self {
            id: model.id,
            name: model.name.clone(),
            link: model.link.clone(),
            image: model.image.clone(),
            price: Money::new(model.price_minor),
            raised: Money::new(model.raised_minor),
            copied: model.copied,
            description: model.description.clone(),
            owner_id: model.owner_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
