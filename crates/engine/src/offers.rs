//! The module contains `Offer`, a pledge toward someone else's wish.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

use crate::{Money, users::User, wishes::WishSummary};

/// An offer as seen by a given viewer.
///
/// `user` is `None` when the offer is hidden and the viewer is neither the
/// offering user nor the owner of the wish.
#[derive(Clone, Debug, PartialEq)]
pub struct Offer {
    pub id: i32,
    pub amount: Money,
    pub hidden: bool,
    pub user: Option<User>,
    pub item: WishSummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "offers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub wish_id: i32,
    pub amount_minor: i64,
    pub hidden: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl Model {
    /// Whether `viewer_id` may see who made this offer. Anonymous viewers
    /// only see the author of visible offers.
    pub fn user_visible_to(&self, viewer_id: Option<i32>, wish_owner_id: i32) -> bool {
        !self.hidden || viewer_id.is_some_and(|id| id == self.user_id || id == wish_owner_id)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Author,
    #[sea_orm(
        belongs_to = "super::wishes::Entity",
        from = "Column::WishId",
        to = "super::wishes::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Wish,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::wishes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wish.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
