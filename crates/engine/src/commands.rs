//! Input commands for engine write operations.
//!
//! Optional fields on `Update*` commands mean "leave unchanged".

use crate::Money;

#[derive(Clone, Debug, Default)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub about: Option<String>,
    pub avatar: Option<String>,
}

/// A blank `about` or `avatar` resets it to the default.
#[derive(Clone, Debug, Default)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub about: Option<String>,
    pub avatar: Option<String>,
}

impl UpdateUser {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.about.is_none()
            && self.avatar.is_none()
    }
}

#[derive(Clone, Debug)]
pub struct CreateWish {
    pub name: String,
    pub link: String,
    pub image: String,
    pub price: Money,
    pub description: String,
}

#[derive(Clone, Debug, Default)]
pub struct UpdateWish {
    pub name: Option<String>,
    pub link: Option<String>,
    pub image: Option<String>,
    pub price: Option<Money>,
    pub description: Option<String>,
}

#[derive(Clone, Debug)]
pub struct CreateOffer {
    pub item_id: i32,
    pub amount: Money,
    pub hidden: bool,
}

#[derive(Clone, Debug, Default)]
pub struct CreateWishlist {
    pub name: String,
    pub description: Option<String>,
    pub image: String,
    pub items_id: Vec<i32>,
}

#[derive(Clone, Debug, Default)]
pub struct UpdateWishlist {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    /// Replaces the items when present.
    pub items_id: Option<Vec<i32>>,
}
