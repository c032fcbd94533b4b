//! Request and response bodies of the HTTP API.
//!
//! Money is always carried in minor units (`*_minor`, cents). No response
//! type has a password field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub mod auth {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SignUp {
        pub username: String,
        pub email: String,
        pub password: String,
        pub about: Option<String>,
        pub avatar: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SignIn {
        pub username: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SignInResponse {
        pub access_token: String,
    }
}

pub mod user {
    use super::*;

    /// The caller's own profile.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserProfile {
        pub id: i32,
        pub username: String,
        pub email: String,
        pub about: String,
        pub avatar: String,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    /// Another user as seen by the caller. The email is not shared.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserPublic {
        pub id: i32,
        pub username: String,
        pub about: String,
        pub avatar: String,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    /// Absent fields are left unchanged.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(default)]
    pub struct UserUpdate {
        pub username: Option<String>,
        pub email: Option<String>,
        pub password: Option<String>,
        pub about: Option<String>,
        pub avatar: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FindUsers {
        /// Matched against username and email.
        pub query: String,
    }
}

pub mod wish {
    use super::*;
    use crate::{offer::OfferView, user::UserPublic};

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WishNew {
        pub name: String,
        pub link: String,
        pub image: String,
        pub price_minor: i64,
        pub description: String,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(default)]
    pub struct WishUpdate {
        pub name: Option<String>,
        pub link: Option<String>,
        pub image: Option<String>,
        /// Rejected once someone has offered money.
        pub price_minor: Option<i64>,
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WishView {
        pub id: i32,
        pub name: String,
        pub link: String,
        pub image: String,
        pub price_minor: i64,
        pub raised_minor: i64,
        pub copied: i32,
        pub description: String,
        pub owner: UserPublic,
        /// Newest first.
        pub offers: Vec<OfferView>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    /// A wish nested in an offer or a wishlist.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct WishSummary {
        pub id: i32,
        pub name: String,
        pub link: String,
        pub image: String,
        pub price_minor: i64,
        pub raised_minor: i64,
        pub copied: i32,
        pub description: String,
        pub owner_id: i32,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}

pub mod offer {
    use super::*;
    use crate::{user::UserPublic, wish::WishSummary};

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OfferNew {
        pub item_id: i32,
        /// Must be > 0 and at most what the wish still needs.
        pub amount_minor: i64,
        #[serde(default)]
        pub hidden: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OfferView {
        pub id: i32,
        pub amount_minor: i64,
        pub hidden: bool,
        /// `None` when the offer is hidden from the caller.
        pub user: Option<UserPublic>,
        pub item: WishSummary,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}

pub mod wishlist {
    use super::*;
    use crate::{user::UserPublic, wish::WishSummary};

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WishlistNew {
        pub name: String,
        pub description: Option<String>,
        pub image: String,
        #[serde(default, rename = "itemsId", alias = "items_id")]
        pub items_id: Vec<i32>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(default)]
    pub struct WishlistUpdate {
        pub name: Option<String>,
        pub description: Option<String>,
        pub image: Option<String>,
        /// Replaces the items when present.
        #[serde(rename = "itemsId", alias = "items_id")]
        pub items_id: Option<Vec<i32>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WishlistView {
        pub id: i32,
        pub name: String,
        pub description: String,
        pub image: String,
        pub owner: UserPublic,
        pub items: Vec<WishSummary>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}
