pub use commands::{
    CreateOffer, CreateUser, CreateWish, CreateWishlist, UpdateUser, UpdateWish, UpdateWishlist,
};
pub use error::EngineError;
pub use money::Money;
pub use offers::Offer;
pub use ops::{Engine, EngineBuilder, LATEST_WISHES_LIMIT, TOP_WISHES_LIMIT};
pub use users::{DEFAULT_ABOUT, DEFAULT_AVATAR, User};
pub use wishes::{Wish, WishSummary};
pub use wishlists::Wishlist;

mod commands;
mod error;
mod money;
mod offers;
mod ops;
mod password;
mod sessions;
mod users;
mod util;
mod wishes;
mod wishlist_items;
mod wishlists;

type ResultEngine<T> = Result<T, EngineError>;
