//! Mapping from engine views to response bodies.

use api_types::{
    offer::OfferView,
    user::{UserProfile, UserPublic},
    wish::{WishSummary, WishView},
    wishlist::WishlistView,
};
use engine::{Offer, User, Wish, Wishlist};

pub fn profile(user: User) -> UserProfile {
    UserProfile {
        id: user.id,
        username: user.username,
        email: user.email,
        about: user.about,
        avatar: user.avatar,
        created_at: user.created_at,
        updated_at: user.updated_at,
    }
}

pub fn public_user(user: User) -> UserPublic {
    UserPublic {
        id: user.id,
        username: user.username,
        about: user.about,
        avatar: user.avatar,
        created_at: user.created_at,
        updated_at: user.updated_at,
    }
}

pub fn wish_summary(wish: engine::WishSummary) -> WishSummary {
    WishSummary {
        id: wish.id,
        name: wish.name,
        link: wish.link,
        image: wish.image,
        price_minor: wish.price.minor(),
        raised_minor: wish.raised.minor(),
        copied: wish.copied,
        description: wish.description,
        owner_id: wish.owner_id,
        created_at: wish.created_at,
        updated_at: wish.updated_at,
    }
}

pub fn offer(offer: Offer) -> OfferView {
    OfferView {
        id: offer.id,
        amount_minor: offer.amount.minor(),
        hidden: offer.hidden,
        user: offer.user.map(public_user),
        item: wish_summary(offer.item),
        created_at: offer.created_at,
        updated_at: offer.updated_at,
    }
}

pub fn wish(wish: Wish) -> WishView {
    WishView {
        id: wish.id,
        name: wish.name,
        link: wish.link,
        image: wish.image,
        price_minor: wish.price.minor(),
        raised_minor: wish.raised.minor(),
        copied: wish.copied,
        description: wish.description,
        owner: public_user(wish.owner),
        offers: wish.offers.into_iter().map(offer).collect(),
        created_at: wish.created_at,
        updated_at: wish.updated_at,
    }
}

pub fn wishes(wishes: Vec<Wish>) -> Vec<WishView> {
    wishes.into_iter().map(wish).collect()
}

pub fn wishlist(list: Wishlist) -> WishlistView {
    WishlistView {
        id: list.id,
        name: list.name,
        description: list.description,
        image: list.image,
        owner: public_user(list.owner),
        items: list.items.into_iter().map(wish_summary).collect(),
        created_at: list.created_at,
        updated_at: list.updated_at,
    }
}
