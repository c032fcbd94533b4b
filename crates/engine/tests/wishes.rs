mod common;

use engine::{CreateOffer, EngineError, LATEST_WISHES_LIMIT, Money, UpdateWish};

use common::{engine_with_db, user, wish, wish_cmd};

fn offer(item_id: i32, amount: i64, hidden: bool) -> CreateOffer {
    CreateOffer {
        item_id,
        amount: Money::new(amount),
        hidden,
    }
}

#[tokio::test]
async fn create_wish_validates_input() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;

    let mut cmd = wish_cmd("Bike", 0);
    assert!(matches!(
        engine.create_wish(alice.id, cmd.clone()).await.unwrap_err(),
        EngineError::InvalidAmount(_)
    ));

    cmd.price = Money::new(100);
    cmd.link = "ftp://shop.example.com/bike".to_string();
    assert!(matches!(
        engine.create_wish(alice.id, cmd.clone()).await.unwrap_err(),
        EngineError::InvalidInput(_)
    ));

    cmd.link = "https://shop.example.com/bike".to_string();
    cmd.description = " ".to_string();
    assert!(matches!(
        engine.create_wish(alice.id, cmd).await.unwrap_err(),
        EngineError::InvalidInput(_)
    ));
}

#[tokio::test]
async fn created_wish_is_hydrated() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;

    let bike = wish(&engine, &alice, "Bike", 10_000).await;
    assert_eq!(bike.owner.id, alice.id);
    assert_eq!(bike.raised, Money::ZERO);
    assert_eq!(bike.copied, 0);
    assert!(bike.offers.is_empty());

    assert_eq!(engine.wish(bike.id, None).await.unwrap(), bike);
    assert!(matches!(
        engine.wish(bike.id + 1, None).await.unwrap_err(),
        EngineError::KeyNotFound(_)
    ));
}

#[tokio::test]
async fn only_owner_can_update_or_delete() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let bob = user(&engine, "bob").await;
    let bike = wish(&engine, &alice, "Bike", 10_000).await;

    let err = engine
        .update_wish(bike.id, bob.id, UpdateWish::default())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
    assert!(matches!(
        engine.delete_wish(bike.id, bob.id).await.unwrap_err(),
        EngineError::Forbidden(_)
    ));

    let updated = engine
        .update_wish(
            bike.id,
            alice.id,
            UpdateWish {
                name: Some("Road bike".to_string()),
                ..UpdateWish::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Road bike");
    assert_eq!(updated.price, bike.price);
}

#[tokio::test]
async fn price_is_frozen_once_money_is_raised() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let bob = user(&engine, "bob").await;
    let bike = wish(&engine, &alice, "Bike", 10_000).await;

    engine
        .create_offer(bob.id, offer(bike.id, 2_500, false))
        .await
        .unwrap();

    let err = engine
        .update_wish(
            bike.id,
            alice.id,
            UpdateWish {
                price: Some(Money::new(20_000)),
                ..UpdateWish::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidState("cannot change price: funds already raised".to_string())
    );

    // Same price is not a change.
    engine
        .update_wish(
            bike.id,
            alice.id,
            UpdateWish {
                price: Some(Money::new(10_000)),
                ..UpdateWish::default()
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn offers_raise_the_wish_up_to_its_price() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let bob = user(&engine, "bob").await;
    let bike = wish(&engine, &alice, "Bike", 10_000).await;

    assert!(matches!(
        engine
            .create_offer(alice.id, offer(bike.id, 100, false))
            .await
            .unwrap_err(),
        EngineError::Forbidden(_)
    ));
    assert!(matches!(
        engine
            .create_offer(bob.id, offer(bike.id, 0, false))
            .await
            .unwrap_err(),
        EngineError::InvalidAmount(_)
    ));
    assert!(matches!(
        engine
            .create_offer(bob.id, offer(bike.id, 10_001, false))
            .await
            .unwrap_err(),
        EngineError::InvalidState(_)
    ));
    assert!(matches!(
        engine
            .create_offer(bob.id, offer(bike.id + 100, 10, false))
            .await
            .unwrap_err(),
        EngineError::KeyNotFound(_)
    ));

    let first = engine
        .create_offer(bob.id, offer(bike.id, 4_000, false))
        .await
        .unwrap();
    assert_eq!(first.item.raised, Money::new(4_000));
    engine
        .create_offer(bob.id, offer(bike.id, 6_000, false))
        .await
        .unwrap();

    let funded = engine.wish(bike.id, None).await.unwrap();
    assert_eq!(funded.raised, funded.price);
    assert_eq!(funded.remaining(), Money::ZERO);
    assert_eq!(funded.offers.len(), 2);
    assert_eq!(funded.offers[0].amount, Money::new(6_000));

    let err = engine
        .create_offer(bob.id, offer(bike.id, 1, false))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidState(msg) if msg.contains("already raised")));
}

#[tokio::test]
async fn hidden_offers_hide_the_author_from_strangers() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let bob = user(&engine, "bob").await;
    let carol = user(&engine, "carol").await;
    let bike = wish(&engine, &alice, "Bike", 10_000).await;

    let secret = engine
        .create_offer(bob.id, offer(bike.id, 1_000, true))
        .await
        .unwrap();
    assert_eq!(secret.user.as_ref().map(|u| u.id), Some(bob.id));

    for (viewer, visible) in [
        (Some(alice.id), true),
        (Some(bob.id), true),
        (Some(carol.id), false),
        (None, false),
    ] {
        let seen = engine.offer(secret.id, viewer).await.unwrap();
        assert_eq!(seen.user.is_some(), visible, "viewer {viewer:?}");
    }

    let wish = engine.wish(bike.id, Some(carol.id)).await.unwrap();
    assert!(wish.offers[0].user.is_none());
    assert!(wish.offers[0].hidden);
}

#[tokio::test]
async fn delete_wish_removes_offers_and_list_entries() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let bob = user(&engine, "bob").await;
    let bike = wish(&engine, &alice, "Bike", 10_000).await;
    let book = wish(&engine, &alice, "Book", 1_500).await;
    engine
        .create_offer(bob.id, offer(bike.id, 1_000, false))
        .await
        .unwrap();
    let list = engine
        .create_wishlist(
            alice.id,
            engine::CreateWishlist {
                name: "Birthday".to_string(),
                image: "https://img.example.com/cake.png".to_string(),
                items_id: vec![bike.id, book.id],
                ..engine::CreateWishlist::default()
            },
        )
        .await
        .unwrap();

    let deleted = engine.delete_wish(bike.id, alice.id).await.unwrap();
    assert_eq!(deleted.id, bike.id);
    assert_eq!(deleted.offers.len(), 1);

    assert!(engine.offers(None).await.unwrap().is_empty());
    let list = engine.wishlist(list.id).await.unwrap();
    let items: Vec<_> = list.items.iter().map(|w| w.id).collect();
    assert_eq!(items, vec![book.id]);
}

#[tokio::test]
async fn copy_wish_rules() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let bob = user(&engine, "bob").await;
    let bike = wish(&engine, &alice, "Bike", 10_000).await;
    engine
        .create_offer(bob.id, offer(bike.id, 1_000, false))
        .await
        .unwrap();

    assert!(matches!(
        engine.copy_wish(bike.id, alice.id).await.unwrap_err(),
        EngineError::InvalidState(_)
    ));

    let copy = engine.copy_wish(bike.id, bob.id).await.unwrap();
    assert_ne!(copy.id, bike.id);
    assert_eq!(copy.owner.id, bob.id);
    assert_eq!(copy.name, bike.name);
    assert_eq!(copy.raised, Money::ZERO);
    assert_eq!(copy.copied, 0);
    assert_eq!(engine.wish(bike.id, None).await.unwrap().copied, 1);

    assert!(matches!(
        engine.copy_wish(bike.id, bob.id).await.unwrap_err(),
        EngineError::ExistingKey(_)
    ));
}

#[tokio::test]
async fn latest_and_top_wishes() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let bob = user(&engine, "bob").await;
    let carol = user(&engine, "carol").await;

    let bike = wish(&engine, &alice, "Bike", 10_000).await;
    let book = wish(&engine, &alice, "Book", 1_500).await;
    engine.copy_wish(book.id, bob.id).await.unwrap();
    engine.copy_wish(book.id, carol.id).await.unwrap();
    engine.copy_wish(bike.id, bob.id).await.unwrap();

    let latest = engine.latest_wishes(None).await.unwrap();
    assert_eq!(latest.len(), 5);
    assert_eq!(latest[0].owner.id, bob.id);
    assert_eq!(latest[0].name, "Bike");

    let top = engine.top_wishes(None).await.unwrap();
    assert_eq!(top[0].id, book.id);
    assert_eq!(top[1].id, bike.id);

    for n in 0..LATEST_WISHES_LIMIT {
        wish(&engine, &carol, &format!("Thing{n}"), 100).await;
    }
    assert_eq!(
        engine.latest_wishes(None).await.unwrap().len() as u64,
        LATEST_WISHES_LIMIT
    );
}

#[tokio::test]
async fn wishes_by_ids_keeps_order_and_drops_duplicates() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let bike = wish(&engine, &alice, "Bike", 10_000).await;
    let book = wish(&engine, &alice, "Book", 1_500).await;

    let found = engine
        .wishes_by_ids(&[book.id, bike.id, book.id])
        .await
        .unwrap();
    let ids: Vec<_> = found.iter().map(|w| w.id).collect();
    assert_eq!(ids, vec![book.id, bike.id]);

    assert!(matches!(
        engine.wishes_by_ids(&[bike.id, 999]).await.unwrap_err(),
        EngineError::KeyNotFound(_)
    ));
}
