mod common;

use engine::{CreateWishlist, EngineError, UpdateWishlist};

use common::{engine_with_db, user, wish};

fn list_cmd(name: &str, items_id: Vec<i32>) -> CreateWishlist {
    CreateWishlist {
        name: name.to_string(),
        description: None,
        image: "https://img.example.com/list.png".to_string(),
        items_id,
    }
}

#[tokio::test]
async fn create_wishlist_keeps_item_order() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let bike = wish(&engine, &alice, "Bike", 10_000).await;
    let book = wish(&engine, &alice, "Book", 1_500).await;

    let list = engine
        .create_wishlist(alice.id, list_cmd("Birthday", vec![book.id, bike.id]))
        .await
        .unwrap();
    assert_eq!(list.owner.id, alice.id);
    assert_eq!(list.description, "");
    let ids: Vec<_> = list.items.iter().map(|w| w.id).collect();
    assert_eq!(ids, vec![book.id, bike.id]);

    assert_eq!(engine.wishlist(list.id).await.unwrap(), list);
    assert_eq!(engine.wishlists().await.unwrap(), vec![list]);
}

#[tokio::test]
async fn create_wishlist_rejects_unknown_items_and_bad_input() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;

    assert!(matches!(
        engine
            .create_wishlist(alice.id, list_cmd("Birthday", vec![404]))
            .await
            .unwrap_err(),
        EngineError::KeyNotFound(_)
    ));
    // Nothing was stored.
    assert!(engine.wishlists().await.unwrap().is_empty());

    let mut cmd = list_cmd("Birthday", Vec::new());
    cmd.description = Some("x".repeat(1501));
    assert!(matches!(
        engine.create_wishlist(alice.id, cmd).await.unwrap_err(),
        EngineError::InvalidInput(_)
    ));
    assert!(matches!(
        engine
            .create_wishlist(alice.id, list_cmd("", Vec::new()))
            .await
            .unwrap_err(),
        EngineError::InvalidInput(_)
    ));
}

#[tokio::test]
async fn update_wishlist_replaces_items_only_when_given() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let bike = wish(&engine, &alice, "Bike", 10_000).await;
    let book = wish(&engine, &alice, "Book", 1_500).await;
    let list = engine
        .create_wishlist(alice.id, list_cmd("Birthday", vec![bike.id]))
        .await
        .unwrap();

    let renamed = engine
        .update_wishlist(
            list.id,
            alice.id,
            UpdateWishlist {
                name: Some("New year".to_string()),
                ..UpdateWishlist::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "New year");
    assert_eq!(renamed.items.len(), 1);

    let replaced = engine
        .update_wishlist(
            list.id,
            alice.id,
            UpdateWishlist {
                items_id: Some(vec![book.id, bike.id]),
                ..UpdateWishlist::default()
            },
        )
        .await
        .unwrap();
    let ids: Vec<_> = replaced.items.iter().map(|w| w.id).collect();
    assert_eq!(ids, vec![book.id, bike.id]);
    assert_eq!(replaced.name, "New year");
}

#[tokio::test]
async fn only_owner_can_change_a_wishlist() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let bob = user(&engine, "bob").await;
    let list = engine
        .create_wishlist(alice.id, list_cmd("Birthday", Vec::new()))
        .await
        .unwrap();

    assert!(matches!(
        engine
            .update_wishlist(list.id, bob.id, UpdateWishlist::default())
            .await
            .unwrap_err(),
        EngineError::Forbidden(_)
    ));
    assert!(matches!(
        engine.delete_wishlist(list.id, bob.id).await.unwrap_err(),
        EngineError::Forbidden(_)
    ));
    assert!(matches!(
        engine.delete_wishlist(list.id + 1, alice.id).await.unwrap_err(),
        EngineError::KeyNotFound(_)
    ));

    let deleted = engine.delete_wishlist(list.id, alice.id).await.unwrap();
    assert_eq!(deleted.id, list.id);
    assert!(matches!(
        engine.wishlist(list.id).await.unwrap_err(),
        EngineError::KeyNotFound(_)
    ));
}
