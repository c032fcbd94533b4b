mod common;

use chrono::Duration;
use engine::{CreateUser, DEFAULT_ABOUT, DEFAULT_AVATAR, Engine, EngineError, UpdateUser};

use common::{engine_with_db, user, wish};

#[tokio::test]
async fn create_user_applies_defaults() {
    let (engine, _db) = engine_with_db().await;

    let alice = engine
        .create_user(CreateUser {
            username: "  alice ".to_string(),
            email: "Alice@Example.com".to_string(),
            password: "secret".to_string(),
            ..CreateUser::default()
        })
        .await
        .unwrap();

    assert_eq!(alice.username, "alice");
    assert_eq!(alice.email, "alice@example.com");
    assert_eq!(alice.about, DEFAULT_ABOUT);
    assert_eq!(alice.avatar, DEFAULT_AVATAR);
}

#[tokio::test]
async fn duplicate_username_is_reported_before_email() {
    let (engine, _db) = engine_with_db().await;
    user(&engine, "alice").await;

    let err = engine
        .create_user(CreateUser {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "secret".to_string(),
            ..CreateUser::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(&err, EngineError::ExistingKey(msg) if msg.contains("username")));

    let err = engine
        .create_user(CreateUser {
            username: "alice2".to_string(),
            email: "ALICE@example.com".to_string(),
            password: "secret".to_string(),
            ..CreateUser::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(&err, EngineError::ExistingKey(msg) if msg.contains("email")));
}

#[tokio::test]
async fn invalid_fields_are_rejected() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .create_user(CreateUser {
            username: "bob".to_string(),
            email: "not-an-email".to_string(),
            password: "secret".to_string(),
            ..CreateUser::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    let err = engine
        .create_user(CreateUser {
            username: "bob".to_string(),
            email: "bob@example.com".to_string(),
            password: "secret".to_string(),
            about: Some("x".to_string()),
            ..CreateUser::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
}

#[tokio::test]
async fn sign_in_and_authenticate() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;

    let token = engine.sign_in("alice", "secret").await.unwrap();
    let me = engine.authenticate(&token).await.unwrap();
    assert_eq!(me.id, alice.id);

    engine.sign_out(&token).await.unwrap();
    assert_eq!(
        engine.authenticate(&token).await.unwrap_err(),
        EngineError::InvalidCredentials
    );
    // Signing out twice is fine.
    engine.sign_out(&token).await.unwrap();
}

#[tokio::test]
async fn wrong_password_and_unknown_user_look_the_same() {
    let (engine, _db) = engine_with_db().await;
    user(&engine, "alice").await;

    let wrong = engine.sign_in("alice", "nope").await.unwrap_err();
    let unknown = engine.sign_in("mallory", "secret").await.unwrap_err();
    assert_eq!(wrong, EngineError::InvalidCredentials);
    assert_eq!(unknown, EngineError::InvalidCredentials);
    assert_eq!(wrong.to_string(), unknown.to_string());
}

#[tokio::test]
async fn expired_sessions_are_rejected_and_purged() {
    let (db_engine, db) = engine_with_db().await;
    user(&db_engine, "alice").await;

    let engine = Engine::builder()
        .database(db)
        .session_ttl(Duration::seconds(-1))
        .build()
        .await
        .unwrap();
    let stale = engine.sign_in("alice", "secret").await.unwrap();
    let _other = engine.sign_in("alice", "secret").await.unwrap();

    assert_eq!(
        engine.authenticate(&stale).await.unwrap_err(),
        EngineError::InvalidCredentials
    );
    // The first one was removed by `authenticate`.
    assert_eq!(engine.purge_expired_sessions().await.unwrap(), 1);
}

#[tokio::test]
async fn find_users_matches_username_or_email() {
    let (engine, _db) = engine_with_db().await;
    user(&engine, "alice").await;
    user(&engine, "bob").await;
    engine
        .create_user(CreateUser {
            username: "carol".to_string(),
            email: "carol@ALICE-corp.com".to_string(),
            password: "secret".to_string(),
            ..CreateUser::default()
        })
        .await
        .unwrap();

    let found = engine.find_users("ALI").await.unwrap();
    let names: Vec<_> = found.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["alice", "carol"]);

    assert!(engine.find_users("   ").await.unwrap().is_empty());
    assert!(engine.find_users("%").await.unwrap().is_empty());
}

#[tokio::test]
async fn find_users_folds_non_ascii_case() {
    let (engine, _db) = engine_with_db().await;
    let ivan = user(&engine, "Иван").await;
    user(&engine, "alice").await;

    for query in ["Иван", "иван", "ИВА", "ван"] {
        let found = engine.find_users(query).await.unwrap();
        assert_eq!(found, vec![ivan.clone()], "query {query}");
    }

    engine
        .update_user(
            ivan.id,
            UpdateUser {
                username: Some("Пётр".to_string()),
                ..UpdateUser::default()
            },
        )
        .await
        .unwrap();
    let found = engine.find_users("ПЁТР").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].username, "Пётр");
}

#[tokio::test]
async fn blank_about_and_avatar_reset_to_defaults() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;

    let updated = engine
        .update_user(
            alice.id,
            UpdateUser {
                about: Some("Likes bikes".to_string()),
                avatar: Some("https://img.example.com/alice.png".to_string()),
                ..UpdateUser::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.about, "Likes bikes");

    let reset = engine
        .update_user(
            alice.id,
            UpdateUser {
                about: Some("   ".to_string()),
                avatar: Some(String::new()),
                ..UpdateUser::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(reset.about, DEFAULT_ABOUT);
    assert_eq!(reset.avatar, DEFAULT_AVATAR);

    let err = engine
        .update_user(
            alice.id,
            UpdateUser {
                about: Some("x".to_string()),
                ..UpdateUser::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
}

#[tokio::test]
async fn update_user_checks_collisions_but_allows_own_values() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    user(&engine, "bob").await;

    let err = engine
        .update_user(
            alice.id,
            UpdateUser {
                username: Some("bob".to_string()),
                ..UpdateUser::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));

    let updated = engine
        .update_user(
            alice.id,
            UpdateUser {
                username: Some("alice".to_string()),
                about: Some("Likes bikes".to_string()),
                password: Some("new-secret".to_string()),
                ..UpdateUser::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.about, "Likes bikes");
    assert!(updated.updated_at >= alice.updated_at);

    assert!(engine.sign_in("alice", "secret").await.is_err());
    engine.sign_in("alice", "new-secret").await.unwrap();
}

#[tokio::test]
async fn lookups_of_missing_users_are_not_found() {
    let (engine, _db) = engine_with_db().await;

    assert!(matches!(
        engine.user_by_id(42).await.unwrap_err(),
        EngineError::KeyNotFound(_)
    ));
    assert!(matches!(
        engine.user_by_username("ghost").await.unwrap_err(),
        EngineError::KeyNotFound(_)
    ));
    assert!(matches!(
        engine.wishes_of("ghost", None).await.unwrap_err(),
        EngineError::KeyNotFound(_)
    ));
}

#[tokio::test]
async fn user_wishes_are_newest_first() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    wish(&engine, &alice, "Bike", 10_000).await;
    wish(&engine, &alice, "Book", 1_500).await;

    let own = engine.own_wishes(alice.id).await.unwrap();
    let names: Vec<_> = own.iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, vec!["Book", "Bike"]);

    let seen = engine.wishes_of("alice", None).await.unwrap();
    assert_eq!(seen, own);
}
