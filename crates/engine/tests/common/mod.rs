#![allow(dead_code)]

use sea_orm::{Database, DatabaseConnection};

use engine::{CreateUser, CreateWish, Engine, Money, User, Wish};
use migration::MigratorTrait;

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

pub async fn user(engine: &Engine, username: &str) -> User {
    engine
        .create_user(CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: "secret".to_string(),
            ..CreateUser::default()
        })
        .await
        .unwrap()
}

pub fn wish_cmd(name: &str, price: i64) -> CreateWish {
    CreateWish {
        name: name.to_string(),
        link: format!("https://shop.example.com/{}", name.to_lowercase()),
        image: "https://img.example.com/item.png".to_string(),
        price: Money::new(price),
        description: format!("I would love a {name}"),
    }
}

pub async fn wish(engine: &Engine, owner: &User, name: &str, price: i64) -> Wish {
    engine
        .create_wish(owner.id, wish_cmd(name, price))
        .await
        .unwrap()
}
