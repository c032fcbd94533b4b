//! Initial schema.
//!
//! - `users`: accounts, unique by username and by email. `username_search`
//!   holds the lowercased username for search
//! - `sessions`: bearer tokens (stored hashed) issued by sign in
//! - `wishes`: items a user wants, with the money raised so far
//! - `offers`: pledges of money toward someone else's wish
//! - `wishlists` and `wishlist_items`: ordered groups of wishes

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Username,
    UsernameSearch,
    Email,
    Password,
    About,
    Avatar,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Sessions {
    Table,
    TokenHash,
    UserId,
    CreatedAt,
    ExpiresAt,
}

#[derive(Iden)]
enum Wishes {
    Table,
    Id,
    OwnerId,
    Name,
    Link,
    Image,
    PriceMinor,
    RaisedMinor,
    Copied,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Offers {
    Table,
    Id,
    UserId,
    WishId,
    AmountMinor,
    Hidden,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Wishlists {
    Table,
    Id,
    OwnerId,
    Name,
    Description,
    Image,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum WishlistItems {
    Table,
    WishlistId,
    WishId,
    Position,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::UsernameSearch).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .col(ColumnDef::new(Users::About).string_len(200).not_null())
                    .col(ColumnDef::new(Users::Avatar).string().not_null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Sessions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Sessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sessions::TokenHash)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sessions::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(Sessions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Sessions::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sessions-user_id")
                            .from(Sessions::Table, Sessions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-sessions-expires_at")
                    .table(Sessions::Table)
                    .col(Sessions::ExpiresAt)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Wishes
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Wishes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Wishes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Wishes::OwnerId).integer().not_null())
                    .col(ColumnDef::new(Wishes::Name).string_len(250).not_null())
                    .col(ColumnDef::new(Wishes::Link).string().not_null())
                    .col(ColumnDef::new(Wishes::Image).string().not_null())
                    .col(ColumnDef::new(Wishes::PriceMinor).big_integer().not_null())
                    .col(
                        ColumnDef::new(Wishes::RaisedMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Wishes::Copied)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Wishes::Description)
                            .string_len(1024)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Wishes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Wishes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-wishes-owner_id")
                            .from(Wishes::Table, Wishes::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-wishes-owner_id")
                    .table(Wishes::Table)
                    .col(Wishes::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-wishes-created_at")
                    .table(Wishes::Table)
                    .col(Wishes::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-wishes-copied")
                    .table(Wishes::Table)
                    .col(Wishes::Copied)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Offers
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Offers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Offers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Offers::UserId).integer().not_null())
                    .col(ColumnDef::new(Offers::WishId).integer().not_null())
                    .col(ColumnDef::new(Offers::AmountMinor).big_integer().not_null())
                    .col(
                        ColumnDef::new(Offers::Hidden)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Offers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Offers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-offers-user_id")
                            .from(Offers::Table, Offers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-offers-wish_id")
                            .from(Offers::Table, Offers::WishId)
                            .to(Wishes::Table, Wishes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-offers-wish_id")
                    .table(Offers::Table)
                    .col(Offers::WishId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Wishlists
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Wishlists::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Wishlists::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Wishlists::OwnerId).integer().not_null())
                    .col(ColumnDef::new(Wishlists::Name).string_len(250).not_null())
                    .col(
                        ColumnDef::new(Wishlists::Description)
                            .string_len(1500)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Wishlists::Image).string().not_null())
                    .col(
                        ColumnDef::new(Wishlists::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Wishlists::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-wishlists-owner_id")
                            .from(Wishlists::Table, Wishlists::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WishlistItems::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(WishlistItems::WishlistId).integer().not_null())
                    .col(ColumnDef::new(WishlistItems::WishId).integer().not_null())
                    .col(ColumnDef::new(WishlistItems::Position).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(WishlistItems::WishlistId)
                            .col(WishlistItems::WishId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-wishlist_items-wishlist_id")
                            .from(WishlistItems::Table, WishlistItems::WishlistId)
                            .to(Wishlists::Table, Wishlists::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-wishlist_items-wish_id")
                            .from(WishlistItems::Table, WishlistItems::WishId)
                            .to(Wishes::Table, Wishes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WishlistItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Wishlists::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Offers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Wishes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sessions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}
