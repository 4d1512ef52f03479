//! Demo seed data.
//!
//! Installs the sample dataset for the media-sharing demo. The data
//! is shaped so the documented query results hold: the second media
//! item carries three likes, strictly more than any other.

use crate::entities::{comment, like, media_item, media_item_tag, rating, tag, user, user_level};
use crate::map_db_err;
use mediashare_common::AppResult;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use tracing::info;

/// Identifiers of the seeded rows.
///
/// Keys are assigned by the database, so tests address rows through
/// this struct instead of assuming absolute values.
#[derive(Debug, Clone)]
pub struct SeedData {
    /// The "Admin" level.
    pub admin_level_id: i32,
    /// The "User" level.
    pub user_level_id: i32,
    /// The "Guest" level.
    pub guest_level_id: i32,
    /// Seeded users: alice, bob, carol.
    pub user_ids: [i32; 3],
    /// Seeded media items, in insertion order.
    pub media_ids: [i32; 3],
    /// The "Nature" tag.
    pub nature_tag_id: i32,
    /// The "Travel" tag.
    pub travel_tag_id: i32,
}

async fn insert_level(db: &DatabaseConnection, name: &str) -> AppResult<i32> {
    let level = user_level::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(map_db_err)?;

    Ok(level.id)
}

async fn insert_user(
    db: &DatabaseConnection,
    username: &str,
    email: &str,
    level_id: i32,
) -> AppResult<i32> {
    let user = user::ActiveModel {
        username: Set(username.to_string()),
        // Opaque placeholder hashes; this crate never verifies them.
        password: Set(format!("$demo$hash${username}")),
        email: Set(email.to_string()),
        level_id: Set(level_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(map_db_err)?;

    Ok(user.id)
}

async fn insert_media(
    db: &DatabaseConnection,
    user_id: i32,
    filename: &str,
    filesize: i64,
    media_type: &str,
    title: &str,
    description: Option<&str>,
) -> AppResult<i32> {
    let item = media_item::ActiveModel {
        user_id: Set(user_id),
        filename: Set(filename.to_string()),
        filesize: Set(filesize),
        media_type: Set(media_type.to_string()),
        title: Set(title.to_string()),
        description: Set(description.map(ToString::to_string)),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(map_db_err)?;

    Ok(item.id)
}

async fn insert_comment(
    db: &DatabaseConnection,
    media_id: i32,
    user_id: i32,
    text: &str,
) -> AppResult<()> {
    comment::ActiveModel {
        media_id: Set(media_id),
        user_id: Set(user_id),
        comment_text: Set(text.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(map_db_err)?;

    Ok(())
}

async fn insert_like(db: &DatabaseConnection, media_id: i32, user_id: i32) -> AppResult<()> {
    like::ActiveModel {
        media_id: Set(media_id),
        user_id: Set(user_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(map_db_err)?;

    Ok(())
}

async fn insert_rating(
    db: &DatabaseConnection,
    media_id: i32,
    user_id: i32,
    value: i32,
) -> AppResult<()> {
    rating::ActiveModel {
        media_id: Set(media_id),
        user_id: Set(user_id),
        value: Set(value),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(map_db_err)?;

    Ok(())
}

async fn insert_tag(db: &DatabaseConnection, name: &str) -> AppResult<i32> {
    let tag = tag::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(map_db_err)?;

    Ok(tag.id)
}

async fn attach_tag(db: &DatabaseConnection, media_id: i32, tag_id: i32) -> AppResult<()> {
    media_item_tag::ActiveModel {
        media_id: Set(media_id),
        tag_id: Set(tag_id),
    }
    .insert(db)
    .await
    .map_err(map_db_err)?;

    Ok(())
}

/// Install the demo dataset.
///
/// Expects empty tables; rerunning against seeded tables fails on the
/// unique constraints.
pub async fn install(db: &DatabaseConnection) -> AppResult<SeedData> {
    let admin_level_id = insert_level(db, "Admin").await?;
    let user_level_id = insert_level(db, "User").await?;
    let guest_level_id = insert_level(db, "Guest").await?;

    let alice = insert_user(db, "alice", "alice@example.com", admin_level_id).await?;
    let bob = insert_user(db, "bob", "bob@example.com", user_level_id).await?;
    let carol = insert_user(db, "carol", "carol@example.com", guest_level_id).await?;

    let sunrise = insert_media(
        db,
        alice,
        "sunrise.jpg",
        523_412,
        "image/jpeg",
        "Sunrise over the bay",
        Some("Taken from the east pier at 6am."),
    )
    .await?;
    let waterfall = insert_media(
        db,
        bob,
        "waterfall.png",
        1_048_576,
        "image/png",
        "Waterfall",
        None,
    )
    .await?;
    let citywalk = insert_media(
        db,
        carol,
        "citywalk.mp4",
        8_388_608,
        "video/mp4",
        "City walk",
        Some("Evening walk through the old town."),
    )
    .await?;

    insert_comment(db, sunrise, bob, "Nice shot!").await?;
    insert_comment(db, sunrise, carol, "Where was this taken?").await?;
    insert_comment(db, waterfall, alice, "Great colors.").await?;

    // The waterfall carries strictly the most likes.
    insert_like(db, sunrise, carol).await?;
    insert_like(db, waterfall, alice).await?;
    insert_like(db, waterfall, bob).await?;
    insert_like(db, waterfall, carol).await?;
    insert_like(db, citywalk, alice).await?;

    insert_rating(db, sunrise, bob, 4).await?;
    insert_rating(db, waterfall, alice, 5).await?;
    insert_rating(db, waterfall, carol, 4).await?;
    insert_rating(db, citywalk, bob, 3).await?;

    let nature_tag_id = insert_tag(db, "Nature").await?;
    let travel_tag_id = insert_tag(db, "Travel").await?;

    attach_tag(db, sunrise, nature_tag_id).await?;
    attach_tag(db, waterfall, nature_tag_id).await?;
    attach_tag(db, citywalk, travel_tag_id).await?;

    info!("Installed demo seed data");

    Ok(SeedData {
        admin_level_id,
        user_level_id,
        guest_level_id,
        user_ids: [alice, bob, carol],
        media_ids: [sunrise, waterfall, citywalk],
        nature_tag_id,
        travel_tag_id,
    })
}
