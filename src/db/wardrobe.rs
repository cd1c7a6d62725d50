//! Wardrobe persistence
//!
//! The wardrobe lives under one fixed key as a JSON array of clothing items,
//! fully overwritten on every mutation. No partial updates, no transactions:
//! load, modify in memory, save the whole collection.

use crate::error::Result;
use crate::types::ClothingItem;
use sqlx::SqlitePool;
use tracing::{error, info};

/// Fixed storage key (kept from the original browser localStorage layout)
pub const WARDROBE_KEY: &str = "sweather_wardrobe_v1";

/// Demo wardrobe seeded on first load
fn initial_wardrobe() -> Vec<ClothingItem> {
    let seed = [
        (
            "1",
            "Favorite Grey Hoodie",
            "Hoodie",
            7,
            vec!["casual", "grey", "comfortable"],
            "https://picsum.photos/id/1005/300/300",
        ),
        (
            "2",
            "Denim Jacket",
            "Jacket",
            6,
            vec!["denim", "blue", "layer"],
            "https://picsum.photos/id/1025/300/300",
        ),
        (
            "3",
            "Winter Coat",
            "Coat",
            10,
            vec!["heavy", "winter", "warm"],
            "https://picsum.photos/id/1024/300/300",
        ),
        (
            "4",
            "Basic White Tee",
            "T-Shirt",
            2,
            vec!["white", "basic", "layer"],
            "https://picsum.photos/id/1060/300/300",
        ),
    ];

    seed.into_iter()
        .map(|(id, name, kind, insulation, tags, image)| ClothingItem {
            id: id.to_string(),
            name: name.to_string(),
            kind: kind.to_string(),
            insulation,
            tags: tags.into_iter().map(String::from).collect(),
            // Placeholder photos for the demo items
            image_data: image.to_string(),
        })
        .collect()
}

/// Load the stored wardrobe.
///
/// Seeds and returns the demo set when nothing is stored. A corrupt stored
/// value is logged and treated as an empty wardrobe.
pub async fn load(db: &SqlitePool) -> Result<Vec<ClothingItem>> {
    let row: Option<(String,)> = sqlx::query_as("SELECT value FROM store WHERE key = ?")
        .bind(WARDROBE_KEY)
        .fetch_optional(db)
        .await?;

    match row {
        Some((value,)) => match serde_json::from_str::<Vec<ClothingItem>>(&value) {
            Ok(items) => Ok(items),
            Err(e) => {
                error!("Failed to parse stored wardrobe, treating as empty: {}", e);
                Ok(Vec::new())
            }
        },
        None => {
            let items = initial_wardrobe();
            info!("No stored wardrobe found, seeding {} demo items", items.len());
            save(db, &items).await?;
            Ok(items)
        }
    }
}

/// Serialize and write the full list, replacing any prior value.
///
/// On write failure the error propagates and the prior stored state is left
/// unchanged.
pub async fn save(db: &SqlitePool, items: &[ClothingItem]) -> Result<()> {
    let value = serde_json::to_string(items)
        .map_err(|e| crate::error::Error::InvalidInput(format!("Serialize wardrobe failed: {}", e)))?;

    sqlx::query(
        "INSERT INTO store (key, value) VALUES (?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    )
    .bind(WARDROBE_KEY)
    .bind(value)
    .execute(db)
    .await?;

    Ok(())
}

/// Append an item and return the new list
pub async fn add(db: &SqlitePool, item: ClothingItem) -> Result<Vec<ClothingItem>> {
    let mut items = load(db).await?;
    items.push(item);
    save(db, &items).await?;
    Ok(items)
}

/// Remove the item with the given id and return the new list
pub async fn remove(db: &SqlitePool, id: &str) -> Result<Vec<ClothingItem>> {
    let mut items = load(db).await?;
    items.retain(|item| item.id != id);
    save(db, &items).await?;
    Ok(items)
}
