//! Recipe database schema and seeding

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use super::{RecipeDoc, RecipeRecord};

/// A full recipe document: the stored record plus the indexable text and
/// dietary tags. This is the seed-file shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeDocument {
    #[serde(flatten)]
    pub record: RecipeRecord,
    /// Free text the index ranks against. Derived from the record when the
    /// seed file leaves it empty.
    #[serde(default)]
    pub page_content: String,
    #[serde(default)]
    pub dietary_tags: Vec<String>,
}

impl RecipeDocument {
    /// Text the index should rank this recipe by.
    pub fn content(&self) -> String {
        if !self.page_content.is_empty() {
            return self.page_content.clone();
        }

        let ingredients: Vec<&str> = self
            .record
            .ingredients
            .iter()
            .map(|i| i.name.as_str())
            .collect();
        format!(
            "{} ({}, {} cuisine). Ingredients: {}",
            self.record.item_name,
            self.record.item_type,
            self.record.cuisine_type,
            ingredients.join(", ")
        )
    }
}

/// Open (creating if needed) the recipe database at `path`.
pub fn open_recipe_db(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("failed to open recipe database at {}", path.display()))?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS recipes (
            item_name TEXT PRIMARY KEY COLLATE NOCASE,
            item_type TEXT NOT NULL DEFAULT '',
            preparation_time TEXT NOT NULL DEFAULT '',
            cooking_time TEXT NOT NULL DEFAULT '',
            cuisine_type TEXT NOT NULL DEFAULT '',
            ingredients TEXT NOT NULL DEFAULT '[]',
            preparation_steps TEXT NOT NULL DEFAULT '[]',
            page_content TEXT NOT NULL DEFAULT '',
            dietary_tags TEXT NOT NULL DEFAULT '[]'
        )",
        [],
    )?;

    Ok(conn)
}

/// Insert or replace one recipe document.
pub fn insert_recipe(conn: &Connection, doc: &RecipeDocument) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO recipes
            (item_name, item_type, preparation_time, cooking_time, cuisine_type,
             ingredients, preparation_steps, page_content, dietary_tags)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            doc.record.item_name,
            doc.record.item_type,
            doc.record.preparation_time,
            doc.record.cooking_time,
            doc.record.cuisine_type,
            serde_json::to_string(&doc.record.ingredients)?,
            serde_json::to_string(&doc.record.preparation_steps)?,
            doc.content(),
            serde_json::to_string(&doc.dietary_tags)?,
        ],
    )?;
    Ok(())
}

pub(crate) fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<RecipeRecord> {
    let ingredients_json: String = row.get("ingredients")?;
    let steps_json: String = row.get("preparation_steps")?;

    Ok(RecipeRecord {
        item_name: row.get("item_name")?,
        item_type: row.get("item_type")?,
        preparation_time: row.get("preparation_time")?,
        cooking_time: row.get("cooking_time")?,
        cuisine_type: row.get("cuisine_type")?,
        ingredients: serde_json::from_str(&ingredients_json).unwrap_or_default(),
        preparation_steps: serde_json::from_str(&steps_json).unwrap_or_default(),
    })
}

pub(crate) fn row_to_doc(row: &rusqlite::Row<'_>) -> rusqlite::Result<RecipeDoc> {
    let tags_json: String = row.get("dietary_tags")?;

    Ok(RecipeDoc {
        page_content: row.get("page_content")?,
        metadata: super::DocMetadata {
            item_name: row.get("item_name")?,
            dietary_tags: serde_json::from_str(&tags_json).unwrap_or_default(),
        },
    })
}
