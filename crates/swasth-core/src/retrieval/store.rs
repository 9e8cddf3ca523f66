//! SQLite-backed exact-name recipe lookup

use std::path::PathBuf;

use async_trait::async_trait;
use rusqlite::OptionalExtension;

use super::db::{open_recipe_db, row_to_record};
use super::{RecipeRecord, RecipeStore};

/// Recipe store over the local SQLite database.
///
/// Opens a fresh connection per lookup; lookups are rare (one per detail
/// request) and SQLite open is cheap.
pub struct SqliteRecipeStore {
    db_path: PathBuf,
}

impl SqliteRecipeStore {
    pub fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }
}

#[async_trait]
impl RecipeStore for SqliteRecipeStore {
    async fn find_by_name(&self, name: &str) -> anyhow::Result<Option<RecipeRecord>> {
        let conn = open_recipe_db(&self.db_path)?;

        // item_name is declared COLLATE NOCASE, so equality here is the
        // case-insensitive exact match the detail tool needs.
        let record = conn
            .query_row(
                "SELECT * FROM recipes WHERE item_name = ?1",
                [name],
                row_to_record,
            )
            .optional()?;

        Ok(record)
    }
}
