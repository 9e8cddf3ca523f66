//! SQLite keyword-scoring recipe index
//!
//! Default [`RecipeIndex`] implementation: ranks recipes by the number of
//! distinct query terms found in their indexed text. Deliberately broad -
//! diet filtering happens after retrieval, never here.

use std::collections::BTreeSet;
use std::path::PathBuf;

use async_trait::async_trait;

use super::db::{open_recipe_db, row_to_doc};
use super::{RecipeDoc, RecipeIndex};

/// Terms shorter than this carry no signal ("a", "of", ...).
const MIN_TERM_LEN: usize = 3;

pub struct SqliteRecipeIndex {
    db_path: PathBuf,
}

impl SqliteRecipeIndex {
    pub fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }
}

fn query_terms(query: &str) -> BTreeSet<String> {
    query
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() >= MIN_TERM_LEN)
        .map(str::to_lowercase)
        .collect()
}

fn score(doc: &RecipeDoc, terms: &BTreeSet<String>) -> usize {
    let haystack = format!(
        "{} {}",
        doc.metadata.item_name.to_lowercase(),
        doc.page_content.to_lowercase()
    );
    terms.iter().filter(|t| haystack.contains(t.as_str())).count()
}

#[async_trait]
impl RecipeIndex for SqliteRecipeIndex {
    async fn retrieve(&self, query: &str, k: usize) -> anyhow::Result<Vec<RecipeDoc>> {
        let conn = open_recipe_db(&self.db_path)?;

        let mut stmt = conn.prepare("SELECT * FROM recipes")?;
        let docs = stmt
            .query_map([], row_to_doc)?
            .collect::<Result<Vec<_>, _>>()?;

        let terms = query_terms(query);
        let mut scored: Vec<(usize, RecipeDoc)> = docs
            .into_iter()
            .map(|doc| (score(&doc, &terms), doc))
            .filter(|(s, _)| *s > 0)
            .collect();

        // Stable ordering: score desc, then name, so identical queries
        // always retrieve the same candidate set.
        scored.sort_by(|(sa, da), (sb, db)| {
            sb.cmp(sa)
                .then_with(|| da.metadata.item_name.cmp(&db.metadata.item_name))
        });

        Ok(scored.into_iter().take(k).map(|(_, doc)| doc).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::db::{insert_recipe, RecipeDocument};
    use crate::retrieval::RecipeRecord;

    fn seed(conn: &rusqlite::Connection, name: &str, content: &str, tags: &[&str]) {
        let doc = RecipeDocument {
            record: RecipeRecord {
                item_name: name.to_string(),
                ..Default::default()
            },
            page_content: content.to_string(),
            dietary_tags: tags.iter().map(ToString::to_string).collect(),
        };
        insert_recipe(conn, &doc).unwrap();
    }

    #[tokio::test]
    async fn ranks_by_term_overlap_and_respects_k() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("recipes.db");
        let conn = open_recipe_db(&db_path).unwrap();
        seed(
            &conn,
            "Poha",
            "light breakfast with flattened rice and peanuts",
            &["Vegetarian"],
        );
        seed(&conn, "Upma", "light breakfast with semolina", &["Vegetarian"]);
        seed(&conn, "Mutton Curry", "slow cooked dinner curry", &[]);

        let index = SqliteRecipeIndex::new(db_path);
        let docs = index
            .retrieve("light breakfast with peanuts", 2)
            .await
            .unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].metadata.item_name, "Poha");
        assert_eq!(docs[1].metadata.item_name, "Upma");
    }

    #[tokio::test]
    async fn no_overlap_retrieves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("recipes.db");
        let conn = open_recipe_db(&db_path).unwrap();
        seed(&conn, "Poha", "flattened rice breakfast", &["Vegetarian"]);

        let index = SqliteRecipeIndex::new(db_path);
        let docs = index.retrieve("xylophone", 10).await.unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn short_terms_are_dropped() {
        let terms = query_terms("a of rice to it");
        assert_eq!(terms.len(), 1);
        assert!(terms.contains("rice"));
    }
}
