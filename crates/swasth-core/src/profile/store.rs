//! Profile persistence
//!
//! One row per user, keyed by user id. The profile itself is stored as a
//! JSON document so field additions don't need schema migrations; the
//! weight-update timestamp is a separate column because the staleness
//! check reads it without deserializing the profile.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::UserProfile;

/// Weight entries older than this should be re-collected.
const WEIGHT_UPDATE_INTERVAL_DAYS: i64 = 15;

pub struct ProfileStore {
    db_path: PathBuf,
}

impl ProfileStore {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    fn open(&self) -> Result<Connection> {
        let conn = Connection::open(&self.db_path).with_context(|| {
            format!(
                "failed to open profile database at {}",
                self.db_path.display()
            )
        })?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS profiles (
                user_id TEXT PRIMARY KEY,
                profile TEXT NOT NULL,
                last_weight_update TEXT NOT NULL
            )",
            [],
        )?;
        Ok(conn)
    }

    /// Insert or update the profile, stamping the weight-update time.
    pub fn save(&self, user_id: &str, profile: &UserProfile) -> Result<()> {
        let conn = self.open()?;
        let profile_json = serde_json::to_string(profile)?;
        conn.execute(
            "INSERT INTO profiles (user_id, profile, last_weight_update)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(user_id) DO UPDATE SET
                profile = excluded.profile,
                last_weight_update = excluded.last_weight_update",
            params![user_id, profile_json, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn load(&self, user_id: &str) -> Result<Option<UserProfile>> {
        let conn = self.open()?;
        let profile_json: Option<String> = conn
            .query_row(
                "SELECT profile FROM profiles WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )
            .optional()?;

        match profile_json {
            Some(json) => {
                let profile = serde_json::from_str(&json)
                    .with_context(|| format!("corrupt profile record for user '{user_id}'"))?;
                Ok(Some(profile))
            }
            None => Ok(None),
        }
    }

    /// True when the user has no stored weight entry or the last one is
    /// older than 15 days.
    pub fn needs_weight_update(&self, user_id: &str) -> Result<bool> {
        let conn = self.open()?;
        let last_update: Option<String> = conn
            .query_row(
                "SELECT last_weight_update FROM profiles WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )
            .optional()?;

        let Some(last_update) = last_update else {
            return Ok(true);
        };

        let last_update: DateTime<Utc> = last_update
            .parse()
            .with_context(|| format!("corrupt weight-update timestamp for user '{user_id}'"))?;
        Ok(Utc::now() - last_update > Duration::days(WEIGHT_UPDATE_INTERVAL_DAYS))
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{ActivityLevel, DietPreference, Gender, Goal};

    fn store() -> (tempfile::TempDir, ProfileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path().join("users.db"));
        (dir, store)
    }

    fn sample_profile() -> UserProfile {
        UserProfile {
            age: Some(28),
            gender: Some(Gender::Female),
            weight_kg: Some(58.0),
            height_cm: Some(162.0),
            activity_level: Some(ActivityLevel::LightlyActive),
            goal: Some(Goal::LoseWeight),
            region: Some("South Indian".to_string()),
            diet_preference: Some(DietPreference::Vegetarian),
            allergies: vec!["gluten".to_string()],
            ..UserProfile::new()
        }
    }

    #[test]
    fn save_and_load_round_trip() {
        let (_dir, store) = store();

        assert!(store.load("asha").unwrap().is_none());
        store.save("asha", &sample_profile()).unwrap();

        let loaded = store.load("asha").unwrap().unwrap();
        assert!(loaded.is_complete());
        assert_eq!(loaded.allergies, vec!["gluten".to_string()]);
        assert_eq!(loaded.goal, Some(Goal::LoseWeight));
    }

    #[test]
    fn save_is_an_upsert() {
        let (_dir, store) = store();
        store.save("asha", &sample_profile()).unwrap();

        let mut updated = sample_profile();
        updated.weight_kg = Some(56.5);
        store.save("asha", &updated).unwrap();

        let loaded = store.load("asha").unwrap().unwrap();
        assert_eq!(loaded.weight_kg, Some(56.5));
    }

    #[test]
    fn unknown_user_needs_weight_update() {
        let (_dir, store) = store();
        assert!(store.needs_weight_update("nobody").unwrap());
    }

    #[test]
    fn fresh_save_does_not_need_weight_update() {
        let (_dir, store) = store();
        store.save("asha", &sample_profile()).unwrap();
        assert!(!store.needs_weight_update("asha").unwrap());
    }

    #[test]
    fn stale_timestamp_triggers_weight_update() {
        let (_dir, store) = store();
        store.save("asha", &sample_profile()).unwrap();

        let conn = store.open().unwrap();
        let stale = (Utc::now() - Duration::days(20)).to_rfc3339();
        conn.execute(
            "UPDATE profiles SET last_weight_update = ?1 WHERE user_id = 'asha'",
            params![stale],
        )
        .unwrap();

        assert!(store.needs_weight_update("asha").unwrap());
    }
}
