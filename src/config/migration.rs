//! One-time move of pre-profile favorites into a per-character profile
//!
//! Files written before favorites were partitioned by character hold a flat
//! favorites map. The first load after upgrading attributes those favorites to
//! [`LEGACY_CHARACTER_KEY`] instead of guessing which character owned them.
//! Clearing the flat map afterwards keeps the step from firing twice.

use tracing::info;

use crate::config::model::{CharacterProfile, RootConfig};
use crate::constants::config::LEGACY_CHARACTER_KEY;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// No legacy favorites, or profiles already exist
    NotNeeded,
    Migrated { favorites: usize, estate_titles: usize },
}

impl MigrationOutcome {
    pub fn fired(&self) -> bool {
        matches!(self, MigrationOutcome::Migrated { .. })
    }
}

/// Runs only when the legacy favorites map is non-empty and no profile exists yet.
/// Legacy estate titles are copied, not cleared.
pub fn migrate_legacy_favorites(root: &mut RootConfig) -> MigrationOutcome {
    if root.favorites_by_key.is_empty() || !root.profiles_by_character_key.is_empty() {
        return MigrationOutcome::NotNeeded;
    }

    let profile = CharacterProfile {
        favorites_by_key: root.favorites_by_key.clone(),
        shared_estate_titles: root.shared_estate_titles.clone(),
    };
    let outcome = MigrationOutcome::Migrated {
        favorites: profile.favorites_by_key.len(),
        estate_titles: profile.shared_estate_titles.len(),
    };
    root.profiles_by_character_key.insert(LEGACY_CHARACTER_KEY.to_string(), profile);
    root.favorites_by_key.clear();

    info!(character = LEGACY_CHARACTER_KEY, outcome = ?outcome, "Migrated legacy favorites into profile");
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::FavoriteEntry;

    fn legacy_entry(name: &str, order: i32) -> FavoriteEntry {
        FavoriteEntry {
            name: name.to_string(),
            zone: "Thanalan".to_string(),
            command: name.to_string(),
            destination_id: 9,
            button_color: Default::default(),
            added_date: Default::default(),
            order,
        }
    }

    fn legacy_root() -> RootConfig {
        let mut root = RootConfig::default();
        root.favorites_by_key.insert("X".to_string(), legacy_entry("X", 0));
        root.favorites_by_key.insert("Y".to_string(), legacy_entry("Y", 1));
        root.shared_estate_titles.insert(0, "Garden House".to_string());
        root
    }

    #[test]
    fn test_migrates_into_legacy_profile() {
        let mut root = legacy_root();

        let outcome = migrate_legacy_favorites(&mut root);

        assert_eq!(outcome, MigrationOutcome::Migrated { favorites: 2, estate_titles: 1 });
        let profile = &root.profiles_by_character_key[LEGACY_CHARACTER_KEY];
        assert!(profile.favorites_by_key.contains_key("X"));
        assert!(profile.favorites_by_key.contains_key("Y"));
        assert_eq!(profile.shared_estate_titles.get(&0).map(String::as_str), Some("Garden House"));
        assert!(root.favorites_by_key.is_empty());
        // Titles are copied, the flat map stays
        assert_eq!(root.shared_estate_titles.len(), 1);
    }

    #[test]
    fn test_second_run_is_noop() {
        let mut root = legacy_root();
        assert!(migrate_legacy_favorites(&mut root).fired());
        let after_first = root.clone();

        let outcome = migrate_legacy_favorites(&mut root);

        assert_eq!(outcome, MigrationOutcome::NotNeeded);
        assert_eq!(root, after_first);
        assert_eq!(root.profiles_by_character_key.len(), 1);
    }

    #[test]
    fn test_skipped_when_profiles_exist() {
        let mut root = legacy_root();
        root.profiles_by_character_key.insert("Alice@Gilgamesh".to_string(), CharacterProfile::default());

        let outcome = migrate_legacy_favorites(&mut root);

        assert_eq!(outcome, MigrationOutcome::NotNeeded);
        assert_eq!(root.favorites_by_key.len(), 2);
        assert!(!root.profiles_by_character_key.contains_key(LEGACY_CHARACTER_KEY));
    }

    #[test]
    fn test_skipped_when_no_legacy_favorites() {
        let mut root = RootConfig::default();
        root.shared_estate_titles.insert(1, "Beach Hut".to_string());

        assert_eq!(migrate_legacy_favorites(&mut root), MigrationOutcome::NotNeeded);
        assert!(root.profiles_by_character_key.is_empty());
    }
}
