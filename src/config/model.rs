//! Serializable favorites configuration
//!
//! Root object written to the favorites file: per-character profiles plus the
//! flat legacy fields that only exist so old files can be migrated.
//! Field names are camelCase; the PascalCase names written by the earlier
//! plugin are accepted as aliases.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use tracing::warn;

use crate::constants::colors;

/// RGBA button color, components in `0.0..=1.0`. Cosmetic only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ButtonColor {
    #[serde(alias = "X")]
    pub x: f32,
    #[serde(alias = "Y")]
    pub y: f32,
    #[serde(alias = "Z")]
    pub z: f32,
    #[serde(alias = "W")]
    pub w: f32,
}

impl ButtonColor {
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub const fn from_array(rgba: [f32; 4]) -> Self {
        Self::new(rgba[0], rgba[1], rgba[2], rgba[3])
    }
}

impl Default for ButtonColor {
    fn default() -> Self {
        Self::from_array(colors::TELEPORT_BUTTON)
    }
}

/// One saved quick-travel shortcut
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteEntry {
    #[serde(alias = "Name", default)]
    pub name: String,
    #[serde(alias = "Zone", default)]
    pub zone: String,
    #[serde(alias = "Command", default)]
    pub command: String,
    /// `1..10000` = direct teleport target, `>= 10000` = shared-estate slot
    #[serde(alias = "AetheryteId", default)]
    pub destination_id: u32,
    #[serde(alias = "ButtonColor", default)]
    pub button_color: ButtonColor,
    /// Tie-break for entries sharing an order value (newest first)
    #[serde(alias = "AddedDate", default, deserialize_with = "deserialize_added_date")]
    pub added_date: DateTime<Utc>,
    #[serde(alias = "Order", default)]
    pub order: i32,
}

/// Favorites and estate titles of a single character
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterProfile {
    #[serde(alias = "FavoriteTeleports", default, deserialize_with = "deserialize_favorites")]
    pub favorites_by_key: HashMap<String, FavoriteEntry>,
    /// Slot index → custom shared-estate title
    #[serde(alias = "SharedEstateNames", default)]
    pub shared_estate_titles: HashMap<usize, String>,
}

/// Everything persisted in the favorites file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootConfig {
    #[serde(alias = "Version", default)]
    pub version: u32,

    #[serde(alias = "CharacterProfiles", default)]
    pub profiles_by_character_key: HashMap<String, CharacterProfile>,

    // Pre-profile fields, read only so they can be migrated.
    #[serde(alias = "FavoriteTeleports", default, deserialize_with = "deserialize_favorites")]
    pub favorites_by_key: HashMap<String, FavoriteEntry>,
    #[serde(alias = "SharedEstateNames", default)]
    pub shared_estate_titles: HashMap<usize, String>,
}

/// Accepts RFC 3339 timestamps, and offset-less ones which are read as UTC
fn deserialize_added_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|e| serde::de::Error::custom(format!("invalid timestamp '{raw}': {e}")))
}

/// Decodes a favorites map record by record, dropping entries that don't parse
/// so one corrupt favorite can't take the whole file down with it.
fn deserialize_favorites<'de, D>(deserializer: D) -> Result<HashMap<String, FavoriteEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<HashMap<String, serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default();
    let mut favorites = HashMap::with_capacity(raw.len());
    for (key, value) in raw {
        match serde_json::from_value::<FavoriteEntry>(value) {
            Ok(entry) => {
                favorites.insert(key, entry);
            }
            Err(e) => warn!(key = %key, error = %e, "Dropping unreadable favorite record"),
        }
    }
    Ok(favorites)
}
