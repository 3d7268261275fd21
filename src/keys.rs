//! Favorite key derivation and destination-id encoding
//!
//! Keys are rebuilt from the same inputs every frame so "is this a favorite"
//! works before the entry exists. Don't change a format without migrating
//! stored keys.

use crate::constants::housing::{MAX_SHARED_ESTATES, SHARED_ESTATE_ID_BASE};

/// Key of a regular teleport button: `{zone}_{destination_id}_{location}`
pub fn teleport_key(zone: &str, destination_id: u32, location: &str) -> String {
    format!("{zone}_{destination_id}_{location}")
}

/// Key of a shared-estate favorite: `Shared:{title}:{estate_display}`
pub fn shared_estate_key(title: &str, estate_display: &str) -> String {
    format!("Shared:{title}:{estate_display}")
}

/// Destination id reserved for a shared-estate slot
pub fn shared_estate_destination(slot: usize) -> u32 {
    SHARED_ESTATE_ID_BASE + slot as u32
}

/// Slot encoded in a destination id, if it falls in the reserved band
pub fn shared_estate_slot(destination_id: u32) -> Option<usize> {
    destination_id
        .checked_sub(SHARED_ESTATE_ID_BASE)
        .map(|slot| slot as usize)
}

/// Whether the id names a direct teleport target
pub fn is_direct_destination(destination_id: u32) -> bool {
    destination_id > 0 && destination_id < SHARED_ESTATE_ID_BASE
}

pub fn is_valid_estate_slot(slot: usize) -> bool {
    slot < MAX_SHARED_ESTATES
}
