//! Shared estates
//!
//! A character can be granted access to up to [`MAX_SHARED_ESTATES`] houses
//! owned by someone else. The game exposes them only through raw housing
//! structures, so every probe here is best-effort: a failed or implausible
//! read means "not owned", never an error.
//!
//! Custom titles are stored per character in the profile. Because a
//! shared-estate favorite's key embeds the title, renaming a slot re-keys the
//! matching favorite.

use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::config::model::ButtonColor;
use crate::constants::colors;
use crate::constants::housing::{
    FC_ESTATE_COMMAND, FC_ESTATE_KEY, MAX_SHARED_ESTATES, MAX_TELEPORT_ENTRIES, MAX_WARD_PLOT_INDEX,
    PRIVATE_ESTATE_COMMAND, PRIVATE_ESTATE_KEY, SHARED_ESTATE_COMMAND, SHARED_ESTATE_COMMAND_PREFIX,
    SHARED_ESTATE_FALLBACK_NAME, ZONE_NAME,
};
use crate::dispatch::TeleportDispatch;
use crate::error::{DispatchError, ProbeError};
use crate::favorites::{FavoritesRegistry, MutationOutcome, NewFavorite};
use crate::keys::{
    is_direct_destination, is_valid_estate_slot, shared_estate_destination, shared_estate_key, shared_estate_slot,
};

/// Raw house identity as reported by the game
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EstateId {
    pub id: u64,
    pub ward_index: i16,
    pub plot_index: i16,
    pub is_apartment: bool,
}

/// One row of the game's teleport list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeleportEntry {
    pub aetheryte_id: u32,
    pub sub_index: u8,
    pub is_shared_house: bool,
}

/// Low-level housing surface of the game client
pub trait HousingQuery {
    fn owned_shared_estate(&self, slot: usize) -> Result<EstateId, ProbeError>;

    /// Ask the client to rebuild its teleport list
    fn update_teleport_list(&self) -> Result<(), ProbeError>;

    fn teleport_list(&self) -> Result<Vec<TeleportEntry>, ProbeError>;

    /// `Ok(false)` when the client declined the teleport
    fn teleport_to(&self, aetheryte_id: u32, sub_index: u8) -> Result<bool, ProbeError>;
}

/// A shared estate the current character can reach
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailableEstate {
    pub slot: usize,
    /// Index among the available estates, used for the default title
    pub position: usize,
    pub id: EstateId,
    pub display: String,
}

impl AvailableEstate {
    pub fn default_title(&self) -> String {
        default_title(self.position)
    }
}

/// How a shared-estate teleport was carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstateTeleport {
    Direct,
    /// Direct attempt failed; the generic estate command was issued
    Fallback,
}

pub struct SharedEstateResolver {
    query: Rc<dyn HousingQuery>,
}

impl SharedEstateResolver {
    pub fn new(query: Rc<dyn HousingQuery>) -> Self {
        Self { query }
    }

    /// Estate in `slot`, or `None` when the query fails, the id is zero, or
    /// the coordinates are out of range
    pub fn probe_slot(&self, slot: usize) -> Option<EstateId> {
        if !is_valid_estate_slot(slot) {
            return None;
        }
        let estate = match self.query.owned_shared_estate(slot) {
            Ok(estate) => estate,
            Err(e) => {
                debug!(slot = slot, error = %e, "Shared estate probe failed");
                return None;
            }
        };
        if estate.id == 0 || !in_range(estate.ward_index) || !in_range(estate.plot_index) {
            return None;
        }
        Some(estate)
    }

    /// `Apartment`, or `Plot {plot} - Ward {ward}` (1-based)
    pub fn display_name(estate: &EstateId) -> String {
        if estate.is_apartment {
            return "Apartment".to_string();
        }
        if !in_range(estate.ward_index) || !in_range(estate.plot_index) {
            return SHARED_ESTATE_FALLBACK_NAME.to_string();
        }
        format!("Plot {} - Ward {}", estate.plot_index + 1, estate.ward_index + 1)
    }

    /// Owned shared estates in slot order
    pub fn available_estates(&self) -> Vec<AvailableEstate> {
        (0..MAX_SHARED_ESTATES)
            .filter_map(|slot| self.probe_slot(slot).map(|id| (slot, id)))
            .enumerate()
            .map(|(position, (slot, id))| AvailableEstate {
                slot,
                position,
                id,
                display: Self::display_name(&id),
            })
            .collect()
    }

    /// Teleport straight to the estate in `slot` via the client's teleport list.
    /// Scans at most [`MAX_TELEPORT_ENTRIES`] rows; the slot-th shared house is the target.
    /// `false` on any failure, so the caller can fall back to the named command.
    pub fn resolve_and_teleport(&self, slot: usize) -> bool {
        if !is_valid_estate_slot(slot) {
            return false;
        }
        if let Err(e) = self.query.update_teleport_list() {
            debug!(slot = slot, error = %e, "Could not refresh teleport list");
            return false;
        }
        let list = match self.query.teleport_list() {
            Ok(list) => list,
            Err(e) => {
                debug!(slot = slot, error = %e, "Could not read teleport list");
                return false;
            }
        };

        let Some(target) = list
            .iter()
            .take(MAX_TELEPORT_ENTRIES)
            .filter(|entry| entry.is_shared_house)
            .nth(slot)
        else {
            debug!(slot = slot, entries = list.len(), "No shared house entry for slot");
            return false;
        };
        if !is_direct_destination(target.aetheryte_id) {
            return false;
        }

        match self.query.teleport_to(target.aetheryte_id, target.sub_index) {
            Ok(accepted) => accepted,
            Err(e) => {
                debug!(slot = slot, error = %e, "Direct shared estate teleport failed");
                false
            }
        }
    }

    /// Direct teleport, falling back to the generic `Shared Estate` command
    pub fn teleport_or_fallback(&self, slot: usize, dispatch: &dyn TeleportDispatch) -> Result<EstateTeleport, DispatchError> {
        if self.resolve_and_teleport(slot) {
            info!(slot = slot, "Teleported to shared estate");
            return Ok(EstateTeleport::Direct);
        }
        dispatch.execute_named_command(SHARED_ESTATE_COMMAND)?;
        Ok(EstateTeleport::Fallback)
    }
}

fn in_range(index: i16) -> bool {
    (0..=MAX_WARD_PLOT_INDEX).contains(&index)
}

/// `Shared Estate {position + 1}`
pub fn default_title(position: usize) -> String {
    format!("Shared Estate {}", position + 1)
}

/// Custom title of the estate for the current character, or its default
pub fn current_title(registry: &FavoritesRegistry, estate: &AvailableEstate) -> String {
    registry
        .estate_title(estate.slot)
        .unwrap_or_else(|| estate.default_title())
}

/// Key the estate's favorite has under its current title
pub fn current_key(registry: &FavoritesRegistry, estate: &AvailableEstate) -> String {
    shared_estate_key(&current_title(registry, estate), &estate.display)
}

pub fn shared_estate_favorite(estate: &AvailableEstate, title: &str) -> NewFavorite {
    NewFavorite {
        key: shared_estate_key(title, &estate.display),
        name: format!("{title}: {}", estate.display),
        zone: ZONE_NAME.to_string(),
        command: format!("{SHARED_ESTATE_COMMAND_PREFIX}{}", estate.slot),
        destination_id: shared_estate_destination(estate.slot),
        button_color: ButtonColor::from_array(colors::SHARED_ESTATE_BUTTON),
    }
}

pub fn private_estate_favorite() -> NewFavorite {
    NewFavorite {
        key: PRIVATE_ESTATE_KEY.to_string(),
        name: "Private Estate Hall".to_string(),
        zone: ZONE_NAME.to_string(),
        command: PRIVATE_ESTATE_COMMAND.to_string(),
        destination_id: 0,
        button_color: ButtonColor::from_array(colors::PRIVATE_ESTATE_BUTTON),
    }
}

pub fn fc_estate_favorite() -> NewFavorite {
    NewFavorite {
        key: FC_ESTATE_KEY.to_string(),
        name: "FC Estate Hall".to_string(),
        zone: ZONE_NAME.to_string(),
        command: FC_ESTATE_COMMAND.to_string(),
        destination_id: 0,
        button_color: ButtonColor::from_array(colors::FC_ESTATE_BUTTON),
    }
}

/// Star toggle for a shared estate under its current title
pub fn toggle_shared_estate_favorite(registry: &mut FavoritesRegistry, estate: &AvailableEstate) -> MutationOutcome {
    let title = current_title(registry, estate);
    let key = shared_estate_key(&title, &estate.display);
    if registry.is_favorite(&key) {
        registry.remove_favorite(&key)
    } else {
        registry.add_favorite(shared_estate_favorite(estate, &title))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameOutcome {
    pub title: String,
    pub saved: MutationOutcome,
    /// A favorite under the old title was moved to the new key
    pub rekeyed: bool,
}

/// Store a new title for the estate and move its favorite, if any, to the new key.
/// Input is trimmed; blank input restores the default title.
///
/// Refused with [`MutationOutcome::Unchanged`] when the new key already
/// belongs to another slot's favorite, e.g. two apartments given one title.
pub fn rename_shared_estate(registry: &mut FavoritesRegistry, estate: &AvailableEstate, requested: &str) -> RenameOutcome {
    let trimmed = requested.trim();
    let new_title = if trimmed.is_empty() {
        estate.default_title()
    } else {
        trimmed.to_string()
    };
    let old_title = current_title(registry, estate);

    let new_key = shared_estate_key(&new_title, &estate.display);
    let taken = registry
        .get(&new_key)
        .is_some_and(|entry| shared_estate_slot(entry.destination_id) != Some(estate.slot));
    if taken {
        warn!(slot = estate.slot, key = %new_key, "Title already used by another shared estate favorite");
        return RenameOutcome {
            title: old_title,
            saved: MutationOutcome::Unchanged,
            rekeyed: false,
        };
    }

    let saved = registry.set_estate_title(estate.slot, &new_title);
    if !saved.is_applied() {
        return RenameOutcome {
            title: old_title,
            saved,
            rekeyed: false,
        };
    }

    let old_key = shared_estate_key(&old_title, &estate.display);
    let rekeyed = old_key != new_key && registry.is_favorite(&old_key);
    if rekeyed {
        registry.remove_favorite(&old_key);
        registry.add_favorite(shared_estate_favorite(estate, &new_title));
        info!(old = %old_key, new = %new_key, "Re-keyed shared estate favorite");
    }

    RenameOutcome {
        title: new_title,
        saved,
        rekeyed,
    }
}

pub fn reset_shared_estate_title(registry: &mut FavoritesRegistry, estate: &AvailableEstate) -> RenameOutcome {
    rename_shared_estate(registry, estate, "")
}
