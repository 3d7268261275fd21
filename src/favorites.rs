//! Favorites registry
//!
//! In-memory favorites of the current character, backed by the
//! [`ConfigStore`]. Every membership or order change re-densifies order values
//! to `0..N-1` and is written through synchronously.
//!
//! Whoever observes a login should call
//! [`FavoritesRegistry::refresh_for_character`]. A mutation that finds the
//! favorites loaded for another character reloads them before applying, so
//! one character's list is never written into another's profile.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::config::model::{ButtonColor, FavoriteEntry};
use crate::config::store::ConfigStore;
use crate::dispatch::{Route, TeleportDispatch};
use crate::error::DispatchError;
use crate::housing::SharedEstateResolver;
use crate::keys::teleport_key;

/// Input for [`FavoritesRegistry::add_favorite`]
#[derive(Debug, Clone, PartialEq)]
pub struct NewFavorite {
    pub key: String,
    pub name: String,
    pub zone: String,
    pub command: String,
    pub destination_id: u32,
    pub button_color: ButtonColor,
}

impl NewFavorite {
    /// Favorite for a regular teleport button, keyed by zone, id and location
    pub fn teleport(zone: &str, destination_id: u32, location: &str, button_color: ButtonColor) -> Self {
        Self {
            key: teleport_key(zone, destination_id, location),
            name: location.to_string(),
            zone: zone.to_string(),
            command: location.to_string(),
            destination_id,
            button_color,
        }
    }
}

/// Result of a registry mutation. Failures are reported here, never raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// Applied and written to durable storage
    Saved,
    /// Applied in memory; the durable write failed and was logged
    Unsaved,
    /// Nothing to do: absent key, or already at the boundary
    Unchanged,
    /// No current character; in-memory state untouched
    Skipped,
}

impl MutationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MutationOutcome::Saved | MutationOutcome::Unsaved)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
}

/// Display order: ascending `order`, newest first among equal orders.
/// Key comparison only keeps the result deterministic.
fn display_order(a: (&String, &FavoriteEntry), b: (&String, &FavoriteEntry)) -> Ordering {
    a.1.order
        .cmp(&b.1.order)
        .then_with(|| b.1.added_date.cmp(&a.1.added_date))
        .then_with(|| a.0.cmp(b.0))
}

pub struct FavoritesRegistry {
    store: ConfigStore,
    dispatch: Rc<dyn TeleportDispatch>,
    favorites: HashMap<String, FavoriteEntry>,
    /// Character whose profile `favorites` was loaded from
    loaded_for: Option<String>,
}

impl FavoritesRegistry {
    /// Takes ownership of an initialized store and loads the current character's favorites
    pub fn new(store: ConfigStore, dispatch: Rc<dyn TeleportDispatch>) -> Self {
        let mut registry = Self {
            store,
            dispatch,
            favorites: HashMap::new(),
            loaded_for: None,
        };
        registry.refresh_for_character();
        registry
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn dispatch(&self) -> &dyn TeleportDispatch {
        self.dispatch.as_ref()
    }

    pub fn loaded_character(&self) -> Option<&str> {
        self.loaded_for.as_deref()
    }

    pub fn len(&self) -> usize {
        self.favorites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty()
    }

    pub fn is_favorite(&self, key: &str) -> bool {
        self.favorites.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&FavoriteEntry> {
        self.favorites.get(key)
    }

    /// Favorites in display order. Move operations use the same ordering.
    pub fn sorted(&self) -> Vec<(&str, &FavoriteEntry)> {
        let mut entries: Vec<(&String, &FavoriteEntry)> = self.favorites.iter().collect();
        entries.sort_by(|a, b| display_order(*a, *b));
        entries.into_iter().map(|(key, entry)| (key.as_str(), entry)).collect()
    }

    /// Insert a favorite at the end, or overwrite an existing one in place
    /// (its order and added date are kept).
    pub fn add_favorite(&mut self, favorite: NewFavorite) -> MutationOutcome {
        self.add_favorite_at(favorite, Utc::now())
    }

    fn add_favorite_at(&mut self, favorite: NewFavorite, now: DateTime<Utc>) -> MutationOutcome {
        let Some(character) = self.scoped_character() else {
            return MutationOutcome::Skipped;
        };

        let NewFavorite {
            key,
            name,
            zone,
            command,
            destination_id,
            button_color,
        } = favorite;

        match self.favorites.get_mut(&key) {
            Some(existing) => {
                existing.name = name;
                existing.zone = zone;
                existing.command = command;
                existing.destination_id = destination_id;
                existing.button_color = button_color;
                debug!(key = %key, "Updated existing favorite");
            }
            None => {
                let order = self.favorites.values().map(|f| f.order).max().map_or(0, |max| max + 1);
                info!(key = %key, order = order, "Adding favorite");
                self.favorites.insert(
                    key,
                    FavoriteEntry {
                        name,
                        zone,
                        command,
                        destination_id,
                        button_color,
                        added_date: now,
                        order,
                    },
                );
            }
        }
        self.persist(&character)
    }

    pub fn remove_favorite(&mut self, key: &str) -> MutationOutcome {
        let Some(character) = self.scoped_character() else {
            return MutationOutcome::Skipped;
        };
        if !self.favorites.contains_key(key) {
            return MutationOutcome::Unchanged;
        }
        self.favorites.remove(key);
        info!(key = %key, "Removed favorite");
        self.persist(&character)
    }

    /// Swap with the entry above in display order
    pub fn move_up(&mut self, key: &str) -> MutationOutcome {
        self.swap_with_neighbor(key, Direction::Up)
    }

    /// Swap with the entry below in display order
    pub fn move_down(&mut self, key: &str) -> MutationOutcome {
        self.swap_with_neighbor(key, Direction::Down)
    }

    fn swap_with_neighbor(&mut self, key: &str, direction: Direction) -> MutationOutcome {
        let Some(character) = self.scoped_character() else {
            return MutationOutcome::Skipped;
        };
        let sorted = self.sorted_keys();
        let Some(index) = sorted.iter().position(|k| k == key) else {
            return MutationOutcome::Unchanged;
        };
        let neighbor = match direction {
            Direction::Up => index.checked_sub(1),
            Direction::Down => (index + 1 < sorted.len()).then_some(index + 1),
        };
        let Some(neighbor) = neighbor.map(|i| sorted[i].clone()) else {
            return MutationOutcome::Unchanged;
        };

        let own_order = self.favorites[key].order;
        let neighbor_order = self.favorites[&neighbor].order;
        if let Some(entry) = self.favorites.get_mut(key) {
            entry.order = neighbor_order;
        }
        if let Some(entry) = self.favorites.get_mut(&neighbor) {
            entry.order = own_order;
        }
        debug!(key = %key, neighbor = %neighbor, direction = ?direction, "Swapped favorite order");
        self.persist(&character)
    }

    /// Discard the in-memory favorites and load the current character's profile.
    /// Returns false, leaving everything as it was, when no character is available.
    pub fn refresh_for_character(&mut self) -> bool {
        let Some(character) = self.current_character() else {
            return false;
        };
        self.load_profile(character);
        true
    }

    fn load_profile(&mut self, character: String) {
        self.favorites = self.store.get_or_create_profile(&character).favorites_by_key.clone();
        self.reassign_order_values();
        info!(character = %character, count = self.favorites.len(), "Loaded favorites for character");
        self.loaded_for = Some(character);
    }

    /// Custom title of a shared-estate slot for the current character; blank titles count as unset
    pub fn estate_title(&self, slot: usize) -> Option<String> {
        let character = self.dispatch.current_character_key().ok()?;
        self.store
            .profile(&character)?
            .shared_estate_titles
            .get(&slot)
            .filter(|title| !title.trim().is_empty())
            .cloned()
    }

    pub fn set_estate_title(&mut self, slot: usize, title: &str) -> MutationOutcome {
        let Some(character) = self.current_character() else {
            return MutationOutcome::Skipped;
        };
        self.store
            .get_or_create_profile(&character)
            .shared_estate_titles
            .insert(slot, title.to_string());
        info!(character = %character, slot = slot, title = %title, "Saved shared estate title");
        self.save_store()
    }

    /// Execute a favorite through the dispatcher. Shared-estate favorites try a
    /// direct teleport first and fall back to the generic estate command.
    pub fn activate(&self, key: &str, estates: &SharedEstateResolver) -> Result<Route, DispatchError> {
        let entry = self
            .favorites
            .get(key)
            .ok_or_else(|| DispatchError::Rejected(format!("'{key}' is not a favorite")))?;
        let route = Route::for_entry(entry);

        let result = match &route {
            Route::SharedEstate(slot) => estates.teleport_or_fallback(*slot, self.dispatch.as_ref()).map(|_| ()),
            Route::Teleport(destination_id) => self.dispatch.teleport(*destination_id),
            Route::Command(name) => self.dispatch.execute_named_command(name),
        };
        if let Err(e) = &result {
            warn!(key = %key, route = ?route, error = %e, "Failed to activate favorite");
        }
        result.map(|()| route)
    }

    fn current_character(&self) -> Option<String> {
        match self.dispatch.current_character_key() {
            Ok(character) => Some(character),
            Err(e) => {
                debug!(error = %e, "Character unavailable, skipping favorites operation");
                None
            }
        }
    }

    /// Current character, reloading the favorites first if they were loaded for someone else
    fn scoped_character(&mut self) -> Option<String> {
        let character = self.current_character()?;
        if self.loaded_for.as_deref() != Some(character.as_str()) {
            warn!(loaded = ?self.loaded_for, current = %character, "Character changed without a refresh, reloading favorites");
            self.load_profile(character.clone());
        }
        Some(character)
    }

    fn sorted_keys(&self) -> Vec<String> {
        self.sorted().into_iter().map(|(key, _)| key.to_string()).collect()
    }

    /// Rewrite orders to `0..N-1` following display order
    fn reassign_order_values(&mut self) {
        for (rank, key) in self.sorted_keys().iter().enumerate() {
            if let Some(entry) = self.favorites.get_mut(key) {
                entry.order = rank as i32;
            }
        }
    }

    /// Densify, copy into the character's profile and save
    fn persist(&mut self, character: &str) -> MutationOutcome {
        self.reassign_order_values();
        self.store.get_or_create_profile(character).favorites_by_key = self.favorites.clone();
        self.save_store()
    }

    fn save_store(&self) -> MutationOutcome {
        match self.store.save() {
            Ok(()) => MutationOutcome::Saved,
            Err(e) => {
                warn!(error = %e, "Failed to save favorites");
                MutationOutcome::Unsaved
            }
        }
    }
}
