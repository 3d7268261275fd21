//! Favorites persistence and ordering for the zone level guide overlay
//!
//! The overlay's UI calls into [`FavoritesRegistry`] when a star or reorder
//! button is clicked. Favorites are partitioned by character, persisted
//! through [`ConfigStore`], and executed through the host's
//! [`TeleportDispatch`].

#![forbid(unsafe_code)]

pub mod config;
pub mod constants;
pub mod dispatch;
pub mod error;
pub mod favorites;
pub mod housing;
pub mod keys;

#[cfg(test)]
mod test_support;

pub use config::{ButtonColor, CharacterProfile, ConfigStore, FavoriteEntry, JsonFileHost, MemoryHost, PersistenceHost, RootConfig};
pub use dispatch::{Route, TeleportDispatch, Throttled};
pub use error::{DispatchError, ProbeError, StoreError};
pub use favorites::{FavoritesRegistry, MutationOutcome, NewFavorite};
pub use housing::{AvailableEstate, EstateId, HousingQuery, SharedEstateResolver, TeleportEntry};
