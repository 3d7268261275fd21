//! Favorites configuration
//!
//! - **model**: serializable root object, profiles and favorite records
//! - **migration**: one-time move of pre-profile favorites
//! - **store**: store lifecycle and persistence hosts

pub mod migration;
pub mod model;
pub mod store;

pub use migration::MigrationOutcome;
pub use model::{ButtonColor, CharacterProfile, FavoriteEntry, RootConfig};
pub use store::{ConfigStore, JsonFileHost, MemoryHost, PersistenceHost};
