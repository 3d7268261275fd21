//! Application-wide constants
//!
//! Magic numbers and string literals shared by the store, the favorites
//! registry and the shared-estate resolver.

/// Configuration file location and migration constants
pub mod config {
    /// Directory under the platform config dir
    pub const APP_DIR: &str = "zone-level-guide";

    /// Favorites file name
    pub const FILENAME: &str = "favorites.json";

    /// Suffix for the copy kept when the favorites file cannot be parsed
    pub const BACKUP_SUFFIX: &str = "bak";

    /// Character key that receives favorites saved before per-character profiles existed
    pub const LEGACY_CHARACTER_KEY: &str = "__legacy__";
}

/// Housing and shared-estate constants
pub mod housing {
    /// Shared estates a character can be granted access to
    pub const MAX_SHARED_ESTATES: usize = 2;

    /// Teleport list entries scanned when looking for shared houses
    pub const MAX_TELEPORT_ENTRIES: usize = 50;

    /// Ward and plot indices above this are treated as garbage
    pub const MAX_WARD_PLOT_INDEX: i16 = 60;

    /// Destination ids at or above this encode a shared-estate slot (`base + slot`)
    pub const SHARED_ESTATE_ID_BASE: u32 = 10_000;

    /// Zone label used for every housing favorite
    pub const ZONE_NAME: &str = "Housing";

    /// Command prefix marking a shared-estate favorite (`SharedEstate_{slot}`)
    pub const SHARED_ESTATE_COMMAND_PREFIX: &str = "SharedEstate_";

    /// Generic named command used when a direct shared-estate teleport fails
    pub const SHARED_ESTATE_COMMAND: &str = "Shared Estate";

    /// Display name used when an estate id cannot be rendered
    pub const SHARED_ESTATE_FALLBACK_NAME: &str = "Shared Estate";

    pub const PRIVATE_ESTATE_COMMAND: &str = "Estate Hall";
    pub const FC_ESTATE_COMMAND: &str = "Estate Hall (Free Company)";

    pub const PRIVATE_ESTATE_KEY: &str = "Housing_PrivateEstate_EstateHall";
    pub const FC_ESTATE_KEY: &str = "Housing_FCEstate_EstateHallFC";
}

/// Button colors stored with favorites (RGBA, 0.0..=1.0)
pub mod colors {
    /// Regular teleport buttons
    pub const TELEPORT_BUTTON: [f32; 4] = [0.35, 0.38, 0.42, 0.8];

    pub const PRIVATE_ESTATE_BUTTON: [f32; 4] = [0.639, 0.745, 0.549, 0.8];
    pub const FC_ESTATE_BUTTON: [f32; 4] = [0.369, 0.506, 0.675, 0.8];
    pub const SHARED_ESTATE_BUTTON: [f32; 4] = [0.369, 0.506, 0.675, 1.0];
}

/// Teleport dispatch constants
pub mod dispatch {
    use std::time::Duration;

    /// Minimum gap between two successful teleport or estate commands
    pub const TELEPORT_COOLDOWN: Duration = Duration::from_secs(3);
}
