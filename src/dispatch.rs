//! Teleport dispatch capability
//!
//! The game-side teleport plugin and command processor live outside this
//! crate. The core sees them only through [`TeleportDispatch`].

use std::cell::Cell;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::config::model::FavoriteEntry;
use crate::constants::dispatch::TELEPORT_COOLDOWN;
use crate::constants::housing::SHARED_ESTATE_COMMAND_PREFIX;
use crate::error::DispatchError;
use crate::keys::{is_direct_destination, shared_estate_slot};

pub trait TeleportDispatch {
    /// Opaque identity of the logged-in character.
    /// `Err(DispatchError::NoCurrentCharacter)` while nobody is logged in.
    fn current_character_key(&self) -> Result<String, DispatchError>;

    fn teleport(&self, destination_id: u32) -> Result<(), DispatchError>;

    /// Run a named estate/system command, e.g. `Estate Hall`
    fn execute_named_command(&self, name: &str) -> Result<(), DispatchError>;
}

/// How a favorite is executed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    SharedEstate(usize),
    Teleport(u32),
    Command(String),
}

impl Route {
    pub fn for_entry(entry: &FavoriteEntry) -> Self {
        if entry.command.starts_with(SHARED_ESTATE_COMMAND_PREFIX) {
            if let Some(slot) = shared_estate_slot(entry.destination_id) {
                return Route::SharedEstate(slot);
            }
        }
        if is_direct_destination(entry.destination_id) {
            Route::Teleport(entry.destination_id)
        } else {
            Route::Command(entry.command.clone())
        }
    }
}

/// Rejects teleports and commands issued within a cooldown of the last successful one
pub struct Throttled<D> {
    inner: D,
    cooldown: Duration,
    last: Cell<Option<Instant>>,
}

impl<D: TeleportDispatch> Throttled<D> {
    pub fn new(inner: D) -> Self {
        Self::with_cooldown(inner, TELEPORT_COOLDOWN)
    }

    pub fn with_cooldown(inner: D, cooldown: Duration) -> Self {
        Self {
            inner,
            cooldown,
            last: Cell::new(None),
        }
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }

    fn guarded(&self, action: impl FnOnce(&D) -> Result<(), DispatchError>) -> Result<(), DispatchError> {
        if let Some(last) = self.last.get() {
            if last.elapsed() < self.cooldown {
                warn!(cooldown = ?self.cooldown, "Teleport requested during cooldown");
                return Err(DispatchError::CoolingDown);
            }
        }
        action(&self.inner)?;
        self.last.set(Some(Instant::now()));
        Ok(())
    }
}

impl<D: TeleportDispatch> TeleportDispatch for Throttled<D> {
    fn current_character_key(&self) -> Result<String, DispatchError> {
        self.inner.current_character_key()
    }

    fn teleport(&self, destination_id: u32) -> Result<(), DispatchError> {
        self.guarded(|inner| inner.teleport(destination_id))
    }

    fn execute_named_command(&self, name: &str) -> Result<(), DispatchError> {
        info!(command = %name, "Executing estate command");
        self.guarded(|inner| inner.execute_named_command(name))
    }
}
