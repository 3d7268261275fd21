//! Fakes for the host capabilities, shared by unit tests

use std::cell::{Cell, RefCell};

use crate::dispatch::TeleportDispatch;
use crate::error::{DispatchError, ProbeError};
use crate::housing::{EstateId, HousingQuery, TeleportEntry};

#[derive(Debug, Default)]
pub struct FakeDispatch {
    character: RefCell<Option<String>>,
    teleports: RefCell<Vec<u32>>,
    commands: RefCell<Vec<String>>,
    fail_teleports: Cell<bool>,
}

impl FakeDispatch {
    pub fn logged_in(character: &str) -> Self {
        let fake = Self::default();
        fake.log_in(character);
        fake
    }

    pub fn logged_out() -> Self {
        Self::default()
    }

    pub fn log_in(&self, character: &str) {
        *self.character.borrow_mut() = Some(character.to_string());
    }

    pub fn log_out(&self) {
        *self.character.borrow_mut() = None;
    }

    pub fn set_fail_teleports(&self, fail: bool) {
        self.fail_teleports.set(fail);
    }

    pub fn teleports(&self) -> Vec<u32> {
        self.teleports.borrow().clone()
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.borrow().clone()
    }
}

impl TeleportDispatch for FakeDispatch {
    fn current_character_key(&self) -> Result<String, DispatchError> {
        self.character.borrow().clone().ok_or(DispatchError::NoCurrentCharacter)
    }

    fn teleport(&self, destination_id: u32) -> Result<(), DispatchError> {
        if self.fail_teleports.get() {
            return Err(DispatchError::Unavailable("teleport plugin missing".to_string()));
        }
        self.teleports.borrow_mut().push(destination_id);
        Ok(())
    }

    fn execute_named_command(&self, name: &str) -> Result<(), DispatchError> {
        self.commands.borrow_mut().push(name.to_string());
        Ok(())
    }
}

pub struct FakeHousing {
    estates: RefCell<Vec<Result<EstateId, ProbeError>>>,
    teleport_list: RefCell<Result<Vec<TeleportEntry>, ProbeError>>,
    update_error: RefCell<Option<ProbeError>>,
    teleport_result: RefCell<Result<bool, ProbeError>>,
    teleported: RefCell<Vec<(u32, u8)>>,
}

impl Default for FakeHousing {
    fn default() -> Self {
        Self {
            estates: RefCell::new(Vec::new()),
            teleport_list: RefCell::new(Ok(Vec::new())),
            update_error: RefCell::new(None),
            teleport_result: RefCell::new(Ok(true)),
            teleported: RefCell::new(Vec::new()),
        }
    }
}

impl FakeHousing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Results returned for slot 0, 1, ... in order; missing slots report id 0
    pub fn with_estates(estates: Vec<Result<EstateId, ProbeError>>) -> Self {
        let fake = Self::new();
        *fake.estates.borrow_mut() = estates;
        fake
    }

    pub fn set_teleport_list(&self, list: Result<Vec<TeleportEntry>, ProbeError>) {
        *self.teleport_list.borrow_mut() = list;
    }

    pub fn set_update_error(&self, error: Option<ProbeError>) {
        *self.update_error.borrow_mut() = error;
    }

    pub fn set_teleport_result(&self, result: Result<bool, ProbeError>) {
        *self.teleport_result.borrow_mut() = result;
    }

    pub fn teleported(&self) -> Vec<(u32, u8)> {
        self.teleported.borrow().clone()
    }
}

impl HousingQuery for FakeHousing {
    fn owned_shared_estate(&self, slot: usize) -> Result<EstateId, ProbeError> {
        self.estates
            .borrow()
            .get(slot)
            .cloned()
            .unwrap_or(Ok(EstateId::default()))
    }

    fn update_teleport_list(&self) -> Result<(), ProbeError> {
        match self.update_error.borrow().clone() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn teleport_list(&self) -> Result<Vec<TeleportEntry>, ProbeError> {
        self.teleport_list.borrow().clone()
    }

    fn teleport_to(&self, aetheryte_id: u32, sub_index: u8) -> Result<bool, ProbeError> {
        self.teleported.borrow_mut().push((aetheryte_id, sub_index));
        self.teleport_result.borrow().clone()
    }
}

/// Plot/ward are 1-based here, as displayed
pub fn plot(id: u64, plot: i16, ward: i16) -> EstateId {
    EstateId {
        id,
        ward_index: ward - 1,
        plot_index: plot - 1,
        is_apartment: false,
    }
}

pub fn shared_house(aetheryte_id: u32, sub_index: u8) -> TeleportEntry {
    TeleportEntry {
        aetheryte_id,
        sub_index,
        is_shared_house: true,
    }
}

pub fn other_entry(aetheryte_id: u32) -> TeleportEntry {
    TeleportEntry {
        aetheryte_id,
        sub_index: 0,
        is_shared_house: false,
    }
}
