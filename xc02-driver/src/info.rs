//
// XC02 board controller driver
// Copyright (C) 2022 Sebastian Urban <surban@surban.net>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
//

//! Driver information queries.

use crate::error::{Error, Result};

/// Address mode: 8-bit addresses.
pub const ADDR_MODE_A08: u32 = 0x01;
/// Data mode: 8-bit access.
pub const DATA_MODE_D08: u32 = 0x01;
/// Data mode: 16-bit access.
pub const DATA_MODE_D16: u32 = 0x02;

/// Hardware access characteristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HwCharacter {
    /// Supported address modes.
    pub addr_modes: u32,
    /// Supported data modes.
    pub data_modes: u32,
}

/// Address space required by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddrSpace {
    /// Address mode.
    pub addr_mode: u32,
    /// Data mode.
    pub data_mode: u32,
    /// Size in bytes.
    pub size: u32,
}

/// Locking required by the I/O framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    /// No locking.
    None,
    /// Lock every driver call.
    Call,
    /// Lock per channel.
    Channel,
}

/// Information query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoQuery {
    /// Hardware access characteristics.
    HwCharacter,
    /// Number of address spaces.
    AddrSpaceCount,
    /// Address space with index.
    AddrSpace(u32),
    /// Interrupt usage.
    Irq,
    /// Lock mode.
    LockMode,
}

/// Information query answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Info {
    /// Hardware access characteristics.
    HwCharacter(HwCharacter),
    /// Number of address spaces.
    AddrSpaceCount(u32),
    /// Address space.
    AddrSpace(AddrSpace),
    /// Whether an interrupt is used.
    Irq(bool),
    /// Lock mode.
    LockMode(LockMode),
}

/// Hardware access characteristics.
pub fn hw_character() -> HwCharacter {
    HwCharacter { addr_modes: ADDR_MODE_A08, data_modes: DATA_MODE_D08 | DATA_MODE_D16 }
}

/// Number of address spaces.
///
/// The device is reached over SMBus and needs no mapped address space.
pub fn addr_space_count() -> u32 {
    0
}

/// Address space with `index`.
pub fn addr_space(index: u32) -> Result<AddrSpace> {
    if index >= addr_space_count() {
        return Err(Error::ParameterRange(index.into()));
    }
    Ok(AddrSpace { addr_mode: ADDR_MODE_A08, data_mode: DATA_MODE_D08, size: 0 })
}

/// Whether the driver uses an interrupt.
pub fn uses_irq() -> bool {
    false
}

/// Lock mode.
pub fn lock_mode() -> LockMode {
    LockMode::Call
}

/// Answers an information query.
pub fn info(query: InfoQuery) -> Result<Info> {
    Ok(match query {
        InfoQuery::HwCharacter => Info::HwCharacter(hw_character()),
        InfoQuery::AddrSpaceCount => Info::AddrSpaceCount(addr_space_count()),
        InfoQuery::AddrSpace(index) => Info::AddrSpace(addr_space(index)?),
        InfoQuery::Irq => Info::Irq(uses_irq()),
        InfoQuery::LockMode => Info::LockMode(lock_mode()),
    })
}
