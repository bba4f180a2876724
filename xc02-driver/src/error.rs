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

//! Driver errors.

use displaydoc::Display;
use thiserror::Error;

use crate::transport::TransportError;

/// Base of driver error codes.
pub const ERR_LL: i32 = 0x0c00;
/// Error code: illegal parameter.
pub const ERR_LL_ILL_PARAM: i32 = ERR_LL + 0x01;
/// Error code: unknown status code.
pub const ERR_LL_UNK_CODE: i32 = ERR_LL + 0x02;
/// Error code: device not ready.
pub const ERR_LL_DEV_NOTRDY: i32 = ERR_LL + 0x03;
/// Error code: shutdown signal already installed.
pub const ERR_OSS_SIG_SET: i32 = ERR_LL + 0x04;
/// Error code: shutdown signal not installed.
pub const ERR_OSS_SIG_CLR: i32 = ERR_LL + 0x05;
/// Error code: bus transaction failed.
pub const ERR_LL_WRITE: i32 = ERR_LL + 0x06;
/// Error code: out of resources.
pub const ERR_OSS_MEM_ALLOC: i32 = ERR_LL + 0x07;
/// Error code: device identification failed.
pub const ERR_LL_ILL_ID: i32 = ERR_LL + 0x08;
/// Error code: function not supported.
pub const ERR_LL_ILL_FUNC: i32 = ERR_LL + 0x09;
/// Error code: illegal channel direction.
pub const ERR_LL_ILL_DIR: i32 = ERR_LL + 0x0a;
/// Error code: wrong user buffer.
pub const ERR_LL_USERBUF: i32 = ERR_LL + 0x0b;
/// Error code: descriptor key missing or invalid.
pub const ERR_DESC_KEY: i32 = ERR_LL + 0x0c;

/// XC02 driver error.
#[derive(Display, Error, Debug)]
pub enum Error {
    /// Parameter out of range: {0}
    ParameterRange(i64),
    /// Illegal channel: {0}
    IllegalChannel(i32),
    /// Unknown status code: 0x{0:04x}
    UnknownCode(i32),
    /// Device not ready
    DeviceNotReady,
    /// Shutdown listener already registered
    AlreadyRegistered,
    /// No shutdown listener registered
    NotRegistered,
    /// Transport failure: {0}
    Transport(#[from] TransportError),
    /// Resource exhausted: {0}
    ResourceExhausted(String),
    /// Wrong device id 0x{found:02x}, expected 0x{expected:02x}
    IdentityMismatch {
        /// Id read from device.
        found: u8,
        /// Expected id.
        expected: u8,
    },
    /// Function not supported
    IllegalFunction,
    /// Illegal channel direction: {0}
    IllegalDirection(i32),
    /// Wrong value kind for status code 0x{0:04x}
    UserBuffer(i32),
    /// Missing required descriptor key {0}
    MissingKey(&'static str),
    /// Descriptor key {key} has invalid value {value}
    InvalidKey {
        /// Descriptor key.
        key: &'static str,
        /// Rejected value.
        value: u32,
    },
    /// Descriptor line {line}: {msg}
    Descriptor {
        /// Line number, starting at 1.
        line: usize,
        /// Problem description.
        msg: String,
    },
}

impl Error {
    /// Numeric error code as reported to the I/O framework.
    pub fn code(&self) -> i32 {
        match self {
            Self::ParameterRange(_) | Self::IllegalChannel(_) => ERR_LL_ILL_PARAM,
            Self::UnknownCode(_) => ERR_LL_UNK_CODE,
            Self::DeviceNotReady => ERR_LL_DEV_NOTRDY,
            Self::AlreadyRegistered => ERR_OSS_SIG_SET,
            Self::NotRegistered => ERR_OSS_SIG_CLR,
            Self::Transport(_) => ERR_LL_WRITE,
            Self::ResourceExhausted(_) => ERR_OSS_MEM_ALLOC,
            Self::IdentityMismatch { .. } => ERR_LL_ILL_ID,
            Self::IllegalFunction => ERR_LL_ILL_FUNC,
            Self::IllegalDirection(_) => ERR_LL_ILL_DIR,
            Self::UserBuffer(_) => ERR_LL_USERBUF,
            Self::MissingKey(_) | Self::InvalidKey { .. } | Self::Descriptor { .. } => ERR_DESC_KEY,
        }
    }
}

/// XC02 driver result.
pub type Result<T> = std::result::Result<T, Error>;
