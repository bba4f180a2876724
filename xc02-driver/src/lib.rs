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

//! XC02/SC21 board controller driver.
//!
//! The board controller sits on an SMBus and supervises a display carrier board.
//! It provides a watchdog, power sequencing with shutdown delays, display brightness control
//! and temperature/voltage protection.
//!
//! A device is opened from a [`Descriptor`] using a [`Platform`] and then controlled
//! through [`Xc02::set_stat`] and [`Xc02::get_stat`].

pub mod code;
pub mod config;
pub mod device;
mod dispatch;
pub mod error;
#[cfg(target_os = "linux")]
pub mod i2cdev;
pub mod info;
pub mod notify;
pub mod platform;
pub mod timer;
pub mod transport;

#[cfg(test)]
mod scenarios;

pub use code::{ListenerConfig, StatCode, StatValue};
pub use config::{ConfigSource, Descriptor, DriverConfig};
pub use device::{ident, IrqResult, Xc02};
pub use error::{Error, Result};
pub use notify::{CallbackSink, NotificationSink, NotifierState, ShutdownNotifier, SignalSink};
#[cfg(target_os = "linux")]
pub use platform::LinuxPlatform;
pub use platform::Platform;
pub use transport::{Bus, EmbeddedHalBus, Smbus, TransportError};
