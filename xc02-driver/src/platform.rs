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

//! Platform services used by the driver.

use std::sync::Arc;

use crate::{
    error::Result,
    notify::{NotificationSink, SignalSink},
    timer::{Alarm, ThreadAlarm},
    transport::Smbus,
};

/// Platform the driver runs on.
pub trait Platform {
    /// Opens the SMBus adapter `bus_nbr`.
    fn smbus(&self, bus_nbr: u32) -> Result<Box<dyn Smbus>>;

    /// Creates an unarmed alarm.
    fn create_alarm(&self, name: &str) -> Result<Box<dyn Alarm>> {
        Ok(Box::new(ThreadAlarm::new(name)))
    }

    /// Sink for shutdown notifications.
    fn sink(&self) -> Arc<dyn NotificationSink> {
        Arc::new(SignalSink)
    }
}

/// Linux platform using i2c-dev, timer threads and signals.
#[cfg(target_os = "linux")]
#[derive(Debug, Default, Clone, Copy)]
pub struct LinuxPlatform;

#[cfg(target_os = "linux")]
impl Platform for LinuxPlatform {
    fn smbus(&self, bus_nbr: u32) -> Result<Box<dyn Smbus>> {
        Ok(Box::new(crate::i2cdev::I2cDev::open(bus_nbr)?))
    }
}
