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

//! XC02 device handle.

use std::fmt;
use xc02_shared::{self as shared, reg};

use crate::{
    config::{ConfigSource, DriverConfig},
    error::{Error, Result},
    notify::{NotifierState, ShutdownNotifier},
    platform::Platform,
    transport::Bus,
};

/// Maximum length of the firmware build string.
pub const FIRMWARE_BUILD_MAX: usize = 64;

/// Result of interrupt handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrqResult {
    /// Interrupt was caused by this device.
    Mine,
    /// Interrupt was not caused by this device.
    NotMine,
}

/// Driver identification.
pub fn ident() -> &'static str {
    concat!("XC02 - XC02/SC21 board controller driver ", env!("CARGO_PKG_VERSION"))
}

/// Opened XC02 board controller.
pub struct Xc02 {
    pub(crate) bus: Bus,
    pub(crate) notifier: ShutdownNotifier,
    pub(crate) config: DriverConfig,
    pub(crate) debug_level: u32,
    pub(crate) watchdog: bool,
    revision: Option<u8>,
    closed: bool,
}

impl fmt::Debug for Xc02 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Xc02")
            .field("bus", &self.bus)
            .field("watchdog", &self.watchdog)
            .field("notifier", &self.notifier)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

impl Xc02 {
    /// Opens the board controller described by `desc`.
    ///
    /// Registers are only written for descriptor keys that are present.
    /// All resources acquired so far are released if opening fails.
    pub fn open(desc: &dyn ConfigSource, platform: &dyn Platform) -> Result<Self> {
        let config = DriverConfig::load(desc).inspect_err(|err| log::error!("invalid descriptor: {err}"))?;
        log::debug!("descriptor: {config:?}");

        let bus = Bus::new(platform.smbus(config.bus_nbr)?, config.dev_addr);
        let revision = Self::verify(&bus, config.id_check)?;

        let alarm = platform.create_alarm(&format!("xc02-{}-{:02x}", config.bus_nbr, config.dev_addr))?;
        let notifier = ShutdownNotifier::new(bus.clone(), alarm, platform.sink());

        let mut this = Self {
            bus,
            notifier,
            debug_level: config.debug_level,
            config,
            watchdog: false,
            revision,
            closed: false,
        };

        if let Err(err) = this.push_config() {
            log::error!("initialization of XC02 at 0x{:02x} failed: {err}", this.bus.addr());
            this.teardown();
            return Err(err);
        }

        log::info!("XC02 at SMBus {} address 0x{:02x} initialized", this.config.bus_nbr, this.config.dev_addr);
        Ok(this)
    }

    /// Checks the device id and reads the firmware revision.
    fn verify(bus: &Bus, id_check: bool) -> Result<Option<u8>> {
        let mut bus = bus.lock();

        if id_check {
            log::debug!("read XC02 id");
            let id = bus.read(reg::ID).inspect_err(|err| log::error!("cannot read XC02 id: {err}"))?;
            if id != shared::ID {
                log::error!("wrong XC02 id 0x{id:02x}");
                return Err(Error::IdentityMismatch { found: id, expected: shared::ID });
            }
        }

        match bus.read(reg::REV) {
            Ok(rev) => {
                log::info!("XC02 firmware revision 0x{rev:02x}");
                Ok(Some(rev))
            }
            Err(err) => {
                log::warn!("cannot read XC02 firmware revision: {err}");
                Ok(None)
            }
        }
    }

    /// Writes all configured values to the device.
    fn push_config(&mut self) -> Result<()> {
        let mut bus = self.bus.lock();
        for write in self.config.startup_writes() {
            log::debug!("{} = {}", write.key, write.value);
            bus.write(write.reg, write.value)?;
        }
        Ok(())
    }

    /// Stops polling and releases the shutdown listener.
    fn teardown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.notifier.shutdown();
        log::debug!("XC02 at 0x{:02x} released", self.bus.addr());
    }

    /// Closes the device.
    pub fn close(mut self) {
        self.teardown();
        log::info!("XC02 at 0x{:02x} closed", self.bus.addr());
    }

    /// Loaded configuration.
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Firmware revision, if it could be read.
    pub fn revision(&self) -> Option<u8> {
        self.revision
    }

    /// Whether the watchdog has been started through this handle.
    pub fn watchdog_enabled(&self) -> bool {
        self.watchdog
    }

    /// State of the shutdown notifier.
    pub fn notifier_state(&self) -> NotifierState {
        self.notifier.state()
    }

    /// Brightness of display `ch` (0 or 1) in percent as perceived by the user.
    pub fn brightness_percent(&self, ch: i32) -> Result<u8> {
        let reg = match ch {
            0 => reg::SET_BR,
            1 => reg::SET_BR_2,
            other => return Err(Error::IllegalChannel(other)),
        };
        let raw = self.bus.lock().read(reg)?;
        Ok(shared::brightness_percent(raw))
    }

    /// Reads the firmware build string.
    ///
    /// The timestamp register delivers one character per read and 0xff at the end.
    pub fn firmware_build_string(&self) -> Result<String> {
        let mut bus = self.bus.lock();
        let mut build = String::new();
        while build.len() < FIRMWARE_BUILD_MAX {
            match bus.read(reg::TIMESTAMP)? {
                0xff => break,
                c => build.push(char::from(c)),
            }
        }
        Ok(build)
    }

    /// Reading a channel is not supported.
    pub fn read(&self, _ch: i32) -> Result<i32> {
        Err(Error::IllegalFunction)
    }

    /// Writing a channel is not supported.
    pub fn write(&mut self, _ch: i32, _value: i32) -> Result<()> {
        Err(Error::IllegalFunction)
    }

    /// Block reading is not supported.
    pub fn block_read(&self, _ch: i32, _buf: &mut [u8]) -> Result<usize> {
        Err(Error::IllegalFunction)
    }

    /// Block writing is not supported.
    pub fn block_write(&mut self, _ch: i32, _buf: &[u8]) -> Result<usize> {
        Err(Error::IllegalFunction)
    }

    /// The device raises no interrupts.
    pub fn irq(&self) -> IrqResult {
        IrqResult::NotMine
    }
}

impl Drop for Xc02 {
    fn drop(&mut self) {
        self.teardown();
    }
}
