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

//! Device descriptor and driver configuration.

use std::{collections::BTreeMap, ops::RangeInclusive, str::FromStr};
use xc02_shared::{self as shared, reg};

use crate::error::{Error, Result};

/// Descriptor keys.
pub mod key {
    /// Debug level of the driver.
    pub const DEBUG_LEVEL: &str = "DEBUG_LEVEL";
    /// Check device id on open.
    pub const ID_CHECK: &str = "ID_CHECK";
    /// SMBus number.
    pub const SMB_BUSNBR: &str = "SMB_BUSNBR";
    /// Device address on the SMBus.
    pub const SMB_DEVADDR: &str = "SMB_DEVADDR";
    /// Watchdog timeout in 100 ms ticks.
    pub const WDOG_TOUT: &str = "WDOG_TOUT";
    /// Shutdown delay mode.
    pub const DOWN_DELAY: &str = "DOWN_DELAY";
    /// Off delay mode.
    pub const OFF_DELAY: &str = "OFF_DELAY";
    /// Brightness source.
    pub const BRIGHT_SOURCE: &str = "BRIGHT_SOURCE";
    /// Upper temperature limit (ADC code).
    pub const TEMP_HIGH: &str = "TEMP_HIGH";
    /// Lower temperature limit (ADC code).
    pub const TEMP_LOW: &str = "TEMP_LOW";
    /// Upper voltage limit (ADC code).
    pub const VOLT_HIGH: &str = "VOLT_HIGH";
    /// Lower voltage limit (ADC code).
    pub const VOLT_LOW: &str = "VOLT_LOW";
    /// Initial display state.
    pub const INIT_DISPSTAT: &str = "INIT_DISPSTAT";
    /// Initial brightness of first display.
    pub const INIT_BRIGHT_1: &str = "INIT_BRIGHT_1";
    /// Initial brightness of second display.
    pub const INIT_BRIGHT_2: &str = "INIT_BRIGHT_2";
}

/// Source of named integer configuration values.
pub trait ConfigSource {
    /// Gets the value of `key`, `None` if not present.
    fn get_u32(&self, key: &str) -> Result<Option<u32>>;
}

impl<T: ConfigSource + ?Sized> ConfigSource for &T {
    fn get_u32(&self, key: &str) -> Result<Option<u32>> {
        (**self).get_u32(key)
    }
}

/// Device descriptor.
///
/// Text form, one entry per line:
///
/// ```text
/// # XC02 on SMBus 0
/// XC02_1 {
///     SMB_BUSNBR  = U_INT32 0
///     SMB_DEVADDR = U_INT32 0x9a
///     HW_TYPE     = STRING XC02
/// }
/// ```
///
/// Non-integer entries are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Descriptor {
    values: BTreeMap<String, u32>,
}

impl Descriptor {
    /// Creates an empty descriptor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`.
    pub fn set(&mut self, key: &str, value: u32) {
        self.values.insert(key.to_ascii_uppercase(), value);
    }

    /// Returns the descriptor with `key` set to `value`.
    pub fn with(mut self, key: &str, value: u32) -> Self {
        self.set(key, value);
        self
    }
}

fn parse_u32(s: &str) -> Option<u32> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => s.parse().ok(),
    }
}

impl FromStr for Descriptor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut desc = Self::new();

        for (n, line) in s.lines().enumerate() {
            let line = line.split('#').next().unwrap_or_default().trim();
            if line.is_empty() || line == "}" || line.ends_with('{') {
                continue;
            }

            let Some((name, value)) = line.split_once('=') else {
                return Err(Error::Descriptor { line: n + 1, msg: format!("expected KEY = VALUE, got {line:?}") });
            };
            let name = name.trim();
            let mut value = value.split_whitespace();
            let value = match (value.next(), value.next()) {
                (Some("U_INT32"), Some(v)) | (Some(v), None) => v,
                (Some(_), _) => continue,
                (None, _) => return Err(Error::Descriptor { line: n + 1, msg: format!("missing value for {name}") }),
            };
            let Some(value) = parse_u32(value) else {
                return Err(Error::Descriptor { line: n + 1, msg: format!("invalid value {value:?} for {name}") });
            };

            desc.set(name, value);
        }

        Ok(desc)
    }
}

impl ConfigSource for Descriptor {
    fn get_u32(&self, key: &str) -> Result<Option<u32>> {
        Ok(self.values.get(&key.to_ascii_uppercase()).copied())
    }
}

/// Configuration value with presence information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Setting<T> {
    /// Configured or default value.
    pub value: T,
    /// Whether the value was present in the configuration.
    pub present: bool,
}

impl<T> Setting<T> {
    /// Value only if present in the configuration.
    pub fn configured(&self) -> Option<&T> {
        self.present.then_some(&self.value)
    }
}

/// Register write performed during device initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartupWrite {
    /// Descriptor key the value came from.
    pub key: &'static str,
    /// Target register.
    pub reg: u8,
    /// Value.
    pub value: u8,
}

/// Driver configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    /// Debug level.
    pub debug_level: u32,
    /// Check device id on open.
    pub id_check: bool,
    /// SMBus number.
    pub bus_nbr: u32,
    /// Device address.
    pub dev_addr: u16,
    /// Watchdog timeout in 100 ms ticks.
    pub wdog_tout: Setting<u8>,
    /// Shutdown delay mode.
    pub down_delay: Setting<u8>,
    /// Off delay mode.
    pub off_delay: Setting<u8>,
    /// Brightness source.
    pub bright_source: Setting<u8>,
    /// Upper temperature limit (ADC code).
    pub temp_high: Setting<u8>,
    /// Lower temperature limit (ADC code).
    pub temp_low: Setting<u8>,
    /// Upper voltage limit (ADC code).
    pub volt_high: Setting<u8>,
    /// Lower voltage limit (ADC code).
    pub volt_low: Setting<u8>,
    /// Initial display state.
    pub init_dispstat: Setting<u8>,
    /// Initial brightness of first display.
    pub init_bright_1: Setting<u8>,
    /// Initial brightness of second display.
    pub init_bright_2: Setting<u8>,
}

fn required(src: &dyn ConfigSource, key: &'static str) -> Result<u32> {
    src.get_u32(key)?.ok_or(Error::MissingKey(key))
}

fn optional(src: &dyn ConfigSource, key: &'static str, default: u8, range: RangeInclusive<u8>) -> Result<Setting<u8>> {
    match src.get_u32(key)? {
        Some(value) => match u8::try_from(value) {
            Ok(v) if range.contains(&v) => Ok(Setting { value: v, present: true }),
            _ => Err(Error::InvalidKey { key, value }),
        },
        None => Ok(Setting { value: default, present: false }),
    }
}

impl DriverConfig {
    /// Loads and validates the configuration.
    pub fn load(src: &dyn ConfigSource) -> Result<Self> {
        let debug_level = src.get_u32(key::DEBUG_LEVEL)?.unwrap_or_default();
        let id_check = src.get_u32(key::ID_CHECK)?.map(|v| v != 0).unwrap_or(true);

        let bus_nbr = required(src, key::SMB_BUSNBR)?;
        let dev_addr = required(src, key::SMB_DEVADDR)?;
        let dev_addr = u16::try_from(dev_addr).map_err(|_| Error::InvalidKey { key: key::SMB_DEVADDR, value: dev_addr })?;

        Ok(Self {
            debug_level,
            id_check,
            bus_nbr,
            dev_addr,
            wdog_tout: optional(
                src,
                key::WDOG_TOUT,
                shared::WDOG_TOUT_MAX,
                shared::WDOG_TOUT_MIN..=shared::WDOG_TOUT_MAX,
            )?,
            down_delay: optional(src, key::DOWN_DELAY, 0, 0..=shared::DOWN_DELAY_MAX)?,
            off_delay: optional(src, key::OFF_DELAY, 0, 0..=shared::OFF_DELAY_MAX)?,
            bright_source: optional(src, key::BRIGHT_SOURCE, shared::DEFAULT_BRIGHT_SOURCE, 0..=1)?,
            temp_high: optional(src, key::TEMP_HIGH, shared::TEMP_ADC_MAX, 0..=u8::MAX)?,
            temp_low: optional(src, key::TEMP_LOW, shared::TEMP_ADC_MIN, 0..=u8::MAX)?,
            volt_high: optional(src, key::VOLT_HIGH, shared::VOLT_ADC_MAX, 0..=u8::MAX)?,
            volt_low: optional(src, key::VOLT_LOW, shared::VOLT_ADC_MIN, 0..=u8::MAX)?,
            init_dispstat: optional(src, key::INIT_DISPSTAT, shared::DEFAULT_DISP_STAT, 0..=3)?,
            init_bright_1: optional(src, key::INIT_BRIGHT_1, shared::DEFAULT_BRIGHTNESS, 0..=shared::BRIGHTNESS_MAX)?,
            init_bright_2: optional(src, key::INIT_BRIGHT_2, shared::DEFAULT_BRIGHTNESS, 0..=shared::BRIGHTNESS_MAX)?,
        })
    }

    /// Register writes for all values present in the configuration, in initialization order.
    pub fn startup_writes(&self) -> Vec<StartupWrite> {
        [
            (key::WDOG_TOUT, reg::WDOG_TOUT, &self.wdog_tout),
            (key::DOWN_DELAY, reg::DOWN_DELAY, &self.down_delay),
            (key::OFF_DELAY, reg::OFF_DELAY, &self.off_delay),
            (key::BRIGHT_SOURCE, reg::BR_SRC, &self.bright_source),
            (key::TEMP_HIGH, reg::TEMP_HIGH, &self.temp_high),
            (key::TEMP_LOW, reg::TEMP_LOW, &self.temp_low),
            (key::VOLT_HIGH, reg::VOLT_HIGH, &self.volt_high),
            (key::VOLT_LOW, reg::VOLT_LOW, &self.volt_low),
            (key::INIT_DISPSTAT, reg::INIT_DS, &self.init_dispstat),
            (key::INIT_BRIGHT_1, reg::INIT_BR1, &self.init_bright_1),
            (key::INIT_BRIGHT_2, reg::INIT_BR2, &self.init_bright_2),
        ]
        .into_iter()
        .filter_map(|(key, reg, setting)| setting.configured().map(|&value| StartupWrite { key, reg, value }))
        .collect()
    }
}
