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

//! Status codes and values for GetStat/SetStat.

use crate::error::{Error, Result};

/// Offset of device specific status codes.
pub const DEV_OF: i32 = 0x0200;
/// Offset of device specific block status codes.
pub const DEV_BLK_OF: i32 = 0x0300;
/// Offset of watchdog status codes.
pub const WDOG_OF: i32 = DEV_OF + 0x60;

/// Channel direction: input.
pub const CH_IN: i32 = 1;
/// Channel direction: output.
pub const CH_OUT: i32 = 2;
/// Channel direction: input and output.
pub const CH_INOUT: i32 = 3;

/// Channel type: unknown.
pub const CH_UNKNOWN: i32 = 0;

/// Number of channels of the device.
pub const CH_NUMBER: i32 = 4;

/// Channel width in bits.
pub const CH_LENGTH: i32 = 8;

macro_rules! stat_codes {
    ($($(#[$attr:meta])* $name:ident = $value:expr,)*) => {
        /// Status code selecting a GetStat/SetStat operation.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(i32)]
        pub enum StatCode {
            $($(#[$attr])* $name = $value,)*
        }

        impl StatCode {
            /// All known status codes.
            pub const ALL: &'static [StatCode] = &[$(StatCode::$name,)*];
        }
    };
}

stat_codes! {
    /// Debug level of the handle.
    DebugLevel = 0x0001,
    /// Number of channels.
    ChNumber = 0x0002,
    /// Channel direction.
    ChDirection = 0x0003,
    /// Channel width in bits.
    ChLength = 0x0004,
    /// Channel type.
    ChType = 0x0005,
    /// Whether the device id is checked on open.
    IdCheck = 0x0006,

    /// Wake-on-time in minutes (0..65535).
    Wot = DEV_OF + 0x01,
    /// Watchdog error register.
    WdogErr = DEV_OF + 0x02,
    /// Software off request.
    Swoff = DEV_OF + 0x03,
    /// Off acknowledge.
    Offack = DEV_OF + 0x04,
    /// Shutdown delay mode (0..7).
    DownDelay = DEV_OF + 0x05,
    /// Off delay mode (0..5).
    OffDelay = DEV_OF + 0x06,
    /// Shutdown event and protection status bits.
    DownEvt = DEV_OF + 0x07,
    /// Clears the shutdown listener.
    DownSigClr = DEV_OF + 0x08,
    /// Digital inputs.
    In = DEV_OF + 0x09,
    /// Current temperature in °C.
    Temp = DEV_OF + 0x0a,
    /// Upper temperature limit in °C.
    TempHigh = DEV_OF + 0x0b,
    /// Lower temperature limit in °C.
    TempLow = DEV_OF + 0x0c,
    /// Brightness of first display (0..200).
    Brightness = DEV_OF + 0x0d,
    /// Brightness source (0=manual, 1=automatic).
    BrSrc = DEV_OF + 0x0e,
    /// Display on/off bitmask.
    SwDisp = DEV_OF + 0x0f,
    /// Initial display state bitmask.
    DispInitStat = DEV_OF + 0x10,
    /// Firmware build timestamp, one character per read.
    Timestamp = DEV_OF + 0x11,
    /// Input voltage in mV.
    Voltage = DEV_OF + 0x12,
    /// Lower voltage limit in mV.
    VoltLow = DEV_OF + 0x13,
    /// Upper voltage limit in mV.
    VoltHigh = DEV_OF + 0x14,
    /// Test register 1.
    Test1 = DEV_OF + 0x15,
    /// Test register 2.
    Test2 = DEV_OF + 0x16,
    /// Test register 3.
    Test3 = DEV_OF + 0x17,
    /// Test register 4.
    Test4 = DEV_OF + 0x18,
    /// Initial brightness of the display selected by the channel (0 or 1).
    InitBright = DEV_OF + 0x19,
    /// Brightness of second display (0..200).
    Brightness2 = DEV_OF + 0x1a,
    /// Minicard power.
    MinicardPwr = DEV_OF + 0x1b,
    /// Automatic brightness offset (0..254).
    BrOffs = DEV_OF + 0x1c,
    /// Automatic brightness multiplier (0..100).
    BrMult = DEV_OF + 0x1d,
    /// Backlight power in W, 0xff if unsupported.
    BlCurrent = DEV_OF + 0x1e,
    /// Automatic brightness direction (0/1).
    BrightDirection = DEV_OF + 0x1f,
    /// Raw photo sensor value.
    RawBrightness = DEV_OF + 0x20,
    /// KEY_IN startup control (0/1).
    KeyInCtrl = DEV_OF + 0x21,
    /// Automatic brightness control (0/1).
    AutoBrightCtrl = DEV_OF + 0x22,

    /// Starts the watchdog.
    WdogStart = WDOG_OF,
    /// Stops the watchdog.
    WdogStop = WDOG_OF + 0x01,
    /// Triggers the watchdog.
    WdogTrig = WDOG_OF + 0x02,
    /// Watchdog timeout in ms (100..25500).
    WdogTime = WDOG_OF + 0x03,
    /// Watchdog state register.
    WdogStatus = WDOG_OF + 0x04,
    /// Whether the watchdog has expired.
    WdogShot = WDOG_OF + 0x05,

    /// Registers the shutdown listener.
    DownSigSet = DEV_BLK_OF,
}

impl TryFrom<i32> for StatCode {
    type Error = Error;

    fn try_from(code: i32) -> Result<Self> {
        Self::ALL.iter().copied().find(|c| *c as i32 == code).ok_or(Error::UnknownCode(code))
    }
}

impl From<StatCode> for i32 {
    fn from(code: StatCode) -> Self {
        code as i32
    }
}

/// Shutdown listener registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerConfig {
    /// Poll period in ms.
    pub period_ms: u32,
    /// Listener identity, i.e. the signal number.
    pub signal: u32,
}

/// Value passed to SetStat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatValue {
    /// Plain value.
    Scalar(i32),
    /// Block value.
    Block(ListenerConfig),
}

impl From<i32> for StatValue {
    fn from(value: i32) -> Self {
        Self::Scalar(value)
    }
}

impl From<ListenerConfig> for StatValue {
    fn from(config: ListenerConfig) -> Self {
        Self::Block(config)
    }
}
