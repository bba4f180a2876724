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

//! Register definitions.
//!
//! All registers are single bytes accessed by SMBus byte-data transactions.

/// Wake-on-time, low byte.
/// Minutes after shutdown until the controller powers the system on again.
pub const WOT_L: u8 = 0x00;
/// Wake-on-time, high byte.
pub const WOT_H: u8 = 0x01;
/// Power-on acknowledge.
pub const ONACK: u8 = 0x02;
/// Power-on acknowledge timeout.
pub const ONACK_TOUT: u8 = 0x03;
/// Power-on acknowledge error.
pub const ONACK_ERR: u8 = 0x04;
/// Watchdog state.
/// u8 with 1=on, 0=off.
pub const WDOG_STATE: u8 = 0x05;
/// Watchdog trigger.
pub const WDOG_TRIG: u8 = 0x06;
/// Watchdog timeout in units of 100 ms.
pub const WDOG_TOUT: u8 = 0x07;
/// Watchdog error.
/// Non-zero if the watchdog has expired since the last power-on.
pub const WDOG_ERR: u8 = 0x08;
/// Software off request.
pub const SWOFF: u8 = 0x09;
/// Off acknowledge.
pub const OFFACK: u8 = 0x0a;
/// Shutdown delay mode.
pub const DOWN_DELAY: u8 = 0x0b;
/// Off delay mode.
pub const OFF_DELAY: u8 = 0x0c;
/// Status.
/// See [`STATUS_DOWN_EVT`] and [`STATUS_PROTECT`].
pub const STATUS: u8 = 0x0d;
/// Digital inputs.
pub const IN: u8 = 0x0e;
/// Current temperature (ADC code).
pub const TEMP: u8 = 0x12;
/// Upper temperature limit (ADC code).
pub const TEMP_HIGH: u8 = 0x13;
/// Input voltage (ADC code).
pub const VOLT: u8 = 0x14;
/// Display brightness.
pub const SET_BR: u8 = 0x17;
/// Lower temperature limit (ADC code).
pub const TEMP_LOW: u8 = 0x18;
/// Brightness source.
/// u8 with 0=manual, 1=automatic.
pub const BR_SRC: u8 = 0x19;
/// Display on/off bitmask.
pub const SW_DISP: u8 = 0x20;
/// Upper voltage limit (ADC code).
pub const VOLT_HIGH: u8 = 0x21;
/// Lower voltage limit (ADC code).
pub const VOLT_LOW: u8 = 0x22;
/// Initial display state bitmask.
pub const INIT_DS: u8 = 0x25;
/// Firmware build timestamp.
/// Each read returns the next character, 0xff terminates.
pub const TIMESTAMP: u8 = 0x2a;
/// Minicard power.
pub const SW_MINICARD: u8 = 0x2b;
/// Brightness of second display.
pub const SET_BR_2: u8 = 0x2c;
/// Initial brightness of first display.
pub const INIT_BR1: u8 = 0x2d;
/// Initial brightness of second display.
pub const INIT_BR2: u8 = 0x2e;
/// Automatic brightness multiplier.
pub const AUTO_BR_FAK: u8 = 0x30;
/// Automatic brightness offset.
pub const AUTO_BR_OFFS: u8 = 0x31;
/// Backlight current (ADC code, SC21 only).
pub const BL_CURR: u8 = 0x32;
/// Automatic brightness direction.
pub const BR_DIR: u8 = 0x33;
/// Raw photo sensor value.
pub const BR_RAW: u8 = 0x34;
/// User LED.
pub const USER_LED: u8 = 0x35;
/// KEY_IN startup control.
pub const KEY_CTRL: u8 = 0x36;
/// Test register 1.
pub const TEST1: u8 = 0x77;
/// Test register 2.
pub const TEST2: u8 = 0x78;
/// Test register 3.
pub const TEST3: u8 = 0x79;
/// Test register 4.
pub const TEST4: u8 = 0x7a;
/// Device identification.
/// Reads [`ID`](crate::ID).
pub const ID: u8 = 0xfe;
/// Firmware revision.
pub const REV: u8 = 0xff;

/// Status bit: shutdown event pending.
pub const STATUS_DOWN_EVT: u8 = 0x01;
/// Status bit: protection shutdown active.
pub const STATUS_PROTECT: u8 = 0x02;
