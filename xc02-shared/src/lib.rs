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

//! XC02/SC21 board controller definitions shared between driver and tooling.

#![cfg_attr(not(test), no_std)]

pub mod reg;

/// Expected content of the identification register.
pub const ID: u8 = 0xc2;

/// Value written to flag-style registers (trigger, acknowledge).
pub const FLAG: u8 = 0x01;

/// Magic value for the software off register.
pub const SWOFF_MAGIC: u8 = 0xa8;

/// Highest shutdown delay mode.
pub const DOWN_DELAY_MAX: u8 = 7;

/// Highest off delay mode.
pub const OFF_DELAY_MAX: u8 = 5;

/// Watchdog timeout resolution in milliseconds.
pub const WDOG_TICK_MS: u32 = 100;

/// Shortest watchdog timeout in ticks.
pub const WDOG_TOUT_MIN: u8 = 1;

/// Longest watchdog timeout in ticks.
pub const WDOG_TOUT_MAX: u8 = 255;

/// Lowest temperature limit in °C.
pub const TEMP_MIN_CELSIUS: i32 = -40;

/// Highest temperature limit in °C.
pub const TEMP_MAX_CELSIUS: i32 = 100;

/// ADC reference voltage in mV.
pub const ADC_REF_MV: u32 = 3000;

/// ADC full scale code.
pub const ADC_FULL_SCALE: u32 = 255;

/// Full scale backlight power of the SC21 in W.
pub const SC21_POWER_FULL_SCALE_W: u32 = 72;

/// Distance of the default temperature limits from the ADC range ends.
pub const TEMP_THRESHOLD: u8 = 3;

/// Distance of the default voltage limits from the ADC range ends.
pub const VOLT_THRESHOLD: u8 = 2;

/// Default lower temperature limit (ADC code).
pub const TEMP_ADC_MIN: u8 = 1 + TEMP_THRESHOLD;

/// Default upper temperature limit (ADC code).
pub const TEMP_ADC_MAX: u8 = u8::MAX - TEMP_THRESHOLD;

/// Default lower voltage limit (ADC code).
pub const VOLT_ADC_MIN: u8 = 1 + VOLT_THRESHOLD;

/// Default upper voltage limit (ADC code).
pub const VOLT_ADC_MAX: u8 = u8::MAX - VOLT_THRESHOLD;

/// Default brightness source (manual).
pub const DEFAULT_BRIGHT_SOURCE: u8 = 0;

/// Default initial display state (both displays on).
pub const DEFAULT_DISP_STAT: u8 = 3;

/// Default initial brightness.
pub const DEFAULT_BRIGHTNESS: u8 = 100;

/// Highest brightness value.
pub const BRIGHTNESS_MAX: u8 = 200;

/// Backlight current value reported by hardware without current measurement.
pub const BL_CURR_UNSUPPORTED: u8 = 0xff;

/// Converts a delay mode into minutes.
const fn delay_minutes(mode: u8, max: u8) -> Option<u32> {
    match mode {
        0 => Some(0),
        m if m <= max => Some(1 << (m - 1)),
        _ => None,
    }
}

/// Minutes of a shutdown delay mode, `None` if the mode is invalid.
pub const fn down_delay_minutes(mode: u8) -> Option<u32> {
    delay_minutes(mode, DOWN_DELAY_MAX)
}

/// Minutes of an off delay mode, `None` if the mode is invalid.
pub const fn off_delay_minutes(mode: u8) -> Option<u32> {
    delay_minutes(mode, OFF_DELAY_MAX)
}

/// Converts a temperature in °C into the ADC code of the temperature sensor.
///
/// Returns `None` if the temperature is outside the supported range.
pub const fn celsius_to_adc(celsius: i32) -> Option<u8> {
    if celsius < TEMP_MIN_CELSIUS || celsius > TEMP_MAX_CELSIUS {
        return None;
    }
    Some((((10 * celsius + 500) * ADC_FULL_SCALE as i32) / ADC_REF_MV as i32) as u8)
}

/// Converts an ADC code of the temperature sensor into °C.
///
/// The sensor delivers 10 mV/°C with an offset of 500 mV.
/// Rounds towards positive infinity so that converting a temperature
/// forth and back stays within 1 °C.
pub const fn adc_to_celsius(raw: u8) -> i32 {
    let n = ADC_REF_MV as i32 * raw as i32 - 500 * ADC_FULL_SCALE as i32;
    let d = 10 * ADC_FULL_SCALE as i32;
    if n >= 0 {
        (n + d - 1) / d
    } else {
        n / d
    }
}

/// Converts an ADC code into mV.
pub const fn adc_to_millivolts(raw: u8) -> u32 {
    ADC_REF_MV * raw as u32 / ADC_FULL_SCALE
}

/// Converts an SC21 backlight current ADC code into W.
pub const fn adc_to_watts(raw: u8) -> u32 {
    SC21_POWER_FULL_SCALE_W * raw as u32 / ADC_FULL_SCALE
}

/// Brightness in percent as perceived by the user.
pub const fn brightness_percent(raw: u8) -> u8 {
    100u8.saturating_sub(raw >> 1)
}
