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

//! GetStat/SetStat dispatch.
//!
//! Every operation is validated completely before the first bus transaction.

use std::ops::RangeInclusive;
use xc02_shared::{self as shared, reg};

use crate::{
    code::{StatCode, StatValue, CH_INOUT, CH_LENGTH, CH_NUMBER, CH_UNKNOWN},
    device::Xc02,
    error::{Error, Result},
    transport::BusGuard,
};

/// Register access of a SetStat call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SetAccess {
    Byte(u8, u8),
    Word(u8, u8, u16),
}

/// Register access of a GetStat call.
#[derive(Clone, Copy)]
enum GetAccess {
    Local(i32),
    Byte(u8, fn(u8) -> i32),
    Word(u8, u8),
}

fn checked(value: i32, range: RangeInclusive<i32>) -> Result<i32> {
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(Error::ParameterRange(value.into()))
    }
}

fn checked_u8(value: i32, range: RangeInclusive<u8>) -> Result<u8> {
    let range = i32::from(*range.start())..=i32::from(*range.end());
    Ok(checked(value, range)? as u8)
}

fn init_bright_reg(ch: i32) -> Result<u8> {
    match ch {
        0 => Ok(reg::INIT_BR1),
        1 => Ok(reg::INIT_BR2),
        other => Err(Error::IllegalChannel(other)),
    }
}

/// Validates a SetStat value and determines the register write.
fn set_access(code: StatCode, ch: i32, value: i32) -> Result<SetAccess> {
    use SetAccess::*;

    let access = match code {
        StatCode::Wot => Word(reg::WOT_L, reg::WOT_H, checked(value, 0..=0xffff)? as u16),
        StatCode::Swoff => Byte(reg::SWOFF, checked_u8(value, 0..=u8::MAX)?),
        StatCode::Offack => Byte(reg::OFFACK, shared::FLAG),
        StatCode::DownDelay => Byte(reg::DOWN_DELAY, checked_u8(value, 0..=shared::DOWN_DELAY_MAX)?),
        StatCode::OffDelay => Byte(reg::OFF_DELAY, checked_u8(value, 0..=shared::OFF_DELAY_MAX)?),
        StatCode::TempHigh | StatCode::TempLow => {
            let raw = shared::celsius_to_adc(value).ok_or(Error::ParameterRange(value.into()))?;
            Byte(if code == StatCode::TempHigh { reg::TEMP_HIGH } else { reg::TEMP_LOW }, raw)
        }
        StatCode::BrSrc => Byte(reg::BR_SRC, checked_u8(value, 0..=1)?),
        StatCode::BrMult => Byte(reg::AUTO_BR_FAK, checked_u8(value, 0..=100)?),
        StatCode::BrOffs => Byte(reg::AUTO_BR_OFFS, checked_u8(value, 0..=254)?),
        StatCode::SwDisp => Byte(reg::SW_DISP, checked_u8(value, 0..=3)?),
        StatCode::DispInitStat => Byte(reg::INIT_DS, checked_u8(value, 0..=3)?),
        StatCode::BrightDirection | StatCode::AutoBrightCtrl => Byte(reg::BR_DIR, checked_u8(value, 0..=1)?),
        StatCode::KeyInCtrl => Byte(reg::KEY_CTRL, checked_u8(value, 0..=1)?),
        StatCode::WdogStart => Byte(reg::WDOG_STATE, 1),
        StatCode::WdogStop => Byte(reg::WDOG_STATE, 0),
        StatCode::WdogTrig => Byte(reg::WDOG_TRIG, shared::FLAG),
        StatCode::WdogTime => {
            let ticks = value / shared::WDOG_TICK_MS as i32;
            if !(i32::from(shared::WDOG_TOUT_MIN)..=i32::from(shared::WDOG_TOUT_MAX)).contains(&ticks) {
                return Err(Error::ParameterRange(value.into()));
            }
            Byte(reg::WDOG_TOUT, ticks as u8)
        }
        StatCode::Test1 => Byte(reg::TEST1, checked_u8(value, 0..=u8::MAX)?),
        StatCode::Test2 => Byte(reg::TEST2, checked_u8(value, 0..=u8::MAX)?),
        StatCode::Brightness => Byte(reg::SET_BR, checked_u8(value, 0..=shared::BRIGHTNESS_MAX)?),
        StatCode::Brightness2 => Byte(reg::SET_BR_2, checked_u8(value, 0..=shared::BRIGHTNESS_MAX)?),
        StatCode::InitBright => {
            let reg = init_bright_reg(ch)?;
            Byte(reg, checked_u8(value, 0..=shared::BRIGHTNESS_MAX)?)
        }
        StatCode::MinicardPwr => Byte(reg::SW_MINICARD, checked_u8(value, 0..=u8::MAX)?),
        _ => return Err(Error::UnknownCode(code.into())),
    };
    Ok(access)
}

fn raw(v: u8) -> i32 {
    v.into()
}

fn bit0(v: u8) -> i32 {
    (v & 0x01).into()
}

fn celsius(v: u8) -> i32 {
    shared::adc_to_celsius(v)
}

fn millivolts(v: u8) -> i32 {
    shared::adc_to_millivolts(v) as i32
}

fn watts(v: u8) -> i32 {
    match v {
        shared::BL_CURR_UNSUPPORTED => v.into(),
        _ => shared::adc_to_watts(v) as i32,
    }
}

/// Determines the register read of a GetStat call.
fn get_access(dev: &Xc02, code: StatCode, ch: i32) -> Result<GetAccess> {
    use GetAccess::*;

    let access = match code {
        StatCode::DebugLevel => Local(dev.debug_level as i32),
        StatCode::ChNumber => Local(CH_NUMBER),
        StatCode::ChDirection => Local(CH_INOUT),
        StatCode::ChLength => Local(CH_LENGTH),
        StatCode::ChType => Local(CH_UNKNOWN),
        StatCode::IdCheck => Local(dev.config.id_check.into()),

        StatCode::Wot => Word(reg::WOT_L, reg::WOT_H),
        StatCode::WdogErr => Byte(reg::WDOG_ERR, raw),
        StatCode::DownDelay => Byte(reg::DOWN_DELAY, raw),
        StatCode::OffDelay => Byte(reg::OFF_DELAY, raw),
        StatCode::DownEvt => Byte(reg::STATUS, |v| (v & (reg::STATUS_DOWN_EVT | reg::STATUS_PROTECT)).into()),
        StatCode::In => Byte(reg::IN, raw),
        StatCode::Timestamp => Byte(reg::TIMESTAMP, raw),
        StatCode::Temp => Byte(reg::TEMP, celsius),
        StatCode::TempHigh => Byte(reg::TEMP_HIGH, celsius),
        StatCode::TempLow => Byte(reg::TEMP_LOW, celsius),
        StatCode::Voltage => Byte(reg::VOLT, millivolts),
        StatCode::VoltHigh => Byte(reg::VOLT_HIGH, millivolts),
        StatCode::VoltLow => Byte(reg::VOLT_LOW, millivolts),
        StatCode::DispInitStat => Byte(reg::INIT_DS, raw),
        StatCode::InitBright => Byte(init_bright_reg(ch)?, raw),
        StatCode::BrSrc => Byte(reg::BR_SRC, raw),
        StatCode::BrMult => Byte(reg::AUTO_BR_FAK, raw),
        StatCode::BrOffs => Byte(reg::AUTO_BR_OFFS, raw),
        StatCode::SwDisp => Byte(reg::SW_DISP, raw),
        StatCode::WdogStatus => Byte(reg::WDOG_STATE, raw),
        StatCode::WdogTime => Byte(reg::WDOG_TOUT, |v| i32::from(v) * shared::WDOG_TICK_MS as i32),
        StatCode::WdogShot => Byte(reg::WDOG_ERR, |v| (v != 0).into()),
        StatCode::Brightness => Byte(reg::SET_BR, raw),
        StatCode::Brightness2 => Byte(reg::SET_BR_2, raw),
        StatCode::MinicardPwr => Byte(reg::SW_MINICARD, raw),
        StatCode::KeyInCtrl => Byte(reg::KEY_CTRL, bit0),
        StatCode::BlCurrent => Byte(reg::BL_CURR, watts),
        StatCode::AutoBrightCtrl | StatCode::BrightDirection => Byte(reg::BR_DIR, bit0),
        StatCode::RawBrightness => Byte(reg::BR_RAW, raw),
        StatCode::Test1 => Byte(reg::TEST1, raw),
        StatCode::Test2 => Byte(reg::TEST2, raw),
        StatCode::Test3 => Byte(reg::TEST3, raw),
        StatCode::Test4 => Byte(reg::TEST4, raw),
        _ => return Err(Error::UnknownCode(code.into())),
    };
    Ok(access)
}

fn execute_set(bus: &mut BusGuard, access: SetAccess) -> Result<()> {
    match access {
        SetAccess::Byte(reg, value) => bus.write(reg, value),
        SetAccess::Word(lo, hi, value) => bus.write_u16(lo, hi, value),
    }
}

impl Xc02 {
    /// Sets the status `code` on channel `ch`.
    pub fn set_stat(&mut self, code: i32, ch: i32, value: StatValue) -> Result<()> {
        let code = StatCode::try_from(code)?;
        log::debug!("set_stat {code:?} ch={ch} value={value:?}");

        let value = match (code, value) {
            (StatCode::DownSigSet, StatValue::Block(config)) => {
                self.notifier.register(config)?;
                return Ok(());
            }
            (_, StatValue::Block(_)) | (StatCode::DownSigSet, _) => return Err(Error::UserBuffer(code.into())),
            (_, StatValue::Scalar(value)) => value,
        };

        match code {
            StatCode::DownSigClr => return self.notifier.clear(),
            StatCode::DebugLevel => {
                self.debug_level = value as u32;
                return Ok(());
            }
            StatCode::ChDirection if value != CH_INOUT => return Err(Error::IllegalDirection(value)),
            StatCode::ChDirection => return Ok(()),
            StatCode::WdogTrig if !self.watchdog => return Err(Error::DeviceNotReady),
            _ => (),
        }

        let access = set_access(code, ch, value)?;
        execute_set(&mut self.bus.lock(), access)?;

        match code {
            StatCode::WdogStart => {
                log::info!("watchdog started");
                self.watchdog = true;
            }
            StatCode::WdogStop => {
                log::info!("watchdog stopped");
                self.watchdog = false;
            }
            _ => (),
        }
        Ok(())
    }

    /// Gets the status `code` of channel `ch`.
    pub fn get_stat(&self, code: i32, ch: i32) -> Result<i32> {
        let code = StatCode::try_from(code)?;

        let value = match get_access(self, code, ch)? {
            GetAccess::Local(value) => value,
            GetAccess::Byte(reg, convert) => convert(self.bus.lock().read(reg)?),
            GetAccess::Word(lo, hi) => self.bus.lock().read_u16(lo, hi)?.into(),
        };

        log::debug!("get_stat {code:?} ch={ch} = {value}");
        Ok(value)
    }

    /// Sets a scalar status value on channel 0.
    pub fn set(&mut self, code: StatCode, value: impl Into<StatValue>) -> Result<()> {
        self.set_stat(code.into(), 0, value.into())
    }

    /// Gets a status value of channel 0.
    pub fn get(&self, code: StatCode) -> Result<i32> {
        self.get_stat(code.into(), 0)
    }
}
