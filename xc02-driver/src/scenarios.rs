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

//! End-to-end scenarios on a simulated board controller.

use std::time::Duration;
use xc02_shared::{self as shared, reg};

use crate::{
    code::{ListenerConfig, StatCode, StatValue, CH_INOUT, CH_IN},
    config::{key, Descriptor},
    device::{IrqResult, Xc02},
    error::Error,
    mock::{minimal_descriptor, Access, MockPlatform},
    notify::NotifierState,
};

fn open(platform: &MockPlatform) -> Xc02 {
    let dev = Xc02::open(&minimal_descriptor(), platform).unwrap();
    platform.regs.clear_log();
    dev
}

#[test]
fn open_and_close_release_everything() {
    let platform = MockPlatform::new();
    let dev = Xc02::open(&minimal_descriptor(), &platform).unwrap();
    assert_eq!(dev.revision(), Some(0x12));
    assert_eq!(platform.regs.log(), [Access::Read(reg::ID), Access::Read(reg::REV)]);
    assert_eq!(platform.alarms.live(), 1);

    dev.close();
    platform.assert_released();
}

#[test]
fn missing_bus_address_fails_without_leak() {
    let platform = MockPlatform::new();
    let desc = Descriptor::new().with(key::SMB_BUSNBR, 0);
    assert!(matches!(Xc02::open(&desc, &platform), Err(Error::MissingKey(key::SMB_DEVADDR))));
    assert!(platform.regs.log().is_empty());
    platform.assert_released();
}

#[test]
fn only_present_keys_are_written() {
    let platform = MockPlatform::new();
    let desc = minimal_descriptor().with(key::TEMP_HIGH, 100);
    let dev = Xc02::open(&desc, &platform).unwrap();
    assert_eq!(platform.regs.writes(), [(reg::TEMP_HIGH, 100)]);
    drop(dev);
    platform.assert_released();
}

#[test]
fn configured_values_written_in_order() {
    let platform = MockPlatform::new();
    let desc = minimal_descriptor()
        .with(key::INIT_BRIGHT_2, 30)
        .with(key::INIT_BRIGHT_1, 10)
        .with(key::VOLT_LOW, 5)
        .with(key::DOWN_DELAY, 3)
        .with(key::WDOG_TOUT, 50);
    let _dev = Xc02::open(&desc, &platform).unwrap();
    assert_eq!(
        platform.regs.writes(),
        [(reg::WDOG_TOUT, 50), (reg::DOWN_DELAY, 3), (reg::VOLT_LOW, 5), (reg::INIT_BR1, 10), (reg::INIT_BR2, 30)]
    );
}

#[test]
fn identity_mismatch_is_fatal() {
    let platform = MockPlatform::new();
    platform.regs.set(reg::ID, 0x42);
    match Xc02::open(&minimal_descriptor(), &platform) {
        Err(Error::IdentityMismatch { found: 0x42, expected }) => assert_eq!(expected, shared::ID),
        other => panic!("unexpected {other:?}"),
    }
    platform.assert_released();
}

#[test]
fn identity_check_can_be_skipped() {
    let platform = MockPlatform::new();
    platform.regs.set(reg::ID, 0x42);
    let desc = minimal_descriptor().with(key::ID_CHECK, 0);
    let dev = Xc02::open(&desc, &platform).unwrap();
    assert_eq!(dev.get(StatCode::IdCheck).unwrap(), 0);
    assert_eq!(platform.regs.log(), [Access::Read(reg::REV)]);
}

#[test]
fn unreadable_revision_is_not_fatal() {
    let platform = MockPlatform::new();
    platform.regs.fail_read(reg::REV);
    let dev = Xc02::open(&minimal_descriptor(), &platform).unwrap();
    assert_eq!(dev.revision(), None);
}

#[test]
fn unreadable_id_is_fatal() {
    let platform = MockPlatform::new();
    platform.regs.fail_read(reg::ID);
    assert!(matches!(Xc02::open(&minimal_descriptor(), &platform), Err(Error::Transport(_))));
    platform.assert_released();
}

#[test]
fn failing_alarm_creation() {
    let platform = MockPlatform::new();
    platform.alarms.fail_create();
    assert!(matches!(Xc02::open(&minimal_descriptor(), &platform), Err(Error::ResourceExhausted(_))));
    platform.assert_released();
}

#[test]
fn failing_smbus() {
    let mut platform = MockPlatform::new();
    platform.fail_smbus = true;
    assert!(matches!(Xc02::open(&minimal_descriptor(), &platform), Err(Error::Transport(_))));
    platform.assert_released();
}

#[test]
fn failing_startup_write_tears_down() {
    let platform = MockPlatform::new();
    platform.regs.fail_write(reg::OFF_DELAY);
    let desc = minimal_descriptor().with(key::DOWN_DELAY, 2).with(key::OFF_DELAY, 2).with(key::BRIGHT_SOURCE, 1);
    assert!(matches!(Xc02::open(&desc, &platform), Err(Error::Transport(_))));
    assert_eq!(platform.regs.log(), [
        Access::Read(reg::ID),
        Access::Read(reg::REV),
        Access::Write(reg::DOWN_DELAY, 2),
        Access::Write(reg::OFF_DELAY, 2)
    ]);
    platform.assert_released();
}

#[test]
fn invalid_optional_key_is_fatal() {
    let platform = MockPlatform::new();
    let desc = minimal_descriptor().with(key::OFF_DELAY, 6);
    assert!(matches!(Xc02::open(&desc, &platform), Err(Error::InvalidKey { key: key::OFF_DELAY, value: 6 })));
    platform.assert_released();
}

#[test]
fn brightness_round_trip() {
    let platform = MockPlatform::new();
    let mut dev = open(&platform);
    dev.set(StatCode::Brightness, 25).unwrap();
    assert_eq!(dev.get(StatCode::Brightness).unwrap(), 25);
    assert_eq!(platform.regs.log(), [Access::Write(reg::SET_BR, 25), Access::Read(reg::SET_BR)]);
}

#[test]
fn perceived_brightness_per_display() {
    let platform = MockPlatform::new();
    let mut dev = open(&platform);
    dev.set(StatCode::Brightness, 0).unwrap();
    dev.set(StatCode::Brightness2, 50).unwrap();
    assert_eq!(dev.brightness_percent(0).unwrap(), 100);
    assert_eq!(dev.brightness_percent(1).unwrap(), 75);

    platform.regs.clear_log();
    assert!(matches!(dev.brightness_percent(2), Err(Error::IllegalChannel(2))));
    assert!(platform.regs.log().is_empty());
}

#[test]
fn brightness_out_of_range_touches_nothing() {
    let platform = MockPlatform::new();
    let mut dev = open(&platform);
    for value in [-1, 201, 1000, i32::MIN, i32::MAX] {
        assert!(matches!(dev.set(StatCode::Brightness, value), Err(Error::ParameterRange(_))));
    }
    assert!(platform.regs.log().is_empty());
}

#[test]
fn wake_on_time_low_byte_first() {
    let platform = MockPlatform::new();
    let mut dev = open(&platform);
    dev.set(StatCode::Wot, 65000).unwrap();
    assert_eq!(dev.get(StatCode::Wot).unwrap(), 65000);
    assert_eq!(platform.regs.log(), [
        Access::Write(reg::WOT_L, 0xe8),
        Access::Write(reg::WOT_H, 0xfd),
        Access::Read(reg::WOT_L),
        Access::Read(reg::WOT_H),
    ]);
}

#[test]
fn wake_on_time_read_aborts_on_first_failure() {
    let platform = MockPlatform::new();
    let dev = open(&platform);
    platform.regs.fail_read(reg::WOT_L);
    assert!(matches!(dev.get(StatCode::Wot), Err(Error::Transport(_))));
    assert_eq!(platform.regs.log(), [Access::Read(reg::WOT_L)]);
}

#[test]
fn watchdog_trigger_requires_start() {
    let platform = MockPlatform::new();
    let mut dev = open(&platform);

    assert!(matches!(dev.set(StatCode::WdogTrig, 0), Err(Error::DeviceNotReady)));
    assert!(platform.regs.log().is_empty());

    dev.set(StatCode::WdogStart, 0).unwrap();
    assert!(dev.watchdog_enabled());
    assert_eq!(dev.get(StatCode::WdogStatus).unwrap(), 1);
    dev.set(StatCode::WdogTrig, 0).unwrap();

    dev.set(StatCode::WdogStop, 0).unwrap();
    assert!(matches!(dev.set(StatCode::WdogTrig, 0), Err(Error::DeviceNotReady)));
    assert_eq!(dev.get(StatCode::WdogStatus).unwrap(), 0);

    assert_eq!(platform.regs.writes(), [(reg::WDOG_STATE, 1), (reg::WDOG_TRIG, shared::FLAG), (reg::WDOG_STATE, 0)]);
    assert_eq!(platform.regs.log().iter().filter(|a| **a == Access::Read(reg::WDOG_STATE)).count(), 2);
}

#[test]
fn watchdog_status_reads_register() {
    let platform = MockPlatform::new();
    let mut dev = open(&platform);

    // Started by firmware or an earlier handle.
    platform.regs.set(reg::WDOG_STATE, 1);
    assert_eq!(dev.get(StatCode::WdogStatus).unwrap(), 1);
    assert_eq!(platform.regs.log(), [Access::Read(reg::WDOG_STATE)]);
    assert!(!dev.watchdog_enabled());
    assert!(matches!(dev.set(StatCode::WdogTrig, 0), Err(Error::DeviceNotReady)));

    platform.regs.set(reg::WDOG_STATE, 0);
    assert_eq!(dev.get(StatCode::WdogStatus).unwrap(), 0);
}

#[test]
fn watchdog_state_unchanged_on_failed_write() {
    let platform = MockPlatform::new();
    let mut dev = open(&platform);
    platform.regs.fail_write(reg::WDOG_STATE);
    assert!(matches!(dev.set(StatCode::WdogStart, 0), Err(Error::Transport(_))));
    assert!(!dev.watchdog_enabled());
    assert!(matches!(dev.set(StatCode::WdogTrig, 0), Err(Error::DeviceNotReady)));
}

#[test]
fn watchdog_time_and_shot() {
    let platform = MockPlatform::new();
    let mut dev = open(&platform);
    dev.set(StatCode::WdogTime, 2000).unwrap();
    assert_eq!(platform.regs.get(reg::WDOG_TOUT), 20);
    assert_eq!(dev.get(StatCode::WdogTime).unwrap(), 2000);

    assert_eq!(dev.get(StatCode::WdogShot).unwrap(), 0);
    platform.regs.set(reg::WDOG_ERR, 3);
    assert_eq!(dev.get(StatCode::WdogShot).unwrap(), 1);
    assert_eq!(dev.get(StatCode::WdogErr).unwrap(), 3);
}

#[test]
fn temperature_limits_in_celsius() {
    let platform = MockPlatform::new();
    let mut dev = open(&platform);
    for celsius in [-40, -10, 0, 25, 60, 100] {
        dev.set(StatCode::TempHigh, celsius).unwrap();
        let back = dev.get(StatCode::TempHigh).unwrap();
        assert!((back - celsius).abs() <= 1, "{celsius} -> {back}");
    }
    dev.set(StatCode::TempLow, -10).unwrap();
    assert_eq!(platform.regs.get(reg::TEMP_LOW), 34);
    assert!(matches!(dev.set(StatCode::TempLow, -41), Err(Error::ParameterRange(-41))));
}

#[test]
fn measurements_in_engineering_units() {
    let platform = MockPlatform::new();
    let dev = open(&platform);
    platform.regs.set(reg::TEMP, 93);
    platform.regs.set(reg::VOLT, 170);
    platform.regs.set(reg::VOLT_HIGH, shared::VOLT_ADC_MAX);
    platform.regs.set(reg::BL_CURR, 255 / 2);
    assert_eq!(dev.get(StatCode::Temp).unwrap(), 60);
    assert_eq!(dev.get(StatCode::Voltage).unwrap(), 2000);
    assert_eq!(dev.get(StatCode::VoltHigh).unwrap(), 2976);
    assert_eq!(dev.get(StatCode::BlCurrent).unwrap(), 35);

    platform.regs.set(reg::BL_CURR, shared::BL_CURR_UNSUPPORTED);
    assert_eq!(dev.get(StatCode::BlCurrent).unwrap(), 0xff);
}

#[test]
fn status_and_bit_masks() {
    let platform = MockPlatform::new();
    let mut dev = open(&platform);
    platform.regs.set(reg::STATUS, 0xff);
    assert_eq!(dev.get(StatCode::DownEvt).unwrap(), 3);

    platform.regs.set(reg::KEY_CTRL, 0xfe);
    assert_eq!(dev.get(StatCode::KeyInCtrl).unwrap(), 0);

    dev.set(StatCode::BrightDirection, 1).unwrap();
    assert_eq!(dev.get(StatCode::AutoBrightCtrl).unwrap(), 1);
    assert!(matches!(dev.set(StatCode::AutoBrightCtrl, 2), Err(Error::ParameterRange(2))));
}

#[test]
fn initial_brightness_per_channel() {
    let platform = MockPlatform::new();
    let mut dev = open(&platform);
    dev.set_stat(StatCode::InitBright.into(), 0, StatValue::Scalar(40)).unwrap();
    dev.set_stat(StatCode::InitBright.into(), 1, StatValue::Scalar(80)).unwrap();
    assert_eq!(dev.get_stat(StatCode::InitBright.into(), 0).unwrap(), 40);
    assert_eq!(dev.get_stat(StatCode::InitBright.into(), 1).unwrap(), 80);

    platform.regs.clear_log();
    assert!(matches!(dev.set_stat(StatCode::InitBright.into(), 2, StatValue::Scalar(10)), Err(Error::IllegalChannel(2))));
    assert!(matches!(dev.get_stat(StatCode::InitBright.into(), 2), Err(Error::IllegalChannel(2))));
    assert!(platform.regs.log().is_empty());
}

#[test]
fn shutdown_signals_and_offack() {
    let platform = MockPlatform::new();
    let mut dev = open(&platform);
    dev.set(StatCode::Swoff, i32::from(shared::SWOFF_MAGIC)).unwrap();
    dev.set(StatCode::Offack, 0).unwrap();
    dev.set(StatCode::DownDelay, 7).unwrap();
    dev.set(StatCode::OffDelay, 5).unwrap();
    assert!(matches!(dev.set(StatCode::OffDelay, 6), Err(Error::ParameterRange(6))));
    assert_eq!(
        platform.regs.writes(),
        [(reg::SWOFF, 0xa8), (reg::OFFACK, shared::FLAG), (reg::DOWN_DELAY, 7), (reg::OFF_DELAY, 5)]
    );
    assert_eq!(shared::down_delay_minutes(dev.get(StatCode::DownDelay).unwrap() as u8), Some(64));
}

#[test]
fn framework_codes_without_bus_access() {
    let platform = MockPlatform::new();
    let mut dev = open(&platform);
    assert_eq!(dev.get(StatCode::ChNumber).unwrap(), 4);
    assert_eq!(dev.get(StatCode::ChDirection).unwrap(), CH_INOUT);
    assert_eq!(dev.get(StatCode::ChLength).unwrap(), 8);
    assert_eq!(dev.get(StatCode::ChType).unwrap(), 0);
    assert_eq!(dev.get(StatCode::IdCheck).unwrap(), 1);

    dev.set(StatCode::DebugLevel, 0x42).unwrap();
    assert_eq!(dev.get(StatCode::DebugLevel).unwrap(), 0x42);
    dev.set(StatCode::ChDirection, CH_INOUT).unwrap();
    assert!(matches!(dev.set(StatCode::ChDirection, CH_IN), Err(Error::IllegalDirection(CH_IN))));
    assert!(platform.regs.log().is_empty());
}

#[test]
fn unknown_codes_and_wrong_values() {
    let platform = MockPlatform::new();
    let mut dev = open(&platform);
    assert!(matches!(dev.set_stat(0x7777, 0, StatValue::Scalar(0)), Err(Error::UnknownCode(0x7777))));
    assert!(matches!(dev.get_stat(0x7777, 0), Err(Error::UnknownCode(0x7777))));
    assert!(matches!(dev.get(StatCode::Swoff), Err(Error::UnknownCode(_))));
    assert!(matches!(dev.set(StatCode::Temp, 20), Err(Error::UnknownCode(_))));
    assert!(matches!(dev.set(StatCode::DownSigSet, 10), Err(Error::UserBuffer(_))));
    assert!(matches!(
        dev.set(StatCode::Brightness, ListenerConfig { period_ms: 100, signal: 10 }),
        Err(Error::UserBuffer(_))
    ));
    assert!(platform.regs.log().is_empty());
}

#[test]
fn unsupported_entry_points() {
    let platform = MockPlatform::new();
    let mut dev = open(&platform);
    assert!(matches!(dev.read(0), Err(Error::IllegalFunction)));
    assert!(matches!(dev.write(0, 1), Err(Error::IllegalFunction)));
    assert!(matches!(dev.block_read(0, &mut [0; 4]), Err(Error::IllegalFunction)));
    assert!(matches!(dev.block_write(0, &[0; 4]), Err(Error::IllegalFunction)));
    assert_eq!(dev.irq(), IrqResult::NotMine);
    assert!(crate::ident().starts_with("XC02"));
}

#[test]
fn firmware_build_string() {
    let platform = MockPlatform::new();
    let dev = open(&platform);
    platform.regs.queue(reg::TIMESTAMP, b"Jan 10 2012 12:00");
    platform.regs.set(reg::TIMESTAMP, 0xff);
    assert_eq!(dev.firmware_build_string().unwrap(), "Jan 10 2012 12:00");

    platform.regs.set(reg::TIMESTAMP, b'x');
    assert_eq!(dev.firmware_build_string().unwrap().len(), crate::device::FIRMWARE_BUILD_MAX);
}

#[test]
fn shutdown_listener_through_stat_codes() {
    let platform = MockPlatform::new();
    let mut dev = open(&platform);
    let config = ListenerConfig { period_ms: 100, signal: 10 };

    assert!(matches!(dev.set(StatCode::DownSigClr, 0), Err(Error::NotRegistered)));
    dev.set(StatCode::DownSigSet, config).unwrap();
    assert_eq!(dev.notifier_state(), NotifierState::Armed);
    assert!(matches!(dev.set(StatCode::DownSigSet, config), Err(Error::AlreadyRegistered)));
    assert_eq!(platform.alarms.period(), Some(Duration::from_millis(100)));

    dev.set(StatCode::DownSigClr, 0).unwrap();
    assert_eq!(dev.notifier_state(), NotifierState::Idle);
    assert_eq!(platform.sink.live(), 0);
}

#[test]
fn shutdown_event_delivered_at_first_poll_after_it_occurs() {
    let platform = MockPlatform::new();
    let mut dev = open(&platform);
    dev.set(StatCode::DownSigSet, ListenerConfig { period_ms: 100, signal: 10 }).unwrap();

    let mut deliveries = Vec::new();
    for t in (100..=500).step_by(100) {
        if t >= 250 {
            platform.regs.set(reg::STATUS, reg::STATUS_DOWN_EVT);
        }
        assert!(platform.alarms.fire());
        deliveries.push((t, platform.sink.delivered().len()));
    }

    assert_eq!(deliveries, [(100, 0), (200, 0), (300, 1), (400, 2), (500, 3)]);
}

#[test]
fn close_with_registered_listener() {
    let platform = MockPlatform::new();
    let mut dev = open(&platform);
    dev.set(StatCode::DownSigSet, ListenerConfig { period_ms: 50, signal: 10 }).unwrap();
    assert_eq!(platform.sink.live(), 1);
    dev.close();
    assert!(!platform.alarms.fire());
    platform.assert_released();
}

#[test]
fn polls_never_split_wake_on_time() {
    let mut platform = MockPlatform::new();
    platform.thread_alarms = true;
    let mut dev = open(&platform);
    platform.regs.set_delay(Duration::from_micros(200));
    dev.set(StatCode::DownSigSet, ListenerConfig { period_ms: 1, signal: 10 }).unwrap();

    for i in 0..100 {
        let wot = 1000 + i * 257;
        dev.set(StatCode::Wot, wot).unwrap();
        assert_eq!(dev.get(StatCode::Wot).unwrap(), wot);
    }
    dev.set(StatCode::DownSigClr, 0).unwrap();

    let log = platform.regs.log();
    assert!(log.contains(&Access::Read(reg::STATUS)), "shutdown poll never ran");
    for (i, access) in log.iter().enumerate() {
        match access {
            Access::Read(reg::WOT_L) => {
                assert_eq!(log.get(i + 1), Some(&Access::Read(reg::WOT_H)), "read split at {i}: {log:?}")
            }
            Access::Write(reg::WOT_L, _) => {
                assert!(matches!(log.get(i + 1), Some(Access::Write(reg::WOT_H, _))), "write split at {i}: {log:?}")
            }
            _ => (),
        }
    }
}
