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

//! Linux i2c-dev SMBus access.

use std::{
    fs::{File, OpenOptions},
    os::fd::AsRawFd,
    path::PathBuf,
};

use crate::transport::{Smbus, TransportError};

const I2C_SMBUS_READ: u8 = 1;
const I2C_SMBUS_WRITE: u8 = 0;
const I2C_SMBUS_BYTE_DATA: u32 = 2;
const I2C_SMBUS_BLOCK_MAX: usize = 32;

#[allow(dead_code)]
#[repr(C)]
union I2cSmbusData {
    byte: u8,
    word: u16,
    block: [u8; I2C_SMBUS_BLOCK_MAX + 2],
}

#[repr(C)]
struct I2cSmbusIoctlData {
    read_write: u8,
    command: u8,
    size: u32,
    data: *mut I2cSmbusData,
}

// I2C_SLAVE
nix::ioctl_write_int_bad!(i2c_slave, 0x0703);
// I2C_SMBUS
nix::ioctl_write_ptr_bad!(i2c_smbus, 0x0720, I2cSmbusIoctlData);

/// SMBus adapter `/dev/i2c-N`.
#[derive(Debug)]
pub struct I2cDev {
    file: File,
    path: PathBuf,
    slave: Option<u16>,
}

impl I2cDev {
    /// Opens the SMBus adapter with number `bus_nbr`.
    pub fn open(bus_nbr: u32) -> Result<Self, TransportError> {
        let path = PathBuf::from(format!("/dev/i2c-{bus_nbr}"));
        log::debug!("opening {}", path.display());
        let file = OpenOptions::new().read(true).write(true).open(&path)?;
        Ok(Self { file, path, slave: None })
    }

    fn select(&mut self, addr: u16) -> Result<(), TransportError> {
        if self.slave != Some(addr) {
            unsafe { i2c_slave(self.file.as_raw_fd(), addr as libc::c_int) }?;
            self.slave = Some(addr);
        }
        Ok(())
    }

    fn transfer(&mut self, read_write: u8, command: u8, data: &mut I2cSmbusData) -> Result<(), TransportError> {
        let args = I2cSmbusIoctlData { read_write, command, size: I2C_SMBUS_BYTE_DATA, data: data as *mut _ };
        unsafe { i2c_smbus(self.file.as_raw_fd(), &args) }.map_err(|err| {
            log::debug!("SMBus transfer on {} failed: {err}", self.path.display());
            TransportError::Os(err)
        })?;
        Ok(())
    }
}

impl Smbus for I2cDev {
    fn read_byte_data(&mut self, addr: u16, cmd: u8) -> Result<u8, TransportError> {
        self.select(addr)?;
        let mut data = I2cSmbusData { block: [0; I2C_SMBUS_BLOCK_MAX + 2] };
        self.transfer(I2C_SMBUS_READ, cmd, &mut data)?;
        Ok(unsafe { data.byte })
    }

    fn write_byte_data(&mut self, addr: u16, cmd: u8, value: u8) -> Result<(), TransportError> {
        self.select(addr)?;
        let mut data = I2cSmbusData { byte: value };
        self.transfer(I2C_SMBUS_WRITE, cmd, &mut data)
    }
}
