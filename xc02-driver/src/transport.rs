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

//! Register transport.
//!
//! All bus transactions of a device go through a [`Bus`], which serializes them
//! with a single lock shared by the caller's thread and the shutdown poll.

use byteorder::{ByteOrder, LittleEndian};
use displaydoc::Display;
use parking_lot::{Mutex, MutexGuard};
use std::{fmt, sync::Arc};
use thiserror::Error;

use crate::error::Result;

/// Bus transport error.
#[derive(Display, Error, Debug)]
pub enum TransportError {
    /// I/O error: {0}
    Io(#[from] std::io::Error),
    /// System call failed: {0}
    Os(#[from] nix::errno::Errno),
    /// Bus error: {0}
    Bus(String),
}

/// SMBus byte data access.
pub trait Smbus: Send {
    /// Reads the register `cmd` of the device at `addr`.
    fn read_byte_data(&mut self, addr: u16, cmd: u8) -> std::result::Result<u8, TransportError>;

    /// Writes `value` into the register `cmd` of the device at `addr`.
    fn write_byte_data(&mut self, addr: u16, cmd: u8, value: u8) -> std::result::Result<(), TransportError>;
}

impl<T: Smbus + ?Sized> Smbus for Box<T> {
    fn read_byte_data(&mut self, addr: u16, cmd: u8) -> std::result::Result<u8, TransportError> {
        (**self).read_byte_data(addr, cmd)
    }

    fn write_byte_data(&mut self, addr: u16, cmd: u8, value: u8) -> std::result::Result<(), TransportError> {
        (**self).write_byte_data(addr, cmd, value)
    }
}

/// SMBus access through a blocking `embedded-hal` I2C bus.
pub struct EmbeddedHalBus<I2C>(pub I2C);

impl<I2C> EmbeddedHalBus<I2C> {
    fn addr(addr: u16) -> std::result::Result<u8, TransportError> {
        u8::try_from(addr).map_err(|_| TransportError::Bus(format!("address 0x{addr:x} out of range")))
    }
}

impl<I2C, E> Smbus for EmbeddedHalBus<I2C>
where
    I2C: embedded_hal::blocking::i2c::WriteRead<Error = E> + embedded_hal::blocking::i2c::Write<Error = E> + Send,
    E: fmt::Debug,
{
    fn read_byte_data(&mut self, addr: u16, cmd: u8) -> std::result::Result<u8, TransportError> {
        let mut buf = [0];
        self.0.write_read(Self::addr(addr)?, &[cmd], &mut buf).map_err(|err| TransportError::Bus(format!("{err:?}")))?;
        Ok(buf[0])
    }

    fn write_byte_data(&mut self, addr: u16, cmd: u8, value: u8) -> std::result::Result<(), TransportError> {
        self.0.write(Self::addr(addr)?, &[cmd, value]).map_err(|err| TransportError::Bus(format!("{err:?}")))
    }
}

/// Register access to one device on a shared SMBus.
#[derive(Clone)]
pub struct Bus {
    smbus: Arc<Mutex<Box<dyn Smbus>>>,
    addr: u16,
}

impl fmt::Debug for Bus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bus").field("addr", &format_args!("0x{:02x}", self.addr)).finish()
    }
}

impl Bus {
    /// Creates register access to the device at `addr`.
    pub fn new(smbus: Box<dyn Smbus>, addr: u16) -> Self {
        Self { smbus: Arc::new(Mutex::new(smbus)), addr }
    }

    /// Device address.
    pub fn addr(&self) -> u16 {
        self.addr
    }

    /// Acquires exclusive bus access.
    ///
    /// The lock is held until the returned guard is dropped.
    pub fn lock(&self) -> BusGuard<'_> {
        BusGuard { smbus: self.smbus.lock(), addr: self.addr }
    }
}

/// Exclusive access to the device registers.
pub struct BusGuard<'a> {
    smbus: MutexGuard<'a, Box<dyn Smbus>>,
    addr: u16,
}

impl BusGuard<'_> {
    /// Read register.
    pub fn read(&mut self, reg: u8) -> Result<u8> {
        let value = self.smbus.read_byte_data(self.addr, reg)?;
        log::debug!("read 0x{:02x}/0x{reg:02x} = 0x{value:02x}", self.addr);
        Ok(value)
    }

    /// Write register.
    pub fn write(&mut self, reg: u8, value: u8) -> Result<()> {
        log::debug!("write 0x{:02x}/0x{reg:02x} := 0x{value:02x}", self.addr);
        self.smbus.write_byte_data(self.addr, reg, value)?;
        Ok(())
    }

    /// Read 16-bit value split over two registers, low byte first.
    pub fn read_u16(&mut self, reg_lo: u8, reg_hi: u8) -> Result<u16> {
        let lo = self.read(reg_lo)?;
        let hi = self.read(reg_hi)?;
        Ok(LittleEndian::read_u16(&[lo, hi]))
    }

    /// Write 16-bit value split over two registers, low byte first.
    pub fn write_u16(&mut self, reg_lo: u8, reg_hi: u8, value: u16) -> Result<()> {
        let mut buf = [0; 2];
        LittleEndian::write_u16(&mut buf, value);
        self.write(reg_lo, buf[0])?;
        self.write(reg_hi, buf[1])
    }
}
