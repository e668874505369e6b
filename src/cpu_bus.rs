//! The bus interface the 65816 core executes through.
//!
//! Every access can fail with an unmapped-address error. The multi-byte
//! helpers come in two wrap disciplines: `bank_wrap` keeps the bank byte and
//! wraps the 16-bit offset, `addr_wrap` wraps over 24 bits and may carry into
//! the bank.

use crate::bus::{BusError, ADDRESS_MASK};

#[inline]
fn join(bank: u8, offset: u16) -> u32 {
    ((bank as u32) << 16) | offset as u32
}

pub trait CpuBus {
    fn read_u8(&mut self, addr: u32) -> Result<u8, BusError>;
    fn write_u8(&mut self, addr: u32, value: u8) -> Result<(), BusError>;

    /// Side-effect free read for tracing; `None` when unmapped.
    fn peek_u8(&mut self, addr: u32) -> Option<u8> {
        self.read_u8(addr).ok()
    }

    fn read_u16_bank_wrap(&mut self, bank: u8, offset: u16) -> Result<u16, BusError> {
        let lo = self.read_u8(join(bank, offset))? as u16;
        let hi = self.read_u8(join(bank, offset.wrapping_add(1)))? as u16;
        Ok((hi << 8) | lo)
    }

    fn read_u24_bank_wrap(&mut self, bank: u8, offset: u16) -> Result<u32, BusError> {
        let word = self.read_u16_bank_wrap(bank, offset)? as u32;
        let hi = self.read_u8(join(bank, offset.wrapping_add(2)))? as u32;
        Ok((hi << 16) | word)
    }

    fn write_u16_bank_wrap(&mut self, bank: u8, offset: u16, value: u16) -> Result<(), BusError> {
        self.write_u8(join(bank, offset), value as u8)?;
        self.write_u8(join(bank, offset.wrapping_add(1)), (value >> 8) as u8)
    }

    fn read_u16_addr_wrap(&mut self, addr: u32) -> Result<u16, BusError> {
        let lo = self.read_u8(addr & ADDRESS_MASK)? as u16;
        let hi = self.read_u8(addr.wrapping_add(1) & ADDRESS_MASK)? as u16;
        Ok((hi << 8) | lo)
    }

    fn write_u16_addr_wrap(&mut self, addr: u32, value: u16) -> Result<(), BusError> {
        self.write_u8(addr & ADDRESS_MASK, value as u8)?;
        self.write_u8(addr.wrapping_add(1) & ADDRESS_MASK, (value >> 8) as u8)
    }
}
