//! Stateless translation between bus addresses and flat image addresses.
//!
//! Image space follows the flash-cart convention: ROM from `0x000000`,
//! battery or BW-RAM from `0xE00000`, work RAM from `0xF50000`.

use std::fmt;

mod lorom;
mod sa1rom;

pub use lorom::LoRom;
pub use sa1rom::Sa1Rom;


pub const IMAGE_SRAM: u32 = 0xE0_0000;
pub const IMAGE_WRAM: u32 = 0xF5_0000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingError {
    Unmapped(u32),
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingError::Unmapped(addr) => write!(f, "unmapped address {:06X}", addr),
        }
    }
}

impl std::error::Error for MappingError {}

pub trait Mapping {
    fn name(&self) -> &'static str;

    fn bus_to_image(&self, bus_addr: u32) -> Result<u32, MappingError>;

    fn image_to_bus(&self, image_addr: u32) -> Result<u32, MappingError>;
}

/// WRAM mirror in the low 8 KiB of the system banks.
#[inline]
pub(crate) fn low_wram(offset: u32) -> u32 {
    IMAGE_WRAM | offset
}

/// Image WRAM back to banks $7E-$7F. Image banks past $F6 hold copies of
/// memory the bus cannot reach, so they fold onto WRAM.
#[inline]
pub(crate) fn wram_to_bus(image_addr: u32) -> u32 {
    ((image_addr - IMAGE_WRAM) & 0x01_FFFF) + 0x7E_0000
}
