use super::{low_wram, wram_to_bus, Mapping, MappingError, IMAGE_SRAM, IMAGE_WRAM};

/// Mode 20 layout: 32 KiB of ROM in the upper half of every bank, SRAM in
/// the lower half of banks $70-$7D.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoRom;

// Eight 32 KiB SRAM banks are addressable from image space.
const SRAM_MASK: u32 = 0x03_FFFF;

impl Mapping for LoRom {
    fn name(&self) -> &'static str {
        "lorom"
    }

    fn bus_to_image(&self, bus_addr: u32) -> Result<u32, MappingError> {
        let bank = (bus_addr >> 16) & 0xFF;
        let offset = bus_addr & 0xFFFF;

        if bank == 0x7E || bank == 0x7F {
            return Ok((bus_addr & 0xFF_FFFF) - 0x7E_0000 + IMAGE_WRAM);
        }
        if offset >= 0x8000 {
            return Ok(((bank & 0x7F) << 15) | (offset & 0x7FFF));
        }
        match bank & 0x7F {
            0x70..=0x7D => Ok(IMAGE_SRAM | (((bank & 0x7F) - 0x70) << 15) | offset),
            0x00..=0x3F if offset < 0x2000 => Ok(low_wram(offset)),
            _ => Err(MappingError::Unmapped(bus_addr)),
        }
    }

    fn image_to_bus(&self, image_addr: u32) -> Result<u32, MappingError> {
        if image_addr >= IMAGE_WRAM {
            return Ok(wram_to_bus(image_addr));
        }
        if (IMAGE_SRAM..0xF0_0000).contains(&image_addr) {
            let abs = (image_addr - IMAGE_SRAM) & SRAM_MASK;
            return Ok(((0x70 + (abs >> 15)) << 16) | (abs & 0x7FFF));
        }
        if image_addr < 0x40_0000 {
            let bank = image_addr >> 15;
            // Banks $7E-$7F are WRAM; reach the top of ROM through the
            // FastROM mirror instead.
            let bus_bank = if bank >= 0x7E { bank | 0x80 } else { bank };
            return Ok((bus_bank << 16) | 0x8000 | (image_addr & 0x7FFF));
        }
        Err(MappingError::Unmapped(image_addr))
    }
}
