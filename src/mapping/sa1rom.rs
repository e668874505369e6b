use super::{low_wram, wram_to_bus, Mapping, MappingError, IMAGE_SRAM, IMAGE_WRAM};

/// SA-1 cartridge layout.
///
/// The SA-1 can bank-switch its ROM at run time; this translator assumes
/// the power-on arrangement, where the four 1 MiB blocks sit linearly at
/// banks $00-$1F, $20-$3F, $80-$9F and $A0-$BF (and $C0-$FF as HiROM).
/// The BW-RAM image at $6000-$7FFF and $44-$4F only ever shows block 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sa1Rom;

impl Sa1Rom {
    fn system_bank(bus_addr: u32, rom_bank: u32, offset: u32) -> Result<u32, MappingError> {
        match offset {
            0x8000..=0xFFFF => Ok((rom_bank << 15) | (offset & 0x7FFF)),
            0x6000..=0x7FFF => Ok(IMAGE_SRAM | (offset - 0x6000)),
            0x0000..=0x1FFF => Ok(low_wram(offset)),
            // I-RAM and SA-1 registers
            _ => Err(MappingError::Unmapped(bus_addr)),
        }
    }
}

impl Mapping for Sa1Rom {
    fn name(&self) -> &'static str {
        "sa1rom"
    }

    fn bus_to_image(&self, bus_addr: u32) -> Result<u32, MappingError> {
        let bank = (bus_addr >> 16) & 0xFF;
        let offset = bus_addr & 0xFFFF;

        match bank {
            0xC0..=0xFF => Ok(((bank - 0xC0) << 16) | offset),
            0x80..=0xBF => Self::system_bank(bus_addr, bank - 0x80 + 0x40, offset),
            0x7E..=0x7F => Ok((bus_addr & 0xFF_FFFF) - 0x7E_0000 + IMAGE_WRAM),
            0x50..=0x7D => Err(MappingError::Unmapped(bus_addr)),
            0x44..=0x4F => Ok(IMAGE_SRAM | ((bus_addr - 0x44_0000) & 0x1FFF)),
            0x40..=0x43 => Ok(((bank - 0x40 + 0xE0) << 16) | offset),
            _ => Self::system_bank(bus_addr, bank, offset),
        }
    }

    fn image_to_bus(&self, image_addr: u32) -> Result<u32, MappingError> {
        if image_addr >= IMAGE_WRAM {
            return Ok(wram_to_bus(image_addr));
        }
        if (IMAGE_SRAM..0xF0_0000).contains(&image_addr) {
            // Only four banks of BW-RAM are visible; higher banks mirror.
            let abs = image_addr - IMAGE_SRAM;
            let bank = (abs >> 16) & 0x03;
            return Ok(((0x40 + bank) << 16) | (abs & 0xFFFF));
        }
        if image_addr < IMAGE_SRAM {
            let abs = image_addr & 0x3F_FFFF;
            let bank = abs >> 15;
            let offset = abs & 0x7FFF;
            return Ok(if bank >= 0x40 {
                ((0x80 + (bank - 0x40)) << 16) | (0x8000 + offset)
            } else {
                (bank << 16) | (0x8000 + offset)
            });
        }
        Err(MappingError::Unmapped(image_addr))
    }
}
