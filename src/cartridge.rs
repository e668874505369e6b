//! Cartridge header decoding.
//!
//! The header is an 80-byte window ending at the vector table: `$FFB0` in
//! bank 0 of the bus, `0x7FB0` (LoROM) or `0xFFB0` (HiROM) in the image.

use std::fmt;

pub const HEADER_LEN: usize = 0x50;
pub const LOROM_HEADER: usize = 0x7FB0;
pub const HIROM_HEADER: usize = 0xFFB0;

const TITLE_LEN: usize = 21;
// Old maker code meaning the expanded fields at the start are valid.
const EXPANDED_MAKER: u8 = 0x33;
// Headers scoring at or below this are treated as absent.
const MIN_SCORE: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderError {
    TooShort { len: usize },
    Missing,
}

impl fmt::Display for HeaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderError::TooShort { len } => write!(
                f,
                "header needs {} bytes, got {}",
                HEADER_LEN, len
            ),
            HeaderError::Missing => write!(f, "no plausible header at 0x7FB0 or 0xFFB0"),
        }
    }
}

impl std::error::Error for HeaderError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NativeVectors {
    pub unused1: [u8; 4],
    pub cop: u16,
    pub brk: u16,
    pub abort: u16,
    pub nmi: u16,
    pub unused2: u16,
    pub irq: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EmulationVectors {
    pub unused1: [u8; 4],
    pub cop: u16,
    pub unused2: u16,
    pub abort: u16,
    pub nmi: u16,
    pub reset: u16,
    pub irq_brk: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// 1 for the plain layout, 3 when the expanded fields are present.
    pub version: u8,
    pub maker_code: u16,
    pub game_code: u32,
    pub fixed: [u8; 6],
    pub flash_size: u8,
    pub expansion_ram_size: u8,
    pub special_version: u8,
    pub co_cpu_type: u8,
    pub title: [u8; TITLE_LEN],
    pub map_mode: u8,
    pub cartridge_type: u8,
    pub rom_size: u8,
    pub ram_size: u8,
    pub destination_code: u8,
    pub old_maker_code: u8,
    pub mask_rom_version: u8,
    pub checksum_complement: u16,
    pub checksum: u16,
    pub native_vectors: NativeVectors,
    pub emulation_vectors: EmulationVectors,
}

#[inline]
fn le16(b: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([b[at], b[at + 1]])
}

impl Header {
    /// Decodes the window starting at the header's `$FFB0` byte.
    pub fn parse(window: &[u8]) -> Result<Self, HeaderError> {
        if window.len() < HEADER_LEN {
            return Err(HeaderError::TooShort { len: window.len() });
        }
        let b = &window[..HEADER_LEN];

        let mut title = [0u8; TITLE_LEN];
        title.copy_from_slice(&b[0x10..0x10 + TITLE_LEN]);

        let old_maker_code = b[0x2A];
        let mut header = Header {
            version: 1,
            maker_code: 0,
            game_code: 0,
            fixed: [0; 6],
            flash_size: 0,
            expansion_ram_size: 0,
            special_version: 0,
            co_cpu_type: 0,
            title,
            map_mode: b[0x25],
            cartridge_type: b[0x26],
            rom_size: b[0x27],
            ram_size: b[0x28],
            destination_code: b[0x29],
            old_maker_code,
            mask_rom_version: b[0x2B],
            checksum_complement: le16(b, 0x2C),
            checksum: le16(b, 0x2E),
            native_vectors: NativeVectors {
                unused1: [b[0x30], b[0x31], b[0x32], b[0x33]],
                cop: le16(b, 0x34),
                brk: le16(b, 0x36),
                abort: le16(b, 0x38),
                nmi: le16(b, 0x3A),
                unused2: le16(b, 0x3C),
                irq: le16(b, 0x3E),
            },
            emulation_vectors: EmulationVectors {
                unused1: [b[0x40], b[0x41], b[0x42], b[0x43]],
                cop: le16(b, 0x44),
                unused2: le16(b, 0x46),
                abort: le16(b, 0x48),
                nmi: le16(b, 0x4A),
                reset: le16(b, 0x4C),
                irq_brk: le16(b, 0x4E),
            },
        };

        if old_maker_code == EXPANDED_MAKER {
            header.version = 3;
            header.maker_code = le16(b, 0x00);
            header.game_code = u32::from_le_bytes([b[0x02], b[0x03], b[0x04], b[0x05]]);
            header.fixed.copy_from_slice(&b[0x06..0x0C]);
            header.flash_size = b[0x0C];
            header.expansion_ram_size = b[0x0D];
            header.special_version = b[0x0E];
            header.co_cpu_type = b[0x0F];
        }
        Ok(header)
    }

    /// Finds the better-scoring of the LoROM and HiROM windows in `image`
    /// and returns its offset with the decoded header.
    pub fn locate(image: &[u8]) -> Result<(usize, Self), HeaderError> {
        let lorom = score_window(image, LOROM_HEADER);
        let hirom = score_window(image, HIROM_HEADER);
        log::debug!("cartridge: header scores lorom={} hirom={}", lorom, hirom);

        let offset = if hirom > lorom && hirom > MIN_SCORE {
            HIROM_HEADER
        } else if lorom > MIN_SCORE {
            LOROM_HEADER
        } else {
            return Err(HeaderError::Missing);
        };
        let header = Self::parse(&image[offset..])?;
        Ok((offset, header))
    }

    /// Title with the space padding removed. Non-ASCII bytes become `?`.
    pub fn title(&self) -> String {
        let mut title = String::with_capacity(TITLE_LEN);
        for &byte in &self.title {
            match byte {
                0x00 => break,
                0x20..=0x7E => title.push(byte as char),
                _ => title.push('?'),
            }
        }
        title.trim_end().to_string()
    }

    pub fn checksum_consistent(&self) -> bool {
        self.checksum_complement == self.checksum ^ 0xFFFF
    }

    pub fn is_hirom(&self) -> bool {
        self.map_mode & 0x01 != 0
    }

    pub fn is_fastrom(&self) -> bool {
        self.map_mode & 0x10 != 0
    }

    /// ROM size in bytes from the `1 KiB << n` code.
    pub fn rom_bytes(&self) -> usize {
        match self.rom_size {
            0 => 0,
            n if n < 24 => 1024usize << n,
            _ => 0,
        }
    }

    /// SRAM size in bytes; 0 and 0xFF both mean none.
    pub fn ram_bytes(&self) -> usize {
        match self.ram_size {
            0 | 0xFF => 0,
            n if n < 24 => 1024usize << n,
            _ => 0,
        }
    }
}

/// Plausibility score of the header candidate at `offset`.
fn score_window(image: &[u8], offset: usize) -> u32 {
    let Some(b) = image.get(offset..offset + HEADER_LEN) else {
        return 0;
    };

    let mut score: u32 = 0;
    if le16(b, 0x2C) ^ le16(b, 0x2E) == 0xFFFF {
        score += 8;
    }
    if b[0x26] <= 0x37 {
        score += 2;
    }
    let rom_size = b[0x27];
    if (0x08..=0x0D).contains(&rom_size) {
        score += 2;
        let expected = 1024usize << rom_size;
        if image.len() >= expected / 2 && image.len() <= expected * 2 {
            score += 2;
        }
    }
    if b[0x28] <= 0x08 || b[0x28] == 0xFF {
        score += 1;
    }
    if b[0x29] <= 0x0D || b[0x29] == 0xFF {
        score += 1;
    }
    if b[0x10..0x10 + TITLE_LEN]
        .iter()
        .all(|&c| (0x20..=0x7E).contains(&c) || c == 0x00)
    {
        score += 2;
    }
    // The reset vector must point into the upper half of a bank.
    if le16(b, 0x4C) < 0x8000 {
        score = score.saturating_sub(4);
    }
    if b[0x26] == 0xFF || b[0x2A] == 0xFF {
        score = score.saturating_sub(3);
    }
    score
}

/// Drops a 512-byte copier header if the image length says one is present.
pub fn strip_copier_header(image: &mut Vec<u8>) -> bool {
    if image.len() % 1024 == 512 {
        image.drain(..512);
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VT_FASTROM: [u8; HEADER_LEN] = [
        0x01, 0x8D, 0x24, 0x01, 0xE2, 0x30, 0x6B, 0x5C, 0x9C, 0xB1, 0xA1, 0xFF, 0xFF, 0xFF, 0xFF,
        0xFF, 0x56, 0x54, 0x20, 0x71, 0x5A, 0x47, 0x4C, 0x72, 0x6D, 0x52, 0x76, 0x6B, 0x36, 0x20,
        0x20, 0x20, 0x20, 0x20, 0x20, 0x20, 0x20, 0x30, 0x02, 0x0B, 0x05, 0x00, 0x01, 0x00, 0x1F,
        0x29, 0xE0, 0xD6, 0x01, 0x00, 0x04, 0x00, 0xB7, 0xFF, 0xB7, 0xFF, 0x2C, 0x82, 0xAB, 0x98,
        0x00, 0x80, 0xAF, 0x98, 0xFF, 0xFF, 0xFF, 0xFF, 0xB7, 0xFF, 0x2C, 0x82, 0x2C, 0x82, 0x2C,
        0x82, 0x00, 0x80, 0xD8, 0x82,
    ];

    #[test]
    fn test_parse_vt_fastrom_header() {
        let h = Header::parse(&VT_FASTROM).unwrap();

        let mut title = [0x20u8; 21];
        title[..13].copy_from_slice(b"VT qZGLrmRvk6");
        let expected = Header {
            version: 1,
            maker_code: 0,
            game_code: 0,
            fixed: [0; 6],
            flash_size: 0,
            expansion_ram_size: 0,
            special_version: 0,
            co_cpu_type: 0,
            title,
            map_mode: 0x30,
            cartridge_type: 0x02,
            rom_size: 0x0B,
            ram_size: 0x05,
            destination_code: 0x00,
            old_maker_code: 0x01,
            mask_rom_version: 0x00,
            checksum_complement: 0x291F,
            checksum: 0xD6E0,
            native_vectors: NativeVectors {
                unused1: [0x01, 0x00, 0x04, 0x00],
                cop: 0xFFB7,
                brk: 0xFFB7,
                abort: 0x822C,
                nmi: 0x98AB,
                unused2: 0x8000,
                irq: 0x98AF,
            },
            emulation_vectors: EmulationVectors {
                unused1: [0xFF; 4],
                cop: 0xFFB7,
                unused2: 0x822C,
                abort: 0x822C,
                nmi: 0x822C,
                reset: 0x8000,
                irq_brk: 0x82D8,
            },
        };
        assert_eq!(h, expected);
        assert_eq!(h.title(), "VT qZGLrmRvk6");
        assert!(h.checksum_consistent());
        assert!(h.is_fastrom());
        assert!(!h.is_hirom());
        assert_eq!(h.rom_bytes(), 2 * 1024 * 1024);
        assert_eq!(h.ram_bytes(), 32 * 1024);
    }

    #[test]
    fn test_expanded_fields_need_maker_33() {
        let mut raw = VT_FASTROM;
        raw[0x2A] = 0x33;
        let h = Header::parse(&raw).unwrap();
        assert_eq!(h.version, 3);
        assert_eq!(h.maker_code, 0x8D01);
        assert_eq!(h.game_code, 0x30E2_0124);
        assert_eq!(h.fixed, [0x6B, 0x5C, 0x9C, 0xB1, 0xA1, 0xFF]);
        assert_eq!(h.co_cpu_type, 0xFF);
    }

    #[test]
    fn test_short_window() {
        assert_eq!(
            Header::parse(&VT_FASTROM[..0x30]),
            Err(HeaderError::TooShort { len: 0x30 })
        );
    }

    #[test]
    fn test_locate_lorom() {
        let mut image = vec![0u8; 0x20000];
        image[LOROM_HEADER..LOROM_HEADER + HEADER_LEN].copy_from_slice(&VT_FASTROM);
        let (offset, h) = Header::locate(&image).unwrap();
        assert_eq!(offset, LOROM_HEADER);
        assert_eq!(h.emulation_vectors.reset, 0x8000);
    }

    #[test]
    fn test_locate_missing() {
        let image = vec![0xFFu8; 0x10000];
        assert_eq!(Header::locate(&image), Err(HeaderError::Missing));
    }

    #[test]
    fn test_strip_copier_header() {
        let mut image = vec![0u8; 0x8000 + 512];
        image[512] = 0xAA;
        assert!(strip_copier_header(&mut image));
        assert_eq!(image.len(), 0x8000);
        assert_eq!(image[0], 0xAA);
        assert!(!strip_copier_header(&mut image));
    }
}
