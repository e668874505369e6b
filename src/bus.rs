//! Segmented 24-bit address bus.
//!
//! The address space is split into 2^20 segments of 16 bytes. Each segment
//! holds an optional reference to the region mapped there, so dispatch is a
//! single shift and index. Regions are borrowed and must outlive the bus.

use std::fmt;

use crate::cpu_bus::CpuBus;
use crate::debug_flags;
use crate::memory::{Memory, Region};


pub const ADDRESS_MASK: u32 = 0x00FF_FFFF;
const SEGMENT_SHIFT: u32 = 4;
const SEGMENT_MASK: u32 = (1 << SEGMENT_SHIFT) - 1;
const SEGMENT_COUNT: usize = 1 << 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    UnalignedStart { start: u32 },
    UnalignedEnd { end: u32 },
    InvalidRange { start: u32, end: u32 },
    Unmapped { addr: u32, direction: Direction },
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusError::UnalignedStart { start } => {
                write!(f, "start is not 4-bit aligned: {:06X}", start)
            }
            BusError::UnalignedEnd { end } => {
                write!(f, "end+1 is not 4-bit aligned: {:06X}", end)
            }
            BusError::InvalidRange { start, end } => {
                write!(f, "invalid range {:06X}-{:06X}", start, end)
            }
            BusError::Unmapped { addr, direction } => {
                write!(f, "unmapped {} at {:06X}", direction, addr)
            }
        }
    }
}

impl std::error::Error for BusError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Read,
    Write,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Read => "read",
            Direction::Write => "write",
        })
    }
}

/// Last effective address the bus saw, kept for fault reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Access {
    pub addr: u32,
    pub direction: Direction,
}

pub struct BusEntry<'a> {
    pub name: String,
    pub start: u32,
    pub end: u32,
    region: &'a Region<'a>,
}

impl<'a> BusEntry<'a> {
    pub fn region(&self) -> &'a Region<'a> {
        self.region
    }
}

pub struct Bus<'a> {
    segments: Box<[Option<&'a Region<'a>>]>,
    entries: Vec<BusEntry<'a>>,
    last: Option<Access>,
    trace: bool,
}

impl<'a> Default for Bus<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Bus<'a> {
    pub fn new() -> Self {
        Self {
            segments: vec![None; SEGMENT_COUNT].into_boxed_slice(),
            entries: Vec::new(),
            last: None,
            trace: debug_flags::bus(),
        }
    }

    /// Maps `region` over `start..=end`. Both ends must fall on segment
    /// boundaries. Later attachments overwrite earlier ones.
    pub fn attach(
        &mut self,
        region: &'a Region<'a>,
        name: &str,
        start: u32,
        end: u32,
    ) -> Result<(), BusError> {
        if start & SEGMENT_MASK != 0 {
            return Err(BusError::UnalignedStart { start });
        }
        if end.wrapping_add(1) & SEGMENT_MASK != 0 {
            return Err(BusError::UnalignedEnd { end });
        }
        if end < start || end > ADDRESS_MASK {
            return Err(BusError::InvalidRange { start, end });
        }

        let first = (start >> SEGMENT_SHIFT) as usize;
        let last = (end >> SEGMENT_SHIFT) as usize;
        for slot in &mut self.segments[first..=last] {
            *slot = Some(region);
        }

        log::debug!(
            "bus: attach {:<12} {:06X}-{:06X} ({})",
            name,
            start,
            end,
            region.kind()
        );
        self.entries.push(BusEntry {
            name: name.to_string(),
            start,
            end,
            region,
        });
        Ok(())
    }

    #[inline]
    fn segment(&self, addr: u32) -> Option<&'a Region<'a>> {
        self.segments[((addr & ADDRESS_MASK) >> SEGMENT_SHIFT) as usize]
    }

    pub fn is_mapped(&self, addr: u32) -> bool {
        self.segment(addr).is_some()
    }

    #[inline]
    pub fn read(&mut self, addr: u32) -> Result<u8, BusError> {
        let addr = addr & ADDRESS_MASK;
        let direction = Direction::Read;
        self.last = Some(Access { addr, direction });
        match self.segment(addr) {
            Some(region) => {
                let value = region.read(addr);
                if self.trace {
                    log::trace!("bus: {:06X} -> {:02X}", addr, value);
                }
                Ok(value)
            }
            None => Err(BusError::Unmapped { addr, direction }),
        }
    }

    #[inline]
    pub fn write(&mut self, addr: u32, value: u8) -> Result<(), BusError> {
        let addr = addr & ADDRESS_MASK;
        let direction = Direction::Write;
        self.last = Some(Access { addr, direction });
        match self.segment(addr) {
            Some(region) => {
                if self.trace {
                    log::trace!("bus: {:06X} <- {:02X}", addr, value);
                }
                region.write(addr, value);
                Ok(())
            }
            None => Err(BusError::Unmapped { addr, direction }),
        }
    }

    /// Reads without recording the access. Unmapped addresses give `None`.
    pub fn peek(&self, addr: u32) -> Option<u8> {
        let addr = addr & ADDRESS_MASK;
        self.segment(addr).map(|region| region.read(addr))
    }

    pub fn last_access(&self) -> Option<Access> {
        self.last
    }

    /// Copies `start..=end` into `dst`, stopping early if `dst` is shorter.
    /// Bytes of unmapped segments are left as they were in `dst`. Returns
    /// the number of addresses covered.
    pub fn dump(&self, start: u32, end: u32, dst: &mut [u8]) -> usize {
        let start = start & ADDRESS_MASK;
        let end = end & ADDRESS_MASK;
        if end < start {
            return 0;
        }
        let span = (end - start) as usize + 1;
        let count = span.min(dst.len());

        let mut done = 0;
        while done < count {
            let addr = start + done as u32;
            let seg_end = (addr | SEGMENT_MASK) - addr + 1;
            let run = (seg_end as usize).min(count - done);
            if let Some(region) = self.segment(addr) {
                for (i, byte) in dst[done..done + run].iter_mut().enumerate() {
                    *byte = region.read(addr + i as u32);
                }
            }
            done += run;
        }
        count
    }

    pub fn entries(&self) -> &[BusEntry<'a>] {
        &self.entries
    }

    pub fn shutdown(&self) {
        for entry in &self.entries {
            entry.region.shutdown();
        }
    }
}

impl CpuBus for Bus<'_> {
    #[inline]
    fn read_u8(&mut self, addr: u32) -> Result<u8, BusError> {
        self.read(addr)
    }

    #[inline]
    fn write_u8(&mut self, addr: u32, value: u8) -> Result<(), BusError> {
        self.write(addr, value)
    }

    fn peek_u8(&mut self, addr: u32) -> Option<u8> {
        self.peek(addr)
    }
}

impl fmt::Display for Bus<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(
                f,
                "{:06X}-{:06X} {:<8} {}",
                entry.start,
                entry.end,
                entry.region.kind(),
                entry.name
            )?;
        }
        Ok(())
    }
}
