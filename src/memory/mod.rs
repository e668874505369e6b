//! Memory regions that can be attached to the address bus.
//!
//! Regions borrow their backing bytes from a [`Storage`], so the same storage
//! can sit behind several regions (mirrors with different base addresses) and
//! the borrow checker keeps the storage alive for as long as any bus uses it.

use std::cell::Cell;
use std::fmt;
use std::ops::Range;


/// Capability the bus consumes for every mapped segment.
///
/// Addresses are full 24-bit bus addresses; each implementation decides how
/// to turn them into an index.
pub trait Memory {
    fn read(&self, addr: u32) -> u8;
    fn write(&self, addr: u32, value: u8);
    fn size(&self) -> u32;
    fn clear(&self);
    fn shutdown(&self) {}

    fn dump(&self, start: u32, end: u32) -> Vec<u8> {
        if end < start {
            return Vec::new();
        }
        (start..=end).map(|addr| self.read(addr)).collect()
    }
}

/// Owned backing bytes for RAM and ROM regions.
pub struct Storage {
    cells: Box<[Cell<u8>]>,
}

impl Storage {
    pub fn new(len: usize) -> Self {
        Self {
            cells: (0..len).map(|_| Cell::new(0)).collect(),
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            cells: bytes.iter().copied().map(Cell::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell<u8>] {
        &self.cells
    }

    /// Sub-range of the storage, clamped to its length.
    pub fn window(&self, range: Range<usize>) -> &[Cell<u8>] {
        let end = range.end.min(self.cells.len());
        let start = range.start.min(end);
        &self.cells[start..end]
    }

    pub fn get(&self, index: usize) -> u8 {
        self.cells.get(index).map_or(0, Cell::get)
    }

    pub fn set(&self, index: usize, value: u8) {
        if let Some(cell) = self.cells.get(index) {
            cell.set(value);
        }
    }

    /// Copies `bytes` in at `offset`; bytes past the end are dropped.
    /// Returns how many were stored.
    pub fn load(&self, offset: usize, bytes: &[u8]) -> usize {
        let target = self.window(offset..offset.saturating_add(bytes.len()));
        for (cell, &byte) in target.iter().zip(bytes) {
            cell.set(byte);
        }
        target.len()
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.cells.iter().map(Cell::get).collect()
    }
}

impl fmt::Debug for Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storage").field("len", &self.cells.len()).finish()
    }
}

// Maps bus addresses onto a cell slice. Addresses wrap modulo the slice
// length, so attaching one view at congruent ranges mirrors it.
#[derive(Clone, Copy)]
struct View<'a> {
    cells: &'a [Cell<u8>],
    base: u32,
}

impl<'a> View<'a> {
    #[inline]
    fn cell(&self, addr: u32) -> Option<&'a Cell<u8>> {
        let len = self.cells.len();
        if len == 0 {
            return None;
        }
        let rel = addr.wrapping_sub(self.base) as usize;
        let index = if len.is_power_of_two() {
            rel & (len - 1)
        } else {
            rel % len
        };
        self.cells.get(index)
    }

    fn clear(&self) {
        for cell in self.cells {
            cell.set(0);
        }
    }
}

/// Flat mutable storage.
#[derive(Clone, Copy)]
pub struct Ram<'a> {
    view: View<'a>,
}

impl<'a> Ram<'a> {
    pub fn new(cells: &'a [Cell<u8>], base: u32) -> Self {
        Self {
            view: View { cells, base },
        }
    }

    pub fn base(&self) -> u32 {
        self.view.base
    }
}

impl Memory for Ram<'_> {
    #[inline]
    fn read(&self, addr: u32) -> u8 {
        self.view.cell(addr).map_or(0, Cell::get)
    }

    #[inline]
    fn write(&self, addr: u32, value: u8) {
        if let Some(cell) = self.view.cell(addr) {
            cell.set(value);
        }
    }

    fn size(&self) -> u32 {
        self.view.cells.len() as u32
    }

    fn clear(&self) {
        self.view.clear();
    }
}

/// Flat read-only storage; writes are dropped.
#[derive(Clone, Copy)]
pub struct Rom<'a> {
    view: View<'a>,
}

impl<'a> Rom<'a> {
    pub fn new(cells: &'a [Cell<u8>], base: u32) -> Self {
        Self {
            view: View { cells, base },
        }
    }

    pub fn base(&self) -> u32 {
        self.view.base
    }
}

impl Memory for Rom<'_> {
    #[inline]
    fn read(&self, addr: u32) -> u8 {
        self.view.cell(addr).map_or(0, Cell::get)
    }

    #[inline]
    fn write(&self, addr: u32, value: u8) {
        log::trace!("rom write ignored: ${:06X} <- ${:02X}", addr, value);
    }

    fn size(&self) -> u32 {
        self.view.cells.len() as u32
    }

    // Zeroes the backing storage so a fresh image can be loaded.
    fn clear(&self) {
        self.view.clear();
    }
}

pub type ReadFn<'a> = Box<dyn Fn(u32) -> u8 + 'a>;
pub type WriteFn<'a> = Box<dyn Fn(u32, u8) + 'a>;

/// A read function and a write function, for test stubs and simple I/O.
pub struct Callback<'a> {
    read: ReadFn<'a>,
    write: WriteFn<'a>,
}

impl<'a> Callback<'a> {
    pub fn new(read: impl Fn(u32) -> u8 + 'a, write: impl Fn(u32, u8) + 'a) -> Self {
        Self {
            read: Box::new(read),
            write: Box::new(write),
        }
    }

    pub fn read_only(read: impl Fn(u32) -> u8 + 'a) -> Self {
        Self::new(read, |_, _| {})
    }
}

impl Memory for Callback<'_> {
    fn read(&self, addr: u32) -> u8 {
        (self.read)(addr)
    }

    fn write(&self, addr: u32, value: u8) {
        (self.write)(addr, value)
    }

    fn size(&self) -> u32 {
        0
    }

    fn clear(&self) {}
}

/// The region variants the bus dispatches to.
pub enum Region<'a> {
    Ram(Ram<'a>),
    Rom(Rom<'a>),
    Callback(Callback<'a>),
}

impl<'a> Region<'a> {
    pub fn ram(cells: &'a [Cell<u8>], base: u32) -> Self {
        Region::Ram(Ram::new(cells, base))
    }

    pub fn rom(cells: &'a [Cell<u8>], base: u32) -> Self {
        Region::Rom(Rom::new(cells, base))
    }

    pub fn callback(read: impl Fn(u32) -> u8 + 'a, write: impl Fn(u32, u8) + 'a) -> Self {
        Region::Callback(Callback::new(read, write))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Region::Ram(_) => "ram",
            Region::Rom(_) => "rom",
            Region::Callback(_) => "callback",
        }
    }
}

impl Memory for Region<'_> {
    #[inline]
    fn read(&self, addr: u32) -> u8 {
        match self {
            Region::Ram(m) => m.read(addr),
            Region::Rom(m) => m.read(addr),
            Region::Callback(m) => m.read(addr),
        }
    }

    #[inline]
    fn write(&self, addr: u32, value: u8) {
        match self {
            Region::Ram(m) => m.write(addr, value),
            Region::Rom(m) => m.write(addr, value),
            Region::Callback(m) => m.write(addr, value),
        }
    }

    fn size(&self) -> u32 {
        match self {
            Region::Ram(m) => m.size(),
            Region::Rom(m) => m.size(),
            Region::Callback(m) => m.size(),
        }
    }

    fn clear(&self) {
        match self {
            Region::Ram(m) => m.clear(),
            Region::Rom(m) => m.clear(),
            Region::Callback(m) => m.clear(),
        }
    }

    fn shutdown(&self) {
        match self {
            Region::Ram(m) => m.shutdown(),
            Region::Rom(m) => m.shutdown(),
            Region::Callback(m) => m.shutdown(),
        }
    }
}

impl fmt::Debug for Region<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({} bytes)", self.kind(), self.size())
    }
}
