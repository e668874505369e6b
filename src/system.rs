//! A ready-made LoROM machine: CPU plus a bus with the usual memory map.
//!
//! | Range                         | Region                          |
//! |-------------------------------|---------------------------------|
//! | `00-3F:8000-FFFF`, `80-BF:..` | ROM, 32 KiB per bank            |
//! | `70-7D:0000-7FFF`, `F0-FF:..` | SRAM, mirrored                  |
//! | `7E-7F:0000-FFFF`             | WRAM                            |
//! | `00-3F:0000-1FFF`, `80-BF:..` | WRAM mirror (first 8 KiB)       |
//! | `00-6F:2000-7FFF`, `80-EF:..` | I/O stub, reads 0, drops writes |
//!
//! Storage, regions and the bus borrow from each other, so a system is
//! built in three steps:
//!
//! ```no_run
//! use snes_cpu::system::{System, SystemMemory};
//!
//! let memory = SystemMemory::new();
//! memory.rom.load(0, &[0xEA]);
//! let regions = memory.regions();
//! let mut system = System::new(&regions).unwrap();
//! system.reset().unwrap();
//! ```

use std::io::Write;

use crate::bus::{Bus, BusError};
use crate::cpu::Cpu;
use crate::memory::{Region, Storage};
use crate::session::{self, RunOptions, RunSummary};

pub const ROM_BANKS: u32 = 0x40;
pub const ROM_BANK_SIZE: usize = 0x8000;
pub const ROM_SIZE: usize = ROM_BANKS as usize * ROM_BANK_SIZE;
pub const WRAM_SIZE: usize = 0x2_0000;
pub const SRAM_SIZE: usize = 0x1_0000;

const LOW_WRAM_SIZE: usize = 0x2000;
const SRAM_PAGE: usize = 0x8000;

/// Owned backing bytes of a [`System`].
pub struct SystemMemory {
    pub rom: Storage,
    pub wram: Storage,
    pub sram: Storage,
}

impl Default for SystemMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemMemory {
    pub fn new() -> Self {
        Self {
            rom: Storage::new(ROM_SIZE),
            wram: Storage::new(WRAM_SIZE),
            sram: Storage::new(SRAM_SIZE),
        }
    }

    /// Memory with `image` loaded at the start of ROM. Bytes past
    /// [`ROM_SIZE`] are not reachable through the map and are dropped.
    pub fn with_rom(image: &[u8]) -> Self {
        let memory = Self::new();
        let stored = memory.rom.load(0, image);
        if stored < image.len() {
            log::warn!(
                "system: image is {} bytes, only the first {} are mapped",
                image.len(),
                stored
            );
        }
        memory
    }

    pub fn regions(&self) -> SystemRegions<'_> {
        let rom = (0..ROM_BANKS as usize)
            .map(|bank| {
                let start = bank * ROM_BANK_SIZE;
                let at = ((bank as u32) << 16) | 0x8000;
                Region::rom(self.rom.window(start..start + ROM_BANK_SIZE), at)
            })
            .collect();
        let sram = (0..SRAM_SIZE / SRAM_PAGE)
            .map(|page| {
                let start = page * SRAM_PAGE;
                Region::ram(
                    self.sram.window(start..start + SRAM_PAGE),
                    0x70_0000 + ((page as u32) << 16),
                )
            })
            .collect();
        SystemRegions {
            rom,
            sram,
            wram: Region::ram(self.wram.cells(), 0x7E_0000),
            low_wram: Region::ram(self.wram.window(0..LOW_WRAM_SIZE), 0),
            io: Region::callback(
                |addr| {
                    log::trace!("system: io read ${:06X}", addr);
                    0
                },
                |addr, value| log::trace!("system: io write ${:06X} <- ${:02X}", addr, value),
            ),
        }
    }
}

/// The regions of a [`System`], borrowing a [`SystemMemory`].
pub struct SystemRegions<'a> {
    rom: Vec<Region<'a>>,
    sram: Vec<Region<'a>>,
    wram: Region<'a>,
    low_wram: Region<'a>,
    io: Region<'a>,
}

impl<'a> SystemRegions<'a> {
    /// Attaches everything to `bus`. Callers can attach more on top
    /// afterwards, since later attachments win.
    pub fn attach_to(&'a self, bus: &mut Bus<'a>) -> Result<(), BusError> {
        for (bank, region) in self.rom.iter().enumerate() {
            let at = ((bank as u32) << 16) | 0x8000;
            bus.attach(region, "rom", at, at | 0x7FFF)?;
            bus.attach(region, "rom", at | 0x80_0000, at | 0x80_7FFF)?;
        }

        // $7E-$7F are overwritten by WRAM below.
        let pages = self.sram.len() as u32;
        for bank in (0x70..0x80u32).chain(0xF0..0x100) {
            let region = &self.sram[((bank & 0x7F) - 0x70) as usize % pages as usize];
            bus.attach(region, "sram", bank << 16, (bank << 16) | 0x7FFF)?;
        }

        bus.attach(&self.wram, "wram", 0x7E_0000, 0x7F_FFFF)?;
        for bank in (0x00..0x40u32).chain(0x80..0xC0) {
            bus.attach(&self.low_wram, "wram", bank << 16, (bank << 16) | 0x1FFF)?;
        }

        for bank in (0x00..0x70u32).chain(0x80..0xF0) {
            bus.attach(&self.io, "io", (bank << 16) | 0x2000, (bank << 16) | 0x7FFF)?;
        }
        Ok(())
    }
}

pub struct System<'a> {
    pub bus: Bus<'a>,
    pub cpu: Cpu,
}

impl<'a> System<'a> {
    pub fn new(regions: &'a SystemRegions<'a>) -> Result<Self, BusError> {
        let mut bus = Bus::new();
        regions.attach_to(&mut bus)?;
        Ok(Self {
            bus,
            cpu: Cpu::new(),
        })
    }

    pub fn reset(&mut self) -> Result<(), BusError> {
        self.cpu.reset(&mut self.bus)
    }

    /// PB:PC as a 24-bit address.
    pub fn pc(&self) -> u32 {
        self.cpu.regs.pc24()
    }

    pub fn set_pc(&mut self, pc: u32) {
        self.cpu.regs.pb = (pc >> 16) as u8;
        self.cpu.regs.pc = pc as u16;
    }

    /// Runs until PB:PC equals `target` or `max_cycles` have elapsed.
    /// Returns whether the target was reached.
    pub fn run_to(&mut self, target: u32, max_cycles: u64) -> bool {
        let options = RunOptions {
            until: Some(target),
            max_cycles,
            stop_on_spin: false,
            trace_limit: 0,
        };
        // Without a trace sink nothing can fail.
        let _ = self.run(&options, None);
        self.pc() == target
    }

    pub fn run(
        &mut self,
        options: &RunOptions,
        trace: Option<&mut dyn Write>,
    ) -> std::io::Result<RunSummary> {
        session::run_until(&mut self.cpu, &mut self.bus, options, trace)
    }
}
