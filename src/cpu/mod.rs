//! 65816 instruction-execution core.
//!
//! The CPU never owns memory: every fetch, operand read and store goes
//! through a [`CpuBus`]. One call to [`Cpu::step`] executes one instruction
//! and reports its cycle cost plus whether the session must stop.

use bitflags::bitflags;

use crate::bus::BusError;
use crate::cpu_bus::CpuBus;
use crate::debug_flags;

pub mod addressing;
mod execute;
pub mod opcodes;

pub use addressing::{AddressingMode, EffectiveAddress, Operand, Wrap};
pub use opcodes::{lookup, CycleRule, Mnemonic, Opcode, OPCODES};

#[cfg(test)]
mod tests;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StatusFlags: u8 {
        const CARRY = 0x01;
        const ZERO = 0x02;
        const IRQ_DISABLE = 0x04;
        const DECIMAL = 0x08;
        /// X in native mode; reads back as the break bit in emulation pushes.
        const INDEX_8BIT = 0x10;
        const MEMORY_8BIT = 0x20;
        const OVERFLOW = 0x40;
        const NEGATIVE = 0x80;
    }
}

pub const VECTOR_COP_NATIVE: u16 = 0xFFE4;
pub const VECTOR_BRK_NATIVE: u16 = 0xFFE6;
pub const VECTOR_NMI_NATIVE: u16 = 0xFFEA;
pub const VECTOR_IRQ_NATIVE: u16 = 0xFFEE;
pub const VECTOR_COP_EMULATION: u16 = 0xFFF4;
pub const VECTOR_NMI_EMULATION: u16 = 0xFFFA;
pub const VECTOR_RESET: u16 = 0xFFFC;
pub const VECTOR_IRQ_EMULATION: u16 = 0xFFFE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    pub a: u16,
    pub x: u16,
    pub y: u16,
    pub dp: u16,
    pub sp: u16,
    pub db: u8,
    pub pb: u8,
    pub pc: u16,
    pub p: StatusFlags,
    pub emulation: bool,
}

impl Default for Registers {
    fn default() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            dp: 0,
            sp: 0x01FF,
            db: 0,
            pb: 0,
            pc: 0,
            p: StatusFlags::IRQ_DISABLE | StatusFlags::MEMORY_8BIT | StatusFlags::INDEX_8BIT,
            emulation: true,
        }
    }
}

impl Registers {
    #[inline]
    pub fn m8(&self) -> bool {
        self.emulation || self.p.contains(StatusFlags::MEMORY_8BIT)
    }

    #[inline]
    pub fn x8(&self) -> bool {
        self.emulation || self.p.contains(StatusFlags::INDEX_8BIT)
    }

    /// Program counter as a 24-bit address.
    #[inline]
    pub fn pc24(&self) -> u32 {
        ((self.pb as u32) << 16) | self.pc as u32
    }

    /// Re-establishes the mode invariants after P or E changed.
    pub fn normalize(&mut self) {
        if self.emulation {
            self.p.insert(StatusFlags::MEMORY_8BIT | StatusFlags::INDEX_8BIT);
            self.sp = 0x0100 | (self.sp & 0x00FF);
        }
        if self.x8() {
            self.x &= 0x00FF;
            self.y &= 0x00FF;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepResult {
    pub cycles: u32,
    pub abort: bool,
}

pub struct Cpu {
    pub regs: Registers,
    cycles: u32,
    total_cycles: u64,
    prev_pc: u32,
    waiting: bool,
    stopped: bool,
    fault: Option<BusError>,
    trace: bool,
    trace_line: String,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    pub fn new() -> Self {
        Self {
            regs: Registers::default(),
            cycles: 0,
            total_cycles: 0,
            prev_pc: 0,
            waiting: false,
            stopped: false,
            fault: None,
            trace: debug_flags::trace(),
            trace_line: String::with_capacity(96),
        }
    }

    /// Puts the core in emulation mode and loads PC from the reset vector.
    /// Attached memory is left alone.
    pub fn reset<B: CpuBus>(&mut self, bus: &mut B) -> Result<(), BusError> {
        self.regs = Registers::default();
        self.waiting = false;
        self.stopped = false;
        self.fault = None;
        self.cycles = 0;
        self.total_cycles = 0;
        self.regs.pc = bus.read_u16_bank_wrap(0, VECTOR_RESET)?;
        self.prev_pc = self.regs.pc24();
        log::debug!("cpu: reset, pc={:04X}", self.regs.pc);
        Ok(())
    }

    /// Executes one instruction.
    ///
    /// `abort` is set after WDM, on STP (and every step after it), and on a
    /// bus fault. A faulting instruction leaves the registers as they were
    /// before it started; the error is kept in [`Cpu::fault`]. Memory is not
    /// rolled back: bytes written before the fault stay written, e.g. the low
    /// byte of a 16-bit store whose high byte is unmapped, or the part of a
    /// block move already copied.
    pub fn step<B: CpuBus>(&mut self, bus: &mut B) -> StepResult {
        self.prev_pc = self.regs.pc24();

        if self.stopped {
            self.cycles = 0;
            return StepResult {
                cycles: 0,
                abort: true,
            };
        }
        if self.waiting {
            self.account(1);
            return StepResult {
                cycles: 1,
                abort: false,
            };
        }

        if self.trace {
            self.log_trace(bus);
        }

        let snapshot = self.regs;
        match self.execute_next(bus) {
            Ok(execute::Flow::Next(cycles)) => {
                self.account(cycles);
                StepResult {
                    cycles,
                    abort: false,
                }
            }
            Ok(execute::Flow::Abort(cycles)) => {
                self.account(cycles);
                StepResult {
                    cycles,
                    abort: true,
                }
            }
            Err(err) => {
                self.regs = snapshot;
                self.cycles = 0;
                log::error!(
                    "cpu: bus fault at {:02X}:{:04X}: {}",
                    self.regs.pb,
                    self.regs.pc,
                    err
                );
                self.fault = Some(err);
                StepResult {
                    cycles: 0,
                    abort: true,
                }
            }
        }
    }

    fn log_trace<B: CpuBus>(&mut self, bus: &mut B) {
        let mut line = std::mem::take(&mut self.trace_line);
        line.clear();
        crate::disasm::trace_line(&mut line, self, bus);
        log::trace!("{}", line);
        self.trace_line = line;
    }

    #[inline]
    fn account(&mut self, cycles: u32) {
        self.cycles = cycles;
        self.total_cycles += cycles as u64;
    }

    /// Non-maskable interrupt entry. Wakes a WAI.
    pub fn nmi<B: CpuBus>(&mut self, bus: &mut B) -> Result<(), BusError> {
        self.waiting = false;
        if self.stopped {
            return Ok(());
        }
        let vector = if self.regs.emulation {
            VECTOR_NMI_EMULATION
        } else {
            VECTOR_NMI_NATIVE
        };
        self.enter_interrupt(bus, vector, false)
    }

    /// Maskable interrupt entry. Ignored while I is set, though it still
    /// ends a WAI.
    pub fn irq<B: CpuBus>(&mut self, bus: &mut B) -> Result<(), BusError> {
        self.waiting = false;
        if self.stopped || self.regs.p.contains(StatusFlags::IRQ_DISABLE) {
            return Ok(());
        }
        let vector = if self.regs.emulation {
            VECTOR_IRQ_EMULATION
        } else {
            VECTOR_IRQ_NATIVE
        };
        self.enter_interrupt(bus, vector, false)
    }

    /// Pushes the return state and jumps through `vector`. `software` marks
    /// BRK/COP, which set the break bit in the pushed status in emulation.
    fn enter_interrupt<B: CpuBus>(
        &mut self,
        bus: &mut B,
        vector: u16,
        software: bool,
    ) -> Result<(), BusError> {
        let snapshot = self.regs;
        let result = self.push_interrupt_frame(bus, vector, software);
        match result {
            Ok(cycles) => {
                if !software {
                    self.account(cycles);
                }
                Ok(())
            }
            Err(err) => {
                self.regs = snapshot;
                self.fault = Some(err);
                Err(err)
            }
        }
    }

    fn push_interrupt_frame<B: CpuBus>(
        &mut self,
        bus: &mut B,
        vector: u16,
        software: bool,
    ) -> Result<u32, BusError> {
        if !self.regs.emulation {
            self.push_u8(bus, self.regs.pb)?;
        }
        self.push_u16(bus, self.regs.pc)?;
        let mut status = self.regs.p;
        if self.regs.emulation {
            status.set(StatusFlags::INDEX_8BIT, software);
        }
        self.push_u8(bus, status.bits())?;
        self.regs.p.insert(StatusFlags::IRQ_DISABLE);
        self.regs.p.remove(StatusFlags::DECIMAL);
        self.regs.pb = 0;
        self.regs.pc = bus.read_u16_bank_wrap(0, vector)?;
        Ok(if self.regs.emulation { 7 } else { 8 })
    }

    #[inline]
    pub(crate) fn push_u8<B: CpuBus>(&mut self, bus: &mut B, value: u8) -> Result<(), BusError> {
        bus.write_u8(self.regs.sp as u32, value)?;
        self.regs.sp = if self.regs.emulation {
            0x0100 | (self.regs.sp.wrapping_sub(1) & 0x00FF)
        } else {
            self.regs.sp.wrapping_sub(1)
        };
        Ok(())
    }

    #[inline]
    pub(crate) fn push_u16<B: CpuBus>(&mut self, bus: &mut B, value: u16) -> Result<(), BusError> {
        self.push_u8(bus, (value >> 8) as u8)?;
        self.push_u8(bus, value as u8)
    }

    #[inline]
    pub(crate) fn pull_u8<B: CpuBus>(&mut self, bus: &mut B) -> Result<u8, BusError> {
        self.regs.sp = if self.regs.emulation {
            0x0100 | (self.regs.sp.wrapping_add(1) & 0x00FF)
        } else {
            self.regs.sp.wrapping_add(1)
        };
        bus.read_u8(self.regs.sp as u32)
    }

    #[inline]
    pub(crate) fn pull_u16<B: CpuBus>(&mut self, bus: &mut B) -> Result<u16, BusError> {
        let lo = self.pull_u8(bus)? as u16;
        let hi = self.pull_u8(bus)? as u16;
        Ok((hi << 8) | lo)
    }

    /// Cycles consumed by the most recent step.
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    pub fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    /// 24-bit PC at the start of the most recent step.
    pub fn prev_pc(&self) -> u32 {
        self.prev_pc
    }

    /// True when the last step left PB:PC where it started, which is how a
    /// caller spots `BRA *` style idle loops and WAI.
    pub fn is_spinning(&self) -> bool {
        self.regs.pc24() == self.prev_pc
    }

    pub fn is_waiting(&self) -> bool {
        self.waiting
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn fault(&self) -> Option<BusError> {
        self.fault
    }

    pub(crate) fn restore_counters(&mut self, total_cycles: u64, waiting: bool, stopped: bool) {
        self.total_cycles = total_cycles;
        self.waiting = waiting;
        self.stopped = stopped;
        self.cycles = 0;
        self.fault = None;
        self.prev_pc = self.regs.pc24();
    }
}
