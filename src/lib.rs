//! 65816 CPU emulation over a segmented 24-bit address bus.
//!
//! [`memory`] provides the regions, [`bus::Bus`] maps them into the address
//! space in 16-byte segments, and [`cpu::Cpu`] executes one instruction per
//! [`cpu::Cpu::step`] through the [`cpu_bus::CpuBus`] trait. The remaining
//! modules are tooling around that core: a label-resolving emitter for test
//! programs, a trace disassembler, header decoding, address translators, a
//! stepping loop, a ready-made LoROM [`system::System`] and save states.

pub mod asm;
pub mod bus;
pub mod cartridge;
pub mod cpu;
pub mod cpu_bus;
pub mod debug_flags;
pub mod disasm;
pub mod mapping;
pub mod memory;
pub mod save_state;
pub mod session;
pub mod system;
