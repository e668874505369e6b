//! Addressing modes and effective-address resolution for the 65816.

use crate::bus::{BusError, ADDRESS_MASK};
use crate::cpu_bus::CpuBus;

use super::Registers;

/// How an instruction interprets the bytes that follow its opcode.
///
/// Operand sizes (see [`AddressingMode::operand_len`]):
///
/// - **0 bytes**: Implied, Accumulator
/// - **1 byte**: Immediate, direct page and stack relative forms, Relative
/// - **1 or 2 bytes**: ImmediateM (follows M), ImmediateX (follows X)
/// - **2 bytes**: Absolute forms, RelativeLong, BlockMove, the JMP indirects
/// - **3 bytes**: AbsoluteLong, AbsoluteLongX
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    Implied,
    Accumulator,
    /// Fixed single byte: REP/SEP masks, BRK/COP signatures, WDM.
    Immediate,
    /// Width follows the accumulator/memory flag.
    ImmediateM,
    /// Width follows the index flag.
    ImmediateX,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    AbsoluteLong,
    AbsoluteLongX,
    DirectPage,
    DirectPageX,
    DirectPageY,
    /// `(dp)`
    DirectPageIndirect,
    /// `(dp,X)`
    DirectPageIndexedIndirect,
    /// `(dp),Y`
    DirectPageIndirectIndexed,
    /// `[dp]`
    DirectPageIndirectLong,
    /// `[dp],Y`
    DirectPageIndirectLongIndexed,
    StackRelative,
    /// `(sr,S),Y`
    StackRelativeIndirectIndexed,
    Relative,
    RelativeLong,
    /// MVN/MVP: destination bank, then source bank.
    BlockMove,
    /// `(abs)`, pointer in bank 0.
    AbsoluteIndirect,
    /// `(abs,X)`, pointer in the program bank.
    AbsoluteIndexedIndirect,
    /// `[abs]`, pointer in bank 0.
    AbsoluteIndirectLong,
}

impl AddressingMode {
    /// Operand byte count under the given register widths. This is the only
    /// place the immediate width rule lives; the core, the disassembler and
    /// the emitter all call it.
    pub const fn operand_len(self, m8: bool, x8: bool) -> usize {
        use AddressingMode::*;
        match self {
            Implied | Accumulator => 0,
            ImmediateM => {
                if m8 {
                    1
                } else {
                    2
                }
            }
            ImmediateX => {
                if x8 {
                    1
                } else {
                    2
                }
            }
            Immediate
            | DirectPage
            | DirectPageX
            | DirectPageY
            | DirectPageIndirect
            | DirectPageIndexedIndirect
            | DirectPageIndirectIndexed
            | DirectPageIndirectLong
            | DirectPageIndirectLongIndexed
            | StackRelative
            | StackRelativeIndirectIndexed
            | Relative => 1,
            Absolute
            | AbsoluteX
            | AbsoluteY
            | RelativeLong
            | BlockMove
            | AbsoluteIndirect
            | AbsoluteIndexedIndirect
            | AbsoluteIndirectLong => 2,
            AbsoluteLong | AbsoluteLongX => 3,
        }
    }

    pub fn is_immediate(self) -> bool {
        matches!(
            self,
            AddressingMode::Immediate | AddressingMode::ImmediateM | AddressingMode::ImmediateX
        )
    }
}

/// How the bytes following an effective address are reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wrap {
    /// Low byte wraps, bank and page kept (emulation-mode direct page).
    Page,
    /// Offset wraps at 16 bits, bank kept.
    Bank,
    /// Carries through the bank byte, wraps at 24 bits.
    Address,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveAddress {
    pub addr: u32,
    pub wrap: Wrap,
}

impl EffectiveAddress {
    pub fn bank_wrapped(bank: u8, offset: u16) -> Self {
        Self {
            addr: ((bank as u32) << 16) | offset as u32,
            wrap: Wrap::Bank,
        }
    }

    pub fn address_wrapped(addr: u32) -> Self {
        Self {
            addr: addr & ADDRESS_MASK,
            wrap: Wrap::Address,
        }
    }

    fn page_wrapped(addr: u32) -> Self {
        Self {
            addr: addr & ADDRESS_MASK,
            wrap: Wrap::Page,
        }
    }

    /// Address of the `index`th byte of a multi-byte value at this address.
    #[inline]
    pub fn byte(&self, index: u32) -> u32 {
        match self.wrap {
            Wrap::Page => (self.addr & 0xFF_FF00) | (self.addr.wrapping_add(index) & 0xFF),
            Wrap::Bank => (self.addr & 0xFF_0000) | (self.addr.wrapping_add(index) & 0xFFFF),
            Wrap::Address => self.addr.wrapping_add(index) & ADDRESS_MASK,
        }
    }

    pub fn offset(&self) -> u16 {
        self.addr as u16
    }
}

/// A decoded operand: the raw little-endian bytes from the instruction stream
/// plus, for memory modes, where the data lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operand {
    pub raw: u32,
    pub ea: Option<EffectiveAddress>,
    pub page_crossed: bool,
}

impl Operand {
    fn immediate(raw: u32) -> Self {
        Self {
            raw,
            ea: None,
            page_crossed: false,
        }
    }

    fn at(raw: u32, ea: EffectiveAddress) -> Self {
        Self {
            raw,
            ea: Some(ea),
            page_crossed: false,
        }
    }

    fn indexed(raw: u32, base: u32, index: u16) -> Self {
        let ea = EffectiveAddress::address_wrapped(base.wrapping_add(index as u32));
        Self {
            raw,
            ea: Some(ea),
            page_crossed: (base & ADDRESS_MASK) >> 8 != ea.addr >> 8,
        }
    }
}

#[inline]
fn data_bank(regs: &Registers, offset: u16) -> u32 {
    ((regs.db as u32) << 16) | offset as u32
}

/// Reads the 16-bit pointer at direct page offset `offset`. With an
/// emulation-mode, page-aligned D the pointer's high byte wraps inside the
/// direct page; otherwise it wraps within bank 0.
fn direct_pointer<B: CpuBus>(
    regs: &Registers,
    bus: &mut B,
    page_wrap: bool,
    offset: u32,
) -> Result<u16, BusError> {
    if page_wrap {
        let slot = EffectiveAddress::page_wrapped((regs.dp as u32) | (offset & 0xFF));
        let lo = bus.read_u8(slot.byte(0))? as u16;
        let hi = bus.read_u8(slot.byte(1))? as u16;
        Ok((hi << 8) | lo)
    } else {
        bus.read_u16_bank_wrap(0, regs.dp.wrapping_add(offset as u16))
    }
}

/// Computes the effective address for `mode`. `regs.pc` must already point
/// past the instruction; indirect modes read their pointers through `bus`.
pub fn resolve<B: CpuBus>(
    regs: &Registers,
    bus: &mut B,
    mode: AddressingMode,
    raw: u32,
) -> Result<Operand, BusError> {
    use AddressingMode::*;

    let dp_page_wrap = regs.emulation && regs.dp & 0xFF == 0;
    let direct = |offset: u32| regs.dp.wrapping_add(offset as u16);

    let operand = match mode {
        Implied | Accumulator | Immediate | ImmediateM | ImmediateX | BlockMove => {
            Operand::immediate(raw)
        }
        Absolute => Operand::at(raw, EffectiveAddress::address_wrapped(data_bank(regs, raw as u16))),
        AbsoluteX => Operand::indexed(raw, data_bank(regs, raw as u16), regs.x),
        AbsoluteY => Operand::indexed(raw, data_bank(regs, raw as u16), regs.y),
        AbsoluteLong => Operand::at(raw, EffectiveAddress::address_wrapped(raw)),
        AbsoluteLongX => Operand {
            page_crossed: false,
            ..Operand::indexed(raw, raw, regs.x)
        },
        DirectPage => Operand::at(raw, EffectiveAddress::bank_wrapped(0, direct(raw))),
        DirectPageX | DirectPageY => {
            let index = if mode == DirectPageX { regs.x } else { regs.y };
            let ea = if dp_page_wrap {
                EffectiveAddress::page_wrapped(
                    (regs.dp as u32) | (raw.wrapping_add(index as u32) & 0xFF),
                )
            } else {
                EffectiveAddress::bank_wrapped(0, direct(raw).wrapping_add(index))
            };
            Operand::at(raw, ea)
        }
        DirectPageIndirect => {
            let ptr = direct_pointer(regs, bus, dp_page_wrap, raw)?;
            Operand::at(raw, EffectiveAddress::address_wrapped(data_bank(regs, ptr)))
        }
        DirectPageIndexedIndirect => {
            let ptr = direct_pointer(regs, bus, dp_page_wrap, raw.wrapping_add(regs.x as u32))?;
            Operand::at(raw, EffectiveAddress::address_wrapped(data_bank(regs, ptr)))
        }
        DirectPageIndirectIndexed => {
            let ptr = direct_pointer(regs, bus, dp_page_wrap, raw)?;
            Operand::indexed(raw, data_bank(regs, ptr), regs.y)
        }
        DirectPageIndirectLong => {
            let ptr = bus.read_u24_bank_wrap(0, direct(raw))?;
            Operand::at(raw, EffectiveAddress::address_wrapped(ptr))
        }
        DirectPageIndirectLongIndexed => {
            let ptr = bus.read_u24_bank_wrap(0, direct(raw))?;
            Operand {
                page_crossed: false,
                ..Operand::indexed(raw, ptr, regs.y)
            }
        }
        StackRelative => Operand::at(
            raw,
            EffectiveAddress::bank_wrapped(0, regs.sp.wrapping_add(raw as u16)),
        ),
        StackRelativeIndirectIndexed => {
            let ptr = bus.read_u16_bank_wrap(0, regs.sp.wrapping_add(raw as u16))?;
            Operand {
                page_crossed: false,
                ..Operand::indexed(raw, data_bank(regs, ptr), regs.y)
            }
        }
        Relative => {
            let target = regs.pc.wrapping_add(raw as u8 as i8 as u16);
            Operand {
                raw,
                ea: Some(EffectiveAddress::bank_wrapped(regs.pb, target)),
                page_crossed: regs.pc & 0xFF00 != target & 0xFF00,
            }
        }
        RelativeLong => {
            let target = regs.pc.wrapping_add(raw as u16);
            Operand::at(raw, EffectiveAddress::bank_wrapped(regs.pb, target))
        }
        AbsoluteIndirect => {
            let target = bus.read_u16_bank_wrap(0, raw as u16)?;
            Operand::at(raw, EffectiveAddress::bank_wrapped(regs.pb, target))
        }
        AbsoluteIndexedIndirect => {
            let slot = (raw as u16).wrapping_add(regs.x);
            let target = bus.read_u16_bank_wrap(regs.pb, slot)?;
            Operand::at(raw, EffectiveAddress::bank_wrapped(regs.pb, target))
        }
        AbsoluteIndirectLong => {
            let target = bus.read_u24_bank_wrap(0, raw as u16)?;
            Operand::at(raw, EffectiveAddress::address_wrapped(target))
        }
    };
    Ok(operand)
}
