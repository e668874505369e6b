//! Static 256-entry instruction table.
//!
//! Cycle counts are the 8-bit / emulation-mode figures; [`CycleRule`] says
//! which run-time adjustments apply on top.

use bitflags::bitflags;

use super::addressing::AddressingMode;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CycleRule: u8 {
        /// +1 with a 16-bit accumulator/memory.
        const M16 = 0x01;
        /// +2 with a 16-bit accumulator/memory (read-modify-write).
        const RMW16 = 0x02;
        /// +1 with 16-bit index registers.
        const X16 = 0x04;
        /// +1 when the direct page register's low byte is non-zero.
        const DL = 0x08;
        /// +1 when indexing crosses a page or the index registers are 16-bit.
        const INDEX = 0x10;
        /// +1 in native mode.
        const NATIVE = 0x20;
        /// +1 when taken, +1 more for a page cross in emulation mode.
        const BRANCH = 0x40;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mnemonic {
    Adc,
    And,
    Asl,
    Bcc,
    Bcs,
    Beq,
    Bit,
    Bmi,
    Bne,
    Bpl,
    Bra,
    Brk,
    Brl,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Cli,
    Clv,
    Cmp,
    Cop,
    Cpx,
    Cpy,
    Dec,
    Dex,
    Dey,
    Eor,
    Inc,
    Inx,
    Iny,
    Jml,
    Jmp,
    Jsl,
    Jsr,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    Mvn,
    Mvp,
    Nop,
    Ora,
    Pea,
    Pei,
    Per,
    Pha,
    Phb,
    Phd,
    Phk,
    Php,
    Phx,
    Phy,
    Pla,
    Plb,
    Pld,
    Plp,
    Plx,
    Ply,
    Rep,
    Rol,
    Ror,
    Rti,
    Rtl,
    Rts,
    Sbc,
    Sec,
    Sed,
    Sei,
    Sep,
    Sta,
    Stp,
    Stx,
    Sty,
    Stz,
    Tax,
    Tay,
    Tcd,
    Tcs,
    Tdc,
    Trb,
    Tsb,
    Tsc,
    Tsx,
    Txa,
    Txs,
    Txy,
    Tya,
    Tyx,
    Wai,
    Wdm,
    Xba,
    Xce,
}

impl Mnemonic {
    pub fn as_str(self) -> &'static str {
        use Mnemonic::*;
        match self {
            Adc => "ADC",
            And => "AND",
            Asl => "ASL",
            Bcc => "BCC",
            Bcs => "BCS",
            Beq => "BEQ",
            Bit => "BIT",
            Bmi => "BMI",
            Bne => "BNE",
            Bpl => "BPL",
            Bra => "BRA",
            Brk => "BRK",
            Brl => "BRL",
            Bvc => "BVC",
            Bvs => "BVS",
            Clc => "CLC",
            Cld => "CLD",
            Cli => "CLI",
            Clv => "CLV",
            Cmp => "CMP",
            Cop => "COP",
            Cpx => "CPX",
            Cpy => "CPY",
            Dec => "DEC",
            Dex => "DEX",
            Dey => "DEY",
            Eor => "EOR",
            Inc => "INC",
            Inx => "INX",
            Iny => "INY",
            Jml => "JML",
            Jmp => "JMP",
            Jsl => "JSL",
            Jsr => "JSR",
            Lda => "LDA",
            Ldx => "LDX",
            Ldy => "LDY",
            Lsr => "LSR",
            Mvn => "MVN",
            Mvp => "MVP",
            Nop => "NOP",
            Ora => "ORA",
            Pea => "PEA",
            Pei => "PEI",
            Per => "PER",
            Pha => "PHA",
            Phb => "PHB",
            Phd => "PHD",
            Phk => "PHK",
            Php => "PHP",
            Phx => "PHX",
            Phy => "PHY",
            Pla => "PLA",
            Plb => "PLB",
            Pld => "PLD",
            Plp => "PLP",
            Plx => "PLX",
            Ply => "PLY",
            Rep => "REP",
            Rol => "ROL",
            Ror => "ROR",
            Rti => "RTI",
            Rtl => "RTL",
            Rts => "RTS",
            Sbc => "SBC",
            Sec => "SEC",
            Sed => "SED",
            Sei => "SEI",
            Sep => "SEP",
            Sta => "STA",
            Stp => "STP",
            Stx => "STX",
            Sty => "STY",
            Stz => "STZ",
            Tax => "TAX",
            Tay => "TAY",
            Tcd => "TCD",
            Tcs => "TCS",
            Tdc => "TDC",
            Trb => "TRB",
            Tsb => "TSB",
            Tsc => "TSC",
            Tsx => "TSX",
            Txa => "TXA",
            Txs => "TXS",
            Txy => "TXY",
            Tya => "TYA",
            Tyx => "TYX",
            Wai => "WAI",
            Wdm => "WDM",
            Xba => "XBA",
            Xce => "XCE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub code: u8,
    pub mnemonic: Mnemonic,
    pub mode: AddressingMode,
    pub cycles: u8,
    pub rule: CycleRule,
}

impl Opcode {
    /// Instruction length in bytes under the given register widths.
    pub fn len(&self, m8: bool, x8: bool) -> usize {
        1 + self.mode.operand_len(m8, x8)
    }

    /// Length in the 8-bit register form.
    pub fn base_len(&self) -> usize {
        self.len(true, true)
    }
}

#[inline]
pub fn lookup(code: u8) -> &'static Opcode {
    &OPCODES[code as usize]
}

const NONE: u8 = 0;
const M16: u8 = CycleRule::M16.bits();
const RMW16: u8 = CycleRule::RMW16.bits();
const X16: u8 = CycleRule::X16.bits();
const DL: u8 = CycleRule::DL.bits();
const INDEX: u8 = CycleRule::INDEX.bits();
const NATIVE: u8 = CycleRule::NATIVE.bits();
const BRANCH: u8 = CycleRule::BRANCH.bits();

const fn op(code: u8, mnemonic: Mnemonic, mode: AddressingMode, cycles: u8, rule: u8) -> Opcode {
    Opcode {
        code,
        mnemonic,
        mode,
        cycles,
        rule: CycleRule::from_bits_retain(rule),
    }
}

use AddressingMode::*;
use Mnemonic::*;

pub static OPCODES: [Opcode; 256] = [
    op(0x00, Brk, Immediate, 7, NATIVE),
    op(0x01, Ora, DirectPageIndexedIndirect, 6, M16 | DL),
    op(0x02, Cop, Immediate, 7, NATIVE),
    op(0x03, Ora, StackRelative, 4, M16),
    op(0x04, Tsb, DirectPage, 5, RMW16 | DL),
    op(0x05, Ora, DirectPage, 3, M16 | DL),
    op(0x06, Asl, DirectPage, 5, RMW16 | DL),
    op(0x07, Ora, DirectPageIndirectLong, 6, M16 | DL),
    op(0x08, Php, Implied, 3, NONE),
    op(0x09, Ora, ImmediateM, 2, M16),
    op(0x0A, Asl, Accumulator, 2, NONE),
    op(0x0B, Phd, Implied, 4, NONE),
    op(0x0C, Tsb, Absolute, 6, RMW16),
    op(0x0D, Ora, Absolute, 4, M16),
    op(0x0E, Asl, Absolute, 6, RMW16),
    op(0x0F, Ora, AbsoluteLong, 5, M16),
    op(0x10, Bpl, Relative, 2, BRANCH),
    op(0x11, Ora, DirectPageIndirectIndexed, 5, M16 | DL | INDEX),
    op(0x12, Ora, DirectPageIndirect, 5, M16 | DL),
    op(0x13, Ora, StackRelativeIndirectIndexed, 7, M16),
    op(0x14, Trb, DirectPage, 5, RMW16 | DL),
    op(0x15, Ora, DirectPageX, 4, M16 | DL),
    op(0x16, Asl, DirectPageX, 6, RMW16 | DL),
    op(0x17, Ora, DirectPageIndirectLongIndexed, 6, M16 | DL),
    op(0x18, Clc, Implied, 2, NONE),
    op(0x19, Ora, AbsoluteY, 4, M16 | INDEX),
    op(0x1A, Inc, Accumulator, 2, NONE),
    op(0x1B, Tcs, Implied, 2, NONE),
    op(0x1C, Trb, Absolute, 6, RMW16),
    op(0x1D, Ora, AbsoluteX, 4, M16 | INDEX),
    op(0x1E, Asl, AbsoluteX, 7, RMW16),
    op(0x1F, Ora, AbsoluteLongX, 5, M16),
    op(0x20, Jsr, Absolute, 6, NONE),
    op(0x21, And, DirectPageIndexedIndirect, 6, M16 | DL),
    op(0x22, Jsl, AbsoluteLong, 8, NONE),
    op(0x23, And, StackRelative, 4, M16),
    op(0x24, Bit, DirectPage, 3, M16 | DL),
    op(0x25, And, DirectPage, 3, M16 | DL),
    op(0x26, Rol, DirectPage, 5, RMW16 | DL),
    op(0x27, And, DirectPageIndirectLong, 6, M16 | DL),
    op(0x28, Plp, Implied, 4, NONE),
    op(0x29, And, ImmediateM, 2, M16),
    op(0x2A, Rol, Accumulator, 2, NONE),
    op(0x2B, Pld, Implied, 5, NONE),
    op(0x2C, Bit, Absolute, 4, M16),
    op(0x2D, And, Absolute, 4, M16),
    op(0x2E, Rol, Absolute, 6, RMW16),
    op(0x2F, And, AbsoluteLong, 5, M16),
    op(0x30, Bmi, Relative, 2, BRANCH),
    op(0x31, And, DirectPageIndirectIndexed, 5, M16 | DL | INDEX),
    op(0x32, And, DirectPageIndirect, 5, M16 | DL),
    op(0x33, And, StackRelativeIndirectIndexed, 7, M16),
    op(0x34, Bit, DirectPageX, 4, M16 | DL),
    op(0x35, And, DirectPageX, 4, M16 | DL),
    op(0x36, Rol, DirectPageX, 6, RMW16 | DL),
    op(0x37, And, DirectPageIndirectLongIndexed, 6, M16 | DL),
    op(0x38, Sec, Implied, 2, NONE),
    op(0x39, And, AbsoluteY, 4, M16 | INDEX),
    op(0x3A, Dec, Accumulator, 2, NONE),
    op(0x3B, Tsc, Implied, 2, NONE),
    op(0x3C, Bit, AbsoluteX, 4, M16 | INDEX),
    op(0x3D, And, AbsoluteX, 4, M16 | INDEX),
    op(0x3E, Rol, AbsoluteX, 7, RMW16),
    op(0x3F, And, AbsoluteLongX, 5, M16),
    op(0x40, Rti, Implied, 6, NATIVE),
    op(0x41, Eor, DirectPageIndexedIndirect, 6, M16 | DL),
    op(0x42, Wdm, Immediate, 2, NONE),
    op(0x43, Eor, StackRelative, 4, M16),
    op(0x44, Mvp, BlockMove, 7, NONE),
    op(0x45, Eor, DirectPage, 3, M16 | DL),
    op(0x46, Lsr, DirectPage, 5, RMW16 | DL),
    op(0x47, Eor, DirectPageIndirectLong, 6, M16 | DL),
    op(0x48, Pha, Implied, 3, M16),
    op(0x49, Eor, ImmediateM, 2, M16),
    op(0x4A, Lsr, Accumulator, 2, NONE),
    op(0x4B, Phk, Implied, 3, NONE),
    op(0x4C, Jmp, Absolute, 3, NONE),
    op(0x4D, Eor, Absolute, 4, M16),
    op(0x4E, Lsr, Absolute, 6, RMW16),
    op(0x4F, Eor, AbsoluteLong, 5, M16),
    op(0x50, Bvc, Relative, 2, BRANCH),
    op(0x51, Eor, DirectPageIndirectIndexed, 5, M16 | DL | INDEX),
    op(0x52, Eor, DirectPageIndirect, 5, M16 | DL),
    op(0x53, Eor, StackRelativeIndirectIndexed, 7, M16),
    op(0x54, Mvn, BlockMove, 7, NONE),
    op(0x55, Eor, DirectPageX, 4, M16 | DL),
    op(0x56, Lsr, DirectPageX, 6, RMW16 | DL),
    op(0x57, Eor, DirectPageIndirectLongIndexed, 6, M16 | DL),
    op(0x58, Cli, Implied, 2, NONE),
    op(0x59, Eor, AbsoluteY, 4, M16 | INDEX),
    op(0x5A, Phy, Implied, 3, X16),
    op(0x5B, Tcd, Implied, 2, NONE),
    op(0x5C, Jml, AbsoluteLong, 4, NONE),
    op(0x5D, Eor, AbsoluteX, 4, M16 | INDEX),
    op(0x5E, Lsr, AbsoluteX, 7, RMW16),
    op(0x5F, Eor, AbsoluteLongX, 5, M16),
    op(0x60, Rts, Implied, 6, NONE),
    op(0x61, Adc, DirectPageIndexedIndirect, 6, M16 | DL),
    op(0x62, Per, RelativeLong, 6, NONE),
    op(0x63, Adc, StackRelative, 4, M16),
    op(0x64, Stz, DirectPage, 3, M16 | DL),
    op(0x65, Adc, DirectPage, 3, M16 | DL),
    op(0x66, Ror, DirectPage, 5, RMW16 | DL),
    op(0x67, Adc, DirectPageIndirectLong, 6, M16 | DL),
    op(0x68, Pla, Implied, 4, M16),
    op(0x69, Adc, ImmediateM, 2, M16),
    op(0x6A, Ror, Accumulator, 2, NONE),
    op(0x6B, Rtl, Implied, 6, NONE),
    op(0x6C, Jmp, AbsoluteIndirect, 5, NONE),
    op(0x6D, Adc, Absolute, 4, M16),
    op(0x6E, Ror, Absolute, 6, RMW16),
    op(0x6F, Adc, AbsoluteLong, 5, M16),
    op(0x70, Bvs, Relative, 2, BRANCH),
    op(0x71, Adc, DirectPageIndirectIndexed, 5, M16 | DL | INDEX),
    op(0x72, Adc, DirectPageIndirect, 5, M16 | DL),
    op(0x73, Adc, StackRelativeIndirectIndexed, 7, M16),
    op(0x74, Stz, DirectPageX, 4, M16 | DL),
    op(0x75, Adc, DirectPageX, 4, M16 | DL),
    op(0x76, Ror, DirectPageX, 6, RMW16 | DL),
    op(0x77, Adc, DirectPageIndirectLongIndexed, 6, M16 | DL),
    op(0x78, Sei, Implied, 2, NONE),
    op(0x79, Adc, AbsoluteY, 4, M16 | INDEX),
    op(0x7A, Ply, Implied, 4, X16),
    op(0x7B, Tdc, Implied, 2, NONE),
    op(0x7C, Jmp, AbsoluteIndexedIndirect, 6, NONE),
    op(0x7D, Adc, AbsoluteX, 4, M16 | INDEX),
    op(0x7E, Ror, AbsoluteX, 7, RMW16),
    op(0x7F, Adc, AbsoluteLongX, 5, M16),
    op(0x80, Bra, Relative, 2, BRANCH),
    op(0x81, Sta, DirectPageIndexedIndirect, 6, M16 | DL),
    op(0x82, Brl, RelativeLong, 4, NONE),
    op(0x83, Sta, StackRelative, 4, M16),
    op(0x84, Sty, DirectPage, 3, X16 | DL),
    op(0x85, Sta, DirectPage, 3, M16 | DL),
    op(0x86, Stx, DirectPage, 3, X16 | DL),
    op(0x87, Sta, DirectPageIndirectLong, 6, M16 | DL),
    op(0x88, Dey, Implied, 2, NONE),
    op(0x89, Bit, ImmediateM, 2, M16),
    op(0x8A, Txa, Implied, 2, NONE),
    op(0x8B, Phb, Implied, 3, NONE),
    op(0x8C, Sty, Absolute, 4, X16),
    op(0x8D, Sta, Absolute, 4, M16),
    op(0x8E, Stx, Absolute, 4, X16),
    op(0x8F, Sta, AbsoluteLong, 5, M16),
    op(0x90, Bcc, Relative, 2, BRANCH),
    op(0x91, Sta, DirectPageIndirectIndexed, 6, M16 | DL),
    op(0x92, Sta, DirectPageIndirect, 5, M16 | DL),
    op(0x93, Sta, StackRelativeIndirectIndexed, 7, M16),
    op(0x94, Sty, DirectPageX, 4, X16 | DL),
    op(0x95, Sta, DirectPageX, 4, M16 | DL),
    op(0x96, Stx, DirectPageY, 4, X16 | DL),
    op(0x97, Sta, DirectPageIndirectLongIndexed, 6, M16 | DL),
    op(0x98, Tya, Implied, 2, NONE),
    op(0x99, Sta, AbsoluteY, 5, M16),
    op(0x9A, Txs, Implied, 2, NONE),
    op(0x9B, Txy, Implied, 2, NONE),
    op(0x9C, Stz, Absolute, 4, M16),
    op(0x9D, Sta, AbsoluteX, 5, M16),
    op(0x9E, Stz, AbsoluteX, 5, M16),
    op(0x9F, Sta, AbsoluteLongX, 5, M16),
    op(0xA0, Ldy, ImmediateX, 2, X16),
    op(0xA1, Lda, DirectPageIndexedIndirect, 6, M16 | DL),
    op(0xA2, Ldx, ImmediateX, 2, X16),
    op(0xA3, Lda, StackRelative, 4, M16),
    op(0xA4, Ldy, DirectPage, 3, X16 | DL),
    op(0xA5, Lda, DirectPage, 3, M16 | DL),
    op(0xA6, Ldx, DirectPage, 3, X16 | DL),
    op(0xA7, Lda, DirectPageIndirectLong, 6, M16 | DL),
    op(0xA8, Tay, Implied, 2, NONE),
    op(0xA9, Lda, ImmediateM, 2, M16),
    op(0xAA, Tax, Implied, 2, NONE),
    op(0xAB, Plb, Implied, 4, NONE),
    op(0xAC, Ldy, Absolute, 4, X16),
    op(0xAD, Lda, Absolute, 4, M16),
    op(0xAE, Ldx, Absolute, 4, X16),
    op(0xAF, Lda, AbsoluteLong, 5, M16),
    op(0xB0, Bcs, Relative, 2, BRANCH),
    op(0xB1, Lda, DirectPageIndirectIndexed, 5, M16 | DL | INDEX),
    op(0xB2, Lda, DirectPageIndirect, 5, M16 | DL),
    op(0xB3, Lda, StackRelativeIndirectIndexed, 7, M16),
    op(0xB4, Ldy, DirectPageX, 4, X16 | DL),
    op(0xB5, Lda, DirectPageX, 4, M16 | DL),
    op(0xB6, Ldx, DirectPageY, 4, X16 | DL),
    op(0xB7, Lda, DirectPageIndirectLongIndexed, 6, M16 | DL),
    op(0xB8, Clv, Implied, 2, NONE),
    op(0xB9, Lda, AbsoluteY, 4, M16 | INDEX),
    op(0xBA, Tsx, Implied, 2, NONE),
    op(0xBB, Tyx, Implied, 2, NONE),
    op(0xBC, Ldy, AbsoluteX, 4, X16 | INDEX),
    op(0xBD, Lda, AbsoluteX, 4, M16 | INDEX),
    op(0xBE, Ldx, AbsoluteY, 4, X16 | INDEX),
    op(0xBF, Lda, AbsoluteLongX, 5, M16),
    op(0xC0, Cpy, ImmediateX, 2, X16),
    op(0xC1, Cmp, DirectPageIndexedIndirect, 6, M16 | DL),
    op(0xC2, Rep, Immediate, 3, NONE),
    op(0xC3, Cmp, StackRelative, 4, M16),
    op(0xC4, Cpy, DirectPage, 3, X16 | DL),
    op(0xC5, Cmp, DirectPage, 3, M16 | DL),
    op(0xC6, Dec, DirectPage, 5, RMW16 | DL),
    op(0xC7, Cmp, DirectPageIndirectLong, 6, M16 | DL),
    op(0xC8, Iny, Implied, 2, NONE),
    op(0xC9, Cmp, ImmediateM, 2, M16),
    op(0xCA, Dex, Implied, 2, NONE),
    op(0xCB, Wai, Implied, 3, NONE),
    op(0xCC, Cpy, Absolute, 4, X16),
    op(0xCD, Cmp, Absolute, 4, M16),
    op(0xCE, Dec, Absolute, 6, RMW16),
    op(0xCF, Cmp, AbsoluteLong, 5, M16),
    op(0xD0, Bne, Relative, 2, BRANCH),
    op(0xD1, Cmp, DirectPageIndirectIndexed, 5, M16 | DL | INDEX),
    op(0xD2, Cmp, DirectPageIndirect, 5, M16 | DL),
    op(0xD3, Cmp, StackRelativeIndirectIndexed, 7, M16),
    op(0xD4, Pei, DirectPageIndirect, 6, DL),
    op(0xD5, Cmp, DirectPageX, 4, M16 | DL),
    op(0xD6, Dec, DirectPageX, 6, RMW16 | DL),
    op(0xD7, Cmp, DirectPageIndirectLongIndexed, 6, M16 | DL),
    op(0xD8, Cld, Implied, 2, NONE),
    op(0xD9, Cmp, AbsoluteY, 4, M16 | INDEX),
    op(0xDA, Phx, Implied, 3, X16),
    op(0xDB, Stp, Implied, 3, NONE),
    op(0xDC, Jml, AbsoluteIndirectLong, 6, NONE),
    op(0xDD, Cmp, AbsoluteX, 4, M16 | INDEX),
    op(0xDE, Dec, AbsoluteX, 7, RMW16),
    op(0xDF, Cmp, AbsoluteLongX, 5, M16),
    op(0xE0, Cpx, ImmediateX, 2, X16),
    op(0xE1, Sbc, DirectPageIndexedIndirect, 6, M16 | DL),
    op(0xE2, Sep, Immediate, 3, NONE),
    op(0xE3, Sbc, StackRelative, 4, M16),
    op(0xE4, Cpx, DirectPage, 3, X16 | DL),
    op(0xE5, Sbc, DirectPage, 3, M16 | DL),
    op(0xE6, Inc, DirectPage, 5, RMW16 | DL),
    op(0xE7, Sbc, DirectPageIndirectLong, 6, M16 | DL),
    op(0xE8, Inx, Implied, 2, NONE),
    op(0xE9, Sbc, ImmediateM, 2, M16),
    op(0xEA, Nop, Implied, 2, NONE),
    op(0xEB, Xba, Implied, 3, NONE),
    op(0xEC, Cpx, Absolute, 4, X16),
    op(0xED, Sbc, Absolute, 4, M16),
    op(0xEE, Inc, Absolute, 6, RMW16),
    op(0xEF, Sbc, AbsoluteLong, 5, M16),
    op(0xF0, Beq, Relative, 2, BRANCH),
    op(0xF1, Sbc, DirectPageIndirectIndexed, 5, M16 | DL | INDEX),
    op(0xF2, Sbc, DirectPageIndirect, 5, M16 | DL),
    op(0xF3, Sbc, StackRelativeIndirectIndexed, 7, M16),
    op(0xF4, Pea, Absolute, 5, NONE),
    op(0xF5, Sbc, DirectPageX, 4, M16 | DL),
    op(0xF6, Inc, DirectPageX, 6, RMW16 | DL),
    op(0xF7, Sbc, DirectPageIndirectLongIndexed, 6, M16 | DL),
    op(0xF8, Sed, Implied, 2, NONE),
    op(0xF9, Sbc, AbsoluteY, 4, M16 | INDEX),
    op(0xFA, Plx, Implied, 4, X16),
    op(0xFB, Xce, Implied, 2, NONE),
    op(0xFC, Jsr, AbsoluteIndexedIndirect, 8, NONE),
    op(0xFD, Sbc, AbsoluteX, 4, M16 | INDEX),
    op(0xFE, Inc, AbsoluteX, 7, RMW16),
    op(0xFF, Sbc, AbsoluteLongX, 5, M16),
];
