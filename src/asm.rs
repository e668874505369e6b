//! Label-resolving 65816 byte emitter.
//!
//! Used to build test programs and patches. The emitter tracks what it
//! believes the E, M and X flags to be and refuses to encode an immediate
//! whose width does not match, using the same operand-length rule the CPU
//! decodes with. `sep`/`rep` update M and X; `xce` updates E when the carry
//! is known from a preceding `clc` or `sec`. The `assume_*` calls set the
//! tracked state without emitting anything.
//!
//! Branches and jumps to labels are recorded as dangling references and
//! patched by [`Emitter::finalize`]. Every emitted item is also kept as a
//! listing line for [`Emitter::write_hex_to`].

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::io;

use crate::cpu::{lookup, AddressingMode};
use crate::disasm::{self, Decoded};

#[cfg(test)]
mod tests;

pub const FLAG_X: u8 = 0x10;
pub const FLAG_M: u8 = 0x20;

const OP_CLC: u8 = 0x18;
const OP_SEC: u8 = 0x38;
const OP_REP: u8 = 0xC2;
const OP_SEP: u8 = 0xE2;
const OP_XCE: u8 = 0xFB;

// Four "0x00," columns, so comments line up.
const LISTING_BYTES_WIDTH: usize = 23;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    /// Immediate width disagrees with the tracked M or X flag.
    WidthMismatch {
        opcode: u8,
        flag: char,
        flag_is_16bit: bool,
        /// The flag reads as 8-bit because the emitter is in emulation mode.
        emulation: bool,
    },
    OperandSize {
        opcode: u8,
        expected: usize,
        got: usize,
    },
    DuplicateLabel {
        name: String,
        addr: u32,
    },
    UnresolvedLabel(String),
    BranchOutOfRange {
        from: u32,
        to: u32,
        diff: i64,
    },
    OutOfSpace {
        capacity: usize,
    },
    /// `append` of an emitter that does not start where this one ends.
    Discontiguous {
        expected: u32,
        got: u32,
    },
}

impl fmt::Display for AsmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsmError::WidthMismatch {
                opcode,
                flag,
                emulation: true,
                ..
            } => write!(
                f,
                "asm: {} #imm does not match '{}' flag, which is 8-bit in emulation mode; call clc() and xce() or assume_native() first",
                lookup(*opcode).mnemonic.as_str(),
                flag
            ),
            AsmError::WidthMismatch {
                opcode,
                flag,
                flag_is_16bit,
                ..
            } => {
                let name = lookup(*opcode).mnemonic.as_str();
                let (width, fix) = if *flag_is_16bit {
                    (16, "sep")
                } else {
                    (8, "rep")
                };
                let mask = if *flag == 'm' { FLAG_M } else { FLAG_X };
                write!(
                    f,
                    "asm: {} #imm does not match '{}' flag, which is {}-bit; call {}(0x{:02x}) or assume_{}(0x{:02x}) first",
                    name, flag, width, fix, mask, fix, mask
                )
            }
            AsmError::OperandSize {
                opcode,
                expected,
                got,
            } => write!(
                f,
                "asm: opcode {:02x} takes {} operand bytes, got {}",
                opcode, expected, got
            ),
            AsmError::DuplicateLabel { name, addr } => {
                write!(f, "label '{}' already defined at 0x{:06x}", name, addr)
            }
            AsmError::UnresolvedLabel(name) => write!(f, "could not resolve label '{}'", name),
            AsmError::BranchOutOfRange { from, to, diff } => write!(
                f,
                "branch from 0x{:06x} to 0x{:06x} too far for signed 8-bit; diff={}",
                from, to, diff
            ),
            AsmError::OutOfSpace { capacity } => {
                write!(f, "not enough space (capacity {} bytes)", capacity)
            }
            AsmError::Discontiguous { expected, got } => write!(
                f,
                "cannot append code based at 0x{:06x}; expected 0x{:06x}",
                got, expected
            ),
        }
    }
}

impl std::error::Error for AsmError {}

pub type Result<T> = std::result::Result<T, AsmError>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    Base(u32),
    Comment(String),
    Label(String),
    Data {
        addr: u32,
        len: usize,
    },
    Ins {
        addr: u32,
        len: usize,
        // label the operand is patched from
        target: Option<String>,
    },
}

#[derive(Debug, Clone)]
pub struct Emitter {
    code: Vec<u8>,
    capacity: Option<usize>,
    base: u32,
    address: u32,
    emulation: bool,
    m8: bool,
    x8: bool,
    // None once anything but CLC/SEC may have changed it
    carry: Option<bool>,
    lines: Vec<Line>,
    labels: HashMap<String, u32>,
    // label -> addresses of the operand bytes to patch
    dangling_rel8: BTreeMap<String, Vec<u32>>,
    dangling_abs16: BTreeMap<String, Vec<u32>>,
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! implied {
    ($($name:ident => $opcode:expr),* $(,)?) => {
        $(
            pub fn $name(&mut self) -> Result<()> {
                self.ins($opcode, &[])
            }
        )*
    };
}

macro_rules! branch {
    ($($name:ident, $imm:ident => $opcode:expr),* $(,)?) => {
        $(
            pub fn $name(&mut self, label: &str) -> Result<()> {
                self.branch_to(label, $opcode)
            }

            pub fn $imm(&mut self, offset: i8) -> Result<()> {
                self.ins($opcode, &[offset as u8])
            }
        )*
    };
}

impl Emitter {
    /// Starts at address 0 in emulation mode with 8-bit M and X, the reset
    /// state.
    pub fn new() -> Self {
        Self {
            code: Vec::new(),
            capacity: None,
            base: 0,
            address: 0,
            emulation: true,
            m8: true,
            x8: true,
            carry: None,
            lines: Vec::new(),
            labels: HashMap::new(),
            dangling_rel8: BTreeMap::new(),
            dangling_abs16: BTreeMap::new(),
        }
    }

    /// An emitter whose output may not grow past `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            code: Vec::with_capacity(capacity),
            capacity: Some(capacity),
            ..Self::new()
        }
    }

    /// An empty emitter that continues where this one ends: same address,
    /// flags and labels, and whatever capacity is left. Its output can be
    /// merged back with [`Emitter::append`].
    pub fn fork(&self) -> Self {
        Self {
            code: Vec::new(),
            capacity: self.capacity.map(|c| c.saturating_sub(self.code.len())),
            base: self.address,
            address: self.address,
            emulation: self.emulation,
            m8: self.m8,
            x8: self.x8,
            carry: self.carry,
            lines: Vec::new(),
            labels: self.labels.clone(),
            dangling_rel8: BTreeMap::new(),
            dangling_abs16: BTreeMap::new(),
        }
    }

    /// Sets the address the next byte will be assembled at. Only valid
    /// before anything has been emitted.
    pub fn set_base(&mut self, addr: u32) {
        self.base = addr;
        self.address = addr;
        self.lines.push(Line::Base(addr));
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    /// Address of the next emitted byte.
    pub fn pc(&self) -> u32 {
        self.address
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.code
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.code
    }

    pub fn is_emulation(&self) -> bool {
        self.emulation
    }

    // Widths as the CPU will see them; emulation forces both to 8 bits.
    fn m8(&self) -> bool {
        self.emulation || self.m8
    }

    fn x8(&self) -> bool {
        self.emulation || self.x8
    }

    pub fn is_m16(&self) -> bool {
        !self.m8()
    }

    pub fn is_x16(&self) -> bool {
        !self.x8()
    }

    pub fn assume_sep(&mut self, mask: u8) {
        if mask & FLAG_M != 0 {
            self.m8 = true;
        }
        if mask & FLAG_X != 0 {
            self.x8 = true;
        }
    }

    pub fn assume_rep(&mut self, mask: u8) {
        if mask & FLAG_M != 0 {
            self.m8 = false;
        }
        if mask & FLAG_X != 0 {
            self.x8 = false;
        }
    }

    /// Treats the following code as running in native mode. M and X keep
    /// the 8-bit setting emulation mode left them in.
    pub fn assume_native(&mut self) {
        self.set_emulation(false);
    }

    pub fn assume_emulation(&mut self) {
        self.set_emulation(true);
    }

    // XCE in either direction leaves M and X set.
    fn set_emulation(&mut self, emulation: bool) {
        self.emulation = emulation;
        self.m8 = true;
        self.x8 = true;
    }

    // Updates the tracked flags after `opcode` was emitted.
    fn track(&mut self, opcode: u8, operand: &[u8]) {
        let mask = operand.first().copied().unwrap_or(0);
        match opcode {
            OP_CLC => self.carry = Some(false),
            OP_SEC => self.carry = Some(true),
            OP_REP => {
                self.assume_rep(mask);
                self.carry = if mask & 0x01 != 0 { Some(false) } else { self.carry };
            }
            OP_SEP => {
                self.assume_sep(mask);
                self.carry = if mask & 0x01 != 0 { Some(true) } else { self.carry };
            }
            // With an unknown carry the mode stays as it was; follow up with
            // assume_native or assume_emulation.
            OP_XCE => {
                if let Some(carry) = self.carry {
                    self.carry = Some(self.emulation);
                    self.set_emulation(carry);
                }
            }
            _ => self.carry = None,
        }
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        if let Some(capacity) = self.capacity {
            if self.code.len() + bytes.len() > capacity {
                return Err(AsmError::OutOfSpace { capacity });
            }
        }
        self.code.extend_from_slice(bytes);
        self.address = self.address.wrapping_add(bytes.len() as u32);
        Ok(())
    }

    /// Emits `opcode` followed by `operand`, which must be exactly as long
    /// as the CPU will decode it under the tracked flags.
    pub fn ins(&mut self, opcode: u8, operand: &[u8]) -> Result<()> {
        let mode = lookup(opcode).mode;
        let (m8, x8) = (self.m8(), self.x8());
        let expected = mode.operand_len(m8, x8);
        if operand.len() != expected {
            return Err(match mode {
                AddressingMode::ImmediateM => AsmError::WidthMismatch {
                    opcode,
                    flag: 'm',
                    flag_is_16bit: !m8,
                    emulation: self.emulation,
                },
                AddressingMode::ImmediateX => AsmError::WidthMismatch {
                    opcode,
                    flag: 'x',
                    flag_is_16bit: !x8,
                    emulation: self.emulation,
                },
                _ => AsmError::OperandSize {
                    opcode,
                    expected,
                    got: operand.len(),
                },
            });
        }
        let addr = self.address;
        let mut buf = [0u8; 4];
        buf[0] = opcode;
        buf[1..=operand.len()].copy_from_slice(operand);
        self.write(&buf[..=operand.len()])?;
        self.lines.push(Line::Ins {
            addr,
            len: operand.len() + 1,
            target: None,
        });
        self.track(opcode, operand);
        Ok(())
    }

    pub fn imm8(&mut self, opcode: u8, value: u8) -> Result<()> {
        self.ins(opcode, &[value])
    }

    pub fn imm16(&mut self, opcode: u8, value: u16) -> Result<()> {
        self.ins(opcode, &value.to_le_bytes())
    }

    pub fn dp(&mut self, opcode: u8, addr: u8) -> Result<()> {
        self.ins(opcode, &[addr])
    }

    pub fn abs(&mut self, opcode: u8, addr: u16) -> Result<()> {
        self.ins(opcode, &addr.to_le_bytes())
    }

    pub fn long(&mut self, opcode: u8, addr: u32) -> Result<()> {
        let [lo, hi, bank, _] = addr.to_le_bytes();
        self.ins(opcode, &[lo, hi, bank])
    }

    /// Raw data. The tracked flags are left alone.
    pub fn emit_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let addr = self.address;
        self.write(bytes)?;
        self.lines.push(Line::Data {
            addr,
            len: bytes.len(),
        });
        Ok(())
    }

    /// Adds a comment line to the listing.
    pub fn comment(&mut self, text: &str) {
        self.lines.push(Line::Comment(text.to_string()));
    }

    /// Defines `name` at the current address.
    pub fn label(&mut self, name: &str) -> Result<u32> {
        if let Some(&addr) = self.labels.get(name) {
            return Err(AsmError::DuplicateLabel {
                name: name.to_string(),
                addr,
            });
        }
        self.labels.insert(name.to_string(), self.address);
        self.lines.push(Line::Label(name.to_string()));
        Ok(self.address)
    }

    pub fn get_label(&self, name: &str) -> Option<u32> {
        self.labels.get(name).copied()
    }

    fn mark_target(&mut self, label: &str) {
        if let Some(Line::Ins { target, .. }) = self.lines.last_mut() {
            *target = Some(label.to_string());
        }
    }

    fn branch_to(&mut self, label: &str, opcode: u8) -> Result<()> {
        self.ins(opcode, &[0])?;
        self.mark_target(label);
        self.dangling_rel8
            .entry(label.to_string())
            .or_default()
            .push(self.address.wrapping_sub(1));
        Ok(())
    }

    fn abs_to(&mut self, label: &str, opcode: u8) -> Result<()> {
        self.ins(opcode, &[0, 0])?;
        self.mark_target(label);
        self.dangling_abs16
            .entry(label.to_string())
            .or_default()
            .push(self.address.wrapping_sub(2));
        Ok(())
    }

    /// Appends the code of `other`, which must start at this emitter's
    /// current address (see [`Emitter::fork`]). Labels, unpatched label
    /// references, listing lines and the tracked flags carry over.
    pub fn append(&mut self, other: &Emitter) -> Result<()> {
        if other.base != self.address {
            return Err(AsmError::Discontiguous {
                expected: self.address,
                got: other.base,
            });
        }
        for (name, &addr) in &other.labels {
            match self.labels.get(name) {
                Some(&existing) if existing != addr => {
                    return Err(AsmError::DuplicateLabel {
                        name: name.clone(),
                        addr: existing,
                    })
                }
                _ => {}
            }
        }
        self.write(&other.code)?;

        for (name, &addr) in &other.labels {
            self.labels.insert(name.clone(), addr);
        }
        for (name, refs) in &other.dangling_rel8 {
            self.dangling_rel8
                .entry(name.clone())
                .or_default()
                .extend_from_slice(refs);
        }
        for (name, refs) in &other.dangling_abs16 {
            self.dangling_abs16
                .entry(name.clone())
                .or_default()
                .extend_from_slice(refs);
        }
        self.lines.extend(other.lines.iter().cloned());
        self.emulation = other.emulation;
        self.m8 = other.m8;
        self.x8 = other.x8;
        self.carry = other.carry;
        Ok(())
    }

    /// Patches every label reference. Fails on the first label that was
    /// never defined or branch that cannot reach.
    pub fn finalize(&mut self) -> Result<()> {
        let rel8 = std::mem::take(&mut self.dangling_rel8);
        for (label, refs) in &rel8 {
            let target = self.resolve(label)?;
            for &at in refs {
                let from = at.wrapping_add(1);
                let diff = target as i64 - from as i64;
                if !(-128..=127).contains(&diff) {
                    self.dangling_rel8 = rel8.clone();
                    return Err(AsmError::BranchOutOfRange {
                        from,
                        to: target,
                        diff,
                    });
                }
                self.patch(at, &[diff as i8 as u8]);
            }
        }

        let abs16 = std::mem::take(&mut self.dangling_abs16);
        for (label, refs) in &abs16 {
            let target = match self.resolve(label) {
                Ok(target) => target,
                Err(err) => {
                    self.dangling_abs16 = abs16.clone();
                    return Err(err);
                }
            };
            for &at in refs {
                self.patch(at, &(target as u16).to_le_bytes());
            }
        }
        Ok(())
    }

    fn resolve(&self, label: &str) -> Result<u32> {
        self.get_label(label)
            .ok_or_else(|| AsmError::UnresolvedLabel(label.to_string()))
    }

    fn patch(&mut self, at: u32, bytes: &[u8]) {
        let offset = at.wrapping_sub(self.base) as usize;
        if let Some(slot) = self.code.get_mut(offset..offset + bytes.len()) {
            slot.copy_from_slice(bytes);
        }
    }

    /// Writes a C-style byte listing, one instruction per line, with the
    /// disassembly as a trailing comment:
    ///
    /// ```text
    /// 0xa9, 0x01,             // LDA #$01
    /// ```
    ///
    /// Label references show the label name. Call after
    /// [`Emitter::finalize`] so patched operands are listed.
    pub fn write_hex_to<W: io::Write>(&self, w: &mut W) -> io::Result<()> {
        let mut line = String::with_capacity(64);
        for item in &self.lines {
            line.clear();
            match item {
                Line::Base(addr) => {
                    line.push_str("// base $");
                    disasm::push_hex8(&mut line, (addr >> 16) as u8);
                    disasm::push_hex16(&mut line, *addr as u16);
                }
                Line::Comment(text) => {
                    line.push_str("// ");
                    line.push_str(text);
                }
                Line::Label(name) => {
                    line.push_str("// ");
                    line.push_str(name);
                    line.push(':');
                }
                Line::Data { addr, len } => {
                    push_byte_list(&mut line, self.code_at(*addr, *len));
                }
                Line::Ins { addr, len, target } => {
                    let bytes = self.code_at(*addr, *len);
                    push_byte_list(&mut line, bytes);
                    for _ in line.len()..LISTING_BYTES_WIDTH {
                        line.push(' ');
                    }
                    line.push_str(" // ");
                    let mut decoded = Decoded {
                        bytes: [0; 4],
                        len: bytes.len(),
                        complete: true,
                    };
                    decoded.bytes[..bytes.len()].copy_from_slice(bytes);
                    match target {
                        Some(label) => {
                            line.push_str(lookup(decoded.bytes[0]).mnemonic.as_str());
                            line.push(' ');
                            line.push_str(label);
                        }
                        None => disasm::format_instruction(&mut line, &decoded, *addr as u16),
                    }
                }
            }
            writeln!(w, "{}", line.trim_end())?;
        }
        Ok(())
    }

    fn code_at(&self, addr: u32, len: usize) -> &[u8] {
        let offset = addr.wrapping_sub(self.base) as usize;
        self.code.get(offset..offset + len).unwrap_or(&[])
    }

    pub fn sep(&mut self, mask: u8) -> Result<()> {
        self.ins(OP_SEP, &[mask])
    }

    pub fn rep(&mut self, mask: u8) -> Result<()> {
        self.ins(OP_REP, &[mask])
    }

    implied! {
        nop => 0xEA,
        rts => 0x60,
        rtl => 0x6B,
        rti => 0x40,
        pha => 0x48,
        phb => 0x8B,
        phd => 0x0B,
        phk => 0x4B,
        php => 0x08,
        phx => 0xDA,
        phy => 0x5A,
        pla => 0x68,
        plb => 0xAB,
        pld => 0x2B,
        plp => 0x28,
        plx => 0xFA,
        ply => 0x7A,
        dex => 0xCA,
        dey => 0x88,
        inx => 0xE8,
        iny => 0xC8,
        tax => 0xAA,
        txa => 0x8A,
        tcd => 0x5B,
        xba => 0xEB,
        xce => OP_XCE,
        clc => OP_CLC,
        sec => OP_SEC,
        cli => 0x58,
        sei => 0x78,
        stp => 0xDB,
        wai => 0xCB,
        asl => 0x0A,
    }

    branch! {
        bne, bne_imm8 => 0xD0,
        beq, beq_imm8 => 0xF0,
        bpl, bpl_imm8 => 0x10,
        bmi, bmi_imm8 => 0x30,
        bcc, bcc_imm8 => 0x90,
        bcs, bcs_imm8 => 0xB0,
        bra, bra_imm8 => 0x80,
    }

    /// The abort pseudo-instruction; its signature byte is ignored.
    pub fn wdm(&mut self, signature: u8) -> Result<()> {
        self.ins(0x42, &[signature])
    }

    pub fn lda_imm8(&mut self, value: u8) -> Result<()> {
        self.imm8(0xA9, value)
    }

    pub fn lda_imm16(&mut self, value: u16) -> Result<()> {
        self.imm16(0xA9, value)
    }

    pub fn ldx_imm8(&mut self, value: u8) -> Result<()> {
        self.imm8(0xA2, value)
    }

    pub fn ldx_imm16(&mut self, value: u16) -> Result<()> {
        self.imm16(0xA2, value)
    }

    pub fn ldy_imm8(&mut self, value: u8) -> Result<()> {
        self.imm8(0xA0, value)
    }

    pub fn ldy_imm16(&mut self, value: u16) -> Result<()> {
        self.imm16(0xA0, value)
    }

    pub fn cmp_imm8(&mut self, value: u8) -> Result<()> {
        self.imm8(0xC9, value)
    }

    pub fn cmp_imm16(&mut self, value: u16) -> Result<()> {
        self.imm16(0xC9, value)
    }

    pub fn cpy_imm8(&mut self, value: u8) -> Result<()> {
        self.imm8(0xC0, value)
    }

    pub fn adc_imm8(&mut self, value: u8) -> Result<()> {
        self.imm8(0x69, value)
    }

    pub fn sbc_imm8(&mut self, value: u8) -> Result<()> {
        self.imm8(0xE9, value)
    }

    pub fn and_imm8(&mut self, value: u8) -> Result<()> {
        self.imm8(0x29, value)
    }

    pub fn ora_imm8(&mut self, value: u8) -> Result<()> {
        self.imm8(0x09, value)
    }

    pub fn lda_dp(&mut self, addr: u8) -> Result<()> {
        self.dp(0xA5, addr)
    }

    pub fn sta_dp(&mut self, addr: u8) -> Result<()> {
        self.dp(0x85, addr)
    }

    pub fn stz_dp(&mut self, addr: u8) -> Result<()> {
        self.dp(0x64, addr)
    }

    pub fn inc_dp(&mut self, addr: u8) -> Result<()> {
        self.dp(0xE6, addr)
    }

    pub fn lda_abs(&mut self, addr: u16) -> Result<()> {
        self.abs(0xAD, addr)
    }

    pub fn lda_abs_x(&mut self, addr: u16) -> Result<()> {
        self.abs(0xBD, addr)
    }

    pub fn sta_abs(&mut self, addr: u16) -> Result<()> {
        self.abs(0x8D, addr)
    }

    pub fn sta_abs_x(&mut self, addr: u16) -> Result<()> {
        self.abs(0x9D, addr)
    }

    pub fn stz_abs(&mut self, addr: u16) -> Result<()> {
        self.abs(0x9C, addr)
    }

    pub fn stz_abs_x(&mut self, addr: u16) -> Result<()> {
        self.abs(0x9E, addr)
    }

    pub fn lda_long(&mut self, addr: u32) -> Result<()> {
        self.long(0xAF, addr)
    }

    pub fn sta_long(&mut self, addr: u32) -> Result<()> {
        self.long(0x8F, addr)
    }

    pub fn jsr_abs(&mut self, addr: u16) -> Result<()> {
        self.abs(0x20, addr)
    }

    pub fn jmp_abs(&mut self, addr: u16) -> Result<()> {
        self.abs(0x4C, addr)
    }

    pub fn jmp_indirect(&mut self, addr: u16) -> Result<()> {
        self.abs(0x6C, addr)
    }

    pub fn jsl(&mut self, addr: u32) -> Result<()> {
        self.long(0x22, addr)
    }

    pub fn jml(&mut self, addr: u32) -> Result<()> {
        self.long(0x5C, addr)
    }

    /// `JMP label`, patched with the label's low 16 bits.
    pub fn jmp(&mut self, label: &str) -> Result<()> {
        self.abs_to(label, 0x4C)
    }

    /// `JSR label`, patched with the label's low 16 bits.
    pub fn jsr(&mut self, label: &str) -> Result<()> {
        self.abs_to(label, 0x20)
    }

    pub fn pea(&mut self, value: u16) -> Result<()> {
        self.abs(0xF4, value)
    }

    /// `MVN src,dst`; encoded destination bank first.
    pub fn mvn(&mut self, src_bank: u8, dst_bank: u8) -> Result<()> {
        self.ins(0x54, &[dst_bank, src_bank])
    }

    pub fn mvp(&mut self, src_bank: u8, dst_bank: u8) -> Result<()> {
        self.ins(0x44, &[dst_bank, src_bank])
    }
}

fn push_byte_list(out: &mut String, bytes: &[u8]) {
    for (i, &b) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str("0x");
        disasm::push_hex8(out, b);
        out.push(',');
    }
}
