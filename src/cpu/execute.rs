//! Instruction semantics. `execute_next` fetches and decodes one instruction
//! and dispatches on its mnemonic; widths always come from the live flags.

use crate::bus::BusError;
use crate::cpu_bus::CpuBus;

use super::addressing::{self, AddressingMode, EffectiveAddress, Operand};
use super::opcodes::{lookup, CycleRule, Mnemonic, Opcode};
use super::{
    Cpu, StatusFlags, VECTOR_BRK_NATIVE, VECTOR_COP_EMULATION, VECTOR_COP_NATIVE,
    VECTOR_IRQ_EMULATION,
};

pub(super) enum Flow {
    Next(u32),
    Abort(u32),
}

#[inline]
fn mask(wide: bool) -> u16 {
    if wide {
        0xFFFF
    } else {
        0x00FF
    }
}

#[inline]
fn sign_bit(wide: bool) -> u16 {
    if wide {
        0x8000
    } else {
        0x0080
    }
}

#[inline]
fn bcd_adc8(a: u8, b: u8, carry_in: u8) -> (u8, bool) {
    let mut low = (a & 0x0F) as u16 + (b & 0x0F) as u16 + carry_in as u16;
    if low > 0x09 {
        low += 0x06;
    }
    let half_carry = if low > 0x0F { 0x10 } else { 0 };
    let mut sum = (a & 0xF0) as u16 + (b & 0xF0) as u16 + (low & 0x0F) + half_carry;
    if sum > 0x9F {
        sum += 0x60;
    }
    ((sum & 0xFF) as u8, sum > 0xFF)
}

#[inline]
fn bcd_sbc8(a: u8, b: u8, borrow_in: u8) -> (u8, bool) {
    let mut low = (a & 0x0F) as i16 - (b & 0x0F) as i16 - borrow_in as i16;
    let mut borrow = 0i16;
    if low < 0 {
        low += 10;
        borrow = 1;
    }
    let mut high = (a >> 4) as i16 - (b >> 4) as i16 - borrow;
    let no_borrow = high >= 0;
    if high < 0 {
        high += 10;
    }
    ((((high as u8) & 0x0F) << 4) | (low as u8 & 0x0F), no_borrow)
}

impl Cpu {
    pub(super) fn execute_next<B: CpuBus>(&mut self, bus: &mut B) -> Result<Flow, BusError> {
        let pb = self.regs.pb;
        let pc = self.regs.pc;
        let code = bus.read_u8(self.regs.pc24())?;
        let op = lookup(code);

        let len = op.mode.operand_len(self.regs.m8(), self.regs.x8());
        let mut raw = 0u32;
        for i in 0..len {
            let offset = pc.wrapping_add(1 + i as u16);
            let byte = bus.read_u8(((pb as u32) << 16) | offset as u32)?;
            raw |= (byte as u32) << (8 * i);
        }
        self.regs.pc = pc.wrapping_add(1 + len as u16);

        let operand = addressing::resolve(&self.regs, bus, op.mode, raw)?;
        let cycles = self.base_cycles(op, &operand);
        self.execute(bus, op, &operand, cycles)
    }

    fn base_cycles(&self, op: &Opcode, operand: &Operand) -> u32 {
        let rule = op.rule;
        let m16 = !self.regs.m8();
        let x16 = !self.regs.x8();
        let mut cycles = op.cycles as u32;
        if m16 && rule.contains(CycleRule::M16) {
            cycles += 1;
        }
        if m16 && rule.contains(CycleRule::RMW16) {
            cycles += 2;
        }
        if x16 && rule.contains(CycleRule::X16) {
            cycles += 1;
        }
        if self.regs.dp & 0x00FF != 0 && rule.contains(CycleRule::DL) {
            cycles += 1;
        }
        if (operand.page_crossed || x16) && rule.contains(CycleRule::INDEX) {
            cycles += 1;
        }
        if !self.regs.emulation && rule.contains(CycleRule::NATIVE) {
            cycles += 1;
        }
        cycles
    }

    fn execute<B: CpuBus>(
        &mut self,
        bus: &mut B,
        op: &Opcode,
        operand: &Operand,
        cycles: u32,
    ) -> Result<Flow, BusError> {
        use Mnemonic::*;

        let m_wide = !self.regs.m8();
        let x_wide = !self.regs.x8();
        let mut extra = 0u32;

        match op.mnemonic {
            Lda => {
                let value = self.load(bus, operand, m_wide)?;
                self.set_acc(value, m_wide);
                self.set_nz(value, m_wide);
            }
            Ldx => {
                let value = self.load(bus, operand, x_wide)?;
                self.regs.x = value;
                self.set_nz(value, x_wide);
            }
            Ldy => {
                let value = self.load(bus, operand, x_wide)?;
                self.regs.y = value;
                self.set_nz(value, x_wide);
            }
            Sta => self.store(bus, operand, self.regs.a, m_wide)?,
            Stx => self.store(bus, operand, self.regs.x, x_wide)?,
            Sty => self.store(bus, operand, self.regs.y, x_wide)?,
            Stz => self.store(bus, operand, 0, m_wide)?,

            Adc => {
                let value = self.load(bus, operand, m_wide)?;
                self.adc(value, m_wide);
            }
            Sbc => {
                let value = self.load(bus, operand, m_wide)?;
                self.sbc(value, m_wide);
            }
            And => {
                let value = self.load(bus, operand, m_wide)? & self.acc(m_wide);
                self.set_acc(value, m_wide);
                self.set_nz(value, m_wide);
            }
            Ora => {
                let value = self.load(bus, operand, m_wide)? | self.acc(m_wide);
                self.set_acc(value, m_wide);
                self.set_nz(value, m_wide);
            }
            Eor => {
                let value = self.load(bus, operand, m_wide)? ^ self.acc(m_wide);
                self.set_acc(value, m_wide);
                self.set_nz(value, m_wide);
            }
            Cmp => {
                let value = self.load(bus, operand, m_wide)?;
                self.compare(self.acc(m_wide), value, m_wide);
            }
            Cpx => {
                let value = self.load(bus, operand, x_wide)?;
                self.compare(self.regs.x, value, x_wide);
            }
            Cpy => {
                let value = self.load(bus, operand, x_wide)?;
                self.compare(self.regs.y, value, x_wide);
            }
            Bit => {
                let value = self.load(bus, operand, m_wide)?;
                let acc = self.acc(m_wide);
                self.regs.p.set(StatusFlags::ZERO, value & acc == 0);
                if operand.ea.is_some() {
                    let sign = sign_bit(m_wide);
                    self.regs.p.set(StatusFlags::NEGATIVE, value & sign != 0);
                    self.regs
                        .p
                        .set(StatusFlags::OVERFLOW, value & (sign >> 1) != 0);
                }
            }

            Asl => self.modify(bus, operand, m_wide, |cpu, v, wide| {
                cpu.regs.p.set(StatusFlags::CARRY, v & sign_bit(wide) != 0);
                (v << 1) & mask(wide)
            })?,
            Lsr => self.modify(bus, operand, m_wide, |cpu, v, _| {
                cpu.regs.p.set(StatusFlags::CARRY, v & 1 != 0);
                v >> 1
            })?,
            Rol => self.modify(bus, operand, m_wide, |cpu, v, wide| {
                let carry_in = cpu.regs.p.contains(StatusFlags::CARRY) as u16;
                cpu.regs.p.set(StatusFlags::CARRY, v & sign_bit(wide) != 0);
                ((v << 1) | carry_in) & mask(wide)
            })?,
            Ror => self.modify(bus, operand, m_wide, |cpu, v, wide| {
                let carry_in = if cpu.regs.p.contains(StatusFlags::CARRY) {
                    sign_bit(wide)
                } else {
                    0
                };
                cpu.regs.p.set(StatusFlags::CARRY, v & 1 != 0);
                (v >> 1) | carry_in
            })?,
            Inc => self.modify(bus, operand, m_wide, |_, v, wide| {
                v.wrapping_add(1) & mask(wide)
            })?,
            Dec => self.modify(bus, operand, m_wide, |_, v, wide| {
                v.wrapping_sub(1) & mask(wide)
            })?,
            Tsb | Trb => {
                let ea = self.ea(operand);
                let value = self.read_ea(bus, ea, m_wide)?;
                let acc = self.acc(m_wide);
                self.regs.p.set(StatusFlags::ZERO, value & acc == 0);
                let result = if op.mnemonic == Tsb {
                    value | acc
                } else {
                    value & !acc
                };
                self.write_ea(bus, ea, result, m_wide)?;
            }

            Inx => {
                self.regs.x = self.regs.x.wrapping_add(1) & mask(x_wide);
                self.set_nz(self.regs.x, x_wide);
            }
            Iny => {
                self.regs.y = self.regs.y.wrapping_add(1) & mask(x_wide);
                self.set_nz(self.regs.y, x_wide);
            }
            Dex => {
                self.regs.x = self.regs.x.wrapping_sub(1) & mask(x_wide);
                self.set_nz(self.regs.x, x_wide);
            }
            Dey => {
                self.regs.y = self.regs.y.wrapping_sub(1) & mask(x_wide);
                self.set_nz(self.regs.y, x_wide);
            }

            Bpl | Bmi | Bvc | Bvs | Bcc | Bcs | Bne | Beq | Bra => {
                let p = self.regs.p;
                let taken = match op.mnemonic {
                    Bpl => !p.contains(StatusFlags::NEGATIVE),
                    Bmi => p.contains(StatusFlags::NEGATIVE),
                    Bvc => !p.contains(StatusFlags::OVERFLOW),
                    Bvs => p.contains(StatusFlags::OVERFLOW),
                    Bcc => !p.contains(StatusFlags::CARRY),
                    Bcs => p.contains(StatusFlags::CARRY),
                    Bne => !p.contains(StatusFlags::ZERO),
                    Beq => p.contains(StatusFlags::ZERO),
                    _ => true,
                };
                if taken {
                    self.regs.pc = self.ea(operand).offset();
                    if op.rule.contains(CycleRule::BRANCH) {
                        extra += 1;
                        if operand.page_crossed && self.regs.emulation {
                            extra += 1;
                        }
                    }
                }
            }
            Brl => self.regs.pc = self.ea(operand).offset(),
            Jmp => {
                self.regs.pc = match op.mode {
                    AddressingMode::Absolute => operand.raw as u16,
                    _ => self.ea(operand).offset(),
                };
            }
            Jml => {
                let target = match op.mode {
                    AddressingMode::AbsoluteLong => operand.raw,
                    _ => self.ea(operand).addr,
                };
                self.regs.pb = (target >> 16) as u8;
                self.regs.pc = target as u16;
            }
            Jsr => {
                let target = match op.mode {
                    AddressingMode::Absolute => operand.raw as u16,
                    _ => self.ea(operand).offset(),
                };
                self.push_u16(bus, self.regs.pc.wrapping_sub(1))?;
                self.regs.pc = target;
            }
            Jsl => {
                self.push_u8(bus, self.regs.pb)?;
                self.push_u16(bus, self.regs.pc.wrapping_sub(1))?;
                self.regs.pb = (operand.raw >> 16) as u8;
                self.regs.pc = operand.raw as u16;
            }
            Rts => self.regs.pc = self.pull_u16(bus)?.wrapping_add(1),
            Rtl => {
                self.regs.pc = self.pull_u16(bus)?.wrapping_add(1);
                self.regs.pb = self.pull_u8(bus)?;
            }
            Rti => {
                let status = self.pull_u8(bus)?;
                self.set_status(status);
                self.regs.pc = self.pull_u16(bus)?;
                if !self.regs.emulation {
                    self.regs.pb = self.pull_u8(bus)?;
                }
            }
            Brk => {
                let vector = if self.regs.emulation {
                    VECTOR_IRQ_EMULATION
                } else {
                    VECTOR_BRK_NATIVE
                };
                self.push_interrupt_frame(bus, vector, true)?;
            }
            Cop => {
                let vector = if self.regs.emulation {
                    VECTOR_COP_EMULATION
                } else {
                    VECTOR_COP_NATIVE
                };
                self.push_interrupt_frame(bus, vector, true)?;
            }

            Clc => self.regs.p.remove(StatusFlags::CARRY),
            Sec => self.regs.p.insert(StatusFlags::CARRY),
            Cli => self.regs.p.remove(StatusFlags::IRQ_DISABLE),
            Sei => self.regs.p.insert(StatusFlags::IRQ_DISABLE),
            Cld => self.regs.p.remove(StatusFlags::DECIMAL),
            Sed => self.regs.p.insert(StatusFlags::DECIMAL),
            Clv => self.regs.p.remove(StatusFlags::OVERFLOW),
            Rep => self.set_status(self.regs.p.bits() & !(operand.raw as u8)),
            Sep => self.set_status(self.regs.p.bits() | operand.raw as u8),
            Xce => {
                let carry = self.regs.p.contains(StatusFlags::CARRY);
                self.regs.p.set(StatusFlags::CARRY, self.regs.emulation);
                self.regs.emulation = carry;
                self.regs.normalize();
            }
            Xba => {
                self.regs.a = self.regs.a.rotate_left(8);
                self.set_nz(self.regs.a & 0xFF, false);
            }

            Tax => {
                self.regs.x = self.regs.a & mask(x_wide);
                self.set_nz(self.regs.x, x_wide);
            }
            Tay => {
                self.regs.y = self.regs.a & mask(x_wide);
                self.set_nz(self.regs.y, x_wide);
            }
            Txa => {
                self.set_acc(self.regs.x, m_wide);
                self.set_nz(self.regs.x & mask(m_wide), m_wide);
            }
            Tya => {
                self.set_acc(self.regs.y, m_wide);
                self.set_nz(self.regs.y & mask(m_wide), m_wide);
            }
            Txy => {
                self.regs.y = self.regs.x;
                self.set_nz(self.regs.y, x_wide);
            }
            Tyx => {
                self.regs.x = self.regs.y;
                self.set_nz(self.regs.x, x_wide);
            }
            Tsx => {
                self.regs.x = self.regs.sp & mask(x_wide);
                self.set_nz(self.regs.x, x_wide);
            }
            Txs => self.set_sp(self.regs.x),
            Tcs => self.set_sp(self.regs.a),
            Tsc => {
                self.regs.a = self.regs.sp;
                self.set_nz(self.regs.a, true);
            }
            Tcd => {
                self.regs.dp = self.regs.a;
                self.set_nz(self.regs.dp, true);
            }
            Tdc => {
                self.regs.a = self.regs.dp;
                self.set_nz(self.regs.a, true);
            }

            Pha => self.push_sized(bus, self.regs.a, m_wide)?,
            Phx => self.push_sized(bus, self.regs.x, x_wide)?,
            Phy => self.push_sized(bus, self.regs.y, x_wide)?,
            Php => self.push_u8(bus, self.regs.p.bits())?,
            Phb => self.push_u8(bus, self.regs.db)?,
            Phk => self.push_u8(bus, self.regs.pb)?,
            Phd => self.push_u16(bus, self.regs.dp)?,
            Pea => self.push_u16(bus, operand.raw as u16)?,
            Pei | Per => {
                let value = self.ea(operand).offset();
                self.push_u16(bus, value)?;
            }
            Pla => {
                let value = self.pull_sized(bus, m_wide)?;
                self.set_acc(value, m_wide);
                self.set_nz(value, m_wide);
            }
            Plx => {
                self.regs.x = self.pull_sized(bus, x_wide)?;
                self.set_nz(self.regs.x, x_wide);
            }
            Ply => {
                self.regs.y = self.pull_sized(bus, x_wide)?;
                self.set_nz(self.regs.y, x_wide);
            }
            Plp => {
                let status = self.pull_u8(bus)?;
                self.set_status(status);
            }
            Plb => {
                self.regs.db = self.pull_u8(bus)?;
                self.set_nz(self.regs.db as u16, false);
            }
            Pld => {
                self.regs.dp = self.pull_u16(bus)?;
                self.set_nz(self.regs.dp, true);
            }

            Mvn | Mvp => {
                let moved = self.block_move(bus, operand.raw, op.mnemonic == Mvn, x_wide)?;
                extra += 7 * moved.saturating_sub(1);
            }

            Nop => {}
            Wdm => {
                log::debug!(
                    "cpu: WDM ${:02X} at {:06X}, aborting",
                    operand.raw,
                    self.prev_pc
                );
                return Ok(Flow::Abort(cycles));
            }
            Stp => {
                self.stopped = true;
                log::debug!("cpu: STP at {:06X}", self.prev_pc);
                return Ok(Flow::Abort(cycles));
            }
            Wai => self.waiting = true,
        }

        Ok(Flow::Next(cycles + extra))
    }

    // Memory-mode operands always carry an address; falling back to the
    // current PC bank keeps the accessors total.
    #[inline]
    fn ea(&self, operand: &Operand) -> EffectiveAddress {
        operand
            .ea
            .unwrap_or_else(|| EffectiveAddress::bank_wrapped(self.regs.pb, self.regs.pc))
    }

    fn read_ea<B: CpuBus>(
        &mut self,
        bus: &mut B,
        ea: EffectiveAddress,
        wide: bool,
    ) -> Result<u16, BusError> {
        let lo = bus.read_u8(ea.byte(0))? as u16;
        if !wide {
            return Ok(lo);
        }
        let hi = bus.read_u8(ea.byte(1))? as u16;
        Ok((hi << 8) | lo)
    }

    fn write_ea<B: CpuBus>(
        &mut self,
        bus: &mut B,
        ea: EffectiveAddress,
        value: u16,
        wide: bool,
    ) -> Result<(), BusError> {
        bus.write_u8(ea.byte(0), value as u8)?;
        if wide {
            bus.write_u8(ea.byte(1), (value >> 8) as u8)?;
        }
        Ok(())
    }

    /// Immediate operands come straight from the instruction stream.
    fn load<B: CpuBus>(
        &mut self,
        bus: &mut B,
        operand: &Operand,
        wide: bool,
    ) -> Result<u16, BusError> {
        match operand.ea {
            Some(ea) => self.read_ea(bus, ea, wide),
            None => Ok(operand.raw as u16 & mask(wide)),
        }
    }

    fn store<B: CpuBus>(
        &mut self,
        bus: &mut B,
        operand: &Operand,
        value: u16,
        wide: bool,
    ) -> Result<(), BusError> {
        let ea = self.ea(operand);
        self.write_ea(bus, ea, value, wide)
    }

    /// Read-modify-write on memory, or on A for the accumulator form.
    /// N and Z follow the result.
    fn modify<B, F>(
        &mut self,
        bus: &mut B,
        operand: &Operand,
        wide: bool,
        f: F,
    ) -> Result<(), BusError>
    where
        B: CpuBus,
        F: FnOnce(&mut Cpu, u16, bool) -> u16,
    {
        match operand.ea {
            None => {
                let value = self.acc(wide);
                let result = f(self, value, wide);
                self.set_acc(result, wide);
                self.set_nz(result, wide);
            }
            Some(ea) => {
                let value = self.read_ea(bus, ea, wide)?;
                let result = f(self, value, wide);
                self.write_ea(bus, ea, result, wide)?;
                self.set_nz(result, wide);
            }
        }
        Ok(())
    }

    #[inline]
    fn acc(&self, wide: bool) -> u16 {
        self.regs.a & mask(wide)
    }

    // 8-bit writes keep the hidden B byte.
    #[inline]
    fn set_acc(&mut self, value: u16, wide: bool) {
        self.regs.a = if wide {
            value
        } else {
            (self.regs.a & 0xFF00) | (value & 0x00FF)
        };
    }

    #[inline]
    fn set_nz(&mut self, value: u16, wide: bool) {
        let value = value & mask(wide);
        self.regs.p.set(StatusFlags::ZERO, value == 0);
        self.regs
            .p
            .set(StatusFlags::NEGATIVE, value & sign_bit(wide) != 0);
    }

    fn set_status(&mut self, bits: u8) {
        self.regs.p = StatusFlags::from_bits_retain(bits);
        self.regs.normalize();
    }

    fn set_sp(&mut self, value: u16) {
        self.regs.sp = if self.regs.emulation {
            0x0100 | (value & 0x00FF)
        } else {
            value
        };
    }

    fn push_sized<B: CpuBus>(&mut self, bus: &mut B, value: u16, wide: bool) -> Result<(), BusError> {
        if wide {
            self.push_u16(bus, value)
        } else {
            self.push_u8(bus, value as u8)
        }
    }

    fn pull_sized<B: CpuBus>(&mut self, bus: &mut B, wide: bool) -> Result<u16, BusError> {
        if wide {
            self.pull_u16(bus)
        } else {
            Ok(self.pull_u8(bus)? as u16)
        }
    }

    fn compare(&mut self, register: u16, value: u16, wide: bool) {
        let register = register & mask(wide);
        let value = value & mask(wide);
        self.regs.p.set(StatusFlags::CARRY, register >= value);
        self.set_nz(register.wrapping_sub(value), wide);
    }

    fn adc(&mut self, operand: u16, wide: bool) {
        let carry_in = self.regs.p.contains(StatusFlags::CARRY) as u32;
        let a = self.acc(wide) as u32;
        let b = (operand & mask(wide)) as u32;
        let binary = a + b + carry_in;

        let (result, carry_out) = if self.regs.p.contains(StatusFlags::DECIMAL) {
            let (lo, carry_lo) = bcd_adc8(a as u8, b as u8, carry_in as u8);
            if wide {
                let (hi, carry_hi) = bcd_adc8((a >> 8) as u8, (b >> 8) as u8, carry_lo as u8);
                (((hi as u16) << 8) | lo as u16, carry_hi)
            } else {
                (lo as u16, carry_lo)
            }
        } else {
            ((binary as u16) & mask(wide), binary > mask(wide) as u32)
        };

        let sign = sign_bit(wide) as u32;
        let overflow = !(a ^ b) & (a ^ binary) & sign != 0;
        self.regs.p.set(StatusFlags::CARRY, carry_out);
        self.regs.p.set(StatusFlags::OVERFLOW, overflow);
        self.set_acc(result, wide);
        self.set_nz(result, wide);
    }

    fn sbc(&mut self, operand: u16, wide: bool) {
        let borrow_in = !self.regs.p.contains(StatusFlags::CARRY) as i32;
        let a = self.acc(wide);
        let b = operand & mask(wide);
        let binary = a as i32 - b as i32 - borrow_in;

        let (result, carry_out) = if self.regs.p.contains(StatusFlags::DECIMAL) {
            let (lo, no_borrow_lo) = bcd_sbc8(a as u8, b as u8, borrow_in as u8);
            if wide {
                let (hi, no_borrow_hi) =
                    bcd_sbc8((a >> 8) as u8, (b >> 8) as u8, (!no_borrow_lo) as u8);
                (((hi as u16) << 8) | lo as u16, no_borrow_hi)
            } else {
                (lo as u16, no_borrow_lo)
            }
        } else {
            ((binary as u16) & mask(wide), binary >= 0)
        };

        let sign = sign_bit(wide);
        let binary = binary as u16 & mask(wide);
        let overflow = (a ^ b) & (a ^ binary) & sign != 0;
        self.regs.p.set(StatusFlags::CARRY, carry_out);
        self.regs.p.set(StatusFlags::OVERFLOW, overflow);
        self.set_acc(result, wide);
        self.set_nz(result, wide);
    }

    /// Moves A+1 bytes in one go. The first operand byte is the destination
    /// bank, the second the source bank. Returns the byte count.
    fn block_move<B: CpuBus>(
        &mut self,
        bus: &mut B,
        banks: u32,
        ascending: bool,
        x_wide: bool,
    ) -> Result<u32, BusError> {
        let dst_bank = (banks & 0xFF) as u8;
        let src_bank = ((banks >> 8) & 0xFF) as u8;
        self.regs.db = dst_bank;

        let mut moved = 0u32;
        loop {
            let src = ((src_bank as u32) << 16) | self.regs.x as u32;
            let dst = ((dst_bank as u32) << 16) | self.regs.y as u32;
            let value = bus.read_u8(src)?;
            bus.write_u8(dst, value)?;
            moved += 1;

            let step = |r: u16| {
                let next = if ascending {
                    r.wrapping_add(1)
                } else {
                    r.wrapping_sub(1)
                };
                next & mask(x_wide)
            };
            self.regs.x = step(self.regs.x);
            self.regs.y = step(self.regs.y);
            self.regs.a = self.regs.a.wrapping_sub(1);
            if self.regs.a == 0xFFFF {
                break;
            }
        }
        Ok(moved)
    }
}
