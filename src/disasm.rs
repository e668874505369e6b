//! One-line disassembly for execution traces.
//!
//! Everything is appended to a caller-owned `String` so a trace loop can
//! reuse one buffer. Line layout:
//!
//! ```text
//! 2	00:8000│a9 01      │LDA #$01         │ A=--00 X=--00 Y=--00 --MX-I--
//! ```

use crate::cpu::{AddressingMode, Cpu, StatusFlags};
use crate::cpu_bus::CpuBus;

const HEX: &[u8; 16] = b"0123456789abcdef";
const BYTES_WIDTH: usize = 11;
const OPERAND_WIDTH: usize = 13;

#[inline]
pub(crate) fn push_hex8(out: &mut String, value: u8) {
    out.push(HEX[(value >> 4) as usize] as char);
    out.push(HEX[(value & 0x0F) as usize] as char);
}

#[inline]
pub(crate) fn push_hex16(out: &mut String, value: u16) {
    push_hex8(out, (value >> 8) as u8);
    push_hex8(out, value as u8);
}

fn pad_to(out: &mut String, start: usize, width: usize) {
    let used = out.len() - start;
    for _ in used..width {
        out.push(' ');
    }
}

fn push_decimal(out: &mut String, value: u32) {
    let mut digits = [0u8; 10];
    let mut n = value;
    let mut len = 0;
    loop {
        digits[len] = b'0' + (n % 10) as u8;
        len += 1;
        n /= 10;
        if n == 0 {
            break;
        }
    }
    for &d in digits[..len].iter().rev() {
        out.push(d as char);
    }
}

/// A decoded instruction as it sits in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    /// Opcode followed by up to three operand bytes.
    pub bytes: [u8; 4],
    pub len: usize,
    /// Whether every byte came from mapped memory.
    pub complete: bool,
}

/// Reads the instruction at `pb:pc`, sized with the immediate width rule.
pub fn decode<B: CpuBus>(bus: &mut B, pb: u8, pc: u16, m8: bool, x8: bool) -> Decoded {
    let at = |i: u16| ((pb as u32) << 16) | pc.wrapping_add(i) as u32;
    let mut bytes = [0u8; 4];
    let mut complete = true;

    let opcode = match bus.peek_u8(at(0)) {
        Some(b) => b,
        None => {
            return Decoded {
                bytes,
                len: 1,
                complete: false,
            }
        }
    };
    bytes[0] = opcode;
    let len = crate::cpu::lookup(opcode).len(m8, x8);
    for (i, slot) in bytes.iter_mut().enumerate().take(len).skip(1) {
        match bus.peek_u8(at(i as u16)) {
            Some(b) => *slot = b,
            None => complete = false,
        }
    }
    Decoded {
        bytes,
        len,
        complete,
    }
}

/// Appends `MNEMONIC operand` for `decoded`, located at `pc`.
pub fn format_instruction(out: &mut String, decoded: &Decoded, pc: u16) {
    let op = crate::cpu::lookup(decoded.bytes[0]);
    let [_, w1, w2, w3] = decoded.bytes;
    let word = ((w2 as u16) << 8) | w1 as u16;

    out.push_str(op.mnemonic.as_str());
    out.push(' ');
    let start = out.len();

    use AddressingMode::*;
    match op.mode {
        Implied => {}
        Accumulator => out.push('A'),
        Immediate => {
            out.push_str("#$");
            push_hex8(out, w1);
        }
        ImmediateM | ImmediateX => {
            out.push_str("#$");
            if decoded.len == 3 {
                push_hex16(out, word);
            } else {
                push_hex8(out, w1);
            }
        }
        Absolute | AbsoluteX | AbsoluteY => {
            out.push('$');
            push_hex16(out, word);
            match op.mode {
                AbsoluteX => out.push_str(", X"),
                AbsoluteY => out.push_str(", Y"),
                _ => {}
            }
        }
        AbsoluteLong | AbsoluteLongX => {
            out.push('$');
            push_hex8(out, w3);
            push_hex16(out, word);
            if op.mode == AbsoluteLongX {
                out.push_str(", X");
            }
        }
        DirectPage | DirectPageX | DirectPageY | StackRelative => {
            out.push('$');
            push_hex8(out, w1);
            match op.mode {
                DirectPageX => out.push_str(", X"),
                DirectPageY => out.push_str(", Y"),
                StackRelative => out.push_str(", S"),
                _ => {}
            }
        }
        DirectPageIndirect => {
            out.push_str("($");
            push_hex8(out, w1);
            out.push(')');
        }
        DirectPageIndexedIndirect => {
            out.push_str("($");
            push_hex8(out, w1);
            out.push_str(", X)");
        }
        DirectPageIndirectIndexed => {
            out.push_str("($");
            push_hex8(out, w1);
            out.push_str("), Y");
        }
        DirectPageIndirectLong => {
            out.push_str("[$");
            push_hex8(out, w1);
            out.push(']');
        }
        DirectPageIndirectLongIndexed => {
            out.push_str("[$");
            push_hex8(out, w1);
            out.push_str("], Y");
        }
        StackRelativeIndirectIndexed => {
            out.push_str("($");
            push_hex8(out, w1);
            out.push_str(", S), Y");
        }
        Relative => {
            let dest = pc.wrapping_add(2).wrapping_add(w1 as i8 as u16);
            out.push('$');
            push_hex8(out, w1);
            out.push_str(" ($");
            push_hex16(out, dest);
            out.push_str(if (w1 as i8) < 0 { " -)" } else { " +)" });
        }
        RelativeLong => {
            out.push('$');
            push_hex16(out, pc.wrapping_add(3).wrapping_add(word));
        }
        BlockMove => {
            // Source bank is the second byte.
            out.push_str("#$");
            push_hex8(out, w2);
            out.push_str(",#$");
            push_hex8(out, w1);
        }
        AbsoluteIndirect => {
            out.push_str("($");
            push_hex16(out, word);
            out.push(')');
        }
        AbsoluteIndexedIndirect => {
            out.push_str("($");
            push_hex16(out, word);
            out.push_str(", X)");
        }
        AbsoluteIndirectLong => {
            out.push_str("[$");
            push_hex16(out, word);
            out.push(']');
        }
    }
    pad_to(out, start, OPERAND_WIDTH);
}

/// Appends the trace line for the instruction at the CPU's current PC:
/// last step's cycles, address, raw bytes, disassembly, registers and flags.
pub fn trace_line<B: CpuBus>(out: &mut String, cpu: &Cpu, bus: &mut B) {
    let regs = &cpu.regs;
    let m8 = regs.m8();
    let x8 = regs.x8();
    let decoded = decode(bus, regs.pb, regs.pc, m8, x8);

    push_decimal(out, cpu.cycles());
    out.push('\t');
    push_hex8(out, regs.pb);
    out.push(':');
    push_hex16(out, regs.pc);
    out.push('│');

    let start = out.len();
    for (i, &b) in decoded.bytes[..decoded.len].iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        push_hex8(out, b);
    }
    if !decoded.complete {
        out.truncate(start);
        out.push_str("??");
    }
    pad_to(out, start, BYTES_WIDTH);
    out.push('│');

    format_instruction(out, &decoded, regs.pc);
    out.push('│');

    let push_reg = |out: &mut String, name: &str, value: u16, narrow: bool| {
        out.push(' ');
        out.push_str(name);
        out.push('=');
        if narrow {
            out.push_str("--");
            push_hex8(out, value as u8);
        } else {
            push_hex16(out, value);
        }
    };
    push_reg(out, "A", regs.a, m8);
    push_reg(out, "X", regs.x, x8);
    push_reg(out, "Y", regs.y, x8);

    out.push(' ');
    const NAMES: [(StatusFlags, char); 8] = [
        (StatusFlags::NEGATIVE, 'N'),
        (StatusFlags::OVERFLOW, 'V'),
        (StatusFlags::MEMORY_8BIT, 'M'),
        (StatusFlags::INDEX_8BIT, 'X'),
        (StatusFlags::DECIMAL, 'D'),
        (StatusFlags::IRQ_DISABLE, 'I'),
        (StatusFlags::ZERO, 'Z'),
        (StatusFlags::CARRY, 'C'),
    ];
    for (flag, name) in NAMES {
        out.push(if regs.p.contains(flag) { name } else { '-' });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::Bus;
    use crate::cpu::Cpu;
    use crate::memory::{Region, Storage};

    #[test]
    fn test_trace_line_layout() {
        let rom = Storage::new(0x8000);
        rom.load(0, &[0xA9, 0x01, 0xD0, 0x02]);
        rom.load(0x7FFC, &[0x00, 0x80]);
        let region = Region::rom(rom.cells(), 0x8000);
        let mut bus = Bus::new();
        bus.attach(&region, "rom", 0x8000, 0xFFFF).unwrap();

        let mut cpu = Cpu::new();
        cpu.reset(&mut bus).unwrap();

        let mut line = String::new();
        trace_line(&mut line, &cpu, &mut bus);
        assert_eq!(
            line,
            "0\t00:8000│a9 01      │LDA #$01         │ A=--00 X=--00 Y=--00 --MX-I--"
        );
    }

    #[test]
    fn test_relative_shows_destination() {
        let decoded = Decoded {
            bytes: [0xD0, 0xFE, 0, 0],
            len: 2,
            complete: true,
        };
        let mut out = String::new();
        format_instruction(&mut out, &decoded, 0x8010);
        assert_eq!(out, "BNE $fe ($8010 -)");
    }

    #[test]
    fn test_sixteen_bit_immediate() {
        let decoded = Decoded {
            bytes: [0xA9, 0x34, 0x12, 0],
            len: 3,
            complete: true,
        };
        let mut out = String::new();
        format_instruction(&mut out, &decoded, 0);
        assert_eq!(out.trim_end(), "LDA #$1234");
        assert_eq!(out.len(), "LDA ".len() + OPERAND_WIDTH);
    }

    #[test]
    fn test_block_move_and_long() {
        let mut out = String::new();
        let mvn = Decoded {
            bytes: [0x54, 0x7E, 0x80, 0],
            len: 3,
            complete: true,
        };
        format_instruction(&mut out, &mvn, 0);
        assert_eq!(out.trim_end(), "MVN #$80,#$7e");

        out.clear();
        let jsl = Decoded {
            bytes: [0x22, 0x56, 0x34, 0x12],
            len: 4,
            complete: true,
        };
        format_instruction(&mut out, &jsl, 0);
        assert_eq!(out.trim_end(), "JSL $123456");
    }
}
