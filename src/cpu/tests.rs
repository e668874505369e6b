use super::*;
use crate::asm::{Emitter, FLAG_M, FLAG_X};
use crate::bus::Direction;
use crate::disasm;

#[path = "addressing_tests.rs"]
mod addressing_mode_tests;

const MEMORY_SIZE: usize = 0x100_0000;

/// Flat 24-bit memory with an optional unmapped hole.
struct TestBus {
    memory: Vec<u8>,
    hole: Option<(u32, u32)>,
}

impl TestBus {
    fn new() -> Self {
        Self {
            memory: vec![0; MEMORY_SIZE],
            hole: None,
        }
    }

    fn load_program(&mut self, program: &[u8], start_addr: u32) {
        let start = start_addr as usize;
        self.memory[start..start + program.len()].copy_from_slice(program);
    }

    fn set_word(&mut self, addr: u32, value: u16) {
        self.load_program(&value.to_le_bytes(), addr);
    }

    fn byte(&self, addr: u32) -> u8 {
        self.memory[addr as usize]
    }

    fn check(&self, addr: u32, direction: Direction) -> Result<usize, BusError> {
        match self.hole {
            Some((start, end)) if (start..=end).contains(&addr) => {
                Err(BusError::Unmapped { addr, direction })
            }
            _ => Ok((addr & 0xFF_FFFF) as usize),
        }
    }
}

impl CpuBus for TestBus {
    fn read_u8(&mut self, addr: u32) -> Result<u8, BusError> {
        let index = self.check(addr, Direction::Read)?;
        Ok(self.memory[index])
    }

    fn write_u8(&mut self, addr: u32, value: u8) -> Result<(), BusError> {
        let index = self.check(addr, Direction::Write)?;
        self.memory[index] = value;
        Ok(())
    }
}

fn setup_cpu() -> (Cpu, TestBus) {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    // Set reset vector
    bus.set_word(0xFFFC, 0x8000);
    cpu.reset(&mut bus).unwrap();
    (cpu, bus)
}

fn setup_with(program: &[u8]) -> (Cpu, TestBus) {
    let (cpu, mut bus) = setup_cpu();
    bus.load_program(program, 0x8000);
    (cpu, bus)
}

fn run_steps(cpu: &mut Cpu, bus: &mut TestBus, n: usize) -> Vec<u32> {
    (0..n).map(|_| cpu.step(bus).cycles).collect()
}

#[test]
fn test_reset_vector() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    bus.set_word(0xFFFC, 0x1234);
    cpu.regs.a = 0x5555;
    cpu.reset(&mut bus).unwrap();

    assert_eq!(cpu.regs.pc, 0x1234);
    assert_eq!(cpu.regs.pb, 0);
    assert_eq!(cpu.regs.sp, 0x01FF);
    assert!(cpu.regs.emulation);
    assert!(cpu.regs.m8() && cpu.regs.x8());
    assert!(cpu.regs.p.contains(StatusFlags::IRQ_DISABLE));
    assert!(!cpu.regs.p.contains(StatusFlags::DECIMAL));
    assert_eq!(cpu.total_cycles(), 0);
    assert_eq!(cpu.prev_pc(), 0x1234);
}

#[test]
fn test_reset_vector_unmapped() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    bus.hole = Some((0xFFF0, 0xFFFF));
    assert_eq!(
        cpu.reset(&mut bus),
        Err(BusError::Unmapped {
            addr: 0xFFFC,
            direction: Direction::Read,
        })
    );
}

#[test]
fn test_lda_bne_scenario() {
    let (mut cpu, mut bus) = setup_with(&[0xA9, 0x01, 0xD0, 0x02, 0x60, 0x60, 0xEA]);

    let r = cpu.step(&mut bus);
    assert_eq!(r, StepResult { cycles: 2, abort: false });
    assert_eq!(cpu.regs.a, 0x01);
    assert_eq!(cpu.regs.pc, 0x8002);

    let r = cpu.step(&mut bus);
    assert_eq!(r, StepResult { cycles: 3, abort: false });
    assert_eq!(cpu.regs.pc, 0x8006);
    assert_eq!(cpu.total_cycles(), 5);
    assert_eq!(cpu.prev_pc(), 0x8002);
}

#[test]
fn test_stack_loop_cycle_growth() {
    // SEP #$30; inf: LDX #$03; loop: PHX; PLY; DEX; BNE loop; BRA inf
    let (mut cpu, mut bus) = setup_with(&[
        0xE2, 0x30, 0xA2, 0x03, 0xDA, 0x7A, 0xCA, 0xD0, 0xFB, 0x80, 0xF7,
    ]);

    assert_eq!(run_steps(&mut cpu, &mut bus, 2), [3, 2]);
    for expected_y in [3, 2] {
        assert_eq!(run_steps(&mut cpu, &mut bus, 4), [3, 4, 2, 3]);
        assert_eq!(cpu.regs.y, expected_y);
        assert_eq!(cpu.regs.pc, 0x8004);
    }
    // Last pass falls through BNE, then BRA returns to the LDX.
    assert_eq!(run_steps(&mut cpu, &mut bus, 5), [3, 4, 2, 2, 3]);
    assert_eq!(cpu.regs.x, 0);
    assert_eq!(cpu.regs.y, 1);
    assert_eq!(cpu.regs.pc, 0x8002);
    assert_eq!(cpu.regs.sp, 0x01FF);
    assert_eq!(cpu.total_cycles(), 3 + 2 + 12 * 2 + 11 + 3);
}

#[test]
fn test_stack_loop_native_sixteen_bit_index() {
    // CLC; XCE; REP #$10; LDX #$0002; loop: PHX; PLY; DEX; BNE loop
    let (mut cpu, mut bus) = setup_with(&[
        0x18, 0xFB, 0xC2, 0x10, 0xA2, 0x02, 0x00, 0xDA, 0x7A, 0xCA, 0xD0, 0xFB,
    ]);
    assert_eq!(run_steps(&mut cpu, &mut bus, 4), [2, 2, 3, 3]);
    assert_eq!(run_steps(&mut cpu, &mut bus, 4), [4, 5, 2, 3]);
    assert_eq!(cpu.regs.y, 0x0002);
    assert_eq!(bus.byte(0x01FF), 0x00);
    assert_eq!(bus.byte(0x01FE), 0x02);
}

fn is_control_flow(m: Mnemonic) -> bool {
    use Mnemonic::*;
    matches!(
        m,
        Bpl | Bmi | Bvc | Bvs | Bcc | Bcs | Bne | Beq | Bra | Brl | Jmp | Jml | Jsr | Jsl | Rts
            | Rtl | Rti | Brk | Cop
    )
}

#[test]
fn test_operand_width_agrees_everywhere() {
    let mut bus = TestBus::new();
    let zeros = [0u8; 3];

    for code in 0..=255u8 {
        let op = lookup(code);
        assert_eq!(op.code, code);
        for (m8, x8) in [(true, true), (true, false), (false, true), (false, false)] {
            let len = op.len(m8, x8);
            let n = op.mode.operand_len(m8, x8);
            assert_eq!(len, 1 + n);

            bus.load_program(&[code, 0, 0, 0], 0x8000);
            let decoded = disasm::decode(&mut bus, 0, 0x8000, m8, x8);
            assert_eq!(decoded.len, len, "disasm {:02X} m8={} x8={}", code, m8, x8);

            let mut e = Emitter::new();
            e.assume_native();
            if !m8 {
                e.assume_rep(FLAG_M);
            }
            if !x8 {
                e.assume_rep(FLAG_X);
            }
            assert!(e.ins(code, &zeros[..n]).is_ok(), "emit {:02X}", code);
            if n < 3 {
                assert!(e.ins(code, &zeros[..n + 1]).is_err(), "emit {:02X} long", code);
            }
            if n > 0 {
                assert!(e.ins(code, &zeros[..n - 1]).is_err(), "emit {:02X} short", code);
            }

            if is_control_flow(op.mnemonic) {
                continue;
            }
            let mut cpu = Cpu::new();
            cpu.regs.emulation = false;
            cpu.regs.sp = 0x1FF0;
            cpu.regs.pc = 0x8000;
            cpu.regs.p = StatusFlags::empty();
            cpu.regs.p.set(StatusFlags::MEMORY_8BIT, m8);
            cpu.regs.p.set(StatusFlags::INDEX_8BIT, x8);
            cpu.step(&mut bus);
            assert_eq!(
                cpu.regs.pc as usize,
                0x8000 + len,
                "core {} ({:02X}) m8={} x8={}",
                op.mnemonic.as_str(),
                code,
                m8,
                x8
            );
        }
    }
}

#[test]
fn test_wdm_aborts() {
    let (mut cpu, mut bus) = setup_with(&[0x42, 0x00, 0xEA]);
    let r = cpu.step(&mut bus);
    assert!(r.abort);
    assert_eq!(r.cycles, 2);
    assert_eq!(cpu.regs.pc, 0x8002);
    assert!(!cpu.is_stopped());

    // The session decides what to do next; stepping again just continues.
    assert!(!cpu.step(&mut bus).abort);
}

#[test]
fn test_stp_halts_until_reset() {
    let (mut cpu, mut bus) = setup_with(&[0xDB, 0xEA]);
    assert!(cpu.step(&mut bus).abort);
    assert!(cpu.is_stopped());
    let r = cpu.step(&mut bus);
    assert_eq!(r, StepResult { cycles: 0, abort: true });
    assert_eq!(cpu.regs.pc, 0x8001);

    // Restart on the NOP after the STP.
    bus.set_word(0xFFFC, 0x8001);
    cpu.reset(&mut bus).unwrap();
    assert!(!cpu.is_stopped());
    let r = cpu.step(&mut bus);
    assert_eq!(r, StepResult { cycles: 2, abort: false });
    assert_eq!(cpu.regs.pc, 0x8002);
}

#[test]
fn test_wai_until_irq() {
    // CLI; WAI
    let (mut cpu, mut bus) = setup_with(&[0x58, 0xCB]);
    bus.set_word(0xFFFE, 0x9000);

    assert_eq!(run_steps(&mut cpu, &mut bus, 2), [2, 3]);
    assert!(cpu.is_waiting());
    let r = cpu.step(&mut bus);
    assert_eq!(r, StepResult { cycles: 1, abort: false });
    assert!(cpu.is_spinning());
    assert_eq!(cpu.regs.pc, 0x8002);

    cpu.irq(&mut bus).unwrap();
    assert!(!cpu.is_waiting());
    assert_eq!(cpu.regs.pc, 0x9000);
    assert_eq!(cpu.regs.sp, 0x01FC);
    assert_eq!(bus.byte(0x01FF), 0x80);
    assert_eq!(bus.byte(0x01FE), 0x02);
    // Hardware interrupt: break bit clear in the pushed status.
    assert_eq!(bus.byte(0x01FD), 0x20);
    assert!(cpu.regs.p.contains(StatusFlags::IRQ_DISABLE));
    assert_eq!(cpu.cycles(), 7);
    assert_eq!(cpu.total_cycles(), 2 + 3 + 1 + 7);
}

#[test]
fn test_masked_irq_still_wakes() {
    let (mut cpu, mut bus) = setup_with(&[0xCB, 0xEA]);
    cpu.step(&mut bus);
    assert!(cpu.is_waiting());
    cpu.irq(&mut bus).unwrap();
    assert!(!cpu.is_waiting());
    assert_eq!(cpu.regs.pc, 0x8001);
    assert_eq!(cpu.regs.sp, 0x01FF);
}

#[test]
fn test_nmi_native_pushes_bank() {
    let (mut cpu, mut bus) = setup_cpu();
    bus.set_word(0xFFEA, 0xB000);
    cpu.regs.emulation = false;
    cpu.regs.sp = 0x1FFF;
    cpu.regs.pb = 0x12;
    cpu.regs.pc = 0x3456;
    cpu.nmi(&mut bus).unwrap();

    assert_eq!(cpu.regs.pb, 0);
    assert_eq!(cpu.regs.pc, 0xB000);
    assert_eq!(bus.byte(0x1FFF), 0x12);
    assert_eq!(bus.byte(0x1FFE), 0x34);
    assert_eq!(bus.byte(0x1FFD), 0x56);
    assert_eq!(cpu.regs.sp, 0x1FFB);
    assert_eq!(cpu.cycles(), 8);
}

#[test]
fn test_brk_emulation_sets_break_bit() {
    let (mut cpu, mut bus) = setup_with(&[0x00, 0x00]);
    bus.set_word(0xFFFE, 0xA000);
    cpu.regs.p.insert(StatusFlags::DECIMAL);
    let r = cpu.step(&mut bus);
    assert_eq!(r.cycles, 7);
    assert_eq!(cpu.regs.pc, 0xA000);
    assert_eq!(bus.byte(0x01FF), 0x80);
    assert_eq!(bus.byte(0x01FE), 0x02);
    assert_ne!(bus.byte(0x01FD) & 0x10, 0);
    assert!(!cpu.regs.p.contains(StatusFlags::DECIMAL));
}

#[test]
fn test_unmapped_fault_restores_registers() {
    // LDA #$05; LDA $400000
    let (mut cpu, mut bus) = setup_with(&[0xA9, 0x05, 0xAF, 0x00, 0x00, 0x40]);
    bus.hole = Some((0x40_0000, 0x40_FFFF));

    cpu.step(&mut bus);
    let before = cpu.regs;
    let r = cpu.step(&mut bus);
    assert_eq!(r, StepResult { cycles: 0, abort: true });
    assert_eq!(cpu.regs, before);
    assert_eq!(cpu.regs.pc, 0x8002);
    assert_eq!(
        cpu.fault(),
        Some(BusError::Unmapped {
            addr: 0x40_0000,
            direction: Direction::Read,
        })
    );
    assert_eq!(cpu.total_cycles(), 2);
}

#[test]
fn test_store_fault_reports_write() {
    // PHA then STA $400000
    let (mut cpu, mut bus) = setup_with(&[0x48, 0x8F, 0x00, 0x00, 0x40]);
    bus.hole = Some((0x40_0000, 0x40_FFFF));
    cpu.step(&mut bus);
    assert!(cpu.step(&mut bus).abort);
    assert_eq!(cpu.regs.sp, 0x01FE);
    assert!(matches!(
        cpu.fault(),
        Some(BusError::Unmapped {
            direction: Direction::Write,
            ..
        })
    ));
}

#[test]
fn test_partial_store_keeps_low_byte() {
    // CLC; XCE; REP #$20; LDA #$1234; STA $0FFF with $1000 unmapped
    let (mut cpu, mut bus) = setup_with(&[
        0x18, 0xFB, 0xC2, 0x20, 0xA9, 0x34, 0x12, 0x8D, 0xFF, 0x0F,
    ]);
    bus.hole = Some((0x1000, 0x1000));
    run_steps(&mut cpu, &mut bus, 4);
    let before = cpu.regs;

    assert!(cpu.step(&mut bus).abort);
    assert_eq!(cpu.regs, before);
    assert_eq!(cpu.regs.pc, 0x8007);
    assert_eq!(bus.byte(0x0FFF), 0x34);
    assert!(matches!(
        cpu.fault(),
        Some(BusError::Unmapped { addr: 0x1000, .. })
    ));
}

#[test]
fn test_rep_sep_xce() {
    let (mut cpu, mut bus) = setup_with(&[
        0x18, 0xFB, // CLC; XCE
        0xC2, 0x30, // REP #$30
        0xA9, 0x34, 0x12, // LDA #$1234
        0xA2, 0xCD, 0xAB, // LDX #$ABCD
        0xE2, 0x10, // SEP #$10
        0x38, 0xFB, // SEC; XCE
    ]);

    run_steps(&mut cpu, &mut bus, 2);
    assert!(!cpu.regs.emulation);
    assert!(cpu.regs.p.contains(StatusFlags::CARRY));
    assert!(cpu.regs.m8());

    assert_eq!(run_steps(&mut cpu, &mut bus, 3), [3, 3, 3]);
    assert_eq!(cpu.regs.a, 0x1234);
    assert_eq!(cpu.regs.x, 0xABCD);
    assert_eq!(cpu.regs.pc, 0x800A);

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.x, 0x00CD);
    assert!(!cpu.regs.m8());

    run_steps(&mut cpu, &mut bus, 2);
    assert!(cpu.regs.emulation);
    assert!(!cpu.regs.p.contains(StatusFlags::CARRY));
    assert!(cpu.regs.m8() && cpu.regs.x8());
    assert_eq!(cpu.regs.sp & 0xFF00, 0x0100);
    assert_eq!(cpu.regs.a, 0x1234);
}

#[test]
fn test_rep_in_emulation_keeps_widths() {
    let (mut cpu, mut bus) = setup_with(&[0xC2, 0x30, 0xA9, 0xFF]);
    run_steps(&mut cpu, &mut bus, 2);
    assert!(cpu.regs.m8());
    assert_eq!(cpu.regs.pc, 0x8004);
    assert!(cpu.regs.p.contains(StatusFlags::NEGATIVE));
}

#[test]
fn test_eight_bit_accumulator_keeps_b() {
    // LDA #$12; XBA
    let (mut cpu, mut bus) = setup_with(&[0xA9, 0x12, 0xEB]);
    cpu.regs.a = 0xAB00;
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0xAB12);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x12AB);
    assert!(cpu.regs.p.contains(StatusFlags::NEGATIVE));
}

#[test]
fn test_mvn_moves_whole_block() {
    let (mut cpu, mut bus) = setup_with(&[
        0x18, 0xFB, 0xC2, 0x30, // native, 16-bit
        0xA9, 0x03, 0x00, // LDA #$0003
        0xA2, 0x00, 0x10, // LDX #$1000
        0xA0, 0x00, 0x20, // LDY #$2000
        0x54, 0x02, 0x01, // MVN $01,$02
    ]);
    bus.load_program(&[0xDE, 0xAD, 0xBE, 0xEF], 0x01_1000);

    run_steps(&mut cpu, &mut bus, 6);
    let r = cpu.step(&mut bus);
    assert_eq!(r.cycles, 28);
    assert_eq!(&bus.memory[0x02_2000..0x02_2004], &[0xDE, 0xAD, 0xBE, 0xEF]);
    assert_eq!(cpu.regs.a, 0xFFFF);
    assert_eq!(cpu.regs.x, 0x1004);
    assert_eq!(cpu.regs.y, 0x2004);
    assert_eq!(cpu.regs.db, 0x02);
    assert_eq!(cpu.regs.pc, 0x8010);
}

#[test]
fn test_mvp_descends() {
    // A=1 moves two bytes from the top down.
    let (mut cpu, mut bus) = setup_with(&[0xA9, 0x01, 0x44, 0x7E, 0x7F]);
    cpu.regs.x = 0x11;
    cpu.regs.y = 0x21;
    bus.load_program(&[0x01, 0x02], 0x7F_0010);
    run_steps(&mut cpu, &mut bus, 2);
    assert_eq!(&bus.memory[0x7E_0020..0x7E_0022], &[0x01, 0x02]);
    assert_eq!(cpu.regs.x, 0x0F);
    assert_eq!(cpu.regs.y, 0x1F);
    assert_eq!(cpu.cycles(), 14);
}

#[test]
fn test_adc_decimal() {
    // SED; CLC; LDA #$45; ADC #$38; ADC #$20
    let (mut cpu, mut bus) = setup_with(&[0xF8, 0x18, 0xA9, 0x45, 0x69, 0x38, 0x69, 0x20]);
    run_steps(&mut cpu, &mut bus, 4);
    assert_eq!(cpu.regs.a & 0xFF, 0x83);
    assert!(!cpu.regs.p.contains(StatusFlags::CARRY));
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a & 0xFF, 0x03);
    assert!(cpu.regs.p.contains(StatusFlags::CARRY));
}

#[test]
fn test_adc_binary_overflow() {
    // CLC; LDA #$7F; ADC #$01
    let (mut cpu, mut bus) = setup_with(&[0x18, 0xA9, 0x7F, 0x69, 0x01]);
    run_steps(&mut cpu, &mut bus, 3);
    assert_eq!(cpu.regs.a, 0x80);
    assert!(cpu.regs.p.contains(StatusFlags::OVERFLOW));
    assert!(cpu.regs.p.contains(StatusFlags::NEGATIVE));
    assert!(!cpu.regs.p.contains(StatusFlags::CARRY));
}

#[test]
fn test_sbc_decimal() {
    // SED; SEC; LDA #$42; SBC #$13
    let (mut cpu, mut bus) = setup_with(&[0xF8, 0x38, 0xA9, 0x42, 0xE9, 0x13]);
    run_steps(&mut cpu, &mut bus, 4);
    assert_eq!(cpu.regs.a & 0xFF, 0x29);
    assert!(cpu.regs.p.contains(StatusFlags::CARRY));
}

#[test]
fn test_emulation_stack_wraps_in_page_one() {
    // PHA; PLA
    let (mut cpu, mut bus) = setup_with(&[0x48, 0x68]);
    cpu.regs.sp = 0x0100;
    cpu.regs.a = 0x42;
    cpu.step(&mut bus);
    assert_eq!(bus.byte(0x0100), 0x42);
    assert_eq!(cpu.regs.sp, 0x01FF);
    cpu.regs.a = 0;
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.sp, 0x0100);
    assert_eq!(cpu.regs.a, 0x42);
}

#[test]
fn test_branch_page_cross_cost() {
    let (mut cpu, mut bus) = setup_cpu();
    bus.load_program(&[0xD0, 0x10], 0x80FD);

    cpu.regs.pc = 0x80FD;
    assert_eq!(cpu.step(&mut bus).cycles, 4);
    assert_eq!(cpu.regs.pc, 0x810F);

    cpu.regs.emulation = false;
    cpu.regs.pc = 0x80FD;
    assert_eq!(cpu.step(&mut bus).cycles, 3);
}

#[test]
fn test_branch_rule_marks_conditional_branches() {
    let branches: Vec<u8> = (0..=255u8)
        .filter(|&code| lookup(code).rule.contains(CycleRule::BRANCH))
        .collect();
    assert_eq!(
        branches,
        [0x10, 0x30, 0x50, 0x70, 0x80, 0x90, 0xB0, 0xD0, 0xF0]
    );
    assert!(branches
        .iter()
        .all(|&code| lookup(code).mode == AddressingMode::Relative));
    // BRL always costs its base count.
    assert!(!lookup(0x82).rule.contains(CycleRule::BRANCH));
}

#[test]
fn test_jsr_rts_and_jsl_rtl() {
    let (mut cpu, mut bus) = setup_with(&[0x20, 0x00, 0x90, 0x22, 0x00, 0x90, 0x01]);
    bus.load_program(&[0x60], 0x9000);
    bus.load_program(&[0x6B], 0x01_9000);

    assert_eq!(cpu.step(&mut bus).cycles, 6);
    assert_eq!(cpu.regs.pc, 0x9000);
    assert_eq!(bus.byte(0x01FF), 0x80);
    assert_eq!(bus.byte(0x01FE), 0x02);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.pc, 0x8003);

    assert_eq!(cpu.step(&mut bus).cycles, 8);
    assert_eq!(cpu.regs.pc24(), 0x01_9000);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.pc24(), 0x00_8007);
    assert_eq!(cpu.regs.sp, 0x01FF);
}

#[test]
fn test_dp_cycle_penalty() {
    // LDA $10 with D low byte non-zero
    let (mut cpu, mut bus) = setup_with(&[0xA5, 0x10, 0xA5, 0x10]);
    assert_eq!(cpu.step(&mut bus).cycles, 3);
    cpu.regs.dp = 0x0001;
    assert_eq!(cpu.step(&mut bus).cycles, 4);
}

#[test]
fn test_rmw_sixteen_bit() {
    // native, REP #$20, INC $1000
    let (mut cpu, mut bus) = setup_with(&[0x18, 0xFB, 0xC2, 0x20, 0xEE, 0x00, 0x10]);
    bus.load_program(&[0xFF, 0x00], 0x1000);
    run_steps(&mut cpu, &mut bus, 4);
    assert_eq!(cpu.cycles(), 8);
    assert_eq!(bus.byte(0x1000), 0x00);
    assert_eq!(bus.byte(0x1001), 0x01);
}

#[test]
fn test_bit_immediate_only_sets_zero() {
    // LDA #$01; BIT #$C0
    let (mut cpu, mut bus) = setup_with(&[0xA9, 0x01, 0x89, 0xC0]);
    run_steps(&mut cpu, &mut bus, 2);
    assert!(cpu.regs.p.contains(StatusFlags::ZERO));
    assert!(!cpu.regs.p.contains(StatusFlags::NEGATIVE));
    assert!(!cpu.regs.p.contains(StatusFlags::OVERFLOW));
}
