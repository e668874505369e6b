use super::*;

#[test]
fn test_backward_branch() {
    let mut e = Emitter::new();
    e.set_base(0x8000);
    e.sep(0x30).unwrap();
    e.label("loop").unwrap();
    e.dex().unwrap();
    e.bne("loop").unwrap();
    e.finalize().unwrap();

    assert_eq!(e.bytes(), &[0xE2, 0x30, 0xCA, 0xD0, 0xFD]);
    assert_eq!(e.pc(), 0x8005);
    assert_eq!(e.get_label("loop"), Some(0x8002));
}

#[test]
fn test_forward_branch_in_range() {
    let mut e = Emitter::new();
    e.sep(0x30).unwrap();
    e.lda_imm8(0x01).unwrap();
    e.bne("next").unwrap();
    e.rts().unwrap();
    e.label("next").unwrap();
    e.cmp_imm8(0x02).unwrap();
    e.rts().unwrap();
    e.finalize().unwrap();

    assert_eq!(
        e.bytes(),
        &[0xE2, 0x30, 0xA9, 0x01, 0xD0, 0x01, 0x60, 0xC9, 0x02, 0x60]
    );
}

#[test]
fn test_unresolved_label() {
    let mut e = Emitter::new();
    e.sep(0x30).unwrap();
    e.lda_imm8(0x01).unwrap();
    e.bne("next2").unwrap();
    e.rts().unwrap();
    e.label("next").unwrap();
    e.rts().unwrap();

    let err = e.finalize().unwrap_err();
    assert_eq!(err, AsmError::UnresolvedLabel("next2".into()));
    assert_eq!(err.to_string(), "could not resolve label 'next2'");
}

#[test]
fn test_branch_out_of_range() {
    let mut e = Emitter::new();
    e.sep(0x30).unwrap();
    e.lda_imm8(0x01).unwrap();
    e.bne("next").unwrap();
    e.rts().unwrap();
    for _ in 0..127 {
        e.nop().unwrap();
    }
    e.label("next").unwrap();
    e.cmp_imm8(0x02).unwrap();
    e.rts().unwrap();

    let err = e.finalize().unwrap_err();
    assert_eq!(
        err.to_string(),
        "branch from 0x000006 to 0x000086 too far for signed 8-bit; diff=128"
    );
}

#[test]
fn test_duplicate_label() {
    let mut e = Emitter::new();
    e.set_base(0x8000);
    e.label("a").unwrap();
    e.nop().unwrap();
    let err = e.label("a").unwrap_err();
    assert_eq!(err.to_string(), "label 'a' already defined at 0x008000");
}

#[test]
fn test_width_mismatch_rejected() {
    let mut e = Emitter::new();
    e.clc().unwrap();
    e.xce().unwrap();
    assert!(!e.is_emulation());
    e.rep(0x20).unwrap();
    let err = e.lda_imm8(0x01).unwrap_err();
    assert_eq!(
        err,
        AsmError::WidthMismatch {
            opcode: 0xA9,
            flag: 'm',
            flag_is_16bit: true,
            emulation: false,
        }
    );
    // Nothing was emitted for the rejected instruction.
    assert_eq!(e.bytes(), &[0x18, 0xFB, 0xC2, 0x20]);

    e.lda_imm16(0x1234).unwrap();
    assert!(e.ldx_imm16(0x10).is_err());
    e.ldx_imm8(0x10).unwrap();
    assert_eq!(
        e.bytes(),
        &[0x18, 0xFB, 0xC2, 0x20, 0xA9, 0x34, 0x12, 0xA2, 0x10]
    );
}

#[test]
fn test_rep_in_emulation_keeps_8bit_immediates() {
    let mut e = Emitter::new();
    e.rep(0x20).unwrap();
    assert!(e.is_emulation());
    assert!(!e.is_m16());
    let err = e.lda_imm16(0x1234).unwrap_err();
    assert_eq!(
        err,
        AsmError::WidthMismatch {
            opcode: 0xA9,
            flag: 'm',
            flag_is_16bit: false,
            emulation: true,
        }
    );
    assert!(err.to_string().contains("emulation mode"));
    e.lda_imm8(0x34).unwrap();
    assert_eq!(e.bytes(), &[0xC2, 0x20, 0xA9, 0x34]);
}

#[test]
fn test_xce_tracks_carry() {
    let mut e = Emitter::new();
    e.clc().unwrap();
    e.xce().unwrap();
    assert!(!e.is_emulation());
    // XCE swapped the old E into C, so a second XCE goes back.
    e.xce().unwrap();
    assert!(e.is_emulation());

    e.clc().unwrap();
    e.xce().unwrap();
    e.rep(0x30).unwrap();
    assert!(e.is_m16() && e.is_x16());
    e.sec().unwrap();
    e.xce().unwrap();
    assert!(e.is_emulation());
    assert!(!e.is_m16() && !e.is_x16());

    // SEC; XCE leaves native mode with M and X still set.
    e.clc().unwrap();
    e.xce().unwrap();
    assert!(!e.is_emulation());
    assert!(!e.is_m16());

    // Unknown carry: the mode is left for the caller to state.
    e.lda_imm8(0x00).unwrap();
    e.xce().unwrap();
    assert!(!e.is_emulation());
    e.assume_emulation();
    assert!(e.is_emulation());
}

#[test]
fn test_assume_does_not_emit() {
    let mut e = Emitter::new();
    e.assume_native();
    e.assume_rep(FLAG_M | FLAG_X);
    assert!(e.is_m16());
    assert!(e.is_x16());
    assert!(e.is_empty());
    e.ldy_imm16(0xBEEF).unwrap();
    e.assume_sep(FLAG_X);
    e.ldy_imm8(0x01).unwrap();
    assert_eq!(e.bytes(), &[0xA0, 0xEF, 0xBE, 0xA0, 0x01]);
}

#[test]
fn test_generic_ins_checks_length() {
    let mut e = Emitter::new();
    let err = e.ins(0xAD, &[0x00]).unwrap_err();
    assert_eq!(
        err,
        AsmError::OperandSize {
            opcode: 0xAD,
            expected: 2,
            got: 1,
        }
    );
    e.long(0x22, 0x12_3456).unwrap();
    assert_eq!(e.bytes(), &[0x22, 0x56, 0x34, 0x12]);
}

#[test]
fn test_jump_to_label_patches_low_word() {
    let mut e = Emitter::new();
    e.set_base(0x02_9000);
    e.jmp("end").unwrap();
    e.nop().unwrap();
    e.label("end").unwrap();
    e.stp().unwrap();
    e.finalize().unwrap();
    assert_eq!(e.bytes(), &[0x4C, 0x04, 0x90, 0xEA, 0xDB]);
}

#[test]
fn test_block_move_operand_order() {
    let mut e = Emitter::new();
    e.mvn(0x80, 0x7E).unwrap();
    assert_eq!(e.bytes(), &[0x54, 0x7E, 0x80]);
}

#[test]
fn test_capacity() {
    let mut e = Emitter::with_capacity(2);
    e.nop().unwrap();
    e.nop().unwrap();
    let err = e.nop().unwrap_err();
    assert_eq!(err, AsmError::OutOfSpace { capacity: 2 });
    assert_eq!(e.len(), 2);
}

#[test]
fn test_hex_listing() {
    let mut e = Emitter::new();
    e.set_base(0x8000);
    e.comment("count down");
    e.sep(0x30).unwrap();
    e.ldx_imm8(0x03).unwrap();
    e.label("loop").unwrap();
    e.dex().unwrap();
    e.bne("loop").unwrap();
    e.jsl(0x12_3456).unwrap();
    e.emit_bytes(&[0xDE, 0xAD]).unwrap();
    e.finalize().unwrap();

    let mut out = Vec::new();
    e.write_hex_to(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        [
            "// base $008000",
            "// count down",
            "0xe2, 0x30,             // SEP #$30",
            "0xa2, 0x03,             // LDX #$03",
            "// loop:",
            "0xca,                   // DEX",
            "0xd0, 0xfd,             // BNE loop",
            "0x22, 0x56, 0x34, 0x12, // JSL $123456",
            "0xde, 0xad,",
        ]
    );
}

#[test]
fn test_fork_and_append() {
    let mut e = Emitter::new();
    e.set_base(0x8000);
    e.label("top").unwrap();
    e.clc().unwrap();
    e.xce().unwrap();
    e.bra("tail").unwrap();

    let mut tail = e.fork();
    assert_eq!(tail.pc(), 0x8004);
    assert!(!tail.is_emulation());
    tail.label("tail").unwrap();
    tail.rep(0x20).unwrap();
    tail.lda_imm16(0x1234).unwrap();
    tail.jmp("top").unwrap();

    e.append(&tail).unwrap();
    assert!(e.is_m16());
    assert_eq!(e.get_label("tail"), Some(0x8004));
    e.finalize().unwrap();
    assert_eq!(
        e.bytes(),
        &[0x18, 0xFB, 0x80, 0x00, 0xC2, 0x20, 0xA9, 0x34, 0x12, 0x4C, 0x00, 0x80]
    );

    // The fork is an independent copy.
    let mut other = e.fork();
    other.nop().unwrap();
    assert_eq!(e.len(), 12);
    assert_eq!(
        e.append(&tail),
        Err(AsmError::Discontiguous {
            expected: 0x800C,
            got: 0x8004,
        })
    );
}

#[test]
fn test_append_rejects_conflicting_label() {
    let mut e = Emitter::new();
    e.nop().unwrap();
    let mut tail = e.fork();
    e.label("x").unwrap();
    tail.nop().unwrap();
    tail.label("x").unwrap();
    assert_eq!(
        e.append(&tail),
        Err(AsmError::DuplicateLabel {
            name: "x".into(),
            addr: 0x0001,
        })
    );
    assert_eq!(e.len(), 1);
}
