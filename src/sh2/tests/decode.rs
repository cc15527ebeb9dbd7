//! Decode table tests
//!
//! The 65,536-entry lookup table must be total, agree with the definition
//! table it is derived from, and carry the delay-slot and subroutine flags
//! only on the branch family.

use crate::sh2::opcodes::{decode, definition_for, Instruction, OPCODE_DEFINITIONS};

#[test]
fn test_every_opcode_decodes() {
    for opcode in 0..=u16::MAX {
        let decoded = decode(opcode);
        match definition_for(opcode) {
            Some(def) => assert_eq!(
                decoded.instruction, def.instruction,
                "LUT disagrees with the definition table for {:#06x}",
                opcode
            ),
            None => assert_eq!(
                decoded.instruction,
                Instruction::BadOpcode,
                "unmatched opcode {:#06x} must decode to BadOpcode",
                opcode
            ),
        }
    }
}

#[test]
fn test_known_encodings() {
    assert_eq!(decode(0x0009).instruction, Instruction::Nop);
    assert_eq!(decode(0x300C).instruction, Instruction::Add);
    assert_eq!(decode(0xE0FF).instruction, Instruction::MovI);
    assert_eq!(decode(0xA000).instruction, Instruction::Bra);
    assert_eq!(decode(0x002B).instruction, Instruction::Rte);
    assert_eq!(decode(0x401A).instruction, Instruction::LdsMacl);
    // 0x0000 matches nothing in the definition table
    assert_eq!(decode(0x0000).instruction, Instruction::BadOpcode);
}

#[test]
fn test_illegal_in_slot_flags_cover_the_branch_family() {
    use Instruction::*;
    let expected = [
        Bf, BfS, Bt, BtS, Bra, Braf, Bsr, Bsrf, Jmp, Jsr, Rts, Rte, Trapa,
    ];

    for def in OPCODE_DEFINITIONS {
        let should_be_illegal = expected.contains(&def.instruction);
        assert_eq!(
            def.is_illegal_in_slot, should_be_illegal,
            "illegal-in-slot flag wrong for {:?}",
            def.instruction
        );
    }
}

#[test]
fn test_subroutine_call_flags() {
    use Instruction::*;
    let expected = [Bsr, Bsrf, Jsr];

    for def in OPCODE_DEFINITIONS {
        let should_call = expected.contains(&def.instruction);
        assert_eq!(
            def.is_subroutine_call, should_call,
            "subroutine-call flag wrong for {:?}",
            def.instruction
        );
    }
}

#[test]
fn test_lut_flags_follow_definitions() {
    // JSR @R5
    let decoded = decode(0x450B);
    assert!(decoded.is_illegal_in_slot);
    assert!(decoded.is_subroutine_call);

    // ADD R1,R2
    let decoded = decode(0x321C);
    assert!(!decoded.is_illegal_in_slot);
    assert!(!decoded.is_subroutine_call);
}

#[test]
fn test_every_definition_is_reachable() {
    // Each entry of the static table must win the LUT slot of its own
    // canonical encoding (first-match ordering must not shadow anyone).
    for def in OPCODE_DEFINITIONS {
        let decoded = decode(def.bits);
        assert_eq!(
            decoded.instruction, def.instruction,
            "definition {:?} is shadowed at its canonical encoding {:#06x}",
            def.instruction, def.bits
        );
    }
}
