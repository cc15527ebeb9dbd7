//! Branch and delay slot tests
//!
//! The delayed branches must run the instruction at PC+2 before committing
//! the target, charge the slot's cycles on top of their own, and refuse to
//! run another branch in the slot.

use super::*;
use crate::debug::EmulationStatus;
use crate::sh2::flags;

#[test]
fn test_bra_with_delay_slot() {
    // BRA +1 with MOV #5,R0 in the slot
    let (mut sh2, mut bus) = test_sh2();
    bus.load_program(PROGRAM_BASE, &[0xA001, 0xE005]); // BRA ; MOV #5,R0

    let cycles = sh2.step(&mut bus);

    assert_eq!(sh2.r[0], 5, "the delay slot instruction ran");
    assert_eq!(
        sh2.pc,
        PROGRAM_BASE + (1 << 1) + 4,
        "target is PC + disp*2 + 4"
    );
    assert_eq!(cycles, 3, "BRA's 2 cycles plus the slot MOV's 1");
}

#[test]
fn test_bra_backwards() {
    let (mut sh2, mut bus) = test_sh2();
    sh2.pc = PROGRAM_BASE + 0x10;
    // BRA -8 instructions
    bus.load_program(PROGRAM_BASE + 0x10, &[0xAFF8, 0x0009]);

    sh2.step(&mut bus);
    assert_eq!(sh2.pc, PROGRAM_BASE + 0x10 - 16 + 4);
}

#[test]
fn test_bt_bf_taken_and_not_taken() {
    let (mut sh2, mut bus) = test_sh2();
    bus.load_program(PROGRAM_BASE, &[0x8902]); // BT +2

    sh2.set_sr_flag(flags::T);
    let cycles = sh2.step(&mut bus);
    assert_eq!(sh2.pc, PROGRAM_BASE + 4 + 4, "taken BT lands on the target");
    assert_eq!(cycles, 3);

    let (mut sh2, mut bus) = test_sh2();
    bus.load_program(PROGRAM_BASE, &[0x8902]);
    sh2.clear_sr_flag(flags::T);
    let cycles = sh2.step(&mut bus);
    assert_eq!(sh2.pc, PROGRAM_BASE + 2, "untaken BT falls through");
    assert_eq!(cycles, 1);
}

#[test]
fn test_bts_runs_slot_only_when_taken() {
    let (mut sh2, mut bus) = test_sh2();
    bus.load_program(PROGRAM_BASE, &[0x8D02, 0xE107]); // BT/S +2 ; MOV #7,R1

    sh2.clear_sr_flag(flags::T);
    sh2.step(&mut bus);
    assert_eq!(sh2.r[1], 0, "untaken branch must not run the slot");
    assert_eq!(sh2.pc, PROGRAM_BASE + 2);

    let (mut sh2, mut bus) = test_sh2();
    bus.load_program(PROGRAM_BASE, &[0x8D02, 0xE107]);
    sh2.set_sr_flag(flags::T);
    let cycles = sh2.step(&mut bus);
    assert_eq!(sh2.r[1], 7, "taken branch runs the slot");
    assert_eq!(sh2.pc, PROGRAM_BASE + 4 + 4);
    assert_eq!(cycles, 3);
}

#[test]
fn test_braf_adds_register_to_pc() {
    let (mut sh2, mut bus) = test_sh2();
    sh2.r[3] = 0x100;
    bus.load_program(PROGRAM_BASE, &[0x0323, 0x0009]); // BRAF R3 ; NOP

    sh2.step(&mut bus);
    assert_eq!(sh2.pc, PROGRAM_BASE + 0x100 + 4);
}

#[test]
fn test_jmp_register_target() {
    let (mut sh2, mut bus) = test_sh2();
    sh2.r[4] = 0x0600_8000;
    bus.load_program(PROGRAM_BASE, &[0x442B, 0x0009]); // JMP @R4 ; NOP

    sh2.step(&mut bus);
    assert_eq!(sh2.pc, 0x0600_8000);
}

#[test]
fn test_bsr_jsr_rts_call_and_return() {
    let (mut sh2, mut bus) = test_sh2();
    sh2.r[5] = 0x0600_8000;
    bus.load_program(PROGRAM_BASE, &[0x450B, 0x0009]); // JSR @R5 ; NOP
    bus.load_program(0x0600_8000, &[0x000B, 0x0009]); // RTS ; NOP

    sh2.step(&mut bus);
    assert_eq!(sh2.pc, 0x0600_8000, "JSR jumps through the register");
    assert_eq!(sh2.pr, PROGRAM_BASE + 4, "PR holds the return address");
    assert_eq!(sh2.callstack().len(), 1, "JSR pushes the callstack");

    sh2.step(&mut bus);
    assert_eq!(sh2.pc, PROGRAM_BASE + 4, "RTS returns through PR");
    assert!(sh2.callstack().is_empty(), "RTS pops the callstack");
}

#[test]
fn test_bsr_records_callstack_entry() {
    let (mut sh2, mut bus) = test_sh2();
    bus.load_program(PROGRAM_BASE, &[0xB008, 0x0009]); // BSR +8 ; NOP

    sh2.step(&mut bus);
    let stack = sh2.callstack();
    assert_eq!(stack.len(), 1);
    assert_eq!(stack[0].call_address, PROGRAM_BASE);
    assert_eq!(stack[0].return_address, PROGRAM_BASE + 4);
    assert_eq!(sh2.pc, PROGRAM_BASE + 16 + 4);
}

#[test]
fn test_illegal_slot_instruction_stops_emulation() {
    let (mut sh2, mut bus) = test_sh2();
    bus.load_program(PROGRAM_BASE, &[0xA001, 0xA001]); // BRA with BRA in the slot

    sh2.step(&mut bus);
    assert_eq!(
        sh2.debug.emulation_status(),
        EmulationStatus::Stopped,
        "a branch in a delay slot is an illegal slot instruction"
    );
}

#[test]
fn test_slot_instruction_cycles_are_added() {
    let (mut sh2, mut bus) = test_sh2();
    sh2.gbr = 0x0600_1000;
    sh2.r[0] = 0;
    // BRA +1 with AND.B #0xFF,@(R0,GBR) (3 cycles) in the slot
    bus.load_program(PROGRAM_BASE, &[0xA001, 0xCDFF]);

    let cycles = sh2.step(&mut bus);
    assert_eq!(cycles, 5, "BRA's 2 plus the slot AND.B's 3");
}

#[test]
fn test_breakpoint_pauses_the_host() {
    use crate::debug::DebugStatus;

    let (mut sh2, mut bus) = test_sh2();
    bus.load_program(PROGRAM_BASE, &[0x0009, 0x0009]);
    sh2.breakpoint(0, PROGRAM_BASE + 2);

    sh2.step(&mut bus);
    assert_eq!(
        sh2.debug.debug_status(),
        DebugStatus::Paused,
        "reaching a breakpoint pauses the host"
    );
}
