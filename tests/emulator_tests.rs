// Full-system integration tests
//
// Power-on behavior, the scheduler's cycle coupling between the SH-2 and
// the VDP2, interrupt delivery through the SCU, and the save state round
// trip.

mod common;

use common::{emulator_with_program, idle_loop, PROGRAM_BASE, STACK_TOP};
use saturn_rs::emulator::SaveState;
use saturn_rs::sh2::flags;
use saturn_rs::Bus;

#[test]
fn test_power_on_loads_vectors() {
    let emulator = emulator_with_program(&idle_loop());

    assert_eq!(emulator.master.pc, PROGRAM_BASE);
    assert_eq!(emulator.master.r[15], STACK_TOP);
    assert_eq!(emulator.master.interrupt_mask(), 0xF);
    assert_eq!(emulator.slave.pc, PROGRAM_BASE, "the slave reads the same vectors");
}

#[test]
fn test_idle_loop_reaches_vblank() {
    let mut emulator = emulator_with_program(&idle_loop());
    let vactive = u64::from(emulator.bus.vdp2.cycles_per_vactive());

    let mut total: u64 = 0;
    while emulator.frame_count() == 0 {
        total += u64::from(emulator.step());
        assert!(
            total < vactive * 2,
            "a frame must be produced within one active region's worth of cycles"
        );
    }

    assert_eq!(emulator.frame_count(), 1);
}

#[test]
fn test_run_frame_advances_exactly_one_frame() {
    let mut emulator = emulator_with_program(&idle_loop());

    assert!(emulator.run_frame());
    assert_eq!(emulator.frame_count(), 1);

    assert!(emulator.run_frame());
    assert_eq!(emulator.frame_count(), 2);
}

#[test]
fn test_vblank_interrupt_reaches_the_master() {
    // Unmask VBlank-In in the SCU and give the master a handler that
    // increments R5, then returns
    let handler = 0x0600_8000u32;
    let mut emulator = emulator_with_program(&idle_loop());
    emulator.bus.write32(0x40 * 4, handler); // VBR = 0
    emulator.bus.write16(handler, 0x7501); // ADD #1,R5
    emulator.bus.write16(handler + 2, 0x002B); // RTE
    emulator.bus.write16(handler + 4, 0x0009); // NOP (delay slot)

    // Unmask only VBlank-In (bit 0) in the SCU, and drop the SR mask so
    // the level 0xF interrupt can fire
    emulator.scu.set_interrupt_mask(!0x1);
    emulator.master.set_sr(0);

    emulator.run_frame();
    assert_eq!(emulator.master.r[5], 1, "the VBlank-In handler ran once");
    assert!(
        !emulator.master.is_interrupted,
        "the RTE unwound the interrupt state"
    );
    assert_eq!(
        emulator.scu.interrupt_status(),
        0,
        "the SCU status flag was cleared on return"
    );
}

#[test]
fn test_frt_advances_with_the_scheduler() {
    let mut emulator = emulator_with_program(&idle_loop());
    let frc_before = emulator.master.regs.frt.frc;

    for _ in 0..100 {
        emulator.step();
    }

    assert!(
        emulator.master.regs.frt.frc > frc_before,
        "the free-running timer follows the consumed cycles"
    );
}

#[test]
fn test_program_writes_reach_vdp2_registers() {
    // MOV.L @(2,PC),R1 ; MOV.W @(5,PC),R0 ; MOV.W R0,@R1 then idle;
    // literals hold the register address and the value
    let program = [
        0xD102, // MOV.L @(2,PC),R1 -> address literal at +12
        0x9005, // MOV.W @(5,PC),R0 -> value literal at +16
        0x2101, // MOV.W R0,@R1
        0xAFFE, 0x0009, // idle loop
        0x0000, // padding so the long literal is 4-aligned
        0x25F8, 0x0020, // 0x25F80020 = BGON
        0x001F, // value
    ];
    let mut emulator = emulator_with_program(&program);

    for _ in 0..8 {
        emulator.step();
    }

    assert_eq!(
        emulator.bus.vdp2.read16(0x20),
        0x001F,
        "the store landed in BGON through the bus"
    );
}

#[test]
fn test_sr_invariant_holds_across_execution() {
    let mut emulator = emulator_with_program(&idle_loop());
    for _ in 0..50 {
        emulator.step();
        assert_eq!(
            emulator.master.sr & !flags::SR_MASK,
            0,
            "SR bits outside the writable mask stay clear"
        );
    }
}

#[test]
fn test_save_state_round_trip() {
    let mut emulator = emulator_with_program(&idle_loop());
    for _ in 0..10 {
        emulator.step();
    }
    emulator.master.r[4] = 0x1234_5678;
    emulator.bus.write32(0x0600_4000, 0xAABB_CCDD);
    emulator.bus.vdp2.vram_write16(0x100, 0x4242);

    let state = SaveState::capture(&emulator);

    // Wreck the live state
    emulator.master.r[4] = 0;
    emulator.bus.write32(0x0600_4000, 0);
    emulator.bus.vdp2.vram_write16(0x100, 0);

    state.restore(&mut emulator).expect("restore succeeds");

    assert_eq!(emulator.master.r[4], 0x1234_5678);
    assert_eq!(emulator.bus.read32(0x0600_4000), 0xAABB_CCDD);
    assert_eq!(emulator.bus.vdp2.vram_read16(0x100), 0x4242);
}

#[test]
fn test_stop_joins_the_renderer() {
    let mut emulator = emulator_with_program(&idle_loop());
    emulator.run_frame();

    let compositor = emulator.stop();
    assert!(compositor.is_some(), "the renderer thread joined cleanly");
}
