// Common test utilities for the integration tests
//
// Builds emulators with staged vector tables and small machine-code
// programs, so full-system tests don't depend on an external BIOS image.

#![allow(dead_code)]

use saturn_rs::{Bus, Emulator, EmulatorConfig};

/// Where test programs are staged (start of work RAM high)
pub const PROGRAM_BASE: u32 = 0x0600_0000;
/// Initial stack pointer handed out through the reset vector
pub const STACK_TOP: u32 = 0x0600_F000;

/// An emulator with reset vectors pointing at the program base
pub fn emulator_with_program(opcodes: &[u16]) -> Emulator {
    let mut emulator = Emulator::new(EmulatorConfig::default());

    emulator.bus.write32(0x0000_0008, PROGRAM_BASE);
    emulator.bus.write32(0x0000_000C, STACK_TOP);
    for (i, opcode) in opcodes.iter().enumerate() {
        emulator.bus.write16(PROGRAM_BASE + (i as u32) * 2, *opcode);
    }

    emulator.power_on();
    emulator
}

/// A program that spins forever: BRA -2 with a NOP in the delay slot
pub fn idle_loop() -> Vec<u16> {
    vec![0xAFFE, 0x0009]
}
