//! SH-2 Tests
//!
//! Unit tests for the interpreter core: instruction semantics, the decode
//! table, the interrupt controller and the on-chip peripherals. A sparse
//! test bus maps the full address space so programs can be staged anywhere.

mod branch;
mod decode;
mod instructions;

use std::collections::HashMap;

pub(crate) use crate::bus::Bus;
use crate::sh2::{Sh2, Sh2Kind};

/// Sparse memory covering the whole 32 bit space
pub(crate) struct TestBus {
    mem: HashMap<u32, u8>,
}

impl TestBus {
    pub fn new() -> Self {
        TestBus {
            mem: HashMap::new(),
        }
    }

    /// Stage a sequence of opcodes starting at `addr`
    pub fn load_program(&mut self, addr: u32, opcodes: &[u16]) {
        for (i, opcode) in opcodes.iter().enumerate() {
            self.write16(addr + (i as u32) * 2, *opcode);
        }
    }
}

impl Bus for TestBus {
    fn read8(&mut self, addr: u32) -> u8 {
        self.mem.get(&addr).copied().unwrap_or(0)
    }

    fn read16(&mut self, addr: u32) -> u16 {
        (u16::from(self.read8(addr)) << 8) | u16::from(self.read8(addr.wrapping_add(1)))
    }

    fn read32(&mut self, addr: u32) -> u32 {
        (u32::from(self.read16(addr)) << 16) | u32::from(self.read16(addr.wrapping_add(2)))
    }

    fn write8(&mut self, addr: u32, data: u8) {
        self.mem.insert(addr, data);
    }

    fn write16(&mut self, addr: u32, data: u16) {
        self.write8(addr, (data >> 8) as u8);
        self.write8(addr.wrapping_add(1), data as u8);
    }

    fn write32(&mut self, addr: u32, data: u32) {
        self.write16(addr, (data >> 16) as u16);
        self.write16(addr.wrapping_add(2), data as u16);
    }
}

/// Base address programs are staged at
pub(crate) const PROGRAM_BASE: u32 = 0x0600_0000;
/// Stack top used by the tests
pub(crate) const STACK_TOP: u32 = 0x0600_2000;

/// A master SH-2 with PC at the program base and a usable stack
pub(crate) fn test_sh2() -> (Sh2, TestBus) {
    let mut sh2 = Sh2::new(Sh2Kind::Master);
    sh2.pc = PROGRAM_BASE;
    sh2.r[15] = STACK_TOP;
    (sh2, TestBus::new())
}
