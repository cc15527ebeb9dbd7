// Branch instructions
//
// The delayed branches run the instruction at PC+2 through `delay_slot`
// before committing the branch target, so every register the target depends
// on is captured first. A conditional branch that does not take charges a
// single cycle and no slot runs.

use crate::bus::Bus;
use crate::sh2::flags;
use crate::sh2::Sh2;

#[inline]
fn sign_extend_8(disp: u32) -> u32 {
    disp as u8 as i8 as i32 as u32
}

#[inline]
fn sign_extend_12(disp: u32) -> u32 {
    if disp & 0x800 == 0 {
        disp & 0xFFF
    } else {
        disp | 0xFFFF_F000
    }
}

impl Sh2 {
    /// BF: if T = 0, PC + disp*2 + 4 -> PC, else next instruction
    pub(crate) fn bf(&mut self) {
        if !self.sr_flag(flags::T) {
            let disp = sign_extend_8(self.x0nn());
            self.pc = self.pc.wrapping_add(disp << 1).wrapping_add(4);
            self.cycles_elapsed = 3;
        } else {
            self.pc = self.pc.wrapping_add(2);
            self.cycles_elapsed = 1;
        }
    }

    /// BF/S: like BF but with a delay slot when the branch is taken
    pub(crate) fn bfs(&mut self, bus: &mut dyn Bus) {
        if !self.sr_flag(flags::T) {
            let disp = sign_extend_8(self.x0nn());
            let saved_pc = self.pc;
            self.cycles_elapsed = 2;
            self.delay_slot(bus, self.pc.wrapping_add(2));
            self.pc = saved_pc.wrapping_add(disp << 1).wrapping_add(4);
        } else {
            self.pc = self.pc.wrapping_add(2);
            self.cycles_elapsed = 1;
        }
    }

    /// BT: if T = 1, PC + disp*2 + 4 -> PC, else next instruction
    pub(crate) fn bt(&mut self) {
        if self.sr_flag(flags::T) {
            let disp = sign_extend_8(self.x0nn());
            self.pc = self.pc.wrapping_add(disp << 1).wrapping_add(4);
            self.cycles_elapsed = 3;
        } else {
            self.pc = self.pc.wrapping_add(2);
            self.cycles_elapsed = 1;
        }
    }

    /// BT/S: like BT but with a delay slot when the branch is taken
    pub(crate) fn bts(&mut self, bus: &mut dyn Bus) {
        if self.sr_flag(flags::T) {
            let disp = sign_extend_8(self.x0nn());
            let saved_pc = self.pc;
            self.cycles_elapsed = 2;
            self.delay_slot(bus, self.pc.wrapping_add(2));
            self.pc = saved_pc.wrapping_add(disp << 1).wrapping_add(4);
        } else {
            self.pc = self.pc.wrapping_add(2);
            self.cycles_elapsed = 1;
        }
    }

    /// BRA: PC + disp*2 + 4 -> PC, with delay slot
    pub(crate) fn bra(&mut self, bus: &mut dyn Bus) {
        let disp = sign_extend_12(self.xnnn());
        let saved_pc = self.pc;
        self.cycles_elapsed = 2;
        self.delay_slot(bus, self.pc.wrapping_add(2));
        self.pc = saved_pc.wrapping_add(disp << 1).wrapping_add(4);
    }

    /// BRAF: PC + Rn + 4 -> PC, with delay slot
    pub(crate) fn braf(&mut self, bus: &mut dyn Bus) {
        let old_pc = self.pc;
        let old_r = self.r[self.xn00()];

        self.cycles_elapsed = 2;
        self.delay_slot(bus, self.pc.wrapping_add(2));
        self.pc = old_pc.wrapping_add(old_r).wrapping_add(4);
    }

    /// BSR: PC + 4 -> PR, PC + disp*2 + 4 -> PC, with delay slot
    pub(crate) fn bsr(&mut self, bus: &mut dyn Bus) {
        let disp = sign_extend_12(self.xnnn());
        self.pr = self.pc.wrapping_add(4);
        let old_pc = self.pc;
        self.cycles_elapsed = 2;
        self.delay_slot(bus, self.pc.wrapping_add(2));
        self.pc = old_pc.wrapping_add(disp << 1).wrapping_add(4);

        self.add_to_callstack(old_pc, self.pr);
    }

    /// BSRF: PC + 4 -> PR, PC + Rn + 4 -> PC, with delay slot
    pub(crate) fn bsrf(&mut self, bus: &mut dyn Bus) {
        self.pr = self.pc.wrapping_add(4);

        let old_pc = self.pc;
        let old_r = self.r[self.xn00()];
        self.cycles_elapsed = 2;
        self.delay_slot(bus, self.pc.wrapping_add(2));
        self.pc = old_pc.wrapping_add(4).wrapping_add(old_r);

        self.add_to_callstack(old_pc, self.pr);
    }

    /// JMP: Rn -> PC, with delay slot
    pub(crate) fn jmp(&mut self, bus: &mut dyn Bus) {
        let old_r = self.r[self.xn00()];
        self.cycles_elapsed = 2;
        self.delay_slot(bus, self.pc.wrapping_add(2));

        self.pc = old_r;
    }

    /// JSR: PC + 4 -> PR, Rn -> PC, with delay slot
    pub(crate) fn jsr(&mut self, bus: &mut dyn Bus) {
        let old_r = self.r[self.xn00()];
        self.pr = self.pc.wrapping_add(4);
        self.cycles_elapsed = 2;
        self.delay_slot(bus, self.pc.wrapping_add(2));

        self.add_to_callstack(self.pc, self.pr);

        self.pc = old_r;
    }

    /// RTS: PR -> PC, with delay slot
    ///
    /// Pops the callstack; when the debugger is waiting for the end of a
    /// routine (step-over / step-out), returning to the recorded depth
    /// pauses the host.
    pub(crate) fn rts(&mut self, bus: &mut dyn Bus) {
        use crate::debug::DebugStatus;

        self.cycles_elapsed = 2;
        self.delay_slot(bus, self.pc.wrapping_add(2));

        self.pop_from_callstack();
        match self.debug.debug_status() {
            DebugStatus::StepOut | DebugStatus::WaitEndOfRoutine => {
                if self.step_over_subroutine_depth == self.callstack_depth() {
                    self.debug.set_debug_status(DebugStatus::Paused);
                }
            }
            _ => {}
        }

        self.pc = self.pr;
    }
}
