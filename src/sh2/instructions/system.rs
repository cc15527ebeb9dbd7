// System control instructions (LDC/STC, LDS/STS, RTE, TRAPA, SLEEP, flags)

use crate::bus::Bus;
use crate::sh2::interrupt_source;
use crate::sh2::Sh2;
use crate::sh2::SP_REGISTER_INDEX;

impl Sh2 {
    /// NOP
    pub(crate) fn nop(&mut self) {
        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// CLRT: 0 -> T
    pub(crate) fn clrt(&mut self) {
        self.clear_sr_flag(crate::sh2::flags::T);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// SETT: 1 -> T
    pub(crate) fn sett(&mut self) {
        self.set_sr_flag(crate::sh2::flags::T);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    // ========================================
    // LDC / STC (control registers)
    // ========================================

    /// LDC Rm,SR (unwritable bits discarded)
    pub(crate) fn ldcsr(&mut self) {
        self.set_sr(self.r[self.xn00()] as u16);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// LDC Rm,GBR
    pub(crate) fn ldcgbr(&mut self) {
        self.gbr = self.r[self.xn00()];

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// LDC Rm,VBR
    pub(crate) fn ldcvbr(&mut self) {
        self.vbr = self.r[self.xn00()];

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// LDC.L @Rm+,SR
    pub(crate) fn ldcmsr(&mut self, bus: &mut dyn Bus) {
        let n = self.xn00();
        let value = self.read_long(bus, self.r[n]);
        self.set_sr(value as u16);
        self.r[n] = self.r[n].wrapping_add(4);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 3;
    }

    /// LDC.L @Rm+,GBR
    pub(crate) fn ldcmgbr(&mut self, bus: &mut dyn Bus) {
        let n = self.xn00();
        self.gbr = self.read_long(bus, self.r[n]);
        self.r[n] = self.r[n].wrapping_add(4);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 3;
    }

    /// LDC.L @Rm+,VBR
    pub(crate) fn ldcmvbr(&mut self, bus: &mut dyn Bus) {
        let n = self.xn00();
        self.vbr = self.read_long(bus, self.r[n]);
        self.r[n] = self.r[n].wrapping_add(4);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 3;
    }

    /// STC SR,Rn
    pub(crate) fn stcsr(&mut self) {
        self.r[self.xn00()] = self.sr as u32;

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// STC GBR,Rn
    pub(crate) fn stcgbr(&mut self) {
        self.r[self.xn00()] = self.gbr;

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// STC VBR,Rn
    pub(crate) fn stcvbr(&mut self) {
        self.r[self.xn00()] = self.vbr;

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// STC.L SR,@-Rn
    pub(crate) fn stcmsr(&mut self, bus: &mut dyn Bus) {
        let n = self.xn00();
        self.r[n] = self.r[n].wrapping_sub(4);
        let addr = self.r[n];
        let sr = self.sr as u32;
        self.write_long(bus, addr, sr);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 2;
    }

    /// STC.L GBR,@-Rn
    pub(crate) fn stcmgbr(&mut self, bus: &mut dyn Bus) {
        let n = self.xn00();
        self.r[n] = self.r[n].wrapping_sub(4);
        let addr = self.r[n];
        let gbr = self.gbr;
        self.write_long(bus, addr, gbr);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 2;
    }

    /// STC.L VBR,@-Rn
    pub(crate) fn stcmvbr(&mut self, bus: &mut dyn Bus) {
        let n = self.xn00();
        self.r[n] = self.r[n].wrapping_sub(4);
        let addr = self.r[n];
        let vbr = self.vbr;
        self.write_long(bus, addr, vbr);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 2;
    }

    // ========================================
    // LDS / STS (system registers)
    // ========================================

    /// LDS Rm,MACH
    pub(crate) fn ldsmach(&mut self) {
        self.mach = self.r[self.xn00()];

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// LDS Rm,MACL
    pub(crate) fn ldsmacl(&mut self) {
        self.macl = self.r[self.xn00()];

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// LDS Rm,PR
    pub(crate) fn ldspr(&mut self) {
        self.pr = self.r[self.xn00()];

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// LDS.L @Rm+,MACH
    pub(crate) fn ldsmmach(&mut self, bus: &mut dyn Bus) {
        let n = self.xn00();
        self.mach = self.read_long(bus, self.r[n]);
        self.r[n] = self.r[n].wrapping_add(4);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// LDS.L @Rm+,MACL
    pub(crate) fn ldsmmacl(&mut self, bus: &mut dyn Bus) {
        let n = self.xn00();
        self.macl = self.read_long(bus, self.r[n]);
        self.r[n] = self.r[n].wrapping_add(4);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// LDS.L @Rm+,PR
    pub(crate) fn ldsmpr(&mut self, bus: &mut dyn Bus) {
        let n = self.xn00();
        self.pr = self.read_long(bus, self.r[n]);
        self.r[n] = self.r[n].wrapping_add(4);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// STS MACH,Rn
    pub(crate) fn stsmach(&mut self) {
        self.r[self.xn00()] = self.mach;

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// STS MACL,Rn
    pub(crate) fn stsmacl(&mut self) {
        self.r[self.xn00()] = self.macl;

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// STS PR,Rn
    pub(crate) fn stspr(&mut self) {
        self.r[self.xn00()] = self.pr;

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// STS.L MACH,@-Rn
    pub(crate) fn stsmmach(&mut self, bus: &mut dyn Bus) {
        let n = self.xn00();
        self.r[n] = self.r[n].wrapping_sub(4);
        let addr = self.r[n];
        let mach = self.mach;
        self.write_long(bus, addr, mach);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// STS.L MACL,@-Rn
    pub(crate) fn stsmmacl(&mut self, bus: &mut dyn Bus) {
        let n = self.xn00();
        self.r[n] = self.r[n].wrapping_sub(4);
        let addr = self.r[n];
        let macl = self.macl;
        self.write_long(bus, addr, macl);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// STS.L PR,@-Rn
    pub(crate) fn stsmpr(&mut self, bus: &mut dyn Bus) {
        let n = self.xn00();
        self.r[n] = self.r[n].wrapping_sub(4);
        let addr = self.r[n];
        let pr = self.pr;
        self.write_long(bus, addr, pr);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    // ========================================
    // Exception handling
    // ========================================

    /// RTE: pop PC and SR from the stack, with delay slot
    ///
    /// Leaving an interrupt service routine clears the interrupted state and
    /// records the finished vector so the SCU collaborator can drop its
    /// matching status flag.
    pub(crate) fn rte(&mut self, bus: &mut dyn Bus) {
        self.cycles_elapsed = 4;
        self.delay_slot(bus, self.pc.wrapping_add(2));

        self.pc = self.read_long(bus, self.r[SP_REGISTER_INDEX]);
        self.r[SP_REGISTER_INDEX] = self.r[SP_REGISTER_INDEX].wrapping_add(4);
        let sr = self.read_word(bus, self.r[SP_REGISTER_INDEX].wrapping_add(2));
        self.set_sr(sr);
        self.r[SP_REGISTER_INDEX] = self.r[SP_REGISTER_INDEX].wrapping_add(4);

        if self.is_interrupted {
            log::debug!(
                "{} SH2 back from interrupt '{}' (level {:#04x})",
                self.kind.name(),
                self.current_interrupt.name,
                self.current_interrupt.level
            );

            self.finished_interrupts.push(self.current_interrupt);

            self.is_interrupted = false;
            self.is_level_interrupted[(self.current_interrupt.level & 0xF) as usize] = false;
            self.current_interrupt = interrupt_source::UNDEFINED;
        }
    }

    /// TRAPA: push SR and PC, (imm*4 + VBR) -> PC
    pub(crate) fn trapa(&mut self, bus: &mut dyn Bus) {
        let imm = self.x0nn();

        self.r[SP_REGISTER_INDEX] = self.r[SP_REGISTER_INDEX].wrapping_sub(4);
        let addr = self.r[SP_REGISTER_INDEX];
        let sr = self.sr as u32;
        self.write_long(bus, addr, sr);

        self.r[SP_REGISTER_INDEX] = self.r[SP_REGISTER_INDEX].wrapping_sub(4);
        let addr = self.r[SP_REGISTER_INDEX];
        let return_pc = self.pc.wrapping_add(2);
        self.write_long(bus, addr, return_pc);

        self.pc = self.read_long(bus, self.vbr.wrapping_add(imm << 2));
        self.cycles_elapsed = 8;
    }

    /// SLEEP: charge cycles and consume a registered NMI without advancing PC
    ///
    /// The power-down mode itself is not emulated; execution resumes on the
    /// next interrupt the same way the original does.
    pub(crate) fn sleep(&mut self) {
        if self.is_nmi_registered {
            self.send_interrupt(interrupt_source::NMI);
            self.is_nmi_registered = false;
        }

        self.cycles_elapsed = 3;
    }
}
