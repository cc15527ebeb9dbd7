// SH-2 execution loop
//
// `step()` runs exactly one instruction: pending interrupts are applied at
// the top, the opcode at PC is fetched and dispatched through the decode
// table, the free-running timer advances by the consumed cycles, and the PC
// breakpoints are checked. Delay slot execution happens inside the branch
// instruction that owns the slot, before the branch target is committed.

use crate::bus::Bus;
use crate::debug::{DebugStatus, EmulationStatus};
use crate::sh2::opcodes::{decode, Instruction};
use crate::sh2::{Sh2, IGNORED_DELAY_SLOT_ADDRESS};

impl Sh2 {
    /// Execute one instruction and return the cycles it consumed
    ///
    /// The count includes the delay slot instruction when the executed
    /// instruction is a delayed branch.
    pub fn step(&mut self, bus: &mut dyn Bus) -> u8 {
        self.run_interrupt_controller(bus);

        self.current_opcode = self.read_word(bus, self.pc);
        self.execute(bus);

        self.run_free_running_timer(self.cycles_elapsed);

        self.cycles_elapsed
    }

    /// Dispatch the current opcode
    ///
    /// Also drives the debugger stepping modes: step-into pauses after one
    /// instruction, step-over pauses unless the instruction calls a
    /// subroutine, in which case execution continues until the matching RTS.
    pub(crate) fn execute(&mut self, bus: &mut dyn Bus) {
        let decoded = decode(self.current_opcode);

        match self.debug.debug_status() {
            DebugStatus::StepOver => {
                if decoded.is_subroutine_call {
                    self.debug.set_debug_status(DebugStatus::WaitEndOfRoutine);
                    self.initialize_subroutine_depth();
                } else {
                    self.debug.set_debug_status(DebugStatus::Paused);
                }
            }
            DebugStatus::StepInto => {
                self.debug.set_debug_status(DebugStatus::Paused);
            }
            _ => {}
        }

        self.dispatch(decoded.instruction, bus);

        self.check_breakpoints();
    }

    /// Execute the instruction in a delay slot
    ///
    /// Fetches the opcode at `addr` and runs it before the owning branch
    /// commits its target; the slot cycles are added to the branch cycles.
    /// An instruction of the branch family in the slot is an illegal-slot
    /// error and stops the emulation without executing it. The power-on
    /// sentinel address is skipped entirely.
    pub(crate) fn delay_slot(&mut self, bus: &mut dyn Bus, addr: u32) {
        let current_inst_cycles = self.cycles_elapsed;

        if addr == IGNORED_DELAY_SLOT_ADDRESS {
            return;
        }

        self.current_opcode = self.read_word(bus, addr);
        let decoded = decode(self.current_opcode);

        if decoded.is_illegal_in_slot {
            log::error!(
                "{} SH2 illegal instruction slot at {:#010x} (opcode {:#06x})",
                self.kind.name(),
                addr,
                self.current_opcode
            );
            self.debug.set_emulation_status(EmulationStatus::Stopped);
        } else {
            self.dispatch(decoded.instruction, bus);
            self.cycles_elapsed = self.cycles_elapsed.wrapping_add(current_inst_cycles);
        }
    }

    #[allow(clippy::too_many_lines)]
    fn dispatch(&mut self, instruction: Instruction, bus: &mut dyn Bus) {
        use Instruction::*;

        match instruction {
            Add => self.add(),
            AddI => self.addi(),
            AddC => self.addc(),
            AddV => self.addv(),
            And => self.and(),
            AndI => self.andi(),
            AndM => self.andm(bus),
            Bf => self.bf(),
            BfS => self.bfs(bus),
            Bt => self.bt(),
            BtS => self.bts(bus),
            Bra => self.bra(bus),
            Braf => self.braf(bus),
            Bsr => self.bsr(bus),
            Bsrf => self.bsrf(bus),
            ClrMac => self.clrmac(),
            ClrT => self.clrt(),
            CmpEq => self.cmpeq(),
            CmpGe => self.cmpge(),
            CmpGt => self.cmpgt(),
            CmpHi => self.cmphi(),
            CmpHs => self.cmphs(),
            CmpPl => self.cmppl(),
            CmpPz => self.cmppz(),
            CmpStr => self.cmpstr(),
            CmpIm => self.cmpim(),
            Div0S => self.div0s(),
            Div0U => self.div0u(),
            Div1 => self.div1(),
            DmulS => self.dmuls(),
            DmulU => self.dmulu(),
            Dt => self.dt(),
            ExtSB => self.extsb(),
            ExtSW => self.extsw(),
            ExtUB => self.extub(),
            ExtUW => self.extuw(),
            Jmp => self.jmp(bus),
            Jsr => self.jsr(bus),
            LdcSr => self.ldcsr(),
            LdcGbr => self.ldcgbr(),
            LdcVbr => self.ldcvbr(),
            LdcmSr => self.ldcmsr(bus),
            LdcmGbr => self.ldcmgbr(bus),
            LdcmVbr => self.ldcmvbr(bus),
            LdsMach => self.ldsmach(),
            LdsMacl => self.ldsmacl(),
            LdsPr => self.ldspr(),
            LdsmMach => self.ldsmmach(bus),
            LdsmMacl => self.ldsmmacl(bus),
            LdsmPr => self.ldsmpr(bus),
            MacL => self.macl_op(bus),
            MacW => self.macw(bus),
            Mov => self.mov(),
            MovBS => self.movbs(bus),
            MovWS => self.movws(bus),
            MovLS => self.movls(bus),
            MovBL => self.movbl(bus),
            MovWL => self.movwl(bus),
            MovLL => self.movll(bus),
            MovBM => self.movbm(bus),
            MovWM => self.movwm(bus),
            MovLM => self.movlm(bus),
            MovBP => self.movbp(bus),
            MovWP => self.movwp(bus),
            MovLP => self.movlp(bus),
            MovBS0 => self.movbs0(bus),
            MovWS0 => self.movws0(bus),
            MovLS0 => self.movls0(bus),
            MovBL0 => self.movbl0(bus),
            MovWL0 => self.movwl0(bus),
            MovLL0 => self.movll0(bus),
            MovI => self.movi(),
            MovWI => self.movwi(bus),
            MovLI => self.movli(bus),
            MovBLG => self.movblg(bus),
            MovWLG => self.movwlg(bus),
            MovLLG => self.movllg(bus),
            MovBSG => self.movbsg(bus),
            MovWSG => self.movwsg(bus),
            MovLSG => self.movlsg(bus),
            MovBS4 => self.movbs4(bus),
            MovWS4 => self.movws4(bus),
            MovLS4 => self.movls4(bus),
            MovBL4 => self.movbl4(bus),
            MovWL4 => self.movwl4(bus),
            MovLL4 => self.movll4(bus),
            MovA => self.mova(),
            MovT => self.movt(),
            MulL => self.mull(),
            MulS => self.muls(),
            MulU => self.mulu(),
            Neg => self.neg(),
            NegC => self.negc(),
            Nop => self.nop(),
            Not => self.not(),
            Or => self.or(),
            OrI => self.ori(),
            OrM => self.orm(bus),
            RotCL => self.rotcl(),
            RotCR => self.rotcr(),
            RotL => self.rotl(),
            RotR => self.rotr(),
            Rte => self.rte(bus),
            Rts => self.rts(bus),
            SetT => self.sett(),
            ShAL => self.shal(),
            ShAR => self.shar(),
            ShLL => self.shll(),
            ShLL2 => self.shll2(),
            ShLL8 => self.shll8(),
            ShLL16 => self.shll16(),
            ShLR => self.shlr(),
            ShLR2 => self.shlr2(),
            ShLR8 => self.shlr8(),
            ShLR16 => self.shlr16(),
            Sleep => self.sleep(),
            StcSr => self.stcsr(),
            StcGbr => self.stcgbr(),
            StcVbr => self.stcvbr(),
            StcmSr => self.stcmsr(bus),
            StcmGbr => self.stcmgbr(bus),
            StcmVbr => self.stcmvbr(bus),
            StsMach => self.stsmach(),
            StsMacl => self.stsmacl(),
            StsPr => self.stspr(),
            StsmMach => self.stsmmach(bus),
            StsmMacl => self.stsmmacl(bus),
            StsmPr => self.stsmpr(bus),
            Sub => self.sub(),
            SubC => self.subc(),
            SubV => self.subv(),
            SwapB => self.swapb(),
            SwapW => self.swapw(),
            Tas => self.tas(bus),
            Trapa => self.trapa(bus),
            Tst => self.tst(),
            TstI => self.tsti(),
            TstM => self.tstm(bus),
            Xor => self.xor(),
            XorI => self.xori(),
            XorM => self.xorm(bus),
            Xtrct => self.xtrct(),
            BadOpcode => self.bad_opcode(),
        }
    }

    /// Unknown encoding: log, leave PC unchanged and stop the host.
    /// No exception is modeled; the next step would refetch the same opcode.
    fn bad_opcode(&mut self) {
        log::error!(
            "{} SH2 unexpected opcode {:#06x} at PC {:#010x}",
            self.kind.name(),
            self.current_opcode,
            self.pc
        );
        self.debug.set_emulation_status(EmulationStatus::Stopped);
        self.cycles_elapsed = 1;
    }
}
