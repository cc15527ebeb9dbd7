// Free-running timer (FRT)
//
// The FRT advances on every `step()` by the cycles the instruction consumed,
// divided by the selected clock divisor; cycles below the divisor are kept in
// an accumulator so no time is lost between steps. Overflow and the two
// output-compare matches set their FTCSR flags and may queue interrupts with
// vectors and levels taken from the INTC registers.

use crate::sh2::interrupt_source;
use crate::sh2::peripherals::intc_bits::*;
use crate::sh2::{Interrupt, Sh2};

pub const CLOCK_DIVISOR_8: u32 = 8;
pub const CLOCK_DIVISOR_32: u32 = 32;
pub const CLOCK_DIVISOR_128: u32 = 128;
pub const CLOCK_DIVISOR_MASK_8: u32 = 0b111;
pub const CLOCK_DIVISOR_MASK_32: u32 = 0b1_1111;
pub const CLOCK_DIVISOR_MASK_128: u32 = 0b111_1111;

/// TIER: input capture interrupt enable
pub const TIER_ICIE: u8 = 0x80;
/// TIER: output compare interrupt A enable
pub const TIER_OCIAE: u8 = 0x08;
/// TIER: output compare interrupt B enable
pub const TIER_OCIBE: u8 = 0x04;
/// TIER: timer overflow interrupt enable
pub const TIER_OVIE: u8 = 0x02;

/// FTCSR: input capture flag
pub const FTCSR_ICF: u8 = 0x80;
/// FTCSR: output compare flag A
pub const FTCSR_OCFA: u8 = 0x08;
/// FTCSR: output compare flag B
pub const FTCSR_OCFB: u8 = 0x04;
/// FTCSR: timer overflow flag
pub const FTCSR_OVF: u8 = 0x02;
/// FTCSR: counter clear on compare match A
pub const FTCSR_CCLRA: u8 = 0x01;

/// TCR: clock select field
pub const TCR_CKS_MASK: u8 = 0x03;

impl Sh2 {
    /// Reconfigure the divisor after a TCR write
    pub(crate) fn update_frt_clock_divisor(&mut self) {
        match self.regs.frt.tcr & TCR_CKS_MASK {
            0 => {
                self.frt_clock_divisor = CLOCK_DIVISOR_8;
                self.frt_mask = CLOCK_DIVISOR_MASK_8;
            }
            1 => {
                self.frt_clock_divisor = CLOCK_DIVISOR_32;
                self.frt_mask = CLOCK_DIVISOR_MASK_32;
            }
            2 => {
                self.frt_clock_divisor = CLOCK_DIVISOR_128;
                self.frt_mask = CLOCK_DIVISOR_MASK_128;
            }
            _ => log::warn!("FRT - External clock not implemented"),
        }
    }

    /// Advance the timer by the cycles one instruction consumed
    pub(crate) fn run_free_running_timer(&mut self, cycles_to_run: u8) {
        let elapsed_cycles = self.frt_elapsed_cycles + u32::from(cycles_to_run);
        let counter_increment = elapsed_cycles / self.frt_clock_divisor;

        if counter_increment == 0 {
            self.frt_elapsed_cycles += u32::from(cycles_to_run);
            return;
        }

        let old_frc = u32::from(self.regs.frt.frc);
        let current_frc = old_frc + counter_increment;
        self.regs.frt.frc = current_frc as u16;

        self.frt_elapsed_cycles = elapsed_cycles & self.frt_mask;

        // Checking overflow
        if current_frc > u32::from(u16::MAX) {
            self.regs.frt.ftcsr |= FTCSR_OVF;
            if self.regs.frt.tier & TIER_OVIE != 0 {
                log::debug!("FRT - Sending overflow interrupt");
                let interrupt = Interrupt {
                    vector: ((self.regs.intc.vcrd >> VCRD_FOVV_SHIFT) & 0x7F) as u8,
                    level: ((self.regs.intc.iprb >> IPRB_FRT_LEVEL_SHIFT) & 0xF) as u8,
                    ..interrupt_source::SH2_FRT_OVERFLOW
                };
                self.send_interrupt(interrupt);
            }
        }

        // Checking comparison for OCRA
        let ocra = u32::from(self.regs.frt.ocra);
        if old_frc <= ocra && current_frc > ocra {
            self.regs.frt.ftcsr |= FTCSR_OCFA;
            if self.regs.frt.tier & TIER_OCIAE != 0 {
                log::debug!("FRT - OCRA match");
                let interrupt = Interrupt {
                    vector: ((self.regs.intc.vcrc >> VCRC_FOCV_SHIFT) & 0x7F) as u8,
                    level: ((self.regs.intc.iprb >> IPRB_FRT_LEVEL_SHIFT) & 0xF) as u8,
                    ..interrupt_source::SH2_FRT_OUTPUT_COMPARE_A
                };
                self.send_interrupt(interrupt);
            }
            if self.regs.frt.ftcsr & FTCSR_CCLRA != 0 {
                self.regs.frt.frc = 0;
            }
        }

        // Checking comparison for OCRB
        let ocrb = u32::from(self.regs.frt.ocrb);
        if old_frc <= ocrb && current_frc > ocrb {
            self.regs.frt.ftcsr |= FTCSR_OCFB;
            if self.regs.frt.tier & TIER_OCIBE != 0 {
                log::debug!("FRT - OCRB match");
                let interrupt = Interrupt {
                    vector: ((self.regs.intc.vcrc >> VCRC_FOCV_SHIFT) & 0x7F) as u8,
                    level: ((self.regs.intc.iprb >> IPRB_FRT_LEVEL_SHIFT) & 0xF) as u8,
                    ..interrupt_source::SH2_FRT_OUTPUT_COMPARE_B
                };
                self.send_interrupt(interrupt);
            }
        }
    }

    /// Latch FRC into the input capture register and raise the capture
    /// interrupt when enabled. Driven by the SMPC collaborator.
    pub fn send_interrupt_capture_signal(&mut self) {
        if self.regs.frt.tier & TIER_ICIE != 0 {
            let interrupt = Interrupt {
                vector: ((self.regs.intc.vcrc >> VCRC_FICV_SHIFT) & 0x7F) as u8,
                level: ((self.regs.intc.iprb >> IPRB_FRT_LEVEL_SHIFT) & 0xF) as u8,
                ..interrupt_source::SH2_FRT_INPUT_CAPTURE
            };
            self.send_interrupt(interrupt);
        }

        self.regs.frt.ftcsr |= FTCSR_ICF;
        self.regs.frt.icr = self.regs.frt.frc;
    }
}
