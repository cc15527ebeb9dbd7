// Division unit (DIVU)
//
// Writing DVDNT starts a 32/32 signed division, writing DVDNTL a 64/32 one
// with DVDNTH:DVDNTL as the dividend. A zero divisor or a quotient outside
// the 32 bit signed range sets DVCR.OVF and, when DVCR.OVFIE is set, queues
// the division overflow interrupt with the vector from VCRDIV and the level
// from IPRA. Results are mirrored into the ST-V shadow registers when the
// division completes. OVF stays set until software rewrites DVCR.

use crate::sh2::interrupt_source;
use crate::sh2::peripherals::intc_bits::*;
use crate::sh2::{Interrupt, Sh2};

/// DVCR: overflow flag
pub const DVCR_OVF: u32 = 0x1;
/// DVCR: interrupt request on overflow enable
pub const DVCR_OVFIE: u32 = 0x2;

impl Sh2 {
    /// 32/32 signed division, triggered by a DVDNT write
    pub(crate) fn start_32bit_division(&mut self) {
        log::debug!("32/32 division");

        // DVDNT is copied in DVDNTL, with DVDNTH holding its sign extension
        self.regs.divu.dvdntl = self.regs.divu.dvdnt;

        let dvdnt = self.regs.divu.dvdnt;
        self.regs.divu.dvdnth = if (dvdnt as i32) < 0 { u32::MAX } else { 0 };

        let dvsr = self.regs.divu.dvsr;

        self.divu_quotient = 0;
        self.divu_remainder = 0;
        if dvsr != 0 {
            // Done in 64 bits so INT32_MIN / -1 computes instead of trapping
            let quotient = (dvdnt as i32 as i64) / (dvsr as i32 as i64);
            let remainder = (dvdnt as i32 as i64) % (dvsr as i32 as i64);
            self.divu_quotient = quotient as i32;
            self.divu_remainder = remainder as i32;

            if quotient > i64::from(i32::MAX) || quotient < i64::from(i32::MIN) {
                log::debug!("{:#x} / {:#x} -> Overflow detected !", dvdnt, dvsr);
                self.regs.divu.dvcr |= DVCR_OVF;
            } else {
                log::debug!(
                    "{:#x} / {:#x} -> {:#x}, {:#x}",
                    dvdnt,
                    dvsr,
                    self.divu_quotient,
                    self.divu_remainder
                );
            }
        } else {
            log::debug!("{:#x} / {:#x} -> Overflow detected !", dvdnt, dvsr);
            self.regs.divu.dvcr |= DVCR_OVF;
        }

        // Boundary case: a quotient pinned at INT32_MAX with a negative
        // remainder and both operands negative also overflows
        let is_dvdnt_negative = dvdnt & 0x8000_0000 != 0;
        let is_dvsr_negative = dvsr & 0x8000_0000 != 0;
        if is_dvdnt_negative
            && is_dvsr_negative
            && self.divu_quotient == i32::MAX
            && self.divu_remainder < 0
        {
            log::debug!("{:#x} / {:#x} -> Overflow detected !", dvdnt, dvsr);
            self.regs.divu.dvcr |= DVCR_OVF;
        }

        self.divu_remaining_cycles = 0;
        self.divu_is_running = true;
    }

    /// 64/32 signed division, triggered by a DVDNTL write
    pub(crate) fn start_64bit_division(&mut self) {
        log::debug!("64/32 division");

        let dvdntl = self.regs.divu.dvdntl;
        let dvdnth = self.regs.divu.dvdnth;
        let dvsr = self.regs.divu.dvsr;

        let dividend = ((u64::from(dvdnth) << 32) | u64::from(dvdntl)) as i64;

        let mut quotient = 0i64;
        let mut remainder = 0i64;
        if dvsr != 0 {
            quotient = dividend.wrapping_div(dvsr as i32 as i64);
            remainder = dividend.wrapping_rem(dvsr as i32 as i64);

            if quotient > i64::from(i32::MAX) || quotient < i64::from(i32::MIN) {
                log::debug!("{:#x} / {:#x} -> Overflow detected !", dividend, dvsr);
                self.regs.divu.dvcr |= DVCR_OVF;
            } else {
                log::debug!(
                    "{:#x} / {:#x} -> {:#x}, {:#x}",
                    dividend,
                    dvsr,
                    quotient,
                    remainder
                );
            }
        } else {
            log::debug!("{:#x} / {:#x} -> Overflow detected !", dividend, dvsr);
            self.regs.divu.dvcr |= DVCR_OVF;
        }

        let is_dvdnth_negative = dvdnth & 0x8000_0000 != 0;
        let is_dvsr_negative = dvsr & 0x8000_0000 != 0;
        if is_dvdnth_negative
            && is_dvsr_negative
            && quotient == i64::from(i32::MAX)
            && (remainder as i32) < 0
        {
            log::debug!("{:#x} / {:#x} -> Overflow detected !", dividend, dvsr);
            self.regs.divu.dvcr |= DVCR_OVF;
        }

        self.divu_remaining_cycles = 0;
        self.divu_quotient = quotient as i32;
        self.divu_remainder = remainder as i32;
        self.divu_is_running = true;
    }

    /// Finish a running division once its cycle budget is spent
    ///
    /// The budget is currently zero so divisions complete on the write that
    /// started them. Overflow raises the DIVU interrupt (when enabled)
    /// instead of storing a result.
    pub(crate) fn run_division_unit(&mut self, cycles_to_run: u8) {
        self.divu_remaining_cycles = self.divu_remaining_cycles.saturating_sub(cycles_to_run);
        if self.divu_remaining_cycles != 0 {
            return;
        }

        if self.regs.divu.dvcr & DVCR_OVF != 0 {
            if self.regs.divu.dvcr & DVCR_OVFIE != 0 {
                log::debug!("DIVU - Sending division overflow interrupt");
                let interrupt = Interrupt {
                    vector: (self.regs.intc.vcrdiv & 0x7F) as u8,
                    level: ((self.regs.intc.ipra >> IPRA_DIVU_LEVEL_SHIFT) & 0xF) as u8,
                    ..interrupt_source::SH2_DIVISION_OVERFLOW
                };
                self.send_interrupt(interrupt);
            }
        } else {
            // Copy in DVDNTL and DVDNTH + ST-V mirroring
            self.regs.divu.dvdnt = self.divu_quotient as u32;
            self.regs.divu.dvdntl = self.divu_quotient as u32;
            self.regs.divu.dvdntl_shadow = self.divu_quotient as u32;

            self.regs.divu.dvdnth = self.divu_remainder as u32;
            self.regs.divu.dvdnth_shadow = self.divu_remainder as u32;
        }
        self.divu_is_running = false;
    }
}
