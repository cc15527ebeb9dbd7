// SCU module - interrupt routing shim
//
// The System Control Unit proper (DSP, DMA) is out of scope; the core only
// needs the slice of it that the SH-2 and VDP2 interact with: the interrupt
// status and mask registers, the event entry points called by the VDP2
// timing (VBlank-In/Out, HBlank-In, timer 0) and the status-flag clear the
// SH-2 performs when an interrupt service routine returns.

use crate::sh2::{interrupt_source, Interrupt, Sh2};

/// Interrupt status bits, one per SCU-routed source
mod status_bits {
    pub const V_BLANK_IN: u32 = 1 << 0;
    pub const V_BLANK_OUT: u32 = 1 << 1;
    pub const H_BLANK_IN: u32 = 1 << 2;
    pub const TIMER_0: u32 = 1 << 3;
    pub const TIMER_1: u32 = 1 << 4;
    pub const DSP_END: u32 = 1 << 5;
    pub const SOUND_REQUEST: u32 = 1 << 6;
    pub const SYSTEM_MANAGER: u32 = 1 << 7;
    pub const PAD_INTERRUPT: u32 = 1 << 8;
    pub const LEVEL_2_DMA_END: u32 = 1 << 9;
    pub const LEVEL_1_DMA_END: u32 = 1 << 10;
    pub const LEVEL_0_DMA_END: u32 = 1 << 11;
    pub const DMA_ILLEGAL: u32 = 1 << 12;
    pub const SPRITE_DRAW_END: u32 = 1 << 13;
}

fn status_bit_for_vector(vector: u8) -> u32 {
    use status_bits::*;
    match vector {
        0x40 => V_BLANK_IN,
        0x41 => V_BLANK_OUT,
        0x42 => H_BLANK_IN,
        0x43 => TIMER_0,
        0x44 => TIMER_1,
        0x45 => DSP_END,
        0x46 => SOUND_REQUEST,
        0x47 => SYSTEM_MANAGER,
        0x48 => PAD_INTERRUPT,
        0x49 => LEVEL_2_DMA_END,
        0x4A => LEVEL_1_DMA_END,
        0x4B => LEVEL_0_DMA_END,
        0x4C => DMA_ILLEGAL,
        0x4D => SPRITE_DRAW_END,
        _ => 0,
    }
}

/// The SCU interrupt routing state
pub struct Scu {
    /// Pending status bits, cleared when the ISR finishes
    interrupt_status: u32,
    /// Mask register: a set bit blocks its source
    interrupt_mask: u32,
    /// Timer 0 compare value, matched against the VDP2 line counter
    timer_0_compare: u32,
}

impl Scu {
    pub fn new() -> Self {
        Scu {
            interrupt_status: 0,
            // Everything masked at reset
            interrupt_mask: 0xFFFF_FFFF,
            timer_0_compare: u32::MAX,
        }
    }

    pub fn interrupt_mask(&self) -> u32 {
        self.interrupt_mask
    }

    pub fn set_interrupt_mask(&mut self, mask: u32) {
        self.interrupt_mask = mask;
    }

    pub fn interrupt_status(&self) -> u32 {
        self.interrupt_status
    }

    pub fn timer_0_compare(&self) -> u32 {
        self.timer_0_compare
    }

    pub fn set_timer_0_compare(&mut self, value: u32) {
        self.timer_0_compare = value;
    }

    /// Route one interrupt to the master SH-2, honoring mask and status
    fn dispatch(&mut self, master: &mut Sh2, interrupt: Interrupt) {
        let bit = status_bit_for_vector(interrupt.vector);
        if self.interrupt_mask & bit != 0 {
            log::debug!("SCU interrupt {} masked", interrupt.name);
            return;
        }
        self.interrupt_status |= bit;
        master.send_interrupt(interrupt);
    }

    /// VBlank-In notification from the VDP2 timing
    pub fn on_vblank_in(&mut self, master: &mut Sh2) {
        self.dispatch(master, interrupt_source::V_BLANK_IN);
    }

    /// VBlank-Out notification
    pub fn on_vblank_out(&mut self, master: &mut Sh2) {
        self.dispatch(master, interrupt_source::V_BLANK_OUT);
    }

    /// HBlank-In notification
    pub fn on_hblank_in(&mut self, master: &mut Sh2) {
        self.dispatch(master, interrupt_source::H_BLANK_IN);
    }

    /// Timer 0 compare match
    pub fn on_timer_0(&mut self, master: &mut Sh2) {
        self.dispatch(master, interrupt_source::TIMER_0);
    }

    /// Clear the status flag of a finished interrupt (called on RTE)
    pub fn clear_interrupt_flag(&mut self, interrupt: Interrupt) {
        self.interrupt_status &= !status_bit_for_vector(interrupt.vector);
    }
}

impl Default for Scu {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sh2::Sh2Kind;

    #[test]
    fn test_masked_interrupt_is_not_delivered() {
        let mut scu = Scu::new();
        let mut master = Sh2::new(Sh2Kind::Master);

        scu.on_vblank_in(&mut master);
        assert_eq!(
            master.pending_interrupts_count(),
            0,
            "masked interrupt must not reach the processor"
        );
    }

    #[test]
    fn test_unmasked_interrupt_sets_status_and_queues() {
        let mut scu = Scu::new();
        let mut master = Sh2::new(Sh2Kind::Master);

        scu.set_interrupt_mask(0);
        scu.on_vblank_in(&mut master);

        assert_eq!(master.pending_interrupts_count(), 1);
        assert_ne!(scu.interrupt_status(), 0);

        scu.clear_interrupt_flag(interrupt_source::V_BLANK_IN);
        assert_eq!(scu.interrupt_status(), 0);
    }
}
