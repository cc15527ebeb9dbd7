// SH-2 interrupt controller (INTC)
//
// Pending interrupts are queued by `send_interrupt` and applied at the top
// of `step()`, never mid-instruction. The queue holds at most
// [`MAX_PENDING_INTERRUPTS`] entries sorted by descending level, with one
// entry per level; an NMI may evict the lowest entry of a full queue.

use crate::bus::Bus;
use crate::sh2::{Sh2, MAX_PENDING_INTERRUPTS, SP_REGISTER_INDEX};

/// An interrupt request delivered to an SH-2
///
/// `level == 0` means "don't fire". The NMI vector is privileged: it is
/// accepted even when the queue is full and fires regardless of the SR
/// interrupt mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interrupt {
    pub vector: u8,
    /// Priority level, 0..16
    pub level: u8,
    pub name: &'static str,
}

/// Known interrupt sources
///
/// SCU-routed sources carry their fixed vector and level; on-chip sources
/// (FRT, DIVU, DMAC) are templates whose vector and level are read from the
/// relevant on-chip registers at send time.
pub mod interrupt_source {
    use super::Interrupt;

    pub const UNDEFINED: Interrupt = Interrupt { vector: 0, level: 0, name: "undefined" };

    pub const NMI: Interrupt = Interrupt { vector: 0x0B, level: 0xF, name: "NMI" };

    pub const V_BLANK_IN: Interrupt = Interrupt { vector: 0x40, level: 0xF, name: "VBlankIn" };
    pub const V_BLANK_OUT: Interrupt = Interrupt { vector: 0x41, level: 0xE, name: "VBlankOut" };
    pub const H_BLANK_IN: Interrupt = Interrupt { vector: 0x42, level: 0xD, name: "HBlankIn" };
    pub const TIMER_0: Interrupt = Interrupt { vector: 0x43, level: 0xC, name: "Timer0" };
    pub const TIMER_1: Interrupt = Interrupt { vector: 0x44, level: 0xB, name: "Timer1" };
    pub const DSP_END: Interrupt = Interrupt { vector: 0x45, level: 0xA, name: "DspEnd" };
    pub const SOUND_REQUEST: Interrupt =
        Interrupt { vector: 0x46, level: 0x9, name: "SoundRequest" };
    pub const SYSTEM_MANAGER: Interrupt =
        Interrupt { vector: 0x47, level: 0x8, name: "SystemManager" };
    pub const PAD_INTERRUPT: Interrupt =
        Interrupt { vector: 0x48, level: 0x8, name: "PadInterrupt" };
    pub const LEVEL_2_DMA_END: Interrupt =
        Interrupt { vector: 0x49, level: 0x6, name: "Level2DmaEnd" };
    pub const LEVEL_1_DMA_END: Interrupt =
        Interrupt { vector: 0x4A, level: 0x6, name: "Level1DmaEnd" };
    pub const LEVEL_0_DMA_END: Interrupt =
        Interrupt { vector: 0x4B, level: 0x5, name: "Level0DmaEnd" };
    pub const DMA_ILLEGAL: Interrupt = Interrupt { vector: 0x4C, level: 0x3, name: "DmaIllegal" };
    pub const SPRITE_DRAW_END: Interrupt =
        Interrupt { vector: 0x4D, level: 0x2, name: "SpriteDrawEnd" };

    // On-chip templates; vector and level are filled in from INTC registers
    // when the peripheral raises them.
    pub const SH2_FRT_INPUT_CAPTURE: Interrupt =
        Interrupt { vector: 0, level: 0, name: "FrtInputCapture" };
    pub const SH2_FRT_OUTPUT_COMPARE_A: Interrupt =
        Interrupt { vector: 0, level: 0, name: "FrtOutputCompareA" };
    pub const SH2_FRT_OUTPUT_COMPARE_B: Interrupt =
        Interrupt { vector: 0, level: 0, name: "FrtOutputCompareB" };
    pub const SH2_FRT_OVERFLOW: Interrupt = Interrupt { vector: 0, level: 0, name: "FrtOverflow" };
    pub const SH2_DIVISION_OVERFLOW: Interrupt =
        Interrupt { vector: 0, level: 0, name: "DivisionOverflow" };
    pub const SH2_DMA_0_TRANSFER_END: Interrupt =
        Interrupt { vector: 0, level: 0, name: "Dma0TransferEnd" };
    pub const SH2_DMA_1_TRANSFER_END: Interrupt =
        Interrupt { vector: 0, level: 0, name: "Dma1TransferEnd" };
}

impl Sh2 {
    /// Queue a pending interrupt
    ///
    /// Level 0 requests are dropped. A level already pending is dropped
    /// (deduplication). When the queue is full only an NMI gets in, evicting
    /// the lowest-priority entry.
    pub fn send_interrupt(&mut self, interrupt: Interrupt) {
        if interrupt.level == 0 {
            return;
        }

        let level_index = (interrupt.level & 0xF) as usize;
        if self.pending_interrupts.len() < MAX_PENDING_INTERRUPTS {
            if !self.is_level_interrupted[level_index] {
                self.is_level_interrupted[level_index] = true;
                self.pending_interrupts.push(interrupt);

                // Greatest priority first
                self.pending_interrupts.sort_by(|a, b| b.level.cmp(&a.level));

                log::debug!(
                    "{} SH2 interrupt pending: {:#04x}",
                    self.kind.name(),
                    interrupt.vector
                );
            }
        } else {
            // Max number of pending interrupts reached, nothing is added
            log::debug!("Maximum number of pending interrupts reached");

            // When the interrupt is NMI, the lowest priority entry is removed
            if interrupt.vector == interrupt_source::NMI.vector {
                self.pending_interrupts.pop();
                self.pending_interrupts.push(interrupt);
                self.pending_interrupts.sort_by(|a, b| b.level.cmp(&a.level));

                log::debug!("NMI interrupt forced");
            }
        }
    }

    /// Number of queued interrupts, for the debugger
    pub fn pending_interrupts_count(&self) -> usize {
        self.pending_interrupts.len()
    }

    /// Apply the highest pending interrupt if it beats the SR mask
    ///
    /// Runs at the top of `step()`. PC and SR are pushed (SP -= 8), the mask
    /// is raised to the interrupt level and PC is fetched from
    /// `VBR + vector * 4`. An NMI does not mark the processor as
    /// interrupted; everything else does until the matching RTE.
    pub(crate) fn run_interrupt_controller(&mut self, bus: &mut dyn Bus) {
        if self.is_interrupted {
            return;
        }
        let Some(&interrupt) = self.pending_interrupts.first() else {
            return;
        };

        let mask = self.interrupt_mask();
        if interrupt.level > mask || interrupt.vector == interrupt_source::NMI.vector {
            log::debug!(
                "{} SH2 interrupt request {:#04x} level {:#04x}, PC={:#010x}",
                self.kind.name(),
                interrupt.vector,
                interrupt.level,
                self.pc
            );

            self.is_level_interrupted[(interrupt.level & 0xF) as usize] = false;

            // SR and PC are saved to the stack.
            let sp = self.r[SP_REGISTER_INDEX];
            let sr = self.sr as u32;
            self.write_long(bus, sp.wrapping_sub(4), sr);
            let pc = self.pc;
            self.write_long(bus, sp.wrapping_sub(8), pc);
            self.r[SP_REGISTER_INDEX] = sp.wrapping_sub(8);

            self.set_interrupt_mask(interrupt.level);

            if interrupt.vector != interrupt_source::NMI.vector {
                // Entering interrupt mode.
                self.is_interrupted = true;
                self.current_interrupt = interrupt;
                log::debug!(
                    "{} SH2 {} interrupt routine started",
                    self.kind.name(),
                    interrupt.name
                );
            }

            self.pc = self
                .read_long(bus, self.vbr.wrapping_add(u32::from(interrupt.vector) * 4));

            self.pending_interrupts.remove(0);
        }
    }
}
