// DMA controller (DMAC)
//
// Two channels kicked by CHCR / DMAOR writes. A channel runs when
// DE=1, TE=0, NMIF=0 and AE=0. Transfers complete within the triggering
// write (no cycle stealing is modeled); on completion TE is set and, with
// IE enabled, the end-of-transfer interrupt fires with the vector from
// VCRDMAn and the level from IPRA.

use crate::bus::Bus;
use crate::sh2::interrupt_source;
use crate::sh2::peripherals::intc_bits::*;
use crate::sh2::peripherals::DmaChannelPriority;
use crate::sh2::{Interrupt, Sh2};

/// CHCR: DMA enable
pub const CHCR_DE: u32 = 0x0001;
/// CHCR: transfer end flag
pub const CHCR_TE: u32 = 0x0002;
/// CHCR: interrupt enable
pub const CHCR_IE: u32 = 0x0004;
/// CHCR: auto request mode (0 = module request)
pub const CHCR_AR: u32 = 0x0200;

/// DMAOR: DMA master enable
pub const DMAOR_DME: u32 = 0x0001;
/// DMAOR: NMI flag
pub const DMAOR_NMIF: u32 = 0x0002;
/// DMAOR: address error flag
pub const DMAOR_AE: u32 = 0x0004;
/// DMAOR: priority mode (0 = fixed, 1 = round robin)
pub const DMAOR_PR: u32 = 0x0008;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DmaChannel {
    Channel0,
    Channel1,
}

/// Snapshot of one channel's configuration taken when a transfer is kicked
struct DmaConfiguration {
    channel: DmaChannel,
    counter: u32,
    source: u32,
    destination: u32,
    chcr: u32,
    drcr: u8,
    interrupt: Interrupt,
}

impl Sh2 {
    /// Flip the round-robin latch when the DMAOR priority mode bit changes
    pub(crate) fn update_dma_priority_latch(&mut self, new_dmaor: u32) {
        let new_priority = new_dmaor & DMAOR_PR;
        let old_priority = self.regs.dmac.dmaor & DMAOR_PR;
        if new_priority != old_priority {
            self.dmac_next_priority = if new_priority == 0 {
                DmaChannelPriority::Channel0First
            } else {
                DmaChannelPriority::Channel1First
            };
        }
    }

    /// Run any channel whose start conditions hold
    pub(crate) fn execute_dma(&mut self, bus: &mut dyn Bus) {
        if self.regs.dmac.dmaor & DMAOR_DME == 0 {
            return;
        }

        let conf_channel_0 = self.configure_dma_transfer(DmaChannel::Channel0);
        let conf_channel_1 = self.configure_dma_transfer(DmaChannel::Channel1);

        match self.dmac_next_priority {
            DmaChannelPriority::Channel0First => {
                self.execute_dma_on_channel(bus, conf_channel_0);
                self.execute_dma_on_channel(bus, conf_channel_1);
            }
            DmaChannelPriority::Channel1First => {
                self.execute_dma_on_channel(bus, conf_channel_1);
                self.execute_dma_on_channel(bus, conf_channel_0);
            }
        }

        // In fixed priority mode the latch alternates between invocations
        if self.regs.dmac.dmaor & DMAOR_PR == 0 {
            self.dmac_next_priority = match self.dmac_next_priority {
                DmaChannelPriority::Channel0First => DmaChannelPriority::Channel1First,
                DmaChannelPriority::Channel1First => DmaChannelPriority::Channel0First,
            };
        }
    }

    /// DE=1, TE=0, NMIF=0, AE=0
    fn dma_start_conditions_are_satisfied(&self, channel: DmaChannel) -> bool {
        let chcr = match channel {
            DmaChannel::Channel0 => self.regs.dmac.chcr0,
            DmaChannel::Channel1 => self.regs.dmac.chcr1,
        };
        let de = chcr & CHCR_DE != 0;
        let te = chcr & CHCR_TE != 0;
        let nmif = self.regs.dmac.dmaor & DMAOR_NMIF != 0;
        let ae = self.regs.dmac.dmaor & DMAOR_AE != 0;

        de && !te && !nmif && !ae
    }

    fn configure_dma_transfer(&self, channel: DmaChannel) -> DmaConfiguration {
        match channel {
            DmaChannel::Channel0 => DmaConfiguration {
                channel,
                counter: self.regs.dmac.tcr0 & 0x00FF_FFFF,
                source: self.regs.dmac.sar0,
                destination: self.regs.dmac.dar0,
                chcr: self.regs.dmac.chcr0,
                drcr: self.regs.dmac.drcr0,
                interrupt: interrupt_source::SH2_DMA_0_TRANSFER_END,
            },
            DmaChannel::Channel1 => DmaConfiguration {
                channel,
                counter: self.regs.dmac.tcr1 & 0x00FF_FFFF,
                source: self.regs.dmac.sar1,
                destination: self.regs.dmac.dar1,
                chcr: self.regs.dmac.chcr1,
                drcr: self.regs.dmac.drcr1,
                interrupt: interrupt_source::SH2_DMA_1_TRANSFER_END,
            },
        }
    }

    fn execute_dma_on_channel(&mut self, bus: &mut dyn Bus, mut conf: DmaConfiguration) {
        if !self.dma_start_conditions_are_satisfied(conf.channel) {
            return;
        }

        let sh2_type = self.kind.name();
        let channel_number = match conf.channel {
            DmaChannel::Channel0 => 0,
            DmaChannel::Channel1 => 1,
        };

        if conf.chcr & CHCR_AR == 0 {
            // Module request; only DREQ is serviced (immediately, without
            // waiting for an external signal)
            match conf.drcr & 0b11 {
                0b00 => {
                    log::debug!(
                        "DMAC ({}) - Channel {} external request",
                        sh2_type,
                        channel_number
                    );
                }
                0b01 | 0b10 => {
                    log::warn!(
                        "DMAC ({}) - Channel {} SCI request not implemented !",
                        sh2_type,
                        channel_number
                    );
                    return;
                }
                _ => {
                    log::warn!(
                        "DMAC ({}) - Channel {} module request setting prohibited !",
                        sh2_type,
                        channel_number
                    );
                    return;
                }
            }
        } else {
            log::debug!("DMAC ({}) - Channel {} auto request", sh2_type, channel_number);
        }

        let mut counter = conf.counter;
        let mut source = conf.source;
        let mut destination = conf.destination;
        log::debug!(
            "DMAC ({}) - Channel {} transfer: {:#010x} -> {:#010x}, count {:#x}",
            sh2_type,
            channel_number,
            source,
            destination,
            counter
        );

        while counter > 0 {
            let transfer_size: u8;
            match (conf.chcr >> 10) & 0b11 {
                0b00 => {
                    let value = self.read_byte(bus, source);
                    self.write_byte(bus, destination, value);
                    transfer_size = 1;
                    counter -= 1;
                }
                0b01 => {
                    let value = self.read_word(bus, source);
                    self.write_word(bus, destination, value);
                    transfer_size = 2;
                    counter -= 1;
                }
                0b10 => {
                    let value = self.read_long(bus, source);
                    self.write_long(bus, destination, value);
                    transfer_size = 4;
                    counter -= 1;
                }
                _ => {
                    // 16 byte unit: four longs, the counter drops by four
                    for offset in (0..16).step_by(4) {
                        let value = self.read_long(bus, source.wrapping_add(offset));
                        self.write_long(bus, destination.wrapping_add(offset), value);
                    }
                    transfer_size = 16;
                    counter = counter.saturating_sub(4);
                }
            }

            match (conf.chcr >> 12) & 0b11 {
                0b00 => {}
                0b01 => source = source.wrapping_add(u32::from(transfer_size)),
                0b10 => source = source.wrapping_sub(u32::from(transfer_size)),
                _ => log::warn!("Reserved source address mode used !"),
            }

            match (conf.chcr >> 14) & 0b11 {
                0b00 => {}
                0b01 => destination = destination.wrapping_add(u32::from(transfer_size)),
                0b10 => destination = destination.wrapping_sub(u32::from(transfer_size)),
                _ => log::warn!("Reserved destination address mode used !"),
            }
        }

        match conf.channel {
            DmaChannel::Channel0 => {
                self.regs.dmac.tcr0 = counter;
                self.regs.dmac.sar0 = source;
                self.regs.dmac.dar0 = destination;
                self.regs.dmac.chcr0 |= CHCR_TE;
                conf.interrupt.vector = (self.regs.intc.vcrdma0 & 0xFF) as u8;
            }
            DmaChannel::Channel1 => {
                self.regs.dmac.tcr1 = counter;
                self.regs.dmac.sar1 = source;
                self.regs.dmac.dar1 = destination;
                self.regs.dmac.chcr1 |= CHCR_TE;
                conf.interrupt.vector = (self.regs.intc.vcrdma1 & 0xFF) as u8;
            }
        }

        if conf.chcr & CHCR_IE != 0 {
            log::debug!(
                "DMAC ({}) - Sending DMA channel {} transfer end interrupt",
                sh2_type,
                channel_number
            );
            conf.interrupt.level = ((self.regs.intc.ipra >> IPRA_DMAC_LEVEL_SHIFT) & 0xF) as u8;
            self.send_interrupt(conf.interrupt);
        }
    }
}
