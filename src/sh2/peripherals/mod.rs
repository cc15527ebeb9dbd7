// SH-2 on-chip peripheral register file
//
// The peripherals live in the $FFFFFE00-$FFFFFFFF window, intercepted by the
// processor before the external bus. Each block is a strongly-typed record;
// byte, word and long accesses are routed here with the side effects each
// register carries (cache purge, DIVU start, DMA kick, FRT divisor update).

pub mod dmac;
pub mod divu;
pub mod frt;

use crate::bus::Bus;
use crate::sh2::{Sh2, Sh2Kind};

/// On-chip register addresses (SH7604)
pub mod addresses {
    // INTC
    pub const IPRA: u32 = 0xFFFF_FEE2;
    pub const IPRB: u32 = 0xFFFF_FE60;
    pub const VCRA: u32 = 0xFFFF_FE62;
    pub const VCRB: u32 = 0xFFFF_FE64;
    pub const VCRC: u32 = 0xFFFF_FE66;
    pub const VCRD: u32 = 0xFFFF_FE68;
    pub const VCRWDT: u32 = 0xFFFF_FEE4;
    pub const VCRDIV: u32 = 0xFFFF_FF0C;
    pub const VCRDMA0: u32 = 0xFFFF_FFA0;
    pub const VCRDMA1: u32 = 0xFFFF_FFA8;
    pub const ICR: u32 = 0xFFFF_FEE0;

    // BSC
    pub const BCR1: u32 = 0xFFFF_FFE0;
    pub const BCR2: u32 = 0xFFFF_FFE4;
    pub const WCR: u32 = 0xFFFF_FFE8;
    pub const MCR: u32 = 0xFFFF_FFEC;
    pub const RTCSR: u32 = 0xFFFF_FFF0;
    pub const RTCNT: u32 = 0xFFFF_FFF4;
    pub const RTCOR: u32 = 0xFFFF_FFF8;

    // Cache
    pub const CCR: u32 = 0xFFFF_FE92;

    // DMAC
    pub const SAR0: u32 = 0xFFFF_FF80;
    pub const DAR0: u32 = 0xFFFF_FF84;
    pub const TCR0: u32 = 0xFFFF_FF88;
    pub const CHCR0: u32 = 0xFFFF_FF8C;
    pub const SAR1: u32 = 0xFFFF_FF90;
    pub const DAR1: u32 = 0xFFFF_FF94;
    pub const TCR1: u32 = 0xFFFF_FF98;
    pub const CHCR1: u32 = 0xFFFF_FF9C;
    pub const DRCR0: u32 = 0xFFFF_FE71;
    pub const DRCR1: u32 = 0xFFFF_FE72;
    pub const DMAOR: u32 = 0xFFFF_FFB0;

    // DIVU
    pub const DVSR: u32 = 0xFFFF_FF00;
    pub const DVDNT: u32 = 0xFFFF_FF04;
    pub const DVCR: u32 = 0xFFFF_FF08;
    pub const DVDNTH: u32 = 0xFFFF_FF10;
    pub const DVDNTL: u32 = 0xFFFF_FF14;
    pub const DVDNTH_SHADOW: u32 = 0xFFFF_FF18;
    pub const DVDNTL_SHADOW: u32 = 0xFFFF_FF1C;

    // FRT
    pub const TIER: u32 = 0xFFFF_FE10;
    pub const FTCSR: u32 = 0xFFFF_FE11;
    pub const FRC: u32 = 0xFFFF_FE12;
    pub const OCR: u32 = 0xFFFF_FE14;
    pub const FRT_TCR: u32 = 0xFFFF_FE16;
    pub const TOCR: u32 = 0xFFFF_FE17;
    pub const FRT_ICR: u32 = 0xFFFF_FE18;

    // WDT
    pub const WTCSR: u32 = 0xFFFF_FE80;
    pub const WTCNT: u32 = 0xFFFF_FE81;
    pub const RSTCSR: u32 = 0xFFFF_FE82;

    // SCI
    pub const SMR: u32 = 0xFFFF_FE00;
    pub const BRR: u32 = 0xFFFF_FE01;
    pub const SCR: u32 = 0xFFFF_FE02;
    pub const TDR: u32 = 0xFFFF_FE03;
    pub const SSR: u32 = 0xFFFF_FE04;
    pub const RDR: u32 = 0xFFFF_FE05;

    // Power-down modes
    pub const SBYCR: u32 = 0xFFFF_FE91;
}

/// Interrupt controller registers
#[derive(Debug, Default, Clone)]
pub struct Intc {
    pub ipra: u16,
    pub iprb: u16,
    pub vcra: u16,
    pub vcrb: u16,
    pub vcrc: u16,
    pub vcrd: u16,
    pub vcrwdt: u16,
    pub vcrdiv: u32,
    pub vcrdma0: u32,
    pub vcrdma1: u32,
    pub icr: u16,
}

pub mod intc_bits {
    /// IPRA: DIVU level field shift
    pub const IPRA_DIVU_LEVEL_SHIFT: u16 = 12;
    /// IPRA: DMAC level field shift
    pub const IPRA_DMAC_LEVEL_SHIFT: u16 = 8;
    /// IPRB: FRT level field shift
    pub const IPRB_FRT_LEVEL_SHIFT: u16 = 8;
    /// VCRC: input capture vector shift
    pub const VCRC_FICV_SHIFT: u16 = 8;
    /// VCRC: output compare vector shift
    pub const VCRC_FOCV_SHIFT: u16 = 0;
    /// VCRD: overflow vector shift
    pub const VCRD_FOVV_SHIFT: u16 = 8;
    /// ICR: NMI level bit
    pub const ICR_NMIL: u16 = 0x8000;
    /// ICR: NMI edge select bit (0: falling, 1: rising)
    pub const ICR_NMIE: u16 = 0x0100;
}

/// Bus state controller registers
#[derive(Debug, Default, Clone)]
pub struct Bsc {
    pub bcr1: u32,
    pub bcr2: u32,
    pub wcr: u32,
    pub mcr: u32,
    pub rtcsr: u32,
    pub rtcnt: u32,
    pub rtcor: u32,
}

/// Cache controller registers
#[derive(Debug, Default, Clone)]
pub struct Cache {
    pub ccr: u8,
}

/// CCR: cache purge bit
pub const CCR_CP: u8 = 0x10;

/// DMA controller registers
#[derive(Debug, Default, Clone)]
pub struct Dmac {
    pub sar0: u32,
    pub dar0: u32,
    pub tcr0: u32,
    pub chcr0: u32,
    pub sar1: u32,
    pub dar1: u32,
    pub tcr1: u32,
    pub chcr1: u32,
    pub drcr0: u8,
    pub drcr1: u8,
    pub dmaor: u32,
}

/// Division unit registers
#[derive(Debug, Default, Clone)]
pub struct Divu {
    pub dvsr: u32,
    pub dvdnt: u32,
    pub dvcr: u32,
    pub dvdntl: u32,
    pub dvdntl_shadow: u32,
    pub dvdnth: u32,
    pub dvdnth_shadow: u32,
}

/// Free-running timer registers
#[derive(Debug, Default, Clone)]
pub struct Frt {
    pub tier: u8,
    pub ftcsr: u8,
    pub frc: u16,
    pub ocra: u16,
    pub ocrb: u16,
    pub tcr: u8,
    pub tocr: u8,
    pub icr: u16,
}

/// Watchdog timer registers
#[derive(Debug, Default, Clone)]
pub struct Wdt {
    pub wtcsr: u8,
    pub wtcnt: u8,
    pub rstcsr: u8,
}

/// Serial communication interface registers
#[derive(Debug, Default, Clone)]
pub struct Sci {
    pub smr: u8,
    pub brr: u8,
    pub scr: u8,
    pub tdr: u8,
    pub ssr: u8,
    pub rdr: u8,
}

/// Power-down mode registers
#[derive(Debug, Default, Clone)]
pub struct Pdm {
    pub sbycr: u8,
}

/// Which DMA channel runs first on the next kick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DmaChannelPriority {
    Channel0First,
    Channel1First,
}

/// The complete on-chip register file
#[derive(Debug, Default, Clone)]
pub struct OnChipRegisters {
    pub intc: Intc,
    pub bsc: Bsc,
    pub cache: Cache,
    pub dmac: Dmac,
    pub divu: Divu,
    pub frt: Frt,
    pub wdt: Wdt,
    pub sci: Sci,
    pub pdm: Pdm,
}

impl OnChipRegisters {
    /// Reset defaults; BCR1 differs between master and slave
    pub fn for_kind(kind: Sh2Kind) -> Self {
        let bcr1 = match kind {
            Sh2Kind::Master => 0x0000_03F0,
            Sh2Kind::Slave => 0x0000_83F0,
        };

        OnChipRegisters {
            intc: Intc::default(),
            bsc: Bsc {
                bcr1,
                bcr2: 0x0000_00FC,
                wcr: 0x0000_AAFF,
                ..Bsc::default()
            },
            cache: Cache::default(),
            dmac: Dmac::default(),
            divu: Divu::default(),
            frt: Frt {
                tier: 0x01,
                ocra: 0xFFFF,
                ocrb: 0xFFFF,
                tocr: 0xE0,
                ..Frt::default()
            },
            wdt: Wdt {
                wtcsr: 0x18,
                rstcsr: 0x1F,
                ..Wdt::default()
            },
            sci: Sci {
                brr: 0xFF,
                tdr: 0xFF,
                ssr: 0x84,
                ..Sci::default()
            },
            pdm: Pdm { sbycr: 0x60 },
        }
    }
}

const BSC_WRITE_KEY: u32 = 0xA55A_0000;
const BCR1_WRITE_MASK: u32 = 0b0001_1111_1111_0111;
const BCR2_WRITE_MASK: u32 = 0b0000_0000_1111_1100;
const RTCSR_WRITE_MASK: u32 = 0b0000_0000_1111_1000;
const RTCNT_WRITE_MASK: u32 = 0b0000_0000_1111_1111;
const RTCOR_WRITE_MASK: u32 = 0b0000_0000_1111_1111;
const TOCR_ACCESS_MASK: u8 = 0b0001_0011;
/// TOCR: output compare register select bit
const TOCR_OCRS: u8 = 0x10;

impl Sh2 {
    // ========================================
    // Register reads
    // ========================================

    pub(crate) fn read_onchip8(&self, addr: u32) -> u8 {
        use addresses::*;
        match addr {
            // INTC
            IPRA => (self.regs.intc.ipra >> 8) as u8,
            a if a == IPRA + 1 => self.regs.intc.ipra as u8,
            IPRB => (self.regs.intc.iprb >> 8) as u8,
            a if a == IPRB + 1 => self.regs.intc.iprb as u8,
            VCRA => (self.regs.intc.vcra >> 8) as u8,
            a if a == VCRA + 1 => self.regs.intc.vcra as u8,
            VCRB => (self.regs.intc.vcrb >> 8) as u8,
            a if a == VCRB + 1 => self.regs.intc.vcrb as u8,
            VCRC => (self.regs.intc.vcrc >> 8) as u8,
            a if a == VCRC + 1 => self.regs.intc.vcrc as u8,
            VCRD => (self.regs.intc.vcrd >> 8) as u8,
            a if a == VCRD + 1 => self.regs.intc.vcrd as u8,
            VCRWDT => (self.regs.intc.vcrwdt >> 8) as u8,
            a if a == VCRWDT + 1 => self.regs.intc.vcrwdt as u8,
            ICR => (self.regs.intc.icr >> 8) as u8,
            a if a == ICR + 1 => self.regs.intc.icr as u8,

            // Cache
            CCR => self.regs.cache.ccr,

            // DMAC
            DRCR0 => self.regs.dmac.drcr0,
            DRCR1 => self.regs.dmac.drcr1,

            // FRT
            TIER => self.regs.frt.tier,
            FTCSR => self.regs.frt.ftcsr,
            FRC => (self.regs.frt.frc >> 8) as u8,
            a if a == FRC + 1 => self.regs.frt.frc as u8,
            FRT_TCR => self.regs.frt.tcr,
            TOCR => self.regs.frt.tocr,
            FRT_ICR => (self.regs.frt.icr >> 8) as u8,
            a if a == FRT_ICR + 1 => self.regs.frt.icr as u8,

            // WDT
            WTCSR => self.regs.wdt.wtcsr,
            WTCNT => self.regs.wdt.wtcnt,
            a if a == RSTCSR + 1 => self.regs.wdt.rstcsr,

            // SCI
            SMR => self.regs.sci.smr,
            BRR => self.regs.sci.brr,
            SCR => self.regs.sci.scr,
            TDR => self.regs.sci.tdr,
            SSR => self.regs.sci.ssr,
            RDR => self.regs.sci.rdr,

            // Power-down modes
            SBYCR => self.regs.pdm.sbycr,

            _ => {
                log::warn!("SH2 unmapped on-chip read (8) {:#010x}", addr);
                0
            }
        }
    }

    pub(crate) fn read_onchip16(&self, addr: u32) -> u16 {
        use addresses::*;
        match addr {
            // INTC
            IPRA => self.regs.intc.ipra,
            IPRB => self.regs.intc.iprb,
            VCRA => self.regs.intc.vcra,
            VCRB => self.regs.intc.vcrb,
            VCRC => self.regs.intc.vcrc,
            VCRD => self.regs.intc.vcrd,
            VCRWDT => self.regs.intc.vcrwdt,
            ICR => self.regs.intc.icr,
            VCRDIV => (self.regs.intc.vcrdiv >> 16) as u16,
            a if a == VCRDIV + 2 => self.regs.intc.vcrdiv as u16,

            // BSC: upper words read as zero
            BCR1 | BCR2 | WCR | MCR | RTCSR => 0,
            a if a == BCR1 + 2 => self.regs.bsc.bcr1 as u16,
            a if a == BCR2 + 2 => self.regs.bsc.bcr2 as u16,
            a if a == WCR + 2 => self.regs.bsc.wcr as u16,
            a if a == MCR + 2 => self.regs.bsc.mcr as u16,
            a if a == RTCSR + 2 => self.regs.bsc.rtcsr as u16,
            a if a == RTCNT + 2 => self.regs.bsc.rtcnt as u16,
            a if a == RTCOR + 2 => self.regs.bsc.rtcor as u16,

            // DIVU
            DVCR => (self.regs.divu.dvcr >> 16) as u16,
            a if a == DVCR + 2 => self.regs.divu.dvcr as u16,

            // FRT
            FRC => self.regs.frt.frc,

            _ => {
                log::warn!("SH2 unmapped on-chip read (16) {:#010x}", addr);
                0
            }
        }
    }

    pub(crate) fn read_onchip32(&self, addr: u32) -> u32 {
        use addresses::*;
        match addr {
            // INTC
            VCRDIV => self.regs.intc.vcrdiv,
            VCRDMA0 => self.regs.intc.vcrdma0,
            VCRDMA1 => self.regs.intc.vcrdma1,

            // BSC: upper 16 bits are always zero after reset
            BCR1 => self.regs.bsc.bcr1,
            BCR2 => self.regs.bsc.bcr2,
            WCR => self.regs.bsc.wcr,
            MCR => self.regs.bsc.mcr,
            RTCSR => self.regs.bsc.rtcsr,
            RTCNT => self.regs.bsc.rtcnt,
            RTCOR => self.regs.bsc.rtcor,

            // DMAC
            SAR0 => self.regs.dmac.sar0,
            SAR1 => self.regs.dmac.sar1,
            DAR0 => self.regs.dmac.dar0,
            DAR1 => self.regs.dmac.dar1,
            TCR0 => self.regs.dmac.tcr0,
            TCR1 => self.regs.dmac.tcr1,
            CHCR0 => self.regs.dmac.chcr0,
            CHCR1 => self.regs.dmac.chcr1,
            DMAOR => self.regs.dmac.dmaor,

            // DIVU
            DVSR => self.regs.divu.dvsr,
            DVDNT => self.regs.divu.dvdnt,
            DVCR => self.regs.divu.dvcr,
            DVDNTL => self.regs.divu.dvdntl,
            DVDNTL_SHADOW => self.regs.divu.dvdntl_shadow,
            DVDNTH => self.regs.divu.dvdnth,
            DVDNTH_SHADOW => self.regs.divu.dvdnth_shadow,

            _ => {
                log::warn!("SH2 unmapped on-chip read (32) {:#010x}", addr);
                0
            }
        }
    }

    // ========================================
    // Register writes
    // ========================================

    pub(crate) fn write_onchip8(&mut self, addr: u32, data: u8) {
        use addresses::*;
        match addr {
            // INTC
            IPRA => set_hi_byte(&mut self.regs.intc.ipra, data),
            a if a == IPRA + 1 => set_lo_byte(&mut self.regs.intc.ipra, data),
            IPRB => set_hi_byte(&mut self.regs.intc.iprb, data),
            a if a == IPRB + 1 => set_lo_byte(&mut self.regs.intc.iprb, data),
            VCRA => set_hi_byte(&mut self.regs.intc.vcra, data),
            a if a == VCRA + 1 => set_lo_byte(&mut self.regs.intc.vcra, data),
            VCRB => set_hi_byte(&mut self.regs.intc.vcrb, data),
            a if a == VCRB + 1 => set_lo_byte(&mut self.regs.intc.vcrb, data),
            VCRC => set_hi_byte(&mut self.regs.intc.vcrc, data),
            a if a == VCRC + 1 => set_lo_byte(&mut self.regs.intc.vcrc, data),
            VCRD => set_hi_byte(&mut self.regs.intc.vcrd, data),
            a if a == VCRD + 1 => {} // Read only
            VCRWDT => set_hi_byte(&mut self.regs.intc.vcrwdt, data),
            a if a == VCRWDT + 1 => set_lo_byte(&mut self.regs.intc.vcrwdt, data),
            ICR => set_hi_byte(&mut self.regs.intc.icr, data),
            a if a == ICR + 1 => set_lo_byte(&mut self.regs.intc.icr, data),

            // Cache
            CCR => {
                log::debug!("SH2 CCR byte write: {:#04x}", data);
                self.regs.cache.ccr = data;
                if self.regs.cache.ccr & CCR_CP != 0 {
                    self.purge_cache();

                    // cache purge bit is cleared after operation
                    self.regs.cache.ccr &= !CCR_CP;
                }
            }

            // DMAC
            DRCR0 => self.regs.dmac.drcr0 = data,
            DRCR1 => self.regs.dmac.drcr1 = data,

            // FRT
            TIER => self.regs.frt.tier = data,
            FTCSR => self.regs.frt.ftcsr = data,
            FRC => set_hi_byte(&mut self.regs.frt.frc, data),
            a if a == FRC + 1 => set_lo_byte(&mut self.regs.frt.frc, data),
            OCR => {
                if self.regs.frt.tocr & TOCR_OCRS == 0 {
                    set_hi_byte(&mut self.regs.frt.ocra, data);
                } else {
                    set_hi_byte(&mut self.regs.frt.ocrb, data);
                }
            }
            a if a == OCR + 1 => {
                if self.regs.frt.tocr & TOCR_OCRS == 0 {
                    set_lo_byte(&mut self.regs.frt.ocra, data);
                } else {
                    set_lo_byte(&mut self.regs.frt.ocrb, data);
                }
            }
            FRT_TCR => {
                self.regs.frt.tcr = data;
                self.update_frt_clock_divisor();
            }
            TOCR => self.regs.frt.tocr = data & TOCR_ACCESS_MASK,
            FRT_ICR => set_hi_byte(&mut self.regs.frt.icr, data),
            a if a == FRT_ICR + 1 => set_lo_byte(&mut self.regs.frt.icr, data),

            // SCI
            SMR => self.regs.sci.smr = data,
            BRR => self.regs.sci.brr = data,
            SCR => self.regs.sci.scr = data,
            TDR => self.regs.sci.tdr = data,
            SSR => self.regs.sci.ssr = data,

            // Power-down modes
            SBYCR => {
                self.regs.pdm.sbycr = data;
                log::warn!("SH2 standby control register write {:#04x}", data);
            }

            _ => {
                log::warn!(
                    "SH2 unmapped on-chip write (8) {:#010x} <- {:#04x}",
                    addr,
                    data
                );
            }
        }
    }

    pub(crate) fn write_onchip16(&mut self, addr: u32, data: u16) {
        use addresses::*;
        use intc_bits::*;
        match addr {
            // INTC
            IPRA => self.regs.intc.ipra = data,
            IPRB => self.regs.intc.iprb = data,
            VCRA => self.regs.intc.vcra = data,
            VCRB => self.regs.intc.vcrb = data,
            VCRC => self.regs.intc.vcrc = data,
            VCRD => self.regs.intc.vcrd = data,
            VCRWDT => self.regs.intc.vcrwdt = data,
            VCRDIV => {} // Upper word is read only through 16 bit access
            a if a == VCRDIV + 2 => {
                self.regs.intc.vcrdiv = (self.regs.intc.vcrdiv & 0xFFFF_0000) | u32::from(data);
            }
            ICR => {
                let new_level = data & ICR_NMIL != 0;
                let old_level = self.regs.intc.icr & ICR_NMIL != 0;
                if new_level != old_level {
                    if self.regs.intc.icr & ICR_NMIE != 0 {
                        log::warn!("Rising edge NMI, not implemented !");
                    } else {
                        log::warn!("Falling edge NMI, not implemented !");
                    }
                }

                // Will force exit from the SLEEP instruction.
                self.is_nmi_registered = true;

                self.regs.intc.icr = data;
            }

            // BSC (low words reachable without the 0xA55A key)
            a if a == BCR1 + 2 => {
                self.regs.bsc.bcr1 =
                    (self.regs.bsc.bcr1 & 0xFFFF_0000) | (u32::from(data) & BCR1_WRITE_MASK);
            }
            a if a == BCR2 + 2 => {
                self.regs.bsc.bcr2 =
                    (self.regs.bsc.bcr2 & 0xFFFF_0000) | (u32::from(data) & BCR2_WRITE_MASK);
            }
            a if a == WCR + 2 => {
                self.regs.bsc.wcr = (self.regs.bsc.wcr & 0xFFFF_0000) | u32::from(data);
            }
            a if a == MCR + 2 => {
                self.regs.bsc.mcr = (self.regs.bsc.mcr & 0xFFFF_0000) | u32::from(data);
            }
            a if a == RTCSR + 2 => {
                self.regs.bsc.rtcsr =
                    (self.regs.bsc.rtcsr & 0xFFFF_0000) | (u32::from(data) & RTCSR_WRITE_MASK);
            }
            a if a == RTCNT + 2 => {
                self.regs.bsc.rtcnt =
                    (self.regs.bsc.rtcnt & 0xFFFF_0000) | (u32::from(data) & RTCNT_WRITE_MASK);
            }
            a if a == RTCOR + 2 => {
                self.regs.bsc.rtcor =
                    (self.regs.bsc.rtcor & 0xFFFF_0000) | (u32::from(data) & RTCOR_WRITE_MASK);
            }

            // DIVU
            DVCR => {} // Read only access through the upper word
            a if a == DVCR + 2 => {
                self.regs.divu.dvcr = (self.regs.divu.dvcr & 0xFFFF_0000) | u32::from(data & 0b11);
            }

            // FRT
            FRC => self.regs.frt.frc = data,
            OCR => {
                if self.regs.frt.tocr & TOCR_OCRS == 0 {
                    self.regs.frt.ocra = data;
                } else {
                    self.regs.frt.ocrb = data;
                }
            }
            FRT_ICR => self.regs.frt.icr = data,

            // WDT: word writes carry a key byte in the upper half
            WTCSR => {
                self.regs.wdt.wtcsr = (data >> 8) as u8;
                self.regs.wdt.wtcnt = data as u8;
            }
            RSTCSR => {
                self.regs.wdt.rstcsr = (data >> 8) as u8;
            }

            _ => {
                log::warn!(
                    "SH2 unmapped on-chip write (16) {:#010x} <- {:#06x}",
                    addr,
                    data
                );
            }
        }
    }

    pub(crate) fn write_onchip32(&mut self, bus: &mut dyn Bus, addr: u32, data: u32) {
        use addresses::*;
        match addr {
            // INTC
            VCRDIV => self.regs.intc.vcrdiv = data,
            VCRDMA0 => self.regs.intc.vcrdma0 = data,
            VCRDMA1 => self.regs.intc.vcrdma1 = data,

            // BSC: 32 bit writes require the 0xA55A key in the upper word
            BCR1 => {
                if data & 0xFFFF_0000 == BSC_WRITE_KEY {
                    self.regs.bsc.bcr1 =
                        (self.regs.bsc.bcr1 & 0xFFFF_0000) | (data & BCR1_WRITE_MASK);
                }
            }
            BCR2 => {
                if data & 0xFFFF_0000 == BSC_WRITE_KEY {
                    self.regs.bsc.bcr2 =
                        (self.regs.bsc.bcr2 & 0xFFFF_0000) | (data & BCR2_WRITE_MASK);
                }
            }
            WCR => {
                if data & 0xFFFF_0000 == BSC_WRITE_KEY {
                    self.regs.bsc.wcr = (self.regs.bsc.wcr & 0xFFFF_0000) | (data & 0xFFFF);
                }
            }
            MCR => {
                if data & 0xFFFF_0000 == BSC_WRITE_KEY {
                    self.regs.bsc.mcr = (self.regs.bsc.mcr & 0xFFFF_0000) | (data & 0xFFFF);
                }
            }
            RTCSR => {
                if data & 0xFFFF_0000 == BSC_WRITE_KEY {
                    self.regs.bsc.rtcsr =
                        (self.regs.bsc.rtcsr & 0xFFFF_0000) | (data & RTCSR_WRITE_MASK);
                }
            }
            RTCNT => {
                if data & 0xFFFF_0000 == BSC_WRITE_KEY {
                    self.regs.bsc.rtcnt =
                        (self.regs.bsc.rtcnt & 0xFFFF_0000) | (data & RTCNT_WRITE_MASK);
                }
            }
            RTCOR => {
                if data & 0xFFFF_0000 == BSC_WRITE_KEY {
                    self.regs.bsc.rtcor =
                        (self.regs.bsc.rtcor & 0xFFFF_0000) | (data & RTCOR_WRITE_MASK);
                }
            }

            // DMAC
            SAR0 => self.regs.dmac.sar0 = data,
            SAR1 => self.regs.dmac.sar1 = data,
            DAR0 => self.regs.dmac.dar0 = data,
            DAR1 => self.regs.dmac.dar1 = data,
            TCR0 => self.regs.dmac.tcr0 = data & 0x00FF_FFFF,
            TCR1 => self.regs.dmac.tcr1 = data & 0x00FF_FFFF,
            CHCR0 => {
                self.regs.dmac.chcr0 = data & 0x0000_FFFF;
                self.execute_dma(bus);
            }
            CHCR1 => {
                self.regs.dmac.chcr1 = data & 0x0000_FFFF;
                self.execute_dma(bus);
            }
            DMAOR => {
                self.update_dma_priority_latch(data);
                self.regs.dmac.dmaor = data & 0xF;
                self.execute_dma(bus);
            }

            // DIVU
            DVSR => self.regs.divu.dvsr = data,
            DVDNT => {
                self.regs.divu.dvdnt = data;

                // ST-V needs some mirroring
                self.regs.divu.dvdntl = data;
                self.regs.divu.dvdntl_shadow = data;

                // Sign extension for the upper 32 bits if needed
                self.regs.divu.dvdnth = if data & 0x8000_0000 != 0 { u32::MAX } else { 0 };

                self.start_32bit_division();
                self.run_division_unit(0);
            }
            DVCR => self.regs.divu.dvcr = data,
            DVDNTL => {
                self.regs.divu.dvdntl = data;
                self.regs.divu.dvdntl_shadow = data;

                self.start_64bit_division();
                self.run_division_unit(0);
            }
            DVDNTH => self.regs.divu.dvdnth = data,

            _ => {
                log::warn!(
                    "SH2 unmapped on-chip write (32) {:#010x} <- {:#010x}",
                    addr,
                    data
                );
            }
        }
    }
}

#[inline]
fn set_hi_byte(reg: &mut u16, data: u8) {
    *reg = (*reg & 0x00FF) | (u16::from(data) << 8);
}

#[inline]
fn set_lo_byte(reg: &mut u16, data: u8) {
    *reg = (*reg & 0xFF00) | u16::from(data);
}
