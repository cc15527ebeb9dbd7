// VDP2 register file
//
// 128 named 16 bit registers in a 512 byte window. 8 bit accesses address
// the high or low byte of the containing register, 32 bit accesses the two
// adjacent registers in natural order. Reads never have side effects;
// writing TVMD recomputes the derived screen mode and display timings.

use super::Vdp2;

/// Register offsets inside the 512 byte window
pub mod offsets {
    pub const TVMD: u32 = 0x000;
    pub const EXTEN: u32 = 0x002;
    pub const TVSTAT: u32 = 0x004;
    pub const VRSIZE: u32 = 0x006;
    pub const HCNT: u32 = 0x008;
    pub const VCNT: u32 = 0x00A;
    pub const RSV1: u32 = 0x00C;
    pub const RAMCTL: u32 = 0x00E;
    pub const CYCA0L: u32 = 0x010;
    pub const CYCA0U: u32 = 0x012;
    pub const CYCA1L: u32 = 0x014;
    pub const CYCA1U: u32 = 0x016;
    pub const CYCB0L: u32 = 0x018;
    pub const CYCB0U: u32 = 0x01A;
    pub const CYCB1L: u32 = 0x01C;
    pub const CYCB1U: u32 = 0x01E;
    pub const BGON: u32 = 0x020;
    pub const MZCTL: u32 = 0x022;
    pub const SFSEL: u32 = 0x024;
    pub const SFCODE: u32 = 0x026;
    pub const CHCTLA: u32 = 0x028;
    pub const CHCTLB: u32 = 0x02A;
    pub const BMPNA: u32 = 0x02C;
    pub const BMPNB: u32 = 0x02E;
    pub const PNCN0: u32 = 0x030;
    pub const PNCN1: u32 = 0x032;
    pub const PNCN2: u32 = 0x034;
    pub const PNCN3: u32 = 0x036;
    pub const PNCR: u32 = 0x038;
    pub const PLSZ: u32 = 0x03A;
    pub const MPOFN: u32 = 0x03C;
    pub const MPOFR: u32 = 0x03E;
    pub const MPABN0: u32 = 0x040;
    pub const MPCDN0: u32 = 0x042;
    pub const MPABN1: u32 = 0x044;
    pub const MPCDN1: u32 = 0x046;
    pub const MPABN2: u32 = 0x048;
    pub const MPCDN2: u32 = 0x04A;
    pub const MPABN3: u32 = 0x04C;
    pub const MPCDN3: u32 = 0x04E;
    pub const MPABRA: u32 = 0x050;
    pub const MPCDRA: u32 = 0x052;
    pub const MPEFRA: u32 = 0x054;
    pub const MPGHRA: u32 = 0x056;
    pub const MPIJRA: u32 = 0x058;
    pub const MPKLRA: u32 = 0x05A;
    pub const MPMNRA: u32 = 0x05C;
    pub const MPOPRA: u32 = 0x05E;
    pub const MPABRB: u32 = 0x060;
    pub const MPCDRB: u32 = 0x062;
    pub const MPEFRB: u32 = 0x064;
    pub const MPGHRB: u32 = 0x066;
    pub const MPIJRB: u32 = 0x068;
    pub const MPKLRB: u32 = 0x06A;
    pub const MPMNRB: u32 = 0x06C;
    pub const MPOPRB: u32 = 0x06E;
    pub const SCXIN0: u32 = 0x070;
    pub const SCXDN0: u32 = 0x072;
    pub const SCYIN0: u32 = 0x074;
    pub const SCYDN0: u32 = 0x076;
    pub const ZMXIN0: u32 = 0x078;
    pub const ZMXDN0: u32 = 0x07A;
    pub const ZMYIN0: u32 = 0x07C;
    pub const ZMYDN0: u32 = 0x07E;
    pub const SCXIN1: u32 = 0x080;
    pub const SCXDN1: u32 = 0x082;
    pub const SCYIN1: u32 = 0x084;
    pub const SCYDN1: u32 = 0x086;
    pub const ZMXIN1: u32 = 0x088;
    pub const ZMXDN1: u32 = 0x08A;
    pub const ZMYIN1: u32 = 0x08C;
    pub const ZMYDN1: u32 = 0x08E;
    pub const SCXN2: u32 = 0x090;
    pub const SCYN2: u32 = 0x092;
    pub const SCXN3: u32 = 0x094;
    pub const SCYN3: u32 = 0x096;
    pub const ZMCTL: u32 = 0x098;
    pub const SCRCTL: u32 = 0x09A;
    pub const VCSTAU: u32 = 0x09C;
    pub const VCSTAL: u32 = 0x09E;
    pub const LSTA0U: u32 = 0x0A0;
    pub const LSTA0L: u32 = 0x0A2;
    pub const LSTA1U: u32 = 0x0A4;
    pub const LSTA1L: u32 = 0x0A6;
    pub const LCTAU: u32 = 0x0A8;
    pub const LCTAL: u32 = 0x0AA;
    pub const BKTAU: u32 = 0x0AC;
    pub const BKTAL: u32 = 0x0AE;
    pub const RPMD: u32 = 0x0B0;
    pub const RPRCTL: u32 = 0x0B2;
    pub const KTCTL: u32 = 0x0B4;
    pub const KTAOF: u32 = 0x0B6;
    pub const OVPNRA: u32 = 0x0B8;
    pub const OVPNRB: u32 = 0x0BA;
    pub const RPTAU: u32 = 0x0BC;
    pub const RPTAL: u32 = 0x0BE;
    pub const WPSX0: u32 = 0x0C0;
    pub const WPSY0: u32 = 0x0C2;
    pub const WPEX0: u32 = 0x0C4;
    pub const WPEY0: u32 = 0x0C6;
    pub const WPSX1: u32 = 0x0C8;
    pub const WPSY1: u32 = 0x0CA;
    pub const WPEX1: u32 = 0x0CC;
    pub const WPEY1: u32 = 0x0CE;
    pub const WCTLA: u32 = 0x0D0;
    pub const WCTLB: u32 = 0x0D2;
    pub const WCTLC: u32 = 0x0D4;
    pub const WCTLD: u32 = 0x0D6;
    pub const LWTA0U: u32 = 0x0D8;
    pub const LWTA0L: u32 = 0x0DA;
    pub const LWTA1U: u32 = 0x0DC;
    pub const LWTA1L: u32 = 0x0DE;
    pub const SPCTL: u32 = 0x0E0;
    pub const SDCTL: u32 = 0x0E2;
    pub const CRAOFA: u32 = 0x0E4;
    pub const CRAOFB: u32 = 0x0E6;
    pub const LNCLEN: u32 = 0x0E8;
    pub const SFPRMD: u32 = 0x0EA;
    pub const CCCTL: u32 = 0x0EC;
    pub const SFCCMD: u32 = 0x0EE;
    pub const PRISA: u32 = 0x0F0;
    pub const PRISB: u32 = 0x0F2;
    pub const PRISC: u32 = 0x0F4;
    pub const PRISD: u32 = 0x0F6;
    pub const PRINA: u32 = 0x0F8;
    pub const PRINB: u32 = 0x0FA;
    pub const PRIR: u32 = 0x0FC;
    pub const RSV2: u32 = 0x0FE;
    pub const CCRSA: u32 = 0x100;
    pub const CCRSB: u32 = 0x102;
    pub const CCRSC: u32 = 0x104;
    pub const CCRSD: u32 = 0x106;
    pub const CCRNA: u32 = 0x108;
    pub const CCRNB: u32 = 0x10A;
    pub const CCRR: u32 = 0x10C;
    pub const CCRLB: u32 = 0x10E;
    pub const CLOFEN: u32 = 0x110;
    pub const CLOFSL: u32 = 0x112;
    pub const COAR: u32 = 0x114;
    pub const COAG: u32 = 0x116;
    pub const COAB: u32 = 0x118;
    pub const COBR: u32 = 0x11A;
    pub const COBG: u32 = 0x11C;
    pub const COBB: u32 = 0x11E;
}

/// TVMD bit fields
pub mod tvmd {
    /// Display enable
    pub const DISP: u16 = 0x8000;
    /// Border color mode
    pub const BDCLMD: u16 = 0x0100;
    /// Interlace mode field
    pub const LSMD_SHIFT: u16 = 6;
    pub const LSMD_MASK: u16 = 0x00C0;
    /// Vertical resolution field
    pub const VRESO_SHIFT: u16 = 4;
    pub const VRESO_MASK: u16 = 0x0030;
    /// Horizontal resolution field
    pub const HRESO_MASK: u16 = 0x0007;
}

/// TVSTAT bit fields
pub mod tvstat {
    /// Vertical retrace in progress
    pub const VBLANK: u16 = 0x0008;
    /// Horizontal retrace in progress
    pub const HBLANK: u16 = 0x0004;
    /// Odd field scan
    pub const ODD: u16 = 0x0002;
    /// TV standard (0: NTSC, 1: PAL)
    pub const PAL: u16 = 0x0001;
}

/// RAMCTL bit fields
pub mod ramctl {
    /// Coefficient table stored in color RAM
    pub const CRKTE: u16 = 0x8000;
    /// Color RAM mode field
    pub const CRMD_SHIFT: u16 = 12;
    pub const CRMD_MASK: u16 = 0x3000;
    /// VRAM B partition select
    pub const VRBMD: u16 = 0x0200;
    /// VRAM A partition select
    pub const VRAMD: u16 = 0x0100;
    /// Rotation data bank selects, 2 bits per bank
    pub const RDBSB1_SHIFT: u16 = 6;
    pub const RDBSB0_SHIFT: u16 = 4;
    pub const RDBSA1_SHIFT: u16 = 2;
    pub const RDBSA0_SHIFT: u16 = 0;
}

/// BGON bit fields
pub mod bgon {
    pub const N0ON: u16 = 0x0001;
    pub const N1ON: u16 = 0x0002;
    pub const N2ON: u16 = 0x0004;
    pub const N3ON: u16 = 0x0008;
    pub const R0ON: u16 = 0x0010;
    pub const R1ON: u16 = 0x0020;
    /// Transparency disable bits ("transparency code valid" when clear)
    pub const N0TPON: u16 = 0x0100;
    pub const N1TPON: u16 = 0x0200;
    pub const N2TPON: u16 = 0x0400;
    pub const N3TPON: u16 = 0x0800;
    pub const R0TPON: u16 = 0x1000;
}

/// The typed VDP2 register record, one field per named register
#[derive(Debug, Default, Clone)]
pub struct Vdp2Registers {
    pub tvmd: u16,
    pub exten: u16,
    pub tvstat: u16,
    pub vrsize: u16,
    pub hcnt: u16,
    pub vcnt: u16,
    pub rsv1: u16,
    pub ramctl: u16,
    pub cyca0l: u16,
    pub cyca0u: u16,
    pub cyca1l: u16,
    pub cyca1u: u16,
    pub cycb0l: u16,
    pub cycb0u: u16,
    pub cycb1l: u16,
    pub cycb1u: u16,
    pub bgon: u16,
    pub mzctl: u16,
    pub sfsel: u16,
    pub sfcode: u16,
    pub chctla: u16,
    pub chctlb: u16,
    pub bmpna: u16,
    pub bmpnb: u16,
    pub pncn0: u16,
    pub pncn1: u16,
    pub pncn2: u16,
    pub pncn3: u16,
    pub pncr: u16,
    pub plsz: u16,
    pub mpofn: u16,
    pub mpofr: u16,
    pub mpabn0: u16,
    pub mpcdn0: u16,
    pub mpabn1: u16,
    pub mpcdn1: u16,
    pub mpabn2: u16,
    pub mpcdn2: u16,
    pub mpabn3: u16,
    pub mpcdn3: u16,
    pub mpabra: u16,
    pub mpcdra: u16,
    pub mpefra: u16,
    pub mpghra: u16,
    pub mpijra: u16,
    pub mpklra: u16,
    pub mpmnra: u16,
    pub mpopra: u16,
    pub mpabrb: u16,
    pub mpcdrb: u16,
    pub mpefrb: u16,
    pub mpghrb: u16,
    pub mpijrb: u16,
    pub mpklrb: u16,
    pub mpmnrb: u16,
    pub mpoprb: u16,
    pub scxin0: u16,
    pub scxdn0: u16,
    pub scyin0: u16,
    pub scydn0: u16,
    pub zmxin0: u16,
    pub zmxdn0: u16,
    pub zmyin0: u16,
    pub zmydn0: u16,
    pub scxin1: u16,
    pub scxdn1: u16,
    pub scyin1: u16,
    pub scydn1: u16,
    pub zmxin1: u16,
    pub zmxdn1: u16,
    pub zmyin1: u16,
    pub zmydn1: u16,
    pub scxn2: u16,
    pub scyn2: u16,
    pub scxn3: u16,
    pub scyn3: u16,
    pub zmctl: u16,
    pub scrctl: u16,
    pub vcstau: u16,
    pub vcstal: u16,
    pub lsta0u: u16,
    pub lsta0l: u16,
    pub lsta1u: u16,
    pub lsta1l: u16,
    pub lctau: u16,
    pub lctal: u16,
    pub bktau: u16,
    pub bktal: u16,
    pub rpmd: u16,
    pub rprctl: u16,
    pub ktctl: u16,
    pub ktaof: u16,
    pub ovpnra: u16,
    pub ovpnrb: u16,
    pub rptau: u16,
    pub rptal: u16,
    pub wpsx0: u16,
    pub wpsy0: u16,
    pub wpex0: u16,
    pub wpey0: u16,
    pub wpsx1: u16,
    pub wpsy1: u16,
    pub wpex1: u16,
    pub wpey1: u16,
    pub wctla: u16,
    pub wctlb: u16,
    pub wctlc: u16,
    pub wctld: u16,
    pub lwta0u: u16,
    pub lwta0l: u16,
    pub lwta1u: u16,
    pub lwta1l: u16,
    pub spctl: u16,
    pub sdctl: u16,
    pub craofa: u16,
    pub craofb: u16,
    pub lnclen: u16,
    pub sfprmd: u16,
    pub ccctl: u16,
    pub sfccmd: u16,
    pub prisa: u16,
    pub prisb: u16,
    pub prisc: u16,
    pub prisd: u16,
    pub prina: u16,
    pub prinb: u16,
    pub prir: u16,
    pub rsv2: u16,
    pub ccrsa: u16,
    pub ccrsb: u16,
    pub ccrsc: u16,
    pub ccrsd: u16,
    pub ccrna: u16,
    pub ccrnb: u16,
    pub ccrr: u16,
    pub ccrlb: u16,
    pub clofen: u16,
    pub clofsl: u16,
    pub coar: u16,
    pub coag: u16,
    pub coab: u16,
    pub cobr: u16,
    pub cobg: u16,
    pub cobb: u16,
}

/// Mask for addressing the register window
pub const REGISTERS_MEMORY_MASK: u32 = 0x1FF;

impl Vdp2 {
    /// 16 bit register read
    pub fn read16(&self, addr: u32) -> u16 {
        use offsets::*;
        match addr & REGISTERS_MEMORY_MASK {
            TVMD => self.regs.tvmd,
            EXTEN => self.regs.exten,
            TVSTAT => self.regs.tvstat,
            VRSIZE => self.regs.vrsize,
            HCNT => self.regs.hcnt,
            VCNT => self.regs.vcnt,
            RSV1 => self.regs.rsv1,
            RAMCTL => self.regs.ramctl,
            CYCA0L => self.regs.cyca0l,
            CYCA0U => self.regs.cyca0u,
            CYCA1L => self.regs.cyca1l,
            CYCA1U => self.regs.cyca1u,
            CYCB0L => self.regs.cycb0l,
            CYCB0U => self.regs.cycb0u,
            CYCB1L => self.regs.cycb1l,
            CYCB1U => self.regs.cycb1u,
            BGON => self.regs.bgon,
            MZCTL => self.regs.mzctl,
            SFSEL => self.regs.sfsel,
            SFCODE => self.regs.sfcode,
            CHCTLA => self.regs.chctla,
            CHCTLB => self.regs.chctlb,
            BMPNA => self.regs.bmpna,
            BMPNB => self.regs.bmpnb,
            PNCN0 => self.regs.pncn0,
            PNCN1 => self.regs.pncn1,
            PNCN2 => self.regs.pncn2,
            PNCN3 => self.regs.pncn3,
            PNCR => self.regs.pncr,
            PLSZ => self.regs.plsz,
            MPOFN => self.regs.mpofn,
            MPOFR => self.regs.mpofr,
            MPABN0 => self.regs.mpabn0,
            MPCDN0 => self.regs.mpcdn0,
            MPABN1 => self.regs.mpabn1,
            MPCDN1 => self.regs.mpcdn1,
            MPABN2 => self.regs.mpabn2,
            MPCDN2 => self.regs.mpcdn2,
            MPABN3 => self.regs.mpabn3,
            MPCDN3 => self.regs.mpcdn3,
            MPABRA => self.regs.mpabra,
            MPCDRA => self.regs.mpcdra,
            MPEFRA => self.regs.mpefra,
            MPGHRA => self.regs.mpghra,
            MPIJRA => self.regs.mpijra,
            MPKLRA => self.regs.mpklra,
            MPMNRA => self.regs.mpmnra,
            MPOPRA => self.regs.mpopra,
            MPABRB => self.regs.mpabrb,
            MPCDRB => self.regs.mpcdrb,
            MPEFRB => self.regs.mpefrb,
            MPGHRB => self.regs.mpghrb,
            MPIJRB => self.regs.mpijrb,
            MPKLRB => self.regs.mpklrb,
            MPMNRB => self.regs.mpmnrb,
            MPOPRB => self.regs.mpoprb,
            SCXIN0 => self.regs.scxin0,
            SCXDN0 => self.regs.scxdn0,
            SCYIN0 => self.regs.scyin0,
            SCYDN0 => self.regs.scydn0,
            ZMXIN0 => self.regs.zmxin0,
            ZMXDN0 => self.regs.zmxdn0,
            ZMYIN0 => self.regs.zmyin0,
            ZMYDN0 => self.regs.zmydn0,
            SCXIN1 => self.regs.scxin1,
            SCXDN1 => self.regs.scxdn1,
            SCYIN1 => self.regs.scyin1,
            SCYDN1 => self.regs.scydn1,
            ZMXIN1 => self.regs.zmxin1,
            ZMXDN1 => self.regs.zmxdn1,
            ZMYIN1 => self.regs.zmyin1,
            ZMYDN1 => self.regs.zmydn1,
            SCXN2 => self.regs.scxn2,
            SCYN2 => self.regs.scyn2,
            SCXN3 => self.regs.scxn3,
            SCYN3 => self.regs.scyn3,
            ZMCTL => self.regs.zmctl,
            SCRCTL => self.regs.scrctl,
            VCSTAU => self.regs.vcstau,
            VCSTAL => self.regs.vcstal,
            LSTA0U => self.regs.lsta0u,
            LSTA0L => self.regs.lsta0l,
            LSTA1U => self.regs.lsta1u,
            LSTA1L => self.regs.lsta1l,
            LCTAU => self.regs.lctau,
            LCTAL => self.regs.lctal,
            BKTAU => self.regs.bktau,
            BKTAL => self.regs.bktal,
            RPMD => self.regs.rpmd,
            RPRCTL => self.regs.rprctl,
            KTCTL => self.regs.ktctl,
            KTAOF => self.regs.ktaof,
            OVPNRA => self.regs.ovpnra,
            OVPNRB => self.regs.ovpnrb,
            RPTAU => self.regs.rptau,
            RPTAL => self.regs.rptal,
            WPSX0 => self.regs.wpsx0,
            WPSY0 => self.regs.wpsy0,
            WPEX0 => self.regs.wpex0,
            WPEY0 => self.regs.wpey0,
            WPSX1 => self.regs.wpsx1,
            WPSY1 => self.regs.wpsy1,
            WPEX1 => self.regs.wpex1,
            WPEY1 => self.regs.wpey1,
            WCTLA => self.regs.wctla,
            WCTLB => self.regs.wctlb,
            WCTLC => self.regs.wctlc,
            WCTLD => self.regs.wctld,
            LWTA0U => self.regs.lwta0u,
            LWTA0L => self.regs.lwta0l,
            LWTA1U => self.regs.lwta1u,
            LWTA1L => self.regs.lwta1l,
            SPCTL => self.regs.spctl,
            SDCTL => self.regs.sdctl,
            CRAOFA => self.regs.craofa,
            CRAOFB => self.regs.craofb,
            LNCLEN => self.regs.lnclen,
            SFPRMD => self.regs.sfprmd,
            CCCTL => self.regs.ccctl,
            SFCCMD => self.regs.sfccmd,
            PRISA => self.regs.prisa,
            PRISB => self.regs.prisb,
            PRISC => self.regs.prisc,
            PRISD => self.regs.prisd,
            PRINA => self.regs.prina,
            PRINB => self.regs.prinb,
            PRIR => self.regs.prir,
            RSV2 => self.regs.rsv2,
            CCRSA => self.regs.ccrsa,
            CCRSB => self.regs.ccrsb,
            CCRSC => self.regs.ccrsc,
            CCRSD => self.regs.ccrsd,
            CCRNA => self.regs.ccrna,
            CCRNB => self.regs.ccrnb,
            CCRR => self.regs.ccrr,
            CCRLB => self.regs.ccrlb,
            CLOFEN => self.regs.clofen,
            CLOFSL => self.regs.clofsl,
            COAR => self.regs.coar,
            COAG => self.regs.coag,
            COAB => self.regs.coab,
            COBR => self.regs.cobr,
            COBG => self.regs.cobg,
            COBB => self.regs.cobb,
            other => {
                log::warn!("VDP2 unmapped register read (16) {:#05x}", other);
                0
            }
        }
    }

    /// 16 bit register write
    pub fn write16(&mut self, addr: u32, data: u16) {
        use offsets::*;
        match addr & REGISTERS_MEMORY_MASK {
            TVMD => {
                self.regs.tvmd = data;
                // The screen mode and display timings depend on TVMD
                self.update_resolution();
                self.calculate_display_duration();
            }
            EXTEN => self.regs.exten = data,
            TVSTAT => self.regs.tvstat = data,
            VRSIZE => self.regs.vrsize = data,
            HCNT => self.regs.hcnt = data,
            VCNT => self.regs.vcnt = data,
            RSV1 => self.regs.rsv1 = data,
            RAMCTL => self.regs.ramctl = data,
            CYCA0L => self.regs.cyca0l = data,
            CYCA0U => self.regs.cyca0u = data,
            CYCA1L => self.regs.cyca1l = data,
            CYCA1U => self.regs.cyca1u = data,
            CYCB0L => self.regs.cycb0l = data,
            CYCB0U => self.regs.cycb0u = data,
            CYCB1L => self.regs.cycb1l = data,
            CYCB1U => self.regs.cycb1u = data,
            BGON => self.regs.bgon = data,
            MZCTL => self.regs.mzctl = data,
            SFSEL => self.regs.sfsel = data,
            SFCODE => self.regs.sfcode = data,
            CHCTLA => self.regs.chctla = data,
            CHCTLB => self.regs.chctlb = data,
            BMPNA => self.regs.bmpna = data,
            BMPNB => self.regs.bmpnb = data,
            PNCN0 => self.regs.pncn0 = data,
            PNCN1 => self.regs.pncn1 = data,
            PNCN2 => self.regs.pncn2 = data,
            PNCN3 => self.regs.pncn3 = data,
            PNCR => self.regs.pncr = data,
            PLSZ => self.regs.plsz = data,
            MPOFN => self.regs.mpofn = data,
            MPOFR => self.regs.mpofr = data,
            MPABN0 => self.regs.mpabn0 = data,
            MPCDN0 => self.regs.mpcdn0 = data,
            MPABN1 => self.regs.mpabn1 = data,
            MPCDN1 => self.regs.mpcdn1 = data,
            MPABN2 => self.regs.mpabn2 = data,
            MPCDN2 => self.regs.mpcdn2 = data,
            MPABN3 => self.regs.mpabn3 = data,
            MPCDN3 => self.regs.mpcdn3 = data,
            MPABRA => self.regs.mpabra = data,
            MPCDRA => self.regs.mpcdra = data,
            MPEFRA => self.regs.mpefra = data,
            MPGHRA => self.regs.mpghra = data,
            MPIJRA => self.regs.mpijra = data,
            MPKLRA => self.regs.mpklra = data,
            MPMNRA => self.regs.mpmnra = data,
            MPOPRA => self.regs.mpopra = data,
            MPABRB => self.regs.mpabrb = data,
            MPCDRB => self.regs.mpcdrb = data,
            MPEFRB => self.regs.mpefrb = data,
            MPGHRB => self.regs.mpghrb = data,
            MPIJRB => self.regs.mpijrb = data,
            MPKLRB => self.regs.mpklrb = data,
            MPMNRB => self.regs.mpmnrb = data,
            MPOPRB => self.regs.mpoprb = data,
            SCXIN0 => self.regs.scxin0 = data,
            SCXDN0 => self.regs.scxdn0 = data,
            SCYIN0 => self.regs.scyin0 = data,
            SCYDN0 => self.regs.scydn0 = data,
            ZMXIN0 => self.regs.zmxin0 = data,
            ZMXDN0 => self.regs.zmxdn0 = data,
            ZMYIN0 => self.regs.zmyin0 = data,
            ZMYDN0 => self.regs.zmydn0 = data,
            SCXIN1 => self.regs.scxin1 = data,
            SCXDN1 => self.regs.scxdn1 = data,
            SCYIN1 => self.regs.scyin1 = data,
            SCYDN1 => self.regs.scydn1 = data,
            ZMXIN1 => self.regs.zmxin1 = data,
            ZMXDN1 => self.regs.zmxdn1 = data,
            ZMYIN1 => self.regs.zmyin1 = data,
            ZMYDN1 => self.regs.zmydn1 = data,
            SCXN2 => self.regs.scxn2 = data,
            SCYN2 => self.regs.scyn2 = data,
            SCXN3 => self.regs.scxn3 = data,
            SCYN3 => self.regs.scyn3 = data,
            ZMCTL => self.regs.zmctl = data,
            SCRCTL => self.regs.scrctl = data,
            VCSTAU => self.regs.vcstau = data,
            VCSTAL => self.regs.vcstal = data,
            LSTA0U => self.regs.lsta0u = data,
            LSTA0L => self.regs.lsta0l = data,
            LSTA1U => self.regs.lsta1u = data,
            LSTA1L => self.regs.lsta1l = data,
            LCTAU => self.regs.lctau = data,
            LCTAL => self.regs.lctal = data,
            BKTAU => self.regs.bktau = data,
            BKTAL => self.regs.bktal = data,
            RPMD => self.regs.rpmd = data,
            RPRCTL => self.regs.rprctl = data,
            KTCTL => self.regs.ktctl = data,
            KTAOF => self.regs.ktaof = data,
            OVPNRA => self.regs.ovpnra = data,
            OVPNRB => self.regs.ovpnrb = data,
            RPTAU => self.regs.rptau = data,
            RPTAL => self.regs.rptal = data,
            WPSX0 => self.regs.wpsx0 = data,
            WPSY0 => self.regs.wpsy0 = data,
            WPEX0 => self.regs.wpex0 = data,
            WPEY0 => self.regs.wpey0 = data,
            WPSX1 => self.regs.wpsx1 = data,
            WPSY1 => self.regs.wpsy1 = data,
            WPEX1 => self.regs.wpex1 = data,
            WPEY1 => self.regs.wpey1 = data,
            WCTLA => self.regs.wctla = data,
            WCTLB => self.regs.wctlb = data,
            WCTLC => self.regs.wctlc = data,
            WCTLD => self.regs.wctld = data,
            LWTA0U => self.regs.lwta0u = data,
            LWTA0L => self.regs.lwta0l = data,
            LWTA1U => self.regs.lwta1u = data,
            LWTA1L => self.regs.lwta1l = data,
            SPCTL => self.regs.spctl = data,
            SDCTL => self.regs.sdctl = data,
            CRAOFA => self.regs.craofa = data,
            CRAOFB => self.regs.craofb = data,
            LNCLEN => self.regs.lnclen = data,
            SFPRMD => self.regs.sfprmd = data,
            CCCTL => self.regs.ccctl = data,
            SFCCMD => self.regs.sfccmd = data,
            PRISA => self.regs.prisa = data,
            PRISB => self.regs.prisb = data,
            PRISC => self.regs.prisc = data,
            PRISD => self.regs.prisd = data,
            PRINA => self.regs.prina = data,
            PRINB => self.regs.prinb = data,
            PRIR => self.regs.prir = data,
            RSV2 => self.regs.rsv2 = data,
            CCRSA => self.regs.ccrsa = data,
            CCRSB => self.regs.ccrsb = data,
            CCRSC => self.regs.ccrsc = data,
            CCRSD => self.regs.ccrsd = data,
            CCRNA => self.regs.ccrna = data,
            CCRNB => self.regs.ccrnb = data,
            CCRR => self.regs.ccrr = data,
            CCRLB => self.regs.ccrlb = data,
            CLOFEN => self.regs.clofen = data,
            CLOFSL => self.regs.clofsl = data,
            COAR => self.regs.coar = data,
            COAG => self.regs.coag = data,
            COAB => self.regs.coab = data,
            COBR => self.regs.cobr = data,
            COBG => self.regs.cobg = data,
            COBB => self.regs.cobb = data,
            other => {
                log::warn!(
                    "VDP2 unmapped register write (16) {:#05x} <- {:#06x}",
                    other,
                    data
                );
            }
        }
    }

    /// 8 bit register read: one byte of the containing 16 bit register
    pub fn read8(&self, addr: u32) -> u8 {
        let word = self.read16(addr & !1);
        if addr & 1 == 0 {
            (word >> 8) as u8
        } else {
            word as u8
        }
    }

    /// 8 bit register write: replaces the high or low byte of the
    /// containing 16 bit register
    pub fn write8(&mut self, addr: u32, data: u8) {
        let current = self.read16(addr & !1);
        let word = if addr & 1 == 0 {
            (current & 0x00FF) | (u16::from(data) << 8)
        } else {
            (current & 0xFF00) | u16::from(data)
        };
        self.write16(addr & !1, word);
    }

    /// 32 bit register read: two adjacent registers in natural order
    pub fn read32(&self, addr: u32) -> u32 {
        let hi = u32::from(self.read16(addr));
        let lo = u32::from(self.read16(addr.wrapping_add(2)));
        (hi << 16) | lo
    }

    /// 32 bit register write: two adjacent registers in natural order
    pub fn write32(&mut self, addr: u32, data: u32) {
        self.write16(addr, (data >> 16) as u16);
        self.write16(addr.wrapping_add(2), data as u16);
    }
}
