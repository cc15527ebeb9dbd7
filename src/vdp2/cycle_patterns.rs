// VRAM cycle-pattern arbitration
//
// Before a scroll screen may display, the access pattern programmed in the
// CYCxxL/U registers must reserve enough read slots for that screen's
// pattern-name and character-pattern data. Timings T0..T7 are available in
// normal modes, only T0..T3 in hi-res and exclusive modes.
//
// Pattern name data reads may come from at most two banks: A0/B0, or A1/B1
// when both banks are partitioned (the larger of the two pairs counts).
// Bitmap reads sum over every configured bank. Character pattern reads are
// restricted by the pattern-name timing slots; the full SatTech #37 table is
// compiled in behind the `strict-vram-timings` feature, the relaxed form
// (all slots in normal modes, the first four in hi-res) is the baseline.

use super::registers::tvmd;
use super::screen::{
    CharacterColorCount, CharacterSize, ReductionSetting, ScrollScreen, VramMode,
};
use super::Vdp2;

/// VRAM access commands programmed in the cycle pattern registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VramAccessCommand {
    Nbg0PatternNameRead,
    Nbg1PatternNameRead,
    Nbg2PatternNameRead,
    Nbg3PatternNameRead,
    Nbg0CharacterPatternDataRead,
    Nbg1CharacterPatternDataRead,
    Nbg2CharacterPatternDataRead,
    Nbg3CharacterPatternDataRead,
    Nbg0VerticalCellScrollTableDataRead,
    Nbg1VerticalCellScrollTableDataRead,
    CpuReadWrite,
    NoAccess,
}

impl VramAccessCommand {
    /// Decode one 4 bit timing field
    pub fn from_bits(bits: u16) -> Self {
        use VramAccessCommand::*;
        match bits & 0xF {
            0x0 => Nbg0PatternNameRead,
            0x1 => Nbg1PatternNameRead,
            0x2 => Nbg2PatternNameRead,
            0x3 => Nbg3PatternNameRead,
            0x4 => Nbg0CharacterPatternDataRead,
            0x5 => Nbg1CharacterPatternDataRead,
            0x6 => Nbg2CharacterPatternDataRead,
            0x7 => Nbg3CharacterPatternDataRead,
            0xC => Nbg0VerticalCellScrollTableDataRead,
            0xD => Nbg1VerticalCellScrollTableDataRead,
            0xE => CpuReadWrite,
            _ => NoAccess,
        }
    }
}

/// The eight timing slots of one VRAM bank
pub type VramTiming = [VramAccessCommand; 8];

const VRAM_TIMING_SIZE: usize = 8;

impl Vdp2 {
    /// Arbitration check for one scroll screen
    ///
    /// Returns whether the screen may display and records the verdict in the
    /// screen status (`is_display_enabled`), which the debug UI reads.
    pub fn is_screen_displayed(&mut self, screen: ScrollScreen) -> bool {
        use super::registers::bgon;
        use ScrollScreen::*;

        self.bg[screen.index()].is_display_enabled = false;

        let displayed = match screen {
            Nbg0 | Nbg1 => {
                let enable_bit = if screen == Nbg0 { bgon::N0ON } else { bgon::N1ON };
                if self.regs.bgon & enable_bit == 0 {
                    return false;
                }

                // Pattern name data reads depend on the reduction setting of
                // the screen; character / bitmap pattern data reads also
                // depend on the color count.
                let reduction = self.reduction_setting(screen);
                let color_count = self.character_color_count(screen);
                let cpd_command = if screen == Nbg0 {
                    VramAccessCommand::Nbg0CharacterPatternDataRead
                } else {
                    VramAccessCommand::Nbg1CharacterPatternDataRead
                };

                if self.is_bitmap_format(screen) {
                    // Bitmap format needs only bitmap pattern data.
                    let required =
                        required_character_pattern_reads(reduction, color_count);
                    let current = self.vram_access_by_command(cpd_command, reduction);
                    current >= required
                } else {
                    let pnd_command = if screen == Nbg0 {
                        VramAccessCommand::Nbg0PatternNameRead
                    } else {
                        VramAccessCommand::Nbg1PatternNameRead
                    };
                    let required_pnd = required_pattern_name_reads(reduction);
                    let current_pnd = self.vram_access_by_command(pnd_command, reduction);
                    if current_pnd < required_pnd {
                        return false;
                    }

                    let required_cpd =
                        required_character_pattern_reads(reduction, color_count);
                    let current_cpd = self.vram_access_by_command(cpd_command, reduction);
                    current_cpd >= required_cpd
                }
            }
            Nbg2 | Nbg3 => {
                let enable_bit = if screen == Nbg2 { bgon::N2ON } else { bgon::N3ON };
                if self.regs.bgon & enable_bit == 0 {
                    return false;
                }
                if self.is_screen_display_limited_by_reduction(screen) {
                    return false;
                }

                let reduction = ReductionSetting::None;
                let (pnd_command, cpd_command) = if screen == Nbg2 {
                    (
                        VramAccessCommand::Nbg2PatternNameRead,
                        VramAccessCommand::Nbg2CharacterPatternDataRead,
                    )
                } else {
                    (
                        VramAccessCommand::Nbg3PatternNameRead,
                        VramAccessCommand::Nbg3CharacterPatternDataRead,
                    )
                };

                let required_pnd = required_pattern_name_reads(reduction);
                let current_pnd = self.vram_access_by_command(pnd_command, reduction);
                if current_pnd < required_pnd {
                    return false;
                }

                let color_count = self.character_color_count(screen);
                let required_cpd = required_character_pattern_reads(reduction, color_count);
                let current_cpd = self.vram_access_by_command(cpd_command, reduction);
                current_cpd >= required_cpd
            }
            Rbg0 => {
                if self.regs.bgon & bgon::R0ON == 0 {
                    return false;
                }
                // The rotation screens read through the dedicated rotation
                // data banks, not the cycle patterns.
                true
            }
            Rbg1 => self.regs.bgon & bgon::R1ON != 0,
        };

        self.bg[screen.index()].is_display_enabled = displayed;
        displayed
    }

    /// NBG2 cannot display under heavy NBG0 reduction, NBG3 under NBG1's
    pub(crate) fn is_screen_display_limited_by_reduction(&self, screen: ScrollScreen) -> bool {
        let (reduction, color_count) = match screen {
            ScrollScreen::Nbg2 => (
                self.reduction_setting(ScrollScreen::Nbg0),
                self.character_color_count(ScrollScreen::Nbg0),
            ),
            ScrollScreen::Nbg3 => (
                self.reduction_setting(ScrollScreen::Nbg1),
                self.character_color_count(ScrollScreen::Nbg1),
            ),
            _ => return false,
        };

        if reduction == ReductionSetting::UpToOneQuarter
            && color_count == CharacterColorCount::Palette16
        {
            return true;
        }
        if reduction == ReductionSetting::UpToOneHalf
            && color_count == CharacterColorCount::Palette256
        {
            return true;
        }
        false
    }

    fn is_normal_mode(&self) -> bool {
        matches!(self.regs.tvmd & tvmd::HRESO_MASK, 0b000 | 0b001)
    }

    /// Decode one bank's timing slots; T4..T7 only exist in normal modes
    fn bank_timing(&self, lower: u16, upper: u16) -> VramTiming {
        let is_normal_mode = self.is_normal_mode();
        let slot = |reg: u16, pos: u16| VramAccessCommand::from_bits(reg >> (12 - pos * 4));
        [
            slot(lower, 0),
            slot(lower, 1),
            slot(lower, 2),
            slot(lower, 3),
            if is_normal_mode { slot(upper, 0) } else { VramAccessCommand::NoAccess },
            if is_normal_mode { slot(upper, 1) } else { VramAccessCommand::NoAccess },
            if is_normal_mode { slot(upper, 2) } else { VramAccessCommand::NoAccess },
            if is_normal_mode { slot(upper, 3) } else { VramAccessCommand::NoAccess },
        ]
    }

    /// Granted read slots for a command across the four banks
    pub(crate) fn vram_access_by_command(
        &self,
        command: VramAccessCommand,
        reduction: ReductionSetting,
    ) -> u8 {
        use VramAccessCommand::*;

        let bank_a0 = self.bank_timing(self.regs.cyca0l, self.regs.cyca0u);
        let bank_a1 = self.bank_timing(self.regs.cyca1l, self.regs.cyca1u);
        let bank_b0 = self.bank_timing(self.regs.cycb0l, self.regs.cycb0u);
        let bank_b1 = self.bank_timing(self.regs.cycb1l, self.regs.cycb1u);

        match command {
            Nbg0CharacterPatternDataRead
            | Nbg1CharacterPatternDataRead
            | Nbg2CharacterPatternDataRead
            | Nbg3CharacterPatternDataRead => {
                let screen = match command {
                    Nbg0CharacterPatternDataRead => ScrollScreen::Nbg0,
                    Nbg1CharacterPatternDataRead => ScrollScreen::Nbg1,
                    Nbg2CharacterPatternDataRead => ScrollScreen::Nbg2,
                    _ => ScrollScreen::Nbg3,
                };
                if self.is_bitmap_format(screen) {
                    return bitmap_reads(
                        &bank_a0,
                        &bank_a1,
                        &bank_b0,
                        &bank_b1,
                        self.ram_status.vram_a_mode,
                        self.ram_status.vram_b_mode,
                        command,
                    );
                }
                character_pattern_reads(
                    &bank_a0,
                    &bank_a1,
                    &bank_b0,
                    &bank_b1,
                    command,
                    reduction,
                    self.is_normal_mode(),
                    self.character_size(screen) == CharacterSize::TwoByTwo,
                )
            }
            Nbg0PatternNameRead | Nbg1PatternNameRead | Nbg2PatternNameRead
            | Nbg3PatternNameRead => pattern_name_reads(
                &bank_a0,
                &bank_a1,
                &bank_b0,
                &bank_b1,
                self.ram_status.vram_a_mode,
                self.ram_status.vram_b_mode,
                command,
            ),
            Nbg0VerticalCellScrollTableDataRead | Nbg1VerticalCellScrollTableDataRead => {
                log::warn!("VDP2 vertical cell scroll table data read not counted");
                0
            }
            CpuReadWrite => 0,
            NoAccess => {
                log::warn!("VDP2 VRAM access command not allowed");
                0
            }
        }
    }
}

fn count(bank: &VramTiming, command: VramAccessCommand) -> u8 {
    bank.iter().filter(|&&c| c == command).count() as u8
}

/// Required pattern-name reads for a reduction setting
pub fn required_pattern_name_reads(reduction: ReductionSetting) -> u8 {
    match reduction {
        ReductionSetting::UpToOneQuarter => 4,
        ReductionSetting::UpToOneHalf => 2,
        ReductionSetting::None => 1,
    }
}

/// Required character-pattern reads for a reduction setting and color count.
/// Zero means the combination cannot display at all.
pub fn required_character_pattern_reads(
    reduction: ReductionSetting,
    color_count: CharacterColorCount,
) -> u8 {
    use CharacterColorCount::*;
    use ReductionSetting::*;
    match (color_count, reduction) {
        (Palette16, None) => 1,
        (Palette16, UpToOneHalf) => 2,
        (Palette16, UpToOneQuarter) => 4,
        (Palette256, None) => 2,
        (Palette256, UpToOneHalf) => 4,
        (Palette2048, None) => 4,
        (Rgb32k, None) => 4,
        (Rgb16m, None) => 8,
        _ => 0,
    }
}

/// Bitmap pattern reads: sum across every configured bank
fn bitmap_reads(
    bank_a0: &VramTiming,
    bank_a1: &VramTiming,
    bank_b0: &VramTiming,
    bank_b1: &VramTiming,
    vram_a_mode: VramMode,
    vram_b_mode: VramMode,
    command: VramAccessCommand,
) -> u8 {
    let mut reads = count(bank_a0, command);
    if vram_a_mode == VramMode::PartitionIn2Banks {
        reads += count(bank_a1, command);
    }
    reads += count(bank_b0, command);
    if vram_b_mode == VramMode::PartitionIn2Banks {
        reads += count(bank_b1, command);
    }
    reads
}

/// Pattern name data reads
///
/// At most two banks may supply PND: A0/B0, or A1/B1 when both banks are
/// partitioned, in which case the larger pair wins.
///
/// ```text
/// | Partition A | Partition B |   Banks used    |
/// |-------------|-------------|-----------------|
/// |     no      |     no      | A0, B0          |
/// |    yes      |     no      | A0, B0          |
/// |     no      |    yes      | A0, B0          |
/// |    yes      |    yes      | A0,B0 or A1,B1  |
/// ```
fn pattern_name_reads(
    bank_a0: &VramTiming,
    bank_a1: &VramTiming,
    bank_b0: &VramTiming,
    bank_b1: &VramTiming,
    vram_a_mode: VramMode,
    vram_b_mode: VramMode,
    command: VramAccessCommand,
) -> u8 {
    if vram_a_mode == VramMode::PartitionIn2Banks && vram_b_mode == VramMode::PartitionIn2Banks {
        let bank_0_reads = count(bank_a0, command) + count(bank_b0, command);
        let bank_1_reads = count(bank_a1, command) + count(bank_b1, command);
        bank_0_reads.max(bank_1_reads)
    } else {
        count(bank_a0, command) + count(bank_b0, command)
    }
}

/// The pattern name read linked to a character pattern read command
fn pattern_name_from_character_pattern(command: VramAccessCommand) -> VramAccessCommand {
    use VramAccessCommand::*;
    match command {
        Nbg0CharacterPatternDataRead => Nbg0PatternNameRead,
        Nbg1CharacterPatternDataRead => Nbg1PatternNameRead,
        Nbg2CharacterPatternDataRead => Nbg2PatternNameRead,
        Nbg3CharacterPatternDataRead => Nbg3PatternNameRead,
        _ => NoAccess,
    }
}

/// Mark the slots where a bank reads the given pattern name data
fn set_pattern_name_access(
    bank: &VramTiming,
    pattern: VramAccessCommand,
    pnd_access: &mut [bool; VRAM_TIMING_SIZE],
) {
    for (slot, &command) in bank.iter().enumerate() {
        if command == pattern {
            pnd_access[slot] = true;
        }
    }
}

/// Character pattern timing limitations derived from the PND slots
///
/// This is the SatTech #37 table: each pattern-name access slot opens a set
/// of character-pattern slots, tighter in hi-res modes, tighter again for
/// 2x2 character patterns at T2/T3.
#[cfg(feature = "strict-vram-timings")]
fn set_character_pattern_limitations(
    is_screen_mode_normal: bool,
    is_character_pattern_2_by_2: bool,
    pnd_access: &[bool; VRAM_TIMING_SIZE],
    allowed_cpd_timing: &mut [bool; VRAM_TIMING_SIZE],
) {
    for (slot, &accessed) in pnd_access.iter().enumerate() {
        if !accessed {
            continue;
        }
        match slot {
            0 => {
                if is_screen_mode_normal {
                    allowed_cpd_timing[0] = true;
                    allowed_cpd_timing[1] = true;
                    allowed_cpd_timing[2] = true;
                    allowed_cpd_timing[4] = true;
                    allowed_cpd_timing[5] = true;
                    allowed_cpd_timing[6] = true;
                    allowed_cpd_timing[7] = true;
                } else {
                    allowed_cpd_timing[0] = true;
                    allowed_cpd_timing[1] = true;
                    allowed_cpd_timing[2] = true;
                }
            }
            1 => {
                if is_screen_mode_normal {
                    allowed_cpd_timing[0] = true;
                    allowed_cpd_timing[1] = true;
                    allowed_cpd_timing[2] = true;
                    allowed_cpd_timing[3] = true;
                    allowed_cpd_timing[5] = true;
                    allowed_cpd_timing[6] = true;
                    allowed_cpd_timing[7] = true;
                } else {
                    allowed_cpd_timing[1] = true;
                    allowed_cpd_timing[2] = true;
                    allowed_cpd_timing[3] = true;
                }
            }
            2 => {
                if is_screen_mode_normal {
                    allowed_cpd_timing[0] = true;
                    allowed_cpd_timing[1] = true;
                    allowed_cpd_timing[2] = true;
                    allowed_cpd_timing[3] = true;
                    allowed_cpd_timing[6] = true;
                    allowed_cpd_timing[7] = true;
                } else {
                    // PND at T2 in hi-res with 2x2 characters restricts
                    // character pattern access to T2 and T3
                    if !is_character_pattern_2_by_2 {
                        allowed_cpd_timing[0] = true;
                    }
                    allowed_cpd_timing[2] = true;
                    allowed_cpd_timing[3] = true;
                }
            }
            3 => {
                if is_screen_mode_normal {
                    allowed_cpd_timing[0] = true;
                    allowed_cpd_timing[1] = true;
                    allowed_cpd_timing[2] = true;
                    allowed_cpd_timing[3] = true;
                    allowed_cpd_timing[7] = true;
                } else {
                    if !is_character_pattern_2_by_2 {
                        allowed_cpd_timing[0] = true;
                        allowed_cpd_timing[1] = true;
                    }
                    allowed_cpd_timing[3] = true;
                }
            }
            4 => {
                if is_screen_mode_normal {
                    allowed_cpd_timing[0] = true;
                    allowed_cpd_timing[1] = true;
                    allowed_cpd_timing[2] = true;
                    allowed_cpd_timing[3] = true;
                }
            }
            5 => {
                if is_screen_mode_normal {
                    allowed_cpd_timing[1] = true;
                    allowed_cpd_timing[2] = true;
                    allowed_cpd_timing[3] = true;
                }
            }
            6 => {
                if is_screen_mode_normal {
                    allowed_cpd_timing[2] = true;
                    allowed_cpd_timing[3] = true;
                }
            }
            _ => {
                if is_screen_mode_normal {
                    allowed_cpd_timing[3] = true;
                }
            }
        }
    }
}

/// Character pattern data reads, with the slot limitations applied
#[allow(clippy::too_many_arguments)]
fn character_pattern_reads(
    bank_a0: &VramTiming,
    bank_a1: &VramTiming,
    bank_b0: &VramTiming,
    bank_b1: &VramTiming,
    command: VramAccessCommand,
    reduction: ReductionSetting,
    is_screen_mode_normal: bool,
    is_using_2_by_2_cp: bool,
) -> u8 {
    // The limitations are keyed on the pattern-name read slots linked to
    // this command.
    let pnd = pattern_name_from_character_pattern(command);

    let mut pnd_timing_access = [false; VRAM_TIMING_SIZE];
    set_pattern_name_access(bank_a0, pnd, &mut pnd_timing_access);
    set_pattern_name_access(bank_b0, pnd, &mut pnd_timing_access);
    set_pattern_name_access(bank_a1, pnd, &mut pnd_timing_access);
    set_pattern_name_access(bank_b1, pnd, &mut pnd_timing_access);

    // Without reduction the limitations only apply from two CPD reads up;
    // with reduction they always apply.
    let mut are_limitations_applied = true;
    if reduction == ReductionSetting::None {
        let unlimited_cpd_reads = count(bank_a0, command)
            + count(bank_b0, command)
            + count(bank_a1, command)
            + count(bank_b1, command);
        if unlimited_cpd_reads < 2 {
            are_limitations_applied = false;
        }
    }

    let mut limited_a0 = *bank_a0;
    let mut limited_b0 = *bank_b0;
    let mut limited_a1 = *bank_a1;
    let mut limited_b1 = *bank_b1;

    if are_limitations_applied {
        #[cfg(feature = "strict-vram-timings")]
        let allowed_cpd_timing = {
            let mut allowed = [false; VRAM_TIMING_SIZE];
            set_character_pattern_limitations(
                is_screen_mode_normal,
                is_using_2_by_2_cp,
                &pnd_timing_access,
                &mut allowed,
            );
            allowed
        };

        // Relaxed baseline: every slot in normal modes, T0..T3 in hi-res.
        #[cfg(not(feature = "strict-vram-timings"))]
        let allowed_cpd_timing = {
            let _ = (&pnd_timing_access, is_using_2_by_2_cp);
            if is_screen_mode_normal {
                [true; VRAM_TIMING_SIZE]
            } else {
                [true, true, true, true, false, false, false, false]
            }
        };

        for (slot, &allowed) in allowed_cpd_timing.iter().enumerate() {
            if !allowed {
                limited_a0[slot] = VramAccessCommand::NoAccess;
                limited_b0[slot] = VramAccessCommand::NoAccess;
                limited_a1[slot] = VramAccessCommand::NoAccess;
                limited_b1[slot] = VramAccessCommand::NoAccess;
            }
        }
    }

    count(&limited_a0, command)
        + count(&limited_b0, command)
        + count(&limited_a1, command)
        + count(&limited_b1, command)
}
