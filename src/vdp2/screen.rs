// VDP2 screen status
//
// Derived views of the raw registers: TV screen mode, RAM configuration and
// the per-scroll-screen status used by the arbitration check, the dirty
// tracking and the frame-data build. The statuses are refreshed on VBlank-In
// before the parts lists are produced.

use super::registers::{bgon, offsets, ramctl, tvmd};
use super::Vdp2;
use crate::display::ColorOffset;

/// The six scroll screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollScreen {
    Nbg0,
    Nbg1,
    Nbg2,
    Nbg3,
    Rbg0,
    Rbg1,
}

impl ScrollScreen {
    pub const ALL: [ScrollScreen; 6] = [
        ScrollScreen::Nbg0,
        ScrollScreen::Nbg1,
        ScrollScreen::Nbg2,
        ScrollScreen::Nbg3,
        ScrollScreen::Rbg0,
        ScrollScreen::Rbg1,
    ];

    pub fn index(self) -> usize {
        match self {
            ScrollScreen::Nbg0 => 0,
            ScrollScreen::Nbg1 => 1,
            ScrollScreen::Nbg2 => 2,
            ScrollScreen::Nbg3 => 3,
            ScrollScreen::Rbg0 => 4,
            ScrollScreen::Rbg1 => 5,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ScrollScreen::Nbg0 => "nbg0",
            ScrollScreen::Nbg1 => "nbg1",
            ScrollScreen::Nbg2 => "nbg2",
            ScrollScreen::Nbg3 => "nbg3",
            ScrollScreen::Rbg0 => "rbg0",
            ScrollScreen::Rbg1 => "rbg1",
        }
    }
}

/// Interlace setting from TVMD.LSMD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterlaceMode {
    #[default]
    NonInterlace,
    SingleDensity,
    DoubleDensity,
}

/// Normal / hi-res / exclusive families of screen modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScreenModeType {
    #[default]
    Normal,
    HiRes,
    Exclusive,
}

/// Exact resolution combination from TVMD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScreenMode {
    #[default]
    NotSet,
    Normal320x224,
    Normal320x240,
    Normal320x256,
    Normal320x448,
    Normal320x480,
    Normal320x512,
    Normal352x224,
    Normal352x240,
    Normal352x256,
    Normal352x448,
    Normal352x480,
    Normal352x512,
    HiRes640x224,
    HiRes640x240,
    HiRes640x256,
    HiRes640x448,
    HiRes640x480,
    HiRes640x512,
    HiRes704x224,
    HiRes704x240,
    HiRes704x256,
    HiRes704x448,
    HiRes704x480,
    HiRes704x512,
    Exclusive320x480,
    Exclusive352x480,
    Exclusive640x480,
    Exclusive704x480,
}

/// Derived TV screen status
#[derive(Debug, Clone, Default)]
pub struct TvScreenStatus {
    pub is_picture_displayed: bool,
    pub border_color_mode: bool,
    pub interlace_mode: InterlaceMode,
    pub horizontal_res: u16,
    pub vertical_res: u16,
    pub screen_mode: ScreenMode,
    pub screen_mode_type: ScreenModeType,
}

/// Color RAM modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorRamMode {
    /// 1024 colors, RGB 5 bits each, 16 bit entries
    #[default]
    Mode0Rgb5Bits1024Colors,
    /// 2048 colors, RGB 5 bits each, 16 bit entries
    Mode1Rgb5Bits2048Colors,
    /// 1024 colors, RGB 8 bits each, 32 bit entries
    Mode2Rgb8Bits1024Colors,
    Setting3NotAllowed,
}

/// VRAM bank partitioning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VramMode {
    #[default]
    NoPartition,
    PartitionIn2Banks,
}

/// Derived RAM configuration status
#[derive(Debug, Clone, Default)]
pub struct RamStatus {
    /// true: 8 Mbit, false: 4 Mbit
    pub vram_size_8mbit: bool,
    pub vram_a_mode: VramMode,
    pub vram_b_mode: VramMode,
    pub color_ram_mode: ColorRamMode,
    pub coefficient_table_in_cram: bool,
    pub vram_a0_rotation_bank_select: u8,
    pub vram_a1_rotation_bank_select: u8,
    pub vram_b0_rotation_bank_select: u8,
    pub vram_b1_rotation_bank_select: u8,
}

/// Cell or bitmap display format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollScreenFormat {
    #[default]
    Cell,
    Bitmap,
}

/// Character color counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharacterColorCount {
    #[default]
    Palette16,
    Palette256,
    Palette2048,
    Rgb32k,
    Rgb16m,
    NotAllowed,
}

impl CharacterColorCount {
    /// Bits per dot of the character pattern data
    pub fn bits_per_dot(self) -> u32 {
        match self {
            CharacterColorCount::Palette16 => 4,
            CharacterColorCount::Palette256 => 8,
            CharacterColorCount::Palette2048 => 16,
            CharacterColorCount::Rgb32k => 16,
            CharacterColorCount::Rgb16m => 32,
            CharacterColorCount::NotAllowed => 0,
        }
    }
}

/// Character pattern size (in cells)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharacterSize {
    #[default]
    OneByOne,
    TwoByTwo,
}

/// Pattern name data size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PatternNameDataSize {
    #[default]
    TwoWords,
    OneWord,
}

/// Reduction (zoom) setting from ZMCTL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReductionSetting {
    #[default]
    None,
    UpToOneHalf,
    UpToOneQuarter,
}

/// Bitmap sizes from CHCTL BMSZ fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitmapSize {
    #[default]
    Size512x256,
    Size512x512,
    Size1024x256,
    Size1024x512,
}

impl BitmapSize {
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            BitmapSize::Size512x256 => (512, 256),
            BitmapSize::Size512x512 => (512, 512),
            BitmapSize::Size1024x256 => (1024, 256),
            BitmapSize::Size1024x512 => (1024, 512),
        }
    }
}

/// Everything the frame build needs to know about one scroll screen
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrollScreenStatus {
    pub is_display_enabled: bool,
    pub is_transparency_code_valid: bool,
    pub format: ScrollScreenFormat,
    pub character_color_number: CharacterColorCount,
    pub bitmap_size: BitmapSize,
    pub bitmap_palette_number: u8,
    pub bitmap_start_address: u32,
    pub character_pattern_size: CharacterSize,
    pub pattern_name_data_size: PatternNameDataSize,
    pub character_number_supplement_mode: bool,
    pub supplementary_palette_number: u8,
    pub supplementary_character_number: u8,
    /// Plane dimensions in pages (1x1, 2x1, 2x2)
    pub plane_dimension: (u32, u32),
    /// Map dimension in planes per side (2 for NBG, 4 for RBG)
    pub map_dimension: u32,
    pub map_offset: u8,
    /// Start address of each plane, A..D for NBG and A..P for RBG
    pub plane_start_addresses: [u32; 16],
    /// One page of pattern name data, in bytes
    pub page_size: u32,
    /// One plane, in bytes
    pub plane_size: u32,
    /// Cells per page side (64 for 1x1 characters, 32 for 2x2)
    pub cells_per_page_side: u32,
    pub priority: u8,
    pub scroll_offset_x: u32,
    pub scroll_offset_y: u32,
    pub color_ram_address_offset: u16,
    pub color_offset: ColorOffset,
}

const PAGE_CELLS_ONE_BY_ONE: u32 = 64;
const PAGE_CELLS_TWO_BY_TWO: u32 = 32;

impl Vdp2 {
    /// Refresh the derived TV screen status from TVMD
    pub(crate) fn update_resolution(&mut self) {
        let regs = &self.regs;

        self.tv_screen_status.is_picture_displayed = regs.tvmd & tvmd::DISP != 0;
        self.tv_screen_status.border_color_mode = regs.tvmd & tvmd::BDCLMD != 0;
        self.tv_screen_status.interlace_mode =
            match (regs.tvmd & tvmd::LSMD_MASK) >> tvmd::LSMD_SHIFT {
                0b11 => InterlaceMode::DoubleDensity,
                0b10 => InterlaceMode::SingleDensity,
                _ => InterlaceMode::NonInterlace,
            };

        let vertical = (regs.tvmd & tvmd::VRESO_MASK) >> tvmd::VRESO_SHIFT;
        let interlaced = self.tv_screen_status.interlace_mode != InterlaceMode::NonInterlace;

        // Vertical resolution doubles in interlaced modes; 256 lines is not
        // a valid NTSC setting but the mode enum still carries it.
        let (vres, mode_index) = match vertical {
            0b00 => (if interlaced { 448 } else { 224 }, 0),
            0b01 => (if interlaced { 480 } else { 240 }, 1),
            _ => (if interlaced { 512 } else { 256 }, 2),
        };

        use ScreenMode::*;
        const NORMAL_320: [[ScreenMode; 3]; 2] = [
            [Normal320x224, Normal320x240, Normal320x256],
            [Normal320x448, Normal320x480, Normal320x512],
        ];
        const NORMAL_352: [[ScreenMode; 3]; 2] = [
            [Normal352x224, Normal352x240, Normal352x256],
            [Normal352x448, Normal352x480, Normal352x512],
        ];
        const HI_RES_640: [[ScreenMode; 3]; 2] = [
            [HiRes640x224, HiRes640x240, HiRes640x256],
            [HiRes640x448, HiRes640x480, HiRes640x512],
        ];
        const HI_RES_704: [[ScreenMode; 3]; 2] = [
            [HiRes704x224, HiRes704x240, HiRes704x256],
            [HiRes704x448, HiRes704x480, HiRes704x512],
        ];

        let row = usize::from(interlaced);
        match regs.tvmd & tvmd::HRESO_MASK {
            0b000 => {
                self.tv_screen_status.horizontal_res = 320;
                self.tv_screen_status.vertical_res = vres;
                self.tv_screen_status.screen_mode_type = ScreenModeType::Normal;
                self.tv_screen_status.screen_mode = NORMAL_320[row][mode_index];
            }
            0b001 => {
                self.tv_screen_status.horizontal_res = 352;
                self.tv_screen_status.vertical_res = vres;
                self.tv_screen_status.screen_mode_type = ScreenModeType::Normal;
                self.tv_screen_status.screen_mode = NORMAL_352[row][mode_index];
            }
            0b010 => {
                self.tv_screen_status.horizontal_res = 640;
                self.tv_screen_status.vertical_res = vres;
                self.tv_screen_status.screen_mode_type = ScreenModeType::HiRes;
                self.tv_screen_status.screen_mode = HI_RES_640[row][mode_index];
            }
            0b011 => {
                self.tv_screen_status.horizontal_res = 704;
                self.tv_screen_status.vertical_res = vres;
                self.tv_screen_status.screen_mode_type = ScreenModeType::HiRes;
                self.tv_screen_status.screen_mode = HI_RES_704[row][mode_index];
            }
            0b100 => {
                self.tv_screen_status.horizontal_res = 320;
                self.tv_screen_status.vertical_res = 480;
                self.tv_screen_status.screen_mode = Exclusive320x480;
                self.tv_screen_status.screen_mode_type = ScreenModeType::Exclusive;
            }
            0b101 => {
                self.tv_screen_status.horizontal_res = 352;
                self.tv_screen_status.vertical_res = 480;
                self.tv_screen_status.screen_mode = Exclusive352x480;
                self.tv_screen_status.screen_mode_type = ScreenModeType::Exclusive;
            }
            0b110 => {
                self.tv_screen_status.horizontal_res = 640;
                self.tv_screen_status.vertical_res = 480;
                self.tv_screen_status.screen_mode = Exclusive640x480;
                self.tv_screen_status.screen_mode_type = ScreenModeType::Exclusive;
            }
            _ => {
                self.tv_screen_status.horizontal_res = 704;
                self.tv_screen_status.vertical_res = 480;
                self.tv_screen_status.screen_mode = Exclusive704x480;
                self.tv_screen_status.screen_mode_type = ScreenModeType::Exclusive;
            }
        }
    }

    /// Refresh the derived RAM status from VRSIZE and RAMCTL
    pub(crate) fn update_ram_status(&mut self) {
        let ramctl_value = self.regs.ramctl;

        self.ram_status.vram_size_8mbit = self.regs.vrsize & 0x8000 != 0;
        self.ram_status.vram_a_mode = if ramctl_value & ramctl::VRAMD != 0 {
            VramMode::PartitionIn2Banks
        } else {
            VramMode::NoPartition
        };
        self.ram_status.vram_b_mode = if ramctl_value & ramctl::VRBMD != 0 {
            VramMode::PartitionIn2Banks
        } else {
            VramMode::NoPartition
        };
        self.ram_status.color_ram_mode =
            match (ramctl_value & ramctl::CRMD_MASK) >> ramctl::CRMD_SHIFT {
                0b00 => ColorRamMode::Mode0Rgb5Bits1024Colors,
                0b01 => ColorRamMode::Mode1Rgb5Bits2048Colors,
                0b10 => ColorRamMode::Mode2Rgb8Bits1024Colors,
                _ => ColorRamMode::Setting3NotAllowed,
            };
        self.ram_status.coefficient_table_in_cram = ramctl_value & ramctl::CRKTE != 0;
        self.ram_status.vram_a0_rotation_bank_select =
            ((ramctl_value >> ramctl::RDBSA0_SHIFT) & 0b11) as u8;
        self.ram_status.vram_a1_rotation_bank_select =
            ((ramctl_value >> ramctl::RDBSA1_SHIFT) & 0b11) as u8;
        self.ram_status.vram_b0_rotation_bank_select =
            ((ramctl_value >> ramctl::RDBSB0_SHIFT) & 0b11) as u8;
        self.ram_status.vram_b1_rotation_bank_select =
            ((ramctl_value >> ramctl::RDBSB1_SHIFT) & 0b11) as u8;
    }

    /// Color RAM address offset for a CRAOFA/CRAOFB register field value
    ///
    /// Entries are 2 bytes in modes 0/1 and 4 bytes in mode 2; mode 1
    /// widens the usable offset field by one bit.
    pub(crate) fn color_ram_address_offset(&self, register_offset: u8) -> u16 {
        let (color_size, register_mask) = match self.ram_status.color_ram_mode {
            ColorRamMode::Mode0Rgb5Bits1024Colors => (2u16, 0x3u8),
            ColorRamMode::Mode1Rgb5Bits2048Colors => (2, 0x7),
            ColorRamMode::Mode2Rgb8Bits1024Colors => (4, 0x3),
            ColorRamMode::Setting3NotAllowed => {
                log::warn!("Can't calculate color RAM address offset.");
                return 0;
            }
        };
        (u16::from(register_offset & register_mask) << 8) * color_size
    }

    /// Reduction setting for a screen (only NBG0 and NBG1 can reduce)
    pub(crate) fn reduction_setting(&self, screen: ScrollScreen) -> ReductionSetting {
        let (zmqt, zmhf) = match screen {
            ScrollScreen::Nbg0 => (self.regs.zmctl & 0x0002 != 0, self.regs.zmctl & 0x0001 != 0),
            ScrollScreen::Nbg1 => (self.regs.zmctl & 0x0200 != 0, self.regs.zmctl & 0x0100 != 0),
            _ => (false, false),
        };
        if zmqt {
            ReductionSetting::UpToOneQuarter
        } else if zmhf {
            ReductionSetting::UpToOneHalf
        } else {
            ReductionSetting::None
        }
    }

    /// Character color count of a screen, from its CHCTL field
    pub(crate) fn character_color_count(&self, screen: ScrollScreen) -> CharacterColorCount {
        use CharacterColorCount::*;
        match screen {
            ScrollScreen::Nbg0 => match (self.regs.chctla >> 4) & 0b111 {
                0b000 => Palette16,
                0b001 => Palette256,
                0b010 => Palette2048,
                0b011 => Rgb32k,
                0b100 => Rgb16m,
                _ => NotAllowed,
            },
            ScrollScreen::Nbg1 => match (self.regs.chctla >> 12) & 0b11 {
                0b00 => Palette16,
                0b01 => Palette256,
                0b10 => Palette2048,
                _ => Rgb32k,
            },
            ScrollScreen::Nbg2 => {
                if self.regs.chctlb & 0x0002 != 0 {
                    Palette256
                } else {
                    Palette16
                }
            }
            ScrollScreen::Nbg3 => {
                if self.regs.chctlb & 0x0020 != 0 {
                    Palette256
                } else {
                    Palette16
                }
            }
            ScrollScreen::Rbg0 => match (self.regs.chctlb >> 12) & 0b111 {
                0b000 => Palette16,
                0b001 => Palette256,
                0b010 => Palette2048,
                0b011 => Rgb32k,
                0b100 => Rgb16m,
                _ => NotAllowed,
            },
            // RBG1 reuses the NBG0 settings
            ScrollScreen::Rbg1 => self.character_color_count(ScrollScreen::Nbg0),
        }
    }

    /// Character pattern size of a screen (1x1 or 2x2 cells)
    pub(crate) fn character_size(&self, screen: ScrollScreen) -> CharacterSize {
        let bit = match screen {
            ScrollScreen::Nbg0 | ScrollScreen::Rbg1 => self.regs.chctla & 0x0001,
            ScrollScreen::Nbg1 => self.regs.chctla & 0x0100,
            ScrollScreen::Nbg2 => self.regs.chctlb & 0x0001,
            ScrollScreen::Nbg3 => self.regs.chctlb & 0x0010,
            ScrollScreen::Rbg0 => self.regs.chctlb & 0x0100,
        };
        if bit != 0 {
            CharacterSize::TwoByTwo
        } else {
            CharacterSize::OneByOne
        }
    }

    /// Bitmap format flag (only NBG0, NBG1 and RBG0 can use bitmaps)
    pub(crate) fn is_bitmap_format(&self, screen: ScrollScreen) -> bool {
        match screen {
            ScrollScreen::Nbg0 => self.regs.chctla & 0x0002 != 0,
            ScrollScreen::Nbg1 => self.regs.chctla & 0x0200 != 0,
            ScrollScreen::Rbg0 => self.regs.chctlb & 0x0200 != 0,
            _ => false,
        }
    }

    /// Rebuild the derived status of one scroll screen from the registers
    #[allow(clippy::too_many_lines)]
    pub(crate) fn update_scroll_screen_status(&mut self, screen: ScrollScreen) {
        use ScrollScreen::*;

        let regs = &self.regs;

        // The BGON enable bit is consumed by the arbitration check, which
        // owns is_display_enabled; only the transparency bit matters here.
        let transparency_bit = match screen {
            Nbg0 | Rbg1 => bgon::N0TPON,
            Nbg1 => bgon::N1TPON,
            Nbg2 => bgon::N2TPON,
            Nbg3 => bgon::N3TPON,
            Rbg0 => bgon::R0TPON,
        };
        let transparency_valid = regs.bgon & transparency_bit == 0;

        let format = if self.is_bitmap_format(screen) {
            ScrollScreenFormat::Bitmap
        } else {
            ScrollScreenFormat::Cell
        };
        let color_count = self.character_color_count(screen);
        let character_size = self.character_size(screen);

        // Pattern name control
        let pnc = match screen {
            Nbg0 | Rbg1 => regs.pncn0,
            Nbg1 => regs.pncn1,
            Nbg2 => regs.pncn2,
            Nbg3 => regs.pncn3,
            Rbg0 => regs.pncr,
        };
        let pnd_size = if pnc & 0x8000 != 0 {
            PatternNameDataSize::OneWord
        } else {
            PatternNameDataSize::TwoWords
        };
        let supplement_mode = pnc & 0x4000 != 0;
        let supplementary_palette = ((pnc >> 5) & 0b111) as u8;
        let supplementary_character = (pnc & 0x1F) as u8;

        // Plane size (in pages)
        let plsz_shift = match screen {
            Nbg0 | Rbg1 => 0,
            Nbg1 => 2,
            Nbg2 => 4,
            Nbg3 => 6,
            Rbg0 => 8,
        };
        let plane_dimension = match (regs.plsz >> plsz_shift) & 0b11 {
            0b00 => (1, 1),
            0b01 => (2, 1),
            0b11 => (2, 2),
            _ => {
                log::warn!("VDP2 invalid plane size for {}", screen.name());
                (1, 1)
            }
        };

        // Map offset (3 bits)
        let map_offset = match screen {
            Nbg0 => (regs.mpofn & 0b111) as u8,
            Nbg1 => ((regs.mpofn >> 4) & 0b111) as u8,
            Nbg2 => ((regs.mpofn >> 8) & 0b111) as u8,
            Nbg3 => ((regs.mpofn >> 12) & 0b111) as u8,
            Rbg0 => (regs.mpofr & 0b111) as u8,
            Rbg1 => ((regs.mpofr >> 4) & 0b111) as u8,
        };

        // Page size in bytes: cells per page side squared times PND size
        let cells_per_page_side = match character_size {
            CharacterSize::OneByOne => PAGE_CELLS_ONE_BY_ONE,
            CharacterSize::TwoByTwo => PAGE_CELLS_TWO_BY_TWO,
        };
        let pnd_bytes = match pnd_size {
            PatternNameDataSize::OneWord => 2,
            PatternNameDataSize::TwoWords => 4,
        };
        let page_size = cells_per_page_side * cells_per_page_side * pnd_bytes;
        let plane_size = page_size * plane_dimension.0 * plane_dimension.1;

        // Plane start addresses from the map registers (6 bits each, two
        // planes per register), extended by the 3 bit map offset
        let mut plane_start_addresses = [0u32; 16];
        let map_dimension: u32;
        match screen {
            Nbg0 | Nbg1 | Nbg2 | Nbg3 => {
                map_dimension = 2;
                let (mpab, mpcd) = match screen {
                    Nbg0 => (regs.mpabn0, regs.mpcdn0),
                    Nbg1 => (regs.mpabn1, regs.mpcdn1),
                    Nbg2 => (regs.mpabn2, regs.mpcdn2),
                    Nbg3 => (regs.mpabn3, regs.mpcdn3),
                    _ => unreachable!(),
                };
                let planes = [
                    (mpab & 0x3F) as u32,
                    ((mpab >> 8) & 0x3F) as u32,
                    (mpcd & 0x3F) as u32,
                    ((mpcd >> 8) & 0x3F) as u32,
                ];
                for (slot, plane) in planes.iter().enumerate() {
                    plane_start_addresses[slot] =
                        self.plane_address(map_offset, *plane, plane_size);
                }
            }
            Rbg0 | Rbg1 => {
                map_dimension = 4;
                let maps = if screen == Rbg0 {
                    [
                        regs.mpabra, regs.mpcdra, regs.mpefra, regs.mpghra, regs.mpijra,
                        regs.mpklra, regs.mpmnra, regs.mpopra,
                    ]
                } else {
                    [
                        regs.mpabrb, regs.mpcdrb, regs.mpefrb, regs.mpghrb, regs.mpijrb,
                        regs.mpklrb, regs.mpmnrb, regs.mpoprb,
                    ]
                };
                for (pair, value) in maps.iter().enumerate() {
                    plane_start_addresses[pair * 2] =
                        self.plane_address(map_offset, u32::from(value & 0x3F), plane_size);
                    plane_start_addresses[pair * 2 + 1] =
                        self.plane_address(map_offset, u32::from((value >> 8) & 0x3F), plane_size);
                }
            }
        }

        // Bitmap parameters
        let (bmsz, bitmap_palette) = match screen {
            Nbg0 => (((regs.chctla >> 2) & 0b11) as u8, (regs.bmpna & 0b111) as u8),
            Nbg1 => (
                ((regs.chctla >> 10) & 0b11) as u8,
                ((regs.bmpna >> 8) & 0b111) as u8,
            ),
            // RBG0's BMSZ is a single bit: 512x256 or 512x512
            Rbg0 => (
                ((regs.chctlb >> 10) & 0b1) as u8,
                (regs.bmpnb & 0b111) as u8,
            ),
            _ => (0, 0),
        };
        let bitmap_size = match bmsz {
            0b00 => BitmapSize::Size512x256,
            0b01 => BitmapSize::Size512x512,
            0b10 => BitmapSize::Size1024x256,
            _ => BitmapSize::Size1024x512,
        };
        let bitmap_start_address = (u32::from(map_offset) << 17) & super::VRAM_MEMORY_MASK;

        // Priority
        let priority = match screen {
            Nbg0 | Rbg1 => (regs.prina & 0b111) as u8,
            Nbg1 => ((regs.prina >> 8) & 0b111) as u8,
            Nbg2 => (regs.prinb & 0b111) as u8,
            Nbg3 => ((regs.prinb >> 8) & 0b111) as u8,
            Rbg0 => (regs.prir & 0b111) as u8,
        };

        // Screen scroll (integer parts only; the fractional registers are
        // kept but not applied at cell granularity)
        let (scroll_x, scroll_y) = match screen {
            Nbg0 | Rbg1 => (regs.scxin0 & 0x7FF, regs.scyin0 & 0x7FF),
            Nbg1 => (regs.scxin1 & 0x7FF, regs.scyin1 & 0x7FF),
            Nbg2 => (regs.scxn2 & 0x7FF, regs.scyn2 & 0x7FF),
            Nbg3 => (regs.scxn3 & 0x7FF, regs.scyn3 & 0x7FF),
            Rbg0 => (0, 0),
        };

        // Color RAM address offset
        let craof_field = match screen {
            Nbg0 | Rbg1 => (regs.craofa & 0b111) as u8,
            Nbg1 => ((regs.craofa >> 4) & 0b111) as u8,
            Nbg2 => ((regs.craofa >> 8) & 0b111) as u8,
            Nbg3 => ((regs.craofa >> 12) & 0b111) as u8,
            Rbg0 => (regs.craofb & 0b111) as u8,
        };
        let color_ram_address_offset = self.color_ram_address_offset(craof_field);

        let color_offset = self.get_color_offset(super::scroll_screen_to_layer(screen));

        // is_display_enabled is left alone: the arbitration check owns it.
        let status = &mut self.bg[screen.index()];
        status.is_transparency_code_valid = transparency_valid;
        status.format = format;
        status.character_color_number = color_count;
        status.bitmap_size = bitmap_size;
        status.bitmap_palette_number = bitmap_palette;
        status.bitmap_start_address = bitmap_start_address;
        status.character_pattern_size = character_size;
        status.pattern_name_data_size = pnd_size;
        status.character_number_supplement_mode = supplement_mode;
        status.supplementary_palette_number = supplementary_palette;
        status.supplementary_character_number = supplementary_character;
        status.plane_dimension = plane_dimension;
        status.map_dimension = map_dimension;
        status.map_offset = map_offset;
        status.plane_start_addresses = plane_start_addresses;
        status.page_size = page_size;
        status.plane_size = plane_size;
        status.cells_per_page_side = cells_per_page_side;
        status.priority = priority;
        status.scroll_offset_x = u32::from(scroll_x);
        status.scroll_offset_y = u32::from(scroll_y);
        status.color_ram_address_offset = color_ram_address_offset;
        status.color_offset = color_offset;
    }

    /// VRAM address of a plane from its map register value
    fn plane_address(&self, map_offset: u8, plane_value: u32, plane_size: u32) -> u32 {
        let map_value = (u32::from(map_offset) << 6) | plane_value;
        map_value.wrapping_mul(plane_size) & super::VRAM_MEMORY_MASK
    }

    /// Keep a register-name map for the debug surface
    pub fn register_name(addr: u32) -> &'static str {
        use offsets::*;
        match addr & REGISTERS_MEMORY_MASK_LOCAL {
            TVMD => "TV Screen Mode",
            EXTEN => "External Signal Enable",
            TVSTAT => "Screen Status",
            VRSIZE => "VRAM Size",
            HCNT => "H-Counter",
            VCNT => "V-Counter",
            RAMCTL => "RAM Control",
            CYCA0L => "VRAM Cycle Pattern (Bank A0) lower",
            CYCA0U => "VRAM Cycle Pattern (Bank A0) upper",
            CYCA1L => "VRAM Cycle Pattern (Bank A1) lower",
            CYCA1U => "VRAM Cycle Pattern (Bank A1) upper",
            CYCB0L => "VRAM Cycle Pattern (Bank B0) lower",
            CYCB0U => "VRAM Cycle Pattern (Bank B0) upper",
            CYCB1L => "VRAM Cycle Pattern (Bank B1) lower",
            CYCB1U => "VRAM Cycle Pattern (Bank B1) upper",
            BGON => "Screen Display Enable",
            MZCTL => "Mosaic Control",
            CHCTLA => "Character Control (NBG0, NBG1)",
            CHCTLB => "Character Control (NBG2, NBG3, RBG0)",
            BMPNA => "Bitmap Palette Number (NBG0, NBG1)",
            BMPNB => "Bitmap Palette Number (RBG0)",
            PNCN0 => "Pattern Name Control (NBG0)",
            PNCN1 => "Pattern Name Control (NBG1)",
            PNCN2 => "Pattern Name Control (NBG2)",
            PNCN3 => "Pattern Name Control (NBG3)",
            PNCR => "Pattern Name Control (RBG0)",
            PLSZ => "Plane Size",
            MPOFN => "Map Offset (NBG0 - NBG3)",
            MPOFR => "Map Offset (Rotation Parameter A,B)",
            ZMCTL => "Reduction Enable",
            RPMD => "Rotation Parameter Mode",
            KTCTL => "Coefficient Table Control",
            KTAOF => "Coefficient Table Address Offset",
            RPTAU => "Rotation Parameter Table Address Upper",
            RPTAL => "Rotation Parameter Table Address Lower",
            SPCTL => "Sprite Control",
            CRAOFA => "Color RAM Address Offset (NBG0 - NBG3)",
            CRAOFB => "Color RAM Address Offset (RBG0, SPRITE)",
            PRISA => "Priority Number (SPRITE 0,1)",
            PRISB => "Priority Number (SPRITE 2,3)",
            PRISC => "Priority Number (SPRITE 4,5)",
            PRISD => "Priority Number (SPRITE 6,7)",
            PRINA => "Priority Number (NBG0, NBG1)",
            PRINB => "Priority Number (NBG2, NBG3)",
            PRIR => "Priority Number (RBG0)",
            CLOFEN => "Color Offset Enable",
            CLOFSL => "Color Offset Select",
            COAR => "Color Offset A (Red)",
            COAG => "Color Offset A (Green)",
            COAB => "Color Offset A (Blue)",
            COBR => "Color Offset B (Red)",
            COBG => "Color Offset B (Green)",
            COBB => "Color Offset B (Blue)",
            _ => "unknown register",
        }
    }
}

const REGISTERS_MEMORY_MASK_LOCAL: u32 = super::registers::REGISTERS_MEMORY_MASK;
