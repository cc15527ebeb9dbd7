// VDP2 module - background controller implementation
//
// The VDP2 owns the tile/bitmap background engine: the register file, the
// TV timing state machine (HBlank / VBlank / line counters), the VRAM
// cycle-pattern arbitration that gates whether a scroll screen may display
// at all, and the per-frame render-data build that turns VRAM contents into
// parts lists for the compositor.
//
// # Timing model
//
// `run(cycles)` advances the beam. Crossing the active-display boundary
// enters VBlank and triggers the frame build; crossing the frame boundary
// starts a new frame and recomputes the line durations from the TV
// standard. The host forwards the returned events to the SCU (interrupts)
// and to the compositor (frame handoff).

pub mod cache;
pub mod cycle_patterns;
pub mod registers;
pub mod rendering;
pub mod screen;

#[cfg(test)]
mod tests;

use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::compositor::TextureCache;
use crate::display::{ColorOffset, RenderPart, VdpLayer, VdpType};
use crate::emulator::TvStandard;
use crate::smpc::SystemClock;
pub use registers::Vdp2Registers;
pub use screen::{
    BitmapSize, CharacterColorCount, CharacterSize, ColorRamMode, InterlaceMode,
    PatternNameDataSize, RamStatus, ReductionSetting, ScreenMode, ScreenModeType, ScrollScreen,
    ScrollScreenFormat, ScrollScreenStatus, TvScreenStatus, VramMode,
};

/// VRAM size (512KB, the full 8 Mbit configuration)
pub const VRAM_SIZE: usize = 0x8_0000;
/// Color RAM size (4KB)
pub const CRAM_SIZE: usize = 0x1000;
/// Mask for VRAM addressing
pub const VRAM_MEMORY_MASK: u32 = (VRAM_SIZE as u32) - 1;
/// Mask for CRAM addressing
pub const CRAM_MEMORY_MASK: u32 = (CRAM_SIZE as u32) - 1;

/// Dirty-tracking granularity: one flag per 2KB page of VRAM
pub const PAGE_GRANULARITY_SHIFT: u32 = 11;
const PAGE_FLAGS: usize = VRAM_SIZE >> PAGE_GRANULARITY_SHIFT as usize;
/// Dirty-tracking granularity for bitmaps: one flag per 128KB region
pub const BITMAP_GRANULARITY_SHIFT: u32 = 17;
const BITMAP_FLAGS: usize = VRAM_SIZE >> BITMAP_GRANULARITY_SHIFT as usize;

/// Events produced while advancing the beam, dispatched by the host
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct VideoEvents {
    /// Entered vertical blanking; the frame's parts lists were rebuilt
    pub vblank_in: bool,
    /// Frame ended, display restarted
    pub vblank_out: bool,
    /// Entered horizontal blanking
    pub hblank_in: bool,
    /// Timer 0 counter reached its compare value this line
    pub timer_0: bool,
}

impl VideoEvents {
    pub fn any(self) -> bool {
        self.vblank_in || self.vblank_out || self.hblank_in || self.timer_0
    }
}

/// The VDP2 background controller
pub struct Vdp2 {
    /// Register file
    pub regs: Vdp2Registers,

    // ========================================
    // Derived status
    // ========================================
    pub tv_screen_status: TvScreenStatus,
    pub ram_status: RamStatus,
    /// Per-screen status, refreshed each VBlank-In
    pub(crate) bg: [ScrollScreenStatus; 6],
    /// Snapshot of the previous frame's status for dirty checking
    pub(crate) saved_bg: [ScrollScreenStatus; 6],

    // ========================================
    // Beam state
    // ========================================
    pub(crate) elapsed_frame_cycles: u32,
    pub(crate) elapsed_line_cycles: u32,
    pub(crate) is_vblank_current: bool,
    pub(crate) is_hblank_current: bool,
    pub(crate) cycles_per_frame: u32,
    pub(crate) cycles_per_vblank: u32,
    pub(crate) cycles_per_vactive: u32,
    pub(crate) cycles_per_line: u32,
    pub(crate) cycles_per_hblank: u32,
    pub(crate) cycles_per_hactive: u32,
    pub(crate) timer_0_counter: u32,
    /// Compare value mirrored from the SCU's timer 0 register
    pub timer_0_compare: u32,

    tv_standard: TvStandard,
    clock: SystemClock,

    // ========================================
    // Memory
    // ========================================
    vram: Vec<u8>,
    cram: Vec<u8>,
    /// Dirty flags written by the memory accessors, cleared each VBlank
    pub(crate) was_cram_accessed: bool,
    pub(crate) was_page_accessed: Vec<bool>,
    pub(crate) was_bitmap_accessed: Vec<bool>,

    // ========================================
    // Render data
    // ========================================
    /// Parts built for the current frame, one list per scroll screen
    pub(crate) vdp2_parts: [Vec<RenderPart>; 6],
    /// Texture cache shared with the compositor; the emulation thread only
    /// inserts and marks, GPU-side work happens on the renderer thread
    texture_cache: Option<Arc<Mutex<TextureCache>>>,

    /// Rotation parameter sets A and B, parsed each frame
    pub rotation_parameters: [rendering::RotationParameters; 2],

    /// Screen selected in the debug UI, if any
    screen_in_debug: Option<ScrollScreen>,

    // FPS bookkeeping, fed by the VBlank cadence
    previous_frame_start: Option<Instant>,
    frame_durations: Vec<f64>,
    fps: Mutex<String>,
}

impl Vdp2 {
    pub fn new() -> Self {
        let mut vdp2 = Vdp2 {
            regs: Vdp2Registers::default(),
            tv_screen_status: TvScreenStatus::default(),
            ram_status: RamStatus::default(),
            bg: Default::default(),
            saved_bg: Default::default(),
            elapsed_frame_cycles: 0,
            elapsed_line_cycles: 0,
            is_vblank_current: false,
            is_hblank_current: false,
            cycles_per_frame: 0,
            cycles_per_vblank: 0,
            cycles_per_vactive: 0,
            cycles_per_line: 0,
            cycles_per_hblank: 0,
            cycles_per_hactive: 0,
            timer_0_counter: 0,
            timer_0_compare: u32::MAX,
            tv_standard: TvStandard::Ntsc,
            clock: SystemClock::new(TvStandard::Ntsc),
            vram: vec![0; VRAM_SIZE],
            cram: vec![0; CRAM_SIZE],
            was_cram_accessed: false,
            was_page_accessed: vec![false; PAGE_FLAGS],
            was_bitmap_accessed: vec![false; BITMAP_FLAGS],
            vdp2_parts: Default::default(),
            rotation_parameters: Default::default(),
            texture_cache: None,
            screen_in_debug: None,
            previous_frame_start: None,
            frame_durations: Vec::with_capacity(32),
            fps: Mutex::new(String::new()),
        };
        vdp2.initialize(TvStandard::Ntsc);
        vdp2
    }

    /// Apply the TV standard and compute the initial display timings
    pub fn initialize(&mut self, standard: TvStandard) {
        use self::registers::tvstat;

        self.tv_standard = standard;
        self.clock = SystemClock::new(standard);
        match standard {
            TvStandard::Pal => self.regs.tvstat |= tvstat::PAL,
            TvStandard::Ntsc => self.regs.tvstat &= !tvstat::PAL,
        }
        self.update_resolution();
        self.calculate_display_duration();
    }

    /// Attach the texture cache shared with the compositor
    pub fn set_texture_cache(&mut self, cache: Arc<Mutex<TextureCache>>) {
        self.texture_cache = Some(cache);
    }

    pub(crate) fn texture_cache(&self) -> Option<&Arc<Mutex<TextureCache>>> {
        self.texture_cache.as_ref()
    }

    // ========================================
    // Beam state machine
    // ========================================

    /// Advance the beam by `cycles` and report what happened
    pub fn run(&mut self, cycles: u8) -> VideoEvents {
        use self::registers::{tvmd, tvstat};

        let mut events = VideoEvents::default();
        let cycles = u32::from(cycles);

        self.elapsed_frame_cycles += cycles;
        if self.elapsed_frame_cycles > self.cycles_per_vactive && !self.is_vblank_current {
            // Entering vertical blanking
            self.is_vblank_current = true;
            self.regs.tvstat |= tvstat::VBLANK;
            self.regs.tvmd &= !tvmd::DISP;

            log::debug!("VBlankIn interrupt request");

            self.on_vblank_in();
            events.vblank_in = true;
        }

        if self.elapsed_frame_cycles > self.cycles_per_frame {
            // End of the frame display (active + vblank)
            self.elapsed_frame_cycles = 0;
            self.is_vblank_current = false;
            self.regs.tvstat &= !tvstat::VBLANK;

            self.elapsed_line_cycles = 0;
            self.is_hblank_current = false;
            self.regs.tvstat &= !tvstat::HBLANK;

            self.regs.tvmd |= tvmd::DISP;

            log::debug!("VBlankOut interrupt request");
            events.vblank_out = true;

            self.timer_0_counter = 0;

            self.calculate_display_duration();
            return events;
        }

        self.elapsed_line_cycles += cycles;
        if self.elapsed_line_cycles > self.cycles_per_hactive && !self.is_hblank_current {
            // Entering horizontal blanking
            self.is_hblank_current = true;
            self.regs.tvstat |= tvstat::HBLANK;
            events.hblank_in = true;

            self.timer_0_counter += 1;
            if self.timer_0_counter == self.timer_0_compare {
                events.timer_0 = true;
            }

            if self.tv_screen_status.interlace_mode == InterlaceMode::NonInterlace {
                self.regs.tvstat |= tvstat::ODD;
            }
        }

        if self.elapsed_line_cycles > self.cycles_per_line {
            // End of line display (active + hblank)
            self.elapsed_line_cycles = 0;
            self.is_hblank_current = false;
            self.regs.tvstat &= !tvstat::HBLANK;
        }

        // Yet to implement: H counter, V counter, timer 1

        events
    }

    /// Recompute frame and line durations from the TV standard and TVMD
    pub(crate) fn calculate_display_duration(&mut self) {
        // A full frame is 262.5 lines for NTSC and 312.5 for PAL; the
        // emulation uses the rounded-up whole frame.
        let (frame_duration, total_lines, line_duration, hblank_duration) =
            match self.tv_standard {
                TvStandard::Pal => (1.0 / 50.0, 313u32, 64e-6, 12e-6),
                TvStandard::Ntsc => (1.0 / 60.0, 263u32, 63.5e-6, 10.9e-6),
            };

        self.cycles_per_frame = self.clock.cycles_per(frame_duration);

        let visible_lines = match (self.regs.tvmd & registers::tvmd::VRESO_MASK)
            >> registers::tvmd::VRESO_SHIFT
        {
            0b00 => 224u32,
            0b01 => 240,
            0b10 => 256,
            _ => {
                log::warn!("Unknown vertical resolution.");
                224
            }
        };
        if self.tv_standard == TvStandard::Ntsc && visible_lines == 256 {
            log::warn!("Unknown NTSC vertical resolution.");
        }

        let vblank_lines = total_lines.saturating_sub(visible_lines);
        self.cycles_per_vblank = vblank_lines * self.cycles_per_frame / total_lines;
        self.cycles_per_vactive = self.cycles_per_frame - self.cycles_per_vblank;

        self.cycles_per_hblank = self.clock.cycles_per(hblank_duration);
        self.cycles_per_hactive = self.clock.cycles_per(line_duration - hblank_duration);
        self.cycles_per_line = self.cycles_per_hactive + self.cycles_per_hblank;
    }

    /// The TV standard change also changes the master clock
    pub fn on_system_clock_update(&mut self, standard: TvStandard) {
        self.initialize(standard);
    }

    pub fn cycles_per_frame(&self) -> u32 {
        self.cycles_per_frame
    }

    pub fn cycles_per_vactive(&self) -> u32 {
        self.cycles_per_vactive
    }

    pub fn cycles_per_line(&self) -> u32 {
        self.cycles_per_line
    }

    /// VBlank-In: refresh statuses and rebuild the frame's parts lists
    pub(crate) fn on_vblank_in(&mut self) {
        self.calculate_fps();
        self.update_resolution();
        self.update_ram_status();
        self.populate_render_data();
        self.reset_cache_state();
    }

    // ========================================
    // Parts accessors
    // ========================================

    /// Parts of a screen filtered by VDP type
    pub fn vdp2_parts_by_type(&self, screen: ScrollScreen, t: VdpType) -> Vec<RenderPart> {
        self.vdp2_parts[screen.index()]
            .iter()
            .filter(|p| p.vdp_type == t)
            .cloned()
            .collect()
    }

    /// Parts of a screen filtered by priority
    pub fn vdp2_parts_by_priority(&self, screen: ScrollScreen, priority: u8) -> Vec<RenderPart> {
        self.vdp2_parts[screen.index()]
            .iter()
            .filter(|p| p.priority == priority)
            .cloned()
            .collect()
    }

    /// A layer is disabled when the last arbitration pass rejected it
    pub fn is_layer_disabled(&self, screen: ScrollScreen) -> bool {
        !self.bg[screen.index()].is_display_enabled
    }

    /// Read-only view of one screen's derived status
    pub fn screen_status(&self, screen: ScrollScreen) -> &ScrollScreenStatus {
        &self.bg[screen.index()]
    }

    pub fn screen_in_debug(&self) -> Option<ScrollScreen> {
        self.screen_in_debug
    }

    pub fn set_screen_in_debug(&mut self, screen: Option<ScrollScreen>) {
        self.screen_in_debug = screen;
    }

    // ========================================
    // Sprite collaborator helpers
    // ========================================

    /// Sprite priority from one of the eight PRISx fields
    pub fn sprite_priority(&self, register_number: u8) -> u8 {
        match register_number {
            0 => (self.regs.prisa & 0b111) as u8,
            1 => ((self.regs.prisa >> 8) & 0b111) as u8,
            2 => (self.regs.prisb & 0b111) as u8,
            3 => ((self.regs.prisb >> 8) & 0b111) as u8,
            4 => (self.regs.prisc & 0b111) as u8,
            5 => ((self.regs.prisc >> 8) & 0b111) as u8,
            6 => (self.regs.prisd & 0b111) as u8,
            7 => ((self.regs.prisd >> 8) & 0b111) as u8,
            _ => {
                log::warn!("Unknown sprite priority.");
                0
            }
        }
    }

    /// Color RAM address offset of the sprite layer (CRAOFB.SPCAOS)
    pub fn sprite_color_offset_address(&self) -> u16 {
        self.color_ram_address_offset(((self.regs.craofb >> 4) & 0b111) as u8)
    }

    /// Color offset of a layer, from CLOFEN/CLOFSL and the COxx registers
    pub fn get_color_offset(&self, layer: VdpLayer) -> ColorOffset {
        let bit = match layer {
            VdpLayer::Nbg0 | VdpLayer::Rbg1 => 0,
            VdpLayer::Nbg1 => 1,
            VdpLayer::Nbg2 => 2,
            VdpLayer::Nbg3 => 3,
            VdpLayer::Rbg0 => 4,
            VdpLayer::Back => 5,
            VdpLayer::Sprite => 6,
            VdpLayer::Undefined => {
                log::warn!("Undefined layer for color offset.");
                return ColorOffset::default();
            }
        };

        if self.regs.clofen & (1 << bit) == 0 {
            return ColorOffset::default();
        }

        let use_offset_b = self.regs.clofsl & (1 << bit) != 0;
        let (r_reg, g_reg, b_reg) = if use_offset_b {
            (self.regs.cobr, self.regs.cobg, self.regs.cobb)
        } else {
            (self.regs.coar, self.regs.coag, self.regs.coab)
        };

        let decode = |reg: u16| -> (bool, u8) {
            let is_positive = reg & 0x100 == 0;
            let value = if is_positive {
                (reg & 0xFF) as u8
            } else {
                // Two's complement magnitude of the 9 bit signed field
                (!(reg as u8)).wrapping_add(1)
            };
            (is_positive, value)
        };

        let (rs, rv) = decode(r_reg);
        let (gs, gv) = decode(g_reg);
        let (bs, bv) = decode(b_reg);
        ColorOffset {
            signs: [rs, gs, bs],
            values: [rv, gv, bv],
        }
    }

    // ========================================
    // VRAM / CRAM access (routed from the system bus)
    // ========================================

    pub fn vram_read8(&self, addr: u32) -> u8 {
        self.vram[(addr & VRAM_MEMORY_MASK) as usize]
    }

    pub fn vram_read16(&self, addr: u32) -> u16 {
        let i = (addr & VRAM_MEMORY_MASK & !1) as usize;
        u16::from_be_bytes([self.vram[i], self.vram[i + 1]])
    }

    pub fn vram_read32(&self, addr: u32) -> u32 {
        let hi = u32::from(self.vram_read16(addr));
        let lo = u32::from(self.vram_read16(addr.wrapping_add(2)));
        (hi << 16) | lo
    }

    pub fn vram_write8(&mut self, addr: u32, data: u8) {
        let masked = addr & VRAM_MEMORY_MASK;
        self.vram[masked as usize] = data;
        self.mark_vram_access(masked);
    }

    pub fn vram_write16(&mut self, addr: u32, data: u16) {
        let masked = addr & VRAM_MEMORY_MASK & !1;
        self.vram[masked as usize..masked as usize + 2].copy_from_slice(&data.to_be_bytes());
        self.mark_vram_access(masked);
    }

    pub fn vram_write32(&mut self, addr: u32, data: u32) {
        self.vram_write16(addr, (data >> 16) as u16);
        self.vram_write16(addr.wrapping_add(2), data as u16);
    }

    pub fn cram_read8(&self, addr: u32) -> u8 {
        self.cram[(addr & CRAM_MEMORY_MASK) as usize]
    }

    pub fn cram_read16(&self, addr: u32) -> u16 {
        let i = (addr & CRAM_MEMORY_MASK & !1) as usize;
        u16::from_be_bytes([self.cram[i], self.cram[i + 1]])
    }

    pub fn cram_read32(&self, addr: u32) -> u32 {
        let hi = u32::from(self.cram_read16(addr));
        let lo = u32::from(self.cram_read16(addr.wrapping_add(2)));
        (hi << 16) | lo
    }

    pub fn cram_write8(&mut self, addr: u32, data: u8) {
        self.cram[(addr & CRAM_MEMORY_MASK) as usize] = data;
        self.was_cram_accessed = true;
    }

    pub fn cram_write16(&mut self, addr: u32, data: u16) {
        let i = (addr & CRAM_MEMORY_MASK & !1) as usize;
        self.cram[i..i + 2].copy_from_slice(&data.to_be_bytes());
        self.was_cram_accessed = true;
    }

    pub fn cram_write32(&mut self, addr: u32, data: u32) {
        self.cram_write16(addr, (data >> 16) as u16);
        self.cram_write16(addr.wrapping_add(2), data as u16);
    }

    // Opaque memory blobs for the save state facility

    pub fn vram_snapshot(&self) -> Vec<u8> {
        self.vram.clone()
    }

    pub fn cram_snapshot(&self) -> Vec<u8> {
        self.cram.clone()
    }

    pub fn restore_vram(&mut self, blob: &[u8]) {
        let len = blob.len().min(VRAM_SIZE);
        self.vram[..len].copy_from_slice(&blob[..len]);
    }

    pub fn restore_cram(&mut self, blob: &[u8]) {
        let len = blob.len().min(CRAM_SIZE);
        self.cram[..len].copy_from_slice(&blob[..len]);
        self.was_cram_accessed = true;
    }

    #[inline]
    fn mark_vram_access(&mut self, masked_addr: u32) {
        self.was_page_accessed[(masked_addr >> PAGE_GRANULARITY_SHIFT) as usize] = true;
        self.was_bitmap_accessed[(masked_addr >> BITMAP_GRANULARITY_SHIFT) as usize] = true;
    }

    // ========================================
    // FPS
    // ========================================

    fn calculate_fps(&mut self) {
        const FRAMES_MAX: usize = 30;

        let now = Instant::now();
        if let Some(previous) = self.previous_frame_start {
            let duration = now.duration_since(previous).as_secs_f64();
            if duration > 0.0 {
                if self.frame_durations.len() >= FRAMES_MAX {
                    self.frame_durations.remove(0);
                }
                self.frame_durations.push(1.0 / duration);
            }

            let max_fps = match self.tv_standard {
                TvStandard::Pal => 50,
                TvStandard::Ntsc => 60,
            };
            let average: f64 =
                self.frame_durations.iter().sum::<f64>() / self.frame_durations.len().max(1) as f64;
            *self.fps.lock().unwrap() = format!("{:.1} / {}", average, max_fps);
        }
        self.previous_frame_start = Some(now);
    }

    pub fn fps(&self) -> String {
        self.fps.lock().unwrap().clone()
    }
}

impl Default for Vdp2 {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a scroll screen to its compositor layer
pub fn scroll_screen_to_layer(screen: ScrollScreen) -> VdpLayer {
    match screen {
        ScrollScreen::Nbg0 => VdpLayer::Nbg0,
        ScrollScreen::Nbg1 => VdpLayer::Nbg1,
        ScrollScreen::Nbg2 => VdpLayer::Nbg2,
        ScrollScreen::Nbg3 => VdpLayer::Nbg3,
        ScrollScreen::Rbg0 => VdpLayer::Rbg0,
        ScrollScreen::Rbg1 => VdpLayer::Rbg1,
    }
}
