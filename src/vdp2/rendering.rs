// VDP2 frame-data build
//
// Runs once per frame on VBlank-In. For each scroll screen that survives
// the arbitration check, the build walks planes, pages and cells (or the
// single bitmap), decodes pattern name data, makes sure the referenced
// character pattern is present in the texture cache and emits one textured
// quad per cell. Rotation parameter tables are parsed every frame even when
// the rotation screens are off; the reads are harmless.

use super::cache::VdpTypeOfScreen;
use super::screen::{
    CharacterSize, ColorRamMode, PatternNameDataSize, ScrollScreen, ScrollScreenFormat,
    ScrollScreenStatus,
};
use super::Vdp2;
use crate::compositor::{Texture, TextureCache};
use crate::display::{rgb555_to_rgba, rgb888_to_rgba, RenderPart, VdpType};

/// Pixel side of one cell
const CELL_PX: u32 = 8;
/// Pixel side of one page (64 one-cell patterns or 32 two-cell patterns)
const PAGE_PX: u32 = 512;

/// Decoded pattern name data for one character pattern
#[derive(Debug, Clone, Copy, Default)]
struct PatternNameData {
    character_number: u32,
    palette_number: u16,
    horizontal_flip: bool,
    vertical_flip: bool,
}

/// One rotation parameter set, parsed from VRAM as raw fixed-point values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RotationParameters {
    pub screen_start_x: i32,
    pub screen_start_y: i32,
    pub screen_start_z: i32,
    pub screen_delta_x: i32,
    pub screen_delta_y: i32,
    pub matrix: [i32; 6],
    pub viewpoint_x: i32,
    pub viewpoint_y: i32,
    pub viewpoint_z: i32,
    pub center_x: i32,
    pub center_y: i32,
    pub center_z: i32,
    pub amount_x: i32,
    pub amount_y: i32,
    pub scaling_x: i32,
    pub scaling_y: i32,
    pub coefficient_table_start: i32,
    pub coefficient_table_vertical_delta: i32,
    pub coefficient_table_horizontal_delta: i32,
}

impl Vdp2 {
    /// Build the frame's parts lists
    pub(crate) fn populate_render_data(&mut self) {
        self.read_rotation_parameter_tables();

        for screen in ScrollScreen::ALL {
            if self.is_cache_dirty(screen) {
                self.discard_cache(screen);
            }

            self.update_scroll_screen_status(screen);

            self.vdp2_parts[screen.index()].clear();
            if !self.is_screen_displayed(screen) {
                // Arbitration failed; no VRAM access happens for the screen
                continue;
            }

            let status = self.bg[screen.index()].clone();
            match status.format {
                ScrollScreenFormat::Bitmap => self.add_bitmap_part(screen, &status),
                ScrollScreenFormat::Cell => self.add_cell_parts(screen, &status),
            }

            self.saved_bg[screen.index()] = self.bg[screen.index()].clone();
        }
    }

    // ========================================
    // Bitmap screens
    // ========================================

    fn add_bitmap_part(&mut self, screen: ScrollScreen, status: &ScrollScreenStatus) {
        let (width, height) = status.bitmap_size.dimensions();
        let key = Texture::calculate_key(
            VdpType::Vdp2Bitmap,
            status.bitmap_start_address,
            status.character_color_number.bits_per_dot(),
            u16::from(status.bitmap_palette_number),
        );

        if let Some(cache) = self.texture_cache() {
            let cache = cache.clone();
            let mut cache = cache.lock().unwrap();
            if !cache.contains(key) {
                let data = self.decode_bitmap(status, width, height);
                cache.add_or_update_texture(Texture::new(
                    key,
                    VdpType::Vdp2Bitmap,
                    width,
                    height,
                    data,
                ));
            }
        }

        let part = RenderPart::textured_quad(
            -(status.scroll_offset_x as i16),
            -(status.scroll_offset_y as i16),
            width as i16,
            height as i16,
            VdpType::Vdp2Bitmap,
            status.priority,
            key,
            status.color_offset,
        );
        self.vdp2_parts[screen.index()].push(part);
    }

    fn decode_bitmap(&self, status: &ScrollScreenStatus, width: u32, height: u32) -> Vec<u8> {
        let mut data = vec![0u8; (width * height * 4) as usize];
        let base = status.bitmap_start_address;
        // The bitmap palette field supplies palette bits 6-4
        let palette = u16::from(status.bitmap_palette_number) << 4;

        for dot_index in 0..(width * height) {
            let rgba = self.decode_dot(status, base, dot_index, palette);
            let out = (dot_index * 4) as usize;
            data[out..out + 4].copy_from_slice(&rgba);
        }
        data
    }

    // ========================================
    // Cell screens
    // ========================================

    fn add_cell_parts(&mut self, screen: ScrollScreen, status: &ScrollScreenStatus) {
        let plane_count = (status.map_dimension * status.map_dimension) as usize;
        let pattern_px = match status.character_pattern_size {
            CharacterSize::OneByOne => CELL_PX,
            CharacterSize::TwoByTwo => CELL_PX * 2,
        };
        let pnd_bytes = match status.pattern_name_data_size {
            PatternNameDataSize::OneWord => 2u32,
            PatternNameDataSize::TwoWords => 4,
        };

        let plane_px_w = status.plane_dimension.0 * PAGE_PX;
        let plane_px_h = status.plane_dimension.1 * PAGE_PX;

        for plane in 0..plane_count {
            let plane_base_x = (plane as u32 % status.map_dimension) * plane_px_w;
            let plane_base_y = (plane as u32 / status.map_dimension) * plane_px_h;
            let plane_address = status.plane_start_addresses[plane];

            for page_row in 0..status.plane_dimension.1 {
                for page_col in 0..status.plane_dimension.0 {
                    let page_address = plane_address
                        + (page_row * status.plane_dimension.0 + page_col) * status.page_size;
                    let page_base_x = plane_base_x + page_col * PAGE_PX;
                    let page_base_y = plane_base_y + page_row * PAGE_PX;

                    self.add_page_parts(
                        screen,
                        status,
                        page_address,
                        page_base_x,
                        page_base_y,
                        pattern_px,
                        pnd_bytes,
                    );
                }
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn add_page_parts(
        &mut self,
        screen: ScrollScreen,
        status: &ScrollScreenStatus,
        page_address: u32,
        page_base_x: u32,
        page_base_y: u32,
        pattern_px: u32,
        pnd_bytes: u32,
    ) {
        let side = status.cells_per_page_side;

        for cell_row in 0..side {
            for cell_col in 0..side {
                let pnd_address =
                    page_address + (cell_row * side + cell_col) * pnd_bytes;
                let pnd = self.decode_pattern_name_data(status, pnd_address);

                let key = self.ensure_character_texture(status, &pnd, pattern_px);

                let x = (page_base_x + cell_col * pattern_px) as i32
                    - status.scroll_offset_x as i32;
                let y = (page_base_y + cell_row * pattern_px) as i32
                    - status.scroll_offset_y as i32;

                let mut part = RenderPart::textured_quad(
                    x as i16,
                    y as i16,
                    pattern_px as i16,
                    pattern_px as i16,
                    VdpType::Vdp2Cell,
                    status.priority,
                    key,
                    status.color_offset,
                );

                // Flips swap the texture coordinates instead of the pixels
                if pnd.horizontal_flip {
                    for vertex in part.vertexes.iter_mut() {
                        vertex.tex_coords.s = 1.0 - vertex.tex_coords.s;
                    }
                }
                if pnd.vertical_flip {
                    for vertex in part.vertexes.iter_mut() {
                        vertex.tex_coords.t = 1.0 - vertex.tex_coords.t;
                    }
                }

                self.vdp2_parts[screen.index()].push(part);
            }
        }
    }

    /// Decode one pattern name data entry
    fn decode_pattern_name_data(
        &self,
        status: &ScrollScreenStatus,
        address: u32,
    ) -> PatternNameData {
        match status.pattern_name_data_size {
            PatternNameDataSize::TwoWords => {
                let raw = self.vram_read32(address);
                PatternNameData {
                    character_number: raw & 0x7FFF,
                    palette_number: ((raw >> 16) & 0x7F) as u16,
                    horizontal_flip: raw & 0x4000_0000 != 0,
                    vertical_flip: raw & 0x8000_0000 != 0,
                }
            }
            PatternNameDataSize::OneWord => {
                let raw = u32::from(self.vram_read16(address));
                let scn = u32::from(status.supplementary_character_number);
                let splt = u16::from(status.supplementary_palette_number);

                let (character_number, flips_available) = match (
                    status.character_pattern_size,
                    status.character_number_supplement_mode,
                ) {
                    (CharacterSize::OneByOne, false) => {
                        (((scn & 0x1F) << 10) | (raw & 0x3FF), true)
                    }
                    (CharacterSize::OneByOne, true) => {
                        ((((scn >> 2) & 0b111) << 12) | (raw & 0xFFF), false)
                    }
                    (CharacterSize::TwoByTwo, false) => (
                        (((scn >> 2) & 0b111) << 12) | ((raw & 0x3FF) << 2) | (scn & 0b11),
                        true,
                    ),
                    (CharacterSize::TwoByTwo, true) => (
                        (((scn >> 2) & 0b111) << 12) | ((raw & 0xFFF) << 2) | (scn & 0b11),
                        false,
                    ),
                };

                PatternNameData {
                    character_number,
                    palette_number: (splt << 4) | ((raw >> 12) & 0xF) as u16,
                    horizontal_flip: flips_available && raw & 0x0400 != 0,
                    vertical_flip: flips_available && raw & 0x0800 != 0,
                }
            }
        }
    }

    /// Decode the character pattern into the texture cache when missing
    fn ensure_character_texture(
        &self,
        status: &ScrollScreenStatus,
        pnd: &PatternNameData,
        pattern_px: u32,
    ) -> u64 {
        // Character numbers address VRAM in 0x20 byte units
        let cpd_address = (pnd.character_number * 0x20) & super::VRAM_MEMORY_MASK;
        let key = Texture::calculate_key(
            VdpType::Vdp2Cell,
            cpd_address,
            status.character_color_number.bits_per_dot(),
            pnd.palette_number,
        );

        let Some(cache) = self.texture_cache() else {
            return key;
        };
        let mut cache = cache.lock().unwrap();
        if cache.contains(key) {
            return key;
        }

        let data = self.decode_character_pattern(status, cpd_address, pnd.palette_number, pattern_px);
        cache.add_or_update_texture(Texture::new(
            key,
            VdpType::Vdp2Cell,
            pattern_px,
            pattern_px,
            data,
        ));
        key
    }

    /// Decode an 8x8 or 16x16 character pattern to RGBA
    ///
    /// A 2x2 pattern is stored as four consecutive cells in reading order
    /// (top-left, top-right, bottom-left, bottom-right).
    fn decode_character_pattern(
        &self,
        status: &ScrollScreenStatus,
        cpd_address: u32,
        palette: u16,
        pattern_px: u32,
    ) -> Vec<u8> {
        let mut data = vec![0u8; (pattern_px * pattern_px * 4) as usize];
        let bits_per_dot = status.character_color_number.bits_per_dot();
        let cell_bytes = CELL_PX * CELL_PX * bits_per_dot / 8;
        let cells_per_side = pattern_px / CELL_PX;

        for cell_index in 0..(cells_per_side * cells_per_side) {
            let cell_base = cpd_address + cell_index * cell_bytes;
            let cell_origin_x = (cell_index % cells_per_side) * CELL_PX;
            let cell_origin_y = (cell_index / cells_per_side) * CELL_PX;

            for dot in 0..(CELL_PX * CELL_PX) {
                let rgba = self.decode_dot(status, cell_base, dot, palette);
                let x = cell_origin_x + dot % CELL_PX;
                let y = cell_origin_y + dot / CELL_PX;
                let out = ((y * pattern_px + x) * 4) as usize;
                data[out..out + 4].copy_from_slice(&rgba);
            }
        }
        data
    }

    /// Decode one dot of character or bitmap pattern data
    fn decode_dot(
        &self,
        status: &ScrollScreenStatus,
        base_address: u32,
        dot_index: u32,
        palette: u16,
    ) -> [u8; 4] {
        use super::screen::CharacterColorCount::*;

        let transparency = status.is_transparency_code_valid;
        match status.character_color_number {
            Palette16 => {
                let byte = self.vram_read8(base_address + dot_index / 2);
                let dot = if dot_index % 2 == 0 { byte >> 4 } else { byte & 0xF };
                if dot == 0 && transparency {
                    return [0; 4];
                }
                self.cram_color(status, u32::from(palette) * 16 + u32::from(dot), transparency)
            }
            Palette256 => {
                let dot = self.vram_read8(base_address + dot_index);
                if dot == 0 && transparency {
                    return [0; 4];
                }
                // Palette bits 6-4 select one of eight 256-color banks
                let bank = (u32::from(palette) >> 4) & 0b111;
                self.cram_color(status, bank * 256 + u32::from(dot), transparency)
            }
            Palette2048 => {
                let dot = self.vram_read16(base_address + dot_index * 2) & 0x7FF;
                if dot == 0 && transparency {
                    return [0; 4];
                }
                self.cram_color(status, u32::from(dot), transparency)
            }
            Rgb32k => {
                let dot = self.vram_read16(base_address + dot_index * 2);
                rgb555_to_rgba(dot & 0x7FFF, transparency)
            }
            Rgb16m => {
                let dot = self.vram_read32(base_address + dot_index * 4);
                rgb888_to_rgba(dot, transparency)
            }
            NotAllowed => {
                log::warn!("VDP2 character color count setting not allowed");
                [0; 4]
            }
        }
    }

    /// Look a palette entry up in color RAM
    ///
    /// Entries are 2 bytes wide in modes 0/1 and 4 bytes wide in mode 2;
    /// the screen's color RAM address offset is applied first.
    fn cram_color(
        &self,
        status: &ScrollScreenStatus,
        entry_index: u32,
        transparency: bool,
    ) -> [u8; 4] {
        let offset = u32::from(status.color_ram_address_offset);
        match self.ram_status.color_ram_mode {
            ColorRamMode::Mode0Rgb5Bits1024Colors | ColorRamMode::Mode1Rgb5Bits2048Colors => {
                let color = self.cram_read16(offset + entry_index * 2);
                rgb555_to_rgba(color & 0x7FFF, transparency)
            }
            ColorRamMode::Mode2Rgb8Bits1024Colors => {
                let color = self.cram_read32(offset + entry_index * 4);
                rgb888_to_rgba(color, transparency)
            }
            ColorRamMode::Setting3NotAllowed => {
                log::warn!("VDP2 color RAM mode setting not allowed");
                [0; 4]
            }
        }
    }

    // ========================================
    // Rotation parameters
    // ========================================

    /// Parse both rotation parameter sets from the table address registers
    pub(crate) fn read_rotation_parameter_tables(&mut self) {
        // Table address bits 18-1 come from RPTAU (upper 3 bits) and RPTAL
        let table_address = ((u32::from(self.regs.rptau & 0b111) << 16)
            | u32::from(self.regs.rptal))
            << 1;

        self.rotation_parameters[0] = self.read_rotation_parameters(table_address);
        self.rotation_parameters[1] = self.read_rotation_parameters(table_address + 0x80);
    }

    fn read_rotation_parameters(&self, base: u32) -> RotationParameters {
        let long = |offset: u32| self.vram_read32(base + offset) as i32;
        RotationParameters {
            screen_start_x: long(0x00),
            screen_start_y: long(0x04),
            screen_start_z: long(0x08),
            screen_delta_x: long(0x0C),
            screen_delta_y: long(0x10),
            matrix: [
                long(0x14),
                long(0x18),
                long(0x1C),
                long(0x20),
                long(0x24),
                long(0x28),
            ],
            viewpoint_x: i32::from(self.vram_read16(base + 0x2C) as i16),
            viewpoint_y: i32::from(self.vram_read16(base + 0x2E) as i16),
            viewpoint_z: i32::from(self.vram_read16(base + 0x30) as i16),
            center_x: i32::from(self.vram_read16(base + 0x34) as i16),
            center_y: i32::from(self.vram_read16(base + 0x36) as i16),
            center_z: i32::from(self.vram_read16(base + 0x38) as i16),
            amount_x: long(0x3C),
            amount_y: long(0x40),
            scaling_x: long(0x44),
            scaling_y: long(0x48),
            coefficient_table_start: long(0x4C),
            coefficient_table_vertical_delta: long(0x50),
            coefficient_table_horizontal_delta: long(0x54),
        }
    }

    /// VDP type of a screen's parts, used when invalidating its textures
    pub(crate) fn vdp_type_of_screen(&self, screen: ScrollScreen) -> VdpTypeOfScreen {
        if self.bg[screen.index()].format == ScrollScreenFormat::Bitmap {
            VdpTypeOfScreen::Bitmap
        } else {
            VdpTypeOfScreen::Cell
        }
    }

    /// Direct cache handle accessor used by the frame build
    pub(crate) fn with_texture_cache<R>(
        &self,
        f: impl FnOnce(&mut TextureCache) -> R,
    ) -> Option<R> {
        self.texture_cache().map(|cache| {
            let mut guard = cache.lock().unwrap();
            f(&mut guard)
        })
    }
}
