// VDP2 cache tracking
//
// The texture cache survives across frames; a screen only re-decodes its
// VRAM when something observable changed. The memory accessors set dirty
// flags (palette RAM, per-page and per-bitmap VRAM regions) and the frame
// build compares the screen status against last frame's snapshot.

use super::screen::{ScrollScreen, ScrollScreenFormat};
use super::{Vdp2, BITMAP_GRANULARITY_SHIFT, PAGE_GRANULARITY_SHIFT, VRAM_MEMORY_MASK};
use crate::display::VdpType;

/// Which texture family a screen feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VdpTypeOfScreen {
    Cell,
    Bitmap,
}

impl Vdp2 {
    /// Clear the access flags after a frame build
    pub(crate) fn reset_cache_state(&mut self) {
        self.was_cram_accessed = false;
        for accessed in self.was_page_accessed.iter_mut() {
            *accessed = false;
        }
        for accessed in self.was_bitmap_accessed.iter_mut() {
            *accessed = false;
        }
    }

    /// Did anything observable change for this screen since last frame?
    pub(crate) fn is_cache_dirty(&self, screen: ScrollScreen) -> bool {
        if self.was_cram_accessed {
            return true;
        }

        let bg = &self.bg[screen.index()];
        let saved_bg = &self.saved_bg[screen.index()];

        if bg.is_display_enabled != saved_bg.is_display_enabled {
            return true;
        }
        if bg.is_transparency_code_valid != saved_bg.is_transparency_code_valid {
            return true;
        }
        if bg.character_color_number != saved_bg.character_color_number {
            return true;
        }
        if bg.bitmap_size != saved_bg.bitmap_size {
            return true;
        }
        if bg.format != saved_bg.format {
            return true;
        }
        if bg.character_pattern_size != saved_bg.character_pattern_size {
            return true;
        }
        if bg.pattern_name_data_size != saved_bg.pattern_name_data_size {
            return true;
        }
        if bg.plane_dimension != saved_bg.plane_dimension {
            return true;
        }
        if bg.map_offset != saved_bg.map_offset {
            return true;
        }
        if bg.bitmap_palette_number != saved_bg.bitmap_palette_number {
            return true;
        }

        if bg.format == ScrollScreenFormat::Cell {
            // Check the pages holding this screen's pattern name data
            let page_start =
                (bg.plane_start_addresses[0] & VRAM_MEMORY_MASK) >> PAGE_GRANULARITY_SHIFT;
            let page_end = ((bg.plane_start_addresses[0] + bg.page_size) & VRAM_MEMORY_MASK)
                >> PAGE_GRANULARITY_SHIFT;
            for page in page_start..page_end {
                if self.was_page_accessed[page as usize] {
                    return true;
                }
            }
        } else {
            let bitmap_index =
                (bg.bitmap_start_address & VRAM_MEMORY_MASK) >> BITMAP_GRANULARITY_SHIFT;
            if self.was_bitmap_accessed[bitmap_index as usize] {
                return true;
            }
        }
        false
    }

    /// Mark this screen's textures stale
    ///
    /// The emulation thread only marks; the renderer thread deletes the
    /// entries on its next pass.
    pub(crate) fn discard_cache(&mut self, screen: ScrollScreen) {
        let vdp_type = match self.vdp_type_of_screen(screen) {
            VdpTypeOfScreen::Cell => VdpType::Vdp2Cell,
            VdpTypeOfScreen::Bitmap => VdpType::Vdp2Bitmap,
        };
        self.with_texture_cache(|cache| cache.discard_by_type(vdp_type));
    }
}
