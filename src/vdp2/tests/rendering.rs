//! Frame-data build tests
//!
//! Parts emission for bitmap and cell screens, pattern name decoding into
//! texture keys, and the rotation parameter parsing.

use std::sync::{Arc, Mutex};

use super::clear_cycle_patterns;
use crate::compositor::TextureCache;
use crate::display::VdpType;
use crate::vdp2::registers::offsets;
use crate::vdp2::{ScrollScreen, Vdp2};

fn vdp2_with_cache() -> (Vdp2, Arc<Mutex<TextureCache>>) {
    let mut vdp2 = Vdp2::new();
    let cache = Arc::new(Mutex::new(TextureCache::new()));
    vdp2.set_texture_cache(Arc::clone(&cache));
    clear_cycle_patterns(&mut vdp2);
    (vdp2, cache)
}

fn enable_nbg0_bitmap(vdp2: &mut Vdp2) {
    // NBG0 on, bitmap format, 16 colors, 512x256
    vdp2.write16(offsets::BGON, 0x0001);
    vdp2.write16(offsets::CHCTLA, 0x0002);
    vdp2.write16(offsets::CYCA0L, 0x4FFF); // one bitmap read slot
    vdp2.write16(offsets::PRINA, 0x0005);
}

fn enable_nbg0_cell(vdp2: &mut Vdp2) {
    // NBG0 on, cell format, 16 colors
    vdp2.write16(offsets::BGON, 0x0001);
    vdp2.write16(offsets::CHCTLA, 0x0000);
    vdp2.write16(offsets::CYCA0L, 0x04FF); // PND + CPD slots
    vdp2.write16(offsets::PRINA, 0x0003);
}

#[test]
fn test_bitmap_screen_emits_one_part() {
    let (mut vdp2, cache) = vdp2_with_cache();
    enable_nbg0_bitmap(&mut vdp2);

    vdp2.populate_render_data();

    let parts = vdp2.vdp2_parts_by_type(ScrollScreen::Nbg0, VdpType::Vdp2Bitmap);
    assert_eq!(parts.len(), 1, "a bitmap screen is a single part");
    assert_eq!(parts[0].priority, 5, "priority comes from PRINA");
    assert_eq!(parts[0].vertexes.len(), 4);

    // The bitmap was decoded into the texture cache
    let cache = cache.lock().unwrap();
    assert_eq!(cache.len(), 1);
    let texture = cache.get(parts[0].texture_key).expect("texture exists");
    assert_eq!((texture.width, texture.height), (512, 256));
}

#[test]
fn test_cell_screen_emits_one_part_per_cell() {
    let (mut vdp2, _cache) = vdp2_with_cache();
    enable_nbg0_cell(&mut vdp2);

    vdp2.populate_render_data();

    let parts = vdp2.vdp2_parts_by_type(ScrollScreen::Nbg0, VdpType::Vdp2Cell);
    // 2x2 planes of one 64x64 page each
    assert_eq!(parts.len(), 4 * 64 * 64);
    assert!(parts.iter().all(|p| p.priority == 3));

    // All cells reference the same zeroed pattern: one cached texture
    let by_priority = vdp2.vdp2_parts_by_priority(ScrollScreen::Nbg0, 3);
    assert_eq!(by_priority.len(), parts.len());
}

#[test]
fn test_zero_priority_parts_are_never_composited() {
    let (mut vdp2, _cache) = vdp2_with_cache();
    enable_nbg0_cell(&mut vdp2);
    vdp2.write16(offsets::PRINA, 0x0000);

    vdp2.populate_render_data();

    for priority in 1..=7 {
        assert!(
            vdp2.vdp2_parts_by_priority(ScrollScreen::Nbg0, priority).is_empty(),
            "priority 0 parts never land in the 1..7 lists"
        );
    }
}

#[test]
fn test_cell_texture_decodes_palette_dots() {
    let (mut vdp2, cache) = vdp2_with_cache();
    enable_nbg0_cell(&mut vdp2);

    // Character pattern 1 (address 0x20): first two dots are palette
    // entries 1 and 2
    vdp2.vram_write8(0x20, 0x12);
    // Every pattern name entry of plane A's first page points at it; the
    // 2-word PND carries the character number in its low word
    vdp2.vram_write32(0x0, 0x0000_0001);

    // Palette entries 1 and 2 in CRAM (mode 0, 16 bit entries)
    vdp2.cram_write16(2, 0x001F); // red
    vdp2.cram_write16(4, 0x03E0); // green

    vdp2.populate_render_data();

    let parts = vdp2.vdp2_parts_by_type(ScrollScreen::Nbg0, VdpType::Vdp2Cell);
    let keyed = parts
        .iter()
        .find(|p| {
            let cache = cache.lock().unwrap();
            cache
                .get(p.texture_key)
                .map(|t| t.data.iter().any(|&b| b != 0))
                .unwrap_or(false)
        })
        .expect("a cell with decoded pixels exists");

    let cache = cache.lock().unwrap();
    let texture = cache.get(keyed.texture_key).unwrap();
    assert_eq!((texture.width, texture.height), (8, 8));
    assert_eq!(&texture.data[0..4], &[255, 0, 0, 255], "dot 1 is red");
    assert_eq!(&texture.data[4..8], &[0, 255, 0, 255], "dot 2 is green");
    assert_eq!(texture.data[11], 0, "dot 0 is transparent");
}

#[test]
fn test_pattern_flips_swap_texture_coordinates() {
    let (mut vdp2, _cache) = vdp2_with_cache();
    enable_nbg0_cell(&mut vdp2);

    // First PND entry: horizontal flip bit of the 2-word format
    vdp2.vram_write32(0x0, 0x4000_0000);

    vdp2.populate_render_data();

    let parts = vdp2.vdp2_parts_by_type(ScrollScreen::Nbg0, VdpType::Vdp2Cell);
    let first = &parts[0];
    // With the flip, the left edge samples s = 1.0
    assert_eq!(first.vertexes[0].tex_coords.s, 1.0);
    assert_eq!(first.vertexes[1].tex_coords.s, 0.0);
}

#[test]
fn test_scroll_offsets_shift_part_positions() {
    let (mut vdp2, _cache) = vdp2_with_cache();
    enable_nbg0_cell(&mut vdp2);
    vdp2.write16(offsets::SCXIN0, 16);
    vdp2.write16(offsets::SCYIN0, 8);

    vdp2.populate_render_data();

    let parts = vdp2.vdp2_parts_by_type(ScrollScreen::Nbg0, VdpType::Vdp2Cell);
    assert_eq!(parts[0].vertexes[0].position.x, -16);
    assert_eq!(parts[0].vertexes[0].position.y, -8);
}

#[test]
fn test_rotation_parameters_parsed_from_vram() {
    let mut vdp2 = Vdp2::new();

    // Table at VRAM 0x1000: RPTAU/RPTAL hold address bits 18-1
    vdp2.write16(offsets::RPTAU, 0x0000);
    vdp2.write16(offsets::RPTAL, 0x0800);
    vdp2.vram_write32(0x1000, 0x0001_0000); // screen start X
    vdp2.vram_write32(0x1080, 0x0002_0000); // parameter B screen start X

    vdp2.read_rotation_parameter_tables();

    assert_eq!(vdp2.rotation_parameters[0].screen_start_x, 0x0001_0000);
    assert_eq!(vdp2.rotation_parameters[1].screen_start_x, 0x0002_0000);
}
