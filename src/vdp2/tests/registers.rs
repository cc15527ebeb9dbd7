//! VDP2 register access tests

use crate::vdp2::registers::offsets;
use crate::vdp2::screen::{ScreenMode, ScreenModeType};
use crate::vdp2::Vdp2;

#[test]
fn test_write16_read16_round_trip() {
    let mut vdp2 = Vdp2::new();

    let samples = [
        (offsets::BGON, 0x001Fu16),
        (offsets::CHCTLA, 0x3210),
        (offsets::PRINA, 0x0702),
        (offsets::SCXIN0, 0x07FF),
        (offsets::COAR, 0x01FF),
        (offsets::CCRLB, 0x1F1F),
    ];

    for (offset, value) in samples {
        vdp2.write16(offset, value);
        assert_eq!(
            vdp2.read16(offset),
            value,
            "register {:#05x} must read back what was written",
            offset
        );
    }
}

#[test]
fn test_byte_writes_hit_register_halves() {
    let mut vdp2 = Vdp2::new();

    vdp2.write8(offsets::BGON, 0x12);
    vdp2.write8(offsets::BGON + 1, 0x34);
    assert_eq!(vdp2.read16(offsets::BGON), 0x1234);

    assert_eq!(vdp2.read8(offsets::BGON), 0x12, "high byte");
    assert_eq!(vdp2.read8(offsets::BGON + 1), 0x34, "low byte");
}

#[test]
fn test_32bit_access_covers_adjacent_registers() {
    let mut vdp2 = Vdp2::new();

    vdp2.write32(offsets::CYCA0L, 0x0123_4567);
    assert_eq!(vdp2.read16(offsets::CYCA0L), 0x0123);
    assert_eq!(vdp2.read16(offsets::CYCA0U), 0x4567);
    assert_eq!(vdp2.read32(offsets::CYCA0L), 0x0123_4567);
}

#[test]
fn test_window_mirroring() {
    let mut vdp2 = Vdp2::new();

    // The 512 byte window repeats across the register area
    vdp2.write16(offsets::BGON + 0x200, 0x002F);
    assert_eq!(vdp2.read16(offsets::BGON), 0x002F);
}

#[test]
fn test_unmapped_register_read_returns_zero() {
    let vdp2 = Vdp2::new();
    // Odd offsets between registers resolve to their 16 bit home; the
    // highest window addresses past COBB are unmapped
    assert_eq!(vdp2.read16(0x1FE), 0);
}

#[test]
fn test_tvmd_write_updates_screen_mode() {
    let mut vdp2 = Vdp2::new();

    // 320 horizontal, 224 vertical, non-interlace
    vdp2.write16(offsets::TVMD, 0x0000);
    assert_eq!(vdp2.tv_screen_status.screen_mode, ScreenMode::Normal320x224);
    assert_eq!(vdp2.tv_screen_status.horizontal_res, 320);
    assert_eq!(vdp2.tv_screen_status.vertical_res, 224);

    // 704 horizontal is a hi-res mode
    vdp2.write16(offsets::TVMD, 0x0003);
    assert_eq!(vdp2.tv_screen_status.screen_mode_type, ScreenModeType::HiRes);
    assert_eq!(vdp2.tv_screen_status.horizontal_res, 704);

    // 704 with VReso = 256 and single-density interlace reaches 704x512
    vdp2.write16(offsets::TVMD, 0x0003 | (0b10 << 4) | (0b10 << 6));
    assert_eq!(vdp2.tv_screen_status.screen_mode, ScreenMode::HiRes704x512);
    assert_eq!(vdp2.tv_screen_status.vertical_res, 512);
}

#[test]
fn test_sprite_priority_fields() {
    let mut vdp2 = Vdp2::new();

    vdp2.write16(offsets::PRISA, 0x0502); // S0 = 2, S1 = 5
    vdp2.write16(offsets::PRISD, 0x0701); // S6 = 1, S7 = 7

    assert_eq!(vdp2.sprite_priority(0), 2);
    assert_eq!(vdp2.sprite_priority(1), 5);
    assert_eq!(vdp2.sprite_priority(6), 1);
    assert_eq!(vdp2.sprite_priority(7), 7);
    assert_eq!(vdp2.sprite_priority(8), 0, "unknown register logs and returns 0");
}

#[test]
fn test_color_offset_decode() {
    use crate::display::VdpLayer;
    use crate::vdp2::Vdp2;

    let mut vdp2 = Vdp2::new();

    // Offset disabled: neutral offset
    let offset = vdp2.get_color_offset(VdpLayer::Nbg0);
    assert_eq!(offset.values, [0, 0, 0]);

    // Enable offset A for NBG0, +16 red, -16 green (9 bit two's complement)
    vdp2.write16(offsets::CLOFEN, 0x0001);
    vdp2.write16(offsets::CLOFSL, 0x0000);
    vdp2.write16(offsets::COAR, 0x0010);
    vdp2.write16(offsets::COAG, 0x1F0); // -16
    vdp2.write16(offsets::COAB, 0x0000);

    let offset = vdp2.get_color_offset(VdpLayer::Nbg0);
    assert!(offset.signs[0]);
    assert_eq!(offset.values[0], 16);
    assert!(!offset.signs[1], "bit 8 set means negative");
    assert_eq!(offset.values[1], 16, "two's complement magnitude");

    // The same layer switched to offset B
    vdp2.write16(offsets::CLOFSL, 0x0001);
    vdp2.write16(offsets::COBR, 0x0020);
    let offset = vdp2.get_color_offset(VdpLayer::Nbg0);
    assert_eq!(offset.values[0], 32);
}

#[test]
fn test_color_ram_address_offset_by_mode() {
    let mut vdp2 = Vdp2::new();

    // Mode 0: 2 byte entries, 2 bit field
    vdp2.write16(offsets::RAMCTL, 0x0000);
    vdp2.update_ram_status();
    assert_eq!(vdp2.color_ram_address_offset(1), 0x200);
    assert_eq!(vdp2.color_ram_address_offset(7), 0x600, "field masked to 2 bits");

    // Mode 1 widens the field to 3 bits
    vdp2.write16(offsets::RAMCTL, 0x1000);
    vdp2.update_ram_status();
    assert_eq!(vdp2.color_ram_address_offset(7), 0xE00);

    // Mode 2: 4 byte entries
    vdp2.write16(offsets::RAMCTL, 0x2000);
    vdp2.update_ram_status();
    assert_eq!(vdp2.color_ram_address_offset(1), 0x400);
}

#[test]
fn test_vram_dirty_flags_set_by_writes() {
    let mut vdp2 = Vdp2::new();

    vdp2.vram_write16(0x0000_1000, 0x1234);
    assert_eq!(vdp2.vram_read16(0x0000_1000), 0x1234);
    assert!(vdp2.was_page_accessed[(0x1000 >> crate::vdp2::PAGE_GRANULARITY_SHIFT) as usize]);

    vdp2.cram_write16(0x10, 0x7FFF);
    assert!(vdp2.was_cram_accessed);
    assert_eq!(vdp2.cram_read16(0x10), 0x7FFF);
}
