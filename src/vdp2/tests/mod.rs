//! VDP2 Tests
//!
//! Unit tests for the background controller: register access, the beam
//! state machine, the VRAM cycle-pattern arbitration, the frame-data build
//! and the dirty tracking.

mod registers;
mod rendering;

use super::{Vdp2, VideoEvents};

/// Advance the beam by more cycles than one call can carry, accumulating
/// the events seen along the way
pub(crate) fn run_cycles(vdp2: &mut Vdp2, mut cycles: u32) -> VideoEvents {
    let mut seen = VideoEvents::default();
    while cycles > 0 {
        let chunk = cycles.min(200) as u8;
        let events = vdp2.run(chunk);
        seen.vblank_in |= events.vblank_in;
        seen.vblank_out |= events.vblank_out;
        seen.hblank_in |= events.hblank_in;
        seen.timer_0 |= events.timer_0;
        cycles -= u32::from(chunk);
    }
    seen
}

/// Park every timing slot of every bank on "no access"
pub(crate) fn clear_cycle_patterns(vdp2: &mut Vdp2) {
    use super::registers::offsets::*;
    for offset in [CYCA0L, CYCA0U, CYCA1L, CYCA1U, CYCB0L, CYCB0U, CYCB1L, CYCB1U] {
        vdp2.write16(offset, 0xFFFF);
    }
}
