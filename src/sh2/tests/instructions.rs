//! Instruction semantics tests
//!
//! Bit-exact checks of the easy-to-get-wrong instructions: sign extension,
//! PC-relative bases, the step divider, the multiply-accumulate saturation
//! and the carry chains, plus the round-trip laws they must obey.

use super::*;
use crate::sh2::flags;

// ========================================
// Baseline behavior
// ========================================

#[test]
fn test_nop_changes_nothing_but_pc_and_cycles() {
    let (mut sh2, mut bus) = test_sh2();
    bus.load_program(PROGRAM_BASE, &[0x0009]); // NOP

    let r_before = sh2.r;
    let sr_before = sh2.sr;
    let cycles = sh2.step(&mut bus);

    assert_eq!(cycles, 1, "NOP costs one cycle");
    assert_eq!(sh2.pc, PROGRAM_BASE + 2, "NOP advances PC by 2");
    assert_eq!(sh2.r, r_before, "NOP must not touch the registers");
    assert_eq!(sh2.sr, sr_before, "NOP must not touch SR");
    assert_eq!(sh2.mach, 0);
    assert_eq!(sh2.macl, 0);
}

#[test]
fn test_pc_stays_even_and_cycles_at_least_one() {
    let (mut sh2, mut bus) = test_sh2();
    // A mix of instruction shapes
    bus.load_program(
        PROGRAM_BASE,
        &[0xE07F, 0x7001, 0x4000, 0x6013, 0x2008, 0x0009],
    );

    for _ in 0..6 {
        let cycles = sh2.step(&mut bus);
        assert_eq!(sh2.pc % 2, 0, "PC must stay even");
        assert!(cycles >= 1, "every instruction costs at least one cycle");
        assert_eq!(sh2.sr & !flags::SR_MASK, 0, "SR outside the mask stays clear");
    }
}

// ========================================
// Sign extension
// ========================================

#[test]
fn test_mov_immediate_sign_extends() {
    let (mut sh2, mut bus) = test_sh2();
    bus.load_program(PROGRAM_BASE, &[0xE17F, 0xE280]); // MOV #0x7F,R1 ; MOV #0x80,R2

    sh2.step(&mut bus);
    assert_eq!(sh2.r[1], 0x0000_007F);

    sh2.step(&mut bus);
    assert_eq!(sh2.r[2], 0xFFFF_FF80, "negative immediate sign extends");
}

#[test]
fn test_add_immediate_sign_extends() {
    let (mut sh2, mut bus) = test_sh2();
    sh2.r[3] = 0x10;
    bus.load_program(PROGRAM_BASE, &[0x73FF]); // ADD #-1,R3

    sh2.step(&mut bus);
    assert_eq!(sh2.r[3], 0x0F);
}

#[test]
fn test_exts_extu() {
    let (mut sh2, mut bus) = test_sh2();
    sh2.r[1] = 0x0000_00FF;
    sh2.r[2] = 0x0000_8000;
    bus.load_program(
        PROGRAM_BASE,
        &[0x631E, 0x642F, 0x651C, 0x662D], // EXTS.B R1,R3 ; EXTS.W R2,R4 ; EXTU.B R1,R5 ; EXTU.W R2,R6
    );

    sh2.step(&mut bus);
    assert_eq!(sh2.r[3], 0xFFFF_FFFF, "EXTS.B replicates bit 7");
    sh2.step(&mut bus);
    assert_eq!(sh2.r[4], 0xFFFF_8000, "EXTS.W replicates bit 15");
    sh2.step(&mut bus);
    assert_eq!(sh2.r[5], 0x0000_00FF);
    sh2.step(&mut bus);
    assert_eq!(sh2.r[6], 0x0000_8000);
}

// ========================================
// PC-relative loads
// ========================================

#[test]
fn test_mov_l_pc_relative_base_is_masked() {
    let (mut sh2, mut bus) = test_sh2();
    // Put the instruction at a PC where & ~3 matters
    sh2.pc = PROGRAM_BASE + 2;
    bus.write16(PROGRAM_BASE + 2, 0xD102); // MOV.L @(2,PC),R1
    // Operand at (PC & ~3) + disp*4 + 4 = 0x06000000 + 8 + 4
    bus.write32(PROGRAM_BASE + 12, 0xCAFE_BABE);

    sh2.step(&mut bus);
    assert_eq!(sh2.r[1], 0xCAFE_BABE);
}

#[test]
fn test_mov_w_pc_relative_base_is_not_masked() {
    let (mut sh2, mut bus) = test_sh2();
    bus.load_program(PROGRAM_BASE, &[0x9103]); // MOV.W @(3,PC),R1
    // Operand at PC + disp*2 + 4
    bus.write16(PROGRAM_BASE + 10, 0x8000);

    sh2.step(&mut bus);
    assert_eq!(sh2.r[1], 0xFFFF_8000, "word operand sign extends");
}

#[test]
fn test_mova() {
    let (mut sh2, mut bus) = test_sh2();
    sh2.pc = PROGRAM_BASE + 2;
    bus.write16(PROGRAM_BASE + 2, 0xC702); // MOVA @(2,PC),R0

    sh2.step(&mut bus);
    assert_eq!(sh2.r[0], PROGRAM_BASE + 12, "base is (PC & ~3) + 4");
}

// ========================================
// Step divider
// ========================================

#[test]
fn test_div1_single_pass() {
    // Rn = 1, Rm = 2, T=Q=M=0
    let (mut sh2, mut bus) = test_sh2();
    sh2.r[1] = 0x0000_0001;
    sh2.r[2] = 0x0000_0002;
    bus.load_program(PROGRAM_BASE, &[0x3124]); // DIV1 R2,R1

    let cycles = sh2.step(&mut bus);

    assert_eq!(sh2.r[1], 0x0000_0000, "1<<1 then minus 2 is 0");
    assert!(!sh2.sr_flag(flags::Q), "Q must end clear");
    assert!(sh2.sr_flag(flags::T), "T = (M == Q)");
    assert_eq!(sh2.pc, PROGRAM_BASE + 2);
    assert_eq!(cycles, 1);
}

#[test]
fn test_div0u_clears_divider_state() {
    let (mut sh2, mut bus) = test_sh2();
    sh2.sr |= flags::T | flags::Q | flags::M;
    bus.load_program(PROGRAM_BASE, &[0x0019]); // DIV0U

    sh2.step(&mut bus);
    assert!(!sh2.sr_flag(flags::T));
    assert!(!sh2.sr_flag(flags::Q));
    assert!(!sh2.sr_flag(flags::M));
}

#[test]
fn test_div0s_latches_sign_bits() {
    let (mut sh2, mut bus) = test_sh2();
    sh2.r[1] = 0x8000_0000; // Rn negative
    sh2.r[2] = 0x0000_0001; // Rm positive
    bus.load_program(PROGRAM_BASE, &[0x2127]); // DIV0S R2,R1

    sh2.step(&mut bus);
    assert!(sh2.sr_flag(flags::Q));
    assert!(!sh2.sr_flag(flags::M));
    assert!(sh2.sr_flag(flags::T), "T = M ^ Q");
}

#[test]
fn test_full_unsigned_division_sequence() {
    // 19 / 5 through DIV0U + 32 x (ROTCL; DIV1), the standard idiom run
    // manually over the register file
    let (mut sh2, mut bus) = test_sh2();
    let dividend = 19u32;
    let divisor = 5u32;

    sh2.r[1] = 0; // high part
    sh2.r[2] = divisor;
    sh2.r[3] = dividend;

    // DIV0U
    bus.load_program(PROGRAM_BASE, &[0x0019]);
    sh2.step(&mut bus);

    for i in 0..32 {
        let pc = PROGRAM_BASE + 2 + i * 4;
        bus.load_program(pc, &[0x4324, 0x3124]); // ROTCL R3 ; DIV1 R2,R1
        sh2.step(&mut bus);
        sh2.step(&mut bus);
    }
    // One last ROTCL pulls the final quotient bit in
    let pc = PROGRAM_BASE + 2 + 32 * 4;
    bus.load_program(pc, &[0x4324]);
    sh2.step(&mut bus);

    assert_eq!(sh2.r[3], dividend / divisor, "quotient of 19/5");
}

// ========================================
// Multiply / accumulate
// ========================================

#[test]
fn test_dmuls_signed_64bit_product() {
    let (mut sh2, mut bus) = test_sh2();
    sh2.r[1] = 0xFFFF_FFFE; // -2
    sh2.r[2] = 0x0000_0005;
    bus.load_program(PROGRAM_BASE, &[0x312D]); // DMULS.L R2,R1

    sh2.step(&mut bus);
    let product = ((u64::from(sh2.mach) << 32) | u64::from(sh2.macl)) as i64;
    assert_eq!(product, -10);
}

#[test]
fn test_dmulu_unsigned_64bit_product() {
    let (mut sh2, mut bus) = test_sh2();
    sh2.r[1] = 0xFFFF_FFFF;
    sh2.r[2] = 0x0000_0002;
    bus.load_program(PROGRAM_BASE, &[0x3125]); // DMULU.L R2,R1

    sh2.step(&mut bus);
    let product = (u64::from(sh2.mach) << 32) | u64::from(sh2.macl);
    assert_eq!(product, 0x1_FFFF_FFFE);
}

#[test]
fn test_muls_takes_low_words_signed() {
    let (mut sh2, mut bus) = test_sh2();
    sh2.r[1] = 0x1234_FFFF; // low word -1
    sh2.r[2] = 0x5678_0002;
    bus.load_program(PROGRAM_BASE, &[0x212F]); // MULS.W R2,R1

    sh2.step(&mut bus);
    assert_eq!(sh2.macl as i32, -2);
}

#[test]
fn test_mac_w_accumulates_without_saturation() {
    let (mut sh2, mut bus) = test_sh2();
    let table_n = 0x0600_1000;
    let table_m = 0x0600_1100;
    bus.write16(table_n, 3);
    bus.write16(table_m, 4);
    sh2.r[1] = table_n;
    sh2.r[2] = table_m;
    bus.load_program(PROGRAM_BASE, &[0x412F]); // MAC.W @R2+,@R1+

    sh2.step(&mut bus);
    assert_eq!(sh2.macl, 12);
    assert_eq!(sh2.r[1], table_n + 2, "post-increment by 2");
    assert_eq!(sh2.r[2], table_m + 2);
}

#[test]
fn test_mac_w_saturates_at_32_bits_with_s_flag() {
    let (mut sh2, mut bus) = test_sh2();
    let table_n = 0x0600_1000;
    let table_m = 0x0600_1100;
    bus.write16(table_n, 0x7FFF);
    bus.write16(table_m, 0x7FFF);
    sh2.r[1] = table_n;
    sh2.r[2] = table_m;
    sh2.macl = 0x7FFF_FFFF;
    sh2.mach = 0xDEAD_0000;
    sh2.set_sr_flag(flags::S);
    bus.load_program(PROGRAM_BASE, &[0x412F]); // MAC.W @R2+,@R1+

    sh2.step(&mut bus);
    assert_eq!(sh2.macl, 0x7FFF_FFFF, "MACL pins at the positive limit");
    assert_eq!(
        sh2.mach & 1,
        1,
        "MACH LSB is the overflow sticky bit under S"
    );
    assert_eq!(sh2.mach & 0xFFFF_0000, 0xDEAD_0000, "MACH body is preserved");
}

#[test]
fn test_mac_l_saturates_at_48_bits_with_s_flag() {
    let (mut sh2, mut bus) = test_sh2();
    let table_n = 0x0600_1000;
    let table_m = 0x0600_1100;
    bus.write32(table_n, 0x7FFF_FFFF);
    bus.write32(table_m, 0x7FFF_FFFF);
    sh2.r[1] = table_n;
    sh2.r[2] = table_m;
    // Accumulator already at the 48 bit positive limit
    sh2.mach = 0x0000_7FFF;
    sh2.macl = 0xFFFF_FFFF;
    sh2.set_sr_flag(flags::S);
    bus.load_program(PROGRAM_BASE, &[0x012F]); // MAC.L @R2+,@R1+

    sh2.step(&mut bus);
    let mac = ((u64::from(sh2.mach) << 32) | u64::from(sh2.macl)) as i64;
    assert_eq!(mac, 0x0000_7FFF_FFFF_FFFF, "MAC pins at the 48 bit limit");
    assert_eq!(sh2.r[1], table_n + 4, "post-increment by 4");
}

// ========================================
// Carry chains
// ========================================

#[test]
fn test_addc_carry_out() {
    let (mut sh2, mut bus) = test_sh2();
    sh2.r[1] = 0xFFFF_FFFF;
    sh2.r[2] = 0x0000_0001;
    bus.load_program(PROGRAM_BASE, &[0x312E]); // ADDC R2,R1

    sh2.step(&mut bus);
    assert_eq!(sh2.r[1], 0);
    assert!(sh2.sr_flag(flags::T), "carry out sets T");
}

#[test]
fn test_addc_then_subc_round_trip() {
    for (rn, rm) in [(5u32, 3u32), (0xFFFF_FFFF, 1), (0x8000_0000, 0x8000_0000)] {
        let (mut sh2, mut bus) = test_sh2();
        sh2.r[1] = rn;
        sh2.r[2] = rm;
        sh2.clear_sr_flag(flags::T);
        bus.load_program(PROGRAM_BASE, &[0x312E, 0x313A]); // ADDC R2,R1 ; SUBC R2,R1

        sh2.step(&mut bus);
        let carry = sh2.sr_flag(flags::T);

        // Matching initial T for the SUBC
        sh2.clear_sr_flag(flags::T);
        sh2.step(&mut bus);
        let borrow = sh2.sr_flag(flags::T);

        assert_eq!(sh2.r[1], rn, "ADDC;SUBC must round-trip Rn={:#x}", rn);
        assert_eq!(carry, borrow, "the carry out equals the borrow back");
    }
}

#[test]
fn test_subc_borrow() {
    let (mut sh2, mut bus) = test_sh2();
    sh2.r[1] = 0;
    sh2.r[2] = 1;
    bus.load_program(PROGRAM_BASE, &[0x313A]); // SUBC R2,R1

    sh2.step(&mut bus);
    assert_eq!(sh2.r[1], 0xFFFF_FFFF);
    assert!(sh2.sr_flag(flags::T), "borrow sets T");
}

#[test]
fn test_negc() {
    let (mut sh2, mut bus) = test_sh2();
    sh2.r[2] = 1;
    sh2.clear_sr_flag(flags::T);
    bus.load_program(PROGRAM_BASE, &[0x612A]); // NEGC R2,R1

    sh2.step(&mut bus);
    assert_eq!(sh2.r[1], 0xFFFF_FFFF);
    assert!(sh2.sr_flag(flags::T), "non-zero negation borrows");
}

#[test]
fn test_addv_overflow() {
    let (mut sh2, mut bus) = test_sh2();
    sh2.r[1] = 0x7FFF_FFFF;
    sh2.r[2] = 1;
    bus.load_program(PROGRAM_BASE, &[0x312F]); // ADDV R2,R1

    sh2.step(&mut bus);
    assert_eq!(sh2.r[1], 0x8000_0000);
    assert!(sh2.sr_flag(flags::T), "positive + positive -> negative overflows");
}

// ========================================
// Memory round trips
// ========================================

#[test]
fn test_push_pop_round_trip() {
    // MOV.L R0,@-R1 ; MOV.L @R1+,R0 leaves both registers unchanged
    let (mut sh2, mut bus) = test_sh2();
    sh2.r[0] = 0xCAFE_F00D;
    sh2.r[1] = 0x0600_1000;
    bus.load_program(PROGRAM_BASE, &[0x2106, 0x6016]);

    sh2.step(&mut bus);
    assert_eq!(sh2.r[1], 0x0600_0FFC, "pre-decrement");

    sh2.step(&mut bus);
    assert_eq!(sh2.r[0], 0xCAFE_F00D, "R0 survives the round trip");
    assert_eq!(sh2.r[1], 0x0600_1000, "R1 survives the round trip");
}

#[test]
fn test_post_increment_load_with_same_register() {
    // MOV.B @R1+,R1 must not increment the destination
    let (mut sh2, mut bus) = test_sh2();
    sh2.r[1] = 0x0600_1000;
    bus.write8(0x0600_1000, 0x42);
    bus.load_program(PROGRAM_BASE, &[0x6114]);

    sh2.step(&mut bus);
    assert_eq!(sh2.r[1], 0x42, "the load wins, no increment on n == m");
}

#[test]
fn test_gbr_displacement_store_load() {
    let (mut sh2, mut bus) = test_sh2();
    sh2.gbr = 0x0600_1000;
    sh2.r[0] = 0x1234_5678;
    bus.load_program(PROGRAM_BASE, &[0xC203, 0xC603]); // MOV.L R0,@(3,GBR) ; MOV.L @(3,GBR),R0

    sh2.step(&mut bus);
    assert_eq!(bus.read32(0x0600_100C), 0x1234_5678);

    sh2.r[0] = 0;
    sh2.step(&mut bus);
    assert_eq!(sh2.r[0], 0x1234_5678);
}

#[test]
fn test_tas_sets_msb_and_t() {
    let (mut sh2, mut bus) = test_sh2();
    sh2.r[1] = 0x0600_1000;
    bus.write8(0x0600_1000, 0);
    bus.load_program(PROGRAM_BASE, &[0x411B, 0x411B]); // TAS.B @R1 twice

    let cycles = sh2.step(&mut bus);
    assert_eq!(cycles, 4);
    assert!(sh2.sr_flag(flags::T), "zero byte sets T");
    assert_eq!(bus.read8(0x0600_1000), 0x80, "MSB is set");

    sh2.pc = PROGRAM_BASE + 2;
    sh2.step(&mut bus);
    assert!(!sh2.sr_flag(flags::T), "non-zero byte clears T");
}

// ========================================
// Shifts and swaps
// ========================================

#[test]
fn test_shar_preserves_sign() {
    let (mut sh2, mut bus) = test_sh2();
    sh2.r[1] = 0x8000_0001;
    bus.load_program(PROGRAM_BASE, &[0x4121]); // SHAR R1

    sh2.step(&mut bus);
    assert_eq!(sh2.r[1], 0xC000_0000);
    assert!(sh2.sr_flag(flags::T), "shifted-out LSB lands in T");
}

#[test]
fn test_rotcl_through_t() {
    let (mut sh2, mut bus) = test_sh2();
    sh2.r[1] = 0x8000_0000;
    sh2.set_sr_flag(flags::T);
    bus.load_program(PROGRAM_BASE, &[0x4124]); // ROTCL R1

    sh2.step(&mut bus);
    assert_eq!(sh2.r[1], 0x0000_0001, "old T enters at bit 0");
    assert!(sh2.sr_flag(flags::T), "old MSB lands in T");
}

#[test]
fn test_swap_and_xtrct() {
    let (mut sh2, mut bus) = test_sh2();
    sh2.r[1] = 0x1122_3344;
    sh2.r[2] = 0xAABB_CCDD;
    bus.load_program(PROGRAM_BASE, &[0x6318, 0x6419, 0x212D]);
    // SWAP.B R1,R3 ; SWAP.W R1,R4 ; XTRCT R2,R1

    sh2.step(&mut bus);
    assert_eq!(sh2.r[3], 0x1122_4433);

    sh2.step(&mut bus);
    assert_eq!(sh2.r[4], 0x3344_1122);

    sh2.step(&mut bus);
    assert_eq!(sh2.r[1], 0xCCDD_1122, "middle 32 bits of Rm:Rn");
}

// ========================================
// System registers
// ========================================

#[test]
fn test_sr_writes_are_masked() {
    let (mut sh2, mut bus) = test_sh2();
    sh2.r[1] = 0xFFFF_FFFF;
    bus.load_program(PROGRAM_BASE, &[0x410E]); // LDC R1,SR

    sh2.step(&mut bus);
    assert_eq!(sh2.sr, flags::SR_MASK, "bits outside 0x3F3 are discarded");
}

#[test]
fn test_lds_macl_writes_macl() {
    // Regression test: LDS Rm,MACL must write MACL, not MACH
    let (mut sh2, mut bus) = test_sh2();
    sh2.r[1] = 0x1234_5678;
    sh2.mach = 0xAAAA_AAAA;
    bus.load_program(PROGRAM_BASE, &[0x411A]); // LDS R1,MACL

    sh2.step(&mut bus);
    assert_eq!(sh2.macl, 0x1234_5678, "MACL receives the value");
    assert_eq!(sh2.mach, 0xAAAA_AAAA, "MACH is untouched");
}

#[test]
fn test_sleep_does_not_advance_pc() {
    let (mut sh2, mut bus) = test_sh2();
    bus.load_program(PROGRAM_BASE, &[0x001B]); // SLEEP

    let cycles = sh2.step(&mut bus);
    assert_eq!(cycles, 3, "SLEEP charges 3 cycles");
    assert_eq!(sh2.pc, PROGRAM_BASE, "SLEEP does not advance PC");
}

#[test]
fn test_trapa_pushes_and_vectors() {
    let (mut sh2, mut bus) = test_sh2();
    sh2.vbr = 0x0600_4000;
    bus.write32(0x0600_4000 + 0x20 * 4, 0x0600_8000);
    bus.load_program(PROGRAM_BASE, &[0xC320]); // TRAPA #0x20

    let old_sp = sh2.r[15];
    let old_sr = sh2.sr;
    let cycles = sh2.step(&mut bus);

    assert_eq!(cycles, 8);
    assert_eq!(sh2.r[15], old_sp - 8);
    assert_eq!(bus.read32(old_sp - 4), u32::from(old_sr), "SR pushed first");
    assert_eq!(bus.read32(old_sp - 8), PROGRAM_BASE + 2, "return PC pushed");
    assert_eq!(sh2.pc, 0x0600_8000, "PC vectors through VBR");
}
