// Arithmetic, compare, divide and multiply-accumulate instructions

use crate::bus::Bus;
use crate::sh2::flags;
use crate::sh2::Sh2;

/// Saturation bounds of the 48 bit MAC.L accumulator
const MAC48_MAX: i64 = 0x0000_7FFF_FFFF_FFFF;
const MAC48_MIN: i64 = -0x0000_8000_0000_0000;

/// Saturation bounds of the 32 bit MAC.W accumulator
const MAC32_MAX: i64 = 0x7FFF_FFFF;
const MAC32_MIN: i64 = -0x8000_0000;

impl Sh2 {
    // ========================================
    // Add / subtract
    // ========================================

    /// ADD: Rn + Rm -> Rn
    pub(crate) fn add(&mut self) {
        self.r[self.xn00()] = self.r[self.xn00()].wrapping_add(self.r[self.x0n0()]);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// ADD #imm: Rn + sign-extended imm -> Rn
    pub(crate) fn addi(&mut self) {
        let imm = self.x0nn() as u8 as i8 as i32 as u32;
        self.r[self.xn00()] = self.r[self.xn00()].wrapping_add(imm);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// ADDC: Rn + Rm + T -> Rn, carry -> T
    pub(crate) fn addc(&mut self) {
        let n = self.xn00();
        let tmp1 = self.r[n].wrapping_add(self.r[self.x0n0()]);
        let tmp0 = self.r[n];
        self.r[n] = tmp1.wrapping_add(self.t_value());

        self.update_sr_flag(flags::T, tmp0 > tmp1);
        if tmp1 > self.r[n] {
            self.set_sr_flag(flags::T);
        }

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// ADDV: Rn + Rm -> Rn, signed overflow -> T
    pub(crate) fn addv(&mut self) {
        let n = self.xn00();
        let dest = i32::from((self.r[n] as i32) < 0);
        let mut src = i32::from((self.r[self.x0n0()] as i32) < 0);

        src += dest;
        self.r[n] = self.r[n].wrapping_add(self.r[self.x0n0()]);

        let mut ans = i32::from((self.r[n] as i32) < 0);
        ans += dest;

        if src == 0 || src == 2 {
            self.update_sr_flag(flags::T, ans == 1);
        } else {
            self.clear_sr_flag(flags::T);
        }

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// SUB: Rn - Rm -> Rn
    pub(crate) fn sub(&mut self) {
        self.r[self.xn00()] = self.r[self.xn00()].wrapping_sub(self.r[self.x0n0()]);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// SUBC: Rn - Rm - T -> Rn, borrow -> T
    pub(crate) fn subc(&mut self) {
        let n = self.xn00();
        let tmp1 = self.r[n].wrapping_sub(self.r[self.x0n0()]);
        let tmp0 = self.r[n];
        self.r[n] = tmp1.wrapping_sub(self.t_value());

        self.update_sr_flag(flags::T, tmp0 < tmp1);
        if tmp1 < self.r[n] {
            self.set_sr_flag(flags::T);
        }

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// SUBV: Rn - Rm -> Rn, signed underflow -> T
    pub(crate) fn subv(&mut self) {
        let n = self.xn00();
        let dest = i32::from((self.r[n] as i32) < 0);
        let src = i32::from((self.r[self.x0n0()] as i32) < 0);

        self.r[n] = self.r[n].wrapping_sub(self.r[self.x0n0()]);
        let mut ans = i32::from((self.r[n] as i32) < 0);
        ans += dest;

        if src == 1 {
            self.update_sr_flag(flags::T, ans == 1);
        } else {
            self.clear_sr_flag(flags::T);
        }

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// NEG: 0 - Rm -> Rn
    pub(crate) fn neg(&mut self) {
        self.r[self.xn00()] = 0u32.wrapping_sub(self.r[self.x0n0()]);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// NEGC: 0 - Rm - T -> Rn, borrow -> T
    pub(crate) fn negc(&mut self) {
        let temp = 0u32.wrapping_sub(self.r[self.x0n0()]);
        let n = self.xn00();
        self.r[n] = temp.wrapping_sub(self.t_value());

        self.update_sr_flag(flags::T, 0 < temp);
        if temp < self.r[n] {
            self.set_sr_flag(flags::T);
        }

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// DT: Rn - 1 -> Rn, T = (Rn == 0)
    pub(crate) fn dt(&mut self) {
        let n = self.xn00();
        self.r[n] = self.r[n].wrapping_sub(1);
        self.update_sr_flag(flags::T, self.r[n] == 0);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    // ========================================
    // Compare
    // ========================================

    /// CMP/EQ: T = (Rn == Rm)
    pub(crate) fn cmpeq(&mut self) {
        let t = self.r[self.xn00()] == self.r[self.x0n0()];
        self.update_sr_flag(flags::T, t);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// CMP/GE: T = (Rn >= Rm), signed
    pub(crate) fn cmpge(&mut self) {
        let t = (self.r[self.xn00()] as i32) >= (self.r[self.x0n0()] as i32);
        self.update_sr_flag(flags::T, t);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// CMP/GT: T = (Rn > Rm), signed
    pub(crate) fn cmpgt(&mut self) {
        let t = (self.r[self.xn00()] as i32) > (self.r[self.x0n0()] as i32);
        self.update_sr_flag(flags::T, t);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// CMP/HI: T = (Rn > Rm), unsigned
    pub(crate) fn cmphi(&mut self) {
        let t = self.r[self.xn00()] > self.r[self.x0n0()];
        self.update_sr_flag(flags::T, t);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// CMP/HS: T = (Rn >= Rm), unsigned
    pub(crate) fn cmphs(&mut self) {
        let t = self.r[self.xn00()] >= self.r[self.x0n0()];
        self.update_sr_flag(flags::T, t);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// CMP/PL: T = (Rn > 0), signed
    pub(crate) fn cmppl(&mut self) {
        let t = (self.r[self.xn00()] as i32) > 0;
        self.update_sr_flag(flags::T, t);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// CMP/PZ: T = (Rn >= 0), signed
    pub(crate) fn cmppz(&mut self) {
        let t = (self.r[self.xn00()] as i32) >= 0;
        self.update_sr_flag(flags::T, t);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// CMP/STR: T = 1 when any byte of Rn equals the same byte of Rm
    pub(crate) fn cmpstr(&mut self) {
        let rm = self.r[self.xn00()];
        let rn = self.r[self.x0n0()];

        let t = (rm & 0xFF00_0000) == (rn & 0xFF00_0000)
            || (rm & 0x00FF_0000) == (rn & 0x00FF_0000)
            || (rm & 0x0000_FF00) == (rn & 0x0000_FF00)
            || (rm & 0x0000_00FF) == (rn & 0x0000_00FF);
        self.update_sr_flag(flags::T, t);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// CMP/EQ #imm: T = (R0 == sign-extended imm)
    pub(crate) fn cmpim(&mut self) {
        let imm = self.x0nn() as u8 as i8 as i32 as u32;
        let t = self.r[0] == imm;
        self.update_sr_flag(flags::T, t);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    // ========================================
    // Step divider
    // ========================================

    /// DIV0S: Rn MSB -> Q, Rm MSB -> M, T = M ^ Q
    pub(crate) fn div0s(&mut self) {
        let q = (self.r[self.xn00()] & 0x8000_0000) != 0;
        let m = (self.r[self.x0n0()] & 0x8000_0000) != 0;
        self.update_sr_flag(flags::Q, q);
        self.update_sr_flag(flags::M, m);
        self.update_sr_flag(flags::T, m != q);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// DIV0U: 0 -> M, Q, T
    pub(crate) fn div0u(&mut self) {
        self.clear_sr_flag(flags::M);
        self.clear_sr_flag(flags::Q);
        self.clear_sr_flag(flags::T);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// DIV1: one pass of the step division
    ///
    /// Shifts the dividend left through T, then adds or subtracts the
    /// divisor depending on the previous Q and M, deriving the new Q from
    /// the carry and finally T = (M == Q).
    pub(crate) fn div1(&mut self) {
        let n = self.xn00();
        let m = self.x0n0();

        let old_q = self.sr_flag(flags::Q);
        self.update_sr_flag(flags::Q, (self.r[n] & 0x8000_0000) != 0);

        self.r[n] = self.r[n].wrapping_shl(1);
        self.r[n] |= self.t_value();

        let tmp0 = self.r[n];
        let tmp1;
        if old_q {
            if self.sr_flag(flags::M) {
                self.r[n] = self.r[n].wrapping_sub(self.r[m]);
                tmp1 = self.r[n] > tmp0;
                if self.sr_flag(flags::Q) {
                    self.update_sr_flag(flags::Q, tmp1);
                } else {
                    self.update_sr_flag(flags::Q, !tmp1);
                }
            } else {
                self.r[n] = self.r[n].wrapping_add(self.r[m]);
                tmp1 = self.r[n] < tmp0;
                if self.sr_flag(flags::Q) {
                    self.update_sr_flag(flags::Q, !tmp1);
                } else {
                    self.update_sr_flag(flags::Q, tmp1);
                }
            }
        } else if self.sr_flag(flags::M) {
            self.r[n] = self.r[n].wrapping_add(self.r[m]);
            tmp1 = self.r[n] < tmp0;
            if self.sr_flag(flags::Q) {
                self.update_sr_flag(flags::Q, tmp1);
            } else {
                self.update_sr_flag(flags::Q, !tmp1);
            }
        } else {
            self.r[n] = self.r[n].wrapping_sub(self.r[m]);
            tmp1 = self.r[n] > tmp0;
            if self.sr_flag(flags::Q) {
                self.update_sr_flag(flags::Q, !tmp1);
            } else {
                self.update_sr_flag(flags::Q, tmp1);
            }
        }

        let t = self.sr_flag(flags::M) == self.sr_flag(flags::Q);
        self.update_sr_flag(flags::T, t);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    // ========================================
    // Multiply
    // ========================================

    /// DMULS.L: signed Rn * Rm -> MACH:MACL
    pub(crate) fn dmuls(&mut self) {
        let result =
            (self.r[self.x0n0()] as i32 as i64).wrapping_mul(self.r[self.xn00()] as i32 as i64);
        self.mach = (result >> 32) as u32;
        self.macl = result as u32;

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 2;
    }

    /// DMULU.L: unsigned Rn * Rm -> MACH:MACL
    pub(crate) fn dmulu(&mut self) {
        let result = (self.r[self.x0n0()] as u64).wrapping_mul(self.r[self.xn00()] as u64);
        self.mach = (result >> 32) as u32;
        self.macl = result as u32;

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 2;
    }

    /// MUL.L: Rn * Rm -> MACL (low 32 bits)
    pub(crate) fn mull(&mut self) {
        self.macl = self.r[self.xn00()].wrapping_mul(self.r[self.x0n0()]);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 2; // 2 to 4
    }

    /// MULS.W: signed 16 bit Rn * Rm -> MACL
    pub(crate) fn muls(&mut self) {
        self.macl = ((self.r[self.xn00()] as i16 as i32)
            .wrapping_mul(self.r[self.x0n0()] as i16 as i32)) as u32;

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1; // 1 to 3
    }

    /// MULU.W: unsigned 16 bit Rn * Rm -> MACL
    pub(crate) fn mulu(&mut self) {
        self.macl =
            (self.r[self.xn00()] as u16 as u32).wrapping_mul(self.r[self.x0n0()] as u16 as u32);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1; // 1 to 3
    }

    /// MAC.L: signed (Rn) * (Rm) + MAC -> MAC, 48 bit saturation when S is set
    pub(crate) fn macl_op(&mut self, bus: &mut dyn Bus) {
        let n = self.xn00();
        let m = self.x0n0();

        let src_n = self.read_long(bus, self.r[n]) as i32 as i64;
        self.r[n] = self.r[n].wrapping_add(4);
        let src_m = self.read_long(bus, self.r[m]) as i32 as i64;
        self.r[m] = self.r[m].wrapping_add(4);

        let mul = src_m.wrapping_mul(src_n);

        let mut mac = (((self.mach as u64) << 32) | self.macl as u64) as i64;
        mac = mac.wrapping_add(mul);

        if self.sr_flag(flags::S) {
            mac = mac.clamp(MAC48_MIN, MAC48_MAX);
        }
        self.mach = (mac >> 32) as u32;
        self.macl = mac as u32;

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 3;
    }

    /// MAC.W: signed (Rn) * (Rm) + MAC -> MAC
    ///
    /// With S set, only MACL accumulates, saturated at the 32 bit signed
    /// range with the LSB of MACH used as the overflow sticky bit.
    pub(crate) fn macw(&mut self, bus: &mut dyn Bus) {
        let n = self.xn00();
        let m = self.x0n0();

        let src_n = self.read_word(bus, self.r[n]) as i16 as i64;
        self.r[n] = self.r[n].wrapping_add(2);
        let src_m = self.read_word(bus, self.r[m]) as i16 as i64;
        self.r[m] = self.r[m].wrapping_add(2);

        let mul = src_m.wrapping_mul(src_n);

        if !self.sr_flag(flags::S) {
            let mut mac = (((self.mach as u64) << 32) | self.macl as u64) as i64;
            mac = mac.wrapping_add(mul);
            self.mach = (mac >> 32) as u32;
            self.macl = mac as u32;
        } else {
            let mac = (self.macl as i32 as i64).wrapping_add(mul);
            if mac > MAC32_MAX {
                self.mach |= 0x0000_0001;
                self.macl = MAC32_MAX as u32;
            } else if mac < MAC32_MIN {
                self.mach |= 0x0000_0001;
                self.macl = 0x8000_0000;
            } else {
                self.mach &= 0xFFFF_FFFE;
                self.macl = mac as u32;
            }
        }

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 3;
    }

    /// CLRMAC: 0 -> MACH, MACL
    pub(crate) fn clrmac(&mut self) {
        self.mach = 0;
        self.macl = 0;

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    // ========================================
    // Extension
    // ========================================

    /// EXTS.B: sign-extended byte of Rm -> Rn
    pub(crate) fn extsb(&mut self) {
        self.r[self.xn00()] = self.r[self.x0n0()] as u8 as i8 as i32 as u32;

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// EXTS.W: sign-extended word of Rm -> Rn
    pub(crate) fn extsw(&mut self) {
        self.r[self.xn00()] = self.r[self.x0n0()] as u16 as i16 as i32 as u32;

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// EXTU.B: zero-extended byte of Rm -> Rn
    pub(crate) fn extub(&mut self) {
        self.r[self.xn00()] = self.r[self.x0n0()] & 0xFF;

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// EXTU.W: zero-extended word of Rm -> Rn
    pub(crate) fn extuw(&mut self) {
        self.r[self.xn00()] = self.r[self.x0n0()] & 0xFFFF;

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }
}
