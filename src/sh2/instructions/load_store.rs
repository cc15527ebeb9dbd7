// Data transfer instructions (MOV family, MOVA, MOVT, SWAP, XTRCT)

use crate::bus::Bus;
use crate::sh2::Sh2;

#[inline]
fn sign_extend_byte(value: u32) -> u32 {
    value as u8 as i8 as i32 as u32
}

#[inline]
fn sign_extend_word(value: u32) -> u32 {
    value as u16 as i16 as i32 as u32
}

impl Sh2 {
    /// MOV: Rm -> Rn
    pub(crate) fn mov(&mut self) {
        self.r[self.xn00()] = self.r[self.x0n0()];

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// MOV.B Rm,@Rn
    pub(crate) fn movbs(&mut self, bus: &mut dyn Bus) {
        let addr = self.r[self.xn00()];
        let data = self.r[self.x0n0()] as u8;
        self.write_byte(bus, addr, data);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// MOV.W Rm,@Rn
    pub(crate) fn movws(&mut self, bus: &mut dyn Bus) {
        let addr = self.r[self.xn00()];
        let data = self.r[self.x0n0()] as u16;
        self.write_word(bus, addr, data);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// MOV.L Rm,@Rn
    pub(crate) fn movls(&mut self, bus: &mut dyn Bus) {
        let addr = self.r[self.xn00()];
        let data = self.r[self.x0n0()];
        self.write_long(bus, addr, data);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// MOV.B @Rm,Rn (sign extension)
    pub(crate) fn movbl(&mut self, bus: &mut dyn Bus) {
        let value = self.read_byte(bus, self.r[self.x0n0()]) as u32;
        self.r[self.xn00()] = sign_extend_byte(value);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// MOV.W @Rm,Rn (sign extension)
    pub(crate) fn movwl(&mut self, bus: &mut dyn Bus) {
        let value = self.read_word(bus, self.r[self.x0n0()]) as u32;
        self.r[self.xn00()] = sign_extend_word(value);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// MOV.L @Rm,Rn
    pub(crate) fn movll(&mut self, bus: &mut dyn Bus) {
        self.r[self.xn00()] = self.read_long(bus, self.r[self.x0n0()]);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// MOV.B Rm,@-Rn
    pub(crate) fn movbm(&mut self, bus: &mut dyn Bus) {
        let addr = self.r[self.xn00()].wrapping_sub(1);
        let data = self.r[self.x0n0()] as u8;
        self.write_byte(bus, addr, data);
        self.r[self.xn00()] = addr;

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// MOV.W Rm,@-Rn
    pub(crate) fn movwm(&mut self, bus: &mut dyn Bus) {
        let addr = self.r[self.xn00()].wrapping_sub(2);
        let data = self.r[self.x0n0()] as u16;
        self.write_word(bus, addr, data);
        self.r[self.xn00()] = addr;

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// MOV.L Rm,@-Rn
    pub(crate) fn movlm(&mut self, bus: &mut dyn Bus) {
        let addr = self.r[self.xn00()].wrapping_sub(4);
        let data = self.r[self.x0n0()];
        self.write_long(bus, addr, data);
        self.r[self.xn00()] = addr;

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// MOV.B @Rm+,Rn (post-increment unless Rn == Rm)
    pub(crate) fn movbp(&mut self, bus: &mut dyn Bus) {
        let value = self.read_byte(bus, self.r[self.x0n0()]) as u32;
        self.r[self.xn00()] = sign_extend_byte(value);
        if self.xn00() != self.x0n0() {
            self.r[self.x0n0()] = self.r[self.x0n0()].wrapping_add(1);
        }

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// MOV.W @Rm+,Rn
    pub(crate) fn movwp(&mut self, bus: &mut dyn Bus) {
        let value = self.read_word(bus, self.r[self.x0n0()]) as u32;
        self.r[self.xn00()] = sign_extend_word(value);
        if self.xn00() != self.x0n0() {
            self.r[self.x0n0()] = self.r[self.x0n0()].wrapping_add(2);
        }

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// MOV.L @Rm+,Rn
    pub(crate) fn movlp(&mut self, bus: &mut dyn Bus) {
        self.r[self.xn00()] = self.read_long(bus, self.r[self.x0n0()]);
        if self.xn00() != self.x0n0() {
            self.r[self.x0n0()] = self.r[self.x0n0()].wrapping_add(4);
        }

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// MOV.B Rm,@(R0,Rn)
    pub(crate) fn movbs0(&mut self, bus: &mut dyn Bus) {
        let addr = self.r[self.xn00()].wrapping_add(self.r[0]);
        let data = self.r[self.x0n0()] as u8;
        self.write_byte(bus, addr, data);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// MOV.W Rm,@(R0,Rn)
    pub(crate) fn movws0(&mut self, bus: &mut dyn Bus) {
        let addr = self.r[self.xn00()].wrapping_add(self.r[0]);
        let data = self.r[self.x0n0()] as u16;
        self.write_word(bus, addr, data);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// MOV.L Rm,@(R0,Rn)
    pub(crate) fn movls0(&mut self, bus: &mut dyn Bus) {
        let addr = self.r[self.xn00()].wrapping_add(self.r[0]);
        let data = self.r[self.x0n0()];
        self.write_long(bus, addr, data);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// MOV.B @(R0,Rm),Rn (sign extension)
    pub(crate) fn movbl0(&mut self, bus: &mut dyn Bus) {
        let addr = self.r[self.x0n0()].wrapping_add(self.r[0]);
        let value = self.read_byte(bus, addr) as u32;
        self.r[self.xn00()] = sign_extend_byte(value);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// MOV.W @(R0,Rm),Rn (sign extension)
    pub(crate) fn movwl0(&mut self, bus: &mut dyn Bus) {
        let addr = self.r[self.x0n0()].wrapping_add(self.r[0]);
        let value = self.read_word(bus, addr) as u32;
        self.r[self.xn00()] = sign_extend_word(value);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// MOV.L @(R0,Rm),Rn
    pub(crate) fn movll0(&mut self, bus: &mut dyn Bus) {
        let addr = self.r[self.x0n0()].wrapping_add(self.r[0]);
        self.r[self.xn00()] = self.read_long(bus, addr);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// MOV #imm,Rn (sign extension)
    pub(crate) fn movi(&mut self) {
        self.r[self.xn00()] = sign_extend_byte(self.x0nn());

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// MOV.W @(disp,PC),Rn: word operand base is PC + 4
    pub(crate) fn movwi(&mut self, bus: &mut dyn Bus) {
        let disp = self.x0nn();
        let addr = self.pc.wrapping_add(disp << 1).wrapping_add(4);
        let value = self.read_word(bus, addr) as u32;
        self.r[self.xn00()] = sign_extend_word(value);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// MOV.L @(disp,PC),Rn: long operand base is (PC & ~3) + 4
    pub(crate) fn movli(&mut self, bus: &mut dyn Bus) {
        let disp = self.x0nn();
        let addr = (self.pc & 0xFFFF_FFFC).wrapping_add(disp << 2).wrapping_add(4);
        self.r[self.xn00()] = self.read_long(bus, addr);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// MOV.B @(disp,GBR),R0 (sign extension)
    pub(crate) fn movblg(&mut self, bus: &mut dyn Bus) {
        let addr = self.gbr.wrapping_add(self.x0nn());
        let value = self.read_byte(bus, addr) as u32;
        self.r[0] = sign_extend_byte(value);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// MOV.W @(disp,GBR),R0 (sign extension)
    pub(crate) fn movwlg(&mut self, bus: &mut dyn Bus) {
        let addr = self.gbr.wrapping_add(self.x0nn() << 1);
        let value = self.read_word(bus, addr) as u32;
        self.r[0] = sign_extend_word(value);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// MOV.L @(disp,GBR),R0
    pub(crate) fn movllg(&mut self, bus: &mut dyn Bus) {
        let addr = self.gbr.wrapping_add(self.x0nn() << 2);
        self.r[0] = self.read_long(bus, addr);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// MOV.B R0,@(disp,GBR)
    pub(crate) fn movbsg(&mut self, bus: &mut dyn Bus) {
        let addr = self.gbr.wrapping_add(self.x0nn());
        let data = self.r[0] as u8;
        self.write_byte(bus, addr, data);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// MOV.W R0,@(disp,GBR)
    pub(crate) fn movwsg(&mut self, bus: &mut dyn Bus) {
        let addr = self.gbr.wrapping_add(self.x0nn() << 1);
        let data = self.r[0] as u16;
        self.write_word(bus, addr, data);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// MOV.L R0,@(disp,GBR)
    pub(crate) fn movlsg(&mut self, bus: &mut dyn Bus) {
        let addr = self.gbr.wrapping_add(self.x0nn() << 2);
        let data = self.r[0];
        self.write_long(bus, addr, data);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// MOV.B R0,@(disp,Rn)
    pub(crate) fn movbs4(&mut self, bus: &mut dyn Bus) {
        let disp = (self.x00n() as u32) & 0xF;
        let addr = self.r[self.x0n0()].wrapping_add(disp);
        let data = self.r[0] as u8;
        self.write_byte(bus, addr, data);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// MOV.W R0,@(disp,Rn)
    pub(crate) fn movws4(&mut self, bus: &mut dyn Bus) {
        let disp = (self.x00n() as u32) & 0xF;
        let addr = self.r[self.x0n0()].wrapping_add(disp << 1);
        let data = self.r[0] as u16;
        self.write_word(bus, addr, data);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// MOV.L Rm,@(disp,Rn)
    pub(crate) fn movls4(&mut self, bus: &mut dyn Bus) {
        let disp = (self.x00n() as u32) & 0xF;
        let addr = self.r[self.xn00()].wrapping_add(disp << 2);
        let data = self.r[self.x0n0()];
        self.write_long(bus, addr, data);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// MOV.B @(disp,Rm),R0 (sign extension)
    pub(crate) fn movbl4(&mut self, bus: &mut dyn Bus) {
        let disp = (self.x00n() as u32) & 0xF;
        let addr = self.r[self.x0n0()].wrapping_add(disp);
        let value = self.read_byte(bus, addr) as u32;
        self.r[0] = sign_extend_byte(value);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// MOV.W @(disp,Rm),R0 (sign extension)
    pub(crate) fn movwl4(&mut self, bus: &mut dyn Bus) {
        let disp = (self.x00n() as u32) & 0xF;
        let addr = self.r[self.x0n0()].wrapping_add(disp << 1);
        let value = self.read_word(bus, addr) as u32;
        self.r[0] = sign_extend_word(value);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// MOV.L @(disp,Rm),Rn
    pub(crate) fn movll4(&mut self, bus: &mut dyn Bus) {
        let disp = (self.x00n() as u32) & 0xF;
        let addr = self.r[self.x0n0()].wrapping_add(disp << 2);
        self.r[self.xn00()] = self.read_long(bus, addr);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// MOVA: (PC & ~3) + disp*4 + 4 -> R0
    pub(crate) fn mova(&mut self) {
        let disp = self.x0nn();
        self.r[0] = (self.pc & 0xFFFF_FFFC).wrapping_add(disp << 2).wrapping_add(4);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// MOVT: T -> Rn
    pub(crate) fn movt(&mut self) {
        self.r[self.xn00()] = self.t_value();

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// SWAP.B: swap the two low bytes of Rm -> Rn
    pub(crate) fn swapb(&mut self) {
        let rm = self.r[self.x0n0()];
        let temp0 = rm & 0xFFFF_0000;
        let temp1 = (rm & 0xFF) << 8;
        self.r[self.xn00()] = ((rm >> 8) & 0xFF) | temp1 | temp0;

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// SWAP.W: swap the two words of Rm -> Rn
    pub(crate) fn swapw(&mut self) {
        let rm = self.r[self.x0n0()];
        self.r[self.xn00()] = (rm << 16) | ((rm >> 16) & 0xFFFF);

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }

    /// XTRCT: middle 32 bits of Rm:Rn -> Rn
    pub(crate) fn xtrct(&mut self) {
        let temp = (self.r[self.x0n0()] << 16) & 0xFFFF_0000;
        let n = self.xn00();
        self.r[n] = ((self.r[n] >> 16) & 0xFFFF) | temp;

        self.pc = self.pc.wrapping_add(2);
        self.cycles_elapsed = 1;
    }
}
