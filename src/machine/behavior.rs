// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Contains implementations for each [Insn]
//!
//! Every implementation reports how the program counter should move as a [Flow],
//! which [Machine::step] applies exactly once.

use super::*;
use rand::random;

impl Machine {
    /// Executes a single [Insn]
    #[rustfmt::skip]
    #[inline(always)]
    pub(super) fn execute(&mut self, instruction: Insn) -> Result<Flow> {
        Ok(match instruction {
            Insn::cls   { ..        } => self.clear_screen(),
            Insn::ret   { ..        } => self.ret()?,
            Insn::jp    { A         } => self.jump(A),
            Insn::call  { A         } => self.call(A)?,
            Insn::seb   { x, B      } => self.skip_equals_immediate(x, B),
            Insn::sneb  { x, B      } => self.skip_not_equals_immediate(x, B),
            Insn::se    { y, x, ..  } => self.skip_equals(x, y),
            Insn::ldb   { x, B      } => self.load_immediate(x, B),
            Insn::addb  { x, B      } => self.add_immediate(x, B),
            Insn::ld    { y, x      } => self.load(x, y),
            Insn::or    { y, x      } => self.or(x, y),
            Insn::and   { y, x      } => self.and(x, y),
            Insn::xor   { y, x      } => self.xor(x, y),
            Insn::add   { y, x      } => self.add(x, y),
            Insn::sub   { y, x      } => self.sub(x, y),
            Insn::shr   { x, ..     } => self.shift_right(x),
            Insn::subn  { y, x      } => self.backwards_sub(x, y),
            Insn::shl   { x, ..     } => self.shift_left(x),
            Insn::sne   { y, x, ..  } => self.skip_not_equals(x, y),
            Insn::ldi   { A         } => self.load_i_immediate(A),
            Insn::jpr   { A         } => self.jump_indexed(A),
            Insn::rnd   { x, B      } => self.rand(x, B),
            Insn::drw   { y, x, n   } => self.draw(x, y, n)?,
            Insn::skp   { x         } => self.skip_key_pressed(x)?,
            Insn::sknp  { x         } => self.skip_key_not_pressed(x)?,
            Insn::getdt { x         } => self.load_delay_timer(x),
            Insn::waitk { x         } => self.wait_for_key(x),
            Insn::setdt { x         } => self.store_delay_timer(x),
            Insn::setst { x         } => self.store_sound_timer(x),
            Insn::addi  { x         } => self.add_i(x),
            Insn::font  { x         } => self.load_sprite(x),
            Insn::bcd   { x         } => self.bcd_convert(x)?,
            Insn::stor  { x         } => self.store_dma(x)?,
            Insn::load  { x         } => self.load_dma(x)?,
        })
    }
}

/// |`0nbb`| System instructions, dispatched on the low byte
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`0ne0`| Clear screen memory to all 0       |
/// |`0nee`| Return from subroutine             |
impl Machine {
    /// |`0ne0`| Clears the screen, and requests a redraw
    #[inline(always)]
    pub(super) fn clear_screen(&mut self) -> Flow {
        self.screen.clear();
        self.redraw = true;
        Flow::Next
    }
    /// |`0nee`| Returns from subroutine
    ///
    /// The stack holds the address of the `call` itself, so execution resumes
    /// at the instruction after it.
    #[inline(always)]
    pub(super) fn ret(&mut self) -> Result<Flow> {
        Ok(Flow::Jump(self.stack.pop()?.wrapping_add(2)))
    }
}

/// |`1aaa`| Sets pc to an absolute address
impl Machine {
    /// |`1aaa`| Sets the program counter to an absolute address
    #[inline(always)]
    pub(super) fn jump(&mut self, a: Adr) -> Flow {
        Flow::Jump(a)
    }
}

/// |`2aaa`| Pushes pc onto the stack, then jumps to a
impl Machine {
    /// |`2aaa`| Pushes the address of this instruction onto the stack, then jumps to a
    #[inline(always)]
    pub(super) fn call(&mut self, a: Adr) -> Result<Flow> {
        self.stack.push(self.pc, a)?;
        Ok(Flow::Jump(a))
    }
}

/// |`3xbb`| Skips next instruction if register X == b
impl Machine {
    /// |`3xbb`| Skips the next instruction if register X == b
    #[inline(always)]
    pub(super) fn skip_equals_immediate(&mut self, x: Reg, b: u8) -> Flow {
        Flow::skip_if(self.v[x] == b)
    }
}

/// |`4xbb`| Skips next instruction if register X != b
impl Machine {
    /// |`4xbb`| Skips the next instruction if register X != b
    #[inline(always)]
    pub(super) fn skip_not_equals_immediate(&mut self, x: Reg, b: u8) -> Flow {
        Flow::skip_if(self.v[x] != b)
    }
}

/// |`5xyn`| Performs a register-register comparison
impl Machine {
    /// |`5xyn`| Skips the next instruction if register X == register Y
    #[inline(always)]
    pub(super) fn skip_equals(&mut self, x: Reg, y: Reg) -> Flow {
        Flow::skip_if(self.v[x] == self.v[y])
    }
}

/// |`6xbb`| Loads immediate byte b into register vX
impl Machine {
    /// |`6xbb`| Loads immediate byte b into register vX
    #[inline(always)]
    pub(super) fn load_immediate(&mut self, x: Reg, b: u8) -> Flow {
        self.v[x] = b;
        Flow::Next
    }
}

/// |`7xbb`| Adds immediate byte b to register vX
impl Machine {
    /// |`7xbb`| Adds immediate byte b to register vX. Does not touch vF.
    #[inline(always)]
    pub(super) fn add_immediate(&mut self, x: Reg, b: u8) -> Flow {
        self.v[x] = self.v[x].wrapping_add(b);
        Flow::Next
    }
}

/// |`8xyn`| Performs ALU operation
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`8xy0`| X = Y                              |
/// |`8xy1`| X = X \| Y                         |
/// |`8xy2`| X = X & Y                          |
/// |`8xy3`| X = X ^ Y                          |
/// |`8xy4`| X = X + Y; Set vF=carry            |
/// |`8xy5`| X = X - Y; Set vF=!borrow          |
/// |`8xy6`| X = X >> 1; Set vF=low bit         |
/// |`8xy7`| X = Y - X; Set vF=(X > Y)          |
/// |`8xyE`| X = X << 1; Set vF=X & 0x80        |
///
/// Every flag-setting operation writes vF *before* computing the result,
/// so when X or Y is `f` the result is computed from the new flag.
impl Machine {
    /// |`8xy0`| Loads the value of y into x
    #[inline(always)]
    pub(super) fn load(&mut self, x: Reg, y: Reg) -> Flow {
        self.v[x] = self.v[y];
        Flow::Next
    }
    /// |`8xy1`| Performs bitwise or of vX and vY, and stores the result in vX
    #[inline(always)]
    pub(super) fn or(&mut self, x: Reg, y: Reg) -> Flow {
        self.v[x] |= self.v[y];
        Flow::Next
    }
    /// |`8xy2`| Performs bitwise and of vX and vY, and stores the result in vX
    #[inline(always)]
    pub(super) fn and(&mut self, x: Reg, y: Reg) -> Flow {
        self.v[x] &= self.v[y];
        Flow::Next
    }
    /// |`8xy3`| Performs bitwise xor of vX and vY, and stores the result in vX
    #[inline(always)]
    pub(super) fn xor(&mut self, x: Reg, y: Reg) -> Flow {
        self.v[x] ^= self.v[y];
        Flow::Next
    }
    /// |`8xy4`| Performs addition of vX and vY, and stores the result in vX
    #[inline(always)]
    pub(super) fn add(&mut self, x: Reg, y: Reg) -> Flow {
        self.v[0xf] = (self.v[y] > 0xff - self.v[x]).into();
        self.v[x] = self.v[x].wrapping_add(self.v[y]);
        Flow::Next
    }
    /// |`8xy5`| Performs subtraction of vY from vX, and stores the result in vX
    ///
    /// # Quirk
    /// vF is cleared when vY == vX, even though nothing was borrowed
    #[inline(always)]
    pub(super) fn sub(&mut self, x: Reg, y: Reg) -> Flow {
        self.v[0xf] = (self.v[y] < self.v[x]).into();
        self.v[x] = self.v[x].wrapping_sub(self.v[y]);
        Flow::Next
    }
    /// |`8xy6`| Performs bitwise right shift of vX
    #[inline(always)]
    pub(super) fn shift_right(&mut self, x: Reg) -> Flow {
        self.v[0xf] = self.v[x] & 1;
        self.v[x] >>= 1;
        Flow::Next
    }
    /// |`8xy7`| Performs subtraction of vX from vY, and stores the result in vX
    ///
    /// # Quirk
    /// vF is set when vX > vY, which is exactly when the subtraction borrows
    #[inline(always)]
    pub(super) fn backwards_sub(&mut self, x: Reg, y: Reg) -> Flow {
        self.v[0xf] = (self.v[x] > self.v[y]).into();
        self.v[x] = self.v[y].wrapping_sub(self.v[x]);
        Flow::Next
    }
    /// |`8xyE`| Performs bitwise left shift of vX
    ///
    /// # Quirk
    /// vF receives the raw high bit (`0x80` or `0`), not a normalized `1` or `0`
    #[inline(always)]
    pub(super) fn shift_left(&mut self, x: Reg) -> Flow {
        self.v[0xf] = self.v[x] & 0x80;
        self.v[x] <<= 1;
        Flow::Next
    }
}

/// |`9xyn`| Performs a register-register comparison
impl Machine {
    /// |`9xyn`| Skip next instruction if X != y
    #[inline(always)]
    pub(super) fn skip_not_equals(&mut self, x: Reg, y: Reg) -> Flow {
        Flow::skip_if(self.v[x] != self.v[y])
    }
}

/// |`Aaaa`| Load address #a into register I
impl Machine {
    /// |`Aadr`| Load address #adr into register I
    #[inline(always)]
    pub(super) fn load_i_immediate(&mut self, a: Adr) -> Flow {
        self.i = a;
        Flow::Next
    }
}

/// |`Baaa`| Jump to &adr + v0
impl Machine {
    /// |`Badr`| Jump to &adr + v0
    ///
    /// The target may land past the end of memory; the next fetch will catch it.
    #[inline(always)]
    pub(super) fn jump_indexed(&mut self, a: Adr) -> Flow {
        Flow::Jump(a.wrapping_add(self.v[0] as Adr))
    }
}

/// |`Cxbb`| Stores a random number & the provided byte into vX
impl Machine {
    /// |`Cxbb`| Stores a random number & the provided byte into vX
    #[inline(always)]
    pub(super) fn rand(&mut self, x: Reg, b: u8) -> Flow {
        self.v[x] = random::<u8>() & b;
        Flow::Next
    }
}

/// |`Dxyn`| Draws n-byte sprite to the screen at coordinates (vX, vY)
impl Machine {
    /// |`Dxyn`| Draws n-byte sprite to the screen at coordinates (vX, vY)
    ///
    /// Sprites wrap around both edges of the screen. vF is set if any lit pixel
    /// was turned off.
    #[inline(always)]
    pub(super) fn draw(&mut self, x: Reg, y: Reg, n: Nib) -> Result<Flow> {
        let (x, y) = (self.v[x] as usize, self.v[y] as usize);
        let i = self.i as usize;
        // The whole sprite is fetched up front, so a bad I leaves the screen untouched
        let sprite = match n as usize {
            0 => &[][..],
            n => self.mem.grab(i..i + n, i + n - 1)?,
        };
        self.v[0xf] = 0;
        for (row, &line) in sprite.iter().enumerate() {
            for col in (0..8).filter(|col| line & (0x80 >> col) != 0) {
                if self.screen.toggle(x + col, y + row) {
                    self.v[0xf] = 1;
                }
            }
        }
        self.redraw = true;
        Ok(Flow::Next)
    }
}

/// |`Exbb`| Skips instruction on value of keypress
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`eX9e`| Skip next instruction if key vX held |
/// |`eXa1`| Skip next instruction if key vX not held |
impl Machine {
    /// |`Ex9E`| Skip next instruction if key vX is held
    #[inline(always)]
    pub(super) fn skip_key_pressed(&mut self, x: Reg) -> Result<Flow> {
        Ok(Flow::skip_if(self.key(self.v[x] as usize)?))
    }
    /// |`ExA1`| Skip next instruction if key vX is not held
    #[inline(always)]
    pub(super) fn skip_key_not_pressed(&mut self, x: Reg) -> Result<Flow> {
        Ok(Flow::skip_if(!self.key(self.v[x] as usize)?))
    }
}

/// |`Fxbb`| Performs IO
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`fX07`| Set vX to value in delay timer     |
/// |`fX0a`| Poll for input, store key in vX    |
/// |`fX15`| Set delay timer to the value in vX |
/// |`fX18`| Set sound timer to the value in vX |
/// |`fX1e`| Add vX to I                        |
/// |`fX29`| Load sprite for character x into I |
/// |`fX33`| BCD convert X into I[0..3]         |
/// |`fX55`| DMA Stor from registers 0..=X to I |
/// |`fX65`| DMA Load from I to registers 0..=X |
impl Machine {
    /// |`Fx07`| Get the current DT, and put it in vX
    /// ```py
    /// vX = DT
    /// ```
    #[inline(always)]
    pub(super) fn load_delay_timer(&mut self, x: Reg) -> Flow {
        self.v[x] = self.delay;
        Flow::Next
    }
    /// |`Fx0A`| Poll for a key, then vX = K
    ///
    /// If no key is held, the program counter stays put,
    /// and this instruction runs again on the next step.
    #[inline(always)]
    pub(super) fn wait_for_key(&mut self, x: Reg) -> Flow {
        if let Some(key) = self.keys.iter().position(|&held| held) {
            self.v[x] = key as u8;
            self.flags.keypause = false;
            Flow::Next
        } else {
            self.flags.keypause = true;
            Flow::Stall
        }
    }
    /// |`Fx15`| Load vX into DT
    /// ```py
    /// DT = vX
    /// ```
    #[inline(always)]
    pub(super) fn store_delay_timer(&mut self, x: Reg) -> Flow {
        self.delay = self.v[x];
        Flow::Next
    }
    /// |`Fx18`| Load vX into ST
    /// ```py
    /// ST = vX;
    /// ```
    #[inline(always)]
    pub(super) fn store_sound_timer(&mut self, x: Reg) -> Flow {
        self.sound = self.v[x];
        Flow::Next
    }
    /// |`Fx1e`| Add vX to I,
    /// ```py
    /// I += vX;
    /// ```
    #[inline(always)]
    pub(super) fn add_i(&mut self, x: Reg) -> Flow {
        self.i = self.i.wrapping_add(self.v[x] as Adr);
        Flow::Next
    }
    /// |`Fx29`| Load sprite for character x into I
    /// ```py
    /// I = sprite(X);
    /// ```
    #[inline(always)]
    pub(super) fn load_sprite(&mut self, x: Reg) -> Flow {
        self.i = FONT_BASE + 5 * self.v[x] as Adr;
        Flow::Next
    }
    /// |`Fx33`| BCD convert X into I`[0..3]`
    #[inline(always)]
    pub(super) fn bcd_convert(&mut self, x: Reg) -> Result<Flow> {
        let x = self.v[x];
        let i = self.i as usize;
        self.mem
            .grab_mut(i..i + 3, i + 2)?
            .copy_from_slice(&[x / 100, x / 10 % 10, x % 10]);
        Ok(Flow::Next)
    }
    /// |`Fx55`| DMA Stor from registers 0..=X to I
    ///
    /// I is left untouched.
    #[inline(always)]
    pub(super) fn store_dma(&mut self, x: Reg) -> Result<Flow> {
        let i = self.i as usize;
        self.mem
            .grab_mut(i..=i + x, i + x)?
            .copy_from_slice(&self.v[..=x]);
        Ok(Flow::Next)
    }
    /// |`Fx65`| DMA Load from I to registers 0..=X
    ///
    /// # Quirk
    /// The COSMAC VIP interpreter uses I to directly index memory,
    /// with the side effect of leaving I as I+X+1 after the transfer is done.
    #[inline(always)]
    pub(super) fn load_dma(&mut self, x: Reg) -> Result<Flow> {
        let i = self.i as usize;
        self.v[..=x].copy_from_slice(self.mem.grab(i..=i + x, i + x)?);
        self.i = self.i.wrapping_add(x as Adr + 1);
        Ok(Flow::Next)
    }
}
