// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Decodes and runs instructions


pub mod behavior;
pub mod flags;
pub mod instruction;
pub mod mem;
pub mod screen;
pub mod stack;

use self::{
    flags::Flags,
    instruction::Insn,
    mem::{Mem, Region::*, FONT_BASE, PROGRAM_BASE},
    screen::Screen,
    stack::Stack,
};
use crate::error::{Error, Result};
use owo_colors::{OwoColorize, Style};

type Reg = usize;
type Adr = u16;
type Nib = u8;

/// How the program counter moves once an instruction has executed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Flow {
    /// Advance to the next instruction (pc += 2)
    Next,
    /// Skip the next instruction (pc += 4)
    Skip,
    /// Set pc to an absolute address
    Jump(Adr),
    /// Leave pc where it is, so the instruction runs again
    Stall,
}

impl Flow {
    #[inline(always)]
    fn skip_if(condition: bool) -> Self {
        if condition {
            Flow::Skip
        } else {
            Flow::Next
        }
    }
}

/// Represents the entire state of the interpreter
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Machine {
    /// Flags that control how the machine behaves, but which aren't inherent to it
    pub flags: Flags,
    // memory
    mem: Mem,
    screen: Screen,
    stack: Stack,
    // registers
    pc: Adr,
    i: Adr,
    v: [u8; 16],
    delay: u8,
    sound: u8,
    // I/O
    keys: [bool; 16],
    redraw: bool,
    beep: bool,
    // Execution data
    cycle: usize,
}

// public interface
impl Machine {
    /// Constructs a new Machine in its reset state, with `rom` loaded at `0x200`
    /// # Examples
    /// ```rust
    /// # use chipvm::prelude::*;
    /// let machine = Machine::new(&[0x00, 0xe0]).unwrap();
    /// assert_eq!(0x200, machine.pc());
    /// assert_eq!(&[0x00, 0xe0], &machine.memory()[0x200..0x202]);
    /// ```
    pub fn new(rom: &[u8]) -> Result<Self> {
        let mut machine = Machine::default();
        machine.load_program(rom)?;
        Ok(machine)
    }

    /// Resets the machine.
    ///
    /// Zeroes memory (then reloads the font at `0x050`), the registers, timers,
    /// stack, keys, screen, redraw flag, and cycle count, and sets pc to `0x200`.
    ///
    /// Does not touch [Flags::trace].
    /// # Examples
    /// ```rust
    /// # use chipvm::prelude::*;
    /// let mut machine = Machine::new(&[0x60, 0x42]).unwrap();
    /// machine.step().unwrap();
    /// machine.reset();
    /// assert_eq!(0x200, machine.pc());
    /// assert_eq!(0, machine.v()[0]);
    /// assert_eq!(0, machine.memory()[0x200]);
    /// ```
    pub fn reset(&mut self) {
        self.flags.keypause = false;
        self.mem.reset();
        self.screen.clear();
        self.stack.clear();
        self.pc = PROGRAM_BASE;
        self.i = 0;
        self.v = [0; 16];
        self.delay = 0;
        self.sound = 0;
        self.keys = [false; 16];
        self.redraw = false;
        self.beep = false;
        self.cycle = 0;
    }

    /// Loads a program from storage into the machine's program space
    pub fn load_program_file(&mut self, rom: impl AsRef<std::path::Path>) -> Result<&mut Self> {
        self.load_program(&std::fs::read(rom)?)
    }

    /// Copies a program image into memory starting at `0x200`.
    ///
    /// Returns [Error::ProgramTooLarge], and leaves memory untouched,
    /// if the image is larger than `0x1000 - 0x200` bytes.
    ///
    /// Does not touch pc, or any other state; [Machine::reset] first to start over.
    /// # Examples
    /// ```rust
    /// # use chipvm::prelude::*;
    /// let mut machine = Machine::default();
    /// machine.load_program(&[0xaa; 0xe00]).unwrap();
    /// machine.load_program(&[0xaa; 0xe01]).expect_err("Program should not fit");
    /// ```
    pub fn load_program(&mut self, rom: &[u8]) -> Result<&mut Self> {
        self.mem.load_region(Program, rom)?;
        Ok(self)
    }

    /// Executes a single instruction, then ticks the timers.
    ///
    /// Returns [Error::OutOfBounds] if pc or any memory access falls outside memory,
    /// [Error::StackOverflow] or [Error::StackUnderflow] on a bad call or return,
    /// [Error::InvalidKey] if a key-skip instruction names a key above `0xF`, and
    /// [Error::UnsupportedOpcode] if the instruction at pc is not documented.
    ///
    /// All of these are fatal: the machine should be reset before stepping again.
    /// # Examples
    /// ```rust
    /// # use chipvm::prelude::*;
    /// let mut machine = Machine::new(&[
    ///     0x00, 0xe0, // cls
    ///     0x12, 0x02, // jp 202 (pc)
    /// ]).unwrap();
    /// machine.step().expect("0x00e0 (cls) should be a valid opcode.");
    /// assert_eq!(0x202, machine.pc());
    /// assert_eq!(1, machine.cycle());
    /// ```
    /// Returns [Error::UnsupportedOpcode] if the instruction is not documented.
    /// ```rust
    /// # use chipvm::prelude::*;
    /// let mut machine = Machine::new(&[
    ///     0xff, 0xff, // invalid!
    /// ]).unwrap();
    /// dbg!(machine.step())
    ///     .expect_err("Should return Error::UnsupportedOpcode { 0xffff }");
    /// ```
    pub fn step(&mut self) -> Result<&mut Self> {
        // fetch
        let word = self.mem.read_word(self.pc as usize)?;
        // decode
        let insn = Insn::from_word(word);
        if self.flags.trace {
            self.trace(word, insn);
        }
        let insn = insn.ok_or(Error::UnsupportedOpcode { word })?;
        // execute
        match self.execute(insn)? {
            Flow::Next => self.pc = self.pc.wrapping_add(2),
            Flow::Skip => self.pc = self.pc.wrapping_add(4),
            Flow::Jump(addr) => self.pc = addr,
            Flow::Stall => {}
        }
        self.tick_timers();
        self.cycle += 1;
        Ok(self)
    }

    /// Copies the state of all 16 keys into the key latches
    /// # Examples
    /// ```rust
    /// # use chipvm::prelude::*;
    /// let mut machine = Machine::default();
    /// let mut keys = [false; 16];
    /// keys[0xa] = true;
    /// machine.set_key_state(&keys);
    /// assert_eq!(&keys, machine.keys());
    /// ```
    pub fn set_key_state(&mut self, keys: &[bool; 16]) {
        self.keys = *keys;
    }

    /// Presses a key, and reports whether the key's state changed.
    /// If key does not exist, returns [Error::InvalidKey].
    ///
    /// # Examples
    /// ```rust
    /// # use chipvm::prelude::*;
    /// let mut machine = Machine::default();
    ///
    /// // press key `7`
    /// let did_press = machine.press(0x7).unwrap();
    /// assert!(did_press);
    ///
    /// // press key `7` again, even though it's already pressed
    /// let did_press = machine.press(0x7).unwrap();
    /// // it was already pressed, so nothing's changed.
    /// assert!(!did_press);
    /// ```
    pub fn press(&mut self, key: usize) -> Result<bool> {
        let keyref = self.keys.get_mut(key).ok_or(Error::InvalidKey { key })?;
        Ok(!std::mem::replace(keyref, true))
    }

    /// Releases a key, and reports whether the key's state changed.
    /// If key is outside range `0..=0xF`, returns [Error::InvalidKey].
    /// # Examples
    /// ```rust
    /// # use chipvm::prelude::*;
    /// let mut machine = Machine::default();
    /// // press key `7`
    /// machine.press(0x7).unwrap();
    /// // release key `7`
    /// let changed = machine.release(0x7).unwrap();
    /// assert!(changed); // key released
    /// // try releasing `7` again
    /// let changed = machine.release(0x7).unwrap();
    /// assert!(!changed); // key was not held
    /// ```
    pub fn release(&mut self, key: usize) -> Result<bool> {
        let keyref = self.keys.get_mut(key).ok_or(Error::InvalidKey { key })?;
        Ok(std::mem::replace(keyref, false))
    }

    /// Gets the key latches
    pub fn keys(&self) -> &[bool; 16] {
        &self.keys
    }

    /// Gets the framebuffer as a row-major slice of 64x32 `0`s and `1`s
    pub fn display(&self) -> &[u8] {
        self.screen.as_slice()
    }

    /// Gets the [Screen]
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Returns true if the screen has been drawn to since the last
    /// [Machine::clear_redraw_flag]
    /// # Examples
    /// ```rust
    /// # use chipvm::prelude::*;
    /// let mut machine = Machine::new(&[0x00, 0xe0]).unwrap();
    /// assert!(!machine.needs_redraw());
    /// machine.step().unwrap();
    /// assert!(machine.needs_redraw());
    /// machine.clear_redraw_flag();
    /// assert!(!machine.needs_redraw());
    /// ```
    pub fn needs_redraw(&self) -> bool {
        self.redraw
    }

    /// Notifies the machine that its screen has been presented
    pub fn clear_redraw_flag(&mut self) {
        self.redraw = false;
    }

    /// Returns true if the last step ticked a non-zero sound timer,
    /// and a tone should be playing
    pub fn beeping(&self) -> bool {
        self.beep
    }

    /// Returns true if the last step polled for a key, and found none
    pub fn awaiting_key(&self) -> bool {
        self.flags.keypause
    }

    /// Sets a general purpose register.
    /// If the register doesn't exist, returns [Error::InvalidRegister]
    /// # Examples
    /// ```rust
    /// # use chipvm::prelude::*;
    /// // Create a new machine, and set v4 to 0x41
    /// let mut machine = Machine::default();
    /// machine.set_v(0x4, 0x41).unwrap();
    /// assert_eq!(0x41, machine.v()[4]);
    /// machine.set_v(0x10, 0x41).expect_err("There are only 16 registers");
    /// ```
    pub fn set_v(&mut self, reg: Reg, value: u8) -> Result<()> {
        let gpr = self.v.get_mut(reg).ok_or(Error::InvalidRegister { reg })?;
        *gpr = value;
        Ok(())
    }

    /// Gets a slice of the entire general purpose registers
    pub fn v(&self) -> &[u8] {
        self.v.as_slice()
    }

    /// Gets the program counter
    /// # Examples
    /// ```rust
    /// # use chipvm::prelude::*;
    /// let machine = Machine::default();
    /// assert_eq!(0x200, machine.pc());
    /// ```
    pub fn pc(&self) -> Adr {
        self.pc
    }

    /// Gets the I register
    pub fn i(&self) -> Adr {
        self.i
    }

    /// Gets the stack pointer
    pub fn sp(&self) -> usize {
        self.stack.sp()
    }

    /// Gets the return addresses on the call stack, oldest first
    pub fn stack(&self) -> &[Adr] {
        self.stack.as_slice()
    }

    /// Gets the value in the Sound Timer register
    pub fn sound(&self) -> u8 {
        self.sound
    }

    /// Gets the value in the Delay Timer register
    pub fn delay(&self) -> u8 {
        self.delay
    }

    /// Gets the number of steps the machine has completed
    pub fn cycle(&self) -> usize {
        self.cycle
    }

    /// Gets the whole of memory
    pub fn memory(&self) -> &[u8] {
        self.mem.as_slice()
    }
}

impl Machine {
    /// Gets the state of a key, or [Error::InvalidKey]
    #[inline(always)]
    fn key(&self, key: usize) -> Result<bool> {
        self.keys
            .get(key)
            .copied()
            .ok_or(Error::InvalidKey { key })
    }

    /// Decrements both timers, flagging a beep when the sound timer was live
    #[inline(always)]
    fn tick_timers(&mut self) {
        self.beep = self.sound > 0;
        self.sound = self.sound.saturating_sub(1);
        self.delay = self.delay.saturating_sub(1);
    }

    /// Prints a one-line trace of the instruction about to execute
    fn trace(&self, word: u16, insn: Option<Insn>) {
        let insn = match insn {
            Some(insn) => insn.style(Style::new().green()).to_string(),
            None => format!("inval  {word:04x}")
                .style(Style::new().bold().red())
                .to_string(),
        };
        std::println!(
            "{:3} {:03x}: {:<36}",
            self.cycle.bright_black(),
            self.pc,
            insn
        );
    }
}

impl Default for Machine {
    /// Constructs a new Machine in its reset state
    ///
    /// | value  | default | description
    /// |--------|---------|------------
    /// | font   |`0x0050` | Location of font memory.
    /// | pc     |`0x0200` | Start location.
    ///
    /// # Examples
    /// ```rust
    /// use chipvm::prelude::*;
    /// let mut machine = Machine::default();
    /// ```
    fn default() -> Self {
        Machine {
            flags: Flags::default(),
            mem: Mem::new(),
            screen: Screen::new(),
            stack: Stack::default(),
            pc: PROGRAM_BASE,
            i: 0,
            v: [0; 16],
            delay: 0,
            sound: 0,
            keys: [false; 16],
            redraw: false,
            beep: false,
            cycle: 0,
        }
    }
}
