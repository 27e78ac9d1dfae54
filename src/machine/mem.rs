// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The [Mem] represents the machine's 4 KiB of memory
//!
//! Every access is bounds-checked, and reports [Error::OutOfBounds] on failure.

use crate::error::{Error, Result};
use std::{ops::Range, slice::SliceIndex};

/// Total size of memory, in bytes
pub const MEM_SIZE: usize = 0x1000;
/// Address of the built-in font
pub const FONT_BASE: u16 = 0x050;
/// Address the program image is loaded at
pub const PROGRAM_BASE: u16 = 0x200;

/// The hexadecimal font, 5 bytes per glyph
#[rustfmt::skip]
pub const FONT: [u8; 16 * 5] = [
    0xf0, 0x90, 0x90, 0x90, 0xf0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xf0, 0x10, 0xf0, 0x80, 0xf0, // 2
    0xf0, 0x10, 0xf0, 0x10, 0xf0, // 3
    0x90, 0x90, 0xf0, 0x10, 0x10, // 4
    0xf0, 0x80, 0xf0, 0x10, 0xf0, // 5
    0xf0, 0x80, 0xf0, 0x90, 0xf0, // 6
    0xf0, 0x10, 0x20, 0x40, 0x40, // 7
    0xf0, 0x90, 0xf0, 0x90, 0xf0, // 8
    0xf0, 0x90, 0xf0, 0x10, 0xf0, // 9
    0xf0, 0x90, 0xf0, 0x90, 0x90, // A
    0xe0, 0x90, 0xe0, 0x90, 0xe0, // B
    0xf0, 0x80, 0x80, 0x80, 0xf0, // C
    0xe0, 0x90, 0x90, 0x90, 0xe0, // D
    0xf0, 0x80, 0xf0, 0x80, 0xf0, // E
    0xf0, 0x80, 0xf0, 0x80, 0x80, // F
];

/// Represents a named region in memory
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Region {
    /// Character ROM (but writable!), `0x050..0x0a0`
    Charset,
    /// Program memory, `0x200..0x1000`
    Program,
}

impl Region {
    /// Gets the address range covered by this [Region]
    /// # Examples
    /// ```rust
    /// # use chipvm::prelude::*;
    /// assert_eq!(0x200..0x1000, Program.range());
    /// assert_eq!(80, Charset.range().len());
    /// ```
    pub fn range(self) -> Range<usize> {
        match self {
            Region::Charset => FONT_BASE as usize..FONT_BASE as usize + FONT.len(),
            Region::Program => PROGRAM_BASE as usize..MEM_SIZE,
        }
    }
}

/// Flat, bounds-checked memory
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mem {
    memory: Vec<u8>,
}

impl Mem {
    /// Constructs a new, zeroed [Mem] with the font loaded into [Region::Charset]
    /// # Examples
    /// ```rust
    /// # use chipvm::prelude::*;
    /// let mem = Mem::new();
    /// assert_eq!(0x1000, mem.as_slice().len());
    /// assert_eq!(Ok(0xf0), mem.read(0x050).map_err(|_| ()));
    /// ```
    pub fn new() -> Self {
        let mut mem = Mem {
            memory: vec![0; MEM_SIZE],
        };
        mem.reset();
        mem
    }

    /// Zeroes all memory, then reloads the font
    pub fn reset(&mut self) -> &mut Self {
        self.memory.fill(0);
        self.memory[Region::Charset.range()].copy_from_slice(&FONT);
        self
    }

    /// Gets a slice of memory, or [Error::OutOfBounds] at `fault` if the index
    /// reaches past the end of memory
    #[inline(always)]
    pub fn grab<I>(&self, index: I, fault: usize) -> Result<&<I as SliceIndex<[u8]>>::Output>
    where
        I: SliceIndex<[u8]>,
    {
        self.memory
            .get(index)
            .ok_or(Error::OutOfBounds { addr: fault })
    }

    /// Gets a mutable slice of memory, or [Error::OutOfBounds] at `fault`
    #[inline(always)]
    pub fn grab_mut<I>(
        &mut self,
        index: I,
        fault: usize,
    ) -> Result<&mut <I as SliceIndex<[u8]>>::Output>
    where
        I: SliceIndex<[u8]>,
    {
        self.memory
            .get_mut(index)
            .ok_or(Error::OutOfBounds { addr: fault })
    }

    /// Reads a single byte
    #[inline(always)]
    pub fn read(&self, addr: usize) -> Result<u8> {
        self.grab(addr, addr).copied()
    }

    /// Reads a big-endian word from `addr` and `addr + 1`
    /// # Examples
    /// ```rust
    /// # use chipvm::prelude::*;
    /// let mut mem = Mem::new();
    /// mem.load_region(Program, &[0x12, 0x34]).unwrap();
    /// assert_eq!(0x1234, mem.read_word(0x200).unwrap());
    /// mem.read_word(0xfff).expect_err("0x1000 is past the end of memory");
    /// ```
    pub fn read_word(&self, addr: usize) -> Result<u16> {
        let hi = self.read(addr)?;
        let lo = self.read(addr + 1)?;
        Ok(u16::from_be_bytes([hi, lo]))
    }

    /// Loads data into the start of a named [Region].
    ///
    /// Returns [Error::ProgramTooLarge] without touching memory
    /// if the data doesn't fit.
    pub fn load_region(&mut self, name: Region, data: &[u8]) -> Result<&mut Self> {
        let range = name.range();
        if data.len() > range.len() {
            return Err(Error::ProgramTooLarge {
                len: data.len(),
                max: range.len(),
            });
        }
        self.memory[range.start..range.start + data.len()].copy_from_slice(data);
        Ok(self)
    }

    /// Gets the whole of memory
    pub fn as_slice(&self) -> &[u8] {
        &self.memory
    }
}

impl Default for Mem {
    fn default() -> Self {
        Self::new()
    }
}
