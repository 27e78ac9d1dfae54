// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! This crate implements the CHIP-8 interpreter as a small virtual machine:
//! one owned [Machine] holding memory, registers, timers, stack, key latches and
//! a monochrome framebuffer, advanced one instruction at a time.
//!
//! Rendering, input, and sound are left to a [Frontend](io::Frontend),
//! which a [Runner](io::Runner) drives one frame at a time.

pub mod error;
pub mod io;
pub mod machine;

pub use error::{Error, Result};
pub use machine::Machine;

/// Common imports for chipvm
pub mod prelude {
    use super::*;
    pub use error::{Error, Result};
    pub use io::{Control, Frontend, Runner};
    pub use machine::{
        flags::Flags,
        instruction::Insn,
        mem::{Mem, Region, Region::*},
        screen::Screen,
        stack::Stack,
        Machine,
    };
}
