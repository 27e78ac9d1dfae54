// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The fixed-depth subroutine call stack

use super::Adr;
use crate::error::{Error, Result};

/// Maximum nesting depth of subroutine calls
pub const STACK_DEPTH: usize = 16;

/// A fixed array of return addresses, and a pointer to the next free slot
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stack {
    slots: [Adr; STACK_DEPTH],
    sp: usize,
}

impl Stack {
    /// Pushes a return address, or returns [Error::StackOverflow] when full.
    ///
    /// `target` is only used to report the failed call.
    /// # Examples
    /// ```rust
    /// # use chipvm::prelude::*;
    /// let mut stack = Stack::default();
    /// for _ in 0..16 {
    ///     stack.push(0x200, 0x300).unwrap();
    /// }
    /// stack.push(0x200, 0x300).expect_err("Stack should be full");
    /// assert_eq!(16, stack.sp());
    /// ```
    pub fn push(&mut self, addr: Adr, target: Adr) -> Result<()> {
        let slot = self
            .slots
            .get_mut(self.sp)
            .ok_or(Error::StackOverflow { addr: target })?;
        *slot = addr;
        self.sp += 1;
        Ok(())
    }

    /// Pops a return address, or returns [Error::StackUnderflow] when empty
    pub fn pop(&mut self) -> Result<Adr> {
        self.sp = self.sp.checked_sub(1).ok_or(Error::StackUnderflow)?;
        Ok(self.slots[self.sp])
    }

    /// Gets the stack pointer (the number of addresses on the stack)
    pub fn sp(&self) -> usize {
        self.sp
    }

    /// Gets the live portion of the stack, oldest first
    pub fn as_slice(&self) -> &[Adr] {
        &self.slots[..self.sp]
    }

    /// Empties the stack
    pub fn clear(&mut self) {
        self.slots = [0; STACK_DEPTH];
        self.sp = 0;
    }
}
