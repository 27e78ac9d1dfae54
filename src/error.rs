// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Error type for chipvm

use thiserror::Error;

/// Result type, equivalent to [std::result::Result]<T, [enum@Error]>
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for chipvm.
///
/// [Error::OutOfBounds], [Error::StackOverflow], [Error::StackUnderflow] and
/// [Error::InvalidKey] together make up the out-of-bounds family: an address,
/// stack slot, or key index outside its valid range; see [Error::is_out_of_bounds].
/// Any of these returned from [Machine::step](crate::Machine::step) is fatal.
#[derive(Debug, Error)]
pub enum Error {
    /// Tried to read or write memory outside of `0x000..0x1000`
    #[error("address {addr:04x} is out of bounds")]
    OutOfBounds {
        /// The offending address
        addr: usize,
    },
    /// Tried to call a subroutine with a full call stack
    #[error("stack overflow calling {addr:03x}")]
    StackOverflow {
        /// The subroutine that would have been called
        addr: u16,
    },
    /// Tried to return from a subroutine with an empty call stack
    #[error("stack underflow: return with an empty call stack")]
    StackUnderflow,
    /// Tried to look up a key that doesn't exist
    #[error("tried to access key {key:X} which does not exist")]
    InvalidKey {
        /// The offending key
        key: usize,
    },
    /// Represents an undocumented opcode
    #[error("opcode {word:04x} not supported")]
    UnsupportedOpcode {
        /// The offending word
        word: u16,
    },
    /// The program image doesn't fit in program memory
    #[error("program is {len} bytes, but only {max} bytes of program memory exist")]
    ProgramTooLarge {
        /// Length of the rejected image
        len: usize,
        /// Size of program memory
        max: usize,
    },
    /// Tried to get/set an out-of-bounds register
    #[error("tried to access register v{reg:X} which does not exist")]
    InvalidRegister {
        /// The offending register
        reg: usize,
    },
    /// Error originated in [std::io]
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[cfg(feature = "minifb")]
    /// Error originated in [minifb]
    #[error(transparent)]
    MinifbError(#[from] minifb::Error),
}

impl Error {
    /// Returns true for the out-of-bounds family of errors
    /// # Examples
    /// ```rust
    /// # use chipvm::prelude::*;
    /// assert!(Error::StackUnderflow.is_out_of_bounds());
    /// assert!(!Error::UnsupportedOpcode { word: 0x800f }.is_out_of_bounds());
    /// ```
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(
            self,
            Error::OutOfBounds { .. }
                | Error::StackOverflow { .. }
                | Error::StackUnderflow
                | Error::InvalidKey { .. }
        )
    }
}
