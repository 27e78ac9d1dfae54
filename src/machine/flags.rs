//! Represents flags that aid in operation, but aren't part of the machine's state

/// Represents flags that aid in operation, but aren't inherent to the machine
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Flags {
    /// Set when trace mode (live disassembly of every step) is enabled
    pub trace: bool,
    /// Set while the machine is polling for a keypress (`Fx0A`)
    pub keypause: bool,
}

impl Flags {
    /// Toggles trace mode
    ///
    /// # Examples
    /// ```rust
    /// # use chipvm::prelude::*;
    /// let mut machine = Machine::default();
    /// assert_eq!(false, machine.flags.trace);
    /// // Toggle trace mode
    /// machine.flags.trace();
    /// assert_eq!(true, machine.flags.trace);
    /// ```
    pub fn trace(&mut self) {
        self.trace = !self.trace
    }
}
