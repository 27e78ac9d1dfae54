// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The seam between a [Machine] and the outside world
//!
//! A [Frontend] supplies key state and presents the screen; a [Runner] owns
//! the machine and paces it, one frame at a time.

use crate::{
    error::Result,
    machine::{screen::Screen, Machine},
};
use std::time::{Duration, Instant};

/// What the [Frontend] wants the [Runner] to do this frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Control {
    /// Carry on
    #[default]
    Run,
    /// Pause or unpause execution
    TogglePause,
    /// Enable or disable the per-step trace
    ToggleTrace,
    /// Reset the machine, and reload the program
    Reset,
    /// Stop running
    Quit,
}

/// Platform-specific rendering, input, and sound
pub trait Frontend {
    /// Polls the input device, and writes the state of all 16 keys into `keys`
    fn poll(&mut self, keys: &mut [bool; 16]) -> Result<Control>;
    /// Presents the screen
    fn render(&mut self, screen: &Screen) -> Result<()>;
    /// Called once for every step that ticks a non-zero sound timer.
    ///
    /// Must not block.
    fn beep(&mut self) {}
}

/// Drives a [Machine] with a [Frontend], at a fixed number of steps per frame
#[derive(Debug)]
pub struct Runner<F: Frontend> {
    /// The machine being run
    pub machine: Machine,
    /// The front end that supplies input and presents output
    pub frontend: F,
    /// Number of steps to run every frame
    pub speed: usize,
    /// Target frames per second, or [None] to run as fast as possible
    pub frame_rate: Option<u64>,
    /// Set while execution is paused. Input and rendering carry on.
    pub pause: bool,
    rom: Vec<u8>,
    keys: [bool; 16],
    ft: Instant,
    halted: bool,
}

impl<F: Frontend> Runner<F> {
    /// Constructs a new [Runner], loading `rom` into a freshly reset [Machine]
    ///
    /// Defaults to 10 steps per frame, at 60 frames per second.
    pub fn new(rom: Vec<u8>, frontend: F) -> Result<Self> {
        Ok(Runner {
            machine: Machine::new(&rom)?,
            frontend,
            speed: 10,
            frame_rate: Some(60),
            pause: false,
            rom,
            keys: [false; 16],
            ft: Instant::now(),
            halted: false,
        })
    }

    /// Sets the number of steps per frame
    pub fn speed(mut self, speed: usize) -> Self {
        self.speed = speed;
        self
    }

    /// Sets the target frame rate
    pub fn frame_rate(mut self, frame_rate: Option<u64>) -> Self {
        self.frame_rate = frame_rate;
        self
    }

    /// Sets whether the runner starts paused
    pub fn paused(mut self, pause: bool) -> Self {
        self.pause = pause;
        self
    }

    /// Resets the machine, and reloads the program
    pub fn reset(&mut self) -> Result<()> {
        self.machine.reset();
        self.machine.load_program(&self.rom)?;
        self.frontend.render(self.machine.screen())
    }

    /// Runs a single frame:
    /// 1. Polls the [Frontend], and latches the keys
    /// 2. Runs [Runner::speed] steps, unless paused
    /// 3. Renders the screen, if it changed
    ///
    /// Returns `Ok(false)` when the [Frontend] asks to quit.
    pub fn frame(&mut self) -> Result<bool> {
        match self.frontend.poll(&mut self.keys)? {
            Control::Run => {}
            Control::TogglePause => self.pause = !self.pause,
            Control::ToggleTrace => self.machine.flags.trace(),
            Control::Reset => self.reset()?,
            Control::Quit => return Ok(false),
        }
        self.machine.set_key_state(&self.keys);
        if !self.pause {
            for _ in 0..self.speed {
                self.machine.step()?;
                if self.machine.beeping() {
                    self.frontend.beep();
                }
            }
        }
        if self.machine.needs_redraw() {
            self.frontend.render(self.machine.screen())?;
            self.machine.clear_redraw_flag();
        }
        Ok(true)
    }

    fn wait_for_next_frame(&mut self) {
        if let Some(rate) = self.frame_rate.filter(|&rate| rate > 0) {
            let rate = Duration::from_nanos(1_000_000_000 / rate + 1);
            std::thread::sleep(rate.saturating_sub(self.ft.elapsed()));
            self.ft += rate;
        }
    }
}

impl<F: Frontend> Iterator for Runner<F> {
    type Item = Result<()>;

    /// Waits for, then runs, the next frame.
    ///
    /// Errors are fatal: one is yielded, and iteration stops.
    fn next(&mut self) -> Option<Self::Item> {
        if self.halted {
            return None;
        }
        self.wait_for_next_frame();
        match self.frame() {
            Ok(true) => Some(Ok(())),
            Ok(false) => {
                self.halted = true;
                None
            }
            Err(e) => {
                self.halted = true;
                Some(Err(e))
            }
        }
    }
}
