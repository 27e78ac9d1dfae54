// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Stores and displays the machine's 64x32 monochrome framebuffer

use std::fmt::{Display, Formatter};

/// Width of the screen, in pixels
pub const WIDTH: usize = 64;
/// Height of the screen, in pixels
pub const HEIGHT: usize = 32;

/// A 64x32 grid of 1-bit pixels, stored row-major as one byte per pixel (`0` or `1`)
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Screen {
    pixels: Vec<u8>,
}

impl Screen {
    /// Constructs a new, blank screen
    pub fn new() -> Self {
        Screen {
            pixels: vec![0; WIDTH * HEIGHT],
        }
    }

    /// Turns every pixel off
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Gets the pixel at (x, y), wrapping both coordinates around the edges
    /// # Examples
    /// ```rust
    /// # use chipvm::prelude::*;
    /// let mut screen = Screen::new();
    /// screen.toggle(3, 1);
    /// assert!(screen.pixel(3, 1));
    /// assert!(screen.pixel(67, 33));
    /// ```
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.pixels[Self::index(x, y)] != 0
    }

    /// XORs the pixel at (x, y), wrapping both coordinates around the edges.
    ///
    /// Returns true if the pixel was lit before it was toggled (a collision).
    pub fn toggle(&mut self, x: usize, y: usize) -> bool {
        let pixel = &mut self.pixels[Self::index(x, y)];
        let collision = *pixel != 0;
        *pixel ^= 1;
        collision
    }

    /// Gets the framebuffer as a row-major slice of `0`s and `1`s
    pub fn as_slice(&self) -> &[u8] {
        &self.pixels
    }

    /// Iterates over the rows of the framebuffer, top to bottom
    pub fn rows(&self) -> std::slice::ChunksExact<'_, u8> {
        self.pixels.chunks_exact(WIDTH)
    }

    /// Returns true if no pixels are lit
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|&p| p == 0)
    }

    #[inline(always)]
    fn index(x: usize, y: usize) -> usize {
        (y % HEIGHT) * WIDTH + (x % WIDTH)
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for Screen {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (y, row) in self.rows().enumerate() {
            write!(f, "{y:02}|")?;
            for &pixel in row {
                write!(f, "{}", if pixel != 0 { '█' } else { ' ' })?;
            }
            writeln!(f, "|")?;
        }
        Ok(())
    }
}
