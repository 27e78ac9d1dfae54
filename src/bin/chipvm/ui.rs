// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Platform-specific IO/UI code, built on minifb

use chipvm::{
    error::Result,
    io::{Control, Frontend},
    machine::screen::{Screen, HEIGHT, WIDTH},
};
use minifb::*;
use std::{
    io::Write,
    path::{Path, PathBuf},
    time::Instant,
};

#[derive(Clone, Debug)]
pub struct UIBuilder {
    pub width: usize,
    pub height: usize,
    pub name: Option<&'static str>,
    pub rom: Option<PathBuf>,
    pub paused: bool,
    pub window_options: WindowOptions,
}

impl UIBuilder {
    pub fn new(rom: impl AsRef<Path>) -> Self {
        UIBuilder {
            rom: Some(rom.as_ref().to_owned()),
            ..Default::default()
        }
    }
    /// Sets whether the UI starts out paused, to match the runner
    pub fn paused(mut self, paused: bool) -> Self {
        self.paused = paused;
        self
    }
    pub fn build(&self) -> Result<UI> {
        let ui = UI {
            window: Window::new(
                self.name.unwrap_or_default(),
                self.width,
                self.height,
                self.window_options,
            )?,
            keyboard: Default::default(),
            fb: FrameBuffer::new(self.width, self.height),
            rom: self.rom.to_owned().unwrap_or_default(),
            time: Instant::now(),
            paused: self.paused,
            rang: false,
        };
        Ok(ui)
    }
}

impl Default for UIBuilder {
    fn default() -> Self {
        UIBuilder {
            width: WIDTH,
            height: HEIGHT,
            name: Some("chipvm"),
            rom: None,
            paused: false,
            window_options: WindowOptions {
                title: true,
                resize: false,
                scale: Scale::X16,
                scale_mode: ScaleMode::AspectRatioStretch,
                none: true,
                ..Default::default()
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameBufferFormat {
    pub fg: u32,
    pub bg: u32,
}

impl Default for FrameBufferFormat {
    fn default() -> Self {
        FrameBufferFormat {
            fg: 0x00ffffff,
            bg: 0x00000000,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameBuffer {
    buffer: Vec<u32>,
    width: usize,
    height: usize,
    format: FrameBufferFormat,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let format = FrameBufferFormat::default();
        FrameBuffer {
            buffer: vec![format.bg; width * height],
            width,
            height,
            format,
        }
    }
    /// Converts the screen's pixels into window colors
    pub fn blit(&mut self, screen: &Screen) {
        for (out, &pixel) in self.buffer.iter_mut().zip(screen.as_slice()) {
            *out = if pixel != 0 {
                self.format.fg
            } else {
                self.format.bg
            };
        }
    }
    pub fn render(&mut self, window: &mut Window, screen: &Screen) -> Result<()> {
        self.blit(screen);
        window.update_with_buffer(&self.buffer, self.width, self.height)?;
        Ok(())
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new(WIDTH, HEIGHT)
    }
}

#[derive(Debug)]
pub struct UI {
    window: Window,
    keyboard: Vec<Key>,
    fb: FrameBuffer,
    rom: PathBuf,
    time: Instant,
    paused: bool,
    rang: bool,
}

impl UI {
    fn set_title(&mut self) {
        let name = self
            .rom
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let fps = 1.0 / self.time.elapsed().as_secs_f64();
        self.window.set_title(&title(&name, self.paused, fps));
        self.time = Instant::now();
    }
}

impl Frontend for UI {
    fn poll(&mut self, keys: &mut [bool; 16]) -> Result<Control> {
        if !self.window.is_open() {
            return Ok(Control::Quit);
        }
        // minifb only reports keys once the window has been updated
        self.window.update();
        let held = self.window.get_keys();
        let mut control = Control::Run;
        // handle keybinds for the UI, on the frame they're first pressed
        for key in held.iter().filter(|key| !self.keyboard.contains(key)) {
            control = match key {
                Key::Escape => Control::Quit,
                Key::F4 => {
                    eprintln!("Toggled trace.");
                    Control::ToggleTrace
                }
                Key::F5 => {
                    self.paused = !self.paused;
                    eprintln!("{}.", if self.paused { "Paused" } else { "Unpaused" });
                    Control::TogglePause
                }
                Key::F9 => {
                    eprintln!("Reset.");
                    Control::Reset
                }
                _ => continue,
            };
        }
        *keys = [false; 16];
        for key in held.iter().filter_map(|&key| identify_key(key)) {
            keys[key] = true;
        }
        self.keyboard = held;
        self.rang = false;
        self.set_title();
        Ok(control)
    }

    fn render(&mut self, screen: &Screen) -> Result<()> {
        self.fb.render(&mut self.window, screen)
    }

    fn beep(&mut self) {
        // There's no audio device here, so ring the terminal bell, once per frame
        if std::mem::replace(&mut self.rang, true) {
            return;
        }
        // beep() can't report errors, so a failed bell is dropped
        let mut stderr = std::io::stderr();
        stderr.write_all(b"\x07").ok();
        stderr.flush().ok();
    }
}

/// Formats the window title for the running (or paused) ROM
pub fn title(name: &str, paused: bool, fps: f64) -> String {
    if paused {
        format!("chipvm ⏸ {name}")
    } else {
        format!("chipvm ▶ {name} {fps:02.02}")
    }
}

/// Maps the left side of a QWERTY keyboard onto the hexadecimal keypad
///
/// ```text
/// 1 2 3 4      1 2 3 C
/// Q W E R  ->  4 5 6 D
/// A S D F      7 8 9 E
/// Z X C V      A 0 B F
/// ```
pub fn identify_key(key: Key) -> Option<usize> {
    match key {
        Key::Key1 => Some(0x1),
        Key::Key2 => Some(0x2),
        Key::Key3 => Some(0x3),
        Key::Key4 => Some(0xc),
        Key::Q => Some(0x4),
        Key::W => Some(0x5),
        Key::E => Some(0x6),
        Key::R => Some(0xD),
        Key::A => Some(0x7),
        Key::S => Some(0x8),
        Key::D => Some(0x9),
        Key::F => Some(0xE),
        Key::Z => Some(0xA),
        Key::X => Some(0x0),
        Key::C => Some(0xB),
        Key::V => Some(0xF),
        _ => None,
    }
}
