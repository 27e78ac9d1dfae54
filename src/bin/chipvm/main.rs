// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! chipvm: runs a CHIP-8 program in a window

mod ui;

use chipvm::{error::Result, io::Runner};
use gumdrop::*;
use owo_colors::OwoColorize;
use std::{fs::read, path::PathBuf};
use ui::*;

pub fn main() -> Result<()> {
    let options = Arguments::parse_args_default_or_exit();
    let ui = UIBuilder::new(&options.file).paused(options.pause).build()?;
    let mut runner = Runner::new(read(&options.file)?, ui)?
        .speed(options.speed)
        .frame_rate(Some(options.frame_rate))
        .paused(options.pause);
    runner.machine.flags.trace = options.trace;
    // Runs until the window closes, or the machine hits a fatal error
    if let Some(e) = runner.by_ref().find_map(Result::err) {
        eprintln!("{}", e.bold().red());
        if e.is_out_of_bounds() {
            let machine = &runner.machine;
            eprintln!("pc: {:03x}, I: {:03x}, sp: {}", machine.pc(), machine.i(), machine.sp());
        }
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Options, Hash)]
struct Arguments {
    #[options(help = "Load a ROM to run on chipvm.", required, free)]
    pub file: PathBuf,
    #[options(help = "Print this help message.")]
    help: bool,
    #[options(help = "Trace every instruction to stdout.")]
    pub trace: bool,
    #[options(help = "Start paused.")]
    pub pause: bool,
    #[options(help = "Set the instructions-per-frame rate.", default = "10", meta = "IPF")]
    pub speed: usize,
    #[options(help = "Set the target framerate.", default = "60", meta = "FR")]
    pub frame_rate: u64,
}
