use std::process::ExitCode;

use crate::cli::run;

pub mod cli;
mod config;
pub mod domain;
pub mod image;
pub mod wav;

fn main() -> ExitCode {
    run()
}
