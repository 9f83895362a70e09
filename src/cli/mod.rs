use clap::Parser;
use env_logger::Env;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::config::Config;
use crate::domain::track::TrackInfo;
use crate::image::{ShortPayload, bin::BinAssembler, cue, inputs, output::check_destination};
use crate::wav::HeaderMode;

const BANNER: &str = "Wav2Bin - WAV to BIN/CUE converter";

#[derive(Parser)]
#[command(name = "wav2bin")]
#[command(version = "0.1")]
#[command(about = "Concatenate PCM WAV files into a CD audio BIN image and CUE sheet")]
pub struct Cli {
    /// Path to an optional config TOML file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Read the fixed 44-byte header instead of walking RIFF chunks
    #[arg(long)]
    pub canonical_header: bool,

    /// Fail when a WAV file holds less audio than its header declares
    #[arg(long)]
    pub strict_length: bool,

    /// Write outputs in place instead of renaming them in on success
    #[arg(long)]
    pub no_atomic: bool,

    /// Log every track
    #[arg(short, long)]
    pub verbose: bool,

    /// Output BIN image
    pub bin: PathBuf,

    /// Output CUE sheet
    pub cue: PathBuf,

    /// Input WAV files, or directories of them, in track order
    #[arg(required = true)]
    pub wavs: Vec<PathBuf>,
}

/// Entrypoint for CLI
pub fn run() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version
            if !err.use_stderr() {
                let _ = err.print();
                return ExitCode::SUCCESS;
            }
            println!("{BANNER}");
            let _ = err.print();
            return ExitCode::FAILURE;
        }
    };

    init_logger(cli.verbose);

    match convert(&cli) {
        Ok(tracks) => {
            println!("Conversion completed successfully.");
            for (i, track) in tracks.iter().enumerate() {
                println!("  TRACK {:02}  {}  {}", i + 1, track.start(), track.title);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logger(verbose: bool) {
    let default_filter = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();
}

/// Writes the BIN image, then the cue sheet referencing it
pub fn convert(cli: &Cli) -> anyhow::Result<Vec<TrackInfo>> {
    let cfg = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let mut options = cfg.image_options();
    if cli.canonical_header {
        options.header_mode = HeaderMode::Canonical;
    }
    if cli.strict_length {
        options.short_payload = ShortPayload::Error;
    }
    if cli.no_atomic {
        options.atomic = false;
    }
    log::debug!("image options: {options:?}");

    let wavs = inputs::expand(&cli.wavs)?;
    check_destination(&cli.cue)?;
    let (tracks, bin) = BinAssembler::new(options).assemble(&wavs, &cli.bin)?;

    // the cue references the BIN exactly as it was given
    let cue = cue::emit(&cli.cue, &cli.bin.to_string_lossy(), &tracks, &options)?;

    // both outputs are fully written before either replaces anything
    bin.persist()?;
    cue.persist()?;

    Ok(tracks)
}
