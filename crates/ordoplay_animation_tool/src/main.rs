// SPDX-License-Identifier: MIT OR Apache-2.0
//! # OrdoPlay Animation Tool
//!
//! Loads, inspects and edits scene animation files from the command line.
//!
//! ## Commands
//! - `info`: Summarize the tracks of a file
//! - `sample`: Print interpolated values at a time
//! - `new`: Create an empty scene animation
//! - `key`: Insert a keyframe into a variable track
//! - `play`: Drive a controller and print the camera pose per frame

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use ordoplay_animation::{PlaybackSettings, VarKind};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "ordoplay_anim")]
#[command(about = "Inspect and edit OrdoPlay scene animations")]
#[command(version)]
struct Cli {
    /// Playback settings file (.ron)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize the tracks of an animation file
    Info {
        /// Scene animation file (.json)
        file: PathBuf,
    },

    /// Print interpolated values at a time
    Sample {
        /// Scene animation file (.json)
        file: PathBuf,

        /// Time in seconds
        #[arg(short, long)]
        time: f32,

        /// Only print this track ("Camera", "Subtitles" or a variable name)
        #[arg(long)]
        track: Option<String>,
    },

    /// Create an empty scene animation
    New {
        /// Output file (.json)
        file: PathBuf,

        /// Start of the time span
        #[arg(long, default_value = "0")]
        start: f32,

        /// End of the time span
        #[arg(long)]
        end: f32,
    },

    /// Insert a keyframe into a variable track, creating the track if needed
    Key {
        /// Scene animation file (.json)
        file: PathBuf,

        /// Variable name
        #[arg(long)]
        track: String,

        /// Value type of the variable
        #[arg(long, value_enum)]
        kind: KindArg,

        /// Keyframe time in seconds
        #[arg(long)]
        time: f32,

        /// Keyframe value: "1.5", "x,y,z" or "true"
        #[arg(long, allow_hyphen_values = true)]
        value: String,
    },

    /// Play an animation and print the camera pose per frame
    Play {
        /// Scene animation file (.json)
        file: PathBuf,

        /// Seconds per frame
        #[arg(long, default_value = "0.1")]
        dt: f32,

        /// Number of frames
        #[arg(long, default_value = "10")]
        frames: u32,
    },
}

/// Value type accepted on the command line
#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Float,
    Vector3,
    Bool,
}

impl From<KindArg> for VarKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Float => VarKind::Float,
            KindArg::Vector3 => VarKind::Vector3,
            KindArg::Bool => VarKind::Bool,
        }
    }
}

fn main() -> ExitCode {
    let env_filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> commands::Result<()> {
    let settings = match &cli.settings {
        Some(path) => PlaybackSettings::load(path)?,
        None => PlaybackSettings::default(),
    };

    match cli.command {
        Commands::Info { file } => commands::info(&file),
        Commands::Sample { file, time, track } => commands::sample(&file, time, track.as_deref()),
        Commands::New { file, start, end } => commands::new(&file, start, end),
        Commands::Key {
            file,
            track,
            kind,
            time,
            value,
        } => commands::key(&file, &track, kind.into(), time, &value),
        Commands::Play { file, dt, frames } => commands::play(&file, settings, dt, frames),
    }
}
