//! ReelKit CLI: command-line interface for composing short videos.
//!
//! Usage:
//!   reelkit init <NAME>                 Create a new composition
//!   reelkit info <PATH>                 Show composition and layer details
//!   reelkit validate <PATH>             Check every layer invariant
//!   reelkit add <PATH> --type --url     Add a layer from media or a preset
//!   reelkit edit <PATH> <ID> --set k=v  Patch layer fields
//!   reelkit replace <PATH> <ID> <URL>   Swap a layer's media, keeping edits
//!   reelkit delete <PATH> <ID>          Delete a layer (asks first)
//!   reelkit rotate <PATH> <ID>          Rotate 90° or flip a layer
//!   reelkit move <PATH> <ID> <INDEX>    Change a layer's paint order

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "reelkit",
    about = "Frame-accurate layer composition for short videos",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new empty composition
    Init {
        /// Project name
        name: String,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Canvas width in pixels
        #[arg(long)]
        width: Option<u32>,

        /// Canvas height in pixels
        #[arg(long)]
        height: Option<u32>,

        /// Timeline frame rate
        #[arg(long)]
        fps: Option<u32>,

        /// Composition length in seconds
        #[arg(long)]
        duration_secs: Option<u32>,
    },

    /// Show composition information
    Info {
        /// Path to the project directory
        path: PathBuf,
    },

    /// Validate a composition
    Validate {
        /// Path to the project directory
        path: PathBuf,
    },

    /// Add a layer from media or a text preset
    Add {
        /// Path to the project directory
        path: PathBuf,

        /// Media type: video, image, audio, MIME type, or chat|reddit_story|text
        #[arg(short = 't', long = "type")]
        media_type: String,

        /// Media URL (avatar URL for chat bubbles; may be empty for presets)
        #[arg(short, long, default_value = "")]
        url: String,

        /// Display name; used as the text of presets
        #[arg(short, long, default_value = "")]
        name: String,

        /// Frame where the layer starts
        #[arg(long, default_value = "0")]
        at: u32,

        /// Media duration in seconds
        #[arg(long)]
        duration: Option<f64>,
    },

    /// Patch one or more layer fields
    Edit {
        /// Path to the project directory
        path: PathBuf,

        /// Layer id
        id: String,

        /// Field assignment such as `opacity=0.5` or `position=10,20` (repeatable)
        #[arg(short, long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,

        /// Patch given as a JSON object, applied before any --set values
        #[arg(long)]
        json: Option<String>,
    },

    /// Swap a layer's media while keeping its timing, geometry, and style
    Replace {
        /// Path to the project directory
        path: PathBuf,

        /// Layer id
        id: String,

        /// New media URL
        url: String,
    },

    /// Delete a layer
    Delete {
        /// Path to the project directory
        path: PathBuf,

        /// Layer id
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Rotate a layer a quarter turn clockwise
    Rotate {
        /// Path to the project directory
        path: PathBuf,

        /// Layer id
        id: String,

        /// Flip upside-down instead of rotating
        #[arg(long)]
        flip: bool,
    },

    /// Move a layer to a new paint position (0 = bottom)
    Move {
        /// Path to the project directory
        path: PathBuf,

        /// Layer id
        id: String,

        /// Target index in the layer stack
        index: usize,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    reelkit_common::logging::init_logging(&reelkit_common::logging::cli_logging(cli.verbose));

    match cli.command {
        Commands::Init {
            name,
            output,
            width,
            height,
            fps,
            duration_secs,
        } => commands::init::run(name, output, width, height, fps, duration_secs),
        Commands::Info { path } => commands::info::run(path),
        Commands::Validate { path } => commands::validate::run(path),
        Commands::Add {
            path,
            media_type,
            url,
            name,
            at,
            duration,
        } => commands::add::run(path, media_type, url, name, at, duration),
        Commands::Edit { path, id, set, json } => commands::edit::run(path, id, set, json),
        Commands::Replace { path, id, url } => commands::replace::run(path, id, url),
        Commands::Delete { path, id, yes } => commands::delete::run(path, id, yes),
        Commands::Rotate { path, id, flip } => commands::rotate::run(path, id, flip),
        Commands::Move { path, id, index } => commands::reorder::run(path, id, index),
    }
}
