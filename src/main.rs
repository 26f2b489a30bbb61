//! # Lottie Editor CLI
//!
//! Command line front end for the `lottie-core` editing engine.
//!
//! ## Commands
//! - `eval`: Sample a property at a frame
//! - `keyframe`: Set a keyframe, promoting a static property
//! - `toggle`: Flip a property between static and animated
//! - `svg`: Parse SVG path data into vertex paths
//! - `convert`: Replace a rectangle, ellipse or star with a path
//! - `add`: Insert a template layer
//! - `preset`: Apply an animation preset to a layer
//! - `pack`: Write a document as dotLottie entries

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lottie-editor")]
#[command(about = "Inspect and edit Lottie animations")]
#[command(version)]
struct Cli {
    /// Editor settings (JSON); missing fields keep their defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample a property at a frame
    Eval {
        /// Lottie JSON file
        file: PathBuf,

        #[arg(short, long)]
        layer: u64,

        /// Dotted property path, e.g. "ks.p" or "shapes.0.it.1.s"
        #[arg(short, long)]
        path: String,

        #[arg(short, long, default_value = "0")]
        time: f32,
    },

    /// Set a keyframe, promoting a static property first
    Keyframe {
        file: PathBuf,

        #[arg(short, long)]
        layer: u64,

        #[arg(short, long)]
        path: String,

        #[arg(short, long)]
        time: f32,

        /// JSON value: a number, an array or a path object
        #[arg(short, long)]
        value: String,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Flip a property between static and animated
    Toggle {
        file: PathBuf,

        #[arg(short, long)]
        layer: u64,

        #[arg(short, long)]
        path: String,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse SVG path data and print the vertex paths as JSON
    Svg {
        /// Path data, e.g. "M0,0 C25,0 75,100 100,100"
        d: String,
    },

    /// Replace a parametric shape with an equivalent path
    Convert {
        file: PathBuf,

        #[arg(short, long)]
        layer: u64,

        /// Shape index, e.g. "0.1" for the second item of the first group
        #[arg(short, long)]
        shape: String,

        #[arg(short, long, default_value = "0")]
        time: f32,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Insert a template layer: "rectangle", "ellipse", "star", "polygon"
    Add {
        file: PathBuf,

        template: String,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Apply a preset: "draw-in", "scale-in", "fade-in"
    Preset {
        file: PathBuf,

        #[arg(short, long)]
        layer: u64,

        preset: String,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write the document as dotLottie entries under a directory
    Pack {
        file: PathBuf,

        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("lottie_editor=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Eval {
            file,
            layer,
            path,
            time,
        } => commands::eval(&file, layer, &path, time, config),
        Commands::Keyframe {
            file,
            layer,
            path,
            time,
            value,
            output,
        } => commands::keyframe(&file, layer, &path, time, &value, output.as_deref(), config),
        Commands::Toggle {
            file,
            layer,
            path,
            output,
        } => commands::toggle(&file, layer, &path, output.as_deref(), config),
        Commands::Svg { d } => commands::svg(&d),
        Commands::Convert {
            file,
            layer,
            shape,
            time,
            output,
        } => commands::convert(&file, layer, &shape, time, output.as_deref(), config),
        Commands::Add {
            file,
            template,
            output,
        } => commands::add(&file, &template, output.as_deref(), config),
        Commands::Preset {
            file,
            layer,
            preset,
            output,
        } => commands::preset(&file, layer, &preset, output.as_deref(), config),
        Commands::Pack { file, output } => commands::pack(&file, &output),
    }
}
