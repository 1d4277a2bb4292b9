//! Backdrop CLI - run, render, and inspect particle background pages

mod commands;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use commands::{init, inspect, preset, render, run};

#[derive(Parser)]
#[command(name = "backdrop")]
#[command(about = "Animated particle backgrounds for page containers", long_about = None)]
#[command(version)]
struct Cli {
    /// Log more (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a sample page document
    Init {
        /// Page name; writes <name>.toml
        name: String,
    },

    /// Simulate a page headlessly and report per-instance statistics
    Run {
        /// Path to page file
        page: String,

        /// Number of host frames to simulate
        #[arg(long, default_value = "120")]
        frames: u32,

        /// Simulated host frame rate
        #[arg(long, default_value = "60")]
        fps: f64,

        /// Seed for particle placement
        #[arg(long, default_value = "1")]
        seed: u32,

        /// Pointer position in page coordinates (comma-separated x,y)
        #[arg(long, value_parser = parse_vec2)]
        pointer: Option<[f32; 2]>,

        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = parse_format)]
        format: String,
    },

    /// Simulate a page and write PNGs of every overlay plus the composited page
    Render {
        /// Path to page file
        page: String,

        /// Number of host frames to simulate before capturing
        #[arg(long, default_value = "60")]
        frames: u32,

        /// Simulated host frame rate
        #[arg(long, default_value = "60")]
        fps: f64,

        /// Seed for particle placement
        #[arg(long, default_value = "1")]
        seed: u32,

        /// Output directory
        #[arg(short, long, default_value = "render")]
        output: String,

        /// Page background as hex RGB (e.g. 0f172a)
        #[arg(long, default_value = "0f172a", value_parser = parse_hex_color)]
        background: u32,
    },

    /// Show discovered containers and the device assessment without running frames
    Inspect {
        /// Path to page file
        page: String,
    },

    /// Print a preset's configuration as TOML
    Preset {
        /// Preset name (hero, subtle, geometric, floating, default)
        name: String,

        /// Use the mobile particle count
        #[arg(long)]
        mobile: bool,
    },
}

fn parse_vec2(s: &str) -> Result<[f32; 2], String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 2 {
        return Err(format!("expected 2 comma-separated values, got {}", parts.len()));
    }
    let x: f32 = parts[0].trim().parse().map_err(|e| format!("invalid x: {}", e))?;
    let y: f32 = parts[1].trim().parse().map_err(|e| format!("invalid y: {}", e))?;
    Ok([x, y])
}

fn parse_format(s: &str) -> Result<String, String> {
    match s {
        "text" | "json" => Ok(s.to_string()),
        _ => Err(format!("unknown format '{}'; valid values: text, json", s)),
    }
}

fn parse_hex_color(s: &str) -> Result<u32, String> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return Err(format!("expected 6 hex digits, got '{}'", s));
    }
    u32::from_str_radix(hex, 16).map_err(|e| format!("invalid color '{}': {}", s, e))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Init { name } => init::run(&name),
        Commands::Run {
            page,
            frames,
            fps,
            seed,
            pointer,
            format,
        } => run::run(run::RunArgs {
            page,
            frames,
            fps,
            seed,
            pointer,
            format,
        }),
        Commands::Render {
            page,
            frames,
            fps,
            seed,
            output,
            background,
        } => render::run(render::RenderArgs {
            page,
            frames,
            fps,
            seed,
            output,
            background,
        }),
        Commands::Inspect { page } => inspect::run(&page),
        Commands::Preset { name, mobile } => preset::run(&name, mobile),
    }
}
