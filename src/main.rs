mod core;
mod shared;
mod ui;
mod utils;
mod video;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::core::runner;
use crate::core::RunSummary;
use crate::shared::constants;
use crate::video::{FrameSource, VideoSource};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pixelate a video non-interactively
    Pixelate {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// Pixelation level (5 = chunky, 50 = mild)
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        level: u32,
        /// Four-character encoding tag for the output
        #[arg(short, long, default_value = constants::DEFAULT_CODEC)]
        codec: String,
    },
    /// Pick input, level and output interactively
    Menu,
    /// Print container properties of a video as JSON
    Info {
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    crate::utils::logger::init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Pixelate {
            input,
            output,
            level,
            codec,
        } => {
            let summary = runner::pixelate_video(input, output, *level, codec)?;
            print_summary(&summary);
        }
        Commands::Menu => {
            let Some(selection) = crate::ui::menu::run_menu()? else {
                println!("❌ Cancelled. No video was processed.");
                return Ok(());
            };

            let summary = runner::pixelate_video(
                &selection.input,
                &selection.output,
                selection.level,
                constants::DEFAULT_CODEC,
            )?;
            print_summary(&summary);
        }
        Commands::Info { input } => {
            let mut source = VideoSource::open(input)?;
            println!("{}", serde_json::to_string_pretty(&source.props())?);
            source.release()?;
        }
    }

    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!(
        "✅ Done! Pixelated video saved as: {} ({} frames processed)",
        summary.output.display(),
        summary.frames_written
    );
}
