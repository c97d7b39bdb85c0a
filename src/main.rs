use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fashion_social_toolkit::app::App;
use fashion_social_toolkit::report;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "fashion-social-toolkit")]
#[command(about = "AI-powered captions and mood scores for fashion photos")]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate an Instagram caption for a fashion photo.
    Caption {
        /// PNG or JPEG photo.
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// Style or mood, e.g. "elegant evening wear" or "bohemian chic".
        #[arg(short, long)]
        style: String,
    },
    /// Score an outfit photo against the six mood categories.
    Mood {
        /// PNG or JPEG photo.
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// Print the score map as JSON instead of a chart.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fashion_social_toolkit=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    let app = match App::new() {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };

    match run(&app, args.command).await {
        Ok(output) => {
            print!("{}", output);
            Ok(())
        }
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(1);
        }
    }
}

async fn run(app: &App, command: Command) -> Result<String> {
    match command {
        Command::Caption { image, style } => {
            let bytes = read_image(&image).await?;
            let caption = app.caption(bytes, &style).await?;
            info!("Caption ready");
            Ok(report::render_caption(&caption))
        }
        Command::Mood { image, json } => {
            let bytes = read_image(&image).await?;
            let analysis = app.mood(bytes).await?;
            info!("Mood analysis completed");
            if json {
                Ok(format!("{}\n", serde_json::to_string_pretty(&analysis.scores)?))
            } else {
                Ok(report::render_mood_report(&analysis))
            }
        }
    }
}

async fn read_image(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read image {}", path.display()))
}
