use anyhow::{Context, Result};
use audioguide_core::AttractionRequest;
use audioguide_serve::config::DEFAULT_PORT;
use audioguide_serve::{LOCATION_WARNING, ServerConfig, Settings, serve};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "audioguide")]
#[command(about = "AudioGuide CLI - Generate narrated audio guides for points of interest", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the audio guide API over HTTP
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to (falls back to $PORT, then 8080)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Generate a single audio guide and write it to disk
    Generate {
        /// Name of the attraction
        #[arg(long)]
        name: String,

        /// Category, e.g. "museum" or "monument"
        #[arg(long)]
        category: String,

        #[arg(long, allow_negative_numbers = true)]
        latitude: f64,

        #[arg(long, allow_negative_numbers = true)]
        longitude: f64,

        /// Narration language (defaults to English)
        #[arg(long)]
        language: Option<String>,

        /// Where to write the MP3
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let settings = Settings::from_env().context("Failed to load configuration")?;

    match cli.command {
        Commands::Serve { host, port } => {
            let port = port.or(settings.port).unwrap_or(DEFAULT_PORT);
            serve(ServerConfig { host, port }, settings)
                .await
                .context("Server exited with an error")?;
        }
        Commands::Generate {
            name,
            category,
            latitude,
            longitude,
            language,
            output,
        } => {
            let mut request = AttractionRequest::new(name, category, latitude, longitude);
            request.language = language;
            generate(settings, request, output).await?;
        }
    }

    Ok(())
}

async fn generate(settings: Settings, request: AttractionRequest, output: PathBuf) -> Result<()> {
    let pipeline = settings
        .build_pipeline()
        .context("Failed to set up providers")?;

    log::info!("Generating audio guide for '{}'", request.name);
    let outcome = match pipeline.generate(request).await {
        Ok(outcome) => outcome,
        Err(e) => {
            log::error!("Generation failed: {}", e);
            anyhow::bail!("{} (status {})", e.user_message(), e.status_code());
        }
    };

    if outcome.location_warning {
        eprintln!("Warning: {LOCATION_WARNING}");
    }

    tokio::fs::write(&output, outcome.audio.bytes())
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Wrote {} bytes of {} to {}",
        outcome.audio.len(),
        outcome.audio.content_type(),
        output.display()
    );

    Ok(())
}
