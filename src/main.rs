use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use studyguide_lib::{Config, GenerationOptions, GenerationRequest, SourceKind};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "studyguide",
    version,
    about = "Generate a study guide for a topic"
)]
struct Cli {
    /// Topic to study
    topic: String,

    /// Preferred content source
    #[arg(long, value_enum, default_value_t = SourceArg::Encyclopedic)]
    source: SourceArg,

    #[arg(long)]
    no_questions: bool,

    #[arg(long)]
    no_videos: bool,

    /// TOML configuration file (defaults to $STUDYGUIDE_CONFIG)
    #[arg(long, env = "STUDYGUIDE_CONFIG")]
    config: Option<PathBuf>,

    /// Print single-line JSON
    #[arg(long)]
    compact: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum SourceArg {
    Demo,
    Encyclopedic,
    Generative,
    Chat,
}

impl From<SourceArg> for SourceKind {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Demo => SourceKind::Demo,
            SourceArg::Encyclopedic => SourceKind::Encyclopedic,
            SourceArg::Generative => SourceKind::Generative,
            SourceArg::Chat => SourceKind::Chat,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let orchestrator = studyguide_lib::orchestrator(&config)?;

    let options = GenerationOptions {
        include_practice_questions: !cli.no_questions,
        include_videos: !cli.no_videos,
    };
    let request = GenerationRequest::new(&cli.topic, cli.source.into(), options)?;
    let generation = orchestrator.generate_traced(&request).await?;

    info!(
        request_id = %generation.request_id,
        served_by = %generation.served_by,
        "Done"
    );

    let json = if cli.compact {
        serde_json::to_string(&generation.document)?
    } else {
        serde_json::to_string_pretty(&generation.document)?
    };
    println!("{}", json);
    Ok(())
}
