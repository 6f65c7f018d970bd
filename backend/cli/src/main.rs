use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use cardforge_config::CardForgeConfig;
use cardforge_extraction::OpenAiVision;
use cardforge_gateway::{start_server, AppState};
use cardforge_illustration::OpenAiImages;
use cardforge_store::CardStore;
use media::ImageStore;

#[derive(Parser)]
#[command(name = "cardforge")]
#[command(about = "CardForge — business card manager with AI extraction")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the CardForge HTTP server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Show current server status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cardforge_config::config_file_path(&cardforge_config::config_dir());
    let config = cardforge_config::load_and_prepare(&config_path).await?;

    match cli.command {
        Commands::Serve { port } => run_server(config, port).await,
        Commands::Status => {
            let client = reqwest::Client::new();
            match client
                .get(format!("http://localhost:{}/api/health", config.port()))
                .send()
                .await
            {
                Ok(resp) => {
                    let body: serde_json::Value = resp.json().await?;
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                Err(_) => {
                    println!("CardForge is not running on port {}", config.port());
                }
            }
            Ok(())
        }
    }
}

async fn run_server(config: CardForgeConfig, port_override: Option<u16>) -> Result<()> {
    logging::init_logging(config.log_dir(), &config.log_level());

    let port = port_override.unwrap_or_else(|| config.port());
    info!(
        port,
        data_dir = %config.data_dir().display(),
        "Starting CardForge server"
    );

    let api_key = config
        .openai_api_key()
        .context("OpenAI API key is not set (OPENAI_API_KEY env or openai.apiKey in config)")?;

    let extractor = OpenAiVision::new(api_key.clone())
        .with_model(config.vision_model())
        .with_base_url(config.openai_base_url());
    let illustrator = OpenAiImages::new(api_key)
        .with_model(config.image_model())
        .with_base_url(config.openai_base_url());

    let state = AppState {
        cards: Arc::new(CardStore::open(config.cards_file())?),
        images: ImageStore::new(config.image_dir())?,
        extractor: Arc::new(extractor),
        illustrator: Arc::new(illustrator),
        frontend_dir: config.frontend_dir(),
    };

    let addr: SocketAddr = format!("{}:{}", config.host(), port)
        .parse()
        .context("Invalid bind address")?;
    start_server(addr, state).await
}
