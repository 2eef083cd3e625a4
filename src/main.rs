// src/main.rs
use clap::Parser;
use proxy_extractor::edgar::client::DEFAULT_USER_AGENT;
use proxy_extractor::utils::{self, AppError};
use proxy_extractor::{EdgarClient, EdgarConfig, ProxyAnalyzer};

/// Extract disclosure sections from a company's latest SEC proxy statement
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Ticker symbol or CIK of the company
    #[arg(short, long)]
    identifier: String,

    /// Specific SEC accession number (optional, skips filing selection)
    #[arg(short, long)]
    accession_number: Option<String>,

    /// User-Agent sent to EDGAR (falls back to EDGAR_USER_AGENT)
    #[arg(long)]
    user_agent: Option<String>,

    /// Pretty-print the JSON payload
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting processing for args: {:?}", args);

    // 3. Build the EDGAR collaborator
    let mut config = EdgarConfig::default();
    if let Some(user_agent) = args.user_agent {
        config.user_agent = user_agent;
    }
    if config.user_agent == DEFAULT_USER_AGENT {
        tracing::warn!("Using placeholder User-Agent; set --user-agent or EDGAR_USER_AGENT with your contact details");
    }
    if config.user_agent.trim().is_empty() {
        return Err(AppError::Config("User-Agent must not be empty".to_string()));
    }
    let client = EdgarClient::new(config)?;

    // 4. Run the extraction
    let analyzer = ProxyAnalyzer::new(client);
    let result = analyzer
        .analyze_proxy(&args.identifier, args.accession_number.as_deref())
        .await;

    // 5. Emit the payload
    let payload = result.to_json();
    let rendered = if args.pretty {
        serde_json::to_string_pretty(&payload)?
    } else {
        serde_json::to_string(&payload)?
    };
    println!("{}", rendered);

    match result.error() {
        Some(error) => Err(AppError::Processing(error.to_string())),
        None => Ok(()),
    }
}
