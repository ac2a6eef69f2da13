mod classifier;
mod config;
mod error;
mod gemini;
mod llm_client;
mod logging;
mod model_checks;
mod models;
mod request_id;
mod router;

use clap::Parser;
use config::Config;
use gemini::GeminiGenerationConfig;
use llm_client::GeminiClient;
use router::AppState;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{Level, info};

#[derive(Parser, Debug)]
#[command(name = "genai-tester-relay")]
#[command(about = "HTTP relay between the Gen AI Tester front end and a hosted Gemini model")]
struct Args {
    #[arg(short, long, default_value = "0.0.0.0")]
    ip: String,

    #[arg(short, long, default_value = "8000")]
    port: u16,

    /// Path to config file; built-in defaults when omitted
    #[arg(short, long)]
    config: Option<String>,

    /// trace, debug, info, warn, error
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Also write logs to this file (rotated at 10 MiB)
    #[arg(long)]
    log_file: Option<String>,

    /// socks and http proxy, example: socks5://192.168.0.2:10080
    #[arg(long)]
    proxy: Option<String>,

    /// Send one probe request to the model and exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional; a real environment variable wins
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let log_level = Level::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using INFO level.", args.log_level);
        Level::INFO
    });
    logging::init_logging(log_level, args.log_file.as_deref())?;

    let config = Config::load(args.config.as_deref())?;
    match &args.config {
        Some(path) => info!("Configuration loaded from: {}", path),
        None => info!("No config file given, using defaults"),
    }
    let api_key = config.api_key()?;

    let client_builder = reqwest::Client::builder();
    let client_builder = match &args.proxy {
        Some(proxy) => client_builder.proxy(reqwest::Proxy::all(proxy)?),
        None => client_builder,
    };
    let http_client = Arc::new(client_builder.build()?);

    if args.check {
        let probe = GeminiClient::new(http_client, &config, api_key).with_generation_config(Some(
            GeminiGenerationConfig { temperature: Some(0.0), max_output_tokens: Some(1) },
        ));
        let ok = model_checks::perform_model_check(&probe).await;
        std::process::exit(if ok { 0 } else { 1 });
    }

    let model = Arc::new(GeminiClient::new(http_client, &config, api_key));
    info!(
        "Model: {}, image parts: {}, system instruction: {}",
        config.model_id(),
        config.chat.supports_image_parts,
        config.chat.system_instruction.is_some()
    );

    let app_state = AppState { config: Arc::new(config), model };
    let app = router::app(app_state);

    let bind_address = format!("{}:{}", args.ip, args.port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Server started on http://{}", bind_address);

    axum::serve(listener, app).await?;
    Ok(())
}
