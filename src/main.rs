use anyhow::Result;
use clap::Parser;
use openalex_works_mcp::config::{load_config, Config};
use openalex_works_mcp::mcp::McpServer;
use openalex_works_mcp::OpenAlexClient;
use std::path::PathBuf;
use std::sync::Arc;

/// OpenAlex Works MCP - search and retrieve scholarly works from OpenAlex
#[derive(Parser, Debug)]
#[command(name = "openalex-works-mcp")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "MCP server for searching and retrieving scholarly works from OpenAlex", long_about = None)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv, -vvv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Serve over HTTP/SSE on this address instead of stdio (e.g. 127.0.0.1:3000)
    #[arg(long)]
    http: Option<String>,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // stdout carries the stdio MCP transport; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match cli.config {
        Some(ref path) => load_config(path)?,
        None => Config::from_env(),
    };

    let client = Arc::new(OpenAlexClient::new(&config));
    let server = McpServer::new(client)?;

    match cli.http {
        Some(addr) => {
            let (bound, handle) = server.run_http(&addr).await?;
            tracing::info!("Listening on {}", bound);
            handle.await?;
        }
        None => server.run().await?,
    }

    Ok(())
}
