//! Bibit Web Binary
//!
//! Serves the recommendation form and JSON API.
//!
//! # Usage
//! ```bash
//! bibit-web [--config bibit.toml] [--artifacts pkl] [--port 5000] [--host 127.0.0.1] [--verbose]
//! ```

use bibit_core::{BibitConfig, ExplanationStyle};
use bibit_web::WebServer;
use clap::Parser;
use std::path::PathBuf;

/// Bibit Web - Rekomendasi bibit cabai rawit unggul lewat browser
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory holding the model artifacts
    #[arg(short, long, value_name = "DIR")]
    artifacts: Option<PathBuf>,

    /// Port to listen on (default: 5000)
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to (default: 127.0.0.1)
    #[arg(long)]
    host: Option<String>,

    /// Explanation style: technical or farmer
    #[arg(short, long)]
    style: Option<ExplanationStyle>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    let mut config = BibitConfig::load(args.config.as_deref())?;
    if let Some(dir) = args.artifacts {
        config = config.with_artifacts_dir(dir);
    }
    if let Some(host) = args.host {
        config = config.with_host(host);
    }
    if let Some(port) = args.port {
        config = config.with_port(port);
    }
    if let Some(style) = args.style {
        config = config.with_explanation_style(style);
    }

    print_banner(&config);

    let server = WebServer::new(config);
    server.start().await?;

    Ok(())
}

fn print_banner(config: &BibitConfig) {
    println!();
    println!("========================================");
    println!("SISTEM REKOMENDASI BIBIT CABAI UNGGUL");
    println!("========================================");
    println!();
    println!("🌶  http://{}:{}", config.server.host, config.server.port);
    println!("   ├─ GET  /             Form input");
    println!("   ├─ POST /api/predict  JSON API");
    println!("   └─ GET  /health       Health check");
    println!();
    println!("📦 Artefak model: {}", config.artifacts.dir.display());
    println!();
}
