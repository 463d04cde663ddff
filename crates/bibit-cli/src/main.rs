use anyhow::Result;
use bibit_core::{BibitConfig, BibitError, ExplanationStyle, FeatureInput, RecommenderHandle};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

mod prompt;
mod render;

/// Bibit CLI - Rekomendasi bibit cabai rawit unggul
#[derive(Parser)]
#[command(author, version = bibit_core::VERSION, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// File konfigurasi TOML
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Direktori artefak model (default: pkl)
    #[arg(short, long, value_name = "DIR", global = true)]
    artifacts: Option<PathBuf>,

    /// Gaya penjelasan: technical atau farmer
    #[arg(short, long, global = true)]
    style: Option<ExplanationStyle>,

    /// Aktifkan log debug
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Prediksi satu kali dari argumen
    Predict {
        /// Umur panen cepat (Ya/Tidak)
        #[arg(long)]
        umur: String,

        /// Tanaman tinggi (Ya/Tidak)
        #[arg(long)]
        tinggi: String,

        /// Jumlah daun (Banyak/Sedikit)
        #[arg(long)]
        jumlah_daun: String,

        /// Kondisi daun (Baik/Buruk)
        #[arg(long)]
        kondisi_daun: String,

        /// Output dalam format JSON untuk integrasi
        #[arg(long)]
        json: bool,
    },

    /// Tanya jawab interaktif
    Interactive,

    /// Tampilkan pilihan nilai setiap fitur dan daftar varietas
    Classes,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = BibitConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.artifacts {
        config = config.with_artifacts_dir(dir);
    }
    if let Some(style) = cli.style {
        config = config.with_explanation_style(style);
    }

    let handle = RecommenderHandle::from_config(&config);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Predict {
            umur,
            tinggi,
            jumlah_daun,
            kondisi_daun,
            json,
        } => {
            let input = FeatureInput::new(umur, tinggi, jumlah_daun, kondisi_daun);
            match handle.recommend(&input) {
                Ok(rec) if json => {
                    writeln!(out, "{}", serde_json::to_string_pretty(&rec.view())?)?;
                }
                Ok(rec) => render::recommendation(&mut out, &rec, config.explanation_style)?,
                Err(e) if json => {
                    writeln!(out, "{}", serde_json::json!({ "error": e.to_string() }))?;
                    return Ok(exit_code(&e));
                }
                Err(e) => {
                    render::error(&mut out, &e)?;
                    return Ok(exit_code(&e));
                }
            }
        }
        Commands::Interactive => {
            let recommender = match handle.ready() {
                Ok(recommender) => recommender,
                Err(e) => {
                    writeln!(out, "Gagal memuat model. Pastikan file model ada dan valid.")?;
                    render::error(&mut out, &e)?;
                    return Ok(exit_code(&e));
                }
            };

            render::banner(&mut out)?;
            let stdin = io::stdin();
            let input = prompt::collect(&mut stdin.lock(), &mut out, recommender)?;
            match recommender.recommend(&input) {
                Ok(rec) => render::recommendation(&mut out, &rec, recommender.style())?,
                Err(e) => {
                    render::error(&mut out, &e)?;
                    return Ok(exit_code(&e));
                }
            }
        }
        Commands::Classes => match handle.ready() {
            Ok(recommender) => render::classes(&mut out, recommender)?,
            Err(e) => {
                render::error(&mut out, &e)?;
                return Ok(exit_code(&e));
            }
        },
    }

    Ok(ExitCode::SUCCESS)
}

fn init_tracing(verbose: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_log_level(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(io::stderr)
        .init();
}

fn default_log_level(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

fn exit_code(err: &BibitError) -> ExitCode {
    if err.is_user_error() {
        ExitCode::from(2)
    } else {
        ExitCode::FAILURE
    }
}
