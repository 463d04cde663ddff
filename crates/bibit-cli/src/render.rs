//! Terminal rendering of recommendations and errors

use anyhow::Result;
use bibit_core::{BibitError, ExplanationStyle, Feature, Recommendation, Recommender};
use colored::Colorize;
use std::io::Write;

pub const BANNER_TITLE: &str = "SISTEM REKOMENDASI BIBIT CABAI UNGGUL";

pub fn banner(out: &mut impl Write) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "=".repeat(40))?;
    writeln!(out, "{}", BANNER_TITLE.bold())?;
    writeln!(out, "{}", "=".repeat(40))?;
    Ok(())
}

/// Human-readable result, most likely variety first
pub fn recommendation(
    out: &mut impl Write,
    rec: &Recommendation,
    style: ExplanationStyle,
) -> Result<()> {
    let view = rec.view();

    writeln!(out)?;
    writeln!(out, "🔍 HASIL REKOMENDASI:")?;
    writeln!(
        out,
        "Bibit terbaik: {} ({})",
        view.recommendation.green().bold(),
        view.probability
    )?;

    writeln!(out)?;
    writeln!(out, "📊 Analisis Keputusan:")?;
    for sentence in &view.explanations {
        writeln!(out, "- {sentence}")?;
    }
    if let Some(remark) = style.closing_remark() {
        writeln!(out, "- {remark}")?;
    }

    writeln!(out)?;
    writeln!(out, "Probabilitas Lengkap:")?;
    for (label, percent) in &view.details {
        writeln!(out, "- {label}: {percent}")?;
    }
    Ok(())
}

/// Error message plus what the user can do about it
pub fn error(out: &mut impl Write, err: &BibitError) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{} {}", "Error:".red().bold(), err)?;
    if err.is_model_unavailable() {
        writeln!(out)?;
        writeln!(out, "⚠️ Solusi:")?;
        writeln!(out, "- Pastikan model telah dilatih dengan data yang benar")?;
        writeln!(out, "- Cek konsistensi nilai input dengan data training")?;
    }
    Ok(())
}

/// Label sets of every feature and the target varieties
pub fn classes(out: &mut impl Write, recommender: &Recommender) -> Result<()> {
    for feature in Feature::ALL {
        writeln!(
            out,
            "{:<14} {}",
            feature.name().bold(),
            recommender.classes_of(feature).join(", ")
        )?;
    }
    writeln!(
        out,
        "{:<14} {}",
        "varietas".bold(),
        recommender.target_classes().join(", ")
    )?;
    Ok(())
}
