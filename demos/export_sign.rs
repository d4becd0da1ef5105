//! Signcraft export demo: builds a small sign and writes STL + SVG files.
//!
//! Usage:
//! ```text
//! cargo run --example export_sign                       # writes into ./target/signcraft
//! cargo run --example export_sign -- outline.json       # extrude an outline JSON file
//! cargo run --example export_sign -- outline.json out/  # choose the output directory
//! ```
//!
//! The outline file follows the `{ "paths": [...], "bounds": {...} }` contract.
//! Settings are read from `SIGN_SETTINGS` (a JSON string) when set.

use std::path::PathBuf;

use signcraft::export::SvgExportOptions;
use signcraft::{Color, Outline, OutlineBounds, PathRecord, SignSettings, SignStudio};

/// A hollow letter "O" next to a curved "D", in Y-down authoring coordinates.
fn sample_outline() -> Outline {
    Outline::new(
        vec![
            PathRecord::new("M0 0 L40 0 L40 60 L0 60 Z M10 10 L10 50 L30 50 L30 10 Z"),
            PathRecord::new("M50 0 L65 0 C85 0 95 15 95 30 C95 45 85 60 65 60 L50 60 Z"),
        ],
        Some(OutlineBounds::new(0.0, 0.0, 95.0, 60.0)),
    )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Default: WARN for everything, INFO for signcraft.
    // Override with RUST_LOG env var (e.g. RUST_LOG=signcraft=debug).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("signcraft=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let mut args = std::env::args().skip(1);
    let outline = match args.next() {
        Some(path) => Outline::from_json(&std::fs::read_to_string(path)?)?,
        None => sample_outline(),
    };
    let out_dir = args
        .next()
        .map_or_else(|| PathBuf::from("target/signcraft"), PathBuf::from);

    let settings = match std::env::var("SIGN_SETTINGS") {
        Ok(json) => SignSettings::from_json(&json)?,
        Err(_) => SignSettings::default(),
    };

    let mut studio = SignStudio::new(settings)?;
    let model = studio.regenerate(outline)?;
    if let Some(framing) = model.framing() {
        tracing::info!(
            distance = framing.distance,
            "preview camera at {:?}",
            framing.eye
        );
    }

    std::fs::create_dir_all(&out_dir)?;

    let stl = studio.export_stl()?;
    std::fs::write(out_dir.join("sign.stl"), &stl)?;
    std::fs::write(out_dir.join("sign-ascii.stl"), studio.export_stl_ascii()?)?;

    let svg = studio.export_svg(&SvgExportOptions {
        stroke_override: Some((Color::BLACK, 20.0)),
    });
    match svg {
        Ok(svg) => std::fs::write(out_dir.join("sign.svg"), svg)?,
        Err(e) if e.is_nothing_to_export() => tracing::warn!("no outline to export"),
        Err(e) => return Err(Box::new(e)),
    }

    tracing::info!(
        bytes = stl.len(),
        dir = %out_dir.display(),
        "export finished"
    );
    Ok(())
}
