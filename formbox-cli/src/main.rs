//! Formbox - lay out a form description and print the placements.

mod form;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use formbox::layout::{LayoutEngine, Placement};
use formbox::{LayoutConfig, Rect, Size};

use crate::form::{load_config, Form};

#[derive(Debug, Parser)]
#[command(name = "formbox", version, about = "Lay out a JSON form description")]
struct Args {
    /// Form description (JSON)
    form: PathBuf,

    /// Layout configuration (JSON); defaults are used when absent
    #[arg(long)]
    config: Option<PathBuf>,

    /// Width of the root box; its preferred width when absent
    #[arg(long)]
    width: Option<i32>,

    /// Height of the root box; its preferred height when absent
    #[arg(long)]
    height: Option<i32>,

    /// Pretty-print the output
    #[arg(long)]
    pretty: bool,
}

#[derive(Debug, Serialize)]
struct Report {
    min: Size,
    preferred: Size,
    max: Size,
    bounds: Rect,
    placements: Vec<Placement>,
}

fn main() -> Result<()> {
    // Set up logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => LayoutConfig::default(),
    };
    let form = Form::load(&args.form)?;
    let root = form.root;
    let engine = LayoutEngine::new(form.tree, config);

    let measured = engine.measure(root)?;
    let preferred = measured.pref_size();
    let bounds = Rect::new(
        0,
        0,
        args.width.unwrap_or(preferred.width),
        args.height.unwrap_or(preferred.height),
    );
    tracing::info!(?bounds, policy = ?config.policy, "laying out {}", args.form.display());
    let placements = engine.layout(root, bounds)?;

    let report = Report {
        min: measured.min_size(),
        preferred,
        max: measured.max_size(),
        bounds,
        placements,
    };
    let json = if args.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .context("failed to encode placements")?;
    println!("{json}");
    Ok(())
}
