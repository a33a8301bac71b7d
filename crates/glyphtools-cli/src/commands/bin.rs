//! Bin command implementation

use anyhow::{Context, Result};
use glyphtools_core::types::Metric;
use glyphtools_core::{bin_glyphs_by_metric, FontSource};

use super::open_font;
use crate::cli::BinArgs;

pub fn run(args: &BinArgs) -> Result<()> {
    let font = open_font(&args.font)?;
    let metric: Metric = args.metric.parse()?;

    let glyphs = if args.glyphs.is_empty() {
        font.glyph_names()
    } else {
        args.glyphs.clone()
    };

    let bins = bin_glyphs_by_metric(&font, &glyphs, metric, args.bins)
        .with_context(|| format!("Failed to bin {} glyphs by {metric}", glyphs.len()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&bins)?);
        return Ok(());
    }

    for bin in &bins {
        println!("{}: {}", bin.mean, bin.glyphs.join(" "));
    }
    Ok(())
}
