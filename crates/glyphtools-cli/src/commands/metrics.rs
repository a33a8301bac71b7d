//! Metrics command implementation

use anyhow::{Context, Result};
use glyphtools_core::types::GlyphMetrics;
use glyphtools_core::FontSource;
use serde::Serialize;

use super::open_font;
use crate::cli::MetricsArgs;

#[derive(Debug, Serialize)]
struct GlyphReport<'a> {
    glyph: &'a str,
    #[serde(flatten)]
    metrics: GlyphMetrics,
}

pub fn run(args: &MetricsArgs) -> Result<()> {
    let font = open_font(&args.font)?;

    let reports = args
        .glyphs
        .iter()
        .map(|glyph| {
            font.metrics(glyph)
                .map(|metrics| GlyphReport { glyph, metrics })
                .with_context(|| format!("Failed to measure '{glyph}'"))
        })
        .collect::<Result<Vec<_>>>()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    for GlyphReport { glyph, metrics: m } in &reports {
        println!(
            "{glyph}: width={} lsb={} rsb={} xMin={} xMax={} yMin={} yMax={} rise={}",
            m.width, m.lsb, m.rsb, m.x_min, m.x_max, m.y_min, m.y_max, m.rise
        );
    }
    Ok(())
}
