//! Info command implementation
//!
//! Displays version information and, given a font, what was detected.

use anyhow::Result;
use glyphtools_core::types::Metric;
use glyphtools_core::FontSource;

use super::open_font;
use crate::cli::InfoArgs;

pub fn run(args: &InfoArgs) -> Result<()> {
    println!("glyphtools v{}", glyphtools_core::VERSION);
    println!("Authors: {}", glyphtools_core::AUTHORS);
    println!();

    let Some(path) = &args.font else {
        println!("Font formats: OpenType (.ttf, .otf, .ttc), UFO (.ufo)");
        let metrics: Vec<&str> = Metric::ALL.iter().map(|m| m.as_str()).collect();
        println!("Metrics: {}", metrics.join(", "));
        return Ok(());
    };

    let font = open_font(path)?;
    println!("Font:   {}", path.display());
    println!("Format: {}", font.format_name());
    println!("Glyphs: {}", font.glyph_names().len());
    Ok(())
}
