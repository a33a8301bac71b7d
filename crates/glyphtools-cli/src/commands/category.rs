//! Category command implementation
//!
//! Without `--set` this only reads. With it, the category is assigned and
//! the font written out, which only works for formats that can be saved.

use anyhow::{Context, Result};
use glyphtools_core::types::{Category, GlyphCategory};
use glyphtools_core::FontSource;

use super::open_font;
use crate::cli::CategoryArgs;

fn describe(category: &GlyphCategory) -> String {
    match category.mark_class {
        Some(class) => format!("{} (mark class {class})", category.category),
        None => category.category.to_string(),
    }
}

pub fn run(args: &CategoryArgs) -> Result<()> {
    let mut font = open_font(&args.font)?;

    let Some(new_category) = &args.set else {
        let category = font
            .category(&args.glyph)
            .with_context(|| format!("Failed to read category of '{}'", args.glyph))?;
        println!("{}: {}", args.glyph, describe(&category));
        return Ok(());
    };

    let category: Category = new_category.parse()?;
    font.set_category(&args.glyph, category, args.mark_class)
        .with_context(|| format!("Failed to set category of '{}'", args.glyph))?;

    let output = args.output.as_deref().unwrap_or(args.font.as_path());
    font.save(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    log::info!("wrote {}", output.display());

    println!("{}: {}", args.glyph, describe(&font.category(&args.glyph)?));
    Ok(())
}
