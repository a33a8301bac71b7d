//! One module per subcommand

pub mod batch;
pub mod bin;
pub mod category;
pub mod info;
pub mod kern;
pub mod metrics;

use std::path::Path;

use anyhow::{Context, Result};
use glyphtools_fontdb::Font;

/// Open a font of any supported format, naming the path on failure.
pub fn open_font(path: &Path) -> Result<Font> {
    Font::open(path).with_context(|| format!("Failed to open font {}", path.display()))
}
