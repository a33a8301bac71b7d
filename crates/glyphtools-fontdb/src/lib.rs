//! Where glyphs come from: font sources for glyphtools
//!
//! The core crate only knows the [`FontSource`] trait. This crate supplies
//! the three implementations people actually have on disk or in hand:
//!
//! - [`OpenTypeFont`]: compiled `.ttf`/`.otf`/`.ttc` files, read-only
//! - [`UfoFont`]: UFO sources, editable and saveable
//! - [`MemoryFont`]: glyphs assembled in code
//!
//! [`Font`] wraps whichever one [`Font::open`] detects, so callers can
//! measure and kern without caring which it was.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use glyphtools_core::{
    error::{FontLoadError, GlyphtoolsError, Result},
    traits::FontSource,
    types::{Category, GlyphCategory, GlyphMetrics},
    Outline,
};

pub mod memory;
pub mod opentype;
mod pen;
pub mod ufo;

pub use memory::{Anchor, MemoryFont, MemoryGlyph};
pub use opentype::OpenTypeFont;
pub use pen::ContourPen;
pub use ufo::UfoFont;

/// sfnt version tags that mark a binary font
pub const TRUETYPE_MAGIC: [u8; 4] = [0x00, 0x01, 0x00, 0x00];
pub const CFF_MAGIC: [u8; 4] = *b"OTTO";
pub const APPLE_TRUETYPE_MAGIC: [u8; 4] = *b"true";
pub const COLLECTION_MAGIC: [u8; 4] = *b"ttcf";

/// The shapes a font can arrive in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFormat {
    OpenType,
    Ufo,
    Memory,
}

impl FontFormat {
    /// Work out what kind of font lives at `path`
    ///
    /// Directories and `.ufo` paths are UFOs. Anything else has to start
    /// with one of the sfnt magic numbers.
    pub fn detect(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(FontLoadError::FileNotFound(path.display().to_string()).into());
        }
        let is_ufo_ext = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("ufo"));
        if path.is_dir() || is_ufo_ext {
            return Ok(FontFormat::Ufo);
        }

        let mut magic = [0u8; 4];
        File::open(path)?
            .read_exact(&mut magic)
            .map_err(|_| FontLoadError::UnknownFormat(path.display().to_string()))?;
        Self::from_magic(magic)
            .ok_or_else(|| FontLoadError::UnknownFormat(path.display().to_string()).into())
    }

    pub fn from_magic(magic: [u8; 4]) -> Option<Self> {
        match magic {
            TRUETYPE_MAGIC | CFF_MAGIC | APPLE_TRUETYPE_MAGIC | COLLECTION_MAGIC => {
                Some(FontFormat::OpenType)
            }
            _ => None,
        }
    }
}

/// Cursive rise from the heights of the `entry` and `exit` anchors
///
/// A missing anchor counts as height zero.
pub fn rise_from_anchors(entry: Option<f64>, exit: Option<f64>) -> f64 {
    entry.unwrap_or(0.0) - exit.unwrap_or(0.0)
}

/// Any supported font, tagged by format
pub enum Font {
    OpenType(OpenTypeFont),
    Ufo(UfoFont),
    Memory(MemoryFont),
}

impl Font {
    /// Detect the format at `path` and load it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let font = match FontFormat::detect(path)? {
            FontFormat::OpenType => Font::OpenType(OpenTypeFont::from_file(path)?),
            FontFormat::Ufo => Font::Ufo(UfoFont::load(path)?),
            FontFormat::Memory => {
                return Err(FontLoadError::UnknownFormat(path.display().to_string()).into())
            }
        };
        log::info!("opened {} as {}", path.display(), font.format_name());
        Ok(font)
    }

    pub fn format(&self) -> FontFormat {
        match self {
            Font::OpenType(_) => FontFormat::OpenType,
            Font::Ufo(_) => FontFormat::Ufo,
            Font::Memory(_) => FontFormat::Memory,
        }
    }

    pub fn inner(&self) -> &dyn FontSource {
        match self {
            Font::OpenType(font) => font,
            Font::Ufo(font) => font,
            Font::Memory(font) => font,
        }
    }

    pub fn inner_mut(&mut self) -> &mut dyn FontSource {
        match self {
            Font::OpenType(font) => font,
            Font::Ufo(font) => font,
            Font::Memory(font) => font,
        }
    }

    /// Write an editable font back to disk
    ///
    /// Only UFOs can be saved; the other formats report `ReadOnly`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        match self {
            Font::Ufo(font) => font.save(path),
            other => Err(GlyphtoolsError::ReadOnly(other.format_name())),
        }
    }
}

impl From<OpenTypeFont> for Font {
    fn from(font: OpenTypeFont) -> Self {
        Font::OpenType(font)
    }
}

impl From<UfoFont> for Font {
    fn from(font: UfoFont) -> Self {
        Font::Ufo(font)
    }
}

impl From<MemoryFont> for Font {
    fn from(font: MemoryFont) -> Self {
        Font::Memory(font)
    }
}

impl FontSource for Font {
    fn format_name(&self) -> &'static str {
        self.inner().format_name()
    }

    fn glyph_names(&self) -> Vec<String> {
        self.inner().glyph_names()
    }

    fn has_glyph(&self, glyph: &str) -> bool {
        self.inner().has_glyph(glyph)
    }

    fn outlines(&self, glyph: &str) -> Result<Vec<Outline>> {
        self.inner().outlines(glyph)
    }

    fn metrics(&self, glyph: &str) -> Result<GlyphMetrics> {
        self.inner().metrics(glyph)
    }

    fn category(&self, glyph: &str) -> Result<GlyphCategory> {
        self.inner().category(glyph)
    }

    fn set_category(
        &mut self,
        glyph: &str,
        category: Category,
        mark_class: Option<u16>,
    ) -> Result<()> {
        self.inner_mut().set_category(glyph, category, mark_class)
    }

    fn duplicate_glyph(&mut self, existing: &str, new: &str) -> Result<()> {
        self.inner_mut().duplicate_glyph(existing, new)
    }
}
