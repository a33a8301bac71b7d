//! Error types for glyphtools

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GlyphtoolsError>;

/// Main error type for glyphtools
#[derive(Debug, Error)]
pub enum GlyphtoolsError {
    #[error("No geometry for glyph '{0}': cannot measure ink distance")]
    MissingGeometry(String),

    #[error("Invalid bin request: {0}")]
    InvalidBinRequest(String),

    #[error("Unknown category: {0}")]
    UnsupportedCategory(String),

    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    #[error("Glyph not found: {0}")]
    GlyphNotFound(String),

    #[error("{0} fonts are read-only")]
    ReadOnly(&'static str),

    #[error("Outline conversion failed: {0}")]
    Outline(String),

    #[error("Font loading failed: {0}")]
    FontLoad(#[from] FontLoadError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Font loading errors
#[derive(Debug, Error)]
pub enum FontLoadError {
    #[error("Font file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid font data")]
    InvalidData,

    #[error("Unrecognised font format: {0}")]
    UnknownFormat(String),

    #[error("UFO error: {0}")]
    Ufo(String),
}
