//! The contract every font representation signs
//!
//! Binary fonts, UFO sources and in-memory glyph tables store the same facts
//! in wildly different places. [`FontSource`] hides that: the kerning solver
//! and the binning engine only ever see outlines, metrics and categories.

use crate::{
    error::Result,
    geometry::Outline,
    types::{Category, GlyphCategory, GlyphMetrics},
};

/// Your window into one font's glyphs
///
/// Glyphs are addressed by name. Every query returns fresh data; callers
/// should not expect an implementation to cache anything on their behalf.
///
/// ```ignore
/// struct MyFont { /* ... */ }
///
/// impl FontSource for MyFont {
///     fn format_name(&self) -> &'static str {
///         "my-format"
///     }
///
///     fn outlines(&self, glyph: &str) -> Result<Vec<Outline>> {
///         // One closed path per contour
///         Ok(vec![])
///     }
///
///     // ...
/// }
/// ```
pub trait FontSource: Send + Sync {
    /// Short name of the underlying representation, for logs and errors
    fn format_name(&self) -> &'static str;

    /// Every glyph name in font order
    fn glyph_names(&self) -> Vec<String>;

    /// Does the font contain this glyph?
    fn has_glyph(&self, glyph: &str) -> bool {
        self.glyph_names().iter().any(|name| name == glyph)
    }

    /// The glyph's ink as closed contours
    ///
    /// A glyph without ink (a space, say) yields an empty list rather than an
    /// error; deciding whether that is acceptable is the caller's business.
    fn outlines(&self, glyph: &str) -> Result<Vec<Outline>>;

    /// Advance, side-bearings, ink bounds and cursive rise
    fn metrics(&self, glyph: &str) -> Result<GlyphMetrics>;

    /// The glyph's layout category and mark attachment class
    fn category(&self, glyph: &str) -> Result<GlyphCategory>;

    /// Assign a layout category
    ///
    /// Only base, ligature, mark and component can be assigned; asking for
    /// [`Category::Unknown`] fails with `UnsupportedCategory`. `mark_class`
    /// is honoured only for marks, and only where the format can store it.
    fn set_category(
        &mut self,
        glyph: &str,
        category: Category,
        mark_class: Option<u16>,
    ) -> Result<()>;

    /// Add `new` as a copy of `existing`: ink, width and category
    fn duplicate_glyph(&mut self, existing: &str, new: &str) -> Result<()>;
}

/// Reject categories that cannot be assigned.
pub fn ensure_assignable(category: Category) -> Result<()> {
    if category == Category::Unknown {
        return Err(crate::GlyphtoolsError::UnsupportedCategory(
            category.to_string(),
        ));
    }
    Ok(())
}
