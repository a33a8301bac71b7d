//! Glyphtools Core: measuring glyphs so you can space them
//!
//! Two questions get asked of glyph outlines over and over when building a
//! font's spacing and kerning:
//!
//! 1. **How far apart should these two glyphs sit?** The [`kern`] solver
//!    nudges the right glyph until the closest ink of the pair sits at a
//!    target distance, never tucking it further left than a fraction of the
//!    left glyph's width.
//! 2. **Which glyphs behave alike?** The [`binning`] engine clusters a metric
//!    (widths, side-bearings, heights) into a handful of groups using an exact
//!    one-dimensional dynamic program rather than heuristic k-means.
//!
//! Neither algorithm ever looks at a font file. Glyph data arrives through
//! the [`FontSource`] trait, implemented elsewhere for each concrete font
//! representation.
//!
//! ```
//! use glyphtools_core::binning::bin_by_metric;
//! use glyphtools_core::types::MetricSample;
//!
//! let samples = vec![
//!     MetricSample::new("a", 100.0),
//!     MetricSample::new("b", 102.0),
//!     MetricSample::new("c", 105.0),
//!     MetricSample::new("m", 210.0),
//!     MetricSample::new("w", 220.0),
//! ];
//! let bins = bin_by_metric(&samples, 2)?;
//! assert_eq!(bins[0].glyphs, vec!["a", "b", "c"]);
//! assert_eq!(bins[0].mean, 102);
//! assert_eq!(bins[1].mean, 215);
//! # Ok::<(), glyphtools_core::GlyphtoolsError>(())
//! ```

pub mod binning;
pub mod ckmeans;
pub mod error;
pub mod geometry;
pub mod kern;
pub mod traits;

pub use binning::{bin_by_metric, bin_glyphs_by_metric};
pub use error::{FontLoadError, GlyphtoolsError, Result};
pub use geometry::Outline;
pub use kern::{determine_kern, KernParams, KernSolution, KerningQuery, StopReason};
pub use traits::FontSource;

/// Crate version, fixed at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate authors, fixed at compile time.
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");

/// The data structures shared between sources, solver and binning
pub mod types {
    use std::fmt;
    use std::str::FromStr;

    use serde::{Deserialize, Serialize};

    use crate::error::GlyphtoolsError;

    /// Which metric of a glyph we are talking about
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub enum Metric {
        #[serde(rename = "width")]
        Width,
        #[serde(rename = "lsb")]
        Lsb,
        #[serde(rename = "rsb")]
        Rsb,
        #[serde(rename = "xMin")]
        XMin,
        #[serde(rename = "xMax")]
        XMax,
        #[serde(rename = "yMin")]
        YMin,
        #[serde(rename = "yMax")]
        YMax,
        #[serde(rename = "rise")]
        Rise,
    }

    impl Metric {
        pub const ALL: [Metric; 8] = [
            Metric::Width,
            Metric::Lsb,
            Metric::Rsb,
            Metric::XMin,
            Metric::XMax,
            Metric::YMin,
            Metric::YMax,
            Metric::Rise,
        ];

        pub fn as_str(self) -> &'static str {
            match self {
                Metric::Width => "width",
                Metric::Lsb => "lsb",
                Metric::Rsb => "rsb",
                Metric::XMin => "xMin",
                Metric::XMax => "xMax",
                Metric::YMin => "yMin",
                Metric::YMax => "yMax",
                Metric::Rise => "rise",
            }
        }
    }

    impl fmt::Display for Metric {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    }

    impl FromStr for Metric {
        type Err = GlyphtoolsError;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s {
                "width" | "advance" => Ok(Metric::Width),
                "lsb" => Ok(Metric::Lsb),
                "rsb" => Ok(Metric::Rsb),
                "xMin" | "x_min" => Ok(Metric::XMin),
                "xMax" | "x_max" => Ok(Metric::XMax),
                "yMin" | "y_min" => Ok(Metric::YMin),
                "yMax" | "y_max" => Ok(Metric::YMax),
                "rise" => Ok(Metric::Rise),
                other => Err(GlyphtoolsError::UnknownMetric(other.to_string())),
            }
        }
    }

    /// A snapshot of one glyph's measurements, in font units
    ///
    /// Computed fresh on every request; nothing here is cached.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
    pub struct GlyphMetrics {
        pub width: f64,
        pub lsb: f64,
        pub rsb: f64,
        #[serde(rename = "xMin")]
        pub x_min: f64,
        #[serde(rename = "xMax")]
        pub x_max: f64,
        #[serde(rename = "yMin")]
        pub y_min: f64,
        #[serde(rename = "yMax")]
        pub y_max: f64,
        /// Vertical drop between cursive entry and exit anchors
        pub rise: f64,
    }

    impl GlyphMetrics {
        /// Metrics from an advance and the union of a glyph's ink bounds
        ///
        /// A glyph with no ink gets zero bounds, so its right side-bearing is
        /// the whole advance. That is a real answer for a space, and a
        /// degraded one for anything else; sources log when it happens.
        pub fn from_ink(width: f64, bounds: Option<kurbo::Rect>, rise: f64) -> Self {
            let ink = bounds.unwrap_or_default();
            Self {
                width,
                lsb: ink.x0,
                rsb: width - ink.x1,
                x_min: ink.x0,
                x_max: ink.x1,
                y_min: ink.y0,
                y_max: ink.y1,
                rise,
            }
        }

        pub fn get(&self, metric: Metric) -> f64 {
            match metric {
                Metric::Width => self.width,
                Metric::Lsb => self.lsb,
                Metric::Rsb => self.rsb,
                Metric::XMin => self.x_min,
                Metric::XMax => self.x_max,
                Metric::YMin => self.y_min,
                Metric::YMax => self.y_max,
                Metric::Rise => self.rise,
            }
        }
    }

    /// What role a glyph plays in layout
    ///
    /// Discriminants follow the OpenType GDEF glyph class codes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Category {
        Unknown = 0,
        Base = 1,
        Ligature = 2,
        Mark = 3,
        Component = 4,
    }

    impl Category {
        /// Map a GDEF `GlyphClassDef` value; anything unrecognised is unknown.
        pub fn from_gdef_class(class: u16) -> Self {
            match class {
                1 => Category::Base,
                2 => Category::Ligature,
                3 => Category::Mark,
                4 => Category::Component,
                _ => Category::Unknown,
            }
        }

        pub fn gdef_class(self) -> u16 {
            self as u16
        }

        pub fn as_str(self) -> &'static str {
            match self {
                Category::Unknown => "unknown",
                Category::Base => "base",
                Category::Ligature => "ligature",
                Category::Mark => "mark",
                Category::Component => "component",
            }
        }
    }

    impl fmt::Display for Category {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    }

    impl FromStr for Category {
        type Err = GlyphtoolsError;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s {
                "unknown" => Ok(Category::Unknown),
                "base" => Ok(Category::Base),
                "ligature" => Ok(Category::Ligature),
                "mark" => Ok(Category::Mark),
                "component" => Ok(Category::Component),
                other => Err(GlyphtoolsError::UnsupportedCategory(other.to_string())),
            }
        }
    }

    /// A glyph's category plus, for marks, its attachment class
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct GlyphCategory {
        pub category: Category,
        pub mark_class: Option<u16>,
    }

    impl GlyphCategory {
        pub fn new(category: Category) -> Self {
            Self {
                category,
                mark_class: None,
            }
        }

        pub fn mark(mark_class: Option<u16>) -> Self {
            Self {
                category: Category::Mark,
                mark_class,
            }
        }

        pub fn unknown() -> Self {
            Self::new(Category::Unknown)
        }
    }

    impl Default for GlyphCategory {
        fn default() -> Self {
            Self::unknown()
        }
    }

    /// One glyph paired with one metric value, built only for binning
    #[derive(Debug, Clone, PartialEq)]
    pub struct MetricSample {
        pub glyph: String,
        pub value: f64,
    }

    impl MetricSample {
        pub fn new(glyph: impl Into<String>, value: f64) -> Self {
            Self {
                glyph: glyph.into(),
                value,
            }
        }
    }

    /// A group of glyphs with similar metric values
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Bin {
        /// Member glyphs, in the order they were supplied
        pub glyphs: Vec<String>,
        /// Mean metric value of the members, truncated toward zero
        pub mean: i32,
    }
}
