// this_file: crates/glyphtools-fontdb/src/memory.rs

//! Fonts built in code
//!
//! Useful for tests and for callers that already hold outlines from
//! somewhere else and just want them kerned or binned.

use std::collections::HashMap;

use glyphtools_core::{
    error::{GlyphtoolsError, Result},
    geometry::union_bounds,
    traits::{ensure_assignable, FontSource},
    types::{Category, GlyphCategory, GlyphMetrics},
    Outline,
};

use crate::rise_from_anchors;

/// A named point on a glyph
#[derive(Debug, Clone, PartialEq)]
pub struct Anchor {
    pub name: String,
    pub x: f64,
    pub y: f64,
}

impl Anchor {
    pub fn new(name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            name: name.into(),
            x,
            y,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryGlyph {
    pub width: f64,
    pub outlines: Vec<Outline>,
    pub anchors: Vec<Anchor>,
    pub category: GlyphCategory,
}

impl MemoryGlyph {
    pub fn new(width: f64, outlines: Vec<Outline>) -> Self {
        Self {
            width,
            outlines,
            ..Self::default()
        }
    }

    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchors.push(anchor);
        self
    }

    pub fn with_category(mut self, category: GlyphCategory) -> Self {
        self.category = category;
        self
    }

    fn anchor_y(&self, name: &str) -> Option<f64> {
        self.anchors.iter().find(|a| a.name == name).map(|a| a.y)
    }
}

/// Glyphs kept in insertion order
#[derive(Debug, Clone, Default)]
pub struct MemoryFont {
    order: Vec<String>,
    glyphs: HashMap<String, MemoryGlyph>,
}

impl MemoryFont {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a glyph, replacing any glyph already using the name.
    pub fn insert(&mut self, name: impl Into<String>, glyph: MemoryGlyph) {
        let name = name.into();
        if self.glyphs.insert(name.clone(), glyph).is_none() {
            self.order.push(name);
        }
    }

    pub fn with_glyph(mut self, name: impl Into<String>, glyph: MemoryGlyph) -> Self {
        self.insert(name, glyph);
        self
    }

    pub fn glyph(&self, name: &str) -> Result<&MemoryGlyph> {
        self.glyphs
            .get(name)
            .ok_or_else(|| GlyphtoolsError::GlyphNotFound(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl FontSource for MemoryFont {
    fn format_name(&self) -> &'static str {
        "memory"
    }

    fn glyph_names(&self) -> Vec<String> {
        self.order.clone()
    }

    fn has_glyph(&self, glyph: &str) -> bool {
        self.glyphs.contains_key(glyph)
    }

    fn outlines(&self, glyph: &str) -> Result<Vec<Outline>> {
        Ok(self.glyph(glyph)?.outlines.clone())
    }

    fn metrics(&self, glyph: &str) -> Result<GlyphMetrics> {
        let g = self.glyph(glyph)?;
        let rise = rise_from_anchors(g.anchor_y("entry"), g.anchor_y("exit"));
        Ok(GlyphMetrics::from_ink(g.width, union_bounds(&g.outlines), rise))
    }

    fn category(&self, glyph: &str) -> Result<GlyphCategory> {
        Ok(self.glyph(glyph)?.category)
    }

    fn set_category(
        &mut self,
        glyph: &str,
        category: Category,
        mark_class: Option<u16>,
    ) -> Result<()> {
        ensure_assignable(category)?;
        let g = self
            .glyphs
            .get_mut(glyph)
            .ok_or_else(|| GlyphtoolsError::GlyphNotFound(glyph.to_string()))?;
        g.category = GlyphCategory {
            category,
            mark_class: mark_class.filter(|_| category == Category::Mark),
        };
        Ok(())
    }

    fn duplicate_glyph(&mut self, existing: &str, new: &str) -> Result<()> {
        let copy = self.glyph(existing)?.clone();
        self.insert(new, copy);
        Ok(())
    }
}
