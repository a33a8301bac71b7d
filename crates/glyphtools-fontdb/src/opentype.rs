// this_file: crates/glyphtools-fontdb/src/opentype.rs

//! Compiled OpenType and TrueType fonts
//!
//! Tables are read with `read-fonts`; outlines are drawn with `skrifa`, which
//! takes care of both `glyf` and CFF flavours. The font bytes are never
//! modified, so category assignments live in an override table on the side.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use glyphtools_core::{
    error::{FontLoadError, GlyphtoolsError, Result},
    geometry::union_bounds,
    traits::{ensure_assignable, FontSource},
    types::{Category, GlyphCategory, GlyphMetrics},
    Outline,
};
use read_fonts::tables::gpos::{AnchorTable, PositionSubtables};
use read_fonts::types::{GlyphId, GlyphId16};
use read_fonts::{FontRef as ReadFontRef, TableProvider};
use skrifa::instance::{LocationRef, Size};
use skrifa::outline::DrawSettings;
use skrifa::MetadataProvider;

use crate::pen::ContourPen;

/// A binary font held in memory
///
/// Stores the raw bytes and re-parses on demand, the same way for every
/// query, so nothing derived from the tables goes stale.
pub struct OpenTypeFont {
    data: Vec<u8>,
    face_index: u32,
    units_per_em: u16,
    names: Vec<String>,
    ids: HashMap<String, u32>,
    overrides: HashMap<String, GlyphCategory>,
}

impl OpenTypeFont {
    /// Opens a font file from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_file_index(path, 0)
    }

    /// Opens one face of a font file (for TTC collections)
    pub fn from_file_index(path: impl AsRef<Path>, face_index: u32) -> Result<Self> {
        let data = fs::read(path.as_ref())
            .map_err(|_| FontLoadError::FileNotFound(path.as_ref().display().to_string()))?;
        Self::from_data_index(data, face_index)
    }

    /// Wraps font bytes already in memory
    pub fn from_data(data: Vec<u8>) -> Result<Self> {
        Self::from_data_index(data, 0)
    }

    pub fn from_data_index(data: Vec<u8>, face_index: u32) -> Result<Self> {
        let font =
            ReadFontRef::from_index(&data, face_index).map_err(|_| FontLoadError::InvalidData)?;
        let units_per_em = font
            .head()
            .map(|head| head.units_per_em())
            .unwrap_or(1000);
        let glyph_count = font
            .maxp()
            .map(|maxp| maxp.num_glyphs() as u32)
            .unwrap_or(0);

        let outline_font =
            skrifa::FontRef::from_index(&data, face_index).map_err(|_| FontLoadError::InvalidData)?;
        let mut names = vec![String::new(); glyph_count as usize];
        for (gid, name) in outline_font.glyph_names().iter() {
            if let Some(slot) = names.get_mut(gid.to_u32() as usize) {
                *slot = name.as_str().to_string();
            }
        }
        for (gid, slot) in names.iter_mut().enumerate() {
            if slot.is_empty() {
                *slot = format!("gid{gid}");
            }
        }
        let ids = names
            .iter()
            .enumerate()
            .map(|(gid, name)| (name.clone(), gid as u32))
            .collect();

        log::debug!(
            "loaded binary font: {} glyphs, {} units per em",
            names.len(),
            units_per_em
        );

        Ok(Self {
            data,
            face_index,
            units_per_em,
            names,
            ids,
            overrides: HashMap::new(),
        })
    }

    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    pub fn face_index(&self) -> u32 {
        self.face_index
    }

    fn font_ref(&self) -> Result<ReadFontRef<'_>> {
        ReadFontRef::from_index(&self.data, self.face_index)
            .map_err(|_| FontLoadError::InvalidData.into())
    }

    fn glyph_id(&self, glyph: &str) -> Result<u32> {
        self.ids
            .get(glyph)
            .copied()
            .ok_or_else(|| GlyphtoolsError::GlyphNotFound(glyph.to_string()))
    }

    /// Vertical offset between the cursive entry and exit anchors
    ///
    /// Scans every cursive attachment lookup in GPOS; a later lookup
    /// covering the glyph replaces what an earlier one said. One anchor gives
    /// its own height, two give entry minus exit, none gives zero.
    fn rise(&self, font: &ReadFontRef, gid: u32) -> f64 {
        let Ok(gid16) = u16::try_from(gid).map(GlyphId16::new) else {
            return 0.0;
        };
        let Ok(gpos) = font.gpos() else {
            return 0.0;
        };
        let Ok(lookup_list) = gpos.lookup_list() else {
            return 0.0;
        };

        let mut anchors: Option<Vec<f64>> = None;
        for lookup in lookup_list.lookups().iter().flatten() {
            let Ok(PositionSubtables::Cursive(subtables)) = lookup.subtables() else {
                continue;
            };
            for subtable in subtables.iter().flatten() {
                let Ok(coverage) = subtable.coverage() else {
                    continue;
                };
                let Some(index) = coverage.get(gid16) else {
                    continue;
                };
                let Some(record) = subtable.entry_exit_record().get(index as usize) else {
                    continue;
                };
                let data = subtable.offset_data();
                let mut heights = Vec::with_capacity(2);
                if let Some(Ok(anchor)) = record.entry_anchor(data) {
                    heights.push(anchor_y(&anchor));
                }
                if let Some(Ok(anchor)) = record.exit_anchor(data) {
                    heights.push(anchor_y(&anchor));
                }
                anchors = Some(heights);
            }
        }

        match anchors.as_deref() {
            Some([only]) => *only,
            Some([entry, exit, ..]) => entry - exit,
            _ => 0.0,
        }
    }
}

fn anchor_y(anchor: &AnchorTable) -> f64 {
    match anchor {
        AnchorTable::Format1(a) => a.y_coordinate() as f64,
        AnchorTable::Format2(a) => a.y_coordinate() as f64,
        AnchorTable::Format3(a) => a.y_coordinate() as f64,
    }
}

impl FontSource for OpenTypeFont {
    fn format_name(&self) -> &'static str {
        "OpenType"
    }

    fn glyph_names(&self) -> Vec<String> {
        self.names.clone()
    }

    fn has_glyph(&self, glyph: &str) -> bool {
        self.ids.contains_key(glyph)
    }

    fn outlines(&self, glyph: &str) -> Result<Vec<Outline>> {
        let gid = self.glyph_id(glyph)?;
        let font = skrifa::FontRef::from_index(&self.data, self.face_index)
            .map_err(|_| FontLoadError::InvalidData)?;
        let Some(outline) = font.outline_glyphs().get(skrifa::GlyphId::new(gid)) else {
            return Ok(Vec::new());
        };

        let settings = DrawSettings::unhinted(Size::unscaled(), LocationRef::default());
        let mut pen = ContourPen::new();
        outline
            .draw(settings, &mut pen)
            .map_err(|e| GlyphtoolsError::Outline(format!("{glyph}: {e}")))?;
        Ok(pen.into_outlines())
    }

    fn metrics(&self, glyph: &str) -> Result<GlyphMetrics> {
        let gid = self.glyph_id(glyph)?;
        let font = self.font_ref()?;

        let advance = font.hmtx().ok().and_then(|hmtx| {
            let id = GlyphId::new(gid);
            Some((hmtx.advance(id)? as f64, hmtx.side_bearing(id)? as f64))
        });
        let (width, lsb) = advance.unwrap_or_else(|| {
            log::warn!("no hmtx entry for '{glyph}'; using the em as its width");
            (self.units_per_em as f64, 0.0)
        });

        let bounds = union_bounds(&self.outlines(glyph)?);
        if bounds.is_none() {
            log::debug!("'{glyph}' has no ink; reporting zero bounds");
        }

        let mut metrics = GlyphMetrics::from_ink(width, bounds, self.rise(&font, gid));
        metrics.lsb = lsb;
        Ok(metrics)
    }

    fn category(&self, glyph: &str) -> Result<GlyphCategory> {
        let gid = self.glyph_id(glyph)?;
        if let Some(category) = self.overrides.get(glyph) {
            return Ok(*category);
        }

        let font = self.font_ref()?;
        let Ok(gdef) = font.gdef() else {
            return Ok(GlyphCategory::unknown());
        };
        let Ok(gid16) = u16::try_from(gid).map(GlyphId16::new) else {
            return Ok(GlyphCategory::unknown());
        };
        let Some(Ok(class_def)) = gdef.glyph_class_def() else {
            return Ok(GlyphCategory::unknown());
        };

        let category = Category::from_gdef_class(class_def.get(gid16));
        if category != Category::Mark {
            return Ok(GlyphCategory::new(category));
        }
        let mark_class = match gdef.mark_attach_class_def() {
            Some(Ok(mark_classes)) => Some(mark_classes.get(gid16)).filter(|&c| c != 0),
            _ => None,
        };
        Ok(GlyphCategory::mark(mark_class))
    }

    fn set_category(
        &mut self,
        glyph: &str,
        category: Category,
        mark_class: Option<u16>,
    ) -> Result<()> {
        ensure_assignable(category)?;
        self.glyph_id(glyph)?;
        let mark_class = mark_class.filter(|_| category == Category::Mark);
        self.overrides.insert(
            glyph.to_string(),
            GlyphCategory {
                category,
                mark_class,
            },
        );
        Ok(())
    }

    fn duplicate_glyph(&mut self, _existing: &str, _new: &str) -> Result<()> {
        Err(GlyphtoolsError::ReadOnly(self.format_name()))
    }
}
