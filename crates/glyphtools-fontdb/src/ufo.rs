// this_file: crates/glyphtools-fontdb/src/ufo.rs

//! UFO font sources
//!
//! Sources are editable, so unlike binary fonts every change made here can
//! be written back with [`UfoFont::save`]. Categories live in the standard
//! `public.openTypeCategories` lib key; cursive rise comes from anchors named
//! `entry` and `exit`.
//!
//! The default layer's glyphs and the font lib are held as plain owned data
//! so the source can be queried from many threads at once. Everything else
//! norad loaded (font info, other layers, data and images) waits behind a
//! mutex until the font is saved.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use glyphtools_core::{
    error::{FontLoadError, GlyphtoolsError, Result},
    geometry::union_bounds,
    traits::{ensure_assignable, FontSource},
    types::{Category, GlyphCategory, GlyphMetrics},
    Outline,
};
use kurbo::{Affine, BezPath, Point};
use norad::{Contour, ContourPoint, PointType};
use plist::{Dictionary, Value};

use crate::rise_from_anchors;

/// Font lib key holding each glyph's category
pub const CATEGORIES_KEY: &str = "public.openTypeCategories";

/// Font lib key holding the glyph order
pub const GLYPH_ORDER_KEY: &str = "public.glyphOrder";

/// Components nested deeper than this are treated as a cycle
const MAX_COMPONENT_DEPTH: usize = 32;

/// A UFO loaded from disk or built with `norad`
pub struct UfoFont {
    glyphs: HashMap<String, norad::Glyph>,
    /// Default layer order, with duplicated glyphs appended
    layer_order: Vec<String>,
    lib: Dictionary,
    rest: Mutex<norad::Font>,
    path: Option<PathBuf>,
}

impl UfoFont {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(FontLoadError::FileNotFound(path.display().to_string()).into());
        }
        let font = norad::Font::load(path).map_err(|e| FontLoadError::Ufo(e.to_string()))?;
        let mut ufo = Self::from_norad(font);
        log::debug!("loaded UFO {}: {} glyphs", path.display(), ufo.glyphs.len());
        ufo.path = Some(path.to_path_buf());
        Ok(ufo)
    }

    pub fn from_norad(mut font: norad::Font) -> Self {
        let mut glyphs = HashMap::new();
        let mut layer_order = Vec::new();
        for glyph in font.default_layer().iter() {
            let name = glyph.name().to_string();
            layer_order.push(name.clone());
            glyphs.insert(name, glyph.clone());
        }
        let lib = std::mem::take(&mut font.lib);
        Self {
            glyphs,
            layer_order,
            lib,
            rest: Mutex::new(font),
            path: None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn lib(&self) -> &Dictionary {
        &self.lib
    }

    /// Write the UFO, categories included, to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut font = self
            .rest
            .lock()
            .map_err(|_| FontLoadError::Ufo("font state poisoned by a panicked thread".into()))?;
        font.lib = self.lib.clone();
        let layer = font.default_layer_mut();
        for name in &self.layer_order {
            if let Some(glyph) = self.glyphs.get(name) {
                layer.insert_glyph(glyph.clone());
            }
        }
        font.save(path.as_ref())
            .map_err(|e| FontLoadError::Ufo(e.to_string()).into())
    }

    fn glyph(&self, name: &str) -> Result<&norad::Glyph> {
        self.glyphs
            .get(name)
            .ok_or_else(|| GlyphtoolsError::GlyphNotFound(name.to_string()))
    }

    fn collect_outlines(
        &self,
        glyph: &norad::Glyph,
        transform: Affine,
        depth: usize,
        out: &mut Vec<Outline>,
    ) -> Result<()> {
        if depth > MAX_COMPONENT_DEPTH {
            return Err(GlyphtoolsError::Outline(format!(
                "component nesting too deep in '{}'",
                glyph.name()
            )));
        }
        for contour in &glyph.contours {
            let path = contour_to_path(contour)
                .map_err(|reason| GlyphtoolsError::Outline(format!("{}: {reason}", glyph.name())))?;
            out.push(Outline::new(path).transformed(transform));
        }
        for component in &glyph.components {
            let base = self.glyph(component.base.as_str())?;
            let t = &component.transform;
            let local = Affine::new([
                t.x_scale,
                t.xy_scale,
                t.yx_scale,
                t.y_scale,
                t.x_offset,
                t.y_offset,
            ]);
            self.collect_outlines(base, transform * local, depth + 1, out)?;
        }
        Ok(())
    }

    fn category_table(&self) -> Option<&Dictionary> {
        self.lib.get(CATEGORIES_KEY)?.as_dictionary()
    }
}

impl FontSource for UfoFont {
    fn format_name(&self) -> &'static str {
        "UFO"
    }

    /// Names from `public.glyphOrder` first, then any glyph it leaves out
    fn glyph_names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let ordered = self
            .lib
            .get(GLYPH_ORDER_KEY)
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_string);
        ordered
            .chain(self.layer_order.iter().map(String::as_str))
            .filter(|name| self.glyphs.contains_key(*name) && seen.insert(*name))
            .map(str::to_string)
            .collect()
    }

    fn has_glyph(&self, glyph: &str) -> bool {
        self.glyphs.contains_key(glyph)
    }

    fn outlines(&self, glyph: &str) -> Result<Vec<Outline>> {
        let mut outlines = Vec::new();
        self.collect_outlines(self.glyph(glyph)?, Affine::IDENTITY, 0, &mut outlines)?;
        Ok(outlines)
    }

    fn metrics(&self, glyph: &str) -> Result<GlyphMetrics> {
        let g = self.glyph(glyph)?;
        let bounds = union_bounds(&self.outlines(glyph)?);
        if bounds.is_none() {
            log::debug!("'{glyph}' has no ink; reporting zero bounds");
        }
        let anchor_y = |wanted: &str| {
            g.anchors
                .iter()
                .find(|a| a.name.as_ref().map(|n| n.as_str()) == Some(wanted))
                .map(|a| a.y)
        };
        let rise = rise_from_anchors(anchor_y("entry"), anchor_y("exit"));
        Ok(GlyphMetrics::from_ink(g.width, bounds, rise))
    }

    fn category(&self, glyph: &str) -> Result<GlyphCategory> {
        self.glyph(glyph)?;
        let stored = self
            .category_table()
            .and_then(|table| table.get(glyph))
            .and_then(Value::as_string);
        let category = match stored {
            None | Some("unassigned") => Category::Unknown,
            Some(name) => name.parse().unwrap_or_else(|_| {
                log::warn!("'{glyph}' has unrecognised category '{name}'");
                Category::Unknown
            }),
        };
        Ok(GlyphCategory::new(category))
    }

    fn set_category(
        &mut self,
        glyph: &str,
        category: Category,
        _mark_class: Option<u16>,
    ) -> Result<()> {
        ensure_assignable(category)?;
        self.glyph(glyph)?;

        if !matches!(self.lib.get(CATEGORIES_KEY), Some(Value::Dictionary(_))) {
            self.lib.insert(
                CATEGORIES_KEY.to_string(),
                Value::Dictionary(Dictionary::new()),
            );
        }
        if let Some(Value::Dictionary(table)) = self.lib.get_mut(CATEGORIES_KEY) {
            table.insert(
                glyph.to_string(),
                Value::String(category.as_str().to_string()),
            );
        }
        Ok(())
    }

    fn duplicate_glyph(&mut self, existing: &str, new: &str) -> Result<()> {
        let source = self.glyph(existing)?;
        let mut copy = norad::Glyph::new(new);
        copy.width = source.width;
        copy.height = source.height;
        copy.contours = source.contours.clone();
        copy.components = source.components.clone();
        copy.anchors = source.anchors.clone();

        let category = self.category(existing)?;
        if self.glyphs.insert(new.to_string(), copy).is_none() {
            self.layer_order.push(new.to_string());
        }
        if category.category != Category::Unknown {
            self.set_category(new, category.category, category.mark_class)?;
        }
        Ok(())
    }
}

fn point(p: &ContourPoint) -> Point {
    Point::new(p.x, p.y)
}

/// Quadratic spline through off-curve `controls`, ending on `end`, with the
/// implied on-curve points halfway between consecutive controls.
fn quad_spline(path: &mut BezPath, controls: &[Point], end: Point) {
    for (i, &ctrl) in controls.iter().enumerate() {
        let to = match controls.get(i + 1) {
            Some(&next) => ctrl.midpoint(next),
            None => end,
        };
        path.quad_to(ctrl, to);
    }
}

/// Convert one UFO contour into a kurbo path
///
/// Closed contours are rotated to start on an on-curve point, and the
/// segment back to that point is drawn according to its own type. A
/// contour made only of quadratic off-curve points starts at the implied
/// point between its last and first controls.
pub fn contour_to_path(contour: &Contour) -> std::result::Result<BezPath, String> {
    let points = &contour.points;
    let mut path = BezPath::new();
    if points.is_empty() {
        return Ok(path);
    }

    let open = points[0].typ == PointType::Move;
    let Some(first_on) = points.iter().position(|p| p.typ != PointType::OffCurve) else {
        let controls: Vec<Point> = points.iter().map(point).collect();
        let start = controls[controls.len() - 1].midpoint(controls[0]);
        path.move_to(start);
        quad_spline(&mut path, &controls, start);
        path.close_path();
        return Ok(path);
    };

    let mut ordered: Vec<&ContourPoint> = points[first_on..].iter().chain(&points[..first_on]).collect();
    if !open {
        ordered.push(&points[first_on]);
    }

    path.move_to(point(ordered[0]));
    let mut pending: Vec<Point> = Vec::new();
    for p in &ordered[1..] {
        let at = point(p);
        match p.typ {
            PointType::OffCurve => pending.push(at),
            PointType::Line | PointType::Move => {
                if !pending.is_empty() {
                    return Err("off-curve points before a line point".into());
                }
                path.line_to(at);
            }
            PointType::Curve => {
                match pending.as_slice() {
                    [] => path.line_to(at),
                    [c] => path.quad_to(*c, at),
                    [c0, c1] => path.curve_to(*c0, *c1, at),
                    _ => return Err("more than two off-curve points before a curve point".into()),
                }
                pending.clear();
            }
            PointType::QCurve => {
                if pending.is_empty() {
                    path.line_to(at);
                } else {
                    quad_spline(&mut path, &pending, at);
                }
                pending.clear();
            }
        }
    }
    if !pending.is_empty() {
        return Err("open contour ends on off-curve points".into());
    }
    if !open {
        path.close_path();
    }
    Ok(path)
}
