//! Font source integration tests
//!
//! UFOs are written to a temporary directory with norad and read back
//! through [`Font::open`], so detection, loading and measuring are all
//! exercised together.

use std::path::PathBuf;

use glyphtools_core::geometry::rect_outline;
use glyphtools_core::types::{Category, Metric};
use glyphtools_core::{
    bin_glyphs_by_metric, determine_kern, FontLoadError, FontSource, GlyphtoolsError,
    KerningQuery,
};
use glyphtools_fontdb::{Anchor, Font, FontFormat, MemoryFont, MemoryGlyph};
use norad::{AffineTransform, Component, Contour, ContourPoint, PointType};

fn temp_path(ext: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let id = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    path.push(format!("glyphtools_test_{}.{}", id, ext));
    path
}

fn rect_contour(x0: f64, y0: f64, x1: f64, y1: f64) -> Contour {
    let pt = |x, y| ContourPoint::new(x, y, PointType::Line, false, None, None);
    Contour::new(vec![pt(x0, y0), pt(x1, y0), pt(x1, y1), pt(x0, y1)], None)
}

fn anchor(name: &str, x: f64, y: f64) -> norad::Anchor {
    norad::Anchor::new(x, y, Some(name.parse().unwrap()), None, None)
}

/// H, I, a space, an accented I built from a component, and a cursive kaf
fn write_ufo() -> PathBuf {
    let mut font = norad::Font::new();
    let layer = font.default_layer_mut();

    let mut h = norad::Glyph::new("H");
    h.width = 600.0;
    h.contours.push(rect_contour(50.0, 0.0, 550.0, 700.0));
    layer.insert_glyph(h);

    let mut i = norad::Glyph::new("I");
    i.width = 300.0;
    i.contours.push(rect_contour(50.0, 0.0, 250.0, 700.0));
    layer.insert_glyph(i);

    let mut space = norad::Glyph::new("space");
    space.width = 250.0;
    layer.insert_glyph(space);

    let mut iacute = norad::Glyph::new("Iacute");
    iacute.width = 300.0;
    let shift = AffineTransform {
        x_scale: 1.0,
        xy_scale: 0.0,
        yx_scale: 0.0,
        y_scale: 1.0,
        x_offset: 10.0,
        y_offset: 0.0,
    };
    iacute
        .components
        .push(Component::new("I".parse().unwrap(), shift, None));
    layer.insert_glyph(iacute);

    let mut kaf = norad::Glyph::new("kaf");
    kaf.width = 400.0;
    kaf.contours.push(rect_contour(0.0, 0.0, 400.0, 300.0));
    kaf.anchors.push(anchor("entry", 400.0, 120.0));
    kaf.anchors.push(anchor("exit", 0.0, 20.0));
    layer.insert_glyph(kaf);

    font.lib.insert(
        "public.glyphOrder".to_string(),
        plist::Value::Array(
            ["space", "H", "I", "Iacute", "kaf"]
                .iter()
                .map(|n| plist::Value::String(n.to_string()))
                .collect(),
        ),
    );

    let path = temp_path("ufo");
    font.save(&path).unwrap();
    path
}

#[test]
fn test_detects_ufo_directory() {
    let path = write_ufo();
    assert_eq!(FontFormat::detect(&path).unwrap(), FontFormat::Ufo);
    let font = Font::open(&path).unwrap();
    assert_eq!(font.format(), FontFormat::Ufo);
    assert_eq!(font.format_name(), "UFO");
    assert_eq!(font.glyph_names(), vec!["space", "H", "I", "Iacute", "kaf"]);
}

#[test]
fn test_unknown_file_is_rejected() {
    let path = temp_path("bin");
    std::fs::write(&path, b"wOFFnot really a font").unwrap();
    assert!(matches!(
        Font::open(&path),
        Err(GlyphtoolsError::FontLoad(FontLoadError::UnknownFormat(_)))
    ));
    assert!(matches!(
        Font::open(temp_path("ttf")),
        Err(GlyphtoolsError::FontLoad(FontLoadError::FileNotFound(_)))
    ));
}

#[test]
fn test_glyphs_sources_are_not_read() {
    let path = temp_path("glyphs");
    std::fs::write(&path, b"{\n.appVersion = \"3260\";\nfamilyName = Test;\n}\n").unwrap();
    assert!(matches!(
        Font::open(&path),
        Err(GlyphtoolsError::FontLoad(FontLoadError::UnknownFormat(_)))
    ));
}

#[test]
fn test_ufo_metrics() {
    let font = Font::open(write_ufo()).unwrap();

    let h = font.metrics("H").unwrap();
    assert_eq!(h.width, 600.0);
    assert_eq!(h.lsb, 50.0);
    assert_eq!(h.rsb, 50.0);
    assert_eq!(h.y_max, 700.0);

    let space = font.metrics("space").unwrap();
    assert_eq!(space.x_max, 0.0);
    assert_eq!(space.rsb, 250.0);

    assert_eq!(font.metrics("kaf").unwrap().rise, 100.0);
}

#[test]
fn test_components_follow_their_transform() {
    let font = Font::open(write_ufo()).unwrap();
    let m = font.metrics("Iacute").unwrap();
    assert_eq!(m.x_min, 60.0);
    assert_eq!(m.x_max, 260.0);
}

#[test]
fn test_ufo_kern_and_bins() {
    let font = Font::open(write_ufo()).unwrap();

    // H's right edge at 550, I's left edge at 600 + 50: 100 units apart
    let kern = determine_kern(&font, &KerningQuery::new("H", "I", 80.0)).unwrap();
    assert_eq!(kern, -20);

    let bins = bin_glyphs_by_metric(&font, &["H", "I", "Iacute", "space"], Metric::Width, 2)
        .unwrap();
    assert_eq!(bins.len(), 2);
    assert_eq!(bins[0].glyphs, vec!["I", "Iacute", "space"]);
    assert_eq!(bins[0].mean, 283);
    assert_eq!(bins[1].glyphs, vec!["H"]);
}

#[test]
fn test_categories_survive_a_save() {
    let path = write_ufo();
    let mut font = Font::open(&path).unwrap();
    assert_eq!(font.category("kaf").unwrap().category, Category::Unknown);

    font.set_category("kaf", Category::Base, None).unwrap();
    font.set_category("Iacute", Category::Mark, Some(2)).unwrap();
    assert!(matches!(
        font.set_category("kaf", Category::Unknown, None),
        Err(GlyphtoolsError::UnsupportedCategory(_))
    ));

    let saved = temp_path("ufo");
    font.save(&saved).unwrap();
    let reopened = Font::open(&saved).unwrap();
    assert_eq!(reopened.category("kaf").unwrap().category, Category::Base);
    let mark = reopened.category("Iacute").unwrap();
    assert_eq!(mark.category, Category::Mark);
    assert_eq!(mark.mark_class, None);
}

#[test]
fn test_duplicate_ufo_glyph() {
    let mut font = Font::open(write_ufo()).unwrap();
    font.set_category("kaf", Category::Base, None).unwrap();
    font.duplicate_glyph("kaf", "kaf.fina").unwrap();

    assert!(font.has_glyph("kaf.fina"));
    assert_eq!(font.metrics("kaf.fina").unwrap(), font.metrics("kaf").unwrap());
    assert_eq!(font.category("kaf.fina").unwrap().category, Category::Base);
}

#[test]
fn test_memory_font_through_the_tagged_font() {
    let mut font = Font::from(
        MemoryFont::new()
            .with_glyph(
                "dot",
                MemoryGlyph::new(100.0, vec![rect_outline(40.0, 0.0, 60.0, 20.0)])
                    .with_anchor(Anchor::new("exit", 0.0, 10.0)),
            )
            .with_glyph("bar", MemoryGlyph::new(100.0, vec![rect_outline(0.0, 0.0, 100.0, 20.0)])),
    );
    assert_eq!(font.format(), FontFormat::Memory);
    assert_eq!(font.metrics("dot").unwrap().rise, -10.0);

    font.duplicate_glyph("dot", "dot.alt").unwrap();
    assert_eq!(font.glyph_names(), vec!["dot", "bar", "dot.alt"]);
    assert!(matches!(
        font.metrics("comma"),
        Err(GlyphtoolsError::GlyphNotFound(ref name)) if name == "comma"
    ));
}
