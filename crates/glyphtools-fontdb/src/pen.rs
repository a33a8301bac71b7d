// this_file: crates/glyphtools-fontdb/src/pen.rs

//! Recording skrifa outlines as kurbo paths, one per contour.

use glyphtools_core::Outline;
use kurbo::BezPath;
use skrifa::outline::OutlinePen;

/// Pen that starts a fresh path at every `move_to`
#[derive(Debug, Default)]
pub struct ContourPen {
    finished: Vec<BezPath>,
    current: BezPath,
}

impl ContourPen {
    pub fn new() -> Self {
        Self::default()
    }

    fn flush(&mut self) {
        let path = std::mem::take(&mut self.current);
        if !path.elements().is_empty() {
            self.finished.push(path);
        }
    }

    /// Hand back every contour drawn so far.
    pub fn into_outlines(mut self) -> Vec<Outline> {
        self.flush();
        self.finished.into_iter().map(Outline::new).collect()
    }
}

impl OutlinePen for ContourPen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.flush();
        self.current.move_to((x as f64, y as f64));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.current.line_to((x as f64, y as f64));
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.current
            .quad_to((cx0 as f64, cy0 as f64), (x as f64, y as f64));
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.current.curve_to(
            (cx0 as f64, cy0 as f64),
            (cx1 as f64, cy1 as f64),
            (x as f64, y as f64),
        );
    }

    fn close(&mut self) {
        self.current.close_path();
        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_move_starts_a_contour() {
        let mut pen = ContourPen::new();
        pen.move_to(0.0, 0.0);
        pen.line_to(10.0, 0.0);
        pen.line_to(10.0, 10.0);
        pen.close();
        pen.move_to(20.0, 0.0);
        pen.quad_to(25.0, 10.0, 30.0, 0.0);
        pen.close();

        let outlines = pen.into_outlines();
        assert_eq!(outlines.len(), 2);
        assert_eq!(outlines[0].bounds().map(|r| r.x1), Some(10.0));
        assert_eq!(outlines[1].bounds().map(|r| r.x0), Some(20.0));
    }

    #[test]
    fn test_unclosed_contour_is_kept() {
        let mut pen = ContourPen::new();
        pen.move_to(0.0, 0.0);
        pen.line_to(5.0, 5.0);
        assert_eq!(pen.into_outlines().len(), 1);
    }

    #[test]
    fn test_no_drawing_no_outlines() {
        assert!(ContourPen::new().into_outlines().is_empty());
    }
}
