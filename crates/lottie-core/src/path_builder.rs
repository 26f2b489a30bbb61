use glam::Vec2;
use lottie_data::model::BezierPath;

fn rel(p: Vec2, origin: Vec2) -> [f32; 2] {
    [p.x - origin.x, p.y - origin.y]
}

/// Accumulates absolute drawing commands into relative-tangent sub-paths.
///
/// Every `move_to` after the first starts a new sub-path. A drawing command
/// that follows `close` without an intervening `move_to` starts a new
/// sub-path at the closed path's start point.
#[derive(Debug, Default)]
pub struct PathBuilder {
    paths: Vec<BezierPath>,
    current: BezierPath,
    cursor: Vec2,
    start: Vec2,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    pub fn move_to(&mut self, p: Vec2) {
        self.flush();
        self.current.push(p.to_array(), [0.0, 0.0], [0.0, 0.0]);
        self.cursor = p;
        self.start = p;
    }

    pub fn line_to(&mut self, p: Vec2) {
        self.ensure_open();
        self.current.push(p.to_array(), [0.0, 0.0], [0.0, 0.0]);
        self.cursor = p;
    }

    /// Cubic segment with absolute control points.
    pub fn cubic_to(&mut self, c1: Vec2, c2: Vec2, p: Vec2) {
        self.ensure_open();
        let from = self.cursor;
        if let Some(out) = self.current.o.last_mut() {
            *out = rel(c1, from);
        }
        self.current.push(p.to_array(), rel(c2, p), [0.0, 0.0]);
        self.cursor = p;
    }

    /// Quadratic segment, elevated to a cubic.
    pub fn quad_to(&mut self, q: Vec2, p: Vec2) {
        let p0 = self.cursor;
        let c1 = p0 + (q - p0) * (2.0 / 3.0);
        let c2 = p + (q - p) * (2.0 / 3.0);
        self.cubic_to(c1, c2, p);
    }

    pub fn close(&mut self) {
        if self.current.is_empty() {
            return;
        }
        self.current.c = true;

        // A closing segment drawn explicitly back to the start duplicates the
        // first vertex; fold it into the first one.
        let n = self.current.len();
        if n > 1 && self.current.v[n - 1] == self.current.v[0] {
            self.current.v.pop();
            self.current.o.pop();
            if let Some(in_tangent) = self.current.i.pop() {
                self.current.i[0] = in_tangent;
            }
        }
        self.cursor = self.start;
    }

    pub fn finish(mut self) -> Vec<BezierPath> {
        self.flush();
        self.paths
    }

    fn flush(&mut self) {
        let done = std::mem::take(&mut self.current);
        if !done.is_empty() {
            self.paths.push(done);
        }
    }

    fn ensure_open(&mut self) {
        if self.current.c {
            self.flush();
        }
        if self.current.is_empty() {
            self.current.push(self.cursor.to_array(), [0.0, 0.0], [0.0, 0.0]);
            self.start = self.cursor;
        }
    }
}
