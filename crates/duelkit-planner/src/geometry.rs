//! Footprint geometry and overlap detection.
//!
//! Both toolheads are modelled as axis-aligned rectangles of identical
//! size (body plus clearance), centered on the nozzle position and
//! independent of heading. Two predicates decide whether a move is safe:
//! a boundary-inclusive footprint overlap at the destination, and a
//! swept-path test along the move.
//!
//! The swept region is approximated by the quadrilateral connecting the
//! two footprint corners perpendicular to the travel direction at each
//! endpoint, omitting the two far corners of the true swept area. The
//! approximation can only under-detect, never over-detect, so callers
//! must additionally check the destination footprint on every move.

use duelkit_core::Point;
use duelkit_settings::MachineProfile;

/// Axis-aligned rectangle, closed on all sides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    /// Corner points in counter-clockwise order starting bottom-left.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.min.x, self.min.y),
            Point::new(self.max.x, self.min.y),
            Point::new(self.max.x, self.max.y),
            Point::new(self.min.x, self.max.y),
        ]
    }
}

/// Overlap predicates for one footprint size.
#[derive(Debug, Clone, Copy)]
pub struct Geometry {
    half_width: f64,
    half_height: f64,
}

impl Geometry {
    pub fn new(profile: &MachineProfile) -> Self {
        Self {
            half_width: profile.footprint_width() / 2.0,
            half_height: profile.footprint_height() / 2.0,
        }
    }

    /// The footprint rectangle centered on `p`.
    pub fn footprint(&self, p: Point) -> Rect {
        Rect {
            min: Point::new(p.x - self.half_width, p.y - self.half_height),
            max: Point::new(p.x + self.half_width, p.y + self.half_height),
        }
    }

    /// True iff the footprints centered on `a` and `b` intersect.
    /// Boundary touch counts as overlap: the heads are physical objects
    /// and a near-miss must be treated as a collision.
    pub fn overlaps(&self, a: Point, b: Point) -> bool {
        (a.x - b.x).abs() <= 2.0 * self.half_width && (a.y - b.y).abs() <= 2.0 * self.half_height
    }

    /// True iff the quadrilateral swept by translating the footprint
    /// from `from` to `to` intersects the footprint centered on `other`.
    pub fn sweep_overlaps(&self, from: Point, to: Point, other: Point) -> bool {
        let quad = self.sweep_quad(from, to);
        polygons_intersect(&quad, &self.footprint(other).corners())
    }

    /// The swept quadrilateral: each endpoint contributes the two
    /// footprint corners on the diagonal perpendicular to travel.
    fn sweep_quad(&self, from: Point, to: Point) -> [Point; 4] {
        let (w, h) = (self.half_width, self.half_height);
        let (p1, p2) = if from.x <= to.x { (from, to) } else { (to, from) };
        if p1.y > p2.y {
            // Descending left-to-right: keep the bottom-left/top-right corners.
            [
                Point::new(p1.x - w, p1.y - h),
                Point::new(p1.x + w, p1.y + h),
                Point::new(p2.x + w, p2.y + h),
                Point::new(p2.x - w, p2.y - h),
            ]
        } else {
            // Ascending or flat: keep the top-left/bottom-right corners.
            [
                Point::new(p1.x - w, p1.y + h),
                Point::new(p1.x + w, p1.y - h),
                Point::new(p2.x + w, p2.y - h),
                Point::new(p2.x - w, p2.y + h),
            ]
        }
    }
}

/// Boundary-inclusive separating-axis test over two convex polygons.
fn polygons_intersect(a: &[Point], b: &[Point]) -> bool {
    !has_separating_axis(a, b) && !has_separating_axis(b, a)
}

fn has_separating_axis(edges_of: &[Point], other: &[Point]) -> bool {
    for i in 0..edges_of.len() {
        let p = edges_of[i];
        let q = edges_of[(i + 1) % edges_of.len()];
        let (ex, ey) = (q.x - p.x, q.y - p.y);
        if ex == 0.0 && ey == 0.0 {
            // Degenerate edge of a collapsed quad (zero-length move).
            continue;
        }
        let axis = (-ey, ex);
        let (a_min, a_max) = project(edges_of, axis);
        let (b_min, b_max) = project(other, axis);
        // A strict gap separates; touching projections count as contact.
        if a_max < b_min || b_max < a_min {
            return true;
        }
    }
    false
}

fn project(points: &[Point], axis: (f64, f64)) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for p in points {
        let d = p.x * axis.0 + p.y * axis.1;
        min = min.min(d);
        max = max.max(d);
    }
    (min, max)
}
