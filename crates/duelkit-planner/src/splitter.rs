//! Splitting a linear move at a target Y ordinate.

use duelkit_core::Point;

/// Result of splitting one move into two partial moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveSplit {
    /// The interpolated crossing point on the original line.
    pub mid: Point,
    /// Extrusion apportioned to the first partial move.
    pub first_e: Option<f64>,
    /// Extrusion apportioned to the second partial move.
    pub second_e: Option<f64>,
}

/// Split the move from `start` to `end` at `target_y`.
///
/// `target_y` must lie strictly between `start.y` and `end.y`. Vertical
/// moves keep `start.x` unchanged; otherwise the crossing X is solved on
/// the line through the endpoints. Extrusion is apportioned by the
/// fractional Y distance each partial covers, with the remainder assigned
/// to the second half so the two amounts always sum to the original.
/// The caller carries the original feed rate on both halves.
pub fn split_at_y(start: Point, end: Point, target_y: f64, extrusion: Option<f64>) -> MoveSplit {
    debug_assert!(
        (start.y < target_y && target_y < end.y) || (end.y < target_y && target_y < start.y),
        "split ordinate must lie strictly inside the move"
    );
    let x = if start.x == end.x {
        start.x
    } else {
        start.x + (end.x - start.x) * (target_y - start.y) / (end.y - start.y)
    };
    let fraction = (target_y - start.y) / (end.y - start.y);
    let first_e = extrusion.map(|e| e * fraction);
    let second_e = match (extrusion, first_e) {
        (Some(e), Some(first)) => Some(e - first),
        _ => None,
    };
    MoveSplit {
        mid: Point::new(x, target_y),
        first_e,
        second_e,
    }
}
