//! Pure seat and bounding-box geometry, in feet.
//!
//! Every function here derives positions from entity parameters alone and
//! returns offsets relative to the entity's own anchor. There are no error
//! paths: degenerate input (zero seats, zero size) yields empty or
//! zero-sized results.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Radius of a single seat marker.
pub const SEAT_RADIUS_FT: f64 = 0.75;
/// Clearance between a table edge and its seats.
pub const SEAT_GAP_FT: f64 = 0.25;
/// Depth seats protrude beyond a table edge.
pub const SEAT_DEPTH_FT: f64 = SEAT_RADIUS_FT * 2.0 + SEAT_GAP_FT;
/// Maximum seats on each short end of a rectangular table.
pub const MAX_END_SEATS: u32 = 3;

/// Axis-aligned bounding box of an entity body, in absolute feet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
    pub center_x: f64,
    pub center_y: f64,
}

impl Bounds {
    /// Bounds of a `width x height` box centered on `center`.
    pub fn from_center(center: Point, width: f64, height: f64) -> Self {
        let half_w = width / 2.0;
        let half_h = height / 2.0;
        Self {
            left: center.x - half_w,
            right: center.x + half_w,
            top: center.y - half_h,
            bottom: center.y + half_h,
            center_x: center.x,
            center_y: center.y,
        }
    }

    /// Bounds of a `width x height` box whose top-left corner is `origin`.
    pub fn from_origin(origin: Point, width: f64, height: f64) -> Self {
        Self {
            left: origin.x,
            right: origin.x + width,
            top: origin.y,
            bottom: origin.y + height,
            center_x: origin.x + width / 2.0,
            center_y: origin.y + height / 2.0,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Point {
        Point::new(self.center_x, self.center_y)
    }

    /// Convert to a kurbo rectangle for containment tests.
    pub fn to_rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.right, self.bottom)
    }

    /// Corner points in handle order: top-left, top-right, bottom-left, bottom-right.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.left, self.top),
            Point::new(self.right, self.top),
            Point::new(self.left, self.bottom),
            Point::new(self.right, self.bottom),
        ]
    }
}

/// Chair spacing preset for chair blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Spacing {
    Tight,
    #[default]
    Normal,
    Wide,
}

impl Spacing {
    /// Center-to-center chair pitch in feet.
    pub fn feet(self) -> f64 {
        match self {
            Spacing::Tight => 1.5,
            Spacing::Normal => 2.0,
            Spacing::Wide => 2.5,
        }
    }
}

/// Which pair of sides of a rectangular table is long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn toggled(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

/// Offsets of `n` seats along a side of half-length `half_len`, centered on 0.
///
/// A single seat sits in the middle. Multiple seats are spread evenly between
/// two inset points so seats near a corner never collide with the seats of
/// the adjacent side.
pub fn side_offsets(n: u32, half_len: f64) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let inset = (SEAT_RADIUS_FT + 0.7 * SEAT_GAP_FT).min(0.25 * half_len);
            let start = -half_len + inset;
            let span = 2.0 * (half_len - inset);
            let step = span / f64::from(n - 1);
            (0..n).map(|i| start + step * f64::from(i)).collect()
        }
    }
}

/// Seat offsets around a round table; seat 0 is due north, then clockwise.
pub fn round_seat_offsets(diameter: f64, seats: u32) -> Vec<Vec2> {
    if seats == 0 {
        return Vec::new();
    }
    let ring = diameter / 2.0 + SEAT_RADIUS_FT + SEAT_GAP_FT;
    let step = 360.0 / f64::from(seats);
    (0..seats)
        .map(|i| {
            let angle = (-90.0 + step * f64::from(i)).to_radians();
            Vec2::new(ring * angle.cos(), ring * angle.sin())
        })
        .collect()
}

/// Footprint of a rectangular table as `(x extent, y extent)`.
pub fn rect_footprint(width: f64, height: f64, orientation: Orientation) -> (f64, f64) {
    match orientation {
        Orientation::Horizontal => (width, height),
        Orientation::Vertical => (height, width),
    }
}

/// Seat offsets around a rectangular table.
///
/// Order: first long side, second long side, first end, second end. Within a
/// side, seats run in increasing coordinate order.
pub fn rect_seat_offsets(
    width: f64,
    height: f64,
    orientation: Orientation,
    seats_per_long_side: u32,
    end_seats: u32,
) -> Vec<Vec2> {
    let end_seats = end_seats.min(MAX_END_SEATS);
    let long_half = width / 2.0;
    let short_half = height / 2.0;
    let long_row = short_half + SEAT_RADIUS_FT + SEAT_GAP_FT;
    let end_row = long_half + SEAT_RADIUS_FT + SEAT_GAP_FT;

    // Built in the horizontal frame (along, across), then mapped.
    let mut local = Vec::with_capacity((seats_per_long_side * 2 + end_seats * 2) as usize);
    for across in [-long_row, long_row] {
        for along in side_offsets(seats_per_long_side, long_half) {
            local.push(Vec2::new(along, across));
        }
    }
    for along in [-end_row, end_row] {
        for across in side_offsets(end_seats, short_half) {
            local.push(Vec2::new(along, across));
        }
    }

    match orientation {
        Orientation::Horizontal => local,
        Orientation::Vertical => local.into_iter().map(|v| Vec2::new(v.y, v.x)).collect(),
    }
}

/// Chair centers of a `rows x cols` block relative to its top-left corner,
/// in row-major order.
pub fn block_seat_offsets(rows: u32, cols: u32, spacing: Spacing) -> Vec<(u32, u32, Vec2)> {
    let pitch = spacing.feet();
    let mut out = Vec::with_capacity((rows * cols) as usize);
    for r in 0..rows {
        for c in 0..cols {
            out.push((
                r,
                c,
                Vec2::new((f64::from(c) + 0.5) * pitch, (f64::from(r) + 0.5) * pitch),
            ));
        }
    }
    out
}

/// Size of a block's chair grid as `(width, height)`.
pub fn block_extent(rows: u32, cols: u32, spacing: Spacing) -> (f64, f64) {
    let pitch = spacing.feet();
    (f64::from(cols) * pitch, f64::from(rows) * pitch)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_side_offsets_single_is_centered() {
        assert_eq!(side_offsets(1, 3.0), vec![0.0]);
        assert!(side_offsets(0, 3.0).is_empty());
    }

    #[test]
    fn test_side_offsets_inset_from_corners() {
        let offsets = side_offsets(3, 3.0);
        let inset = SEAT_RADIUS_FT + 0.7 * SEAT_GAP_FT;
        assert_eq!(offsets.len(), 3);
        assert!((offsets[0] - (-3.0 + inset)).abs() < EPS);
        assert!(offsets[1].abs() < EPS);
        assert!((offsets[2] - (3.0 - inset)).abs() < EPS);
    }

    #[test]
    fn test_side_offsets_short_side_caps_inset() {
        // 0.25 * 1.0 is smaller than the seat-based inset
        let offsets = side_offsets(2, 1.0);
        assert!((offsets[0] + 0.75).abs() < EPS);
        assert!((offsets[1] - 0.75).abs() < EPS);
    }

    #[test]
    fn test_round_seat_zero_is_north() {
        let seats = round_seat_offsets(5.0, 8);
        assert_eq!(seats.len(), 8);
        let ring = 2.5 + SEAT_RADIUS_FT + SEAT_GAP_FT;
        assert!(seats[0].x.abs() < EPS);
        assert!((seats[0].y + ring).abs() < EPS);
        // Clockwise in screen space: seat 2 of 8 is due east
        assert!((seats[2].x - ring).abs() < EPS);
        assert!(seats[2].y.abs() < EPS);
    }

    #[test]
    fn test_round_zero_seats() {
        assert!(round_seat_offsets(5.0, 0).is_empty());
    }

    #[test]
    fn test_rect_seats_horizontal_with_ends() {
        let seats = rect_seat_offsets(6.0, 3.0, Orientation::Horizontal, 3, 1);
        assert_eq!(seats.len(), 8);
        let end_row = 3.0 + SEAT_RADIUS_FT + SEAT_GAP_FT;
        // End seats are centered on the short edges
        assert!((seats[6].x + end_row).abs() < EPS);
        assert!(seats[6].y.abs() < EPS);
        assert!((seats[7].x - end_row).abs() < EPS);
        assert!(seats[7].y.abs() < EPS);
        // Long sides above and below
        assert!(seats[..3].iter().all(|s| s.y < 0.0));
        assert!(seats[3..6].iter().all(|s| s.y > 0.0));
    }

    #[test]
    fn test_rect_seats_vertical_swaps_axes() {
        let horizontal = rect_seat_offsets(6.0, 3.0, Orientation::Horizontal, 2, 0);
        let vertical = rect_seat_offsets(6.0, 3.0, Orientation::Vertical, 2, 0);
        for (h, v) in horizontal.iter().zip(&vertical) {
            assert!((h.x - v.y).abs() < EPS);
            assert!((h.y - v.x).abs() < EPS);
        }
        assert_eq!(rect_footprint(6.0, 3.0, Orientation::Vertical), (3.0, 6.0));
    }

    #[test]
    fn test_rect_end_seats_capped() {
        let seats = rect_seat_offsets(8.0, 3.0, Orientation::Horizontal, 0, 7);
        assert_eq!(seats.len(), (MAX_END_SEATS * 2) as usize);
    }

    #[test]
    fn test_block_offsets_row_major() {
        let seats = block_seat_offsets(2, 3, Spacing::Normal);
        assert_eq!(seats.len(), 6);
        let (r, c, offset) = seats[5];
        assert_eq!((r, c), (1, 2));
        assert!((offset.x - 5.0).abs() < EPS);
        assert!((offset.y - 3.0).abs() < EPS);
        assert_eq!(block_extent(2, 3, Spacing::Wide), (7.5, 5.0));
    }

    #[test]
    fn test_bounds_from_center_and_origin() {
        let a = Bounds::from_center(Point::new(10.0, 10.0), 4.0, 2.0);
        let b = Bounds::from_origin(Point::new(8.0, 9.0), 4.0, 2.0);
        assert_eq!(a, b);
        assert_eq!(a.corners()[3], Point::new(12.0, 11.0));
    }
}
