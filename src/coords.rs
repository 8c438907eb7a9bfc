//! Schematic millimetres to Falstad grid units.

use std::fmt::Display;
use std::ops::Add;

use crate::schematic::Point;

/// Grid units per schematic millimetre (8 grid units per 50 mil)
pub const SCALE: f64 = 8.0 / 1.27;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridPoint {
    pub x: i64,
    pub y: i64,
}

impl GridPoint {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl Add<(i64, i64)> for GridPoint {
    type Output = GridPoint;

    fn add(self, (dx, dy): (i64, i64)) -> GridPoint {
        GridPoint::new(self.x + dx, self.y + dy)
    }
}

impl Display for GridPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.x, self.y)
    }
}

/// Scale a scalar, rounding half to even
pub fn scale(value: f64) -> i64 {
    (value * SCALE).round_ties_even() as i64
}

pub fn map(point: Point) -> GridPoint {
    GridPoint::new(scale(point.x), scale(point.y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case(0.0, 0)]
    #[case(1.27, 8)]
    #[case(2.54, 16)]
    #[case(-2.54, -16)]
    #[case(100.33, 632)]
    fn scales_scalars(#[case] value: f64, #[case] expected: i64) {
        assert_eq!(scale(value), expected);
    }

    #[test]
    fn maps_origin_to_origin() {
        assert_eq!(map(Point::new(0.0, 0.0)), GridPoint::new(0, 0));
    }

    #[test]
    fn scaling_is_linear_on_the_grid() {
        for step in 0..200 {
            let x = step as f64 * 1.27;
            assert_eq!(scale(2.0 * x), 2 * scale(x));
        }
    }

    #[test]
    fn formats_pairs_with_one_space() {
        let p = map(Point::new(2.54, -5.08)) + (0, 16);
        assert_eq!(p.to_string(), "16 -16");
    }
}
