#![forbid(unsafe_code)]

pub type Unit = euclid::UnknownUnit;

pub type Point = euclid::Point2D<f64, Unit>;
pub type Vector = euclid::Vector2D<f64, Unit>;
pub type Size = euclid::Size2D<f64, Unit>;
pub type Rect = euclid::Rect<f64, Unit>;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}

pub fn vector(x: f64, y: f64) -> Vector {
    euclid::vec2(x, y)
}

/// Point at fraction `t` along the segment from `a` to `b`.
///
/// `t = 0.0` yields `a`, `t = 1.0` yields `b`. Used for placing edge
/// labels part-way along a drawn segment.
pub fn along(a: Point, b: Point, t: f64) -> Point {
    a + (b - a) * t
}

pub fn midpoint(a: Point, b: Point) -> Point {
    along(a, b, 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn along_interpolates_endpoints_and_interior() {
        let a = point(0.0, 0.0);
        let b = point(10.0, -4.0);
        assert_eq!(along(a, b, 0.0), a);
        assert_eq!(along(a, b, 1.0), b);
        let p = along(a, b, 0.3);
        assert!((p.x - 3.0).abs() < 1e-12);
        assert!((p.y + 1.2).abs() < 1e-12);
        assert_eq!(midpoint(a, b), point(5.0, -2.0));
    }
}
