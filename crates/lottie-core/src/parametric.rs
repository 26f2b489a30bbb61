//! Closed-form shapes to explicit bezier paths.

use crate::animatable::Animator;
use glam::Vec2;
use lottie_data::model::{BezierPath, EllipseShape, PolystarShape, RectShape, Shape};
use std::f32::consts::PI;

/// Handle length of a quarter-circle cubic relative to its radius.
pub const KAPPA: f32 = 0.552_284_75;

/// Outline of `shape` at `frame`. Only geometry nodes have one.
pub fn shape_to_path(shape: &Shape, frame: f32) -> Option<BezierPath> {
    match shape {
        Shape::Rect(rect) => Some(rect_to_path(rect, frame)),
        Shape::Ellipse(ellipse) => Some(ellipse_to_path(ellipse, frame)),
        Shape::Polystar(star) => Some(polystar_to_path(star, frame)),
        Shape::Path(path) => Animator::sample(&path.ks, frame),
        Shape::Group(_)
        | Shape::Fill(_)
        | Shape::Stroke(_)
        | Shape::Transform(_)
        | Shape::Trim(_)
        | Shape::MergePaths(_)
        | Shape::Unknown(_) => None,
    }
}

/// Four sharp corners, clockwise from the top right. Roundness is ignored.
pub fn rect_to_path(rect: &RectShape, frame: f32) -> BezierPath {
    let center = Animator::vec2(&rect.p, frame, Vec2::ZERO);
    let half = Animator::vec2(&rect.s, frame, Vec2::ZERO) / 2.0;

    let mut path = BezierPath {
        c: true,
        ..Default::default()
    };
    for corner in [
        Vec2::new(half.x, -half.y),
        Vec2::new(half.x, half.y),
        Vec2::new(-half.x, half.y),
        Vec2::new(-half.x, -half.y),
    ] {
        path.push((center + corner).to_array(), [0.0, 0.0], [0.0, 0.0]);
    }
    path
}

/// Four cardinal vertices starting at +x, clockwise in y-down space.
pub fn ellipse_to_path(ellipse: &EllipseShape, frame: f32) -> BezierPath {
    let center = Animator::vec2(&ellipse.p, frame, Vec2::ZERO);
    let radius = Animator::vec2(&ellipse.s, frame, Vec2::ZERO) / 2.0;
    // Horizontal handles scale with rx, vertical ones with ry.
    let hx = radius.x * KAPPA;
    let hy = radius.y * KAPPA;

    let mut path = BezierPath {
        c: true,
        ..Default::default()
    };
    let vertices = [
        (Vec2::new(radius.x, 0.0), [0.0, -hy], [0.0, hy]),
        (Vec2::new(0.0, radius.y), [hx, 0.0], [-hx, 0.0]),
        (Vec2::new(-radius.x, 0.0), [0.0, hy], [0.0, -hy]),
        (Vec2::new(0.0, -radius.y), [-hx, 0.0], [hx, 0.0]),
    ];
    for (offset, in_tangent, out_tangent) in vertices {
        path.push((center + offset).to_array(), in_tangent, out_tangent);
    }
    path
}

/// Point counts above this, e.g. from a corrupt file, are clamped.
pub const MAX_POLYSTAR_POINTS: usize = 1000;

/// `points` vertices for a polygon, `2 * points` alternating outer/inner for
/// a star, starting at `rotation - 90` degrees. Roundness is ignored.
pub fn polystar_to_path(star: &PolystarShape, frame: f32) -> BezierPath {
    let center = Animator::vec2(&star.p, frame, Vec2::ZERO);
    let points = Animator::evaluate(&star.pt, frame, 5.0)
        .round()
        .clamp(0.0, MAX_POLYSTAR_POINTS as f32) as usize;
    let outer = Animator::evaluate(&star.or, frame, 0.0);
    let inner = Animator::evaluate(&star.ir, frame, 0.0);
    let rotation = Animator::evaluate(&star.r, frame, 0.0);

    let is_star = star.is_star();
    let total = if is_star { points * 2 } else { points };

    let mut path = BezierPath {
        c: true,
        ..Default::default()
    };
    if total == 0 {
        return path;
    }

    let step = 2.0 * PI / total as f32;
    let start = (rotation - 90.0).to_radians();
    for idx in 0..total {
        let radius = if is_star && idx % 2 == 1 { inner } else { outer };
        let angle = start + step * idx as f32;
        let vertex = center + Vec2::new(angle.cos(), angle.sin()) * radius;
        path.push(vertex.to_array(), [0.0, 0.0], [0.0, 0.0]);
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use lottie_data::model::Property;

    fn length(v: [f32; 2]) -> f32 {
        Vec2::from_array(v).length()
    }

    #[test]
    fn test_ellipse_conversion() {
        let ellipse = EllipseShape {
            nm: None,
            p: Property::fixed(vec![0.0, 0.0]),
            s: Property::fixed(vec![200.0, 100.0]),
            extra: Default::default(),
        };
        let path = ellipse_to_path(&ellipse, 0.0);
        assert!(path.c);
        assert_eq!(
            path.v,
            vec![[100.0, 0.0], [0.0, 50.0], [-100.0, 0.0], [0.0, -50.0]]
        );

        // Handles along the major axis are rx * k long, along the minor axis ry * k.
        for idx in [1, 3] {
            assert_relative_eq!(length(path.i[idx]), 100.0 * KAPPA, epsilon = 1e-3);
            assert_relative_eq!(length(path.o[idx]), 100.0 * KAPPA, epsilon = 1e-3);
            assert_eq!(path.o[idx][1], 0.0);
        }
        for idx in [0, 2] {
            assert_relative_eq!(length(path.i[idx]), 50.0 * KAPPA, epsilon = 1e-3);
            assert_relative_eq!(length(path.o[idx]), 50.0 * KAPPA, epsilon = 1e-3);
            assert_eq!(path.o[idx][0], 0.0);
        }
    }

    #[test]
    fn test_rect_corners_offset_by_position() {
        let rect = RectShape {
            nm: None,
            p: Property::fixed(vec![10.0, 20.0]),
            s: Property::fixed(vec![100.0, 50.0]),
            r: Property::fixed(12.0),
            extra: Default::default(),
        };
        let path = rect_to_path(&rect, 0.0);
        assert_eq!(
            path.v,
            vec![[60.0, -5.0], [60.0, 45.0], [-40.0, 45.0], [-40.0, -5.0]]
        );
        assert!(path.i.iter().chain(path.o.iter()).all(|t| *t == [0.0, 0.0]));
    }

    fn star(sy: u8, points: f32) -> PolystarShape {
        PolystarShape {
            nm: None,
            sy,
            p: Property::fixed(vec![0.0, 0.0]),
            r: Property::fixed(0.0),
            pt: Property::fixed(points),
            ir: Property::fixed(50.0),
            is: Property::default(),
            or: Property::fixed(100.0),
            os: Property::default(),
            extra: Default::default(),
        }
    }

    #[test]
    fn test_star_alternates_radii_from_top() {
        let path = polystar_to_path(&star(1, 5.0), 0.0);
        assert_eq!(path.len(), 10);
        assert_relative_eq!(path.v[0][0], 0.0, epsilon = 1e-3);
        assert_relative_eq!(path.v[0][1], -100.0, epsilon = 1e-3);
        assert_relative_eq!(length(path.v[1]), 50.0, epsilon = 1e-3);
        assert_relative_eq!(length(path.v[2]), 100.0, epsilon = 1e-3);
    }

    #[test]
    fn test_polygon_uses_outer_radius_only() {
        let path = polystar_to_path(&star(2, 6.0), 0.0);
        assert_eq!(path.len(), 6);
        for v in &path.v {
            assert_relative_eq!(length(*v), 100.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_point_count_is_clamped() {
        let huge = polystar_to_path(&star(1, 1e12), 0.0);
        assert_eq!(huge.len(), MAX_POLYSTAR_POINTS * 2);
        assert_eq!(polystar_to_path(&star(2, f32::INFINITY), 0.0).len(), MAX_POLYSTAR_POINTS);
        assert!(polystar_to_path(&star(2, f32::NAN), 0.0).is_empty());
        assert!(polystar_to_path(&star(1, -3.0), 0.0).is_empty());
    }

    #[test]
    fn test_non_geometry_has_no_path() {
        assert!(shape_to_path(&Shape::Unknown(serde_json::json!({"ty": "gf"})), 0.0).is_none());
    }
}
