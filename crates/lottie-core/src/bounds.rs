//! Layer extents in layer space, used to size selection boxes.

use crate::animatable::Animator;
use glam::Vec2;
use kurbo::{Affine, BezPath, Point, Rect, Shape as _};
use lottie_data::model::{BezierPath, Layer, Shape, Transform};

/// Size of the box reported for a layer with nothing to measure.
pub const EMPTY_BOUNDS_SIZE: f32 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerBounds {
    pub width: f32,
    pub height: f32,
    /// Center of the box.
    pub offset_x: f32,
    pub offset_y: f32,
}

impl LayerBounds {
    fn from_rect(rect: Rect) -> Self {
        let center = rect.center();
        LayerBounds {
            width: rect.width() as f32,
            height: rect.height() as f32,
            offset_x: center.x as f32,
            offset_y: center.y as f32,
        }
    }
}

impl Default for LayerBounds {
    fn default() -> Self {
        LayerBounds {
            width: EMPTY_BOUNDS_SIZE,
            height: EMPTY_BOUNDS_SIZE,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

/// Accumulated group placement. Rotation is not applied.
#[derive(Debug, Clone, Copy)]
struct Placement {
    offset: Vec2,
    scale: Vec2,
}

impl Placement {
    const IDENTITY: Placement = Placement {
        offset: Vec2::ZERO,
        scale: Vec2::ONE,
    };

    fn nest(self, tr: &Transform, frame: f32) -> Placement {
        let p = Animator::vec2(&tr.p, frame, Vec2::ZERO);
        let s = Animator::vec2(&tr.s, frame, Vec2::splat(100.0)) / 100.0;
        Placement {
            offset: self.offset + p * self.scale,
            scale: self.scale * s,
        }
    }

    fn apply(self, point: Vec2) -> Vec2 {
        point * self.scale + self.offset
    }

    fn affine(self) -> Affine {
        Affine::new([
            self.scale.x as f64,
            0.0,
            0.0,
            self.scale.y as f64,
            self.offset.x as f64,
            self.offset.y as f64,
        ])
    }
}

fn point(v: Vec2) -> Point {
    Point::new(v.x as f64, v.y as f64)
}

fn centered(center: Vec2, size: Vec2) -> Rect {
    Rect::from_center_size(point(center), (size.x.abs() as f64, size.y.abs() as f64))
}

/// Outline of a vertex path as a kurbo path, closing back to the first
/// vertex when `c` is set.
pub fn to_bez_path(path: &BezierPath) -> BezPath {
    let mut bp = BezPath::new();
    let n = path.v.len();
    if n == 0 {
        return bp;
    }
    let pt = |p: [f32; 2]| Point::new(p[0] as f64, p[1] as f64);
    let tangent = |list: &[[f32; 2]], idx: usize| list.get(idx).copied().unwrap_or([0.0, 0.0]);

    bp.move_to(pt(path.v[0]));
    for idx in 0..n {
        let next = (idx + 1) % n;
        if next == 0 && !path.c {
            break;
        }
        let p0 = path.v[idx];
        let p1 = path.v[next];
        let out = tangent(&path.o, idx);
        let inn = tangent(&path.i, next);
        bp.curve_to(
            pt([p0[0] + out[0], p0[1] + out[1]]),
            pt([p1[0] + inn[0], p1[1] + inn[1]]),
            pt(p1),
        );
    }
    if path.c {
        bp.close_path();
    }
    bp
}

fn path_extent(path: &BezierPath, place: Placement) -> Option<Rect> {
    match path.v.as_slice() {
        [] => None,
        [only] => {
            let p = point(place.apply(Vec2::from_array(*only)));
            Some(Rect::from_points(p, p))
        }
        _ => Some((place.affine() * to_bez_path(path)).bounding_box()),
    }
}

fn collect(items: &[Shape], place: Placement, frame: f32, acc: &mut Option<Rect>) {
    for item in items {
        let extent = match item {
            Shape::Group(group) => {
                let inner = group
                    .transform()
                    .map_or(place, |tr| place.nest(tr, frame));
                collect(&group.it, inner, frame, acc);
                None
            }
            Shape::Rect(rect) => {
                let center = place.apply(Animator::vec2(&rect.p, frame, Vec2::ZERO));
                let size = Animator::vec2(&rect.s, frame, Vec2::ZERO) * place.scale;
                Some(centered(center, size))
            }
            Shape::Ellipse(ellipse) => {
                let center = place.apply(Animator::vec2(&ellipse.p, frame, Vec2::ZERO));
                let size = Animator::vec2(&ellipse.s, frame, Vec2::ZERO) * place.scale;
                Some(centered(center, size))
            }
            Shape::Polystar(star) => {
                let center = place.apply(Animator::vec2(&star.p, frame, Vec2::ZERO));
                let radius = Animator::evaluate(&star.or, frame, 0.0) * place.scale.abs().max_element();
                Some(centered(center, Vec2::splat(radius * 2.0)))
            }
            Shape::Path(path) => {
                Animator::sample(&path.ks, frame).and_then(|p| path_extent(&p, place))
            }
            Shape::Fill(_)
            | Shape::Stroke(_)
            | Shape::Transform(_)
            | Shape::Trim(_)
            | Shape::MergePaths(_)
            | Shape::Unknown(_) => None,
        };
        if let Some(rect) = extent {
            *acc = Some(acc.map_or(rect, |prev| prev.union(rect)));
        }
    }
}

/// Box around every geometry node of `layer` at `frame`, in layer space.
/// Layers without geometry get a 200x200 box at the origin.
pub fn layer_bounds(layer: &Layer, frame: f32) -> LayerBounds {
    let mut acc = None;
    if let Some(shapes) = &layer.shapes {
        collect(shapes, Placement::IDENTITY, frame, &mut acc);
    }
    acc.map_or_else(LayerBounds::default, LayerBounds::from_rect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::{ellipse_layer, star_layer};
    use approx::assert_relative_eq;
    use lottie_data::model::LayerType;
    use serde_json::json;

    #[test]
    fn test_empty_layer_defaults() {
        let layer = Layer::new(1, LayerType::Shape);
        assert_eq!(layer_bounds(&layer, 0.0), LayerBounds::default());
    }

    #[test]
    fn test_group_transform_moves_and_scales() {
        let layer: Layer = serde_json::from_value(json!({
            "ind": 1, "ty": 4,
            "shapes": [{"ty": "gr", "it": [
                {"ty": "rc", "p": {"a": 0, "k": [10, 0]}, "s": {"a": 0, "k": [100, 40]}, "r": {"a": 0, "k": 0}},
                {"ty": "tr", "p": {"a": 0, "k": [50, 50]}, "s": {"a": 0, "k": [200, 50]}}
            ]}]
        }))
        .unwrap();
        let bounds = layer_bounds(&layer, 0.0);
        assert_relative_eq!(bounds.width, 200.0);
        assert_relative_eq!(bounds.height, 20.0);
        assert_relative_eq!(bounds.offset_x, 70.0);
        assert_relative_eq!(bounds.offset_y, 50.0);
    }

    #[test]
    fn test_template_layers() {
        let bounds = layer_bounds(&ellipse_layer(1), 0.0);
        assert_relative_eq!(bounds.width, 200.0);
        assert_relative_eq!(bounds.offset_x, 0.0);

        let star = layer_bounds(&star_layer(1), 0.0);
        assert_relative_eq!(star.width, 200.0);
        assert_relative_eq!(star.height, 200.0);
    }

    #[test]
    fn test_curved_path_uses_curve_extent() {
        let layer: Layer = serde_json::from_value(json!({
            "ind": 1, "ty": 4,
            "shapes": [{"ty": "sh", "ks": {"a": 0, "k": {
                "c": false,
                "v": [[0, 0], [100, 0]],
                "i": [[0, 0], [0, 40]],
                "o": [[0, 40], [0, 0]]
            }}}]
        }))
        .unwrap();
        let bounds = layer_bounds(&layer, 0.0);
        assert_relative_eq!(bounds.width, 100.0, epsilon = 1e-3);
        assert_relative_eq!(bounds.height, 30.0, epsilon = 1e-3);
    }

    #[test]
    fn test_union_spans_shapes() {
        let layer: Layer = serde_json::from_value(json!({
            "ind": 1, "ty": 4,
            "shapes": [
                {"ty": "el", "p": {"a": 0, "k": [-100, 0]}, "s": {"a": 0, "k": [20, 20]}},
                {"ty": "el", "p": {"a": 1, "k": [{"t": 0, "s": [100, 0]}, {"t": 10, "s": [300, 0]}]},
                 "s": {"a": 0, "k": [20, 20]}}
            ]
        }))
        .unwrap();
        assert_relative_eq!(layer_bounds(&layer, 0.0).width, 220.0);
        assert_relative_eq!(layer_bounds(&layer, 10.0).width, 420.0);
    }
}
