//! Starter layers created by the drawing tools.

use crate::config::EditorConfig;
use lottie_data::model::{
    BezierPath, EllipseShape, FillShape, GroupShape, Layer, LayerType, PathShape, PolystarShape,
    Property, RectShape, Shape, StrokeShape, Transform, TransformShape, Vec2,
};
use std::str::FromStr;

/// Where new layers are placed: the middle of a 1920x1080 canvas.
pub const CANVAS_CENTER: [f32; 3] = [960.0, 540.0, 0.0];
const TEMPLATE_OP: f32 = 300.0;
const MIN_PEN_POINTS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    Rectangle,
    Ellipse,
    Star,
    Polygon,
}

impl FromStr for Template {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rectangle" | "rect" => Ok(Template::Rectangle),
            "ellipse" | "circle" => Ok(Template::Ellipse),
            "star" => Ok(Template::Star),
            "polygon" => Ok(Template::Polygon),
            other => Err(format!("unknown template `{other}`")),
        }
    }
}

impl Template {
    pub fn build(self, id: u64) -> Layer {
        match self {
            Template::Rectangle => rectangle_layer(id),
            Template::Ellipse => ellipse_layer(id),
            Template::Star => star_layer(id),
            Template::Polygon => polygon_layer(id),
        }
    }
}

fn centered_transform() -> Transform {
    Transform {
        p: Property::fixed(CANVAS_CENTER.to_vec()),
        ..Transform::identity_3d()
    }
}

fn base_layer(id: u64, name: impl Into<String>, op: f32) -> Layer {
    let mut layer = Layer::new(id, LayerType::Shape);
    layer.nm = Some(name.into());
    layer.ks = centered_transform();
    layer.op = op;
    layer.shapes = Some(Vec::new());
    layer
}

fn fill(color: [f32; 3], opacity: f32) -> Shape {
    Shape::Fill(FillShape {
        nm: Some("Fill".to_string()),
        c: Property::fixed(color.to_vec()),
        o: Property::fixed(opacity),
        r: None,
        extra: Default::default(),
    })
}

fn group_transform(t: Transform) -> Shape {
    Shape::Transform(TransformShape {
        nm: Some("Transform".to_string()),
        t,
    })
}

/// A layer holding one group of `primitive`, a fill and an identity transform.
fn primitive_layer(id: u64, kind: &str, primitive: Shape, color: [f32; 3]) -> Layer {
    let mut layer = base_layer(id, format!("{kind} Layer"), TEMPLATE_OP);
    layer.shapes = Some(vec![Shape::Group(GroupShape {
        nm: Some(format!("{kind} Group")),
        it: vec![primitive, fill(color, 100.0), group_transform(Transform::identity_2d())],
        extra: Default::default(),
    })]);
    layer
}

fn origin() -> Property<Vec<f32>> {
    Property::fixed(vec![0.0, 0.0])
}

pub fn rectangle_layer(id: u64) -> Layer {
    let rect = Shape::Rect(RectShape {
        nm: Some("Rectangle Path".to_string()),
        p: origin(),
        s: Property::fixed(vec![200.0, 200.0]),
        r: Property::fixed(0.0),
        extra: Default::default(),
    });
    primitive_layer(id, "Rectangle", rect, [1.0, 0.0, 0.0])
}

pub fn ellipse_layer(id: u64) -> Layer {
    let ellipse = Shape::Ellipse(EllipseShape {
        nm: Some("Ellipse Path".to_string()),
        p: origin(),
        s: Property::fixed(vec![200.0, 200.0]),
        extra: Default::default(),
    });
    primitive_layer(id, "Ellipse", ellipse, [0.0, 0.5, 1.0])
}

fn polystar(name: &str, sy: u8, points: f32) -> PolystarShape {
    PolystarShape {
        nm: Some(name.to_string()),
        sy,
        p: origin(),
        r: Property::fixed(0.0),
        pt: Property::fixed(points),
        ir: Property::default(),
        is: Property::default(),
        or: Property::fixed(100.0),
        os: Property::default(),
        extra: Default::default(),
    }
}

pub fn star_layer(id: u64) -> Layer {
    let star = PolystarShape {
        ir: Property::fixed(50.0),
        is: Property::fixed(0.0),
        os: Property::fixed(0.0),
        ..polystar("Star Path", 1, 5.0)
    };
    primitive_layer(id, "Star", Shape::Polystar(star), [1.0, 1.0, 0.0])
}

pub fn polygon_layer(id: u64) -> Layer {
    let polygon = polystar("Polygon Path", 2, 6.0);
    primitive_layer(id, "Polygon", Shape::Polystar(polygon), [0.0, 1.0, 0.5])
}

/// A point placed with the pen tool, in canvas coordinates. Tangents are
/// relative to `v`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PenPoint {
    pub v: Vec2,
    pub i: Vec2,
    pub o: Vec2,
}

/// Stroked path through `points`, re-centred on the layer position. `None`
/// for fewer than two points.
pub fn pen_path_layer(id: u64, points: &[PenPoint], closed: bool) -> Option<Layer> {
    if points.len() < MIN_PEN_POINTS {
        return None;
    }
    let mut path = BezierPath {
        c: closed,
        ..Default::default()
    };
    for point in points {
        path.push(
            [point.v[0] - CANVAS_CENTER[0], point.v[1] - CANVAS_CENTER[1]],
            point.i,
            point.o,
        );
    }

    let stroke = Shape::Stroke(StrokeShape {
        nm: Some("Stroke".to_string()),
        c: Property::fixed(vec![0.0, 0.0, 0.0]),
        w: Property::fixed(4.0),
        o: Property::fixed(100.0),
        lc: Some(2),
        lj: Some(2),
        ml: None,
        extra: Default::default(),
    });

    let mut layer = base_layer(id, "Pen Path Layer", TEMPLATE_OP);
    layer.shapes = Some(vec![Shape::Group(GroupShape {
        nm: Some("Path Group".to_string()),
        it: vec![
            Shape::Path(PathShape {
                nm: Some("Path".to_string()),
                ks: Property::fixed(path),
                extra: Default::default(),
            }),
            stroke,
            fill([0.5, 0.5, 0.5], 30.0),
            group_transform(Transform::identity_3d()),
        ],
        extra: Default::default(),
    })]);
    Some(layer)
}

/// Text layer whose shapes are filled in by a later text sync. It lasts as
/// long as the document, `op`.
pub fn text_layer(id: u64, text: &str, op: f32, config: &EditorConfig) -> Layer {
    let label: String = text.chars().take(10).collect();
    let mut layer = base_layer(id, format!("Text: {label}"), op);
    layer.text = Some(text.to_string());
    layer.font = Some(config.default_font.clone());
    layer.font_size = Some(config.default_font_size);
    layer
}
