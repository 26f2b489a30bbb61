//! Typed addresses of animatable properties inside a layer.
//!
//! A [`PropertyPath`] names either a field of the layer transform or a field
//! of a shape node reached through nested group indices. The legacy dotted
//! form (`ks.p`, `shapes.0.it.2.p`) is accepted by [`PropertyPath::parse`].

use crate::error::EditError;
use lottie_data::model::{BezierPath, Layer, Property, Shape, Transform, Vector};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformField {
    Anchor,
    Position,
    Scale,
    Rotation,
    Opacity,
}

impl TransformField {
    pub fn key(self) -> &'static str {
        match self {
            TransformField::Anchor => "a",
            TransformField::Position => "p",
            TransformField::Scale => "s",
            TransformField::Rotation => "r",
            TransformField::Opacity => "o",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "a" => Some(TransformField::Anchor),
            "p" => Some(TransformField::Position),
            "s" => Some(TransformField::Scale),
            "r" | "rz" => Some(TransformField::Rotation),
            "o" => Some(TransformField::Opacity),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeField {
    Position,
    Size,
    Roundness,
    Rotation,
    Points,
    InnerRadius,
    InnerRoundness,
    OuterRadius,
    OuterRoundness,
    Path,
    Color,
    Opacity,
    Width,
    Anchor,
    Scale,
    TrimStart,
    TrimEnd,
    TrimOffset,
}

impl ShapeField {
    pub fn key(self) -> &'static str {
        match self {
            ShapeField::Position => "p",
            ShapeField::Size | ShapeField::Scale | ShapeField::TrimStart => "s",
            ShapeField::Roundness | ShapeField::Rotation => "r",
            ShapeField::Points => "pt",
            ShapeField::InnerRadius => "ir",
            ShapeField::InnerRoundness => "is",
            ShapeField::OuterRadius => "or",
            ShapeField::OuterRoundness => "os",
            ShapeField::Path => "ks",
            ShapeField::Color => "c",
            ShapeField::Opacity | ShapeField::TrimOffset => "o",
            ShapeField::Width => "w",
            ShapeField::Anchor => "a",
            ShapeField::TrimEnd => "e",
        }
    }

    /// The field behind `key` on this kind of node.
    pub fn from_key(shape: &Shape, key: &str) -> Option<Self> {
        use ShapeField::*;
        let field = match (shape, key) {
            (Shape::Rect(_), "p") | (Shape::Ellipse(_), "p") | (Shape::Polystar(_), "p") => {
                Position
            }
            (Shape::Rect(_), "s") | (Shape::Ellipse(_), "s") => Size,
            (Shape::Rect(_), "r") => Roundness,
            (Shape::Polystar(_), "r") => Rotation,
            (Shape::Polystar(_), "pt") => Points,
            (Shape::Polystar(_), "ir") => InnerRadius,
            (Shape::Polystar(_), "is") => InnerRoundness,
            (Shape::Polystar(_), "or") => OuterRadius,
            (Shape::Polystar(_), "os") => OuterRoundness,
            (Shape::Path(_), "ks") => Path,
            (Shape::Fill(_), "c") | (Shape::Stroke(_), "c") => Color,
            (Shape::Fill(_), "o") | (Shape::Stroke(_), "o") => Opacity,
            (Shape::Stroke(_), "w") => Width,
            (Shape::Transform(_), key) => match TransformField::from_key(key)? {
                TransformField::Anchor => Anchor,
                TransformField::Position => Position,
                TransformField::Scale => Scale,
                TransformField::Rotation => Rotation,
                TransformField::Opacity => Opacity,
            },
            (Shape::Trim(_), "s") => TrimStart,
            (Shape::Trim(_), "e") => TrimEnd,
            (Shape::Trim(_), "o") => TrimOffset,
            _ => return None,
        };
        Some(field)
    }
}

/// Position of a shape node: an index into the layer's shapes followed by
/// indices into each nested group's items.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShapeIndex(Vec<usize>);

impl ShapeIndex {
    pub fn new(indices: impl Into<Vec<usize>>) -> Self {
        ShapeIndex(indices.into())
    }

    pub fn root(index: usize) -> Self {
        ShapeIndex(vec![index])
    }

    /// Index of the `index`-th item of the group at `self`.
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        ShapeIndex(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Parses `0.2.1` or `0,2,1`.
    pub fn parse(s: &str) -> Result<Self, EditError> {
        let indices = s
            .split(['.', ','])
            .filter(|part| !part.is_empty())
            .map(|part| part.trim().parse::<usize>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| EditError::InvalidPath(s.to_string()))?;
        if indices.is_empty() {
            return Err(EditError::InvalidPath(s.to_string()));
        }
        Ok(ShapeIndex(indices))
    }

    pub fn get<'a>(&self, shapes: &'a [Shape]) -> Option<&'a Shape> {
        let (first, rest) = self.0.split_first()?;
        let mut node = shapes.get(*first)?;
        for &idx in rest {
            node = match node {
                Shape::Group(group) => group.it.get(idx)?,
                _ => return None,
            };
        }
        Some(node)
    }

    pub fn get_mut<'a>(&self, shapes: &'a mut [Shape]) -> Option<&'a mut Shape> {
        let (first, rest) = self.0.split_first()?;
        let mut node = shapes.get_mut(*first)?;
        for &idx in rest {
            node = match node {
                Shape::Group(group) => group.it.get_mut(idx)?,
                _ => return None,
            };
        }
        Some(node)
    }

    /// The list that owns the node, and the node's position in it.
    pub fn container_mut<'a>(
        &self,
        shapes: &'a mut Vec<Shape>,
    ) -> Option<(&'a mut Vec<Shape>, usize)> {
        let (last, parents) = self.0.split_last()?;
        let mut list = shapes;
        for &idx in parents {
            list = match list.get_mut(idx)? {
                Shape::Group(group) => &mut group.it,
                _ => return None,
            };
        }
        (*last < list.len()).then_some((list, *last))
    }
}

impl fmt::Display for ShapeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shapes")?;
        for (depth, idx) in self.0.iter().enumerate() {
            if depth == 0 {
                write!(f, ".{idx}")?;
            } else {
                write!(f, ".it.{idx}")?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyPath {
    /// A field of the layer transform (`ks`).
    Transform(TransformField),
    /// A field of the shape node at `index`.
    Shape { index: ShapeIndex, field: ShapeField },
}

impl PropertyPath {
    pub fn shape(index: ShapeIndex, field: ShapeField) -> Self {
        PropertyPath::Shape { index, field }
    }

    /// Converts the dotted form used by generic editing UIs. The layer is
    /// needed to tell which field a key denotes on the node it lands on.
    pub fn parse(layer: &Layer, path: &str) -> Result<Self, EditError> {
        let invalid = || EditError::InvalidPath(path.to_string());
        let segments: Vec<&str> = path.split('.').collect();

        match segments.as_slice() {
            ["ks", key] => TransformField::from_key(key)
                .map(PropertyPath::Transform)
                .ok_or_else(invalid),
            ["shapes", rest @ ..] => {
                let (key, mut rest) = rest.split_last().ok_or_else(invalid)?;
                let mut indices = Vec::new();
                loop {
                    match rest {
                        [idx, tail @ ..] if indices.is_empty() => {
                            indices.push(idx.parse::<usize>().map_err(|_| invalid())?);
                            rest = tail;
                        }
                        ["it", idx, tail @ ..] => {
                            indices.push(idx.parse::<usize>().map_err(|_| invalid())?);
                            rest = tail;
                        }
                        [] => break,
                        _ => return Err(invalid()),
                    }
                }

                let index = ShapeIndex(indices);
                let node = layer
                    .shapes
                    .as_deref()
                    .and_then(|shapes| index.get(shapes))
                    .ok_or_else(|| EditError::ShapeNotFound(index.to_string()))?;
                let field =
                    ShapeField::from_key(node, key).ok_or_else(|| EditError::NoSuchProperty {
                        node: node.type_code(),
                        key: key.to_string(),
                    })?;
                Ok(PropertyPath::Shape { index, field })
            }
            _ => Err(invalid()),
        }
    }

    /// Whether values written here belong to a shape-level (2D) property.
    pub fn is_shape_level(&self) -> bool {
        matches!(self, PropertyPath::Shape { .. })
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyPath::Transform(field) => write!(f, "ks.{}", field.key()),
            PropertyPath::Shape { index, field } => write!(f, "{index}.{}", field.key()),
        }
    }
}

/// Length a vector property is coerced to before it is stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dimensions {
    /// Keep whatever length the value has (colors).
    Any,
    /// Exactly `len` components, padding a missing third one with `pad`.
    Fixed { len: usize, pad: f32 },
}

impl Dimensions {
    const LAYER_POINT: Dimensions = Dimensions::Fixed { len: 3, pad: 0.0 };
    const LAYER_SCALE: Dimensions = Dimensions::Fixed { len: 3, pad: 100.0 };
    const SHAPE_POINT: Dimensions = Dimensions::Fixed { len: 2, pad: 0.0 };
    const SHAPE_SCALE: Dimensions = Dimensions::Fixed { len: 2, pad: 100.0 };

    /// Coerces `value` to these dimensions. Missing or NaN components become
    /// 0, except a missing third component which becomes `pad`.
    pub fn coerce(self, value: &[f32]) -> Vector {
        match self {
            Dimensions::Any => value.to_vec(),
            Dimensions::Fixed { len, pad } => (0..len)
                .map(|idx| match value.get(idx) {
                    Some(v) if !v.is_nan() => *v,
                    Some(_) => 0.0,
                    None if idx == 2 => pad,
                    None => 0.0,
                })
                .collect(),
        }
    }
}

/// Read access to a resolved property.
#[derive(Debug)]
pub enum PropertyRef<'a> {
    Scalar(&'a Property<f32>),
    Vector(&'a Property<Vector>, Dimensions),
    Path(&'a Property<BezierPath>),
}

impl PropertyRef<'_> {
    pub fn is_animated(&self) -> bool {
        match self {
            PropertyRef::Scalar(prop) => prop.is_animated(),
            PropertyRef::Vector(prop, _) => prop.is_animated(),
            PropertyRef::Path(prop) => prop.is_animated(),
        }
    }
}

/// Write access to a resolved property.
#[derive(Debug)]
pub enum PropertyMut<'a> {
    Scalar(&'a mut Property<f32>),
    Vector(&'a mut Property<Vector>, Dimensions),
    Path(&'a mut Property<BezierPath>),
}

fn missing(shape: &Shape, field: ShapeField) -> EditError {
    EditError::NoSuchProperty {
        node: shape.type_code(),
        key: field.key().to_string(),
    }
}

fn transform_ref(tr: &Transform, field: TransformField, shape_level: bool) -> PropertyRef<'_> {
    let (point, scale) = if shape_level {
        (Dimensions::SHAPE_POINT, Dimensions::SHAPE_SCALE)
    } else {
        (Dimensions::LAYER_POINT, Dimensions::LAYER_SCALE)
    };
    match field {
        TransformField::Anchor => PropertyRef::Vector(&tr.a, point),
        TransformField::Position => PropertyRef::Vector(&tr.p, point),
        TransformField::Scale => PropertyRef::Vector(&tr.s, scale),
        TransformField::Rotation => PropertyRef::Scalar(&tr.r),
        TransformField::Opacity => PropertyRef::Scalar(&tr.o),
    }
}

fn transform_mut(
    tr: &mut Transform,
    field: TransformField,
    shape_level: bool,
) -> PropertyMut<'_> {
    let (point, scale) = if shape_level {
        (Dimensions::SHAPE_POINT, Dimensions::SHAPE_SCALE)
    } else {
        (Dimensions::LAYER_POINT, Dimensions::LAYER_SCALE)
    };
    match field {
        TransformField::Anchor => PropertyMut::Vector(&mut tr.a, point),
        TransformField::Position => PropertyMut::Vector(&mut tr.p, point),
        TransformField::Scale => PropertyMut::Vector(&mut tr.s, scale),
        TransformField::Rotation => PropertyMut::Scalar(&mut tr.r),
        TransformField::Opacity => PropertyMut::Scalar(&mut tr.o),
    }
}

fn node_transform_field(field: ShapeField) -> Option<TransformField> {
    match field {
        ShapeField::Anchor => Some(TransformField::Anchor),
        ShapeField::Position => Some(TransformField::Position),
        ShapeField::Scale => Some(TransformField::Scale),
        ShapeField::Rotation => Some(TransformField::Rotation),
        ShapeField::Opacity => Some(TransformField::Opacity),
        _ => None,
    }
}

fn shape_ref(shape: &Shape, field: ShapeField) -> Result<PropertyRef<'_>, EditError> {
    use ShapeField as F;
    let point = Dimensions::SHAPE_POINT;
    let slot = match (shape, field) {
        (Shape::Rect(s), F::Position) => PropertyRef::Vector(&s.p, point),
        (Shape::Rect(s), F::Size) => PropertyRef::Vector(&s.s, point),
        (Shape::Rect(s), F::Roundness) => PropertyRef::Scalar(&s.r),
        (Shape::Ellipse(s), F::Position) => PropertyRef::Vector(&s.p, point),
        (Shape::Ellipse(s), F::Size) => PropertyRef::Vector(&s.s, point),
        (Shape::Polystar(s), F::Position) => PropertyRef::Vector(&s.p, point),
        (Shape::Polystar(s), F::Rotation) => PropertyRef::Scalar(&s.r),
        (Shape::Polystar(s), F::Points) => PropertyRef::Scalar(&s.pt),
        (Shape::Polystar(s), F::InnerRadius) => PropertyRef::Scalar(&s.ir),
        (Shape::Polystar(s), F::InnerRoundness) => PropertyRef::Scalar(&s.is),
        (Shape::Polystar(s), F::OuterRadius) => PropertyRef::Scalar(&s.or),
        (Shape::Polystar(s), F::OuterRoundness) => PropertyRef::Scalar(&s.os),
        (Shape::Path(s), F::Path) => PropertyRef::Path(&s.ks),
        (Shape::Fill(s), F::Color) => PropertyRef::Vector(&s.c, Dimensions::Any),
        (Shape::Fill(s), F::Opacity) => PropertyRef::Scalar(&s.o),
        (Shape::Stroke(s), F::Color) => PropertyRef::Vector(&s.c, Dimensions::Any),
        (Shape::Stroke(s), F::Opacity) => PropertyRef::Scalar(&s.o),
        (Shape::Stroke(s), F::Width) => PropertyRef::Scalar(&s.w),
        (Shape::Transform(s), field) => {
            let tf = node_transform_field(field).ok_or_else(|| missing(shape, field))?;
            transform_ref(&s.t, tf, true)
        }
        (Shape::Trim(s), F::TrimStart) => PropertyRef::Scalar(&s.s),
        (Shape::Trim(s), F::TrimEnd) => PropertyRef::Scalar(&s.e),
        (Shape::Trim(s), F::TrimOffset) => PropertyRef::Scalar(&s.o),
        _ => return Err(missing(shape, field)),
    };
    Ok(slot)
}

fn shape_mut(shape: &mut Shape, field: ShapeField) -> Result<PropertyMut<'_>, EditError> {
    use ShapeField as F;
    let point = Dimensions::SHAPE_POINT;
    let node = shape.type_code();
    let no_such = || EditError::NoSuchProperty {
        node,
        key: field.key().to_string(),
    };
    let slot = match (shape, field) {
        (Shape::Transform(s), field) => {
            let tf = node_transform_field(field).ok_or_else(no_such)?;
            transform_mut(&mut s.t, tf, true)
        }
        (Shape::Rect(s), F::Position) => PropertyMut::Vector(&mut s.p, point),
        (Shape::Rect(s), F::Size) => PropertyMut::Vector(&mut s.s, point),
        (Shape::Rect(s), F::Roundness) => PropertyMut::Scalar(&mut s.r),
        (Shape::Ellipse(s), F::Position) => PropertyMut::Vector(&mut s.p, point),
        (Shape::Ellipse(s), F::Size) => PropertyMut::Vector(&mut s.s, point),
        (Shape::Polystar(s), F::Position) => PropertyMut::Vector(&mut s.p, point),
        (Shape::Polystar(s), F::Rotation) => PropertyMut::Scalar(&mut s.r),
        (Shape::Polystar(s), F::Points) => PropertyMut::Scalar(&mut s.pt),
        (Shape::Polystar(s), F::InnerRadius) => PropertyMut::Scalar(&mut s.ir),
        (Shape::Polystar(s), F::InnerRoundness) => PropertyMut::Scalar(&mut s.is),
        (Shape::Polystar(s), F::OuterRadius) => PropertyMut::Scalar(&mut s.or),
        (Shape::Polystar(s), F::OuterRoundness) => PropertyMut::Scalar(&mut s.os),
        (Shape::Path(s), F::Path) => PropertyMut::Path(&mut s.ks),
        (Shape::Fill(s), F::Color) => PropertyMut::Vector(&mut s.c, Dimensions::Any),
        (Shape::Fill(s), F::Opacity) => PropertyMut::Scalar(&mut s.o),
        (Shape::Stroke(s), F::Color) => PropertyMut::Vector(&mut s.c, Dimensions::Any),
        (Shape::Stroke(s), F::Opacity) => PropertyMut::Scalar(&mut s.o),
        (Shape::Stroke(s), F::Width) => PropertyMut::Scalar(&mut s.w),
        (Shape::Trim(s), F::TrimStart) => PropertyMut::Scalar(&mut s.s),
        (Shape::Trim(s), F::TrimEnd) => PropertyMut::Scalar(&mut s.e),
        (Shape::Trim(s), F::TrimOffset) => PropertyMut::Scalar(&mut s.o),
        _ => return Err(no_such()),
    };
    Ok(slot)
}

/// Resolves `path` against `layer` for reading.
pub fn resolve<'a>(layer: &'a Layer, path: &PropertyPath) -> Result<PropertyRef<'a>, EditError> {
    match path {
        PropertyPath::Transform(field) => Ok(transform_ref(&layer.ks, *field, false)),
        PropertyPath::Shape { index, field } => {
            let shape = layer
                .shapes
                .as_deref()
                .and_then(|shapes| index.get(shapes))
                .ok_or_else(|| EditError::ShapeNotFound(index.to_string()))?;
            shape_ref(shape, *field)
        }
    }
}

/// Resolves `path` against `layer` for writing.
pub fn resolve_mut<'a>(
    layer: &'a mut Layer,
    path: &PropertyPath,
) -> Result<PropertyMut<'a>, EditError> {
    match path {
        PropertyPath::Transform(field) => Ok(transform_mut(&mut layer.ks, *field, false)),
        PropertyPath::Shape { index, field } => {
            let shape = layer
                .shapes
                .as_deref_mut()
                .and_then(|shapes| index.get_mut(shapes))
                .ok_or_else(|| EditError::ShapeNotFound(index.to_string()))?;
            shape_mut(shape, *field)
        }
    }
}
