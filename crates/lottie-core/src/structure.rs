//! Structural edits of a layer's shape tree.
//!
//! Vertex edits on an animated path are applied to every keyframe's start and
//! end value so all keyframes keep the same vertex count.

use crate::animatable::Animator;
use crate::config::EditorConfig;
use crate::error::EditError;
use crate::mutation::{sync_keyframes, write_at_time};
use crate::parametric::shape_to_path;
use crate::property_path::ShapeIndex;
use kurbo::{CubicBez, ParamCurve, Point};
use lottie_data::model::{BezierPath, Layer, PathShape, Property, Shape, Value};

/// Smallest vertex count a path may be reduced to.
pub const MIN_PATH_VERTICES: usize = 2;

/// Part of a path vertex moved by [`set_vertex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexHandle {
    Point,
    InTangent,
    OutTangent,
}

fn guard_text(layer: &Layer) -> Result<(), EditError> {
    if layer.has_text() {
        return Err(EditError::TextDerived(layer.ind));
    }
    Ok(())
}

fn shape_mut<'a>(layer: &'a mut Layer, index: &ShapeIndex) -> Result<&'a mut Shape, EditError> {
    guard_text(layer)?;
    layer
        .shapes
        .as_deref_mut()
        .and_then(|shapes| index.get_mut(shapes))
        .ok_or_else(|| EditError::ShapeNotFound(index.to_string()))
}

fn path_mut<'a>(
    layer: &'a mut Layer,
    index: &ShapeIndex,
) -> Result<&'a mut Property<BezierPath>, EditError> {
    match shape_mut(layer, index)? {
        Shape::Path(path) => Ok(&mut path.ks),
        _ => Err(EditError::NotAPath(index.to_string())),
    }
}

/// Every stored value of the path: the static value, or each keyframe's
/// start and cached end value.
fn values_mut(prop: &mut Property<BezierPath>) -> Vec<&mut BezierPath> {
    let mut out = Vec::new();
    match &mut prop.k {
        Value::Default => {}
        Value::Static(path) => out.push(path),
        Value::Animated(keyframes) => {
            for kf in keyframes.iter_mut() {
                out.push(&mut kf.s);
                if let Some(e) = kf.e.as_mut() {
                    out.push(e);
                }
            }
        }
    }
    out
}

/// Rebuilds cached end values after every start value has been edited.
fn resync(prop: &mut Property<BezierPath>, config: &EditorConfig) {
    if let Value::Animated(keyframes) = &mut prop.k {
        sync_keyframes(keyframes, config);
    }
}

/// Removes the shape node at `index` and returns it.
pub fn delete_shape(layer: &mut Layer, index: &ShapeIndex) -> Result<Shape, EditError> {
    guard_text(layer)?;
    let not_found = || EditError::ShapeNotFound(index.to_string());
    let shapes = layer.shapes.as_mut().ok_or_else(not_found)?;
    let (list, pos) = index.container_mut(shapes).ok_or_else(not_found)?;
    Ok(list.remove(pos))
}

/// Removes vertex `vertex` from the path at `index`. Refused when the path
/// would drop below [`MIN_PATH_VERTICES`].
pub fn delete_vertex(
    layer: &mut Layer,
    index: &ShapeIndex,
    vertex: usize,
    config: &EditorConfig,
) -> Result<(), EditError> {
    let prop = path_mut(layer, index)?;
    let values = values_mut(prop);
    if values.is_empty() {
        return Err(EditError::NoValue);
    }
    for path in &values {
        if path.len() <= MIN_PATH_VERTICES {
            return Err(EditError::VertexFloor {
                min: MIN_PATH_VERTICES,
            });
        }
        if vertex >= path.len() {
            return Err(EditError::VertexOutOfRange {
                index: vertex,
                len: path.len(),
            });
        }
    }
    for path in values {
        path.normalize_tangents();
        path.v.remove(vertex);
        path.i.remove(vertex);
        path.o.remove(vertex);
    }
    resync(prop, config);
    Ok(())
}

fn segment_midpoint(path: &BezierPath, from: usize, to: usize) -> [f32; 2] {
    let pt = |p: [f32; 2]| Point::new(p[0] as f64, p[1] as f64);
    let tangent = |list: &[[f32; 2]], idx: usize| list.get(idx).copied().unwrap_or([0.0, 0.0]);
    let p0 = path.v[from];
    let p3 = path.v[to];
    let out = tangent(&path.o, from);
    let inn = tangent(&path.i, to);
    let curve = CubicBez::new(
        pt(p0),
        pt([p0[0] + out[0], p0[1] + out[1]]),
        pt([p3[0] + inn[0], p3[1] + inn[1]]),
        pt(p3),
    );
    let mid = curve.eval(0.5);
    [mid.x as f32, mid.y as f32]
}

/// Inserts a vertex after `after`, on the midpoint of the segment it starts,
/// with zero tangents. Returns the new vertex index.
pub fn add_vertex(
    layer: &mut Layer,
    index: &ShapeIndex,
    after: usize,
    config: &EditorConfig,
) -> Result<usize, EditError> {
    let prop = path_mut(layer, index)?;
    let values = values_mut(prop);
    if values.is_empty() {
        return Err(EditError::NoValue);
    }

    let mut midpoints = Vec::with_capacity(values.len());
    for path in &values {
        let len = path.len();
        let next = if after + 1 < len {
            after + 1
        } else if after + 1 == len && path.c && len > 1 {
            0
        } else {
            return Err(EditError::VertexOutOfRange { index: after, len });
        };
        midpoints.push(segment_midpoint(path, after, next));
    }

    for (path, mid) in values.into_iter().zip(midpoints) {
        path.normalize_tangents();
        path.v.insert(after + 1, mid);
        path.i.insert(after + 1, [0.0, 0.0]);
        path.o.insert(after + 1, [0.0, 0.0]);
    }
    resync(prop, config);
    Ok(after + 1)
}

/// Replaces a rectangle, ellipse or star with a static path sampled at
/// `frame`. Animation of the original parameters is dropped.
pub fn convert_parametric_to_path(
    layer: &mut Layer,
    index: &ShapeIndex,
    frame: f32,
) -> Result<(), EditError> {
    let shape = shape_mut(layer, index)?;
    if !shape.is_parametric() {
        return Err(EditError::NotParametric(index.to_string()));
    }
    let path =
        shape_to_path(shape, frame).ok_or_else(|| EditError::NotParametric(index.to_string()))?;
    *shape = Shape::Path(PathShape {
        nm: shape.name().map(str::to_string),
        ks: Property::fixed(path),
        extra: Default::default(),
    });
    Ok(())
}

fn move_handle(path: &mut BezierPath, vertex: usize, handle: VertexHandle, position: [f32; 2]) {
    path.normalize_tangents();
    let v = path.v[vertex];
    match handle {
        VertexHandle::Point => path.v[vertex] = position,
        VertexHandle::InTangent => path.i[vertex] = [position[0] - v[0], position[1] - v[1]],
        VertexHandle::OutTangent => path.o[vertex] = [position[0] - v[0], position[1] - v[1]],
    }
}

/// Moves a vertex, or one of its tangent handles, to the absolute `position`.
/// On an animated path the edited shape is keyed at `frame`.
pub fn set_vertex(
    layer: &mut Layer,
    index: &ShapeIndex,
    vertex: usize,
    handle: VertexHandle,
    position: [f32; 2],
    frame: f32,
    config: &EditorConfig,
) -> Result<(), EditError> {
    let prop = path_mut(layer, index)?;
    let mut path = Animator::sample(prop, frame).ok_or(EditError::NoValue)?;
    if vertex >= path.len() {
        return Err(EditError::VertexOutOfRange {
            index: vertex,
            len: path.len(),
        });
    }
    move_handle(&mut path, vertex, handle, position);
    write_at_time(prop, frame, path, config);
    Ok(())
}
