//! Static/animated state machine of a single property.
//!
//! Every write into an animated property ends with [`sync_keyframes`], which
//! restores the cached end values (`e`) and backfills missing ease handles.

use crate::animatable::Animator;
use crate::config::EditorConfig;
use crate::error::EditError;
use crate::property_path::{resolve, resolve_mut, Dimensions, PropertyMut, PropertyPath, PropertyRef};
use lottie_data::model::{
    Animatable, BezierPath, BezierTangent, Keyframe, Layer, Property, Value, Vector,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A value written into, or read out of, a property of any kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Scalar(f32),
    Vector(Vec<f32>),
    Path(BezierPath),
}

impl PropertyValue {
    fn kind(&self) -> &'static str {
        match self {
            PropertyValue::Scalar(_) => "scalar",
            PropertyValue::Vector(_) => "vector",
            PropertyValue::Path(_) => "path",
        }
    }

    fn mismatch(&self, expected: &'static str) -> EditError {
        EditError::ValueMismatch {
            expected,
            found: self.kind(),
        }
    }

    /// Scalars accept a bare number or the first element of an array.
    pub fn to_scalar(&self) -> Result<f32, EditError> {
        match self {
            PropertyValue::Scalar(v) => Ok(*v),
            PropertyValue::Vector(v) => v.first().copied().ok_or_else(|| self.mismatch("scalar")),
            PropertyValue::Path(_) => Err(self.mismatch("scalar")),
        }
    }

    /// A single number fills every component; arrays are coerced to `dims`.
    /// `current_len` is the length already stored, used when `dims` is free.
    pub fn to_vector(&self, dims: Dimensions, current_len: Option<usize>) -> Result<Vector, EditError> {
        let target_len = match dims {
            Dimensions::Fixed { len, .. } => len,
            Dimensions::Any => current_len.unwrap_or(1),
        };
        match self {
            PropertyValue::Scalar(n) => Ok(vec![*n; target_len.max(1)]),
            PropertyValue::Vector(v) if v.len() == 1 && target_len > 1 => Ok(vec![v[0]; target_len]),
            PropertyValue::Vector(v) => Ok(dims.coerce(v)),
            PropertyValue::Path(_) => Err(self.mismatch("vector")),
        }
    }

    pub fn to_path(&self) -> Result<BezierPath, EditError> {
        match self {
            PropertyValue::Path(p) => {
                let mut path = p.clone();
                path.normalize_tangents();
                Ok(path)
            }
            _ => Err(self.mismatch("path")),
        }
    }
}

impl From<f32> for PropertyValue {
    fn from(v: f32) -> Self {
        PropertyValue::Scalar(v)
    }
}

impl From<Vec<f32>> for PropertyValue {
    fn from(v: Vec<f32>) -> Self {
        PropertyValue::Vector(v)
    }
}

impl From<BezierPath> for PropertyValue {
    fn from(v: BezierPath) -> Self {
        PropertyValue::Path(v)
    }
}

/// Default `(in, out)` ease handles for a keyframe holding `value`.
pub fn default_eases<T: Animatable>(value: &T, config: &EditorConfig) -> (BezierTangent, BezierTangent) {
    let dims = value.dimensions();
    (
        BezierTangent::uniform(config.ease_in, dims, T::SCALAR_EASE),
        BezierTangent::uniform(config.ease_out, dims, T::SCALAR_EASE),
    )
}

fn new_keyframe<T: Animatable>(t: f32, value: T, config: &EditorConfig) -> Keyframe<T> {
    let (ease_in, ease_out) = default_eases(&value, config);
    let mut kf = Keyframe::new(t, value);
    kf.i = Some(ease_in);
    kf.o = Some(ease_out);
    kf
}

/// Recomputes every cached end value from the successor's start value (the
/// last keyframe ends on its own start) and backfills missing ease handles.
pub fn sync_keyframes<T: Animatable>(keyframes: &mut [Keyframe<T>], config: &EditorConfig) {
    let len = keyframes.len();
    for idx in 0..len {
        let end = if idx + 1 < len {
            keyframes[idx + 1].s.clone()
        } else {
            keyframes[idx].s.clone()
        };
        let kf = &mut keyframes[idx];
        kf.e = Some(end);
        if kf.i.is_none() || kf.o.is_none() {
            let (ease_in, ease_out) = default_eases(&kf.s, config);
            kf.i.get_or_insert(ease_in);
            kf.o.get_or_insert(ease_out);
        }
    }
}

/// Wraps the static value as a single keyframe at frame 0. Already animated
/// properties are left alone.
pub fn promote_to_animated<T: Animatable>(
    prop: &mut Property<T>,
    config: &EditorConfig,
) -> Result<(), EditError> {
    match std::mem::take(&mut prop.k) {
        Value::Static(value) => {
            let mut keyframes = vec![new_keyframe(0.0, value, config)];
            sync_keyframes(&mut keyframes, config);
            prop.k = Value::Animated(keyframes);
            Ok(())
        }
        Value::Animated(keyframes) => {
            prop.k = Value::Animated(keyframes);
            Ok(())
        }
        Value::Default => Err(EditError::NoValue),
    }
}

/// Keeps the first keyframe's start value, whatever the current time.
pub fn demote_to_static<T: Animatable>(prop: &mut Property<T>) {
    if let Value::Animated(keyframes) = &mut prop.k {
        let first = std::mem::take(keyframes).into_iter().next();
        prop.k = match first {
            Some(kf) => Value::Static(kf.s),
            None => Value::Default,
        };
    }
}

/// Overwrites a static value, or sets the keyframe at `time` (within the
/// configured tolerance) on an animated one, inserting it when missing.
pub fn write_at_time<T: Animatable>(
    prop: &mut Property<T>,
    time: f32,
    value: T,
    config: &EditorConfig,
) {
    match &mut prop.k {
        Value::Animated(keyframes) => {
            let tolerance = config.keyframe_tolerance;
            match keyframes.iter_mut().find(|kf| (kf.t - time).abs() < tolerance) {
                Some(existing) => existing.s = value,
                None => {
                    keyframes.push(new_keyframe(time, value, config));
                    keyframes.sort_by(|a, b| a.t.total_cmp(&b.t));
                }
            }
            sync_keyframes(keyframes, config);
        }
        slot => *slot = Value::Static(value),
    }
}

/// Promotes a static property; a missing value becomes an empty animation.
fn ensure_animated<T: Animatable>(prop: &mut Property<T>, config: &EditorConfig) {
    if prop.is_default() {
        prop.k = Value::Animated(Vec::new());
    } else if let Err(err) = promote_to_animated(prop, config) {
        debug!("promote skipped: {err}");
    }
}

fn current_len(prop: &Property<Vector>) -> Option<usize> {
    match &prop.k {
        Value::Static(v) => Some(v.len()),
        Value::Animated(kfs) => kfs.first().map(|kf| kf.s.len()),
        Value::Default => None,
    }
}

/// Coerces a stored static vector to its fixed dimensions.
fn coerce_static(prop: &mut Property<Vector>, dims: Dimensions) {
    if let Value::Static(v) = &mut prop.k {
        *v = dims.coerce(v);
    }
}

/// Derived shapes of a text layer are regenerated from the text and cannot
/// be edited directly.
pub(crate) fn guard_text(layer: &Layer, path: &PropertyPath) -> Result<(), EditError> {
    if layer.has_text() && path.is_shape_level() {
        return Err(EditError::TextDerived(layer.ind));
    }
    Ok(())
}

/// Writes `value` at `time` without changing the static/animated state.
pub fn write_property(
    layer: &mut Layer,
    path: &PropertyPath,
    time: f32,
    value: &PropertyValue,
    config: &EditorConfig,
) -> Result<(), EditError> {
    guard_text(layer, path)?;
    match resolve_mut(layer, path)? {
        PropertyMut::Scalar(prop) => write_at_time(prop, time, value.to_scalar()?, config),
        PropertyMut::Vector(prop, dims) => {
            let v = value.to_vector(dims, current_len(prop))?;
            write_at_time(prop, time, v, config)
        }
        PropertyMut::Path(prop) => write_at_time(prop, time, value.to_path()?, config),
    }
    Ok(())
}

/// Sets a keyframe at `time`, promoting a static property first.
pub fn set_keyframe(
    layer: &mut Layer,
    path: &PropertyPath,
    time: f32,
    value: &PropertyValue,
    config: &EditorConfig,
) -> Result<(), EditError> {
    guard_text(layer, path)?;
    match resolve_mut(layer, path)? {
        PropertyMut::Scalar(prop) => {
            let v = value.to_scalar()?;
            ensure_animated(prop, config);
            write_at_time(prop, time, v, config);
        }
        PropertyMut::Vector(prop, dims) => {
            let v = value.to_vector(dims, current_len(prop))?;
            coerce_static(prop, dims);
            ensure_animated(prop, config);
            write_at_time(prop, time, v, config);
        }
        PropertyMut::Path(prop) => {
            let v = value.to_path()?;
            ensure_animated(prop, config);
            write_at_time(prop, time, v, config);
        }
    }
    Ok(())
}

/// Flips a property between static and animated. Returns whether it is
/// animated afterwards.
pub fn toggle_animation(
    layer: &mut Layer,
    path: &PropertyPath,
    config: &EditorConfig,
) -> Result<bool, EditError> {
    fn flip<T: Animatable>(prop: &mut Property<T>, config: &EditorConfig) -> Result<bool, EditError> {
        if prop.is_animated() {
            demote_to_static(prop);
            Ok(false)
        } else {
            promote_to_animated(prop, config)?;
            Ok(true)
        }
    }
    guard_text(layer, path)?;
    match resolve_mut(layer, path)? {
        PropertyMut::Scalar(prop) => flip(prop, config),
        PropertyMut::Vector(prop, dims) => {
            coerce_static(prop, dims);
            flip(prop, config)
        }
        PropertyMut::Path(prop) => flip(prop, config),
    }
}

/// Samples the property at `time`; `None` when it has no value.
pub fn read_property(
    layer: &Layer,
    path: &PropertyPath,
    time: f32,
) -> Result<Option<PropertyValue>, EditError> {
    Ok(match resolve(layer, path)? {
        PropertyRef::Scalar(prop) => Animator::sample(prop, time).map(PropertyValue::Scalar),
        PropertyRef::Vector(prop, _) => Animator::sample(prop, time).map(PropertyValue::Vector),
        PropertyRef::Path(prop) => Animator::sample(prop, time).map(PropertyValue::Path),
    })
}
