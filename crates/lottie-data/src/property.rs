use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub type Vec2 = [f32; 2];

/// Variable-length numeric vector as it appears on the wire (`[x, y]`,
/// `[x, y, z]`, `[r, g, b]`, ...).
pub type Vector = Vec<f32>;

/// A value type that can be driven by keyframes.
///
/// The trait captures the wire differences between the kinds of animated
/// values Lottie knows about: scalars and shape paths are wrapped in a
/// one-element array inside keyframes, vectors are not; shape paths ease with a
/// single scalar pair, everything else with one handle per dimension.
pub trait Animatable: Clone + PartialEq + Serialize + DeserializeOwned {
    /// Keyframe `s`/`e` values are wrapped in a one-element array.
    const WRAPPED: bool;
    /// Ease handles are `{x: n, y: n}` instead of per-dimension arrays.
    const SCALAR_EASE: bool = false;

    /// Number of independently eased dimensions.
    fn dimensions(&self) -> usize;
}

impl Animatable for f32 {
    const WRAPPED: bool = true;

    fn dimensions(&self) -> usize {
        1
    }
}

impl Animatable for Vector {
    const WRAPPED: bool = false;

    fn dimensions(&self) -> usize {
        self.len().max(1)
    }
}

impl Animatable for BezierPath {
    const WRAPPED: bool = true;
    const SCALAR_EASE: bool = true;

    fn dimensions(&self) -> usize {
        1
    }
}

/// Vertex / relative tangent representation of an outline.
///
/// `i[n]` and `o[n]` are displacements from `v[n]`, not absolute control
/// points. The three arrays always have the same length.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct BezierPath {
    #[serde(default)]
    pub c: bool,
    #[serde(default)]
    pub i: Vec<Vec2>,
    #[serde(default)]
    pub o: Vec<Vec2>,
    #[serde(default)]
    pub v: Vec<Vec2>,
}

impl BezierPath {
    pub fn len(&self) -> usize {
        self.v.len()
    }

    pub fn is_empty(&self) -> bool {
        self.v.is_empty()
    }

    /// Appends a vertex with the given relative tangents.
    pub fn push(&mut self, vertex: Vec2, in_tangent: Vec2, out_tangent: Vec2) {
        self.v.push(vertex);
        self.i.push(in_tangent);
        self.o.push(out_tangent);
    }

    /// Pads or truncates the tangent arrays to the vertex count.
    pub fn normalize_tangents(&mut self) {
        let n = self.v.len();
        self.i.resize(n, [0.0, 0.0]);
        self.o.resize(n, [0.0, 0.0]);
    }
}

/// One axis of an ease handle: a single number or one number per dimension.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum EaseAxis {
    Scalar(f32),
    PerDimension(Vec<f32>),
}

impl EaseAxis {
    pub fn first(&self) -> Option<f32> {
        match self {
            EaseAxis::Scalar(v) => Some(*v),
            EaseAxis::PerDimension(v) => v.first().copied(),
        }
    }
}

/// Bezier tangent control points for keyframe easing.
/// Matches the JSON format: `{"x": [0.833], "y": [0.833]}` or `{"x": 0.833, "y": 0.833}`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BezierTangent {
    pub x: EaseAxis,
    pub y: EaseAxis,
}

impl BezierTangent {
    /// Handle with `value` on both axes, replicated over `dims` dimensions
    /// unless `scalar` asks for the single-number form.
    pub fn uniform(value: f32, dims: usize, scalar: bool) -> Self {
        let axis = if scalar {
            EaseAxis::Scalar(value)
        } else {
            EaseAxis::PerDimension(vec![value; dims.max(1)])
        };
        BezierTangent {
            x: axis.clone(),
            y: axis,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(bound(serialize = "T: Animatable"))]
pub struct Keyframe<T> {
    pub t: f32,
    #[serde(serialize_with = "serialize_wire")]
    pub s: T,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_wire_opt"
    )]
    pub e: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub i: Option<BezierTangent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub o: Option<BezierTangent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Vec<f32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ti: Option<Vec<f32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h: Option<u8>,
}

impl<T> Keyframe<T> {
    /// Keyframe at `t` holding `s`, no cached end value and no ease handles.
    pub fn new(t: f32, s: T) -> Self {
        Keyframe {
            t,
            s,
            e: None,
            i: None,
            o: None,
            to: None,
            ti: None,
            h: None,
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Keyframe<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawKeyframe::<T>::deserialize(deserializer)?;
        let s = raw.s.ok_or_else(|| serde::de::Error::missing_field("s"))?;
        Ok(Keyframe {
            t: raw.t,
            s,
            e: raw.e,
            i: raw.i,
            o: raw.o,
            to: raw.to,
            ti: raw.ti,
            h: raw.h,
        })
    }
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
struct RawKeyframe<T> {
    #[serde(default)]
    t: f32,
    #[serde(default, deserialize_with = "deserialize_keyframe_value")]
    s: Option<T>,
    #[serde(default, deserialize_with = "deserialize_keyframe_value")]
    e: Option<T>,
    #[serde(default)]
    i: Option<BezierTangent>,
    #[serde(default)]
    o: Option<BezierTangent>,
    #[serde(default)]
    to: Option<Vec<f32>>,
    #[serde(default)]
    ti: Option<Vec<f32>>,
    #[serde(default)]
    h: Option<u8>,
}

fn serialize_wire<T: Animatable, S: Serializer>(
    value: &T,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    if T::WRAPPED {
        [value].serialize(serializer)
    } else {
        value.serialize(serializer)
    }
}

fn serialize_wire_opt<T: Animatable, S: Serializer>(
    value: &Option<T>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => serialize_wire(v, serializer),
        None => serializer.serialize_none(),
    }
}

fn deserialize_keyframe_value<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let v = serde_json::Value::deserialize(deserializer)?;
    Ok(unwrap_value(v))
}

/// Reads a bare value, falling back to the first element of a wrapping array.
fn unwrap_value<T: DeserializeOwned>(v: serde_json::Value) -> Option<T> {
    if v.is_null() {
        return None;
    }

    if let Ok(val) = serde_json::from_value(v.clone()) {
        return Some(val);
    }

    if let Ok(vec) = serde_json::from_value::<Vec<T>>(v) {
        return vec.into_iter().next();
    }

    None
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value<T> {
    /// Missing or null `k`.
    Default,
    Static(T),
    Animated(Vec<Keyframe<T>>),
}

impl<T> Default for Value<T> {
    fn default() -> Self {
        Value::Default
    }
}

/// A possibly animated property: `{"a": 0, "k": value}` or
/// `{"a": 1, "k": [keyframe, ...]}`.
///
/// The `a` flag is derived from [`Value`] when serializing, so the two can
/// never disagree.
#[derive(Debug, Clone, PartialEq)]
pub struct Property<T> {
    pub k: Value<T>,
    pub ix: Option<u32>,
}

impl<T> Default for Property<T> {
    fn default() -> Self {
        Property {
            k: Value::Default,
            ix: None,
        }
    }
}

impl<T> Property<T> {
    pub fn fixed(value: T) -> Self {
        Property {
            k: Value::Static(value),
            ix: None,
        }
    }

    pub fn animated(keyframes: Vec<Keyframe<T>>) -> Self {
        Property {
            k: Value::Animated(keyframes),
            ix: None,
        }
    }

    pub fn is_animated(&self) -> bool {
        matches!(self.k, Value::Animated(_))
    }

    pub fn is_default(&self) -> bool {
        matches!(self.k, Value::Default)
    }

    pub fn keyframes(&self) -> Option<&[Keyframe<T>]> {
        match &self.k {
            Value::Animated(kfs) => Some(kfs),
            _ => None,
        }
    }
}

impl<T: Animatable> Serialize for Property<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        match &self.k {
            Value::Default => {
                map.serialize_entry("a", &0u8)?;
            }
            Value::Static(v) => {
                map.serialize_entry("a", &0u8)?;
                map.serialize_entry("k", v)?;
            }
            Value::Animated(keyframes) => {
                map.serialize_entry("a", &1u8)?;
                map.serialize_entry("k", keyframes)?;
            }
        }
        if let Some(ix) = self.ix {
            map.serialize_entry("ix", &ix)?;
        }
        map.end()
    }
}

#[derive(Deserialize)]
struct RawProperty {
    #[serde(default)]
    a: u8,
    #[serde(default)]
    k: serde_json::Value,
    #[serde(default)]
    ix: Option<u32>,
}

impl<'de, T: DeserializeOwned + Clone> Deserialize<'de> for Property<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawProperty::deserialize(deserializer)?;
        let k = if raw.k.is_null() {
            Value::Default
        } else if raw.a == 1 || looks_like_keyframes(&raw.k) {
            match parse_keyframes(raw.k.clone()) {
                Some(keyframes) => Value::Animated(keyframes),
                None => unwrap_value(raw.k).map_or(Value::Default, Value::Static),
            }
        } else {
            unwrap_value(raw.k).map_or(Value::Default, Value::Static)
        };
        Ok(Property { k, ix: raw.ix })
    }
}

fn looks_like_keyframes(k: &serde_json::Value) -> bool {
    k.as_array()
        .and_then(|items| items.first())
        .and_then(|first| first.as_object())
        .is_some_and(|obj| obj.contains_key("t"))
}

/// Parses a keyframe array, filling legacy keyframes that only carry `t`
/// (older exporters put the final value in the previous keyframe's `e`).
fn parse_keyframes<T: DeserializeOwned + Clone>(
    k: serde_json::Value,
) -> Option<Vec<Keyframe<T>>> {
    let raw: Vec<RawKeyframe<T>> = serde_json::from_value(k).ok()?;
    let mut keyframes: Vec<Keyframe<T>> = Vec::with_capacity(raw.len());
    for kf in raw {
        let s = match kf.s {
            Some(s) => s,
            None => match keyframes.last() {
                Some(prev) => match &prev.e {
                    Some(e) => e.clone(),
                    None => prev.s.clone(),
                },
                None => continue,
            },
        };
        keyframes.push(Keyframe {
            t: kf.t,
            s,
            e: kf.e,
            i: kf.i,
            o: kf.o,
            to: kf.to,
            ti: kf.ti,
            h: kf.h,
        });
    }
    Some(keyframes)
}
