use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use crate::property::{
    Animatable, BezierPath, BezierTangent, EaseAxis, Keyframe, Property, Value, Vec2, Vector,
};

/// Keys a node carries that the model has no field for. They are written
/// back unchanged.
pub type Extra = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AnimationDocument {
    #[serde(default = "default_version")]
    pub v: String,
    pub fr: f32,
    pub ip: f32,
    pub op: f32,
    pub w: u32,
    pub h: u32,
    #[serde(default)]
    pub nm: String,
    #[serde(default)]
    pub ddd: u8,
    /// Assets and layers sit behind `Arc` so an edit clones only the layer
    /// it touches.
    #[serde(default)]
    pub assets: Vec<Arc<Asset>>,
    #[serde(default)]
    pub layers: Vec<Arc<Layer>>,
    #[serde(flatten)]
    pub extra: Extra,
}

fn default_version() -> String {
    "5.5.7".to_string()
}

impl Default for AnimationDocument {
    fn default() -> Self {
        AnimationDocument {
            v: default_version(),
            fr: 60.0,
            ip: 0.0,
            op: 300.0,
            w: 1920,
            h: 1080,
            nm: "New Animation".to_string(),
            ddd: 0,
            assets: Vec::new(),
            layers: Vec::new(),
            extra: Extra::new(),
        }
    }
}

impl AnimationDocument {
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Lottie layer type code (`ty`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum LayerType {
    PreComp,
    Solid,
    Image,
    Null,
    Shape,
    Text,
    Other(u8),
}

impl From<u8> for LayerType {
    fn from(code: u8) -> Self {
        match code {
            0 => LayerType::PreComp,
            1 => LayerType::Solid,
            2 => LayerType::Image,
            3 => LayerType::Null,
            4 => LayerType::Shape,
            5 => LayerType::Text,
            other => LayerType::Other(other),
        }
    }
}

impl From<LayerType> for u8 {
    fn from(ty: LayerType) -> u8 {
        match ty {
            LayerType::PreComp => 0,
            LayerType::Solid => 1,
            LayerType::Image => 2,
            LayerType::Null => 3,
            LayerType::Shape => 4,
            LayerType::Text => 5,
            LayerType::Other(code) => code,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Layer {
    #[serde(default)]
    pub ind: u64,
    pub ty: LayerType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ddd: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sr: Option<f32>, // Time stretch
    #[serde(default)]
    pub ks: Transform,
    #[serde(default)]
    pub ip: f32,
    #[serde(default)]
    pub op: f32,
    #[serde(default)]
    pub st: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bm: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shapes: Option<Vec<Shape>>,
    #[serde(default, rename = "refId", skip_serializing_if = "Option::is_none")]
    pub ref_id: Option<String>, // PreComp, Image
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hd: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h: Option<u32>,
    #[serde(default, rename = "sc", skip_serializing_if = "Option::is_none")]
    pub color: Option<String>, // Solid color

    // Editor text payload; `shapes` is derived from it when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(default, rename = "fontSize", skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,

    #[serde(flatten)]
    pub extra: Extra,
}

impl Layer {
    /// Empty layer of the given type with an identity transform.
    pub fn new(ind: u64, ty: LayerType) -> Self {
        Layer {
            ind,
            ty,
            nm: None,
            ddd: None,
            sr: None,
            ks: Transform::identity_3d(),
            ip: 0.0,
            op: 0.0,
            st: 0.0,
            bm: None,
            shapes: None,
            ref_id: None,
            hd: false,
            w: None,
            h: None,
            color: None,
            text: None,
            font: None,
            font_size: None,
            extra: Extra::new(),
        }
    }

    pub fn has_text(&self) -> bool {
        self.text.is_some()
    }
}

/// Transform block shared by layers (`ks`) and shape groups (`tr`).
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Transform {
    #[serde(default, skip_serializing_if = "Property::is_default")]
    pub a: Property<Vector>, // Anchor
    #[serde(default, skip_serializing_if = "Property::is_default")]
    pub p: Property<Vector>, // Position
    #[serde(default, skip_serializing_if = "Property::is_default")]
    pub s: Property<Vector>, // Scale, percent
    #[serde(default, alias = "rz", skip_serializing_if = "Property::is_default")]
    pub r: Property<f32>, // Rotation, degrees
    #[serde(default, skip_serializing_if = "Property::is_default")]
    pub o: Property<f32>, // Opacity, percent
    /// Skew and split-position keys among others.
    #[serde(flatten)]
    pub extra: Extra,
}

impl Transform {
    /// Layer-level identity: 3D vectors, scale 100%, opacity 100%.
    pub fn identity_3d() -> Self {
        Transform {
            a: Property::fixed(vec![0.0, 0.0, 0.0]),
            p: Property::fixed(vec![0.0, 0.0, 0.0]),
            s: Property::fixed(vec![100.0, 100.0, 100.0]),
            r: Property::fixed(0.0),
            o: Property::fixed(100.0),
            extra: Extra::new(),
        }
    }

    /// Shape-group identity: 2D vectors.
    pub fn identity_2d() -> Self {
        Transform {
            a: Property::fixed(vec![0.0, 0.0]),
            p: Property::fixed(vec![0.0, 0.0]),
            s: Property::fixed(vec![100.0, 100.0]),
            r: Property::fixed(0.0),
            o: Property::fixed(100.0),
            extra: Extra::new(),
        }
    }
}

// Shapes

/// A shape node, tagged on the wire by `ty`.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Group(GroupShape),
    Rect(RectShape),
    Ellipse(EllipseShape),
    Polystar(PolystarShape),
    Path(PathShape),
    Fill(FillShape),
    Stroke(StrokeShape),
    Transform(TransformShape),
    Trim(TrimShape),
    MergePaths(MergePathsShape),
    /// Node of a type the editor does not model (gradients, repeaters, ...),
    /// kept as its raw JSON including `ty`.
    Unknown(serde_json::Value),
}

#[derive(Serialize)]
struct Tagged<'a, T> {
    ty: &'static str,
    #[serde(flatten)]
    node: &'a T,
}

impl Serialize for Shape {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let ty = self.type_code();
        match self {
            Shape::Group(node) => Tagged { ty, node }.serialize(serializer),
            Shape::Rect(node) => Tagged { ty, node }.serialize(serializer),
            Shape::Ellipse(node) => Tagged { ty, node }.serialize(serializer),
            Shape::Polystar(node) => Tagged { ty, node }.serialize(serializer),
            Shape::Path(node) => Tagged { ty, node }.serialize(serializer),
            Shape::Fill(node) => Tagged { ty, node }.serialize(serializer),
            Shape::Stroke(node) => Tagged { ty, node }.serialize(serializer),
            Shape::Transform(node) => Tagged { ty, node }.serialize(serializer),
            Shape::Trim(node) => Tagged { ty, node }.serialize(serializer),
            Shape::MergePaths(node) => Tagged { ty, node }.serialize(serializer),
            Shape::Unknown(raw) => raw.serialize(serializer),
        }
    }
}

type ShapeParser = fn(serde_json::Value) -> serde_json::Result<Shape>;

impl<'de> Deserialize<'de> for Shape {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut raw = serde_json::Value::deserialize(deserializer)?;
        let ty = raw
            .get("ty")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string();
        let parse: ShapeParser = match ty.as_str() {
            "gr" => |v| serde_json::from_value(v).map(Shape::Group),
            "rc" => |v| serde_json::from_value(v).map(Shape::Rect),
            "el" => |v| serde_json::from_value(v).map(Shape::Ellipse),
            "sr" => |v| serde_json::from_value(v).map(Shape::Polystar),
            "sh" => |v| serde_json::from_value(v).map(Shape::Path),
            "fl" => |v| serde_json::from_value(v).map(Shape::Fill),
            "st" => |v| serde_json::from_value(v).map(Shape::Stroke),
            "tr" => |v| serde_json::from_value(v).map(Shape::Transform),
            "tm" => |v| serde_json::from_value(v).map(Shape::Trim),
            "mm" => |v| serde_json::from_value(v).map(Shape::MergePaths),
            _ => return Ok(Shape::Unknown(raw)),
        };
        // The tag is written back from the variant, not from `extra`.
        if let Some(map) = raw.as_object_mut() {
            map.remove("ty");
        }
        parse(raw).map_err(de::Error::custom)
    }
}

impl Shape {
    pub fn name(&self) -> Option<&str> {
        match self {
            Shape::Group(s) => s.nm.as_deref(),
            Shape::Rect(s) => s.nm.as_deref(),
            Shape::Ellipse(s) => s.nm.as_deref(),
            Shape::Polystar(s) => s.nm.as_deref(),
            Shape::Path(s) => s.nm.as_deref(),
            Shape::Fill(s) => s.nm.as_deref(),
            Shape::Stroke(s) => s.nm.as_deref(),
            Shape::Transform(s) => s.nm.as_deref(),
            Shape::Trim(s) => s.nm.as_deref(),
            Shape::MergePaths(s) => s.nm.as_deref(),
            Shape::Unknown(raw) => raw.get("nm").and_then(serde_json::Value::as_str),
        }
    }

    /// The `ty` code this node serializes with; empty for unknown nodes.
    pub fn type_code(&self) -> &'static str {
        match self {
            Shape::Group(_) => "gr",
            Shape::Rect(_) => "rc",
            Shape::Ellipse(_) => "el",
            Shape::Polystar(_) => "sr",
            Shape::Path(_) => "sh",
            Shape::Fill(_) => "fl",
            Shape::Stroke(_) => "st",
            Shape::Transform(_) => "tr",
            Shape::Trim(_) => "tm",
            Shape::MergePaths(_) => "mm",
            Shape::Unknown(_) => "",
        }
    }

    pub fn is_parametric(&self) -> bool {
        matches!(self, Shape::Rect(_) | Shape::Ellipse(_) | Shape::Polystar(_))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GroupShape {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nm: Option<String>,
    #[serde(default)]
    pub it: Vec<Shape>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl GroupShape {
    /// The group's own transform, conventionally its last `tr` child.
    pub fn transform(&self) -> Option<&Transform> {
        self.it.iter().rev().find_map(|item| match item {
            Shape::Transform(tr) => Some(&tr.t),
            _ => None,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RectShape {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nm: Option<String>,
    #[serde(default)]
    pub p: Property<Vector>,
    #[serde(default)]
    pub s: Property<Vector>,
    #[serde(default)]
    pub r: Property<f32>, // Roundness
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EllipseShape {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nm: Option<String>,
    #[serde(default)]
    pub p: Property<Vector>,
    #[serde(default)]
    pub s: Property<Vector>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Star (`sy == 1`) or polygon (`sy == 2`).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PolystarShape {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nm: Option<String>,
    #[serde(default = "default_star_type")]
    pub sy: u8,
    #[serde(default)]
    pub p: Property<Vector>,
    #[serde(default)]
    pub r: Property<f32>, // Rotation, degrees
    #[serde(default)]
    pub pt: Property<f32>,
    #[serde(default, skip_serializing_if = "Property::is_default")]
    pub ir: Property<f32>,
    #[serde(default, skip_serializing_if = "Property::is_default")]
    pub is: Property<f32>,
    #[serde(default)]
    pub or: Property<f32>,
    #[serde(default, skip_serializing_if = "Property::is_default")]
    pub os: Property<f32>,
    #[serde(flatten)]
    pub extra: Extra,
}

fn default_star_type() -> u8 {
    1
}

impl PolystarShape {
    pub fn is_star(&self) -> bool {
        self.sy == 1
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PathShape {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nm: Option<String>,
    pub ks: Property<BezierPath>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FillShape {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nm: Option<String>,
    #[serde(default)]
    pub c: Property<Vector>,
    #[serde(default)]
    pub o: Property<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<u8>, // Fill rule
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StrokeShape {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nm: Option<String>,
    #[serde(default)]
    pub c: Property<Vector>,
    #[serde(default)]
    pub w: Property<f32>,
    #[serde(default)]
    pub o: Property<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lc: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lj: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ml: Option<f32>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TransformShape {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nm: Option<String>,
    #[serde(flatten)]
    pub t: Transform,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TrimShape {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nm: Option<String>,
    #[serde(default)]
    pub s: Property<f32>,
    #[serde(default)]
    pub e: Property<f32>,
    #[serde(default)]
    pub o: Property<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub m: Option<u8>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MergePathsShape {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nm: Option<String>,
    #[serde(default)]
    pub mm: u8,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Asset {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub u: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e: Option<u8>, // 1 = embedded data URI in `p`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layers: Option<Vec<Layer>>, // Precomposition
    #[serde(flatten)]
    pub extra: Extra,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_property_wire_flags_follow_variant() {
        let fixed: Property<f32> = Property::fixed(50.0);
        assert_eq!(serde_json::to_value(&fixed).unwrap(), json!({"a": 0, "k": 50.0}));

        let mut kf = Keyframe::new(0.0, 50.0f32);
        kf.e = Some(50.0);
        let animated = Property::animated(vec![kf]);
        assert_eq!(
            serde_json::to_value(&animated).unwrap(),
            json!({"a": 1, "k": [{"t": 0.0, "s": [50.0], "e": [50.0]}]})
        );
    }

    #[test]
    fn test_vector_keyframes_are_not_wrapped() {
        let prop = Property::animated(vec![Keyframe::new(10.0, vec![1.0f32, 2.0, 0.0])]);
        assert_eq!(
            serde_json::to_value(&prop).unwrap(),
            json!({"a": 1, "k": [{"t": 10.0, "s": [1.0, 2.0, 0.0]}]})
        );
    }

    #[test]
    fn test_shape_keyframes_use_single_element_container() {
        let path = BezierPath {
            c: true,
            v: vec![[0.0, 0.0], [10.0, 0.0]],
            i: vec![[0.0, 0.0], [0.0, 0.0]],
            o: vec![[0.0, 0.0], [0.0, 0.0]],
        };
        let prop = Property::animated(vec![Keyframe::new(0.0, path.clone())]);
        let wire = serde_json::to_value(&prop).unwrap();
        assert!(wire["k"][0]["s"].is_array());
        assert_eq!(wire["k"][0]["s"].as_array().unwrap().len(), 1);

        let back: Property<BezierPath> = serde_json::from_value(wire).unwrap();
        assert_eq!(back.keyframes().unwrap()[0].s, path);
    }

    #[test]
    fn test_scalar_unwraps_single_element_arrays() {
        let prop: Property<f32> = serde_json::from_value(json!({
            "a": 1,
            "k": [{"t": 0, "s": [0]}, {"t": 10, "s": [100]}]
        }))
        .unwrap();
        let kfs = prop.keyframes().unwrap();
        assert_eq!(kfs[0].s, 0.0);
        assert_eq!(kfs[1].s, 100.0);

        let fixed: Property<f32> = serde_json::from_value(json!({"a": 0, "k": [45]})).unwrap();
        assert_eq!(fixed.k, Value::Static(45.0));
    }

    #[test]
    fn test_legacy_last_keyframe_takes_previous_end() {
        let prop: Property<Vector> = serde_json::from_value(json!({
            "a": 1,
            "k": [{"t": 0, "s": [0, 0], "e": [10, 20]}, {"t": 30}]
        }))
        .unwrap();
        let kfs = prop.keyframes().unwrap();
        assert_eq!(kfs.len(), 2);
        assert_eq!(kfs[1].s, vec![10.0, 20.0]);
    }

    #[test]
    fn test_layer_and_shapes_parse_from_lottie_json() {
        let layer: Layer = serde_json::from_value(json!({
            "ind": 1, "ty": 4, "nm": "Shape Layer", "ip": 0, "op": 60, "st": 0,
            "ks": {
                "o": {"a": 0, "k": 100},
                "r": {"a": 0, "k": 0},
                "p": {"a": 0, "k": [250, 250, 0]},
                "a": {"a": 0, "k": [0, 0, 0]},
                "s": {"a": 0, "k": [100, 100, 100]}
            },
            "shapes": [{
                "ty": "gr",
                "it": [
                    {"ty": "el", "p": {"a": 0, "k": [0, 0]}, "s": {"a": 0, "k": [100, 100]}},
                    {"ty": "fl", "c": {"a": 0, "k": [1, 0, 0, 1]}, "o": {"a": 0, "k": 100}},
                    {"ty": "zz", "nm": "unsupported"},
                    {"ty": "tr", "p": {"a": 0, "k": [5, 5]}}
                ]
            }]
        }))
        .unwrap();

        assert_eq!(layer.ty, LayerType::Shape);
        let shapes = layer.shapes.as_ref().unwrap();
        let Shape::Group(group) = &shapes[0] else {
            panic!("expected group");
        };
        assert!(matches!(group.it[0], Shape::Ellipse(_)));
        assert!(matches!(group.it[2], Shape::Unknown(_)));
        assert_eq!(group.it[2].name(), Some("unsupported"));
        let tr = group.transform().unwrap();
        assert_eq!(tr.p.k, Value::Static(vec![5.0, 5.0]));
    }

    #[test]
    fn test_unmodeled_data_survives_round_trip() {
        let source = json!({
            "v": "5.7.4", "fr": 30, "ip": 0, "op": 60, "w": 100, "h": 100,
            "markers": [{"tm": 10, "cm": "intro", "dr": 0}],
            "assets": [{"id": "img_0", "w": 10, "h": 10, "p": "a.png", "u": "images/"}],
            "layers": [{
                "ind": 1, "ty": 4, "parent": 2, "ao": 0,
                "masksProperties": [{"mode": "a", "inv": false}],
                "ks": {
                    "p": {"a": 0, "k": [0, 0, 0]},
                    "sk": {"a": 0, "k": 0}
                },
                "shapes": [
                    {"ty": "gf", "nm": "grad", "t": 1, "g": {"p": 2, "k": {"a": 0, "k": [0, 1, 1, 1, 1, 0, 0, 0]}}},
                    {"ty": "gr", "nm": "Group", "np": 2, "it": [
                        {"ty": "rc", "hd": true, "d": 1, "p": {"a": 0, "k": [0, 0]}, "s": {"a": 0, "k": [10, 10]}, "r": {"a": 0, "k": 0}},
                        {"ty": "tr", "sa": {"a": 0, "k": 0}, "p": {"a": 0, "k": [0, 0]}}
                    ]}
                ]
            }]
        });

        let doc: AnimationDocument = serde_json::from_value(source.clone()).unwrap();
        assert_eq!(doc.layers[0].extra["parent"], 2);
        let wire = serde_json::to_value(&doc).unwrap();

        assert_eq!(wire["markers"], source["markers"]);
        assert_eq!(wire["assets"][0]["u"], "images/");
        let layer = &wire["layers"][0];
        assert_eq!(layer["parent"], 2);
        assert_eq!(layer["ao"], 0);
        assert_eq!(layer["masksProperties"], source["layers"][0]["masksProperties"]);
        assert_eq!(layer["ks"]["sk"], json!({"a": 0, "k": 0}));
        assert_eq!(layer["shapes"][0], source["layers"][0]["shapes"][0]);

        let group = &layer["shapes"][1];
        assert_eq!(group["ty"], "gr");
        assert_eq!(group["np"], 2);
        assert_eq!(group["it"][0]["ty"], "rc");
        assert_eq!(group["it"][0]["hd"], true);
        assert_eq!(group["it"][0]["d"], 1);
        assert_eq!(group["it"][1]["ty"], "tr");
        assert_eq!(group["it"][1]["sa"], json!({"a": 0, "k": 0}));

        let again: AnimationDocument = serde_json::from_value(wire).unwrap();
        assert_eq!(again, doc);
    }

    #[test]
    fn test_layer_type_codes_round_trip() {
        for code in 0u8..=6 {
            let ty = LayerType::from(code);
            assert_eq!(u8::from(ty), code);
        }
        assert_eq!(LayerType::from(13), LayerType::Other(13));
    }

    #[test]
    fn test_default_document_header() {
        let doc = AnimationDocument::default();
        let wire = serde_json::to_value(&doc).unwrap();
        assert_eq!(wire["v"], "5.5.7");
        assert_eq!(wire["fr"], 60.0);
        assert_eq!(wire["w"], 1920);
        assert_eq!(wire["h"], 1080);
        assert_eq!(wire["nm"], "New Animation");
        assert!(wire["layers"].as_array().unwrap().is_empty());
    }
}
