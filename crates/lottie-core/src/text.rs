//! Text layers keep their shapes as a cache of the glyph outlines of their
//! text payload.

use crate::config::EditorConfig;
use crate::glyph_path::{parse_font_glyphs, GlyphSource};
use lottie_data::model::{
    BezierPath, FillShape, GroupShape, Layer, PathShape, Property, Shape, Transform,
    TransformShape,
};

/// Fill color of generated glyphs.
pub const TEXT_FILL: [f32; 3] = [0.2, 0.2, 0.2];

/// The fields of a layer the glyph shapes are generated from.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPayload {
    pub text: String,
    pub font: Option<String>,
    pub font_size: Option<f32>,
}

impl TextPayload {
    pub fn of(layer: &Layer) -> Option<Self> {
        Some(TextPayload {
            text: layer.text.clone()?,
            font: layer.font.clone(),
            font_size: layer.font_size,
        })
    }

    /// Font family to load, falling back to the configured default.
    pub fn font_family<'a>(&'a self, config: &'a EditorConfig) -> &'a str {
        self.font.as_deref().unwrap_or(&config.default_font)
    }

    pub fn size(&self, config: &EditorConfig) -> f32 {
        self.font_size.unwrap_or(config.default_font_size)
    }

    /// Writes the payload into `layer` and drops the now stale shapes.
    pub fn apply_to(&self, layer: &mut Layer) {
        layer.text = Some(self.text.clone());
        layer.font = self.font.clone();
        layer.font_size = self.font_size;
        layer.shapes = Some(Vec::new());
    }
}

/// Snapshot of a text layer taken before its font is loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSyncRequest {
    pub layer: u64,
    pub payload: TextPayload,
}

/// Outcome of finishing a text sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSync {
    Applied,
    /// The layer changed or disappeared while the font was loading.
    Stale,
}

/// The `Text Group` holding one path per glyph contour, a fill and an
/// identity transform.
pub fn text_shapes(paths: Vec<BezierPath>) -> Vec<Shape> {
    let mut items: Vec<Shape> = paths
        .into_iter()
        .enumerate()
        .map(|(idx, path)| {
            Shape::Path(PathShape {
                nm: Some(format!("Glyph {idx}")),
                ks: Property::fixed(path),
                extra: Default::default(),
            })
        })
        .collect();
    items.push(Shape::Fill(FillShape {
        nm: Some("Fill".to_string()),
        c: Property::fixed(TEXT_FILL.to_vec()),
        o: Property::fixed(100.0),
        r: None,
        extra: Default::default(),
    }));
    items.push(Shape::Transform(TransformShape {
        nm: Some("Transform".to_string()),
        t: Transform::identity_2d(),
    }));
    vec![Shape::Group(GroupShape {
        nm: Some("Text Group".to_string()),
        it: items,
        extra: Default::default(),
    })]
}

/// Glyph shapes for `payload` set in `font`.
pub fn synthesize(payload: &TextPayload, font: &dyn GlyphSource, config: &EditorConfig) -> Vec<Shape> {
    text_shapes(parse_font_glyphs(&payload.text, font, payload.size(config)))
}
