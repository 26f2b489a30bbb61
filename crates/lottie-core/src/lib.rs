//! Editing engine for Lottie documents: keyframe sampling, property and
//! structural edits, path conversion and the [`Editor`] handle with undo.

pub mod animatable;
pub mod bounds;
pub mod config;
pub mod document;
pub mod editor;
pub mod error;
pub mod glyph_path;
pub mod history;
pub mod mutation;
pub mod package;
pub mod parametric;
pub mod path_builder;
pub mod presets;
pub mod property_path;
pub mod structure;
pub mod svg_path;
pub mod templates;
pub mod text;

pub use animatable::{Animator, Interpolatable};
pub use bounds::{layer_bounds, LayerBounds};
pub use config::EditorConfig;
pub use document::{decode_embedded_image, DocumentOps, EmbeddedImage, LayerIdAllocator};
pub use editor::{Commit, Edit, Editor};
pub use error::{EditError, PackageError};
pub use glyph_path::{parse_font_glyphs, Glyph, GlyphSource, OutlineCommand};
pub use history::History;
pub use mutation::{
    demote_to_static, promote_to_animated, read_property, set_keyframe, sync_keyframes,
    toggle_animation, write_at_time, write_property, PropertyValue,
};
pub use package::{read_package, write_package, Manifest, ManifestAnimation};
pub use parametric::shape_to_path;
pub use presets::{apply_preset, Preset};
pub use property_path::{PropertyPath, ShapeField, ShapeIndex, TransformField};
pub use structure::VertexHandle;
pub use svg_path::parse_path_data;
pub use templates::Template;
pub use text::{TextPayload, TextSync, TextSyncRequest};
