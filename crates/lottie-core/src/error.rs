use thiserror::Error;

/// Failure of a single edit. The document is left untouched whenever one of
/// these is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    #[error("layer {0} not found")]
    LayerNotFound(u64),

    #[error("layer id {0} is already in use")]
    DuplicateLayer(u64),

    #[error("no shape at {0}")]
    ShapeNotFound(String),

    #[error("invalid property path: {0}")]
    InvalidPath(String),

    #[error("{node} has no property `{key}`")]
    NoSuchProperty { node: &'static str, key: String },

    #[error("expected a {expected} value, got {found}")]
    ValueMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("property has no value to animate")]
    NoValue,

    #[error("shape at {0} is not a path")]
    NotAPath(String),

    #[error("shape at {0} is not a rectangle, ellipse or star")]
    NotParametric(String),

    #[error("a path needs at least {min} vertices")]
    VertexFloor { min: usize },

    #[error("vertex {index} out of range for a path of {len}")]
    VertexOutOfRange { index: usize, len: usize },

    #[error("shapes of layer {0} are generated from its text")]
    TextDerived(u64),

    #[error("layer {0} has no text")]
    NoText(u64),
}

#[derive(Error, Debug)]
pub enum PackageError {
    #[error("no manifest.json found in package")]
    MissingManifest,

    #[error("no animations found in manifest")]
    NoAnimations,

    #[error("animation file for {0} not found")]
    AnimationMissing(String),

    #[error("invalid JSON in {entry}: {source}")]
    Json {
        entry: String,
        #[source]
        source: serde_json::Error,
    },
}
