//! Subcommand implementations. Every editing command loads the document into
//! an [`Editor`], applies one edit and writes the result.

use anyhow::{anyhow, Context, Result};
use lottie_core::{
    parse_path_data, write_package, Commit, DocumentOps, Edit, Editor, EditorConfig, Preset,
    PropertyPath, PropertyValue, ShapeIndex, Template,
};
use lottie_data::model::AnimationDocument;
use std::fs;
use std::path::Path;
use tracing::info;

pub fn load_config(path: Option<&Path>) -> Result<EditorConfig> {
    let Some(path) = path else {
        return Ok(EditorConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    EditorConfig::from_json_str(&text)
        .with_context(|| format!("Invalid config {}", path.display()))
}

fn load_editor(file: &Path, config: EditorConfig) -> Result<Editor> {
    let bytes = fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let doc = AnimationDocument::from_slice(&bytes)
        .with_context(|| format!("Failed to parse Lottie JSON in {}", file.display()))?;
    Ok(Editor::new(doc, config))
}

/// Pretty JSON to `output`, or to stdout when no file is given.
fn emit<T: serde::Serialize + ?Sized>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            info!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn property_path(editor: &Editor, layer: u64, path: &str) -> Result<PropertyPath> {
    let found = editor
        .document()
        .find_layer(layer)
        .ok_or_else(|| anyhow!("layer {layer} not found"))?;
    PropertyPath::parse(found, path).with_context(|| format!("Bad property path `{path}`"))
}

pub fn eval(file: &Path, layer: u64, path: &str, time: f32, config: EditorConfig) -> Result<()> {
    let editor = load_editor(file, config)?;
    let path = property_path(&editor, layer, path)?;
    let value = editor.read(layer, &path, time)?;
    emit(&value, None)
}

pub fn keyframe(
    file: &Path,
    layer: u64,
    path: &str,
    time: f32,
    value: &str,
    output: Option<&Path>,
    config: EditorConfig,
) -> Result<()> {
    let mut editor = load_editor(file, config)?;
    let path = property_path(&editor, layer, path)?;
    let value: PropertyValue =
        serde_json::from_str(value).with_context(|| format!("Bad value `{value}`"))?;
    editor.apply(
        Edit::SetKeyframe {
            layer,
            path: path.clone(),
            time,
            value,
        },
        Commit::Record,
    )?;
    info!("set keyframe on layer {layer} {path} at {time}");
    emit(editor.document(), output)
}

pub fn toggle(
    file: &Path,
    layer: u64,
    path: &str,
    output: Option<&Path>,
    config: EditorConfig,
) -> Result<()> {
    let mut editor = load_editor(file, config)?;
    let path = property_path(&editor, layer, path)?;
    editor.apply(
        Edit::ToggleAnimation {
            layer,
            path: path.clone(),
        },
        Commit::Record,
    )?;
    let animated = editor
        .document()
        .find_layer(layer)
        .and_then(|l| lottie_core::property_path::resolve(l, &path).ok())
        .is_some_and(|prop| prop.is_animated());
    info!("layer {layer} {path} animated: {animated}");
    emit(editor.document(), output)
}

pub fn svg(d: &str) -> Result<()> {
    let paths = parse_path_data(d);
    if paths.is_empty() {
        return Err(anyhow!("no paths found in `{d}`"));
    }
    emit(&paths, None)
}

pub fn convert(
    file: &Path,
    layer: u64,
    shape: &str,
    time: f32,
    output: Option<&Path>,
    config: EditorConfig,
) -> Result<()> {
    let mut editor = load_editor(file, config)?;
    let index = ShapeIndex::parse(shape)?;
    editor.apply(Edit::ConvertToPath { layer, index, time }, Commit::Record)?;
    emit(editor.document(), output)
}

pub fn add(file: &Path, template: &str, output: Option<&Path>, config: EditorConfig) -> Result<()> {
    let template: Template = template.parse().map_err(|err: String| anyhow!(err))?;
    let mut editor = load_editor(file, config)?;
    let id = editor.next_layer_id();
    editor.apply(Edit::InsertLayer(template.build(id)), Commit::Record)?;
    info!("inserted layer {id}");
    emit(editor.document(), output)
}

pub fn preset(
    file: &Path,
    layer: u64,
    preset: &str,
    output: Option<&Path>,
    config: EditorConfig,
) -> Result<()> {
    let preset: Preset = preset.parse().map_err(|err: String| anyhow!(err))?;
    let mut editor = load_editor(file, config)?;
    editor.apply(Edit::ApplyPreset { layer, preset }, Commit::Record)?;
    emit(editor.document(), output)
}

pub fn pack(file: &Path, output: &Path) -> Result<()> {
    let editor = load_editor(file, EditorConfig::default())?;
    let entries = write_package(editor.document())?;
    for (name, bytes) in &entries {
        let target = output.join(name);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&target, bytes).with_context(|| format!("Failed to write {}", target.display()))?;
    }
    info!("packed {} entries into {}", entries.len(), output.display());
    Ok(())
}
