//! The document handle every edit goes through.
//!
//! An [`Editor`] owns the current document as an `Arc` snapshot. Edits run
//! against a shallow copy and replace the snapshot only when they succeed,
//! so a failed edit changes nothing and snapshots handed out earlier never
//! change underneath their holders.

use crate::config::EditorConfig;
use crate::document::{DocumentOps, LayerIdAllocator};
use crate::error::EditError;
use crate::glyph_path::GlyphSource;
use crate::history::History;
use crate::mutation::{read_property, set_keyframe, toggle_animation, write_property, PropertyValue};
use crate::presets::{apply_preset, Preset};
use crate::property_path::{PropertyPath, ShapeIndex};
use crate::structure::{
    add_vertex, convert_parametric_to_path, delete_shape, delete_vertex, set_vertex, VertexHandle,
};
use crate::text::{synthesize, TextPayload, TextSync, TextSyncRequest};
use lottie_data::model::{AnimationDocument, Layer, Vec2};
use std::sync::Arc;
use tracing::{debug, warn};

/// One undoable change to the document.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    /// Adds a layer on top of the stack.
    InsertLayer(Layer),
    RemoveLayer(u64),
    /// Replaces the layer with the same `ind`.
    UpdateLayer(Layer),
    /// Writes at `time` without changing whether the property is animated.
    WriteProperty {
        layer: u64,
        path: PropertyPath,
        time: f32,
        value: PropertyValue,
    },
    /// Keys the property at `time`, animating it first if needed.
    SetKeyframe {
        layer: u64,
        path: PropertyPath,
        time: f32,
        value: PropertyValue,
    },
    ToggleAnimation {
        layer: u64,
        path: PropertyPath,
    },
    DeleteShape {
        layer: u64,
        index: ShapeIndex,
    },
    DeleteVertex {
        layer: u64,
        index: ShapeIndex,
        vertex: usize,
    },
    AddVertex {
        layer: u64,
        index: ShapeIndex,
        after: usize,
    },
    SetVertex {
        layer: u64,
        index: ShapeIndex,
        vertex: usize,
        handle: VertexHandle,
        position: Vec2,
        time: f32,
    },
    ConvertToPath {
        layer: u64,
        index: ShapeIndex,
        time: f32,
    },
    /// Replaces the text payload. The glyph shapes are cleared until the next
    /// text sync completes.
    SetText {
        layer: u64,
        payload: TextPayload,
    },
    ApplyPreset {
        layer: u64,
        preset: Preset,
    },
}

/// How an applied edit interacts with undo history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    Record,
    /// Part of an ongoing gesture such as a drag. The state before the first
    /// skipped edit is what the next recorded commit undoes to.
    SkipHistory,
}

fn run(doc: &mut AnimationDocument, edit: Edit, config: &EditorConfig) -> Result<(), EditError> {
    match edit {
        Edit::InsertLayer(layer) => doc.insert_layer(layer),
        Edit::RemoveLayer(id) => doc
            .remove_layer(id)
            .map(|_| ())
            .ok_or(EditError::LayerNotFound(id)),
        Edit::UpdateLayer(layer) => doc.update_layer(layer.ind, |slot| {
            // Glyph shapes change only through a text sync.
            if (slot.has_text() || layer.has_text()) && slot.shapes != layer.shapes {
                return Err(EditError::TextDerived(layer.ind));
            }
            *slot = layer;
            Ok(())
        }),
        Edit::WriteProperty {
            layer,
            path,
            time,
            value,
        } => doc.update_layer(layer, |l| write_property(l, &path, time, &value, config)),
        Edit::SetKeyframe {
            layer,
            path,
            time,
            value,
        } => doc.update_layer(layer, |l| set_keyframe(l, &path, time, &value, config)),
        Edit::ToggleAnimation { layer, path } => {
            doc.update_layer(layer, |l| toggle_animation(l, &path, config).map(|_| ()))
        }
        Edit::DeleteShape { layer, index } => {
            doc.update_layer(layer, |l| delete_shape(l, &index).map(|_| ()))
        }
        Edit::DeleteVertex {
            layer,
            index,
            vertex,
        } => doc.update_layer(layer, |l| delete_vertex(l, &index, vertex, config)),
        Edit::AddVertex {
            layer,
            index,
            after,
        } => doc.update_layer(layer, |l| add_vertex(l, &index, after, config).map(|_| ())),
        Edit::SetVertex {
            layer,
            index,
            vertex,
            handle,
            position,
            time,
        } => doc.update_layer(layer, |l| {
            set_vertex(l, &index, vertex, handle, position, time, config)
        }),
        Edit::ConvertToPath { layer, index, time } => {
            doc.update_layer(layer, |l| convert_parametric_to_path(l, &index, time))
        }
        Edit::SetText { layer, payload } => doc.update_layer(layer, |l| {
            payload.apply_to(l);
            Ok(())
        }),
        Edit::ApplyPreset { layer, preset } => {
            doc.update_layer(layer, |l| apply_preset(l, preset, config))
        }
    }
}

#[derive(Debug)]
pub struct Editor {
    doc: Arc<AnimationDocument>,
    history: History,
    ids: LayerIdAllocator,
    config: EditorConfig,
    /// Document before the first skipped edit of an open gesture.
    gesture_base: Option<Arc<AnimationDocument>>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(AnimationDocument::default(), EditorConfig::default())
    }
}

impl Editor {
    pub fn new(doc: AnimationDocument, config: EditorConfig) -> Self {
        Editor {
            ids: LayerIdAllocator::for_document(&doc),
            history: History::new(config.history_limit),
            doc: Arc::new(doc),
            config,
            gesture_base: None,
        }
    }

    /// Replaces the document and forgets all history.
    pub fn load(&mut self, doc: AnimationDocument) {
        self.ids.observe(&doc);
        self.doc = Arc::new(doc);
        self.history.clear();
        self.gesture_base = None;
    }

    pub fn document(&self) -> &AnimationDocument {
        &self.doc
    }

    /// Read-only handle on the current state, e.g. for a renderer.
    pub fn snapshot(&self) -> Arc<AnimationDocument> {
        Arc::clone(&self.doc)
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Fresh id for a layer about to be inserted.
    pub fn next_layer_id(&mut self) -> u64 {
        self.ids.next_id()
    }

    pub fn apply(&mut self, edit: Edit, commit: Commit) -> Result<(), EditError> {
        let inserts_layer = matches!(edit, Edit::InsertLayer(_) | Edit::UpdateLayer(_));
        let mut draft = AnimationDocument::clone(&self.doc);
        if let Err(err) = run(&mut draft, edit, &self.config) {
            debug!("edit rejected: {err}");
            return Err(err);
        }
        let before = std::mem::replace(&mut self.doc, Arc::new(draft));
        if inserts_layer {
            self.ids.observe(&self.doc);
        }
        match commit {
            Commit::Record => {
                let base = self.gesture_base.take().unwrap_or(before);
                self.history.push(base);
            }
            Commit::SkipHistory => {
                self.gesture_base.get_or_insert(before);
            }
        }
        Ok(())
    }

    /// Records an open gesture as one history step.
    pub fn finish_gesture(&mut self) {
        if let Some(base) = self.gesture_base.take() {
            self.history.push(base);
        }
    }

    pub fn undo(&mut self) -> bool {
        self.finish_gesture();
        match self.history.undo(Arc::clone(&self.doc)) {
            Some(prev) => {
                self.doc = prev;
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        self.finish_gesture();
        match self.history.redo(Arc::clone(&self.doc)) {
            Some(next) => {
                self.doc = next;
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.gesture_base.is_some() || self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.gesture_base.is_none() && self.history.can_redo()
    }

    /// Samples a property of a layer at `time`.
    pub fn read(
        &self,
        layer: u64,
        path: &PropertyPath,
        time: f32,
    ) -> Result<Option<PropertyValue>, EditError> {
        let layer = self
            .doc
            .find_layer(layer)
            .ok_or(EditError::LayerNotFound(layer))?;
        read_property(layer, path, time)
    }

    /// Captures the text payload of `layer` so its glyphs can be generated
    /// once the font is available.
    pub fn begin_text_sync(&self, layer: u64) -> Result<TextSyncRequest, EditError> {
        let found = self
            .doc
            .find_layer(layer)
            .ok_or(EditError::LayerNotFound(layer))?;
        let payload = TextPayload::of(found).ok_or(EditError::NoText(layer))?;
        Ok(TextSyncRequest { layer, payload })
    }

    /// Rebuilds the glyph shapes of the requested layer, unless its payload
    /// changed since the request was taken. The shapes are derived data, so
    /// no history entry is recorded.
    pub fn complete_text_sync(&mut self, request: &TextSyncRequest, font: &dyn GlyphSource) -> TextSync {
        let current = self
            .doc
            .find_layer(request.layer)
            .and_then(|layer| TextPayload::of(layer));
        if current.as_ref() != Some(&request.payload) {
            debug!("discarding stale text sync for layer {}", request.layer);
            return TextSync::Stale;
        }

        let shapes = synthesize(&request.payload, font, &self.config);
        let mut draft = AnimationDocument::clone(&self.doc);
        let updated = draft.update_layer(request.layer, |layer| {
            layer.shapes = Some(shapes);
            Ok(())
        });
        match updated {
            Ok(()) => {
                self.doc = Arc::new(draft);
                TextSync::Applied
            }
            Err(err) => {
                warn!("text sync for layer {} failed: {err}", request.layer);
                TextSync::Stale
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph_path::tests::BoxFont;
    use crate::property_path::TransformField;
    use crate::templates::{rectangle_layer, text_layer};
    use lottie_data::model::LayerType;

    fn editor_with_rect() -> (Editor, u64) {
        let mut editor = Editor::default();
        let id = editor.next_layer_id();
        editor
            .apply(Edit::InsertLayer(rectangle_layer(id)), Commit::Record)
            .unwrap();
        (editor, id)
    }

    fn opacity() -> PropertyPath {
        PropertyPath::Transform(TransformField::Opacity)
    }

    #[test]
    fn test_undo_redo_restores_exact_documents() {
        let (mut editor, id) = editor_with_rect();
        let before = editor.snapshot();
        editor
            .apply(
                Edit::SetKeyframe {
                    layer: id,
                    path: opacity(),
                    time: 10.0,
                    value: PropertyValue::Scalar(0.0),
                },
                Commit::Record,
            )
            .unwrap();
        let after = editor.snapshot();
        assert_ne!(*before, *after);

        assert!(editor.undo());
        assert_eq!(*editor.snapshot(), *before);
        assert!(editor.redo());
        assert_eq!(*editor.snapshot(), *after);
        assert!(!editor.redo());
    }

    #[test]
    fn test_failed_edit_changes_nothing() {
        let (mut editor, id) = editor_with_rect();
        let before = editor.snapshot();
        let depth = editor.history().len();
        let err = editor
            .apply(Edit::DeleteShape { layer: id, index: ShapeIndex::root(5) }, Commit::Record)
            .unwrap_err();
        assert_eq!(err, EditError::ShapeNotFound("shapes.5".into()));
        assert!(Arc::ptr_eq(&before, &editor.snapshot()));
        assert_eq!(editor.history().len(), depth);
    }

    #[test]
    fn test_gesture_undoes_in_one_step() {
        let (mut editor, id) = editor_with_rect();
        let before = editor.snapshot();
        for step in 1..=5 {
            editor
                .apply(
                    Edit::WriteProperty {
                        layer: id,
                        path: opacity(),
                        time: 0.0,
                        value: (100.0 - step as f32 * 10.0).into(),
                    },
                    Commit::SkipHistory,
                )
                .unwrap();
        }
        editor
            .apply(
                Edit::WriteProperty {
                    layer: id,
                    path: opacity(),
                    time: 0.0,
                    value: PropertyValue::Scalar(25.0),
                },
                Commit::Record,
            )
            .unwrap();
        assert!(editor.undo());
        assert_eq!(*editor.snapshot(), *before);
    }

    #[test]
    fn test_snapshots_are_never_mutated() {
        let (mut editor, id) = editor_with_rect();
        let held = editor.snapshot();
        let layer_before = Layer::clone(&held.layers[0]);
        editor
            .apply(Edit::ApplyPreset { layer: id, preset: Preset::FadeIn }, Commit::Record)
            .unwrap();
        assert_eq!(*held.layers[0], layer_before);
        assert!(editor.snapshot().layers[0].ks.o.is_animated());
    }

    #[test]
    fn test_stale_text_sync_is_discarded() {
        let mut editor = Editor::default();
        let id = editor.next_layer_id();
        let layer = text_layer(id, "Hi", 300.0, editor.config());
        editor.apply(Edit::InsertLayer(layer), Commit::Record).unwrap();

        let stale = editor.begin_text_sync(id).unwrap();
        editor
            .apply(
                Edit::SetText {
                    layer: id,
                    payload: TextPayload {
                        text: "Hello".into(),
                        ..stale.payload.clone()
                    },
                },
                Commit::Record,
            )
            .unwrap();
        assert_eq!(editor.complete_text_sync(&stale, &BoxFont), TextSync::Stale);
        assert_eq!(editor.document().layers[0].shapes, Some(Vec::new()));

        let fresh = editor.begin_text_sync(id).unwrap();
        assert_eq!(editor.complete_text_sync(&fresh, &BoxFont), TextSync::Applied);
        let shapes = editor.document().layers[0].shapes.clone().unwrap();
        assert_eq!(shapes[0].name(), Some("Text Group"));
    }

    #[test]
    fn test_duplicate_layer_id_is_refused() {
        let mut editor = Editor::default();
        editor
            .apply(Edit::InsertLayer(Layer::new(5, LayerType::Shape)), Commit::Record)
            .unwrap();
        let before = editor.snapshot();
        assert_eq!(
            editor.apply(Edit::InsertLayer(Layer::new(5, LayerType::Shape)), Commit::Record),
            Err(EditError::DuplicateLayer(5))
        );
        let ids: Vec<u64> = editor.document().layers.iter().map(|l| l.ind).collect();
        assert_eq!(ids, vec![5]);
        assert!(Arc::ptr_eq(&before, &editor.snapshot()));
        assert_eq!(editor.history().len(), 1);
        assert!(editor.next_layer_id() > 5);
    }

    #[test]
    fn test_edits_share_untouched_assets() {
        let doc: AnimationDocument = serde_json::from_value(serde_json::json!({
            "v": "5.5.7", "fr": 30, "ip": 0, "op": 60, "w": 100, "h": 100,
            "assets": [{"id": "comp_0", "layers": [{"ind": 900, "ty": 4}]}],
            "layers": [{"ind": 1, "ty": 0, "refId": "comp_0"}]
        }))
        .unwrap();
        let mut editor = Editor::new(doc, EditorConfig::default());
        let before = editor.snapshot();
        editor
            .apply(
                Edit::SetKeyframe {
                    layer: 1,
                    path: opacity(),
                    time: 10.0,
                    value: PropertyValue::Scalar(0.0),
                },
                Commit::Record,
            )
            .unwrap();
        assert!(!Arc::ptr_eq(&before.layers[0], &editor.document().layers[0]));
        assert!(Arc::ptr_eq(&before.assets[0], &editor.document().assets[0]));
    }

    #[test]
    fn test_text_sync_needs_text() {
        let (editor, id) = editor_with_rect();
        assert_eq!(editor.begin_text_sync(id), Err(EditError::NoText(id)));
        assert_eq!(editor.begin_text_sync(1), Err(EditError::LayerNotFound(1)));
    }
}
