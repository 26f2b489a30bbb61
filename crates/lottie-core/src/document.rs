use crate::error::EditError;
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};
use chrono::Utc;
use lottie_data::model::{AnimationDocument, Asset, Layer};
use std::sync::Arc;
use tracing::warn;

/// Layer and asset lookups on a document. Layer ids are the `ind` field.
pub trait DocumentOps {
    /// Puts `layer` at the head of the layer list (topmost). Fails if a layer
    /// with the same id is already present.
    fn insert_layer(&mut self, layer: Layer) -> Result<(), EditError>;

    fn remove_layer(&mut self, id: u64) -> Option<Arc<Layer>>;

    fn find_layer(&self, id: u64) -> Option<&Arc<Layer>>;

    /// Runs `edit` on a private copy of the layer and swaps the copy in only
    /// when it succeeds. Other holders of the old layer never see the change.
    fn update_layer<R>(
        &mut self,
        id: u64,
        edit: impl FnOnce(&mut Layer) -> Result<R, EditError>,
    ) -> Result<R, EditError>;

    fn find_asset(&self, id: &str) -> Option<&Asset>;

    /// Layers of the precomposition asset `id`.
    fn precomp_layers(&self, id: &str) -> Option<&[Layer]>;
}

impl DocumentOps for AnimationDocument {
    fn insert_layer(&mut self, layer: Layer) -> Result<(), EditError> {
        if self.find_layer(layer.ind).is_some() {
            return Err(EditError::DuplicateLayer(layer.ind));
        }
        self.layers.insert(0, Arc::new(layer));
        Ok(())
    }

    fn remove_layer(&mut self, id: u64) -> Option<Arc<Layer>> {
        let pos = self.layers.iter().position(|layer| layer.ind == id)?;
        Some(self.layers.remove(pos))
    }

    fn find_layer(&self, id: u64) -> Option<&Arc<Layer>> {
        self.layers.iter().find(|layer| layer.ind == id)
    }

    fn update_layer<R>(
        &mut self,
        id: u64,
        edit: impl FnOnce(&mut Layer) -> Result<R, EditError>,
    ) -> Result<R, EditError> {
        let slot = self
            .layers
            .iter_mut()
            .find(|layer| layer.ind == id)
            .ok_or(EditError::LayerNotFound(id))?;
        let mut draft = (**slot).clone();
        let out = edit(&mut draft)?;
        *slot = Arc::new(draft);
        Ok(out)
    }

    fn find_asset(&self, id: &str) -> Option<&Asset> {
        self.assets
            .iter()
            .find(|asset| asset.id == id)
            .map(|asset| asset.as_ref())
    }

    fn precomp_layers(&self, id: &str) -> Option<&[Layer]> {
        self.find_asset(id)?.layers.as_deref()
    }
}

/// Hands out layer ids taken from the wall clock in milliseconds. Ids are
/// strictly increasing for the life of the allocator and stay above every id
/// it has observed.
#[derive(Debug, Clone, Default)]
pub struct LayerIdAllocator {
    last: u64,
}

impl LayerIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocator that will never collide with the layers of `doc`.
    pub fn for_document(doc: &AnimationDocument) -> Self {
        let mut ids = Self::new();
        ids.observe(doc);
        ids
    }

    /// Raises the floor above every layer id in `doc`, precomps included.
    pub fn observe(&mut self, doc: &AnimationDocument) {
        let top = doc.layers.iter().map(|layer| layer.ind);
        let nested = doc
            .assets
            .iter()
            .filter_map(|asset| asset.layers.as_deref())
            .flatten()
            .map(|layer| layer.ind);
        if let Some(max) = top.chain(nested).max() {
            self.last = self.last.max(max);
        }
    }

    pub fn next_id(&mut self) -> u64 {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        self.last = now.max(self.last.saturating_add(1));
        self.last
    }
}

/// Image bytes carried inline in an asset's `p` as a base64 data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedImage {
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Decodes `data:<mime>;base64,<payload>` image assets. External file
/// references and malformed payloads yield `None`.
pub fn decode_embedded_image(asset: &Asset) -> Option<EmbeddedImage> {
    let p = asset.p.as_deref()?;
    let rest = p.strip_prefix("data:")?;
    let (mime, payload) = rest.split_once(";base64,")?;
    match BASE64_STANDARD.decode(payload.trim()) {
        Ok(bytes) => Some(EmbeddedImage {
            mime: mime.to_string(),
            bytes,
        }),
        Err(err) => {
            warn!("asset {}: invalid base64 image data: {err}", asset.id);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lottie_data::model::LayerType;
    use serde_json::json;

    fn doc() -> AnimationDocument {
        serde_json::from_value(json!({
            "v": "5.5.7", "fr": 30, "ip": 0, "op": 60, "w": 100, "h": 100,
            "assets": [
                {"id": "comp_0", "layers": [{"ind": 900, "ty": 3}]},
                {"id": "img_0", "w": 1, "h": 1, "e": 1, "p": "data:image/png;base64,iVBORw0K"}
            ],
            "layers": [{"ind": 1, "ty": 4}, {"ind": 2, "ty": 0, "refId": "comp_0"}]
        }))
        .unwrap()
    }

    #[test]
    fn test_insert_find_remove() {
        let mut doc = doc();
        doc.insert_layer(Layer::new(5, LayerType::Null)).unwrap();
        assert_eq!(doc.layers[0].ind, 5);
        assert_eq!(
            doc.insert_layer(Layer::new(5, LayerType::Shape)),
            Err(EditError::DuplicateLayer(5))
        );
        assert_eq!(doc.layers.len(), 3);
        assert_eq!(doc.layers[0].ty, LayerType::Null);
        assert!(doc.find_layer(2).is_some());
        assert_eq!(doc.remove_layer(2).map(|l| l.ind), Some(2));
        assert!(doc.find_layer(2).is_none());
        assert!(doc.remove_layer(2).is_none());
    }

    #[test]
    fn test_failed_update_leaves_layer_untouched() {
        let mut doc = doc();
        let before = doc.layers[0].clone();
        let res: Result<(), _> = doc.update_layer(1, |layer| {
            layer.nm = Some("changed".into());
            Err(EditError::NoValue)
        });
        assert_eq!(res, Err(EditError::NoValue));
        assert!(Arc::ptr_eq(&before, &doc.layers[0]));

        doc.update_layer(1, |layer| {
            layer.nm = Some("changed".into());
            Ok(())
        })
        .unwrap();
        assert_eq!(doc.layers[0].nm.as_deref(), Some("changed"));
        // The old handle still sees the old layer.
        assert_eq!(before.nm, None);

        assert_eq!(
            doc.update_layer(77, |_| Ok(())),
            Err(EditError::LayerNotFound(77))
        );
    }

    #[test]
    fn test_assets_and_precomps() {
        let doc = doc();
        assert_eq!(doc.precomp_layers("comp_0").unwrap()[0].ind, 900);
        assert!(doc.precomp_layers("img_0").is_none());
        assert!(doc.find_asset("missing").is_none());
    }

    #[test]
    fn test_ids_increase_past_document_ids() {
        let mut doc = doc();
        doc.layers[0] = Arc::new(Layer::new(u64::MAX / 2, LayerType::Shape));
        let mut ids = LayerIdAllocator::for_document(&doc);
        let a = ids.next_id();
        let b = ids.next_id();
        assert!(a > u64::MAX / 2);
        assert!(b > a);

        let mut fresh = LayerIdAllocator::new();
        let first = fresh.next_id();
        assert!(fresh.next_id() > first);
    }

    #[test]
    fn test_decode_embedded_image() {
        let doc = doc();
        let image = decode_embedded_image(doc.find_asset("img_0").unwrap()).unwrap();
        assert_eq!(image.mime, "image/png");
        assert_eq!(&image.bytes[1..4], b"PNG");
        assert!(decode_embedded_image(doc.find_asset("comp_0").unwrap()).is_none());

        let broken = Asset {
            p: Some("data:image/png;base64,@@@".into()),
            ..doc.find_asset("img_0").unwrap().clone()
        };
        assert!(decode_embedded_image(&broken).is_none());
    }
}
