//! dotLottie container contents. Entries are handled as an in-memory map
//! from archive path to bytes; zip framing is left to the caller.

use crate::error::PackageError;
use lottie_data::model::AnimationDocument;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

pub const MANIFEST_ENTRY: &str = "manifest.json";
pub const ANIMATION_ID: &str = "animation";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestAnimation {
    pub id: String,
    #[serde(default = "default_speed")]
    pub speed: f32,
    #[serde(default, rename = "loop")]
    pub looping: bool,
}

fn default_speed() -> f32 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub animations: Vec<ManifestAnimation>,
}

impl Default for Manifest {
    fn default() -> Self {
        Manifest {
            generator: Some("Lottie Editor".to_string()),
            version: Some("1.0".to_string()),
            animations: vec![ManifestAnimation {
                id: ANIMATION_ID.to_string(),
                speed: 1.0,
                looping: true,
            }],
        }
    }
}

fn parse_entry<'de, T: Deserialize<'de>>(name: &str, bytes: &'de [u8]) -> Result<T, PackageError> {
    serde_json::from_slice(bytes).map_err(|source| PackageError::Json {
        entry: name.to_string(),
        source,
    })
}

/// Loads the first animation listed in the manifest.
pub fn read_package(entries: &BTreeMap<String, Vec<u8>>) -> Result<AnimationDocument, PackageError> {
    let (manifest_name, manifest_bytes) = entries
        .iter()
        .find(|(name, _)| name.ends_with(MANIFEST_ENTRY))
        .ok_or(PackageError::MissingManifest)?;
    let manifest: Manifest = parse_entry(manifest_name, manifest_bytes)?;
    let id = &manifest
        .animations
        .first()
        .ok_or(PackageError::NoAnimations)?
        .id;

    // `animations/<id>.json` next to the manifest, else any `<id>.json`.
    let root = manifest_name.strip_suffix(MANIFEST_ENTRY).unwrap_or("");
    let expected = format!("{root}animations/{id}.json");
    let file_name = format!("{id}.json");
    let (name, bytes) = entries
        .get_key_value(&expected)
        .or_else(|| {
            entries.iter().find(|(name, _)| {
                *name != manifest_name
                    && name.rsplit('/').next() == Some(file_name.as_str())
            })
        })
        .ok_or_else(|| PackageError::AnimationMissing(id.clone()))?;
    debug!("reading animation {id} from {name}");
    parse_entry(name, bytes)
}

/// Entries for a package holding `doc` as its single animation.
pub fn write_package(doc: &AnimationDocument) -> Result<BTreeMap<String, Vec<u8>>, PackageError> {
    let json = |entry: &str, result: serde_json::Result<Vec<u8>>| {
        result.map_err(|source| PackageError::Json {
            entry: entry.to_string(),
            source,
        })
    };
    let animation_entry = format!("animations/{ANIMATION_ID}.json");
    let manifest = json(MANIFEST_ENTRY, serde_json::to_vec(&Manifest::default()))?;
    let animation = json(&animation_entry, serde_json::to_vec(doc))?;

    let mut entries = BTreeMap::new();
    entries.insert(MANIFEST_ENTRY.to_string(), manifest);
    entries.insert(animation_entry, animation);
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entries(pairs: &[(&str, serde_json::Value)]) -> BTreeMap<String, Vec<u8>> {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), serde_json::to_vec(value).unwrap()))
            .collect()
    }

    fn minimal_doc() -> serde_json::Value {
        json!({"v": "5.7.0", "fr": 24, "ip": 0, "op": 48, "w": 64, "h": 64, "layers": []})
    }

    #[test]
    fn test_round_trip() {
        let doc = AnimationDocument {
            nm: "Packed".into(),
            ..Default::default()
        };
        let entries = write_package(&doc).unwrap();
        assert_eq!(
            entries.keys().collect::<Vec<_>>(),
            vec!["animations/animation.json", "manifest.json"]
        );
        let manifest: serde_json::Value = serde_json::from_slice(&entries["manifest.json"]).unwrap();
        assert_eq!(
            manifest,
            json!({
                "generator": "Lottie Editor",
                "version": "1.0",
                "animations": [{"id": "animation", "speed": 1.0, "loop": true}]
            })
        );
        assert_eq!(read_package(&entries).unwrap(), doc);
    }

    #[test]
    fn test_reads_first_listed_animation() {
        let entries = entries(&[
            ("pkg/manifest.json", json!({"animations": [{"id": "intro"}, {"id": "outro"}]})),
            ("pkg/animations/outro.json", json!({"fr": 1, "ip": 0, "op": 1, "w": 1, "h": 1})),
            ("pkg/animations/intro.json", minimal_doc()),
        ]);
        let doc = read_package(&entries).unwrap();
        assert_eq!(doc.fr, 24.0);
    }

    #[test]
    fn test_animation_entry_matches_whole_file_name() {
        let both = entries(&[
            ("manifest.json", json!({"animations": [{"id": "n"}]})),
            ("animations/main.json", json!({"fr": 1, "ip": 0, "op": 1, "w": 1, "h": 1})),
            ("animations/n.json", minimal_doc()),
        ]);
        assert_eq!(read_package(&both).unwrap().fr, 24.0);

        let elsewhere = entries(&[
            ("manifest.json", json!({"animations": [{"id": "n"}]})),
            ("animations/main.json", minimal_doc()),
            ("data/n.json", json!({"fr": 12, "ip": 0, "op": 1, "w": 1, "h": 1})),
        ]);
        assert_eq!(read_package(&elsewhere).unwrap().fr, 12.0);

        let missing = entries(&[
            ("manifest.json", json!({"animations": [{"id": "n"}]})),
            ("animations/main.json", minimal_doc()),
        ]);
        assert!(matches!(
            read_package(&missing),
            Err(PackageError::AnimationMissing(id)) if id == "n"
        ));
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            read_package(&BTreeMap::new()),
            Err(PackageError::MissingManifest)
        ));
        assert!(matches!(
            read_package(&entries(&[("manifest.json", json!({"animations": []}))])),
            Err(PackageError::NoAnimations)
        ));
        assert!(matches!(
            read_package(&entries(&[("manifest.json", json!({"animations": [{"id": "a1"}]}))])),
            Err(PackageError::AnimationMissing(id)) if id == "a1"
        ));

        let mut broken = entries(&[("manifest.json", json!({"animations": [{"id": "a1"}]}))]);
        broken.insert("animations/a1.json".into(), b"{not json".to_vec());
        assert!(matches!(
            read_package(&broken),
            Err(PackageError::Json { entry, .. }) if entry == "animations/a1.json"
        ));
    }
}
