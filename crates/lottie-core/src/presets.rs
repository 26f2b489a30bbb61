//! One-click entrance animations.

use crate::config::EditorConfig;
use crate::error::EditError;
use crate::mutation::{promote_to_animated, write_at_time};
use lottie_data::model::{Animatable, Layer, Property, Shape, TrimShape};
use std::fmt;
use std::str::FromStr;

/// Length of every preset, in frames.
pub const PRESET_DURATION: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Trim path end 0 -> 100.
    DrawIn,
    /// Layer scale 0% -> 100%.
    ScaleIn,
    /// Layer opacity 0 -> 100.
    FadeIn,
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draw-in" => Ok(Preset::DrawIn),
            "scale-in" => Ok(Preset::ScaleIn),
            "fade-in" => Ok(Preset::FadeIn),
            other => Err(format!("unknown preset `{other}`")),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Preset::DrawIn => "draw-in",
            Preset::ScaleIn => "scale-in",
            Preset::FadeIn => "fade-in",
        })
    }
}

/// Two keyframes, `from` at 0 and `to` at the end of the preset.
fn ramp<T: Animatable>(from: T, to: T, config: &EditorConfig) -> Result<Property<T>, EditError> {
    let mut prop = Property::fixed(from);
    promote_to_animated(&mut prop, config)?;
    write_at_time(&mut prop, PRESET_DURATION, to, config);
    Ok(prop)
}

/// Replaces the matching layer property with the preset animation. Draw-in
/// appends a trim to the first group, or to the layer's top level when it has
/// no group.
pub fn apply_preset(layer: &mut Layer, preset: Preset, config: &EditorConfig) -> Result<(), EditError> {
    match preset {
        Preset::DrawIn => {
            if layer.has_text() {
                return Err(EditError::TextDerived(layer.ind));
            }
            let trim = Shape::Trim(TrimShape {
                nm: Some("Trim Paths".to_string()),
                s: Property::fixed(0.0),
                e: ramp(0.0, 100.0, config)?,
                o: Property::fixed(0.0),
                m: Some(1),
                extra: Default::default(),
            });
            let shapes = layer.shapes.get_or_insert_with(Vec::new);
            let group = shapes.iter_mut().find_map(|shape| match shape {
                Shape::Group(group) => Some(group),
                _ => None,
            });
            match group {
                Some(group) => group.it.push(trim),
                None => shapes.push(trim),
            }
        }
        Preset::ScaleIn => {
            layer.ks.s = ramp(vec![0.0, 0.0, 100.0], vec![100.0, 100.0, 100.0], config)?;
        }
        Preset::FadeIn => {
            layer.ks.o = ramp(0.0, 100.0, config)?;
        }
    }
    Ok(())
}
