//! Font glyph outlines to bezier paths.
//!
//! Outline data comes from a [`GlyphSource`]; loading and parsing font files
//! happens outside this crate.

use crate::path_builder::PathBuilder;
use glam::Vec2;
use lottie_data::model::BezierPath;

/// One outline command in font units, y axis pointing up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutlineCommand {
    MoveTo(f32, f32),
    LineTo(f32, f32),
    QuadTo(f32, f32, f32, f32),
    CurveTo(f32, f32, f32, f32, f32, f32),
    Close,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    /// Horizontal advance in font units.
    pub advance_width: f32,
    pub outline: Vec<OutlineCommand>,
}

/// A loaded font able to map text to glyph outlines.
pub trait GlyphSource {
    fn units_per_em(&self) -> f32;

    /// Glyphs for `text` in layout order.
    fn glyphs(&self, text: &str) -> Vec<Glyph>;
}

/// Converts `text` set in `font` at `font_size` into bezier paths, one per
/// outline contour, with the baseline at y = 0 and y pointing down.
pub fn parse_font_glyphs(text: &str, font: &dyn GlyphSource, font_size: f32) -> Vec<BezierPath> {
    let units = font.units_per_em();
    if units <= 0.0 {
        return Vec::new();
    }
    let scale = font_size / units;
    let mut builder = PathBuilder::new();
    let mut pen_x = 0.0;

    for glyph in font.glyphs(text) {
        let at = |x: f32, y: f32| Vec2::new(pen_x + x * scale, -y * scale);
        for cmd in &glyph.outline {
            match *cmd {
                OutlineCommand::MoveTo(x, y) => builder.move_to(at(x, y)),
                OutlineCommand::LineTo(x, y) => builder.line_to(at(x, y)),
                OutlineCommand::QuadTo(x1, y1, x, y) => builder.quad_to(at(x1, y1), at(x, y)),
                OutlineCommand::CurveTo(x1, y1, x2, y2, x, y) => {
                    builder.cubic_to(at(x1, y1), at(x2, y2), at(x, y))
                }
                OutlineCommand::Close => builder.close(),
            }
        }
        pen_x += glyph.advance_width * scale;
    }

    builder.finish()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Every character is a unit square of side 500 with advance 600 on a
    /// 1000-unit em; spaces have no outline.
    pub(crate) struct BoxFont;

    impl GlyphSource for BoxFont {
        fn units_per_em(&self) -> f32 {
            1000.0
        }

        fn glyphs(&self, text: &str) -> Vec<Glyph> {
            text.chars()
                .map(|c| Glyph {
                    advance_width: 600.0,
                    outline: if c == ' ' {
                        Vec::new()
                    } else {
                        vec![
                            OutlineCommand::MoveTo(0.0, 0.0),
                            OutlineCommand::LineTo(500.0, 0.0),
                            OutlineCommand::LineTo(500.0, 500.0),
                            OutlineCommand::LineTo(0.0, 500.0),
                            OutlineCommand::Close,
                        ]
                    },
                })
                .collect()
        }
    }

    #[test]
    fn test_glyphs_are_scaled_flipped_and_advanced() {
        let paths = parse_font_glyphs("A B", &BoxFont, 100.0);
        assert_eq!(paths.len(), 2);
        assert_eq!(
            paths[0].v,
            vec![[0.0, 0.0], [50.0, 0.0], [50.0, -50.0], [0.0, -50.0]]
        );
        assert!(paths[0].c);
        // Two advances of 60 each.
        assert_eq!(paths[1].v[0], [120.0, 0.0]);
    }
}
