//! SVG path data (`d` attribute) to bezier paths.
//!
//! Supports `M L H V C S Q T A Z` in absolute and relative form with implicit
//! command repetition. Arcs degrade to a straight line to their endpoint.
//! Malformed input never fails the whole string: unknown tokens and commands
//! with missing arguments are skipped.

use crate::path_builder::PathBuilder;
use glam::Vec2;
use lottie_data::model::BezierPath;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Command(char),
    Number(f32),
}

fn tokenize(d: &str) -> Vec<Token> {
    let bytes = d.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i] as char;
        if c.is_ascii_whitespace() || c == ',' {
            i += 1;
            continue;
        }
        if c.is_ascii_alphabetic() && c != 'e' && c != 'E' {
            if "MmLlHhVvCcSsQqTtAaZz".contains(c) {
                tokens.push(Token::Command(c));
            } else {
                debug!("skipping unknown path command {c:?}");
            }
            i += 1;
            continue;
        }
        if c.is_ascii_digit() || c == '.' || c == '-' || c == '+' {
            let end = scan_number(bytes, i);
            match d[i..end].parse::<f32>() {
                Ok(n) => tokens.push(Token::Number(n)),
                Err(_) => debug!("skipping malformed number {:?}", &d[i..end]),
            }
            i = end.max(i + 1);
            continue;
        }
        debug!("skipping unexpected character {c:?} in path data");
        i += 1;
    }

    tokens
}

/// End of the number starting at `start`: sign, digits, one dot, exponent.
/// `1.5.5` scans as `1.5` followed by `.5`.
fn scan_number(bytes: &[u8], start: usize) -> usize {
    let mut i = start;
    if i < bytes.len() && (bytes[i] == b'-' || bytes[i] == b'+') {
        i += 1;
    }
    let mut seen_dot = false;
    while i < bytes.len() {
        match bytes[i] {
            b'0'..=b'9' => i += 1,
            b'.' if !seen_dot => {
                seen_dot = true;
                i += 1;
            }
            _ => break,
        }
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'-' || bytes[j] == b'+') {
            j += 1;
        }
        if j < bytes.len() && bytes[j].is_ascii_digit() {
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            i = j;
        }
    }
    i
}

fn arity(cmd: char) -> usize {
    match cmd.to_ascii_uppercase() {
        'M' | 'L' | 'T' => 2,
        'H' | 'V' => 1,
        'C' => 6,
        'S' | 'Q' => 4,
        'A' => 7,
        _ => 0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Family {
    Cubic,
    Quad,
    Other,
}

struct Interpreter {
    builder: PathBuilder,
    family: Family,
    /// Second control point of the previous cubic segment.
    last_cubic: Vec2,
    /// Control point of the previous quadratic segment.
    last_quad: Vec2,
}

impl Interpreter {
    fn new() -> Self {
        Interpreter {
            builder: PathBuilder::new(),
            family: Family::Other,
            last_cubic: Vec2::ZERO,
            last_quad: Vec2::ZERO,
        }
    }

    fn run(&mut self, cmd: char, args: &[f32]) {
        let relative = cmd.is_ascii_lowercase();
        let cursor = self.builder.cursor();
        let origin = if relative { cursor } else { Vec2::ZERO };
        let pt = |x: f32, y: f32| origin + Vec2::new(x, y);

        match cmd.to_ascii_uppercase() {
            'M' => {
                self.builder.move_to(pt(args[0], args[1]));
                self.family = Family::Other;
            }
            'L' => {
                self.builder.line_to(pt(args[0], args[1]));
                self.family = Family::Other;
            }
            'H' => {
                let x = if relative { cursor.x + args[0] } else { args[0] };
                self.builder.line_to(Vec2::new(x, cursor.y));
                self.family = Family::Other;
            }
            'V' => {
                let y = if relative { cursor.y + args[0] } else { args[0] };
                self.builder.line_to(Vec2::new(cursor.x, y));
                self.family = Family::Other;
            }
            'C' => {
                let c2 = pt(args[2], args[3]);
                self.builder
                    .cubic_to(pt(args[0], args[1]), c2, pt(args[4], args[5]));
                self.last_cubic = c2;
                self.family = Family::Cubic;
            }
            'S' => {
                let c1 = if self.family == Family::Cubic {
                    cursor * 2.0 - self.last_cubic
                } else {
                    cursor
                };
                let c2 = pt(args[0], args[1]);
                self.builder.cubic_to(c1, c2, pt(args[2], args[3]));
                self.last_cubic = c2;
                self.family = Family::Cubic;
            }
            'Q' => {
                let q = pt(args[0], args[1]);
                self.builder.quad_to(q, pt(args[2], args[3]));
                self.last_quad = q;
                self.family = Family::Quad;
            }
            'T' => {
                let q = if self.family == Family::Quad {
                    cursor * 2.0 - self.last_quad
                } else {
                    cursor
                };
                self.builder.quad_to(q, pt(args[0], args[1]));
                self.last_quad = q;
                self.family = Family::Quad;
            }
            'A' => {
                self.builder.line_to(pt(args[5], args[6]));
                self.family = Family::Other;
            }
            _ => {}
        }
    }

    fn close(&mut self) {
        self.builder.close();
        self.family = Family::Other;
    }
}

/// Parses SVG path data into one [`BezierPath`] per sub-path.
pub fn parse_path_data(d: &str) -> Vec<BezierPath> {
    let tokens = tokenize(d);
    let mut interp = Interpreter::new();
    let mut active: Option<char> = None;
    let mut i = 0;

    while i < tokens.len() {
        let cmd = match tokens[i] {
            Token::Command(c) => {
                i += 1;
                if c.eq_ignore_ascii_case(&'z') {
                    interp.close();
                    active = None;
                    continue;
                }
                c
            }
            Token::Number(n) => match active {
                // Implicit repetition; extra pairs after a moveto are linetos.
                Some(c) => c,
                None => {
                    debug!("skipping stray number {n} in path data");
                    i += 1;
                    continue;
                }
            },
        };

        let needed = arity(cmd);
        let mut args = Vec::with_capacity(needed);
        while args.len() < needed {
            match tokens.get(i) {
                Some(Token::Number(n)) => {
                    args.push(*n);
                    i += 1;
                }
                _ => break,
            }
        }
        if args.len() < needed {
            debug!(
                "skipping {cmd} with {} of {needed} arguments",
                args.len()
            );
            active = None;
            continue;
        }

        interp.run(cmd, &args);
        active = Some(match cmd {
            'M' => 'L',
            'm' => 'l',
            other => other,
        });
    }

    interp.builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cubic_tangents_are_relative() {
        let paths = parse_path_data("M0,0 C25,0 75,100 100,100");
        assert_eq!(paths.len(), 1);
        let p = &paths[0];
        assert_eq!(p.v, vec![[0.0, 0.0], [100.0, 100.0]]);
        assert_eq!(p.o[0], [25.0, 0.0]);
        assert_eq!(p.i[1], [-25.0, 0.0]);
        assert!(!p.c);
    }

    #[test]
    fn test_relative_commands_track_cursor() {
        let paths = parse_path_data("m10 10 l5 0 h5 v-10 z");
        let p = &paths[0];
        assert_eq!(p.v, vec![[10.0, 10.0], [15.0, 10.0], [20.0, 10.0], [20.0, 0.0]]);
        assert!(p.c);
    }

    #[test]
    fn test_implicit_lineto_after_moveto() {
        let paths = parse_path_data("M 0 0 10 10 20 0");
        assert_eq!(paths[0].v, vec![[0.0, 0.0], [10.0, 10.0], [20.0, 0.0]]);
    }

    #[test]
    fn test_each_moveto_starts_a_subpath() {
        let paths = parse_path_data("M0 0 L10 0 M20 20 L30 20 Z");
        assert_eq!(paths.len(), 2);
        assert!(!paths[0].c);
        assert!(paths[1].c);
        assert_eq!(paths[1].v[0], [20.0, 20.0]);
    }

    #[test]
    fn test_smooth_cubic_reflects_only_after_cubic() {
        let paths = parse_path_data("M0 0 C0 10 10 10 10 0 S20 -10 20 0");
        let p = &paths[0];
        // Reflection of (10,10) about (10,0) is (10,-10).
        assert_eq!(p.o[1], [0.0, -10.0]);

        let paths = parse_path_data("M0 0 L10 0 S20 -10 20 0");
        // After a line the first control point is the current point.
        assert_eq!(paths[0].o[1], [0.0, 0.0]);
    }

    #[test]
    fn test_quadratic_elevated_to_cubic() {
        let paths = parse_path_data("M0 0 Q30 30 60 0");
        let p = &paths[0];
        assert_relative_eq!(p.o[0][0], 20.0, epsilon = 1e-4);
        assert_relative_eq!(p.o[0][1], 20.0, epsilon = 1e-4);
        assert_relative_eq!(p.i[1][0], -20.0, epsilon = 1e-4);
        assert_relative_eq!(p.i[1][1], 20.0, epsilon = 1e-4);
    }

    #[test]
    fn test_smooth_quadratic_reflection() {
        let paths = parse_path_data("M0 0 Q10 10 20 0 T40 0");
        let p = &paths[0];
        // Reflected control point is (30,-10); out tangent is 2/3 of the way.
        assert_relative_eq!(p.o[1][0], 20.0 / 3.0, epsilon = 1e-4);
        assert_relative_eq!(p.o[1][1], -20.0 / 3.0, epsilon = 1e-4);
    }

    #[test]
    fn test_arc_degrades_to_line() {
        let paths = parse_path_data("M0 0 A5 5 0 0 1 10 0");
        assert_eq!(paths[0].v, vec![[0.0, 0.0], [10.0, 0.0]]);
        assert_eq!(paths[0].o[0], [0.0, 0.0]);
    }

    #[test]
    fn test_scientific_notation_and_packed_numbers() {
        let paths = parse_path_data("M1e1,-2.5E-1L.5.5");
        assert_eq!(paths[0].v, vec![[10.0, -0.25], [0.5, 0.5]]);
    }

    #[test]
    fn test_malformed_input_skips_and_continues() {
        let paths = parse_path_data("M0 0 L10 X 0 C1 2 Z M5 5 L6 6");
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].v, vec![[0.0, 0.0], [10.0, 0.0]]);
        assert_eq!(paths[1].v, vec![[5.0, 5.0], [6.0, 6.0]]);
    }
}
