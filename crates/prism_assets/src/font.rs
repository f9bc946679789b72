use std::collections::HashMap;

use glam::Vec2;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FontParseError {
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("glyph {glyph:?}: bad outline token {token:?}")]
    Outline { glyph: char, token: String },
}

// Layout of a `*.typeface.json` file
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TypefaceFile {
    glyphs: HashMap<String, GlyphFile>,
    #[serde(default)]
    family_name: String,
    resolution: f32,
    bounding_box: BoundingBoxFile,
    #[serde(default)]
    underline_thickness: f32,
}

#[derive(Deserialize)]
struct GlyphFile {
    ha: f32,
    #[serde(default)]
    o: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BoundingBoxFile {
    y_min: f32,
    y_max: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(Vec2),
    LineTo(Vec2),
    QuadTo { control: Vec2, to: Vec2 },
    CubicTo { control1: Vec2, control2: Vec2, to: Vec2 },
}

#[derive(Clone, Debug)]
pub struct Glyph {
    /// Horizontal advance in font units
    pub advance: f32,
    pub outline: Vec<PathCommand>,
}

/// A parsed typeface, in font units (`resolution` units per em).
#[derive(Clone, Debug)]
pub struct Font {
    pub family_name: String,
    pub resolution: f32,
    pub line_height: f32,
    pub glyphs: HashMap<char, Glyph>,
}

impl Font {
    pub fn from_typeface_json(bytes: &[u8]) -> Result<Self, FontParseError> {
        let file: TypefaceFile = serde_json::from_slice(bytes)?;

        let mut glyphs = HashMap::with_capacity(file.glyphs.len());
        for (key, glyph) in file.glyphs {
            let Some(ch) = key.chars().next() else {
                continue;
            };
            let outline = match &glyph.o {
                Some(o) => parse_outline(ch, o)?,
                None => Vec::new(),
            };
            glyphs.insert(
                ch,
                Glyph {
                    advance: glyph.ha,
                    outline,
                },
            );
        }

        Ok(Self {
            family_name: file.family_name,
            resolution: file.resolution,
            line_height: file.bounding_box.y_max - file.bounding_box.y_min
                + file.underline_thickness,
            glyphs,
        })
    }

    /// Lays `text` out at `size` world units per em and flattens every
    /// glyph outline into closed polylines. Curves get `curve_segments`
    /// straight pieces each. Unknown characters fall back to `?` and are
    /// skipped if the font has no `?` either.
    pub fn layout(&self, text: &str, size: f32, curve_segments: u32) -> Vec<Vec<Vec2>> {
        let scale = size / self.resolution;
        let line_height = self.line_height * scale;
        let segments = curve_segments.max(1);

        let mut contours = Vec::new();
        let mut offset = Vec2::ZERO;

        for ch in text.chars() {
            if ch == '\n' {
                offset.x = 0.0;
                offset.y -= line_height;
                continue;
            }

            let Some(glyph) = self.glyphs.get(&ch).or_else(|| self.glyphs.get(&'?')) else {
                log::debug!("font {} has no glyph for {:?}", self.family_name, ch);
                continue;
            };

            let place = |p: Vec2| p * scale + offset;
            let mut current: Vec<Vec2> = Vec::new();

            for command in &glyph.outline {
                match *command {
                    PathCommand::MoveTo(p) => {
                        if current.len() > 1 {
                            contours.push(std::mem::take(&mut current));
                        }
                        current.clear();
                        current.push(place(p));
                    }
                    PathCommand::LineTo(p) => current.push(place(p)),
                    PathCommand::QuadTo { control, to } => {
                        let start = current.last().copied().unwrap_or(offset);
                        let (c, end) = (place(control), place(to));
                        for i in 1..=segments {
                            let t = i as f32 / segments as f32;
                            let u = 1.0 - t;
                            current.push(start * (u * u) + c * (2.0 * u * t) + end * (t * t));
                        }
                    }
                    PathCommand::CubicTo {
                        control1,
                        control2,
                        to,
                    } => {
                        let start = current.last().copied().unwrap_or(offset);
                        let (c1, c2, end) = (place(control1), place(control2), place(to));
                        for i in 1..=segments {
                            let t = i as f32 / segments as f32;
                            let u = 1.0 - t;
                            current.push(
                                start * (u * u * u)
                                    + c1 * (3.0 * u * u * t)
                                    + c2 * (3.0 * u * t * t)
                                    + end * (t * t * t),
                            );
                        }
                    }
                }
            }
            if current.len() > 1 {
                contours.push(current);
            }

            offset.x += glyph.advance * scale;
        }

        contours
    }
}

/// Outline strings are whitespace separated: `m x y`, `l x y`,
/// `q x y cx cy` and `b x y c1x c1y c2x c2y` (end point first).
fn parse_outline(glyph: char, outline: &str) -> Result<Vec<PathCommand>, FontParseError> {
    let mut tokens = outline.split_whitespace();
    let mut commands = Vec::new();

    let point = |tokens: &mut std::str::SplitWhitespace<'_>| -> Result<Vec2, FontParseError> {
        let mut coord = || {
            let token = tokens.next().unwrap_or_default();
            token.parse::<f32>().map_err(|_| FontParseError::Outline {
                glyph,
                token: token.to_owned(),
            })
        };
        let x = coord()?;
        let y = coord()?;
        Ok(Vec2::new(x, y))
    };

    while let Some(op) = tokens.next() {
        let command = match op {
            "m" => PathCommand::MoveTo(point(&mut tokens)?),
            "l" => PathCommand::LineTo(point(&mut tokens)?),
            "q" => {
                let to = point(&mut tokens)?;
                let control = point(&mut tokens)?;
                PathCommand::QuadTo { control, to }
            }
            "b" => {
                let to = point(&mut tokens)?;
                let control1 = point(&mut tokens)?;
                let control2 = point(&mut tokens)?;
                PathCommand::CubicTo {
                    control1,
                    control2,
                    to,
                }
            }
            // Some exporters close paths explicitly
            "z" => continue,
            other => {
                return Err(FontParseError::Outline {
                    glyph,
                    token: other.to_owned(),
                });
            }
        };
        commands.push(command);
    }

    Ok(commands)
}

#[cfg(test)]
mod tests {
    use super::*;

    // A square "I", a curved "?" used as fallback, and an empty space
    const TINY_TYPEFACE: &str = r#"{
        "familyName": "Tiny",
        "resolution": 100,
        "underlineThickness": 0,
        "boundingBox": { "xMin": 0, "xMax": 100, "yMin": 0, "yMax": 100 },
        "glyphs": {
            "I": { "ha": 120, "x_min": 0, "x_max": 100, "o": "m 0 0 l 100 0 l 100 100 l 0 100 l 0 0" },
            "?": { "ha": 100, "o": "m 0 0 q 100 0 50 50 l 0 0" },
            " ": { "ha": 50 }
        }
    }"#;

    #[test]
    fn parses_glyph_outlines() {
        let font = Font::from_typeface_json(TINY_TYPEFACE.as_bytes()).unwrap();
        assert_eq!(font.family_name, "Tiny");
        assert_eq!(font.line_height, 100.0);
        assert_eq!(font.glyphs[&'I'].outline.len(), 5);
        assert!(font.glyphs[&' '].outline.is_empty());
        assert_eq!(
            font.glyphs[&'?'].outline[1],
            PathCommand::QuadTo {
                control: Vec2::new(50.0, 50.0),
                to: Vec2::new(100.0, 0.0)
            }
        );
    }

    #[test]
    fn layout_advances_and_falls_back() {
        let font = Font::from_typeface_json(TINY_TYPEFACE.as_bytes()).unwrap();

        // size 1 → scale 0.01, "I" advances 1.2
        let contours = font.layout("I I", 1.0, 4);
        assert_eq!(contours.len(), 2);
        assert!((contours[1][0].x - 1.7).abs() < 1e-5);

        // 'x' is missing, falls back to '?': 1 move + 4 curve points + 1 line
        let contours = font.layout("x", 1.0, 4);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].len(), 6);
    }

    #[test]
    fn newline_moves_down_one_line() {
        let font = Font::from_typeface_json(TINY_TYPEFACE.as_bytes()).unwrap();
        let contours = font.layout("I\nI", 2.0, 1);
        assert!((contours[1][0] - Vec2::new(0.0, -2.0)).length() < 1e-5);
    }

    #[test]
    fn rejects_bad_outline() {
        let bad = r#"{ "resolution": 1, "boundingBox": {"yMin": 0, "yMax": 1}, "glyphs": { "A": { "ha": 1, "o": "m 0 zero" } } }"#;
        assert!(matches!(
            Font::from_typeface_json(bad.as_bytes()),
            Err(FontParseError::Outline { glyph: 'A', .. })
        ));
    }
}
