//! # Bitmap Fonts
//!
//! Text rendering uses pre-rasterized fonts in the AngelCode BMFont text
//! format: a texture page full of glyphs plus a `.fnt` descriptor listing
//! where each character lives, how far the pen advances after it, and kerning
//! adjustments for specific character pairs. Tools like BMFont or Hiero
//! produce both files.
//!
//! [`BitmapFont`] parses the descriptor; the actual drawing happens in the
//! image renderer, one quad per glyph.

use std::collections::HashMap;
use std::fmt;

use crate::render2d::texture::Image;

/// Placement data for a single glyph, in pixels.
#[derive(Debug, Clone, Copy)]
pub struct FontChar {
    pub id: u32,
    /// Top-left corner of the glyph on the font page.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Offset from the pen position to where the glyph quad starts.
    pub x_offset: f32,
    pub y_offset: f32,
    /// Horizontal pen movement after this glyph.
    pub x_advance: f32,
}

#[derive(Debug)]
pub enum FontError {
    Parse(String),
}

impl fmt::Display for FontError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontError::Parse(msg) => write!(f, "failed to parse font data: {msg}"),
        }
    }
}

impl std::error::Error for FontError {}

/// A glyph page texture and its parsed BMFont descriptor.
pub struct BitmapFont {
    image: Image,
    line_height: f32,
    chars: HashMap<u32, FontChar>,
    kernings: HashMap<(u32, u32), f32>,
}

impl BitmapFont {
    /// Parse a BMFont text descriptor for the given glyph page.
    pub fn new(image: Image, data: &str) -> Result<Self, FontError> {
        let mut line_height = None;
        let mut chars = HashMap::new();
        let mut kernings = HashMap::new();

        for line in data.lines() {
            let mut parts = line.split_whitespace();
            let Some(tag) = parts.next() else { continue };
            let fields: HashMap<&str, &str> =
                parts.filter_map(|part| part.split_once('=')).collect();
            match tag {
                "common" => {
                    line_height = Some(field(&fields, "lineHeight")?);
                }
                "char" => {
                    let glyph = FontChar {
                        id: field(&fields, "id")? as u32,
                        x: field(&fields, "x")?,
                        y: field(&fields, "y")?,
                        width: field(&fields, "width")?,
                        height: field(&fields, "height")?,
                        x_offset: field(&fields, "xoffset")?,
                        y_offset: field(&fields, "yoffset")?,
                        x_advance: field(&fields, "xadvance")?,
                    };
                    chars.insert(glyph.id, glyph);
                }
                "kerning" => {
                    let first = field(&fields, "first")? as u32;
                    let second = field(&fields, "second")? as u32;
                    kernings.insert((first, second), field(&fields, "amount")?);
                }
                _ => {}
            }
        }

        let line_height =
            line_height.ok_or_else(|| FontError::Parse("missing 'common' line".into()))?;
        Ok(Self {
            image,
            line_height,
            chars,
            kernings,
        })
    }

    pub fn image(&self) -> Image {
        self.image
    }

    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    pub fn char_data(&self, c: char) -> Option<&FontChar> {
        self.chars.get(&(c as u32))
    }

    /// Kerning adjustment for the pair, 0 when the font defines none.
    pub fn kerning(&self, first: char, second: char) -> f32 {
        self.kernings
            .get(&(first as u32, second as u32))
            .copied()
            .unwrap_or(0.0)
    }

    /// Pixel width of a line of text: every advance plus pair kernings.
    pub fn width(&self, text: &str) -> f32 {
        let mut width = 0.0;
        let mut previous: Option<char> = None;
        for c in text.chars() {
            let Some(glyph) = self.char_data(c) else { break };
            if let Some(prev) = previous {
                width += self.kerning(prev, c);
            }
            width += glyph.x_advance;
            previous = Some(c);
        }
        width
    }
}

fn field(fields: &HashMap<&str, &str>, key: &str) -> Result<f32, FontError> {
    fields
        .get(key)
        .ok_or_else(|| FontError::Parse(format!("missing field '{key}'")))?
        .parse()
        .map_err(|_| FontError::Parse(format!("invalid value for field '{key}'")))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::render2d::backend::TextureId;

    pub(crate) const TEST_FONT_DATA: &str = "\
info face=\"test\" size=32 bold=0 italic=0
common lineHeight=36 base=28 scaleW=128 scaleH=128 pages=1
page id=0 file=\"test_0.png\"
chars count=2
char id=65 x=0 y=0 width=10 height=12 xoffset=1 yoffset=2 xadvance=11 page=0 chnl=15
char id=66 x=10 y=0 width=9 height=12 xoffset=0 yoffset=2 xadvance=10 page=0 chnl=15
kernings count=1
kerning first=65 second=66 amount=-2
";

    fn font() -> BitmapFont {
        let image = Image {
            texture: TextureId(0),
            width: 128,
            height: 128,
        };
        BitmapFont::new(image, TEST_FONT_DATA).unwrap()
    }

    #[test]
    fn parses_common_chars_and_kernings() {
        let font = font();
        assert_eq!(font.line_height(), 36.0);

        let a = font.char_data('A').unwrap();
        assert_eq!(a.width, 10.0);
        assert_eq!(a.x_offset, 1.0);
        assert_eq!(a.x_advance, 11.0);

        assert_eq!(font.kerning('A', 'B'), -2.0);
        assert_eq!(font.kerning('B', 'A'), 0.0);
    }

    #[test]
    fn width_sums_advances_and_kerning() {
        let font = font();
        // 11 + 10 - 2.
        assert_eq!(font.width("AB"), 19.0);
        // Reverse pair has no kerning entry.
        assert_eq!(font.width("BA"), 21.0);
        assert_eq!(font.width(""), 0.0);
    }

    #[test]
    fn missing_common_line_is_an_error() {
        let image = Image {
            texture: TextureId(0),
            width: 128,
            height: 128,
        };
        assert!(BitmapFont::new(image, "char id=65 x=0 y=0").is_err());
    }
}
