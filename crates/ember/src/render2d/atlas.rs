//! # Sprite Atlases
//!
//! An atlas packs many sprites into one texture so consecutive sprite draws
//! stay in a single batch. The descriptor is the TexturePacker-style JSON
//! array format: each frame records where it sits on the sheet and, for
//! trimmed frames, where the surviving pixels sat inside the original image
//! so rendering can compensate.

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

use crate::math::{Rect, Vec2};
use crate::render2d::texture::Image;

/// A named region of the atlas texture.
#[derive(Debug, Clone)]
pub struct AtlasFrame {
    pub name: String,
    /// Pixel rectangle on the atlas texture.
    pub frame: Rect,
    /// Did the packer strip transparent edges from this frame?
    pub trimmed: bool,
    /// Where the trimmed pixels sat inside the original image.
    pub source_rect: Rect,
    /// Size of the original, untrimmed image.
    pub source_size: Vec2,
}

#[derive(Debug)]
pub enum AtlasError {
    Parse(String),
}

impl fmt::Display for AtlasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtlasError::Parse(msg) => write!(f, "failed to parse atlas data: {msg}"),
        }
    }
}

impl std::error::Error for AtlasError {}

/// A packed texture and its frame table.
pub struct Atlas {
    pub image: Image,
    frames: HashMap<String, AtlasFrame>,
}

impl Atlas {
    /// Parse a TexturePacker JSON descriptor for the given texture.
    pub fn new(image: Image, data: &str) -> Result<Self, AtlasError> {
        let parsed: AtlasData =
            serde_json::from_str(data).map_err(|err| AtlasError::Parse(err.to_string()))?;
        let mut frames = HashMap::new();
        for frame in parsed.frames {
            frames.insert(
                frame.filename.clone(),
                AtlasFrame {
                    name: frame.filename,
                    frame: Rect::new(frame.frame.x, frame.frame.y, frame.frame.w, frame.frame.h),
                    trimmed: frame.trimmed,
                    source_rect: Rect::new(
                        frame.sprite_source_size.x,
                        frame.sprite_source_size.y,
                        frame.sprite_source_size.w,
                        frame.sprite_source_size.h,
                    ),
                    source_size: Vec2::new(frame.source_size.w, frame.source_size.h),
                },
            );
        }

        Ok(Self { image, frames })
    }

    /// Look up a frame by name, logging a warning when it is missing.
    pub fn frame(&self, name: &str) -> Option<&AtlasFrame> {
        let frame = self.frames.get(name);
        if frame.is_none() {
            log::warn!("atlas frame '{name}' does not exist");
        }
        frame
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

#[derive(Deserialize)]
struct AtlasData {
    frames: Vec<AtlasFrameData>,
}

#[derive(Deserialize)]
struct AtlasFrameData {
    filename: String,
    frame: FrameRect,
    #[serde(default)]
    trimmed: bool,
    #[serde(rename = "spriteSourceSize")]
    sprite_source_size: FrameRect,
    #[serde(rename = "sourceSize")]
    source_size: FrameSize,
}

#[derive(Deserialize)]
struct FrameRect {
    #[serde(default)]
    x: f32,
    #[serde(default)]
    y: f32,
    w: f32,
    h: f32,
}

#[derive(Deserialize)]
struct FrameSize {
    w: f32,
    h: f32,
}
