//! # Image — Pixel Data on the GPU
//!
//! An [`Image`] is a lightweight handle plus size: the backend owns the actual
//! GPU texture, the `Image` is `Copy` and can live inside components without
//! lifetime headaches. [`load_texture`] decodes PNG/JPEG files with the
//! `image` crate and uploads the RGBA8 pixels through the active
//! [`DrawBackend`](crate::render2d::DrawBackend).

use std::fmt;
use std::path::Path;

use crate::render2d::backend::TextureId;
use crate::render2d::graphics::Graphics;

/// A texture handle with its pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Image {
    pub(crate) texture: TextureId,
    pub width: u32,
    pub height: u32,
}

/// Errors that can occur while loading a texture from disk.
#[derive(Debug)]
pub enum TextureError {
    /// The file could not be read or decoded.
    Load(String),
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureError::Load(msg) => write!(f, "failed to load texture: {msg}"),
        }
    }
}

impl std::error::Error for TextureError {}

/// Decode an image file and upload it to the backend.
pub fn load_texture(path: impl AsRef<Path>, graphics: &mut Graphics) -> Result<Image, TextureError> {
    let path = path.as_ref();
    let decoded = image::open(path)
        .map_err(|err| TextureError::Load(format!("{}: {err}", path.display())))?
        .to_rgba8();
    let (width, height) = decoded.dimensions();
    log::info!("loaded texture {} ({width}x{height})", path.display());

    Ok(graphics.create_texture(width, height, decoded.as_raw()))
}
