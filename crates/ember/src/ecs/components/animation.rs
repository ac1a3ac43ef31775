//! Frame animation for sprites.

use std::collections::HashMap;
use std::sync::Arc;

use crate::ecs::component::{Component, Updatable};
use crate::ecs::components::sprite::Sprite;
use crate::ecs::entity::Entity;
use crate::render2d::atlas::Atlas;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayMode {
    Loop,
    /// Play to the last frame and hold it.
    Once,
}

/// A named sequence of atlas frames shown at a fixed rate.
pub struct AnimationClip {
    pub name: String,
    pub atlas: Arc<Atlas>,
    pub frames: Vec<String>,
    /// Seconds per frame.
    pub frame_time: f32,
    pub mode: PlayMode,
}

impl AnimationClip {
    pub fn new(
        name: impl Into<String>,
        atlas: Arc<Atlas>,
        frames: Vec<String>,
        frame_time: f32,
        mode: PlayMode,
    ) -> Self {
        Self {
            name: name.into(),
            atlas,
            frames,
            frame_time,
            mode,
        }
    }

    /// The frame shown at `time` seconds into the clip.
    pub fn frame_at(&self, time: f32) -> Option<&str> {
        if self.frames.is_empty() || self.frame_time <= 0.0 {
            return None;
        }
        let index = (time / self.frame_time) as usize;
        let index = match self.mode {
            PlayMode::Loop => index % self.frames.len(),
            PlayMode::Once => index.min(self.frames.len() - 1),
        };
        Some(&self.frames[index])
    }

    pub fn finished(&self, time: f32) -> bool {
        self.mode == PlayMode::Once && time >= self.frame_time * self.frames.len() as f32
    }
}

/// Plays [`AnimationClip`]s by driving the entity's [`Sprite`] frame.
///
/// Requires a `Sprite` on the same entity; without one the animation still
/// advances but has nothing to show.
pub struct Animation {
    clips: HashMap<String, AnimationClip>,
    current: Option<String>,
    time: f32,
    playing: bool,
    pub active: bool,
}

impl Animation {
    pub fn new() -> Self {
        Self {
            clips: HashMap::new(),
            current: None,
            time: 0.0,
            playing: false,
            active: true,
        }
    }

    pub fn add_clip(&mut self, clip: AnimationClip) {
        self.clips.insert(clip.name.clone(), clip);
    }

    pub fn with_clip(mut self, clip: AnimationClip) -> Self {
        self.add_clip(clip);
        self
    }

    /// Start a clip from its first frame. Unknown names stop playback.
    pub fn play(&mut self, name: &str) {
        if self.clips.contains_key(name) {
            self.current = Some(name.to_string());
            self.time = 0.0;
            self.playing = true;
        } else {
            log::warn!("animation clip '{name}' does not exist");
            self.current = None;
            self.playing = false;
        }
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    pub fn resume(&mut self) {
        if self.current.is_some() {
            self.playing = true;
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn current_clip(&self) -> Option<&str> {
        self.current.as_deref()
    }
}

impl Default for Animation {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for Animation {
    fn active(&self) -> bool {
        self.active
    }

    fn updatable(&mut self) -> Option<&mut dyn Updatable> {
        Some(self)
    }
}

impl Updatable for Animation {
    fn update(&mut self, entity: &mut Entity, dt: f32) {
        if !self.playing {
            return;
        }
        let Some(name) = &self.current else { return };
        let Some(clip) = self.clips.get(name) else { return };

        self.time += dt;
        if clip.finished(self.time) {
            self.playing = false;
        }
        let Some(frame) = clip.frame_at(self.time) else {
            return;
        };
        if let Some(sprite) = entity.component_mut::<Sprite>() {
            sprite.set_atlas_frame(clip.atlas.clone(), frame);
        }
    }
}
