//! # Ember — Lightweight 2D Game Engine
//!
//! A small 2D engine built around an entity/component runtime and a batched
//! retained-mode renderer. Entities own their components, systems track the
//! entities they care about through registered entity lists, and everything
//! drawn in a frame flows through [`render2d::Graphics`] into as few GPU
//! draw calls as possible.
//!
//! Start with `use ember::prelude::*` and build a [`Scene`](scene::Scene).

pub mod ecs;
pub mod events;
pub mod math;
pub mod prelude;
pub mod render2d;
pub mod scene;
pub mod time;
