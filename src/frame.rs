//! Per-frame entry point
//!
//! A tick takes the previous state by value, advances the simulation and
//! draws the result. The returned state belongs to the host, which hands it
//! back on the next frame; nothing is kept here between calls.

use crate::error::Result;
use crate::growth::Tree;
use crate::palette::Palette;
use crate::present::{self, Present};
use crate::render::{self, RenderStyle};
use crate::surface::Surface;
use crate::Timestamp;
use rand::Rng;

/// Timing supplied by the host, all in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTime {
    pub now: Timestamp,
    pub animation_start: Timestamp,
    pub delta_ms: Timestamp,
}

impl FrameTime {
    pub fn delta_seconds(&self) -> f64 {
        self.delta_ms as f64 / 1000.0
    }
}

/// Everything that survives from one frame to the next
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationState {
    pub tree: Tree,
    pub presents: Vec<Present>,
}

impl AnimationState {
    pub fn new<R: Rng + ?Sized>(now: Timestamp, rng: &mut R) -> Self {
        Self {
            tree: Tree::seed(now, rng),
            presents: Vec::new(),
        }
    }
}

/// Rendering style plus the optional growth cap
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub style: RenderStyle,
    /// Stop sprouting once the growth counter reaches this value
    pub growth_limit: Option<f64>,
}

impl Scene {
    pub fn new(style: RenderStyle, growth_limit: Option<f64>) -> Self {
        Self { style, growth_limit }
    }

    /// Whether the tree and presents still change this frame
    pub fn is_growing(&self, tree: &Tree) -> bool {
        match self.growth_limit {
            Some(limit) => tree.is_growing() || tree.growth_percent < limit,
            None => true,
        }
    }

    /// Advance one frame and draw it. `None` starts a new tree.
    pub fn tick<S, R>(
        &self,
        surface: &mut S,
        previous: Option<AnimationState>,
        palette: &Palette,
        time: FrameTime,
        rng: &mut R,
    ) -> Result<AnimationState>
    where
        S: Surface + ?Sized,
        R: Rng + ?Sized,
    {
        let mut state = match previous {
            Some(state) => state,
            None => {
                log::debug!("seeding a new tree at t={}", time.now);
                AnimationState::new(time.now, rng)
            }
        };

        if self.is_growing(&state.tree) {
            state.tree = state.tree.advance(time.delta_seconds(), time.now, palette, rng)?;
            if let Some(present) =
                present::maybe_spawn(&state.presents, time.now, time.animation_start, palette, rng)
            {
                state.presents.push(present);
            }
        }

        render::clear(surface, &self.style);
        render::draw_presents(surface, &state.presents, time.now);
        render::draw_branches(surface, &state.tree, &self.style);
        render::draw_decorations(surface, &state.tree.decorations, time.now, &self.style);

        Ok(state)
    }
}

/// [`Scene::tick`] with the default style and no growth cap
pub fn tick<S, R>(
    surface: &mut S,
    previous: Option<AnimationState>,
    palette: &Palette,
    time: FrameTime,
    rng: &mut R,
) -> Result<AnimationState>
where
    S: Surface + ?Sized,
    R: Rng + ?Sized,
{
    Scene::default().tick(surface, previous, palette, time, rng)
}
