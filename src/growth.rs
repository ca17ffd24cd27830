//! Tree growth engine
//!
//! The tree alternates between two phases. While a generation of new
//! branches is growing they extend together under a shared growth fraction
//! and may pick up decorations at their tips. Once the generation is fully
//! grown it is committed, and the next call sprouts one or two new branches
//! from the committed ones.

use crate::decoration::{create_node, Decoration};
use crate::error::{Result, TreeError};
use crate::palette::Palette;
use crate::vector::{random_unit_vector, Point, UP};
use crate::Timestamp;
use glam::DVec2;
use rand::Rng;

/// Where the trunk starts, in normalized canvas coordinates
pub const ROOT: Point = DVec2::new(0.5, 1.0);

// Seed trunk length range
const SEED_MIN_LENGTH: f64 = 0.25;
const SEED_LENGTH_SPREAD: f64 = 0.25;

// Sprouted branch length range
const SPROUT_MIN_LENGTH: f64 = 0.1;
const SPROUT_LENGTH_SPREAD: f64 = 0.1;

/// Seconds a generation takes to grow from 0 to 1
const GENERATION_SECONDS: f64 = 2.0;
const GROWTH_COUNTER_STEP: f64 = 0.3;

pub const DECORATION_SPAWN_INTERVAL_MS: Timestamp = 1000;
pub const DECORATION_SPAWN_CHANCE: f64 = 0.05;

/// A straight segment of the tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Branch {
    pub start: Point,
    pub end: Point,
}

impl Branch {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn direction(&self) -> DVec2 {
        self.end - self.start
    }

    /// Point `t` of the way from start to end
    pub fn point_at(&self, t: f64) -> Point {
        self.start.lerp(self.end, t)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    /// Fully grown branches, oldest (thickest) first
    pub branches: Vec<Branch>,
    /// The generation currently growing, if any
    pub new_branches: Option<Vec<Branch>>,
    /// Cosmetic counter bumped on every sprout
    pub growth_percent: f64,
    /// Growth fraction shared by `new_branches`, in [0, 1]
    pub new_growth_percent: f64,
    pub decorations: Vec<Decoration>,
    pub created_at: Timestamp,
}

impl Tree {
    /// A fresh tree: one trunk growing straight up from [`ROOT`].
    pub fn seed<R: Rng + ?Sized>(now: Timestamp, rng: &mut R) -> Self {
        let length = SEED_MIN_LENGTH + rng.gen::<f64>() * SEED_LENGTH_SPREAD;
        Self {
            branches: Vec::new(),
            new_branches: Some(vec![Branch::new(ROOT, ROOT + UP * length)]),
            growth_percent: 0.0,
            new_growth_percent: 0.0,
            decorations: Vec::new(),
            created_at: now,
        }
    }

    pub fn is_growing(&self) -> bool {
        self.new_branches.is_some()
    }

    /// Creation time of the newest decoration, or of the tree itself
    pub fn last_decoration_at(&self) -> Timestamp {
        self.decorations.last().map_or(self.created_at, |d| d.created_at)
    }

    /// Advance the tree by one tick.
    pub fn advance<R: Rng + ?Sized>(
        self,
        dt_seconds: f64,
        now: Timestamp,
        palette: &Palette,
        rng: &mut R,
    ) -> Result<Self> {
        if self.is_growing() {
            self.grow_generation(dt_seconds, now, palette, rng)
        } else {
            self.sprout(rng)
        }
    }

    fn grow_generation<R: Rng + ?Sized>(
        mut self,
        dt_seconds: f64,
        now: Timestamp,
        palette: &Palette,
        rng: &mut R,
    ) -> Result<Self> {
        let Some(growing) = self.new_branches.take().filter(|g| !g.is_empty()) else {
            return Err(TreeError::NoGrowingBranches);
        };

        // The interval gate must short-circuit the random trial
        let spawn_decoration = now - self.last_decoration_at() > DECORATION_SPAWN_INTERVAL_MS
            && rng.gen_bool(DECORATION_SPAWN_CHANCE);

        if spawn_decoration {
            let branch = growing[rng.gen_range(0..growing.len())];
            let decoration = Decoration {
                position: branch.point_at(self.new_growth_percent),
                node: create_node(palette, rng),
                created_at: now,
            };
            log::debug!("decoration spawned at {:?}", decoration.position);
            self.decorations.push(decoration);
        }

        let grown = self.new_growth_percent + dt_seconds / GENERATION_SECONDS;
        if grown >= 1.0 {
            log::debug!(
                "generation of {} branch(es) committed, {} total",
                growing.len(),
                self.branches.len() + growing.len()
            );
            self.branches.extend(growing);
            self.new_growth_percent = 0.0;
        } else {
            self.new_growth_percent = grown;
            self.new_branches = Some(growing);
        }

        Ok(self)
    }

    fn sprout<R: Rng + ?Sized>(mut self, rng: &mut R) -> Result<Self> {
        if self.branches.is_empty() {
            return Err(TreeError::NoBranches);
        }

        self.growth_percent += GROWTH_COUNTER_STEP * rng.gen::<f64>();

        let count = 1 + (rng.gen::<f64>() * 2.0).floor() as usize;
        let mut sprouts = Vec::with_capacity(count);
        for _ in 0..count {
            let base = self.branches[rng.gen_range(0..self.branches.len())];
            let base_direction = base.direction();

            // 1 - r^2 clusters sprouts towards the far end of the base branch
            let r: f64 = rng.gen();
            let start = base.start + base_direction * (1.0 - r * r);

            let mut offset = random_unit_vector(rng)
                * (SPROUT_MIN_LENGTH + rng.gen::<f64>() * SPROUT_LENGTH_SPREAD);
            if offset.dot(base_direction) < 0.0 {
                offset = -offset;
            }

            sprouts.push(Branch::new(start, start + offset));
        }

        log::debug!("sprouted {} branch(es) from {} committed", sprouts.len(), self.branches.len());
        self.new_branches = Some(sprouts);
        Ok(self)
    }
}
