//! 2D vector helpers on top of `glam`
//!
//! Simulation points live in normalized canvas space: `(0, 0)` is the top-left
//! corner and `(1, 1)` the bottom-right, so "up" is negative y.

use glam::DVec2;
use rand::Rng;
use std::f64::consts::TAU;

pub type Point = DVec2;

pub const UP: DVec2 = DVec2::new(0.0, -1.0);
pub const DOWN: DVec2 = DVec2::new(0.0, 1.0);

/// Uniformly distributed point on the unit circle.
///
/// Sampled by angle, so the result never has zero length.
pub fn random_unit_vector<R: Rng + ?Sized>(rng: &mut R) -> DVec2 {
    DVec2::from_angle(rng.gen_range(0.0..TAU))
}
