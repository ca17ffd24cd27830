//! Wrapped presents that pile up under the tree

use crate::palette::{Colour, Palette};
use crate::vector::Point;
use crate::Timestamp;
use rand::Rng;

pub const PRESENT_SPAWN_INTERVAL_MS: Timestamp = 6000;
pub const PRESENT_SPAWN_CHANCE: f64 = 0.05;

// Geometry in normalized canvas coordinates
const MAX_START_X: f64 = 0.8;
const MIN_TOP: f64 = 0.8;
const TOP_SPREAD: f64 = 0.1;
const MIN_WIDTH: f64 = 0.1;
const WIDTH_SPREAD: f64 = 0.1;

/// A gift box resting on the bottom edge of the canvas.
///
/// Where it is drawn while rising is derived from `created_at` at render
/// time; nothing about the animation is stored here.
#[derive(Debug, Clone, PartialEq)]
pub struct Present {
    pub created_at: Timestamp,
    pub top_left: Point,
    pub bottom_right: Point,
    pub background: Colour,
    pub stripes: Colour,
}

impl Present {
    /// Random present created at `now`
    pub fn random<R: Rng + ?Sized>(now: Timestamp, palette: &Palette, rng: &mut R) -> Self {
        let start_x = rng.gen::<f64>() * MAX_START_X;
        let top_left = Point::new(start_x, MIN_TOP + TOP_SPREAD * rng.gen::<f64>());
        let bottom_right = Point::new(start_x + MIN_WIDTH + rng.gen::<f64>() * WIDTH_SPREAD, 1.0);
        let background = palette.pick(rng);
        let stripes = palette.pick_excluding(rng, background);
        Self {
            created_at: now,
            top_left,
            bottom_right,
            background,
            stripes,
        }
    }
}

/// Reference time for the spawn interval.
///
/// Before the first present this sits half an interval before the animation
/// started, so the first one can appear after three seconds.
pub fn last_present_at(presents: &[Present], animation_start: Timestamp) -> Timestamp {
    presents
        .last()
        .map_or(animation_start - PRESENT_SPAWN_INTERVAL_MS / 2, |p| p.created_at)
}

/// Roll for a new present; the interval gate is checked before the random trial.
pub fn maybe_spawn<R: Rng + ?Sized>(
    presents: &[Present],
    now: Timestamp,
    animation_start: Timestamp,
    palette: &Palette,
    rng: &mut R,
) -> Option<Present> {
    let due = now - last_present_at(presents, animation_start) > PRESENT_SPAWN_INTERVAL_MS;
    if due && rng.gen_bool(PRESENT_SPAWN_CHANCE) {
        let present = Present::random(now, palette, rng);
        log::debug!("present spawned at x={:.2}", present.top_left.x);
        Some(present)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn geometry_stays_in_bottom_band() {
        let mut rng = StdRng::seed_from_u64(9);
        let palette = Palette::default();
        for _ in 0..200 {
            let p = Present::random(0, &palette, &mut rng);
            assert!((0.0..0.8).contains(&p.top_left.x));
            assert!(p.top_left.y >= 0.8 && p.top_left.y < 0.9 + 1e-9);
            let width = p.bottom_right.x - p.top_left.x;
            assert!(width > 0.1 - 1e-9 && width < 0.2 + 1e-9);
            assert_eq!(p.bottom_right.y, 1.0);
            assert_ne!(p.background, p.stripes);
        }
    }

    #[test]
    fn first_present_waits_three_seconds() {
        let mut rng = StepRng::new(0, 0);
        let palette = Palette::default();
        assert!(maybe_spawn(&[], 3000, 0, &palette, &mut rng).is_none());
        let present = maybe_spawn(&[], 3001, 0, &palette, &mut rng).unwrap();
        assert_eq!(present.created_at, 3001);
    }

    #[test]
    fn later_presents_wait_six_seconds() {
        let mut rng = StepRng::new(0, 0);
        let palette = Palette::default();
        let first = Present::random(10_000, &palette, &mut rng);
        let presents = vec![first];
        assert!(maybe_spawn(&presents, 16_000, 0, &palette, &mut rng).is_none());
        assert!(maybe_spawn(&presents, 16_001, 0, &palette, &mut rng).is_some());
    }
}
