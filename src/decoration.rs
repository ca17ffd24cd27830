//! Decoration factory: striped baubles, dotted baubles and lights

use crate::palette::{Colour, Palette};
use crate::vector::{random_unit_vector, Point};
use crate::Timestamp;
use rand::Rng;

// Dotted bauble generation constants
const MIN_DOTS: usize = 10;
const DOT_COUNT_SPREAD: f64 = 5.0;

const MIN_STRIPES: f64 = 3.0;
const STRIPE_COUNT_SPREAD: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripeDirection {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightMode {
    Blink,
    FadeInOut,
    AlwaysOn,
}

impl LightMode {
    pub const ALL: [LightMode; 3] = [Self::AlwaysOn, Self::Blink, Self::FadeInOut];
}

/// Visual payload of a decoration
#[derive(Debug, Clone, PartialEq)]
pub enum DecorationNode {
    /// Adjacent stripes never share a colour
    StripesBauble {
        direction: StripeDirection,
        stripe_colours: Vec<Colour>,
    },
    /// Dot positions lie in the unit disk, relative to the bauble centre
    DotsBauble {
        background: Colour,
        dot_colour: Colour,
        dot_positions: Vec<Point>,
    },
    Light {
        colour: Colour,
        mode: LightMode,
    },
}

/// An ornament fixed to the point on the tree where it was created
#[derive(Debug, Clone, PartialEq)]
pub struct Decoration {
    pub node: DecorationNode,
    pub position: Point,
    pub created_at: Timestamp,
}

#[derive(Clone, Copy)]
enum DecorationKind {
    Stripes,
    Dots,
    Light,
}

impl DecorationKind {
    const ALL: [DecorationKind; 3] = [Self::Stripes, Self::Dots, Self::Light];
}

/// Produce one randomized decoration payload from the palette.
pub fn create_node<R: Rng + ?Sized>(palette: &Palette, rng: &mut R) -> DecorationNode {
    let kind = DecorationKind::ALL[rng.gen_range(0..DecorationKind::ALL.len())];
    match kind {
        DecorationKind::Stripes => stripes_bauble(palette, rng),
        DecorationKind::Dots => dots_bauble(palette, rng),
        DecorationKind::Light => light(palette, rng),
    }
}

fn stripes_bauble<R: Rng + ?Sized>(palette: &Palette, rng: &mut R) -> DecorationNode {
    let direction = if rng.gen_bool(0.5) {
        StripeDirection::Horizontal
    } else {
        StripeDirection::Vertical
    };

    let count = (MIN_STRIPES + rng.gen::<f64>() * STRIPE_COUNT_SPREAD).floor() as usize;
    let mut stripe_colours: Vec<Colour> = Vec::with_capacity(count);
    for _ in 0..count {
        let colour = match stripe_colours.last() {
            Some(&previous) => palette.pick_excluding(rng, previous),
            None => palette.pick(rng),
        };
        stripe_colours.push(colour);
    }

    DecorationNode::StripesBauble { direction, stripe_colours }
}

fn dots_bauble<R: Rng + ?Sized>(palette: &Palette, rng: &mut R) -> DecorationNode {
    let background = palette.pick(rng);
    let dot_colour = palette.pick_excluding(rng, background);

    let count = MIN_DOTS + (rng.gen::<f64>() * DOT_COUNT_SPREAD).floor() as usize;
    let dot_positions = (0..count)
        .map(|_| {
            let r: f64 = rng.gen();
            random_unit_vector(rng) * (1.0 - r * r)
        })
        .collect();

    DecorationNode::DotsBauble { background, dot_colour, dot_positions }
}

fn light<R: Rng + ?Sized>(palette: &Palette, rng: &mut R) -> DecorationNode {
    let colour = palette.pick(rng);
    let mode = LightMode::ALL[rng.gen_range(0..LightMode::ALL.len())];
    DecorationNode::Light { colour, mode }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample(n: usize, palette: &Palette) -> Vec<DecorationNode> {
        let mut rng = StdRng::seed_from_u64(2024);
        (0..n).map(|_| create_node(palette, &mut rng)).collect()
    }

    #[test]
    fn stripes_have_three_to_five_distinct_neighbours() {
        let nodes = sample(500, &Palette::default());
        let mut seen = 0;
        for node in &nodes {
            if let DecorationNode::StripesBauble { stripe_colours, .. } = node {
                seen += 1;
                assert!((3..=5).contains(&stripe_colours.len()));
                for pair in stripe_colours.windows(2) {
                    assert_ne!(pair[0], pair[1]);
                }
            }
        }
        assert!(seen > 0, "expected at least one striped bauble");
    }

    #[test]
    fn dots_stay_in_unit_disk_and_contrast_background() {
        let nodes = sample(500, &Palette::default());
        let mut seen = 0;
        for node in &nodes {
            if let DecorationNode::DotsBauble { background, dot_colour, dot_positions } = node {
                seen += 1;
                assert_ne!(background, dot_colour);
                assert!((10..=14).contains(&dot_positions.len()));
                for p in dot_positions {
                    assert!(p.length() <= 1.0 + 1e-12);
                }
            }
        }
        assert!(seen > 0, "expected at least one dotted bauble");
    }

    #[test]
    fn all_variants_and_light_modes_appear() {
        let nodes = sample(600, &Palette::default());
        let lights: Vec<LightMode> = nodes
            .iter()
            .filter_map(|n| match n {
                DecorationNode::Light { mode, .. } => Some(*mode),
                _ => None,
            })
            .collect();
        assert!(nodes.iter().any(|n| matches!(n, DecorationNode::StripesBauble { .. })));
        assert!(nodes.iter().any(|n| matches!(n, DecorationNode::DotsBauble { .. })));
        assert!(lights.contains(&LightMode::AlwaysOn));
        assert!(lights.contains(&LightMode::Blink));
        assert!(lights.contains(&LightMode::FadeInOut));
    }

    #[test]
    fn single_colour_palette_degrades_instead_of_panicking() {
        let palette = Palette::from_hex(["ff0000"]).unwrap();
        for node in sample(100, &palette) {
            if let DecorationNode::DotsBauble { background, dot_colour, .. } = node {
                assert_eq!(background, dot_colour);
            }
        }
    }
}
