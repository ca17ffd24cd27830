//! Renderer: draws the current animation state onto a [`Surface`]
//!
//! Nothing here touches simulation state. Time only enters through `now`,
//! which drives decoration growth, light flicker and present rise.

use crate::decoration::{Decoration, DecorationNode, LightMode, StripeDirection};
use crate::growth::Tree;
use crate::palette::Colour;
use crate::present::Present;
use crate::surface::{arc, BlendMode, Gradient, Paint, Surface};
use crate::vector::{Point, DOWN};
use crate::Timestamp;
use kurbo::BezPath;
use std::f64::consts::PI;

/// Bark brown
pub const BRANCH_COLOUR: Colour = Colour::rgb(0xa1, 0x66, 0x2f);

// Decoration sizing
const DECORATION_GROW_MS: f64 = 1000.0;
const DECORATION_SIZE_DIVISOR: f64 = 120.0;
const MIN_DECORATION_SIZE: f64 = 1.0;
const DOT_SIZE_DIVISOR: f64 = 7.0;

const LIGHT_PERIOD_MS: Timestamp = 2000;
const LIGHT_RIM_ALPHA: u8 = 0x10;

// Present rise easing
const PRESENT_RISE_DIVISOR: f64 = 20.0;
const PRESENT_RISE_EXPONENT: f64 = 1.5;

/// Host-tunable drawing parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStyle {
    pub background: Colour,
    pub branch_colour: Colour,
    /// Multiplier on the decoration size cap
    pub decoration_scale: f64,
    /// Multiplier on branch stroke widths
    pub line_scale: f64,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            background: Colour::BLACK,
            branch_colour: BRANCH_COLOUR,
            decoration_scale: 1.0,
            line_scale: 1.0,
        }
    }
}

/// Stroke width for the branch at `index`; older branches are thicker.
pub fn branch_width(index: usize) -> f64 {
    (7.0 - 2.0 * ((index + 1) as f64).ln()).max(3.0)
}

/// Decoration radius in pixels, growing to its cap over the first second.
pub fn decoration_size(canvas: (f64, f64), age_ms: Timestamp, scale: f64) -> f64 {
    let (width, height) = canvas;
    let cap = (width + height) / DECORATION_SIZE_DIVISOR * scale;
    let grown = (age_ms.max(0) as f64).min(DECORATION_GROW_MS) / DECORATION_GROW_MS;
    (cap * grown).max(MIN_DECORATION_SIZE)
}

/// Light brightness in [0, 1] at time `now`
pub fn light_intensity(mode: LightMode, now: Timestamp) -> f64 {
    let half = (LIGHT_PERIOD_MS / 2) as f64;
    let triangle = ((now.rem_euclid(LIGHT_PERIOD_MS)) as f64 - half).abs() / half;
    match mode {
        LightMode::AlwaysOn => 1.0,
        LightMode::FadeInOut => triangle,
        LightMode::Blink => triangle.round(),
    }
}

/// How far below its resting place a present is drawn, in pixels.
///
/// Starts at the canvas height and eases to zero, where it stays.
pub fn present_rise_offset(canvas_height: f64, age_ms: Timestamp) -> f64 {
    let travelled = (age_ms.max(0) as f64 / PRESENT_RISE_DIVISOR).powf(PRESENT_RISE_EXPONENT);
    (canvas_height - travelled).max(0.0)
}

fn to_pixels(p: Point, canvas: (f64, f64)) -> Point {
    p * Point::new(canvas.0, canvas.1)
}

/// Paint the whole surface with the background colour
pub fn clear<S: Surface + ?Sized>(surface: &mut S, style: &RenderStyle) {
    let (width, height) = surface.size();
    surface.set_blend_mode(BlendMode::SourceOver);
    surface.fill_rect(0.0, 0.0, width, height, &Paint::Solid(style.background));
}

pub fn draw_presents<S: Surface + ?Sized>(surface: &mut S, presents: &[Present], now: Timestamp) {
    let canvas = surface.size();
    for present in presents {
        let offset = Point::new(0.0, present_rise_offset(canvas.1, now - present.created_at));
        let pos = to_pixels(present.top_left, canvas) + offset;
        let dim = to_pixels(present.bottom_right, canvas) + offset - pos;

        surface.fill_rect(pos.x, pos.y, dim.x, dim.y, &Paint::Solid(present.background));

        let ribbon = Paint::Solid(present.stripes);
        surface.fill_rect(pos.x + dim.x * 0.4, pos.y, dim.x * 0.2, dim.y, &ribbon);
        surface.fill_rect(pos.x, pos.y + dim.y * 0.4, dim.x, dim.y * 0.2, &ribbon);

        surface.fill_path(&ribbon_loop(pos, dim.x, 0.42, 0.38), &ribbon);
        surface.fill_path(&ribbon_loop(pos, dim.x, 0.58, 0.62), &ribbon);
    }
}

/// A bow loop sitting on the top edge: two touching circles of opposite
/// winding, so their overlap stays unfilled.
fn ribbon_loop(top_left: Point, width: f64, outer: f64, inner: f64) -> BezPath {
    let radius = width * 0.09;
    let outer_x = top_left.x + width * outer;
    let inner_x = top_left.x + width * inner;

    let mut path = BezPath::new();
    path.move_to((outer_x, top_left.y));
    arc(&mut path, Point::new(outer_x, top_left.y - radius), radius, PI / 2.0, -PI * 3.0 / 2.0, false);
    path.line_to((inner_x, top_left.y));
    arc(&mut path, Point::new(inner_x, top_left.y - radius), radius, -PI * 3.0 / 2.0, PI / 2.0, true);
    path
}

/// Committed branches at full length, then the growing generation cut off
/// at the current growth fraction.
pub fn draw_branches<S: Surface + ?Sized>(surface: &mut S, tree: &Tree, style: &RenderStyle) {
    let canvas = surface.size();
    let paint = Paint::Solid(style.branch_colour);

    for (i, branch) in tree.branches.iter().enumerate() {
        surface.stroke_line(
            to_pixels(branch.start, canvas),
            to_pixels(branch.end, canvas),
            branch_width(i) * style.line_scale,
            &paint,
        );
    }

    let Some(growing) = &tree.new_branches else {
        return;
    };
    for (i, branch) in growing.iter().enumerate() {
        let tip = branch.point_at(tree.new_growth_percent);
        surface.stroke_line(
            to_pixels(branch.start, canvas),
            to_pixels(tip, canvas),
            branch_width(tree.branches.len() + i) * style.line_scale,
            &paint,
        );
    }
}

pub fn draw_decorations<S: Surface + ?Sized>(
    surface: &mut S,
    decorations: &[Decoration],
    now: Timestamp,
    style: &RenderStyle,
) {
    let canvas = surface.size();
    for decoration in decorations {
        let size = decoration_size(canvas, now - decoration.created_at, style.decoration_scale);
        // Hang below the attachment point
        let centre = to_pixels(decoration.position, canvas) + DOWN * size;

        match &decoration.node {
            DecorationNode::StripesBauble { direction, stripe_colours } => {
                draw_stripes(surface, centre, size, *direction, stripe_colours);
            }
            DecorationNode::DotsBauble { background, dot_colour, dot_positions } => {
                surface.fill_circle(centre, size, &Paint::Solid(*background));
                let dot_size = size / DOT_SIZE_DIVISOR;
                let dot_paint = Paint::Solid(*dot_colour);
                for relative in dot_positions {
                    surface.fill_circle(*relative * (size - dot_size) + centre, dot_size, &dot_paint);
                }
            }
            DecorationNode::Light { colour, mode } => {
                let radius = light_intensity(*mode, now) * size;
                let glow = Paint::Radial {
                    center: centre,
                    radius,
                    gradient: Gradient::new()
                        .with_stop(0.0, *colour)
                        .with_stop(1.0, colour.with_alpha(LIGHT_RIM_ALPHA)),
                };
                surface.set_blend_mode(BlendMode::Lighten);
                surface.fill_circle(centre, radius, &glow);
                surface.set_blend_mode(BlendMode::SourceOver);
            }
        }
    }
}

fn draw_stripes<S: Surface + ?Sized>(
    surface: &mut S,
    centre: Point,
    size: f64,
    direction: StripeDirection,
    colours: &[Colour],
) {
    let axis = match direction {
        StripeDirection::Horizontal => Point::new(size, 0.0),
        StripeDirection::Vertical => Point::new(0.0, size),
    };

    let mut gradient = Gradient::new();
    let count = colours.len() as f64;
    for (i, colour) in colours.iter().enumerate() {
        let offset = i as f64 / count;
        if i > 0 {
            gradient.add_stop(offset, colours[i - 1]);
        }
        gradient.add_stop(offset, *colour);
    }

    let paint = Paint::Linear {
        from: centre - axis,
        to: centre + axis,
        gradient,
    };
    surface.fill_circle(centre, size, &paint);
}
