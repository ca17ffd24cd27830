//! Drawing surface abstraction
//!
//! The renderer only talks to [`Surface`]. Coordinates are pixels with the
//! origin at the top-left; angles are radians measured clockwise from +x
//! (y points down), matching an HTML canvas.

use crate::palette::Colour;
use crate::vector::Point;
use kurbo::{BezPath, PathEl, Vec2};
use std::f64::consts::TAU;

/// Compositing used for subsequent fills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    #[default]
    SourceOver,
    /// Per-channel maximum of source and destination
    Lighten,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColourStop {
    pub offset: f64,
    pub colour: Colour,
}

/// Ordered colour stops. Several stops may share an offset, which produces
/// a hard edge between the colours.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Gradient {
    stops: Vec<ColourStop>,
}

impl Gradient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_stop(&mut self, offset: f64, colour: Colour) {
        self.stops.push(ColourStop {
            offset: offset.clamp(0.0, 1.0),
            colour,
        });
    }

    pub fn with_stop(mut self, offset: f64, colour: Colour) -> Self {
        self.add_stop(offset, colour);
        self
    }

    pub fn stops(&self) -> &[ColourStop] {
        &self.stops
    }

    /// Colour at position `t`; transparent black when there are no stops
    pub fn colour_at(&self, t: f64) -> Colour {
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return Colour::BLACK.with_alpha(0);
        };

        let t = t.clamp(0.0, 1.0);
        if t < first.offset {
            return first.colour;
        }

        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t < b.offset {
                let span = b.offset - a.offset;
                if span <= 0.0 {
                    return b.colour;
                }
                return a.colour.lerp(b.colour, (t - a.offset) / span);
            }
        }
        last.colour
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Colour),
    Linear {
        from: Point,
        to: Point,
        gradient: Gradient,
    },
    /// Inner radius is zero
    Radial {
        center: Point,
        radius: f64,
        gradient: Gradient,
    },
}

impl Paint {
    /// Colour this paint produces at pixel position `p`
    pub fn colour_at(&self, p: Point) -> Colour {
        match self {
            Paint::Solid(colour) => *colour,
            Paint::Linear { from, to, gradient } => {
                let axis = *to - *from;
                let len2 = axis.length_squared();
                let t = if len2 > 0.0 { (p - *from).dot(axis) / len2 } else { 0.0 };
                gradient.colour_at(t)
            }
            Paint::Radial { center, radius, gradient } => {
                let t = if *radius > 0.0 { p.distance(*center) / radius } else { 1.0 };
                gradient.colour_at(t)
            }
        }
    }
}

/// Flattening tolerance in pixels
pub const FLATTEN_TOLERANCE: f64 = 0.1;

fn to_kurbo(p: Point) -> kurbo::Point {
    kurbo::Point::new(p.x, p.y)
}

fn from_kurbo(p: kurbo::Point) -> Point {
    Point::new(p.x, p.y)
}

/// Straight segment from `from` to `to`
pub fn line(from: Point, to: Point) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(to_kurbo(from));
    path.line_to(to_kurbo(to));
    path
}

/// Append a circular arc the way a canvas 2D context does: the current point
/// is joined to the arc start by a straight line, and a sweep against the
/// requested direction wraps round the long way.
pub fn arc(path: &mut BezPath, center: Point, radius: f64, start_angle: f64, end_angle: f64, anticlockwise: bool) {
    let start = to_kurbo(center + Point::from_angle(start_angle) * radius);
    let has_current_point = !matches!(path.elements().last(), None | Some(PathEl::ClosePath));
    if has_current_point {
        path.line_to(start);
    } else {
        path.move_to(start);
    }

    let sweep = adjust_end_angle(start_angle, end_angle, anticlockwise) - start_angle;
    let arc = kurbo::Arc {
        center: to_kurbo(center),
        radii: Vec2::new(radius, radius),
        start_angle,
        sweep_angle: sweep,
        x_rotation: 0.0,
    };
    path.extend(arc.append_iter(FLATTEN_TOLERANCE));
}

/// Flatten into polylines, one per subpath.
///
/// Closed subpaths repeat their first point at the end.
pub fn polylines(path: &BezPath) -> Vec<Vec<Point>> {
    let mut subpaths: Vec<Vec<Point>> = Vec::new();
    let mut current: Vec<Point> = Vec::new();

    kurbo::flatten(path, FLATTEN_TOLERANCE, |el| match el {
        PathEl::MoveTo(p) => {
            if current.len() > 1 {
                subpaths.push(std::mem::take(&mut current));
            }
            current.clear();
            current.push(from_kurbo(p));
        }
        PathEl::LineTo(p) => current.push(from_kurbo(p)),
        PathEl::ClosePath => {
            if let Some(&first) = current.first() {
                current.push(first);
                subpaths.push(std::mem::take(&mut current));
                current.push(first);
            }
        }
        // flatten only emits lines
        PathEl::QuadTo(..) | PathEl::CurveTo(..) => {}
    });

    if current.len() > 1 {
        subpaths.push(current);
    }
    subpaths
}

/// Resolve an arc's end angle the way browsers do
fn adjust_end_angle(start: f64, end: f64, anticlockwise: bool) -> f64 {
    if !anticlockwise && end - start >= TAU {
        start + TAU
    } else if anticlockwise && start - end >= TAU {
        start - TAU
    } else if !anticlockwise && start > end {
        start + reverse_sweep(start - end)
    } else if anticlockwise && start < end {
        start - reverse_sweep(end - start)
    } else {
        end
    }
}

/// Sweep in (0, TAU] that complements a positive angle; whole turns become
/// a full circle rather than a zero-length arc.
fn reverse_sweep(delta: f64) -> f64 {
    const EPSILON: f64 = 1e-9;
    let rem = delta % TAU;
    if rem < EPSILON || TAU - rem < EPSILON {
        TAU
    } else {
        TAU - rem
    }
}

/// Something the renderer can draw on
pub trait Surface {
    /// Width and height in pixels
    fn size(&self) -> (f64, f64);

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, paint: &Paint);

    fn fill_circle(&mut self, center: Point, radius: f64, paint: &Paint);

    /// Stroke with round joins and caps
    fn stroke_path(&mut self, path: &BezPath, width: f64, paint: &Paint);

    /// Fill using the nonzero winding rule; open subpaths are closed implicitly
    fn fill_path(&mut self, path: &BezPath, paint: &Paint);

    fn set_blend_mode(&mut self, mode: BlendMode);

    fn stroke_line(&mut self, from: Point, to: Point, width: f64, paint: &Paint) {
        self.stroke_path(&line(from, to), width, paint);
    }
}

/// One call made on a [`RecordingSurface`]
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        paint: Paint,
    },
    FillCircle {
        center: Point,
        radius: f64,
        paint: Paint,
    },
    StrokePath {
        path: BezPath,
        width: f64,
        paint: Paint,
    },
    FillPath {
        path: BezPath,
        paint: Paint,
    },
    SetBlendMode(BlendMode),
}

/// Surface that keeps a log of draw calls instead of producing pixels
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: f64,
    height: f64,
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, paint: &Paint) {
        self.commands.push(DrawCommand::FillRect {
            x,
            y,
            width,
            height,
            paint: paint.clone(),
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f64, paint: &Paint) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            paint: paint.clone(),
        });
    }

    fn stroke_path(&mut self, path: &BezPath, width: f64, paint: &Paint) {
        self.commands.push(DrawCommand::StrokePath {
            path: path.clone(),
            width,
            paint: paint.clone(),
        });
    }

    fn fill_path(&mut self, path: &BezPath, paint: &Paint) {
        self.commands.push(DrawCommand::FillPath {
            path: path.clone(),
            paint: paint.clone(),
        });
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.commands.push(DrawCommand::SetBlendMode(mode));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const RED: Colour = Colour::rgb(255, 0, 0);
    const WHITE: Colour = Colour::rgb(255, 255, 255);

    #[test]
    fn stacked_stops_make_hard_edges() {
        let gradient = Gradient::new()
            .with_stop(0.0, RED)
            .with_stop(0.5, RED)
            .with_stop(0.5, WHITE);
        assert_eq!(gradient.colour_at(0.25), RED);
        assert_eq!(gradient.colour_at(0.49), RED);
        assert_eq!(gradient.colour_at(0.5), WHITE);
        assert_eq!(gradient.colour_at(0.9), WHITE);
    }

    #[test]
    fn gradient_interpolates_between_stops() {
        let gradient = Gradient::new().with_stop(0.0, Colour::BLACK).with_stop(1.0, WHITE);
        assert_eq!(gradient.colour_at(0.5), Colour::rgb(128, 128, 128));
        assert_eq!(Gradient::new().colour_at(0.5).a, 0);
    }

    #[test]
    fn linear_paint_projects_onto_axis() {
        let paint = Paint::Linear {
            from: Point::new(0.0, 0.0),
            to: Point::new(10.0, 0.0),
            gradient: Gradient::new().with_stop(0.0, Colour::BLACK).with_stop(1.0, WHITE),
        };
        assert_eq!(paint.colour_at(Point::new(0.0, 7.0)), Colour::BLACK);
        assert_eq!(paint.colour_at(Point::new(20.0, -3.0)), WHITE);
    }

    #[test]
    fn reversed_clockwise_arc_is_a_full_circle() {
        let mut path = BezPath::new();
        arc(&mut path, Point::ZERO, 10.0, PI / 2.0, -3.0 * PI / 2.0, false);
        let points = &polylines(&path)[0];
        let first = points[0];
        let last = *points.last().unwrap();
        assert!((first - Point::new(0.0, 10.0)).length() < 1e-9);
        assert!((last - first).length() < 1e-6);
        // Passes through the top of the circle on the way round
        assert!(points.iter().any(|p| (p.y + 10.0).abs() < 0.5));
        assert!(points.iter().all(|p| (p.length() - 10.0).abs() < 0.2));
    }

    #[test]
    fn matching_direction_arc_is_short() {
        let mut path = BezPath::new();
        arc(&mut path, Point::ZERO, 10.0, 0.0, PI / 2.0, false);
        let points = &polylines(&path)[0];
        // Quarter turn clockwise on screen stays in the +x/+y quadrant
        assert!(points.iter().all(|p| p.x > -1e-6 && p.y > -1e-6));
        assert!((*points.last().unwrap() - Point::new(0.0, 10.0)).length() < 1e-6);
    }

    #[test]
    fn arc_is_joined_to_current_point() {
        let mut path = BezPath::new();
        path.move_to((-20.0, 0.0));
        arc(&mut path, Point::ZERO, 5.0, 0.0, PI / 2.0, false);
        let points = &polylines(&path)[0];
        assert_eq!(points[0], Point::new(-20.0, 0.0));
        assert!((points[1] - Point::new(5.0, 0.0)).length() < 1e-9);
    }

    #[test]
    fn arc_after_close_starts_a_new_subpath() {
        let mut path = line(Point::ZERO, Point::new(1.0, 0.0));
        path.line_to((1.0, 1.0));
        path.close_path();
        arc(&mut path, Point::new(5.0, 0.0), 1.0, 0.0, PI, false);

        let subpaths = polylines(&path);
        assert_eq!(subpaths.len(), 2);
        assert_eq!(subpaths[0].first(), subpaths[0].last());
        assert!((subpaths[1][0] - Point::new(6.0, 0.0)).length() < 1e-9);
    }

    #[test]
    fn recording_surface_logs_in_order() {
        let mut surface = RecordingSurface::new(100.0, 50.0);
        surface.set_blend_mode(BlendMode::Lighten);
        surface.stroke_line(Point::ZERO, Point::ONE, 2.0, &Paint::Solid(RED));
        assert_eq!(surface.size(), (100.0, 50.0));
        assert!(matches!(surface.commands[0], DrawCommand::SetBlendMode(BlendMode::Lighten)));
        assert!(matches!(surface.commands[1], DrawCommand::StrokePath { width, .. } if width == 2.0));
    }
}
