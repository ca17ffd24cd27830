//! Software raster surface
//!
//! Samples every shape at pixel centres without anti-aliasing. That is
//! plenty for a terminal, where each pixel ends up as half a character cell.

use crate::palette::Colour;
use crate::surface::{polylines, BlendMode, Paint, Surface};
use crate::vector::Point;
use kurbo::BezPath;

/// RGB pixel buffer implementing [`Surface`]
#[derive(Debug, Clone)]
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<Colour>,
    blend: BlendMode,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Colour::BLACK; width * height],
            blend: BlendMode::SourceOver,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Colour> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Reset every pixel and the blend mode
    pub fn clear(&mut self, colour: Colour) {
        self.pixels.fill(colour.with_alpha(255));
        self.blend = BlendMode::SourceOver;
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels = vec![Colour::BLACK; width * height];
    }

    fn blend_pixel(&mut self, x: usize, y: usize, src: Colour) {
        let idx = y * self.width + x;
        let dst = self.pixels[idx];
        let alpha = src.a as f64 / 255.0;

        let channel = |s: u8, d: u8| {
            let s = match self.blend {
                BlendMode::SourceOver => s,
                BlendMode::Lighten => s.max(d),
            };
            (s as f64 * alpha + d as f64 * (1.0 - alpha)).round() as u8
        };

        self.pixels[idx] = Colour::rgb(channel(src.r, dst.r), channel(src.g, dst.g), channel(src.b, dst.b));
    }

    /// Pixel index range whose centres may fall inside `[min, max]`
    fn pixel_range(&self, min: Point, max: Point) -> Option<(usize, usize, usize, usize)> {
        let x0 = (min.x - 0.5).ceil().max(0.0);
        let y0 = (min.y - 0.5).ceil().max(0.0);
        let x1 = (max.x - 0.5).floor().min(self.width as f64 - 1.0);
        let y1 = (max.y - 0.5).floor().min(self.height as f64 - 1.0);
        if x1 < x0 || y1 < y0 || !x0.is_finite() || !y0.is_finite() {
            return None;
        }
        Some((x0 as usize, y0 as usize, x1 as usize, y1 as usize))
    }

    fn paint_where<F>(&mut self, min: Point, max: Point, paint: &Paint, inside: F)
    where
        F: Fn(Point) -> bool,
    {
        let Some((x0, y0, x1, y1)) = self.pixel_range(min, max) else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let centre = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                if inside(centre) {
                    let colour = paint.colour_at(centre);
                    self.blend_pixel(x, y, colour);
                }
            }
        }
    }
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

fn bounds(points: impl Iterator<Item = Point>) -> Option<(Point, Point)> {
    points.fold(None, |acc, p| match acc {
        None => Some((p, p)),
        Some((min, max)) => Some((min.min(p), max.max(p))),
    })
}

impl Surface for Canvas {
    fn size(&self) -> (f64, f64) {
        (self.width as f64, self.height as f64)
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, paint: &Paint) {
        let a = Point::new(x, y);
        let b = Point::new(x + width, y + height);
        let (min, max) = (a.min(b), a.max(b));
        self.paint_where(min, max, paint, |p| p.x >= min.x && p.x < max.x && p.y >= min.y && p.y < max.y);
    }

    fn fill_circle(&mut self, center: Point, radius: f64, paint: &Paint) {
        if radius <= 0.0 {
            return;
        }
        let reach = Point::splat(radius);
        let r2 = radius * radius;
        self.paint_where(center - reach, center + reach, paint, |p| p.distance_squared(center) <= r2);
    }

    fn stroke_path(&mut self, path: &BezPath, width: f64, paint: &Paint) {
        let half = width / 2.0;
        if half <= 0.0 {
            return;
        }

        let segments: Vec<(Point, Point)> = polylines(path)
            .iter()
            .flat_map(|sub| sub.windows(2).map(|w| (w[0], w[1])).collect::<Vec<_>>())
            .collect();
        let Some((min, max)) = bounds(segments.iter().flat_map(|&(a, b)| [a, b])) else {
            return;
        };

        let reach = Point::splat(half);
        self.paint_where(min - reach, max + reach, paint, |p| {
            segments.iter().any(|&(a, b)| distance_to_segment(p, a, b) <= half)
        });
    }

    fn fill_path(&mut self, path: &BezPath, paint: &Paint) {
        let subpaths = polylines(path);

        // Every subpath is closed for filling
        let mut edges: Vec<(Point, Point)> = Vec::new();
        for sub in &subpaths {
            for w in sub.windows(2) {
                edges.push((w[0], w[1]));
            }
            if let (Some(&first), Some(&last)) = (sub.first(), sub.last()) {
                if first != last {
                    edges.push((last, first));
                }
            }
        }

        let Some((min, max)) = bounds(edges.iter().flat_map(|&(a, b)| [a, b])) else {
            return;
        };
        let Some((x0, y0, x1, y1)) = self.pixel_range(min, max) else {
            return;
        };

        let mut crossings: Vec<(f64, i32)> = Vec::new();
        for y in y0..=y1 {
            let yc = y as f64 + 0.5;
            crossings.clear();
            for &(a, b) in &edges {
                if a.y == b.y {
                    continue;
                }
                let (lo, hi, winding) = if a.y < b.y { (a, b, 1) } else { (b, a, -1) };
                if yc >= lo.y && yc < hi.y {
                    let t = (yc - lo.y) / (hi.y - lo.y);
                    crossings.push((lo.x + (hi.x - lo.x) * t, winding));
                }
            }
            crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut winding = 0;
            for pair in crossings.windows(2) {
                winding += pair[0].1;
                if winding == 0 {
                    continue;
                }
                let (left, right) = (pair[0].0, pair[1].0);
                for x in x0..=x1 {
                    let xc = x as f64 + 0.5;
                    if xc >= left && xc < right {
                        let colour = paint.colour_at(Point::new(xc, yc));
                        self.blend_pixel(x, y, colour);
                    }
                }
            }
        }
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.blend = mode;
    }
}
