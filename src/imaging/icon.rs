//! Procedural icon renderer.
//!
//! The icon is a fixed composition of vector primitives laid out as
//! proportions of the edge length, so every size is the same drawing:
//!
//! | Layer | Primitive | Geometry (e = edge) | Fill |
//! |---|---|---|---|
//! | background | circle | inscribed in the canvas | [`BACKGROUND`] |
//! | accent | circle | radius `0.35 × 0.7 × e`, centered | [`ACCENT`] |
//! | mark | two diagonal lines ("X") | span `0.3 × e`, width `max(2, e / 16)` | white |
//! | decoration | two dots | diameter `2 × max(2, e / 20)` at `(0.7e, 0.2e)` and `(0.2e, 0.7e)` | white, alpha 180 |
//!
//! Layers are drawn in table order with alpha-over compositing; a pixel is
//! painted by a primitive when its center lies inside the shape.

use super::backend::{Dimensions, ImagingError};
use super::normalize::validate_target;
use image::{Pixel, Rgba, RgbaImage};

pub const BACKGROUND: Rgba<u8> = Rgba([102, 126, 234, 255]);
pub const ACCENT: Rgba<u8> = Rgba([118, 75, 162, 255]);
pub const MARK: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const DECORATION: Rgba<u8> = Rgba([255, 255, 255, 180]);

/// Canonical icon edge lengths for a store listing.
pub const ICON_SIZES: [u32; 4] = [16, 32, 48, 128];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Axis-aligned box in canvas coordinates, `(x0, y0)` inclusive to `(x1, y1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Bounds {
    fn around(center: Point, radius: f32) -> Self {
        Self {
            x0: center.x - radius,
            y0: center.y - radius,
            x1: center.x + radius,
            y1: center.y + radius,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    /// Filled ellipse inscribed in `bounds` (a circle when square).
    Ellipse { bounds: Bounds, fill: Rgba<u8> },
    /// Straight stroke with butt caps.
    Line {
        start: Point,
        end: Point,
        width: f32,
        fill: Rgba<u8>,
    },
}

impl Primitive {
    pub fn fill(&self) -> Rgba<u8> {
        match self {
            Primitive::Ellipse { fill, .. } | Primitive::Line { fill, .. } => *fill,
        }
    }

    /// Does the shape contain the point `(px, py)`?
    fn covers(&self, px: f32, py: f32) -> bool {
        match *self {
            Primitive::Ellipse { bounds, .. } => {
                let rx = (bounds.x1 - bounds.x0) / 2.0;
                let ry = (bounds.y1 - bounds.y0) / 2.0;
                if rx <= 0.0 || ry <= 0.0 {
                    return false;
                }
                let dx = (px - (bounds.x0 + rx)) / rx;
                let dy = (py - (bounds.y0 + ry)) / ry;
                dx * dx + dy * dy <= 1.0
            }
            Primitive::Line {
                start, end, width, ..
            } => {
                let (dx, dy) = (end.x - start.x, end.y - start.y);
                let len_sq = dx * dx + dy * dy;
                if len_sq == 0.0 {
                    return false;
                }
                let (vx, vy) = (px - start.x, py - start.y);
                let t = (vx * dx + vy * dy) / len_sq;
                if !(0.0..=1.0).contains(&t) {
                    return false;
                }
                let distance = (vx * dy - vy * dx).abs() / len_sq.sqrt();
                distance <= width / 2.0
            }
        }
    }

    /// Conservative pixel-space box containing every covered point.
    fn extent(&self) -> Bounds {
        match *self {
            Primitive::Ellipse { bounds, .. } => bounds,
            Primitive::Line {
                start, end, width, ..
            } => {
                let pad = width / 2.0;
                Bounds {
                    x0: start.x.min(end.x) - pad,
                    y0: start.y.min(end.y) - pad,
                    x1: start.x.max(end.x) + pad,
                    y1: start.y.max(end.y) + pad,
                }
            }
        }
    }

    /// The same primitive with all geometry multiplied by `factor`.
    pub fn scaled(&self, factor: f32) -> Self {
        let point = |p: Point| Point {
            x: p.x * factor,
            y: p.y * factor,
        };
        match *self {
            Primitive::Ellipse { bounds, fill } => Primitive::Ellipse {
                bounds: Bounds {
                    x0: bounds.x0 * factor,
                    y0: bounds.y0 * factor,
                    x1: bounds.x1 * factor,
                    y1: bounds.y1 * factor,
                },
                fill,
            },
            Primitive::Line {
                start,
                end,
                width,
                fill,
            } => Primitive::Line {
                start: point(start),
                end: point(end),
                width: width * factor,
                fill,
            },
        }
    }
}

/// Stroke width of the mark: `max(2, edge / 16)`.
pub fn stroke_width(edge: u32) -> u32 {
    (edge / 16).max(2)
}

/// Diameter of each decoration dot: `2 × max(2, edge / 20)`.
pub fn dot_diameter(edge: u32) -> u32 {
    2 * (edge / 20).max(2)
}

/// The icon's primitives for one edge length, in z-order.
#[derive(Debug, Clone, PartialEq)]
pub struct IconComposition {
    pub edge: u32,
    pub background: Primitive,
    pub accent: Primitive,
    pub mark: [Primitive; 2],
    pub decorations: [Primitive; 2],
}

impl IconComposition {
    pub fn new(edge: u32) -> Self {
        let e = edge as f32;
        let center = Point {
            x: e / 2.0,
            y: e / 2.0,
        };

        let half_span = 0.3 * e / 2.0;
        let width = stroke_width(edge) as f32;
        let stroke = |from: (f32, f32), to: (f32, f32)| Primitive::Line {
            start: Point {
                x: center.x + from.0 * half_span,
                y: center.y + from.1 * half_span,
            },
            end: Point {
                x: center.x + to.0 * half_span,
                y: center.y + to.1 * half_span,
            },
            width,
            fill: MARK,
        };

        let diameter = dot_diameter(edge) as f32;
        let dot = |fx: f32, fy: f32| Primitive::Ellipse {
            bounds: Bounds {
                x0: fx * e,
                y0: fy * e,
                x1: fx * e + diameter,
                y1: fy * e + diameter,
            },
            fill: DECORATION,
        };

        Self {
            edge,
            background: Primitive::Ellipse {
                bounds: Bounds {
                    x0: 0.0,
                    y0: 0.0,
                    x1: e,
                    y1: e,
                },
                fill: BACKGROUND,
            },
            accent: Primitive::Ellipse {
                bounds: Bounds::around(center, 0.35 * 0.7 * e),
                fill: ACCENT,
            },
            mark: [stroke((-1.0, -1.0), (1.0, 1.0)), stroke((1.0, -1.0), (-1.0, 1.0))],
            decorations: [dot(0.7, 0.2), dot(0.2, 0.7)],
        }
    }

    /// All primitives, background first.
    pub fn layers(&self) -> impl Iterator<Item = &Primitive> {
        std::iter::once(&self.background)
            .chain(std::iter::once(&self.accent))
            .chain(self.mark.iter())
            .chain(self.decorations.iter())
    }
}

/// Render the icon on a transparent `edge × edge` canvas.
pub fn render_icon(edge: u32) -> Result<RgbaImage, ImagingError> {
    validate_target(Dimensions::new(edge, edge))?;

    let mut canvas = RgbaImage::new(edge, edge);
    for primitive in IconComposition::new(edge).layers() {
        draw(&mut canvas, primitive);
    }
    Ok(canvas)
}

/// Paint every pixel whose center the primitive covers.
fn draw(canvas: &mut RgbaImage, primitive: &Primitive) {
    let extent = primitive.extent();
    let (width, height) = canvas.dimensions();
    let clamp = |v: f32, max: u32| (v.max(0.0) as u32).min(max);
    let (x0, x1) = (clamp(extent.x0.floor(), width), clamp(extent.x1.ceil(), width));
    let (y0, y1) = (clamp(extent.y0.floor(), height), clamp(extent.y1.ceil(), height));
    let fill = primitive.fill();

    for y in y0..y1 {
        for x in x0..x1 {
            if primitive.covers(x as f32 + 0.5, y as f32 + 0.5) {
                canvas.get_pixel_mut(x, y).blend(&fill);
            }
        }
    }
}
