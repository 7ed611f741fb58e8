use geo_types::{Coord, LineString, Point, Polygon};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::bitmask::BitMask;
use crate::types::{BoundingBox, ModeType, PixelLocation};

/// Geometry of a graphic object in pixel coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GraphicShape {
    /// Filled rectangle, corners inclusive
    Rectangle { bounds: BoundingBox },
    /// Filled ellipse inscribed in `bounds`
    Ellipse { bounds: BoundingBox },
    /// Filled polygon, boundary pixels included
    Polygon { vertices: Vec<PixelLocation> },
    /// Individual pixels
    Points { points: Vec<PixelLocation> },
    /// Arbitrary pixel set
    Mask { mask: BitMask },
}

impl GraphicShape {
    pub fn rectangle(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self::Rectangle {
            bounds: BoundingBox::normalized(x1, y1, x2, y2),
        }
    }

    pub fn ellipse(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self::Ellipse {
            bounds: BoundingBox::normalized(x1, y1, x2, y2),
        }
    }

    pub fn polygon<I, P>(vertices: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PixelLocation>,
    {
        Self::Polygon {
            vertices: vertices.into_iter().map(Into::into).collect(),
        }
    }

    /// Box around the geometry, `None` for a shape without pixels
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        match self {
            Self::Rectangle { bounds } | Self::Ellipse { bounds } => Some(*bounds),
            Self::Polygon { vertices: points } | Self::Points { points } => {
                let (first, rest) = points.split_first()?;
                let mut bounds = BoundingBox::point(first.x, first.y);
                for point in rest {
                    bounds.include(point.x, point.y);
                }
                Some(bounds)
            }
            Self::Mask { mask } if mask.is_empty() => None,
            Self::Mask { mask } => Some(mask.bounding_box()),
        }
    }

    /// Same shape moved by `(dx, dy)`
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        let shift = |bounds: &BoundingBox| {
            BoundingBox::new(
                bounds.x1.saturating_add(dx),
                bounds.y1.saturating_add(dy),
                bounds.x2.saturating_add(dx),
                bounds.y2.saturating_add(dy),
            )
        };
        let shift_all = |points: &[PixelLocation]| {
            points.iter().map(|point| point.translate(dx, dy)).collect()
        };
        match self {
            Self::Rectangle { bounds } => Self::Rectangle { bounds: shift(bounds) },
            Self::Ellipse { bounds } => Self::Ellipse { bounds: shift(bounds) },
            Self::Polygon { vertices } => Self::Polygon { vertices: shift_all(vertices) },
            Self::Points { points } => Self::Points { points: shift_all(points) },
            Self::Mask { mask } => Self::Mask { mask: mask.translated(dx, dy) },
        }
    }

    /// Apply this shape to `mask` with the given drawing mode
    pub fn rasterize_into(&self, mask: &mut BitMask, mode: ModeType) {
        match self {
            Self::Rectangle { bounds } => {
                mask.set_region(bounds.x1, bounds.y1, bounds.x2, bounds.y2, mode);
            }
            Self::Ellipse { bounds } => {
                for (y, x1, x2) in ellipse_spans(bounds) {
                    mask.set_region(x1, y, x2, y, mode);
                }
            }
            Self::Polygon { vertices } => {
                for (x, y) in polygon_pixels(vertices) {
                    apply_pixel(mask, x, y, mode);
                }
            }
            Self::Points { points } => {
                for point in points {
                    apply_pixel(mask, point.x, point.y, mode);
                }
            }
            Self::Mask { mask: source } => match mode {
                ModeType::Draw => mask.merge(source),
                ModeType::Erase => mask.subtract(source),
                ModeType::Toggle => mask.toggle(source),
            },
        }
    }
}

fn apply_pixel(mask: &mut BitMask, x: i32, y: i32, mode: ModeType) {
    let value = match mode {
        ModeType::Draw => true,
        ModeType::Erase => false,
        ModeType::Toggle => !mask.get_pixel(x, y),
    };
    mask.set_pixel(x, y, value);
}

/// Horizontal runs `(y, x1, x2)` of the ellipse inscribed in `bounds`
fn ellipse_spans(bounds: &BoundingBox) -> impl Iterator<Item = (i32, i32, i32)> + '_ {
    let center_x = (f64::from(bounds.x1) + f64::from(bounds.x2)) / 2.0;
    let center_y = (f64::from(bounds.y1) + f64::from(bounds.y2)) / 2.0;
    let radius_x = bounds.width() as f64 / 2.0;
    let radius_y = bounds.height() as f64 / 2.0;

    (bounds.y1..=bounds.y2).filter_map(move |y| {
        let dy = (f64::from(y) - center_y) / radius_y;
        let extent = 1.0 - dy * dy;
        if extent < 0.0 {
            return None;
        }
        let half = radius_x * extent.sqrt();
        let x1 = (center_x - half + 0.5).ceil().max(f64::from(bounds.x1)) as i32;
        let x2 = (center_x + half - 0.5).floor().min(f64::from(bounds.x2)) as i32;
        (x1 <= x2).then_some((y, x1, x2))
    })
}

/// Pixels whose centers fall inside or on the boundary of the polygon
fn polygon_pixels(vertices: &[PixelLocation]) -> Vec<(i32, i32)> {
    use geo::{BoundingRect, Intersects};

    if vertices.is_empty() {
        return Vec::new();
    }
    let exterior: Vec<Coord<f64>> = vertices
        .iter()
        .map(|point| Coord {
            x: f64::from(point.x),
            y: f64::from(point.y),
        })
        .collect();
    let polygon = Polygon::new(LineString::new(exterior), vec![]);
    let Some(rect) = polygon.bounding_rect() else {
        return Vec::new();
    };

    let x1 = rect.min().x.floor().max(0.0) as i32;
    let y1 = rect.min().y.floor().max(0.0) as i32;
    let x2 = rect.max().x.ceil() as i32;
    let y2 = rect.max().y.ceil() as i32;

    let mut pixels = Vec::new();
    for y in y1..=y2 {
        for x in x1..=x2 {
            if polygon.intersects(&Point::new(f64::from(x), f64::from(y))) {
                pixels.push((x, y));
            }
        }
    }
    pixels
}
