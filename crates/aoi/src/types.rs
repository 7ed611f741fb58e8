use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr, VariantNames};

/// Integer pixel coordinate, `x` is the column and `y` the row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct PixelLocation {
    pub x: i32,
    pub y: i32,
}

impl PixelLocation {
    /// Location reported by an exhausted iterator.
    pub const END: PixelLocation = PixelLocation { x: -1, y: -1 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn translate(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

impl From<(i32, i32)> for PixelLocation {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Inclusive pixel rectangle `(x1, y1)`-`(x2, y2)`.
///
/// The default value `(0, 0, 0, 0)` is what the engine reports for an empty
/// selection. Corners are never swapped implicitly; a box with `x1 > x2` or
/// `y1 > y2` is treated as containing no pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct BoundingBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl BoundingBox {
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Box covering a single pixel
    pub const fn point(x: i32, y: i32) -> Self {
        Self::new(x, y, x, y)
    }

    /// Create a box with the corners put in order
    pub fn normalized(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self::new(x1.min(x2), y1.min(y2), x1.max(x2), y1.max(y2))
    }

    pub fn is_valid(&self) -> bool {
        self.x1 <= self.x2 && self.y1 <= self.y2
    }

    pub fn width(&self) -> u64 {
        if self.x1 > self.x2 {
            0
        } else {
            (i64::from(self.x2) - i64::from(self.x1) + 1) as u64
        }
    }

    pub fn height(&self) -> u64 {
        if self.y1 > self.y2 {
            0
        } else {
            (i64::from(self.y2) - i64::from(self.y1) + 1) as u64
        }
    }

    /// Number of pixels covered by the box
    pub fn area(&self) -> u64 {
        self.width() * self.height()
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x1 && x <= self.x2 && y >= self.y1 && y <= self.y2
    }

    pub fn contains_box(&self, other: &BoundingBox) -> bool {
        self.contains(other.x1, other.y1) && self.contains(other.x2, other.y2)
    }

    /// Smallest box covering both boxes
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox::new(
            self.x1.min(other.x1),
            self.y1.min(other.y1),
            self.x2.max(other.x2),
            self.y2.max(other.y2),
        )
    }

    /// Pixels common to both boxes, `None` if they do not overlap
    pub fn intersection(&self, other: &BoundingBox) -> Option<BoundingBox> {
        let result = BoundingBox::new(
            self.x1.max(other.x1),
            self.y1.max(other.y1),
            self.x2.min(other.x2),
            self.y2.min(other.y2),
        );
        result.is_valid().then_some(result)
    }

    /// Grow the box so that it includes `(x, y)`
    pub fn include(&mut self, x: i32, y: i32) {
        self.x1 = self.x1.min(x);
        self.y1 = self.y1.min(y);
        self.x2 = self.x2.max(x);
        self.y2 = self.y2.max(y);
    }

    /// Clamp every coordinate independently into `bounds`
    pub fn clamped_to(&self, bounds: &BoundingBox) -> BoundingBox {
        BoundingBox::new(
            self.x1.clamp(bounds.x1, bounds.x2),
            self.y1.clamp(bounds.y1, bounds.y2),
            self.x2.clamp(bounds.x1, bounds.x2),
            self.y2.clamp(bounds.y1, bounds.y2),
        )
    }
}

/// How a drawing operation changes the pixels it covers.
#[derive(
    Debug, Clone, Copy, Default,
    PartialEq, Eq, Hash,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, VariantNames, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ModeType {
    /// Select the covered pixels
    #[default]
    Draw,
    /// Deselect the covered pixels
    Erase,
    /// Flip the covered pixels
    Toggle,
}

impl ModeType {
    /// Mode with the same visible effect on an inverted selection.
    pub fn inverted(self) -> Self {
        match self {
            Self::Draw => Self::Erase,
            Self::Erase => Self::Draw,
            Self::Toggle => Self::Toggle,
        }
    }
}

/// Row/column extent of a raster scene.
///
/// This is the only thing [`crate::BitMaskIterator`] needs from a raster.
pub trait RasterExtent {
    fn row_count(&self) -> u32;
    fn column_count(&self) -> u32;

    /// The full raster as a pixel box, `None` for a raster with no pixels
    fn extent(&self) -> Option<BoundingBox> {
        let rows = self.row_count();
        let columns = self.column_count();
        if rows == 0 || columns == 0 {
            return None;
        }
        let x2 = i32::try_from(columns - 1).unwrap_or(i32::MAX);
        let y2 = i32::try_from(rows - 1).unwrap_or(i32::MAX);
        Some(BoundingBox::new(0, 0, x2, y2))
    }
}

/// Plain raster dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RasterDescriptor {
    pub rows: u32,
    pub columns: u32,
}

impl RasterDescriptor {
    pub fn new(rows: u32, columns: u32) -> Self {
        Self { rows, columns }
    }

    /// Total number of pixels in the raster
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.rows) * u64::from(self.columns)
    }
}

impl RasterExtent for RasterDescriptor {
    fn row_count(&self) -> u32 {
        self.rows
    }

    fn column_count(&self) -> u32 {
        self.columns
    }
}

impl<P, Container> RasterExtent for image::ImageBuffer<P, Container>
where
    P: image::Pixel,
    Container: std::ops::Deref<Target = [P::Subpixel]>,
{
    fn row_count(&self) -> u32 {
        self.height()
    }

    fn column_count(&self) -> u32 {
        self.width()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_intersection_and_union() {
        let a = BoundingBox::new(0, 0, 10, 10);
        let b = BoundingBox::new(5, 8, 20, 30);
        assert_eq!(a.intersection(&b), Some(BoundingBox::new(5, 8, 10, 10)));
        assert_eq!(a.union(&b), BoundingBox::new(0, 0, 20, 30));

        let far = BoundingBox::new(50, 50, 60, 60);
        assert_eq!(a.intersection(&far), None);
    }

    #[test]
    fn test_box_area_of_reversed_box_is_zero() {
        assert_eq!(BoundingBox::new(5, 5, 4, 9).area(), 0);
        assert_eq!(BoundingBox::new(20, 70, 69, 109).area(), 2000);
    }

    #[test]
    fn test_raster_extent() {
        let raster = RasterDescriptor::new(181, 97);
        assert_eq!(raster.extent(), Some(BoundingBox::new(0, 0, 96, 180)));
        assert_eq!(RasterDescriptor::new(0, 10).extent(), None);
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(ModeType::Toggle.to_string(), "toggle");
        assert_eq!("erase".parse::<ModeType>().expect("Should parse"), ModeType::Erase);
        assert_eq!(ModeType::Draw.inverted(), ModeType::Erase);
    }
}
