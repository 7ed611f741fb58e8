//! Read-only traversal of the selected pixels of a [`BitMask`].
//!
//! A [`BitMaskIterator`] walks a rectangular window in raster order (row by
//! row, left to right) and stops on every selected pixel. The window either
//! comes from explicit coordinates or from the extent of a raster. Without a
//! mask every pixel of the window counts as selected.
//!
//! The iterator borrows the mask, so the mask cannot change while a traversal
//! is in progress. There is no cancellation: callers walking very large
//! windows check their own abort condition between steps.
//!
//! ```
//! use aoi::{BitMask, BitMaskIterator, PixelLocation};
//!
//! let mask = BitMask::rectangle(2, 1, 3, 1);
//! let pixels: Vec<_> = BitMaskIterator::new(Some(&mask), 0, 0, 9, 9).collect();
//! assert_eq!(pixels, vec![PixelLocation::new(2, 1), PixelLocation::new(3, 1)]);
//! ```

use std::cell::Cell;
use std::iter::FusedIterator;

use crate::bitmask::BitMask;
use crate::bitmask::storage::{column_mask, word_columns};
use crate::types::{BoundingBox, PixelLocation, RasterExtent};

#[derive(Debug, Clone)]
pub struct BitMaskIterator<'a> {
    mask: Option<&'a BitMask>,
    /// Pixels the iterator may report, `None` for an empty window
    window: Option<BoundingBox>,
    /// Part of the window that can hold selected pixels
    bounds: Option<BoundingBox>,
    current: PixelLocation,
    first: PixelLocation,
    count: Cell<Option<u64>>,
}

impl<'a> BitMaskIterator<'a> {
    /// Iterate over the window `(x1, y1)`-`(x2, y2)`.
    ///
    /// Negative coordinates are clamped to zero. A window with reversed
    /// corners is empty.
    pub fn new(mask: Option<&'a BitMask>, x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        let window = BoundingBox::new(x1.max(0), y1.max(0), x2.max(0), y2.max(0));
        let window = window.is_valid().then_some(window);
        let bounds = window.and_then(|window| match mask {
            None => Some(window),
            Some(mask) if mask.is_outside_selected() => Some(window),
            Some(mask) if mask.count() == 0 => None,
            Some(mask) => window.intersection(&mask.minimal_bounding_box()),
        });
        Self::with_bounds(mask, window, bounds)
    }

    /// Iterate over the full extent of `raster`
    pub fn from_raster<R>(mask: Option<&'a BitMask>, raster: &R) -> Self
    where
        R: RasterExtent + ?Sized,
    {
        let window = raster.extent();
        let bounds = window.and_then(|extent| match mask {
            None => Some(extent),
            Some(mask) if mask.is_outside_selected() => Some(extent),
            Some(mask) if mask.count() == 0 => None,
            Some(mask) => Some(mask.minimal_bounding_box().clamped_to(&extent)),
        });
        Self::with_bounds(mask, window, bounds)
    }

    fn with_bounds(
        mask: Option<&'a BitMask>,
        window: Option<BoundingBox>,
        bounds: Option<BoundingBox>,
    ) -> Self {
        let mut iterator = Self {
            mask,
            window,
            bounds,
            current: PixelLocation::END,
            first: PixelLocation::END,
            count: Cell::new(None),
        };
        if let Some(bounds) = bounds {
            iterator.first = iterator.seek(bounds.x1, bounds.y1);
        }
        iterator.current = iterator.first;
        iterator
    }

    /// Whether `(x, y)` is selected, always `false` outside the window
    pub fn get_pixel(&self, x: i32, y: i32) -> bool {
        if !self.window.is_some_and(|window| window.contains(x, y)) {
            return false;
        }
        self.mask.is_none_or(|mask| mask.get_pixel(x, y))
    }

    /// Move back to the first selected pixel
    pub fn first_pixel(&mut self) {
        self.current = self.first;
    }

    /// Advance to the next selected pixel. Returns `false` once the traversal
    /// is exhausted, after which the location stays at [`PixelLocation::END`].
    pub fn next_pixel(&mut self) -> bool {
        let Some(bounds) = self.bounds else {
            return false;
        };
        if self.current == PixelLocation::END {
            return false;
        }
        self.current = if self.current.x < bounds.x2 {
            self.seek(self.current.x + 1, self.current.y)
        } else if self.current.y < bounds.y2 {
            self.seek(bounds.x1, self.current.y + 1)
        } else {
            PixelLocation::END
        };
        self.current != PixelLocation::END
    }

    /// Current location, [`PixelLocation::END`] once exhausted
    pub fn pixel_location(&self) -> PixelLocation {
        self.current
    }

    /// Box actually traversed: the window, narrowed to the selected pixels
    /// unless the mask selects everything outside its bounds.
    /// `(0, 0, 0, 0)` when nothing can be selected.
    pub fn bounding_box(&self) -> BoundingBox {
        self.bounds.unwrap_or_default()
    }

    /// The window given at construction, after clamping
    pub fn window(&self) -> Option<BoundingBox> {
        self.window
    }

    /// Top-left corner of the traversed box
    pub fn offset(&self) -> PixelLocation {
        let bounds = self.bounding_box();
        PixelLocation::new(bounds.x1, bounds.y1)
    }

    pub fn selected_rows(&self) -> u64 {
        self.bounds.map_or(0, |bounds| bounds.height())
    }

    pub fn selected_columns(&self) -> u64 {
        self.bounds.map_or(0, |bounds| bounds.width())
    }

    /// Whether every pixel of the window is selected, so callers can skip the
    /// per-pixel test.
    pub fn use_all_pixels(&self) -> bool {
        match self.mask {
            None => true,
            Some(mask) => mask.is_outside_selected() && mask.count() == mask.tracked_area(),
        }
    }

    /// Number of selected pixels in the window.
    ///
    /// Computed on first use and cached; the current position is unaffected.
    pub fn pixel_count(&self) -> u64 {
        if let Some(count) = self.count.get() {
            return count;
        }
        let count = self.bounds.map_or(0, |bounds| {
            let mut count = 0u64;
            for y in bounds.y1..=bounds.y2 {
                for word_x in word_columns(bounds.x1, bounds.x2) {
                    let word = self.word(word_x, y) & column_mask(word_x, bounds.x1, bounds.x2);
                    count += u64::from(word.count_ones());
                }
            }
            count
        });
        self.count.set(Some(count));
        count
    }

    /// Iterator positioned on the first selected pixel
    pub fn begin(&self) -> Self {
        let mut begin = self.clone();
        begin.current = self.first;
        begin
    }

    /// Exhausted iterator, for comparison against a running traversal
    pub fn end(&self) -> Self {
        let mut end = self.clone();
        end.current = PixelLocation::END;
        end
    }

    fn word(&self, word_x: i32, y: i32) -> u32 {
        self.mask.map_or(u32::MAX, |mask| mask.get_pixels(word_x, y))
    }

    /// First selected pixel at or after `(x, y)` in raster order within the bounds
    fn seek(&self, x: i32, y: i32) -> PixelLocation {
        let Some(bounds) = self.bounds else {
            return PixelLocation::END;
        };
        let mut start_x = x;
        for row in y..=bounds.y2 {
            for word_x in word_columns(start_x, bounds.x2) {
                let word = self.word(word_x, row) & column_mask(word_x, start_x, bounds.x2);
                if word != 0 {
                    return PixelLocation::new(word_x + word.trailing_zeros() as i32, row);
                }
            }
            start_x = bounds.x1;
        }
        PixelLocation::END
    }
}

/// Iterators are equal when they stand on the same pixel, whichever mask or
/// window they traverse.
impl PartialEq for BitMaskIterator<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.current == other.current
    }
}

/// Yields the current location and then advances, so a fresh iterator yields
/// its first pixel first.
impl Iterator for BitMaskIterator<'_> {
    type Item = PixelLocation;

    fn next(&mut self) -> Option<PixelLocation> {
        if self.current == PixelLocation::END {
            return None;
        }
        let location = self.current;
        self.next_pixel();
        Some(location)
    }
}

impl FusedIterator for BitMaskIterator<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RasterDescriptor;

    fn six_points() -> BitMask {
        let mut mask = BitMask::new();
        for (x, y) in [(10, 28), (51, 54), (71, 54), (90, 86), (15, 127), (87, 142)] {
            mask.set_pixel(x, y, true);
        }
        mask
    }

    #[test]
    fn test_raster_window_counts_rectangle() {
        let mask = BitMask::rectangle(20, 70, 69, 109);
        let raster = RasterDescriptor::new(181, 97);
        let iterator = BitMaskIterator::from_raster(Some(&mask), &raster);
        assert_eq!(iterator.pixel_count(), 2000);
        assert_eq!(iterator.bounding_box(), BoundingBox::new(20, 70, 69, 109));
        assert_eq!(iterator.selected_rows(), 40);
        assert_eq!(iterator.selected_columns(), 50);
        assert_eq!(iterator.offset(), PixelLocation::new(20, 70));
        assert_eq!(iterator.pixel_count(), 2000);
    }

    #[test]
    fn test_raster_window_of_image() {
        let mask = BitMask::rectangle(5, 5, 200, 6);
        let image = image::GrayImage::new(64, 8);
        let iterator = BitMaskIterator::from_raster(Some(&mask), &image);
        assert_eq!(iterator.bounding_box(), BoundingBox::new(5, 5, 63, 6));
        assert_eq!(iterator.pixel_count(), 59 * 2);
    }

    #[test]
    fn test_inverted_mask_uses_full_raster() {
        let mut mask = BitMask::rectangle(20, 70, 69, 109);
        mask.invert();
        let raster = RasterDescriptor::new(181, 97);
        let iterator = BitMaskIterator::from_raster(Some(&mask), &raster);
        assert_eq!(iterator.bounding_box(), BoundingBox::new(0, 0, 96, 180));
        assert_eq!(iterator.pixel_count(), 97 * 181 - 2000);
        assert!(!iterator.use_all_pixels());
    }

    #[test]
    fn test_empty_raster() {
        let mask = six_points();
        let raster = RasterDescriptor::new(0, 0);
        let mut iterator = BitMaskIterator::from_raster(Some(&mask), &raster);
        assert_eq!(iterator.pixel_count(), 0);
        assert_eq!(iterator.pixel_location(), PixelLocation::END);
        assert!(!iterator.next_pixel());
        assert!(!iterator.get_pixel(10, 28));
    }

    #[test]
    fn test_window_hides_pixels_outside_it() {
        let mask = six_points();
        let iterator = BitMaskIterator::new(Some(&mask), 0, 0, 60, 60);
        assert!(iterator.get_pixel(51, 54));
        assert!(mask.get_pixel(71, 54));
        assert!(!iterator.get_pixel(71, 54));
        assert!(!iterator.get_pixel(90, 86));

        let found: Vec<_> = iterator.collect();
        assert_eq!(found, vec![PixelLocation::new(10, 28), PixelLocation::new(51, 54)]);
    }

    #[test]
    fn test_traversal_in_raster_order() {
        let mask = six_points();
        let mut iterator = BitMaskIterator::new(Some(&mask), 0, 0, 200, 200);
        let mut found = Vec::new();
        iterator.first_pixel();
        while iterator.pixel_location() != PixelLocation::END {
            found.push(iterator.pixel_location());
            iterator.next_pixel();
        }
        assert_eq!(
            found,
            vec![
                PixelLocation::new(10, 28),
                PixelLocation::new(51, 54),
                PixelLocation::new(71, 54),
                PixelLocation::new(90, 86),
                PixelLocation::new(15, 127),
                PixelLocation::new(87, 142),
            ]
        );
        assert_eq!(iterator.pixel_count(), 6);
        assert_eq!(iterator.bounding_box(), BoundingBox::new(10, 28, 90, 142));
    }

    #[test]
    fn test_count_keeps_position() {
        let mask = six_points();
        let mut iterator = BitMaskIterator::new(Some(&mask), 0, 0, 200, 200);
        iterator.next_pixel();
        iterator.next_pixel();
        let position = iterator.pixel_location();
        assert_eq!(iterator.pixel_count(), 6);
        assert_eq!(iterator.pixel_location(), position);
        assert_eq!(iterator.next(), Some(PixelLocation::new(71, 54)));
    }

    #[test]
    fn test_without_mask_selects_window() {
        let mut iterator = BitMaskIterator::new(None, 3, 4, 5, 5);
        assert!(iterator.get_pixel(3, 4));
        assert!(!iterator.get_pixel(6, 4));
        assert_eq!(iterator.pixel_count(), 6);
        assert!(iterator.use_all_pixels());
        assert_eq!(iterator.pixel_location(), PixelLocation::new(3, 4));
        assert_eq!(iterator.by_ref().last(), Some(PixelLocation::new(5, 5)));
        assert_eq!(iterator.pixel_location(), PixelLocation::END);
    }

    #[test]
    fn test_reversed_window_is_empty() {
        let mask = six_points();
        let iterator = BitMaskIterator::new(Some(&mask), 50, 50, 10, 10);
        assert_eq!(iterator.pixel_count(), 0);
        assert_eq!(iterator.window(), None);
        assert_eq!(iterator.begin(), iterator.end());
    }

    #[test]
    fn test_negative_window_is_clamped() {
        let iterator = BitMaskIterator::new(None, -5, -5, 1, 1);
        assert_eq!(iterator.window(), Some(BoundingBox::new(0, 0, 1, 1)));
        assert_eq!(iterator.pixel_count(), 4);
    }

    #[test]
    fn test_empty_mask() {
        let mask = BitMask::new();
        let iterator = BitMaskIterator::new(Some(&mask), 0, 0, 100, 100);
        assert_eq!(iterator.pixel_count(), 0);
        assert_eq!(iterator.begin(), iterator.end());
        assert_eq!(iterator.bounding_box(), BoundingBox::default());
    }

    #[test]
    fn test_begin_and_end() {
        let mask = six_points();
        let mut iterator = BitMaskIterator::new(Some(&mask), 0, 0, 200, 200);
        let begin = iterator.begin();
        let end = iterator.end();
        assert_eq!(iterator, begin);

        let mut steps = 0;
        while iterator != end {
            iterator.next_pixel();
            steps += 1;
        }
        assert_eq!(steps, 6);
        assert_eq!(begin.pixel_location(), PixelLocation::new(10, 28));
    }

    #[test]
    fn test_equality_only_compares_location() {
        let a = BitMask::rectangle(4, 4, 4, 4);
        let b = BitMask::rectangle(4, 4, 9, 9);
        let first = BitMaskIterator::new(Some(&a), 0, 0, 10, 10);
        let second = BitMaskIterator::new(Some(&b), 0, 0, 50, 50);
        assert_eq!(first, second);
        assert_ne!(first.pixel_count(), second.pixel_count());
    }

    #[test]
    fn test_words_across_boundaries() {
        let mut mask = BitMask::new();
        for x in [31, 32, 63, 64, 95] {
            mask.set_pixel(x, 2, true);
        }
        let found: Vec<i32> = BitMaskIterator::new(Some(&mask), 0, 0, 127, 3)
            .map(|location| location.x)
            .collect();
        assert_eq!(found, vec![31, 32, 63, 64, 95]);
    }
}
