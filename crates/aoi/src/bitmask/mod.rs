//! Two-dimensional pixel selection over an unbounded grid.
//!
//! A [`BitMask`] stores the pixels it has been asked to track in a dense,
//! word-packed block and answers for every other pixel with its *outside*
//! value. A freshly created mask is empty (outside = `false`); inverting an
//! empty mask selects every pixel of the infinite grid.
//!
//! Internal invariants, relied on by every operation:
//!
//! - the allocated storage always covers the regular bounding box;
//! - every pixel outside the regular bounding box, allocated or not, reads
//!   as the outside value;
//! - the cached count is the number of selected pixels inside the regular
//!   bounding box.
//!
//! A mask holds its caches in `Cell`s, so it is deliberately not `Sync`.
//! Callers sharing a mask between threads must serialize access themselves.

mod algebra;
mod record;
mod region;
pub(crate) mod storage;

use std::cell::Cell;
use std::fmt;

pub use record::BitMaskRecord;
pub use region::RegionView;

use crate::types::{BoundingBox, ModeType};
use region::RegionBuffer;
use storage::{Storage, column_mask, fill_word, word_aligned, word_columns, word_start};

/// Cached result of a minimal bounding box scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Footprint {
    Empty,
    Box(BoundingBox),
}

impl Footprint {
    fn including(self, rect: &BoundingBox) -> Footprint {
        match self {
            Footprint::Empty => Footprint::Box(*rect),
            Footprint::Box(current) => Footprint::Box(current.union(rect)),
        }
    }
}

pub struct BitMask {
    storage: Option<Storage>,
    /// Regular bounding box. `None` only while nothing differs from the outside value.
    bounds: Option<BoundingBox>,
    count: u64,
    outside: bool,
    minimal: Cell<Option<Footprint>>,
    region: RegionBuffer,
}

impl BitMask {
    /// Create an empty mask
    pub fn new() -> Self {
        Self {
            storage: None,
            bounds: None,
            count: 0,
            outside: false,
            minimal: Cell::new(Some(Footprint::Empty)),
            region: RegionBuffer::default(),
        }
    }

    /// Create a mask with the inclusive rectangle selected
    pub fn rectangle(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        let mut mask = Self::new();
        mask.set_region(x1, y1, x2, y2, ModeType::Draw);
        mask
    }

    /// Create a mask from a row-major block of values covering `(x1, y1)`-`(x2, y2)`.
    ///
    /// Missing trailing values are treated as unselected.
    pub fn from_region(values: &[bool], x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        let mut mask = Self::new();
        let rect = BoundingBox::normalized(x1, y1, x2, y2);
        let width = rect.width() as usize;
        if width == 0 {
            return mask;
        }
        for (row_index, row) in values.chunks(width).take(rect.height() as usize).enumerate() {
            let y = rect.y1 + row_index as i32;
            for (column_index, &selected) in row.iter().enumerate() {
                if selected {
                    mask.set_pixel(rect.x1 + column_index as i32, y, true);
                }
            }
        }
        mask
    }

    /// Reset to the empty, non-inverted state and release the storage
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Whether pixels that were never explicitly set read as selected
    pub fn is_outside_selected(&self) -> bool {
        self.outside
    }

    /// Number of selected pixels inside the regular bounding box.
    ///
    /// For a mask with the outside selected this is only the finite part of
    /// an infinite selection; check [`BitMask::is_outside_selected`] first.
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0 && !self.outside
    }

    /// Regular bounding box: every pixel that ever differed from the outside
    /// value lies within it. `(0, 0, 0, 0)` for an untouched mask.
    pub fn bounding_box(&self) -> BoundingBox {
        self.bounds.unwrap_or_default()
    }

    /// Pixels covered by the regular bounding box, zero when nothing is tracked
    pub(crate) fn tracked_area(&self) -> u64 {
        self.bounds.map_or(0, |bounds| bounds.area())
    }

    /// Tightest box around the selected pixels inside the regular bounding box,
    /// `(0, 0, 0, 0)` when there are none.
    pub fn minimal_bounding_box(&self) -> BoundingBox {
        let footprint = match self.minimal.get() {
            Some(footprint) => footprint,
            None => {
                let footprint = self.scan_footprint();
                self.minimal.set(Some(footprint));
                footprint
            }
        };
        match footprint {
            Footprint::Empty => BoundingBox::default(),
            Footprint::Box(rect) => rect,
        }
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> bool {
        match (&self.bounds, &self.storage) {
            (Some(bounds), Some(storage)) if bounds.contains(x, y) => {
                storage.bit(x, y).unwrap_or(self.outside)
            }
            _ => self.outside,
        }
    }

    /// Set a single pixel. Negative coordinates are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, value: bool) {
        if x < 0 || y < 0 {
            return;
        }
        let inside = self.bounds.is_some_and(|bounds| bounds.contains(x, y));
        if !inside {
            if value == self.outside {
                return;
            }
            self.grow_to_include(BoundingBox::point(x, y));
        }

        let Some(storage) = self.storage.as_mut() else {
            return;
        };
        let Some(index) = storage.word_index(x, y) else {
            return;
        };
        let bit = 1u32 << ((x - storage.rect.x1) & 31);
        let word = &mut storage.words[index];
        if (*word & bit != 0) == value {
            return;
        }

        if value {
            *word |= bit;
            self.count += 1;
            self.note_selected(&BoundingBox::point(x, y));
        } else {
            *word &= !bit;
            self.count -= 1;
            self.note_deselected(&BoundingBox::point(x, y));
        }
    }

    /// The 32 pixels `[x, x + 31]` of row `y`, bit 0 holding column `x`.
    ///
    /// `x` is rounded down to a multiple of 32.
    pub fn get_pixels(&self, x: i32, y: i32) -> u32 {
        let fill = fill_word(self.outside);
        if self.bounds.is_none() {
            return fill;
        }
        self.storage
            .as_ref()
            .and_then(|storage| storage.word(word_start(x), y))
            .unwrap_or(fill)
    }

    /// Overwrite the 32 pixels `[x, x + 31]` of row `y`, bit 0 holding column `x`.
    ///
    /// `x` is rounded down to a multiple of 32. Writes at negative
    /// coordinates are ignored.
    pub fn set_pixels(&mut self, x: i32, y: i32, values: u32) {
        let word_x = word_start(x);
        if word_x < 0 || y < 0 {
            return;
        }

        let fill = fill_word(self.outside);
        let differing = values ^ fill;
        if differing != 0 {
            let first = word_x + differing.trailing_zeros() as i32;
            let last = word_x + 31 - differing.leading_zeros() as i32;
            self.grow_to_include(BoundingBox::new(first, y, last, y));
        }

        let Some(bounds) = self.bounds else {
            return;
        };
        if y < bounds.y1 || y > bounds.y2 {
            return;
        }
        let cover = column_mask(word_x, bounds.x1, bounds.x2);
        if cover == 0 {
            return;
        }
        let Some(storage) = self.storage.as_mut() else {
            return;
        };
        let Some(index) = storage.word_index(word_x, y) else {
            return;
        };

        let old = storage.words[index];
        let new = (values & cover) | (fill & !cover);
        if old == new {
            return;
        }
        storage.words[index] = new;
        self.count += u64::from((new & cover).count_ones());
        self.count -= u64::from((old & cover).count_ones());
        self.invalidate();
    }

    /// Apply `op` to every pixel of the rectangle. Corners may be given in any
    /// order; the part of the rectangle at negative coordinates is ignored.
    pub fn set_region(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, op: ModeType) {
        let rect = BoundingBox::normalized(x1, y1, x2, y2);
        if rect.x2 < 0 || rect.y2 < 0 {
            return;
        }
        let rect = BoundingBox::new(rect.x1.max(0), rect.y1.max(0), rect.x2, rect.y2);

        // Drawing onto selected surroundings (or erasing unselected ones) only
        // changes pixels already inside the tracked box.
        let unchanged_outside = matches!(
            (op, self.outside),
            (ModeType::Draw, true) | (ModeType::Erase, false)
        );
        let target = if unchanged_outside {
            match self.bounds.and_then(|bounds| bounds.intersection(&rect)) {
                Some(target) => target,
                None => return,
            }
        } else {
            self.grow_to_include(rect);
            rect
        };

        let Some(storage) = self.storage.as_mut() else {
            return;
        };
        let mut added = 0u64;
        let mut removed = 0u64;
        for y in target.y1..=target.y2 {
            for word_x in word_columns(target.x1, target.x2) {
                let Some(index) = storage.word_index(word_x, y) else {
                    continue;
                };
                let cover = column_mask(word_x, target.x1, target.x2);
                let old = storage.words[index];
                let new = match op {
                    ModeType::Draw => old | cover,
                    ModeType::Erase => old & !cover,
                    ModeType::Toggle => old ^ cover,
                };
                storage.words[index] = new;
                added += u64::from((new & cover).count_ones());
                removed += u64::from((old & cover).count_ones());
            }
        }
        self.count += added;
        self.count -= removed;

        match op {
            ModeType::Draw => self.note_selected(&target),
            ModeType::Erase | ModeType::Toggle => self.invalidate(),
        }
    }

    /// Flip every pixel of the infinite grid, including the outside value
    pub fn invert(&mut self) {
        if let Some(storage) = self.storage.as_mut() {
            for word in &mut storage.words {
                *word = !*word;
            }
        }
        if let Some(bounds) = self.bounds {
            self.count = bounds.area() - self.count;
        }
        self.outside = !self.outside;
        self.invalidate();
    }

    /// Copy of the mask moved by `(dx, dy)`. Pixels pushed to negative
    /// coordinates are dropped.
    pub fn translated(&self, dx: i32, dy: i32) -> BitMask {
        let mut moved = BitMask::new();
        if self.outside {
            moved.invert();
        }
        let Some(bounds) = self.bounds else {
            return moved;
        };
        for y in bounds.y1..=bounds.y2 {
            for x in bounds.x1..=bounds.x2 {
                let value = self.get_pixel(x, y);
                if value != self.outside {
                    moved.set_pixel(x.saturating_add(dx), y.saturating_add(dy), value);
                }
            }
        }
        moved
    }

    /// Boolean view of a rectangle, owned by the mask and reused between calls.
    ///
    /// The view is rebuilt only when the rectangle or the mask changed since
    /// the previous call. A rectangle with reversed corners yields an empty view.
    pub fn region(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) -> RegionView<'_> {
        let rect = BoundingBox::new(x1, y1, x2, y2);
        let mut buffer = std::mem::take(&mut self.region);
        buffer.refresh(self, rect);
        self.region = buffer;
        self.region.view()
    }

    /// Extend the regular bounding box (and storage) so it covers `rect`.
    /// Newly covered pixels keep the outside value.
    fn grow_to_include(&mut self, rect: BoundingBox) {
        let grown = match self.bounds {
            Some(bounds) => bounds.union(&rect),
            None => rect,
        };
        if self.bounds == Some(grown) {
            return;
        }
        self.reserve(&grown);
        if self.outside {
            let previous = self.bounds.map_or(0, |bounds| bounds.area());
            self.count += grown.area() - previous;
            self.invalidate();
        }
        self.bounds = Some(grown);
    }

    /// Make sure the storage covers `needed`, growing with headroom so that
    /// repeated growth in one direction is amortized.
    fn reserve(&mut self, needed: &BoundingBox) {
        let target = match &self.storage {
            Some(storage) if storage.rect.contains_box(needed) => return,
            Some(storage) => {
                let current = storage.rect;
                let union = current.union(needed);
                let pad_x = (current.width() / 2) as i64;
                let pad_y = (current.height() / 2) as i64;
                let widen_low = |value: i32, old: i32, pad: i64| {
                    if value < old { (i64::from(value) - pad).max(0) as i32 } else { value }
                };
                let widen_high = |value: i32, old: i32, pad: i64| {
                    if value > old {
                        (i64::from(value) + pad).min(i64::from(i32::MAX)) as i32
                    } else {
                        value
                    }
                };
                BoundingBox::new(
                    widen_low(union.x1, current.x1, pad_x),
                    widen_low(union.y1, current.y1, pad_y),
                    widen_high(union.x2, current.x2, pad_x),
                    widen_high(union.y2, current.y2, pad_y),
                )
            }
            None => *needed,
        };
        let target = word_aligned(&target);

        let storage = match &self.storage {
            Some(storage) => storage.grown(target, self.outside),
            None => Storage::filled(target, self.outside),
        };
        tracing::trace!(
            x1 = target.x1, y1 = target.y1, x2 = target.x2, y2 = target.y2,
            words = storage.words.len(),
            "bit mask storage grown"
        );
        self.storage = Some(storage);
    }

    fn scan_footprint(&self) -> Footprint {
        let (Some(bounds), Some(storage)) = (&self.bounds, &self.storage) else {
            return Footprint::Empty;
        };
        if self.count == 0 {
            return Footprint::Empty;
        }
        let mut footprint = Footprint::Empty;
        for y in bounds.y1..=bounds.y2 {
            for word_x in word_columns(bounds.x1, bounds.x2) {
                let cover = column_mask(word_x, bounds.x1, bounds.x2);
                let word = storage.word(word_x, y).unwrap_or(0) & cover;
                if word == 0 {
                    continue;
                }
                let first = word_x + word.trailing_zeros() as i32;
                let last = word_x + 31 - word.leading_zeros() as i32;
                footprint = footprint.including(&BoundingBox::new(first, y, last, y));
            }
        }
        footprint
    }

    /// Pixels in `rect` became selected
    fn note_selected(&mut self, rect: &BoundingBox) {
        if let Some(footprint) = self.minimal.get() {
            self.minimal.set(Some(footprint.including(rect)));
        }
        self.region.mark_stale();
    }

    /// Pixels in `rect` became unselected
    fn note_deselected(&mut self, rect: &BoundingBox) {
        match self.minimal.get() {
            Some(Footprint::Box(current)) if current.intersection(rect).is_none() => {}
            _ => self.minimal.set(None),
        }
        self.region.mark_stale();
    }

    fn invalidate(&mut self) {
        self.minimal.set(None);
        self.region.mark_stale();
    }
}

impl Default for BitMask {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for BitMask {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            bounds: self.bounds,
            count: self.count,
            outside: self.outside,
            minimal: Cell::new(self.minimal.get()),
            region: RegionBuffer::default(),
        }
    }
}

impl PartialEq for BitMask {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other)
    }
}

impl Eq for BitMask {}

impl fmt::Debug for BitMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitMask")
            .field("bounds", &self.bounds)
            .field("count", &self.count)
            .field("outside", &self.outside)
            .field(
                "storage",
                &self.storage.as_ref().map(|storage| storage.rect),
            )
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn six_points() -> BitMask {
        let mut mask = BitMask::new();
        mask.set_pixel(10, 28, true);
        mask.set_pixel(51, 54, true);
        mask.set_pixel(71, 54, true);
        mask.set_pixel(90, 86, true);
        mask.set_pixel(15, 127, true);
        mask.set_pixel(87, 142, true);
        mask
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut mask = six_points();
        mask.invert();
        mask.clear();
        mask.clear();
        assert_eq!(mask.count(), 0);
        assert!(!mask.is_outside_selected());
        assert_eq!(mask.bounding_box(), BoundingBox::default());
        assert_eq!(mask.minimal_bounding_box(), BoundingBox::default());
    }

    #[test]
    fn test_set_and_get_pixel() {
        let mut mask = BitMask::new();
        for y in 0..40 {
            for x in (0..100).step_by(7) {
                let before = mask.count();
                let was_set = mask.get_pixel(x, y);
                mask.set_pixel(x, y, true);
                assert!(mask.get_pixel(x, y), "pixel ({x}, {y}) should be set");
                let expected = if was_set { before } else { before + 1 };
                assert_eq!(mask.count(), expected);
            }
        }
        mask.set_pixel(7, 3, true);
        assert_eq!(mask.count(), 40 * 15);
    }

    #[test]
    fn test_growth_preserves_previous_bits() {
        let mut mask = BitMask::new();
        mask.set_pixel(500, 500, true);
        mask.set_pixel(3, 2, true);
        mask.set_pixel(2000, 1, true);
        mask.set_pixel(1, 3000, true);
        assert!(mask.get_pixel(500, 500));
        assert!(mask.get_pixel(3, 2));
        assert!(mask.get_pixel(2000, 1));
        assert!(mask.get_pixel(1, 3000));
        assert!(!mask.get_pixel(4, 2));
        assert_eq!(mask.count(), 4);
    }

    #[test]
    fn test_negative_coordinates_are_ignored() {
        let mut mask = BitMask::new();
        mask.set_pixel(-1, 5, true);
        mask.set_pixel(5, -1, true);
        mask.set_pixels(-32, 0, u32::MAX);
        assert!(mask.is_empty());
        assert!(!mask.get_pixel(-1, 5));

        mask.invert();
        assert!(mask.get_pixel(-1, 5), "negative reads fall back to the outside value");
    }

    #[test]
    fn test_bounding_boxes_of_six_points() {
        let mask = six_points();
        assert_eq!(mask.count(), 6);
        assert_eq!(mask.bounding_box(), BoundingBox::new(10, 28, 90, 142));
        assert_eq!(mask.minimal_bounding_box(), BoundingBox::new(10, 28, 90, 142));
    }

    #[test]
    fn test_minimal_box_shrinks_after_clearing_pixels() {
        let mut mask = six_points();
        mask.set_pixel(10, 28, false);
        mask.set_pixel(87, 142, false);
        assert_eq!(mask.bounding_box(), BoundingBox::new(10, 28, 90, 142));
        assert_eq!(mask.minimal_bounding_box(), BoundingBox::new(15, 54, 90, 127));

        mask.set_pixel(200, 10, true);
        assert_eq!(mask.minimal_bounding_box(), BoundingBox::new(15, 10, 200, 127));
    }

    #[test]
    fn test_invert_of_rectangle() {
        let mut mask = BitMask::rectangle(20, 20, 29, 29);
        assert_eq!(mask.count(), 100);

        mask.invert();
        assert!(mask.is_outside_selected());
        assert_eq!(mask.count(), 0, "only the finite 10x10 part is counted");
        for y in 20..30 {
            for x in 20..30 {
                assert!(!mask.get_pixel(x, y));
            }
        }
        assert!(mask.get_pixel(5000, 5000));
        assert!(mask.get_pixel(19, 20));
    }

    #[test]
    fn test_invert_is_an_involution() {
        let original = six_points();
        let mut mask = original.clone();
        mask.invert();
        mask.invert();
        assert!(!mask.is_outside_selected());
        for y in 0..150 {
            for x in 0..100 {
                assert_eq!(mask.get_pixel(x, y), original.get_pixel(x, y));
            }
        }
        assert_eq!(mask.count(), 6);
    }

    #[test]
    fn test_invert_of_empty_mask_is_infinite() {
        let mut mask = BitMask::new();
        mask.invert();
        assert!(mask.is_outside_selected());
        assert!(mask.get_pixel(0, 0));
        assert!(mask.get_pixel(1_000_000, 1_000_000));
        assert_eq!(mask.count(), 0);

        mask.set_pixel(4, 4, false);
        assert!(!mask.get_pixel(4, 4));
        assert!(mask.get_pixel(4, 5));
    }

    #[test]
    fn test_set_region_modes() {
        let mut mask = BitMask::new();
        mask.set_region(5, 5, 70, 9, ModeType::Draw);
        assert_eq!(mask.count(), 66 * 5);
        assert_eq!(mask.bounding_box(), BoundingBox::new(5, 5, 70, 9));

        mask.set_region(10, 6, 40, 8, ModeType::Erase);
        assert_eq!(mask.count(), 66 * 5 - 31 * 3);
        assert!(!mask.get_pixel(10, 6));
        assert!(mask.get_pixel(9, 6));

        mask.set_region(0, 0, 9, 9, ModeType::Toggle);
        assert!(mask.get_pixel(0, 0));
        assert!(!mask.get_pixel(5, 5));
        assert_eq!(mask.count(), 66 * 5 - 31 * 3 + 75 - 25);
    }

    #[test]
    fn test_set_region_matches_pixel_loop() {
        let mut by_region = BitMask::new();
        let mut by_pixel = BitMask::new();
        let rects = [
            (3, 4, 40, 12, ModeType::Draw),
            (30, 0, 100, 6, ModeType::Toggle),
            (0, 10, 64, 10, ModeType::Erase),
            (70, 2, 33, 9, ModeType::Toggle),
        ];
        for (x1, y1, x2, y2, op) in rects {
            by_region.set_region(x1, y1, x2, y2, op);
            let rect = BoundingBox::normalized(x1, y1, x2, y2);
            for y in rect.y1..=rect.y2 {
                for x in rect.x1..=rect.x2 {
                    let value = match op {
                        ModeType::Draw => true,
                        ModeType::Erase => false,
                        ModeType::Toggle => !by_pixel.get_pixel(x, y),
                    };
                    by_pixel.set_pixel(x, y, value);
                }
            }
        }
        assert!(by_region.compare(&by_pixel));
        assert_eq!(by_region.count(), by_pixel.count());
        assert_eq!(by_region.minimal_bounding_box(), by_pixel.minimal_bounding_box());
    }

    #[test]
    fn test_set_region_on_inverted_mask() {
        let mut mask = BitMask::new();
        mask.invert();
        mask.set_region(10, 10, 19, 19, ModeType::Draw);
        assert_eq!(mask.bounding_box(), BoundingBox::default(), "drawing on selected surroundings is a no-op");

        mask.set_region(10, 10, 19, 19, ModeType::Erase);
        assert_eq!(mask.count(), 0);
        assert!(!mask.get_pixel(15, 15));
        assert!(mask.get_pixel(20, 15));

        mask.set_pixel(25, 25, false);
        assert_eq!(mask.bounding_box(), BoundingBox::new(10, 10, 25, 25));
        assert_eq!(mask.count(), 16 * 16 - 100 - 1);
    }

    #[test]
    fn test_pixels_word_access() {
        let mut mask = BitMask::new();
        mask.set_pixels(64, 3, 0b1011);
        assert_eq!(mask.count(), 3);
        assert!(mask.get_pixel(64, 3));
        assert!(mask.get_pixel(65, 3));
        assert!(!mask.get_pixel(66, 3));
        assert!(mask.get_pixel(67, 3));
        assert_eq!(mask.get_pixels(64, 3), 0b1011);
        assert_eq!(mask.get_pixels(70, 3), 0b1011, "column is rounded down to the word");
        assert_eq!(mask.bounding_box(), BoundingBox::new(64, 3, 67, 3));

        mask.set_pixels(64, 3, 0);
        assert_eq!(mask.count(), 0);
        assert_eq!(mask.minimal_bounding_box(), BoundingBox::default());
    }

    #[test]
    fn test_pixels_of_inverted_mask() {
        let mut mask = BitMask::new();
        mask.invert();
        assert_eq!(mask.get_pixels(0, 0), u32::MAX);
        mask.set_pixels(32, 1, !1u32);
        assert!(!mask.get_pixel(32, 1));
        assert!(mask.get_pixel(33, 1));
        assert_eq!(mask.bounding_box(), BoundingBox::new(32, 1, 32, 1));
        assert_eq!(mask.count(), 0);
    }

    #[test]
    fn test_from_region() {
        let values = [
            true, false, true, //
            false, true, false,
        ];
        let mask = BitMask::from_region(&values, 4, 7, 6, 8);
        assert_eq!(mask.count(), 3);
        assert!(mask.get_pixel(4, 7));
        assert!(mask.get_pixel(6, 7));
        assert!(mask.get_pixel(5, 8));
        assert!(!mask.get_pixel(5, 7));
    }

    #[test]
    fn test_region_view() {
        let mut mask = BitMask::rectangle(30, 2, 34, 3);
        let view = mask.region(28, 1, 35, 4);
        assert_eq!(view.width(), 8);
        assert_eq!(view.height(), 4);
        assert_eq!(view.get(30, 2), Some(true));
        assert_eq!(view.get(29, 2), Some(false));
        assert_eq!(view.get(40, 2), None);
        assert_eq!(
            view.row(1),
            Some(&[false, false, true, true, true, true, true, false][..])
        );
        let selected: usize = view.rows().map(|row| row.iter().filter(|&&v| v).count()).sum();
        assert_eq!(selected, 10);

        mask.set_pixel(35, 2, true);
        let view = mask.region(28, 1, 35, 4);
        assert_eq!(view.get(35, 2), Some(true), "view is rebuilt after a mutation");
    }
}
