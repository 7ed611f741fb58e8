use super::BitMask;
use super::storage::{Storage, column_mask, fill_word, word_aligned, word_columns};
use crate::types::BoundingBox;

impl BitMask {
    /// Pixelwise OR with `rhs`
    pub fn merge(&mut self, rhs: &BitMask) {
        self.combine(rhs, "merge", |a, b| a | b);
    }

    /// Pixelwise AND with `rhs`
    pub fn intersect(&mut self, rhs: &BitMask) {
        self.combine(rhs, "intersect", |a, b| a & b);
    }

    /// Pixelwise XOR with `rhs`
    pub fn toggle(&mut self, rhs: &BitMask) {
        self.combine(rhs, "toggle", |a, b| a ^ b);
    }

    /// Deselect every pixel selected in `rhs`
    pub fn subtract(&mut self, rhs: &BitMask) {
        self.combine(rhs, "subtract", |a, b| a & !b);
    }

    /// Same selection over the whole grid, outside value included.
    ///
    /// Masks whose outside values differ are never equal, even when every
    /// tracked pixel matches.
    pub fn compare(&self, rhs: &BitMask) -> bool {
        if self.outside != rhs.outside {
            return false;
        }
        let Some(span) = union_bounds(self.bounds, rhs.bounds) else {
            return true;
        };
        words_over(&span).all(|(word_x, y, cover)| {
            (self.get_pixels(word_x, y) ^ rhs.get_pixels(word_x, y)) & cover == 0
        })
    }

    /// Whether every pixel selected here is also selected in `source`
    pub fn is_subset_of(&self, source: &BitMask) -> bool {
        if self.outside && !source.outside {
            return false;
        }
        let Some(span) = union_bounds(self.bounds, source.bounds) else {
            return true;
        };
        words_over(&span).all(|(word_x, y, cover)| {
            (self.get_pixels(word_x, y) & !source.get_pixels(word_x, y)) & cover == 0
        })
    }

    /// Replace this mask with `op(self, rhs)` evaluated over the infinite grid.
    ///
    /// `op` works on 32 pixels at a time and must be a bitwise operator.
    fn combine<F>(&mut self, rhs: &BitMask, name: &str, op: F)
    where
        F: Fn(u32, u32) -> u32,
    {
        let lhs_fill = fill_word(self.outside);
        let rhs_fill = fill_word(rhs.outside);
        let outside = op(lhs_fill, rhs_fill) != 0;
        let fill = fill_word(outside);

        let mut bounds = union_bounds(self.bounds, rhs.bounds);
        // An operand whose outside value decides the result on its own limits
        // the tracked area to its own bounds.
        if op(lhs_fill, 0) == op(lhs_fill, u32::MAX) {
            bounds = bounds.zip(self.bounds).and_then(|(a, b)| a.intersection(&b));
        }
        if op(0, rhs_fill) == op(u32::MAX, rhs_fill) {
            bounds = bounds.zip(rhs.bounds).and_then(|(a, b)| a.intersection(&b));
        }

        let mut result = BitMask::new();
        result.outside = outside;
        if let Some(bounds) = bounds {
            let rect = word_aligned(&bounds);
            let mut storage = Storage::filled(rect, outside);
            let mut count = 0u64;
            for (word_x, y, cover) in words_over(&bounds) {
                let value = op(self.get_pixels(word_x, y), rhs.get_pixels(word_x, y));
                let value = (value & cover) | (fill & !cover);
                count += u64::from((value & cover).count_ones());
                if let Some(index) = storage.word_index(word_x, y) {
                    storage.words[index] = value;
                }
            }
            result.storage = Some(storage);
            result.bounds = Some(bounds);
            result.count = count;
            result.minimal.set(None);
        }

        tracing::debug!(
            op = name,
            count = result.count,
            outside = result.outside,
            "combined bit masks"
        );
        *self = result;
    }
}

fn union_bounds(a: Option<BoundingBox>, b: Option<BoundingBox>) -> Option<BoundingBox> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.union(&b)),
        (a, b) => a.or(b),
    }
}

/// Every `(word_x, y, cover)` of the words touching `bounds`, row by row
fn words_over(bounds: &BoundingBox) -> impl Iterator<Item = (i32, i32, u32)> + '_ {
    (bounds.y1..=bounds.y2).flat_map(move |y| {
        word_columns(bounds.x1, bounds.x2)
            .map(move |word_x| (word_x, y, column_mask(word_x, bounds.x1, bounds.x2)))
    })
}
