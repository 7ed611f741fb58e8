use super::BitMask;
use super::storage::word_columns;
use crate::types::BoundingBox;

/// Row-major boolean copy of a rectangle, kept by the mask between calls.
#[derive(Debug)]
pub(super) struct RegionBuffer {
    rect: BoundingBox,
    width: usize,
    height: usize,
    values: Vec<bool>,
    stale: bool,
}

impl Default for RegionBuffer {
    fn default() -> Self {
        Self {
            rect: BoundingBox::default(),
            width: 0,
            height: 0,
            values: Vec::new(),
            stale: true,
        }
    }
}

impl RegionBuffer {
    pub(super) fn mark_stale(&mut self) {
        self.stale = true;
    }

    pub(super) fn refresh(&mut self, mask: &BitMask, rect: BoundingBox) {
        if !self.stale && self.rect == rect {
            return;
        }
        self.rect = rect;
        self.stale = false;
        self.width = rect.width() as usize;
        self.height = rect.height() as usize;
        self.values.clear();
        self.values.resize(self.width * self.height, false);
        if self.values.is_empty() {
            return;
        }

        for (row, y) in (rect.y1..=rect.y2).enumerate() {
            let line = &mut self.values[row * self.width..(row + 1) * self.width];
            for word_x in word_columns(rect.x1, rect.x2) {
                let word = mask.get_pixels(word_x, y);
                let first = word_x.max(rect.x1);
                let last = (word_x + 31).min(rect.x2);
                for x in first..=last {
                    line[(x - rect.x1) as usize] = (word >> (x - word_x)) & 1 != 0;
                }
            }
        }
    }

    pub(super) fn view(&self) -> RegionView<'_> {
        RegionView {
            rect: self.rect,
            width: self.width,
            values: &self.values,
        }
    }
}

/// Borrowed view returned by [`BitMask::region`].
///
/// The view holds a borrow of the mask, so the mask cannot change (or hand
/// out another view) while it is alive.
#[derive(Debug, Clone, Copy)]
pub struct RegionView<'a> {
    rect: BoundingBox,
    width: usize,
    values: &'a [bool],
}

impl<'a> RegionView<'a> {
    /// The rectangle this view covers
    pub fn rect(&self) -> BoundingBox {
        self.rect
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.values.len().checked_div(self.width).unwrap_or(0)
    }

    /// Value at absolute coordinates, `None` outside the view
    pub fn get(&self, x: i32, y: i32) -> Option<bool> {
        if !self.rect.contains(x, y) {
            return None;
        }
        let index = (y - self.rect.y1) as usize * self.width + (x - self.rect.x1) as usize;
        self.values.get(index).copied()
    }

    /// Row `index` counted from the top of the view
    pub fn row(&self, index: usize) -> Option<&'a [bool]> {
        if index >= self.height() {
            return None;
        }
        Some(&self.values[index * self.width..(index + 1) * self.width])
    }

    pub fn rows(&self) -> impl Iterator<Item = &'a [bool]> + 'a {
        self.values.chunks(self.width.max(1))
    }

    /// Every value, row-major
    pub fn as_slice(&self) -> &'a [bool] {
        self.values
    }
}
