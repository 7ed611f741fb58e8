use crate::types::BoundingBox;

pub(crate) const WORD_BITS: i32 = 32;

/// All 32 bits set to `value`
#[inline]
pub(crate) fn fill_word(value: bool) -> u32 {
    if value { u32::MAX } else { 0 }
}

/// Column of the first pixel in the word holding column `x`
#[inline]
pub(crate) fn word_start(x: i32) -> i32 {
    x & !(WORD_BITS - 1)
}

/// Bits of the word starting at `word_x` whose columns fall in `[x1, x2]`.
/// Bit 0 is column `word_x`.
#[inline]
pub(crate) fn column_mask(word_x: i32, x1: i32, x2: i32) -> u32 {
    let lo = (i64::from(x1) - i64::from(word_x)).max(0);
    let hi = (i64::from(x2) - i64::from(word_x)).min(i64::from(WORD_BITS - 1));
    if lo > hi {
        return 0;
    }
    let width = hi - lo + 1;
    let bits = if width == i64::from(WORD_BITS) {
        u32::MAX
    } else {
        (1u32 << width) - 1
    };
    bits << lo
}

/// Start columns of every word touching `[x1, x2]`
pub(crate) fn word_columns(x1: i32, x2: i32) -> impl Iterator<Item = i32> {
    let first = i64::from(word_start(x1));
    let last = i64::from(x2);
    (0..)
        .map(move |i: i64| first + i * i64::from(WORD_BITS))
        .take_while(move |&x| x <= last)
        .map(|x| x as i32)
}

/// Expand a box outwards to whole 32-bit words horizontally.
pub(crate) fn word_aligned(bounds: &BoundingBox) -> BoundingBox {
    BoundingBox::new(
        word_start(bounds.x1),
        bounds.y1,
        bounds.x2 | (WORD_BITS - 1),
        bounds.y2,
    )
}

/// Dense row-major block of 32-bit words covering a word-aligned rectangle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Storage {
    pub(crate) rect: BoundingBox,
    pub(crate) words_per_row: usize,
    pub(crate) words: Vec<u32>,
}

impl Storage {
    /// Allocate storage for `rect` (already word aligned) with every bit set to `value`.
    pub(crate) fn filled(rect: BoundingBox, value: bool) -> Self {
        debug_assert_eq!(rect.x1 % WORD_BITS, 0, "storage must start on a word boundary");
        let words_per_row = (rect.width() / WORD_BITS as u64) as usize;
        let rows = rect.height() as usize;
        Self {
            rect,
            words_per_row,
            words: vec![fill_word(value); words_per_row * rows],
        }
    }

    pub(crate) fn from_words(rect: BoundingBox, words: Vec<u32>) -> Self {
        let words_per_row = (rect.width() / WORD_BITS as u64) as usize;
        Self {
            rect,
            words_per_row,
            words,
        }
    }

    /// Index of the word holding `(x, y)`, if it is allocated
    #[inline]
    pub(crate) fn word_index(&self, x: i32, y: i32) -> Option<usize> {
        if !self.rect.contains(x, y) {
            return None;
        }
        let row = (y - self.rect.y1) as usize;
        let column = ((x - self.rect.x1) / WORD_BITS) as usize;
        Some(row * self.words_per_row + column)
    }

    #[inline]
    pub(crate) fn word(&self, x: i32, y: i32) -> Option<u32> {
        self.word_index(x, y).map(|index| self.words[index])
    }

    #[inline]
    pub(crate) fn bit(&self, x: i32, y: i32) -> Option<bool> {
        let offset = (x - self.rect.x1) & (WORD_BITS - 1);
        self.word(x, y).map(|word| (word >> offset) & 1 != 0)
    }

    /// Copy of this storage re-homed into the larger `rect`, new bits set to `fill`.
    pub(crate) fn grown(&self, rect: BoundingBox, fill: bool) -> Self {
        let mut grown = Storage::filled(rect, fill);
        let column_offset = ((self.rect.x1 - rect.x1) / WORD_BITS) as usize;
        let row_offset = (self.rect.y1 - rect.y1) as usize;
        for (row, source) in self.words.chunks(self.words_per_row.max(1)).enumerate() {
            let start = (row + row_offset) * grown.words_per_row + column_offset;
            grown.words[start..start + source.len()].copy_from_slice(source);
        }
        grown
    }
}
