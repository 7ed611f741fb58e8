use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::BitMask;
use super::storage::{Storage, column_mask, fill_word, word_aligned, word_columns};
use crate::error::{AoiError, Result};
use crate::types::BoundingBox;

/// Persisted form of a [`BitMask`].
///
/// `mask` holds the words covering `bounding_box` widened to whole 32-pixel
/// words, row by row, each word little-endian with bit 0 on the leftmost
/// column, base64 encoded. Bits beyond `bounding_box` carry the outside value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BitMaskRecord {
    /// Value of every pixel not covered by `bounding_box`
    pub outside: bool,
    /// Regular bounding box, absent for a mask that was never drawn on
    pub bounding_box: Option<BoundingBox>,
    /// Selected pixels inside `bounding_box`
    pub count: u64,
    pub mask: String,
}

impl From<&BitMask> for BitMaskRecord {
    fn from(mask: &BitMask) -> Self {
        let mut bytes = Vec::new();
        if let Some(bounds) = mask.bounds {
            let rect = word_aligned(&bounds);
            for y in rect.y1..=rect.y2 {
                for word_x in word_columns(rect.x1, rect.x2) {
                    bytes.extend_from_slice(&mask.get_pixels(word_x, y).to_le_bytes());
                }
            }
        }
        Self {
            outside: mask.outside,
            bounding_box: mask.bounds,
            count: mask.count,
            mask: STANDARD.encode(bytes),
        }
    }
}

impl TryFrom<BitMaskRecord> for BitMask {
    type Error = AoiError;

    fn try_from(record: BitMaskRecord) -> Result<Self> {
        let bytes = STANDARD.decode(record.mask.as_bytes())?;
        let mut mask = BitMask::new();
        mask.outside = record.outside;

        let Some(bounds) = record.bounding_box else {
            if !bytes.is_empty() || record.count != 0 {
                return Err(invalid("mask data without a bounding box"));
            }
            return Ok(mask);
        };
        if !bounds.is_valid() || bounds.x1 < 0 || bounds.y1 < 0 {
            return Err(invalid(format!("bad bounding box {bounds:?}")));
        }
        if bytes.len() % 4 != 0 {
            return Err(invalid(format!("{} bytes is not a whole number of words", bytes.len())));
        }

        let rect = word_aligned(&bounds);
        let words: Vec<u32> = bytes
            .chunks_exact(4)
            .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();
        let storage = Storage::from_words(rect, words);
        let expected = storage.words_per_row * rect.height() as usize;
        if storage.words.len() != expected {
            return Err(invalid(format!(
                "expected {expected} words, found {}",
                storage.words.len()
            )));
        }

        let fill = fill_word(record.outside);
        let mut count = 0u64;
        for y in rect.y1..=rect.y2 {
            for word_x in word_columns(rect.x1, rect.x2) {
                let word = storage.word(word_x, y).unwrap_or(fill);
                let cover = column_mask(word_x, bounds.x1, bounds.x2);
                if (word ^ fill) & !cover != 0 {
                    return Err(invalid(format!("padding bits set in row {y}")));
                }
                count += u64::from((word & cover).count_ones());
            }
        }
        if count != record.count {
            return Err(invalid(format!(
                "count {} does not match {count} selected pixels",
                record.count
            )));
        }

        mask.storage = Some(storage);
        mask.bounds = Some(bounds);
        mask.count = count;
        mask.minimal.set(None);
        Ok(mask)
    }
}

fn invalid(message: impl Into<String>) -> AoiError {
    AoiError::InvalidEncoding(message.into())
}

impl Serialize for BitMask {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        BitMaskRecord::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BitMask {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let record = BitMaskRecord::deserialize(deserializer)?;
        BitMask::try_from(record).map_err(serde::de::Error::custom)
    }
}

impl JsonSchema for BitMask {
    fn schema_name() -> String {
        "BitMask".to_owned()
    }

    fn json_schema(generator: &mut schemars::r#gen::SchemaGenerator) -> schemars::schema::Schema {
        BitMaskRecord::json_schema(generator)
    }
}
