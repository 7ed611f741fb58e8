use std::path::Path;

use image::{GrayImage, Luma};

use crate::bitmask::BitMask;
use crate::error::Result;
use crate::iterator::BitMaskIterator;
use crate::types::RasterExtent;

impl BitMask {
    /// Render the mask over a raster extent, 255 for selected pixels and 0 otherwise
    pub fn to_gray_image<R>(&self, raster: &R) -> GrayImage
    where
        R: RasterExtent + ?Sized,
    {
        let mut image = GrayImage::new(raster.column_count(), raster.row_count());
        for location in BitMaskIterator::from_raster(Some(self), raster) {
            image.put_pixel(location.x as u32, location.y as u32, Luma([255]));
        }
        image
    }

    /// Select every pixel of `image` brighter than `threshold`
    pub fn from_gray_image(image: &GrayImage, threshold: u8) -> BitMask {
        let binary = imageproc::contrast::threshold(image, threshold);
        let mut mask = BitMask::new();
        for (y, row) in binary.rows().enumerate() {
            let mut word = 0u32;
            let mut word_x = 0i32;
            for (x, pixel) in row.enumerate() {
                let bit = x % 32;
                if bit == 0 && x > 0 {
                    mask.set_pixels(word_x, y as i32, word);
                    word = 0;
                    word_x = x as i32;
                }
                if pixel[0] > 0 {
                    word |= 1 << bit;
                }
            }
            if word != 0 {
                mask.set_pixels(word_x, y as i32, word);
            }
        }
        tracing::debug!(
            width = image.width(),
            height = image.height(),
            threshold,
            selected = mask.count(),
            "thresholded image into mask"
        );
        mask
    }

    /// Load an image, convert it to grayscale and threshold it into a mask
    pub fn from_image_file(path: impl AsRef<Path>, threshold: u8) -> Result<BitMask> {
        let image = image::open(path)?.to_luma8();
        Ok(Self::from_gray_image(&image, threshold))
    }
}
