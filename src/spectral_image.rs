//! Groups 128 consecutive bin rows into a 128x32 spectral image and rescales
//! each image's cells into [0, 1] with a log-compressed normalization.

use crate::config::{
    DISTANCE_BETWEEN_SPECTRAL_IMAGE_START, NUMBER_OF_BINS, SPECTRAL_IMAGE_WIDTH,
};
use crate::frames::BinRow;
use crate::workers;

pub const IMAGE_CELLS: usize = SPECTRAL_IMAGE_WIDTH * NUMBER_OF_BINS;

/// A 128x32 spectral image stored row-major (row i, bin b at `i * 32 + b`).
#[derive(Clone)]
pub struct SpectralImage {
    pub cells: [f32; IMAGE_CELLS],
}

impl SpectralImage {
    pub fn zeroed() -> Self {
        Self {
            cells: [0.0; IMAGE_CELLS],
        }
    }

    #[inline]
    pub fn get(&self, row: usize, bin: usize) -> f32 {
        self.cells[row * NUMBER_OF_BINS + bin]
    }

    #[inline]
    pub fn set(&mut self, row: usize, bin: usize, value: f32) {
        self.cells[row * NUMBER_OF_BINS + bin] = value;
    }
}

/// Number of spectral images obtainable from `n_frames` bin rows, or `None`
/// if there aren't enough frames for even one image.
pub fn image_count(n_frames: usize) -> Option<usize> {
    if n_frames < SPECTRAL_IMAGE_WIDTH {
        None
    } else {
        Some(1 + (n_frames - SPECTRAL_IMAGE_WIDTH) / DISTANCE_BETWEEN_SPECTRAL_IMAGE_START)
    }
}

fn scale(value: f32, max: f32) -> f32 {
    let mut scaled = 255.0 * value / max;
    if scaled > 255.0 {
        scaled = 255.0;
    }
    (1.0 + scaled).ln() / 256f32.ln()
}

fn rescale_image(image: &mut SpectralImage) {
    let max = image
        .cells
        .iter()
        .copied()
        .fold(f32::MIN, f32::max);
    if max <= 0.0 {
        // All-zero (or negative, which shouldn't happen for power values)
        // image: every cell folds to log2(1)/log2(256) == 0.
        for cell in image.cells.iter_mut() {
            *cell = 0.0;
        }
        return;
    }
    for cell in image.cells.iter_mut() {
        *cell = scale(*cell, max);
    }
}

/// Groups bin rows into spectral images and rescales each in place, in
/// parallel over disjoint image ranges.
pub fn build_spectral_images(bin_rows: &[BinRow]) -> Option<Vec<SpectralImage>> {
    let n_images = image_count(bin_rows.len())?;
    let mut images = vec![SpectralImage::zeroed(); n_images];

    workers::process_chunks_mut(&mut images, |start, chunk| {
        for (i, image) in chunk.iter_mut().enumerate() {
            let frame_start = (start + i) * DISTANCE_BETWEEN_SPECTRAL_IMAGE_START;
            for row in 0..SPECTRAL_IMAGE_WIDTH {
                let bin_row = &bin_rows[frame_start + row];
                for bin in 0..NUMBER_OF_BINS {
                    image.set(row, bin, bin_row[bin]);
                }
            }
            rescale_image(image);
        }
    });

    Some(images)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_count_matches_invariant() {
        assert_eq!(image_count(128), Some(1));
        assert_eq!(image_count(128 + 8), Some(2));
        assert_eq!(image_count(127), None);
    }

    #[test]
    fn rescaled_values_land_in_unit_range() {
        let rows = vec![[1.0f32; NUMBER_OF_BINS]; SPECTRAL_IMAGE_WIDTH];
        let images = build_spectral_images(&rows).unwrap();
        assert_eq!(images.len(), 1);
        for &v in images[0].cells.iter() {
            assert!((0.0..=1.0).contains(&v), "value {v} out of range");
        }
    }

    #[test]
    fn all_zero_rows_rescale_to_zero() {
        let rows = vec![[0.0f32; NUMBER_OF_BINS]; SPECTRAL_IMAGE_WIDTH];
        let images = build_spectral_images(&rows).unwrap();
        assert!(images[0].cells.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn max_cell_scales_to_one() {
        let mut rows = vec![[0.1f32; NUMBER_OF_BINS]; SPECTRAL_IMAGE_WIDTH];
        rows[0][0] = 10.0;
        let images = build_spectral_images(&rows).unwrap();
        assert!((images[0].get(0, 0) - 1.0).abs() < 1e-6);
    }
}
