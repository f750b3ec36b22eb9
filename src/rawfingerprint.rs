//! Converts a Haar-transformed spectral image into a sparse tri-state bit
//! array: the top 200 wavelet coefficients by magnitude, each encoded as a
//! sign bit pair, plus a silence flag.

use crate::config::{
    RAW_FINGERPRINT_SIZE, SILENCE_COEFFICIENT_THRESHOLD, SILENCE_MIN_LOUD_COEFFICIENTS,
    TOP_WAVELETS, WAVELET_ZERO_THRESHOLD,
};
use crate::spectral_image::{SpectralImage, IMAGE_CELLS};
use crate::workers;

/// The 8192-bit (1024-byte) tri-state encoding of one spectral image, plus
/// whether the image is close enough to silence to skip.
#[derive(Clone)]
pub struct RawFingerprint {
    pub bits: [u8; RAW_FINGERPRINT_SIZE],
    pub is_silence: bool,
}

impl RawFingerprint {
    pub fn zeroed() -> Self {
        Self {
            bits: [0u8; RAW_FINGERPRINT_SIZE],
            is_silence: false,
        }
    }

    #[inline]
    pub fn bit(&self, index: usize) -> bool {
        self.bits[index / 8] & (1 << (index % 8)) != 0
    }

    #[inline]
    fn set_bit(&mut self, index: usize) {
        self.bits[index / 8] |= 1 << (index % 8);
    }
}

/// Sorts cell indexes by descending absolute value and keeps the top 200,
/// encoding each as a 2-bit tri-state value (positive, negative, or
/// unchanged/zero).
fn fill_from_image(image: &SpectralImage, fp: &mut RawFingerprint) {
    let mut indexed: Vec<(usize, f32)> = image.cells.iter().copied().enumerate().collect();
    indexed.sort_unstable_by(|(_, a), (_, b)| b.abs().partial_cmp(&a.abs()).unwrap());

    let mut loud_count = 0usize;
    for &(index, value) in indexed.iter().take(TOP_WAVELETS) {
        if value.abs() > SILENCE_COEFFICIENT_THRESHOLD {
            loud_count += 1;
        }
        if value > WAVELET_ZERO_THRESHOLD {
            fp.set_bit(2 * index);
        } else if value < -WAVELET_ZERO_THRESHOLD {
            fp.set_bit(2 * index + 1);
        }
    }

    fp.is_silence = loud_count < SILENCE_MIN_LOUD_COEFFICIENTS;
}

/// Builds one raw fingerprint per (Haar-transformed) spectral image, in
/// parallel over disjoint image ranges.
pub fn build_raw_fingerprints(images: &[SpectralImage]) -> Vec<RawFingerprint> {
    debug_assert_eq!(IMAGE_CELLS, 128 * 32);
    let mut fingerprints = vec![RawFingerprint::zeroed(); images.len()];

    workers::process_chunks_mut(&mut fingerprints, |start, chunk| {
        for (i, fp) in chunk.iter_mut().enumerate() {
            fill_from_image(&images[start + i], fp);
        }
    });

    fingerprints
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_zero_image_is_silence_and_has_no_bits_set() {
        let images = vec![SpectralImage::zeroed()];
        let fps = build_raw_fingerprints(&images);
        assert!(fps[0].is_silence);
        assert!(fps[0].bits.iter().all(|&b| b == 0));
    }

    #[test]
    fn loud_image_is_not_flagged_silent() {
        let mut image = SpectralImage::zeroed();
        for (i, cell) in image.cells.iter_mut().enumerate() {
            *cell = if i % 2 == 0 { 2.0 } else { -2.0 };
        }
        let images = vec![image];
        let fps = build_raw_fingerprints(&images);
        assert!(!fps[0].is_silence);
    }

    #[test]
    fn top_wavelets_sets_at_most_two_hundred_cell_pairs() {
        let mut image = SpectralImage::zeroed();
        for (i, cell) in image.cells.iter_mut().enumerate() {
            *cell = (i as f32) * 0.01;
        }
        let images = vec![image];
        let fps = build_raw_fingerprints(&images);
        let set_bits: usize = fps[0]
            .bits
            .iter()
            .map(|b| b.count_ones() as usize)
            .sum();
        assert!(set_bits <= TOP_WAVELETS);
    }

    #[test]
    fn sign_encoding_matches_value_sign() {
        let mut image = SpectralImage::zeroed();
        image.cells[0] = 5.0;
        image.cells[1] = -5.0;
        let images = vec![image];
        let fps = build_raw_fingerprints(&images);
        assert!(fps[0].bit(0));
        assert!(!fps[0].bit(1));
        assert!(!fps[0].bit(2));
        assert!(fps[0].bit(3));
    }
}
