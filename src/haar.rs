//! Standard 2-D Haar wavelet transform (row-then-column) applied in place
//! to each spectral image.

use std::f32::consts::SQRT_2;

use crate::config::{NUMBER_OF_BINS, SPECTRAL_IMAGE_WIDTH};
use crate::spectral_image::SpectralImage;
use crate::workers;

/// Applies the in-place 1-D Haar transform to an array whose length is a
/// power of two. Only lengths 32 and 128 are ever passed by this crate;
/// anything else is an internal invariant violation.
fn transform_array(data: &mut [f32]) {
    assert!(
        data.len() == NUMBER_OF_BINS || data.len() == SPECTRAL_IMAGE_WIDTH,
        "Haar transform only supports length 32 or 128, got {}",
        data.len()
    );

    let mut tmp = [0.0f32; SPECTRAL_IMAGE_WIDTH];
    let mut size = data.len();
    while size > 1 {
        size /= 2;
        for i in 0..size {
            tmp[i] = (data[2 * i] + data[2 * i + 1]) / SQRT_2;
            tmp[i + size] = (data[2 * i] - data[2 * i + 1]) / SQRT_2;
        }
        data[..2 * size].copy_from_slice(&tmp[..2 * size]);
    }
}

fn transform_image(image: &mut SpectralImage) {
    let mut row = [0.0f32; SPECTRAL_IMAGE_WIDTH];

    // Rows first: for each frequency bin, gather the 128 values across
    // the image width, transform, and write them back.
    for bin in 0..NUMBER_OF_BINS {
        for i in 0..SPECTRAL_IMAGE_WIDTH {
            row[i] = image.get(i, bin);
        }
        transform_array(&mut row);
        for i in 0..SPECTRAL_IMAGE_WIDTH {
            image.set(i, bin, row[i]);
        }
    }

    // Columns are already contiguous in the image buffer.
    for i in 0..SPECTRAL_IMAGE_WIDTH {
        let start = i * NUMBER_OF_BINS;
        transform_array(&mut image.cells[start..start + NUMBER_OF_BINS]);
    }
}

/// Transforms every image in place, in parallel over disjoint image ranges.
pub fn apply_haar_transform(images: &mut [SpectralImage]) {
    workers::process_chunks_mut(images, |_start, chunk| {
        for image in chunk.iter_mut() {
            transform_image(image);
        }
    });
}
