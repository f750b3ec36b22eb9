//! Slices the resampled, normalized sample buffer into overlapping,
//! Hann-windowed frames and folds each one into a 32-bin log-spectrum row.

use std::sync::OnceLock;

use crate::config::{
    INTERVAL_BETWEEN_FRAMES, NUMBER_OF_BINS, SAMPLES_PER_FRAME,
};
use crate::fft::FftScratch;
use crate::logbins;
use crate::workers;

pub type BinRow = [f32; NUMBER_OF_BINS];

fn build_hann_window() -> [f32; SAMPLES_PER_FRAME] {
    let mut window = [0.0f32; SAMPLES_PER_FRAME];
    let denom = (SAMPLES_PER_FRAME - 1) as f32;
    for (n, slot) in window.iter_mut().enumerate() {
        *slot = 0.5 * (1.0 - (2.0 * std::f32::consts::PI * n as f32 / denom).cos());
    }
    window
}

fn hann_window() -> &'static [f32; SAMPLES_PER_FRAME] {
    static WINDOW: OnceLock<[f32; SAMPLES_PER_FRAME]> = OnceLock::new();
    WINDOW.get_or_init(build_hann_window)
}

/// Forces eager initialization of the Hann window table.
pub fn init() {
    hann_window();
}

/// Number of frames obtainable from `n_samples` samples, or `None` if there
/// isn't enough for even one frame.
pub fn frame_count(n_samples: usize) -> Option<usize> {
    if n_samples < SAMPLES_PER_FRAME {
        None
    } else {
        Some(1 + (n_samples - SAMPLES_PER_FRAME) / INTERVAL_BETWEEN_FRAMES)
    }
}

/// Builds one bin row per frame, in parallel over disjoint frame ranges.
pub fn build_bin_rows(samples: &[f32]) -> Option<Vec<BinRow>> {
    let n_frames = frame_count(samples.len())?;
    let mut rows = vec![[0.0f32; NUMBER_OF_BINS]; n_frames];
    let window = hann_window();

    workers::process_chunks_mut(&mut rows, |start, chunk| {
        let mut scratch = FftScratch::new();
        let mut windowed = [0.0f32; SAMPLES_PER_FRAME];
        for (i, row) in chunk.iter_mut().enumerate() {
            let frame_index = start + i;
            let base = frame_index * INTERVAL_BETWEEN_FRAMES;
            for j in 0..SAMPLES_PER_FRAME {
                windowed[j] = samples[base + j] * window[j];
            }
            scratch.transform(&windowed);
            logbins::calculate_bins(scratch.real(), scratch.imaginary(), row);
        }
    });

    Some(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_count_matches_invariant() {
        assert_eq!(frame_count(2048), Some(1));
        assert_eq!(frame_count(2048 + 64), Some(2));
        assert_eq!(frame_count(2047), None);
        assert_eq!(frame_count(2048 + 64 * 10), Some(11));
    }

    #[test]
    fn build_bin_rows_produces_one_row_per_frame() {
        let samples = vec![0.0f32; 2048 + 64 * 200];
        let rows = build_bin_rows(&samples).unwrap();
        assert_eq!(rows.len(), frame_count(samples.len()).unwrap());
    }

    #[test]
    fn silence_produces_zero_bins() {
        let samples = vec![0.0f32; 2048];
        let rows = build_bin_rows(&samples).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].iter().all(|&v| v.abs() < 1e-6));
    }

    #[test]
    fn too_few_samples_returns_none() {
        let samples = vec![0.0f32; 100];
        assert!(build_bin_rows(&samples).is_none());
    }
}
