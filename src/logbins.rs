//! Folds 2048 FFT coefficients into 32 logarithmically spaced frequency
//! bins between 318 Hz and 2000 Hz.

use std::sync::OnceLock;

use crate::config::{MAXIMUM_FREQUENCY, MINIMUM_FREQUENCY, NUMBER_OF_BINS, SAMPLES_PER_FRAME};

fn frequency_to_index(frequency: f32) -> usize {
    let index = (1024.0 * frequency / 2756.0).round() as i32;
    index.clamp(1, 1024) as usize
}

fn build_bin_indexes() -> [usize; NUMBER_OF_BINS + 1] {
    let log_min = MINIMUM_FREQUENCY.log2();
    let log_max = MAXIMUM_FREQUENCY.log2();
    let delta = (log_max - log_min) / NUMBER_OF_BINS as f32;

    let mut indexes = [0usize; NUMBER_OF_BINS + 1];
    let mut current = log_min;
    for slot in indexes.iter_mut() {
        let frequency = 2f32.powf(current);
        current += delta;
        *slot = frequency_to_index(frequency);
    }
    indexes
}

fn bin_indexes() -> &'static [usize; NUMBER_OF_BINS + 1] {
    static INDEXES: OnceLock<[usize; NUMBER_OF_BINS + 1]> = OnceLock::new();
    INDEXES.get_or_init(build_bin_indexes)
}

/// Forces eager initialization of the bin-index table.
pub fn init() {
    bin_indexes();
}

/// Computes the 32 log-power bins for one FFT result.
pub fn calculate_bins(
    real: &[f32; SAMPLES_PER_FRAME],
    imaginary: &[f32; SAMPLES_PER_FRAME],
    bins: &mut [f32; NUMBER_OF_BINS],
) {
    let indexes = bin_indexes();
    for b in 0..NUMBER_OF_BINS {
        let min_index = indexes[b];
        let max_index = indexes[b + 1];

        let mut sum = 0.0f32;
        for j in min_index..max_index {
            let re = real[j] / 1024.0;
            let im = imaginary[j] / 1024.0;
            sum += re * re + im * im;
        }
        bins[b] = sum / (max_index - min_index) as f32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fft::FftScratch;
    use std::f32::consts::PI;

    #[test]
    fn bin_indexes_are_monotonically_increasing() {
        let indexes = bin_indexes();
        for w in indexes.windows(2) {
            assert!(w[1] >= w[0]);
        }
    }

    #[test]
    fn sine_689hz_peaks_near_expected_bin() {
        // 689 Hz at 5512 Hz sampling rate: the reference expects the FFT
        // index to land around round(1024 * 689 / 2756) == 256, which in
        // turn should fall inside the bin containing that index.
        const SAMPLE_RATE: f32 = 5512.0;
        let mut source = [0.0f32; SAMPLES_PER_FRAME];
        for (n, sample) in source.iter_mut().enumerate() {
            let hann = 0.5 * (1.0 - (2.0 * PI * n as f32 / (SAMPLES_PER_FRAME as f32 - 1.0)).cos());
            *sample = 0.5 * (2.0 * PI * 689.0 * n as f32 / SAMPLE_RATE).sin() * hann;
        }

        let mut scratch = FftScratch::new();
        scratch.transform(&source);
        let mut bins = [0.0f32; NUMBER_OF_BINS];
        calculate_bins(scratch.real(), scratch.imaginary(), &mut bins);

        let peak_bin = (0..NUMBER_OF_BINS)
            .max_by(|&a, &b| bins[a].partial_cmp(&bins[b]).unwrap())
            .unwrap();

        // Expected index ~256 out of 1024 positive-frequency bins maps to
        // somewhere in the upper half of the 32 log bins spanning 318-2000Hz.
        for (b, &value) in bins.iter().enumerate() {
            if b != peak_bin {
                assert!(
                    value <= bins[peak_bin],
                    "bin {b} ({value}) exceeded peak bin {peak_bin} ({})",
                    bins[peak_bin]
                );
            }
        }
    }
}
