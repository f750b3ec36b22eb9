//! Low-pass-filtered 8x decimator: 44100 Hz mono -> 5512 Hz mono.
//!
//! The filter coefficients are a 31-tap windowed-sinc low-pass filter
//! (Blackman window): the canonical filter shipped by the reference
//! implementation, hand-rolled stop-band attenuation and all.

use std::f32::consts::PI;
use std::sync::OnceLock;

use crate::config::DECIMATION_FACTOR;

const FILTER_SIZE: usize = 31;
const FILTER_HALF_WIDTH: i32 = 15;

fn sinc(x: f32) -> f32 {
    if x == 0.0 {
        1.0
    } else {
        (PI * x).sin() / (PI * x)
    }
}

fn blackman_window(x: f32) -> f32 {
    0.42 - 0.5 * (2.0 * PI * (x + 15.0) / 30.0).cos() + 0.08 * (4.0 * PI * (x + 15.0) / 30.0).cos()
}

fn build_low_pass_filter() -> [f32; FILTER_SIZE] {
    let mut filter = [0.0f32; FILTER_SIZE];
    for x in -FILTER_HALF_WIDTH..=FILTER_HALF_WIDTH {
        let idx = (x + FILTER_HALF_WIDTH) as usize;
        filter[idx] = if x == 0 {
            0.125
        } else {
            0.125 * sinc(x as f32 * 0.125) * blackman_window(x as f32)
        };
    }
    filter
}

fn low_pass_filter() -> &'static [f32; FILTER_SIZE] {
    static FILTER: OnceLock<[f32; FILTER_SIZE]> = OnceLock::new();
    FILTER.get_or_init(build_low_pass_filter)
}

/// Forces eager initialization of the lazily-built filter table, so that
/// worker threads launched afterwards see a fully initialized table without
/// any first-touch synchronization.
pub fn init() {
    low_pass_filter();
}

fn resampled_sample(samples: &[f32], start: usize, filter: &[f32; FILTER_SIZE]) -> f32 {
    let mut res = 0.0;
    for (j, &coeff) in filter.iter().enumerate() {
        if let Some(&sample) = samples.get(start + j) {
            res += sample * coeff;
        } else {
            break;
        }
    }
    res
}

/// Decimates `samples` (44100 Hz mono) down to 5512 Hz mono.
pub fn resample(samples: &[f32]) -> Vec<f32> {
    let filter = low_pass_filter();
    let n_out = samples.len() / DECIMATION_FACTOR;
    (0..n_out)
        .map(|i| resampled_sample(samples, i * DECIMATION_FACTOR, filter))
        .collect()
}
