//! RMS-based amplitude normalization.
//!
//! The 10x scale factor and the [0.1, 3.0] clamp bounds are canonical
//! constants carried over from the reference implementation; they must be
//! reproduced bit-for-bit rather than "improved."

/// Normalizes `samples` in place by their RMS amplitude.
pub fn normalize(samples: &mut [f32]) {
    if samples.is_empty() {
        return;
    }

    let square_sum: f32 = samples.iter().map(|s| s * s).sum();
    let mut rms = (square_sum / samples.len() as f32).sqrt() * 10.0;
    rms = rms.clamp(0.1, 3.0);

    for sample in samples.iter_mut() {
        *sample = (*sample / rms).clamp(-1.0, 1.0);
    }
}
