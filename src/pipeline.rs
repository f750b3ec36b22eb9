//! Orchestrates the fingerprinting pipeline end to end: raw samples in,
//! MinHash signatures out.
//!
//! Every lazily-initialized global table (low-pass filter, Hann window,
//! bit-reversal table, log-bin index table, permutation table) is forced to
//! initialize before any worker thread is launched, so the parallel stages
//! never race on first-touch initialization.

use log::debug;

use crate::config::SPECTRAL_IMAGE_WIDTH;
use crate::error::{Result, SonoglyphError};
use crate::frames;
use crate::haar;
use crate::logbins;
use crate::minhash::{self, Signature};
use crate::normalize;
use crate::permutations;
use crate::rawfingerprint;
use crate::resample;
use crate::spectral_image;

/// Forces eager initialization of every lazily-built global table used by
/// the pipeline. Call this once, before spawning any pipeline work.
pub fn init() {
    resample::init();
    crate::fft::init();
    logbins::init();
    frames::init();
    permutations::init();
}

/// Minimum number of native-rate samples needed to produce even one
/// spectral image, expressed at the 44100 Hz input rate.
pub fn minimum_input_samples() -> usize {
    let frames_needed = SPECTRAL_IMAGE_WIDTH;
    let samples_needed =
        crate::config::SAMPLES_PER_FRAME + (frames_needed - 1) * crate::config::INTERVAL_BETWEEN_FRAMES;
    samples_needed * crate::config::DECIMATION_FACTOR
}

/// Runs the full pipeline (resample -> normalize -> frame/FFT/log-bin ->
/// spectral image -> Haar transform -> raw fingerprint -> MinHash) over a
/// buffer of mono samples at the native 44100 Hz input rate, producing one
/// signature per non-silent, non-degenerate spectral image.
pub fn fingerprint(native_samples: &[f32]) -> Result<Vec<Signature>> {
    let mut samples = resample::resample(native_samples);
    normalize::normalize(&mut samples);

    let bin_rows = frames::build_bin_rows(&samples).ok_or_else(|| SonoglyphError::InputTooSmall {
        required: minimum_input_samples(),
        actual: native_samples.len(),
    })?;
    debug!("computed {} bin rows", bin_rows.len());

    let mut images = spectral_image::build_spectral_images(&bin_rows).ok_or_else(|| {
        SonoglyphError::InputTooSmall {
            required: minimum_input_samples(),
            actual: native_samples.len(),
        }
    })?;
    debug!("grouped into {} spectral images", images.len());

    haar::apply_haar_transform(&mut images);
    let fingerprints = rawfingerprint::build_raw_fingerprints(&images);
    let signatures = minhash::build_signatures(&fingerprints);
    debug!(
        "kept {} of {} fingerprints as signatures",
        signatures.len(),
        fingerprints.len()
    );

    Ok(signatures)
}
