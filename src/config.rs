//! Canonical constants for the fingerprinting pipeline.
//!
//! These are pulled together into one place so that tests can override them
//! (e.g. the permutation seed) without touching the production call sites.
//! The values themselves are fixed: any divergence changes fingerprint
//! values and breaks cross-implementation interoperability.

/// Sample rate after resampling, in Hz.
pub const TARGET_SAMPLE_RATE: u32 = 5512;

/// Decimation factor applied by the resampler (44100 Hz -> 5512 Hz).
pub const DECIMATION_FACTOR: usize = 8;

/// Number of float samples per analysis frame.
pub const SAMPLES_PER_FRAME: usize = 2048;

/// Number of samples between the start of consecutive frames.
pub const INTERVAL_BETWEEN_FRAMES: usize = 64;

/// Number of logarithmically spaced frequency bins per frame.
pub const NUMBER_OF_BINS: usize = 32;

/// Lower bound of the log-spaced bin range, in Hz.
pub const MINIMUM_FREQUENCY: f32 = 318.0;

/// Upper bound of the log-spaced bin range, in Hz.
pub const MAXIMUM_FREQUENCY: f32 = 2000.0;

/// Number of bin-rows grouped into one spectral image.
pub const SPECTRAL_IMAGE_WIDTH: usize = 128;

/// Number of frames between the start of consecutive spectral images.
pub const DISTANCE_BETWEEN_SPECTRAL_IMAGE_START: usize = 8;

/// Number of wavelet coefficients retained per raw fingerprint.
pub const TOP_WAVELETS: usize = 200;

/// Minimum absolute wavelet coefficient magnitude to be encoded as non-zero.
pub const WAVELET_ZERO_THRESHOLD: f32 = 0.001;

/// Size in bytes of a raw fingerprint bit array (8192 bits).
pub const RAW_FINGERPRINT_SIZE: usize = (NUMBER_OF_BINS * SPECTRAL_IMAGE_WIDTH * 2) / 8;

/// Number of bits a raw fingerprint covers.
pub const RAW_FINGERPRINT_BITS: usize = RAW_FINGERPRINT_SIZE * 8;

/// Number of bytes in a MinHash signature.
pub const SIGNATURE_LENGTH: usize = 100;

/// Number of candidate permutations used to build a signature.
pub const N_PERMUTATIONS: usize = 100;

/// Number of indexes retained from each permutation.
pub const PERMUTATION_LENGTH: usize = 255;

/// Sentinel signature byte meaning "no set bit found in this permutation".
pub const SIGNATURE_SENTINEL: u8 = 255;

/// Seed for the portable LCG used to generate MinHash permutations.
///
/// This must be identical between indexing and querying runs, and ideally
/// across implementations. 678233 is the canonical value carried over from
/// the reference implementation.
pub const PERMUTATION_SEED: u32 = 678233;

/// Number of bytes that make up one LSH bucket key.
pub const BYTES_PER_BUCKET_HASH: usize = 4;

/// Number of LSH hash tables (one per 4-byte slice of a 100-byte signature).
pub const N_BUCKETS: usize = SIGNATURE_LENGTH / BYTES_PER_BUCKET_HASH;

/// Minimum number of a sample signature's 25 buckets that must collide with
/// the same library signature before a full comparison is performed.
pub const MIN_BUCKET_MATCH_FOR_DEEP_CHECK: usize = 2;

/// Minimum full-signature score (byte matches out of 100) to retain a match.
pub const MIN_SCORE: u32 = 30;

/// Minimum number of full-signature matches an entry must accumulate.
pub const MIN_SIGNATURE_MATCHES: u32 = 10;

/// Minimum average score an entry must reach to be a candidate.
pub const MIN_AVERAGE_SCORE: f32 = 30.0;

/// A score at or above this is a strong indicator of a good match, and
/// relaxes the minimum match-count requirement by half.
pub const GOOD_SCORE: f32 = 35.0;

/// Only the top 10 ranked candidates are examined for a final verdict.
pub const SEARCH_CANDIDATE_WINDOW: usize = 10;

/// Target size of the worker thread pool used for the parallel stages.
pub const WORKER_POOL_SIZE: usize = 8;

/// A top-200 cell counts as "loud" for silence classification when its
/// absolute value exceeds this.
pub const SILENCE_COEFFICIENT_THRESHOLD: f32 = 1.0;

/// A fingerprint is flagged silent when fewer than this many of its
/// top-200 cells are loud.
pub const SILENCE_MIN_LOUD_COEFFICIENTS: usize = 10;
