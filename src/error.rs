//! Error taxonomy for the fingerprinting pipeline and search engine.
//!
//! Each variant corresponds to one entry of the error taxonomy described by
//! the design: input-absent, input-malformed, input-unsupported,
//! input-too-small, resource-exhausted and no-match. Errors are values
//! returned through the pipeline; a stage that fails cleans up its own
//! partial state and returns the first error it hit.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SonoglyphError {
    /// The input file could not be opened at all.
    #[error("cannot read input file {path}: {source}")]
    InputAbsent {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The input does not parse as a well-formed WAV file or index entry.
    #[error("malformed input: {0}")]
    InputMalformed(String),

    /// The input WAV uses a sample rate, channel layout or bit depth we
    /// don't support.
    #[error("unsupported audio format: {0}")]
    InputUnsupported(String),

    /// There are fewer samples than required to compute even one spectral
    /// image.
    #[error("input too small: need at least {required} samples, got {actual}")]
    InputTooSmall { required: usize, actual: usize },

    /// A worker thread or allocation failed somewhere in the pipeline.
    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),

    /// The search completed but no candidate passed the match thresholds.
    #[error("no match found")]
    NoMatch,
}

pub type Result<T> = std::result::Result<T, SonoglyphError>;
