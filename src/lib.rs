//! Audio fingerprinting and identification: resample, fingerprint, build an
//! LSH-backed index, and search it.
//!
//! The pipeline turns a mono 44100 Hz sample buffer into a handful of
//! 100-byte MinHash signatures (see [`pipeline::fingerprint`]); an index of
//! known tracks is a [`index::LibraryIndex`] of those signatures plus
//! whatever metadata was recovered, searchable through an [`lsh::LshIndex`]
//! via [`search::search`].

pub mod config;
pub mod debug_dump;
pub mod error;
pub mod fft;
pub mod frames;
pub mod haar;
pub mod index;
pub mod index_io;
pub mod logbins;
pub mod lsh;
pub mod minhash;
pub mod normalize;
pub mod permutations;
pub mod pipeline;
pub mod rawfingerprint;
pub mod resample;
pub mod search;
pub mod spectral_image;
pub mod wav;
pub mod workers;

pub use error::{Result, SonoglyphError};
pub use index::{LibraryEntry, LibraryIndex};
pub use lsh::LshIndex;
pub use minhash::Signature;
