//! MinHash signer: turns each raw fingerprint's sparse bit array into a
//! 100-byte signature using the shared deterministic permutation set.

use crate::config::{N_PERMUTATIONS, SIGNATURE_LENGTH, SIGNATURE_SENTINEL};
use crate::permutations;
use crate::rawfingerprint::RawFingerprint;
use crate::workers;

/// A 100-byte MinHash signature. Byte `k` is the index, within permutation
/// `k`, of the first set bit found in the fingerprint (or the sentinel 255
/// if none of the first 255 positions had one set).
pub type Signature = [u8; SIGNATURE_LENGTH];

/// Computes the signature for one fingerprint. Returns `None` if the
/// fingerprint is flagged silent, or if the resulting signature is
/// degenerate (every byte equals the sentinel).
pub fn signature_for(fp: &RawFingerprint) -> Option<Signature> {
    if fp.is_silence {
        return None;
    }

    let mut signature = [SIGNATURE_SENTINEL; SIGNATURE_LENGTH];
    let mut meaningful = false;

    for k in 0..N_PERMUTATIONS {
        let permutation = permutations::get(k);
        for (j, &bit_index) in permutation.iter().enumerate() {
            if fp.bit(bit_index as usize) {
                signature[k] = j as u8;
                meaningful = true;
                break;
            }
        }
    }

    if meaningful {
        Some(signature)
    } else {
        None
    }
}

/// Computes one signature per non-silent, non-degenerate fingerprint, in
/// parallel over disjoint fingerprint ranges. Entries that are dropped
/// (silence or degeneracy) simply don't appear in the output; callers that
/// need to correlate a signature back to its source image should zip
/// against `fingerprints` themselves before calling this if that mapping
/// matters.
pub fn build_signatures(fingerprints: &[RawFingerprint]) -> Vec<Signature> {
    let mut slots: Vec<Option<Signature>> = vec![None; fingerprints.len()];

    workers::process_chunks_mut(&mut slots, |start, chunk| {
        for (i, slot) in chunk.iter_mut().enumerate() {
            *slot = signature_for(&fingerprints[start + i]);
        }
    });

    slots.into_iter().flatten().collect()
}
