//! Locality-sensitive hashing index: 25 hash tables, each keyed on a 4-byte
//! slice of a 100-byte signature, each holding (entry-index,
//! signature-index) references into the library.

use rustc_hash::FxHashMap;

use crate::config::{BYTES_PER_BUCKET_HASH, N_BUCKETS};
use crate::index::LibraryIndex;
use crate::minhash::Signature;

pub type EntryIndex = u32;
pub type SignatureIndex = u32;

/// One (entry, signature) reference into the library.
pub type MatchRef = (EntryIndex, SignatureIndex);

fn bucket_key(signature: &Signature, bucket: usize) -> u32 {
    let base = bucket * BYTES_PER_BUCKET_HASH;
    u32::from_be_bytes([
        signature[base],
        signature[base + 1],
        signature[base + 2],
        signature[base + 3],
    ])
}

/// 25 hash tables, one per 4-byte bucket of a signature. Read-only after
/// construction.
pub struct LshIndex {
    tables: Vec<FxHashMap<u32, Vec<MatchRef>>>,
    table_size: usize,
}

impl LshIndex {
    /// Builds the LSH tables for the given library. The table size is
    /// derived from the total number of signatures in the library, divided
    /// by two, matching the reference sizing heuristic.
    pub fn build(library: &LibraryIndex) -> Self {
        let total_signatures: usize = library.entries().iter().map(|e| e.signatures.len()).sum();
        let table_size = (total_signatures / 2).max(1);

        let mut tables: Vec<FxHashMap<u32, Vec<MatchRef>>> =
            (0..N_BUCKETS).map(|_| FxHashMap::default()).collect();

        for (entry_index, entry) in library.entries().iter().enumerate() {
            for (signature_index, signature) in entry.signatures.iter().enumerate() {
                for (bucket, table) in tables.iter_mut().enumerate() {
                    let slot = bucket_key(signature, bucket) as usize % table_size;
                    table
                        .entry(slot as u32)
                        .or_default()
                        .push((entry_index as EntryIndex, signature_index as SignatureIndex));
                }
            }
        }

        Self { tables, table_size }
    }

    #[cfg(test)]
    pub fn table_size(&self) -> usize {
        self.table_size
    }

    /// Gathers every (entry, signature) reference whose bucket collides
    /// with any of `signature`'s 25 buckets.
    pub fn matches(&self, signature: &Signature) -> Vec<MatchRef> {
        let mut out = Vec::new();
        for (bucket, table) in self.tables.iter().enumerate() {
            let slot = bucket_key(signature, bucket) as usize % self.table_size;
            if let Some(refs) = table.get(&(slot as u32)) {
                out.extend_from_slice(refs);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{LibraryEntry, LibraryIndex};

    fn sig_from_byte(b: u8) -> Signature {
        [b; crate::config::SIGNATURE_LENGTH]
    }

    fn sample_library() -> LibraryIndex {
        LibraryIndex::from_entries(vec![
            LibraryEntry {
                filename: "a.wav".into(),
                artist: None,
                title: None,
                album: None,
                signatures: vec![sig_from_byte(1), sig_from_byte(2)],
            },
            LibraryEntry {
                filename: "b.wav".into(),
                artist: None,
                title: None,
                album: None,
                signatures: vec![sig_from_byte(3)],
            },
        ])
    }

    #[test]
    fn exact_signature_match_is_found() {
        let library = sample_library();
        let lsh = LshIndex::build(&library);
        let matches = lsh.matches(&sig_from_byte(1));
        assert!(matches.contains(&(0, 0)));
    }

    #[test]
    fn lookup_is_deterministic_across_calls() {
        let library = sample_library();
        let lsh = LshIndex::build(&library);
        let a = lsh.matches(&sig_from_byte(2));
        let b = lsh.matches(&sig_from_byte(2));
        assert_eq!(a, b);
    }

    #[test]
    fn table_size_is_half_total_signatures() {
        let library = sample_library();
        let lsh = LshIndex::build(&library);
        assert_eq!(lsh.table_size(), 3 / 2);
    }
}
