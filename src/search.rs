//! Matches a query sample's signatures against a library index, using the
//! LSH tables to shortlist candidates before falling back to full
//! byte-for-byte signature comparisons.

use std::cmp::Ordering;

use log::trace;

use crate::config::{
    GOOD_SCORE, MIN_AVERAGE_SCORE, MIN_BUCKET_MATCH_FOR_DEEP_CHECK, MIN_SCORE,
    MIN_SIGNATURE_MATCHES, SEARCH_CANDIDATE_WINDOW,
};
use crate::error::{Result, SonoglyphError};
use crate::index::{LibraryEntry, LibraryIndex};
use crate::lsh::LshIndex;
use crate::minhash::Signature;

/// Number of bytes identical between two signatures.
fn compare_hashes(a: &Signature, b: &Signature) -> u32 {
    a.iter().zip(b.iter()).filter(|(x, y)| x == y).count() as u32
}

#[derive(Clone, Copy, Debug)]
struct EntryScore {
    entry_index: usize,
    score: f32,
    n_matches: i32,
}

fn average(score: &EntryScore) -> f32 {
    if score.n_matches == 0 {
        0.0
    } else {
        score.score / score.n_matches as f32
    }
}

/// `Ordering::Less` means `a` is the better match. Mirrors the reference
/// comparator's branch-by-branch tie-breaking between average score and raw
/// match count, including its integer-truncated score delta: the delta is
/// cast to an integer before taking its absolute value, not compared as a
/// true float difference.
fn compare_entry_scores(a: &EntryScore, b: &EntryScore) -> Ordering {
    let average_a = average(a);
    let average_b = average(b);

    let truncated_diff = (average_a - average_b) as i32;
    let score_delta = truncated_diff.unsigned_abs() as f32;

    if score_delta <= 3.0 {
        if score_delta <= 5.0 && a.n_matches >= b.n_matches + 5 {
            return Ordering::Less;
        }
        if b.n_matches >= a.n_matches + 5 {
            return Ordering::Greater;
        }
    }

    if score_delta < 0.5 {
        match a.n_matches.cmp(&b.n_matches) {
            Ordering::Greater => return Ordering::Less,
            Ordering::Less => return Ordering::Greater,
            Ordering::Equal => {}
        }
    }

    if average_a > average_b {
        Ordering::Less
    } else if average_b > average_a {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

/// Looks up the best-matching library entry for a query's signatures.
///
/// Every query signature is checked against the LSH tables; bucket
/// collisions that recur at least [`MIN_BUCKET_MATCH_FOR_DEEP_CHECK`] times
/// for the same (entry, signature) pair earn a full comparison, and matches
/// scoring at least [`MIN_SCORE`] accumulate into that entry's running
/// total. Only the top [`SEARCH_CANDIDATE_WINDOW`] ranked entries are
/// considered for the final verdict.
pub fn search<'a>(
    sample: &[Signature],
    library: &'a LibraryIndex,
    lsh: &LshIndex,
) -> Result<&'a LibraryEntry> {
    let entries = library.entries();
    let mut scores: Vec<EntryScore> = (0..entries.len())
        .map(|entry_index| EntryScore {
            entry_index,
            score: 0.0,
            n_matches: 0,
        })
        .collect();

    for sample_signature in sample {
        let mut matches = lsh.matches(sample_signature);
        matches.sort_unstable();

        let mut n_identical = 1usize;
        for j in 1..matches.len() {
            if matches[j] == matches[j - 1] {
                n_identical += 1;
            } else {
                if n_identical >= MIN_BUCKET_MATCH_FOR_DEEP_CHECK {
                    let (entry_index, signature_index) = matches[j - 1];
                    let candidate =
                        &entries[entry_index as usize].signatures[signature_index as usize];
                    let score = compare_hashes(candidate, sample_signature);
                    if score >= MIN_SCORE {
                        scores[entry_index as usize].score += score as f32;
                        scores[entry_index as usize].n_matches += 1;
                    }
                }
                n_identical = 1;
            }
        }
    }

    scores.sort_by(compare_entry_scores);

    let mut best_match: Option<usize> = None;
    let mut best_score = 0.0f32;
    for candidate in scores.iter().take(SEARCH_CANDIDATE_WINDOW) {
        let average_score = average(candidate);
        trace!(
            "average_score = {average_score}, n_matches = {} ({})",
            candidate.n_matches,
            entries[candidate.entry_index].filename
        );

        let qualifies = (candidate.n_matches >= MIN_SIGNATURE_MATCHES as i32
            || (average_score >= GOOD_SCORE
                && candidate.n_matches >= (MIN_SIGNATURE_MATCHES / 2) as i32))
            && average_score >= MIN_AVERAGE_SCORE;

        if qualifies && average_score > best_score {
            best_score = average_score;
            best_match = Some(candidate.entry_index);
        }
    }

    best_match
        .map(|i| &entries[i])
        .ok_or(SonoglyphError::NoMatch)
}
