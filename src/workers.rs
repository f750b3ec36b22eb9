//! Fixed-size worker pool and disjoint-range fan-out used by every
//! parallelized pipeline stage (framing/FFT, spectral-image scaling, Haar
//! transform, raw-fingerprint extraction).
//!
//! Workers never share mutable state: each one is handed a disjoint index
//! range and writes to a disjoint slice of an output buffer, generalizing a
//! `par_iter().map(...).collect()` style into explicit range assignment so
//! the scheduling model matches a "fixed pool size, no shared mutable
//! state" contract. If there isn't
//! enough work to justify the pool (fewer than twice as many items as
//! workers), the stage runs on the calling thread instead; failing to
//! parallelize is never a correctness issue.

use std::sync::OnceLock;

use rayon::prelude::*;
use rayon::ThreadPool;

use crate::config::WORKER_POOL_SIZE;

fn pool() -> &'static ThreadPool {
    static POOL: OnceLock<ThreadPool> = OnceLock::new();
    POOL.get_or_init(|| {
        rayon::ThreadPoolBuilder::new()
            .num_threads(WORKER_POOL_SIZE)
            .thread_name(|i| format!("sonoglyph-worker-{i}"))
            .build()
            .expect("failed to build worker pool")
    })
}

/// Splits `0..n` into up to `WORKER_POOL_SIZE` contiguous, disjoint ranges.
pub fn chunk_ranges(n: usize) -> Vec<(usize, usize)> {
    if n == 0 {
        return Vec::new();
    }
    let workers = WORKER_POOL_SIZE.min(n);
    let chunk = n.div_ceil(workers);
    (0..n)
        .step_by(chunk)
        .map(|start| (start, (start + chunk).min(n)))
        .collect()
}

/// Runs `body(start, end)` over disjoint ranges covering `0..n`, in
/// parallel on the shared worker pool when there's enough work to justify
/// it, otherwise sequentially on the calling thread.
pub fn for_each_range<F>(n: usize, body: F)
where
    F: Fn(usize, usize) + Sync,
{
    if n == 0 {
        return;
    }
    let ranges = chunk_ranges(n);
    if n < 2 * WORKER_POOL_SIZE {
        for (start, end) in ranges {
            body(start, end);
        }
        return;
    }
    pool().install(|| {
        ranges.par_iter().for_each(|&(start, end)| {
            body(start, end);
        });
    });
}

/// Splits `items` into disjoint mutable chunks and runs `body(start_index,
/// chunk)` over them, in parallel when there's enough work, sequentially
/// otherwise. This is the shape every array-producing pipeline stage
/// (framing, spectral-image scaling, Haar transform, raw-fingerprint
/// extraction) uses: each worker only ever touches the slice it was handed.
pub fn process_chunks_mut<T, F>(items: &mut [T], body: F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Sync,
{
    let n = items.len();
    if n == 0 {
        return;
    }
    let ranges = chunk_ranges(n);
    let mut remaining = items;
    let mut chunks = Vec::with_capacity(ranges.len());
    for &(start, end) in &ranges {
        let (head, tail) = remaining.split_at_mut(end - start);
        chunks.push((start, head));
        remaining = tail;
    }

    if n < 2 * WORKER_POOL_SIZE {
        for (start, chunk) in chunks {
            body(start, chunk);
        }
        return;
    }

    pool().install(|| {
        chunks.into_par_iter().for_each(|(start, chunk)| {
            body(start, chunk);
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn chunk_ranges_cover_everything_disjointly() {
        for n in [0, 1, 7, 100, 1000] {
            let ranges = chunk_ranges(n);
            let mut covered = vec![false; n];
            for (start, end) in ranges {
                assert!(start <= end);
                for slot in covered.iter_mut().take(end).skip(start) {
                    assert!(!*slot, "range overlap at index covered twice");
                    *slot = true;
                }
            }
            assert!(covered.iter().all(|&c| c), "n={n} not fully covered");
        }
    }

    #[test]
    fn for_each_range_visits_every_index_exactly_once() {
        let n = 5000;
        let counts: Vec<AtomicUsize> = (0..n).map(|_| AtomicUsize::new(0)).collect();
        for_each_range(n, |start, end| {
            for i in start..end {
                counts[i].fetch_add(1, Ordering::SeqCst);
            }
        });
        assert!(counts.iter().all(|c| c.load(Ordering::SeqCst) == 1));
    }

    #[test]
    fn process_chunks_mut_visits_every_element_exactly_once() {
        let mut items = vec![0u32; 5000];
        process_chunks_mut(&mut items, |start, chunk| {
            for (i, slot) in chunk.iter_mut().enumerate() {
                *slot = (start + i) as u32;
            }
        });
        for (i, &v) in items.iter().enumerate() {
            assert_eq!(v, i as u32);
        }
    }

    #[test]
    fn small_workload_runs_without_panicking() {
        let n = 3;
        let counts: Vec<AtomicUsize> = (0..n).map(|_| AtomicUsize::new(0)).collect();
        for_each_range(n, |start, end| {
            for i in start..end {
                counts[i].fetch_add(1, Ordering::SeqCst);
            }
        });
        assert!(counts.iter().all(|c| c.load(Ordering::SeqCst) == 1));
    }
}
