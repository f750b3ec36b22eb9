use std::io::Cursor;

use rand::{Rng, SeedableRng};

use sonoglyph::index::LibraryIndex;
use sonoglyph::lsh::LshIndex;
use sonoglyph::{index_io, pipeline, search};

fn tone(seconds: f32, frequency: f32) -> Vec<f32> {
    let n = (44100.0 * seconds) as usize;
    (0..n)
        .map(|i| 0.7 * (2.0 * std::f32::consts::PI * frequency * i as f32 / 44100.0).sin())
        .collect()
}

fn white_noise(seconds: f32, seed: u64) -> Vec<f32> {
    let n = (44100.0 * seconds) as usize;
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(-0.7..0.7)).collect()
}

/// Mixes white noise at roughly `amplitude` (relative to the [-1, 1] full
/// scale) into `samples`, clamping back into range.
fn with_noise(samples: &[f32], amplitude: f32, seed: u64) -> Vec<f32> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    samples
        .iter()
        .map(|&s| (s + rng.gen_range(-amplitude..amplitude)).clamp(-1.0, 1.0))
        .collect()
}

#[test]
fn index_round_trips_through_text_format() {
    pipeline::init();
    let samples = tone(3.0, 440.0);
    let signatures = pipeline::fingerprint(&samples).unwrap();
    assert!(!signatures.is_empty());

    let mut buf = Vec::new();
    index_io::write_entry(
        &mut buf,
        "440hz.wav",
        Some("Test Artist"),
        Some("Test Title"),
        None,
        &signatures,
    )
    .unwrap();

    let entries = index_io::read_all(Cursor::new(buf)).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].filename, "440hz.wav");
    assert_eq!(entries[0].artist.as_deref(), Some("Test Artist"));
    assert_eq!(entries[0].title.as_deref(), Some("Test Title"));
    assert_eq!(entries[0].album, None);
    assert_eq!(entries[0].signatures, signatures);
}

#[test]
fn a_fingerprinted_track_finds_itself_in_a_singleton_index() {
    pipeline::init();
    let samples = tone(3.0, 880.0);
    let signatures = pipeline::fingerprint(&samples).unwrap();
    assert!(!signatures.is_empty());

    let mut buf = Vec::new();
    index_io::write_entry(&mut buf, "880hz.wav", None, None, None, &signatures).unwrap();
    let entries = index_io::read_all(Cursor::new(buf)).unwrap();

    let library = LibraryIndex::from_entries(entries);
    let lsh = LshIndex::build(&library);

    let found = search::search(&signatures, &library, &lsh).unwrap();
    assert_eq!(found.filename, "880hz.wav");
}

#[test]
fn an_unrelated_track_does_not_match_an_unrelated_index() {
    pipeline::init();
    let indexed = pipeline::fingerprint(&tone(3.0, 220.0)).unwrap();
    let query = pipeline::fingerprint(&tone(3.0, 2500.0)).unwrap();

    let mut buf = Vec::new();
    index_io::write_entry(&mut buf, "220hz.wav", None, None, None, &indexed).unwrap();
    let entries = index_io::read_all(Cursor::new(buf)).unwrap();

    let library = LibraryIndex::from_entries(entries);
    let lsh = LshIndex::build(&library);

    let result = search::search(&query, &library, &lsh);
    assert!(result.is_err());
}

#[test]
fn a_noisy_clip_of_an_indexed_track_still_matches_it() {
    pipeline::init();
    let clean = tone(5.0, 440.0);
    let indexed = pipeline::fingerprint(&clean).unwrap();
    assert!(!indexed.is_empty());

    let mut buf = Vec::new();
    index_io::write_entry(&mut buf, "440hz.wav", None, None, None, &indexed).unwrap();
    let entries = index_io::read_all(Cursor::new(buf)).unwrap();

    let library = LibraryIndex::from_entries(entries);
    let lsh = LshIndex::build(&library);

    // White noise at -20dB relative to the tone's 0.7 amplitude:
    // 10^(-20/20) == 0.1, so the noise amplitude is 0.07.
    let noisy = with_noise(&clean, 0.7 * 0.1, 0xA11CE);
    let query = pipeline::fingerprint(&noisy).unwrap();

    let found = search::search(&query, &library, &lsh).unwrap();
    assert_eq!(found.filename, "440hz.wav");
}

#[test]
fn synthesized_noise_does_not_match_a_tonal_index() {
    pipeline::init();
    let a = pipeline::fingerprint(&tone(3.0, 330.0)).unwrap();
    let b = pipeline::fingerprint(&tone(3.0, 660.0)).unwrap();
    let c = pipeline::fingerprint(&tone(3.0, 990.0)).unwrap();

    let mut buf = Vec::new();
    index_io::write_entry(&mut buf, "a.wav", None, None, None, &a).unwrap();
    index_io::write_entry(&mut buf, "b.wav", None, None, None, &b).unwrap();
    index_io::write_entry(&mut buf, "c.wav", None, None, None, &c).unwrap();
    let entries = index_io::read_all(Cursor::new(buf)).unwrap();

    let library = LibraryIndex::from_entries(entries);
    let lsh = LshIndex::build(&library);

    let noise = white_noise(3.0, 0xC0FFEE);
    let query = pipeline::fingerprint(&noise).unwrap();

    let result = search::search(&query, &library, &lsh);
    assert!(result.is_err());
}
