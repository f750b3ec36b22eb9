//! JSON debug dump of a library index, for tooling and test fixtures. This
//! is explicitly not the canonical on-disk format (see `index_io`); it
//! exists so a signature set can be inspected or diffed with `jq` during
//! development.

use serde::Serialize;

use crate::index::LibraryIndex;
use crate::minhash::Signature;

#[derive(Serialize)]
struct EntryDump<'a> {
    filename: &'a str,
    artist: &'a Option<String>,
    title: &'a Option<String>,
    album: &'a Option<String>,
    signatures: Vec<String>,
}

fn hex_signature(signature: &Signature) -> String {
    signature.iter().map(|b| format!("{b:02x}")).collect()
}

/// Renders every entry of `library` as pretty-printed JSON.
pub fn dump(library: &LibraryIndex) -> serde_json::Result<String> {
    let dumps: Vec<EntryDump> = library
        .entries()
        .iter()
        .map(|e| EntryDump {
            filename: &e.filename,
            artist: &e.artist,
            title: &e.title,
            album: &e.album,
            signatures: e.signatures.iter().map(hex_signature).collect(),
        })
        .collect();
    serde_json::to_string_pretty(&dumps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::LibraryEntry;

    #[test]
    fn dump_is_valid_json_containing_filenames() {
        let library = LibraryIndex::from_entries(vec![LibraryEntry {
            filename: "song.wav".into(),
            artist: Some("Artist".into()),
            title: None,
            album: None,
            signatures: vec![[0xab; crate::config::SIGNATURE_LENGTH]],
        }]);
        let json = dump(&library).unwrap();
        assert!(json.contains("song.wav"));
        assert!(json.contains("Artist"));
        assert!(json.contains("abababab"));
    }

    #[test]
    fn empty_library_dumps_to_empty_array() {
        let library = LibraryIndex::default();
        let json = dump(&library).unwrap();
        assert_eq!(json.trim(), "[]");
    }
}
