//! Reads and writes the line-oriented, UTF-8 text index format.
//!
//! Each entry is exactly 5 + K lines: filename, artist (possibly empty),
//! title, album, K (decimal), then K lines each of exactly 200 lowercase
//! hex digits encoding the 100 bytes of one signature. Entries are
//! concatenated without separators; EOF between entries ends the file
//! cleanly.

use std::io::{BufRead, Write};

use crate::config::SIGNATURE_LENGTH;
use crate::error::{Result, SonoglyphError};
use crate::index::LibraryEntry;
use crate::minhash::Signature;

fn malformed(msg: impl Into<String>) -> SonoglyphError {
    SonoglyphError::InputMalformed(msg.into())
}

/// Writes one index entry in the canonical text format.
pub fn write_entry<W: Write>(
    w: &mut W,
    filename: &str,
    artist: Option<&str>,
    title: Option<&str>,
    album: Option<&str>,
    signatures: &[Signature],
) -> std::io::Result<()> {
    writeln!(w, "{filename}")?;
    writeln!(w, "{}", artist.unwrap_or(""))?;
    writeln!(w, "{}", title.unwrap_or(""))?;
    writeln!(w, "{}", album.unwrap_or(""))?;
    writeln!(w, "{}", signatures.len())?;
    for signature in signatures {
        for byte in signature {
            write!(w, "{byte:02x}")?;
        }
        writeln!(w)?;
    }
    Ok(())
}

fn empty_to_none(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

fn parse_signature(line: &str) -> Result<Signature> {
    if line.len() != 2 * SIGNATURE_LENGTH {
        return Err(malformed(format!(
            "expected {} hex digits for a signature, got {}",
            2 * SIGNATURE_LENGTH,
            line.len()
        )));
    }
    let mut signature = [0u8; SIGNATURE_LENGTH];
    for (i, slot) in signature.iter_mut().enumerate() {
        let byte_str = &line[2 * i..2 * i + 2];
        *slot = u8::from_str_radix(byte_str, 16)
            .map_err(|_| malformed(format!("invalid hex digits '{byte_str}' in signature")))?;
    }
    Ok(signature)
}

/// Streams entries out of an index file one at a time, so a truncated or
/// malformed entry deep in a large file fails as soon as it's reached
/// instead of after buffering the whole file.
pub struct IndexReader<R: BufRead> {
    reader: R,
    line_no: usize,
}

impl<R: BufRead> IndexReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, line_no: 0 }
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut buf = String::new();
        let n = self
            .reader
            .read_line(&mut buf)
            .map_err(|e| malformed(format!("I/O error reading index: {e}")))?;
        if n == 0 {
            return Ok(None);
        }
        self.line_no += 1;
        if buf.ends_with('\n') {
            buf.pop();
            if buf.ends_with('\r') {
                buf.pop();
            }
        } else {
            return Err(malformed(format!(
                "line {} is not newline-terminated (truncated file?)",
                self.line_no
            )));
        }
        Ok(Some(buf))
    }

    fn read_required_line(&mut self) -> Result<String> {
        self.read_line()?.ok_or_else(|| {
            malformed(format!(
                "unexpected end of file after line {}",
                self.line_no
            ))
        })
    }

    /// Reads the next entry, or `Ok(None)` at a clean EOF between entries.
    pub fn read_entry(&mut self) -> Result<Option<LibraryEntry>> {
        let filename = match self.read_line()? {
            Some(f) => f,
            None => return Ok(None),
        };

        let artist = empty_to_none(self.read_required_line()?);
        let title = empty_to_none(self.read_required_line()?);
        let album = empty_to_none(self.read_required_line()?);

        let count_line = self.read_required_line()?;
        let count: usize = count_line
            .trim()
            .parse()
            .map_err(|_| malformed(format!("invalid signature count '{count_line}'")))?;

        let mut signatures = Vec::with_capacity(count);
        for _ in 0..count {
            let line = self.read_required_line()?;
            signatures.push(parse_signature(&line)?);
        }

        Ok(Some(LibraryEntry {
            filename,
            artist,
            title,
            album,
            signatures,
        }))
    }
}

/// Reads every entry out of `reader`, stopping at EOF.
pub fn read_all<R: BufRead>(reader: R) -> Result<Vec<LibraryEntry>> {
    let mut index_reader = IndexReader::new(reader);
    let mut entries = Vec::new();
    while let Some(entry) = index_reader.read_entry()? {
        entries.push(entry);
    }
    Ok(entries)
}
