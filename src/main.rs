use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::{error, info};

use sonoglyph::error::SonoglyphError;
use sonoglyph::index::LibraryIndex;
use sonoglyph::{index_io, lsh, pipeline, search, wav, Result};

#[derive(Parser)]
#[command(name = "sonoglyph", about = "Audio fingerprinting and identification")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fingerprints a WAV file and prints its index-format entry to stdout.
    Index {
        /// WAV file to fingerprint (44100 Hz, 16-bit PCM, mono or stereo).
        input: PathBuf,
    },
    /// Fingerprints a WAV file and looks it up in an existing index.
    Search {
        /// WAV file to identify.
        input: PathBuf,
        /// Index file to search.
        index: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    pipeline::init();

    let result = match cli.command {
        Command::Index { input } => run_index(&input),
        Command::Search { input, index } => run_search(&input, &index),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(SonoglyphError::NoMatch) => {
            println!("No match found");
            ExitCode::FAILURE
        }
        Err(err) => {
            error!("{err}");
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run_index(input: &Path) -> Result<()> {
    let decoded = wav::load(input)?;
    let signatures = pipeline::fingerprint(&decoded.samples)?;
    info!(
        "fingerprinted {} ({} signatures)",
        input.display(),
        signatures.len()
    );

    let stdout = std::io::stdout();
    index_io::write_entry(
        &mut stdout.lock(),
        &input.display().to_string(),
        decoded.metadata.artist.as_deref(),
        decoded.metadata.title.as_deref(),
        decoded.metadata.album.as_deref(),
        &signatures,
    )
    .map_err(|e| SonoglyphError::ResourceExhausted(format!("failed to write index entry: {e}")))?;

    Ok(())
}

fn run_search(input: &Path, index_path: &Path) -> Result<()> {
    let decoded = wav::load(input)?;
    let signatures = pipeline::fingerprint(&decoded.samples)?;
    info!("fingerprinted {} ({} signatures)", input.display(), signatures.len());

    let file = std::fs::File::open(index_path).map_err(|source| SonoglyphError::InputAbsent {
        path: index_path.display().to_string(),
        source,
    })?;
    let entries = index_io::read_all(std::io::BufReader::new(file))?;
    info!("loaded {} index entries", entries.len());

    let library = LibraryIndex::from_entries(entries);
    let lsh = lsh::LshIndex::build(&library);

    let found = search::search(&signatures, &library, &lsh)?;
    println!("{}", found.filename);
    if let Some(artist) = &found.artist {
        println!("artist: {artist}");
    }
    if let Some(title) = &found.title {
        println!("title: {title}");
    }
    if let Some(album) = &found.album {
        println!("album: {album}");
    }
    Ok(())
}
