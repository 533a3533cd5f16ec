use std::io;

use thiserror::Error;
use voxbox_chunk::{GridError, ParseChunkKeyError};

/// Everything that can make a world load fail. A failed load never yields a partial grid.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("not a voxbox archive")]
    BadArchiveMagic,
    #[error("unsupported archive version {0}")]
    ArchiveVersion(u8),
    #[error("truncated {what} at byte {at}")]
    Truncated { what: &'static str, at: usize },
    #[error("{count} trailing bytes after the {what}")]
    TrailingBytes { what: &'static str, count: usize },
    #[error("archive entry name is not UTF-8")]
    BadEntryName,
    #[error("duplicate archive entry {0:?}")]
    DuplicateEntry(String),
    #[error(transparent)]
    ChunkKey(#[from] ParseChunkKeyError),
    #[error("chunk key {0:?} is not in canonical form")]
    NonCanonicalKey(String),
    #[error("chunk {0} lies outside the i32 voxel range")]
    ChunkOutOfRange(String),
    #[error("chunk {key} holds {got} bytes, expected {expected}")]
    ChunkLength {
        key: String,
        got: usize,
        expected: usize,
    },
    #[error("world metadata missing")]
    MissingMeta,
    #[error("bad world metadata magic")]
    BadMetaMagic,
    #[error("unsupported world metadata version {0}")]
    MetaVersion(u8),
    #[error("bad spawn flag {0}")]
    BadSpawnFlag(u8),
    #[error("world name is not UTF-8")]
    BadName,
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Failures while writing an archive.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("entry {name:?} is too large for the archive format ({len} bytes)")]
    EntryTooLarge { name: String, len: usize },
    #[error("archive holds too many entries ({0})")]
    TooManyEntries(usize),
}
