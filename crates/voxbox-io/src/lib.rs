//! World persistence: archive container, metadata codec and grid (de)serialization.
#![forbid(unsafe_code)]

mod archive;
mod bytes;
mod error;
mod meta;
mod world;

pub use archive::{ARCHIVE_MAGIC, ARCHIVE_VERSION, Archive, Entry};
pub use error::{LoadError, SaveError};
pub use meta::{MAX_NAME_CHARS, META_MAGIC, META_VERSION, WorldMeta};
pub use world::{META_ENTRY, deserialize, serialize};

use std::path::Path;

use voxbox_chunk::VoxelGrid;

/// Serializes the world straight to a file.
pub fn save_world(path: impl AsRef<Path>, grid: &VoxelGrid, meta: &WorldMeta) -> Result<(), SaveError> {
    serialize(grid, meta).write_to_path(path)
}

/// Reads and decodes a world file.
pub fn load_world(path: impl AsRef<Path>) -> Result<(VoxelGrid, WorldMeta), LoadError> {
    deserialize(&Archive::read_from_path(path)?)
}
