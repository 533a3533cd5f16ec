//! Sparse chunked voxel grid.
#![forbid(unsafe_code)]

mod chunk;
mod coord;
mod grid;

pub use chunk::Chunk;
pub use coord::{ChunkCoord, ParseChunkKeyError};
pub use grid::{BLOCK_SIZE, CHUNK_SIZE, GridError, MAX_CHUNK_SIZE, VoxelGrid, block_origin_of};
pub use voxbox_palette::{AIR, MaterialId};
