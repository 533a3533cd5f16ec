use hashbrown::HashMap;
use thiserror::Error;
use voxbox_palette::{AIR, MaterialId};

use crate::chunk::Chunk;
use crate::coord::ChunkCoord;

pub const CHUNK_SIZE: usize = 32;
/// Edge of a placeable block, in voxels.
pub const BLOCK_SIZE: i32 = 8;
pub const MAX_CHUNK_SIZE: usize = 256;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("chunk size {0} must be a power of two in 1..=256")]
    InvalidChunkSize(usize),
    #[error("chunk {coord} has {got} bytes, expected {expected}")]
    ChunkSizeMismatch {
        coord: ChunkCoord,
        got: usize,
        expected: usize,
    },
    #[error("chunk {0} lies outside the i32 voxel range")]
    ChunkOutOfRange(ChunkCoord),
}

/// Sparse chunked voxel storage. Absent chunks read as air.
#[derive(Clone, Debug)]
pub struct VoxelGrid {
    size: i32,
    chunks: HashMap<ChunkCoord, Chunk>,
}

impl Default for VoxelGrid {
    fn default() -> Self {
        VoxelGrid {
            size: CHUNK_SIZE as i32,
            chunks: HashMap::new(),
        }
    }
}

impl VoxelGrid {
    pub fn new(chunk_size: usize) -> Result<Self, GridError> {
        if !chunk_size.is_power_of_two() || chunk_size > MAX_CHUNK_SIZE {
            return Err(GridError::InvalidChunkSize(chunk_size));
        }
        Ok(VoxelGrid {
            size: chunk_size as i32,
            chunks: HashMap::new(),
        })
    }

    #[inline]
    pub fn chunk_size(&self) -> usize {
        self.size as usize
    }

    #[inline]
    pub fn chunk_coord_of(&self, x: i32, y: i32, z: i32) -> ChunkCoord {
        ChunkCoord::new(
            x.div_euclid(self.size),
            y.div_euclid(self.size),
            z.div_euclid(self.size),
        )
    }

    /// Local cell inside the owning chunk, always in `0..size`.
    #[inline]
    pub fn local_of(&self, x: i32, y: i32, z: i32) -> (usize, usize, usize) {
        (
            x.rem_euclid(self.size) as usize,
            y.rem_euclid(self.size) as usize,
            z.rem_euclid(self.size) as usize,
        )
    }

    /// Packed index of `(x, y, z)` inside its chunk buffer.
    #[inline]
    pub fn local_offset_of(&self, x: i32, y: i32, z: i32) -> usize {
        let (lx, ly, lz) = self.local_of(x, y, z);
        let n = self.size as usize;
        (ly * n + lz) * n + lx
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> MaterialId {
        match self.chunks.get(&self.chunk_coord_of(x, y, z)) {
            Some(chunk) => {
                let (lx, ly, lz) = self.local_of(x, y, z);
                chunk.get_local(lx, ly, lz)
            }
            None => AIR,
        }
    }

    #[inline]
    pub fn is_solid(&self, x: i32, y: i32, z: i32) -> bool {
        self.get(x, y, z) != AIR
    }

    /// Writes one voxel, allocating the owning chunk on first non-air write.
    pub fn set(&mut self, x: i32, y: i32, z: i32, m: MaterialId) {
        let coord = self.chunk_coord_of(x, y, z);
        let (lx, ly, lz) = self.local_of(x, y, z);
        if m == AIR {
            // Clearing inside a missing chunk changes nothing.
            if let Some(chunk) = self.chunks.get_mut(&coord) {
                chunk.set_local(lx, ly, lz, AIR);
            }
            return;
        }
        let size = self.chunk_size();
        self.chunks
            .entry(coord)
            .or_insert_with(|| {
                log::trace!("allocating chunk {coord}");
                Chunk::new(size)
            })
            .set_local(lx, ly, lz, m);
    }

    /// Fills the aligned `BLOCK_SIZE³` block containing `(x, y, z)` and returns its origin.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, m: MaterialId) -> (i32, i32, i32) {
        let (bx, by, bz) = block_origin_of(x, y, z);
        for dy in 0..BLOCK_SIZE {
            for dz in 0..BLOCK_SIZE {
                for dx in 0..BLOCK_SIZE {
                    self.set(bx + dx, by + dy, bz + dz, m);
                }
            }
        }
        (bx, by, bz)
    }

    /// Drops `coord` if it holds no solid voxel. Called after its mesh came out empty.
    pub fn remove_chunk_if_empty(&mut self, coord: ChunkCoord) -> bool {
        match self.chunks.get(&coord) {
            Some(chunk) if chunk.is_all_air() => {
                self.chunks.remove(&coord);
                log::debug!("removed empty chunk {coord}");
                true
            }
            _ => false,
        }
    }

    /// Whether `coord` can hold voxels at all; every chunk made by `set` does.
    #[inline]
    pub fn coord_fits(&self, coord: ChunkCoord) -> bool {
        coord.fits(self.size)
    }

    /// Places a whole chunk buffer; used by the archive loader.
    pub fn insert_chunk(&mut self, coord: ChunkCoord, chunk: Chunk) -> Result<(), GridError> {
        if !self.coord_fits(coord) {
            return Err(GridError::ChunkOutOfRange(coord));
        }
        if chunk.size() != self.chunk_size() {
            let n = self.chunk_size();
            return Err(GridError::ChunkSizeMismatch {
                coord,
                got: chunk.as_bytes().len(),
                expected: n * n * n,
            });
        }
        self.chunks.insert(coord, chunk);
        Ok(())
    }

    #[inline]
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    #[inline]
    pub fn contains_chunk(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    pub fn chunks(&self) -> impl Iterator<Item = (ChunkCoord, &Chunk)> {
        self.chunks.iter().map(|(c, ch)| (*c, ch))
    }

    /// Chunk coordinates in ascending order.
    pub fn sorted_coords(&self) -> Vec<ChunkCoord> {
        let mut v: Vec<ChunkCoord> = self.chunks.keys().copied().collect();
        v.sort_unstable();
        v
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn clear(&mut self) {
        self.chunks.clear();
    }

    pub fn solid_count(&self) -> usize {
        self.chunks.values().map(Chunk::solid_count).sum()
    }
}

/// Minimum corner of the aligned block that contains `(x, y, z)`.
#[inline]
pub fn block_origin_of(x: i32, y: i32, z: i32) -> (i32, i32, i32) {
    (
        x.div_euclid(BLOCK_SIZE) * BLOCK_SIZE,
        y.div_euclid(BLOCK_SIZE) * BLOCK_SIZE,
        z.div_euclid(BLOCK_SIZE) * BLOCK_SIZE,
    )
}
