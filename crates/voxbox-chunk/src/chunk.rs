use voxbox_palette::{AIR, MaterialId};

/// Cubic buffer of material ids, `size³` bytes in y-z-x order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    size: usize,
    voxels: Box<[MaterialId]>,
}

impl Chunk {
    pub fn new(size: usize) -> Self {
        Chunk {
            size,
            voxels: vec![AIR; size * size * size].into_boxed_slice(),
        }
    }

    /// Wraps raw bytes; `None` when the length is not `size³`.
    pub fn from_bytes(size: usize, bytes: Vec<u8>) -> Option<Self> {
        if bytes.len() != size * size * size {
            return None;
        }
        Some(Chunk {
            size,
            voxels: bytes.into_boxed_slice(),
        })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        (y * self.size + z) * self.size + x
    }

    #[inline]
    pub fn get_local(&self, x: usize, y: usize, z: usize) -> MaterialId {
        self.voxels[self.idx(x, y, z)]
    }

    #[inline]
    pub fn set_local(&mut self, x: usize, y: usize, z: usize, m: MaterialId) {
        let i = self.idx(x, y, z);
        self.voxels[i] = m;
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.voxels
    }

    #[inline]
    pub fn has_non_air(&self) -> bool {
        self.voxels.iter().any(|&m| m != AIR)
    }

    #[inline]
    pub fn is_all_air(&self) -> bool {
        !self.has_non_air()
    }

    pub fn solid_count(&self) -> usize {
        self.voxels.iter().filter(|&&m| m != AIR).count()
    }
}
