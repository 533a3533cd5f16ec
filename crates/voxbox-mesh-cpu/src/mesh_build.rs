use voxbox_chunk::ChunkCoord;

use crate::face::FaceDef;

/// Triangle mesh of one chunk, positions local to the chunk origin.
#[derive(Default, Clone, Debug, PartialEq)]
pub struct ChunkMesh {
    pub coord: ChunkCoord,
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub colors: Vec<f32>,
    pub index: Vec<u32>,
}

impl ChunkMesh {
    pub fn new(coord: ChunkCoord) -> Self {
        ChunkMesh {
            coord,
            ..Default::default()
        }
    }

    /// Pre-reserve capacity for approximately `n_quads` quads worth of data.
    #[inline]
    pub fn reserve_quads(&mut self, n_quads: usize) {
        self.positions.reserve(n_quads * 4 * 3);
        self.normals.reserve(n_quads * 4 * 3);
        self.colors.reserve(n_quads * 4 * 3);
        self.index.reserve(n_quads * 6);
    }

    /// Appends one unit face of the voxel at local `(x, y, z)`.
    pub fn add_face(&mut self, def: &FaceDef, x: usize, y: usize, z: usize, rgb: [f32; 3]) {
        let n = (self.positions.len() / 3) as u32;
        let normal = def.face.normal();
        for c in def.corners {
            self.positions.extend_from_slice(&[
                (x + c[0] as usize) as f32,
                (y + c[1] as usize) as f32,
                (z + c[2] as usize) as f32,
            ]);
            self.normals
                .extend_from_slice(&[normal.x, normal.y, normal.z]);
            self.colors.extend_from_slice(&rgb);
        }
        self.index
            .extend_from_slice(&[n, n + 1, n + 2, n + 2, n + 1, n + 3]);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.index.len() / 6
    }

    /// World position where the consumer should place this mesh.
    #[inline]
    pub fn origin(&self, chunk_size: usize) -> [f32; 3] {
        let n = chunk_size as i64;
        let c = self.coord;
        [
            (c.cx as i64 * n) as f32,
            (c.cy as i64 * n) as f32,
            (c.cz as i64 * n) as f32,
        ]
    }
}
