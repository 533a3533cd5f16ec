//! World session: grid, metadata, editor and the per-chunk mesh cache kept in sync.
#![forbid(unsafe_code)]

use std::path::Path;
use std::time::Instant;

use hashbrown::HashMap;
use rayon::prelude::*;
use voxbox_chunk::{ChunkCoord, GridError, MaterialId, VoxelGrid};
use voxbox_edit::{Edit, EditorSession};
use voxbox_io::{Archive, LoadError, SaveError, WorldMeta};
use voxbox_mesh_cpu::{ChunkMesh, build_chunk_mesh};
use voxbox_palette::Palette;

/// What a single chunk rebuild did to the mesh cache and the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RebuildOutcome {
    /// A mesh with this many faces is now cached.
    Meshed(usize),
    /// Nothing visible, but the chunk still holds enclosed solid voxels.
    Hidden,
    /// Nothing visible and nothing solid; the chunk left the grid.
    Removed,
    /// The chunk does not exist.
    Absent,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub chunks: usize,
    pub meshed: usize,
    pub removed: usize,
    pub t_load_ms: u32,
    pub t_mesh_ms: u32,
}

pub struct WorldSession {
    grid: VoxelGrid,
    meta: WorldMeta,
    palette: Palette,
    editor: EditorSession,
    meshes: HashMap<ChunkCoord, ChunkMesh>,
}

impl WorldSession {
    pub fn new(chunk_size: usize, palette: Palette) -> Result<Self, GridError> {
        Ok(Self::from_parts(VoxelGrid::new(chunk_size)?, WorldMeta::default(), palette))
    }

    /// Wraps an existing world and meshes every chunk.
    pub fn from_parts(grid: VoxelGrid, meta: WorldMeta, palette: Palette) -> Self {
        let mut s = WorldSession {
            grid,
            meta,
            palette,
            editor: EditorSession::new(),
            meshes: HashMap::new(),
        };
        s.rebuild_all();
        s
    }

    #[inline]
    pub fn grid(&self) -> &VoxelGrid {
        &self.grid
    }

    #[inline]
    pub fn meta(&self) -> &WorldMeta {
        &self.meta
    }

    #[inline]
    pub fn meta_mut(&mut self) -> &mut WorldMeta {
        &mut self.meta
    }

    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    #[inline]
    pub fn editor(&self) -> &EditorSession {
        &self.editor
    }

    #[inline]
    pub fn editor_mut(&mut self) -> &mut EditorSession {
        &mut self.editor
    }

    pub fn mesh(&self, coord: ChunkCoord) -> Option<&ChunkMesh> {
        self.meshes.get(&coord)
    }

    pub fn meshes(&self) -> impl Iterator<Item = &ChunkMesh> {
        self.meshes.values()
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn total_faces(&self) -> usize {
        self.meshes.values().map(ChunkMesh::face_count).sum()
    }

    /// Applies the editor's current selection and mode at the target cell.
    pub fn edit_at(&mut self, x: i32, y: i32, z: i32) -> Vec<ChunkCoord> {
        let edit = self.editor.edit_at(x, y, z);
        self.apply_edit(edit)
    }

    pub fn set_voxel(&mut self, x: i32, y: i32, z: i32, m: MaterialId) -> Vec<ChunkCoord> {
        self.apply_edit(Edit::voxel(x, y, z, m))
    }

    pub fn set_block(&mut self, x: i32, y: i32, z: i32, m: MaterialId) -> Vec<ChunkCoord> {
        self.apply_edit(Edit::block(x, y, z, m))
    }

    /// Writes `edit`, then rebuilds exactly the chunks it can have changed.
    pub fn apply_edit(&mut self, edit: Edit) -> Vec<ChunkCoord> {
        edit.apply(&mut self.grid);
        let affected = edit.affected_chunks(&self.grid);
        for &coord in &affected {
            self.rebuild_chunk(coord);
        }
        log::debug!(
            "edit {:?} x{} -> material {}: {} chunks rebuilt",
            edit.origin,
            edit.extent,
            edit.material,
            affected.len()
        );
        affected
    }

    /// Re-meshes one chunk; an empty mesh drops the cached one and, if the chunk holds
    /// no solid voxel, the chunk itself.
    pub fn rebuild_chunk(&mut self, coord: ChunkCoord) -> RebuildOutcome {
        if !self.grid.contains_chunk(coord) {
            self.meshes.remove(&coord);
            return RebuildOutcome::Absent;
        }
        let mesh = build_chunk_mesh(&self.grid, &self.palette, coord);
        self.store_mesh(mesh)
    }

    fn store_mesh(&mut self, mesh: ChunkMesh) -> RebuildOutcome {
        let coord = mesh.coord;
        if mesh.is_empty() {
            self.meshes.remove(&coord);
            if self.grid.remove_chunk_if_empty(coord) {
                RebuildOutcome::Removed
            } else {
                RebuildOutcome::Hidden
            }
        } else {
            let faces = mesh.face_count();
            self.meshes.insert(coord, mesh);
            RebuildOutcome::Meshed(faces)
        }
    }

    /// Drops every mesh and rebuilds all populated chunks in parallel.
    pub fn rebuild_all(&mut self) -> (usize, usize) {
        self.meshes.clear();
        let coords = self.grid.sorted_coords();
        let grid = &self.grid;
        let palette = &self.palette;
        let built: Vec<ChunkMesh> = coords
            .par_iter()
            .map(|&c| build_chunk_mesh(grid, palette, c))
            .collect();
        let (mut meshed, mut removed) = (0, 0);
        for mesh in built {
            match self.store_mesh(mesh) {
                RebuildOutcome::Meshed(_) => meshed += 1,
                RebuildOutcome::Removed => removed += 1,
                _ => {}
            }
        }
        (meshed, removed)
    }

    /// Replaces the world with the archive's. On error the current world is untouched.
    pub fn load_archive(&mut self, archive: &Archive) -> Result<LoadSummary, LoadError> {
        let t0 = Instant::now();
        let (grid, meta) = voxbox_io::deserialize(archive)?;
        let t_load_ms = t0.elapsed().as_millis() as u32;
        self.grid = grid;
        self.meta = meta;
        let chunks = self.grid.len();
        let t1 = Instant::now();
        let (meshed, removed) = self.rebuild_all();
        let summary = LoadSummary {
            chunks,
            meshed,
            removed,
            t_load_ms,
            t_mesh_ms: t1.elapsed().as_millis() as u32,
        };
        log::info!(
            "world {:?} ready: {} chunks, {} meshed, {} removed (load {}ms, mesh {}ms)",
            self.meta.name(),
            summary.chunks,
            summary.meshed,
            summary.removed,
            summary.t_load_ms,
            summary.t_mesh_ms
        );
        Ok(summary)
    }

    pub fn load_path(&mut self, path: impl AsRef<Path>) -> Result<LoadSummary, LoadError> {
        let archive = Archive::read_from_path(path)?;
        self.load_archive(&archive)
    }

    pub fn save_archive(&self) -> Archive {
        voxbox_io::serialize(&self.grid, &self.meta)
    }

    pub fn save_path(&self, path: impl AsRef<Path>) -> Result<(), SaveError> {
        self.save_archive().write_to_path(path)
    }

    /// Empties the world; metadata and editor state are kept.
    pub fn clear_all(&mut self) {
        log::info!(
            "clearing {} chunks and {} meshes",
            self.grid.len(),
            self.meshes.len()
        );
        self.meshes.clear();
        self.grid.clear();
    }
}
