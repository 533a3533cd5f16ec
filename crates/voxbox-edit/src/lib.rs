//! Editor state (palette slots, eraser, voxel/block mode) and edit invalidation.
#![forbid(unsafe_code)]

use thiserror::Error;
use voxbox_chunk::{BLOCK_SIZE, ChunkCoord, MaterialId, VoxelGrid, block_origin_of};
use voxbox_palette::AIR;

pub const SLOT_COUNT: usize = 8;
pub const DEFAULT_SLOTS: [MaterialId; SLOT_COUNT] = [1, 23, 5, 7, 9, 14, 19, 29];
/// Index passed to [`EditorSession::select`] to pick the eraser.
pub const ERASER_INDEX: i32 = -1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("invalid selection: {0}")]
    InvalidSelection(SelectionFault),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionFault {
    #[error("slot {0} is outside -1..=7")]
    Slot(i32),
    #[error("material {0} is outside 1..=255")]
    Material(i32),
    #[error("the eraser has no palette slot")]
    Eraser,
}

impl From<SelectionFault> for EditError {
    fn from(f: SelectionFault) -> Self {
        EditError::InvalidSelection(f)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    Slot(usize),
    Eraser,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EditMode {
    #[default]
    Voxel,
    Block,
}

impl EditMode {
    /// Edge length in voxels of one edit in this mode.
    #[inline]
    pub fn extent(self) -> i32 {
        match self {
            EditMode::Voxel => 1,
            EditMode::Block => BLOCK_SIZE,
        }
    }
}

/// One pending write: a cube of `extent³` voxels at `origin` set to `material`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edit {
    pub origin: (i32, i32, i32),
    pub extent: i32,
    pub material: MaterialId,
}

impl Edit {
    pub fn voxel(x: i32, y: i32, z: i32, material: MaterialId) -> Self {
        Edit {
            origin: (x, y, z),
            extent: 1,
            material,
        }
    }

    pub fn block(x: i32, y: i32, z: i32, material: MaterialId) -> Self {
        Edit {
            origin: block_origin_of(x, y, z),
            extent: BLOCK_SIZE,
            material,
        }
    }

    pub fn apply(&self, grid: &mut VoxelGrid) {
        let (x, y, z) = self.origin;
        if self.extent == BLOCK_SIZE {
            grid.set_block(x, y, z, self.material);
            return;
        }
        for dy in 0..self.extent {
            for dz in 0..self.extent {
                for dx in 0..self.extent {
                    if let (Some(wx), Some(wy), Some(wz)) =
                        (x.checked_add(dx), y.checked_add(dy), z.checked_add(dz))
                    {
                        grid.set(wx, wy, wz, self.material);
                    }
                }
            }
        }
    }

    /// Chunks whose visible faces this edit can change, sorted and deduplicated.
    pub fn affected_chunks(&self, grid: &VoxelGrid) -> Vec<ChunkCoord> {
        affected_chunks(grid, self.origin, self.extent)
    }
}

/// Chunks owning any voxel of the `extent³` cube at `min` or any face neighbour of it.
///
/// Face culling only reads the six direct neighbours, so the set is the cube itself plus
/// the six one-voxel slabs on its faces; diagonal corners are never included. Slabs past
/// the end of the `i32` range hold nothing and are skipped.
pub fn affected_chunks(grid: &VoxelGrid, min: (i32, i32, i32), extent: i32) -> Vec<ChunkCoord> {
    let (x0, y0, z0) = min;
    let span = extent.max(1) - 1;
    let (x1, y1, z1) = (
        x0.saturating_add(span),
        y0.saturating_add(span),
        z0.saturating_add(span),
    );
    let before = |v: i32| v.checked_sub(1);
    let after = |v: i32| v.checked_add(1);
    let boxes = [
        Some(((x0, y0, z0), (x1, y1, z1))),
        before(x0).map(|x| ((x, y0, z0), (x, y1, z1))),
        after(x1).map(|x| ((x, y0, z0), (x, y1, z1))),
        before(y0).map(|y| ((x0, y, z0), (x1, y, z1))),
        after(y1).map(|y| ((x0, y, z0), (x1, y, z1))),
        before(z0).map(|z| ((x0, y0, z), (x1, y1, z))),
        after(z1).map(|z| ((x0, y0, z), (x1, y1, z))),
    ];
    let mut affected: Vec<ChunkCoord> = Vec::new();
    for (lo, hi) in boxes.into_iter().flatten() {
        let a = grid.chunk_coord_of(lo.0, lo.1, lo.2);
        let b = grid.chunk_coord_of(hi.0, hi.1, hi.2);
        for cy in a.cy..=b.cy {
            for cz in a.cz..=b.cz {
                for cx in a.cx..=b.cx {
                    let key = ChunkCoord::new(cx, cy, cz);
                    if !affected.contains(&key) {
                        affected.push(key);
                    }
                }
            }
        }
    }
    affected.sort_unstable();
    affected
}

/// Per-session editor state; there is exactly one per open world.
#[derive(Clone, Debug)]
pub struct EditorSession {
    slots: [MaterialId; SLOT_COUNT],
    selection: Selection,
    mode: EditMode,
}

impl Default for EditorSession {
    fn default() -> Self {
        EditorSession {
            slots: DEFAULT_SLOTS,
            selection: Selection::Slot(0),
            mode: EditMode::Voxel,
        }
    }
}

impl EditorSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session with custom slot materials; zero entries fall back to the defaults.
    pub fn with_slots(slots: [MaterialId; SLOT_COUNT]) -> Self {
        let mut s = Self::default();
        for (dst, (src, def)) in s.slots.iter_mut().zip(slots.iter().zip(DEFAULT_SLOTS)) {
            *dst = if *src == AIR { def } else { *src };
        }
        s
    }

    #[inline]
    pub fn selection(&self) -> Selection {
        self.selection
    }

    #[inline]
    pub fn slots(&self) -> &[MaterialId; SLOT_COUNT] {
        &self.slots
    }

    #[inline]
    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: EditMode) {
        if self.mode != mode {
            log::debug!("edit mode {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
        }
    }

    /// `-1` picks the eraser, `0..=7` a palette slot. Anything else leaves the state as is.
    pub fn select(&mut self, index: i32) -> Result<(), EditError> {
        self.selection = match index {
            ERASER_INDEX => Selection::Eraser,
            i if (0..SLOT_COUNT as i32).contains(&i) => Selection::Slot(i as usize),
            _ => return Err(SelectionFault::Slot(index).into()),
        };
        Ok(())
    }

    /// Puts `material` into the selected slot.
    pub fn assign_selected(&mut self, material: i32) -> Result<(), EditError> {
        let Selection::Slot(slot) = self.selection else {
            return Err(SelectionFault::Eraser.into());
        };
        if !(1..=255).contains(&material) {
            return Err(SelectionFault::Material(material).into());
        }
        self.slots[slot] = material as MaterialId;
        Ok(())
    }

    /// Material written by the next edit; air while erasing.
    #[inline]
    pub fn selected_material(&self) -> MaterialId {
        match self.selection {
            Selection::Slot(i) => self.slots[i],
            Selection::Eraser => AIR,
        }
    }

    /// Edit at the target cell, snapped to the block grid in block mode.
    pub fn edit_at(&self, x: i32, y: i32, z: i32) -> Edit {
        let m = self.selected_material();
        match self.mode {
            EditMode::Voxel => Edit::voxel(x, y, z, m),
            EditMode::Block => Edit::block(x, y, z, m),
        }
    }
}
