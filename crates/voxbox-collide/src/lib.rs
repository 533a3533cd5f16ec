//! Swept AABB collision of a moving box against solid voxels.
//!
//! The solver clips a desired displacement so the box never enters a solid cell.
//! Each pass finds the earliest hit along the remaining motion, advances up to it,
//! locks the blocking axis and retries the other axes, so the box slides along
//! walls and floors instead of stopping dead.
#![forbid(unsafe_code)]

use voxbox_chunk::VoxelGrid;
use voxbox_geom::{AXES, Aabb, Axis, Vec3};

/// Gap, in world units, kept between the box and the surface it stopped against.
pub const COLLISION_EPSILON: f32 = 1e-3;
/// One pass per axis is enough: every pass locks a different axis.
pub const MAX_PASSES: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    /// Fraction of the tested displacement at which contact starts.
    pub time: f32,
    pub axis: Axis,
    /// Surface normal of the voxel face that was hit.
    pub normal: Vec3,
}

impl Hit {
    #[inline]
    fn precedes(&self, other: &Hit) -> bool {
        self.time < other.time || (self.time == other.time && self.axis < other.axis)
    }
}

/// Corrected motion plus the axes that were stopped on the way.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Sweep {
    pub displacement: Vec3,
    pub blocked: [bool; 3],
}

impl Sweep {
    #[inline]
    pub fn is_blocked(&self, axis: Axis) -> bool {
        self.blocked[axis.index()]
    }

    #[inline]
    pub fn hit_anything(&self) -> bool {
        self.blocked.iter().any(|&b| b)
    }
}

/// Inclusive-min, exclusive-max voxel range the box can touch while moving by `v`.
pub fn broad_phase(aabb: &Aabb, v: Vec3) -> ([i32; 3], [i32; 3]) {
    let mut lo = [0i32; 3];
    let mut hi = [0i32; 3];
    for axis in AXES {
        let d = v.get(axis);
        let (min, max) = (aabb.min.get(axis), aabb.max.get(axis));
        let (a, b) = if d > 0.0 { (min, max + d) } else { (min + d, max) };
        lo[axis.index()] = a.floor() as i32;
        hi[axis.index()] = b.ceil() as i32;
    }
    (lo, hi)
}

/// Swept test of `aabb` moving by `v` against one static `cell`.
///
/// Returns `None` when the motion never brings the boxes into overlap, when they would
/// only meet behind the start (`entry < 0`), or when they do not overlap on an axis the
/// box is not moving along. Touching faces are not an overlap.
pub fn sweep_aabb(aabb: &Aabb, v: Vec3, cell: &Aabb) -> Option<Hit> {
    let mut entry = [f32::NEG_INFINITY; 3];
    let mut exit = [f32::INFINITY; 3];
    for axis in AXES {
        let i = axis.index();
        let d = v.get(axis);
        let (bmin, bmax) = (aabb.min.get(axis), aabb.max.get(axis));
        let (cmin, cmax) = (cell.min.get(axis), cell.max.get(axis));
        if d == 0.0 {
            if bmax <= cmin || bmin >= cmax {
                return None;
            }
        } else if d > 0.0 {
            entry[i] = (cmin - bmax) / d;
            exit[i] = (cmax - bmin) / d;
        } else {
            entry[i] = (cmax - bmin) / d;
            exit[i] = (cmin - bmax) / d;
        }
    }
    let entry_time = entry[0].max(entry[1]).max(entry[2]);
    let exit_time = exit[0].min(exit[1]).min(exit[2]);
    if entry_time > exit_time || entry_time < 0.0 {
        return None;
    }
    // First axis reaching the latest entry wins ties: X, then Y, then Z.
    let axis = AXES
        .into_iter()
        .find(|a| entry[a.index()] == entry_time)
        .unwrap_or(Axis::X);
    let normal = Vec3::ZERO.with(axis, -v.get(axis).signum());
    Some(Hit {
        time: entry_time,
        axis,
        normal,
    })
}

/// Earliest hit of `aabb` moving by `v` against any solid cell.
pub fn first_hit<F>(is_solid: &F, aabb: &Aabb, v: Vec3) -> Option<Hit>
where
    F: Fn(i32, i32, i32) -> bool,
{
    let (lo, hi) = broad_phase(aabb, v);
    let mut best: Option<Hit> = None;
    for y in lo[1]..hi[1] {
        for z in lo[2]..hi[2] {
            for x in lo[0]..hi[0] {
                if !is_solid(x, y, z) {
                    continue;
                }
                if let Some(hit) = sweep_aabb(aabb, v, &Aabb::voxel(x, y, z)) {
                    if best.is_none_or(|b| hit.precedes(&b)) {
                        best = Some(hit);
                    }
                }
            }
        }
    }
    best
}

/// Clips `displacement` of `aabb` against the cells reported solid by `is_solid`.
pub fn resolve_with<F>(is_solid: F, aabb: Aabb, displacement: Vec3) -> Sweep
where
    F: Fn(i32, i32, i32) -> bool,
{
    let mut out = Sweep::default();
    if displacement.is_zero() {
        return out;
    }
    let mut moving = aabb;
    let mut remaining = displacement;
    for pass in 0..MAX_PASSES {
        if remaining.is_zero() {
            break;
        }
        let hit = match first_hit(&is_solid, &moving, remaining) {
            Some(hit) if hit.time < 1.0 => hit,
            _ => {
                out.displacement += remaining;
                break;
            }
        };
        let speed = remaining.get(hit.axis).abs();
        let t = (hit.time - COLLISION_EPSILON / speed).clamp(0.0, 1.0);
        let step = remaining * t;
        out.displacement += step;
        moving = moving.translated(step);
        remaining = (remaining * (1.0 - t)).with(hit.axis, 0.0);
        out.blocked[hit.axis.index()] = true;
        log::trace!(
            "collision pass {pass}: axis {:?} at t={:.4}, remaining {:?}",
            hit.axis,
            hit.time,
            remaining
        );
    }
    out
}

/// Grid-backed [`resolve_with`] that also reports blocked axes.
pub fn sweep(grid: &VoxelGrid, aabb: Aabb, displacement: Vec3) -> Sweep {
    resolve_with(|x, y, z| grid.is_solid(x, y, z), aabb, displacement)
}

/// Corrected displacement of `aabb` moving by `displacement` through `grid`.
pub fn resolve(grid: &VoxelGrid, aabb: Aabb, displacement: Vec3) -> Vec3 {
    sweep(grid, aabb, displacement).displacement
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box_at(x: f32, y: f32, z: f32) -> Aabb {
        Aabb::new(Vec3::new(x, y, z), Vec3::new(x + 1.0, y + 1.0, z + 1.0))
    }

    #[test]
    fn sweep_reports_entry_time_and_normal() {
        let b = unit_box_at(0.0, 0.0, 0.0);
        let hit = sweep_aabb(&b, Vec3::new(4.0, 0.0, 0.0), &Aabb::voxel(3, 0, 0)).unwrap();
        assert_eq!(hit.time, 0.5);
        assert_eq!(hit.axis, Axis::X);
        assert_eq!(hit.normal, Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn touching_cell_on_still_axis_is_ignored() {
        // Box resting on top of a cell, sliding along x.
        let b = unit_box_at(0.0, 1.0, 0.0);
        assert!(sweep_aabb(&b, Vec3::new(3.0, 0.0, 0.0), &Aabb::voxel(2, 0, 0)).is_none());
    }

    #[test]
    fn cell_behind_is_ignored() {
        let b = unit_box_at(5.0, 0.0, 0.0);
        assert!(sweep_aabb(&b, Vec3::new(2.0, 0.0, 0.0), &Aabb::voxel(3, 0, 0)).is_none());
    }

    #[test]
    fn equal_entry_prefers_lower_axis() {
        // Diagonal motion hitting a cell corner-on: x and y enter together.
        let b = unit_box_at(0.0, 0.0, 0.0);
        let hit = sweep_aabb(&b, Vec3::new(2.0, 2.0, 0.0), &Aabb::voxel(2, 2, 0)).unwrap();
        assert_eq!(hit.time, 0.5);
        assert_eq!(hit.axis, Axis::X);
    }

    #[test]
    fn broad_phase_expands_toward_motion() {
        let b = Aabb::new(Vec3::new(0.5, 0.0, 0.0), Vec3::new(1.5, 2.0, 1.0));
        let (lo, hi) = broad_phase(&b, Vec3::new(-2.0, 0.0, 3.0));
        assert_eq!(lo, [-2, 0, 0]);
        assert_eq!(hi, [2, 2, 4]);
    }
}
