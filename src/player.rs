use voxbox_chunk::VoxelGrid;
use voxbox_collide::Sweep;
use voxbox_geom::{Aabb, Axis, Vec3};

use crate::config::PlayerConfig;

/// Flying player: an axis-aligned box hanging below the eye.
#[derive(Debug, Clone)]
pub struct Player {
    pub eye: Vec3,
    pub size: Vec3,
    pub eye_offset: f32,
    pub speed: f32,
    pub on_ground: bool,
}

impl Player {
    pub fn new(eye: Vec3, cfg: &PlayerConfig) -> Self {
        Self {
            eye,
            size: Vec3::from(cfg.size),
            eye_offset: cfg.eye_offset,
            speed: cfg.speed,
            on_ground: false,
        }
    }

    /// Places the player so its box rests with its feet at `feet`.
    pub fn standing_at(feet: Vec3, cfg: &PlayerConfig) -> Self {
        let eye = feet + Vec3::UP * (cfg.size[1] * 0.5 + cfg.eye_offset);
        Self::new(eye, cfg)
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_size(self.eye - Vec3::UP * self.eye_offset, self.size)
    }

    pub fn feet(&self) -> Vec3 {
        self.aabb().min.with(Axis::X, self.eye.x).with(Axis::Z, self.eye.z)
    }

    /// Moves by `displacement`, clipped against the grid.
    pub fn step(&mut self, grid: &VoxelGrid, displacement: Vec3) -> Sweep {
        let sweep = voxbox_collide::sweep(grid, self.aabb(), displacement);
        self.eye += sweep.displacement;
        self.on_ground = displacement.y < 0.0 && sweep.is_blocked(Axis::Y);
        sweep
    }

    /// Moves along `wish` (per-axis input, unnormalized) at the configured speed.
    pub fn fly(&mut self, grid: &VoxelGrid, wish: Vec3, dt: f32) -> Sweep {
        self.step(grid, wish * (self.speed * dt))
    }
}
