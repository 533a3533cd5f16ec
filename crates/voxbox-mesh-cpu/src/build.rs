use voxbox_chunk::{AIR, ChunkCoord, VoxelGrid};
use voxbox_palette::Palette;

use crate::face::FACES;
use crate::mesh_build::ChunkMesh;

/// Builds the culled-face mesh of `coord`.
///
/// A face is emitted only where the neighbouring voxel is air; neighbours across the
/// chunk border are read through the grid. An empty result means the chunk has nothing
/// visible and may be dropped by the caller.
pub fn build_chunk_mesh(grid: &VoxelGrid, palette: &Palette, coord: ChunkCoord) -> ChunkMesh {
    let mut mesh = ChunkMesh::new(coord);
    let Some(chunk) = grid.chunk(coord) else {
        return mesh;
    };
    let n = grid.chunk_size();
    let Some(base) = coord.origin(n as i32) else {
        log::warn!("chunk {coord} lies outside the i32 voxel range; not meshed");
        return mesh;
    };
    let last = n - 1;
    mesh.reserve_quads(chunk.solid_count());

    for y in 0..n {
        for z in 0..n {
            for x in 0..n {
                let m = chunk.get_local(x, y, z);
                if m == AIR {
                    continue;
                }
                let rgb = palette.rgb_f32(m);
                for def in &FACES {
                    let [dx, dy, dz] = def.dir;
                    let on_border = (dx < 0 && x == 0)
                        || (dx > 0 && x == last)
                        || (dy < 0 && y == 0)
                        || (dy > 0 && y == last)
                        || (dz < 0 && z == 0)
                        || (dz > 0 && z == last);
                    let neighbor = if on_border {
                        // Past the end of the i32 range there is only air.
                        match world_neighbor(base, (x, y, z), def.dir) {
                            Some((wx, wy, wz)) => grid.get(wx, wy, wz),
                            None => AIR,
                        }
                    } else {
                        chunk.get_local(
                            (x as i32 + dx) as usize,
                            (y as i32 + dy) as usize,
                            (z as i32 + dz) as usize,
                        )
                    };
                    if neighbor == AIR {
                        mesh.add_face(def, x, y, z, rgb);
                    }
                }
            }
        }
    }
    log::trace!(
        "meshed chunk {coord}: {} faces, {} vertices",
        mesh.face_count(),
        mesh.vertex_count()
    );
    mesh
}

fn world_neighbor(
    base: (i32, i32, i32),
    local: (usize, usize, usize),
    dir: [i32; 3],
) -> Option<(i32, i32, i32)> {
    Some((
        base.0.checked_add(local.0 as i32)?.checked_add(dir[0])?,
        base.1.checked_add(local.1 as i32)?.checked_add(dir[1])?,
        base.2.checked_add(local.2 as i32)?.checked_add(dir[2])?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_chunk_is_empty() {
        let g = VoxelGrid::default();
        let mesh = build_chunk_mesh(&g, &Palette::default(), ChunkCoord::new(3, -1, 0));
        assert!(mesh.is_empty());
        assert_eq!(mesh.coord, ChunkCoord::new(3, -1, 0));
    }

    #[test]
    fn voxels_at_i32_limits_show_all_faces() {
        let mut g = VoxelGrid::new(16).unwrap();
        g.set(i32::MAX, i32::MAX, i32::MAX, 2);
        g.set(i32::MIN, i32::MIN, i32::MIN, 3);
        for p in [i32::MAX, i32::MIN] {
            let mesh = build_chunk_mesh(&g, &Palette::default(), g.chunk_coord_of(p, p, p));
            assert_eq!(mesh.face_count(), 6);
        }
    }

    #[test]
    fn world_neighbor_stops_at_range_end() {
        assert_eq!(world_neighbor((i32::MAX - 15, 0, 0), (15, 0, 0), [1, 0, 0]), None);
        assert_eq!(world_neighbor((i32::MIN, 0, 0), (0, 0, 0), [-1, 0, 0]), None);
        assert_eq!(
            world_neighbor((i32::MAX - 15, 0, 0), (15, 0, 0), [-1, 0, 0]),
            Some((i32::MAX - 1, 0, 0))
        );
    }

    #[test]
    fn each_quad_carries_its_face_normal() {
        let mut g = VoxelGrid::new(8).unwrap();
        g.set(1, 1, 1, 4);
        let mesh = build_chunk_mesh(&g, &Palette::default(), ChunkCoord::new(0, 0, 0));
        assert_eq!(mesh.face_count(), FACES.len());
        for (quad, def) in mesh.normals.chunks(12).zip(&FACES) {
            let n = def.face.normal();
            for v in quad.chunks(3) {
                assert_eq!(v, [n.x, n.y, n.z]);
            }
        }
    }

    #[test]
    fn two_adjacent_voxels_share_no_face() {
        let mut g = VoxelGrid::new(8).unwrap();
        g.set(2, 2, 2, 1);
        g.set(3, 2, 2, 1);
        let mesh = build_chunk_mesh(&g, &Palette::default(), ChunkCoord::new(0, 0, 0));
        assert_eq!(mesh.face_count(), 10);
    }

    #[test]
    fn neighbour_in_next_chunk_culls_border_face() {
        let mut g = VoxelGrid::new(8).unwrap();
        g.set(7, 0, 0, 1);
        g.set(8, 0, 0, 1);
        let left = build_chunk_mesh(&g, &Palette::default(), ChunkCoord::new(0, 0, 0));
        let right = build_chunk_mesh(&g, &Palette::default(), ChunkCoord::new(1, 0, 0));
        assert_eq!(left.face_count(), 5);
        assert_eq!(right.face_count(), 5);
        // The +X face of the left voxel is the one culled.
        assert!(left.normals.chunks(3).all(|n| n != [1.0, 0.0, 0.0]));
        assert!(right.normals.chunks(3).all(|n| n != [-1.0, 0.0, 0.0]));
    }
}
