use voxbox_chunk::{Chunk, ChunkCoord, VoxelGrid};

use crate::archive::Archive;
use crate::error::LoadError;
use crate::meta::WorldMeta;

/// Archive entry holding the encoded [`WorldMeta`].
pub const META_ENTRY: &str = "world.meta";

/// Packs every chunk that still holds a solid voxel, plus the metadata entry.
///
/// Chunks are written in ascending coordinate order so equal worlds give equal bytes.
pub fn serialize(grid: &VoxelGrid, meta: &WorldMeta) -> Archive {
    let mut archive = Archive::new();
    archive.insert(META_ENTRY, meta.encode(grid.chunk_size() as u16));
    let mut skipped = 0usize;
    for coord in grid.sorted_coords() {
        let Some(chunk) = grid.chunk(coord) else {
            continue;
        };
        if chunk.is_all_air() {
            skipped += 1;
            continue;
        }
        archive.insert(coord.key(), chunk.as_bytes().to_vec());
    }
    log::debug!(
        "serialized {} chunks ({} empty skipped)",
        archive.len() - 1,
        skipped
    );
    archive
}

/// Rebuilds a grid and its metadata from `archive`.
///
/// Entry names containing a comma are chunk keys and must be exactly the `cx,cy,cz` text
/// [`ChunkCoord::key`] writes; other names besides [`META_ENTRY`] are ignored. Any
/// malformed or out-of-range chunk fails the whole load.
pub fn deserialize(archive: &Archive) -> Result<(VoxelGrid, WorldMeta), LoadError> {
    let meta_bytes = archive.get(META_ENTRY).ok_or(LoadError::MissingMeta)?;
    let (meta, chunk_size) = WorldMeta::decode(meta_bytes)?;
    let mut grid = VoxelGrid::new(chunk_size as usize)?;
    let n = grid.chunk_size();
    let expected = n * n * n;
    for entry in archive.entries() {
        if entry.name == META_ENTRY {
            continue;
        }
        if !entry.name.contains(',') {
            log::debug!("ignoring archive entry {:?}", entry.name);
            continue;
        }
        let coord: ChunkCoord = entry.name.parse()?;
        if coord.key() != entry.name {
            return Err(LoadError::NonCanonicalKey(entry.name.clone()));
        }
        if !grid.coord_fits(coord) {
            return Err(LoadError::ChunkOutOfRange(entry.name.clone()));
        }
        let chunk = Chunk::from_bytes(n, entry.data.clone()).ok_or_else(|| {
            LoadError::ChunkLength {
                key: entry.name.clone(),
                got: entry.data.len(),
                expected,
            }
        })?;
        if chunk.is_all_air() {
            continue;
        }
        grid.insert_chunk(coord, chunk)?;
    }
    log::info!(
        "loaded world {:?}: {} chunks, chunk size {}",
        meta.name(),
        grid.len(),
        n
    );
    Ok((grid, meta))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_chunks_are_not_written() {
        let mut g = VoxelGrid::new(4).unwrap();
        g.set(0, 0, 0, 3);
        g.set(0, 0, 0, 0);
        g.set(-1, 5, 9, 2);
        let a = serialize(&g, &WorldMeta::new("t"));
        assert_eq!(a.len(), 2);
        assert!(a.get("-1,1,2").is_some());
        assert!(a.get("0,0,0").is_none());
    }

    #[test]
    fn chunk_size_comes_from_metadata() {
        let mut g = VoxelGrid::new(8).unwrap();
        g.set(9, 0, 0, 1);
        let (back, _) = deserialize(&serialize(&g, &WorldMeta::default())).unwrap();
        assert_eq!(back.chunk_size(), 8);
        assert_eq!(back.get(9, 0, 0), 1);
    }

    #[test]
    fn invalid_chunk_size_in_metadata_is_rejected() {
        let mut a = Archive::new();
        a.insert(META_ENTRY, WorldMeta::default().encode(12));
        assert!(matches!(deserialize(&a), Err(LoadError::Grid(_))));
    }

    fn one_chunk_archive(key: &str) -> Archive {
        let mut a = Archive::new();
        a.insert(META_ENTRY, WorldMeta::default().encode(4));
        let mut blob = vec![0u8; 64];
        blob[0] = 1;
        a.insert(key, blob);
        a
    }

    #[test]
    fn non_canonical_keys_are_rejected() {
        for key in ["+1,0,0", " 1, 0,0", "01,0,0", "-0,0,0"] {
            let a = one_chunk_archive(key);
            assert!(
                matches!(deserialize(&a), Err(LoadError::NonCanonicalKey(ref k)) if k == key),
                "{key:?} accepted"
            );
        }
        assert!(deserialize(&one_chunk_archive("1,0,0")).is_ok());
    }

    #[test]
    fn chunk_past_i32_range_is_rejected() {
        let a = one_chunk_archive("2147483647,0,0");
        assert!(matches!(
            deserialize(&a),
            Err(LoadError::ChunkOutOfRange(ref k)) if k == "2147483647,0,0"
        ));
        // The last chunk that still fits loads fine.
        let last = (i32::MAX / 4).to_string() + ",0,0";
        let (g, _) = deserialize(&one_chunk_archive(&last)).unwrap();
        assert_eq!(g.get(i32::MAX - 3, 0, 0), 1);
    }
}
