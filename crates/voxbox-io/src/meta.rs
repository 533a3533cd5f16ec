use voxbox_geom::Vec3;

use crate::bytes::Reader;
use crate::error::LoadError;

pub const META_MAGIC: &[u8; 4] = b"VXMD";
pub const META_VERSION: u8 = 1;
/// Longest display name kept, in characters.
pub const MAX_NAME_CHARS: usize = 32;
const HEADER_LEN: usize = 4 + 1 + 2 + 1 + 12 + 2;

/// World display name and optional spawn point.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorldMeta {
    name: String,
    pub spawn: Option<Vec3>,
}

impl WorldMeta {
    pub fn new(name: &str) -> Self {
        let mut meta = WorldMeta::default();
        meta.set_name(name);
        meta
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stores `name`, keeping at most [`MAX_NAME_CHARS`] characters.
    pub fn set_name(&mut self, name: &str) {
        self.name = name.chars().take(MAX_NAME_CHARS).collect();
    }

    /// Encodes the metadata entry; `chunk_size` is the grid's chunk edge.
    pub fn encode(&self, chunk_size: u16) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.name.len());
        out.extend_from_slice(META_MAGIC);
        out.push(META_VERSION);
        out.extend_from_slice(&chunk_size.to_le_bytes());
        let spawn = self.spawn.unwrap_or(Vec3::ZERO);
        out.push(self.spawn.is_some() as u8);
        for v in [spawn.x, spawn.y, spawn.z] {
            out.extend_from_slice(&v.to_le_bytes());
        }
        // At most 32 chars of at most 4 bytes each, always fits a u16.
        out.extend_from_slice(&(self.name.len() as u16).to_le_bytes());
        out.extend_from_slice(self.name.as_bytes());
        out
    }

    /// Decodes a metadata entry, returning it with the stored chunk edge.
    pub fn decode(bytes: &[u8]) -> Result<(Self, u16), LoadError> {
        let mut r = Reader::new(bytes, "world metadata");
        if r.take(4)? != META_MAGIC {
            return Err(LoadError::BadMetaMagic);
        }
        let version = r.u8()?;
        if version != META_VERSION {
            return Err(LoadError::MetaVersion(version));
        }
        let chunk_size = r.u16()?;
        let flag = r.u8()?;
        let spawn = Vec3::new(r.f32()?, r.f32()?, r.f32()?);
        let spawn = match flag {
            0 => None,
            1 => Some(spawn),
            other => return Err(LoadError::BadSpawnFlag(other)),
        };
        let name_len = r.u16()? as usize;
        let name = std::str::from_utf8(r.take(name_len)?).map_err(|_| LoadError::BadName)?;
        r.finish()?;
        let mut meta = WorldMeta { name: String::new(), spawn };
        meta.set_name(name);
        Ok((meta, chunk_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_fixed() {
        let mut m = WorldMeta::new("ab");
        m.spawn = Some(Vec3::new(1.0, 2.0, -3.5));
        let b = m.encode(32);
        assert_eq!(&b[0..4], b"VXMD");
        assert_eq!(b[4], 1);
        assert_eq!(&b[5..7], &32u16.to_le_bytes());
        assert_eq!(b[7], 1);
        assert_eq!(&b[8..12], &1.0f32.to_le_bytes());
        assert_eq!(&b[16..20], &(-3.5f32).to_le_bytes());
        assert_eq!(&b[20..22], &2u16.to_le_bytes());
        assert_eq!(&b[22..], b"ab");
        assert_eq!(b.len(), HEADER_LEN + 2);
    }

    #[test]
    fn unset_spawn_writes_zeros() {
        let b = WorldMeta::new("").encode(16);
        assert_eq!(b[7], 0);
        assert!(b[8..20].iter().all(|&x| x == 0));
        let (m, n) = WorldMeta::decode(&b).unwrap();
        assert_eq!(m.spawn, None);
        assert_eq!(n, 16);
    }

    #[test]
    fn name_is_capped_in_characters() {
        let long: String = "é".repeat(40);
        let m = WorldMeta::new(&long);
        assert_eq!(m.name().chars().count(), MAX_NAME_CHARS);
        assert_eq!(m.name().len(), MAX_NAME_CHARS * 2);
    }

    #[test]
    fn decode_rejects_garbage() {
        let good = WorldMeta::new("w").encode(32);
        let mut bad = good.clone();
        bad[0] = 0;
        assert!(matches!(WorldMeta::decode(&bad), Err(LoadError::BadMetaMagic)));
        let mut bad = good.clone();
        bad[4] = 2;
        assert!(matches!(WorldMeta::decode(&bad), Err(LoadError::MetaVersion(2))));
        let mut bad = good.clone();
        bad[7] = 5;
        assert!(matches!(WorldMeta::decode(&bad), Err(LoadError::BadSpawnFlag(5))));
        let mut bad = good.clone();
        bad[22] = 0xff;
        assert!(matches!(WorldMeta::decode(&bad), Err(LoadError::BadName)));
        assert!(matches!(
            WorldMeta::decode(&good[..10]),
            Err(LoadError::Truncated { .. })
        ));
    }

    #[test]
    fn decode_rejects_bytes_after_the_name() {
        let mut b = WorldMeta::new("w").encode(32);
        b.extend_from_slice(b"junk");
        assert!(matches!(
            WorldMeta::decode(&b),
            Err(LoadError::TrailingBytes { what: "world metadata", count: 4 })
        ));
    }
}
