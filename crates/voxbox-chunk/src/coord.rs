use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cy: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cy: i32, cz: i32) -> Self {
        Self { cx, cy, cz }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            cx: self.cx + dx,
            cy: self.cy + dy,
            cz: self.cz + dz,
        }
    }

    /// World position of the chunk's minimum corner; `None` when it leaves the `i32` range.
    #[inline]
    pub fn origin(self, chunk_size: i32) -> Option<(i32, i32, i32)> {
        Some((
            self.cx.checked_mul(chunk_size)?,
            self.cy.checked_mul(chunk_size)?,
            self.cz.checked_mul(chunk_size)?,
        ))
    }

    /// Whether every voxel of the chunk has an `i32` world coordinate.
    pub fn fits(self, chunk_size: i32) -> bool {
        let last = chunk_size - 1;
        self.origin(chunk_size).is_some_and(|(x, y, z)| {
            x.checked_add(last).is_some()
                && y.checked_add(last).is_some()
                && z.checked_add(last).is_some()
        })
    }

    /// Text key used by the archive format, e.g. `"-2,0,5"`.
    pub fn key(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.cx, self.cy, self.cz)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("malformed chunk key {0:?}")]
pub struct ParseChunkKeyError(pub String);

impl FromStr for ChunkCoord {
    type Err = ParseChunkKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ParseChunkKeyError(s.to_string());
        let mut parts = s.split(',');
        let mut next = || -> Result<i32, ParseChunkKeyError> {
            parts
                .next()
                .and_then(|p| p.trim().parse::<i32>().ok())
                .ok_or_else(bad)
        };
        let coord = ChunkCoord::new(next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(bad());
        }
        Ok(coord)
    }
}

impl From<(i32, i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

impl From<ChunkCoord> for (i32, i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.cx, value.cy, value.cz)
    }
}
