//! Flat container of named byte entries, standing in for a zip file.
//!
//! On disk: magic `VXAR`, version byte, u32 entry count, then per entry a u16 name length,
//! the UTF-8 name, a u32 data length and the data. All integers little-endian.

use std::fs;
use std::path::Path;

use crate::bytes::Reader;
use crate::error::{LoadError, SaveError};

pub const ARCHIVE_MAGIC: &[u8; 4] = b"VXAR";
pub const ARCHIVE_VERSION: u8 = 1;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub data: Vec<u8>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Archive {
    entries: Vec<Entry>,
}

impl Archive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the entry called `name`.
    pub fn insert(&mut self, name: impl Into<String>, data: Vec<u8>) {
        let name = name.into();
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(e) => e.data = data,
            None => self.entries.push(Entry { name, data }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.data.as_slice())
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SaveError> {
        let count = u32::try_from(self.entries.len())
            .map_err(|_| SaveError::TooManyEntries(self.entries.len()))?;
        let payload: usize = self
            .entries
            .iter()
            .map(|e| 6 + e.name.len() + e.data.len())
            .sum();
        let mut out = Vec::with_capacity(9 + payload);
        out.extend_from_slice(ARCHIVE_MAGIC);
        out.push(ARCHIVE_VERSION);
        out.extend_from_slice(&count.to_le_bytes());
        for e in &self.entries {
            let too_large = || SaveError::EntryTooLarge {
                name: e.name.clone(),
                len: e.data.len().max(e.name.len()),
            };
            let name_len = u16::try_from(e.name.len()).map_err(|_| too_large())?;
            let data_len = u32::try_from(e.data.len()).map_err(|_| too_large())?;
            out.extend_from_slice(&name_len.to_le_bytes());
            out.extend_from_slice(e.name.as_bytes());
            out.extend_from_slice(&data_len.to_le_bytes());
            out.extend_from_slice(&e.data);
        }
        Ok(out)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LoadError> {
        let mut r = Reader::new(bytes, "archive");
        if r.take(4)? != ARCHIVE_MAGIC {
            return Err(LoadError::BadArchiveMagic);
        }
        let version = r.u8()?;
        if version != ARCHIVE_VERSION {
            return Err(LoadError::ArchiveVersion(version));
        }
        let count = r.u32()? as usize;
        // Each entry needs at least six header bytes; cap the allocation accordingly.
        let mut entries: Vec<Entry> = Vec::with_capacity(count.min(r.remaining() / 6));
        for _ in 0..count {
            let name_len = r.u16()? as usize;
            let name = std::str::from_utf8(r.take(name_len)?)
                .map_err(|_| LoadError::BadEntryName)?
                .to_string();
            let data_len = r.u32()? as usize;
            let data = r.take(data_len)?.to_vec();
            if entries.iter().any(|e| e.name == name) {
                return Err(LoadError::DuplicateEntry(name));
            }
            entries.push(Entry { name, data });
        }
        r.finish()?;
        Ok(Archive { entries })
    }

    pub fn write_to_path(&self, path: impl AsRef<Path>) -> Result<(), SaveError> {
        let bytes = self.to_bytes()?;
        fs::write(path.as_ref(), &bytes)?;
        log::info!(
            "wrote archive {} ({} entries, {} bytes)",
            path.as_ref().display(),
            self.entries.len(),
            bytes.len()
        );
        Ok(())
    }

    pub fn read_from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let bytes = fs::read(path.as_ref())?;
        let archive = Self::from_bytes(&bytes)?;
        log::debug!(
            "read archive {} ({} entries)",
            path.as_ref().display(),
            archive.len()
        );
        Ok(archive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_archive_is_nine_bytes() {
        let bytes = Archive::new().to_bytes().unwrap();
        assert_eq!(bytes, b"VXAR\x01\x00\x00\x00\x00");
        assert!(Archive::from_bytes(&bytes).unwrap().is_empty());
    }

    #[test]
    fn insert_replaces_existing_name() {
        let mut a = Archive::new();
        a.insert("a", vec![1]);
        a.insert("a", vec![2, 3]);
        assert_eq!(a.len(), 1);
        assert_eq!(a.get("a"), Some(&[2u8, 3][..]));
    }

    #[test]
    fn rejects_bad_magic_version_and_truncation() {
        let mut a = Archive::new();
        a.insert("0,0,0", vec![7; 10]);
        let good = a.to_bytes().unwrap();

        let mut bad = good.clone();
        bad[0] = b'Z';
        assert!(matches!(Archive::from_bytes(&bad), Err(LoadError::BadArchiveMagic)));

        let mut bad = good.clone();
        bad[4] = 9;
        assert!(matches!(Archive::from_bytes(&bad), Err(LoadError::ArchiveVersion(9))));

        let cut = &good[..good.len() - 1];
        assert!(matches!(Archive::from_bytes(cut), Err(LoadError::Truncated { .. })));

        let mut long = good.clone();
        long.push(0);
        assert!(matches!(
            Archive::from_bytes(&long),
            Err(LoadError::TrailingBytes { what: "archive", count: 1 })
        ));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(ARCHIVE_MAGIC);
        bytes.push(ARCHIVE_VERSION);
        bytes.extend_from_slice(&2u32.to_le_bytes());
        for _ in 0..2 {
            bytes.extend_from_slice(&1u16.to_le_bytes());
            bytes.push(b'x');
            bytes.extend_from_slice(&0u32.to_le_bytes());
        }
        assert!(matches!(
            Archive::from_bytes(&bytes),
            Err(LoadError::DuplicateEntry(n)) if n == "x"
        ));
    }
}
