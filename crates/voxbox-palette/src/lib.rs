//! Material id to color table.
#![forbid(unsafe_code)]

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Material id stored in every voxel. `AIR` is never rendered.
pub type MaterialId = u8;

pub const AIR: MaterialId = 0;
pub const PALETTE_LEN: usize = 256;

#[derive(Debug, Error)]
pub enum PaletteError {
    #[error("palette read error: {0}")]
    Io(#[from] std::io::Error),
    #[error("palette parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid color {value:?} for material {material}")]
    BadColor { material: usize, value: String },
    #[error("palette has {0} colors; at most 255 materials fit")]
    TooManyColors(usize),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    colors: [[u8; 3]; PALETTE_LEN],
}

impl Default for Palette {
    /// 6x6x6 color cube for ids 1..=216 and a grey ramp for the rest.
    fn default() -> Self {
        const LEVELS: [u8; 6] = [0, 51, 102, 153, 204, 255];
        let mut colors = [[0u8; 3]; PALETTE_LEN];
        for (i, c) in colors.iter_mut().enumerate().skip(1) {
            let k = i - 1;
            *c = if k < 216 {
                [LEVELS[k / 36], LEVELS[(k / 6) % 6], LEVELS[k % 6]]
            } else {
                let g = (((k - 216) * 255) / 38) as u8;
                [g, g, g]
            };
        }
        Palette { colors }
    }
}

impl Palette {
    #[inline]
    pub fn rgb(&self, id: MaterialId) -> [u8; 3] {
        self.colors[id as usize]
    }

    /// Color as three floats in `[0, 1]`, the layout mesh consumers expect.
    #[inline]
    pub fn rgb_f32(&self, id: MaterialId) -> [f32; 3] {
        let [r, g, b] = self.rgb(id);
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0]
    }

    pub fn set(&mut self, id: MaterialId, rgb: [u8; 3]) {
        if id != AIR {
            self.colors[id as usize] = rgb;
        }
    }

    /// Overrides colors starting at material 1; ids past the list keep their defaults.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, PaletteError> {
        let cfg: PaletteConfig = toml::from_str(toml_str)?;
        if cfg.colors.len() > PALETTE_LEN - 1 {
            return Err(PaletteError::TooManyColors(cfg.colors.len()));
        }
        let mut palette = Palette::default();
        for (i, s) in cfg.colors.iter().enumerate() {
            let material = i + 1;
            let rgb = parse_hex_color(s).ok_or_else(|| PaletteError::BadColor {
                material,
                value: s.clone(),
            })?;
            palette.colors[material] = rgb;
        }
        Ok(palette)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PaletteError> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}

// --- Config ---

#[derive(Deserialize)]
pub struct PaletteConfig {
    pub colors: Vec<String>,
}

/// Parses `#rrggbb` or `rrggbb`.
pub fn parse_hex_color(s: &str) -> Option<[u8; 3]> {
    let s = s.trim();
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let v = u32::from_str_radix(hex, 16).ok()?;
    Some([(v >> 16) as u8, (v >> 8) as u8, v as u8])
}
