use std::error::Error;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use voxbox_chunk::CHUNK_SIZE;
use voxbox_edit::SLOT_COUNT;
use voxbox_palette::{MaterialId, Palette};

/// Default file looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "voxbox.toml";

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub world: WorldConfig,
    pub player: PlayerConfig,
    pub palette: PaletteSection,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    pub chunk_size: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            chunk_size: CHUNK_SIZE,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PlayerConfig {
    /// Collision box extent in world units.
    pub size: [f32; 3],
    /// Eye height above the box centre.
    pub eye_offset: f32,
    /// Units per second.
    pub speed: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            size: [6.0, 14.0, 6.0],
            eye_offset: 5.0,
            speed: 16.0,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PaletteSection {
    /// Optional `colors = [...]` override file.
    pub path: Option<PathBuf>,
    /// Material ids of the editor slots; missing or zero entries keep their default.
    pub slots: Vec<MaterialId>,
}

impl PaletteSection {
    pub fn slot_array(&self) -> [MaterialId; SLOT_COUNT] {
        let mut out = [0; SLOT_COUNT];
        for (dst, src) in out.iter_mut().zip(&self.slots) {
            *dst = *src;
        }
        out
    }
}

impl Config {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: Config = toml::from_str(toml_str)?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = std::fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    /// Explicit file must load; the implicit `voxbox.toml` is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self, Box<dyn Error>> {
        if let Some(path) = explicit {
            log::debug!("config: {}", path.display());
            return Self::from_path(path);
        }
        let path = Path::new(DEFAULT_CONFIG_FILE);
        if !path.exists() {
            return Ok(Config::default());
        }
        match Self::from_path(path) {
            Ok(cfg) => Ok(cfg),
            Err(e) => {
                log::warn!("{} ignored: {}", DEFAULT_CONFIG_FILE, e);
                Ok(Config::default())
            }
        }
    }

    /// Palette from `[palette] path`, falling back to the built-in table.
    pub fn palette(&self) -> Palette {
        let Some(path) = &self.palette.path else {
            return Palette::default();
        };
        match Palette::from_path(path) {
            Ok(p) => p,
            Err(e) => {
                log::warn!("palette {} ignored: {}", path.display(), e);
                Palette::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = Config::from_toml_str("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.world.chunk_size, 32);
        assert_eq!(cfg.player.size, [6.0, 14.0, 6.0]);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = Config::from_toml_str(
            r#"
            [world]
            chunk_size = 16

            [player]
            speed = 4.0

            [palette]
            slots = [3, 0, 9]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.world.chunk_size, 16);
        assert_eq!(cfg.player.speed, 4.0);
        assert_eq!(cfg.player.eye_offset, 5.0);
        assert_eq!(cfg.palette.slot_array(), [3, 0, 9, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Config::from_toml_str("[world]\nchunk = 8\n").is_err());
    }

    #[test]
    fn missing_palette_file_falls_back() {
        let mut cfg = Config::default();
        cfg.palette.path = Some(PathBuf::from("/definitely/not/here.toml"));
        assert_eq!(cfg.palette().rgb(1), Palette::default().rgb(1));
    }
}
