//! Configuration management for world parameters.
//!
//! Strongly-typed structures mapping to `config.toml`. Missing sections fall
//! back to their `Default` values.
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [map]
//! name = "world"
//! save_root = "saves"
//! seed = 42
//!
//! [noise.height]
//! octaves = 4
//! frequency = 0.02
//!
//! [persistence]
//! strict_decompression = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Identity and storage of a single map.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct MapConfig {
    pub name: String,
    pub save_root: PathBuf,
    /// Base seed for the five noise fields. `None` derives one from the clock.
    pub seed: Option<u64>,
    /// When false the map never touches disk: load is skipped and `save` is a no-op.
    pub saving_enabled: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            name: "world".to_string(),
            save_root: PathBuf::from("saves"),
            seed: None,
            saving_enabled: true,
        }
    }
}

/// Octave count and base frequency of one fractal noise field.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct FieldNoise {
    pub octaves: usize,
    pub frequency: f64,
}

/// Per-field noise tuning. Both biome selector fields share `biome`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct NoiseConfig {
    pub biome: FieldNoise,
    pub height: FieldNoise,
    pub plant1: FieldNoise,
    pub plant2: FieldNoise,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            biome: FieldNoise {
                octaves: 2,
                frequency: 0.004,
            },
            height: FieldNoise {
                octaves: 4,
                frequency: 0.02,
            },
            plant1: FieldNoise {
                octaves: 2,
                frequency: 0.2,
            },
            plant2: FieldNoise {
                octaves: 3,
                frequency: 0.12,
            },
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Treat a failed tile decompression as a load failure (triggering
    /// regeneration) instead of logging it and keeping the partial buffer.
    pub strict_decompression: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CreatureConfig {
    /// Fraction of velocity kept per tick.
    pub friction: f32,
    /// Ticks an item drop lives before despawning. 0 keeps drops forever.
    pub item_despawn_ticks: u32,
}

impl Default for CreatureConfig {
    fn default() -> Self {
        Self {
            friction: 0.9,
            item_despawn_ticks: 0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub map: MapConfig,
    pub noise: NoiseConfig,
    pub persistence: PersistenceConfig,
    pub creatures: CreatureConfig,
}

impl AppConfig {
    /// Validates all configuration parameters.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.map.name.is_empty(), "Map name must not be empty");
        anyhow::ensure!(
            !self.map.name.contains(['/', '\\']),
            "Map name must not contain path separators"
        );

        for (label, field) in [
            ("biome", &self.noise.biome),
            ("height", &self.noise.height),
            ("plant1", &self.noise.plant1),
            ("plant2", &self.noise.plant2),
        ] {
            anyhow::ensure!(
                (1..=16).contains(&field.octaves),
                "Noise field '{label}' octaves must be in [1, 16]"
            );
            anyhow::ensure!(
                field.frequency > 0.0 && field.frequency.is_finite(),
                "Noise field '{label}' frequency must be positive"
            );
        }

        anyhow::ensure!(
            (0.0..=1.0).contains(&self.creatures.friction),
            "Creature friction must be in [0.0, 1.0]"
        );
        Ok(())
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path`, returning defaults when the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content)
                .map_err(|e| e.context(format!("invalid config {}", path.display()))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "No config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }
}
