//! # Terrastead Core
//!
//! World model for Terrastead, a tile-based sandbox game:
//! - Fractal noise fields and biome-driven cell classification
//! - The fixed-size tile grid with edge-clamped access
//! - The creature registry with box-shaped proximity queries
//! - Configuration and logging bootstrap
//!
//! Grid generation is split across rows with Rayon; every other operation is
//! meant to run from the single game tick thread.
//!
//! ## Example
//!
//! ```
//! use terrastead_core::config::NoiseConfig;
//! use terrastead_core::grid::TileGrid;
//! use terrastead_core::noise::NoiseFields;
//! use terrastead_data::ContentTables;
//!
//! let content = ContentTables::default();
//! let fields = NoiseFields::generate(42, &NoiseConfig::default());
//! let grid = TileGrid::generate(&fields, &content).unwrap();
//!
//! // Out-of-range coordinates clamp to the nearest edge cell.
//! assert_eq!(grid.get(-3, 0), grid.get(0, 0));
//! ```

/// Biome lookup and tile/object resolution
pub mod biome;
/// Configuration management for world parameters
pub mod config;
/// Creature entities and their owning registry
pub mod creature;
/// Generation error types
pub mod error;
/// Fixed-size tile grid with clamped access and damage handling
pub mod grid;
/// Tracing subscriber setup
pub mod logging;
/// Fractal noise field generation
pub mod noise;

pub use biome::BiomeResolver;
pub use config::AppConfig;
pub use creature::{Creature, CreatureId, CreatureRegistry};
pub use error::GenerationError;
pub use grid::{DamageOutcome, TileGrid};
pub use logging::init_logging;
pub use noise::NoiseFields;
