//! Error types for world generation.

use thiserror::Error;

/// Fatal content-data problems detected while building a grid.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// The biome tables leave the selector pair uncovered.
    #[error("No biome for selector ({selector1:.3}, {selector2:.3}) at cell ({x}, {y})")]
    MissingBiome {
        x: usize,
        y: usize,
        selector1: f32,
        selector2: f32,
    },
}
