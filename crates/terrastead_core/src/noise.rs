//! Fractal noise fields driving world generation.
//!
//! Five independent `MAP_SIZE × MAP_SIZE` fields are produced from one base
//! seed. Each field gets its own sub-seed (`base + 0..4`) so fields made from
//! the same clock-derived seed stay decorrelated.

use crate::config::{FieldNoise, NoiseConfig};
use noise::{Fbm, MultiFractal, NoiseFn, OpenSimplex};
use rayon::prelude::*;
use terrastead_data::MAP_SIZE;

/// Maps a raw noise sample from `[-1, 1]` to `[0, 1]`.
#[inline]
#[must_use]
pub fn normalize(v: f32) -> f32 {
    (v + 1.0) / 2.0
}

/// Dense row-major scalar field in the noise library's native range.
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseField {
    values: Vec<f32>,
}

impl NoiseField {
    /// Samples fractal simplex noise at every cell, one rayon task per row.
    #[must_use]
    pub fn generate(seed: u32, params: FieldNoise) -> Self {
        let fbm: Fbm<OpenSimplex> = Fbm::new(seed)
            .set_octaves(params.octaves)
            .set_frequency(params.frequency);

        let mut values = vec![0.0f32; MAP_SIZE * MAP_SIZE];
        values
            .par_chunks_mut(MAP_SIZE)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, v) in row.iter_mut().enumerate() {
                    *v = fbm.get([x as f64, y as f64]) as f32;
                }
            });
        Self { values }
    }

    /// Field filled with one raw value.
    #[must_use]
    pub fn constant(v: f32) -> Self {
        Self {
            values: vec![v; MAP_SIZE * MAP_SIZE],
        }
    }

    #[inline]
    #[must_use]
    pub fn normalized(&self, idx: usize) -> f32 {
        normalize(self.values[idx])
    }
}

/// The five fields used to classify every cell.
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseFields {
    pub biome1: NoiseField,
    pub biome2: NoiseField,
    pub height: NoiseField,
    pub plant1: NoiseField,
    pub plant2: NoiseField,
}

/// Normalized samples of all five fields at one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSample {
    pub biome1: f32,
    pub biome2: f32,
    pub height: f32,
    pub plant1: f32,
    pub plant2: f32,
}

impl NoiseFields {
    /// Generates all five fields. Field `i` is seeded with `seed + i`.
    #[must_use]
    pub fn generate(seed: u64, config: &NoiseConfig) -> Self {
        let base = seed as u32;
        let params = [
            config.biome,
            config.biome,
            config.height,
            config.plant1,
            config.plant2,
        ];
        let [biome1, biome2, height, plant1, plant2] = [0u32, 1, 2, 3, 4]
            .map(|i| NoiseField::generate(base.wrapping_add(i), params[i as usize]));
        Self {
            biome1,
            biome2,
            height,
            plant1,
            plant2,
        }
    }

    /// All fields set to the same raw value.
    #[must_use]
    pub fn constant(v: f32) -> Self {
        Self {
            biome1: NoiseField::constant(v),
            biome2: NoiseField::constant(v),
            height: NoiseField::constant(v),
            plant1: NoiseField::constant(v),
            plant2: NoiseField::constant(v),
        }
    }

    #[inline]
    #[must_use]
    pub fn sample(&self, idx: usize) -> CellSample {
        CellSample {
            biome1: self.biome1.normalized(idx),
            biome2: self.biome2.normalized(idx),
            height: self.height.normalized(idx),
            plant1: self.plant1.normalized(idx),
            plant2: self.plant2.normalized(idx),
        }
    }
}
