//! Biome lookup and per-cell tile/object classification.

use crate::noise::CellSample;
use terrastead_data::{BiomeDef, ContentLookup, HeightBand};

/// Resolves normalized noise samples into content ids.
pub struct BiomeResolver<'a, C: ContentLookup + ?Sized> {
    content: &'a C,
}

impl<'a, C: ContentLookup + ?Sized> BiomeResolver<'a, C> {
    pub fn new(content: &'a C) -> Self {
        Self { content }
    }

    /// Biome selected by the two normalized selector values.
    ///
    /// `None` means the content tables leave a hole in `[0,1]²`, which callers
    /// treat as a fatal content error.
    pub fn resolve_biome(&self, selector1: f32, selector2: f32) -> Option<&'a BiomeDef> {
        self.content.biome(selector1, selector2)
    }

    /// Full classification of one cell. `None` when no biome matches.
    pub fn resolve(&self, sample: &CellSample) -> Option<(i16, i16)> {
        let biome = self.resolve_biome(sample.biome1, sample.biome2)?;
        Some(resolve_cell(
            biome,
            sample.height,
            sample.plant1,
            sample.plant2,
        ))
    }
}

/// Picks the height band for `height`.
///
/// Single-band biomes skip the comparison. Otherwise the first band whose
/// cumulative threshold is `>= height` wins; heights above every threshold
/// land in the last band.
#[must_use]
pub fn select_band(biome: &BiomeDef, height: f32) -> Option<&HeightBand> {
    match biome.bands.as_slice() {
        [] => None,
        [only] => Some(only),
        bands => bands
            .iter()
            .find(|band| height <= band.height)
            .or_else(|| bands.last()),
    }
}

/// Grass overlay first, plant second, at most one object per cell.
#[must_use]
pub fn overlay_object(band: &HeightBand, plant1: f32, plant2: f32) -> i16 {
    if band.grass != 0 && plant1 > band.grass_rarity {
        return band.grass;
    }
    if band.plant != 0 && plant2 > band.plant_rarity {
        return band.plant;
    }
    0
}

/// `(tile, object)` for one cell of `biome`, from normalized field values.
#[must_use]
pub fn resolve_cell(biome: &BiomeDef, height: f32, plant1: f32, plant2: f32) -> (i16, i16) {
    match select_band(biome, height) {
        Some(band) => (band.tile, overlay_object(band, plant1, plant2)),
        None => {
            tracing::error!(biome = %biome.name, "Biome has no height bands");
            (0, 0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terrastead_data::ContentTables;

    fn banded() -> BiomeDef {
        BiomeDef {
            name: "banded".to_string(),
            selector1: [0.0, 1.0],
            selector2: [0.0, 1.0],
            bands: vec![
                HeightBand::bare(1, 0.3),
                HeightBand::bare(2, 0.7),
                HeightBand::bare(3, 1.0),
            ],
        }
    }

    fn single(grass: i16, grass_rarity: f32) -> BiomeDef {
        BiomeDef {
            name: "single".to_string(),
            selector1: [0.0, 1.0],
            selector2: [0.0, 1.0],
            bands: vec![HeightBand {
                grass,
                grass_rarity,
                ..HeightBand::bare(4, 0.1)
            }],
        }
    }

    #[test]
    fn test_band_threshold_is_inclusive() {
        let biome = banded();
        assert_eq!(resolve_cell(&biome, 0.3, 0.0, 0.0).0, 1);
        assert_eq!(resolve_cell(&biome, 0.31, 0.0, 0.0).0, 2);
        assert_eq!(resolve_cell(&biome, 1.0, 0.0, 0.0).0, 3);
        assert_eq!(resolve_cell(&biome, 0.0, 0.0, 0.0).0, 1);
    }

    #[test]
    fn test_equal_thresholds_favor_earlier_band() {
        let mut biome = banded();
        biome.bands.insert(1, HeightBand::bare(9, 0.3));
        assert_eq!(resolve_cell(&biome, 0.3, 0.0, 0.0).0, 1);
    }

    #[test]
    fn test_height_above_every_band_uses_last() {
        assert_eq!(resolve_cell(&banded(), 1.02, 0.0, 0.0).0, 3);
    }

    #[test]
    fn test_single_band_ignores_height() {
        let biome = single(0, 1.0);
        assert_eq!(resolve_cell(&biome, 0.95, 0.0, 0.0), (4, 0));
    }

    #[test]
    fn test_grass_overlay_rarity() {
        let biome = single(5, 0.8);
        assert_eq!(resolve_cell(&biome, 0.5, 0.9, 0.0).1, 5);
        assert_eq!(resolve_cell(&biome, 0.5, 0.5, 0.0).1, 0);
        assert_eq!(resolve_cell(&biome, 0.5, 0.8, 0.0).1, 0);
    }

    #[test]
    fn test_grass_checked_before_plant() {
        let band = HeightBand {
            grass: 5,
            grass_rarity: 0.5,
            plant: 6,
            plant_rarity: 0.5,
            ..HeightBand::bare(1, 1.0)
        };
        assert_eq!(overlay_object(&band, 0.9, 0.9), 5);
        assert_eq!(overlay_object(&band, 0.1, 0.9), 6);
        assert_eq!(overlay_object(&band, 0.1, 0.1), 0);
    }

    #[test]
    fn test_zero_ids_never_overlay() {
        let band = HeightBand {
            grass_rarity: 0.0,
            plant_rarity: 0.0,
            ..HeightBand::bare(1, 1.0)
        };
        assert_eq!(overlay_object(&band, 1.0, 1.0), 0);
    }

    #[test]
    fn test_resolver_reports_missing_biome() {
        let mut content = ContentTables::default();
        content.biomes.clear();
        let resolver = BiomeResolver::new(&content);
        let sample = CellSample {
            biome1: 0.5,
            biome2: 0.5,
            height: 0.5,
            plant1: 0.5,
            plant2: 0.5,
        };
        assert!(resolver.resolve(&sample).is_none());
    }
}
