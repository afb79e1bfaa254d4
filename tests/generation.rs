mod common;

use common::MapBuilder;
use terrastead_core::config::NoiseConfig;
use terrastead_core::noise::{NoiseField, NoiseFields};
use terrastead_core::{BiomeResolver, TileGrid};
use terrastead_data::{ids, ContentLookup, ContentTables, MAP_SIZE};
use terrastead_lib::MapOrigin;

fn offline() -> MapBuilder {
    MapBuilder::new().with_config(|c| c.map.saving_enabled = false)
}

#[test]
fn test_same_seed_same_grid() {
    let a = offline().with_seed(7).build();
    let b = offline().with_seed(7).build();
    assert_same_grid!(a, b);
    assert_eq!(a.origin(), MapOrigin::Generated { seed: 7 });
}

#[test]
fn test_different_seeds_differ() {
    let a = offline().with_seed(1).build();
    let b = offline().with_seed(2).build();
    assert_ne!(a.grid().cells(), b.grid().cells());
}

#[test]
fn test_grid_matches_per_cell_resolution() {
    let content = ContentTables::default();
    let fields = NoiseFields::generate(99, &NoiseConfig::default());
    let grid = TileGrid::generate(&fields, &content).unwrap();
    let resolver = BiomeResolver::new(&content);

    for idx in (0..MAP_SIZE * MAP_SIZE).step_by(997) {
        let (tile, object) = resolver.resolve(&fields.sample(idx)).unwrap();
        let cell = grid.cells()[idx];
        assert_eq!((cell.tile, cell.object), (tile, object), "cell {idx}");
    }
}

#[test]
fn test_object_health_comes_from_content() {
    let map = offline().build();
    let content = ContentTables::default();
    for cell in map.grid().cells() {
        if cell.has_object() {
            let def = content.object(cell.object).expect("generated object is defined");
            assert_eq!(cell.object_health, def.health);
        } else {
            assert_eq!(cell.object_health, 0);
        }
        assert!(content.tile(cell.tile).is_some());
    }
}

#[test]
fn test_low_selector_fills_ocean() {
    let content = ContentTables::default();
    let mut fields = NoiseFields::constant(0.0);
    // Raw -0.8 normalizes to 0.1, inside the ocean selector range.
    fields.biome1 = NoiseField::constant(-0.8);
    let grid = TileGrid::generate(&fields, &content).unwrap();
    assert!(grid
        .cells()
        .iter()
        .all(|c| c.tile == ids::WATER && !c.has_object()));
}

#[test]
fn test_missing_biome_fails_generation() {
    let mut content = ContentTables::default();
    content.biomes.retain(|b| b.name != "ocean");
    let fields = NoiseFields::constant(-0.8);
    let err = TileGrid::generate(&fields, &content).unwrap_err();
    assert!(err.to_string().contains("No biome"));
}

#[test]
fn test_map_new_surfaces_missing_biome() {
    let mut content = ContentTables::default();
    content.biomes.clear();
    let builder = offline().with_content(content);
    let result = terrastead_lib::Map::new(builder.config(), builder.content());
    assert!(result.is_err());
}
