//! The playable map: tile grid, creatures and their save directory.
//!
//! Construction tries the save directory first and falls back to generating
//! a fresh grid from noise. Everything after that runs on the game tick
//! thread: `update`, `save`, `hit` and the creature operations are plain
//! blocking calls.

use crate::model::config::AppConfig;
use crate::model::creature::{Creature, CreatureId, CreatureRegistry};
use crate::model::grid::{DamageOutcome, TileGrid};
use crate::model::noise::NoiseFields;
use anyhow::Context;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use terrastead_data::{ContentLookup, MapTile, MAP_SIZE};
use terrastead_io::{DecompressPolicy, MapStore};

/// How the current grid came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MapOrigin {
    /// Restored from `tile.data` / `creature.data`.
    Loaded,
    /// Built from noise with this base seed.
    Generated { seed: u64 },
}

/// Textures to draw at one grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellView {
    pub x: i32,
    pub y: i32,
    pub tile_texture: i32,
    pub object_texture: i32,
}

/// Seed derived from the wall clock, in microseconds.
#[must_use]
pub fn clock_seed() -> u64 {
    chrono::Utc::now().timestamp_micros() as u64
}

pub struct Map {
    name: String,
    config: AppConfig,
    content: Arc<dyn ContentLookup>,
    store: MapStore,
    grid: TileGrid,
    creatures: CreatureRegistry,
    origin: MapOrigin,
}

impl Map {
    /// Loads the named map, generating a new one when no usable save exists.
    ///
    /// A missing save and a corrupt save (under strict decompression) both
    /// fall back to generation. File system errors are returned.
    pub fn new(config: AppConfig, content: Arc<dyn ContentLookup>) -> anyhow::Result<Self> {
        config.validate()?;
        let start = Instant::now();
        tracing::info!(name = %config.map.name, "World loading started");

        let mut map = Self::empty(config, content);
        let loaded = if map.config.map.saving_enabled {
            map.try_load()?
        } else {
            false
        };
        if !loaded {
            let seed = map.config.map.seed.unwrap_or_else(clock_seed);
            map.regenerate(seed)?;
        }

        tracing::info!(
            elapsed_us = start.elapsed().as_micros() as u64,
            origin = ?map.origin,
            "World ready"
        );
        Ok(map)
    }

    /// Builds a fresh map from `seed`, ignoring any existing save.
    pub fn generate(
        config: AppConfig,
        content: Arc<dyn ContentLookup>,
        seed: u64,
    ) -> anyhow::Result<Self> {
        config.validate()?;
        let mut map = Self::empty(config, content);
        map.regenerate(seed)?;
        Ok(map)
    }

    fn empty(config: AppConfig, content: Arc<dyn ContentLookup>) -> Self {
        let store = MapStore::new(
            &config.map.save_root,
            &config.map.name,
            DecompressPolicy::from_strict(config.persistence.strict_decompression),
        );
        Self {
            name: config.map.name.clone(),
            config,
            content,
            store,
            grid: TileGrid::filled(MapTile::default()),
            creatures: CreatureRegistry::new(),
            origin: MapOrigin::Loaded,
        }
    }

    /// Returns whether a save was restored.
    fn try_load(&mut self) -> anyhow::Result<bool> {
        match self.store.load() {
            Ok(Some(save)) => {
                self.grid = save.grid;
                self.creatures.clear();
                for record in &save.creatures {
                    self.creatures.insert(Creature::from_record(record));
                }
                self.origin = MapOrigin::Loaded;
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(e) if e.is_corruption() => {
                tracing::error!(error = %e, "Save data unusable, regenerating the map");
                Ok(false)
            }
            Err(e) => Err(e).with_context(|| format!("loading map '{}'", self.name)),
        }
    }

    /// Rebuilds the grid from noise and drops every creature.
    pub fn regenerate(&mut self, seed: u64) -> anyhow::Result<()> {
        let start = Instant::now();
        let fields = NoiseFields::generate(seed, &self.config.noise);
        tracing::info!(
            seed,
            elapsed_us = start.elapsed().as_micros() as u64,
            "Noisemaps generated"
        );

        self.grid = TileGrid::generate(&fields, self.content.as_ref())
            .with_context(|| format!("generating map '{}'", self.name))?;
        self.creatures.clear();
        self.origin = MapOrigin::Generated { seed };
        tracing::info!(
            elapsed_us = start.elapsed().as_micros() as u64,
            "Map generated"
        );
        Ok(())
    }

    /// Advances every creature by one tick.
    pub fn update(&mut self) {
        self.creatures.tick(&self.config.creatures);
    }

    /// Writes the grid and creatures to the map's save directory.
    pub fn save(&self) -> anyhow::Result<()> {
        if !self.config.map.saving_enabled {
            tracing::debug!(name = %self.name, "Saving disabled, skipping");
            return Ok(());
        }
        self.store
            .save(&self.grid, &self.creatures.records())
            .with_context(|| format!("saving map '{}'", self.name))
    }

    /// Damages the object at `(x, y)`. A destroyed object drops its item as
    /// a creature at the cell centre. Empty cells count as object 0, so a
    /// positive hit on one drops object 0's item.
    ///
    /// Coordinates are not clamped; `None` means they were off the grid.
    pub fn hit(&mut self, x: usize, y: usize, damage: i16) -> Option<DamageOutcome> {
        let outcome = self.grid.damage(x, y, damage, self.content.as_ref());
        match outcome {
            Some(DamageOutcome::Destroyed { object, drops_as }) => {
                tracing::debug!(x, y, object, drops_as, "Object destroyed");
                self.creatures
                    .spawn(x as f32 + 0.5, y as f32 + 0.5, drops_as, true);
            }
            Some(DamageOutcome::Damaged { .. }) => {}
            None => tracing::warn!(x, y, "Hit outside the map"),
        }
        outcome
    }

    /// Cell at `(x, y)`, clamped to the grid edge.
    #[must_use]
    pub fn get_tile(&self, x: i32, y: i32) -> &MapTile {
        self.grid.get(x, y)
    }

    #[must_use]
    pub fn object_texture(&self, x: i32, y: i32) -> i32 {
        self.grid.object_texture(x, y, self.content.as_ref())
    }

    #[must_use]
    pub fn tile_texture(&self, x: i32, y: i32) -> i32 {
        self.content
            .tile(self.grid.get(x, y).tile)
            .map_or(0, |t| t.texture)
    }

    /// Textures for the window `[cx - half_w, cx + half_w) × [cy - half_h, cy + half_h)`.
    ///
    /// Positions past the edge repeat the edge cell. Half extents are capped
    /// at `MAP_SIZE`; anything wider would only repeat edge cells.
    #[must_use]
    pub fn view(&self, cx: i32, cy: i32, half_w: i32, half_h: i32) -> Vec<CellView> {
        let max_half = MAP_SIZE as i32;
        let (half_w, half_h) = (half_w.clamp(0, max_half), half_h.clamp(0, max_half));
        let mut cells = Vec::with_capacity(4 * half_w as usize * half_h as usize);
        for y in cy.saturating_sub(half_h)..cy.saturating_add(half_h) {
            for x in cx.saturating_sub(half_w)..cx.saturating_add(half_w) {
                cells.push(CellView {
                    x,
                    y,
                    tile_texture: self.tile_texture(x, y),
                    object_texture: self.object_texture(x, y),
                });
            }
        }
        cells
    }

    pub fn add_creature(
        &mut self,
        x: f32,
        y: f32,
        species_id: i16,
        carries_item: bool,
    ) -> CreatureId {
        self.creatures.spawn(x, y, species_id, carries_item)
    }

    pub fn remove_creature(&mut self, id: CreatureId) -> Option<Creature> {
        self.creatures.remove(id)
    }

    pub fn remove_creature_at(&mut self, index: usize) -> Option<Creature> {
        self.creatures.remove_at(index)
    }

    #[must_use]
    pub fn find_all_creatures(&self, x: f32, y: f32, radius: f32) -> Vec<CreatureId> {
        self.creatures.find_in_radius(x, y, radius)
    }

    #[must_use]
    pub fn creature(&self, id: CreatureId) -> Option<&Creature> {
        self.creatures.get(id)
    }

    pub fn creature_mut(&mut self, id: CreatureId) -> Option<&mut Creature> {
        self.creatures.get_mut(id)
    }

    #[must_use]
    pub fn creatures(&self) -> &CreatureRegistry {
        &self.creatures
    }

    #[must_use]
    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Whether any cell changed since the last call.
    pub fn take_tiles_changed(&mut self) -> bool {
        self.grid.take_dirty()
    }

    #[must_use]
    pub fn content(&self) -> &dyn ContentLookup {
        self.content.as_ref()
    }

    #[must_use]
    pub fn origin(&self) -> MapOrigin {
        self.origin
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn save_dir(&self) -> &Path {
        self.store.dir()
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
