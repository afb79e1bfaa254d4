//! The world grid: `MAP_SIZE²` owned cells addressed row-major.

use crate::biome::BiomeResolver;
use crate::error::GenerationError;
use crate::noise::NoiseFields;
use rayon::prelude::*;
use terrastead_data::{ContentLookup, MapTile, OpenNeighbors, MAP_SIZE};

/// Result of applying damage to a cell's object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// The object survived with this much health left.
    Damaged { remaining: i16 },
    /// The object was removed. `drops_as` is the item it leaves behind.
    Destroyed { object: i16, drops_as: i16 },
}

/// Always holds exactly `MAP_SIZE²` cells; every constructor enforces it.
#[derive(Clone, Debug, PartialEq)]
pub struct TileGrid {
    cells: Vec<MapTile>,
    is_dirty: bool,
}

impl TileGrid {
    #[inline(always)]
    #[must_use]
    pub fn index(x: usize, y: usize) -> usize {
        y * MAP_SIZE + x
    }

    /// Clamps one axis to `[0, MAP_SIZE - 1]`.
    #[inline]
    #[must_use]
    pub fn clamp_coord(v: i32) -> usize {
        v.clamp(0, MAP_SIZE as i32 - 1) as usize
    }

    /// Grid with every slot set to `tile`.
    #[must_use]
    pub fn filled(tile: MapTile) -> Self {
        Self {
            cells: vec![tile; MAP_SIZE * MAP_SIZE],
            is_dirty: true,
        }
    }

    /// Wraps a row-major cell buffer. Returns `None` unless it holds `MAP_SIZE²` cells.
    #[must_use]
    pub fn from_cells(cells: Vec<MapTile>) -> Option<Self> {
        (cells.len() == MAP_SIZE * MAP_SIZE).then_some(Self {
            cells,
            is_dirty: true,
        })
    }

    /// Classifies every cell from the noise fields, one rayon task per row.
    ///
    /// Rows only read the shared fields and write their own slice.
    pub fn generate<C: ContentLookup + ?Sized>(
        fields: &NoiseFields,
        content: &C,
    ) -> Result<Self, GenerationError> {
        let resolver = BiomeResolver::new(content);
        let mut cells = vec![MapTile::default(); MAP_SIZE * MAP_SIZE];

        cells
            .par_chunks_mut(MAP_SIZE)
            .enumerate()
            .try_for_each(|(y, row)| {
                for (x, cell) in row.iter_mut().enumerate() {
                    let sample = fields.sample(Self::index(x, y));
                    let Some((tile, object)) = resolver.resolve(&sample) else {
                        tracing::error!(
                            x,
                            y,
                            selector1 = sample.biome1,
                            selector2 = sample.biome2,
                            "Biome lookup returned nothing"
                        );
                        return Err(GenerationError::MissingBiome {
                            x,
                            y,
                            selector1: sample.biome1,
                            selector2: sample.biome2,
                        });
                    };
                    let health = content.object(object).map_or(0, |o| o.health);
                    *cell = MapTile::new(tile, object, health);
                }
                Ok(())
            })?;

        Ok(Self {
            cells,
            is_dirty: true,
        })
    }

    /// Cell at `(x, y)` with each axis clamped to the grid edge.
    #[inline]
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> &MapTile {
        &self.cells[Self::index(Self::clamp_coord(x), Self::clamp_coord(y))]
    }

    #[inline]
    pub fn get_mut(&mut self, x: i32, y: i32) -> &mut MapTile {
        let idx = Self::index(Self::clamp_coord(x), Self::clamp_coord(y));
        &mut self.cells[idx]
    }

    /// Cell at `(x, y)` without clamping; `None` outside the grid.
    #[inline]
    #[must_use]
    pub fn cell(&self, x: i32, y: i32) -> Option<&MapTile> {
        let (x, y) = (usize::try_from(x).ok()?, usize::try_from(y).ok()?);
        (x < MAP_SIZE && y < MAP_SIZE).then(|| &self.cells[Self::index(x, y)])
    }

    #[inline]
    pub fn cell_mut(&mut self, x: usize, y: usize) -> Option<&mut MapTile> {
        if x < MAP_SIZE && y < MAP_SIZE {
            Some(&mut self.cells[Self::index(x, y)])
        } else {
            None
        }
    }

    #[must_use]
    pub fn cells(&self) -> &[MapTile] {
        &self.cells
    }

    /// Subtracts `damage` from the object at `(x, y)`.
    ///
    /// No clamping: out-of-range coordinates return `None`. When health
    /// drops to `<= 0` the object is destroyed: the object id resets to 0 and
    /// the tile is left untouched. Empty cells (object 0, health 0) take the
    /// same path, so any positive hit on them reports object 0 destroyed
    /// with object 0's drop.
    pub fn damage<C: ContentLookup + ?Sized>(
        &mut self,
        x: usize,
        y: usize,
        damage: i16,
        content: &C,
    ) -> Option<DamageOutcome> {
        let cell = self.cell_mut(x, y)?;
        cell.object_health = cell.object_health.saturating_sub(damage);
        let outcome = if cell.object_health <= 0 {
            let object = cell.object;
            cell.object = 0;
            DamageOutcome::Destroyed {
                object,
                drops_as: content.object(object).map_or(0, |o| o.drops_as),
            }
        } else {
            DamageOutcome::Damaged {
                remaining: cell.object_health,
            }
        };
        self.is_dirty = true;
        Some(outcome)
    }

    /// Open state of the 8 neighbours of `(x, y)`.
    ///
    /// A neighbour is open when it lies inside the grid and its object is not
    /// a wall. Cells past the edge count as closed.
    pub fn open_neighbors<C: ContentLookup + ?Sized>(
        &self,
        x: i32,
        y: i32,
        content: &C,
    ) -> OpenNeighbors {
        let is_open = |dx: i32, dy: i32| {
            self.cell(x + dx, y + dy)
                .is_some_and(|c| !content.object(c.object).is_some_and(|o| o.wall))
        };

        let mut open = OpenNeighbors::default();
        open.set(OpenNeighbors::RIGHT, is_open(1, 0));
        open.set(OpenNeighbors::TOP, is_open(0, -1));
        open.set(OpenNeighbors::LEFT, is_open(-1, 0));
        open.set(OpenNeighbors::BOTTOM, is_open(0, 1));
        open.set(OpenNeighbors::TOP_RIGHT, is_open(1, -1));
        open.set(OpenNeighbors::TOP_LEFT, is_open(-1, -1));
        open.set(OpenNeighbors::BOTTOM_LEFT, is_open(-1, 1));
        open.set(OpenNeighbors::BOTTOM_RIGHT, is_open(1, 1));
        open
    }

    /// Texture id to draw for the object at `(x, y)` (clamped).
    pub fn object_texture<C: ContentLookup + ?Sized>(&self, x: i32, y: i32, content: &C) -> i32 {
        let (x, y) = (Self::clamp_coord(x) as i32, Self::clamp_coord(y) as i32);
        let Some(object) = content.object(self.get(x, y).object) else {
            return 0;
        };
        if object.multitexture {
            object.texture_variant(self.open_neighbors(x, y, content))
        } else {
            object.texture
        }
    }

    /// Returns the dirty flag and clears it.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.is_dirty)
    }
}
