//! Read-only game content: tiles, objects and biomes.
//!
//! The world never mutates content. Everything is looked up by integer id
//! through [`ContentLookup`], so tests and tools can swap in their own tables.

use serde::{Deserialize, Serialize};

/// Ground layer definition.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TileDef {
    pub id: i16,
    pub name: String,
    pub texture: i32,
    /// Character used by text previews.
    #[serde(default = "default_symbol")]
    pub symbol: char,
}

fn default_symbol() -> char {
    '?'
}

/// Object layer definition (plants, walls, rocks...).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ObjectDef {
    pub id: i16,
    pub name: String,
    pub texture: i32,
    pub health: i16,
    /// Item id spawned when the object is destroyed.
    #[serde(default)]
    pub drops_as: i16,
    /// Blocks the "open" state of neighbouring multi-texture objects.
    #[serde(default)]
    pub wall: bool,
    /// Texture depends on the open/walled state of the 8 neighbours.
    #[serde(default)]
    pub multitexture: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<char>,
}

/// Open/closed state of the 8 neighbours of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct OpenNeighbors(pub u8);

impl OpenNeighbors {
    pub const RIGHT: u8 = 1 << 0;
    pub const TOP: u8 = 1 << 1;
    pub const LEFT: u8 = 1 << 2;
    pub const BOTTOM: u8 = 1 << 3;
    pub const TOP_RIGHT: u8 = 1 << 4;
    pub const TOP_LEFT: u8 = 1 << 5;
    pub const BOTTOM_LEFT: u8 = 1 << 6;
    pub const BOTTOM_RIGHT: u8 = 1 << 7;

    pub const CARDINALS: u8 = Self::RIGHT | Self::TOP | Self::LEFT | Self::BOTTOM;

    #[inline]
    pub fn set(&mut self, flag: u8, open: bool) {
        if open {
            self.0 |= flag;
        } else {
            self.0 &= !flag;
        }
    }

    #[inline]
    #[must_use]
    pub fn is_open(&self, flag: u8) -> bool {
        self.0 & flag != 0
    }

    #[inline]
    #[must_use]
    pub fn cardinals(&self) -> u8 {
        self.0 & Self::CARDINALS
    }

    #[inline]
    #[must_use]
    pub fn diagonals(&self) -> u8 {
        self.0 >> 4
    }
}

impl ObjectDef {
    /// Texture for this object given its neighbourhood.
    ///
    /// Multi-texture objects lay out 32 variants after `texture`: the first 16
    /// are indexed by the cardinal mask, the next 16 cover fully enclosed
    /// cells and are indexed by the diagonal mask.
    #[must_use]
    pub fn texture_variant(&self, open: OpenNeighbors) -> i32 {
        if !self.multitexture {
            return self.texture;
        }
        let cardinals = open.cardinals();
        if cardinals != 0 {
            self.texture + i32::from(cardinals)
        } else {
            self.texture + 16 + i32::from(open.diagonals())
        }
    }
}

/// One entry of a biome's ordered height table.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HeightBand {
    pub tile: i16,
    /// Cumulative upper bound of normalized height covered by this band.
    pub height: f32,
    #[serde(default)]
    pub grass: i16,
    #[serde(default = "never")]
    pub grass_rarity: f32,
    #[serde(default)]
    pub plant: i16,
    #[serde(default = "never")]
    pub plant_rarity: f32,
}

fn never() -> f32 {
    1.0
}

impl HeightBand {
    #[must_use]
    pub fn bare(tile: i16, height: f32) -> Self {
        Self {
            tile,
            height,
            grass: 0,
            grass_rarity: 1.0,
            plant: 0,
            plant_rarity: 1.0,
        }
    }
}

/// A region classification selected by the two biome noise fields.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BiomeDef {
    pub name: String,
    /// Inclusive range of the first normalized selector value.
    pub selector1: [f32; 2],
    /// Inclusive range of the second normalized selector value.
    pub selector2: [f32; 2],
    pub bands: Vec<HeightBand>,
}

impl BiomeDef {
    #[inline]
    #[must_use]
    pub fn contains(&self, s1: f32, s2: f32) -> bool {
        s1 >= self.selector1[0]
            && s1 <= self.selector1[1]
            && s2 >= self.selector2[0]
            && s2 <= self.selector2[1]
    }
}

/// Content lookup service consumed by the world.
pub trait ContentLookup: Send + Sync {
    fn tile(&self, id: i16) -> Option<&TileDef>;
    fn object(&self, id: i16) -> Option<&ObjectDef>;
    /// Biome covering the two normalized selector values, if any.
    fn biome(&self, selector1: f32, selector2: f32) -> Option<&BiomeDef>;
}

/// Serde-loadable content tables. Tile and object ids equal their position.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ContentTables {
    pub tiles: Vec<TileDef>,
    pub objects: Vec<ObjectDef>,
    pub biomes: Vec<BiomeDef>,
}

impl ContentLookup for ContentTables {
    fn tile(&self, id: i16) -> Option<&TileDef> {
        usize::try_from(id).ok().and_then(|i| self.tiles.get(i))
    }

    fn object(&self, id: i16) -> Option<&ObjectDef> {
        usize::try_from(id).ok().and_then(|i| self.objects.get(i))
    }

    fn biome(&self, selector1: f32, selector2: f32) -> Option<&BiomeDef> {
        self.biomes.iter().find(|b| b.contains(selector1, selector2))
    }
}

impl ContentTables {
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let tables = toml::from_str::<Self>(content)?;
        tables.validate()?;
        Ok(tables)
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        let tables = serde_json::from_str::<Self>(content)?;
        tables.validate()?;
        Ok(tables)
    }

    /// Checks id layout, band tables and biome coverage of `[0,1]²`.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.tiles.is_empty(), "Content must define tiles");
        anyhow::ensure!(
            !self.objects.is_empty(),
            "Content must define object 0 (no object)"
        );
        for (i, t) in self.tiles.iter().enumerate() {
            anyhow::ensure!(
                usize::try_from(t.id).ok() == Some(i),
                "Tile '{}' has id {} but sits at index {}",
                t.name,
                t.id,
                i
            );
        }
        for (i, o) in self.objects.iter().enumerate() {
            anyhow::ensure!(
                usize::try_from(o.id).ok() == Some(i),
                "Object '{}' has id {} but sits at index {}",
                o.name,
                o.id,
                i
            );
        }
        for biome in &self.biomes {
            anyhow::ensure!(
                !biome.bands.is_empty(),
                "Biome '{}' has no height bands",
                biome.name
            );
            for band in &biome.bands {
                anyhow::ensure!(
                    self.tile(band.tile).is_some(),
                    "Biome '{}' references unknown tile {}",
                    biome.name,
                    band.tile
                );
                for obj in [band.grass, band.plant] {
                    anyhow::ensure!(
                        self.object(obj).is_some(),
                        "Biome '{}' references unknown object {}",
                        biome.name,
                        obj
                    );
                }
            }
        }

        const STEPS: u16 = 20;
        for i in 0..=STEPS {
            for j in 0..=STEPS {
                let s1 = f32::from(i) / f32::from(STEPS);
                let s2 = f32::from(j) / f32::from(STEPS);
                anyhow::ensure!(
                    self.biome(s1, s2).is_some(),
                    "No biome covers selector ({s1:.2}, {s2:.2})"
                );
            }
        }
        Ok(())
    }
}

pub mod ids {
    pub const WATER: i16 = 0;
    pub const SAND: i16 = 1;
    pub const GRASS: i16 = 2;
    pub const STONE: i16 = 3;

    pub const NONE: i16 = 0;
    pub const GRASS_TUFT: i16 = 1;
    pub const TREE: i16 = 2;
    pub const CACTUS: i16 = 3;
    pub const STONE_WALL: i16 = 4;
}

impl Default for ContentTables {
    fn default() -> Self {
        use ids::*;

        let tile = |id: i16, name: &str, symbol: char| TileDef {
            id,
            name: name.to_string(),
            texture: i32::from(id),
            symbol,
        };
        let object =
            |id: i16, name: &str, texture: i32, health: i16, drops_as: i16| ObjectDef {
                id,
                name: name.to_string(),
                texture,
                health,
                drops_as,
                ..Default::default()
            };

        Self {
            tiles: vec![
                tile(WATER, "water", '~'),
                tile(SAND, "sand", '.'),
                tile(GRASS, "grass", ','),
                tile(STONE, "stone", '^'),
            ],
            objects: vec![
                object(NONE, "none", 0, 0, 0),
                ObjectDef {
                    symbol: Some('"'),
                    ..object(GRASS_TUFT, "grass_tuft", 16, 1, 1)
                },
                ObjectDef {
                    symbol: Some('T'),
                    ..object(TREE, "tree", 17, 8, 2)
                },
                ObjectDef {
                    symbol: Some('Y'),
                    ..object(CACTUS, "cactus", 18, 4, 3)
                },
                ObjectDef {
                    wall: true,
                    multitexture: true,
                    symbol: Some('#'),
                    ..object(STONE_WALL, "stone_wall", 32, 12, 4)
                },
            ],
            biomes: vec![
                BiomeDef {
                    name: "ocean".to_string(),
                    selector1: [0.0, 0.3],
                    selector2: [0.0, 1.0],
                    bands: vec![HeightBand::bare(WATER, 1.0)],
                },
                BiomeDef {
                    name: "desert".to_string(),
                    selector1: [0.3, 1.0],
                    selector2: [0.0, 0.35],
                    bands: vec![
                        HeightBand {
                            plant: CACTUS,
                            plant_rarity: 0.75,
                            ..HeightBand::bare(SAND, 0.7)
                        },
                        HeightBand {
                            plant: STONE_WALL,
                            plant_rarity: 0.45,
                            ..HeightBand::bare(STONE, 1.0)
                        },
                    ],
                },
                BiomeDef {
                    name: "plains".to_string(),
                    selector1: [0.3, 0.7],
                    selector2: [0.35, 1.0],
                    bands: vec![
                        HeightBand::bare(WATER, 0.3),
                        HeightBand::bare(SAND, 0.38),
                        HeightBand {
                            grass: GRASS_TUFT,
                            grass_rarity: 0.55,
                            plant: TREE,
                            plant_rarity: 0.75,
                            ..HeightBand::bare(GRASS, 0.8)
                        },
                        HeightBand {
                            plant: STONE_WALL,
                            plant_rarity: 0.3,
                            ..HeightBand::bare(STONE, 1.0)
                        },
                    ],
                },
                BiomeDef {
                    name: "forest".to_string(),
                    selector1: [0.7, 1.0],
                    selector2: [0.35, 1.0],
                    bands: vec![
                        HeightBand::bare(WATER, 0.25),
                        HeightBand {
                            grass: GRASS_TUFT,
                            grass_rarity: 0.5,
                            plant: TREE,
                            plant_rarity: 0.45,
                            ..HeightBand::bare(GRASS, 0.85)
                        },
                        HeightBand {
                            plant: STONE_WALL,
                            plant_rarity: 0.3,
                            ..HeightBand::bare(STONE, 1.0)
                        },
                    ],
                },
            ],
        }
    }
}
