//! # Terrastead Data
//!
//! Plain data shared by every crate in the workspace: the grid cell layout,
//! the persisted creature record and the read-only content tables
//! (tile, object and biome definitions) that the world queries by id.

pub mod data;

pub use data::content::{
    BiomeDef, ContentLookup, ContentTables, HeightBand, ObjectDef, OpenNeighbors, TileDef,
};
pub use data::content::ids;
pub use data::tile::{CreatureRecord, MapTile, MAP_SIZE};
