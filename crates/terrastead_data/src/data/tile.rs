use serde::{Deserialize, Serialize};

/// Side length of the square world grid, in cells.
pub const MAP_SIZE: usize = 512;

/// One slot of the world grid.
///
/// `object == 0` means the cell carries no object. `object_health` is only
/// meaningful while an object is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct MapTile {
    pub tile: i16,
    pub object: i16,
    pub object_health: i16,
}

impl MapTile {
    #[must_use]
    pub const fn new(tile: i16, object: i16, object_health: i16) -> Self {
        Self {
            tile,
            object,
            object_health,
        }
    }

    #[inline]
    #[must_use]
    pub fn has_object(&self) -> bool {
        self.object != 0
    }
}

/// Persisted projection of a creature: position, species and carried item.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CreatureRecord {
    pub x: f32,
    pub y: f32,
    pub species_id: i16,
    pub carried_item: i16,
}

impl CreatureRecord {
    /// Encoded size of one record: two `f32` and two `i16`.
    pub const ENCODED_LEN: usize = 12;
}
