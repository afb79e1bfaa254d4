//! Creatures living on the grid and the registry that owns them.
//!
//! Queries are linear scans. Population sizes stay small enough that a
//! spatial index would not pay for its upkeep.

use crate::config::CreatureConfig;
use terrastead_data::CreatureRecord;
use uuid::Uuid;

/// Stable handle to a creature owned by a [`CreatureRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CreatureId(pub Uuid);

impl std::fmt::Display for CreatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Creature {
    id: CreatureId,
    pub x: f32,
    pub y: f32,
    pub vel_x: f32,
    pub vel_y: f32,
    /// Species, or the item id when `carries_item` is set.
    pub species_id: i16,
    /// Item drops are creatures carrying an item instead of a living species.
    pub carries_item: bool,
    pub age: u32,
}

impl Creature {
    #[must_use]
    pub fn new(x: f32, y: f32, species_id: i16, carries_item: bool) -> Self {
        Self {
            id: CreatureId(Uuid::new_v4()),
            x,
            y,
            vel_x: 0.0,
            vel_y: 0.0,
            species_id,
            carries_item,
            age: 0,
        }
    }

    #[must_use]
    pub fn from_record(record: &CreatureRecord) -> Self {
        Self::new(
            record.x,
            record.y,
            record.species_id,
            record.carried_item != 0,
        )
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> CreatureId {
        self.id
    }

    /// Persisted projection of this creature.
    #[must_use]
    pub fn record(&self) -> CreatureRecord {
        CreatureRecord {
            x: self.x,
            y: self.y,
            species_id: self.species_id,
            carried_item: i16::from(self.carries_item),
        }
    }

    /// Per-tick update. `index` is this creature's slot in the registry; a
    /// creature asks to be removed by pushing it onto `despawn`.
    pub fn update(&mut self, index: usize, config: &CreatureConfig, despawn: &mut Vec<usize>) {
        self.x += self.vel_x;
        self.y += self.vel_y;
        self.vel_x *= config.friction;
        self.vel_y *= config.friction;
        self.age = self.age.saturating_add(1);

        if self.carries_item
            && config.item_despawn_ticks > 0
            && self.age >= config.item_despawn_ticks
        {
            despawn.push(index);
        }
    }
}

/// Insertion-ordered owner of every creature on a map. No two entries share
/// a [`CreatureId`].
#[derive(Debug, Clone, Default)]
pub struct CreatureRegistry {
    creatures: Vec<Creature>,
}

impl CreatureRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a creature, takes ownership of it and returns its handle.
    pub fn spawn(&mut self, x: f32, y: f32, species_id: i16, carries_item: bool) -> CreatureId {
        let creature = Creature::new(x, y, species_id, carries_item);
        let id = creature.id();
        tracing::debug!(%id, x, y, species = species_id, "Creature spawned");
        self.creatures.push(creature);
        id
    }

    /// Takes ownership of `creature`. Returns `None`, leaving the registry
    /// unchanged, when an entry with the same id is already present.
    pub fn insert(&mut self, creature: Creature) -> Option<CreatureId> {
        let id = creature.id();
        if self.index_of(id).is_some() {
            tracing::error!(%id, "Creature already registered, ignoring duplicate");
            return None;
        }
        tracing::debug!(
            %id,
            x = creature.x,
            y = creature.y,
            species = creature.species_id,
            "Creature spawned"
        );
        self.creatures.push(creature);
        Some(id)
    }

    /// Removes the creature at `index`, keeping the order of the rest.
    pub fn remove_at(&mut self, index: usize) -> Option<Creature> {
        (index < self.creatures.len()).then(|| self.creatures.remove(index))
    }

    /// Removes the creature behind `id`.
    ///
    /// An unknown handle is a caller bug: it is logged at critical severity
    /// and the registry is left unchanged.
    pub fn remove(&mut self, id: CreatureId) -> Option<Creature> {
        match self.index_of(id) {
            Some(index) => self.remove_at(index),
            None => {
                tracing::error!(severity = "critical", %id, "Couldn't find creature to remove");
                None
            }
        }
    }

    #[must_use]
    pub fn index_of(&self, id: CreatureId) -> Option<usize> {
        self.creatures.iter().position(|c| c.id == id)
    }

    #[must_use]
    pub fn get(&self, id: CreatureId) -> Option<&Creature> {
        self.creatures.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: CreatureId) -> Option<&mut Creature> {
        self.creatures.iter_mut().find(|c| c.id == id)
    }

    /// Creatures whose x and y both lie in `[center - radius, center + radius]`.
    ///
    /// This is a box test on each axis, not a circular distance test.
    #[must_use]
    pub fn find_in_radius(&self, center_x: f32, center_y: f32, radius: f32) -> Vec<CreatureId> {
        let xs = (center_x - radius)..=(center_x + radius);
        let ys = (center_y - radius)..=(center_y + radius);
        self.creatures
            .iter()
            .filter(|c| xs.contains(&c.x) && ys.contains(&c.y))
            .map(Creature::id)
            .collect()
    }

    /// Updates every creature in registry order, then applies the removals
    /// they requested.
    pub fn tick(&mut self, config: &CreatureConfig) {
        let mut despawn = Vec::new();
        for (index, creature) in self.creatures.iter_mut().enumerate() {
            creature.update(index, config, &mut despawn);
        }
        despawn.sort_unstable();
        despawn.dedup();
        for index in despawn.into_iter().rev() {
            self.remove_at(index);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Creature> {
        self.creatures.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.creatures.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.creatures.is_empty()
    }

    pub fn clear(&mut self) {
        self.creatures.clear();
    }

    /// Persisted projection of every creature, in registry order.
    #[must_use]
    pub fn records(&self) -> Vec<CreatureRecord> {
        self.creatures.iter().map(Creature::record).collect()
    }
}
