pub mod macros;

use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;
use terrastead_data::{ContentLookup, ContentTables, MapTile};
use terrastead_lib::model::config::AppConfig;
use terrastead_lib::Map;
use uuid::Uuid;

type MapMod = Box<dyn FnOnce(&mut Map)>;

/// Fresh directory under the system temp dir, unique per call.
#[allow(dead_code)]
pub fn temp_save_root() -> PathBuf {
    std::env::temp_dir().join(format!("terrastead-test-{}", Uuid::new_v4()))
}

/// Removes its directory tree when dropped.
pub struct TempSaveRoot(PathBuf);

impl Drop for TempSaveRoot {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

/// A built map that deletes its save root when it goes out of scope.
pub struct TestMap {
    map: Map,
    _root: TempSaveRoot,
}

impl Deref for TestMap {
    type Target = Map;

    fn deref(&self) -> &Map {
        &self.map
    }
}

impl DerefMut for TestMap {
    fn deref_mut(&mut self) -> &mut Map {
        &mut self.map
    }
}

#[allow(dead_code)]
pub struct MapBuilder {
    root: PathBuf,
    config: AppConfig,
    content: Arc<dyn ContentLookup>,
    map_mods: Vec<MapMod>,
}

#[allow(dead_code)]
impl MapBuilder {
    pub fn new() -> Self {
        let root = temp_save_root();
        let mut config = AppConfig::default();
        config.map.seed = Some(42);
        config.map.save_root = root.clone();
        Self {
            root,
            config,
            content: Arc::new(ContentTables::default()),
            map_mods: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.map.seed = Some(seed);
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn with_content(mut self, content: ContentTables) -> Self {
        self.content = Arc::new(content);
        self
    }

    pub fn with_creature(mut self, x: f32, y: f32, species_id: i16, carries_item: bool) -> Self {
        self.map_mods.push(Box::new(move |map| {
            map.add_creature(x, y, species_id, carries_item);
        }));
        self
    }

    pub fn config(&self) -> AppConfig {
        self.config.clone()
    }

    pub fn content(&self) -> Arc<dyn ContentLookup> {
        Arc::clone(&self.content)
    }

    /// Builds the map. Its save root, including anything other maps write
    /// there with [`Self::config`], is removed when the result is dropped.
    pub fn build(self) -> TestMap {
        let root = TempSaveRoot(self.root);
        let mut map = Map::new(self.config, self.content).expect("Failed to create map in test builder");
        for modifier in self.map_mods {
            modifier(&mut map);
        }
        TestMap { map, _root: root }
    }
}

/// First cell, in row-major order, whose object is `object`.
#[allow(dead_code)]
pub fn find_object(map: &Map, object: i16) -> Option<(usize, usize, MapTile)> {
    map.grid()
        .cells()
        .iter()
        .enumerate()
        .find(|(_, c)| c.object == object)
        .map(|(i, c)| {
            let size = terrastead_data::MAP_SIZE;
            (i % size, i / size, *c)
        })
}
