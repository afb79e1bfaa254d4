//! Binary save format for one map.
//!
//! Layout under `<save_root>/<name>/`:
//! - `tile.data`: zlib stream of `MAP_SIZE² × (tile, object, health)` little
//!   endian `i16` triples, row-major.
//! - `creature.data`: uncompressed 12-byte records
//!   `(x: f32, y: f32, species: i16, carried_item: i16)`, little endian.

use crate::error::{IoError, Result};
use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;
use terrastead_core::grid::TileGrid;
use terrastead_data::{CreatureRecord, MapTile, MAP_SIZE};

pub const TILE_FILE: &str = "tile.data";
pub const CREATURE_FILE: &str = "creature.data";

/// Exact uncompressed length of `tile.data`.
pub const TILE_DATA_LEN: usize = MAP_SIZE * MAP_SIZE * 3 * std::mem::size_of::<i16>();

/// What to do when the tile stream does not inflate to exactly `TILE_DATA_LEN` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecompressPolicy {
    /// Log the failure and keep whatever was inflated, zero-filling the rest.
    #[default]
    Lenient,
    /// Fail the load.
    Strict,
}

impl DecompressPolicy {
    #[must_use]
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            Self::Strict
        } else {
            Self::Lenient
        }
    }
}

/// Upper bound of the zlib output size for `len` input bytes.
#[must_use]
pub fn compress_bound(len: usize) -> usize {
    len + (len >> 12) + (len >> 14) + (len >> 25) + 13
}

/// Flattens the grid into row-major little endian triples.
#[must_use]
pub fn encode_tiles(grid: &TileGrid) -> Vec<u8> {
    let mut out = Vec::with_capacity(TILE_DATA_LEN);
    for cell in grid.cells() {
        out.extend_from_slice(&cell.tile.to_le_bytes());
        out.extend_from_slice(&cell.object.to_le_bytes());
        out.extend_from_slice(&cell.object_health.to_le_bytes());
    }
    out
}

/// Rebuilds a grid from `TILE_DATA_LEN` bytes of triples.
pub fn decode_tiles(raw: &[u8]) -> Result<TileGrid> {
    if raw.len() != TILE_DATA_LEN {
        return Err(IoError::corrupt(format!(
            "tile payload is {} bytes, expected {TILE_DATA_LEN}",
            raw.len()
        )));
    }
    let cells = raw
        .chunks_exact(6)
        .map(|t| {
            MapTile::new(
                i16::from_le_bytes([t[0], t[1]]),
                i16::from_le_bytes([t[2], t[3]]),
                i16::from_le_bytes([t[4], t[5]]),
            )
        })
        .collect();
    TileGrid::from_cells(cells).ok_or_else(|| IoError::corrupt("tile payload has wrong cell count"))
}

pub fn compress_tiles(raw: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(compress_bound(raw.len()));
    let mut compressor = Compress::new(Compression::default(), true);
    match compressor.compress_vec(raw, &mut out, FlushCompress::Finish) {
        Ok(Status::StreamEnd) => Ok(out),
        Ok(status) => Err(IoError::compression(format!(
            "compressor stopped with {status:?} after {} bytes",
            compressor.total_out()
        ))),
        Err(e) => Err(IoError::compression(e.to_string())),
    }
}

/// Inflates the tile stream into a buffer pre-sized to `TILE_DATA_LEN`.
pub fn decompress_tiles(compressed: &[u8], policy: DecompressPolicy) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(TILE_DATA_LEN);
    let mut decompressor = Decompress::new(true);
    let result = decompressor.decompress_vec(compressed, &mut out, FlushDecompress::Finish);

    let failure = match result {
        Ok(Status::StreamEnd) if out.len() == TILE_DATA_LEN => None,
        Ok(Status::StreamEnd) => Some(format!(
            "inflated {} bytes, expected {TILE_DATA_LEN}",
            out.len()
        )),
        Ok(status) => Some(format!("inflate stopped with {status:?}")),
        Err(e) => Some(e.to_string()),
    };

    if let Some(reason) = failure {
        match policy {
            DecompressPolicy::Strict => return Err(IoError::compression(reason)),
            DecompressPolicy::Lenient => {
                tracing::error!(
                    reason = %reason,
                    inflated = out.len(),
                    "Error uncompressing save file, continuing with partial data"
                );
                out.resize(TILE_DATA_LEN, 0);
            }
        }
    }
    Ok(out)
}

#[must_use]
pub fn encode_creatures(records: &[CreatureRecord]) -> Vec<u8> {
    let mut out = Vec::with_capacity(records.len() * CreatureRecord::ENCODED_LEN);
    for r in records {
        out.extend_from_slice(&r.x.to_le_bytes());
        out.extend_from_slice(&r.y.to_le_bytes());
        out.extend_from_slice(&r.species_id.to_le_bytes());
        out.extend_from_slice(&r.carried_item.to_le_bytes());
    }
    out
}

/// Decodes whole records. A trailing partial record is dropped under
/// [`DecompressPolicy::Lenient`] and rejected under `Strict`.
pub fn decode_creatures(bytes: &[u8], policy: DecompressPolicy) -> Result<Vec<CreatureRecord>> {
    let chunks = bytes.chunks_exact(CreatureRecord::ENCODED_LEN);
    let trailing = chunks.remainder().len();
    if trailing != 0 {
        match policy {
            DecompressPolicy::Strict => {
                return Err(IoError::corrupt(format!(
                    "creature data ends with a {trailing}-byte partial record"
                )))
            }
            DecompressPolicy::Lenient => {
                tracing::error!(trailing, "Creature data has a partial record, ignoring it");
            }
        }
    }
    Ok(chunks
        .map(|r| CreatureRecord {
            x: f32::from_le_bytes([r[0], r[1], r[2], r[3]]),
            y: f32::from_le_bytes([r[4], r[5], r[6], r[7]]),
            species_id: i16::from_le_bytes([r[8], r[9]]),
            carried_item: i16::from_le_bytes([r[10], r[11]]),
        })
        .collect())
}

/// Everything restored from a map directory.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveData {
    pub grid: TileGrid,
    pub creatures: Vec<CreatureRecord>,
}

/// Reads `path`, mapping a missing or empty file to `None`.
fn read_optional(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) if bytes.is_empty() => Ok(None),
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(IoError::from(e).with_context(format!("reading {}", path.display()))),
    }
}

/// Save directory of one named map.
#[derive(Debug, Clone)]
pub struct MapStore {
    dir: PathBuf,
    policy: DecompressPolicy,
}

impl MapStore {
    pub fn new(save_root: impl AsRef<Path>, name: &str, policy: DecompressPolicy) -> Self {
        Self {
            dir: save_root.as_ref().join(name),
            policy,
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn tile_path(&self) -> PathBuf {
        self.dir.join(TILE_FILE)
    }

    #[must_use]
    pub fn creature_path(&self) -> PathBuf {
        self.dir.join(CREATURE_FILE)
    }

    /// Writes both files, creating the map directory if needed.
    pub fn save(&self, grid: &TileGrid, creatures: &[CreatureRecord]) -> Result<()> {
        tracing::info!(dir = %self.dir.display(), "Starting to save the map");
        let start = Instant::now();

        let raw = encode_tiles(grid);
        let records = encode_creatures(creatures);
        tracing::debug!(elapsed_us = start.elapsed().as_micros() as u64, "Save data collected");

        let compressed = compress_tiles(&raw).map_err(|e| e.with_context("compressing tiles"))?;
        tracing::debug!(
            elapsed_us = start.elapsed().as_micros() as u64,
            raw = raw.len(),
            compressed = compressed.len(),
            "Tile data compressed"
        );

        fs::create_dir_all(&self.dir).map_err(|e| {
            IoError::from(e).with_context(format!("creating {}", self.dir.display()))
        })?;
        for (path, bytes) in [
            (self.tile_path(), &compressed),
            (self.creature_path(), &records),
        ] {
            fs::write(&path, bytes)
                .map_err(|e| IoError::from(e).with_context(format!("writing {}", path.display())))?;
        }

        tracing::info!(
            elapsed_us = start.elapsed().as_micros() as u64,
            creatures = creatures.len(),
            "Map saved successfully"
        );
        Ok(())
    }

    /// Restores the map, or `None` when `tile.data` is missing or empty.
    pub fn load(&self) -> Result<Option<SaveData>> {
        tracing::info!(dir = %self.dir.display(), "Starting to load the map");
        let start = Instant::now();

        let Some(compressed) = read_optional(&self.tile_path())? else {
            tracing::info!("No tile data found");
            return Ok(None);
        };

        let raw = decompress_tiles(&compressed, self.policy)
            .map_err(|e| e.with_context(format!("inflating {}", self.tile_path().display())))?;
        tracing::debug!(elapsed_us = start.elapsed().as_micros() as u64, "Tile data inflated");
        let grid = decode_tiles(&raw)?;

        let creatures = match read_optional(&self.creature_path())? {
            Some(bytes) => decode_creatures(&bytes, self.policy)?,
            None => Vec::new(),
        };

        tracing::info!(
            elapsed_us = start.elapsed().as_micros() as u64,
            creatures = creatures.len(),
            "Map loaded successfully"
        );
        Ok(Some(SaveData { grid, creatures }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terrastead_data::ids;

    fn temp_store(policy: DecompressPolicy) -> MapStore {
        let root = std::env::temp_dir().join(format!("terrastead-io-{}", uuid::Uuid::new_v4()));
        MapStore::new(root, "test", policy)
    }

    fn sample_grid() -> TileGrid {
        let mut grid = TileGrid::filled(MapTile::new(ids::GRASS, 0, 0));
        *grid.get_mut(0, 0) = MapTile::new(ids::GRASS, ids::TREE, 3);
        *grid.get_mut(5, 9) = MapTile::new(ids::STONE, ids::STONE_WALL, -2);
        grid
    }

    #[test]
    fn test_compress_bound_covers_incompressible_input() {
        let noise: Vec<u8> = (0..4096u32).map(|i| (i.wrapping_mul(2654435761) >> 13) as u8).collect();
        let compressed = compress_tiles(&noise).unwrap();
        assert!(compressed.len() <= compress_bound(noise.len()));
    }

    #[test]
    fn test_tile_layout_is_row_major_triples() {
        let raw = encode_tiles(&sample_grid());
        assert_eq!(raw.len(), TILE_DATA_LEN);
        let idx = (5 + 9 * MAP_SIZE) * 6;
        assert_eq!(i16::from_le_bytes([raw[idx], raw[idx + 1]]), ids::STONE);
        assert_eq!(i16::from_le_bytes([raw[idx + 2], raw[idx + 3]]), ids::STONE_WALL);
        assert_eq!(i16::from_le_bytes([raw[idx + 4], raw[idx + 5]]), -2);
    }

    #[test]
    fn test_compressed_stream_is_zlib() {
        let compressed = compress_tiles(&encode_tiles(&sample_grid())).unwrap();
        assert_eq!(compressed[0] & 0x0F, 8, "deflate method in zlib header");
    }

    #[test]
    fn test_truncated_stream_lenient_zero_fills() {
        let compressed = compress_tiles(&encode_tiles(&sample_grid())).unwrap();
        let cut = &compressed[..compressed.len() / 2];
        let raw = decompress_tiles(cut, DecompressPolicy::Lenient).unwrap();
        assert_eq!(raw.len(), TILE_DATA_LEN);
    }

    #[test]
    fn test_truncated_stream_strict_fails() {
        let compressed = compress_tiles(&encode_tiles(&sample_grid())).unwrap();
        let cut = &compressed[..compressed.len() / 2];
        assert!(decompress_tiles(cut, DecompressPolicy::Strict).is_err());
    }

    #[test]
    fn test_wrong_length_payload_is_flagged() {
        let compressed = compress_tiles(&[1, 2, 3, 4]).unwrap();
        assert!(decompress_tiles(&compressed, DecompressPolicy::Strict).is_err());
        let raw = decompress_tiles(&compressed, DecompressPolicy::Lenient).unwrap();
        assert_eq!(&raw[..4], &[1, 2, 3, 4]);
        assert!(raw[4..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_creature_records_encoding() {
        let records = vec![
            CreatureRecord {
                x: 1.5,
                y: -2.25,
                species_id: 4,
                carried_item: 0,
            },
            CreatureRecord {
                x: 10.5,
                y: 3.5,
                species_id: 2,
                carried_item: 1,
            },
        ];
        let bytes = encode_creatures(&records);
        assert_eq!(bytes.len(), 2 * CreatureRecord::ENCODED_LEN);
        assert_eq!(&bytes[..4], &1.5f32.to_le_bytes());
    }

    #[test]
    fn test_partial_creature_record() {
        let mut bytes = encode_creatures(&[CreatureRecord::default()]);
        bytes.extend_from_slice(&[1, 2, 3]);
        assert_eq!(
            decode_creatures(&bytes, DecompressPolicy::Lenient).unwrap().len(),
            1
        );
        assert!(decode_creatures(&bytes, DecompressPolicy::Strict).is_err());
    }

    #[test]
    fn test_missing_save_is_not_an_error() {
        let store = temp_store(DecompressPolicy::Lenient);
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_empty_tile_file_is_missing() {
        let store = temp_store(DecompressPolicy::Lenient);
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(store.tile_path(), b"").unwrap();
        assert!(store.load().unwrap().is_none());
        fs::remove_dir_all(store.dir()).ok();
    }

    #[test]
    fn test_save_then_load() {
        let store = temp_store(DecompressPolicy::Strict);
        let grid = sample_grid();
        let creatures = vec![CreatureRecord {
            x: 0.5,
            y: 0.5,
            species_id: 2,
            carried_item: 1,
        }];
        store.save(&grid, &creatures).unwrap();

        let loaded = store.load().unwrap().expect("save exists");
        assert_eq!(loaded.grid.cells(), grid.cells());
        assert_eq!(loaded.creatures, creatures);
        fs::remove_dir_all(store.dir()).ok();
    }

    #[test]
    fn test_missing_creature_file_loads_empty() {
        let store = temp_store(DecompressPolicy::Strict);
        store.save(&sample_grid(), &[]).unwrap();
        fs::remove_file(store.creature_path()).unwrap();
        let loaded = store.load().unwrap().expect("save exists");
        assert!(loaded.creatures.is_empty());
        fs::remove_dir_all(store.dir()).ok();
    }
}
