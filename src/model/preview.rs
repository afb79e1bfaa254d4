//! Plain-text rendering of a map window, drawn in layers: ground, objects,
//! then creatures on top.

use crate::model::map::Map;
use terrastead_data::MAP_SIZE;

const CREATURE_SYMBOL: char = '@';
const ITEM_SYMBOL: char = '*';

/// Renders the `(2 * radius + 1)²` window centred on `(cx, cy)`, one line per row.
///
/// Positions past the grid edge repeat the edge cell, matching `Map::get_tile`.
/// `radius` is capped at `MAP_SIZE`.
#[must_use]
pub fn render_ascii(map: &Map, cx: i32, cy: i32, radius: i32) -> String {
    let radius = i64::from(radius.clamp(0, MAP_SIZE as i32));
    let side = 2 * radius as usize + 1;
    let (x0, y0) = (i64::from(cx) - radius, i64::from(cy) - radius);
    let mut rows = vec![vec![' '; side]; side];

    for (row, y) in rows.iter_mut().zip(y0..) {
        for (slot, x) in row.iter_mut().zip(x0..) {
            *slot = cell_symbol(map, saturate(x), saturate(y));
        }
    }

    let reach = radius as f32 + 0.5;
    let (centre_x, centre_y) = (cx as f32 + 0.5, cy as f32 + 0.5);
    for id in map.find_all_creatures(centre_x, centre_y, reach) {
        let Some(creature) = map.creature(id) else {
            continue;
        };
        let col = (f64::from(creature.x) - x0 as f64).floor();
        let row = (f64::from(creature.y) - y0 as f64).floor();
        if (0.0..side as f64).contains(&col) && (0.0..side as f64).contains(&row) {
            rows[row as usize][col as usize] = if creature.carries_item {
                ITEM_SYMBOL
            } else {
                CREATURE_SYMBOL
            };
        }
    }

    let mut out = String::with_capacity(side * (side + 1));
    for row in rows {
        out.extend(row);
        out.push('\n');
    }
    out
}

fn saturate(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

fn cell_symbol(map: &Map, x: i32, y: i32) -> char {
    let content = map.content();
    let cell = map.get_tile(x, y);
    content
        .object(cell.object)
        .filter(|_| cell.has_object())
        .and_then(|o| o.symbol)
        .or_else(|| content.tile(cell.tile).map(|t| t.symbol))
        .unwrap_or('?')
}
