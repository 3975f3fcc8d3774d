pub mod catalog;
pub mod config;
pub mod door;
pub mod dungeon;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod map_data;
pub mod room;
pub mod scanner;

mod symmetric_map;

#[cfg(test)]
mod test_world;

pub use catalog::{RoomCatalog, RoomData};
pub use config::ScannerConfig;
pub use door::{Door, DoorType};
pub use error::{Error, Result};
pub use room::{Room, RoomId, RoomShape, RoomType};
pub use scanner::DungeonScanner;

use ilattice3::Point;
use serde::{Deserialize, Serialize};

pub const AIR_ID: u16 = 0;
const GOLD_BLOCK_ID: u16 = 41;

/// Implement this to let the scanner observe the world the player is exploring.
///
/// All queries are expected to be cheap and side-effect free. Missing data is not an error: an
/// unloaded chunk or a column with no roof is simply "not known yet" and the scanner retries it
/// on a later tick.
pub trait DungeonWorld {
    fn is_chunk_loaded(&self, point: &Point) -> bool;

    fn block(&self, point: &Point) -> BlockState;

    fn block_id(&self, point: &Point) -> u16 {
        self.block(point).id
    }

    /// The Y of the highest block at `(x, z)` that is neither air nor gold.
    fn highest_solid_y(&self, x: i32, z: i32) -> Option<i32> {
        (0..=255).rev().find(|y| {
            let id = self.block_id(&[x, *y, z].into());

            id != AIR_ID && id != GOLD_BLOCK_ID
        })
    }

    fn player_position(&self) -> [f64; 3];
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct BlockState {
    pub id: u16,
    pub meta: u8,
}

impl BlockState {
    pub const AIR: BlockState = BlockState { id: AIR_ID, meta: 0 };

    pub fn new(id: u16, meta: u8) -> Self {
        BlockState { id, meta }
    }

    pub fn is_air(&self) -> bool {
        self.id == AIR_ID
    }
}
