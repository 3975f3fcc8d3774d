use crate::Result;

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// World name for which the tick driver runs.
    pub dungeon_world: String,
    /// Door slots whose roof is at or above this are not doors.
    pub door_roof_limit: i32,
    /// Fixed height probed next to the entrance room when looking for its door.
    pub entrance_probe_y: i32,
    /// Y of every door's anchor block.
    pub door_y: i32,
    /// Keep positions with no roof yet queued instead of dropping them. Off by default, which
    /// drops them the first time their chunk is seen loaded.
    pub retry_unresolved: bool,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        ScannerConfig {
            dungeon_world: "catacombs".to_string(),
            door_roof_limit: 85,
            entrance_probe_y: 76,
            door_y: 69,
            retry_unresolved: false,
        }
    }
}

impl ScannerConfig {
    pub fn from_ron_str(s: &str) -> Result<Self> {
        Ok(ron::de::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_ron_str(&fs::read_to_string(path)?)
    }
}
