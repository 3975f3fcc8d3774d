use crate::{
    room::{RoomShape, RoomType},
    Result,
};

use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// What is known ahead of time about one room layout.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct RoomData {
    pub name: String,
    pub room_type: RoomType,
    #[serde(default)]
    pub shape: Option<RoomShape>,
    #[serde(default)]
    pub secrets: u32,
    /// Core hashes of every component of the layout, in any rotation.
    pub cores: Vec<i32>,
}

/// Room layouts indexed by core hash.
#[derive(Clone, Debug, Default)]
pub struct RoomCatalog {
    rooms: Vec<RoomData>,
    by_core: FnvHashMap<i32, usize>,
}

impl RoomCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// When two layouts claim the same core the first one wins.
    pub fn from_rooms(rooms: Vec<RoomData>) -> Self {
        let mut by_core = FnvHashMap::default();
        for (i, room) in rooms.iter().enumerate() {
            for core in room.cores.iter() {
                if by_core.contains_key(core) {
                    log::warn!("Core {} of {} is already claimed", core, room.name);
                    continue;
                }
                by_core.insert(*core, i);
            }
        }

        RoomCatalog { rooms, by_core }
    }

    /// Parses a RON list of [`RoomData`].
    pub fn from_ron_str(s: &str) -> Result<Self> {
        let rooms: Vec<RoomData> = ron::de::from_str(s)?;
        log::debug!("Loaded {} room layouts", rooms.len());

        Ok(Self::from_rooms(rooms))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_ron_str(&fs::read_to_string(path)?)
    }

    pub fn by_core(&self, core: i32) -> Option<&RoomData> {
        self.by_core.get(&core).map(|i| &self.rooms[*i])
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
