use crate::{
    geometry::{door_index, ScanComponent},
    BlockState, DungeonWorld,
};

use ilattice3::Point;
use serde::{Deserialize, Serialize};

const COAL_BLOCK: BlockState = BlockState { id: 173, meta: 0 };
const RED_TERRACOTTA: BlockState = BlockState { id: 159, meta: 14 };

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum DoorType {
    Normal,
    Entrance,
    Wither,
    Blood,
}

impl Default for DoorType {
    fn default() -> Self {
        DoorType::Normal
    }
}

/// A single door slot between two room slots.
#[derive(Clone, Debug, PartialEq)]
pub struct Door {
    /// Block whose presence means the door is still closed.
    pub anchor: Point,
    /// Position in the scan grid. Always has exactly one odd coordinate.
    pub component: ScanComponent,
    pub door_type: DoorType,
    /// Degrees, a multiple of 90. `None` until something pins it.
    pub rotation: Option<u16>,
    /// Once set this is never cleared; only a scanner reset discards the door.
    pub opened: bool,
}

impl Door {
    pub fn new(world_x: i32, world_z: i32, door_y: i32, component: ScanComponent) -> Self {
        Door {
            anchor: [world_x, door_y, world_z].into(),
            component,
            door_type: DoorType::Normal,
            rotation: None,
            opened: false,
        }
    }

    pub fn with_type(mut self, door_type: DoorType) -> Self {
        self.door_type = door_type;

        self
    }

    pub fn index(&self) -> i32 {
        door_index(self.component)
    }

    /// Looks at the anchor block. Does nothing while its chunk is unloaded.
    pub fn check(&mut self, world: &impl DungeonWorld) {
        if !world.is_chunk_loaded(&self.anchor) {
            return;
        }

        let block = world.block(&self.anchor);
        self.opened = block.is_air();

        if !self.opened && self.door_type == DoorType::Normal {
            if block == COAL_BLOCK {
                self.door_type = DoorType::Wither;
            } else if block == RED_TERRACOTTA {
                self.door_type = DoorType::Blood;
            }
        }
    }
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝
