use crate::{
    catalog::RoomCatalog,
    geometry::{component_to_real, is_chunk_loaded, RoomComponent, HALF_ROOM_SIZE},
    BlockState, DungeonWorld,
};

use ilattice3::Point;
use serde::{Deserialize, Serialize};

/// Marks the rotation corner of every room.
const BLUE_TERRACOTTA: BlockState = BlockState { id: 159, meta: 11 };

/// Offsets from a component centre to its four corners; corner `i` means `i * 90` degrees.
const CORNER_OFFSETS: [[i32; 2]; 4] = [
    [-HALF_ROOM_SIZE, -HALF_ROOM_SIZE],
    [HALF_ROOM_SIZE, -HALF_ROOM_SIZE],
    [HALF_ROOM_SIZE, HALF_ROOM_SIZE],
    [-HALF_ROOM_SIZE, HALF_ROOM_SIZE],
];

const CORE_TOP_Y: i32 = 140;
const CORE_BOTTOM_Y: i32 = 12;
/// Blocks that differ between otherwise identical layouts (planks, chests, stairs).
const CORE_IGNORED_IDS: [u16; 3] = [5, 54, 146];

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum RoomType {
    Normal,
    Puzzle,
    Trap,
    Yellow,
    Blood,
    Fairy,
    Rare,
    Entrance,
}

impl Default for RoomType {
    fn default() -> Self {
        RoomType::Normal
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum RoomShape {
    OneByOne,
    OneByTwo,
    OneByThree,
    OneByFour,
    TwoByTwo,
    L,
    Unknown,
}

impl RoomShape {
    pub fn from_components(comps: &[RoomComponent]) -> Self {
        let mut xs: Vec<_> = comps.iter().map(|c| c[0]).collect();
        let mut zs: Vec<_> = comps.iter().map(|c| c[1]).collect();
        xs.sort_unstable();
        xs.dedup();
        zs.sort_unstable();
        zs.dedup();

        let straight = xs.len() == 1 || zs.len() == 1;
        match comps.len() {
            1 => RoomShape::OneByOne,
            2 if straight => RoomShape::OneByTwo,
            3 if straight => RoomShape::OneByThree,
            3 => RoomShape::L,
            4 if straight => RoomShape::OneByFour,
            4 if xs.len() == 2 && zs.len() == 2 => RoomShape::TwoByTwo,
            _ => RoomShape::Unknown,
        }
    }
}

/// Arena handle of a [`Room`] inside one scanner. Handles are not reused until the scanner is
/// reset.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct RoomId(pub usize);

/// A logical room: one or more grid components that turned out to be the same space.
#[derive(Clone, Debug)]
pub struct Room {
    pub id: RoomId,
    comps: Vec<RoomComponent>,
    /// World X and Z of each component's centre, parallel to `comps`.
    real_comps: Vec<[i32; 2]>,
    cores: Vec<i32>,
    pub shape: RoomShape,
    pub room_type: RoomType,
    pub name: Option<String>,
    pub secrets: u32,
    pub roof_height: i32,
    /// Degrees, a multiple of 90.
    pub rotation: Option<u16>,
    /// The block that gave away `rotation`.
    pub corner: Option<Point>,
}

impl Room {
    /// `comps` must not be empty.
    pub fn new(id: RoomId, comps: &[RoomComponent], roof_height: i32) -> Self {
        debug_assert!(!comps.is_empty());
        let mut room = Room {
            id,
            comps: comps.to_vec(),
            real_comps: Vec::new(),
            cores: Vec::new(),
            shape: RoomShape::Unknown,
            room_type: RoomType::Normal,
            name: None,
            secrets: 0,
            roof_height,
            rotation: None,
            corner: None,
        };
        room.update();

        room
    }

    pub fn components(&self) -> &[RoomComponent] {
        &self.comps
    }

    pub fn real_components(&self) -> &[[i32; 2]] {
        &self.real_comps
    }

    pub fn cores(&self) -> &[i32] {
        &self.cores
    }

    pub fn has_component(&self, x: i32, z: i32) -> bool {
        self.comps.contains(&[x, z])
    }

    /// Adds `comp` unless already present. With `update` false the caller must call
    /// [`Room::update`] once it is done mutating.
    pub fn add_component(&mut self, comp: RoomComponent, update: bool) {
        if self.has_component(comp[0], comp[1]) {
            return;
        }
        self.comps.push(comp);
        if update {
            self.update();
        }
    }

    /// Drops `comp` if present. Never removes the last component.
    pub fn remove_component(&mut self, comp: RoomComponent) -> bool {
        if self.comps.len() <= 1 || !self.has_component(comp[0], comp[1]) {
            return false;
        }
        self.comps.retain(|c| *c != comp);
        self.update();

        true
    }

    /// Recomputes everything derived from the component set. A known rotation is dropped since the
    /// corner that revealed it may no longer be a corner of the new shape.
    pub fn update(&mut self) {
        self.comps.sort_unstable();
        self.real_comps = self.comps.iter().map(|c| component_to_real(*c)).collect();
        self.shape = RoomShape::from_components(&self.comps);
        self.rotation = None;
        self.corner = None;
    }

    /// Hashes the core of every component and takes identity from the first one the catalog
    /// knows. Rooms the catalog has never seen stay `Normal` and unnamed.
    pub fn scan(&mut self, world: &impl DungeonWorld, catalog: &RoomCatalog) -> &mut Self {
        self.cores = self
            .real_comps
            .iter()
            .map(|[x, z]| core_hash(world, *x, *z))
            .collect();

        if let Some(data) = self.cores.iter().find_map(|c| catalog.by_core(*c)) {
            log::debug!("Identified room {:?} as {}", self.id, data.name);
            self.name = Some(data.name.clone());
            self.room_type = data.room_type;
            self.secrets = data.secrets;
        }

        self
    }

    /// Searches the corners of every component at roof height for the rotation marker. Leaves
    /// `rotation` unset if no loaded corner has it.
    pub fn find_rotation(&mut self, world: &impl DungeonWorld) {
        if self.rotation.is_some() {
            return;
        }

        for [x, z] in self.real_comps.iter() {
            for (i, [dx, dz]) in CORNER_OFFSETS.iter().enumerate() {
                let (nx, nz) = (x + dx, z + dz);
                if !is_chunk_loaded(world, nx, self.roof_height, nz) {
                    continue;
                }

                let corner = Point::from([nx, self.roof_height, nz]);
                if world.block(&corner) == BLUE_TERRACOTTA {
                    self.rotation = Some(90 * i as u16);
                    self.corner = Some(corner);
                    log::debug!("Room {:?} has rotation {}", self.id, 90 * i);

                    return;
                }
            }
        }
    }
}

/// 31-multiplier hash over the column's block ids written out in decimal, top to bottom.
pub fn core_hash(world: &impl DungeonWorld, x: i32, z: i32) -> i32 {
    let mut text = String::new();
    for y in (CORE_BOTTOM_Y..=CORE_TOP_Y).rev() {
        let id = world.block_id(&[x, y, z].into());
        if CORE_IGNORED_IDS.contains(&id) {
            text.push('0');
        } else {
            text.push_str(&id.to_string());
        }
    }

    text.bytes()
        .fold(0i32, |h, b| h.wrapping_mul(31).wrapping_add(i32::from(b)))
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝
