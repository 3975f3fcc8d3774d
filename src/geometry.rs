//! Mappings between the three coordinate spaces of a dungeon floor.
//!
//! - World space: block coordinates of the host world.
//! - Room-component space: the 6x6 grid of room slots, `[0, 6) x [0, 6)`.
//! - Scan space: the 11x11 grid of room slots *and* the gaps between them. A cell with two even
//!   coordinates is a room slot (its room-component is the coordinate halved), a cell with exactly
//!   one odd coordinate is a door slot, and odd/odd cells are never used.
//!
//! Door slots are packed into `[0, 60)` by [`door_index`]. None of these functions clamp; callers
//! are expected to stay inside the ranges above or check the result.

use crate::DungeonWorld;

use ilattice3::Point;

/// World X and Z of the north-west corner of the room grid.
pub const CORNER_START: [i32; 2] = [-201, -201];
pub const ROOM_SIZE: i32 = 31;
pub const HALF_ROOM_SIZE: i32 = 15;
pub const ROOM_DOOR_COMBINED_SIZE: i32 = 32;
pub const HALF_COMBINED_SIZE: i32 = 16;

pub const GRID_WIDTH: i32 = 6;
pub const SCAN_WIDTH: i32 = 2 * GRID_WIDTH - 1;
pub const ROOM_SLOTS: usize = 36;
pub const DOOR_SLOTS: usize = 60;

/// A cell of the 6x6 room grid, `[x, z]`.
pub type RoomComponent = [i32; 2];

/// A cell of the 11x11 scan grid, `[x, z]`. Door-components live here.
pub type ScanComponent = [i32; 2];

/// One of the four cardinal steps out of a room slot.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Direction {
    /// World offset from a room centre to the gap on that side.
    pub world: [i32; 2],
    /// Room-component offset to the neighbouring slot.
    pub component: [i32; 2],
}

pub const DIRECTIONS: [Direction; 4] = [
    Direction {
        world: [HALF_COMBINED_SIZE, 0],
        component: [1, 0],
    },
    Direction {
        world: [-HALF_COMBINED_SIZE, 0],
        component: [-1, 0],
    },
    Direction {
        world: [0, HALF_COMBINED_SIZE],
        component: [0, 1],
    },
    Direction {
        world: [0, -HALF_COMBINED_SIZE],
        component: [0, -1],
    },
];

/// A position waiting to be resolved by the scanner.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ScanPosition {
    pub component: ScanComponent,
    pub world_x: i32,
    pub world_z: i32,
}

impl ScanPosition {
    pub fn is_door_slot(&self) -> bool {
        self.component[0] % 2 == 1 || self.component[1] % 2 == 1
    }
}

/// Every room and door slot of the scan grid, in row-major order.
pub fn scan_positions() -> Vec<ScanPosition> {
    let mut positions = Vec::with_capacity(ROOM_SLOTS + DOOR_SLOTS);
    for z in 0..SCAN_WIDTH {
        for x in 0..SCAN_WIDTH {
            if x % 2 == 1 && z % 2 == 1 {
                continue;
            }
            let [world_x, world_z] = scan_component_to_real([x, z]);
            positions.push(ScanPosition {
                component: [x, z],
                world_x,
                world_z,
            });
        }
    }

    positions
}

pub fn room_index(comp: RoomComponent) -> i32 {
    GRID_WIDTH * comp[1] + comp[0]
}

pub fn room_component_from_index(index: usize) -> RoomComponent {
    let index = index as i32;

    [index % GRID_WIDTH, index / GRID_WIDTH]
}

pub fn room_component_in_bounds(comp: RoomComponent) -> bool {
    (0..GRID_WIDTH).contains(&comp[0]) && (0..GRID_WIDTH).contains(&comp[1])
}

/// Packs a door-component into `[0, 60)`.
///
/// Rows with an even Z hold the 5 vertical gaps between the 6 rooms of a row, rows with an odd Z
/// hold the 6 horizontal gaps below them, so every pair of rows packs into 11 indices.
pub fn door_index(comp: ScanComponent) -> i32 {
    let idx = ((comp[0] - 1) >> 1) + GRID_WIDTH * comp[1];

    idx - idx.div_euclid(2 * GRID_WIDTH)
}

/// Inverse of [`door_index`].
pub fn door_component_from_index(index: usize) -> ScanComponent {
    let index = index as i32;
    let row_pair = index / SCAN_WIDTH;
    let rem = index % SCAN_WIDTH;
    if rem < GRID_WIDTH - 1 {
        [2 * rem + 1, 2 * row_pair]
    } else {
        [2 * (rem - (GRID_WIDTH - 1)), 2 * row_pair + 1]
    }
}

/// True for scan cells with exactly one odd coordinate inside the 11x11 grid.
pub fn door_component_in_bounds(comp: ScanComponent) -> bool {
    (0..SCAN_WIDTH).contains(&comp[0])
        && (0..SCAN_WIDTH).contains(&comp[1])
        && (comp[0] % 2 == 1) != (comp[1] % 2 == 1)
}

/// The two room-components a door-component sits between.
pub fn door_neighbours(comp: ScanComponent) -> Option<(RoomComponent, RoomComponent)> {
    if !door_component_in_bounds(comp) {
        return None;
    }
    let [x, z] = comp;
    if x % 2 == 1 {
        Some(([(x - 1) / 2, z / 2], [(x + 1) / 2, z / 2]))
    } else {
        Some(([x / 2, (z - 1) / 2], [x / 2, (z + 1) / 2]))
    }
}

/// The room-component containing a (possibly fractional) world position.
pub fn real_coord_to_component(x: f64, z: f64) -> RoomComponent {
    let [x0, z0] = CORNER_START;
    let size = f64::from(ROOM_DOOR_COMBINED_SIZE);

    [
        ((x - f64::from(x0) + 0.5) / size).floor() as i32,
        ((z - f64::from(z0) + 0.5) / size).floor() as i32,
    ]
}

/// The scan cell containing a world block column. Gap columns map to odd cells.
pub fn world_to_scan_component(x: i32, z: i32) -> ScanComponent {
    let to_cell = |v: i32, v0: i32| {
        let local = v - v0;
        let room = local.div_euclid(ROOM_DOOR_COMBINED_SIZE);
        if local.rem_euclid(ROOM_DOOR_COMBINED_SIZE) == ROOM_SIZE {
            2 * room + 1
        } else {
            2 * room
        }
    };

    [to_cell(x, CORNER_START[0]), to_cell(z, CORNER_START[1])]
}

/// World X and Z of the centre of a room slot.
pub fn component_to_real(comp: RoomComponent) -> [i32; 2] {
    scan_component_to_real([2 * comp[0], 2 * comp[1]])
}

/// World X and Z of the centre of a scan cell.
pub fn scan_component_to_real(comp: ScanComponent) -> [i32; 2] {
    [
        CORNER_START[0] + HALF_ROOM_SIZE + HALF_COMBINED_SIZE * comp[0],
        CORNER_START[1] + HALF_ROOM_SIZE + HALF_COMBINED_SIZE * comp[1],
    ]
}

pub fn is_chunk_loaded(world: &impl DungeonWorld, x: i32, y: i32, z: i32) -> bool {
    world.is_chunk_loaded(&Point::from([x, y, z]))
}

/// Roof height of a column. A height of zero counts as "no roof".
pub fn highest_y(world: &impl DungeonWorld, x: i32, z: i32) -> Option<i32> {
    world.highest_solid_y(x, z).filter(|y| *y != 0)
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝
