use crate::{
    geometry::{scan_component_to_real, ScanComponent},
    BlockState, DungeonWorld,
};

use fnv::{FnvHashMap, FnvHashSet};
use ilattice3::Point;

/// Sparse in-memory world. Every chunk is loaded unless explicitly unloaded.
#[derive(Default)]
pub struct TestWorld {
    blocks: FnvHashMap<[i32; 3], BlockState>,
    unloaded_chunks: FnvHashSet<[i32; 2]>,
    pub player: [f64; 3],
}

fn chunk_of(x: i32, z: i32) -> [i32; 2] {
    [x >> 4, z >> 4]
}

impl TestWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_block(&mut self, p: [i32; 3], block: BlockState) {
        if block.is_air() {
            self.blocks.remove(&p);
        } else {
            self.blocks.insert(p, block);
        }
    }

    pub fn unload_chunk(&mut self, x: i32, z: i32) {
        self.unloaded_chunks.insert(chunk_of(x, z));
    }

    pub fn load_chunk(&mut self, x: i32, z: i32) {
        self.unloaded_chunks.remove(&chunk_of(x, z));
    }

    /// Unloads the chunk holding the centre of every scan cell.
    pub fn unload_all_cells(&mut self) {
        for z in 0..11 {
            for x in 0..11 {
                let [wx, wz] = scan_component_to_real([x, z]);
                self.unload_chunk(wx, wz);
            }
        }
    }

    pub fn load_cell(&mut self, cell: ScanComponent) {
        let [wx, wz] = scan_component_to_real(cell);
        self.load_chunk(wx, wz);
    }

    /// Puts a roof over the centre of a scan cell.
    pub fn roof_cell(&mut self, cell: ScanComponent, height: i32) {
        let [wx, wz] = scan_component_to_real(cell);
        self.set_block([wx, height, wz], BlockState::new(1, 0));
    }

    pub fn set_player(&mut self, x: f64, z: f64) {
        self.player = [x, 70.0, z];
    }
}

impl DungeonWorld for TestWorld {
    fn is_chunk_loaded(&self, point: &Point) -> bool {
        !self.unloaded_chunks.contains(&chunk_of(point.x, point.z))
    }

    fn block(&self, point: &Point) -> BlockState {
        self.blocks
            .get(&[point.x, point.y, point.z])
            .copied()
            .unwrap_or(BlockState::AIR)
    }

    fn player_position(&self) -> [f64; 3] {
        self.player
    }
}
