//! Which discovered rooms are joined by which doors.

use crate::{
    geometry::{door_neighbours, room_index},
    room::{RoomId, RoomType},
    scanner::DungeonScanner,
    symmetric_map::SymmetricMap,
};

use fnv::FnvHashMap;
use petgraph::{algo::dijkstra, graph::NodeIndex, stable_graph::StableGraph, Undirected};

/// Undirected graph of rooms with door indices on the edges.
///
/// A snapshot: it does not follow the scanner, so rebuild it after new rooms or doors turn up.
pub struct RoomGraph {
    graph: StableGraph<RoomId, usize, Undirected>,
    nodes: FnvHashMap<RoomId, NodeIndex>,
    doors: SymmetricMap<RoomId, usize>,
}

impl RoomGraph {
    /// A door only becomes an edge once both rooms beside it are known. When several doors join
    /// the same two rooms the one with the lowest index is kept.
    pub fn from_scanner(scanner: &DungeonScanner) -> Self {
        let mut graph = StableGraph::default();
        let mut nodes = FnvHashMap::default();
        for room in scanner.rooms() {
            nodes.insert(room.id, graph.add_node(room.id));
        }

        let mut doors = SymmetricMap::new();
        for door in scanner.doors() {
            let (a, b) = match door_neighbours(door.component) {
                Some(pair) => pair,
                None => continue,
            };
            let ids = (
                scanner.room_id_at_index(room_index(a)),
                scanner.room_id_at_index(room_index(b)),
            );
            if let (Some(a), Some(b)) = ids {
                if a != b {
                    doors.insert_min(a, b, door.index() as usize);
                }
            }
        }

        for (a, b, door) in doors.iter() {
            graph.add_edge(nodes[&a], nodes[&b], *door);
        }
        log::debug!(
            "Room graph has {} rooms and {} connections",
            nodes.len(),
            doors.len()
        );

        RoomGraph {
            graph,
            nodes,
            doors,
        }
    }

    pub fn graph(&self) -> &StableGraph<RoomId, usize, Undirected> {
        &self.graph
    }

    pub fn node(&self, room: RoomId) -> Option<NodeIndex> {
        self.nodes.get(&room).copied()
    }

    pub fn door_between(&self, a: RoomId, b: RoomId) -> Option<usize> {
        self.doors.get(a, b).copied()
    }

    pub fn neighbours(&self, room: RoomId) -> Vec<RoomId> {
        let mut out: Vec<_> = match self.node(room) {
            Some(n) => self.graph.neighbors(n).map(|m| self.graph[m]).collect(),
            None => Vec::new(),
        };
        out.sort();

        out
    }

    /// Fewest doors to walk through from `from` to every room reachable from it.
    pub fn door_distances(&self, from: RoomId) -> FnvHashMap<RoomId, usize> {
        let start = match self.node(from) {
            Some(n) => n,
            None => return FnvHashMap::default(),
        };

        dijkstra(&self.graph, start, None, |_| 1usize)
            .into_iter()
            .map(|(n, d)| (self.graph[n], d))
            .collect()
    }
}

/// Door distances from the entrance room, if it has been found.
pub fn distances_from_entrance(scanner: &DungeonScanner) -> Option<FnvHashMap<RoomId, usize>> {
    let entrance = scanner
        .rooms()
        .find(|r| r.room_type == RoomType::Entrance)?
        .id;

    Some(RoomGraph::from_scanner(scanner).door_distances(entrance))
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝
