//! Incremental discovery of a dungeon floor's rooms and doors.
//!
//! The floor is never described to us. Instead every tick we look at whichever parts of the grid
//! have been loaded since the last tick and fold that evidence into the room and door slots:
//!
//! - A room slot with a roof becomes a [`Room`]. Looking across each of its four gaps tells us if
//!   the roof carries on into the neighbouring slot, in which case both slots are the same room.
//!   Rooms that meet this way are merged into the one created first.
//! - A door slot with a low roof becomes a [`Door`], whose open state is polled until it opens.
//!
//! Rooms live in an arena and grid slots hold [`RoomId`]s, so one room can own any number of slots
//! and a merge only re-points slots.

use crate::{
    catalog::RoomCatalog,
    config::ScannerConfig,
    door::{Door, DoorType},
    geometry::{
        door_component_in_bounds, door_index, highest_y, is_chunk_loaded,
        real_coord_to_component, room_component_in_bounds, room_index, scan_positions,
        world_to_scan_component, RoomComponent, ScanComponent, ScanPosition, DIRECTIONS,
        DOOR_SLOTS, ROOM_SLOTS,
    },
    room::{Room, RoomId, RoomType},
    DungeonWorld,
};

pub type RoomEnterListener = Box<dyn FnMut(Option<&Room>)>;
/// Called with `(new_room, old_room)`.
pub type RoomLeaveListener = Box<dyn FnMut(Option<&Room>, Option<&Room>)>;

pub struct DungeonScanner {
    config: ScannerConfig,
    catalog: RoomCatalog,

    /// Arena of every room created since the last reset. Merged-away rooms leave a `None`.
    arena: Vec<Option<Room>>,
    room_slots: [Option<RoomId>; ROOM_SLOTS],
    door_slots: Vec<Option<Door>>,
    /// Positions not yet consumed, seeded once per reset.
    pending: Vec<ScanPosition>,
    /// Positions consumed while their roof was still unknown.
    abandoned: usize,

    /// Room slot the player was in on the last tick that moved them.
    last_idx: Option<i32>,
    /// Whether the tick driver is running.
    active: bool,

    enter_listeners: Vec<RoomEnterListener>,
    leave_listeners: Vec<RoomLeaveListener>,
}

impl Default for DungeonScanner {
    fn default() -> Self {
        Self::new(ScannerConfig::default(), RoomCatalog::default())
    }
}

impl DungeonScanner {
    pub fn new(config: ScannerConfig, catalog: RoomCatalog) -> Self {
        DungeonScanner {
            config,
            catalog,
            arena: Vec::new(),
            room_slots: [None; ROOM_SLOTS],
            door_slots: vec![None; DOOR_SLOTS],
            pending: scan_positions(),
            abandoned: 0,
            last_idx: None,
            active: false,
            enter_listeners: Vec::new(),
            leave_listeners: Vec::new(),
        }
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Throws away everything discovered so far and stops the tick driver. Listeners are kept.
    pub fn reset(&mut self) {
        log::debug!(
            "Resetting dungeon scanner ({} rooms, {} positions pending)",
            self.rooms().count(),
            self.pending.len()
        );
        self.active = false;
        self.arena.clear();
        self.room_slots = [None; ROOM_SLOTS];
        self.door_slots.iter_mut().for_each(|d| *d = None);
        self.pending = scan_positions();
        self.abandoned = 0;
        self.last_idx = None;
    }

    /// Feed of the world name the player is in. Entering the dungeon world starts the tick
    /// driver; anything else resets the scanner.
    pub fn on_world_change(&mut self, world: Option<&str>) {
        match world {
            Some(name) if name == self.config.dungeon_world => {
                log::debug!("Entered {}, starting scanner", name);
                self.active = true;
            }
            _ => self.reset(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Restarts the tick driver without discarding anything.
    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn on_room_enter(&mut self, listener: impl FnMut(Option<&Room>) + 'static) -> &mut Self {
        self.enter_listeners.push(Box::new(listener));

        self
    }

    pub fn on_room_leave(
        &mut self,
        listener: impl FnMut(Option<&Room>, Option<&Room>) + 'static,
    ) -> &mut Self {
        self.leave_listeners.push(Box::new(listener));

        self
    }

    pub fn pending_positions(&self) -> usize {
        self.pending.len()
    }

    pub fn abandoned_positions(&self) -> usize {
        self.abandoned
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.arena.get(id.0).and_then(Option::as_ref)
    }

    /// Every live room, each once.
    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.arena.iter().flatten()
    }

    /// Every known door, in index order.
    pub fn doors(&self) -> impl Iterator<Item = &Door> {
        self.door_slots.iter().flatten()
    }

    pub fn current_room(&self) -> Option<&Room> {
        self.last_idx.and_then(|idx| self.room_at_index(idx))
    }

    pub fn current_room_index(&self) -> Option<i32> {
        self.last_idx
    }

    pub fn room_id_at_index(&self, idx: i32) -> Option<RoomId> {
        if idx < 0 || idx >= ROOM_SLOTS as i32 {
            return None;
        }

        self.room_slots[idx as usize]
    }

    pub fn room_at_index(&self, idx: i32) -> Option<&Room> {
        self.room_id_at_index(idx).and_then(|id| self.room(id))
    }

    pub fn room_at_component(&self, comp: RoomComponent) -> Option<&Room> {
        if !room_component_in_bounds(comp) {
            return None;
        }

        self.room_at_index(room_index(comp))
    }

    pub fn room_at_world(&self, x: f64, z: f64) -> Option<&Room> {
        self.room_at_component(real_coord_to_component(x, z))
    }

    pub fn door_at_index(&self, idx: i32) -> Option<&Door> {
        if idx < 0 || idx >= DOOR_SLOTS as i32 {
            return None;
        }

        self.door_slots[idx as usize].as_ref()
    }

    pub fn door_at_component(&self, comp: ScanComponent) -> Option<&Door> {
        if !door_component_in_bounds(comp) {
            return None;
        }

        self.door_at_index(door_index(comp))
    }

    pub fn door_at_world(&self, x: i32, z: i32) -> Option<&Door> {
        self.door_at_component(world_to_scan_component(x, z))
    }

    /// One tick of the driver. Does nothing while inactive.
    pub fn tick(&mut self, world: &impl DungeonWorld) {
        if !self.active {
            return;
        }

        let [px, _, pz] = world.player_position();
        let idx = room_index(real_coord_to_component(px, pz));

        self.scan(world);
        self.check_room_state(world);
        self.check_door_state(world);

        // Only 36 rooms fit on a floor, so the player is somewhere we can't track (usually the
        // boss room) and will not come back.
        if idx >= ROOM_SLOTS as i32 {
            log::debug!("Player left the room grid (slot {}), stopping scanner", idx);
            self.active = false;
        }

        self.track_player(idx);
    }

    fn track_player(&mut self, idx: i32) {
        let old_id = self.last_idx.and_then(|i| self.room_id_at_index(i));
        let new_id = self.room_id_at_index(idx);

        if self.last_idx == Some(idx) {
            return;
        }

        if old_id != new_id {
            let old_room = lookup(&self.arena, old_id);
            let new_room = lookup(&self.arena, new_id);

            if self.last_idx.is_some() {
                for listener in self.leave_listeners.iter_mut() {
                    listener(new_room, old_room);
                }
            }
            for listener in self.enter_listeners.iter_mut() {
                listener(new_room);
            }
        }

        self.last_idx = Some(idx);
    }

    /// Resolves every pending position whose chunk is loaded.
    pub fn scan(&mut self, world: &impl DungeonWorld) {
        // Back to front so removing by index is safe.
        for i in (0..self.pending.len()).rev() {
            let pos = self.pending[i];
            if !is_chunk_loaded(world, pos.world_x, 0, pos.world_z) {
                continue;
            }

            let roof_height = match highest_y(world, pos.world_x, pos.world_z) {
                Some(y) => y,
                None => {
                    if !self.config.retry_unresolved {
                        log::trace!("Abandoning {:?}, no roof yet", pos.component);
                        self.pending.remove(i);
                        self.abandoned += 1;
                    }
                    continue;
                }
            };
            self.pending.remove(i);

            if pos.is_door_slot() {
                self.scan_door_slot(pos, roof_height);
            } else {
                self.scan_room_slot(world, pos, roof_height);
            }
        }
    }

    fn scan_door_slot(&mut self, pos: ScanPosition, roof_height: i32) {
        if roof_height >= self.config.door_roof_limit {
            return;
        }

        let mut door = Door::new(pos.world_x, pos.world_z, self.config.door_y, pos.component);
        if pos.component[1] % 2 == 1 {
            door.rotation = Some(0);
        }
        self.add_door(door);
    }

    fn scan_room_slot(&mut self, world: &impl DungeonWorld, pos: ScanPosition, roof_height: i32) {
        let [x, z] = [pos.component[0] >> 1, pos.component[1] >> 1];

        // A neighbour may have claimed this slot through the gap. Hand it back; if the roof really
        // does carry on, the merge below returns it.
        let own_slot = room_index([x, z]) as usize;
        if let Some(previous) = self.room_slots[own_slot] {
            self.release_component(previous, [x, z], world);
        }

        let mut current = RoomId(self.arena.len());
        let mut room = Room::new(current, &[[x, z]], roof_height);
        room.scan(world, &self.catalog);
        let is_entrance = room.room_type == RoomType::Entrance;
        log::debug!("New {:?} room {:?} at {:?}", room.room_type, current, [x, z]);
        self.arena.push(Some(room));
        self.room_slots[own_slot] = Some(current);

        for dir in DIRECTIONS.iter() {
            let (nx, nz) = (pos.world_x + dir.world[0], pos.world_z + dir.world[1]);
            let roof_block = world.block(&[nx, roof_height, nz].into());
            let above_roof_block = world.block(&[nx, roof_height + 1, nz].into());

            // The entrance never joins its neighbours, but a solid probe beside it is its door.
            if is_entrance && !roof_block.is_air() {
                if world
                    .block(&[nx, self.config.entrance_probe_y, nz].into())
                    .is_air()
                {
                    continue;
                }

                let door_comp = [2 * x + dir.component[0], 2 * z + dir.component[1]];
                if door_component_in_bounds(door_comp) {
                    let door = Door::new(nx, nz, self.config.door_y, door_comp)
                        .with_type(DoorType::Entrance);
                    self.add_door(door);
                }
                continue;
            }

            // The roof carries on across the gap.
            if roof_block.is_air() || !above_roof_block.is_air() {
                continue;
            }

            let neighbour = [x + dir.component[0], z + dir.component[1]];
            if !room_component_in_bounds(neighbour) {
                continue;
            }
            let slot = room_index(neighbour) as usize;

            let existing = match self.room_slots[slot] {
                None => {
                    if let Some(room) = self.arena[current.0].as_mut() {
                        room.add_component(neighbour, true);
                    }
                    self.room_slots[slot] = Some(current);
                    continue;
                }
                Some(existing) => existing,
            };

            let existing_type = self.room(existing).map(|r| r.room_type);
            if existing == current || existing_type == Some(RoomType::Entrance) {
                continue;
            }

            self.merge_rooms(existing, current, world);
            current = existing;
        }
    }

    fn add_door(&mut self, door: Door) {
        let idx = door.index();
        if idx < 0 || idx >= DOOR_SLOTS as i32 {
            return;
        }

        match self.door_slots[idx as usize].as_mut() {
            Some(existing) => {
                // Both the gap itself and the entrance beside it can report the same door.
                if door.door_type == DoorType::Entrance {
                    existing.door_type = DoorType::Entrance;
                }
                if existing.rotation.is_none() {
                    existing.rotation = door.rotation;
                }
            }
            None => {
                log::debug!("New {:?} door at {:?}", door.door_type, door.component);
                self.door_slots[idx as usize] = Some(door);
            }
        }
    }

    fn release_component(&mut self, owner: RoomId, comp: RoomComponent, world: &impl DungeonWorld) {
        let catalog = &self.catalog;
        let room = match self.arena.get_mut(owner.0).and_then(Option::as_mut) {
            Some(room) => room,
            None => return,
        };
        if room.remove_component(comp) {
            log::debug!("Room {:?} gives up {:?}", owner, comp);
            room.scan(world, catalog);
        }
    }

    /// `survivor` takes over every component of `absorbed`, which is discarded.
    fn merge_rooms(&mut self, survivor: RoomId, absorbed: RoomId, world: &impl DungeonWorld) {
        let absorbed_room = match self.arena.get_mut(absorbed.0).and_then(Option::take) {
            Some(room) => room,
            None => return,
        };
        log::debug!(
            "Merging room {:?} {:?} into {:?}",
            absorbed,
            absorbed_room.components(),
            survivor
        );

        for slot in self.room_slots.iter_mut() {
            if *slot == Some(absorbed) {
                *slot = Some(survivor);
            }
        }

        let catalog = &self.catalog;
        let room = match self.arena.get_mut(survivor.0).and_then(Option::as_mut) {
            Some(room) => room,
            None => return,
        };
        for comp in absorbed_room.components() {
            room.add_component(*comp, false);
            self.room_slots[room_index(*comp) as usize] = Some(survivor);
        }
        room.update();
        if room.name.is_none() {
            room.scan(world, catalog);
        }
    }

    fn check_room_state(&mut self, world: &impl DungeonWorld) {
        for room in self.arena.iter_mut().flatten() {
            if room.rotation.is_none() {
                room.find_rotation(world);
            }
        }
    }

    fn check_door_state(&mut self, world: &impl DungeonWorld) {
        for door in self.door_slots.iter_mut().flatten() {
            if !door.opened {
                door.check(world);
            }
        }
    }
}

fn lookup(arena: &[Option<Room>], id: Option<RoomId>) -> Option<&Room> {
    id.and_then(|id| arena.get(id.0)).and_then(Option::as_ref)
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝
