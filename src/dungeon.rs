//! State of the current dungeon run that does not come from scanning blocks: the floor, the
//! party and where each party member's map icon is.

use crate::map_data::{decode_icons, find_map_layout, MapDecoration, MapIcon, MapLayout};

use fnv::FnvHashMap;
use regex::Regex;

const FLOOR_PATTERN: &str = r"^  The Catacombs \((\w\d)\)$";
/// Rank and emblem decorations are optional; the class suffix is either `Class LEVEL`, `EMPTY`
/// or `DEAD`.
const TAB_PATTERN: &str = r"^(?:[^\x00-\x7F])?(?:\[\d+\] )?(?:\[\w+\] )?(\w{1,16})(?: [^\x00-\x7F])? \((\w+ ([IVXLCDM]+)|EMPTY|DEAD)\)$";

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PlayerStatus {
    Alive { class: String, level: String },
    Dead,
    Empty,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DungeonPlayer {
    pub name: String,
    pub status: PlayerStatus,
}

impl DungeonPlayer {
    pub fn is_dead(&self) -> bool {
        self.status == PlayerStatus::Dead
    }
}

pub struct DungeonState {
    dungeon_world: String,
    floor_re: Regex,
    tab_re: Regex,

    floor: Option<String>,
    floor_number: Option<u8>,
    /// In the order they first showed up in the tab list.
    party: Vec<String>,
    players: FnvHashMap<String, DungeonPlayer>,
    layout: Option<MapLayout>,
    icons: FnvHashMap<String, MapIcon>,
}

impl DungeonState {
    pub fn new(dungeon_world: impl Into<String>) -> Self {
        DungeonState {
            dungeon_world: dungeon_world.into(),
            floor_re: Regex::new(FLOOR_PATTERN).expect("Bad floor pattern"),
            tab_re: Regex::new(TAB_PATTERN).expect("Bad tab list pattern"),
            floor: None,
            floor_number: None,
            party: Vec::new(),
            players: FnvHashMap::default(),
            layout: None,
            icons: FnvHashMap::default(),
        }
    }

    pub fn reset(&mut self) {
        self.floor = None;
        self.floor_number = None;
        self.party.clear();
        self.players.clear();
        self.layout = None;
        self.icons.clear();
    }

    pub fn on_world_change(&mut self, world: Option<&str>) {
        if world != Some(self.dungeon_world.as_str()) {
            self.reset();
        }
    }

    /// Picks the floor out of the scoreboard. The first floor seen sticks until reset.
    pub fn on_scoreboard_line(&mut self, line: &str) {
        if self.floor.is_some() {
            return;
        }
        let floor = match self.floor_re.captures(line) {
            Some(caps) => caps[1].to_string(),
            None => return,
        };

        self.floor_number = floor[1..].parse().ok();
        log::debug!("Dungeon floor is {}", floor);
        self.floor = Some(floor);
    }

    /// Tab list entries are only meaningful once the floor is known.
    pub fn on_tab_line(&mut self, line: &str) {
        if self.floor.is_none() {
            return;
        }
        let caps = match self.tab_re.captures(line) {
            Some(caps) => caps,
            None => return,
        };

        let name = caps[1].to_string();
        if !self.party.contains(&name) {
            self.party.push(name.clone());
        }

        let status = match (&caps[2], caps.get(3)) {
            ("DEAD", _) => PlayerStatus::Dead,
            ("EMPTY", _) => PlayerStatus::Empty,
            (class_and_level, Some(level)) => PlayerStatus::Alive {
                class: class_and_level
                    .split(' ')
                    .next()
                    .unwrap_or_default()
                    .to_string(),
                level: level.as_str().to_string(),
            },
            _ => return,
        };
        self.players
            .insert(name.clone(), DungeonPlayer { name, status });
    }

    /// Map icons are numbered from the second party member onwards, wrapping around to the first,
    /// and skip dead players.
    pub fn icon_order(&self) -> Vec<String> {
        let mut order = self.party.clone();
        if !order.is_empty() {
            order.rotate_left(1);
        }
        order.retain(|name| !self.players.get(name).map_or(false, DungeonPlayer::is_dead));

        order
    }

    pub fn on_map_data<'a>(
        &mut self,
        colors: &[u8],
        decorations: impl IntoIterator<Item = (&'a str, MapDecoration)>,
    ) {
        if self.floor.is_none() {
            return;
        }
        if self.layout.is_none() {
            self.layout = find_map_layout(colors, self.floor_number);
        }

        let order = self.icon_order();
        if order.is_empty() {
            return;
        }
        self.icons = decode_icons(decorations, &order);
    }

    pub fn floor(&self) -> Option<&str> {
        self.floor.as_deref()
    }

    pub fn floor_number(&self) -> Option<u8> {
        self.floor_number
    }

    pub fn party(&self) -> &[String] {
        &self.party
    }

    pub fn player(&self, name: &str) -> Option<&DungeonPlayer> {
        self.players.get(name)
    }

    pub fn map_layout(&self) -> Option<&MapLayout> {
        self.layout.as_ref()
    }

    pub fn icons(&self) -> &FnvHashMap<String, MapIcon> {
        &self.icons
    }

    /// The icon that stands for `player`, if any.
    pub fn icon_for(&self, player: &str) -> Option<&MapIcon> {
        self.icons
            .values()
            .find(|icon| icon.player.as_deref() == Some(player))
    }
}

impl Default for DungeonState {
    fn default() -> Self {
        Self::new("catacombs")
    }
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝
