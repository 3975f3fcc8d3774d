//! Decoding of the in-game dungeon map item: where the room grid sits on the 128x128 colour
//! buffer, and which player each map icon stands for.

use crate::geometry::{RoomComponent, GRID_WIDTH};

use fnv::FnvHashMap;

pub const MAP_WIDTH: usize = 128;
/// Colour index of an unexplored room pixel.
pub const ROOM_COLOR: u8 = 30;
const GAP_PIXELS: usize = 4;
/// A room is at least this many pixels wide.
const MIN_ROOM_PIXELS: usize = 16;

/// Where the 6x6 room grid lies on the map.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MapLayout {
    /// Width of one room in pixels.
    pub room_size: usize,
    /// Distance between the left edges of two neighbouring rooms.
    pub gap_size: usize,
    /// Pixel of the top-left corner of room `[0, 0]`.
    pub corner: [usize; 2],
}

impl MapLayout {
    /// The room slot under a map pixel, if it is inside the grid.
    pub fn component_at(&self, px: usize, py: usize) -> Option<RoomComponent> {
        if px < self.corner[0] || py < self.corner[1] {
            return None;
        }
        let x = ((px - self.corner[0]) / self.gap_size) as i32;
        let z = ((py - self.corner[1]) / self.gap_size) as i32;
        if x >= GRID_WIDTH || z >= GRID_WIDTH {
            return None;
        }

        Some([x, z])
    }
}

/// Finds the room grid from the first room on the map. Floors 0 and 1 are narrower than the
/// rest, so their grid starts one room further right (and on floor 0, one further down) than the
/// first room found.
pub fn find_map_layout(colors: &[u8], floor_number: Option<u8>) -> Option<MapLayout> {
    let edge = MIN_ROOM_PIXELS - 1;
    let is_room = |i: usize| colors.get(i) == Some(&ROOM_COLOR);
    let first = (0..colors.len())
        .find(|i| is_room(*i) && is_room(i + edge) && is_room(i + MAP_WIDTH * edge))?;

    let room_size = (first..colors.len()).take_while(|i| is_room(*i)).count();
    let gap_size = room_size + GAP_PIXELS;

    let mut x = (first % MAP_WIDTH) % gap_size;
    let mut y = (first / MAP_WIDTH) % gap_size;
    if let Some(0) | Some(1) = floor_number {
        x += gap_size;
    }
    if floor_number == Some(0) {
        y += gap_size;
    }

    Some(MapLayout {
        room_size,
        gap_size,
        corner: [x, y],
    })
}

/// A raw map decoration as sent by the server.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MapDecoration {
    /// Half-pixels from the map centre.
    pub x: i8,
    pub y: i8,
    /// Sixteenths of a full turn.
    pub rotation: u8,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MapIcon {
    /// Half-pixels from the map's top-left corner.
    pub x: i32,
    pub y: i32,
    /// Degrees.
    pub rotation: f32,
    pub player: Option<String>,
}

impl MapIcon {
    pub fn pixel(&self) -> [usize; 2] {
        [(self.x.max(0) / 2) as usize, (self.y.max(0) / 2) as usize]
    }
}

/// Matches `icon-N` decorations to `icon_order[N]`. Anything not named like a player icon is
/// skipped.
pub fn decode_icons<'a>(
    decorations: impl IntoIterator<Item = (&'a str, MapDecoration)>,
    icon_order: &[String],
) -> FnvHashMap<String, MapIcon> {
    let mut icons = FnvHashMap::default();
    for (name, decoration) in decorations {
        let number = match icon_number(name) {
            Some(n) => n,
            None => continue,
        };

        icons.insert(
            name.to_string(),
            MapIcon {
                x: i32::from(decoration.x) + 128,
                y: i32::from(decoration.y) + 128,
                rotation: f32::from(decoration.rotation) * 360.0 / 16.0 + 180.0,
                player: icon_order.get(number).cloned(),
            },
        );
    }

    icons
}

fn icon_number(name: &str) -> Option<usize> {
    let digits = name.strip_prefix("icon-")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A map with 18 pixel rooms, the first at `(first_x, first_y)`.
    fn map_with_room(first_x: usize, first_y: usize) -> Vec<u8> {
        let mut colors = vec![0u8; MAP_WIDTH * MAP_WIDTH];
        for y in first_y..first_y + 18 {
            for x in first_x..first_x + 18 {
                colors[y * MAP_WIDTH + x] = ROOM_COLOR;
            }
        }

        colors
    }

    #[test]
    fn test_find_map_layout() {
        let colors = map_with_room(27, 5);
        let layout = find_map_layout(&colors, Some(7)).unwrap();
        assert_eq!(layout.room_size, 18);
        assert_eq!(layout.gap_size, 22);
        assert_eq!(layout.corner, [5, 5]);

        assert_eq!(layout.component_at(5, 5), Some([0, 0]));
        assert_eq!(layout.component_at(30, 50), Some([1, 2]));
        assert_eq!(layout.component_at(4, 50), None);
        assert_eq!(layout.component_at(5 + 6 * 22, 5), None);
    }

    #[test]
    fn test_find_map_layout_small_floors() {
        let colors = map_with_room(27, 27);
        assert_eq!(find_map_layout(&colors, Some(1)).unwrap().corner, [27, 5]);
        assert_eq!(find_map_layout(&colors, Some(0)).unwrap().corner, [27, 27]);
    }

    #[test]
    fn test_find_map_layout_needs_a_room() {
        assert_eq!(find_map_layout(&[0; MAP_WIDTH * MAP_WIDTH], Some(7)), None);
        assert_eq!(find_map_layout(&[ROOM_COLOR; 20], Some(7)), None);
        assert_eq!(find_map_layout(&[], None), None);
    }

    #[test]
    fn test_decode_icons() {
        let order = vec!["Alice".to_string(), "Bob".to_string()];
        let decoration = MapDecoration {
            x: -10,
            y: 20,
            rotation: 4,
        };
        let icons = decode_icons(
            vec![
                ("icon-0", decoration),
                ("icon-1", decoration),
                ("icon-5", decoration),
                ("icon-", decoration),
                ("icon-+1", decoration),
                ("frame", decoration),
            ],
            &order,
        );

        assert_eq!(icons.len(), 3);
        let alice = &icons["icon-0"];
        assert_eq!(alice.player.as_deref(), Some("Alice"));
        assert_eq!((alice.x, alice.y), (118, 148));
        assert_eq!(alice.rotation, 270.0);
        assert_eq!(alice.pixel(), [59, 74]);
        assert_eq!(icons["icon-1"].player.as_deref(), Some("Bob"));
        assert_eq!(icons["icon-5"].player, None);
    }
}
