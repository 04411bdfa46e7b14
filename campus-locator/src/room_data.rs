use crate::error::{Error, Result};
use crate::model::RoomCoordinate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use tracing::info;

/// Rooms extracted from one floor's plan, as stored in `room_coordinates.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FloorRoomData {
    /// Source PDF the coordinates were extracted from
    #[serde(default)]
    pub pdf_path: Option<String>,
    #[serde(default)]
    pub rooms: BTreeMap<String, RoomCoordinate>,
}

/// A coordinate hit together with the room number spelling that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedRoom {
    pub number: String,
    pub coordinate: RoomCoordinate,
}

/// Lookup interface over per-floor room coordinates
pub trait RoomLookup: Send + Sync {
    /// Coordinate for a room, exact key first then case-insensitive
    fn coordinate(&self, building: &str, level: &str, room: &str) -> Option<RoomCoordinate>;

    /// Whether the table has any entry for this building floor
    fn has_floor(&self, building: &str, level: &str) -> bool;

    /// Coordinate lookup that tolerates both basement numbering styles.
    ///
    /// On the basement level "B22" falls back to "22" and "22" falls back to
    /// "B22"; the spelling that hits becomes the returned number.
    fn locate(&self, building: &str, level: &str, room: &str) -> Option<LocatedRoom> {
        let hit = |number: String| {
            self.coordinate(building, level, &number)
                .map(|coordinate| LocatedRoom { number, coordinate })
        };

        if let Some(found) = hit(room.to_string()) {
            return Some(found);
        }
        if !level.eq_ignore_ascii_case("B") {
            return None;
        }

        match room.strip_prefix(['B', 'b']) {
            Some(stripped) if !stripped.is_empty() => hit(stripped.to_string()),
            Some(_) => None,
            None => hit(format!("B{}", room)),
        }
    }
}

/// Static table of normalized room positions, keyed by building code and
/// floor level. Independent of the building directory.
#[derive(Debug, Clone, Default)]
pub struct RoomCoordinateStore {
    buildings: HashMap<String, BTreeMap<String, FloorRoomData>>,
}

impl RoomCoordinateStore {
    /// Build the store, validating that every coordinate lies in [0, 1].
    ///
    /// Codes and levels are case-insensitive: entries keyed "nh" and "NH"
    /// are merged into one building, and a room listed under both is rejected.
    pub fn new(data: HashMap<String, BTreeMap<String, FloorRoomData>>) -> Result<Self> {
        let mut store = Self::default();

        for (code, floors) in data {
            let code = key(&code);
            for (level, floor) in floors {
                let level = key(&level);
                let merged = store.floor_entry(code.clone(), level.clone());
                if merged.pdf_path.is_none() {
                    merged.pdf_path = floor.pdf_path;
                }
                for (room, coordinate) in floor.rooms {
                    check_coordinate(&code, &level, &room, coordinate)?;
                    if merged.rooms.contains_key(&room) {
                        return Err(Error::DuplicateRoom {
                            building: code,
                            level,
                            room,
                        });
                    }
                    merged.rooms.insert(room, coordinate);
                }
            }
        }

        Ok(store)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let data: HashMap<String, BTreeMap<String, FloorRoomData>> = serde_json::from_str(json)?;
        Self::new(data)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::MissingDataFile(path.to_path_buf()));
        }
        let store = Self::from_json_str(&fs::read_to_string(path)?)?;
        info!(
            "Loaded room coordinates for {} buildings ({} rooms) from {}",
            store.buildings.len(),
            store.room_count(),
            path.display()
        );
        Ok(store)
    }

    /// Add or replace one room entry, rejecting coordinates outside [0, 1]
    pub fn insert(
        &mut self,
        building: &str,
        level: &str,
        room: &str,
        coordinate: RoomCoordinate,
    ) -> Result<()> {
        let (code, level) = (key(building), key(level));
        check_coordinate(&code, &level, room, coordinate)?;
        self.floor_entry(code, level)
            .rooms
            .insert(room.to_string(), coordinate);
        Ok(())
    }

    fn floor_entry(&mut self, code: String, level: String) -> &mut FloorRoomData {
        self.buildings
            .entry(code)
            .or_default()
            .entry(level)
            .or_default()
    }

    pub fn room_count(&self) -> usize {
        self.buildings
            .values()
            .flat_map(|floors| floors.values())
            .map(|floor| floor.rooms.len())
            .sum()
    }

    fn floor(&self, building: &str, level: &str) -> Option<&FloorRoomData> {
        self.buildings.get(&key(building))?.get(&key(level))
    }

    /// All rooms recorded for a building floor
    pub fn floor_rooms(&self, building: &str, level: &str) -> Option<&BTreeMap<String, RoomCoordinate>> {
        self.floor(building, level).map(|floor| &floor.rooms)
    }

    /// Floor levels with room data for a building
    pub fn building_floors(&self, building: &str) -> Option<Vec<&str>> {
        self.buildings
            .get(&key(building))
            .map(|floors| floors.keys().map(String::as_str).collect())
    }

    pub fn has_building(&self, building: &str) -> bool {
        self.buildings.contains_key(&key(building))
    }

    pub fn pdf_path(&self, building: &str, level: &str) -> Option<&str> {
        self.floor(building, level)?.pdf_path.as_deref()
    }
}

impl RoomLookup for RoomCoordinateStore {
    fn coordinate(&self, building: &str, level: &str, room: &str) -> Option<RoomCoordinate> {
        let rooms = &self.floor(building, level)?.rooms;
        if let Some(coordinate) = rooms.get(room) {
            return Some(*coordinate);
        }
        rooms
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(room))
            .map(|(_, coordinate)| *coordinate)
    }

    fn has_floor(&self, building: &str, level: &str) -> bool {
        self.floor(building, level).is_some()
    }
}

fn key(raw: &str) -> String {
    raw.trim().to_uppercase()
}

fn check_coordinate(code: &str, level: &str, room: &str, [x, y]: RoomCoordinate) -> Result<()> {
    if is_normalized(x) && is_normalized(y) {
        return Ok(());
    }
    Err(Error::CoordinateOutOfRange {
        building: code.to_string(),
        level: level.to_string(),
        room: room.to_string(),
        x,
        y,
    })
}

fn is_normalized(value: f64) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}
