use crate::floor_plans::FloorPlanImage;
use serde::{Deserialize, Serialize};

/// Display name given to rooms synthesized from the coordinate table
pub const SYNTHESIZED_ROOM_NAME: &str = "Room";

/// Normalized `[x, y]` position on a floor-plan image, each in 0-1
pub type RoomCoordinate = [f64; 2];

/// A campus building as listed in the directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub code: String,
    pub name: String,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Floors declared directly in the directory (most buildings have none)
    #[serde(default, rename = "floors", skip_serializing_if = "Vec::is_empty")]
    pub declared_floors: Vec<Floor>,
}

impl Building {
    pub fn new(code: &str, name: &str, latitude: f64, longitude: f64) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            latitude,
            longitude,
            aliases: Vec::new(),
            declared_floors: Vec::new(),
        }
    }

    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases = aliases.iter().map(|a| a.to_string()).collect();
        self.dedup_aliases();
        self
    }

    pub fn with_floor(mut self, floor: Floor) -> Self {
        self.declared_floors.push(floor);
        self
    }

    /// Declared floor at `level`, compared case-insensitively
    pub fn declared_floor(&self, level: &str) -> Option<&Floor> {
        self.declared_floors
            .iter()
            .find(|f| f.level.eq_ignore_ascii_case(level))
    }

    /// Code, name and aliases joined and lowercased, used for substring search
    pub(crate) fn haystack(&self) -> String {
        std::iter::once(self.code.as_str())
            .chain(std::iter::once(self.name.as_str()))
            .chain(self.aliases.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    /// Aliases form a set; keep the first spelling of each
    pub(crate) fn dedup_aliases(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.aliases.retain(|a| seen.insert(a.to_lowercase()));
    }
}

/// One floor of a building, declared or synthesized by the resolver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    /// "B" for basement, "1", "2", ...
    pub level: String,
    #[serde(rename = "name")]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<FloorPlanImage>,
    #[serde(default, rename = "rooms", skip_serializing_if = "Vec::is_empty")]
    pub declared_rooms: Vec<Room>,
}

impl Floor {
    pub fn new(level: &str) -> Self {
        Self {
            level: level.to_string(),
            display_name: floor_display_name(level),
            image: None,
            declared_rooms: Vec::new(),
        }
    }

    /// Floor built on demand from coordinate-table or image presence
    pub fn synthesized(level: &str, image: Option<FloorPlanImage>) -> Self {
        Self {
            image,
            ..Self::new(level)
        }
    }

    pub fn with_room(mut self, room: Room) -> Self {
        self.declared_rooms.push(room);
        self
    }

    pub fn declared_room(&self, number: &str) -> Option<&Room> {
        self.declared_rooms
            .iter()
            .find(|r| r.number.eq_ignore_ascii_case(number))
    }
}

/// A room position on a floor plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub number: String,
    #[serde(rename = "x")]
    pub normalized_x: f64,
    #[serde(rename = "y")]
    pub normalized_y: f64,
    #[serde(default, rename = "name", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl Room {
    pub fn new(number: &str, coordinate: RoomCoordinate) -> Self {
        Self {
            number: number.to_string(),
            normalized_x: coordinate[0],
            normalized_y: coordinate[1],
            display_name: None,
        }
    }

    /// Room recomputed from the coordinate table for a single query
    pub fn synthesized(number: &str, coordinate: RoomCoordinate) -> Self {
        Self {
            display_name: Some(SYNTHESIZED_ROOM_NAME.to_string()),
            ..Self::new(number, coordinate)
        }
    }

    /// Stand-in centered on the plan when the floor exists but the room has no entry
    pub fn placeholder(number: &str) -> Self {
        Self::synthesized(number, [0.5, 0.5])
    }

    pub fn coordinate(&self) -> RoomCoordinate {
        [self.normalized_x, self.normalized_y]
    }
}

/// "Basement", "First Floor" .. "Ninth Floor", otherwise "Floor N"
pub fn floor_display_name(level: &str) -> String {
    const ORDINALS: [&str; 10] = [
        "", "First", "Second", "Third", "Fourth", "Fifth", "Sixth", "Seventh", "Eighth", "Ninth",
    ];

    if level.eq_ignore_ascii_case("B") {
        return "Basement".to_string();
    }
    match level.parse::<usize>() {
        Ok(n) if (1..ORDINALS.len()).contains(&n) => format!("{} Floor", ORDINALS[n]),
        _ => format!("Floor {}", level),
    }
}
