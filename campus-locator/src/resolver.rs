use crate::directory::BuildingDirectory;
use crate::floor_plans::FloorPlanLookup;
use crate::model::{Building, Floor, Room};
use crate::query::{self, QueryShape, RoomQuery};
use crate::room_data::RoomLookup;
use serde::Serialize;
use tracing::debug;

/// Maximum number of building candidates returned by search
pub const MAX_BUILDING_SUGGESTIONS: usize = 5;

/// A query resolved down to a position on a specific floor plan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomMatch {
    pub building: Building,
    pub floor: Floor,
    pub room: Room,
}

impl RoomMatch {
    /// "NH 110"
    pub fn label(&self) -> String {
        format!("{} {}", self.building.code, self.room.number)
    }
}

/// Outcome of resolving a query
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolvedMatch {
    Building(Building),
    Room(RoomMatch),
}

impl ResolvedMatch {
    pub fn building(&self) -> &Building {
        match self {
            ResolvedMatch::Building(building) => building,
            ResolvedMatch::Room(room) => &room.building,
        }
    }

    /// Text a search box shows once the match is selected
    pub fn label(&self) -> String {
        match self {
            ResolvedMatch::Building(b) => format!("{} - {}", b.code, b.name),
            ResolvedMatch::Room(room) => room.label(),
        }
    }
}

/// Suggestions for a partially typed query: at most one room, otherwise
/// building candidates
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Suggestions {
    pub rooms: Vec<RoomMatch>,
    pub buildings: Vec<Building>,
}

impl Suggestions {
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty() && self.buildings.is_empty()
    }

    /// What submitting the query selects: the room if there is one, else the
    /// first building
    pub fn default_selection(&self) -> Option<ResolvedMatch> {
        if let Some(room) = self.rooms.first() {
            return Some(ResolvedMatch::Room(room.clone()));
        }
        self.buildings.first().cloned().map(ResolvedMatch::Building)
    }
}

/// Resolves free-text queries against the building directory, the room
/// coordinate table and the floor-plan registry
#[derive(Clone, Copy)]
pub struct QueryResolver<'a> {
    directory: &'a BuildingDirectory,
    rooms: &'a dyn RoomLookup,
    plans: &'a dyn FloorPlanLookup,
}

impl<'a> QueryResolver<'a> {
    pub fn new(
        directory: &'a BuildingDirectory,
        rooms: &'a dyn RoomLookup,
        plans: &'a dyn FloorPlanLookup,
    ) -> Self {
        Self {
            directory,
            rooms,
            plans,
        }
    }

    /// Resolve a query to a room if it is room-shaped and resolvable,
    /// otherwise to a single building
    pub fn resolve(&self, query: &str) -> Option<ResolvedMatch> {
        let q = query.trim();
        if q.is_empty() {
            return None;
        }

        if let Some(room) = self.resolve_room(q) {
            return Some(ResolvedMatch::Room(room));
        }

        self.directory
            .find(q)
            .cloned()
            .map(ResolvedMatch::Building)
    }

    /// Up to five buildings whose code, name or aliases contain the query
    pub fn search_buildings(&self, query: &str) -> Vec<Building> {
        self.directory
            .search(query, MAX_BUILDING_SUGGESTIONS)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn suggest(&self, query: &str) -> Suggestions {
        match self.resolve_room(query.trim()) {
            Some(room) => Suggestions {
                rooms: vec![room],
                buildings: Vec::new(),
            },
            None => Suggestions {
                rooms: Vec::new(),
                buildings: self.search_buildings(query),
            },
        }
    }

    /// Room-shaped interpretation of the query, if any
    pub fn resolve_room(&self, query: &str) -> Option<RoomMatch> {
        let shape = query::classify(query)?;
        debug!("Query {:?} classified as {:?}", query, shape);

        match &shape {
            QueryShape::BareRoom(room) => self.resolve_bare_room(room),
            QueryShape::Compact(splits) => self.resolve_compact(splits),
            _ => shape
                .candidates()
                .iter()
                .find_map(|candidate| self.resolve_qualified(candidate)),
        }
    }

    fn resolve_qualified(&self, candidate: &RoomQuery) -> Option<RoomMatch> {
        let Some(building) = self.directory.find(&candidate.building) else {
            debug!("No building matches {:?}", candidate.building);
            return None;
        };
        self.place_candidate(building, candidate)
    }

    /// Splits of a compact query ("NHB22", "ERB110"). Splits whose letters
    /// name a building exactly are the only ones tried when any exist; the
    /// full letter run goes first unless both splits name the same building,
    /// in which case the basement reading goes first. Substring matching on
    /// the letters is the last resort.
    fn resolve_compact(&self, splits: &[RoomQuery]) -> Option<RoomMatch> {
        let mut exact: Vec<(&'a Building, &RoomQuery)> = splits
            .iter()
            .rev()
            .filter_map(|split| {
                self.directory
                    .find_exact(&split.building)
                    .map(|building| (building, split))
            })
            .collect();

        if exact.is_empty() {
            return splits.iter().find_map(|split| self.resolve_qualified(split));
        }

        let same_building =
            matches!(exact.as_slice(), [(full, _), (shortened, _)] if full.code == shortened.code);
        if same_building {
            exact.reverse();
        }

        exact
            .into_iter()
            .find_map(|(building, split)| self.place_candidate(building, split))
    }

    fn place_candidate(&self, building: &Building, candidate: &RoomQuery) -> Option<RoomMatch> {
        let level = query::floor_level(&candidate.room)?;
        self.place_room(building, &level, &candidate.room)
    }

    fn resolve_bare_room(&self, room: &str) -> Option<RoomMatch> {
        let level = query::floor_level(room)?;
        let (building, number) = self.first_building_with_floor(&level, room)?;
        self.place_room(building, &level, &number)
    }

    /// Ambiguity policy for bare room numbers: the first building in
    /// directory order with a usable floor at `level` wins, even if a later
    /// building also has the room. Returns the building and the room number
    /// spelling to use downstream.
    ///
    /// A building whose only floor at `level` is declared still wins; if the
    /// declared floor lacks the room the query resolves to nothing rather
    /// than moving on to a later building.
    fn first_building_with_floor(&self, level: &str, room: &str) -> Option<(&'a Building, String)> {
        let picked = self.directory.iter().find_map(|building| {
            let located = self.rooms.locate(&building.code, level, room);
            if located.is_some() || self.has_usable_floor(building, level) {
                let number = located.map_or_else(|| room.to_string(), |hit| hit.number);
                Some((building, number))
            } else {
                None
            }
        });

        if let Some((building, number)) = &picked {
            debug!(
                "Bare room {:?} assigned to {} as {:?} on level {}",
                room, building.code, number, level
            );
        }
        picked
    }

    fn has_usable_floor(&self, building: &Building, level: &str) -> bool {
        building.declared_floor(level).is_some() || self.has_floor_data(building, level)
    }

    /// Coordinate-table or image presence for this floor
    fn has_floor_data(&self, building: &Building, level: &str) -> bool {
        self.rooms.has_floor(&building.code, level) || self.plans.has_floor_plan(&building.code, level)
    }

    /// Fix the floor and room once building and level are known
    fn place_room(&self, building: &Building, level: &str, room: &str) -> Option<RoomMatch> {
        let has_floor_data = self.has_floor_data(building, level);
        let image = self.plans.floor_plan(&building.code, level).cloned();

        let floor = match building.declared_floor(level) {
            Some(declared) => {
                let mut floor = declared.clone();
                if floor.image.is_none() {
                    floor.image = image;
                }
                floor
            }
            None if has_floor_data => Floor::synthesized(level, image),
            None => return None,
        };

        if let Some(hit) = self.rooms.locate(&building.code, level, room) {
            return Some(RoomMatch {
                building: building.clone(),
                floor,
                room: Room::synthesized(&hit.number, hit.coordinate),
            });
        }

        if has_floor_data {
            debug!("No coordinates for {} {}, using placeholder", building.code, room);
            return Some(RoomMatch {
                building: building.clone(),
                floor,
                room: Room::placeholder(room),
            });
        }

        let declared_room = floor.declared_room(room).cloned()?;
        Some(RoomMatch {
            building: building.clone(),
            floor,
            room: declared_room,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::floor_plans::FloorPlanRegistry;
    use crate::room_data::RoomCoordinateStore;

    struct Fixture {
        directory: BuildingDirectory,
        rooms: RoomCoordinateStore,
        plans: FloorPlanRegistry,
    }

    impl Fixture {
        fn new() -> Self {
            let directory = BuildingDirectory::new(vec![
                Building::new("NH", "Nedderman Hall", 32.7325, -97.1138)
                    .with_aliases(&["Nedderman", "Nedderman Hall", "NH"]),
                Building::new("CPB", "Chemistry & Physics Building", 32.7304, -97.1117)
                    .with_aliases(&["Chemistry", "Physics", "CPB"]),
                Building::new("LS", "Life Science Building", 32.7287, -97.1127)
                    .with_aliases(&["Life Science", "LSB"]),
                Building::new("PH", "Preston Hall", 32.7308, -97.1129)
                    .with_aliases(&["Preston"])
                    .with_floor(
                        Floor::new("4").with_room(Room::new("401", [0.3, 0.7])),
                    ),
                Building::new("ERB", "Engineering Research Building", 32.7330, -97.1130)
                    .with_aliases(&["Engineering Research", "ERB"]),
            ])
            .unwrap();

            let mut rooms = RoomCoordinateStore::default();
            rooms.insert("NH", "1", "110", [0.25, 0.55]).unwrap();
            rooms.insert("NH", "B", "22", [0.35, 0.42]).unwrap();
            rooms.insert("LS", "B", "B22", [0.73, 0.26]).unwrap();
            rooms.insert("LS", "B", "B30", [0.65, 0.31]).unwrap();

            let plans = FloorPlanRegistry::new()
                .with_plan("NH", "1", "NH/NH1-1.png")
                .with_plan("NH", "B", "NH/NHB-1.png")
                .with_plan("CPB", "3", "CPB/CPB3-1.png")
                .with_plan("ERB", "1", "ERB/ERB1-1.png");

            Self {
                directory,
                rooms,
                plans,
            }
        }

        fn resolver(&self) -> QueryResolver<'_> {
            QueryResolver::new(&self.directory, &self.rooms, &self.plans)
        }
    }

    fn room(resolved: Option<ResolvedMatch>) -> RoomMatch {
        match resolved {
            Some(ResolvedMatch::Room(room)) => room,
            other => panic!("expected room match, got {:?}", other),
        }
    }

    #[test]
    fn test_room_from_coordinate_table() {
        let fixture = Fixture::new();
        let matched = room(fixture.resolver().resolve("NH 110"));

        assert_eq!(matched.building.code, "NH");
        assert_eq!(matched.floor.level, "1");
        assert_eq!(matched.floor.display_name, "First Floor");
        assert_eq!(matched.floor.image.unwrap().path().to_str(), Some("NH/NH1-1.png"));
        assert_eq!(matched.room.coordinate(), [0.25, 0.55]);
    }

    #[test]
    fn test_spaced_and_compact_forms_agree() {
        let fixture = Fixture::new();
        let resolver = fixture.resolver();
        let spaced = room(resolver.resolve("NH 110"));

        assert_eq!(room(resolver.resolve("NH110")), spaced);
        assert_eq!(room(resolver.resolve("nh110")), spaced);
    }

    #[test]
    fn test_basement_number_normalized_to_stored_spelling() {
        let fixture = Fixture::new();
        let resolver = fixture.resolver();

        let spaced = room(resolver.resolve("NH B22"));
        assert_eq!(spaced.floor.level, "B");
        assert_eq!(spaced.room.number, "22");
        assert_eq!(spaced.room.coordinate(), [0.35, 0.42]);

        assert_eq!(room(resolver.resolve("NHB22")), spaced);
    }

    #[test]
    fn test_compact_basement_split_beats_alias_split() {
        // "LSB" is also an alias of LS; the basement reading LS/B22 is tried first
        let fixture = Fixture::new();
        let matched = room(fixture.resolver().resolve("LSB22"));
        assert_eq!(matched.building.code, "LS");
        assert_eq!(matched.room.number, "B22");
    }

    #[test]
    fn test_compact_code_ending_in_b_keeps_its_building() {
        // "ER" is a substring of "Nedderman", which has a basement
        let fixture = Fixture::new();
        let resolver = fixture.resolver();

        let compact = room(resolver.resolve("ERB110"));
        assert_eq!(compact.building.code, "ERB");
        assert_eq!(compact.floor.level, "1");
        assert_eq!(compact.room.number, "110");
        assert_eq!(room(resolver.resolve("ERB 110")), compact);
        assert_eq!(room(resolver.resolve("erb110")), compact);
    }

    #[test]
    fn test_compact_exact_building_never_falls_back_to_substring() {
        // ERB has no ninth floor; the basement reading must not land in NH
        let fixture = Fixture::new();
        assert!(fixture.resolver().resolve_room("ERB999").is_none());
    }

    #[test]
    fn test_placeholder_room_when_only_image_exists() {
        let fixture = Fixture::new();
        let matched = room(fixture.resolver().resolve("CPB 305"));

        assert_eq!(matched.floor.level, "3");
        assert_eq!(matched.room.number, "305");
        assert_eq!(matched.room.coordinate(), [0.5, 0.5]);
    }

    #[test]
    fn test_declared_room_fallback() {
        let fixture = Fixture::new();
        let matched = room(fixture.resolver().resolve("PH 401"));
        assert_eq!(matched.room.coordinate(), [0.3, 0.7]);
        assert_eq!(matched.floor.display_name, "Fourth Floor");
    }

    #[test]
    fn test_declared_floor_without_room_falls_back_to_building() {
        let fixture = Fixture::new();
        let resolved = fixture.resolver().resolve("PH 499");
        assert_eq!(resolved.map(|m| m.building().code.clone()).as_deref(), Some("PH"));
        assert!(fixture.resolver().resolve_room("PH 499").is_none());
    }

    #[test]
    fn test_bare_room_first_building_wins() {
        let fixture = Fixture::new();
        let matched = room(fixture.resolver().resolve("B22"));

        // NH precedes LS in the directory and has a basement floor
        assert_eq!(matched.building.code, "NH");
        assert_eq!(matched.room.number, "22");
    }

    #[test]
    fn test_bare_room_skips_buildings_without_floor() {
        let fixture = Fixture::new();
        let matched = room(fixture.resolver().resolve("b30"));
        // NH has a basement, so it wins even though only LS stores B30
        assert_eq!(matched.building.code, "NH");
        assert_eq!(matched.room.coordinate(), [0.5, 0.5]);

        let matched = room(fixture.resolver().resolve("305"));
        assert_eq!(matched.building.code, "CPB");
    }

    #[test]
    fn test_bare_room_without_any_floor_falls_through() {
        let fixture = Fixture::new();
        assert!(fixture.resolver().resolve("905").is_none());
        assert!(fixture.resolver().suggest("905").is_empty());
    }

    #[test]
    fn test_building_queries() {
        let fixture = Fixture::new();
        let resolver = fixture.resolver();

        for building in fixture.directory.iter() {
            for query in [building.code.to_lowercase(), building.code.to_uppercase()] {
                let resolved = resolver.resolve(&query).unwrap();
                assert!(matches!(&resolved, ResolvedMatch::Building(b) if b.code == building.code));
            }
        }

        let resolved = resolver.resolve("Nedderman").unwrap();
        assert_eq!(resolved.label(), "NH - Nedderman Hall");
    }

    #[test]
    fn test_unknown_building_in_room_query_falls_through() {
        let fixture = Fixture::new();
        assert!(fixture.resolver().resolve("XYZ 110").is_none());
    }

    #[test]
    fn test_blank_queries() {
        let fixture = Fixture::new();
        let resolver = fixture.resolver();
        for query in ["", "   "] {
            assert!(resolver.resolve(query).is_none());
            assert!(resolver.search_buildings(query).is_empty());
            assert!(resolver.suggest(query).is_empty());
        }
    }

    #[test]
    fn test_suggestions() {
        let fixture = Fixture::new();
        let resolver = fixture.resolver();

        let rooms = resolver.suggest("NH110");
        assert_eq!(rooms.rooms.len(), 1);
        assert!(rooms.buildings.is_empty());
        assert_eq!(rooms.default_selection().unwrap().label(), "NH 110");

        let buildings = resolver.suggest("hall");
        assert!(buildings.rooms.is_empty());
        let codes: Vec<_> = buildings.buildings.iter().map(|b| b.code.as_str()).collect();
        assert_eq!(codes, vec!["NH", "PH"]);
    }

    #[test]
    fn test_resolved_match_serializes_with_kind_tag() {
        let fixture = Fixture::new();
        let resolved = fixture.resolver().resolve("NH 110").unwrap();
        let json = serde_json::to_value(&resolved).unwrap();

        assert_eq!(json["kind"], "room");
        assert_eq!(json["building"]["code"], "NH");
        assert_eq!(json["room"]["x"], 0.25);
    }
}
