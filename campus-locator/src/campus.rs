use crate::directory::BuildingDirectory;
use crate::error::Result;
use crate::floor_plans::FloorPlanRegistry;
use crate::resolver::QueryResolver;
use crate::room_data::RoomCoordinateStore;
use std::path::Path;
use tracing::{info, warn};

pub const BUILDINGS_FILE: &str = "buildings.json";
pub const ROOM_COORDINATES_FILE: &str = "room_coordinates.json";
pub const FLOOR_PLANS_FILE: &str = "floor_plans.csv";

const BUNDLED_BUILDINGS: &str = include_str!("../data/buildings.json");
const BUNDLED_ROOM_COORDINATES: &str = include_str!("../data/room_coordinates.json");
const BUNDLED_FLOOR_PLANS: &str = include_str!("../data/floor_plans.csv");

/// The three static stores, loaded once and shared read-only
#[derive(Debug, Clone)]
pub struct Campus {
    directory: BuildingDirectory,
    rooms: RoomCoordinateStore,
    floor_plans: FloorPlanRegistry,
}

impl Campus {
    pub fn new(
        directory: BuildingDirectory,
        rooms: RoomCoordinateStore,
        floor_plans: FloorPlanRegistry,
    ) -> Self {
        Self {
            directory,
            rooms,
            floor_plans,
        }
    }

    /// Dataset compiled into the crate
    pub fn builtin() -> Result<Self> {
        Ok(Self::new(
            BuildingDirectory::from_json_str(BUNDLED_BUILDINGS)?,
            RoomCoordinateStore::from_json_str(BUNDLED_ROOM_COORDINATES)?,
            FloorPlanRegistry::from_csv_str(BUNDLED_FLOOR_PLANS)?,
        ))
    }

    /// Load from a data directory. The building list is required; a missing
    /// room table or floor-plan manifest leaves that store empty.
    pub fn load(dir: &Path) -> Result<Self> {
        let directory = BuildingDirectory::from_path(&dir.join(BUILDINGS_FILE))?;

        let rooms_path = dir.join(ROOM_COORDINATES_FILE);
        let rooms = if rooms_path.exists() {
            RoomCoordinateStore::from_path(&rooms_path)?
        } else {
            warn!("No room coordinates at {}, rooms will use placeholders", rooms_path.display());
            RoomCoordinateStore::default()
        };

        let plans_path = dir.join(FLOOR_PLANS_FILE);
        let floor_plans = if plans_path.exists() {
            FloorPlanRegistry::from_path(&plans_path)?
        } else {
            warn!("No floor plan manifest at {}", plans_path.display());
            FloorPlanRegistry::new()
        };

        info!("Campus data loaded from {}", dir.display());
        Ok(Self::new(directory, rooms, floor_plans))
    }

    pub fn directory(&self) -> &BuildingDirectory {
        &self.directory
    }

    pub fn rooms(&self) -> &RoomCoordinateStore {
        &self.rooms
    }

    pub fn floor_plans(&self) -> &FloorPlanRegistry {
        &self.floor_plans
    }

    pub fn resolver(&self) -> QueryResolver<'_> {
        QueryResolver::new(&self.directory, &self.rooms, &self.floor_plans)
    }
}
