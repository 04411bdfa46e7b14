//! Campus room locator: resolves free-text queries such as "NH110",
//! "NH B22", "B22" or "Nedderman" to a building, floor and room position,
//! maps normalized floor-plan coordinates to viewport pixels, and sketches a
//! hallway route to the room.

pub mod campus;
pub mod directory;
pub mod error;
pub mod floor_plans;
pub mod mapper;
pub mod model;
pub mod query;
pub mod resolver;
pub mod room_data;
pub mod router;

pub use campus::Campus;
pub use directory::BuildingDirectory;
pub use error::{Error, Result};
pub use floor_plans::{FloorPlanImage, FloorPlanLookup, FloorPlanRegistry};
pub use mapper::{to_pixel, ImageLayout, Point, ViewportGeometry};
pub use model::{floor_display_name, Building, Floor, Room, RoomCoordinate};
pub use resolver::{QueryResolver, ResolvedMatch, RoomMatch, Suggestions, MAX_BUILDING_SUGGESTIONS};
pub use room_data::{LocatedRoom, RoomCoordinateStore, RoomLookup};
pub use router::{route, HallwayRouter, Route, RouteOrder, RoutePlanner, Segment};
