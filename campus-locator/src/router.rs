use crate::error::{Error, Result};
use crate::mapper::{ImageLayout, Point, ViewportGeometry};
use serde::Serialize;

/// Plans an on-screen route between two pixels of a displayed floor plan
pub trait RoutePlanner {
    fn plan(&self, start: Point, target: Point, layout: &ImageLayout) -> Route;
}

/// Which hallway leg the route takes first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteOrder {
    HorizontalFirst,
    VerticalFirst,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub order: RouteOrder,
    pub waypoints: Vec<Point>,
}

/// One drawable leg of a route
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
    /// Euclidean length in pixels
    pub length: f64,
    /// Rotation of the leg, `atan2(dy, dx)` in degrees
    pub angle_degrees: f64,
}

impl Route {
    pub fn start(&self) -> Option<Point> {
        self.waypoints.first().copied()
    }

    pub fn target(&self) -> Option<Point> {
        self.waypoints.last().copied()
    }

    /// Sum of Manhattan lengths of all legs
    pub fn length(&self) -> f64 {
        self.waypoints
            .windows(2)
            .map(|pair| pair[0].manhattan_distance_to(&pair[1]))
            .sum()
    }

    pub fn segments(&self) -> Vec<Segment> {
        self.waypoints
            .windows(2)
            .map(|pair| {
                let (from, to) = (pair[0], pair[1]);
                Segment {
                    from,
                    to,
                    length: from.distance_to(&to),
                    angle_degrees: (to.y - from.y).atan2(to.x - from.x).to_degrees(),
                }
            })
            .collect()
    }
}

/// Routes through one horizontal and one vertical hallway crossing the
/// center of the displayed image.
///
/// This is a visual cue, not pathfinding: no walls or corridors are known.
#[derive(Debug, Clone, Copy, Default)]
pub struct HallwayRouter;

impl RoutePlanner for HallwayRouter {
    fn plan(&self, start: Point, target: Point, layout: &ImageLayout) -> Route {
        let hallway = layout.center();

        let horizontal_first = (start.y - hallway.y).abs()
            + (start.x - target.x).abs()
            + (hallway.y - target.y).abs();
        let vertical_first = (start.x - hallway.x).abs()
            + (start.y - target.y).abs()
            + (hallway.x - target.x).abs();

        // Ties go horizontal-first
        if horizontal_first <= vertical_first {
            Route {
                order: RouteOrder::HorizontalFirst,
                waypoints: vec![
                    start,
                    Point::new(start.x, hallway.y),
                    Point::new(target.x, hallway.y),
                    target,
                ],
            }
        } else {
            Route {
                order: RouteOrder::VerticalFirst,
                waypoints: vec![
                    start,
                    Point::new(hallway.x, start.y),
                    Point::new(hallway.x, target.y),
                    target,
                ],
            }
        }
    }
}

/// Hallway route from a tapped start pixel to the room's pixel.
///
/// Declines with `MissingGeometry` until the container is laid out and the
/// image's intrinsic size is known.
pub fn route(start: Point, target: Point, viewport: &ViewportGeometry) -> Result<Route> {
    if !start.is_finite() || !target.is_finite() {
        return Err(Error::InvalidPoint(format!(
            "route endpoints must be finite (start {:?}, target {:?})",
            start, target
        )));
    }
    if viewport.image_size().is_none() {
        return Err(Error::MissingGeometry("floor plan image size not loaded"));
    }

    let layout = ImageLayout::contain(viewport)?;
    Ok(HallwayRouter.plan(start, target, &layout))
}
