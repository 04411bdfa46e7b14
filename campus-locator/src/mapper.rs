//! Normalized floor-plan coordinates to container pixels under "contain"
//! fitting (letterbox or pillarbox, centered).

use crate::error::{Error, Result};
use crate::model::RoomCoordinate;
use serde::{Deserialize, Serialize};

/// A position in container pixel space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn manhattan_distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// Container size plus the floor-plan image's intrinsic size, once known
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportGeometry {
    pub container_width: f64,
    pub container_height: f64,
    #[serde(default)]
    pub image_width: Option<f64>,
    #[serde(default)]
    pub image_height: Option<f64>,
}

impl ViewportGeometry {
    pub fn new(container_width: f64, container_height: f64) -> Self {
        Self {
            container_width,
            container_height,
            image_width: None,
            image_height: None,
        }
    }

    pub fn with_image(mut self, width: f64, height: f64) -> Self {
        self.image_width = Some(width);
        self.image_height = Some(height);
        self
    }

    /// Intrinsic image size, if both dimensions are known and positive
    pub fn image_size(&self) -> Option<(f64, f64)> {
        match (self.image_width, self.image_height) {
            (Some(w), Some(h)) if is_positive(w) && is_positive(h) => Some((w, h)),
            _ => None,
        }
    }

    fn container_size(&self) -> Result<(f64, f64)> {
        if is_positive(self.container_width) && is_positive(self.container_height) {
            Ok((self.container_width, self.container_height))
        } else {
            Err(Error::MissingGeometry("container size not laid out"))
        }
    }
}

/// Where the fitted image sits inside the container
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImageLayout {
    pub offset_x: f64,
    pub offset_y: f64,
    pub width: f64,
    pub height: f64,
}

impl ImageLayout {
    /// Fit the image inside the container preserving aspect ratio.
    ///
    /// Without an intrinsic image size the image is assumed to fill the
    /// container exactly, which is only approximately right.
    pub fn contain(viewport: &ViewportGeometry) -> Result<Self> {
        let (container_width, container_height) = viewport.container_size()?;

        let Some((image_width, image_height)) = viewport.image_size() else {
            return Ok(Self {
                offset_x: 0.0,
                offset_y: 0.0,
                width: container_width,
                height: container_height,
            });
        };

        let image_aspect = image_width / image_height;
        let container_aspect = container_width / container_height;

        if image_aspect > container_aspect {
            // Wider than the container: full width, bars above and below
            let height = container_width / image_aspect;
            Ok(Self {
                offset_x: 0.0,
                offset_y: (container_height - height) / 2.0,
                width: container_width,
                height,
            })
        } else {
            let width = container_height * image_aspect;
            Ok(Self {
                offset_x: (container_width - width) / 2.0,
                offset_y: 0.0,
                width,
                height: container_height,
            })
        }
    }

    pub fn place(&self, normalized: RoomCoordinate) -> Point {
        Point::new(
            self.offset_x + normalized[0] * self.width,
            self.offset_y + normalized[1] * self.height,
        )
    }

    pub fn center(&self) -> Point {
        self.place([0.5, 0.5])
    }
}

/// Pixel position of a normalized coordinate inside the viewport
pub fn to_pixel(normalized: RoomCoordinate, viewport: &ViewportGeometry) -> Result<Point> {
    if !normalized.iter().all(|v| v.is_finite()) {
        return Err(Error::InvalidPoint(format!(
            "normalized coordinate {:?} is not finite",
            normalized
        )));
    }
    Ok(ImageLayout::contain(viewport)?.place(normalized))
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
