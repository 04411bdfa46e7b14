use crate::error::{Error, Result};
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Opaque handle to a floor-plan raster, relative to the floor-plan root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FloorPlanImage {
    path: PathBuf,
}

impl FloorPlanImage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the image header under `root` for its intrinsic (width, height).
    ///
    /// Returns `None` when the file is missing or unreadable; callers then
    /// fall back to container-filling geometry.
    pub fn intrinsic_size(&self, root: &Path) -> Option<(u32, u32)> {
        let full_path = root.join(&self.path);
        match image::image_dimensions(&full_path) {
            Ok(size) => Some(size),
            Err(e) => {
                warn!(
                    "Failed to read floor plan size from {}: {}",
                    full_path.display(),
                    e
                );
                None
            }
        }
    }
}

/// Lookup interface over floor-plan images keyed by building and level
pub trait FloorPlanLookup: Send + Sync {
    fn floor_plan(&self, building: &str, level: &str) -> Option<&FloorPlanImage>;

    fn has_floor_plan(&self, building: &str, level: &str) -> bool {
        self.floor_plan(building, level).is_some()
    }
}

/// Represents a row in floor_plans.csv
#[derive(Debug, Deserialize)]
struct ManifestRow {
    building: String,
    level: String,
    path: String,
}

/// Registry of floor-plan images. Existence of an entry is enough for the
/// resolver to synthesize a floor.
#[derive(Debug, Clone, Default)]
pub struct FloorPlanRegistry {
    plans: HashMap<(String, String), FloorPlanImage>,
}

impl FloorPlanRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `building,level,path` manifest with a header row
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut registry = Self::new();
        for result in reader.deserialize() {
            let row: ManifestRow = result?;
            registry.insert(&row.building, &row.level, row.path);
        }

        Ok(registry)
    }

    pub fn from_csv_str(manifest: &str) -> Result<Self> {
        Self::from_csv_reader(manifest.as_bytes())
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::MissingDataFile(path.to_path_buf()));
        }
        let registry = Self::from_csv_reader(std::fs::File::open(path)?)?;
        info!(
            "Loaded {} floor plan images from {}",
            registry.len(),
            path.display()
        );
        Ok(registry)
    }

    pub fn insert(&mut self, building: &str, level: &str, path: impl Into<PathBuf>) {
        self.plans
            .insert(key(building, level), FloorPlanImage::new(path));
    }

    pub fn with_plan(mut self, building: &str, level: &str, path: impl Into<PathBuf>) -> Self {
        self.insert(building, level, path);
        self
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

impl FloorPlanLookup for FloorPlanRegistry {
    fn floor_plan(&self, building: &str, level: &str) -> Option<&FloorPlanImage> {
        self.plans.get(&key(building, level))
    }
}

fn key(building: &str, level: &str) -> (String, String) {
    (building.trim().to_uppercase(), level.trim().to_uppercase())
}
