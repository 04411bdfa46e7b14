use crate::error::{Error, Result};
use crate::model::Building;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::info;

/// Static, ordered catalog of campus buildings.
///
/// Directory order matters: every "first candidate wins" rule in search and
/// bare-room resolution walks buildings in the order they were declared.
#[derive(Debug, Clone)]
pub struct BuildingDirectory {
    buildings: Vec<Building>,
    /// Lowercased code, name and alias -> index of the first building carrying it
    index: HashMap<String, usize>,
    haystacks: Vec<String>,
}

impl BuildingDirectory {
    /// Build the directory, rejecting duplicate codes and aliases that shadow
    /// another building's code
    pub fn new(mut buildings: Vec<Building>) -> Result<Self> {
        let mut codes: HashMap<String, usize> = HashMap::new();
        for (idx, building) in buildings.iter_mut().enumerate() {
            building.dedup_aliases();
            if codes.insert(building.code.to_lowercase(), idx).is_some() {
                return Err(Error::DuplicateBuilding(building.code.clone()));
            }
        }

        for (idx, building) in buildings.iter().enumerate() {
            for alias in &building.aliases {
                if let Some(&other) = codes.get(&alias.to_lowercase()) {
                    if other != idx {
                        return Err(Error::AliasCollision {
                            building: building.code.clone(),
                            alias: alias.clone(),
                            other: buildings[other].code.clone(),
                        });
                    }
                }
            }
        }

        let mut index = HashMap::new();
        for (idx, building) in buildings.iter().enumerate() {
            let keys = std::iter::once(&building.code)
                .chain(std::iter::once(&building.name))
                .chain(building.aliases.iter());
            for key in keys {
                index.entry(key.trim().to_lowercase()).or_insert(idx);
            }
        }

        let haystacks = buildings.iter().map(Building::haystack).collect();

        Ok(Self {
            buildings,
            index,
            haystacks,
        })
    }

    /// Parse a JSON array of buildings
    pub fn from_json_str(json: &str) -> Result<Self> {
        let buildings: Vec<Building> = serde_json::from_str(json)?;
        Self::new(buildings)
    }

    /// Load a JSON array of buildings from disk
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::MissingDataFile(path.to_path_buf()));
        }
        let directory = Self::from_json_str(&fs::read_to_string(path)?)?;
        info!(
            "Loaded {} buildings from {}",
            directory.len(),
            path.display()
        );
        Ok(directory)
    }

    pub fn len(&self) -> usize {
        self.buildings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty()
    }

    /// Buildings in declaration order
    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Building> {
        self.buildings.iter()
    }

    /// Building with this exact code, compared case-insensitively
    pub fn get(&self, code: &str) -> Option<&Building> {
        self.buildings
            .iter()
            .find(|b| b.code.eq_ignore_ascii_case(code.trim()))
    }

    /// Building whose code, name or one of whose aliases equals the token,
    /// compared case-insensitively
    pub fn find_exact(&self, token: &str) -> Option<&Building> {
        let q = token.trim().to_lowercase();
        self.index.get(&q).map(|&idx| &self.buildings[idx])
    }

    /// Resolve a building token to a single building.
    ///
    /// Tries, in order: exact code/name/alias match, the first whitespace
    /// token as an exact match, then a substring match over code, name and
    /// aliases (first building in directory order wins).
    pub fn find(&self, query: &str) -> Option<&Building> {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return None;
        }

        if let Some(building) = self.find_exact(&q) {
            return Some(building);
        }

        if let Some(first) = q.split_whitespace().next() {
            if let Some(&idx) = self.index.get(first) {
                return Some(&self.buildings[idx]);
            }
        }

        self.haystacks
            .iter()
            .position(|hay| hay.contains(&q))
            .map(|idx| &self.buildings[idx])
    }

    /// Up to `limit` buildings whose code, name or aliases contain the query,
    /// in directory order
    pub fn search(&self, query: &str, limit: usize) -> Vec<&Building> {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return Vec::new();
        }

        self.haystacks
            .iter()
            .zip(&self.buildings)
            .filter(|(hay, _)| hay.contains(&q))
            .map(|(_, building)| building)
            .take(limit)
            .collect()
    }
}

impl<'a> IntoIterator for &'a BuildingDirectory {
    type Item = &'a Building;
    type IntoIter = std::slice::Iter<'a, Building>;

    fn into_iter(self) -> Self::IntoIter {
        self.buildings.iter()
    }
}
