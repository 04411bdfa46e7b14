use campus_locator::Campus;
use std::path::PathBuf;
use tracing::info;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_FLOOR_PLAN_ROOT: &str = "assets/floor-plans";
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:8080,http://127.0.0.1:8080,http://localhost:8081,http://127.0.0.1:8081,http://localhost:19006,http://127.0.0.1:19006";

/// Server settings, read from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `BIND_ADDR`
    pub bind_addr: String,
    /// `CAMPUS_DATA_DIR`; the bundled dataset is used when unset
    pub data_dir: Option<PathBuf>,
    /// `FLOOR_PLAN_ROOT`, the directory floor-plan image paths are relative to
    pub floor_plan_root: PathBuf,
    /// `ALLOWED_ORIGINS`, comma separated
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            data_dir: None,
            floor_plan_root: PathBuf::from(DEFAULT_FLOOR_PLAN_ROOT),
            allowed_origins: parse_origins(DEFAULT_ALLOWED_ORIGINS),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            data_dir: lookup("CAMPUS_DATA_DIR")
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
            floor_plan_root: lookup("FLOOR_PLAN_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.floor_plan_root),
            allowed_origins: lookup("ALLOWED_ORIGINS")
                .map(|origins| parse_origins(&origins))
                .unwrap_or(defaults.allowed_origins),
        }
    }

    /// Load the campus stores from `data_dir`, or the bundled dataset
    pub fn load_campus(&self) -> campus_locator::Result<Campus> {
        match &self.data_dir {
            Some(dir) => Campus::load(dir),
            None => {
                info!("CAMPUS_DATA_DIR not set, using bundled campus data");
                Campus::builtin()
            }
        }
    }
}

fn parse_origins(origins: &str) -> Vec<String> {
    origins
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}
