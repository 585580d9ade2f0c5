// Mock spot and reservation data used in place of a backend
use crate::reservation::Reservation;
use crate::spot::ParkingSpot;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(String),
}

// Sample file paths, relative to the crate root
pub const SAMPLE_DIR: &str = "samples";
pub const SPOTS_FILE: &str = "parking_spots.json";
pub const RESERVATIONS_FILE: &str = "reservations.json";

// The same data compiled in, for callers without the samples directory
pub const SAMPLE_SPOTS_JSON: &str = include_str!("../samples/parking_spots.json");
pub const SAMPLE_RESERVATIONS_JSON: &str = include_str!("../samples/reservations.json");

#[derive(Debug, Clone)]
pub struct SampleCatalog {
    dir: PathBuf,
}

impl Default for SampleCatalog {
    fn default() -> Self {
        Self::new(SAMPLE_DIR)
    }
}

impl SampleCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn load_spots(&self) -> Result<Vec<ParkingSpot>, CatalogError> {
        self.load(SPOTS_FILE)
    }

    pub fn load_reservations(&self) -> Result<Vec<Reservation>, CatalogError> {
        self.load(RESERVATIONS_FILE)
    }

    fn load<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>, CatalogError> {
        let path = self.dir.join(file);
        let content = std::fs::read_to_string(&path)?;
        let items = parse(&content)?;
        debug!(path = %path.display(), count = items.len(), "Loaded sample data");
        Ok(items)
    }
}

pub fn embedded_spots() -> Result<Vec<ParkingSpot>, CatalogError> {
    parse(SAMPLE_SPOTS_JSON)
}

pub fn embedded_reservations() -> Result<Vec<Reservation>, CatalogError> {
    parse(SAMPLE_RESERVATIONS_JSON)
}

fn parse<T: DeserializeOwned>(json: &str) -> Result<Vec<T>, CatalogError> {
    serde_json::from_str(json).map_err(|e| CatalogError::Json(e.to_string()))
}
