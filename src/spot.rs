// Parking spot data model and the display helpers the map and cards rely on
use serde::{Deserialize, Serialize};
use std::fmt;

// Availability of a spot at read time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpotStatus {
    Available,
    Reserved,
    Occupied,
}

impl SpotStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SpotStatus::Available => "Available",
            SpotStatus::Reserved => "Reserved",
            SpotStatus::Occupied => "Occupied",
        }
    }
}

impl fmt::Display for SpotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingSpot {
    pub id: String,
    pub status: SpotStatus,
    // Hourly rate in KSh, only quoted when the spot can be reserved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    // Straight-line distance from the user in km
    pub distance: f64,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lng: f64,
}

impl ParkingSpot {
    pub fn new(id: impl Into<String>, status: SpotStatus, price: Option<f64>, distance: f64) -> Self {
        Self {
            id: id.into(),
            status,
            price,
            distance,
            amenities: Vec::new(),
            name: String::new(),
            address: String::new(),
            lat: 0.0,
            lng: 0.0,
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == SpotStatus::Available
    }

    /// Human readable distance: metres below one kilometre, otherwise km with
    /// a single decimal.
    pub fn distance_label(&self) -> String {
        if self.distance < 1.0 {
            format!("{}m", (self.distance * 1000.0).round() as u64)
        } else {
            format!("{:.1}km", self.distance)
        }
    }

    /// Walking time estimate at four minutes per kilometre.
    pub fn walking_minutes(&self) -> u64 {
        (self.distance * 4.0).round() as u64
    }

    // Markers only show a price bubble for available spots with a quoted rate
    pub fn marker_price_label(&self) -> Option<String> {
        match self.price {
            Some(price) if self.is_available() && price > 0.0 => Some(format!("KSh {}", price)),
            _ => None,
        }
    }
}

// Counts shown in the map overlay legend
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatusSummary {
    pub available: usize,
    pub reserved: usize,
    pub occupied: usize,
}

impl StatusSummary {
    pub fn from_spots(spots: &[ParkingSpot]) -> Self {
        spots.iter().fold(Self::default(), |mut summary, spot| {
            match spot.status {
                SpotStatus::Available => summary.available += 1,
                SpotStatus::Reserved => summary.reserved += 1,
                SpotStatus::Occupied => summary.occupied += 1,
            }
            summary
        })
    }

    pub fn total(&self) -> usize {
        self.available + self.reserved + self.occupied
    }
}
