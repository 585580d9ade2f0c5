// Spot filtering for the map view and the filter sheet
use crate::spot::ParkingSpot;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const DEFAULT_PRICE_RANGE: PriceRange = PriceRange {
    min: 0.0,
    max: 1000.0,
};

// "Any Distance" is the finite bound configured here, not an absent limit
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterConfig {
    pub unlimited_distance_km: f64,
    pub default_price_range: PriceRange,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            unlimited_distance_km: 10.0,
            default_price_range: DEFAULT_PRICE_RANGE,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Available,
}

// Inclusive price bounds in KSh per hour
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, price: f64) -> bool {
        self.min <= price && price <= self.max
    }

    fn is_well_formed(&self) -> bool {
        !self.min.is_nan() && !self.max.is_nan() && self.min <= self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        DEFAULT_PRICE_RANGE
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterCriteria {
    pub status: StatusFilter,
    pub price_range: PriceRange,
    pub max_distance: f64,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self::with_config(&FilterConfig::default())
    }
}

impl FilterCriteria {
    pub fn with_config(config: &FilterConfig) -> Self {
        Self {
            status: StatusFilter::All,
            price_range: config.default_price_range,
            max_distance: config.unlimited_distance_km,
        }
    }

    pub fn reset(&mut self, config: &FilterConfig) {
        *self = Self::with_config(config);
    }

    /// Number of dimensions (status, price, distance) that differ from the
    /// configured defaults.
    pub fn active_filter_count(&self, config: &FilterConfig) -> usize {
        let mut count = 0;
        if self.status != StatusFilter::All {
            count += 1;
        }
        if self.price_range != config.default_price_range {
            count += 1;
        }
        if self.max_distance != config.unlimited_distance_km {
            count += 1;
        }
        count
    }

    // Index into PRICE_RANGE_PRESETS, "All Prices" when the range is custom
    pub fn price_preset_index(&self) -> usize {
        PRICE_RANGE_PRESETS
            .iter()
            .position(|preset| preset.range == self.price_range)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePreset {
    pub label: &'static str,
    pub range: PriceRange,
}

pub const PRICE_RANGE_PRESETS: [PricePreset; 5] = [
    PricePreset {
        label: "All Prices",
        range: DEFAULT_PRICE_RANGE,
    },
    PricePreset {
        label: "KSh 0-50",
        range: PriceRange { min: 0.0, max: 50.0 },
    },
    PricePreset {
        label: "KSh 51-100",
        range: PriceRange {
            min: 51.0,
            max: 100.0,
        },
    },
    PricePreset {
        label: "KSh 101-200",
        range: PriceRange {
            min: 101.0,
            max: 200.0,
        },
    },
    PricePreset {
        label: "KSh 201+",
        range: PriceRange {
            min: 201.0,
            max: 1000.0,
        },
    },
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistancePreset {
    pub label: &'static str,
    pub max_distance: f64,
}

pub fn distance_presets(config: &FilterConfig) -> Vec<DistancePreset> {
    vec![
        DistancePreset {
            label: "Any Distance",
            max_distance: config.unlimited_distance_km,
        },
        DistancePreset {
            label: "< 500m",
            max_distance: 0.5,
        },
        DistancePreset {
            label: "< 1km",
            max_distance: 1.0,
        },
        DistancePreset {
            label: "< 2km",
            max_distance: 2.0,
        },
        DistancePreset {
            label: "< 5km",
            max_distance: 5.0,
        },
    ]
}

// Criteria reduced to the constraints that actually apply
struct Constraints {
    available_only: bool,
    price_range: Option<PriceRange>,
    max_distance: Option<f64>,
}

impl Constraints {
    fn from_criteria(criteria: &FilterCriteria) -> Self {
        let price_range = if criteria.price_range.is_well_formed() {
            Some(criteria.price_range)
        } else {
            warn!(
                min = criteria.price_range.min,
                max = criteria.price_range.max,
                "Ignoring malformed price range"
            );
            None
        };

        let max_distance = if criteria.max_distance.is_nan() || criteria.max_distance < 0.0 {
            warn!(
                max_distance = criteria.max_distance,
                "Ignoring malformed distance limit"
            );
            None
        } else {
            Some(criteria.max_distance)
        };

        Self {
            available_only: criteria.status == StatusFilter::Available,
            price_range,
            max_distance,
        }
    }

    fn matches(&self, spot: &ParkingSpot) -> bool {
        if self.available_only && !spot.is_available() {
            return false;
        }

        // Spots without a quoted rate are never excluded on price
        let price = spot.price.filter(|p| !p.is_nan());
        if !self
            .price_range
            .zip(price)
            .map_or(true, |(range, price)| range.contains(price))
        {
            return false;
        }

        let distance = Some(spot.distance).filter(|d| !d.is_nan());
        self.max_distance
            .zip(distance)
            .map_or(true, |(max, distance)| distance <= max)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SpotFilterEngine {
    config: FilterConfig,
}

impl SpotFilterEngine {
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn default_criteria(&self) -> FilterCriteria {
        FilterCriteria::with_config(&self.config)
    }

    pub fn matches(&self, spot: &ParkingSpot, criteria: &FilterCriteria) -> bool {
        Constraints::from_criteria(criteria).matches(spot)
    }

    /// Spots satisfying every applicable constraint, in their original order.
    ///
    /// Never fails: a malformed constraint is skipped instead.
    pub fn filter_spots(&self, spots: &[ParkingSpot], criteria: &FilterCriteria) -> Vec<ParkingSpot> {
        let constraints = Constraints::from_criteria(criteria);
        let filtered: Vec<ParkingSpot> = spots
            .iter()
            .filter(|spot| constraints.matches(spot))
            .cloned()
            .collect();

        debug!(
            total = spots.len(),
            matched = filtered.len(),
            status = ?criteria.status,
            max_distance = criteria.max_distance,
            "Filtered parking spots"
        );

        filtered
    }

    // A dimmed spot stays on the map at reduced opacity instead of disappearing
    pub fn is_dimmed(
        &self,
        spot: &ParkingSpot,
        criteria: &FilterCriteria,
        all_spots: &[ParkingSpot],
    ) -> bool {
        if !all_spots.iter().any(|s| s.id == spot.id) {
            return false;
        }
        !self
            .filter_spots(all_spots, criteria)
            .iter()
            .any(|s| s.id == spot.id)
    }

    // Splits spots into (visible, dimmed), both keeping the input order
    pub fn partition<'a>(
        &self,
        spots: &'a [ParkingSpot],
        criteria: &FilterCriteria,
    ) -> (Vec<&'a ParkingSpot>, Vec<&'a ParkingSpot>) {
        let constraints = Constraints::from_criteria(criteria);
        spots.iter().partition(|spot| constraints.matches(spot))
    }

    pub fn active_filter_count(&self, criteria: &FilterCriteria) -> usize {
        criteria.active_filter_count(&self.config)
    }

    pub fn distance_presets(&self) -> Vec<DistancePreset> {
        distance_presets(&self.config)
    }
}

/// Filters with the default configuration.
pub fn filter_spots(spots: &[ParkingSpot], criteria: &FilterCriteria) -> Vec<ParkingSpot> {
    SpotFilterEngine::default().filter_spots(spots, criteria)
}

pub fn is_dimmed(spot: &ParkingSpot, criteria: &FilterCriteria, all_spots: &[ParkingSpot]) -> bool {
    SpotFilterEngine::default().is_dimmed(spot, criteria, all_spots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spot::SpotStatus;
    use test_case::test_case;

    fn sample_spots() -> Vec<ParkingSpot> {
        vec![
            ParkingSpot::new("1", SpotStatus::Available, Some(50.0), 0.3),
            ParkingSpot::new("2", SpotStatus::Reserved, Some(80.0), 0.7),
            ParkingSpot::new("3", SpotStatus::Occupied, None, 0.5),
            ParkingSpot::new("4", SpotStatus::Available, Some(60.0), 1.2),
            ParkingSpot::new("5", SpotStatus::Available, Some(40.0), 0.8),
            ParkingSpot::new("6", SpotStatus::Occupied, None, 0.9),
        ]
    }

    fn ids(spots: &[ParkingSpot]) -> Vec<&str> {
        spots.iter().map(|s| s.id.as_str()).collect()
    }

    #[test_case(FilterCriteria::default(),
        vec!["1", "2", "3", "4", "5", "6"]; "#1 defaults keep everything")]
    #[test_case(FilterCriteria {status: StatusFilter::Available, ..FilterCriteria::default()},
        vec!["1", "4", "5"]; "#2 available only")]
    #[test_case(FilterCriteria {price_range: PriceRange::new(0.0, 50.0), ..FilterCriteria::default()},
        vec!["1", "3", "5", "6"]; "#3 price range keeps unpriced spots")]
    #[test_case(FilterCriteria {price_range: PriceRange::new(51.0, 100.0), ..FilterCriteria::default()},
        vec!["2", "3", "4", "6"]; "#4 mid price range")]
    #[test_case(FilterCriteria {max_distance: 0.5, ..FilterCriteria::default()},
        vec!["1", "3"]; "#5 distance is inclusive")]
    #[test_case(FilterCriteria {status: StatusFilter::Available, price_range: PriceRange::new(0.0, 50.0), max_distance: 1.0},
        vec!["1", "5"]; "#6 combined filters")]
    fn test_criteria_filter_spots(criteria: FilterCriteria, expected_ids: Vec<&str>) {
        let spots = sample_spots();
        let result = filter_spots(&spots, &criteria);
        assert_eq!(ids(&result), expected_ids);
    }

    #[test]
    fn test_max_distance_keeps_only_nearby_spot() {
        let spots = vec![
            ParkingSpot::new("a", SpotStatus::Available, Some(50.0), 0.3),
            ParkingSpot::new("b", SpotStatus::Available, Some(50.0), 1.2),
            ParkingSpot::new("c", SpotStatus::Available, Some(50.0), 5.0),
        ];
        let criteria = FilterCriteria {
            max_distance: 1.0,
            ..FilterCriteria::default()
        };

        assert_eq!(ids(&filter_spots(&spots, &criteria)), vec!["a"]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let spots = sample_spots();
        let criteria = FilterCriteria {
            status: StatusFilter::Available,
            price_range: PriceRange::new(40.0, 60.0),
            max_distance: 1.0,
        };

        let once = filter_spots(&spots, &criteria);
        let twice = filter_spots(&once, &criteria);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unpriced_spot_never_excluded_by_price() {
        let spot = ParkingSpot::new("3", SpotStatus::Occupied, None, 0.5);
        for range in [
            PriceRange::new(0.0, 0.0),
            PriceRange::new(201.0, 1000.0),
            PriceRange::new(999.0, 1000.0),
        ] {
            let criteria = FilterCriteria {
                price_range: range,
                ..FilterCriteria::default()
            };
            assert!(SpotFilterEngine::default().matches(&spot, &criteria));
        }
    }

    #[test]
    fn test_unavailable_spots_dimmed_when_available_only() {
        let spots = sample_spots();
        let criteria = FilterCriteria {
            status: StatusFilter::Available,
            ..FilterCriteria::default()
        };
        let filtered = filter_spots(&spots, &criteria);

        for spot in spots.iter().filter(|s| !s.is_available()) {
            assert!(!filtered.iter().any(|s| s.id == spot.id));
            assert!(is_dimmed(spot, &criteria, &spots));
        }
        for spot in spots.iter().filter(|s| s.is_available()) {
            assert!(!is_dimmed(spot, &criteria, &spots));
        }
    }

    #[test]
    fn test_spot_outside_collection_is_not_dimmed() {
        let spots = sample_spots();
        let stranger = ParkingSpot::new("99", SpotStatus::Occupied, None, 9.0);
        let criteria = FilterCriteria {
            status: StatusFilter::Available,
            ..FilterCriteria::default()
        };

        assert!(!is_dimmed(&stranger, &criteria, &spots));
    }

    #[test]
    fn test_partition_keeps_order() {
        let spots = sample_spots();
        let criteria = FilterCriteria {
            max_distance: 0.75,
            ..FilterCriteria::default()
        };

        let (visible, dimmed) = SpotFilterEngine::default().partition(&spots, &criteria);
        let visible: Vec<&str> = visible.iter().map(|s| s.id.as_str()).collect();
        let dimmed: Vec<&str> = dimmed.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(visible, vec!["1", "2", "3"]);
        assert_eq!(dimmed, vec!["4", "5", "6"]);
    }

    #[test]
    fn test_malformed_criteria_are_not_applicable() {
        let spots = sample_spots();
        let criteria = FilterCriteria {
            status: StatusFilter::All,
            price_range: PriceRange::new(100.0, 10.0),
            max_distance: f64::NAN,
        };

        assert_eq!(filter_spots(&spots, &criteria).len(), spots.len());

        let negative = FilterCriteria {
            max_distance: -1.0,
            ..FilterCriteria::default()
        };
        assert_eq!(filter_spots(&spots, &negative).len(), spots.len());
    }

    #[test]
    fn test_configurable_unlimited_distance() {
        let far = vec![
            ParkingSpot::new("near", SpotStatus::Available, Some(50.0), 2.0),
            ParkingSpot::new("far", SpotStatus::Available, Some(50.0), 25.0),
        ];

        let default_engine = SpotFilterEngine::default();
        let criteria = default_engine.default_criteria();
        assert_eq!(ids(&default_engine.filter_spots(&far, &criteria)), vec!["near"]);

        let wide_engine = SpotFilterEngine::new(FilterConfig {
            unlimited_distance_km: f64::INFINITY,
            ..FilterConfig::default()
        });
        let criteria = wide_engine.default_criteria();
        assert_eq!(ids(&wide_engine.filter_spots(&far, &criteria)), vec!["near", "far"]);
        assert_eq!(wide_engine.active_filter_count(&criteria), 0);
    }

    #[test]
    fn test_active_filter_count_and_reset() {
        let config = FilterConfig::default();
        let mut criteria = FilterCriteria::default();
        assert_eq!(criteria.active_filter_count(&config), 0);

        criteria.status = StatusFilter::Available;
        criteria.price_range = PRICE_RANGE_PRESETS[2].range;
        criteria.max_distance = 2.0;
        assert_eq!(criteria.active_filter_count(&config), 3);
        assert_eq!(criteria.price_preset_index(), 2);

        criteria.reset(&config);
        assert_eq!(criteria, FilterCriteria::default());
        assert_eq!(criteria.active_filter_count(&config), 0);
    }

    #[test]
    fn test_custom_price_range_falls_back_to_first_preset() {
        let criteria = FilterCriteria {
            price_range: PriceRange::new(10.0, 20.0),
            ..FilterCriteria::default()
        };
        assert_eq!(criteria.price_preset_index(), 0);
    }

    #[test]
    fn test_distance_presets_use_configured_sentinel() {
        let engine = SpotFilterEngine::new(FilterConfig {
            unlimited_distance_km: 50.0,
            ..FilterConfig::default()
        });
        let presets = engine.distance_presets();
        assert_eq!(presets.len(), 5);
        assert_eq!(presets[0].label, "Any Distance");
        assert_eq!(presets[0].max_distance, 50.0);
        assert_eq!(presets[1].max_distance, 0.5);
    }

    #[test]
    fn test_criteria_from_json() {
        let criteria: FilterCriteria =
            serde_json::from_str(r#"{"status": "available", "maxDistance": 2.0}"#).unwrap();
        assert_eq!(criteria.status, StatusFilter::Available);
        assert_eq!(criteria.price_range, DEFAULT_PRICE_RANGE);
        assert_eq!(criteria.max_distance, 2.0);
    }
}
