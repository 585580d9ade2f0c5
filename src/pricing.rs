// Dynamic reservation pricing: peak-hour surcharge and long-stay discount
use chrono::Timelike;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid pricing configuration: {0}")]
    InvalidConfig(String),
}

// Pricing rules; the defaults reproduce the reservation dialog
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PricingConfig {
    pub peak_start_hour: u32,
    pub peak_end_hour: u32,
    pub peak_multiplier: f64,
    pub long_stay_threshold_hours: u32,
    pub long_stay_multiplier: f64,
    pub min_duration_hours: u32,
    pub max_duration_hours: u32,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            peak_start_hour: 8,
            peak_end_hour: 18,
            peak_multiplier: 1.5,
            long_stay_threshold_hours: 4,
            long_stay_multiplier: 0.9,
            min_duration_hours: 1,
            max_duration_hours: 8,
        }
    }
}

impl PricingConfig {
    pub fn validate(&self) -> Result<(), PricingError> {
        if self.peak_start_hour > self.peak_end_hour || self.peak_end_hour > 23 {
            return Err(PricingError::InvalidConfig(format!(
                "peak window {}-{} is not within 0-23",
                self.peak_start_hour, self.peak_end_hour
            )));
        }
        for (name, value) in [
            ("peak_multiplier", self.peak_multiplier),
            ("long_stay_multiplier", self.long_stay_multiplier),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(PricingError::InvalidConfig(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }
        if self.min_duration_hours == 0 || self.min_duration_hours > self.max_duration_hours {
            return Err(PricingError::InvalidConfig(format!(
                "duration bounds {}-{} are invalid",
                self.min_duration_hours, self.max_duration_hours
            )));
        }
        Ok(())
    }

    pub fn is_peak_hour(&self, hour: u32) -> bool {
        (self.peak_start_hour..=self.peak_end_hour).contains(&hour)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PricingTag {
    Peak,
    LongStay,
}

impl PricingTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            PricingTag::Peak => "peak",
            PricingTag::LongStay => "long-stay",
        }
    }
}

impl fmt::Display for PricingTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReservationRequest {
    pub base_price: f64,
    pub duration_hours: u32,
    pub request_hour: u32,
}

impl ReservationRequest {
    pub fn new(base_price: f64, duration_hours: u32, request_hour: u32) -> Self {
        Self {
            base_price,
            duration_hours,
            request_hour,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceQuote {
    pub total: u64,
    pub tags: BTreeSet<PricingTag>,
    pub peak_multiplier: f64,
    pub long_stay_multiplier: f64,
}

impl PriceQuote {
    pub fn has_tag(&self, tag: PricingTag) -> bool {
        self.tags.contains(&tag)
    }

    // Badge captions for the applied modifiers, e.g. "Peak Hours +50%"
    pub fn badges(&self) -> Vec<String> {
        self.tags
            .iter()
            .map(|tag| match tag {
                PricingTag::Peak => format!(
                    "Peak Hours +{}%",
                    ((self.peak_multiplier - 1.0) * 100.0).round() as i64
                ),
                PricingTag::LongStay => format!(
                    "Long Stay -{}%",
                    ((1.0 - self.long_stay_multiplier) * 100.0).round() as i64
                ),
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct PricingCalculator {
    config: PricingConfig,
}

impl Default for PricingCalculator {
    fn default() -> Self {
        Self {
            config: PricingConfig::default(),
        }
    }
}

impl PricingCalculator {
    pub fn new(config: PricingConfig) -> Result<Self, PricingError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Prices a reservation of `duration_hours` at `base_price` per hour,
    /// starting in hour-of-day `request_hour`.
    ///
    /// Out-of-range input is rejected rather than clamped.
    pub fn compute_price(
        &self,
        base_price: f64,
        duration_hours: u32,
        request_hour: u32,
    ) -> Result<PriceQuote, PricingError> {
        self.check_arguments(base_price, duration_hours, request_hour)
            .inspect_err(|e| warn!(error = %e, "Rejected pricing request"))?;

        let peak_multiplier = if self.config.is_peak_hour(request_hour) {
            self.config.peak_multiplier
        } else {
            1.0
        };
        let long_stay_multiplier = if duration_hours > self.config.long_stay_threshold_hours {
            self.config.long_stay_multiplier
        } else {
            1.0
        };

        let raw = base_price * duration_hours as f64 * peak_multiplier * long_stay_multiplier;
        let total = round_half_up(raw);

        let mut tags = BTreeSet::new();
        if peak_multiplier > 1.0 {
            tags.insert(PricingTag::Peak);
        }
        if long_stay_multiplier < 1.0 {
            tags.insert(PricingTag::LongStay);
        }

        debug!(
            base_price,
            duration_hours,
            request_hour,
            total,
            tags = ?tags,
            "Computed reservation price"
        );

        Ok(PriceQuote {
            total,
            tags,
            peak_multiplier,
            long_stay_multiplier,
        })
    }

    pub fn quote(&self, request: &ReservationRequest) -> Result<PriceQuote, PricingError> {
        self.compute_price(
            request.base_price,
            request.duration_hours,
            request.request_hour,
        )
    }

    // Takes the hour from an injected clock value instead of reading the system time
    pub fn quote_at<T: Timelike>(
        &self,
        base_price: f64,
        duration_hours: u32,
        at: &T,
    ) -> Result<PriceQuote, PricingError> {
        self.compute_price(base_price, duration_hours, at.hour())
    }

    fn check_arguments(
        &self,
        base_price: f64,
        duration_hours: u32,
        request_hour: u32,
    ) -> Result<(), PricingError> {
        if !base_price.is_finite() || base_price < 0.0 {
            return Err(PricingError::InvalidArgument(format!(
                "base price must be a non-negative number, got {}",
                base_price
            )));
        }
        let durations = self.config.min_duration_hours..=self.config.max_duration_hours;
        if !durations.contains(&duration_hours) {
            return Err(PricingError::InvalidArgument(format!(
                "duration must be between {} and {} hours, got {}",
                durations.start(),
                durations.end(),
                duration_hours
            )));
        }
        if request_hour > 23 {
            return Err(PricingError::InvalidArgument(format!(
                "request hour must be between 0 and 23, got {}",
                request_hour
            )));
        }
        Ok(())
    }
}

// Nearest integer, halves go up; inputs are already known to be non-negative
fn round_half_up(value: f64) -> u64 {
    (value + 0.5).floor() as u64
}

/// Prices a reservation with the default rules.
pub fn compute_price(
    base_price: f64,
    duration_hours: u32,
    request_hour: u32,
) -> Result<PriceQuote, PricingError> {
    PricingCalculator::default().compute_price(base_price, duration_hours, request_hour)
}
