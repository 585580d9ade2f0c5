// Reservations: quoting a spot, the reservations tabs and profile statistics
use crate::pricing::{PriceQuote, PricingCalculator, PricingError};
use crate::spot::ParkingSpot;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Mpesa,
    Card,
}

impl PaymentMethod {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Mpesa => "M-Pesa",
            PaymentMethod::Card => "Card",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Active,
    Upcoming,
    Completed,
    Cancelled,
}

impl ReservationStatus {
    pub fn tab(&self) -> ReservationTab {
        match self {
            ReservationStatus::Active => ReservationTab::Active,
            ReservationStatus::Upcoming => ReservationTab::Upcoming,
            ReservationStatus::Completed | ReservationStatus::Cancelled => ReservationTab::History,
        }
    }

    pub fn can_extend(&self) -> bool {
        *self == ReservationStatus::Active
    }

    pub fn can_cancel(&self) -> bool {
        *self == ReservationStatus::Upcoming
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservationTab {
    Active,
    Upcoming,
    History,
}

impl ReservationTab {
    pub fn title(&self) -> &'static str {
        match self {
            ReservationTab::Active => "Active",
            ReservationTab::Upcoming => "Upcoming",
            ReservationTab::History => "History",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: String,
    pub spot_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(with = "hour_minute")]
    pub start_time: NaiveTime,
    #[serde(with = "hour_minute")]
    pub end_time: NaiveTime,
    pub duration_hours: u32,
    pub cost: u64,
    pub status: ReservationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
}

impl Reservation {
    pub fn time_window_label(&self) -> String {
        format!(
            "{} - {}",
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M")
        )
    }

    pub fn duration_label(&self) -> String {
        format!("{}h", self.duration_hours)
    }
}

// Reservation times travel as "HH:MM"
mod hour_minute {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let value = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&value, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// A priced, not yet confirmed reservation for one spot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReservationQuote {
    pub spot_id: String,
    pub spot_name: String,
    pub address: String,
    pub duration_hours: u32,
    pub payment_method: PaymentMethod,
    pub price: PriceQuote,
}

impl ReservationQuote {
    // A spot without a quoted rate is priced at zero
    pub fn new(
        calculator: &PricingCalculator,
        spot: &ParkingSpot,
        duration_hours: u32,
        request_hour: u32,
        payment_method: PaymentMethod,
    ) -> Result<Self, PricingError> {
        let base_price = spot.price.unwrap_or(0.0);
        let price = calculator.compute_price(base_price, duration_hours, request_hour)?;

        Ok(Self {
            spot_id: spot.id.clone(),
            spot_name: spot.name.clone(),
            address: spot.address.clone(),
            duration_hours,
            payment_method,
            price,
        })
    }

    pub fn total(&self) -> u64 {
        self.price.total
    }

    /// Turns the quote into an upcoming reservation starting at `start_time`.
    /// The end time wraps past midnight.
    pub fn confirm(self, reservation_id: impl Into<String>, start_time: NaiveTime) -> Reservation {
        let end_time = start_time + chrono::Duration::hours(i64::from(self.duration_hours));

        info!(
            spot_id = %self.spot_id,
            duration_hours = self.duration_hours,
            payment = self.payment_method.label(),
            total = self.price.total,
            "Confirming reservation"
        );

        Reservation {
            id: reservation_id.into(),
            spot_name: self.spot_name,
            address: self.address,
            start_time,
            end_time,
            duration_hours: self.duration_hours,
            cost: self.price.total,
            status: ReservationStatus::Upcoming,
            qr_code: None,
        }
    }
}

// Reservations split across the three tabs, each keeping the input order
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReservationTabs {
    pub active: Vec<Reservation>,
    pub upcoming: Vec<Reservation>,
    pub history: Vec<Reservation>,
}

impl ReservationTabs {
    pub fn from_reservations(reservations: &[Reservation]) -> Self {
        let mut tabs = Self::default();
        for reservation in reservations {
            let bucket = match reservation.status.tab() {
                ReservationTab::Active => &mut tabs.active,
                ReservationTab::Upcoming => &mut tabs.upcoming,
                ReservationTab::History => &mut tabs.history,
            };
            bucket.push(reservation.clone());
        }
        tabs
    }

    pub fn get(&self, tab: ReservationTab) -> &[Reservation] {
        match tab {
            ReservationTab::Active => &self.active,
            ReservationTab::Upcoming => &self.upcoming,
            ReservationTab::History => &self.history,
        }
    }

    pub fn count(&self, tab: ReservationTab) -> usize {
        self.get(tab).len()
    }

    // e.g. "Active (1)"
    pub fn tab_label(&self, tab: ReservationTab) -> String {
        format!("{} ({})", tab.title(), self.count(tab))
    }
}

// Quick stats on the profile screen; only completed sessions count
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProfileStats {
    pub sessions: usize,
    pub total_spent: u64,
    pub total_hours: u32,
}

impl ProfileStats {
    pub fn from_history(history: &[Reservation]) -> Self {
        history
            .iter()
            .filter(|r| r.status == ReservationStatus::Completed)
            .fold(Self::default(), |mut stats, r| {
                stats.sessions += 1;
                stats.total_spent += r.cost;
                stats.total_hours += r.duration_hours;
                stats
            })
    }
}
