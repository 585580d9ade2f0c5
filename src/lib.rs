// Pricing and filtering rules for the parking spot finder

pub mod catalog;
pub mod filter;
pub mod pricing;
pub mod reservation;
pub mod spot;

// Re-export key types for convenience
pub use catalog::{CatalogError, SampleCatalog};
pub use filter::{
    filter_spots, is_dimmed, FilterConfig, FilterCriteria, PriceRange, SpotFilterEngine,
    StatusFilter,
};
pub use pricing::{
    compute_price, PriceQuote, PricingCalculator, PricingConfig, PricingError, PricingTag,
    ReservationRequest,
};
pub use reservation::{
    PaymentMethod, ProfileStats, Reservation, ReservationQuote, ReservationStatus, ReservationTab,
    ReservationTabs,
};
pub use spot::{ParkingSpot, SpotStatus, StatusSummary};
