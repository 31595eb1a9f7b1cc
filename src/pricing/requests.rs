//! Request DTOs for pricing API endpoints.
//!
//! Decimal fields accept either JSON strings or numbers.

use rust_decimal::Decimal;
use serde::Deserialize;

use super::models::{Discount, HourlyConfig, LineItem, MoveSummary, PricingSelection, TruckSize};

/// Request to total a single line item
#[derive(Debug, Deserialize)]
pub struct CalculateItemTotalRequest {
    pub item: LineItem,
    #[serde(default)]
    pub currency: Option<String>,
}

/// Request to calculate quote totals
#[derive(Debug, Deserialize)]
pub struct CalculateTotalsRequest {
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub discount: Option<Discount>,
    #[serde(default)]
    pub currency: Option<String>,
}

/// Request to price a package.
///
/// Either a catalog `package_id` or an explicit `base_price` must be given.
/// `volume_rate` falls back to the configured rate.
#[derive(Debug, Deserialize)]
pub struct CalculatePackageRequest {
    #[serde(default)]
    pub package_id: Option<String>,
    #[serde(default)]
    pub base_price: Option<Decimal>,
    pub total_volume: Decimal,
    #[serde(default)]
    pub volume_rate: Option<Decimal>,
}

/// Request to price an hourly move.
///
/// `distance_rate` and `truck_surcharge` fall back to the configured rate
/// table; the surcharge defaults to the one for `truck_size`.
#[derive(Debug, Deserialize)]
pub struct CalculateHourlyRequest {
    pub hourly_rate: Decimal,
    pub estimated_hours: Decimal,
    pub number_of_movers: u32,
    #[serde(default)]
    pub truck_size: TruckSize,
    pub distance_km: Decimal,
    #[serde(default)]
    pub distance_rate: Option<Decimal>,
    #[serde(default)]
    pub truck_surcharge: Option<Decimal>,
}

impl CalculateHourlyRequest {
    pub fn config(&self) -> HourlyConfig {
        HourlyConfig {
            hourly_rate: self.hourly_rate,
            estimated_hours: self.estimated_hours,
            number_of_movers: self.number_of_movers,
            truck_size: self.truck_size,
        }
    }
}

/// Request to price a package/hourly selection against a move summary
#[derive(Debug, Deserialize)]
pub struct PriceSelectionRequest {
    pub selection: PricingSelection,
    #[serde(default)]
    pub summary: MoveSummary,
}
