//! Pricing service functions over the configured rate table.
//!
//! These combine the pure calculators with the package catalog and rate table
//! to price whatever the user picked in the quote setup step.

use rust_decimal::Decimal;
use serde::Serialize;

use super::calculators::{
    compute_distance_charge, compute_hourly_price, compute_labor_cost, compute_package_price,
    round_money, MONEY_PLACES,
};
use super::models::{
    HourlyConfig, ItemOrigin, LineItem, MoveSummary, PricingRates, PricingSelection, VatRate,
};

/// Pricing calculation error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PricingError {
    /// Malformed or out-of-range input
    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Overflow while computing an amount
    #[error("Computation error: {0}")]
    Computation(String),
}

impl PricingError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        PricingError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Which pricing method produced a price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingMode {
    Package,
    Hourly,
}

/// One labelled amount in a selection price
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceComponent {
    pub key: String,
    pub label: String,
    pub description: String,
    pub amount: Decimal,
}

/// Result of pricing a package or hourly selection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionPrice {
    pub mode: PricingMode,
    pub label: String,
    pub description: String,
    pub components: Vec<PriceComponent>,
    pub total: Decimal,
    pub currency: String,
}

/// Price a package or hourly selection against the move summary.
pub fn price_selection(
    selection: &PricingSelection,
    summary: &MoveSummary,
    rates: &PricingRates,
) -> Result<SelectionPrice, PricingError> {
    match selection {
        PricingSelection::Package { package_id } => price_package(package_id, summary, rates),
        PricingSelection::Hourly(config) => price_hourly(config, summary, rates),
    }
}

/// Price a catalog package: base price plus volume adjustment.
pub fn price_package(
    package_id: &str,
    summary: &MoveSummary,
    rates: &PricingRates,
) -> Result<SelectionPrice, PricingError> {
    let package = rates
        .find_package(package_id)
        .ok_or_else(|| {
            PricingError::validation("package_id", format!("unknown package '{}'", package_id))
        })?;

    let total = compute_package_price(package.base_price, summary.total_volume, rates.volume_rate)?;
    let adjustment = total - package.base_price;

    tracing::debug!(package_id, %total, "Priced package selection");

    Ok(SelectionPrice {
        mode: PricingMode::Package,
        label: package.name.clone(),
        description: package.description.clone(),
        components: vec![
            PriceComponent {
                key: "base".to_string(),
                label: format!("{} base price", package.name),
                description: package.includes.join(", "),
                amount: round_money(package.base_price, MONEY_PLACES),
            },
            PriceComponent {
                key: "volume".to_string(),
                label: "Volume adjustment".to_string(),
                description: format!(
                    "{} m³ × {} {}",
                    summary.total_volume, rates.volume_rate, rates.currency
                ),
                amount: round_money(adjustment, MONEY_PLACES),
            },
        ],
        total,
        currency: rates.currency.clone(),
    })
}

/// Price an hourly configuration: labor, distance charge and truck surcharge.
pub fn price_hourly(
    config: &HourlyConfig,
    summary: &MoveSummary,
    rates: &PricingRates,
) -> Result<SelectionPrice, PricingError> {
    let labor = compute_labor_cost(
        config.hourly_rate,
        config.estimated_hours,
        config.number_of_movers,
    )?;
    let distance = compute_distance_charge(summary.total_distance_km, rates.distance_rate)?;
    let truck = round_money(rates.truck.for_size(config.truck_size), MONEY_PLACES);

    let total = compute_hourly_price(
        config.hourly_rate,
        config.estimated_hours,
        config.number_of_movers,
        summary.total_distance_km,
        rates.distance_rate,
        truck,
    )?;

    tracing::debug!(
        movers = config.number_of_movers,
        truck = config.truck_size.label(),
        %total,
        "Priced hourly selection"
    );

    Ok(SelectionPrice {
        mode: PricingMode::Hourly,
        label: "Hourly move".to_string(),
        description: format!(
            "{} movers × {} hours, {} truck",
            config.number_of_movers,
            config.estimated_hours,
            config.truck_size.label().to_lowercase()
        ),
        components: vec![
            PriceComponent {
                key: "labor".to_string(),
                label: format!("Labor ({} hours)", config.estimated_hours),
                description: format!(
                    "{} movers × {} hours × {} {}",
                    config.number_of_movers,
                    config.estimated_hours,
                    config.hourly_rate,
                    rates.currency
                ),
                amount: labor,
            },
            PriceComponent {
                key: "distance".to_string(),
                label: "Transport".to_string(),
                description: format!(
                    "{} km × {} {}",
                    summary.total_distance_km, rates.distance_rate, rates.currency
                ),
                amount: distance,
            },
            PriceComponent {
                key: "truck".to_string(),
                label: format!("Truck ({})", config.truck_size.label().to_lowercase()),
                description: format!("{} truck surcharge", config.truck_size.label()),
                amount: truck,
            },
        ],
        total,
        currency: rates.currency.clone(),
    })
}

/// Turn a priced selection into quote line items.
///
/// A package becomes a single line at its total price; an hourly selection
/// becomes one line per component. Every line carries standard VAT and is
/// marked as selection-derived so it can be replaced on repricing.
pub fn selection_line_items(price: &SelectionPrice) -> Vec<LineItem> {
    let line = |key: &str, name: &str, description: &str, amount: Decimal| LineItem {
        id: format!("selection-{}", key),
        name: name.to_string(),
        description: description.to_string(),
        quantity: 1,
        unit_price: amount,
        include_vat: true,
        vat_rate: VatRate::Standard,
        origin: ItemOrigin::Selection,
    };

    match price.mode {
        PricingMode::Package => vec![line(
            "package",
            &price.label,
            &price.description,
            price.total,
        )],
        PricingMode::Hourly => price
            .components
            .iter()
            .map(|c| line(&c.key, &c.label, &c.description, c.amount))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::calculators::calculate_totals;
    use crate::pricing::models::TruckSize;
    use rust_decimal_macros::dec;

    fn summary() -> MoveSummary {
        MoveSummary {
            total_rooms: 5,
            total_items: 32,
            total_boxes: 24,
            total_volume: dec!(45),
            total_distance_km: dec!(67),
            estimated_travel_hours: dec!(1.5),
            services: vec![],
        }
    }

    fn hourly() -> HourlyConfig {
        HourlyConfig {
            hourly_rate: dec!(75),
            estimated_hours: dec!(8),
            number_of_movers: 3,
            truck_size: TruckSize::Medium,
        }
    }

    #[test]
    fn test_pricing_error_display() {
        let err = PricingError::validation("items[0].quantity", "must be a positive integer");
        assert!(err.to_string().contains("items[0].quantity"));

        let err = PricingError::Computation("overflow while adding subtotal".to_string());
        assert!(err.to_string().contains("overflow"));
    }

    #[test]
    fn test_price_package() {
        let rates = PricingRates::default();
        let selection = PricingSelection::Package {
            package_id: "full-service".to_string(),
        };

        let price = price_selection(&selection, &summary(), &rates).unwrap();

        assert_eq!(price.mode, PricingMode::Package);
        assert_eq!(price.total, dec!(1075));
        assert_eq!(price.components[0].amount, dec!(850));
        assert_eq!(price.components[1].amount, dec!(225));
        assert_eq!(price.currency, "EUR");
    }

    #[test]
    fn test_price_unknown_package() {
        let rates = PricingRates::default();
        let err = price_package("premium", &summary(), &rates).unwrap_err();
        assert!(matches!(err, PricingError::Validation { ref field, .. } if field == "package_id"));
    }

    #[test]
    fn test_price_hourly_matches_formula() {
        let rates = PricingRates::default();
        let price = price_hourly(&hourly(), &summary(), &rates).unwrap();

        assert_eq!(price.total, dec!(2075.50));
        let amounts: Vec<Decimal> = price.components.iter().map(|c| c.amount).collect();
        assert_eq!(amounts, vec![dec!(1800), dec!(100.50), dec!(175)]);

        let direct =
            compute_hourly_price(dec!(75), dec!(8), 3, dec!(67), dec!(1.5), dec!(175)).unwrap();
        assert_eq!(price.total, direct);
    }

    #[test]
    fn test_price_hourly_truck_sizes() {
        let rates = PricingRates::default();
        let mut config = hourly();
        config.truck_size = TruckSize::Large;
        let price = price_hourly(&config, &summary(), &rates).unwrap();
        assert_eq!(price.total, dec!(2150.50));
    }

    #[test]
    fn test_selection_line_items_package() {
        let rates = PricingRates::default();
        let price = price_package("standard", &summary(), &rates).unwrap();
        let items = selection_line_items(&price);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "selection-package");
        assert_eq!(items[0].unit_price, dec!(675));
        assert_eq!(items[0].origin, ItemOrigin::Selection);
    }

    #[test]
    fn test_selection_line_items_hourly_totals() {
        let rates = PricingRates::default();
        let price = price_hourly(&hourly(), &summary(), &rates).unwrap();
        let items = selection_line_items(&price);

        assert_eq!(items.len(), 3);
        let totals = calculate_totals(&items, None).unwrap();
        assert_eq!(totals.subtotal, dec!(2075.50));
        // 2075.50 * 0.21 = 435.855 -> 435.86
        assert_eq!(totals.total_vat, dec!(435.86));
    }
}
