//! Domain models for quote pricing.
//!
//! Plain data handed to the calculators. Everything here is JSON
//! (de)serializable so a quote draft can cross the HTTP boundary unchanged.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// VAT percentages a line item may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum VatRate {
    /// 0%
    Zero,
    /// 9%
    Reduced,
    /// 21%
    #[default]
    Standard,
}

impl VatRate {
    pub const ALL: [VatRate; 3] = [VatRate::Zero, VatRate::Reduced, VatRate::Standard];

    /// Rate as a whole percentage (0, 9 or 21)
    pub fn percent(self) -> u8 {
        match self {
            VatRate::Zero => 0,
            VatRate::Reduced => 9,
            VatRate::Standard => 21,
        }
    }

    /// Rate as a fraction, e.g. 0.21
    pub fn fraction(self) -> Decimal {
        Decimal::new(i64::from(self.percent()), 2)
    }
}

impl TryFrom<u8> for VatRate {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        VatRate::ALL
            .into_iter()
            .find(|rate| rate.percent() == value)
            .ok_or_else(|| format!("vat_rate must be one of 0, 9 or 21 (got {value})"))
    }
}

impl From<VatRate> for u8 {
    fn from(rate: VatRate) -> Self {
        rate.percent()
    }
}

/// Where a line item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemOrigin {
    /// Entered or edited by the user
    #[default]
    Manual,
    /// Generated from the package/hourly pricing selection
    Selection,
}

fn default_include_vat() -> bool {
    true
}

/// One billable row in a quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    #[serde(default = "default_include_vat")]
    pub include_vat: bool,
    #[serde(default)]
    pub vat_rate: VatRate,
    #[serde(default)]
    pub origin: ItemOrigin,
}

/// How a discount value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    /// Percentage of subtotal + VAT, 0..=100
    Percentage,
    /// Fixed currency amount
    Fixed,
}

/// The single discount a quote may carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discount {
    #[serde(rename = "type")]
    pub kind: DiscountKind,
    pub value: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Discount {
    pub fn percentage(value: Decimal) -> Self {
        Self {
            kind: DiscountKind::Percentage,
            value,
            reason: None,
        }
    }

    pub fn fixed(value: Decimal) -> Self {
        Self {
            kind: DiscountKind::Fixed,
            value,
            reason: None,
        }
    }
}

/// Truck class used for hourly pricing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TruckSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl TruckSize {
    pub fn label(self) -> &'static str {
        match self {
            TruckSize::Small => "Small",
            TruckSize::Medium => "Medium",
            TruckSize::Large => "Large",
        }
    }
}

/// Fixed surcharge per truck size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TruckSurcharges {
    pub small: Decimal,
    pub medium: Decimal,
    pub large: Decimal,
}

impl TruckSurcharges {
    pub fn for_size(&self, size: TruckSize) -> Decimal {
        match size {
            TruckSize::Small => self.small,
            TruckSize::Medium => self.medium,
            TruckSize::Large => self.large,
        }
    }
}

impl Default for TruckSurcharges {
    fn default() -> Self {
        Self {
            small: dec!(100),
            medium: dec!(175),
            large: dec!(250),
        }
    }
}

/// A predefined moving package.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageOption {
    pub id: String,
    pub name: String,
    pub description: String,
    pub base_price: Decimal,
    pub includes: Vec<String>,
    pub popular: bool,
}

impl PackageOption {
    fn new(
        id: &str,
        name: &str,
        description: &str,
        base_price: Decimal,
        includes: &[&str],
        popular: bool,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            base_price,
            includes: includes.iter().map(|s| s.to_string()).collect(),
            popular,
        }
    }
}

/// The package catalog offered by the quote setup step.
pub fn default_packages() -> Vec<PackageOption> {
    vec![
        PackageOption::new(
            "standard",
            "Standard Move",
            "Basic moving service with transport and loading",
            dec!(450),
            &["Transport", "Loading & Unloading", "Basic Protection", "2 Movers"],
            false,
        ),
        PackageOption::new(
            "full-service",
            "Full Service",
            "Complete moving solution with packing included",
            dec!(850),
            &[
                "All Standard features",
                "Professional Packing",
                "Unpacking",
                "Furniture Assembly",
                "3 Movers",
            ],
            true,
        ),
        PackageOption::new(
            "storage-move",
            "Storage + Move",
            "Moving with temporary storage solution",
            dec!(650),
            &[
                "All Standard features",
                "1 Month Storage",
                "Climate Control",
                "Insurance Included",
            ],
            false,
        ),
    ]
}

/// Rate table and package catalog used to price a selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingRates {
    pub currency: String,
    /// Surcharge per cubic meter on top of a package base price
    pub volume_rate: Decimal,
    /// Charge per kilometer for hourly pricing
    pub distance_rate: Decimal,
    pub truck: TruckSurcharges,
    #[serde(skip)]
    pub packages: Vec<PackageOption>,
}

impl PricingRates {
    pub fn find_package(&self, package_id: &str) -> Option<&PackageOption> {
        self.packages.iter().find(|p| p.id == package_id)
    }
}

impl Default for PricingRates {
    fn default() -> Self {
        Self {
            currency: "EUR".to_string(),
            volume_rate: dec!(5),
            distance_rate: dec!(1.50),
            truck: TruckSurcharges::default(),
            packages: default_packages(),
        }
    }
}

/// Additional services picked in the service selection step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoveService {
    Packing,
    Dismantling,
    MovingLift,
    WasteDisposal,
    Storage,
}

/// Totals carried over from the inventory and route steps.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveSummary {
    pub total_rooms: u32,
    pub total_items: u32,
    pub total_boxes: u32,
    /// Cubic meters
    pub total_volume: Decimal,
    pub total_distance_km: Decimal,
    pub estimated_travel_hours: Decimal,
    pub services: Vec<MoveService>,
}

/// Labor-based pricing inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyConfig {
    /// Rate per hour per mover
    pub hourly_rate: Decimal,
    pub estimated_hours: Decimal,
    pub number_of_movers: u32,
    #[serde(default)]
    pub truck_size: TruckSize,
}

/// Package or hourly pricing, chosen in the quote setup step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PricingSelection {
    Package { package_id: String },
    Hourly(HourlyConfig),
}

/// Derived monetary breakdown of a quote. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuoteTotals {
    pub subtotal: Decimal,
    pub total_vat: Decimal,
    pub discount_amount: Decimal,
    pub grand_total: Decimal,
}
