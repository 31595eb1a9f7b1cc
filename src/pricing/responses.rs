//! Response DTOs for pricing API endpoints.

use rust_decimal::Decimal;
use serde::Serialize;

use super::calculators::{round_money, QuoteBreakdown, MONEY_PLACES};
use super::models::{LineItem, PackageOption, PricingRates, QuoteTotals, TruckSurcharges};
use super::services::{PricingMode, SelectionPrice};

/// Money value for JSON responses
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoneyResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub currency: String,
}

impl MoneyResponse {
    pub fn new(amount: Decimal, currency: &str) -> Self {
        Self {
            amount: round_money(amount, MONEY_PLACES),
            currency: currency.to_string(),
        }
    }
}

/// Response for a single line item total
#[derive(Debug, Serialize)]
pub struct ItemTotalResponse {
    pub id: String,
    pub total: MoneyResponse,
}

/// Per-line amounts within a totals response
#[derive(Debug, Serialize)]
pub struct LineTotalResponse {
    pub id: String,
    pub net_amount: MoneyResponse,
    pub vat_amount: MoneyResponse,
    pub total: MoneyResponse,
}

/// Response for quote totals
#[derive(Debug, Serialize)]
pub struct QuoteTotalsResponse {
    pub subtotal: MoneyResponse,
    pub total_vat: MoneyResponse,
    pub discount_amount: MoneyResponse,
    pub grand_total: MoneyResponse,
    pub lines: Vec<LineTotalResponse>,
}

impl QuoteTotalsResponse {
    pub fn from_breakdown(breakdown: &QuoteBreakdown, currency: &str) -> Self {
        let totals: &QuoteTotals = &breakdown.totals;
        Self {
            subtotal: MoneyResponse::new(totals.subtotal, currency),
            total_vat: MoneyResponse::new(totals.total_vat, currency),
            discount_amount: MoneyResponse::new(totals.discount_amount, currency),
            grand_total: MoneyResponse::new(totals.grand_total, currency),
            lines: breakdown
                .lines
                .iter()
                .map(|line| LineTotalResponse {
                    id: line.id.clone(),
                    net_amount: MoneyResponse::new(line.net_amount, currency),
                    vat_amount: MoneyResponse::new(line.vat_amount, currency),
                    total: MoneyResponse::new(line.total, currency),
                })
                .collect(),
        }
    }
}

/// Response for package pricing
#[derive(Debug, Serialize)]
pub struct PackagePriceResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_id: Option<String>,
    pub base_price: MoneyResponse,
    pub volume_adjustment: MoneyResponse,
    pub total: MoneyResponse,
}

/// Response for hourly pricing
#[derive(Debug, Serialize)]
pub struct HourlyPriceResponse {
    pub labor: MoneyResponse,
    pub distance: MoneyResponse,
    pub truck: MoneyResponse,
    pub total: MoneyResponse,
}

/// One component of a selection price
#[derive(Debug, Serialize)]
pub struct PriceComponentResponse {
    pub key: String,
    pub label: String,
    pub description: String,
    pub amount: MoneyResponse,
}

/// Response for selection pricing, including the line items it seeds
#[derive(Debug, Serialize)]
pub struct SelectionPriceResponse {
    pub mode: PricingMode,
    pub label: String,
    pub description: String,
    pub components: Vec<PriceComponentResponse>,
    pub total: MoneyResponse,
    pub line_items: Vec<LineItem>,
}

impl SelectionPriceResponse {
    pub fn new(price: &SelectionPrice, line_items: Vec<LineItem>) -> Self {
        Self {
            mode: price.mode,
            label: price.label.clone(),
            description: price.description.clone(),
            components: price
                .components
                .iter()
                .map(|c| PriceComponentResponse {
                    key: c.key.clone(),
                    label: c.label.clone(),
                    description: c.description.clone(),
                    amount: MoneyResponse::new(c.amount, &price.currency),
                })
                .collect(),
            total: MoneyResponse::new(price.total, &price.currency),
            line_items,
        }
    }
}

/// Package catalog listing
#[derive(Debug, Serialize)]
pub struct PackagesResponse {
    pub currency: String,
    pub packages: Vec<PackageOption>,
}

/// Configured rate table
#[derive(Debug, Serialize)]
pub struct RatesResponse {
    pub currency: String,
    pub volume_rate: MoneyResponse,
    pub distance_rate: MoneyResponse,
    pub truck: TruckSurcharges,
    pub vat_rates: Vec<u8>,
}

impl RatesResponse {
    pub fn from_rates(rates: &PricingRates) -> Self {
        Self {
            currency: rates.currency.clone(),
            volume_rate: MoneyResponse::new(rates.volume_rate, &rates.currency),
            distance_rate: MoneyResponse::new(rates.distance_rate, &rates.currency),
            truck: rates.truck.clone(),
            vat_rates: super::models::VatRate::ALL.iter().map(|r| r.percent()).collect(),
        }
    }
}

/// Generic pricing error response
#[derive(Debug, Serialize)]
pub struct PricingErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
