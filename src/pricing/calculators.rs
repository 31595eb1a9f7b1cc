//! Core pricing calculation functions.
//!
//! Pure functions for quote math - no I/O, no shared state. Every input is
//! validated before any arithmetic happens and every operation is checked, so
//! a bad value surfaces as a `PricingError` instead of a wrong total.

use rust_decimal::prelude::*;
use serde::Serialize;

use super::models::{Discount, DiscountKind, LineItem, MoveSummary, QuoteTotals};
use super::services::PricingError;

/// Currency minor-unit precision.
pub const MONEY_PLACES: u32 = 2;

/// Round to specified decimal places using half-up rounding (ROUND_HALF_UP).
///
/// Midpoints round away from zero. The result always carries exactly `places`
/// fractional digits so it serializes as e.g. `"471.90"`.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use movequote_web::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(3));
/// assert_eq!(round_money(dec!(2.345), 2), dec!(2.35));
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(places);
    rounded
}

fn checked_add(a: Decimal, b: Decimal, what: &str) -> Result<Decimal, PricingError> {
    a.checked_add(b)
        .ok_or_else(|| PricingError::Computation(format!("overflow while adding {}", what)))
}

fn checked_mul(a: Decimal, b: Decimal, what: &str) -> Result<Decimal, PricingError> {
    a.checked_mul(b)
        .ok_or_else(|| PricingError::Computation(format!("overflow while multiplying {}", what)))
}

fn checked_sub(a: Decimal, b: Decimal, what: &str) -> Result<Decimal, PricingError> {
    a.checked_sub(b)
        .ok_or_else(|| PricingError::Computation(format!("overflow while subtracting {}", what)))
}

/// Reject negative amounts.
pub fn ensure_non_negative(field: &str, value: Decimal) -> Result<(), PricingError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(PricingError::validation(field, "must not be negative"));
    }
    Ok(())
}

/// Reject prices with more than two fractional digits.
fn ensure_money_precision(field: &str, value: Decimal) -> Result<(), PricingError> {
    if value.normalize().scale() > MONEY_PLACES {
        return Err(PricingError::validation(
            field,
            "must have at most 2 decimal places",
        ));
    }
    Ok(())
}

fn check_line_item(item: &LineItem, prefix: &str) -> Result<(), PricingError> {
    if item.quantity == 0 {
        return Err(PricingError::validation(
            format!("{}.quantity", prefix),
            "must be a positive integer",
        ));
    }
    let field = format!("{}.unit_price", prefix);
    ensure_non_negative(&field, item.unit_price)?;
    ensure_money_precision(&field, item.unit_price)?;
    Ok(())
}

/// Validate a single line item.
///
/// The VAT rate is already restricted to 0, 9 or 21 by its type.
pub fn validate_line_item(item: &LineItem) -> Result<(), PricingError> {
    check_line_item(item, "item")
}

/// Validate every line item, naming the offending index on failure.
pub fn validate_line_items(items: &[LineItem]) -> Result<(), PricingError> {
    for (index, item) in items.iter().enumerate() {
        check_line_item(item, &format!("items[{}]", index))?;
    }
    Ok(())
}

/// Validate a discount.
pub fn validate_discount(discount: &Discount) -> Result<(), PricingError> {
    ensure_non_negative("discount.value", discount.value)?;
    match discount.kind {
        DiscountKind::Percentage if discount.value > Decimal::ONE_HUNDRED => Err(
            PricingError::validation("discount.value", "percentage must be between 0 and 100"),
        ),
        DiscountKind::Percentage => Ok(()),
        DiscountKind::Fixed => ensure_money_precision("discount.value", discount.value),
    }
}

/// Reject negative volume, distance or travel time in a move summary.
pub fn validate_summary(summary: &MoveSummary) -> Result<(), PricingError> {
    ensure_non_negative("summary.total_volume", summary.total_volume)?;
    ensure_non_negative("summary.total_distance_km", summary.total_distance_km)?;
    ensure_non_negative("summary.estimated_travel_hours", summary.estimated_travel_hours)
}

/// quantity × unit price, unrounded.
fn net_amount(item: &LineItem) -> Result<Decimal, PricingError> {
    checked_mul(Decimal::from(item.quantity), item.unit_price, "line amount")
}

/// VAT owed on one item, unrounded. Zero when VAT is not included.
fn vat_amount(item: &LineItem) -> Result<Decimal, PricingError> {
    if !item.include_vat {
        return Ok(Decimal::ZERO);
    }
    checked_mul(net_amount(item)?, item.vat_rate.fraction(), "line VAT")
}

/// Total for one line: quantity × unit price, plus VAT when included.
pub fn compute_item_total(item: &LineItem) -> Result<Decimal, PricingError> {
    validate_line_item(item)?;

    let net = net_amount(item)?;
    let total = if item.include_vat {
        checked_mul(net, Decimal::ONE + item.vat_rate.fraction(), "line total")?
    } else {
        net
    };

    Ok(round_money(total, MONEY_PLACES))
}

/// Sum of quantity × unit price across items, VAT excluded.
pub fn compute_subtotal(items: &[LineItem]) -> Result<Decimal, PricingError> {
    validate_line_items(items)?;

    let subtotal = items.iter().try_fold(Decimal::ZERO, |sum, item| {
        checked_add(sum, net_amount(item)?, "subtotal")
    })?;

    Ok(round_money(subtotal, MONEY_PLACES))
}

/// Sum of VAT over items that include VAT. Rounded once, after summing.
pub fn compute_total_vat(items: &[LineItem]) -> Result<Decimal, PricingError> {
    validate_line_items(items)?;

    let vat = items.iter().try_fold(Decimal::ZERO, |sum, item| {
        checked_add(sum, vat_amount(item)?, "total VAT")
    })?;

    Ok(round_money(vat, MONEY_PLACES))
}

/// Discount in currency units.
///
/// Percentage discounts apply to subtotal + VAT. The result never exceeds
/// subtotal + VAT, so the grand total cannot go negative.
pub fn compute_discount_amount(
    subtotal: Decimal,
    total_vat: Decimal,
    discount: &Discount,
) -> Result<Decimal, PricingError> {
    ensure_non_negative("subtotal", subtotal)?;
    ensure_non_negative("total_vat", total_vat)?;
    validate_discount(discount)?;

    let gross = checked_add(subtotal, total_vat, "subtotal and VAT")?;
    let amount = match discount.kind {
        DiscountKind::Percentage => {
            let fraction = discount.value / Decimal::ONE_HUNDRED;
            checked_mul(gross, fraction, "percentage discount")?
        }
        DiscountKind::Fixed => discount.value,
    };

    Ok(round_money(amount.min(gross), MONEY_PLACES))
}

/// subtotal + VAT − discount, floored at zero.
pub fn compute_grand_total(
    subtotal: Decimal,
    total_vat: Decimal,
    discount_amount: Decimal,
) -> Result<Decimal, PricingError> {
    ensure_non_negative("subtotal", subtotal)?;
    ensure_non_negative("total_vat", total_vat)?;
    ensure_non_negative("discount_amount", discount_amount)?;

    let gross = checked_add(subtotal, total_vat, "subtotal and VAT")?;
    let total = checked_sub(gross, discount_amount, "discount")?;

    Ok(round_money(total.max(Decimal::ZERO), MONEY_PLACES))
}

/// Package base price plus the per-volume surcharge.
pub fn compute_package_price(
    base_price: Decimal,
    total_volume: Decimal,
    volume_rate: Decimal,
) -> Result<Decimal, PricingError> {
    ensure_non_negative("base_price", base_price)?;
    ensure_non_negative("total_volume", total_volume)?;
    ensure_non_negative("volume_rate", volume_rate)?;

    let surcharge = checked_mul(total_volume, volume_rate, "volume surcharge")?;
    let price = checked_add(base_price, surcharge, "package price")?;

    Ok(round_money(price, MONEY_PLACES))
}

/// Labor (rate × hours × movers) plus distance charge plus truck surcharge,
/// summed exactly and rounded once.
pub fn compute_hourly_price(
    hourly_rate: Decimal,
    hours: Decimal,
    movers: u32,
    distance_km: Decimal,
    distance_rate: Decimal,
    truck_surcharge: Decimal,
) -> Result<Decimal, PricingError> {
    let labor = labor_amount(hourly_rate, hours, movers)?;
    let distance = distance_amount(distance_km, distance_rate)?;
    ensure_non_negative("truck_surcharge", truck_surcharge)?;

    let price = checked_add(labor, distance, "labor and distance")?;
    let price = checked_add(price, truck_surcharge, "truck surcharge")?;

    Ok(round_money(price, MONEY_PLACES))
}

fn labor_amount(
    hourly_rate: Decimal,
    hours: Decimal,
    movers: u32,
) -> Result<Decimal, PricingError> {
    ensure_non_negative("hourly_rate", hourly_rate)?;
    ensure_non_negative("estimated_hours", hours)?;
    if movers == 0 {
        return Err(PricingError::validation(
            "number_of_movers",
            "must be a positive integer",
        ));
    }

    let per_mover = checked_mul(hourly_rate, hours, "labor")?;
    checked_mul(per_mover, Decimal::from(movers), "labor")
}

fn distance_amount(distance_km: Decimal, distance_rate: Decimal) -> Result<Decimal, PricingError> {
    ensure_non_negative("distance_km", distance_km)?;
    ensure_non_negative("distance_rate", distance_rate)?;

    checked_mul(distance_km, distance_rate, "distance charge")
}

/// hourly rate × hours × movers, rounded for display
pub fn compute_labor_cost(
    hourly_rate: Decimal,
    hours: Decimal,
    movers: u32,
) -> Result<Decimal, PricingError> {
    Ok(round_money(labor_amount(hourly_rate, hours, movers)?, MONEY_PLACES))
}

/// distance × rate per km, rounded for display
pub fn compute_distance_charge(
    distance_km: Decimal,
    distance_rate: Decimal,
) -> Result<Decimal, PricingError> {
    Ok(round_money(distance_amount(distance_km, distance_rate)?, MONEY_PLACES))
}

/// Full totals breakdown for a set of items and an optional discount.
pub fn calculate_totals(
    items: &[LineItem],
    discount: Option<&Discount>,
) -> Result<QuoteTotals, PricingError> {
    let subtotal = compute_subtotal(items)?;
    let total_vat = compute_total_vat(items)?;
    let discount_amount = match discount {
        Some(discount) => compute_discount_amount(subtotal, total_vat, discount)?,
        None => round_money(Decimal::ZERO, MONEY_PLACES),
    };
    let grand_total = compute_grand_total(subtotal, total_vat, discount_amount)?;

    Ok(QuoteTotals {
        subtotal,
        total_vat,
        discount_amount,
        grand_total,
    })
}

/// Per-line amounts for display next to each item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineBreakdown {
    pub id: String,
    pub net_amount: Decimal,
    pub vat_amount: Decimal,
    pub total: Decimal,
}

/// Per-line amounts plus quote totals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteBreakdown {
    pub lines: Vec<LineBreakdown>,
    pub totals: QuoteTotals,
}

/// Calculate per-line amounts and the quote totals in one pass over the items.
pub fn calculate_breakdown(
    items: &[LineItem],
    discount: Option<&Discount>,
) -> Result<QuoteBreakdown, PricingError> {
    let totals = calculate_totals(items, discount)?;

    let lines = items
        .iter()
        .map(|item| {
            Ok(LineBreakdown {
                id: item.id.clone(),
                net_amount: round_money(net_amount(item)?, MONEY_PLACES),
                vat_amount: round_money(vat_amount(item)?, MONEY_PLACES),
                total: compute_item_total(item)?,
            })
        })
        .collect::<Result<Vec<_>, PricingError>>()?;

    Ok(QuoteBreakdown { lines, totals })
}
