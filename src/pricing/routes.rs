//! HTTP routes for the pricing engine.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};

use crate::error::Result;
use crate::AppState;

use super::calculators::{
    calculate_breakdown, compute_distance_charge, compute_hourly_price, compute_item_total,
    compute_labor_cost, compute_package_price, round_money, MONEY_PLACES,
};
use super::requests::{
    CalculateHourlyRequest, CalculateItemTotalRequest, CalculatePackageRequest,
    CalculateTotalsRequest, PriceSelectionRequest,
};
use super::responses::{
    HourlyPriceResponse, ItemTotalResponse, MoneyResponse, PackagePriceResponse,
    PackagesResponse, QuoteTotalsResponse, RatesResponse, SelectionPriceResponse,
};
use super::services::{price_selection, selection_line_items, PricingError};

/// Pricing API routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/pricing/packages", get(list_packages))
        .route("/api/pricing/rates", get(get_rates))
        .route("/api/pricing/item-total", post(item_total))
        .route("/api/pricing/totals", post(totals))
        .route("/api/pricing/package", post(package_price))
        .route("/api/pricing/hourly", post(hourly_price))
        .route("/api/pricing/selection", post(selection_price))
}

async fn list_packages(State(state): State<AppState>) -> Json<PackagesResponse> {
    let rates = &state.config.pricing;
    Json(PackagesResponse {
        currency: rates.currency.clone(),
        packages: rates.packages.clone(),
    })
}

async fn get_rates(State(state): State<AppState>) -> Json<RatesResponse> {
    Json(RatesResponse::from_rates(&state.config.pricing))
}

async fn item_total(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CalculateItemTotalRequest>, JsonRejection>,
) -> Result<Json<ItemTotalResponse>> {
    let Json(req) = payload?;
    let currency = req.currency.as_deref().unwrap_or(&state.config.pricing.currency);

    let total = compute_item_total(&req.item)?;

    Ok(Json(ItemTotalResponse {
        id: req.item.id.clone(),
        total: MoneyResponse::new(total, currency),
    }))
}

async fn totals(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CalculateTotalsRequest>, JsonRejection>,
) -> Result<Json<QuoteTotalsResponse>> {
    let Json(req) = payload?;
    let currency = req.currency.as_deref().unwrap_or(&state.config.pricing.currency);

    let breakdown = calculate_breakdown(&req.items, req.discount.as_ref())?;
    tracing::debug!(
        items = req.items.len(),
        grand_total = %breakdown.totals.grand_total,
        "Calculated quote totals"
    );

    Ok(Json(QuoteTotalsResponse::from_breakdown(&breakdown, currency)))
}

async fn package_price(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CalculatePackageRequest>, JsonRejection>,
) -> Result<Json<PackagePriceResponse>> {
    let Json(req) = payload?;
    let rates = &state.config.pricing;

    let base_price = match (&req.package_id, req.base_price) {
        (_, Some(base_price)) => base_price,
        (Some(package_id), None) => rates
            .find_package(package_id)
            .map(|p| p.base_price)
            .ok_or_else(|| {
                PricingError::validation("package_id", format!("unknown package '{}'", package_id))
            })?,
        (None, None) => {
            return Err(PricingError::validation(
                "base_price",
                "either package_id or base_price is required",
            )
            .into())
        }
    };
    let volume_rate = req.volume_rate.unwrap_or(rates.volume_rate);

    let total = compute_package_price(base_price, req.total_volume, volume_rate)?;

    Ok(Json(PackagePriceResponse {
        package_id: req.package_id,
        base_price: MoneyResponse::new(base_price, &rates.currency),
        volume_adjustment: MoneyResponse::new(total - base_price, &rates.currency),
        total: MoneyResponse::new(total, &rates.currency),
    }))
}

async fn hourly_price(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CalculateHourlyRequest>, JsonRejection>,
) -> Result<Json<HourlyPriceResponse>> {
    let Json(req) = payload?;
    let rates = &state.config.pricing;
    let config = req.config();

    let distance_rate = req.distance_rate.unwrap_or(rates.distance_rate);
    let truck = req
        .truck_surcharge
        .unwrap_or_else(|| rates.truck.for_size(config.truck_size));

    let total = compute_hourly_price(
        config.hourly_rate,
        config.estimated_hours,
        config.number_of_movers,
        req.distance_km,
        distance_rate,
        truck,
    )?;
    let labor = compute_labor_cost(
        config.hourly_rate,
        config.estimated_hours,
        config.number_of_movers,
    )?;
    let distance = compute_distance_charge(req.distance_km, distance_rate)?;

    Ok(Json(HourlyPriceResponse {
        labor: MoneyResponse::new(labor, &rates.currency),
        distance: MoneyResponse::new(distance, &rates.currency),
        truck: MoneyResponse::new(round_money(truck, MONEY_PLACES), &rates.currency),
        total: MoneyResponse::new(total, &rates.currency),
    }))
}

async fn selection_price(
    State(state): State<AppState>,
    payload: std::result::Result<Json<PriceSelectionRequest>, JsonRejection>,
) -> Result<Json<SelectionPriceResponse>> {
    let Json(req) = payload?;

    let price = price_selection(&req.selection, &req.summary, &state.config.pricing)?;
    let line_items = selection_line_items(&price);

    Ok(Json(SelectionPriceResponse::new(&price, line_items)))
}
