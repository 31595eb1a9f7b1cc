//! Pricing engine module for the moving quote wizard.
//!
//! Provides the quote totals math (line items, VAT, discount) and the
//! package/hourly move pricing, plus the HTTP routes exposing them.

pub mod calculators;
pub mod models;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

// Re-export commonly used items
pub use calculators::{calculate_totals, round_money};
pub use models::{Discount, LineItem, PricingRates, PricingSelection, QuoteTotals};
pub use routes::router;
pub use services::{price_selection, PricingError, SelectionPrice};
