//! Quote draft state and the reducer that advances it.
//!
//! A draft is never mutated in place: `apply` takes the current draft and one
//! user action and returns the next draft, or an error leaving the current one
//! untouched. Totals are not stored; they are recomputed from items and
//! discount whenever they are asked for.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pricing::calculators::{
    calculate_breakdown, calculate_totals, validate_discount, validate_line_item,
    validate_summary, QuoteBreakdown,
};
use crate::pricing::models::{
    Discount, ItemOrigin, LineItem, MoveSummary, PricingRates, PricingSelection, QuoteTotals,
    VatRate,
};
use crate::pricing::services::{price_selection, selection_line_items, PricingError};

/// Customer contact details from the first wizard step
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Customer {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Where a quote is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum QuoteStatus {
    Draft,
    Sent { at: DateTime<Utc> },
    Saved { at: DateTime<Utc> },
    Scheduled { send_at: DateTime<Utc> },
}

impl QuoteStatus {
    pub fn is_finalized(&self) -> bool {
        !matches!(self, QuoteStatus::Draft)
    }
}

/// How a draft is finalized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FinalizeMode {
    /// Send to the customer now
    Send,
    /// Keep as a saved quote without sending
    Save,
    /// Send at a later time
    Schedule { send_at: DateTime<Utc> },
}

/// Line item as entered by the user; the id is generated when absent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewLineItem {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    pub unit_price: Decimal,
    #[serde(default = "default_include_vat")]
    pub include_vat: bool,
    #[serde(default)]
    pub vat_rate: VatRate,
}

fn default_quantity() -> u32 {
    1
}

fn default_include_vat() -> bool {
    true
}

/// One user action on a draft
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DraftAction {
    SetCustomer { customer: Customer },
    SetSummary { summary: MoveSummary },
    SelectPricing { selection: PricingSelection },
    AddItem { item: NewLineItem },
    UpdateItem { item: LineItem },
    RemoveItem { id: String },
    ToggleVat { id: String },
    SetDiscount { discount: Discount },
    ClearDiscount,
    Finalize(FinalizeMode),
    Revise,
}

impl DraftAction {
    /// Short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            DraftAction::SetCustomer { .. } => "set_customer",
            DraftAction::SetSummary { .. } => "set_summary",
            DraftAction::SelectPricing { .. } => "select_pricing",
            DraftAction::AddItem { .. } => "add_item",
            DraftAction::UpdateItem { .. } => "update_item",
            DraftAction::RemoveItem { .. } => "remove_item",
            DraftAction::ToggleVat { .. } => "toggle_vat",
            DraftAction::SetDiscount { .. } => "set_discount",
            DraftAction::ClearDiscount => "clear_discount",
            DraftAction::Finalize(_) => "finalize",
            DraftAction::Revise => "revise",
        }
    }
}

/// Draft reducer error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DraftError {
    #[error("Quote {0} is finalized; revise it before editing")]
    Finalized(String),

    #[error("Quote {0} has not been finalized")]
    NotFinalized(String),

    #[error("No line item with id '{0}'")]
    ItemNotFound(String),

    #[error("A line item with id '{0}' already exists")]
    DuplicateItem(String),

    #[error("Quote cannot be finalized: {0}")]
    Incomplete(String),

    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Inputs the reducer needs besides the draft and the action
#[derive(Debug, Clone, Copy)]
pub struct DraftContext<'a> {
    pub now: DateTime<Utc>,
    pub rates: &'a PricingRates,
    pub validity_days: u32,
}

/// In-progress or finalized quote
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteDraft {
    pub id: Uuid,
    pub quote_number: String,
    pub revision: u32,
    pub customer: Customer,
    pub summary: MoveSummary,
    pub selection: Option<PricingSelection>,
    pub items: Vec<LineItem>,
    pub discount: Option<Discount>,
    pub status: QuoteStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub valid_until: Option<DateTime<Utc>>,
}

impl QuoteDraft {
    pub fn new(id: Uuid, quote_number: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            quote_number,
            revision: 1,
            customer: Customer::default(),
            summary: MoveSummary::default(),
            selection: None,
            items: Vec::new(),
            discount: None,
            status: QuoteStatus::Draft,
            created_at: now,
            updated_at: now,
            valid_until: None,
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.status.is_finalized()
    }

    pub fn totals(&self) -> Result<QuoteTotals, PricingError> {
        calculate_totals(&self.items, self.discount.as_ref())
    }

    pub fn breakdown(&self) -> Result<QuoteBreakdown, PricingError> {
        calculate_breakdown(&self.items, self.discount.as_ref())
    }

    fn position(&self, id: &str) -> Result<usize, DraftError> {
        self.items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| DraftError::ItemNotFound(id.to_string()))
    }

    /// Next free `item-N` id
    fn next_item_id(&self) -> String {
        let next = self
            .items
            .iter()
            .filter_map(|item| item.id.strip_prefix("item-")?.parse::<u32>().ok())
            .max()
            .unwrap_or(0)
            .saturating_add(1);
        format!("item-{}", next)
    }

    /// Replace selection-derived items with freshly priced ones, keeping
    /// manual items after them in their current order.
    fn reprice(
        &mut self,
        selection: &PricingSelection,
        rates: &PricingRates,
    ) -> Result<(), DraftError> {
        let price = price_selection(selection, &self.summary, rates)?;
        let mut items = selection_line_items(&price);

        let manual: Vec<LineItem> = self
            .items
            .drain(..)
            .filter(|item| item.origin != ItemOrigin::Selection)
            .collect();
        if let Some(clash) = manual.iter().find(|m| items.iter().any(|s| s.id == m.id)) {
            return Err(DraftError::DuplicateItem(clash.id.clone()));
        }

        items.extend(manual);
        self.items = items;
        Ok(())
    }

    fn finalize(&mut self, mode: FinalizeMode, ctx: &DraftContext<'_>) -> Result<(), DraftError> {
        if self.items.is_empty() {
            return Err(DraftError::Incomplete(
                "at least one line item is required".to_string(),
            ));
        }

        let needs_email = !matches!(mode, FinalizeMode::Save);
        if needs_email && !self.customer.email.contains('@') {
            return Err(DraftError::Incomplete(
                "a customer email address is required to send".to_string(),
            ));
        }

        self.status = match mode {
            FinalizeMode::Send => QuoteStatus::Sent { at: ctx.now },
            FinalizeMode::Save => QuoteStatus::Saved { at: ctx.now },
            FinalizeMode::Schedule { send_at } => {
                if send_at <= ctx.now {
                    return Err(DraftError::Incomplete(
                        "scheduled send time must be in the future".to_string(),
                    ));
                }
                QuoteStatus::Scheduled { send_at }
            }
        };
        let valid_until = ctx
            .now
            .checked_add_signed(Duration::days(i64::from(ctx.validity_days)))
            .ok_or_else(|| {
                PricingError::Computation(format!(
                    "validity of {} days overflows the calendar",
                    ctx.validity_days
                ))
            })?;
        self.valid_until = Some(valid_until);
        Ok(())
    }
}

impl NewLineItem {
    fn into_line_item(self, fallback_id: String) -> LineItem {
        LineItem {
            id: self.id.filter(|id| !id.trim().is_empty()).unwrap_or(fallback_id),
            name: self.name,
            description: self.description,
            quantity: self.quantity,
            unit_price: self.unit_price,
            include_vat: self.include_vat,
            vat_rate: self.vat_rate,
            origin: ItemOrigin::Manual,
        }
    }
}

/// Apply one action to a draft, returning the next draft.
///
/// Finalized drafts only accept `Revise`. The returned draft always prices
/// cleanly: an action that would leave the totals uncomputable is rejected.
pub fn apply(
    draft: &QuoteDraft,
    action: DraftAction,
    ctx: &DraftContext<'_>,
) -> Result<QuoteDraft, DraftError> {
    if draft.is_finalized() && !matches!(action, DraftAction::Revise) {
        return Err(DraftError::Finalized(draft.quote_number.clone()));
    }

    let mut next = draft.clone();

    match action {
        DraftAction::SetCustomer { customer } => {
            next.customer = customer;
        }
        DraftAction::SetSummary { summary } => {
            validate_summary(&summary)?;
            next.summary = summary;
            if let Some(selection) = next.selection.clone() {
                next.reprice(&selection, ctx.rates)?;
            }
        }
        DraftAction::SelectPricing { selection } => {
            next.reprice(&selection, ctx.rates)?;
            next.selection = Some(selection);
        }
        DraftAction::AddItem { item } => {
            let item = item.into_line_item(next.next_item_id());
            validate_line_item(&item)?;
            if next.items.iter().any(|existing| existing.id == item.id) {
                return Err(DraftError::DuplicateItem(item.id));
            }
            next.items.push(item);
        }
        DraftAction::UpdateItem { mut item } => {
            validate_line_item(&item)?;
            let index = next.position(&item.id)?;
            // origin is owned by the draft, not the client
            item.origin = next.items[index].origin;
            next.items[index] = item;
        }
        DraftAction::RemoveItem { id } => {
            let index = next.position(&id)?;
            next.items.remove(index);
        }
        DraftAction::ToggleVat { id } => {
            let index = next.position(&id)?;
            next.items[index].include_vat = !next.items[index].include_vat;
        }
        DraftAction::SetDiscount { discount } => {
            validate_discount(&discount)?;
            next.discount = Some(discount);
        }
        DraftAction::ClearDiscount => {
            next.discount = None;
        }
        DraftAction::Finalize(mode) => {
            next.totals()?;
            next.finalize(mode, ctx)?;
        }
        DraftAction::Revise => {
            if !draft.is_finalized() {
                return Err(DraftError::NotFinalized(draft.quote_number.clone()));
            }
            next.status = QuoteStatus::Draft;
            next.revision += 1;
            next.valid_until = None;
        }
    }

    next.totals()?;
    next.updated_at = ctx.now;
    Ok(next)
}
