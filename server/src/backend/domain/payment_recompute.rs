//! Commission and remaining-balance recomputation for accounting entries.
//!
//! Runs whenever an entry's amount is set: on creation and when an operator
//! edits the amount afterwards. Pure functions only; persisting the result is
//! the caller's job.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde_json::Value;
use shared::EntryType;

use super::models::AccountingEntry;

/// Closer earns 10% of every payment
pub const CLOSER_COMMISSION_RATE: Decimal = dec!(0.10);
/// Formateur earns 5% of every payment
pub const FORMATEUR_COMMISSION_RATE: Decimal = dec!(0.05);
/// Largest amount or price accepted anywhere in the ledger
pub const MAX_AMOUNT: Decimal = dec!(1000000000);

/// What happens to `remaining_amount` after a recompute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemainingUpdate {
    /// Deposit with a known total
    Set(Decimal),
    /// Balance and full payments never carry a remaining amount
    Clear,
    /// Deposit whose total could not be determined
    Keep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountRecompute {
    pub amount: Decimal,
    pub commission_closer: Decimal,
    pub commission_formateur: Decimal,
    pub remaining: RemainingUpdate,
}

impl AmountRecompute {
    /// Write the recomputed values into `entry`
    pub fn apply(&self, entry: &mut AccountingEntry) {
        entry.amount = self.amount;
        entry.commission_closer = self.commission_closer;
        entry.commission_formateur = self.commission_formateur;
        match self.remaining {
            RemainingUpdate::Set(remaining) => entry.remaining_amount = Some(remaining),
            RemainingUpdate::Clear => entry.remaining_amount = None,
            RemainingUpdate::Keep => {}
        }
    }

    /// Remaining amount for an entry that has no previous value to keep
    pub fn initial_remaining(&self) -> Option<Decimal> {
        match self.remaining {
            RemainingUpdate::Set(remaining) => Some(remaining),
            RemainingUpdate::Clear | RemainingUpdate::Keep => None,
        }
    }
}

/// Recompute the fields that depend on an entry's amount.
///
/// Returns `None` for a negative amount: nothing about the entry should change.
/// `total_hint` is only used for deposits, where it yields
/// `remaining = max(0, total - amount)`.
pub fn recompute_on_amount_edit(
    entry_type: EntryType,
    new_amount: Decimal,
    total_hint: Option<Decimal>,
) -> Option<AmountRecompute> {
    if new_amount < Decimal::ZERO {
        return None;
    }

    let remaining = match entry_type {
        EntryType::Deposit => match total_hint {
            Some(total) => RemainingUpdate::Set(round_money(total - new_amount).max(round_money(Decimal::ZERO))),
            None => RemainingUpdate::Keep,
        },
        EntryType::Balance | EntryType::FullPayment => RemainingUpdate::Clear,
    };

    Some(AmountRecompute {
        amount: new_amount,
        commission_closer: round_money(new_amount * CLOSER_COMMISSION_RATE),
        commission_formateur: round_money(new_amount * FORMATEUR_COMMISSION_RATE),
        remaining,
    })
}

/// Total price a deposit is paid against.
///
/// The linked lead's fixed price wins; otherwise the entry's own previous
/// `amount + remaining_amount`; otherwise unknown.
pub fn resolve_deposit_total(
    lead_price: Option<Decimal>,
    prior_amount: Decimal,
    prior_remaining: Option<Decimal>,
) -> Option<Decimal> {
    lead_price.or_else(|| prior_remaining.map(|remaining| prior_amount + remaining))
}

/// Read an amount out of a JSON edit value.
///
/// Numbers and numeric strings are accepted. A string using a comma as its
/// only decimal separator ("199,90") is read as well.
pub fn parse_amount(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(number) => number
            .to_string()
            .parse::<Decimal>()
            .ok()
            .or_else(|| number.as_f64().and_then(Decimal::from_f64)),
        Value::String(text) => {
            let text = text.trim();
            if text.contains(',') && !text.contains('.') {
                text.replace(',', ".").parse().ok()
            } else {
                text.parse().ok()
            }
        }
        _ => None,
    }
}

/// Round to cents, half away from zero, always two decimal places
pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}
