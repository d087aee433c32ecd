//! Per-transaction profit/loss, collateral and break-even.

use crate::domain::{Decimal, Direction, OptionKind, Transaction};

/// Shares controlled by one option contract.
pub const CONTRACT_MULTIPLIER: i64 = 100;

fn share_quantity(tx: &Transaction) -> Decimal {
    Decimal::from(tx.contracts) * Decimal::from(CONTRACT_MULTIPLIER)
}

/// Profit/loss for a leg, net of fees.
///
/// A positive `exit_price` prices the round trip; an absent or zero exit
/// price yields the open-position mark (premium received or paid).
pub fn profit_loss(tx: &Transaction, exit_price: Option<Decimal>) -> Decimal {
    let qty = share_quantity(tx);
    let gross = match exit_price.filter(Decimal::is_positive) {
        Some(exit) => match tx.direction {
            Direction::Buy => (exit - tx.premium) * qty,
            Direction::Sell => (tx.premium - exit) * qty,
        },
        None => Decimal::from(tx.direction.premium_sign()) * tx.premium * qty,
    };
    gross - tx.fees
}

/// The P&L figure aggregates use: the recorded snapshot when storage has
/// one, otherwise derived from the stored exit price.
pub fn effective_pnl(tx: &Transaction) -> Decimal {
    tx.profit_loss
        .unwrap_or_else(|| profit_loss(tx, tx.exit_price))
}

/// Capital at risk for a leg. Never negative.
///
/// Short options reserve the strike value (covered calls included, as a
/// proxy for the shares); long options risk the premium paid.
pub fn collateral(tx: &Transaction) -> Decimal {
    if let Some(amount) = tx.collateral_override.filter(Decimal::is_positive) {
        return amount;
    }
    let qty = share_quantity(tx);
    let raw = match tx.direction {
        Direction::Sell => tx.strike * qty,
        Direction::Buy => tx.premium * qty,
    };
    raw.max(Decimal::zero())
}

/// Underlying price at which the leg breaks even at expiry.
pub fn break_even(tx: &Transaction) -> Decimal {
    match tx.kind {
        OptionKind::Call => tx.strike + tx.premium,
        OptionKind::Put => tx.strike - tx.premium,
    }
}
