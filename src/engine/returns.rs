//! Return-on-risk and the three annualization methods.
//!
//! - per-trade: `ror * 365 / days_held`, with a half-day floor for same-day trades
//! - time-period: `ror * 365 / elapsed_days` for a rollup period
//! - trade-weighted: collateral-weighted mean of per-trade annualized values

use crate::domain::{Decimal, Transaction};
use crate::engine::dates::parse_calendar_date;
use crate::engine::valuation::{collateral, effective_pnl};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

pub const DAYS_PER_YEAR: i64 = 365;

/// Days credited to each calendar month with trading activity.
pub const DAYS_PER_ACTIVE_MONTH: i64 = 30;

/// Portfolio-level annualization methodology.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnnualizationMethod {
    /// Aggregate RoR scaled by the period's elapsed (or active) days.
    #[default]
    TimePeriod,
    /// Collateral-weighted average of per-trade annualized RoR.
    TradeWeighted,
}

impl FromStr for AnnualizationMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "time_period" | "timeperiod" | "time-period" => Ok(AnnualizationMethod::TimePeriod),
            "trade_weighted" | "tradeweighted" | "trade-weighted" => {
                Ok(AnnualizationMethod::TradeWeighted)
            }
            _ => Err(()),
        }
    }
}

/// Outcome of the per-trade annualization.
///
/// `Invalid` flags inconsistent input (close before open, unparseable
/// dates) and is kept apart from `NotApplicable` (still open, or zero RoR)
/// so callers can tell a data bug from an absent figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "camelCase")]
pub enum AnnualizedRoR {
    Value(Decimal),
    Invalid,
    NotApplicable,
}

impl AnnualizedRoR {
    pub fn value(&self) -> Option<Decimal> {
        match self {
            AnnualizedRoR::Value(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, AnnualizedRoR::Invalid)
    }

    /// Collapse to a plain number, treating both non-values as zero.
    pub fn value_or_zero(&self) -> Decimal {
        self.value().unwrap_or_else(Decimal::zero)
    }
}

/// `pnl / collateral * 100`, zero when there is no collateral.
pub fn ror_from(pnl: Decimal, collateral: Decimal) -> Decimal {
    pnl.percent_of(collateral)
}

/// Return on risk for a single transaction, in percent.
pub fn ror(tx: &Transaction) -> Decimal {
    ror_from(effective_pnl(tx), collateral(tx))
}

/// Per-trade annualized RoR.
pub fn annualized_ror(tx: &Transaction) -> AnnualizedRoR {
    let Some(close) = tx.close_date() else {
        return AnnualizedRoR::NotApplicable;
    };
    let trade_ror = ror(tx);
    if trade_ror.is_zero() {
        return AnnualizedRoR::NotApplicable;
    }
    let (Some(open), Some(close)) = (parse_calendar_date(&tx.open_date), parse_calendar_date(close))
    else {
        tracing::warn!(id = %tx.id, "Unparseable dates on closed transaction");
        return AnnualizedRoR::NotApplicable;
    };
    annualize_trade(trade_ror, open, close)
}

/// Annualize a RoR earned between two calendar dates.
///
/// A close before the open, or a figure too large to represent, is
/// `Invalid`.
pub fn annualize_trade(ror: Decimal, open: NaiveDate, close: NaiveDate) -> AnnualizedRoR {
    let days = (close - open).num_days();
    if days < 0 {
        return AnnualizedRoR::Invalid;
    }
    // Same-day trades hold for half a day rather than zero.
    let divisor = if days == 0 {
        Decimal::new(rust_decimal::Decimal::new(5, 1))
    } else {
        Decimal::from(days)
    };
    ror.checked_mul(Decimal::from(DAYS_PER_YEAR))
        .and_then(|scaled| scaled.checked_div(divisor))
        .map(AnnualizedRoR::Value)
        .unwrap_or(AnnualizedRoR::Invalid)
}

/// Time-period annualization for rollups. Non-positive `days` or an
/// overflowing result yields 0.
pub fn annualize_over_period(ror: Decimal, days: i64) -> Decimal {
    if days <= 0 {
        return Decimal::zero();
    }
    ror.checked_mul(Decimal::from(DAYS_PER_YEAR))
        .and_then(|scaled| scaled.checked_div(Decimal::from(days)))
        .unwrap_or_else(Decimal::zero)
}

/// Collateral-weighted average of per-trade annualized RoR.
///
/// Trades without a usable annualized value, with zero collateral, or whose
/// weighted term overflows are left out of both numerator and denominator.
pub fn trade_weighted_annualized_ror<'a, I>(realized: I) -> Decimal
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut weighted = Decimal::zero();
    let mut total_collateral = Decimal::zero();

    for tx in realized {
        let Some(annualized) = annualized_ror(tx).value() else {
            continue;
        };
        let capital = collateral(tx);
        if capital.is_zero() {
            continue;
        }
        let term = annualized
            .checked_mul(capital)
            .and_then(|product| weighted.checked_add(product));
        let capital_total = total_collateral.checked_add(capital);
        let (Some(next_weighted), Some(next_total)) = (term, capital_total) else {
            tracing::debug!(id = %tx.id, "Skipping overflowing trade-weighted term");
            continue;
        };
        weighted = next_weighted;
        total_collateral = next_total;
    }

    weighted.checked_div_or_zero(total_collateral)
}

/// Coarse proxy for days capital was deployed: 30 days per distinct
/// calendar month in which a trade was opened.
pub fn active_trading_days<'a, I>(transactions: I) -> i64
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let months: BTreeSet<(i32, u32)> = transactions
        .into_iter()
        .filter_map(|tx| parse_calendar_date(&tx.open_date))
        .map(|date| (date.year(), date.month()))
        .collect();
    months.len() as i64 * DAYS_PER_ACTIVE_MONTH
}
