//! Portfolio-level summary: capital-weighted RoR and annualized return.

use super::{mean, PeriodTotals};
use crate::domain::{Decimal, Snapshot};
use crate::engine::chains::{AttributedTrade, ChainBook};
use crate::engine::realization::{realized_transactions, unrealized_pnl};
use crate::engine::returns::{
    active_trading_days, annualize_over_period, trade_weighted_annualized_ror,
    AnnualizationMethod,
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    #[serde(flatten)]
    pub realized: PeriodTotals,
    pub unrealized_pnl: Decimal,
    /// Plain mean of per-trade RoR; differs from `ror` whenever sizes vary.
    pub average_trade_ror: Decimal,
    pub active_trading_days: i64,
    pub annualization: AnnualizationMethod,
    pub annualized_ror: Decimal,
}

/// Total realized P&L over total realized collateral, in percent.
pub fn portfolio_ror(trades: &[AttributedTrade<'_>]) -> Decimal {
    let pnl: Decimal = trades.iter().map(|t| t.pnl).sum();
    let collateral: Decimal = trades.iter().map(|t| t.collateral).sum();
    pnl.percent_of(collateral)
}

/// Arithmetic mean of each outcome's own RoR.
pub fn average_trade_ror(trades: &[AttributedTrade<'_>]) -> Decimal {
    let rors: Vec<Decimal> = trades.iter().map(AttributedTrade::ror).collect();
    mean(&rors)
}

pub fn portfolio_summary(
    snapshot: &Snapshot,
    book: &ChainBook<'_>,
    trades: &[AttributedTrade<'_>],
    method: AnnualizationMethod,
) -> PortfolioSummary {
    let refs: Vec<&AttributedTrade<'_>> = trades.iter().collect();
    let realized = PeriodTotals::from_trades(&refs);
    let active_days = active_trading_days(&snapshot.transactions);

    let annualized_ror = match method {
        AnnualizationMethod::TimePeriod => annualize_over_period(realized.ror, active_days),
        AnnualizationMethod::TradeWeighted => {
            trade_weighted_annualized_ror(realized_transactions(snapshot, book))
        }
    };

    PortfolioSummary {
        unrealized_pnl: unrealized_pnl(snapshot, book),
        average_trade_ror: average_trade_ror(trades),
        active_trading_days: active_days,
        annualization: method,
        annualized_ror,
        realized,
    }
}
