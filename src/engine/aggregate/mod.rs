//! Reporting rollups over the chain-aware realized trade stream.
//!
//! All groupings use ordered maps so the same snapshot always produces the
//! same output, byte for byte.

pub mod monthly;
pub mod portfolio;
pub mod stocks;
pub mod strategy;
pub mod yearly;

pub use monthly::{monthly_performance, MonthlyPerformance};
pub use portfolio::{average_trade_ror, portfolio_ror, portfolio_summary, PortfolioSummary};
pub use stocks::{stock_performance, top_tickers, StockPerformance, TickerRanking};
pub use strategy::{strategy_performance, StrategyPerformance};
pub use yearly::{yearly_performance, YearlyPerformance};

use crate::domain::{Decimal, Transaction};
use crate::engine::chains::AttributedTrade;
use crate::engine::returns::{
    annualize_over_period, trade_weighted_annualized_ror, AnnualizationMethod,
};
use serde::Serialize;

/// Totals shared by every period-style rollup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodTotals {
    pub pnl: Decimal,
    pub collateral: Decimal,
    pub trade_count: usize,
    pub wins: usize,
    pub losses: usize,
    /// Percent of trades with positive P&L; a chain counts once.
    pub win_rate: Decimal,
    /// Capital-weighted: total P&L over total collateral.
    pub ror: Decimal,
}

impl PeriodTotals {
    pub fn from_trades(trades: &[&AttributedTrade<'_>]) -> Self {
        let mut totals = PeriodTotals::default();
        for trade in trades {
            totals.pnl += trade.pnl;
            totals.collateral += trade.collateral;
            totals.trade_count += 1;
            if trade.is_win() {
                totals.wins += 1;
            } else if trade.pnl.is_negative() {
                totals.losses += 1;
            }
        }
        totals.win_rate = Decimal::from(totals.wins).percent_of(Decimal::from(totals.trade_count));
        totals.ror = totals.pnl.percent_of(totals.collateral);
        totals
    }
}

/// Annualize a period's RoR with the configured method.
///
/// `period_days` feeds the time-period method; the trade-weighted method
/// averages the per-trade figures of every leg in the period.
pub(crate) fn annualize_period(
    method: AnnualizationMethod,
    totals: &PeriodTotals,
    period_days: i64,
    trades: &[&AttributedTrade<'_>],
) -> Decimal {
    match method {
        AnnualizationMethod::TimePeriod => annualize_over_period(totals.ror, period_days),
        AnnualizationMethod::TradeWeighted => {
            let legs: Vec<&Transaction> = trades
                .iter()
                .flat_map(|trade| trade.legs.iter().copied())
                .collect();
            trade_weighted_annualized_ror(legs)
        }
    }
}

/// Mean of `values`, zero when empty.
pub(crate) fn mean(values: &[Decimal]) -> Decimal {
    let total: Decimal = values.iter().sum();
    total.checked_div_or_zero(Decimal::from(values.len()))
}
