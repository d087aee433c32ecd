//! Full performance report and per-transaction metrics over one snapshot.

use crate::domain::{Decimal, Snapshot, StrategyKind, Symbol, TransactionId, TransactionStatus};
use crate::engine::aggregate::{
    monthly_performance, portfolio_summary, stock_performance, strategy_performance,
    yearly_performance, MonthlyPerformance, PortfolioSummary, StockPerformance,
    StrategyPerformance, YearlyPerformance,
};
use crate::engine::chains::{attributed_trades, effective_close_date, ChainBook};
use crate::engine::dates::{days_held, days_to_expiry, is_expired, Clock};
use crate::engine::realization::is_realized;
use crate::engine::returns::{annualized_ror, ror, AnnualizedRoR};
use crate::engine::valuation::{break_even, collateral, effective_pnl};
use crate::engine::EngineSettings;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceReport {
    pub portfolio: PortfolioSummary,
    pub monthly: Vec<MonthlyPerformance>,
    pub yearly: Vec<YearlyPerformance>,
    pub strategies: Vec<StrategyPerformance>,
    pub stocks: Vec<StockPerformance>,
}

/// Build every reporting view from one snapshot.
pub fn build_report(
    snapshot: &Snapshot,
    settings: &EngineSettings,
    clock: &dyn Clock,
) -> PerformanceReport {
    let today = clock.today();
    let book = ChainBook::new(snapshot);
    let trades = attributed_trades(snapshot, &book);
    let method = settings.annualization;

    let refs: Vec<_> = trades.iter().collect();
    let report = PerformanceReport {
        portfolio: portfolio_summary(snapshot, &book, &trades, method),
        monthly: monthly_performance(&trades, method, settings.top_ticker_limit, today),
        yearly: yearly_performance(
            &trades,
            &snapshot.transactions,
            method,
            settings.top_ticker_limit,
        ),
        strategies: strategy_performance(snapshot, &book, today),
        stocks: stock_performance(&refs),
    };

    tracing::info!(
        transactions = snapshot.transactions.len(),
        chains = snapshot.chains.len(),
        realized_outcomes = trades.len(),
        method = ?method,
        "Built performance report"
    );
    report
}

/// Every per-transaction scalar the presentation layer shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionMetrics {
    pub id: TransactionId,
    pub symbol: Symbol,
    pub status: TransactionStatus,
    pub strategy: StrategyKind,
    pub profit_loss: Decimal,
    pub collateral: Decimal,
    pub ror: Decimal,
    pub annualized_ror: AnnualizedRoR,
    pub break_even: Decimal,
    pub days_held: i64,
    pub days_to_expiry: i64,
    pub expired: bool,
    pub realized: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_close_date: Option<NaiveDate>,
}

pub fn transaction_metrics(snapshot: &Snapshot, clock: &dyn Clock) -> Vec<TransactionMetrics> {
    let today = clock.today();
    let now = clock.now();
    let book = ChainBook::new(snapshot);

    snapshot
        .transactions
        .iter()
        .map(|tx| TransactionMetrics {
            id: tx.id.clone(),
            symbol: tx.symbol.clone(),
            status: tx.status,
            strategy: StrategyKind::classify(tx),
            profit_loss: effective_pnl(tx),
            collateral: collateral(tx),
            ror: ror(tx),
            annualized_ror: annualized_ror(tx),
            break_even: break_even(tx),
            days_held: days_held(&tx.open_date, tx.close_date(), today),
            days_to_expiry: days_to_expiry(&tx.expiry_date, today),
            expired: is_expired(&tx.expiry_date, now),
            realized: is_realized(tx, &book),
            effective_close_date: effective_close_date(tx, &book),
        })
        .collect()
}
