//! Strategy performance table.

use super::mean;
use crate::domain::{Decimal, Snapshot, StrategyKind, Transaction};
use crate::engine::chains::ChainBook;
use crate::engine::dates::days_held;
use crate::engine::realization::is_realized;
use crate::engine::returns::{annualized_ror, ror};
use crate::engine::valuation::effective_pnl;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyPerformance {
    pub strategy: StrategyKind,
    pub label: &'static str,
    pub trade_count: usize,
    pub realized_count: usize,
    /// Open and Rolled legs; a rolled position is still running.
    pub open_count: usize,
    pub realized_pnl: Decimal,
    pub average_ror: Decimal,
    /// Mean over realized legs with a usable annualized figure.
    pub average_annualized_ror: Decimal,
    pub win_rate: Decimal,
    pub average_days_held: Decimal,
}

#[derive(Default)]
struct StrategyAccumulator<'a> {
    all: Vec<&'a Transaction>,
    realized: Vec<&'a Transaction>,
    open_count: usize,
}

/// Per-strategy statistics, sorted by average RoR descending.
pub fn strategy_performance(
    snapshot: &Snapshot,
    book: &ChainBook<'_>,
    today: NaiveDate,
) -> Vec<StrategyPerformance> {
    let mut groups: BTreeMap<StrategyKind, StrategyAccumulator<'_>> = BTreeMap::new();
    for tx in &snapshot.transactions {
        let group = groups.entry(StrategyKind::classify(tx)).or_default();
        group.all.push(tx);
        if is_realized(tx, book) {
            group.realized.push(tx);
        }
        if tx.status.is_ongoing() {
            group.open_count += 1;
        }
    }

    let mut strategies: Vec<StrategyPerformance> = groups
        .into_iter()
        .map(|(strategy, group)| summarize(strategy, &group, today))
        .collect();

    strategies.sort_by(|a, b| {
        b.average_ror
            .cmp(&a.average_ror)
            .then_with(|| a.strategy.cmp(&b.strategy))
    });
    strategies
}

fn summarize(
    strategy: StrategyKind,
    group: &StrategyAccumulator<'_>,
    today: NaiveDate,
) -> StrategyPerformance {
    let realized = &group.realized;
    let pnls: Vec<Decimal> = realized.iter().map(|tx| effective_pnl(tx)).collect();
    let rors: Vec<Decimal> = realized.iter().map(|tx| ror(tx)).collect();
    let annualized: Vec<Decimal> = realized
        .iter()
        .filter_map(|tx| annualized_ror(tx).value())
        .collect();
    let holding_days: Vec<Decimal> = realized
        .iter()
        .map(|tx| Decimal::from(days_held(&tx.open_date, tx.close_date(), today)))
        .collect();
    let wins = pnls.iter().filter(|pnl| pnl.is_positive()).count();

    StrategyPerformance {
        strategy,
        label: strategy.label(),
        trade_count: group.all.len(),
        realized_count: realized.len(),
        open_count: group.open_count,
        realized_pnl: pnls.iter().sum(),
        average_ror: mean(&rors),
        average_annualized_ror: mean(&annualized),
        win_rate: Decimal::from(wins).percent_of(Decimal::from(realized.len())),
        average_days_held: mean(&holding_days),
    }
}
