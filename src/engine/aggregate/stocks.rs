//! Per-ticker performance and top-ticker rankings.

use super::PeriodTotals;
use crate::domain::{Decimal, Symbol};
use crate::engine::chains::AttributedTrade;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockPerformance {
    pub symbol: Symbol,
    #[serde(flatten)]
    pub totals: PeriodTotals,
}

/// Top tickers of a period, ranked two ways.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerRanking {
    pub by_pnl: Vec<StockPerformance>,
    pub by_ror: Vec<StockPerformance>,
}

/// Group realized outcomes by ticker. A closed chain contributes once, at
/// its aggregate P&L and collateral.
///
/// Sorted by P&L descending, then symbol.
pub fn stock_performance(trades: &[&AttributedTrade<'_>]) -> Vec<StockPerformance> {
    let mut by_symbol: BTreeMap<&Symbol, Vec<&AttributedTrade<'_>>> = BTreeMap::new();
    for trade in trades {
        by_symbol.entry(&trade.symbol).or_default().push(*trade);
    }

    let mut stocks: Vec<StockPerformance> = by_symbol
        .into_iter()
        .map(|(symbol, trades)| StockPerformance {
            symbol: symbol.clone(),
            totals: PeriodTotals::from_trades(&trades),
        })
        .collect();

    sort_by_metric(&mut stocks, |s| s.totals.pnl);
    stocks
}

/// Best `limit` tickers by P&L and by RoR.
pub fn top_tickers(trades: &[&AttributedTrade<'_>], limit: usize) -> TickerRanking {
    let stocks = stock_performance(trades);

    let mut by_ror = stocks.clone();
    sort_by_metric(&mut by_ror, |s| s.totals.ror);
    by_ror.truncate(limit);

    let mut by_pnl = stocks;
    by_pnl.truncate(limit);

    TickerRanking { by_pnl, by_ror }
}

fn sort_by_metric(stocks: &mut [StockPerformance], metric: impl Fn(&StockPerformance) -> Decimal) {
    stocks.sort_by(|a, b| {
        metric(b)
            .cmp(&metric(a))
            .then_with(|| b.totals.trade_count.cmp(&a.totals.trade_count))
            .then_with(|| a.symbol.cmp(&b.symbol))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn trade(symbol: &str, pnl: &str, collateral: &str) -> AttributedTrade<'static> {
        AttributedTrade {
            symbol: Symbol::new(symbol),
            chain_id: None,
            pnl: Decimal::from_str(pnl).unwrap(),
            collateral: Decimal::from_str(collateral).unwrap(),
            open_date: NaiveDate::from_ymd_opt(2024, 1, 2),
            close_date: NaiveDate::from_ymd_opt(2024, 1, 20),
            legs: vec![],
        }
    }

    #[test]
    fn test_groups_by_symbol() {
        let trades = [
            trade("AAPL", "100", "10000"),
            trade("AAPL", "-40", "10000"),
            trade("TSLA", "50", "1000"),
        ];
        let refs: Vec<&AttributedTrade> = trades.iter().collect();
        let stocks = stock_performance(&refs);

        assert_eq!(stocks.len(), 2);
        assert_eq!(stocks[0].symbol.as_str(), "AAPL");
        assert_eq!(stocks[0].totals.pnl, Decimal::from(60i64));
        assert_eq!(stocks[0].totals.trade_count, 2);
        assert_eq!(stocks[0].totals.wins, 1);
        assert_eq!(stocks[0].totals.losses, 1);
        assert_eq!(stocks[1].symbol.as_str(), "TSLA");
    }

    #[test]
    fn test_top_tickers_rank_differently() {
        let trades = [
            trade("AAPL", "300", "30000"),
            trade("TSLA", "100", "1000"),
            trade("MSFT", "200", "40000"),
        ];
        let refs: Vec<&AttributedTrade> = trades.iter().collect();
        let ranking = top_tickers(&refs, 2);

        let by_pnl: Vec<&str> = ranking.by_pnl.iter().map(|s| s.symbol.as_str()).collect();
        let by_ror: Vec<&str> = ranking.by_ror.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(by_pnl, vec!["AAPL", "MSFT"]);
        assert_eq!(by_ror, vec!["TSLA", "AAPL"]);
    }

    #[test]
    fn test_ties_break_by_symbol() {
        let trades = [trade("ZM", "100", "1000"), trade("AMD", "100", "1000")];
        let refs: Vec<&AttributedTrade> = trades.iter().collect();
        let stocks = stock_performance(&refs);
        assert_eq!(stocks[0].symbol.as_str(), "AMD");
    }
}
