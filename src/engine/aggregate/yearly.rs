//! Yearly rollups with top tickers.

use super::{annualize_period, top_tickers, PeriodTotals, TickerRanking};
use crate::domain::{Decimal, Transaction};
use crate::engine::chains::AttributedTrade;
use crate::engine::dates::parse_calendar_date;
use crate::engine::returns::{active_trading_days, AnnualizationMethod};
use chrono::Datelike;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyPerformance {
    pub year: i32,
    #[serde(flatten)]
    pub totals: PeriodTotals,
    /// 30 days per month in which a trade was opened during the year.
    pub active_trading_days: i64,
    pub annualized_ror: Decimal,
    pub top_tickers: TickerRanking,
}

/// Bucket realized outcomes by effective close year.
///
/// `transactions` is the full snapshot; it feeds the active-trading-days
/// divisor, which counts months in which trades were opened that year.
pub fn yearly_performance(
    trades: &[AttributedTrade<'_>],
    transactions: &[Transaction],
    method: AnnualizationMethod,
    top_limit: usize,
) -> Vec<YearlyPerformance> {
    let mut buckets: BTreeMap<i32, Vec<&AttributedTrade<'_>>> = BTreeMap::new();
    for trade in trades {
        if let Some(close) = trade.close_date {
            buckets.entry(close.year()).or_default().push(trade);
        }
    }

    buckets
        .into_iter()
        .map(|(year, trades)| {
            let opened_in_year = transactions.iter().filter(|tx| {
                parse_calendar_date(&tx.open_date).is_some_and(|date| date.year() == year)
            });
            let active_days = active_trading_days(opened_in_year);
            let totals = PeriodTotals::from_trades(&trades);
            let annualized_ror = annualize_period(method, &totals, active_days, &trades);

            YearlyPerformance {
                year,
                active_trading_days: active_days,
                annualized_ror,
                top_tickers: top_tickers(&trades, top_limit),
                totals,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Direction, OptionKind, Symbol, TransactionId};
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn tx(open: &str) -> Transaction {
        Transaction::new(
            TransactionId::new(open),
            Symbol::new("AAPL"),
            open,
            "2025-01-17",
            OptionKind::Put,
            Direction::Sell,
            Decimal::from(100i64),
            Decimal::from(1i64),
            1,
            Decimal::zero(),
        )
    }

    fn trade(close: (i32, u32, u32), pnl: &str) -> AttributedTrade<'static> {
        AttributedTrade {
            symbol: Symbol::new("AAPL"),
            chain_id: None,
            pnl: Decimal::from_str(pnl).unwrap(),
            collateral: Decimal::from(10000i64),
            open_date: None,
            close_date: NaiveDate::from_ymd_opt(close.0, close.1, close.2),
            legs: vec![],
        }
    }

    #[test]
    fn test_yearly_uses_active_trading_days() {
        let transactions = vec![tx("2024-01-03"), tx("2024-01-20"), tx("2024-05-02"), tx("2023-12-01")];
        let trades = vec![trade((2024, 2, 1), "300"), trade((2024, 6, 1), "300")];

        let years = yearly_performance(&trades, &transactions, AnnualizationMethod::TimePeriod, 3);

        assert_eq!(years.len(), 1);
        assert_eq!(years[0].year, 2024);
        assert_eq!(years[0].active_trading_days, 60);
        // 600 / 20000 = 3%, * 365 / 60
        assert_eq!(years[0].annualized_ror, Decimal::from_str("18.25").unwrap());
        assert_eq!(years[0].top_tickers.by_pnl.len(), 1);
    }

    #[test]
    fn test_year_without_opened_trades_annualizes_to_zero() {
        let trades = vec![trade((2025, 1, 10), "300")];
        let years = yearly_performance(&trades, &[], AnnualizationMethod::TimePeriod, 3);
        assert_eq!(years[0].active_trading_days, 0);
        assert_eq!(years[0].annualized_ror, Decimal::zero());
    }
}
