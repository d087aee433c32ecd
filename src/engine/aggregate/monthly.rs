//! Monthly series bucketed by effective close month.

use super::{annualize_period, top_tickers, PeriodTotals, TickerRanking};
use crate::domain::Decimal;
use crate::engine::chains::AttributedTrade;
use crate::engine::dates::days_in_month;
use crate::engine::returns::AnnualizationMethod;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPerformance {
    /// `YYYY-MM`.
    pub month: String,
    pub year: i32,
    pub month_number: u32,
    #[serde(flatten)]
    pub totals: PeriodTotals,
    /// Days the period has run: the whole month, or up to today for the
    /// current month.
    pub elapsed_days: i64,
    pub annualized_ror: Decimal,
    pub top_tickers: TickerRanking,
}

/// Days of the month containing `month_start` that have elapsed by `today`.
fn elapsed_days(month_start: NaiveDate, today: NaiveDate) -> i64 {
    if (today.year(), today.month()) == (month_start.year(), month_start.month()) {
        i64::from(today.day())
    } else {
        days_in_month(month_start)
    }
}

/// Bucket realized outcomes by the month of their effective close date.
///
/// Outcomes with no parseable close date are left out. Months are returned
/// in ascending order.
pub fn monthly_performance(
    trades: &[AttributedTrade<'_>],
    method: AnnualizationMethod,
    top_limit: usize,
    today: NaiveDate,
) -> Vec<MonthlyPerformance> {
    let mut buckets: BTreeMap<(i32, u32), Vec<&AttributedTrade<'_>>> = BTreeMap::new();
    for trade in trades {
        if let Some(close) = trade.close_date {
            buckets
                .entry((close.year(), close.month()))
                .or_default()
                .push(trade);
        }
    }

    buckets
        .into_iter()
        .filter_map(|((year, month), trades)| {
            let month_start = NaiveDate::from_ymd_opt(year, month, 1)?;
            let totals = PeriodTotals::from_trades(&trades);
            let elapsed = elapsed_days(month_start, today);
            let annualized_ror = annualize_period(method, &totals, elapsed, &trades);
            Some(MonthlyPerformance {
                month: format!("{:04}-{:02}", year, month),
                year,
                month_number: month,
                elapsed_days: elapsed,
                annualized_ror,
                top_tickers: top_tickers(&trades, top_limit),
                totals,
            })
        })
        .collect()
}
