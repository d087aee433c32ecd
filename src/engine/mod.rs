//! Pure calculation engine over a caller-supplied snapshot.
//!
//! Nothing here performs I/O or holds shared state; "today" and "now" come
//! from an injected [`Clock`].

pub mod aggregate;
pub mod chains;
pub mod dates;
pub mod realization;
pub mod report;
pub mod returns;
pub mod valuation;

pub use chains::{attributed_trades, check_chain_consistency, AttributedTrade, ChainBook, ChainIssue};
pub use dates::{Clock, FixedClock, SystemClock};
pub use report::{build_report, transaction_metrics, PerformanceReport, TransactionMetrics};
pub use returns::{AnnualizationMethod, AnnualizedRoR};

/// Default number of tickers kept in each top-ticker ranking.
pub const DEFAULT_TOP_TICKER_LIMIT: usize = 5;

/// Immutable knobs for report building.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    pub annualization: AnnualizationMethod,
    pub top_ticker_limit: usize,
}

impl EngineSettings {
    pub fn with_annualization(mut self, annualization: AnnualizationMethod) -> Self {
        self.annualization = annualization;
        self
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            annualization: AnnualizationMethod::default(),
            top_ticker_limit: DEFAULT_TOP_TICKER_LIMIT,
        }
    }
}
