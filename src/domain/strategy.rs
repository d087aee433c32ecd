//! Strategy classification for single-leg option trades.

use crate::domain::{Direction, OptionKind, Transaction};
use serde::{Deserialize, Serialize};

/// Strategy shape a transaction is reported under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StrategyKind {
    CashSecuredPut,
    CoveredCall,
    LongCall,
    LongPut,
    /// Reporting bucket for shapes outside the single-leg categories.
    Other,
}

impl StrategyKind {
    /// Classify by option kind and direction alone.
    pub fn from_shape(kind: OptionKind, direction: Direction) -> Self {
        match (kind, direction) {
            (OptionKind::Put, Direction::Sell) => StrategyKind::CashSecuredPut,
            (OptionKind::Call, Direction::Sell) => StrategyKind::CoveredCall,
            (OptionKind::Call, Direction::Buy) => StrategyKind::LongCall,
            (OptionKind::Put, Direction::Buy) => StrategyKind::LongPut,
        }
    }

    /// Classify a transaction by its (kind, direction) shape. A collateral
    /// override changes capital at risk, not the reported strategy.
    pub fn classify(tx: &Transaction) -> Self {
        Self::from_shape(tx.kind, tx.direction)
    }

    pub fn label(&self) -> &'static str {
        match self {
            StrategyKind::CashSecuredPut => "Cash-Secured Put",
            StrategyKind::CoveredCall => "Covered Call",
            StrategyKind::LongCall => "Long Call",
            StrategyKind::LongPut => "Long Put",
            StrategyKind::Other => "Other",
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
