//! Transaction type representing a single option leg.

use crate::domain::{ChainId, Decimal, Direction, OptionKind, Symbol, TransactionId, TransactionStatus};
use serde::{Deserialize, Serialize};

/// A single option leg as supplied by storage.
///
/// Dates are kept as the raw strings storage hands us (`YYYY-MM-DD` or an ISO
/// timestamp); the date arithmetic layer owns lenient parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    pub symbol: Symbol,
    pub open_date: String,
    pub expiry_date: String,
    #[serde(rename = "optionType")]
    pub kind: OptionKind,
    pub direction: Direction,
    /// Strike price per share.
    pub strike: Decimal,
    /// Premium per share.
    pub premium: Decimal,
    pub contracts: u32,
    #[serde(default)]
    pub fees: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_date: Option<String>,
    /// Recorded profit/loss snapshot (fees already deducted).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit_loss: Option<Decimal>,
    /// Manual capital-at-risk for shapes strike/premium can't describe.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collateral_override: Option<Decimal>,
    pub status: TransactionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<ChainId>,
}

impl Transaction {
    /// Create a new Open transaction with no exit, close date or chain.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: TransactionId,
        symbol: Symbol,
        open_date: impl Into<String>,
        expiry_date: impl Into<String>,
        kind: OptionKind,
        direction: Direction,
        strike: Decimal,
        premium: Decimal,
        contracts: u32,
        fees: Decimal,
    ) -> Self {
        Transaction {
            id,
            symbol,
            open_date: open_date.into(),
            expiry_date: expiry_date.into(),
            kind,
            direction,
            strike,
            premium,
            contracts,
            fees,
            exit_price: None,
            close_date: None,
            profit_loss: None,
            collateral_override: None,
            status: TransactionStatus::Open,
            chain_id: None,
        }
    }

    /// Mark the leg as finished with the given terminal-or-rolled status.
    pub fn closed(
        mut self,
        status: TransactionStatus,
        close_date: impl Into<String>,
        exit_price: Option<Decimal>,
    ) -> Self {
        self.status = status;
        self.close_date = Some(close_date.into());
        self.exit_price = exit_price;
        self
    }

    pub fn with_status(mut self, status: TransactionStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_profit_loss(mut self, profit_loss: Decimal) -> Self {
        self.profit_loss = Some(profit_loss);
        self
    }

    pub fn with_chain(mut self, chain_id: ChainId) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    pub fn with_collateral_override(mut self, amount: Decimal) -> Self {
        self.collateral_override = Some(amount);
        self
    }

    /// Close date, ignoring blank strings storage sometimes emits.
    pub fn close_date(&self) -> Option<&str> {
        self.close_date
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
