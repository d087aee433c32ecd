//! Domain primitives: identifiers, Symbol, OptionKind, Direction, statuses.

use serde::{Deserialize, Serialize};

/// Transaction identifier as issued by storage.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TransactionId(pub String);

impl TransactionId {
    pub fn new(id: impl Into<String>) -> Self {
        TransactionId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Roll chain identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChainId(pub String);

impl ChainId {
    pub fn new(id: impl Into<String>) -> Self {
        ChainId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Underlying ticker symbol (e.g., "AAPL").
///
/// Normalized to trimmed upper case so "aapl " and "AAPL" aggregate together.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    pub fn new(symbol: impl AsRef<str>) -> Self {
        Symbol(symbol.as_ref().trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Symbol {
    fn from(value: String) -> Self {
        Symbol::new(value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Option contract kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    Call,
    Put,
}

/// Trade direction: Buy (long the option) or Sell (short the option).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Premium paid.
    Buy,
    /// Premium received.
    Sell,
}

impl Direction {
    /// Sign of the opening cash flow: -1 for Buy (debit), +1 for Sell (credit).
    pub fn premium_sign(&self) -> i64 {
        match self {
            Direction::Buy => -1,
            Direction::Sell => 1,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Buy => write!(f, "buy"),
            Direction::Sell => write!(f, "sell"),
        }
    }
}

/// Lifecycle status of a single option leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Open,
    Closed,
    Expired,
    Assigned,
    /// Closed out and replaced by a new leg in the same chain.
    Rolled,
}

impl TransactionStatus {
    /// Closed, Expired and Assigned are final outcomes.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TransactionStatus::Closed | TransactionStatus::Expired | TransactionStatus::Assigned
        )
    }

    /// Open and Rolled legs are still part of a live economic position.
    pub fn is_ongoing(&self) -> bool {
        matches!(self, TransactionStatus::Open | TransactionStatus::Rolled)
    }
}

/// Status of a roll chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainStatus {
    Active,
    Closed,
}
