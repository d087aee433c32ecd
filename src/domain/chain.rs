//! Roll chain record and the engine's input snapshot.

use crate::domain::{ChainId, ChainStatus, Decimal, Symbol, Transaction, TransactionId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// A sequence of rolled legs representing one continuous strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chain {
    pub id: ChainId,
    pub symbol: Symbol,
    pub status: ChainStatus,
    /// Display only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_strike: Option<Decimal>,
    /// Display only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_open_date: Option<String>,
}

impl Chain {
    pub fn new(id: ChainId, symbol: Symbol, status: ChainStatus) -> Self {
        Chain {
            id,
            symbol,
            status,
            original_strike: None,
            original_open_date: None,
        }
    }
}

/// Immutable input to every engine computation.
///
/// A missing `chains` list means no chains exist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub chains: Vec<Chain>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("Duplicate transaction id: {0}")]
    DuplicateTransaction(TransactionId),
    #[error("Duplicate chain id: {0}")]
    DuplicateChain(ChainId),
}

impl Snapshot {
    pub fn new(transactions: Vec<Transaction>, chains: Vec<Chain>) -> Self {
        Snapshot {
            transactions,
            chains,
        }
    }

    /// Identifiers must be unique within their collection.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let mut seen = BTreeSet::new();
        for tx in &self.transactions {
            if !seen.insert(&tx.id) {
                return Err(SnapshotError::DuplicateTransaction(tx.id.clone()));
            }
        }

        let mut seen = BTreeSet::new();
        for chain in &self.chains {
            if !seen.insert(&chain.id) {
                return Err(SnapshotError::DuplicateChain(chain.id.clone()));
            }
        }
        Ok(())
    }
}
