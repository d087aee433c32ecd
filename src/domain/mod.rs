//! Domain types for the options trade-performance engine.
//!
//! This module provides:
//! - Lossless numeric handling via Decimal wrapper
//! - Identifiers and closed status/shape enums
//! - Transaction, Chain and the Snapshot the engine consumes
//! - Strategy classification

pub mod chain;
pub mod decimal;
pub mod primitives;
pub mod strategy;
pub mod transaction;

pub use chain::{Chain, Snapshot, SnapshotError};
pub use decimal::Decimal;
pub use primitives::{
    ChainId, ChainStatus, Direction, OptionKind, Symbol, TransactionId, TransactionStatus,
};
pub use strategy::StrategyKind;
pub use transaction::Transaction;
