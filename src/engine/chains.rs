//! Chain-aware P&L attribution for rolled positions.

use crate::domain::{
    ChainId, ChainStatus, Decimal, Snapshot, Symbol, Transaction, TransactionId, TransactionStatus,
};
use crate::engine::dates::parse_calendar_date;
use crate::engine::returns::ror_from;
use crate::engine::valuation::{collateral, effective_pnl};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

/// Index of chain statuses and chain membership for one snapshot.
///
/// A chain id with no chain record is treated as unchained, so a snapshot
/// without chains behaves exactly like one where no rolls happened.
pub struct ChainBook<'a> {
    statuses: BTreeMap<ChainId, ChainStatus>,
    /// Members per known chain, in input order.
    members: BTreeMap<ChainId, Vec<&'a Transaction>>,
}

impl<'a> ChainBook<'a> {
    pub fn new(snapshot: &'a Snapshot) -> Self {
        let statuses: BTreeMap<ChainId, ChainStatus> = snapshot
            .chains
            .iter()
            .map(|chain| (chain.id.clone(), chain.status))
            .collect();

        let mut members: BTreeMap<ChainId, Vec<&'a Transaction>> = BTreeMap::new();
        for tx in &snapshot.transactions {
            if let Some(chain_id) = tx.chain_id.as_ref().filter(|id| statuses.contains_key(*id)) {
                members.entry(chain_id.clone()).or_default().push(tx);
            }
        }

        ChainBook { statuses, members }
    }

    pub fn chain_status(&self, chain_id: &ChainId) -> Option<ChainStatus> {
        self.statuses.get(chain_id).copied()
    }

    /// The chain a transaction belongs to, if it references a known chain.
    pub fn chain_of(&self, tx: &Transaction) -> Option<(&ChainId, ChainStatus)> {
        let chain_id = tx.chain_id.as_ref()?;
        let (id, status) = self.statuses.get_key_value(chain_id)?;
        Some((id, *status))
    }

    pub fn members(&self, chain_id: &ChainId) -> &[&'a Transaction] {
        self.members
            .get(chain_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Sum of P&L across every leg sharing the chain id.
pub fn chain_pnl(chain_id: &ChainId, transactions: &[Transaction]) -> Decimal {
    transactions
        .iter()
        .filter(|tx| tx.chain_id.as_ref() == Some(chain_id))
        .map(effective_pnl)
        .sum()
}

/// Capital at risk for a chain.
///
/// Only Open legs tie up capital. Once no Open leg remains, the largest
/// single-leg collateral stands in for the chain's peak commitment.
pub fn chain_collateral(chain_id: &ChainId, transactions: &[Transaction]) -> Decimal {
    let legs: Vec<&Transaction> = transactions
        .iter()
        .filter(|tx| tx.chain_id.as_ref() == Some(chain_id))
        .collect();
    legs_collateral(&legs)
}

fn legs_pnl(legs: &[&Transaction]) -> Decimal {
    legs.iter().map(|tx| effective_pnl(tx)).sum()
}

fn legs_collateral(legs: &[&Transaction]) -> Decimal {
    let open: Vec<Decimal> = legs
        .iter()
        .filter(|tx| tx.status == TransactionStatus::Open)
        .map(|tx| collateral(tx))
        .collect();

    if open.is_empty() {
        legs.iter()
            .map(|tx| collateral(tx))
            .max()
            .unwrap_or_else(Decimal::zero)
    } else {
        open.into_iter().sum()
    }
}

fn latest_close(legs: &[&Transaction]) -> Option<NaiveDate> {
    legs.iter()
        .filter_map(|tx| tx.close_date().and_then(parse_calendar_date))
        .max()
}

fn earliest_open(legs: &[&Transaction]) -> Option<NaiveDate> {
    legs.iter()
        .filter_map(|tx| parse_calendar_date(&tx.open_date))
        .min()
}

/// Date a transaction's P&L is attributed to.
///
/// Legs of a Closed chain all land on the chain's latest close date so the
/// whole chain is reported in the month it finally closed.
pub fn effective_close_date(tx: &Transaction, book: &ChainBook<'_>) -> Option<NaiveDate> {
    match book.chain_of(tx) {
        Some((chain_id, ChainStatus::Closed)) => latest_close(book.members(chain_id)),
        _ => tx.close_date().and_then(parse_calendar_date),
    }
}

/// Chain status implied by the legs: Closed iff the final leg (latest open
/// date, later input breaking ties) has a terminal status.
pub fn derive_chain_status(legs: &[&Transaction]) -> Option<ChainStatus> {
    let final_leg = legs
        .iter()
        .max_by_key(|tx| parse_calendar_date(&tx.open_date))?;
    if final_leg.status.is_terminal() {
        Some(ChainStatus::Closed)
    } else {
        Some(ChainStatus::Active)
    }
}

/// A disagreement between chain records and the legs that reference them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainIssue {
    #[error("chain {chain_id} recorded as {recorded:?} but legs imply {derived:?}")]
    StatusMismatch {
        chain_id: ChainId,
        recorded: ChainStatus,
        derived: ChainStatus,
    },
    #[error("chain {chain_id} has no legs")]
    NoMembers { chain_id: ChainId },
    #[error("transaction {transaction_id} references unknown chain {chain_id}")]
    UnknownChain {
        transaction_id: TransactionId,
        chain_id: ChainId,
    },
}

/// Report chain records that disagree with their legs. Never alters numbers.
pub fn check_chain_consistency(snapshot: &Snapshot) -> Vec<ChainIssue> {
    let book = ChainBook::new(snapshot);
    let mut issues = Vec::new();

    for chain in &snapshot.chains {
        match derive_chain_status(book.members(&chain.id)) {
            None => issues.push(ChainIssue::NoMembers {
                chain_id: chain.id.clone(),
            }),
            Some(derived) if derived != chain.status => issues.push(ChainIssue::StatusMismatch {
                chain_id: chain.id.clone(),
                recorded: chain.status,
                derived,
            }),
            Some(_) => {}
        }
    }

    for tx in &snapshot.transactions {
        if let Some(chain_id) = &tx.chain_id {
            if book.chain_status(chain_id).is_none() {
                issues.push(ChainIssue::UnknownChain {
                    transaction_id: tx.id.clone(),
                    chain_id: chain_id.clone(),
                });
            }
        }
    }

    issues
}

/// One realized economic outcome: a standalone closed leg, or a whole
/// Closed chain collapsed into a single entry.
#[derive(Debug, Clone)]
pub struct AttributedTrade<'a> {
    pub symbol: Symbol,
    pub chain_id: Option<ChainId>,
    pub pnl: Decimal,
    pub collateral: Decimal,
    pub open_date: Option<NaiveDate>,
    /// Effective close date used for period bucketing.
    pub close_date: Option<NaiveDate>,
    pub legs: Vec<&'a Transaction>,
}

impl<'a> AttributedTrade<'a> {
    fn standalone(tx: &'a Transaction) -> Self {
        AttributedTrade {
            symbol: tx.symbol.clone(),
            chain_id: None,
            pnl: effective_pnl(tx),
            collateral: collateral(tx),
            open_date: parse_calendar_date(&tx.open_date),
            close_date: tx.close_date().and_then(parse_calendar_date),
            legs: vec![tx],
        }
    }

    fn chain(chain_id: &ChainId, legs: &[&'a Transaction]) -> Self {
        let symbol = legs
            .first()
            .map(|tx| tx.symbol.clone())
            .unwrap_or_else(|| Symbol::new(""));
        AttributedTrade {
            symbol,
            chain_id: Some(chain_id.clone()),
            pnl: legs_pnl(legs),
            collateral: legs_collateral(legs),
            open_date: earliest_open(legs),
            close_date: latest_close(legs),
            legs: legs.to_vec(),
        }
    }

    pub fn ror(&self) -> Decimal {
        ror_from(self.pnl, self.collateral)
    }

    pub fn is_win(&self) -> bool {
        self.pnl.is_positive()
    }

    /// Calendar days from first open to effective close, clamped at zero.
    pub fn days_held(&self) -> Option<i64> {
        match (self.open_date, self.close_date) {
            (Some(open), Some(close)) => Some((close - open).num_days().max(0)),
            _ => None,
        }
    }
}

/// Chain-aware stream of realized outcomes.
///
/// Each Closed chain is emitted exactly once, at its first leg in input
/// order. Legs of Active chains and unchained Open/Rolled legs are skipped.
pub fn attributed_trades<'a>(snapshot: &'a Snapshot, book: &ChainBook<'a>) -> Vec<AttributedTrade<'a>> {
    let mut processed: HashSet<&ChainId> = HashSet::new();
    let mut trades = Vec::new();

    for tx in &snapshot.transactions {
        match book.chain_of(tx) {
            Some((chain_id, ChainStatus::Closed)) => {
                if processed.insert(chain_id) {
                    let legs = book.members(chain_id);
                    tracing::debug!(chain = %chain_id, legs = legs.len(), "Collapsing closed chain");
                    trades.push(AttributedTrade::chain(chain_id, legs));
                }
            }
            Some((_, ChainStatus::Active)) => {}
            None if tx.status.is_terminal() => trades.push(AttributedTrade::standalone(tx)),
            None => {}
        }
    }

    trades
}
