//! Realized vs unrealized classification.
//!
//! Closed, Expired and Assigned legs are realized. A Rolled leg is realized
//! only once its chain is Closed. Everything in an Active chain, and every
//! unchained Open/Rolled leg, is still an open economic position.

use crate::domain::{ChainStatus, Decimal, Snapshot, Transaction, TransactionStatus};
use crate::engine::chains::ChainBook;
use crate::engine::valuation::effective_pnl;

pub fn is_realized(tx: &Transaction, book: &ChainBook<'_>) -> bool {
    match tx.status {
        TransactionStatus::Closed | TransactionStatus::Expired | TransactionStatus::Assigned => {
            true
        }
        TransactionStatus::Rolled => {
            matches!(book.chain_of(tx), Some((_, ChainStatus::Closed)))
        }
        TransactionStatus::Open => false,
    }
}

/// True when the leg's P&L is still a mark rather than an outcome.
pub fn is_unrealized(tx: &Transaction, book: &ChainBook<'_>) -> bool {
    match book.chain_of(tx) {
        Some((_, ChainStatus::Active)) => true,
        Some((_, ChainStatus::Closed)) => false,
        None => tx.status.is_ongoing(),
    }
}

/// Realized legs in input order.
pub fn realized_transactions<'a>(snapshot: &'a Snapshot, book: &ChainBook<'a>) -> Vec<&'a Transaction> {
    snapshot
        .transactions
        .iter()
        .filter(|tx| is_realized(tx, book))
        .collect()
}

/// Sum of marks over unchained Open/Rolled legs and every leg of an Active chain.
pub fn unrealized_pnl(snapshot: &Snapshot, book: &ChainBook<'_>) -> Decimal {
    snapshot
        .transactions
        .iter()
        .filter(|tx| is_unrealized(tx, book))
        .map(effective_pnl)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Chain, ChainId, Direction, OptionKind, Symbol, TransactionId};
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn tx(id: &str, status: TransactionStatus, pnl: &str, chain: Option<&str>) -> Transaction {
        let tx = Transaction::new(
            TransactionId::new(id),
            Symbol::new("SPY"),
            "2024-01-02",
            "2024-02-16",
            OptionKind::Put,
            Direction::Sell,
            d("450"),
            d("3"),
            1,
            Decimal::zero(),
        )
        .with_status(status)
        .with_profit_loss(d(pnl));
        match chain {
            Some(chain) => tx.with_chain(ChainId::new(chain)),
            None => tx,
        }
    }

    fn chain(id: &str, status: ChainStatus) -> Chain {
        Chain::new(ChainId::new(id), Symbol::new("SPY"), status)
    }

    #[test]
    fn test_terminal_statuses_are_realized() {
        let snapshot = Snapshot::new(
            vec![
                tx("a", TransactionStatus::Closed, "10", None),
                tx("b", TransactionStatus::Expired, "20", None),
                tx("c", TransactionStatus::Assigned, "30", None),
                tx("d", TransactionStatus::Open, "40", None),
                tx("e", TransactionStatus::Rolled, "50", None),
            ],
            vec![],
        );
        let book = ChainBook::new(&snapshot);
        let realized: Vec<&str> = realized_transactions(&snapshot, &book)
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(realized, vec!["a", "b", "c"]);
        assert_eq!(unrealized_pnl(&snapshot, &book), d("90"));
    }

    #[test]
    fn test_rolled_leg_follows_chain_status() {
        let legs = vec![
            tx("r", TransactionStatus::Rolled, "75", Some("c1")),
            tx("o", TransactionStatus::Open, "120", Some("c1")),
        ];

        let active = Snapshot::new(legs.clone(), vec![chain("c1", ChainStatus::Active)]);
        let book = ChainBook::new(&active);
        assert!(!is_realized(&active.transactions[0], &book));
        assert!(realized_transactions(&active, &book).is_empty());
        assert_eq!(unrealized_pnl(&active, &book), d("195"));

        let mut closed_legs = legs;
        closed_legs[1] = tx("o", TransactionStatus::Closed, "264", Some("c1"));
        let closed = Snapshot::new(closed_legs, vec![chain("c1", ChainStatus::Closed)]);
        let book = ChainBook::new(&closed);
        assert!(is_realized(&closed.transactions[0], &book));
        assert_eq!(realized_transactions(&closed, &book).len(), 2);
        assert_eq!(unrealized_pnl(&closed, &book), Decimal::zero());
    }

    #[test]
    fn test_rolled_leg_of_unknown_chain_stays_unrealized() {
        let snapshot = Snapshot::new(vec![tx("r", TransactionStatus::Rolled, "75", Some("gone"))], vec![]);
        let book = ChainBook::new(&snapshot);
        assert!(!is_realized(&snapshot.transactions[0], &book));
        assert_eq!(unrealized_pnl(&snapshot, &book), d("75"));
    }
}
