use chrono::NaiveDate;
use optionroll::domain::{
    Chain, ChainId, ChainStatus, Decimal, Direction, OptionKind, Snapshot, Symbol, Transaction,
    TransactionId, TransactionStatus,
};
use optionroll::engine::chains::{chain_collateral, chain_pnl};
use optionroll::engine::realization::{is_realized, realized_transactions, unrealized_pnl};
use optionroll::engine::{
    attributed_trades, build_report, check_chain_consistency, ChainBook, ChainIssue,
    EngineSettings, FixedClock,
};
use std::str::FromStr;

fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn put(id: &str, symbol: &str, open: &str, strike: &str) -> Transaction {
    Transaction::new(
        TransactionId::new(id),
        Symbol::new(symbol),
        open,
        "2024-03-15",
        OptionKind::Put,
        Direction::Sell,
        d(strike),
        d("2"),
        1,
        Decimal::zero(),
    )
}

fn chained(tx: Transaction, chain: &str) -> Transaction {
    tx.with_chain(ChainId::new(chain))
}

fn chain(id: &str, status: ChainStatus) -> Chain {
    Chain::new(ChainId::new(id), Symbol::new("AAPL"), status)
}

fn clock() -> FixedClock {
    FixedClock::on(NaiveDate::from_ymd_opt(2024, 6, 3).unwrap())
}

/// AAPL put rolled once, then closed in February; plus an unrelated MSFT trade
/// closed in January.
fn closed_chain_snapshot() -> Snapshot {
    let rolled = chained(
        put("a1", "AAPL", "2024-01-02", "150")
            .closed(TransactionStatus::Rolled, "2024-01-19", None)
            .with_profit_loss(d("75")),
        "c1",
    );
    let final_leg = chained(
        put("a2", "AAPL", "2024-01-19", "145")
            .closed(TransactionStatus::Closed, "2024-02-16", None)
            .with_profit_loss(d("264")),
        "c1",
    );
    let standalone = put("m1", "MSFT", "2024-01-05", "100")
        .closed(TransactionStatus::Closed, "2024-01-26", None)
        .with_profit_loss(d("50"));

    Snapshot::new(
        vec![rolled, standalone, final_leg],
        vec![chain("c1", ChainStatus::Closed)],
    )
}

#[test]
fn test_chain_pnl_sums_every_leg() {
    let snapshot = closed_chain_snapshot();
    assert_eq!(chain_pnl(&ChainId::new("c1"), &snapshot.transactions), d("339"));
}

#[test]
fn test_three_leg_chain_pnl() {
    let legs = vec![
        chained(
            put("a1", "AAPL", "2024-01-02", "150")
                .closed(TransactionStatus::Rolled, "2024-01-12", None)
                .with_profit_loss(d("75")),
            "c1",
        ),
        chained(
            put("a2", "AAPL", "2024-01-12", "150")
                .closed(TransactionStatus::Rolled, "2024-01-26", None)
                .with_profit_loss(Decimal::zero()),
            "c1",
        ),
        chained(
            put("a3", "AAPL", "2024-01-26", "150")
                .closed(TransactionStatus::Closed, "2024-02-09", None)
                .with_profit_loss(d("264")),
            "c1",
        ),
    ];
    let snapshot = Snapshot::new(legs, vec![chain("c1", ChainStatus::Closed)]);
    let book = ChainBook::new(&snapshot);
    let trades = attributed_trades(&snapshot, &book);

    assert_eq!(chain_pnl(&ChainId::new("c1"), &snapshot.transactions), d("339"));
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].legs.len(), 3);
    assert_eq!(trades[0].pnl, d("339"));
}

#[test]
fn test_closed_chain_collateral_is_largest_leg() {
    let snapshot = closed_chain_snapshot();
    assert_eq!(
        chain_collateral(&ChainId::new("c1"), &snapshot.transactions),
        d("15000")
    );
}

#[test]
fn test_closed_chain_counts_once_in_month_and_ticker() {
    let snapshot = closed_chain_snapshot();
    let report = build_report(&snapshot, &EngineSettings::default(), &clock());

    assert_eq!(report.monthly.len(), 2);
    let january = &report.monthly[0];
    assert_eq!(january.month, "2024-01");
    assert_eq!(january.totals.trade_count, 1);
    assert_eq!(january.totals.pnl, d("50"));

    // The chain lands in the month of its final close, never split.
    let february = &report.monthly[1];
    assert_eq!(february.month, "2024-02");
    assert_eq!(february.totals.trade_count, 1);
    assert_eq!(february.totals.pnl, d("339"));
    assert_eq!(february.top_tickers.by_pnl[0].symbol, Symbol::new("AAPL"));

    let aapl = report
        .stocks
        .iter()
        .find(|s| s.symbol == Symbol::new("AAPL"))
        .unwrap();
    assert_eq!(aapl.totals.trade_count, 1);
    assert_eq!(aapl.totals.pnl, d("339"));
    // 339 / 15000
    assert_eq!(aapl.totals.ror, d("2.26"));

    assert_eq!(report.portfolio.realized.trade_count, 2);
    assert_eq!(report.portfolio.realized.pnl, d("389"));
    assert_eq!(report.yearly.len(), 1);
    assert_eq!(report.yearly[0].totals.trade_count, 2);
}

#[test]
fn test_rolled_leg_realized_only_after_chain_closes() {
    let rolled = chained(
        put("a1", "AAPL", "2024-01-02", "150")
            .closed(TransactionStatus::Rolled, "2024-01-19", None)
            .with_profit_loss(d("75")),
        "c1",
    );
    let running = chained(
        put("a2", "AAPL", "2024-01-19", "145").with_profit_loss(d("120")),
        "c1",
    );

    let active = Snapshot::new(
        vec![rolled.clone(), running],
        vec![chain("c1", ChainStatus::Active)],
    );
    let book = ChainBook::new(&active);
    assert!(!is_realized(&active.transactions[0], &book));
    assert!(realized_transactions(&active, &book).is_empty());
    assert_eq!(unrealized_pnl(&active, &book), d("195"));

    let report = build_report(&active, &EngineSettings::default(), &clock());
    assert_eq!(report.portfolio.realized.trade_count, 0);
    assert_eq!(report.portfolio.realized.pnl, Decimal::zero());
    assert!(report.monthly.is_empty());

    let finished = chained(
        put("a2", "AAPL", "2024-01-19", "145")
            .closed(TransactionStatus::Closed, "2024-02-16", None)
            .with_profit_loss(d("264")),
        "c1",
    );
    let closed = Snapshot::new(
        vec![rolled, finished],
        vec![chain("c1", ChainStatus::Closed)],
    );
    let book = ChainBook::new(&closed);
    assert!(is_realized(&closed.transactions[0], &book));
    assert_eq!(realized_transactions(&closed, &book).len(), 2);
    assert_eq!(unrealized_pnl(&closed, &book), Decimal::zero());

    let report = build_report(&closed, &EngineSettings::default(), &clock());
    assert_eq!(report.portfolio.realized.trade_count, 1);
    assert_eq!(report.portfolio.realized.pnl, d("339"));
}

#[test]
fn test_missing_chain_list_means_unchained() {
    let orphan = chained(
        put("a1", "AAPL", "2024-01-02", "150")
            .closed(TransactionStatus::Closed, "2024-01-19", None)
            .with_profit_loss(d("75")),
        "ghost",
    );
    let snapshot: Snapshot = serde_json::from_value(serde_json::json!({
        "transactions": [serde_json::to_value(&orphan).unwrap()]
    }))
    .unwrap();

    let report = build_report(&snapshot, &EngineSettings::default(), &clock());
    assert_eq!(report.portfolio.realized.trade_count, 1);
    assert_eq!(report.portfolio.realized.pnl, d("75"));

    assert_eq!(
        check_chain_consistency(&snapshot),
        vec![ChainIssue::UnknownChain {
            transaction_id: TransactionId::new("a1"),
            chain_id: ChainId::new("ghost"),
        }]
    );
}

#[test]
fn test_recorded_status_disagreeing_with_legs_is_reported() {
    let snapshot = closed_chain_snapshot();
    let mut stale = snapshot.clone();
    stale.chains = vec![chain("c1", ChainStatus::Active), chain("c2", ChainStatus::Closed)];

    assert!(check_chain_consistency(&snapshot).is_empty());
    assert_eq!(
        check_chain_consistency(&stale),
        vec![
            ChainIssue::StatusMismatch {
                chain_id: ChainId::new("c1"),
                recorded: ChainStatus::Active,
                derived: ChainStatus::Closed,
            },
            ChainIssue::NoMembers {
                chain_id: ChainId::new("c2"),
            },
        ]
    );
}

#[test]
fn test_chain_wins_or_loses_by_aggregate_sign() {
    let losing_roll = chained(
        put("a1", "AAPL", "2024-01-02", "150")
            .closed(TransactionStatus::Rolled, "2024-01-19", None)
            .with_profit_loss(d("-100")),
        "c1",
    );
    let winning_close = chained(
        put("a2", "AAPL", "2024-01-19", "145")
            .closed(TransactionStatus::Closed, "2024-02-16", None)
            .with_profit_loss(d("150")),
        "c1",
    );
    let snapshot = Snapshot::new(
        vec![losing_roll, winning_close],
        vec![chain("c1", ChainStatus::Closed)],
    );

    let report = build_report(&snapshot, &EngineSettings::default(), &clock());

    let totals = [
        &report.monthly[0].totals,
        &report.stocks[0].totals,
        &report.portfolio.realized,
    ];
    for totals in totals {
        assert_eq!(totals.trade_count, 1);
        assert_eq!(totals.pnl, d("50"));
        assert_eq!(totals.wins, 1);
        assert_eq!(totals.losses, 0);
        assert_eq!(totals.win_rate, d("100"));
    }
    assert_eq!(report.monthly.len(), 1);
    assert_eq!(report.monthly[0].month, "2024-02");
}
