// End-to-end scenarios through the public API

use wealth_tracker::{InvestmentKind, InvestmentTag, UserId, WealthDirectory, WealthError};

fn max_net_worth(dir: &WealthDirectory) -> f64 {
    dir.all_users()
        .iter()
        .map(|u| u.net_worth)
        .fold(f64::NEG_INFINITY, f64::max)
}

#[test]
fn test_register_then_net_worth_is_zero() {
    let mut dir = WealthDirectory::new();
    let alice = dir.register_user("Alice").unwrap();
    assert_eq!(dir.net_worth(alice).unwrap(), 0.0);
}

#[test]
fn test_gold_minus_checkup() {
    let mut dir = WealthDirectory::new();
    let alice = dir.register_user("Alice").unwrap();
    let _bob = dir.register_user("Bob").unwrap();

    dir.set_asset_value(alice, "gold", 100.0).unwrap();
    dir.record_transaction(alice, "health", "checkup", 20.0, None)
        .unwrap();

    assert_eq!(dir.net_worth(alice).unwrap(), 80.0);
    assert_eq!(dir.top_user().unwrap().id(), alice);
}

#[test]
fn test_tie_broken_alphabetically() {
    let mut dir = WealthDirectory::new();
    let zara = dir.register_user("Zara").unwrap();
    let amy = dir.register_user("Amy").unwrap();
    let ben = dir.register_user("Ben").unwrap();

    dir.set_asset_value(zara, "gold", 50.0).unwrap();
    dir.set_asset_value(amy, "gold", 50.0).unwrap();
    dir.set_asset_value(ben, "gold", 30.0).unwrap();

    assert_eq!(dir.top_user().unwrap().name(), "Amy");
    assert!(dir.is_consistent());
}

#[test]
fn test_tie_break_ignores_insertion_order() {
    for names in [["Zara", "Amy"], ["Amy", "Zara"]] {
        let mut dir = WealthDirectory::new();
        for name in names {
            let id = dir.register_user(name).unwrap();
            dir.set_asset_value(id, "stock", 75.0).unwrap();
        }
        assert_eq!(dir.top_user().unwrap().name(), "Amy");
    }
}

#[test]
fn test_unknown_asset_is_not_found() {
    let mut dir = WealthDirectory::new();
    let alice = dir.register_user("Alice").unwrap();
    dir.set_asset_value(alice, "gold", 40.0).unwrap();

    let err = dir.set_asset_value(alice, "unobtainium", 1_000.0).unwrap_err();

    assert!(matches!(err, WealthError::NodeNotFound { .. }));
    assert_eq!(dir.net_worth(alice).unwrap(), 40.0);
}

#[test]
fn test_root_tracks_maximum_through_alternating_updates() {
    let mut dir = WealthDirectory::new();
    let users: Vec<UserId> = ["Ana", "Ben", "Cleo", "Dev", "Eli"]
        .iter()
        .map(|name| dir.register_user(name).unwrap())
        .collect();

    for step in 0..20 {
        let user = users[(step * 3) % users.len()];
        let amount = 10.0 + (step * 7 % 13) as f64 * 5.0;
        if step % 2 == 0 {
            dir.record_transaction(user, "salary", "pay", amount, None)
                .unwrap();
        } else {
            dir.record_transaction(user, "travel", "trip", amount * 1.5, None)
                .unwrap();
        }

        let top = dir.top_user().unwrap();
        assert_eq!(top.net_worth(), max_net_worth(&dir), "step {}", step);
        assert!(dir.is_consistent(), "step {}", step);
    }
}

#[test]
fn test_reconciliation_after_noop_mutation_keeps_order() {
    let mut dir = WealthDirectory::new();
    let ids: Vec<UserId> = ["Ana", "Ben", "Cleo"]
        .iter()
        .map(|name| dir.register_user(name).unwrap())
        .collect();
    dir.set_asset_value(ids[1], "gold", 10.0).unwrap();
    let before = dir.all_users();

    // Same value again: reconciliation runs, nothing moves
    let outcome = dir.set_asset_value(ids[1], "gold", 10.0).unwrap();

    assert!(!outcome.changed());
    assert_eq!(dir.all_users(), before);
}

#[test]
fn test_portfolio_and_projection() {
    let mut dir = WealthDirectory::new();
    let carol = dir.register_user("Carol").unwrap();

    dir.record_transaction(
        carol,
        "investment",
        "10 shares",
        300.0,
        Some(InvestmentTag::holding(InvestmentKind::Stocks, "AAPL")),
    )
    .unwrap();
    dir.set_asset_value(carol, "AAPL", 360.0).unwrap();
    dir.set_asset_rate(carol, "AAPL", 10.0).unwrap();
    dir.record_transaction(carol, "regular", "groceries", 60.0, None)
        .unwrap();

    assert_eq!(dir.net_worth(carol).unwrap(), 300.0);

    let report = dir.portfolio(carol).unwrap();
    let aapl = report.row("AAPL").unwrap();
    assert_eq!(aapl.cost_basis, 300.0);
    assert_eq!(aapl.market_value, 360.0);
    assert_eq!(report.total_gain(), 60.0);

    // 360 * 1.1 - 60
    let projected = dir.projected_net_worth(carol, 1).unwrap();
    assert!((projected - 336.0).abs() < 1e-9);
}

#[test]
fn test_ledger_is_newest_first() {
    let mut dir = WealthDirectory::new();
    let alice = dir.register_user("Alice").unwrap();
    dir.record_transaction(alice, "health", "checkup", 20.0, None)
        .unwrap();
    dir.record_transaction(alice, "travel", "bus", 3.0, None)
        .unwrap();

    let ledger = dir.ledger(alice).unwrap();
    let descriptions: Vec<&str> = ledger.iter().map(|r| r.description()).collect();
    assert_eq!(descriptions, vec!["bus", "checkup"]);
}

#[test]
fn test_shutdown_frees_everyone() {
    let mut dir = WealthDirectory::new();
    for name in ["Ana", "Ben", "Cleo"] {
        dir.register_user(name).unwrap();
    }
    let summary = dir.shutdown();
    assert_eq!(summary.users, 3);
    assert_eq!(summary.ledger_records, 0);
}
