use std::thread;

use mint_ledger::{
    account::{AccountKind, AccountStatus, Owner},
    engine::{TransferEngine, locking_engine::LockingTransferEngine},
    registry::AccountRegistry,
};
use rust_decimal::Decimal;

fn open(registry: &AccountRegistry, balance: i64, kind: AccountKind) -> String {
    registry
        .create(
            Owner::new("Ivan", "Ivanov"),
            Decimal::from(balance),
            "BYN",
            kind,
            AccountStatus::Active,
        )
        .unwrap()
        .id()
        .to_string()
}

fn balance(registry: &AccountRegistry, id: &str) -> Decimal {
    registry.find_by_identifier(id).unwrap().balance()
}

#[test]
fn concurrent_unit_transfers() {
    let registry = AccountRegistry::default();
    let engine = LockingTransferEngine::new(&registry);
    let source = open(&registry, 1000, AccountKind::Emission);
    let destination = open(&registry, 0, AccountKind::Destruction);

    let succeeded = thread::scope(|s| {
        let handles: Vec<_> = (0..1000)
            .map(|_| s.spawn(|| engine.transfer(&source, &destination, Decimal::ONE).is_ok()))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|ok| *ok)
            .count()
    });

    assert_eq!(succeeded, 1000);
    assert_eq!(balance(&registry, &source), Decimal::ZERO);
    assert_eq!(balance(&registry, &destination), Decimal::from(1000));
}

#[test]
fn no_double_spend_when_oversubscribed() {
    let registry = AccountRegistry::default();
    let engine = LockingTransferEngine::new(&registry);
    let source = open(&registry, 300, AccountKind::Individual);
    let destination = open(&registry, 0, AccountKind::Individual);

    let succeeded = thread::scope(|s| {
        let handles: Vec<_> = (0..500)
            .map(|_| s.spawn(|| engine.transfer(&source, &destination, Decimal::ONE).is_ok()))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|ok| *ok)
            .count()
    });

    assert_eq!(succeeded, 300);
    assert_eq!(balance(&registry, &source), Decimal::ZERO);
    assert_eq!(balance(&registry, &destination), Decimal::from(300));
}

#[test]
fn opposite_transfers_do_not_deadlock_and_conserve_money() {
    let registry = AccountRegistry::default();
    let engine = LockingTransferEngine::new(&registry);
    let ids: Vec<_> = (0..4)
        .map(|_| open(&registry, 100, AccountKind::Individual))
        .collect();
    let total = registry.total_balance();

    thread::scope(|s| {
        for worker in 0..8 {
            let ids = &ids;
            s.spawn(move || {
                for round in 0..200 {
                    let from = &ids[(worker + round) % ids.len()];
                    let to = &ids[(worker + round + 1 + worker % 2) % ids.len()];
                    // failures are fine, only the invariants matter here
                    let _ = engine.transfer(from, to, Decimal::from(7));
                    let _ = engine.transfer(to, from, Decimal::from(3));
                }
            });
        }
        // snapshots taken mid-flight must already be consistent
        for _ in 0..50 {
            assert_eq!(registry.total_balance(), total);
        }
    });

    assert_eq!(registry.total_balance(), total);
    for acc in registry.accounts() {
        assert!(acc.balance() >= Decimal::ZERO);
    }
}

#[test]
fn concurrent_account_creation() {
    let registry = AccountRegistry::default();
    thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| {
                for _ in 0..50 {
                    registry
                        .open_individual(Owner::new("Ivan", "Ivanov"), Decimal::ONE)
                        .unwrap();
                }
            });
        }
    });

    let mut ids: Vec<_> = registry
        .accounts()
        .iter()
        .map(|acc| acc.id().to_string())
        .collect();
    assert_eq!(ids.len(), 400);
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 400);
    assert_eq!(registry.total_balance(), Decimal::from(400));
}
