//! Property-based tests for quantum-collab
//!
//! Following ruchy/trueno/aprender pattern:
//! - Test ledger and lifecycle invariants over random call sequences
//! - Run with ProptestConfig::with_cases(100)
//! - Must complete in <30 seconds for pre-commit hook

use chrono::Utc;
use proptest::prelude::*;
use quantum_collab::auth::Identity;
use quantum_collab::config::{DeployConfig, SchedulerLimits};
use quantum_collab::scheduler::{
    CompletionPolicy, ExperimentDraft, ExperimentStatus, SchedulerContract,
};
use quantum_collab::token::TokenContract;
use quantum_collab::Error;

const OWNER: &str = "OWNER";
const ACCOUNTS: [&str; 4] = ["OWNER", "A", "B", "C"];

// ============================================================================
// Property Test Generators (Strategies)
// ============================================================================

#[derive(Debug, Clone)]
enum TokenOp {
    Mint {
        caller: usize,
        amount: u128,
        recipient: usize,
    },
    Transfer {
        caller: usize,
        amount: u128,
        sender: usize,
        recipient: usize,
    },
}

fn arb_token_op() -> impl Strategy<Value = TokenOp> {
    prop_oneof![
        (0..4usize, 0..1_000u128, 0..4usize).prop_map(|(caller, amount, recipient)| {
            TokenOp::Mint {
                caller,
                amount,
                recipient,
            }
        }),
        (0..4usize, 0..1_500u128, 0..4usize, 0..4usize).prop_map(
            |(caller, amount, sender, recipient)| TokenOp::Transfer {
                caller,
                amount,
                sender,
                recipient,
            }
        ),
    ]
}

#[derive(Debug, Clone, Copy)]
enum LifecycleOp {
    Start { caller: usize, id: u64 },
    Complete { caller: usize, id: u64 },
}

fn arb_lifecycle_op() -> impl Strategy<Value = LifecycleOp> {
    prop_oneof![
        (0..4usize, 1..6u64).prop_map(|(caller, id)| LifecycleOp::Start { caller, id }),
        (0..4usize, 1..6u64).prop_map(|(caller, id)| LifecycleOp::Complete { caller, id }),
    ]
}

fn id(index: usize) -> Identity {
    Identity::from(ACCOUNTS[index])
}

fn balances(token: &TokenContract) -> Vec<u128> {
    ACCOUNTS
        .iter()
        .map(|a| token.get_balance(&Identity::from(*a)))
        .collect()
}

const fn rank(status: ExperimentStatus) -> u8 {
    match status {
        ExperimentStatus::Scheduled => 0,
        ExperimentStatus::InProgress => 1,
        ExperimentStatus::Completed => 2,
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: total supply equals the sum of balances after every call
    #[test]
    fn prop_conservation(ops in proptest::collection::vec(arb_token_op(), 1..60)) {
        let mut token = TokenContract::deploy(&DeployConfig::new(OWNER));

        for op in ops {
            let _ = match op {
                TokenOp::Mint { caller, amount, recipient } => {
                    token.mint(&id(caller), amount, &id(recipient))
                }
                TokenOp::Transfer { caller, amount, sender, recipient } => {
                    token.transfer(&id(caller), amount, &id(sender), &id(recipient))
                }
            };
            let sum: u128 = token.ledger().accounts().map(|(_, b)| b).sum();
            prop_assert_eq!(sum, token.total_supply());
        }
    }

    /// Property: a rejected call leaves every balance unchanged
    #[test]
    fn prop_rejection_is_atomic(ops in proptest::collection::vec(arb_token_op(), 1..60)) {
        let mut token = TokenContract::deploy(&DeployConfig::new(OWNER));

        for op in ops {
            let before = balances(&token);
            let supply_before = token.total_supply();
            let result = match op {
                TokenOp::Mint { caller, amount, recipient } => {
                    token.mint(&id(caller), amount, &id(recipient))
                }
                TokenOp::Transfer { caller, amount, sender, recipient } => {
                    token.transfer(&id(caller), amount, &id(sender), &id(recipient))
                }
            };
            if result.is_err() {
                prop_assert_eq!(balances(&token), before);
                prop_assert_eq!(token.total_supply(), supply_before);
            }
        }
    }

    /// Property: transfers above the sender balance always fail with InsufficientBalance
    #[test]
    fn prop_overdraft_rejected(minted in 1..1_000u128, extra in 1..1_000u128) {
        let owner = Identity::from(OWNER);
        let a = Identity::from("A");
        let mut token = TokenContract::deploy(&DeployConfig::new(OWNER));
        token.mint(&owner, minted, &a).unwrap();

        let result = token.transfer(&a, minted + extra, &a, &owner);
        let is_insufficient = matches!(result, Err(Error::InsufficientBalance { .. }));
        prop_assert!(is_insufficient);
        prop_assert_eq!(token.get_balance(&a), minted);
        prop_assert_eq!(token.get_balance(&owner), 0);
    }

    /// Property: scheduled ids are strictly increasing and distinct
    #[test]
    fn prop_monotonic_ids(callers in proptest::collection::vec(0..4usize, 1..40)) {
        let mut scheduler = SchedulerContract::new(SchedulerLimits::default(), CompletionPolicy::Anyone);
        let mut last = 0u64;

        for caller in callers {
            let draft = ExperimentDraft::new("t", "d", Utc::now(), 60, vec![id(caller)]);
            let next = scheduler.schedule_experiment(&id(caller), draft).unwrap();
            prop_assert!(next > last);
            last = next;
        }
    }

    /// Property: status only moves forward, one step at a time, and only
    /// the creator can start
    #[test]
    fn prop_forward_only_lifecycle(ops in proptest::collection::vec(arb_lifecycle_op(), 1..80)) {
        let mut scheduler = SchedulerContract::new(SchedulerLimits::default(), CompletionPolicy::Anyone);
        for n in 0..5usize {
            let creator = id(n % ACCOUNTS.len());
            let draft = ExperimentDraft::new("t", "d", Utc::now(), 60, vec![id(0)]);
            scheduler.schedule_experiment(&creator, draft).unwrap();
        }

        for op in ops {
            let (target, result, creator) = match op {
                LifecycleOp::Start { caller, id: exp } => {
                    let creator = scheduler.get_experiment(exp).unwrap().creator().clone();
                    let before = scheduler.get_experiment(exp).unwrap().status();
                    let result = scheduler.start_experiment(&id(caller), exp);
                    if result.is_ok() {
                        prop_assert_eq!(before, ExperimentStatus::Scheduled);
                        prop_assert_eq!(&id(caller), &creator);
                    }
                    (exp, result.map(|_| before), creator)
                }
                LifecycleOp::Complete { caller, id: exp } => {
                    let creator = scheduler.get_experiment(exp).unwrap().creator().clone();
                    let before = scheduler.get_experiment(exp).unwrap().status();
                    let result = scheduler.complete_experiment(&id(caller), exp);
                    if result.is_ok() {
                        prop_assert_eq!(before, ExperimentStatus::InProgress);
                    }
                    (exp, result.map(|_| before), creator)
                }
            };

            let after = scheduler.get_experiment(target).unwrap();
            prop_assert_eq!(after.creator(), &creator);
            if let Ok(before) = result {
                prop_assert_eq!(rank(after.status()), rank(before) + 1);
            }
        }
    }
}
