//! Contract benchmarks
//!
//! - Random mint/transfer workloads over the Ledger Store
//! - Full experiment lifecycle through the scheduler
//! - JSON call dispatch overhead
//!
//! Toyota Way: Measure before optimizing (Genchi Genbutsu)

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use quantum_collab::auth::Identity;
use quantum_collab::config::{DeployConfig, SchedulerLimits};
use quantum_collab::scheduler::{CompletionPolicy, ExperimentDraft, SchedulerContract};
use quantum_collab::token::TokenContract;
use quantum_collab::Runtime;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;

const OWNER: &str = "ST1OWNER";

/// Token contract with `accounts` funded accounts
fn funded_token(accounts: usize) -> (TokenContract, Vec<Identity>) {
    let owner = Identity::from(OWNER);
    let mut token = TokenContract::deploy(&DeployConfig::new(owner.clone()));
    let ids: Vec<Identity> = (0..accounts).map(|i| Identity::new(format!("ST{i}"))).collect();
    for id in &ids {
        token.mint(&owner, 1_000_000, id).unwrap();
    }
    (token, ids)
}

/// Benchmark random transfers between funded accounts
fn bench_transfers(c: &mut Criterion) {
    let mut group = c.benchmark_group("random_transfers");

    for accounts in [10, 1_000, 100_000].iter() {
        let (token, ids) = funded_token(*accounts);
        let mut rng = StdRng::seed_from_u64(42);
        let pairs: Vec<(usize, usize, u128)> = (0..1_000)
            .map(|_| {
                (
                    rng.gen_range(0..ids.len()),
                    rng.gen_range(0..ids.len()),
                    rng.gen_range(1..100),
                )
            })
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(accounts), accounts, |b, _| {
            b.iter(|| {
                let mut token = token.clone();
                for (from, to, amount) in &pairs {
                    let _ = black_box(token.transfer(&ids[*from], *amount, &ids[*from], &ids[*to]));
                }
            });
        });
    }

    group.finish();
}

/// Benchmark schedule → start → complete
fn bench_lifecycle(c: &mut Criterion) {
    let creator = Identity::from(OWNER);

    c.bench_function("experiment_lifecycle", |b| {
        b.iter(|| {
            let mut scheduler =
                SchedulerContract::new(SchedulerLimits::default(), CompletionPolicy::Anyone);
            for _ in 0..100 {
                let draft = ExperimentDraft::new(
                    "Bell test",
                    "CHSH inequality",
                    Utc::now(),
                    3600,
                    vec![creator.clone()],
                );
                let id = scheduler.schedule_experiment(&creator, draft).unwrap();
                scheduler.start_experiment(&creator, id).unwrap();
                scheduler.complete_experiment(&creator, id).unwrap();
            }
            black_box(scheduler);
        });
    });
}

/// Benchmark JSON dispatch against the typed call it wraps
fn bench_dispatch(c: &mut Criterion) {
    let owner = Identity::from(OWNER);
    let mut runtime = Runtime::builder(OWNER).build().unwrap();
    runtime
        .call(&owner, "quantum-token", "mint", &[json!(1_000), json!(OWNER)])
        .unwrap();
    let args = [json!(OWNER)];

    c.bench_function("dispatch_get_balance", |b| {
        b.iter(|| {
            let balance = runtime
                .call(&owner, "quantum-token", "get-balance", black_box(&args))
                .unwrap();
            black_box(balance);
        });
    });
}

criterion_group!(benches, bench_transfers, bench_lifecycle, bench_dispatch);
criterion_main!(benches);
