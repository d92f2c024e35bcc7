//! Lab Session Example
//!
//! Walks one collaborative experiment through its lifecycle and pays the
//! participants from the token ledger, all through the string-addressed call
//! surface.
//!
//! Run with: RUST_LOG=quantum_collab=debug cargo run --example lab_session

use anyhow::Context;
use quantum_collab::auth::Identity;
use quantum_collab::config::DeployConfig;
use quantum_collab::kv::MemoryKvStore;
use quantum_collab::snapshot;
use quantum_collab::Runtime;
use serde_json::json;
use tracing_subscriber::EnvFilter;

const CONFIG: &str = r#"{
    "owner": "ST1LABADMIN",
    "token": { "name": "Quantum Token", "symbol": "QNT", "decimals": 6 },
    "completion_policy": "participants"
}"#;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== quantum-collab Lab Session ===\n");

    let config = DeployConfig::from_json(CONFIG).context("parsing deploy config")?;
    let mut runtime = Runtime::deploy(&config)?;

    let admin = Identity::from("ST1LABADMIN");
    let alice = Identity::from("ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM");
    let bob = Identity::from("ST2CY5V39NHDPWSXMW9QDT3HC3GD6Q6XX4CFRK9AG");

    // -------------------------------------------------------------------------
    // 1. Schedule an experiment
    // -------------------------------------------------------------------------
    println!("1. Scheduling experiment...");
    let id = runtime.call(
        &alice,
        "experiment-scheduler",
        "schedule-experiment",
        &[
            json!("Quantum Teleportation"),
            json!("Testing quantum teleportation across 100km"),
            json!(1_625_097_600_000_i64),
            json!(3600),
            json!([alice.as_str(), bob.as_str()]),
        ],
    )?;
    println!("   Experiment ID: {id}");

    // -------------------------------------------------------------------------
    // 2. Fund the participants
    // -------------------------------------------------------------------------
    println!("\n2. Minting rewards...");
    runtime.call(&admin, "quantum-token", "mint", &[json!(500), json!(alice.as_str())])?;
    println!(
        "   Alice balance: {}",
        runtime.call(&bob, "quantum-token", "get-balance", &[json!(alice.as_str())])?
    );

    // -------------------------------------------------------------------------
    // 3. Run the experiment
    // -------------------------------------------------------------------------
    println!("\n3. Running experiment...");
    if let Err(err) = runtime.call(&bob, "experiment-scheduler", "start-experiment", &[id.clone()]) {
        println!("   Bob cannot start it: {err} (code {})", err.code());
    }
    runtime.call(&alice, "experiment-scheduler", "start-experiment", &[id.clone()])?;
    runtime.call(&bob, "experiment-scheduler", "complete-experiment", &[id.clone()])?;
    let record = runtime.call(&bob, "experiment-scheduler", "get-experiment", &[id])?;
    println!("   Record: {}", serde_json::to_string_pretty(&record)?);

    // -------------------------------------------------------------------------
    // 4. Share the reward
    // -------------------------------------------------------------------------
    println!("\n4. Alice pays Bob a share...");
    runtime.call(
        &alice,
        "quantum-token",
        "transfer",
        &[json!(200), json!(alice.as_str()), json!(bob.as_str())],
    )?;
    if let Err(err) = runtime.call(
        &alice,
        "quantum-token",
        "transfer",
        &[json!(1_000_000), json!(alice.as_str()), json!(bob.as_str())],
    ) {
        println!("   Overdraft rejected: {err}");
    }
    println!(
        "   Supply: {}",
        runtime.call(&bob, "quantum-token", "get-total-supply", &[])?
    );

    // -------------------------------------------------------------------------
    // 5. Events and persistence
    // -------------------------------------------------------------------------
    println!("\n5. Events:");
    for event in runtime.drain_events() {
        println!("   {}", serde_json::to_string(&event)?);
    }

    let store = MemoryKvStore::new();
    snapshot::save_runtime(&runtime, &store).await?;
    let restored = snapshot::load_runtime(&store, &config).await?;
    println!(
        "\n   Snapshot: {} keys, restored supply {}",
        store.len(),
        restored.token().total_supply()
    );

    println!("\n=== Done ===");
    Ok(())
}
