//! Persisted state layout
//!
//! Each contract's state is written to a [`KvStore`] under primitive keys:
//!
//! ```text
//! quantum-token/owner                    "ST1..."          (JSON string)
//! quantum-token/metadata                 {name,symbol,decimals}
//! quantum-token/token-uri                "https://..."
//! quantum-token/total-supply             "100"             (decimal string)
//! quantum-token/accounts                 ["ST1...", ...]   (sorted index)
//! quantum-token/balance/<identity>       "100"
//! experiment-scheduler/next-id           3
//! experiment-scheduler/experiment/<id>   Experiment record
//! ```
//!
//! Experiment ids are dense (`1..next_id`) and never deleted, so the
//! scheduler needs no separate index. Deploy-time limits and policy are not
//! state; loaders take them from a [`DeployConfig`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::auth::Identity;
use crate::config::{DeployConfig, TokenMetadata};
use crate::kv::KvStore;
use crate::runtime::Runtime;
use crate::scheduler::{Experiment, ExperimentRegistry, SchedulerContract};
use crate::token::{LedgerStore, TokenContract};
use crate::{Error, Result};

const TOKEN_OWNER: &str = "quantum-token/owner";
const TOKEN_METADATA: &str = "quantum-token/metadata";
const TOKEN_URI: &str = "quantum-token/token-uri";
const TOKEN_SUPPLY: &str = "quantum-token/total-supply";
const TOKEN_ACCOUNTS: &str = "quantum-token/accounts";
const SCHEDULER_NEXT_ID: &str = "experiment-scheduler/next-id";

fn balance_key(account: &Identity) -> String {
    format!("quantum-token/balance/{account}")
}

fn experiment_key(id: u64) -> String {
    format!("experiment-scheduler/experiment/{id}")
}

#[derive(Serialize, Deserialize)]
struct StoredMetadata {
    name: String,
    symbol: String,
    decimals: u8,
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

async fn read<S: KvStore, T: DeserializeOwned>(store: &S, key: &str) -> Result<T> {
    let bytes = store
        .get(key)
        .await?
        .ok_or_else(|| Error::Storage(format!("missing key {key}")))?;
    Ok(serde_json::from_slice(&bytes)?)
}

async fn read_amount<S: KvStore>(store: &S, key: &str) -> Result<u128> {
    let text: String = read(store, key).await?;
    text.parse()
        .map_err(|_| Error::Storage(format!("key {key} holds non-numeric amount {text:?}")))
}

/// Write the token contract's state.
///
/// # Errors
///
/// Propagates store and serialization failures.
pub async fn save_token<S: KvStore>(token: &TokenContract, store: &S) -> Result<()> {
    let ledger = token.ledger();
    let mut accounts: Vec<(&Identity, u128)> = ledger.accounts().collect();
    accounts.sort_by(|a, b| a.0.cmp(b.0));

    let metadata = token.metadata();
    let mut pairs = vec![
        (TOKEN_OWNER.to_string(), encode(token.owner())?),
        (
            TOKEN_METADATA.to_string(),
            encode(&StoredMetadata {
                name: metadata.name.clone(),
                symbol: metadata.symbol.clone(),
                decimals: metadata.decimals,
            })?,
        ),
        (TOKEN_URI.to_string(), encode(&metadata.token_uri)?),
        (
            TOKEN_SUPPLY.to_string(),
            encode(&ledger.total_supply().to_string())?,
        ),
        (
            TOKEN_ACCOUNTS.to_string(),
            encode(&accounts.iter().map(|(id, _)| *id).collect::<Vec<_>>())?,
        ),
    ];
    for (account, balance) in &accounts {
        pairs.push((balance_key(account), encode(&balance.to_string())?));
    }

    debug!(accounts = accounts.len(), "saving token state");
    store.batch_set(pairs).await
}

/// Read the token contract's state back.
///
/// # Errors
///
/// [`Error::Storage`] for missing keys or balances that do not sum to the
/// stored supply; [`Error::Serialization`] for malformed values.
pub async fn load_token<S: KvStore>(store: &S, config: &DeployConfig) -> Result<TokenContract> {
    let owner: Identity = read(store, TOKEN_OWNER).await?;
    let stored: StoredMetadata = read(store, TOKEN_METADATA).await?;
    let token_uri: String = read(store, TOKEN_URI).await?;
    let total_supply = read_amount(store, TOKEN_SUPPLY).await?;
    let accounts: Vec<Identity> = read(store, TOKEN_ACCOUNTS).await?;

    let mut balances = Vec::with_capacity(accounts.len());
    for account in accounts {
        let balance = read_amount(store, &balance_key(&account)).await?;
        balances.push((account, balance));
    }
    let ledger = LedgerStore::from_parts(balances, total_supply)?;

    let metadata = TokenMetadata {
        name: stored.name,
        symbol: stored.symbol,
        decimals: stored.decimals,
        token_uri,
    };
    debug!(%owner, accounts = ledger.account_count(), "token state loaded");
    Ok(TokenContract::from_parts(
        owner,
        ledger,
        metadata,
        config.token_uri_max_len,
    ))
}

/// Write the scheduler contract's state.
///
/// # Errors
///
/// Propagates store and serialization failures.
pub async fn save_scheduler<S: KvStore>(scheduler: &SchedulerContract, store: &S) -> Result<()> {
    let registry = scheduler.registry();
    let mut pairs = vec![(SCHEDULER_NEXT_ID.to_string(), encode(&registry.next_id())?)];
    for experiment in registry.experiments() {
        pairs.push((experiment_key(experiment.id()), encode(experiment)?));
    }

    debug!(experiments = registry.len(), "saving scheduler state");
    store.batch_set(pairs).await
}

/// Read the scheduler contract's state back.
///
/// # Errors
///
/// [`Error::Storage`] for a missing record in `1..next_id` or a record whose
/// id disagrees with its key; [`Error::Serialization`] for malformed values.
pub async fn load_scheduler<S: KvStore>(
    store: &S,
    config: &DeployConfig,
) -> Result<SchedulerContract> {
    let next_id: u64 = read(store, SCHEDULER_NEXT_ID).await?;
    if next_id == 0 {
        return Err(Error::Storage("next-id must be at least 1".to_string()));
    }

    let mut records = Vec::new();
    for id in 1..next_id {
        let experiment: Experiment = read(store, &experiment_key(id)).await?;
        if experiment.id() != id {
            return Err(Error::Storage(format!(
                "record under key {id} carries id {}",
                experiment.id()
            )));
        }
        if experiment.duration() == 0 || experiment.locations().is_empty() {
            return Err(Error::Storage(format!(
                "experiment {id} needs a positive duration and at least one location"
            )));
        }
        records.push(experiment);
    }
    let registry = ExperimentRegistry::from_parts(records, next_id)?;

    debug!(experiments = registry.len(), "scheduler state loaded");
    Ok(SchedulerContract::from_registry(
        registry,
        config.scheduler,
        config.completion_policy,
    ))
}

/// Write both contracts.
///
/// # Errors
///
/// Propagates store and serialization failures.
pub async fn save_runtime<S: KvStore>(runtime: &Runtime, store: &S) -> Result<()> {
    save_token(runtime.token(), store).await?;
    save_scheduler(runtime.scheduler(), store).await
}

/// Read both contracts back into a runtime.
///
/// # Errors
///
/// See [`load_token`] and [`load_scheduler`].
pub async fn load_runtime<S: KvStore>(store: &S, config: &DeployConfig) -> Result<Runtime> {
    let token = load_token(store, config).await?;
    let scheduler = load_scheduler(store, config).await?;
    Ok(Runtime::from_contracts(token, scheduler))
}
