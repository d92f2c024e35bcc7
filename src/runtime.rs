//! Call dispatch
//!
//! The hosting ledger runtime delivers calls as
//! `(contract_name, operation_name, ordered_argument_list)`. [`Runtime::call`]
//! decodes the arguments, invokes the typed contract operation and encodes the
//! success value. Arguments and results are JSON values:
//!
//! | Type | Encoding |
//! |---|---|
//! | uint | JSON number, or decimal string for values above `u64::MAX` |
//! | identity / text | JSON string |
//! | timestamp | JSON integer, milliseconds since the Unix epoch |
//! | list\<identity\> | JSON array of strings |
//! | absent record | `null` |
//!
//! Calls take `&mut self`, so the borrow checker enforces the serialized,
//! one-call-at-a-time execution model.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tracing::trace;

use crate::auth::Identity;
use crate::config::DeployConfig;
use crate::event::ContractEvent;
use crate::scheduler::{self, CompletionPolicy, ExperimentDraft, SchedulerContract};
use crate::token::{self, TokenContract};
use crate::{Error, Result};

/// Both contracts, deployed together and addressed by name.
///
/// Every successful mutation appends an event to the owning contract's
/// journal, and nothing on the call path clears it. A long-lived host must
/// call [`Runtime::drain_events`] periodically; [`Runtime::pending_events`]
/// reports how many are waiting.
#[derive(Debug, Clone)]
pub struct Runtime {
    token: TokenContract,
    scheduler: SchedulerContract,
}

impl Runtime {
    /// Start building a runtime whose token contract is owned by `owner`.
    #[must_use]
    pub fn builder(owner: impl Into<Identity>) -> RuntimeBuilder {
        RuntimeBuilder {
            config: DeployConfig::new(owner),
        }
    }

    /// Deploy both contracts from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the configuration is invalid.
    pub fn deploy(config: &DeployConfig) -> Result<Self> {
        config.validate()?;
        tracing::info!(owner = %config.owner, policy = ?config.completion_policy, "contracts deployed");
        Ok(Self {
            token: TokenContract::deploy(config),
            scheduler: SchedulerContract::new(config.scheduler, config.completion_policy),
        })
    }

    /// Assemble a runtime from already-built contracts (used when restoring).
    #[must_use]
    pub const fn from_contracts(token: TokenContract, scheduler: SchedulerContract) -> Self {
        Self { token, scheduler }
    }

    /// Token contract, read-only.
    #[must_use]
    pub const fn token(&self) -> &TokenContract {
        &self.token
    }

    /// Token contract, for typed calls.
    pub fn token_mut(&mut self) -> &mut TokenContract {
        &mut self.token
    }

    /// Scheduler contract, read-only.
    #[must_use]
    pub const fn scheduler(&self) -> &SchedulerContract {
        &self.scheduler
    }

    /// Scheduler contract, for typed calls.
    pub fn scheduler_mut(&mut self) -> &mut SchedulerContract {
        &mut self.scheduler
    }

    /// Number of events waiting across both contracts.
    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.token.events().len() + self.scheduler.events().len()
    }

    /// Take pending events from both contracts (token events first).
    pub fn drain_events(&mut self) -> Vec<ContractEvent> {
        let mut events = self.token.drain_events();
        events.extend(self.scheduler.drain_events());
        events
    }

    /// Execute one call on behalf of `caller`.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownContract`] / [`Error::UnknownOperation`] for bad
    /// addressing, [`Error::InvalidInput`] for malformed arguments, otherwise
    /// whatever the contract operation returns. A failed call changes nothing.
    pub fn call(
        &mut self,
        caller: &Identity,
        contract: &str,
        operation: &str,
        args: &[Value],
    ) -> Result<Value> {
        trace!(%caller, contract, operation, argc = args.len(), "dispatch");
        match contract {
            token::CONTRACT_NAME => self.call_token(caller, operation, args),
            scheduler::CONTRACT_NAME => self.call_scheduler(caller, operation, args),
            other => Err(Error::UnknownContract(other.to_string())),
        }
    }

    fn call_token(&mut self, caller: &Identity, operation: &str, args: &[Value]) -> Result<Value> {
        let contract = &mut self.token;
        match operation {
            "mint" => {
                let [amount, recipient] = arity::<2>(args)?;
                let ok = contract.mint(caller, uint(amount)?, &identity(recipient)?)?;
                Ok(Value::Bool(ok))
            }
            "transfer" => {
                let [amount, sender, recipient] = arity::<3>(args)?;
                let ok = contract.transfer(
                    caller,
                    uint(amount)?,
                    &identity(sender)?,
                    &identity(recipient)?,
                )?;
                Ok(Value::Bool(ok))
            }
            "get-balance" => {
                let [account] = arity::<1>(args)?;
                Ok(encode_uint(contract.get_balance(&identity(account)?)))
            }
            "set-token-uri" => {
                let [uri] = arity::<1>(args)?;
                Ok(Value::Bool(contract.set_token_uri(caller, text(uri)?)?))
            }
            "get-token-uri" => {
                let [] = arity::<0>(args)?;
                Ok(Value::String(contract.get_token_uri().to_string()))
            }
            "get-name" => {
                let [] = arity::<0>(args)?;
                Ok(Value::String(contract.name().to_string()))
            }
            "get-symbol" => {
                let [] = arity::<0>(args)?;
                Ok(Value::String(contract.symbol().to_string()))
            }
            "get-decimals" => {
                let [] = arity::<0>(args)?;
                Ok(json!(contract.decimals()))
            }
            "get-total-supply" => {
                let [] = arity::<0>(args)?;
                Ok(encode_uint(contract.total_supply()))
            }
            "get-owner" => {
                let [] = arity::<0>(args)?;
                Ok(Value::String(contract.owner().to_string()))
            }
            _ => Err(unknown_operation(token::CONTRACT_NAME, operation)),
        }
    }

    fn call_scheduler(
        &mut self,
        caller: &Identity,
        operation: &str,
        args: &[Value],
    ) -> Result<Value> {
        let contract = &mut self.scheduler;
        match operation {
            "schedule-experiment" => {
                let [title, description, start_time, duration, locations] = arity::<5>(args)?;
                let draft = ExperimentDraft::new(
                    text(title)?,
                    text(description)?,
                    timestamp(start_time)?,
                    u64_arg(duration)?,
                    identity_list(locations)?,
                );
                Ok(json!(contract.schedule_experiment(caller, draft)?))
            }
            "start-experiment" => {
                let [id] = arity::<1>(args)?;
                Ok(Value::Bool(contract.start_experiment(caller, u64_arg(id)?)?))
            }
            "complete-experiment" => {
                let [id] = arity::<1>(args)?;
                Ok(Value::Bool(
                    contract.complete_experiment(caller, u64_arg(id)?)?,
                ))
            }
            "get-experiment" => {
                let [id] = arity::<1>(args)?;
                match contract.get_experiment(u64_arg(id)?) {
                    Some(experiment) => Ok(serde_json::to_value(experiment)?),
                    None => Ok(Value::Null),
                }
            }
            "get-experiment-count" => {
                let [] = arity::<0>(args)?;
                Ok(json!(contract.experiment_count()))
            }
            "get-experiments-by-creator" => {
                let [creator] = arity::<1>(args)?;
                Ok(json!(contract.experiments_by_creator(&identity(creator)?)))
            }
            _ => Err(unknown_operation(scheduler::CONTRACT_NAME, operation)),
        }
    }
}

/// Builder for [`Runtime`].
#[derive(Debug)]
pub struct RuntimeBuilder {
    config: DeployConfig,
}

impl RuntimeBuilder {
    /// Set the initial token metadata URI.
    #[must_use]
    pub fn token_uri(mut self, uri: impl Into<String>) -> Self {
        self.config.token.token_uri = uri.into();
        self
    }

    /// Set token name and symbol.
    #[must_use]
    pub fn token_name(mut self, name: impl Into<String>, symbol: impl Into<String>) -> Self {
        self.config.token.name = name.into();
        self.config.token.symbol = symbol.into();
        self
    }

    /// Set who may complete experiments.
    #[must_use]
    pub fn completion_policy(mut self, policy: CompletionPolicy) -> Self {
        self.config.completion_policy = policy;
        self
    }

    /// Set the maximum number of locations per experiment.
    #[must_use]
    pub fn max_locations(mut self, max: usize) -> Self {
        self.config.scheduler.max_locations = max;
        self
    }

    /// Deploy the runtime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the configuration is invalid.
    pub fn build(self) -> Result<Runtime> {
        Runtime::deploy(&self.config)
    }
}

fn unknown_operation(contract: &str, operation: &str) -> Error {
    Error::UnknownOperation {
        contract: contract.to_string(),
        operation: operation.to_string(),
    }
}

fn arity<const N: usize>(args: &[Value]) -> Result<&[Value; N]> {
    args.try_into().map_err(|_| {
        Error::InvalidInput(format!("expected {N} arguments, got {}", args.len()))
    })
}

fn uint(value: &Value) -> Result<u128> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .map(u128::from)
            .ok_or_else(|| Error::InvalidInput(format!("expected unsigned integer, got {n}"))),
        Value::String(s) => s
            .parse::<u128>()
            .map_err(|_| Error::InvalidInput(format!("expected unsigned integer, got {s:?}"))),
        other => Err(Error::InvalidInput(format!(
            "expected unsigned integer, got {other}"
        ))),
    }
}

fn u64_arg(value: &Value) -> Result<u64> {
    u64::try_from(uint(value)?).map_err(|_| Error::InvalidInput("integer exceeds u64".to_string()))
}

fn encode_uint(value: u128) -> Value {
    u64::try_from(value).map_or_else(|_| Value::String(value.to_string()), |v| json!(v))
}

fn text(value: &Value) -> Result<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| Error::InvalidInput(format!("expected text, got {value}")))
}

fn identity(value: &Value) -> Result<Identity> {
    let principal = text(value)?;
    if principal.is_empty() {
        return Err(Error::InvalidInput("identity must not be empty".to_string()));
    }
    Ok(Identity::from(principal))
}

fn identity_list(value: &Value) -> Result<Vec<Identity>> {
    value
        .as_array()
        .ok_or_else(|| Error::InvalidInput(format!("expected list, got {value}")))?
        .iter()
        .map(identity)
        .collect()
}

fn timestamp(value: &Value) -> Result<DateTime<Utc>> {
    let millis = value
        .as_i64()
        .ok_or_else(|| Error::InvalidInput(format!("expected timestamp, got {value}")))?;
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| Error::InvalidInput(format!("timestamp {millis} out of range")))
}
