//! Scheduler Contract (`experiment-scheduler`)
//!
//! Coordinates time-boxed collaborative experiments through a forward-only
//! lifecycle:
//!
//! ```text
//! Scheduled ──start (creator)──> InProgress ──complete (policy)──> Completed
//! ```
//!
//! `start_time` is stored, never enforced: transitions happen only when a
//! caller drives them.
//!
//! ## Usage
//!
//! ```rust
//! use chrono::Utc;
//! use quantum_collab::auth::Identity;
//! use quantum_collab::scheduler::{
//!     CompletionPolicy, ExperimentDraft, ExperimentStatus, SchedulerContract,
//! };
//!
//! let alice = Identity::from("ST1ALICE");
//! let mut scheduler = SchedulerContract::new(Default::default(), CompletionPolicy::Anyone);
//!
//! let draft = ExperimentDraft::new("Bell test", "CHSH run", Utc::now(), 3600, vec![alice.clone()]);
//! let id = scheduler.schedule_experiment(&alice, draft)?;
//! scheduler.start_experiment(&alice, id)?;
//! scheduler.complete_experiment(&alice, id)?;
//!
//! assert_eq!(
//!     scheduler.get_experiment(id).map(|e| e.status()),
//!     Some(ExperimentStatus::Completed)
//! );
//! # Ok::<(), quantum_collab::Error>(())
//! ```

mod experiment;
mod registry;

pub use experiment::{Experiment, ExperimentDraft, ExperimentStatus, Transition, TRANSITIONS};
pub use registry::ExperimentRegistry;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::auth::{authorize, ensure_authorized, Identity};
use crate::config::SchedulerLimits;
use crate::event::{ContractEvent, EventLog};
use crate::{Error, Result};

/// Contract name on the call surface.
pub const CONTRACT_NAME: &str = "experiment-scheduler";

/// Who may drive `InProgress → Completed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompletionPolicy {
    /// Any caller.
    #[default]
    Anyone,
    /// Only the experiment's creator.
    CreatorOnly,
    /// The creator or any listed location.
    Participants,
}

impl CompletionPolicy {
    /// Whether `caller` may complete `experiment` under this policy.
    #[must_use]
    pub fn permits(self, caller: &Identity, experiment: &Experiment) -> bool {
        match self {
            Self::Anyone => true,
            Self::CreatorOnly => authorize(caller, experiment.creator()),
            Self::Participants => experiment.is_participant(caller),
        }
    }
}

/// Scheduler contract state.
#[derive(Debug, Clone)]
pub struct SchedulerContract {
    registry: ExperimentRegistry,
    limits: SchedulerLimits,
    completion_policy: CompletionPolicy,
    events: EventLog,
}

impl SchedulerContract {
    /// Deploy with an empty registry (first id is 1).
    #[must_use]
    pub fn new(limits: SchedulerLimits, completion_policy: CompletionPolicy) -> Self {
        Self::from_registry(ExperimentRegistry::new(), limits, completion_policy)
    }

    pub(crate) fn from_registry(
        registry: ExperimentRegistry,
        limits: SchedulerLimits,
        completion_policy: CompletionPolicy,
    ) -> Self {
        Self {
            registry,
            limits,
            completion_policy,
            events: EventLog::default(),
        }
    }

    /// Register a new experiment owned by `caller`; returns its id.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] for zero duration, empty or duplicate
    /// locations, or fields exceeding [`SchedulerLimits`];
    /// [`Error::Overflow`] if ids are exhausted.
    pub fn schedule_experiment(&mut self, caller: &Identity, draft: ExperimentDraft) -> Result<u64> {
        self.validate_draft(&draft)?;
        let id = self.registry.insert(caller.clone(), draft)?;

        debug!(id, creator = %caller, "experiment scheduled");
        self.events.emit(ContractEvent::ExperimentScheduled {
            id,
            creator: caller.clone(),
        });
        Ok(id)
    }

    /// `Scheduled → InProgress`. Creator only.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`], then [`Error::Unauthorized`], then
    /// [`Error::InvalidStatus`], checked in that order.
    pub fn start_experiment(&mut self, caller: &Identity, id: u64) -> Result<bool> {
        let experiment = self.registry.require(id)?;
        ensure_authorized(caller, experiment.creator())?;
        let next = Self::advance(experiment, Transition::Start)?;

        self.registry.set_status(id, next)?;
        debug!(id, "experiment started");
        self.events.emit(ContractEvent::ExperimentStarted { id });
        Ok(true)
    }

    /// `InProgress → Completed`, gated by the configured [`CompletionPolicy`].
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`], then [`Error::Unauthorized`], then
    /// [`Error::InvalidStatus`], checked in that order.
    pub fn complete_experiment(&mut self, caller: &Identity, id: u64) -> Result<bool> {
        let experiment = self.registry.require(id)?;
        if !self.completion_policy.permits(caller, experiment) {
            warn!(id, %caller, policy = ?self.completion_policy, "completion denied");
            return Err(Error::Unauthorized);
        }
        let next = Self::advance(experiment, Transition::Complete)?;

        self.registry.set_status(id, next)?;
        debug!(id, by = %caller, "experiment completed");
        self.events.emit(ContractEvent::ExperimentCompleted {
            id,
            by: caller.clone(),
        });
        Ok(true)
    }

    /// Record by value, or `None` for an id that was never scheduled.
    #[must_use]
    pub fn get_experiment(&self, id: u64) -> Option<Experiment> {
        self.registry.get(id).cloned()
    }

    /// Number of experiments ever scheduled.
    #[must_use]
    pub fn experiment_count(&self) -> u64 {
        self.registry.next_id() - 1
    }

    /// Ids scheduled by `creator`, ascending.
    #[must_use]
    pub fn experiments_by_creator(&self, creator: &Identity) -> Vec<u64> {
        self.registry.ids_by_creator(creator)
    }

    /// Active completion policy.
    #[must_use]
    pub const fn completion_policy(&self) -> CompletionPolicy {
        self.completion_policy
    }

    /// Active input limits.
    #[must_use]
    pub const fn limits(&self) -> SchedulerLimits {
        self.limits
    }

    /// Read-only view of the registry.
    #[must_use]
    pub const fn registry(&self) -> &ExperimentRegistry {
        &self.registry
    }

    /// Pending events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[ContractEvent] {
        self.events.events()
    }

    /// Take all pending events.
    pub fn drain_events(&mut self) -> Vec<ContractEvent> {
        self.events.drain()
    }

    fn advance(experiment: &Experiment, transition: Transition) -> Result<ExperimentStatus> {
        experiment
            .status()
            .apply(transition)
            .ok_or(Error::InvalidStatus {
                id: experiment.id(),
                status: experiment.status(),
            })
    }

    fn validate_draft(&self, draft: &ExperimentDraft) -> Result<()> {
        if draft.duration == 0 {
            return Err(Error::InvalidInput("duration must be positive".to_string()));
        }
        if draft.locations.is_empty() {
            return Err(Error::InvalidInput(
                "locations must not be empty".to_string(),
            ));
        }
        if draft.locations.len() > self.limits.max_locations {
            return Err(Error::InvalidInput(format!(
                "at most {} locations allowed",
                self.limits.max_locations
            )));
        }
        if draft.title.len() > self.limits.max_title_len {
            return Err(Error::InvalidInput(format!(
                "title exceeds {} bytes",
                self.limits.max_title_len
            )));
        }
        if draft.description.len() > self.limits.max_description_len {
            return Err(Error::InvalidInput(format!(
                "description exceeds {} bytes",
                self.limits.max_description_len
            )));
        }
        Ok(())
    }
}
