//! Experiment record and lifecycle

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::Identity;

/// Lifecycle state of an experiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExperimentStatus {
    /// Registered, not yet started.
    Scheduled,
    /// Started by its creator.
    InProgress,
    /// Finished; terminal.
    Completed,
}

impl fmt::Display for ExperimentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        })
    }
}

/// Caller-driven lifecycle transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// `start-experiment`
    Start,
    /// `complete-experiment`
    Complete,
}

/// Every permitted `(from, transition, to)` edge. Anything absent is rejected.
pub const TRANSITIONS: &[(ExperimentStatus, Transition, ExperimentStatus)] = &[
    (
        ExperimentStatus::Scheduled,
        Transition::Start,
        ExperimentStatus::InProgress,
    ),
    (
        ExperimentStatus::InProgress,
        Transition::Complete,
        ExperimentStatus::Completed,
    ),
];

impl ExperimentStatus {
    /// Target state for `transition`, or `None` if the table has no such edge.
    #[must_use]
    pub fn apply(self, transition: Transition) -> Option<Self> {
        TRANSITIONS
            .iter()
            .find(|(from, t, _)| *from == self && *t == transition)
            .map(|(_, _, to)| *to)
    }

    /// No outgoing edges.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        TRANSITIONS.iter().all(|(from, _, _)| *from != self)
    }
}

/// A time-boxed collaborative experiment.
///
/// Only the registry mutates records; callers receive clones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experiment {
    id: u64,
    creator: Identity,
    title: String,
    description: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    start_time: DateTime<Utc>,
    duration: u64,
    locations: Vec<Identity>,
    status: ExperimentStatus,
}

impl Experiment {
    pub(crate) fn new(id: u64, creator: Identity, draft: ExperimentDraft) -> Self {
        Self {
            id,
            creator,
            title: draft.title,
            description: draft.description,
            start_time: draft.start_time,
            duration: draft.duration,
            locations: draft.locations,
            status: ExperimentStatus::Scheduled,
        }
    }

    /// Registry-assigned id.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Scheduling caller.
    #[must_use]
    pub const fn creator(&self) -> &Identity {
        &self.creator
    }

    /// Title text.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Description text.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Scheduled start instant.
    #[must_use]
    pub const fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Length in seconds.
    #[must_use]
    pub const fn duration(&self) -> u64 {
        self.duration
    }

    /// Participant identities, in scheduling order.
    #[must_use]
    pub fn locations(&self) -> &[Identity] {
        &self.locations
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn status(&self) -> ExperimentStatus {
        self.status
    }

    /// `start_time + duration`, or `None` if it falls outside chrono's range.
    #[must_use]
    pub fn ends_at(&self) -> Option<DateTime<Utc>> {
        let secs = i64::try_from(self.duration).ok()?;
        self.start_time
            .checked_add_signed(Duration::try_seconds(secs)?)
    }

    /// Whether `who` is the creator or one of the locations.
    #[must_use]
    pub fn is_participant(&self, who: &Identity) -> bool {
        &self.creator == who || self.locations.contains(who)
    }

    pub(crate) fn set_status(&mut self, status: ExperimentStatus) {
        self.status = status;
    }
}

/// Caller-supplied fields of a new experiment, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentDraft {
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) start_time: DateTime<Utc>,
    pub(crate) duration: u64,
    pub(crate) locations: Vec<Identity>,
}

impl ExperimentDraft {
    /// Draft with required fields; validation happens at scheduling time.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        start_time: DateTime<Utc>,
        duration: u64,
        locations: Vec<Identity>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            start_time,
            duration,
            locations,
        }
    }
}
