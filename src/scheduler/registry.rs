//! Experiment Registry - id → record mapping plus the id counter
//!
//! Ids start at 1 and are never reused, so the counter alone tells how many
//! experiments were ever scheduled.

use rustc_hash::FxHashMap;

use super::experiment::{Experiment, ExperimentDraft, ExperimentStatus};
use crate::auth::Identity;
use crate::{Error, Result};

/// Sole owner of every [`Experiment`] record.
#[derive(Debug, Clone)]
pub struct ExperimentRegistry {
    experiments: FxHashMap<u64, Experiment>,
    next_id: u64,
}

impl Default for ExperimentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ExperimentRegistry {
    /// Empty registry; the first id handed out is 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            experiments: FxHashMap::default(),
            next_id: 1,
        }
    }

    /// Id the next [`insert`](Self::insert) will assign.
    #[must_use]
    pub const fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Number of stored experiments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.experiments.len()
    }

    /// Whether nothing has been scheduled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.experiments.is_empty()
    }

    /// Store a validated draft under the next id and return that id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Overflow`] once `u64` ids are exhausted.
    pub fn insert(&mut self, creator: Identity, draft: ExperimentDraft) -> Result<u64> {
        let id = self.next_id;
        let following = id.checked_add(1).ok_or(Error::Overflow)?;
        self.experiments
            .insert(id, Experiment::new(id, creator, draft));
        self.next_id = following;
        Ok(id)
    }

    /// Borrow a record.
    #[must_use]
    pub fn get(&self, id: u64) -> Option<&Experiment> {
        self.experiments.get(&id)
    }

    /// Borrow a record or fail with [`Error::NotFound`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `id` was never scheduled.
    pub fn require(&self, id: u64) -> Result<&Experiment> {
        self.get(id)
            .ok_or_else(|| Error::NotFound(format!("experiment {id}")))
    }

    /// Overwrite the status of an existing record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `id` was never scheduled.
    pub(crate) fn set_status(&mut self, id: u64, status: ExperimentStatus) -> Result<()> {
        let experiment = self
            .experiments
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("experiment {id}")))?;
        experiment.set_status(status);
        Ok(())
    }

    /// Ids created by `creator`, ascending.
    #[must_use]
    pub fn ids_by_creator(&self, creator: &Identity) -> Vec<u64> {
        let mut ids: Vec<u64> = self
            .experiments
            .values()
            .filter(|exp| exp.creator() == creator)
            .map(Experiment::id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// All records, ascending by id.
    #[must_use]
    pub fn experiments(&self) -> Vec<&Experiment> {
        let mut all: Vec<&Experiment> = self.experiments.values().collect();
        all.sort_by_key(|exp| exp.id());
        all
    }

    /// Rebuild from persisted records.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if a record id is zero, duplicated, or not
    /// below `next_id`.
    pub(crate) fn from_parts(
        records: impl IntoIterator<Item = Experiment>,
        next_id: u64,
    ) -> Result<Self> {
        let mut experiments = FxHashMap::default();
        for record in records {
            let id = record.id();
            if id == 0 || id >= next_id {
                return Err(Error::Storage(format!(
                    "experiment id {id} outside 1..{next_id}"
                )));
            }
            if experiments.insert(id, record).is_some() {
                return Err(Error::Storage(format!("duplicate experiment id {id}")));
            }
        }
        Ok(Self {
            experiments,
            next_id,
        })
    }
}
