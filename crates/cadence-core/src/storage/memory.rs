//! In-memory store

use std::collections::HashMap;
use std::sync::Mutex;

use crate::model::{LearnerProfile, TopicReviewState};
use crate::planning::StudyPlan;

use super::{PlanStore, ProfileSource, Result, ReviewStore, StorageError};

type StateKey = (String, String);

/// Mutex-guarded maps implementing every storage port
#[derive(Debug, Default)]
pub struct InMemoryStore {
    states: Mutex<HashMap<StateKey, TopicReviewState>>,
    profiles: Mutex<HashMap<String, LearnerProfile>>,
    plans: Mutex<HashMap<String, StudyPlan>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert_profile(&self, learner_id: &str, profile: LearnerProfile) -> Result<()> {
        self.profiles
            .lock()
            .map_err(|_| StorageError::LockPoisoned("profiles"))?
            .insert(learner_id.to_string(), profile);
        Ok(())
    }

    /// Number of stored review states across all learners
    pub fn state_count(&self) -> Result<usize> {
        Ok(self
            .states
            .lock()
            .map_err(|_| StorageError::LockPoisoned("states"))?
            .len())
    }
}

impl ReviewStore for InMemoryStore {
    fn get(&self, learner_id: &str, topic_name: &str) -> Result<Option<TopicReviewState>> {
        let states = self
            .states
            .lock()
            .map_err(|_| StorageError::LockPoisoned("states"))?;
        Ok(states
            .get(&(learner_id.to_string(), topic_name.to_string()))
            .cloned())
    }

    fn upsert(&self, state: &TopicReviewState) -> Result<TopicReviewState> {
        let mut states = self
            .states
            .lock()
            .map_err(|_| StorageError::LockPoisoned("states"))?;
        states.insert(
            (state.learner_id.clone(), state.topic_name.clone()),
            state.clone(),
        );
        Ok(state.clone())
    }

    fn list_for_learner(&self, learner_id: &str) -> Result<Vec<TopicReviewState>> {
        let states = self
            .states
            .lock()
            .map_err(|_| StorageError::LockPoisoned("states"))?;
        let mut owned: Vec<TopicReviewState> = states
            .values()
            .filter(|s| s.learner_id == learner_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| a.topic_name.cmp(&b.topic_name));
        Ok(owned)
    }
}

impl ProfileSource for InMemoryStore {
    fn get_profile(&self, learner_id: &str) -> Result<Option<LearnerProfile>> {
        let profiles = self
            .profiles
            .lock()
            .map_err(|_| StorageError::LockPoisoned("profiles"))?;
        Ok(profiles.get(learner_id).cloned())
    }
}

impl PlanStore for InMemoryStore {
    fn save_plan(&self, learner_id: &str, plan: &StudyPlan) -> Result<()> {
        self.plans
            .lock()
            .map_err(|_| StorageError::LockPoisoned("plans"))?
            .insert(learner_id.to_string(), plan.clone());
        Ok(())
    }

    fn latest_plan(&self, learner_id: &str) -> Result<Option<StudyPlan>> {
        let plans = self
            .plans
            .lock()
            .map_err(|_| StorageError::LockPoisoned("plans"))?;
        Ok(plans.get(learner_id).cloned())
    }
}
