//! The single mutable session owned by the orchestrator. Pure computation
//! modules receive snapshots of this state; persistence is a side effect at
//! the edges, never part of a computation.

use serde::Serialize;
use time::{Date, OffsetDateTime};
use tracing::warn;

use crate::energy;
use crate::goals::{self, NutritionGoals};
use crate::macros::MacroSplit;
use crate::plan::{MealPlanRequest, PlanResult};
use crate::profile::{Profile, Workout};
use crate::store::{
    SessionStore, MACRO_SPLIT_KEY, PROFILE_KEY, PROFILE_SAVED_KEY, WORKOUTS_KEY,
};

#[derive(Debug, Default)]
pub struct Session {
    pub profile: Profile,
    pub workouts: Vec<Workout>,
    pub macro_split: MacroSplit,
    pub profile_saved: bool,
    pub request: MealPlanRequest,
    /// Latest successfully parsed plan; replaced wholesale, kept on failure.
    pub plan: Option<PlanResult>,
}

impl Session {
    /// Derived goals for the current snapshot. Zero when the profile is
    /// incomplete or no positive calorie target exists.
    pub fn goals(&self, today: Date) -> NutritionGoals {
        let target = energy::calorie_target(&self.profile, &self.workouts, today);
        goals::synthesize(target, self.macro_split)
    }

    /// Restores the persisted snapshot. Corrupt or missing values fall back
    /// to defaults rather than failing startup.
    pub async fn load(store: &dyn SessionStore) -> Self {
        let profile_saved = matches!(
            store.get(PROFILE_SAVED_KEY).await,
            Ok(Some(ref v)) if v == "true"
        );
        Self {
            profile: read_json(store, PROFILE_KEY).await.unwrap_or_default(),
            workouts: read_json(store, WORKOUTS_KEY).await.unwrap_or_default(),
            macro_split: read_json(store, MACRO_SPLIT_KEY).await.unwrap_or_default(),
            profile_saved,
            ..Self::default()
        }
    }

    /// Writes the profile/workout/macro snapshot back to the store.
    pub async fn persist(&self, store: &dyn SessionStore) -> anyhow::Result<()> {
        store
            .set(PROFILE_KEY, &serde_json::to_string(&self.profile)?)
            .await?;
        store
            .set(WORKOUTS_KEY, &serde_json::to_string(&self.workouts)?)
            .await?;
        store
            .set(MACRO_SPLIT_KEY, &serde_json::to_string(&self.macro_split)?)
            .await?;
        store
            .set(PROFILE_SAVED_KEY, if self.profile_saved { "true" } else { "false" })
            .await?;
        Ok(())
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(
    store: &dyn SessionStore,
    key: &str,
) -> Option<T> {
    match store.get(key).await {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "discarding corrupt session snapshot");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            warn!(key, error = %e, "session store read failed");
            None
        }
    }
}

pub fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

/// Full session view returned by the read API, goals included.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub profile: Profile,
    pub workouts: Vec<Workout>,
    pub macro_split: MacroSplit,
    pub profile_saved: bool,
    pub goals: NutritionGoals,
    pub request: MealPlanRequest,
    pub plan: Option<PlanResult>,
}

impl SessionView {
    pub fn of(session: &Session) -> Self {
        Self {
            profile: session.profile.clone(),
            workouts: session.workouts.clone(),
            macro_split: session.macro_split,
            profile_saved: session.profile_saved,
            goals: session.goals(today()),
            request: session.request.clone(),
            plan: session.plan.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::MemoryStore;

    #[tokio::test]
    async fn snapshot_roundtrip() {
        let store = MemoryStore::default();
        let mut session = Session::default();
        session.profile.current_weight = Some(182.0);
        session.macro_split = session
            .macro_split
            .rebalance(crate::macros::MacroField::Protein, 40)
            .unwrap();
        session.profile_saved = true;
        session.persist(&store).await.unwrap();

        let restored = Session::load(&store).await;
        assert_eq!(restored.profile.current_weight, Some(182.0));
        assert_eq!(restored.macro_split, session.macro_split);
        assert!(restored.profile_saved);
    }

    #[tokio::test]
    async fn corrupt_snapshot_falls_back_to_defaults() {
        let store = MemoryStore::default();
        store.set(PROFILE_KEY, "definitely not json").await.unwrap();
        let session = Session::load(&store).await;
        assert!(session.profile.current_weight.is_none());
        assert!(!session.profile_saved);
    }
}
