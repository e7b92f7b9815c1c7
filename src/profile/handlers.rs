use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use tracing::{info, instrument, warn};

use super::dto::{ProfileField, Workout, WorkoutField};
use crate::error::ApiError;
use crate::macros::MacroField;
use crate::session::{Session, SessionView};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/session", get(get_session))
        .route("/profile/field", put(update_profile_field))
        .route("/profile/save", post(save_profile))
        .route("/workouts", post(add_workout))
        .route("/workouts/:index", put(update_workout))
        .route("/workouts/:index", delete(remove_workout))
        .route("/macros", put(update_macros))
}

/// Snapshot persistence is best effort; the in-memory session stays
/// authoritative for the rest of the run.
async fn persist(state: &AppState, session: &Session) {
    if let Err(e) = session.persist(state.store.as_ref()).await {
        warn!(error = %e, "failed to persist session snapshot");
    }
}

#[instrument(skip(state))]
pub async fn get_session(State(state): State<AppState>) -> Json<SessionView> {
    let session = state.session.read().await;
    Json(SessionView::of(&session))
}

#[instrument(skip(state, field))]
pub async fn update_profile_field(
    State(state): State<AppState>,
    Json(field): Json<ProfileField>,
) -> Json<SessionView> {
    let mut session = state.session.write().await;
    session.profile.apply(field);
    persist(&state, &session).await;
    Json(SessionView::of(&session))
}

#[instrument(skip(state))]
pub async fn save_profile(
    State(state): State<AppState>,
) -> Result<Json<SessionView>, ApiError> {
    let mut session = state.session.write().await;
    if !session.profile.is_complete() {
        return Err(ApiError::IncompleteProfile);
    }
    session.profile_saved = true;
    persist(&state, &session).await;
    info!("profile confirmed for this session");
    Ok(Json(SessionView::of(&session)))
}

#[instrument(skip(state))]
pub async fn add_workout(State(state): State<AppState>) -> Json<SessionView> {
    let mut session = state.session.write().await;
    session.workouts.push(Workout::default());
    persist(&state, &session).await;
    Json(SessionView::of(&session))
}

#[instrument(skip(state, field))]
pub async fn update_workout(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(field): Json<WorkoutField>,
) -> Result<Json<SessionView>, ApiError> {
    let mut session = state.session.write().await;
    let workout = session
        .workouts
        .get_mut(index)
        .ok_or_else(|| ApiError::NotFound(format!("workout {index}")))?;
    workout.apply(field);
    persist(&state, &session).await;
    Ok(Json(SessionView::of(&session)))
}

#[instrument(skip(state))]
pub async fn remove_workout(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<SessionView>, ApiError> {
    let mut session = state.session.write().await;
    if index >= session.workouts.len() {
        return Err(ApiError::NotFound(format!("workout {index}")));
    }
    session.workouts.remove(index);
    persist(&state, &session).await;
    Ok(Json(SessionView::of(&session)))
}

#[derive(Debug, Deserialize)]
pub struct MacroUpdate {
    pub field: MacroField,
    pub value: i32,
}

#[instrument(skip(state))]
pub async fn update_macros(
    State(state): State<AppState>,
    Json(update): Json<MacroUpdate>,
) -> Result<Json<SessionView>, ApiError> {
    let mut session = state.session.write().await;
    let next = session
        .macro_split
        .rebalance(update.field, update.value)
        .ok_or_else(|| {
            ApiError::InvalidRequest(
                "macro adjustment rejected: every macro must stay at or above 10%".into(),
            )
        })?;
    debug_assert_eq!(next.sum(), 100);
    session.macro_split = next;
    persist(&state, &session).await;
    Ok(Json(SessionView::of(&session)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macro_update_deserializes() {
        let update: MacroUpdate = serde_json::from_str(r#"{"field":"protein","value":45}"#).unwrap();
        assert_eq!(update.field, MacroField::Protein);
        assert_eq!(update.value, 45);
    }
}
