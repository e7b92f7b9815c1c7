mod dto;
pub mod handlers;

use axum::Router;

use crate::state::AppState;

pub use dto::{ActivityLevel, Gender, Profile, ProfileField, WeeklyLoss, Workout, WorkoutField};

pub fn router() -> Router<AppState> {
    handlers::routes()
}
