mod dto;
pub mod handlers;
mod parser;
mod prompt;
pub mod services;

use axum::Router;

use crate::state::AppState;

pub use dto::{GroceryItem, MealPlanRequest, PlanResult};
pub use parser::ParseError;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
