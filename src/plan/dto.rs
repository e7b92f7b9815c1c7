use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroceryItem {
    pub id: String,
    pub name: String,
    /// Free-text, unit-annotated quantity, e.g. "2 lbs".
    pub quantity: String,
    pub price: f64,
}

impl GroceryItem {
    pub fn generated_id() -> String {
        format!("ing-{}", Uuid::new_v4())
    }

    /// Canonical line format, also what the parser consumes.
    pub fn to_line(&self) -> String {
        format!(
            "id: {}; name: {}; quantity: {}; price: {}",
            self.id, self.name, self.quantity, self.price
        )
    }
}

/// Fully parsed assistant plan. Superseded wholesale on every
/// recalculation, never patched field by field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanResult {
    pub plan_summary: String,
    pub grocery_list: Vec<GroceryItem>,
    pub instructions: String,
    /// Narrative nutrition text, kept unstructured for display.
    pub nutrition: String,
    pub total_cost: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MealPlanRequest {
    pub meals_per_day: u8,
    pub days: u8,
    pub meal_idea: String,
    pub meal_idea_2: String,
    pub meal_idea_3: String,
    pub snack_beverage_preferences: String,
    pub store: String,
    pub budget: Option<f64>,
}

impl Default for MealPlanRequest {
    fn default() -> Self {
        Self {
            meals_per_day: 1,
            days: 5,
            meal_idea: String::new(),
            meal_idea_2: String::new(),
            meal_idea_3: String::new(),
            snack_beverage_preferences: String::new(),
            store: String::new(),
            budget: None,
        }
    }
}

impl MealPlanRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if !(1..=3).contains(&self.meals_per_day) {
            return Err(ApiError::InvalidRequest(
                "meals per day must be between 1 and 3".into(),
            ));
        }
        if !(1..=7).contains(&self.days) {
            return Err(ApiError::InvalidRequest(
                "plan length must be between 1 and 7 days".into(),
            ));
        }
        if self.store.trim().is_empty() != self.budget.is_none() {
            return Err(ApiError::InvalidRequest(
                "provide both store and budget, or neither".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct ReplaceIngredientRequest {
    pub new_name: String,
    /// Set after the user has confirmed a high-impact substitution.
    #[serde(default)]
    pub confirmed: bool,
}
