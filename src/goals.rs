use serde::Serialize;

use crate::macros::MacroSplit;
use crate::units::round_half_up;

/// Derived daily targets. All zero when no safe calorie target exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NutritionGoals {
    pub calories: i32,
    pub protein_g: i32,
    pub carbs_g: i32,
    pub fat_g: i32,
}

/// Gram targets from the calorie target and the percentage split, using the
/// standard 4/4/9 kcal-per-gram constants.
pub fn synthesize(calorie_target: Option<f64>, split: MacroSplit) -> NutritionGoals {
    let Some(calories) = calorie_target else {
        return NutritionGoals::default();
    };
    NutritionGoals {
        calories: round_half_up(calories),
        protein_g: round_half_up(calories * f64::from(split.protein) / 100.0 / 4.0),
        carbs_g: round_half_up(calories * f64::from(split.carbs) / 100.0 / 4.0),
        fat_g: round_half_up(calories * f64::from(split.fat) / 100.0 / 9.0),
    }
}
