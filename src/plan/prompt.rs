//! Assembles the natural-language prompts sent to the assistant. The exact
//! wording, section headers and line formats are the wire contract the
//! parser relies on, so changes here must stay in sync with `parser`.

use time::Date;

use super::dto::{GroceryItem, MealPlanRequest};
use crate::goals::NutritionGoals;
use crate::macros::MacroSplit;
use crate::profile::{Gender, Profile, Workout};
use crate::units::age_from_dob;

fn workouts_description(workouts: &[Workout]) -> String {
    let described: Vec<String> = workouts
        .iter()
        .filter(|w| !w.exercise.is_empty())
        .filter_map(|w| {
            let days = w.days_per_week.unwrap_or(0);
            let days_text = format!("{days} day{}/week", if days == 1 { "" } else { "s" });
            if let Some(distance) = w.distance_mi {
                Some(format!("{} for {distance} miles, {days_text}", w.exercise))
            } else {
                w.duration_min
                    .map(|duration| format!("{} for {duration} mins, {days_text}", w.exercise))
            }
        })
        .collect();
    if described.is_empty() {
        "None specified".to_string()
    } else {
        described.join("; ")
    }
}

fn meal_structure_instruction(request: &MealPlanRequest) -> String {
    if request.meals_per_day == 1 {
        return format!(
            "**Meal Structure:** The user wants One Meal a Day (OMAD). Generate a single, \
             large recipe for \"{}\" to meet the entire daily nutritional target. State that \
             the recipe is for the full day's goal. Do NOT suggest snacks or other meals.",
            request.meal_idea
        );
    }

    let mut ideas = vec![format!(
        "Meal 1 Idea: {}",
        if request.meal_idea.is_empty() {
            "Chef's Choice"
        } else {
            &request.meal_idea
        }
    )];
    if request.meals_per_day > 1 && !request.meal_idea_2.is_empty() {
        ideas.push(format!("Meal 2 Idea: {}", request.meal_idea_2));
    }
    if request.meals_per_day > 2 && !request.meal_idea_3.is_empty() {
        ideas.push(format!("Meal 3 Idea: {}", request.meal_idea_3));
    }

    let snacks = if request.snack_beverage_preferences.is_empty() {
        "You can optionally include one or two healthy snacks.".to_string()
    } else {
        format!(
            "Incorporate snacks and beverages based on the user's preference for '{}'.",
            request.snack_beverage_preferences
        )
    };

    format!(
        "**Meal Structure:** The user wants {} meals per day. Create a full day's meal plan \
         based on these ideas: {}. Suggest healthy, complementary recipes for any meals where \
         the user didn't provide an idea. {snacks} The combined nutrition of all meals and \
         snacks must meet the daily target.",
        request.meals_per_day,
        ideas.join(", ")
    )
}

fn budget_instruction(request: &MealPlanRequest) -> String {
    match request.budget {
        Some(budget) => format!(
            "Budget: Under ${budget}. If this budget is not feasible, find the cheapest \
             possible option and state in the plan summary that the budget was exceeded."
        ),
        None => "Budget: No budget specified.".to_string(),
    }
}

/// Builds the full generation prompt. When `existing` is given, the
/// assistant is told to treat that grocery list as authoritative and keep
/// the user's original goals and structure fixed.
pub fn build_plan_prompt(
    profile: &Profile,
    workouts: &[Workout],
    split: MacroSplit,
    goals: NutritionGoals,
    request: &MealPlanRequest,
    existing: Option<&[GroceryItem]>,
    today: Date,
) -> String {
    let age = profile.dob.map_or(30, |dob| age_from_dob(dob, today));
    let gender = profile.gender.map_or("unspecified", |g| match g {
        Gender::Male => "male",
        Gender::Female => "female",
    });

    let action = if existing.is_some() {
        "The user has modified their grocery list. Please recalculate the meal plan based on \
         this *new list*. Update the instructions and nutritional info to match. The user's \
         original goals and meal structure preference remain the same."
    } else {
        "Based on ALL the user information, please generate a detailed meal plan."
    };

    let grocery_list_text = existing.map_or(String::new(), |items| {
        let lines: Vec<String> = items.iter().map(GroceryItem::to_line).collect();
        format!(
            "\n\nHere is the updated grocery list to use:\n{}",
            lines.join("\n")
        )
    });

    let store = if request.store.is_empty() {
        "any major grocery store"
    } else {
        &request.store
    };

    format!(
        "You are an expert nutrition and meal planning assistant.\n\
         **User Profile & Goals:**\n\
         - Age: {age}, Gender: {gender}\n\
         - Current Weight: {current_weight} lbs, Goal Weight: {goal_weight} lbs\n\
         - Height: {height_ft}' {height_in}\"\n\
         - Daily Activity/Job: {activity}\n\
         - Workouts: {workouts}\n\
         - Desired Weekly Weight Loss: {weekly_loss} lbs/week\n\
         - Daily Calorie Target: ~{calories} calories.\n\
         - Daily Macros: ~{protein_g}g Protein ({protein_pct}%), ~{carbs_g}g Carbs \
         ({carbs_pct}%), ~{fat_g}g Fat ({fat_pct}%).\n\n\
         **User Request:**\n\
         - Meal Plan for: {days} days\n\
         - Store: {store}, {budget}\n\n\
         {meal_structure}\n\
         **Action:** {action}{grocery_list_text}\n\n\
         **Output:** Respond ONLY with structured text using these exact section headers in \
         brackets: [PLAN SUMMARY], [GROCERY LIST], [INSTRUCTIONS], [NUTRITION], [TOTAL COST].\n\
         For [GROCERY LIST], each item must list the **total quantity needed for the entire \
         {days}-day plan** and be on a new line in the format: id: value; name: value; \
         quantity: value; price: value.\n\
         For [INSTRUCTIONS], use markdown subheadings (e.g., ### Breakfast, ### Lunch) to \
         separate the details for each meal. **At the end of the instructions for each cooked \
         meal, add a \"### Portioning\" subsection explaining how to divide the total cooked \
         food to create single servings.**\n\
         For [NUTRITION], use markdown subheadings to detail the nutrition for each meal and \
         a final ### Total line for the day's combined nutrition.\n\
         For [TOTAL COST], provide just the number.\n\n\
         **IMPORTANT:** For all ingredient quantities, use imperial units (e.g., lbs, oz, \
         cups, tbsp), not metric units.",
        current_weight = profile.current_weight.unwrap_or(0.0),
        goal_weight = profile.goal_weight.unwrap_or(0.0),
        height_ft = profile.height_ft.unwrap_or(0.0),
        height_in = profile.height_in.unwrap_or(0.0),
        activity = profile.activity_level.label(),
        workouts = workouts_description(workouts),
        weekly_loss = profile.weekly_loss.lbs_per_week(),
        calories = goals.calories,
        protein_g = goals.protein_g,
        protein_pct = split.protein,
        carbs_g = goals.carbs_g,
        carbs_pct = split.carbs,
        fat_g = goals.fat_g,
        fat_pct = split.fat,
        days = request.days,
        budget = budget_instruction(request),
        meal_structure = meal_structure_instruction(request),
    )
}

/// Constrained prompt for the substitution impact check. The response
/// format is parsed leniently in `services::parse_impact`.
pub fn build_impact_prompt(old_name: &str, new_name: &str) -> String {
    format!(
        "A user wants to replace '{old_name}' with '{new_name}'. Will this significantly \
         alter the nutritional profile or taste? Respond ONLY with text in this exact format \
         on separate lines:\nimpact: low | high\nwarning: Brief explanation."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{ActivityLevel, Gender, WeeklyLoss};
    use time::macros::date;

    fn profile() -> Profile {
        Profile {
            dob: Some(date!(1996 - 03 - 12)),
            gender: Some(Gender::Female),
            current_weight: Some(160.0),
            goal_weight: Some(145.0),
            weekly_loss: WeeklyLoss::One,
            height_ft: Some(5.0),
            height_in: Some(6.0),
            activity_level: ActivityLevel::LightlyActive,
        }
    }

    fn goals() -> NutritionGoals {
        NutritionGoals {
            calories: 1650,
            protein_g: 124,
            carbs_g: 165,
            fat_g: 55,
        }
    }

    #[test]
    fn omad_prompt_forbids_snacks() {
        let request = MealPlanRequest {
            meal_idea: "Salmon and Asparagus".into(),
            ..MealPlanRequest::default()
        };
        let prompt = build_plan_prompt(
            &profile(),
            &[],
            MacroSplit::default(),
            goals(),
            &request,
            None,
            date!(2026 - 08 - 30),
        );
        assert!(prompt.contains("One Meal a Day (OMAD)"));
        assert!(prompt.contains("Salmon and Asparagus"));
        assert!(prompt.contains("Do NOT suggest snacks"));
        assert!(prompt.contains("[PLAN SUMMARY], [GROCERY LIST], [INSTRUCTIONS], [NUTRITION], [TOTAL COST]"));
        assert!(prompt.contains("Age: 30, Gender: female"));
        assert!(prompt.contains("Lightly Active"));
    }

    #[test]
    fn multi_meal_prompt_lists_ideas_and_falls_back_to_chefs_choice() {
        let request = MealPlanRequest {
            meals_per_day: 3,
            meal_idea_2: "Chicken wraps".into(),
            snack_beverage_preferences: "Protein shake".into(),
            ..MealPlanRequest::default()
        };
        let prompt = build_plan_prompt(
            &profile(),
            &[],
            MacroSplit::default(),
            goals(),
            &request,
            None,
            date!(2026 - 08 - 30),
        );
        assert!(prompt.contains("Meal 1 Idea: Chef's Choice"));
        assert!(prompt.contains("Meal 2 Idea: Chicken wraps"));
        assert!(!prompt.contains("Meal 3 Idea"));
        assert!(prompt.contains("preference for 'Protein shake'"));
    }

    #[test]
    fn recalculation_appends_authoritative_list() {
        let items = vec![GroceryItem {
            id: "ing-1".into(),
            name: "Salmon".into(),
            quantity: "2 lbs".into(),
            price: 18.99,
        }];
        let prompt = build_plan_prompt(
            &profile(),
            &[],
            MacroSplit::default(),
            goals(),
            &MealPlanRequest::default(),
            Some(&items),
            date!(2026 - 08 - 30),
        );
        assert!(prompt.contains("recalculate the meal plan"));
        assert!(prompt.contains("original goals and meal structure preference remain the same"));
        assert!(prompt.contains("id: ing-1; name: Salmon; quantity: 2 lbs; price: 18.99"));
    }

    #[test]
    fn budget_clause_mentions_exceeded_fallback() {
        let request = MealPlanRequest {
            store: "Walmart".into(),
            budget: Some(100.0),
            ..MealPlanRequest::default()
        };
        let prompt = build_plan_prompt(
            &profile(),
            &[],
            MacroSplit::default(),
            goals(),
            &request,
            None,
            date!(2026 - 08 - 30),
        );
        assert!(prompt.contains("Store: Walmart, Budget: Under $100."));
        assert!(prompt.contains("budget was exceeded"));
    }

    #[test]
    fn workout_narration() {
        let workouts = vec![
            Workout {
                exercise: "Running".into(),
                days_per_week: Some(3),
                duration_min: None,
                distance_mi: Some(3.0),
            },
            Workout {
                exercise: "Lifting".into(),
                days_per_week: Some(1),
                duration_min: Some(45.0),
                distance_mi: None,
            },
        ];
        assert_eq!(
            workouts_description(&workouts),
            "Running for 3 miles, 3 days/week; Lifting for 45 mins, 1 day/week"
        );
        assert_eq!(workouts_description(&[]), "None specified");
    }
}
