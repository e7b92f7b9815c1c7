//! Energy expenditure model: Mifflin-St Jeor BMR, activity-adjusted TDEE
//! and MET-based workout calories, combined into a daily calorie target.

use time::Date;

use crate::profile::{Gender, Profile, Workout};
use crate::units::{age_from_dob, height_to_cm, lbs_to_kg};

/// kcal/day deficit per lb/week of weight loss (~3500 kcal per lb).
const KCAL_PER_LB_WEEK: f64 = 500.0;

/// MET lookup by keyword. First match wins, so "run/walk" counts as a run.
fn met_for(exercise: &str) -> f64 {
    let t = exercise.to_lowercase();
    if t.contains("run") {
        9.8
    } else if t.contains("jog") {
        7.0
    } else if t.contains("walk") {
        3.5
    } else if t.contains("lift") || t.contains("strength") {
        5.0
    } else if t.contains("cycl") || t.contains("bike") {
        7.5
    } else if t.contains("yoga") {
        2.5
    } else {
        4.0
    }
}

/// Assumed pace in minutes per mile for distance-based entries.
fn pace_min_per_mile(exercise: &str) -> f64 {
    let t = exercise.to_lowercase();
    if t.contains("run") {
        10.0
    } else if t.contains("jog") {
        12.0
    } else {
        15.0
    }
}

pub fn bmr(weight_kg: f64, height_cm: f64, age: i32, gender: Gender) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age);
    match gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    }
}

fn session_hours(workout: &Workout) -> f64 {
    if let Some(distance) = workout.distance_mi.filter(|d| *d > 0.0) {
        distance * pace_min_per_mile(&workout.exercise) / 60.0
    } else if let Some(duration) = workout.duration_min.filter(|d| *d > 0.0) {
        duration / 60.0
    } else {
        0.0
    }
}

/// Weekly workout calories across all workouts. A workout missing its type,
/// frequency, or both duration and distance contributes nothing.
pub fn weekly_workout_kcal(workouts: &[Workout], weight_kg: f64) -> f64 {
    workouts
        .iter()
        .filter(|w| !w.exercise.is_empty())
        .filter(|w| w.days_per_week.is_some_and(|d| d > 0))
        .map(|w| {
            let hours = session_hours(w);
            if hours > 0.0 {
                let per_session = met_for(&w.exercise) * weight_kg * hours;
                per_session * f64::from(w.days_per_week.unwrap_or(0))
            } else {
                0.0
            }
        })
        .sum()
}

/// Daily calorie target for a complete profile, or `None` when the profile
/// is incomplete or no safe (positive) target is computable.
pub fn calorie_target(profile: &Profile, workouts: &[Workout], today: Date) -> Option<f64> {
    let dob = profile.dob?;
    let gender = profile.gender?;
    let weight = profile.current_weight?;
    let height_ft = profile.height_ft?;
    let height_in = profile.height_in?;
    profile.goal_weight?;

    let age = age_from_dob(dob, today);
    let weight_kg = lbs_to_kg(weight);
    let height_cm = height_to_cm(height_ft, height_in);

    let tdee_base = bmr(weight_kg, height_cm, age, gender) * profile.activity_level.multiplier();
    let daily_workout = weekly_workout_kcal(workouts, weight_kg) / 7.0;
    let target = tdee_base + daily_workout - profile.weekly_loss.lbs_per_week() * KCAL_PER_LB_WEEK;

    (target > 0.0).then_some(target)
}
