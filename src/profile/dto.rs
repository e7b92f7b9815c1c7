use serde::{Deserialize, Serialize};
use time::Date;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// Daily activity / job level, mapped to the standard TDEE multipliers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    #[default]
    Sedentary,
    LightlyActive,
    ModeratelyActive,
    VeryActive,
    ExtremelyActive,
}

impl ActivityLevel {
    pub fn multiplier(self) -> f64 {
        match self {
            Self::Sedentary => 1.2,
            Self::LightlyActive => 1.375,
            Self::ModeratelyActive => 1.55,
            Self::VeryActive => 1.725,
            Self::ExtremelyActive => 1.9,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Sedentary => "Sedentary",
            Self::LightlyActive => "Lightly Active",
            Self::ModeratelyActive => "Moderately Active",
            Self::VeryActive => "Very Active",
            Self::ExtremelyActive => "Extremely Active",
        }
    }
}

/// Desired weekly weight loss, restricted to the supported rates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum WeeklyLoss {
    Half,
    #[default]
    One,
    OneAndHalf,
    Two,
}

impl WeeklyLoss {
    pub fn lbs_per_week(self) -> f64 {
        match self {
            Self::Half => 0.5,
            Self::One => 1.0,
            Self::OneAndHalf => 1.5,
            Self::Two => 2.0,
        }
    }
}

impl TryFrom<f64> for WeeklyLoss {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if (value - 0.5).abs() < f64::EPSILON {
            Ok(Self::Half)
        } else if (value - 1.0).abs() < f64::EPSILON {
            Ok(Self::One)
        } else if (value - 1.5).abs() < f64::EPSILON {
            Ok(Self::OneAndHalf)
        } else if (value - 2.0).abs() < f64::EPSILON {
            Ok(Self::Two)
        } else {
            Err(format!(
                "unsupported weekly loss rate {value}; expected 0.5, 1, 1.5 or 2"
            ))
        }
    }
}

impl From<WeeklyLoss> for f64 {
    fn from(value: WeeklyLoss) -> Self {
        value.lbs_per_week()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    pub dob: Option<Date>,
    pub gender: Option<Gender>,
    /// Current weight in lbs.
    pub current_weight: Option<f64>,
    /// Goal weight in lbs.
    pub goal_weight: Option<f64>,
    #[serde(default)]
    pub weekly_loss: WeeklyLoss,
    pub height_ft: Option<f64>,
    pub height_in: Option<f64>,
    #[serde(default)]
    pub activity_level: ActivityLevel,
}

impl Profile {
    /// All six core fields must be filled in before goals can be computed
    /// or a plan generated. Weekly loss and activity level have defaults.
    pub fn is_complete(&self) -> bool {
        self.dob.is_some()
            && self.gender.is_some()
            && self.current_weight.is_some()
            && self.goal_weight.is_some()
            && self.height_ft.is_some()
            && self.height_in.is_some()
    }

    pub fn apply(&mut self, field: ProfileField) {
        match field {
            ProfileField::Dob(v) => self.dob = v,
            ProfileField::Gender(v) => self.gender = v,
            ProfileField::CurrentWeight(v) => self.current_weight = v,
            ProfileField::GoalWeight(v) => self.goal_weight = v,
            ProfileField::WeeklyLoss(v) => self.weekly_loss = v,
            ProfileField::HeightFt(v) => self.height_ft = v,
            ProfileField::HeightIn(v) => self.height_in = v,
            ProfileField::ActivityLevel(v) => self.activity_level = v,
        }
    }
}

/// Single typed field edit; one edit triggers one derived-state recompute.
#[derive(Debug, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum ProfileField {
    Dob(Option<Date>),
    Gender(Option<Gender>),
    CurrentWeight(Option<f64>),
    GoalWeight(Option<f64>),
    WeeklyLoss(WeeklyLoss),
    HeightFt(Option<f64>),
    HeightIn(Option<f64>),
    ActivityLevel(ActivityLevel),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Workout {
    /// Free-text exercise type, e.g. "Running".
    pub exercise: String,
    pub days_per_week: Option<u32>,
    /// Minutes per session; mutually exclusive with `distance_mi`.
    pub duration_min: Option<f64>,
    /// Miles per session, for distance-style exercises.
    pub distance_mi: Option<f64>,
}

const DEFAULT_DISTANCE_MI: f64 = 3.0;
const DEFAULT_DURATION_MIN: f64 = 45.0;

impl Workout {
    pub fn is_distance_style(exercise: &str) -> bool {
        let t = exercise.to_lowercase();
        t.contains("run") || t.contains("walk") || t.contains("jog")
    }

    /// Changing the exercise type clears the field that no longer applies
    /// and seeds the applicable one with a default.
    pub fn set_exercise(&mut self, exercise: String) {
        if Self::is_distance_style(&exercise) {
            self.duration_min = None;
            self.distance_mi = self.distance_mi.or(Some(DEFAULT_DISTANCE_MI));
        } else {
            self.distance_mi = None;
            self.duration_min = self.duration_min.or(Some(DEFAULT_DURATION_MIN));
        }
        self.exercise = exercise;
    }

    pub fn apply(&mut self, field: WorkoutField) {
        match field {
            WorkoutField::Exercise(v) => self.set_exercise(v),
            WorkoutField::DaysPerWeek(v) => self.days_per_week = v,
            WorkoutField::DurationMin(v) => self.duration_min = v,
            WorkoutField::DistanceMi(v) => self.distance_mi = v,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum WorkoutField {
    Exercise(String),
    DaysPerWeek(Option<u32>),
    DurationMin(Option<f64>),
    DistanceMi(Option<f64>),
}
