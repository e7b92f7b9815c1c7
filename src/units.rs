use time::Date;

pub const LBS_PER_KG: f64 = 0.453592;
pub const CM_PER_FOOT: f64 = 30.48;
pub const CM_PER_INCH: f64 = 2.54;

pub fn lbs_to_kg(lbs: f64) -> f64 {
    lbs * LBS_PER_KG
}

pub fn height_to_cm(feet: f64, inches: f64) -> f64 {
    feet * CM_PER_FOOT + inches * CM_PER_INCH
}

/// Calendar-year age: birthday within the current year is ignored.
pub fn age_from_dob(dob: Date, today: Date) -> i32 {
    today.year() - dob.year()
}

/// Rounds halves toward positive infinity (-0.5 rounds to 0, 0.5 to 1),
/// which is what the macro rebalance arithmetic expects.
pub fn round_half_up(x: f64) -> i32 {
    (x + 0.5).floor() as i32
}
