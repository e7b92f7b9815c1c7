use serde::{Deserialize, Serialize};

use crate::units::round_half_up;

/// No macro may drop below 10% of daily calories.
pub const MACRO_FLOOR: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MacroField {
    Protein,
    Carbs,
    Fat,
}

/// Three-way percentage split of daily calories. Invariants: the fields sum
/// to 100 and each is at least [`MACRO_FLOOR`]. Only [`MacroSplit::rebalance`]
/// produces new splits, so a stored split is always valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroSplit {
    pub protein: i32,
    pub carbs: i32,
    pub fat: i32,
}

impl Default for MacroSplit {
    fn default() -> Self {
        Self {
            protein: 30,
            carbs: 40,
            fat: 30,
        }
    }
}

impl MacroSplit {
    fn get(self, field: MacroField) -> i32 {
        match field {
            MacroField::Protein => self.protein,
            MacroField::Carbs => self.carbs,
            MacroField::Fat => self.fat,
        }
    }

    fn set(&mut self, field: MacroField, value: i32) {
        match field {
            MacroField::Protein => self.protein = value,
            MacroField::Carbs => self.carbs = value,
            MacroField::Fat => self.fat = value,
        }
    }

    /// The two untouched fields, in declaration order.
    fn others(field: MacroField) -> (MacroField, MacroField) {
        match field {
            MacroField::Protein => (MacroField::Carbs, MacroField::Fat),
            MacroField::Carbs => (MacroField::Protein, MacroField::Fat),
            MacroField::Fat => (MacroField::Protein, MacroField::Carbs),
        }
    }

    /// Applies a single-field edit, pulling the delta proportionally from the
    /// other two fields. The second field is recomputed as `100 - v - first`
    /// so the total is exactly 100 under rounding. Returns `None` (split
    /// unchanged) if any resulting field would fall below the floor.
    pub fn rebalance(self, field: MacroField, value: i32) -> Option<Self> {
        let diff = value - self.get(field);
        let (first, second) = Self::others(field);

        let mut first_value = self.get(first);
        let second_old = self.get(second);
        if first_value + second_old > 0 {
            let share = f64::from(first_value) / f64::from(first_value + second_old);
            first_value -= round_half_up(f64::from(diff) * share);
        } else {
            first_value -= diff.div_euclid(2);
        }
        let second_value = 100 - value - first_value;

        if value < MACRO_FLOOR || first_value < MACRO_FLOOR || second_value < MACRO_FLOOR {
            return None;
        }

        let mut next = self;
        next.set(field, value);
        next.set(first, first_value);
        next.set(second, second_value);
        Some(next)
    }

    pub fn sum(self) -> i32 {
        self.protein + self.carbs + self.fat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proportional_pull_from_other_fields() {
        let split = MacroSplit::default(); // 30/40/30
        let next = split.rebalance(MacroField::Protein, 50).unwrap();
        // +20 protein pulls round(20 * 40/70) = 11 from carbs, fat recomputed.
        assert_eq!(next.protein, 50);
        assert_eq!(next.carbs, 29);
        assert_eq!(next.fat, 21);
        assert_eq!(next.sum(), 100);
    }

    #[test]
    fn accepted_edits_always_sum_to_100_and_respect_floor() {
        let mut split = MacroSplit::default();
        let edits = [
            (MacroField::Protein, 45),
            (MacroField::Fat, 15),
            (MacroField::Carbs, 60),
            (MacroField::Protein, 12),
            (MacroField::Fat, 38),
        ];
        for (field, value) in edits {
            if let Some(next) = split.rebalance(field, value) {
                assert_eq!(next.sum(), 100);
                assert!(next.protein >= MACRO_FLOOR);
                assert!(next.carbs >= MACRO_FLOOR);
                assert!(next.fat >= MACRO_FLOOR);
                split = next;
            }
        }
    }

    #[test]
    fn edit_below_floor_is_rejected_wholesale() {
        let split = MacroSplit {
            protein: 40,
            carbs: 10,
            fat: 50,
        };
        // +35 protein would push carbs under 10; nothing changes.
        assert_eq!(split.rebalance(MacroField::Protein, 75), None);
        // Direct edit below the floor is rejected too.
        assert_eq!(split.rebalance(MacroField::Carbs, 5), None);
    }

    #[test]
    fn zero_others_split_delta_evenly() {
        // Not reachable through rebalance, but the redistribution must
        // still behave if both other fields are zero.
        let split = MacroSplit {
            protein: 100,
            carbs: 0,
            fat: 0,
        };
        let next = split.rebalance(MacroField::Protein, 50).unwrap();
        assert_eq!((next.carbs, next.fat), (25, 25));
        assert_eq!(next.sum(), 100);
    }
}
