use serde::{Deserialize, Serialize};

use crate::planner::constants::{
    CALORIES_PER_GRAM_CARBS, CALORIES_PER_GRAM_FAT, CALORIES_PER_GRAM_PROTEIN,
    NUTRITION_CONSISTENCY_TOLERANCE,
};

/// Macro-nutrient vector, either per 100 g or for a concrete portion.
///
/// Macros are in grams. Values are never mutated in place; every arithmetic
/// helper returns a new profile.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NutritionProfile {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Share of calories contributed by each macro (0.0 to 1.0).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MacroRatios {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl NutritionProfile {
    pub fn new(calories: f64, protein: f64, carbs: f64, fat: f64) -> Self {
        Self {
            calories,
            protein,
            carbs,
            fat,
        }
    }

    /// Calories implied by the macros (4/4/9 kcal per gram).
    #[inline]
    pub fn calculated_calories(&self) -> f64 {
        self.protein * CALORIES_PER_GRAM_PROTEIN
            + self.carbs * CALORIES_PER_GRAM_CARBS
            + self.fat * CALORIES_PER_GRAM_FAT
    }

    /// Stated calories must be positive and agree with the macros within 15%.
    pub fn is_valid(&self) -> bool {
        if self.calories <= 0.0 {
            return false;
        }
        let calculated = self.calculated_calories();
        (calculated - self.calories).abs() / self.calories <= NUTRITION_CONSISTENCY_TOLERANCE
    }

    pub fn has_negative(&self) -> bool {
        self.calories < 0.0 || self.protein < 0.0 || self.carbs < 0.0 || self.fat < 0.0
    }

    pub fn add(&self, other: &NutritionProfile) -> NutritionProfile {
        NutritionProfile {
            calories: self.calories + other.calories,
            protein: self.protein + other.protein,
            carbs: self.carbs + other.carbs,
            fat: self.fat + other.fat,
        }
    }

    pub fn scale(&self, factor: f64) -> NutritionProfile {
        NutritionProfile {
            calories: self.calories * factor,
            protein: self.protein * factor,
            carbs: self.carbs * factor,
            fat: self.fat * factor,
        }
    }

    /// Field-wise difference, floored at zero.
    pub fn subtract(&self, other: &NutritionProfile) -> NutritionProfile {
        NutritionProfile {
            calories: (self.calories - other.calories).max(0.0),
            protein: (self.protein - other.protein).max(0.0),
            carbs: (self.carbs - other.carbs).max(0.0),
            fat: (self.fat - other.fat).max(0.0),
        }
    }

    /// Calorie share of each macro, based on macro-derived calories.
    pub fn macro_ratios(&self) -> MacroRatios {
        let total = self.calculated_calories();
        if total <= 0.0 {
            return MacroRatios::default();
        }
        MacroRatios {
            protein: self.protein * CALORIES_PER_GRAM_PROTEIN / total,
            carbs: self.carbs * CALORIES_PER_GRAM_CARBS / total,
            fat: self.fat * CALORIES_PER_GRAM_FAT / total,
        }
    }
}

impl std::fmt::Display for NutritionProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.1} kcal, {:.1}g protein, {:.1}g carbs, {:.1}g fat",
            self.calories, self.protein, self.carbs, self.fat
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculated_calories() {
        let n = NutritionProfile::new(100.0, 10.0, 5.0, 2.0);
        assert!((n.calculated_calories() - 78.0).abs() < 1e-9);
    }

    #[test]
    fn test_is_valid_within_tolerance() {
        // 4*31 + 9*3.6 = 156.4 vs 165 stated: 5.2% off
        let chicken = NutritionProfile::new(165.0, 31.0, 0.0, 3.6);
        assert!(chicken.is_valid());

        // 4*1 + 4*1 + 9*1 = 17 vs 300 stated
        let bogus = NutritionProfile::new(300.0, 1.0, 1.0, 1.0);
        assert!(!bogus.is_valid());
    }

    #[test]
    fn test_is_valid_boundary() {
        // calculated = 115 -> exactly 15% over
        let edge = NutritionProfile::new(100.0, 0.0, 28.75, 0.0);
        assert!(edge.is_valid());

        let over = NutritionProfile::new(100.0, 0.0, 29.0, 0.0);
        assert!(!over.is_valid());
    }

    #[test]
    fn test_is_valid_rejects_non_positive_calories() {
        assert!(!NutritionProfile::new(0.0, 0.0, 0.0, 0.0).is_valid());
        assert!(!NutritionProfile::new(-10.0, 1.0, 1.0, 0.0).is_valid());
    }

    #[test]
    fn test_subtract_floors_at_zero() {
        let a = NutritionProfile::new(100.0, 10.0, 10.0, 5.0);
        let b = NutritionProfile::new(150.0, 4.0, 20.0, 1.0);
        let diff = a.subtract(&b);
        assert_eq!(diff, NutritionProfile::new(0.0, 6.0, 0.0, 4.0));
    }

    #[test]
    fn test_scale_and_add_are_pure() {
        let a = NutritionProfile::new(100.0, 10.0, 10.0, 5.0);
        let doubled = a.scale(2.0);
        let summed = a.add(&a);
        assert_eq!(doubled, summed);
        assert_eq!(a.calories, 100.0);
    }

    #[test]
    fn test_macro_ratios() {
        let n = NutritionProfile::new(100.0, 5.0, 10.0, 20.0 / 9.0);
        let r = n.macro_ratios();
        assert!((r.protein - 0.25).abs() < 1e-9);
        assert!((r.carbs - 0.5).abs() < 1e-9);
        assert!((r.fat - 0.25).abs() < 1e-9);

        assert_eq!(NutritionProfile::default().macro_ratios(), MacroRatios::default());
    }
}
