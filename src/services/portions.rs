use rand::Rng;
use serde::Serialize;

use crate::config::{PortionLimits, PortionTable};
use crate::models::{FoodItem, PortionKey};
use crate::planner::constants::{PORTION_JITTER_MAX, PORTION_JITTER_MIN};

/// Portion limits for a food, as shown by `inspect`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PortionInfo {
    pub min: f64,
    pub max: f64,
    pub suggested: f64,
    /// True when the limits come from a subcategory entry rather than the default.
    pub has_specific_limit: bool,
}

/// Portion-size lookups, clamping and estimation.
#[derive(Debug, Clone)]
pub struct PortionCalculator {
    table: PortionTable,
}

impl PortionCalculator {
    pub fn new(table: PortionTable) -> Self {
        Self { table }
    }

    pub fn limits_for(&self, food: &FoodItem) -> PortionLimits {
        self.limits_for_key(&food.portion_key())
    }

    pub fn limits_for_key(&self, key: &PortionKey<'_>) -> PortionLimits {
        self.table
            .by_subcategory
            .get(key.subcategory)
            .copied()
            .unwrap_or(self.table.default)
    }

    /// Rounds to the nearest gram and clamps into the food's limits.
    ///
    /// NaN and negative infinity map to the minimum, positive infinity to the
    /// maximum, so the result is always inside `[min, max]`.
    pub fn apply_limits(&self, food: &FoodItem, grams: f64) -> f64 {
        let limits = self.limits_for(food);
        if grams.is_nan() || grams == f64::NEG_INFINITY {
            return limits.min;
        }
        if grams == f64::INFINITY {
            return limits.max;
        }
        grams.round().max(limits.min).min(limits.max)
    }

    /// Calorie-proportional portion with random jitter, before clamping.
    pub fn estimate_portion(
        &self,
        food: &FoodItem,
        remaining_calories: f64,
        remaining_slots: usize,
        rng: &mut impl Rng,
    ) -> f64 {
        let cal100 = food.nutrition_per_100g.calories;
        if cal100 <= 0.0 || remaining_slots == 0 {
            return self.limits_for(food).midpoint();
        }
        let per_slot = remaining_calories / remaining_slots as f64;
        let base = per_slot / cal100 * 100.0;
        base * rng.gen_range(PORTION_JITTER_MIN..PORTION_JITTER_MAX)
    }

    pub fn portion_info(&self, food: &FoodItem) -> PortionInfo {
        let limits = self.limits_for(food);
        PortionInfo {
            min: limits.min,
            max: limits.max,
            suggested: limits.midpoint().round(),
            has_specific_limit: self.table.by_subcategory.contains_key(&food.subcategory),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::models::NutritionProfile;

    fn calculator() -> PortionCalculator {
        PortionCalculator::new(PortionTable::default())
    }

    fn food(subcategory: &str, cal: f64) -> FoodItem {
        FoodItem::new(
            "1",
            "x",
            "Any",
            subcategory,
            NutritionProfile::new(cal, 5.0, 20.0, 1.0),
            0.0,
        )
    }

    #[test]
    fn test_limits_lookup_and_default() {
        let calc = calculator();
        assert_eq!(calc.limits_for(&food("Cheese", 100.0)), PortionLimits::new(30.0, 150.0));
        assert_eq!(calc.limits_for(&food("Unknown", 100.0)), PortionLimits::new(50.0, 1000.0));
        assert_eq!(
            calc.limits_for_key(&PortionKey::new("Whatever", "Spices")),
            PortionLimits::new(2.0, 15.0)
        );
    }

    #[test]
    fn test_apply_limits_rounds_and_clamps() {
        let calc = calculator();
        let cheese = food("Cheese", 300.0);
        assert_eq!(calc.apply_limits(&cheese, 72.4), 72.0);
        assert_eq!(calc.apply_limits(&cheese, 72.6), 73.0);
        assert_eq!(calc.apply_limits(&cheese, 10.0), 30.0);
        assert_eq!(calc.apply_limits(&cheese, 500.0), 150.0);
    }

    #[test]
    fn test_apply_limits_extreme_inputs_stay_in_range() {
        let calc = calculator();
        let cheese = food("Cheese", 300.0);
        assert_eq!(calc.apply_limits(&cheese, -250.0), 30.0);
        assert_eq!(calc.apply_limits(&cheese, 1e12), 150.0);
        assert_eq!(calc.apply_limits(&cheese, f64::NAN), 30.0);
        assert_eq!(calc.apply_limits(&cheese, f64::INFINITY), 150.0);
        assert_eq!(calc.apply_limits(&cheese, f64::NEG_INFINITY), 30.0);
    }

    #[test]
    fn test_estimate_portion_within_jitter() {
        let calc = calculator();
        let rice = food("Rice & Legumes", 130.0);
        let mut rng = StdRng::seed_from_u64(7);
        // 650 / 2 = 325 kcal per slot -> 250 g before jitter
        for _ in 0..50 {
            let grams = calc.estimate_portion(&rice, 650.0, 2, &mut rng);
            assert!((175.0..=325.0).contains(&grams), "got {grams}");
        }
    }

    #[test]
    fn test_estimate_portion_falls_back_to_midpoint() {
        let calc = calculator();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(calc.estimate_portion(&food("Cheese", 0.0), 500.0, 2, &mut rng), 90.0);
        assert_eq!(calc.estimate_portion(&food("Cheese", 300.0), 500.0, 0, &mut rng), 90.0);
    }

    #[test]
    fn test_portion_info() {
        let calc = calculator();
        let info = calc.portion_info(&food("Milk", 60.0));
        assert_eq!(info.min, 100.0);
        assert_eq!(info.max, 300.0);
        assert_eq!(info.suggested, 200.0);
        assert!(info.has_specific_limit);
        assert!(!calc.portion_info(&food("Unknown", 60.0)).has_specific_limit);
    }
}
