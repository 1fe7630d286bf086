use crate::config::NutritionLimits;
use crate::filters::FoodFilter;
use crate::models::{FoodItem, Menu};
use crate::planner::constants::BALANCE_REFERENCE_PORTION;
use crate::services::FoodClassifier;

/// Dietary ceilings checked against the menu under construction.
///
/// Built fresh for every fill step, since the verdict depends on what is
/// already on the menu.
pub struct BalanceFilter<'a> {
    classifier: &'a FoodClassifier,
    limits: &'a NutritionLimits,
    menu: &'a Menu,
}

impl<'a> BalanceFilter<'a> {
    pub fn new(classifier: &'a FoodClassifier, limits: &'a NutritionLimits, menu: &'a Menu) -> Self {
        Self {
            classifier,
            limits,
            menu,
        }
    }

    /// Sugar calorie share if `food` were added at the reference portion.
    fn sugar_fraction_with(&self, food: &FoodItem) -> f64 {
        let (sugar, total) = self
            .menu
            .entries()
            .iter()
            .fold((0.0, 0.0), |(sugar, total), entry| {
                let cal = entry.nutrition().calories;
                if self.classifier.is_high_sugar(&entry.food) {
                    (sugar + cal, total + cal)
                } else {
                    (sugar, total + cal)
                }
            });
        let added = food.nutrition_for_portion(BALANCE_REFERENCE_PORTION).calories;
        let denominator = total + added;
        if denominator <= 0.0 {
            return 0.0;
        }
        (sugar + added) / denominator
    }

    fn processed_fraction_with(&self) -> f64 {
        let processed = self
            .menu
            .entries()
            .iter()
            .filter(|e| self.classifier.is_processed(&e.food))
            .count();
        (processed + 1) as f64 / (self.menu.len() + 1) as f64
    }
}

impl FoodFilter for BalanceFilter<'_> {
    fn accepts(&self, food: &FoodItem) -> bool {
        if self.classifier.is_high_sugar(food)
            && self.sugar_fraction_with(food) > self.limits.max_sugar_fraction
        {
            return false;
        }
        if self.classifier.is_processed(food)
            && self.processed_fraction_with() > self.limits.max_processed_fraction
        {
            return false;
        }
        true
    }
}
