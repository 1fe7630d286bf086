use crate::filters::FoodFilter;
use crate::models::FoodItem;
use crate::services::MealRuleSet;

/// Keeps foods whose category suits the meal and is not forbidden for it.
#[derive(Debug, Clone)]
pub struct MealAppropriatenessFilter<'a> {
    rules: &'a MealRuleSet,
}

impl<'a> MealAppropriatenessFilter<'a> {
    pub fn new(rules: &'a MealRuleSet) -> Self {
        Self { rules }
    }
}

impl FoodFilter for MealAppropriatenessFilter<'_> {
    fn accepts(&self, food: &FoodItem) -> bool {
        self.rules.is_appropriate(food) && !self.rules.is_forbidden(food)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NutritionProfile;
    use crate::services::FoodTag;

    fn food_in(category: &str) -> FoodItem {
        FoodItem::new(
            "1",
            "x",
            category,
            category,
            NutritionProfile::new(100.0, 5.0, 15.0, 2.0),
            0.0,
        )
    }

    #[test]
    fn test_breakfast_rules() {
        let rules = MealRuleSet::new(
            &["Dairy, Eggs & Salads"],
            &["Fruits & Vegetables"],
            &["Meat & Fish"],
            &[FoodTag::Protein],
        );
        let filter = MealAppropriatenessFilter::new(&rules);
        assert!(filter.accepts(&food_in("Dairy, Eggs & Salads")));
        assert!(filter.accepts(&food_in("Fruits & Vegetables")));
        assert!(!filter.accepts(&food_in("Meat & Fish")));
        assert!(!filter.accepts(&food_in("Frozen")));
    }

    #[test]
    fn test_forbidden_wins_over_listed() {
        let rules = MealRuleSet::new(&["Snacks & Sweets"], &[], &["Snacks & Sweets"], &[]);
        let filter = MealAppropriatenessFilter::new(&rules);
        assert!(!filter.accepts(&food_in("Snacks & Sweets")));
    }
}
