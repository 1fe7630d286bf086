use crate::config::CategoryRules;
use crate::filters::FoodFilter;
use crate::models::{FoodItem, Menu};
use crate::planner::Rejection;

/// Category exclusions, menu-level requirements and per-menu caps.
#[derive(Debug, Clone)]
pub struct CategoryPreferenceFilter {
    rules: CategoryRules,
}

impl CategoryPreferenceFilter {
    pub fn new(rules: CategoryRules) -> Self {
        Self { rules }
    }

    /// First required category, then subcategory, missing from the menu.
    pub fn validate_required(&self, menu: &Menu) -> Result<(), Rejection> {
        let categories = menu.categories();
        if let Some(missing) = self
            .rules
            .required_categories
            .iter()
            .find(|c| !categories.contains(c.as_str()))
        {
            return Err(Rejection::MissingCategory(missing.clone()));
        }

        let subcategories = menu.subcategory_counts();
        if let Some(missing) = self
            .rules
            .required_subcategories
            .iter()
            .find(|s| !subcategories.contains_key(s.as_str()))
        {
            return Err(Rejection::MissingSubcategory(missing.clone()));
        }
        Ok(())
    }

    /// Whether adding `food` keeps the menu under its category caps.
    pub fn within_menu_limits(&self, food: &FoodItem, menu: &Menu) -> bool {
        if let Some(&max) = self.rules.category_limits.get(&food.category) {
            let count = menu
                .entries()
                .iter()
                .filter(|e| e.food.category == food.category)
                .count();
            if count >= max {
                return false;
            }
        }
        if let Some(&max) = self.rules.subcategory_limits.get(&food.subcategory) {
            let count = menu
                .entries()
                .iter()
                .filter(|e| e.food.subcategory == food.subcategory)
                .count();
            if count >= max {
                return false;
            }
        }
        true
    }
}

impl FoodFilter for CategoryPreferenceFilter {
    fn accepts(&self, food: &FoodItem) -> bool {
        !self.rules.excluded_categories.contains(&food.category)
            && !self.rules.excluded_subcategories.contains(&food.subcategory)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::{MenuEntry, NutritionProfile};

    fn food(code: &str, category: &str, subcategory: &str) -> FoodItem {
        FoodItem::new(
            code,
            code,
            category,
            subcategory,
            NutritionProfile::new(130.0, 2.7, 28.0, 0.3),
            0.0,
        )
    }

    fn menu_of(foods: Vec<FoodItem>) -> Menu {
        let mut menu = Menu::new();
        for f in foods {
            menu.push(MenuEntry::new(Arc::new(f), 100.0));
        }
        menu
    }

    #[test]
    fn test_default_exclusions() {
        let filter = CategoryPreferenceFilter::new(CategoryRules::default());
        assert!(!filter.accepts(&food("1", "Canned, Cooking & Baking", "Spices")));
        assert!(filter.accepts(&food("2", "Legumes & Grains", "Rice & Legumes")));
    }

    #[test]
    fn test_excluded_category() {
        let rules = CategoryRules {
            excluded_categories: vec!["Frozen".to_string()],
            ..Default::default()
        };
        let filter = CategoryPreferenceFilter::new(rules);
        assert!(!filter.accepts(&food("1", "Frozen", "Pizza")));
    }

    #[test]
    fn test_validate_required_reports_category_first() {
        let rules = CategoryRules {
            required_categories: vec!["Meat & Fish".to_string()],
            required_subcategories: vec!["Cheese".to_string()],
            ..Default::default()
        };
        let filter = CategoryPreferenceFilter::new(rules);

        let empty = Menu::new();
        assert_eq!(
            filter.validate_required(&empty),
            Err(Rejection::MissingCategory("Meat & Fish".to_string()))
        );

        let meat_only = menu_of(vec![food("1", "Meat & Fish", "Meat & Fish")]);
        assert_eq!(
            filter.validate_required(&meat_only),
            Err(Rejection::MissingSubcategory("Cheese".to_string()))
        );

        let both = menu_of(vec![
            food("1", "Meat & Fish", "Meat & Fish"),
            food("2", "Dairy, Eggs & Salads", "Cheese"),
        ]);
        assert_eq!(filter.validate_required(&both), Ok(()));
    }

    #[test]
    fn test_menu_limits() {
        let mut rules = CategoryRules::default();
        rules.category_limits.insert("Meat & Fish".to_string(), 1);
        rules.subcategory_limits.insert("Cheese".to_string(), 2);
        let filter = CategoryPreferenceFilter::new(rules);

        let menu = menu_of(vec![
            food("1", "Meat & Fish", "Meat & Fish"),
            food("2", "Dairy, Eggs & Salads", "Cheese"),
        ]);
        assert!(!filter.within_menu_limits(&food("3", "Meat & Fish", "Meat & Fish"), &menu));
        assert!(filter.within_menu_limits(&food("4", "Dairy, Eggs & Salads", "Cheese"), &menu));
        assert!(filter.within_menu_limits(&food("5", "Frozen", "Pizza"), &menu));
    }

    #[test]
    fn test_menu_limits_noop_by_default() {
        let filter = CategoryPreferenceFilter::new(CategoryRules::default());
        let menu = menu_of(vec![food("1", "Meat & Fish", "Meat & Fish")]);
        assert!(filter.within_menu_limits(&food("2", "Meat & Fish", "Meat & Fish"), &menu));
    }
}
