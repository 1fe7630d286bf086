use log::{debug, warn};
use serde::Serialize;

use crate::config::EngineConfig;
use crate::filters::{
    CategoryPreferenceFilter, FoodFilter, MealAppropriatenessFilter, NutritionalSoundnessFilter,
};
use crate::models::SharedFood;
use crate::services::MealType;

/// Pool sizes before and after the static pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FilterStats {
    pub original: usize,
    pub remaining: usize,
    pub removed: usize,
    pub remaining_pct: f64,
}

impl FilterStats {
    pub fn new(original: usize, remaining: usize) -> Self {
        let remaining_pct = if original == 0 {
            0.0
        } else {
            remaining as f64 / original as f64 * 100.0
        };
        Self {
            original,
            remaining,
            removed: original.saturating_sub(remaining),
            remaining_pct,
        }
    }
}

/// Runs soundness, category and (optionally) meal filters over a catalog.
#[derive(Debug, Clone)]
pub struct FoodFilterService {
    soundness: NutritionalSoundnessFilter,
    category: CategoryPreferenceFilter,
    config: EngineConfig,
}

impl FoodFilterService {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            soundness: NutritionalSoundnessFilter::new(&config.limits),
            category: CategoryPreferenceFilter::new(config.categories.clone()),
            config: config.clone(),
        }
    }

    pub fn category_filter(&self) -> &CategoryPreferenceFilter {
        &self.category
    }

    /// Builds the eligible pool for one generate call.
    pub fn eligible_pool(
        &self,
        foods: Vec<SharedFood>,
        meal_type: Option<MealType>,
    ) -> (Vec<SharedFood>, FilterStats) {
        let original = foods.len();

        let pool = self.soundness.filter(foods);
        debug!("Soundness filter kept {}/{} foods", pool.len(), original);

        let before = pool.len();
        let mut pool = self.category.filter(pool);
        debug!("Category filter kept {}/{} foods", pool.len(), before);

        if let Some(meal) = meal_type {
            match self.config.rules_for(meal) {
                Some(rules) => {
                    let before = pool.len();
                    pool = MealAppropriatenessFilter::new(rules).filter(pool);
                    debug!("Meal filter ({}) kept {}/{} foods", meal, pool.len(), before);
                }
                None => warn!("No meal rules configured for {}; skipping meal filter", meal),
            }
        }

        let stats = FilterStats::new(original, pool.len());
        (pool, stats)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use super::*;
    use crate::models::{FoodItem, NutritionProfile};

    fn food(code: &str, category: &str, subcategory: &str, n: NutritionProfile) -> SharedFood {
        Arc::new(FoodItem::new(code, code, category, subcategory, n, 0.0))
    }

    fn catalog() -> Vec<SharedFood> {
        let chicken = NutritionProfile::new(165.0, 31.0, 0.0, 3.6);
        let rice = NutritionProfile::new(130.0, 2.7, 28.0, 0.3);
        let chocolate = NutritionProfile::new(535.0, 7.6, 59.0, 30.0);
        vec![
            food("1", "Meat & Fish", "Meat & Fish", chicken),
            food("2", "Legumes & Grains", "Rice & Legumes", rice),
            food("3", "Snacks & Sweets", "Sweets", chocolate),
            food("4", "Canned, Cooking & Baking", "Spices", rice),
            food("5", "Meat & Fish", "Meat & Fish", NutritionProfile::new(300.0, 1.0, 1.0, 1.0)),
        ]
    }

    #[test]
    fn test_pipeline_without_meal() {
        let service = FoodFilterService::new(&EngineConfig::default());
        let (pool, stats) = service.eligible_pool(catalog(), None);
        let codes: Vec<_> = pool.iter().map(|f| f.item_code.as_str()).collect();
        assert_eq!(codes, vec!["1", "2", "3"]);
        assert_eq!(stats, FilterStats::new(5, 3));
        assert_eq!(stats.removed, 2);
        assert!((stats.remaining_pct - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_pipeline_with_meal() {
        let service = FoodFilterService::new(&EngineConfig::default());
        let (pool, _) = service.eligible_pool(catalog(), Some(MealType::Lunch));
        let codes: Vec<_> = pool.iter().map(|f| f.item_code.as_str()).collect();
        assert_eq!(codes, vec!["1", "2"]);
    }

    #[test]
    fn test_missing_meal_rules_skip_meal_filter() {
        let config = EngineConfig {
            meal_rules: HashMap::new(),
            ..Default::default()
        };
        let service = FoodFilterService::new(&config);
        let (pool, _) = service.eligible_pool(catalog(), Some(MealType::Lunch));
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn test_stats_for_empty_catalog() {
        let stats = FilterStats::new(0, 0);
        assert_eq!(stats.remaining_pct, 0.0);
        assert_eq!(stats.removed, 0);
    }
}
