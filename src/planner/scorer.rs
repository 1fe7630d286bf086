use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::NutritionLimits;
use crate::models::{MacroRatios, Menu, NutritionProfile};
use crate::planner::constants::FAT_SCORE_WEIGHT;
use crate::services::{FoodClassifier, MenuClassification};

/// Composition summary of one menu.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuStats {
    pub total: NutritionProfile,
    pub macro_ratios: MacroRatios,
    pub classification: MenuClassification,
    pub categories: BTreeMap<String, usize>,
    pub subcategories: BTreeMap<String, usize>,
    pub item_count: usize,
    /// 0-100, higher is better.
    pub balance_score: u8,
    /// Mean food score, 0-100.
    pub health_score: u8,
}

/// Relative error of `actual` against a positive `target`; zero otherwise.
fn relative_error(actual: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 0.0;
    }
    (actual - target).abs() / target
}

/// Ranks accepted menus by distance from the target.
#[derive(Debug, Clone)]
pub struct MenuScorer {
    classifier: FoodClassifier,
    limits: NutritionLimits,
}

impl MenuScorer {
    pub fn new(classifier: FoodClassifier, limits: NutritionLimits) -> Self {
        Self { classifier, limits }
    }

    /// Sum of relative macro errors with fat weighted 1.5x. Lower is better;
    /// an empty menu scores infinity.
    pub fn score(&self, menu: &Menu, target: &NutritionProfile) -> f64 {
        if menu.is_empty() {
            return f64::INFINITY;
        }
        let total = menu.total_nutrition();
        relative_error(total.calories, target.calories)
            + relative_error(total.protein, target.protein)
            + relative_error(total.carbs, target.carbs)
            + FAT_SCORE_WEIGHT * relative_error(total.fat, target.fat)
    }

    pub fn menu_stats(&self, menu: &Menu) -> Option<MenuStats> {
        if menu.is_empty() {
            return None;
        }
        let total = menu.total_nutrition();
        let classification = self.classifier.classify_menu(menu);
        Some(MenuStats {
            total,
            macro_ratios: total.macro_ratios(),
            classification,
            categories: menu.category_counts(),
            subcategories: menu.subcategory_counts(),
            item_count: menu.len(),
            balance_score: self.balance_score(menu, &classification),
            health_score: self.health_score(menu),
        })
    }

    fn balance_score(&self, menu: &Menu, counts: &MenuClassification) -> u8 {
        let n = counts.total_items as f64;
        let mut score = 100.0;

        let sugar_share = counts.high_sugar as f64 / n;
        if sugar_share > self.limits.max_sugar_fraction {
            score -= (sugar_share - self.limits.max_sugar_fraction) * 200.0;
        }
        let processed_share = counts.processed as f64 / n;
        if processed_share > self.limits.max_processed_fraction {
            score -= (processed_share - self.limits.max_processed_fraction) * 100.0;
        }

        score += counts.wholesome as f64 / n * 30.0;
        score += counts.protein as f64 / n * 20.0;
        score += (menu.categories().len() as f64 * 5.0).min(20.0);

        score.round().clamp(0.0, 100.0) as u8
    }

    fn health_score(&self, menu: &Menu) -> u8 {
        let sum: u32 = menu
            .entries()
            .iter()
            .map(|e| u32::from(self.classifier.food_score(&e.food)))
            .sum();
        (f64::from(sum) / menu.len() as f64).round() as u8
    }
}
