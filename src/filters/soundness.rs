use crate::config::NutritionLimits;
use crate::filters::FoodFilter;
use crate::models::FoodItem;

/// Drops foods with inconsistent or extreme per-100g data.
#[derive(Debug, Clone)]
pub struct NutritionalSoundnessFilter {
    max_calories_per_100g: f64,
    max_sodium_per_100g: f64,
}

impl NutritionalSoundnessFilter {
    pub fn new(limits: &NutritionLimits) -> Self {
        Self {
            max_calories_per_100g: limits.max_calories_per_100g,
            max_sodium_per_100g: limits.max_sodium_per_100g,
        }
    }
}

impl FoodFilter for NutritionalSoundnessFilter {
    fn accepts(&self, food: &FoodItem) -> bool {
        let n = &food.nutrition_per_100g;
        n.is_valid()
            && !n.has_negative()
            && n.calories <= self.max_calories_per_100g
            && food.sodium_mg_per_100g <= self.max_sodium_per_100g
    }
}
