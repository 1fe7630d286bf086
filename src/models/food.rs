use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::models::NutritionProfile;

/// A catalog food with per-100g nutrition.
///
/// Foods are loaded once and shared read-only between the eligible pool and
/// every menu built from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub item_code: String,
    pub name: String,
    pub category: String,
    pub subcategory: String,
    pub nutrition_per_100g: NutritionProfile,
    #[serde(default)]
    pub sodium_mg_per_100g: f64,
}

/// Shared handle to a catalog food.
pub type SharedFood = Arc<FoodItem>;

/// Category pair used for portion-limit lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortionKey<'a> {
    pub category: &'a str,
    pub subcategory: &'a str,
}

impl<'a> PortionKey<'a> {
    pub fn new(category: &'a str, subcategory: &'a str) -> Self {
        Self {
            category,
            subcategory,
        }
    }
}

impl FoodItem {
    pub fn new(
        item_code: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        subcategory: impl Into<String>,
        nutrition_per_100g: NutritionProfile,
        sodium_mg_per_100g: f64,
    ) -> Self {
        Self {
            item_code: item_code.into(),
            name: name.into(),
            category: category.into(),
            subcategory: subcategory.into(),
            nutrition_per_100g,
            sodium_mg_per_100g,
        }
    }

    #[inline]
    pub fn nutrition_for_portion(&self, grams: f64) -> NutritionProfile {
        self.nutrition_per_100g.scale(grams / 100.0)
    }

    pub fn portion_key(&self) -> PortionKey<'_> {
        PortionKey::new(&self.category, &self.subcategory)
    }

    /// Debug string for logging.
    pub fn debug_string(&self) -> String {
        format!(
            "{} ({}) {} > {}: {}",
            self.name, self.item_code, self.category, self.subcategory, self.nutrition_per_100g
        )
    }
}
