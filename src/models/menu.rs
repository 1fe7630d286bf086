use std::collections::{BTreeMap, HashSet};

use crate::models::{NutritionProfile, SharedFood};

/// One food at a concrete portion size.
#[derive(Debug, Clone)]
pub struct MenuEntry {
    pub food: SharedFood,
    pub portion_grams: f64,
}

impl MenuEntry {
    pub fn new(food: SharedFood, portion_grams: f64) -> Self {
        Self {
            food,
            portion_grams,
        }
    }

    pub fn nutrition(&self) -> NutritionProfile {
        self.food.nutrition_for_portion(self.portion_grams)
    }
}

/// Ordered list of entries with unique item codes.
///
/// Uniqueness is upheld by the builder, which tracks used codes; `Menu`
/// itself does not re-check it.
#[derive(Debug, Clone, Default)]
pub struct Menu {
    entries: Vec<MenuEntry>,
}

impl Menu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: MenuEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_nutrition(&self) -> NutritionProfile {
        self.entries
            .iter()
            .fold(NutritionProfile::default(), |acc, e| acc.add(&e.nutrition()))
    }

    pub fn contains_code(&self, item_code: &str) -> bool {
        self.entries.iter().any(|e| e.food.item_code == item_code)
    }

    pub fn item_codes(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.food.item_code.as_str()).collect()
    }

    /// Distinct categories present.
    pub fn categories(&self) -> HashSet<&str> {
        self.entries.iter().map(|e| e.food.category.as_str()).collect()
    }

    /// Category -> number of entries.
    pub fn category_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.food.category.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Subcategory -> number of entries.
    pub fn subcategory_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.food.subcategory.clone()).or_insert(0) += 1;
        }
        counts
    }
}

/// An accepted menu with its fit score (lower is better).
#[derive(Debug, Clone)]
pub struct ScoredMenu {
    pub menu: Menu,
    pub score: f64,
}
