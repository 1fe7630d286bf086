use std::collections::HashMap;

use crate::models::{FoodItem, SharedFood};

/// Source of catalog foods.
pub trait CatalogProvider {
    fn all_foods(&self) -> Vec<SharedFood>;
}

/// Catalog held in memory, keyed by item code.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    foods: Vec<SharedFood>,
    by_code: HashMap<String, usize>,
}

impl InMemoryCatalog {
    /// Builds a catalog; on duplicate item codes the last food wins and
    /// keeps the position of the first.
    pub fn new(foods: impl IntoIterator<Item = FoodItem>) -> Self {
        let mut catalog = Self::default();
        for food in foods {
            catalog.insert(food);
        }
        catalog
    }

    pub fn insert(&mut self, food: FoodItem) {
        let food = SharedFood::new(food);
        match self.by_code.get(&food.item_code) {
            Some(&idx) => self.foods[idx] = food,
            None => {
                self.by_code.insert(food.item_code.clone(), self.foods.len());
                self.foods.push(food);
            }
        }
    }

    pub fn get(&self, item_code: &str) -> Option<&SharedFood> {
        self.by_code.get(item_code).map(|&idx| &self.foods[idx])
    }

    pub fn len(&self) -> usize {
        self.foods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SharedFood> {
        self.foods.iter()
    }
}

impl CatalogProvider for InMemoryCatalog {
    fn all_foods(&self) -> Vec<SharedFood> {
        self.foods.clone()
    }
}
