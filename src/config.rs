use std::collections::{HashMap, HashSet};
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::planner::constants::*;
use crate::services::{FoodTag, MealRuleSet, MealType};

/// Runtime rules for filtering, classification, portions and generation.
///
/// Every field has a default, so a JSON config only needs the keys it
/// overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub limits: NutritionLimits,
    pub portions: PortionTable,
    pub classification: ClassificationTable,
    pub categories: CategoryRules,
    /// Item codes every menu must contain.
    pub required_items: Vec<String>,
    /// Fixed portions (g) for some of the required items.
    pub required_item_portions: HashMap<String, f64>,
    pub meal_rules: HashMap<MealType, MealRuleSet>,
    pub default_attempts: usize,
    pub min_items: usize,
    pub max_items: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            limits: NutritionLimits::default(),
            portions: PortionTable::default(),
            classification: ClassificationTable::default(),
            categories: CategoryRules::default(),
            required_items: Vec::new(),
            required_item_portions: HashMap::new(),
            meal_rules: default_meal_rules(),
            default_attempts: DEFAULT_ATTEMPTS,
            min_items: DEFAULT_MIN_ITEMS,
            max_items: DEFAULT_MAX_ITEMS,
        }
    }
}

impl EngineConfig {
    /// Item-count range used when the caller does not pick one.
    pub fn item_range(&self) -> RangeInclusive<usize> {
        let lo = self.min_items.max(1);
        let hi = self.max_items.max(lo);
        lo..=hi
    }

    pub fn rules_for(&self, meal_type: MealType) -> Option<&MealRuleSet> {
        self.meal_rules.get(&meal_type)
    }
}

/// Ceilings applied to individual foods and to the menu composition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NutritionLimits {
    pub max_calories_per_100g: f64,
    pub max_sodium_per_100g: f64,
    pub max_sugar_fraction: f64,
    pub max_processed_fraction: f64,
}

impl Default for NutritionLimits {
    fn default() -> Self {
        Self {
            max_calories_per_100g: DEFAULT_MAX_CALORIES_PER_100G,
            max_sodium_per_100g: DEFAULT_MAX_SODIUM_PER_100G,
            max_sugar_fraction: DEFAULT_MAX_SUGAR_FRACTION,
            max_processed_fraction: DEFAULT_MAX_PROCESSED_FRACTION,
        }
    }
}

/// Min/max portion in grams.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortionLimits {
    pub min: f64,
    pub max: f64,
}

impl PortionLimits {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

/// Subcategory -> portion limits, with a global fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PortionTable {
    pub default: PortionLimits,
    pub by_subcategory: HashMap<String, PortionLimits>,
}

impl Default for PortionTable {
    fn default() -> Self {
        let by_subcategory = [
            ("Sweets", 20.0, 80.0),
            ("Candy & Gum", 15.0, 50.0),
            ("Honey, Jam & Spreads", 15.0, 40.0),
            ("Oil, Vinegar & Lemon Juice", 5.0, 30.0),
            ("Spices", 2.0, 15.0),
            ("Soft Drinks", 100.0, 350.0),
            ("Milk", 100.0, 300.0),
            ("Cheese", 30.0, 150.0),
            ("Grilled Meats", 80.0, 250.0),
            ("Sausages & Deli", 50.0, 200.0),
            ("Fruits & Vegetables", 80.0, 300.0),
            ("Bread, Pita & Rolls", 50.0, 150.0),
        ]
        .into_iter()
        .map(|(name, min, max)| (name.to_string(), PortionLimits::new(min, max)))
        .collect();

        Self {
            default: PortionLimits::new(DEFAULT_MIN_PORTION, DEFAULT_MAX_PORTION),
            by_subcategory,
        }
    }
}

/// Subcategory sets backing each food tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationTable {
    pub high_sugar: HashSet<String>,
    pub protein: HashSet<String>,
    pub fiber: HashSet<String>,
    pub processed: HashSet<String>,
    pub wholesome: HashSet<String>,
    pub min_protein_density: f64,
}

impl Default for ClassificationTable {
    fn default() -> Self {
        Self {
            high_sugar: string_set(&["Sweets", "Candy & Gum", "Honey, Jam & Spreads"]),
            protein: string_set(&["Meat & Fish", "Cheese", "Milk", "Yogurt & Dairy Desserts"]),
            fiber: string_set(&[
                "Fruits & Vegetables",
                "Cereals & Energy Bars",
                "Rice & Legumes",
            ]),
            processed: string_set(&["Canned Goods", "Sausages & Deli", "Instant Meals"]),
            wholesome: string_set(&["Organic & Vegan", "Gluten Free", "Fruits & Vegetables"]),
            min_protein_density: DEFAULT_MIN_PROTEIN_DENSITY,
        }
    }
}

impl ClassificationTable {
    pub fn subcategories(&self, tag: FoodTag) -> &HashSet<String> {
        match tag {
            FoodTag::HighSugar => &self.high_sugar,
            FoodTag::Protein => &self.protein,
            FoodTag::Fiber => &self.fiber,
            FoodTag::Processed => &self.processed,
            FoodTag::Wholesome => &self.wholesome,
        }
    }
}

/// Category exclusions, requirements and optional per-menu caps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryRules {
    pub excluded_categories: Vec<String>,
    pub excluded_subcategories: Vec<String>,
    pub required_categories: Vec<String>,
    pub required_subcategories: Vec<String>,
    /// Max entries per category in one menu.
    pub category_limits: HashMap<String, usize>,
    /// Max entries per subcategory in one menu.
    pub subcategory_limits: HashMap<String, usize>,
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self {
            excluded_categories: Vec::new(),
            excluded_subcategories: string_vec(&[
                "Baking Supplies",
                "Sauces",
                "Honey, Jam & Spreads",
                "Oil, Vinegar & Lemon Juice",
                "Spices",
                "Concentrates",
                "Flour & Breadcrumbs",
                "Candy & Gum",
                "Soft Drinks",
                "Alcohol & Energy Drinks",
                "Baby Food",
                "Hot Drinks",
                "Multipack Drinks",
            ]),
            required_categories: Vec::new(),
            required_subcategories: Vec::new(),
            category_limits: HashMap::new(),
            subcategory_limits: HashMap::new(),
        }
    }
}

fn default_meal_rules() -> HashMap<MealType, MealRuleSet> {
    let mut rules = HashMap::new();
    rules.insert(
        MealType::Breakfast,
        MealRuleSet::new(
            &["Dairy, Eggs & Salads", "Fresh Bread & Pastries"],
            &["Honey, Jam & Spreads", "Fruits & Vegetables", "Beverages"],
            &["Meat & Fish", "Frozen"],
            &[FoodTag::Protein, FoodTag::Fiber],
        ),
    );
    rules.insert(
        MealType::Lunch,
        MealRuleSet::new(
            &["Meat & Fish", "Legumes & Grains"],
            &[
                "Dairy, Eggs & Salads",
                "Fruits & Vegetables",
                "Canned, Cooking & Baking",
            ],
            &["Snacks & Sweets"],
            &[FoodTag::Protein, FoodTag::Fiber],
        ),
    );
    rules.insert(
        MealType::Dinner,
        MealRuleSet::new(
            &["Meat & Fish", "Frozen"],
            &[
                "Legumes & Grains",
                "Dairy, Eggs & Salads",
                "Canned, Cooking & Baking",
            ],
            &["Snacks & Sweets"],
            &[FoodTag::Protein, FoodTag::Fiber],
        ),
    );
    rules.insert(
        MealType::Snack,
        MealRuleSet::new(
            &["Fruits & Vegetables", "Cereals & Energy Bars"],
            &["Snacks & Sweets", "Dairy, Eggs & Salads", "Beverages"],
            &[],
            &[FoodTag::Fiber],
        ),
    );
    rules
}

fn string_set(items: &[&str]) -> HashSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn string_vec(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.limits.max_calories_per_100g, DEFAULT_MAX_CALORIES_PER_100G);
        assert_eq!(config.limits.max_sugar_fraction, DEFAULT_MAX_SUGAR_FRACTION);
        assert_eq!(config.portions.default, PortionLimits::new(50.0, 1000.0));
        assert_eq!(config.default_attempts, DEFAULT_ATTEMPTS);
        assert_eq!(config.item_range(), 5..=8);
        assert_eq!(config.meal_rules.len(), 4);
    }

    #[test]
    fn test_item_range_is_normalized() {
        let config = EngineConfig {
            min_items: 0,
            max_items: 0,
            ..Default::default()
        };
        assert_eq!(config.item_range(), 1..=1);

        let inverted = EngineConfig {
            min_items: 6,
            max_items: 3,
            ..Default::default()
        };
        assert_eq!(inverted.item_range(), 6..=6);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{
            "limits": {"max_sugar_fraction": 0.1},
            "required_items": ["7290000000001"],
            "meal_rules": {"snack": {"primary": ["Nuts"], "secondary": [], "forbidden": [], "required_tags": []}}
        }"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.limits.max_sugar_fraction, 0.1);
        assert_eq!(config.limits.max_sodium_per_100g, DEFAULT_MAX_SODIUM_PER_100G);
        assert_eq!(config.required_items, vec!["7290000000001".to_string()]);
        assert_eq!(config.meal_rules.len(), 1);
        assert!(config.rules_for(MealType::Lunch).is_none());
        assert!(config.rules_for(MealType::Snack).is_some());
    }
}
