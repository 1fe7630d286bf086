use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ClassificationTable;
use crate::models::{FoodItem, Menu};

/// Semantic tag derived from a food's subcategory (and protein density).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodTag {
    HighSugar,
    Protein,
    Fiber,
    Processed,
    Wholesome,
}

impl FoodTag {
    pub const ALL: [FoodTag; 5] = [
        FoodTag::HighSugar,
        FoodTag::Protein,
        FoodTag::Fiber,
        FoodTag::Processed,
        FoodTag::Wholesome,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FoodTag::HighSugar => "high_sugar",
            FoodTag::Protein => "protein",
            FoodTag::Fiber => "fiber",
            FoodTag::Processed => "processed",
            FoodTag::Wholesome => "wholesome",
        }
    }
}

impl fmt::Display for FoodTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Primary type of a food: the first matching tag by precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoodType {
    Protein,
    Fiber,
    Sugar,
    Processed,
    Other,
}

impl fmt::Display for FoodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FoodType::Protein => "protein",
            FoodType::Fiber => "fiber",
            FoodType::Sugar => "sugar",
            FoodType::Processed => "processed",
            FoodType::Other => "other",
        };
        f.write_str(name)
    }
}

/// Per-tag item counts for a menu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MenuClassification {
    pub wholesome: usize,
    pub protein: usize,
    pub fiber: usize,
    pub processed: usize,
    pub high_sugar: usize,
    pub total_items: usize,
}

const BASE_SCORE: i32 = 50;
const WHOLESOME_BONUS: i32 = 30;
const PROTEIN_BONUS: i32 = 20;
const FIBER_BONUS: i32 = 15;
const SUGAR_PENALTY: i32 = 25;
const PROCESSED_PENALTY: i32 = 20;
const HIGH_SODIUM_MG: f64 = 800.0;
const HIGH_SODIUM_PENALTY: i32 = 15;
const MODERATE_SODIUM_MG: f64 = 400.0;
const MODERATE_SODIUM_PENALTY: i32 = 10;
const CALORIE_DENSE_PER_100G: f64 = 400.0;
const CALORIE_DENSE_PENALTY: i32 = 10;

/// Tags foods from a static classification table.
#[derive(Debug, Clone)]
pub struct FoodClassifier {
    table: ClassificationTable,
}

impl FoodClassifier {
    pub fn new(table: ClassificationTable) -> Self {
        Self { table }
    }

    fn in_table(&self, tag: FoodTag, food: &FoodItem) -> bool {
        self.table.subcategories(tag).contains(&food.subcategory)
    }

    pub fn is_high_sugar(&self, food: &FoodItem) -> bool {
        self.in_table(FoodTag::HighSugar, food)
    }

    /// Listed protein subcategory, or dense enough in protein on its own.
    pub fn is_protein_source(&self, food: &FoodItem) -> bool {
        self.in_table(FoodTag::Protein, food)
            || food.nutrition_per_100g.protein >= self.table.min_protein_density
    }

    pub fn is_fiber_source(&self, food: &FoodItem) -> bool {
        self.in_table(FoodTag::Fiber, food)
    }

    pub fn is_processed(&self, food: &FoodItem) -> bool {
        self.in_table(FoodTag::Processed, food)
    }

    pub fn is_wholesome(&self, food: &FoodItem) -> bool {
        self.in_table(FoodTag::Wholesome, food)
    }

    pub fn has_tag(&self, food: &FoodItem, tag: FoodTag) -> bool {
        match tag {
            FoodTag::Protein => self.is_protein_source(food),
            other => self.in_table(other, food),
        }
    }

    /// Every tag that applies to `food`, in `FoodTag::ALL` order.
    pub fn tags(&self, food: &FoodItem) -> Vec<FoodTag> {
        FoodTag::ALL
            .into_iter()
            .filter(|&tag| self.has_tag(food, tag))
            .collect()
    }

    pub fn food_type(&self, food: &FoodItem) -> FoodType {
        if self.is_protein_source(food) {
            FoodType::Protein
        } else if self.is_fiber_source(food) {
            FoodType::Fiber
        } else if self.is_high_sugar(food) {
            FoodType::Sugar
        } else if self.is_processed(food) {
            FoodType::Processed
        } else {
            FoodType::Other
        }
    }

    /// Health score in 0..=100.
    pub fn food_score(&self, food: &FoodItem) -> u8 {
        let mut score = BASE_SCORE;

        if self.is_wholesome(food) {
            score += WHOLESOME_BONUS;
        }
        if self.is_protein_source(food) {
            score += PROTEIN_BONUS;
        }
        if self.is_fiber_source(food) {
            score += FIBER_BONUS;
        }
        if self.is_high_sugar(food) {
            score -= SUGAR_PENALTY;
        }
        if self.is_processed(food) {
            score -= PROCESSED_PENALTY;
        }

        if food.sodium_mg_per_100g > HIGH_SODIUM_MG {
            score -= HIGH_SODIUM_PENALTY;
        } else if food.sodium_mg_per_100g > MODERATE_SODIUM_MG {
            score -= MODERATE_SODIUM_PENALTY;
        }

        if food.nutrition_per_100g.calories > CALORIE_DENSE_PER_100G {
            score -= CALORIE_DENSE_PENALTY;
        }

        score.clamp(0, 100) as u8
    }

    pub fn classify_menu(&self, menu: &Menu) -> MenuClassification {
        let mut counts = MenuClassification {
            total_items: menu.len(),
            ..Default::default()
        };
        for entry in menu.entries() {
            let food = entry.food.as_ref();
            if self.is_wholesome(food) {
                counts.wholesome += 1;
            }
            if self.is_protein_source(food) {
                counts.protein += 1;
            }
            if self.is_fiber_source(food) {
                counts.fiber += 1;
            }
            if self.is_processed(food) {
                counts.processed += 1;
            }
            if self.is_high_sugar(food) {
                counts.high_sugar += 1;
            }
        }
        counts
    }
}
