use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MenuError;
use crate::models::FoodItem;
use crate::services::FoodTag;

/// Meal a menu is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    #[serde(alias = "snacks")]
    #[value(alias = "snacks")]
    Snack,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = MenuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            "snack" | "snacks" => Ok(MealType::Snack),
            other => Err(MenuError::InvalidInput(format!("Unknown meal type: {other}"))),
        }
    }
}

/// Category rules for one meal type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MealRuleSet {
    pub primary: Vec<String>,
    pub secondary: Vec<String>,
    pub forbidden: Vec<String>,
    /// Tags a well-formed menu for this meal should cover.
    pub required_tags: Vec<FoodTag>,
}

impl MealRuleSet {
    pub fn new(
        primary: &[&str],
        secondary: &[&str],
        forbidden: &[&str],
        required_tags: &[FoodTag],
    ) -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            primary: owned(primary),
            secondary: owned(secondary),
            forbidden: owned(forbidden),
            required_tags: required_tags.to_vec(),
        }
    }

    /// Category is primary or secondary for this meal.
    pub fn is_appropriate(&self, food: &FoodItem) -> bool {
        self.primary.contains(&food.category) || self.secondary.contains(&food.category)
    }

    pub fn is_forbidden(&self, food: &FoodItem) -> bool {
        self.forbidden.contains(&food.category)
    }

    /// 3 primary, 2 secondary, 0 forbidden, 1 anything else.
    pub fn priority_score(&self, food: &FoodItem) -> u8 {
        if self.primary.contains(&food.category) {
            3
        } else if self.secondary.contains(&food.category) {
            2
        } else if self.is_forbidden(food) {
            0
        } else {
            1
        }
    }
}
