mod classifier;
mod meal_rules;
mod portions;

pub use classifier::{FoodClassifier, FoodTag, FoodType, MenuClassification};
pub use meal_rules::{MealRuleSet, MealType};
pub use portions::{PortionCalculator, PortionInfo};
