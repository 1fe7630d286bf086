//! Food filters applied before and during menu construction.

mod balance;
mod category;
mod meal;
mod service;
mod soundness;

pub use balance::BalanceFilter;
pub use category::CategoryPreferenceFilter;
pub use meal::MealAppropriatenessFilter;
pub use service::{FilterStats, FoodFilterService};
pub use soundness::NutritionalSoundnessFilter;

use crate::models::{FoodItem, SharedFood};

/// A predicate over foods.
pub trait FoodFilter {
    fn accepts(&self, food: &FoodItem) -> bool;

    /// Keeps accepted foods, preserving order.
    fn filter(&self, foods: Vec<SharedFood>) -> Vec<SharedFood> {
        foods.into_iter().filter(|f| self.accepts(f)).collect()
    }
}
