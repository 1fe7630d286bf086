mod food;
mod menu;
mod nutrition;

pub use food::{FoodItem, PortionKey, SharedFood};
pub use menu::{Menu, MenuEntry, ScoredMenu};
pub use nutrition::{MacroRatios, NutritionProfile};
