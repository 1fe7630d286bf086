pub mod cli;
pub mod config;
pub mod error;
pub mod filters;
pub mod interface;
pub mod models;
pub mod planner;
pub mod services;
pub mod state;

pub use config::EngineConfig;
pub use error::{MenuError, Result};
pub use models::{FoodItem, Menu, MenuEntry, NutritionProfile, ScoredMenu, SharedFood};
pub use planner::{GenerationRequest, MenuGenerator};
