pub mod prompts;
pub mod render;

pub use prompts::{
    PartialTarget, collect_target, fuzzy_matches, prompt_menu_choice, prompt_positive,
    prompt_rating, prompt_yes_no,
};
pub use render::{
    FoodReport, display_filter_stats, display_food, display_menu_stats, display_menus,
    display_preference_summary,
};
