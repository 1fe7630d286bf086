use dialoguer::{Confirm, Input, Select};
use strsim::jaro_winkler;

use crate::error::{MenuError, Result};
use crate::models::{NutritionProfile, SharedFood};
use crate::planner::constants::{MAX_RATING, MIN_RATING};

/// Similarity above which a fuzzy match is offered.
const FUZZY_THRESHOLD: f64 = 0.7;

/// Prompt for a strictly positive number.
pub fn prompt_positive(prompt: &str, default: &str) -> Result<f64> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .default(default.to_string())
        .interact_text()?;

    let value: f64 = input
        .trim()
        .parse()
        .map_err(|_| MenuError::InvalidInput(format!("Invalid number: {}", input)))?;
    require_positive(prompt, value)
}

fn require_positive(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(MenuError::InvalidInput(format!(
            "{} must be a positive number, got {}",
            name, value
        )))
    }
}

/// Target values given on the command line, each possibly missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartialTarget {
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
}

/// Completes a target, prompting for missing values unless `interactive` is false.
pub fn collect_target(partial: PartialTarget, interactive: bool) -> Result<NutritionProfile> {
    let fields = [
        ("Target calories", partial.calories, "2000"),
        ("Target protein (g)", partial.protein, "150"),
        ("Target carbs (g)", partial.carbs, "200"),
        ("Target fat (g)", partial.fat, "65"),
    ];

    let mut values = [0.0; 4];
    for (slot, (name, given, default)) in values.iter_mut().zip(fields) {
        *slot = match given {
            Some(v) => require_positive(name, v)?,
            None if interactive => prompt_positive(name, default)?,
            None => {
                return Err(MenuError::InvalidInput(format!("{} is required", name)));
            }
        };
    }

    Ok(NutritionProfile::new(values[0], values[1], values[2], values[3]))
}

/// Ask which menu to rate; `None` skips feedback.
pub fn prompt_menu_choice(count: usize) -> Result<Option<usize>> {
    let mut options: Vec<String> = (1..=count).map(|i| format!("Menu #{}", i)).collect();
    options.push("Skip".to_string());

    let selection = Select::new()
        .with_prompt("Rate one of these menus?")
        .items(&options)
        .default(count)
        .interact()?;

    Ok((selection < count).then_some(selection))
}

/// Prompt for a 1-5 rating.
pub fn prompt_rating() -> Result<u8> {
    let labels = ["1 (hated it)", "2 (meh)", "3 (fine)", "4 (good)", "5 (loved it)"];
    let selection = Select::new()
        .with_prompt("How was it?")
        .items(&labels)
        .default(2)
        .interact()?;

    let rating = MIN_RATING + selection as u8;
    Ok(rating.min(MAX_RATING))
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

/// Foods whose name matches `query`, best first.
///
/// Case-insensitive exact matches come first with similarity 1.0; fuzzy
/// matches follow when above the threshold.
pub fn fuzzy_matches<'a>(
    foods: impl IntoIterator<Item = &'a SharedFood>,
    query: &str,
    limit: usize,
) -> Vec<(&'a SharedFood, f64)> {
    let query = query.trim().to_lowercase();
    let mut candidates: Vec<(&SharedFood, f64)> = foods
        .into_iter()
        .map(|f| {
            let name = f.name.to_lowercase();
            let score = if name == query {
                1.0
            } else {
                jaro_winkler(&name, &query)
            };
            (f, score)
        })
        .filter(|(_, score)| *score > FUZZY_THRESHOLD)
        .collect();

    candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    candidates.truncate(limit);
    candidates
}
