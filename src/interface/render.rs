use crate::filters::FilterStats;
use crate::models::{NutritionProfile, ScoredMenu, SharedFood};
use crate::planner::MenuStats;
use crate::services::{FoodTag, FoodType, MealType, PortionInfo};
use crate::state::PreferenceSummary;

/// Signed percentage difference of `actual` from `target`.
fn pct_diff(actual: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 0.0;
    }
    (actual - target) / target * 100.0
}

/// Display ranked menus with per-item portions and totals.
pub fn display_menus(menus: &[ScoredMenu], target: &NutritionProfile) {
    if menus.is_empty() {
        println!("No menus generated.");
        return;
    }

    println!();
    println!("=== Menus ===");
    println!("Target: {}", target);

    for (i, scored) in menus.iter().enumerate() {
        println!();
        println!("--- Menu #{} (score {:.3}) ---", i + 1, scored.score);

        let entries = scored.menu.entries();
        let max_name_len = entries.iter().map(|e| e.food.name.len()).max().unwrap_or(10);

        for entry in entries {
            let n = entry.nutrition();
            println!(
                "  {:<width$}  {:>5.0} g | {:>5.0} kcal  P {:>5.1}  C {:>5.1}  F {:>5.1}  [{}]",
                entry.food.name,
                entry.portion_grams,
                n.calories,
                n.protein,
                n.carbs,
                n.fat,
                entry.food.category,
                width = max_name_len
            );
        }

        let total = scored.menu.total_nutrition();
        println!(
            "  Total: {:.0} kcal ({:+.1}%), P {:.1} ({:+.1}%), C {:.1} ({:+.1}%), F {:.1} ({:+.1}%)",
            total.calories,
            pct_diff(total.calories, target.calories),
            total.protein,
            pct_diff(total.protein, target.protein),
            total.carbs,
            pct_diff(total.carbs, target.carbs),
            total.fat,
            pct_diff(total.fat, target.fat),
        );
    }
    println!();
}

/// Display composition stats for one menu.
pub fn display_menu_stats(rank: usize, stats: &MenuStats) {
    let r = &stats.macro_ratios;
    let c = &stats.classification;
    println!(
        "  Menu #{}: balance {}/100, health {}/100, macros P {:.0}% C {:.0}% F {:.0}%",
        rank,
        stats.balance_score,
        stats.health_score,
        r.protein * 100.0,
        r.carbs * 100.0,
        r.fat * 100.0
    );
    println!(
        "    protein {} | fiber {} | wholesome {} | processed {} | high sugar {} (of {})",
        c.protein, c.fiber, c.wholesome, c.processed, c.high_sugar, c.total_items
    );
    let categories: Vec<String> = stats
        .categories
        .iter()
        .map(|(name, count)| format!("{} x{}", name, count))
        .collect();
    println!("    categories: {}", categories.join(", "));
}

pub fn display_filter_stats(stats: &FilterStats) {
    println!(
        "Eligible foods: {} of {} ({:.1}%, {} filtered out)",
        stats.remaining, stats.original, stats.remaining_pct, stats.removed
    );
}

/// Everything `inspect` shows about one matched food.
pub struct FoodReport<'a> {
    pub food: &'a SharedFood,
    pub similarity: f64,
    pub food_type: FoodType,
    pub tags: Vec<FoodTag>,
    pub health_score: u8,
    pub portion: PortionInfo,
    /// Priority (0-3) of the food for each configured meal.
    pub meal_fit: Vec<(MealType, u8)>,
    pub eligible: bool,
}

/// Display how the engine classifies a single food.
pub fn display_food(report: &FoodReport) {
    let food = report.food;
    let portion = &report.portion;
    println!();
    println!("{} ({}) match {:.2}", food.name, food.item_code, report.similarity);
    println!("  {} > {}", food.category, food.subcategory);
    println!("  per 100 g: {}", food.nutrition_per_100g);
    println!("  sodium: {:.0} mg/100 g", food.sodium_mg_per_100g);
    println!(
        "  type: {}, health score: {}/100",
        report.food_type, report.health_score
    );
    if !report.tags.is_empty() {
        let tags: Vec<&str> = report.tags.iter().map(|t| t.as_str()).collect();
        println!("  tags: {}", tags.join(", "));
    }
    println!(
        "  portion: {:.0}-{:.0} g (suggested {:.0} g{})",
        portion.min,
        portion.max,
        portion.suggested,
        if portion.has_specific_limit {
            ", subcategory limit"
        } else {
            ""
        }
    );
    if !report.meal_fit.is_empty() {
        let fit: Vec<String> = report
            .meal_fit
            .iter()
            .map(|(meal, priority)| format!("{} {}", meal, meal_fit_label(*priority)))
            .collect();
        println!("  meals: {}", fit.join(", "));
    }
    println!("  eligible: {}", if report.eligible { "yes" } else { "no" });
}

fn meal_fit_label(priority: u8) -> &'static str {
    match priority {
        3 => "primary",
        2 => "secondary",
        0 => "forbidden",
        _ => "neutral",
    }
}

pub fn display_preference_summary(user: &str, summary: &PreferenceSummary) {
    println!();
    println!("=== Preferences for {} ===", user);
    println!(
        "Ratings: {} (average {:.2})",
        summary.total_ratings, summary.average_rating
    );

    if !summary.top_liked_foods.is_empty() {
        println!("Liked foods:");
        for (code, avg) in &summary.top_liked_foods {
            println!("  {} ({:.1})", code, avg);
        }
    }
    if !summary.top_categories.is_empty() {
        println!("Top categories:");
        for (category, avg) in &summary.top_categories {
            println!("  {} ({:.1})", category, avg);
        }
    }
    if !summary.rejected_foods.is_empty() {
        println!("Rejected: {}", summary.rejected_foods.join(", "));
    }
    println!("Successful combinations: {}", summary.successful_combinations);
    println!();
}
