use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{MenuError, Result};
use crate::models::Menu;
use crate::planner::constants::{
    MAX_RATING, MIN_RATING, NEUTRAL_RATING, REJECTION_RATING, REJECTION_SCORE_THRESHOLD,
    SUCCESS_RATING,
};
use crate::services::MealType;

/// Learned user preferences consulted by the menu builder.
pub trait PreferenceStore {
    /// Average rating (1-5) for a food, or the user's overall average.
    fn food_score(&self, item_code: &str) -> f64;

    fn category_score(&self, category: &str) -> f64;

    fn is_rejected(&self, item_code: &str) -> bool;

    /// Learns from a 1-5 rating of a served menu.
    fn record_feedback(
        &mut self,
        menu: &Menu,
        rating: u8,
        meal_type: Option<MealType>,
    ) -> Result<()>;
}

/// Store with no history: every score is neutral and nothing is rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeutralPreferences;

impl PreferenceStore for NeutralPreferences {
    fn food_score(&self, _item_code: &str) -> f64 {
        NEUTRAL_RATING
    }

    fn category_score(&self, _category: &str) -> f64 {
        NEUTRAL_RATING
    }

    fn is_rejected(&self, _item_code: &str) -> bool {
        false
    }

    fn record_feedback(
        &mut self,
        _menu: &Menu,
        rating: u8,
        _meal_type: Option<MealType>,
    ) -> Result<()> {
        validate_rating(rating)
    }
}

/// Sum and count of ratings for one key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingTally {
    pub total: u32,
    pub count: u32,
}

impl RatingTally {
    fn record(&mut self, rating: u8) {
        self.total += u32::from(rating);
        self.count += 1;
    }

    pub fn average(&self) -> Option<f64> {
        (self.count > 0).then(|| f64::from(self.total) / f64::from(self.count))
    }
}

/// On-disk preference document for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    pub food_scores: HashMap<String, RatingTally>,
    pub category_preferences: HashMap<String, RatingTally>,
    pub meal_preferences: HashMap<MealType, RatingTally>,
    pub rejection_list: BTreeSet<String>,
    /// Sorted item-code lists of well-rated menus.
    pub successful_combinations: Vec<Vec<String>>,
    pub total_ratings: u32,
    pub avg_rating: f64,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            food_scores: HashMap::new(),
            category_preferences: HashMap::new(),
            meal_preferences: HashMap::new(),
            rejection_list: BTreeSet::new(),
            successful_combinations: Vec::new(),
            total_ratings: 0,
            avg_rating: NEUTRAL_RATING,
        }
    }
}

impl UserPreferences {
    pub fn food_score(&self, item_code: &str) -> f64 {
        self.food_scores
            .get(item_code)
            .and_then(RatingTally::average)
            .unwrap_or(self.avg_rating)
    }

    pub fn category_score(&self, category: &str) -> f64 {
        self.category_preferences
            .get(category)
            .and_then(RatingTally::average)
            .unwrap_or(self.avg_rating)
    }

    /// Applies one rating of `menu`.
    pub fn apply_feedback(&mut self, menu: &Menu, rating: u8, meal_type: Option<MealType>) {
        self.total_ratings += 1;
        let n = f64::from(self.total_ratings);
        self.avg_rating = (self.avg_rating * (n - 1.0) + f64::from(rating)) / n;

        for entry in menu.entries() {
            self.food_scores
                .entry(entry.food.item_code.clone())
                .or_default()
                .record(rating);
            self.category_preferences
                .entry(entry.food.category.clone())
                .or_default()
                .record(rating);
        }

        if let Some(meal) = meal_type {
            self.meal_preferences.entry(meal).or_default().record(rating);
        }

        if rating <= REJECTION_RATING {
            for entry in menu.entries() {
                let code = &entry.food.item_code;
                if self.food_score(code) < REJECTION_SCORE_THRESHOLD
                    && self.rejection_list.insert(code.clone())
                {
                    debug!("Rejecting {}", entry.food.name);
                }
            }
        } else if rating >= SUCCESS_RATING && menu.len() > 1 {
            let mut combination: Vec<String> =
                menu.item_codes().into_iter().map(str::to_string).collect();
            combination.sort();
            if !self.successful_combinations.contains(&combination) {
                self.successful_combinations.push(combination);
            }
        }
    }

    pub fn summary(&self) -> PreferenceSummary {
        let mut top_liked_foods: Vec<(String, f64)> = self
            .food_scores
            .iter()
            .filter_map(|(code, tally)| {
                let avg = tally.average()?;
                (tally.count >= 2 && avg >= f64::from(SUCCESS_RATING)).then(|| (code.clone(), avg))
            })
            .collect();
        top_liked_foods.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        top_liked_foods.truncate(5);

        let mut top_categories: Vec<(String, f64)> = self
            .category_preferences
            .iter()
            .filter(|(_, tally)| tally.count >= 3)
            .filter_map(|(cat, tally)| tally.average().map(|avg| (cat.clone(), avg)))
            .collect();
        top_categories.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        top_categories.truncate(5);

        PreferenceSummary {
            total_ratings: self.total_ratings,
            average_rating: self.avg_rating,
            top_liked_foods,
            top_categories,
            rejected_foods: self.rejection_list.iter().cloned().collect(),
            successful_combinations: self.successful_combinations.len(),
        }
    }
}

/// Digest of what has been learned so far.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreferenceSummary {
    pub total_ratings: u32,
    pub average_rating: f64,
    pub top_liked_foods: Vec<(String, f64)>,
    pub top_categories: Vec<(String, f64)>,
    pub rejected_foods: Vec<String>,
    pub successful_combinations: usize,
}

/// Preferences persisted as one JSON file per user.
#[derive(Debug, Clone)]
pub struct JsonPreferenceStore {
    path: PathBuf,
    prefs: UserPreferences,
}

impl JsonPreferenceStore {
    /// File used for `user_id` inside `dir`.
    pub fn path_for_user(dir: impl AsRef<Path>, user_id: &str) -> PathBuf {
        dir.as_ref().join(format!("user_preferences_{user_id}.json"))
    }

    /// Loads the file if it exists, otherwise starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let prefs = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            UserPreferences::default()
        };
        Ok(Self { path, prefs })
    }

    pub fn preferences(&self) -> &UserPreferences {
        &self.prefs
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.prefs)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl PreferenceStore for JsonPreferenceStore {
    fn food_score(&self, item_code: &str) -> f64 {
        self.prefs.food_score(item_code)
    }

    fn category_score(&self, category: &str) -> f64 {
        self.prefs.category_score(category)
    }

    fn is_rejected(&self, item_code: &str) -> bool {
        self.prefs.rejection_list.contains(item_code)
    }

    fn record_feedback(
        &mut self,
        menu: &Menu,
        rating: u8,
        meal_type: Option<MealType>,
    ) -> Result<()> {
        validate_rating(rating)?;
        self.prefs.apply_feedback(menu, rating, meal_type);
        self.save()?;
        info!(
            "Recorded rating {} ({} total, avg {:.2})",
            rating, self.prefs.total_ratings, self.prefs.avg_rating
        );
        Ok(())
    }
}

fn validate_rating(rating: u8) -> Result<()> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(MenuError::InvalidInput(format!(
            "Rating must be between {MIN_RATING} and {MAX_RATING}, got {rating}"
        )))
    }
}
