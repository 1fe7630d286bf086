/// Energy per gram of protein.
pub const CALORIES_PER_GRAM_PROTEIN: f64 = 4.0;

/// Energy per gram of carbohydrate.
pub const CALORIES_PER_GRAM_CARBS: f64 = 4.0;

/// Energy per gram of fat.
pub const CALORIES_PER_GRAM_FAT: f64 = 9.0;

/// Allowed relative gap between stated and macro-derived calories.
pub const NUTRITION_CONSISTENCY_TOLERANCE: f64 = 0.15;

// ─────────────────────────────────────────────────────────────────────────────
// Catalog screening defaults
// ─────────────────────────────────────────────────────────────────────────────

pub const DEFAULT_MAX_CALORIES_PER_100G: f64 = 600.0;
pub const DEFAULT_MAX_SODIUM_PER_100G: f64 = 1500.0;

/// Max share of menu calories from high-sugar foods.
pub const DEFAULT_MAX_SUGAR_FRACTION: f64 = 0.15;

/// Max share of menu items that are processed foods.
pub const DEFAULT_MAX_PROCESSED_FRACTION: f64 = 0.40;

/// Protein grams per 100g that make any food a protein source.
pub const DEFAULT_MIN_PROTEIN_DENSITY: f64 = 10.0;

/// Portion (g) a candidate is assumed to contribute when checking the sugar ceiling.
pub const BALANCE_REFERENCE_PORTION: f64 = 100.0;

// ─────────────────────────────────────────────────────────────────────────────
// Portions
// ─────────────────────────────────────────────────────────────────────────────

pub const DEFAULT_MIN_PORTION: f64 = 50.0;
pub const DEFAULT_MAX_PORTION: f64 = 1000.0;

/// Multiplicative jitter range for calorie-proportional estimates.
pub const PORTION_JITTER_MIN: f64 = 0.7;
pub const PORTION_JITTER_MAX: f64 = 1.3;

// ─────────────────────────────────────────────────────────────────────────────
// Menu construction
// ─────────────────────────────────────────────────────────────────────────────

/// Per-item calorie ceiling = target / items * this.
pub const ITEM_CALORIE_CEILING_FACTOR: f64 = 1.3;

/// Slack on the ceiling during the balance-fill phase.
pub const FILL_CEILING_TOLERANCE: f64 = 1.1;

/// Required items without a fixed portion take this share of remaining calories.
pub const REQUIRED_ITEM_CALORIE_SHARE: f64 = 0.20;
pub const REQUIRED_PORTION_MIN: f64 = 50.0;
pub const REQUIRED_PORTION_MAX: f64 = 300.0;

/// Protein anchor covers this share of the remaining protein.
pub const PROTEIN_ANCHOR_SHARE: f64 = 0.4;
pub const PROTEIN_PORTION_MIN: f64 = 100.0;
pub const PROTEIN_PORTION_MAX: f64 = 400.0;

pub const CARB_ANCHOR_SHARE: f64 = 1.0;
pub const CARB_PORTION_MIN: f64 = 50.0;
pub const CARB_PORTION_MAX: f64 = 300.0;

/// Anchor shortlist: at least this many, else the top half.
pub const ANCHOR_SHORTLIST_MIN: usize = 10;

/// Fill stops once fewer calories than this remain.
pub const FILL_MIN_REMAINING_CALORIES: f64 = 50.0;

/// Fill shortlist: at least this many, else the top half.
pub const FILL_SHORTLIST_MIN: usize = 15;

/// Shortlists this small are sampled uniformly.
pub const UNIFORM_PICK_MAX: usize = 5;

/// Weighted pick: the best `UNIFORM_PICK_MAX` get the top weight.
pub const TOP_PICK_WEIGHT: f64 = 0.2;
pub const REST_PICK_WEIGHT: f64 = 0.1;

/// Remaining fat share below which fat-heavy candidates are penalized.
pub const LOW_FAT_TARGET_RATIO: f64 = 0.3;
pub const HIGH_FAT_FOOD_RATIO: f64 = 0.5;
pub const FAT_MISMATCH_MULTIPLIER: f64 = 2.0;

/// Score reduction for a category not yet on the menu.
pub const NEW_CATEGORY_BONUS: f64 = 0.2;

/// Divisor turning (100 - health score) into a tiebreak.
pub const HEALTH_TIEBREAK_DIVISOR: f64 = 1000.0;

/// Foods above this fat density are capped at the remaining fat.
pub const HIGH_FAT_PER_100G: f64 = 15.0;

// ─────────────────────────────────────────────────────────────────────────────
// Preferences
// ─────────────────────────────────────────────────────────────────────────────

/// Rating assumed when nothing is known (1-5 scale).
pub const NEUTRAL_RATING: f64 = 3.0;
pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// Ratings at or below this can put foods on the rejection list.
pub const REJECTION_RATING: u8 = 2;

/// Foods averaging below this after a low rating are rejected.
pub const REJECTION_SCORE_THRESHOLD: f64 = 2.5;

/// Ratings at or above this record the combination as successful.
pub const SUCCESS_RATING: u8 = 4;

pub const FOOD_PREFERENCE_WEIGHT: f64 = 0.02;
pub const CATEGORY_PREFERENCE_WEIGHT: f64 = 0.01;

// ─────────────────────────────────────────────────────────────────────────────
// Validation, scoring, generation
// ─────────────────────────────────────────────────────────────────────────────

/// Accepted actual/target ratio band for every macro.
pub const MACRO_RATIO_MIN: f64 = 0.5;
pub const MACRO_RATIO_MAX: f64 = 1.5;

/// Fat error weight in the menu score.
pub const FAT_SCORE_WEIGHT: f64 = 1.5;

pub const DEFAULT_ATTEMPTS: usize = 300;
pub const DEFAULT_MIN_ITEMS: usize = 5;
pub const DEFAULT_MAX_ITEMS: usize = 8;

/// Number of menus kept by the generator.
pub const TOP_MENUS: usize = 5;
