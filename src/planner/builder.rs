use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use log::{debug, trace};
use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;

use crate::config::{EngineConfig, NutritionLimits};
use crate::filters::{BalanceFilter, CategoryPreferenceFilter, FoodFilter};
use crate::models::{FoodItem, Menu, MenuEntry, NutritionProfile, SharedFood};
use crate::planner::constants::*;
use crate::services::{FoodClassifier, PortionCalculator};
use crate::state::PreferenceStore;

/// Fill-phase candidate with its fit score (lower is better).
#[derive(Debug)]
struct Candidate<'a> {
    food: &'a SharedFood,
    fit: f64,
}

/// Menu under construction.
struct BuildState {
    menu: Menu,
    used: HashSet<String>,
    remaining: NutritionProfile,
}

impl BuildState {
    fn new(target: &NutritionProfile) -> Self {
        Self {
            menu: Menu::new(),
            used: HashSet::new(),
            remaining: *target,
        }
    }

    fn add(&mut self, food: &SharedFood, portion: f64) {
        let entry = MenuEntry::new(SharedFood::clone(food), portion);
        self.remaining = self.remaining.subtract(&entry.nutrition());
        self.used.insert(food.item_code.clone());
        trace!("Added {} g of {}", portion, food.debug_string());
        self.menu.push(entry);
    }

    fn is_used(&self, food: &FoodItem) -> bool {
        self.used.contains(&food.item_code)
    }
}

/// Median of a non-empty slice; mean of the middle pair for even lengths.
fn median(values: &mut [f64]) -> f64 {
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

/// Calorie shares (protein, carbs, fat) of a profile, with calories floored at 1.
fn calorie_shares(n: &NutritionProfile) -> (f64, f64, f64) {
    let cal = n.calories.max(1.0);
    (
        n.protein * CALORIES_PER_GRAM_PROTEIN / cal,
        n.carbs * CALORIES_PER_GRAM_CARBS / cal,
        n.fat * CALORIES_PER_GRAM_FAT / cal,
    )
}

/// Takes the first `max(floor, n / 2)` items (all when fewer).
fn shortlist<T>(items: &[T], floor: usize) -> &[T] {
    let keep = floor.max(items.len() / 2).min(items.len());
    &items[..keep]
}

/// Builds one menu per call from an eligible pool.
///
/// Phases run in order: required items, protein anchor, fiber anchor,
/// balance fill. A phase with no candidate is skipped; building never fails,
/// it may just return a short or empty menu.
#[derive(Debug, Clone)]
pub struct MenuBuilder {
    classifier: FoodClassifier,
    portions: PortionCalculator,
    category: CategoryPreferenceFilter,
    limits: NutritionLimits,
    required_items: Vec<String>,
    required_item_portions: HashMap<String, f64>,
}

impl MenuBuilder {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            classifier: FoodClassifier::new(config.classification.clone()),
            portions: PortionCalculator::new(config.portions.clone()),
            category: CategoryPreferenceFilter::new(config.categories.clone()),
            limits: config.limits.clone(),
            required_items: config.required_items.clone(),
            required_item_portions: config.required_item_portions.clone(),
        }
    }

    pub fn build(
        &self,
        pool: &[SharedFood],
        target: &NutritionProfile,
        num_items: usize,
        prefs: &dyn PreferenceStore,
        rng: &mut impl Rng,
    ) -> Menu {
        let mut state = BuildState::new(target);
        let ceiling = target.calories / num_items.max(1) as f64 * ITEM_CALORIE_CEILING_FACTOR;

        self.add_required_items(&mut state, pool, ceiling);
        self.add_protein_anchor(&mut state, pool, num_items, ceiling, prefs, rng);
        self.add_fiber_anchor(&mut state, pool, num_items, ceiling, prefs, rng);
        self.fill_remaining(&mut state, pool, num_items, ceiling, prefs, rng);

        debug!(
            "Built menu with {} items, {:.0} kcal left",
            state.menu.len(),
            state.remaining.calories
        );
        state.menu
    }

    /// Largest portion (g) of `food` that stays under `calorie_cap`.
    fn ceiling_grams(food: &FoodItem, calorie_cap: f64) -> f64 {
        let cal100 = food.nutrition_per_100g.calories;
        if cal100 <= 0.0 {
            return f64::INFINITY;
        }
        calorie_cap / cal100 * 100.0
    }

    fn add_required_items(&self, state: &mut BuildState, pool: &[SharedFood], ceiling: f64) {
        for code in &self.required_items {
            let Some(food) = pool.iter().find(|f| &f.item_code == code) else {
                debug!("Required item {} not in pool", code);
                continue;
            };
            if state.is_used(food) {
                continue;
            }

            let raw = match self.required_item_portions.get(code) {
                Some(&fixed) => fixed,
                None => {
                    let cal100 = food.nutrition_per_100g.calories;
                    let share = state.remaining.calories * REQUIRED_ITEM_CALORIE_SHARE / cal100 * 100.0;
                    share
                        .max(REQUIRED_PORTION_MIN)
                        .min(REQUIRED_PORTION_MAX)
                        .min(Self::ceiling_grams(food, ceiling))
                }
            };
            let portion = self.portions.apply_limits(food, raw);
            state.add(food, portion);
        }
    }

    /// Unused, non-rejected foods from the pool matching `pred`.
    fn open_candidates<'a>(
        state: &BuildState,
        pool: &'a [SharedFood],
        prefs: &dyn PreferenceStore,
        pred: impl Fn(&FoodItem) -> bool,
    ) -> Vec<&'a SharedFood> {
        pool.iter()
            .filter(|f| !state.is_used(f) && !prefs.is_rejected(&f.item_code) && pred(f))
            .collect()
    }

    fn add_protein_anchor(
        &self,
        state: &mut BuildState,
        pool: &[SharedFood],
        num_items: usize,
        ceiling: f64,
        prefs: &dyn PreferenceStore,
        rng: &mut impl Rng,
    ) {
        let has_protein = state
            .menu
            .entries()
            .iter()
            .any(|e| self.classifier.is_protein_source(&e.food));
        if has_protein || state.menu.len() >= num_items {
            return;
        }

        let mut candidates = Self::open_candidates(state, pool, prefs, |f| {
            self.classifier.is_protein_source(f)
        });
        candidates.sort_by(|a, b| {
            let (na, nb) = (&a.nutrition_per_100g, &b.nutrition_per_100g);
            let lean_a = na.protein / na.fat.max(1.0);
            let lean_b = nb.protein / nb.fat.max(1.0);
            lean_b
                .total_cmp(&lean_a)
                .then_with(|| nb.protein.total_cmp(&na.protein))
        });

        let Some(&food) = shortlist(&candidates, ANCHOR_SHORTLIST_MIN).choose(rng) else {
            debug!("No protein anchor available");
            return;
        };

        let protein100 = food.nutrition_per_100g.protein;
        let raw = if protein100 > 0.0 {
            (state.remaining.protein * PROTEIN_ANCHOR_SHARE / protein100 * 100.0)
                .max(PROTEIN_PORTION_MIN)
                .min(PROTEIN_PORTION_MAX)
        } else {
            PROTEIN_PORTION_MIN
        };
        let portion = self
            .portions
            .apply_limits(food, raw.min(Self::ceiling_grams(food, ceiling)));
        state.add(food, portion);
    }

    fn add_fiber_anchor(
        &self,
        state: &mut BuildState,
        pool: &[SharedFood],
        num_items: usize,
        ceiling: f64,
        prefs: &dyn PreferenceStore,
        rng: &mut impl Rng,
    ) {
        let has_fiber = state
            .menu
            .entries()
            .iter()
            .any(|e| self.classifier.is_fiber_source(&e.food));
        if has_fiber || state.menu.len() >= num_items {
            return;
        }

        let mut candidates =
            Self::open_candidates(state, pool, prefs, |f| self.classifier.is_fiber_source(f));
        candidates.sort_by(|a, b| {
            let (na, nb) = (&a.nutrition_per_100g, &b.nutrition_per_100g);
            let carb_a = na.carbs / na.fat.max(1.0);
            let carb_b = nb.carbs / nb.fat.max(1.0);
            carb_b
                .total_cmp(&carb_a)
                .then_with(|| nb.carbs.total_cmp(&na.carbs))
        });

        let Some(&food) = shortlist(&candidates, ANCHOR_SHORTLIST_MIN).choose(rng) else {
            debug!("No fiber anchor available");
            return;
        };

        let carbs100 = food.nutrition_per_100g.carbs;
        let raw = if carbs100 > 0.0 {
            (state.remaining.carbs * CARB_ANCHOR_SHARE / carbs100 * 100.0)
                .max(CARB_PORTION_MIN)
                .min(CARB_PORTION_MAX)
        } else {
            CARB_PORTION_MIN
        };
        let portion = self
            .portions
            .apply_limits(food, raw.min(Self::ceiling_grams(food, ceiling)));
        state.add(food, portion);
    }

    /// Fit of a candidate against the remaining macros (lower is better).
    fn fit_score(&self, food: &FoodItem, state: &BuildState, prefs: &dyn PreferenceStore) -> f64 {
        let (want_p, want_c, want_f) = calorie_shares(&state.remaining);
        let (has_p, has_c, has_f) = calorie_shares(&food.nutrition_per_100g);

        let mut fat_diff = (has_f - want_f).abs();
        if want_f < LOW_FAT_TARGET_RATIO && has_f > HIGH_FAT_FOOD_RATIO {
            fat_diff *= FAT_MISMATCH_MULTIPLIER;
        }
        let macro_diff = (has_p - want_p).abs() + (has_c - want_c).abs() + fat_diff;

        let diversity = if state.menu.categories().contains(food.category.as_str()) {
            0.0
        } else {
            -NEW_CATEGORY_BONUS
        };
        let health = (100.0 - f64::from(self.classifier.food_score(food))) / HEALTH_TIEBREAK_DIVISOR;
        let preference = (prefs.food_score(&food.item_code) - NEUTRAL_RATING) * FOOD_PREFERENCE_WEIGHT
            + (prefs.category_score(&food.category) - NEUTRAL_RATING) * CATEGORY_PREFERENCE_WEIGHT;

        macro_diff + diversity + health - preference
    }

    /// Picks from a ranked shortlist: uniform when small, else the top few
    /// get double weight.
    fn pick<'a>(ranked: &[Candidate<'a>], rng: &mut impl Rng) -> Option<&'a SharedFood> {
        if ranked.len() <= UNIFORM_PICK_MAX {
            return ranked.choose(rng).map(|c| c.food);
        }
        let weights = (0..ranked.len()).map(|i| {
            if i < UNIFORM_PICK_MAX {
                TOP_PICK_WEIGHT
            } else {
                REST_PICK_WEIGHT
            }
        });
        match WeightedIndex::new(weights) {
            Ok(dist) => Some(ranked[dist.sample(rng)].food),
            Err(_) => ranked.choose(rng).map(|c| c.food),
        }
    }

    /// Median of per-macro portion estimates, fat counted twice.
    fn balanced_portion(
        &self,
        food: &FoodItem,
        remaining: &NutritionProfile,
        slots: usize,
        ceiling: f64,
        rng: &mut impl Rng,
    ) -> f64 {
        let per100 = &food.nutrition_per_100g;
        let per_slot = |need: f64, have: f64| need / slots as f64 / have * 100.0;

        let mut estimates = Vec::with_capacity(5);
        if per100.calories > 0.0 {
            estimates.push(per_slot(remaining.calories, per100.calories));
        }
        if per100.protein > 0.0 {
            estimates.push(per_slot(remaining.protein, per100.protein));
        }
        if per100.carbs > 0.0 {
            estimates.push(per_slot(remaining.carbs, per100.carbs));
        }
        if per100.fat > 0.0 {
            let fat = per_slot(remaining.fat, per100.fat);
            estimates.push(fat);
            estimates.push(fat);
        }

        let raw = if estimates.is_empty() {
            self.portions
                .estimate_portion(food, remaining.calories, slots, rng)
        } else {
            median(&mut estimates)
        };
        let capped = raw.min(Self::ceiling_grams(food, ceiling * FILL_CEILING_TOLERANCE));
        let mut portion = self.portions.apply_limits(food, capped);

        if per100.fat > HIGH_FAT_PER_100G && per100.fat * portion / 100.0 > remaining.fat {
            let fat_cap = remaining.fat / per100.fat * 100.0;
            portion = self.portions.apply_limits(food, portion.min(fat_cap));
        }
        portion
    }

    fn fill_remaining(
        &self,
        state: &mut BuildState,
        pool: &[SharedFood],
        num_items: usize,
        ceiling: f64,
        prefs: &dyn PreferenceStore,
        rng: &mut impl Rng,
    ) {
        while state.menu.len() < num_items
            && state.remaining.calories > FILL_MIN_REMAINING_CALORIES
        {
            let balance = BalanceFilter::new(&self.classifier, &self.limits, &state.menu);
            let mut candidates: Vec<Candidate> = Self::open_candidates(state, pool, prefs, |f| {
                balance.accepts(f) && self.category.within_menu_limits(f, &state.menu)
            })
            .into_iter()
            .map(|food| Candidate {
                food,
                fit: self.fit_score(food, state, prefs),
            })
            .collect();

            if candidates.is_empty() {
                debug!("Fill stopped: no candidates left");
                break;
            }

            candidates.sort_by(|a, b| a.fit.partial_cmp(&b.fit).unwrap_or(Ordering::Equal));
            let Some(food) = Self::pick(shortlist(&candidates, FILL_SHORTLIST_MIN), rng) else {
                break;
            };

            let slots = num_items - state.menu.len();
            let portion = self.balanced_portion(food, &state.remaining, slots, ceiling, rng);
            state.add(food, portion);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::state::NeutralPreferences;

    fn food(code: &str, category: &str, subcategory: &str, n: NutritionProfile) -> SharedFood {
        Arc::new(FoodItem::new(code, code, category, subcategory, n, 0.0))
    }

    fn pool() -> Vec<SharedFood> {
        vec![
            food("chicken", "Meat & Fish", "Meat & Fish", NutritionProfile::new(165.0, 31.0, 0.0, 3.6)),
            food("rice", "Legumes & Grains", "Rice & Legumes", NutritionProfile::new(130.0, 2.7, 28.0, 0.3)),
            food("banana", "Fruits & Vegetables", "Fruits & Vegetables", NutritionProfile::new(89.0, 1.1, 22.8, 0.3)),
            food("eggs", "Dairy, Eggs & Salads", "Eggs", NutritionProfile::new(155.0, 13.0, 1.1, 11.0)),
            food("pasta", "Canned, Cooking & Baking", "Pasta", NutritionProfile::new(150.0, 6.0, 30.0, 1.0)),
        ]
    }

    fn target() -> NutritionProfile {
        NutritionProfile::new(2000.0, 150.0, 200.0, 65.0)
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&mut [3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&mut [4.0, 1.0, 3.0, 2.0]), 2.5);
    }

    #[test]
    fn test_shortlist_floor() {
        let items: Vec<usize> = (0..40).collect();
        assert_eq!(shortlist(&items, 15).len(), 20);
        assert_eq!(shortlist(&items[..8], 15).len(), 8);
        assert_eq!(shortlist(&items[..24], 15).len(), 15);
    }

    #[test]
    fn test_build_has_unique_codes_and_respects_count() {
        let builder = MenuBuilder::new(&EngineConfig::default());
        let pool = pool();
        let mut rng = StdRng::seed_from_u64(42);

        for n in 1..=5 {
            let menu = builder.build(&pool, &target(), n, &NeutralPreferences, &mut rng);
            assert!(menu.len() <= n);
            let codes: HashSet<&str> = menu.item_codes().into_iter().collect();
            assert_eq!(codes.len(), menu.len());
        }
    }

    #[test]
    fn test_anchors_come_first() {
        let builder = MenuBuilder::new(&EngineConfig::default());
        let pool = pool();
        let mut rng = StdRng::seed_from_u64(3);
        let menu = builder.build(&pool, &target(), 4, &NeutralPreferences, &mut rng);

        let classifier = FoodClassifier::new(Default::default());
        let entries = menu.entries();
        assert!(classifier.is_protein_source(&entries[0].food));
        assert!(classifier.is_fiber_source(&entries[1].food));
    }

    #[test]
    fn test_portions_within_limits() {
        let config = EngineConfig::default();
        let builder = MenuBuilder::new(&config);
        let calc = PortionCalculator::new(config.portions.clone());
        let pool = pool();
        let mut rng = StdRng::seed_from_u64(9);

        for _ in 0..20 {
            let menu = builder.build(&pool, &target(), 5, &NeutralPreferences, &mut rng);
            for entry in menu.entries() {
                let limits = calc.limits_for(&entry.food);
                assert!(entry.portion_grams >= limits.min && entry.portion_grams <= limits.max);
            }
        }
    }

    #[test]
    fn test_required_item_fixed_portion() {
        let mut config = EngineConfig::default();
        config.required_items.push("banana".to_string());
        config.required_item_portions.insert("banana".to_string(), 120.0);
        let builder = MenuBuilder::new(&config);
        let mut rng = StdRng::seed_from_u64(1);

        let menu = builder.build(&pool(), &target(), 5, &NeutralPreferences, &mut rng);
        let first = &menu.entries()[0];
        assert_eq!(first.food.item_code, "banana");
        assert_eq!(first.portion_grams, 120.0);
    }

    #[test]
    fn test_required_item_computed_portion() {
        let mut config = EngineConfig::default();
        config.required_items.push("rice".to_string());
        config.required_items.push("missing".to_string());
        let builder = MenuBuilder::new(&config);
        let mut rng = StdRng::seed_from_u64(1);

        let menu = builder.build(&pool(), &target(), 5, &NeutralPreferences, &mut rng);
        // 2000 * 0.2 / 130 * 100 = 307.7 -> 300, ceiling 520 kcal = 400 g
        assert_eq!(menu.entries()[0].food.item_code, "rice");
        assert_eq!(menu.entries()[0].portion_grams, 300.0);
        assert!(!menu.contains_code("missing"));
    }

    #[test]
    fn test_rejected_foods_are_skipped() {
        struct RejectChicken;
        impl PreferenceStore for RejectChicken {
            fn food_score(&self, _: &str) -> f64 {
                NEUTRAL_RATING
            }
            fn category_score(&self, _: &str) -> f64 {
                NEUTRAL_RATING
            }
            fn is_rejected(&self, code: &str) -> bool {
                code == "chicken"
            }
            fn record_feedback(
                &mut self,
                _: &Menu,
                _: u8,
                _: Option<crate::services::MealType>,
            ) -> crate::error::Result<()> {
                Ok(())
            }
        }

        let builder = MenuBuilder::new(&EngineConfig::default());
        let pool = pool();
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..20 {
            let menu = builder.build(&pool, &target(), 5, &RejectChicken, &mut rng);
            assert!(!menu.contains_code("chicken"));
        }
    }

    #[test]
    fn test_empty_pool_gives_empty_menu() {
        let builder = MenuBuilder::new(&EngineConfig::default());
        let mut rng = StdRng::seed_from_u64(0);
        let menu = builder.build(&[], &target(), 5, &NeutralPreferences, &mut rng);
        assert!(menu.is_empty());
    }
}
