use std::collections::BTreeMap;

use log::{debug, info};
use rand::Rng;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::filters::{FilterStats, FoodFilterService};
use crate::models::{Menu, NutritionProfile, ScoredMenu};
use crate::planner::constants::TOP_MENUS;
use crate::planner::{MenuBuilder, MenuScorer, MenuStats, MenuValidator};
use crate::services::{FoodClassifier, MealType};
use crate::state::{CatalogProvider, NeutralPreferences, PreferenceStore};

/// One generate call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationRequest {
    pub target: NutritionProfile,
    pub meal_type: Option<MealType>,
    /// Items per menu; drawn from the configured range when absent.
    pub num_items: Option<usize>,
    pub attempts: Option<usize>,
}

impl GenerationRequest {
    pub fn new(target: NutritionProfile) -> Self {
        Self {
            target,
            meal_type: None,
            num_items: None,
            attempts: None,
        }
    }

    pub fn meal(mut self, meal_type: MealType) -> Self {
        self.meal_type = Some(meal_type);
        self
    }

    pub fn items(mut self, num_items: usize) -> Self {
        self.num_items = Some(num_items);
        self
    }

    pub fn attempts(mut self, attempts: usize) -> Self {
        self.attempts = Some(attempts);
        self
    }
}

/// Inserts keeping ascending score order; equal scores stay in arrival order.
fn insert_ranked(best: &mut Vec<ScoredMenu>, candidate: ScoredMenu) {
    let pos = best.partition_point(|m| m.score <= candidate.score);
    if pos < TOP_MENUS {
        best.insert(pos, candidate);
        best.truncate(TOP_MENUS);
    }
}

/// Runs repeated randomized builds and keeps the best accepted menus.
pub struct MenuGenerator<C: CatalogProvider> {
    catalog: C,
    config: EngineConfig,
    filter_service: FoodFilterService,
    builder: MenuBuilder,
    validator: MenuValidator,
    scorer: MenuScorer,
    preferences: Box<dyn PreferenceStore>,
    last_stats: Option<FilterStats>,
}

impl<C: CatalogProvider> MenuGenerator<C> {
    pub fn new(catalog: C, config: EngineConfig) -> Self {
        let filter_service = FoodFilterService::new(&config);
        let validator = MenuValidator::new(
            filter_service.category_filter().clone(),
            config.required_items.clone(),
        );
        let scorer = MenuScorer::new(
            FoodClassifier::new(config.classification.clone()),
            config.limits.clone(),
        );
        Self {
            builder: MenuBuilder::new(&config),
            catalog,
            config,
            filter_service,
            validator,
            scorer,
            preferences: Box::new(NeutralPreferences),
            last_stats: None,
        }
    }

    /// Replaces the neutral preference store.
    pub fn with_preferences(mut self, preferences: Box<dyn PreferenceStore>) -> Self {
        self.preferences = preferences;
        self
    }

    /// Pool sizes from the most recent `generate`.
    pub fn filter_stats(&self) -> Option<FilterStats> {
        self.last_stats
    }

    /// Up to five accepted menus, best first, or `None` if the pool is
    /// empty or no attempt produced a valid menu.
    pub fn generate(
        &mut self,
        request: &GenerationRequest,
        rng: &mut impl Rng,
    ) -> Option<Vec<ScoredMenu>> {
        let num_items = match request.num_items {
            Some(n) => n.max(1),
            None => rng.gen_range(self.config.item_range()),
        };
        let attempts = request.attempts.unwrap_or(self.config.default_attempts);
        let target = &request.target;

        info!(
            "Generating {} menu: {} ({} items, {} attempts)",
            request.meal_type.map_or("general", |m| m.as_str()),
            target,
            num_items,
            attempts
        );

        let (pool, stats) = self
            .filter_service
            .eligible_pool(self.catalog.all_foods(), request.meal_type);
        self.last_stats = Some(stats);
        if pool.is_empty() {
            info!("No suitable foods after filtering");
            return None;
        }
        info!(
            "{} of {} foods eligible ({:.1}%)",
            stats.remaining, stats.original, stats.remaining_pct
        );

        let mut best: Vec<ScoredMenu> = Vec::with_capacity(TOP_MENUS + 1);
        let mut rejections: BTreeMap<&'static str, usize> = BTreeMap::new();

        for attempt in 0..attempts {
            let menu = self
                .builder
                .build(&pool, target, num_items, self.preferences.as_ref(), rng);
            match self.validator.is_complete(&menu, target) {
                Ok(()) => {
                    let score = self.scorer.score(&menu, target);
                    debug!("Attempt {}: accepted, score {:.3}", attempt + 1, score);
                    insert_ranked(&mut best, ScoredMenu { menu, score });
                }
                Err(reason) => {
                    debug!("Attempt {}: {}", attempt + 1, reason);
                    *rejections.entry(reason.kind()).or_insert(0) += 1;
                }
            }
        }

        debug!("Rejections by reason: {:?}", rejections);
        if best.is_empty() {
            info!("No valid menu after {} attempts", attempts);
            return None;
        }
        info!(
            "Found {} menus, best score {:.3}",
            best.len(),
            best[0].score
        );
        Some(best)
    }

    pub fn menu_stats(&self, menu: &Menu) -> Option<MenuStats> {
        self.scorer.menu_stats(menu)
    }

    pub fn record_feedback(
        &mut self,
        menu: &Menu,
        rating: u8,
        meal_type: Option<MealType>,
    ) -> Result<()> {
        self.preferences.record_feedback(menu, rating, meal_type)
    }
}
