use std::fmt;

use thiserror::Error;

use crate::filters::CategoryPreferenceFilter;
use crate::models::{Menu, NutritionProfile};
use crate::planner::constants::{MACRO_RATIO_MAX, MACRO_RATIO_MIN};

/// Macro named in a ratio rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Macro {
    Calories,
    Protein,
    Carbs,
    Fat,
}

impl Macro {
    pub fn as_str(&self) -> &'static str {
        match self {
            Macro::Calories => "calories",
            Macro::Protein => "protein",
            Macro::Carbs => "carbs",
            Macro::Fat => "fat",
        }
    }
}

impl fmt::Display for Macro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a built menu was not accepted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error("menu is empty")]
    EmptyMenu,

    #[error("{nutrient} at {ratio:.2}x target is outside the accepted band")]
    MacroOutOfRange { nutrient: Macro, ratio: f64 },

    #[error("missing required category: {0}")]
    MissingCategory(String),

    #[error("missing required subcategory: {0}")]
    MissingSubcategory(String),

    #[error("missing required item: {0}")]
    MissingRequiredItem(String),
}

impl Rejection {
    /// Stable label for tallying rejections.
    pub fn kind(&self) -> &'static str {
        match self {
            Rejection::EmptyMenu => "empty",
            Rejection::MacroOutOfRange { nutrient, .. } => nutrient.as_str(),
            Rejection::MissingCategory(_) => "category",
            Rejection::MissingSubcategory(_) => "subcategory",
            Rejection::MissingRequiredItem(_) => "required_item",
        }
    }
}

/// Accept/reject gate for built menus.
#[derive(Debug, Clone)]
pub struct MenuValidator {
    category: CategoryPreferenceFilter,
    required_items: Vec<String>,
}

impl MenuValidator {
    pub fn new(category: CategoryPreferenceFilter, required_items: Vec<String>) -> Self {
        Self {
            category,
            required_items,
        }
    }

    /// Checks, in order: non-empty, macro ratios, required categories, required items.
    ///
    /// Macros with a non-positive target are not checked.
    pub fn is_complete(&self, menu: &Menu, target: &NutritionProfile) -> Result<(), Rejection> {
        if menu.is_empty() {
            return Err(Rejection::EmptyMenu);
        }

        let total = menu.total_nutrition();
        let pairs = [
            (Macro::Calories, total.calories, target.calories),
            (Macro::Protein, total.protein, target.protein),
            (Macro::Carbs, total.carbs, target.carbs),
            (Macro::Fat, total.fat, target.fat),
        ];
        for (nutrient, actual, wanted) in pairs {
            if wanted <= 0.0 {
                continue;
            }
            let ratio = actual / wanted;
            if !(MACRO_RATIO_MIN..=MACRO_RATIO_MAX).contains(&ratio) {
                return Err(Rejection::MacroOutOfRange { nutrient, ratio });
            }
        }

        self.category.validate_required(menu)?;

        if let Some(missing) = self
            .required_items
            .iter()
            .find(|code| !menu.contains_code(code))
        {
            return Err(Rejection::MissingRequiredItem(missing.clone()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::CategoryRules;
    use crate::models::{FoodItem, MenuEntry};

    fn validator(required_items: &[&str]) -> MenuValidator {
        MenuValidator::new(
            CategoryPreferenceFilter::new(CategoryRules::default()),
            required_items.iter().map(|s| s.to_string()).collect(),
        )
    }

    /// A single 100 g entry whose nutrition equals `n`.
    fn menu_totalling(code: &str, n: NutritionProfile) -> Menu {
        let mut menu = Menu::new();
        menu.push(MenuEntry::new(
            Arc::new(FoodItem::new(code, code, "Any", "Any", n, 0.0)),
            100.0,
        ));
        menu
    }

    #[test]
    fn test_empty_menu_rejected() {
        let target = NutritionProfile::new(2000.0, 150.0, 200.0, 65.0);
        assert_eq!(validator(&[]).is_complete(&Menu::new(), &target), Err(Rejection::EmptyMenu));
    }

    #[test]
    fn test_band_edges_inclusive() {
        let target = NutritionProfile::new(2000.0, 150.0, 200.0, 65.0);
        let v = validator(&[]);

        let low = menu_totalling("a", NutritionProfile::new(1000.0, 75.0, 100.0, 32.5));
        assert!(v.is_complete(&low, &target).is_ok());

        let high = menu_totalling("a", NutritionProfile::new(3000.0, 225.0, 300.0, 97.5));
        assert!(v.is_complete(&high, &target).is_ok());
    }

    #[test]
    fn test_first_failing_macro_reported() {
        let target = NutritionProfile::new(2000.0, 150.0, 200.0, 65.0);
        let menu = menu_totalling("a", NutritionProfile::new(2000.0, 40.0, 400.0, 65.0));
        match validator(&[]).is_complete(&menu, &target) {
            Err(Rejection::MacroOutOfRange { nutrient, ratio }) => {
                assert_eq!(nutrient, Macro::Protein);
                assert!((ratio - 40.0 / 150.0).abs() < 1e-9);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_required_item_missing() {
        let target = NutritionProfile::new(2000.0, 150.0, 200.0, 65.0);
        let menu = menu_totalling("a", target);
        assert_eq!(
            validator(&["zzz"]).is_complete(&menu, &target),
            Err(Rejection::MissingRequiredItem("zzz".to_string()))
        );
        assert!(validator(&["a"]).is_complete(&menu, &target).is_ok());
    }

    #[test]
    fn test_rejection_display_and_kind() {
        let r = Rejection::MacroOutOfRange {
            nutrient: Macro::Fat,
            ratio: 1.75,
        };
        assert_eq!(r.to_string(), "fat at 1.75x target is outside the accepted band");
        assert_eq!(r.kind(), "fat");
        assert_eq!(Rejection::MissingCategory("X".into()).kind(), "category");
    }
}
