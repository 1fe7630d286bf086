use std::fs;
use std::path::Path;

use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::Value;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::models::{FoodItem, NutritionProfile, ScoredMenu};
use crate::state::InMemoryCatalog;

/// Catalog record as found in scraped JSON, with the field spellings seen in
/// the wild.
#[derive(Debug, Deserialize)]
struct RawFoodRecord {
    #[serde(alias = "itemCode", alias = "id")]
    item_code: Option<Value>,
    #[serde(default, alias = "description")]
    name: String,
    #[serde(default)]
    category: String,
    #[serde(default, alias = "sub_category", alias = "subCategory")]
    subcategory: String,
    #[serde(alias = "cal", alias = "energy")]
    calories: Option<f64>,
    #[serde(alias = "proteins")]
    protein: Option<f64>,
    #[serde(alias = "carbs", alias = "carbohydrates")]
    total_carbs: Option<f64>,
    #[serde(alias = "fat", alias = "fats")]
    total_fat: Option<f64>,
    #[serde(alias = "salt")]
    sodium: Option<f64>,
}

impl RawFoodRecord {
    fn into_food(self) -> Option<FoodItem> {
        let code = match self.item_code? {
            Value::String(s) if !s.trim().is_empty() => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        let nutrition = NutritionProfile::new(
            self.calories?,
            self.protein?,
            self.total_carbs?,
            self.total_fat?,
        );
        let name = if self.name.is_empty() {
            code.clone()
        } else {
            self.name
        };
        Some(FoodItem::new(
            code,
            name,
            self.category,
            self.subcategory,
            nutrition,
            self.sodium.unwrap_or(0.0),
        ))
    }
}

/// Load a catalog from a JSON array of food records.
///
/// Records without an item code or one of the four macros are skipped.
/// Duplicate item codes: last occurrence wins. Nutritional plausibility is
/// left to the soundness filter.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<InMemoryCatalog> {
    let content = fs::read_to_string(path)?;
    let records: Vec<Value> = serde_json::from_str(&content)?;
    let total = records.len();

    let mut foods = Vec::with_capacity(total);
    for (idx, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<RawFoodRecord>(record) {
            Ok(raw) => match raw.into_food() {
                Some(food) => foods.push(food),
                None => debug!("Skipping record {}: missing code or macros", idx),
            },
            Err(e) => warn!("Skipping malformed record {}: {}", idx, e),
        }
    }

    let catalog = InMemoryCatalog::new(foods);
    info!("Loaded {} foods ({} records)", catalog.len(), total);
    Ok(catalog)
}

/// Load engine rules from JSON; absent keys keep their defaults.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<EngineConfig> {
    let content = fs::read_to_string(path)?;
    let config: EngineConfig = serde_json::from_str(&content)?;
    Ok(config)
}

/// Save engine rules as pretty JSON.
pub fn save_config<P: AsRef<Path>>(path: P, config: &EngineConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)?;
    Ok(())
}

/// Round a float to n decimal places.
fn truncate(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Write ranked menus to CSV, one row per menu entry.
pub fn write_menus_csv(menus: &[ScoredMenu], path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "rank",
        "score",
        "item_code",
        "name",
        "category",
        "subcategory",
        "portion_grams",
        "calories",
        "protein",
        "carbs",
        "fat",
    ])?;

    for (i, scored) in menus.iter().enumerate() {
        for entry in scored.menu.entries() {
            let n = entry.nutrition();
            wtr.write_record([
                (i + 1).to_string(),
                format!("{:.4}", scored.score),
                entry.food.item_code.clone(),
                entry.food.name.clone(),
                entry.food.category.clone(),
                entry.food.subcategory.clone(),
                format!("{:.0}", entry.portion_grams),
                format!("{:.1}", n.calories),
                format!("{:.1}", n.protein),
                format!("{:.1}", n.carbs),
                format!("{:.1}", n.fat),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

/// Write ranked menus to a JSON file with rounded floats.
pub fn write_menus_json(menus: &[ScoredMenu], path: &Path) -> Result<()> {
    let json: Vec<Value> = menus
        .iter()
        .enumerate()
        .map(|(i, scored)| {
            let total = scored.menu.total_nutrition();
            serde_json::json!({
                "rank": i + 1,
                "score": truncate(scored.score, 4),
                "total": {
                    "calories": truncate(total.calories, 1),
                    "protein": truncate(total.protein, 1),
                    "carbs": truncate(total.carbs, 1),
                    "fat": truncate(total.fat, 1),
                },
                "items": scored.menu.entries().iter().map(|e| {
                    serde_json::json!({
                        "item_code": e.food.item_code,
                        "name": e.food.name,
                        "category": e.food.category,
                        "portion_grams": e.portion_grams,
                    })
                }).collect::<Vec<_>>(),
            })
        })
        .collect();

    fs::write(path, serde_json::to_string_pretty(&json)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Menu, MenuEntry};
    use crate::state::CatalogProvider;
    use std::io::Write;
    use std::sync::Arc;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_catalog_aliases_and_skips() {
        let json = r#"[
            {"itemCode": "100", "description": "Chicken", "category": "Meat & Fish", "subcategory": "Meat & Fish",
             "cal": 165, "proteins": 31, "carbohydrates": 0, "fats": 3.6, "salt": 74},
            {"id": 200, "name": "Rice", "energy": 130, "protein": 2.7, "carbs": 28, "fat": 0.3},
            {"item_code": "300", "name": "No macros", "calories": 100},
            {"name": "No code", "calories": 100, "protein": 1, "total_carbs": 20, "total_fat": 1},
            {"item_code": "400", "calories": "lots", "protein": 1, "total_carbs": 20, "total_fat": 1}
        ]"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let catalog = load_catalog(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);

        let chicken = catalog.get("100").unwrap();
        assert_eq!(chicken.name, "Chicken");
        assert_eq!(chicken.nutrition_per_100g, NutritionProfile::new(165.0, 31.0, 0.0, 3.6));
        assert_eq!(chicken.sodium_mg_per_100g, 74.0);

        let rice = catalog.get("200").unwrap();
        assert_eq!(rice.category, "");
        assert_eq!(rice.sodium_mg_per_100g, 0.0);
    }

    #[test]
    fn test_load_catalog_deduplicates() {
        let json = r#"[
            {"item_code": "1", "name": "Old", "calories": 100, "protein": 1, "total_carbs": 20, "total_fat": 1},
            {"item_code": "1", "name": "New", "calories": 110, "protein": 2, "total_carbs": 22, "total_fat": 1}
        ]"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let catalog = load_catalog(file.path()).unwrap();
        let foods = catalog.all_foods();
        assert_eq!(foods.len(), 1);
        assert_eq!(foods[0].name, "New");
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = EngineConfig::default();
        config.required_items.push("42".to_string());
        config.limits.max_sugar_fraction = 0.1;

        let file = NamedTempFile::new().unwrap();
        save_config(file.path(), &config).unwrap();
        let loaded = load_config(file.path()).unwrap();

        assert_eq!(loaded.required_items, vec!["42".to_string()]);
        assert_eq!(loaded.limits.max_sugar_fraction, 0.1);
        assert_eq!(loaded.meal_rules, config.meal_rules);
    }

    #[test]
    fn test_write_menus_csv() {
        let food = Arc::new(FoodItem::new(
            "1",
            "Rice",
            "Legumes & Grains",
            "Rice & Legumes",
            NutritionProfile::new(130.0, 2.7, 28.0, 0.3),
            0.0,
        ));
        let mut menu = Menu::new();
        menu.push(MenuEntry::new(food, 200.0));
        let menus = vec![ScoredMenu { menu, score: 0.5 }];

        let file = NamedTempFile::new().unwrap();
        write_menus_csv(&menus, file.path()).unwrap();

        let content = fs::read_to_string(file.path()).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("rank,score,item_code"));
        assert_eq!(lines[1], "1,0.5000,1,Rice,Legumes & Grains,Rice & Legumes,200,260.0,5.4,56.0,0.6");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate(1.23456, 2), 1.23);
        assert_eq!(truncate(0.5, 0), 1.0);
    }
}
