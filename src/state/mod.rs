mod catalog;
mod persistence;
mod preferences;

pub use catalog::{CatalogProvider, InMemoryCatalog};
pub use persistence::{load_catalog, load_config, save_config, write_menus_csv, write_menus_json};
pub use preferences::{
    JsonPreferenceStore, NeutralPreferences, PreferenceStore, PreferenceSummary, RatingTally,
    UserPreferences,
};
