use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::services::MealType;

/// MacroMenu: builds meal menus that hit a calorie and macro target.
#[derive(Parser, Debug)]
#[command(name = "macro_menu")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the food catalog JSON file.
    #[arg(short, long, global = true, default_value = "catalog.json")]
    pub catalog: PathBuf,

    /// Optional engine rules JSON (missing keys keep their defaults).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// User id for preference learning.
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Directory holding per-user preference files.
    #[arg(long, global = true, default_value = ".")]
    pub prefs_dir: PathBuf,

    /// Show debug logging.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate ranked menus for a macro target.
    Generate(GenerateArgs),

    /// Look up a food by name and show how the engine sees it.
    Inspect {
        /// Food name (fuzzy matched).
        query: String,

        /// Max matches to show.
        #[arg(short, long, default_value_t = 5)]
        limit: usize,
    },

    /// Show what has been learned from a user's ratings.
    Feedback,

    /// Write the default engine rules to a JSON file.
    InitConfig {
        /// Output path.
        #[arg(default_value = "menu_config.json")]
        path: PathBuf,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct GenerateArgs {
    /// Target calories (prompted when missing).
    #[arg(long)]
    pub calories: Option<f64>,

    /// Target protein in grams.
    #[arg(long)]
    pub protein: Option<f64>,

    /// Target carbs in grams.
    #[arg(long)]
    pub carbs: Option<f64>,

    /// Target fat in grams.
    #[arg(long)]
    pub fat: Option<f64>,

    /// Restrict to foods suited for a meal.
    #[arg(short, long, value_enum)]
    pub meal: Option<MealType>,

    /// Items per menu (random within the configured range otherwise).
    #[arg(short = 'n', long)]
    pub items: Option<usize>,

    /// Number of build attempts.
    #[arg(short, long)]
    pub attempts: Option<usize>,

    /// Seed for reproducible output.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Export the menus as CSV.
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Export the menus as JSON.
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Print composition stats for each menu.
    #[arg(long)]
    pub stats: bool,

    /// Never prompt; fail if a target value is missing.
    #[arg(long)]
    pub no_input: bool,
}

impl Default for Command {
    fn default() -> Self {
        Command::Generate(GenerateArgs::default())
    }
}
