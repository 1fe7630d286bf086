use std::collections::HashSet;
use std::path::Path;

use clap::{Parser, ValueEnum};
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;

use macro_menu_rs::cli::{Cli, Command, GenerateArgs};
use macro_menu_rs::config::EngineConfig;
use macro_menu_rs::error::{MenuError, Result};
use macro_menu_rs::filters::FoodFilterService;
use macro_menu_rs::interface::{
    FoodReport, PartialTarget, collect_target, display_filter_stats, display_food,
    display_menu_stats, display_menus, display_preference_summary, fuzzy_matches,
    prompt_menu_choice, prompt_rating, prompt_yes_no,
};
use macro_menu_rs::planner::{GenerationRequest, MenuGenerator};
use macro_menu_rs::services::{FoodClassifier, MealType, PortionCalculator};
use macro_menu_rs::state::{
    CatalogProvider, InMemoryCatalog, JsonPreferenceStore, load_catalog, load_config, save_config,
    write_menus_csv, write_menus_json,
};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(cli: &Cli) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

fn run() -> Result<()> {
    let mut cli = Cli::parse();
    init_logging(&cli);
    let command = cli.command.take().unwrap_or_default();

    match command {
        Command::Generate(args) => cmd_generate(&cli, args),
        Command::Inspect { query, limit } => cmd_inspect(&cli, &query, limit),
        Command::Feedback => cmd_feedback(&cli),
        Command::InitConfig { path } => cmd_init_config(&path),
    }
}

fn engine_config(cli: &Cli) -> Result<EngineConfig> {
    match &cli.config {
        Some(path) => {
            info!("Using rules from {}", path.display());
            load_config(path)
        }
        None => Ok(EngineConfig::default()),
    }
}

fn open_catalog(cli: &Cli) -> Result<InMemoryCatalog> {
    if !cli.catalog.exists() {
        return Err(MenuError::InvalidInput(format!(
            "Catalog file not found: {}",
            cli.catalog.display()
        )));
    }
    let catalog = load_catalog(&cli.catalog)?;
    if catalog.is_empty() {
        return Err(MenuError::EmptyCatalog);
    }
    Ok(catalog)
}

/// Generate ranked menus and optionally learn from a rating.
fn cmd_generate(cli: &Cli, args: GenerateArgs) -> Result<()> {
    if args.items == Some(0) {
        return Err(MenuError::InvalidInput(
            "Item count must be at least 1".to_string(),
        ));
    }

    let catalog = open_catalog(cli)?;
    let config = engine_config(cli)?;
    println!("Loaded {} foods", catalog.len());

    let target = collect_target(
        PartialTarget {
            calories: args.calories,
            protein: args.protein,
            carbs: args.carbs,
            fat: args.fat,
        },
        !args.no_input,
    )?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut generator = MenuGenerator::new(catalog, config);
    if let Some(user) = &cli.user {
        let path = JsonPreferenceStore::path_for_user(&cli.prefs_dir, user);
        generator = generator.with_preferences(Box::new(JsonPreferenceStore::open(path)?));
    }

    let mut request = GenerationRequest::new(target);
    request.meal_type = args.meal;
    request.num_items = args.items;
    request.attempts = args.attempts;

    let result = generator.generate(&request, &mut rng);
    if let Some(stats) = generator.filter_stats() {
        display_filter_stats(&stats);
    }

    let Some(menus) = result else {
        println!("No valid menu found. Try more attempts or a looser target.");
        return Ok(());
    };

    display_menus(&menus, &target);

    if args.stats {
        for (i, scored) in menus.iter().enumerate() {
            if let Some(stats) = generator.menu_stats(&scored.menu) {
                display_menu_stats(i + 1, &stats);
            }
        }
        println!();
    }

    if let Some(path) = &args.csv {
        write_menus_csv(&menus, path)?;
        println!("Wrote {}", path.display());
    }
    if let Some(path) = &args.json {
        write_menus_json(&menus, path)?;
        println!("Wrote {}", path.display());
    }

    if cli.user.is_some() && !args.no_input {
        if let Some(choice) = prompt_menu_choice(menus.len())? {
            let rating = prompt_rating()?;
            generator.record_feedback(&menus[choice].menu, rating, args.meal)?;
            println!("Thanks, feedback saved.");
        }
    }

    Ok(())
}

/// Show how the engine classifies foods matching a name.
fn cmd_inspect(cli: &Cli, query: &str, limit: usize) -> Result<()> {
    let catalog = open_catalog(cli)?;
    let config = engine_config(cli)?;

    let matches = fuzzy_matches(catalog.iter(), query, limit);
    if matches.is_empty() {
        return Err(MenuError::FoodNotFound(query.to_string()));
    }

    let classifier = FoodClassifier::new(config.classification.clone());
    let portions = PortionCalculator::new(config.portions.clone());
    let (pool, _) = FoodFilterService::new(&config).eligible_pool(catalog.all_foods(), None);
    let eligible: HashSet<&str> = pool.iter().map(|f| f.item_code.as_str()).collect();

    for (food, similarity) in matches {
        let meal_fit = MealType::value_variants()
            .iter()
            .filter_map(|&meal| {
                config
                    .rules_for(meal)
                    .map(|rules| (meal, rules.priority_score(food)))
            })
            .collect();
        display_food(&FoodReport {
            food,
            similarity,
            food_type: classifier.food_type(food),
            tags: classifier.tags(food),
            health_score: classifier.food_score(food),
            portion: portions.portion_info(food),
            meal_fit,
            eligible: eligible.contains(food.item_code.as_str()),
        });
    }
    println!();

    Ok(())
}

/// Summarize a user's learned preferences.
fn cmd_feedback(cli: &Cli) -> Result<()> {
    let user = cli.user.as_deref().ok_or_else(|| {
        MenuError::InvalidInput("--user is required for feedback".to_string())
    })?;

    let path = JsonPreferenceStore::path_for_user(&cli.prefs_dir, user);
    if !path.exists() {
        println!("No ratings recorded for {} yet.", user);
        return Ok(());
    }

    let store = JsonPreferenceStore::open(path)?;
    display_preference_summary(user, &store.preferences().summary());
    Ok(())
}

/// Write the default rules so they can be edited.
fn cmd_init_config(path: &Path) -> Result<()> {
    if path.exists() && !prompt_yes_no(&format!("Overwrite {}?", path.display()), false)? {
        return Ok(());
    }
    save_config(path, &EngineConfig::default())?;
    println!("Wrote default rules to {}", path.display());
    Ok(())
}
