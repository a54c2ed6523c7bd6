//! `recipebox` - CLI for the recipe catalog
//!
//! This binary provides the command-line interface for adding, browsing, and
//! exchanging recipes.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;

use recipebox::cli::{
    AddCommand, Cli, Command, ConfigCommand, EditCommand, ExportCommand, FavoriteCommand,
    ImportCommand, ListCommand, OutputFormat, ShowCommand,
};
use recipebox::{init_logging, Config, Recipe, RecipeRepository, RecipeStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Validation loads the file itself, so a broken config is reported
    // instead of aborting the load below
    if let Command::Config(ConfigCommand::Validate { file }) = &cli.command {
        return validate_config(file.clone().or_else(|| cli.config.clone()));
    }

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Configuration commands never touch the database
    let command = match cli.command {
        Command::Config(config_cmd) => return handle_config(&config, config_cmd),
        command => command,
    };

    let database_path = config.database_path();
    let store = RecipeStore::open(&database_path)
        .await
        .with_context(|| format!("failed to open {}", database_path.display()))?
        .with_pretty_export(config.export.pretty);

    match command {
        Command::Add(cmd) => handle_add(&store, &cmd).await,
        Command::Edit(cmd) => handle_edit(&store, &cmd).await,
        Command::Show(cmd) => handle_show(&store, &cmd).await,
        Command::List(cmd) => handle_list(&store, &cmd).await,
        Command::Categories => handle_categories(&store).await,
        Command::Favorite(cmd) => handle_favorite(&store, &cmd).await,
        Command::Delete(cmd) => {
            store.delete(cmd.id).await?;
            println!("Deleted recipe {}", cmd.id);
            Ok(())
        }
        Command::Export(cmd) => handle_export(&store, &config, &cmd).await,
        Command::Import(cmd) => handle_import(&store, &cmd).await,
        Command::Status(cmd) => handle_status(&store, &config, cmd.json).await,
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

async fn handle_add<R>(store: &R, cmd: &AddCommand) -> anyhow::Result<()>
where
    R: RecipeRepository + ?Sized,
{
    let recipe = cmd.to_new_recipe().context("failed to attach image")?;
    let id = store.create(recipe).await?;
    println!("{id}");
    Ok(())
}

async fn handle_edit<R>(store: &R, cmd: &EditCommand) -> anyhow::Result<()>
where
    R: RecipeRepository + ?Sized,
{
    let existing = store.get(cmd.id).await?;
    let recipe = cmd.apply_to(existing).context("failed to attach image")?;
    store.update(cmd.id, recipe).await?;
    println!("Updated recipe {}", cmd.id);
    Ok(())
}

async fn handle_show<R>(store: &R, cmd: &ShowCommand) -> anyhow::Result<()>
where
    R: RecipeRepository + ?Sized,
{
    let recipe = store.get(cmd.id).await?;
    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&recipe)?);
    } else {
        print_recipe(&recipe);
    }
    Ok(())
}

async fn handle_list<R>(store: &R, cmd: &ListCommand) -> anyhow::Result<()>
where
    R: RecipeRepository + ?Sized,
{
    let recipes = store.filter(&cmd.query()).await?;

    match cmd.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&recipes)?);
        }
        OutputFormat::Table => {
            println!("{:>6}  {:<3}  {:<20}  NAME", "ID", "FAV", "CATEGORY");
            for recipe in &recipes {
                println!(
                    "{:>6}  {:<3}  {:<20}  {}",
                    recipe.id,
                    favorite_mark(recipe),
                    recipe.category,
                    recipe.name
                );
            }
        }
        OutputFormat::Plain => {
            if recipes.is_empty() {
                println!("No recipes found.");
            }
            for recipe in &recipes {
                println!(
                    "{} [{}] {} ({})",
                    favorite_mark(recipe),
                    recipe.id,
                    recipe.name,
                    recipe.category
                );
            }
        }
    }
    Ok(())
}

async fn handle_categories<R>(store: &R) -> anyhow::Result<()>
where
    R: RecipeRepository + ?Sized,
{
    for category in store.categories().await? {
        println!("{category}");
    }
    Ok(())
}

async fn handle_favorite<R>(store: &R, cmd: &FavoriteCommand) -> anyhow::Result<()>
where
    R: RecipeRepository + ?Sized,
{
    let favorite = match cmd.state {
        Some(state) => {
            let favorite = bool::from(state);
            store.set_favorite(cmd.id, favorite).await?;
            favorite
        }
        None => store.toggle_favorite(cmd.id).await?,
    };

    if favorite {
        println!("★ Recipe {} is a favorite", cmd.id);
    } else {
        println!("☆ Recipe {} is not a favorite", cmd.id);
    }
    Ok(())
}

async fn handle_export<R>(store: &R, config: &Config, cmd: &ExportCommand) -> anyhow::Result<()>
where
    R: RecipeRepository + ?Sized,
{
    let payload = store.export_all().await?;

    match &cmd.output {
        Some(path) if path == Path::new("-") => println!("{payload}"),
        output => {
            let path = output.clone().unwrap_or_else(|| config.export_path());
            std::fs::write(&path, payload)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Exported to {}", path.display());
        }
    }
    Ok(())
}

async fn handle_import<R>(store: &R, cmd: &ImportCommand) -> anyhow::Result<()>
where
    R: RecipeRepository + ?Sized,
{
    let payload = std::fs::read_to_string(&cmd.file)
        .with_context(|| format!("failed to read {}", cmd.file.display()))?;
    let summary = store.import_all(payload).await?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "Imported {} recipes ({} new, {} updated)",
            summary.total(),
            summary.created,
            summary.updated
        );
    }
    Ok(())
}

async fn handle_status<R>(store: &R, config: &Config, json: bool) -> anyhow::Result<()>
where
    R: RecipeRepository + ?Sized,
{
    let stats = store.stats().await?;

    if json {
        let status = serde_json::json!({
            "database_path": config.database_path(),
            "stats": stats,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("recipebox status");
        println!("----------------");
        println!("Database:      {}", config.database_path().display());
        println!("Size:          {} bytes", stats.db_size_bytes);
        println!("Recipes:       {}", stats.total_recipes);
        println!("Favorites:     {}", stats.favorite_recipes);
        println!("Categories:    {}", stats.category_count);
        match stats.last_modified {
            Some(at) => println!("Last change:   {}", at.to_rfc3339()),
            None => println!("Last change:   never"),
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Export]");
                println!("  File name:          {}", config.export.file_name);
                println!("  Pretty:             {}", config.export.pretty);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => validate_config(file)?,
    }
    Ok(())
}

fn validate_config(file: Option<PathBuf>) -> anyhow::Result<()> {
    let path = file.unwrap_or_else(Config::default_config_path);
    println!("Validating configuration: {}", path.display());
    Config::check_file(&path)
        .with_context(|| format!("invalid configuration in {}", path.display()))?;
    println!("Configuration is valid.");
    Ok(())
}

fn favorite_mark(recipe: &Recipe) -> &'static str {
    if recipe.favorite {
        "★"
    } else {
        "☆"
    }
}

fn print_recipe(recipe: &Recipe) {
    println!("{} {}", favorite_mark(recipe), recipe.name);
    println!("Id:        {}", recipe.id);
    println!("Category:  {}", recipe.category);
    if !recipe.image.is_empty() {
        println!("Image:     {} bytes", recipe.image.len());
    }
    println!();
    println!("Ingredients");
    println!("-----------");
    println!("{}", recipe.ingredients);
    println!();
    println!("Instructions");
    println!("------------");
    println!("{}", recipe.instructions);
}
