use anyhow::{Context, Result};
use recipe_adapt::cli::{parse_args, Command};
use recipe_adapt::config::AdapterConfig;
use recipe_adapt::logging::init_logging;
use recipe_adapt::recipe::RecipeDocument;
use serde_json::json;
use std::path::Path;
use tokio::fs;
use tracing::info;

async fn read_recipe_document(path: &Path) -> Result<RecipeDocument> {
    let contents = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read recipe file '{}'", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse recipe file '{}'", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = parse_args();
    let config = AdapterConfig::from_env()?.with_rules_path(cli_args.rules.clone());
    init_logging(&config.log_filter)?;

    match cli_args.command {
        Command::List => {
            let rules = config.load_rules()?;
            let listing = json!({ "dietaryTypes": rules.available_dietary_types() });
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
        Command::Adapt {
            recipe_file,
            diet,
            match_mode,
        } => {
            let adapter = config.with_match_mode(match_mode).build_adapter()?;
            let document = read_recipe_document(&recipe_file).await?;
            let recipes = document.clone().into_recipes();
            info!(count = recipes.len(), dietary_type = %diet, "adapting recipes from {}", recipe_file.display());

            let adapted = adapter.adapt_recipes(&recipes, &diet);
            println!("{}", serde_json::to_string_pretty(&document.reshaped(adapted))?);
        }
        Command::Restore { recipe_file } => {
            let document = read_recipe_document(&recipe_file).await?;
            let restored = document
                .clone()
                .into_recipes()
                .iter()
                .map(|recipe| recipe.restore_original())
                .collect();
            println!("{}", serde_json::to_string_pretty(&document.reshaped(restored))?);
        }
    }

    Ok(())
}
