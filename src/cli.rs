use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::dietary::MatchMode;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a dietary rules JSON document (defaults to the bundled rules)
    #[arg(short, long, global = true)]
    pub rules: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// List the available dietary types
    List,
    /// Adapt a recipe, or a JSON array of recipes, to a dietary type
    Adapt {
        /// Path to the recipe JSON file
        #[arg(short = 'f', long)]
        recipe_file: PathBuf,
        /// Dietary type id, e.g. "vegan"
        #[arg(short, long)]
        diet: String,
        /// How ingredient names are matched: substring or word-boundary
        #[arg(short, long)]
        match_mode: Option<MatchMode>,
    },
    /// Print the original version of previously adapted recipes
    Restore {
        /// Path to the adapted recipe JSON file
        #[arg(short = 'f', long)]
        recipe_file: PathBuf,
    },
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
