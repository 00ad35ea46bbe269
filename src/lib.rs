pub mod adaptation;
pub mod cli;
pub mod config;
pub mod dietary;
pub mod error;
pub mod logging;
pub mod recipe;

pub use adaptation::RecipeAdapter;
pub use dietary::{DietaryRules, MatchMode};
pub use error::{AdaptationError, RulesError};
pub use recipe::{Ingredient, Recipe, Step, StepId};
