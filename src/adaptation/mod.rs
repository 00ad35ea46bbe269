pub mod engine;
pub mod ingredients;
pub mod steps;

pub use engine::RecipeAdapter;
pub use ingredients::{adapt_ingredients, AdaptedIngredients};
pub use steps::{adapt_steps, substitution_pairs, AdaptedSteps, Substitution};
