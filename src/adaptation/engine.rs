use rayon::prelude::*;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::adaptation::ingredients::{adapt_ingredients, AdaptedIngredients};
use crate::adaptation::steps::{adapt_steps, AdaptedSteps};
use crate::dietary::matcher::{IngredientMatcher, SubstringMatcher};
use crate::dietary::rules::{DietaryRuleSet, DietaryRules, DietaryTypeSummary};
use crate::error::AdaptationError;
use crate::recipe::{Ingredient, Recipe, Step};

/// Adapts recipes to dietary restrictions using a shared, read-only rule table.
///
/// The adapter holds no mutable state, so one instance can serve any number
/// of threads.
#[derive(Debug, Clone)]
pub struct RecipeAdapter<M = SubstringMatcher> {
    rules: Arc<DietaryRules>,
    matcher: M,
}

impl RecipeAdapter<SubstringMatcher> {
    pub fn new(rules: Arc<DietaryRules>) -> Self {
        Self::with_matcher(rules, SubstringMatcher)
    }
}

impl<M: IngredientMatcher> RecipeAdapter<M> {
    pub fn with_matcher(rules: Arc<DietaryRules>, matcher: M) -> Self {
        Self { rules, matcher }
    }

    pub fn get_rule_set(&self, dietary_type: &str) -> Result<&DietaryRuleSet, AdaptationError> {
        self.rules.get_rule_set(dietary_type)
    }

    pub fn available_dietary_types(&self) -> Vec<DietaryTypeSummary> {
        self.rules.available_dietary_types()
    }

    /// `false` for an unknown dietary type.
    pub fn needs_substitution(&self, ingredient_name: &str, dietary_type: &str) -> bool {
        match self.rules.get_rule_set(dietary_type) {
            Ok(rule_set) => rule_set.needs_substitution(ingredient_name, &self.matcher),
            Err(_) => {
                warn!(dietary_type, "unknown dietary type");
                false
            }
        }
    }

    /// Empty for an unknown dietary type, never empty otherwise.
    pub fn get_substitutions(&self, ingredient_name: &str, dietary_type: &str) -> Vec<String> {
        match self.rules.get_rule_set(dietary_type) {
            Ok(rule_set) => rule_set.substitutions_for(ingredient_name, &self.matcher),
            Err(_) => {
                warn!(dietary_type, "unknown dietary type");
                Vec::new()
            }
        }
    }

    pub fn adapt_ingredients(
        &self,
        ingredients: &[Ingredient],
        dietary_type: &str,
    ) -> Result<AdaptedIngredients, AdaptationError> {
        let rule_set = self.rules.get_rule_set(dietary_type)?;
        adapt_ingredients(ingredients, rule_set, &self.matcher)
    }

    pub fn adapt_steps(
        &self,
        steps: &[Step],
        ingredients: &[Ingredient],
        adapted_ingredients: &[Ingredient],
    ) -> Result<AdaptedSteps, AdaptationError> {
        adapt_steps(steps, ingredients, adapted_ingredients, &self.matcher)
    }

    /// Produces a copy of `recipe` adapted for `dietary_type`. Never fails:
    /// an unsupported type or an adaptation error is reported through
    /// `adaptation_notes` on an otherwise unchanged recipe.
    pub fn adapt_recipe(&self, recipe: &Recipe, dietary_type: &str) -> Recipe {
        info!(title = %recipe.title, dietary_type, "adapting recipe");

        let rule_set = match self.rules.get_rule_set(dietary_type) {
            Ok(rule_set) => rule_set,
            Err(_) => {
                warn!(dietary_type, "unknown dietary type, returning original recipe");
                return recipe.with_notes(vec![format!(
                    "Dietary preference '{}' is not supported.",
                    dietary_type
                )]);
            }
        };

        match self.try_adapt(recipe, rule_set) {
            Ok(adapted) => {
                info!(
                    title = %adapted.title,
                    dietary_type,
                    modifications = adapted.adaptation_notes.len().saturating_sub(1),
                    "recipe adapted"
                );
                adapted
            }
            Err(err) => {
                error!(title = %recipe.title, dietary_type, error = %err, "failed to adapt recipe");
                Recipe {
                    is_adapted: false,
                    ..recipe.with_notes(vec![format!(
                        "Failed to adapt for {} diet: {}",
                        dietary_type, err
                    )])
                }
            }
        }
    }

    fn try_adapt(&self, recipe: &Recipe, rule_set: &DietaryRuleSet) -> Result<Recipe, AdaptationError> {
        // Start from the unadapted form so re-adapting never stacks substitutions.
        let base = recipe.restore_original();

        let AdaptedIngredients {
            adapted_ingredients,
            notes: ingredient_notes,
        } = adapt_ingredients(&base.ingredients, rule_set, &self.matcher)?;
        let AdaptedSteps {
            adapted_steps,
            notes: step_notes,
        } = adapt_steps(&base.steps, &base.ingredients, &adapted_ingredients, &self.matcher)?;

        let mut adaptation_notes = Vec::with_capacity(1 + ingredient_notes.len() + step_notes.len());
        adaptation_notes.push(format!("Recipe adapted for {} diet:", rule_set.display_name));
        adaptation_notes.extend(ingredient_notes);
        adaptation_notes.extend(step_notes);

        Ok(Recipe {
            ingredients: adapted_ingredients,
            steps: adapted_steps,
            dietary_type: Some(rule_set.id.clone()),
            is_adapted: true,
            adaptation_notes,
            ..base
        })
    }
}

impl<M: IngredientMatcher + Sync> RecipeAdapter<M> {
    /// Adapts every recipe in parallel. Output order follows input order.
    pub fn adapt_recipes(&self, recipes: &[Recipe], dietary_type: &str) -> Vec<Recipe> {
        recipes
            .par_iter()
            .map(|recipe| self.adapt_recipe(recipe, dietary_type))
            .collect()
    }
}
