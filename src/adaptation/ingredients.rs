use tracing::debug;

use crate::dietary::matcher::IngredientMatcher;
use crate::dietary::rules::{DietaryRuleSet, FALLBACK_SUBSTITUTE};
use crate::error::AdaptationError;
use crate::recipe::Ingredient;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AdaptedIngredients {
    /// Same length and order as the input list.
    pub adapted_ingredients: Vec<Ingredient>,
    /// One note per substituted ingredient, in ingredient order.
    pub notes: Vec<String>,
}

/// Replaces every ingredient excluded by `rule_set` with its primary substitute.
///
/// Ingredients that match no excluded pattern are copied through tagged as
/// not substituted and produce no note. A blank ingredient name is rejected:
/// it would be contained in every pattern.
pub fn adapt_ingredients<M>(
    ingredients: &[Ingredient],
    rule_set: &DietaryRuleSet,
    matcher: &M,
) -> Result<AdaptedIngredients, AdaptationError>
where
    M: IngredientMatcher + ?Sized,
{
    let mut adapted = AdaptedIngredients {
        adapted_ingredients: Vec::with_capacity(ingredients.len()),
        notes: Vec::new(),
    };

    for (index, ingredient) in ingredients.iter().enumerate() {
        if ingredient.name.trim().is_empty() {
            return Err(AdaptationError::MalformedIngredient { index });
        }

        if !rule_set.needs_substitution(&ingredient.name, matcher) {
            adapted.adapted_ingredients.push(ingredient.passed_through());
            continue;
        }

        let candidates = rule_set.substitutions_for(&ingredient.name, matcher);
        let (primary, alternatives) = match candidates.split_first() {
            Some((primary, alternatives)) => (primary.as_str(), alternatives),
            None => (FALLBACK_SUBSTITUTE, &[][..]),
        };

        debug!(
            dietary_type = %rule_set.id,
            ingredient = %ingredient.name,
            substitute = primary,
            "substituting ingredient"
        );
        adapted.adapted_ingredients.push(ingredient.substituted(primary));
        adapted.notes.push(substitution_note(&ingredient.name, primary, alternatives));
    }

    Ok(adapted)
}

fn substitution_note(original: &str, primary: &str, alternatives: &[String]) -> String {
    let note = format!("{} has been replaced with {}", original, primary);
    if alternatives.is_empty() {
        note
    } else {
        format!("{}. Other alternatives: {}.", note, alternatives.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dietary::matcher::SubstringMatcher;

    fn dairy_free() -> DietaryRuleSet {
        DietaryRuleSet::new("dairy-free", "Dairy-Free")
            .with_exclusion("butter", &["dairy-free butter"])
            .with_exclusion("milk", &["almond milk", "oat milk"])
            .with_exclusion("cheese", &["nutritional yeast", "cashew cheese", "vegan cheese"])
            .with_exclusion("ghee", &[])
    }

    #[test]
    fn test_multi_candidate_substitution() {
        let ingredients = vec![Ingredient::new("whole milk").with_quantity("1").with_unit("cup")];
        let result = adapt_ingredients(&ingredients, &dairy_free(), &SubstringMatcher).unwrap();

        let milk = &result.adapted_ingredients[0];
        assert_eq!(milk.name, "almond milk");
        assert!(milk.is_substitute);
        assert_eq!(milk.original.as_deref(), Some("whole milk"));
        assert_eq!(milk.unit.as_deref(), Some("cup"));
        assert_eq!(
            result.notes,
            vec!["whole milk has been replaced with almond milk. Other alternatives: oat milk."]
        );
    }

    #[test]
    fn test_single_candidate_note_has_no_suffix() {
        let ingredients = vec![Ingredient::new("unsalted butter")];
        let result = adapt_ingredients(&ingredients, &dairy_free(), &SubstringMatcher).unwrap();
        assert_eq!(
            result.notes,
            vec!["unsalted butter has been replaced with dairy-free butter"]
        );
    }

    #[test]
    fn test_alternatives_are_comma_joined() {
        let ingredients = vec![Ingredient::new("cheddar cheese")];
        let result = adapt_ingredients(&ingredients, &dairy_free(), &SubstringMatcher).unwrap();
        assert_eq!(
            result.notes[0],
            "cheddar cheese has been replaced with nutritional yeast. Other alternatives: cashew cheese, vegan cheese."
        );
    }

    #[test]
    fn test_missing_candidates_use_fallback() {
        let ingredients = vec![Ingredient::new("ghee")];
        let result = adapt_ingredients(&ingredients, &dairy_free(), &SubstringMatcher).unwrap();
        assert_eq!(result.adapted_ingredients[0].name, FALLBACK_SUBSTITUTE);
        assert_eq!(result.notes, vec!["ghee has been replaced with suitable alternative"]);
    }

    #[test]
    fn test_unmatched_ingredients_pass_through_in_order() {
        let ingredients = vec![
            Ingredient::new("flour"),
            Ingredient::new("milk"),
            Ingredient::new("sugar").with_quantity(2),
        ];
        let result = adapt_ingredients(&ingredients, &dairy_free(), &SubstringMatcher).unwrap();

        let names: Vec<&str> = result.adapted_ingredients.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["flour", "almond milk", "sugar"]);
        assert!(!result.adapted_ingredients[0].is_substitute);
        assert_eq!(result.adapted_ingredients[0].original, None);
        assert_eq!(result.adapted_ingredients[2], ingredients[2]);
        assert_eq!(result.notes.len(), 1);
    }

    #[test]
    fn test_note_count_equals_matching_ingredients() {
        let rule_set = dairy_free();
        let ingredients = vec![
            Ingredient::new("butter"),
            Ingredient::new("melted butter"),
            Ingredient::new("eggs"),
            Ingredient::new("buttermilk"),
        ];
        let result = adapt_ingredients(&ingredients, &rule_set, &SubstringMatcher).unwrap();
        let expected = ingredients
            .iter()
            .filter(|i| rule_set.needs_substitution(&i.name, &SubstringMatcher))
            .count();
        assert_eq!(expected, 3);
        assert_eq!(result.notes.len(), expected);
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let ingredients = vec![Ingredient::new("milk"), Ingredient::new("  ")];
        let result = adapt_ingredients(&ingredients, &dairy_free(), &SubstringMatcher);
        assert_eq!(result, Err(AdaptationError::MalformedIngredient { index: 1 }));
    }

    #[test]
    fn test_input_is_not_mutated() {
        let ingredients = vec![Ingredient::new("milk")];
        let before = ingredients.clone();
        let _ = adapt_ingredients(&ingredients, &dairy_free(), &SubstringMatcher).unwrap();
        assert_eq!(ingredients, before);
    }
}
