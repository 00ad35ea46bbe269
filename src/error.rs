use thiserror::Error;

/// Errors raised while adapting a recipe.
///
/// `RecipeAdapter::adapt_recipe` never surfaces these to its caller: an
/// unknown dietary type becomes an explanatory note and every other variant
/// becomes a "Failed to adapt" note on an otherwise untouched recipe.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdaptationError {
    #[error("unknown dietary type '{0}'")]
    UnknownDietaryType(String),

    #[error("ingredient at position {index} has an empty name")]
    MalformedIngredient { index: usize },

    #[error("substituted ingredient '{name}' has no original name")]
    MissingOriginal { name: String },

    #[error("expected {expected} adapted ingredients, found {found}")]
    IngredientCountMismatch { expected: usize, found: usize },
}

/// Errors raised while loading a dietary rule document.
#[derive(Debug, Error)]
pub enum RulesError {
    #[error("invalid rule document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid rule set '{id}': {source}")]
    InvalidRuleSet {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rule document defines no dietary types")]
    NoDietaryTypes,

    #[error("rule set '{id}' has a blank excluded ingredient pattern at position {position}")]
    BlankPattern { id: String, position: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adaptation_error_messages() {
        assert_eq!(
            AdaptationError::UnknownDietaryType("carnivore".to_string()).to_string(),
            "unknown dietary type 'carnivore'"
        );
        assert_eq!(
            AdaptationError::MalformedIngredient { index: 2 }.to_string(),
            "ingredient at position 2 has an empty name"
        );
        assert_eq!(
            AdaptationError::IngredientCountMismatch { expected: 3, found: 2 }.to_string(),
            "expected 3 adapted ingredients, found 2"
        );
    }

    #[test]
    fn test_rules_error_wraps_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: RulesError = json_err.into();
        assert!(err.to_string().starts_with("invalid rule document:"));
    }
}
