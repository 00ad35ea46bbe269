pub mod matcher;
pub mod rules;

pub use matcher::{IngredientMatcher, MatchMode, SubstringMatcher, WordBoundaryMatcher};
pub use rules::{DietaryRuleSet, DietaryRules, DietaryTypeSummary, FALLBACK_SUBSTITUTE};
