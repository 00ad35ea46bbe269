use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

use crate::dietary::matcher::IngredientMatcher;
use crate::error::{AdaptationError, RulesError};

/// Substitute offered when a rule set excludes an ingredient but registers no candidates for it.
pub const FALLBACK_SUBSTITUTE: &str = "suitable alternative";

const BUNDLED_RULES: &str = include_str!("../../data/dietary_preferences.json");

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RulesDocument {
    #[serde(default)]
    version: Option<u64>,
    // serde_json is built with preserve_order, so this keeps document order
    dietary_types: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RuleSetRecord {
    name: String,
    #[serde(default)]
    description: String,
    excluded_ingredients: Vec<String>,
    #[serde(default)]
    substitutions: HashMap<String, Vec<String>>,
}

/// Excluded ingredients and their substitutes for one dietary type.
#[derive(Debug, Clone, PartialEq)]
pub struct DietaryRuleSet {
    pub id: String,
    pub display_name: String,
    pub description: String,
    /// Lowercase patterns, checked in order. The first match wins.
    pub excluded_ingredients: Vec<String>,
    /// Pattern -> candidate substitutes, primary first.
    pub substitutions: HashMap<String, Vec<String>>,
}

/// Public metadata of a dietary type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DietaryTypeSummary {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl DietaryRuleSet {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            description: String::new(),
            excluded_ingredients: Vec::new(),
            substitutions: HashMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Appends an excluded pattern and registers its candidates (if any).
    pub fn with_exclusion(mut self, pattern: impl Into<String>, candidates: &[&str]) -> Self {
        let pattern = pattern.into();
        if !candidates.is_empty() {
            self.substitutions.insert(
                pattern.clone(),
                candidates.iter().map(|c| c.to_string()).collect(),
            );
        }
        self.excluded_ingredients.push(pattern);
        self
    }

    /// First excluded pattern related to `ingredient_name`.
    ///
    /// Containment is checked both ways: "whole milk" matches the pattern
    /// "milk", and the ingredient "egg" matches the pattern "eggs".
    pub fn matched_pattern<M>(&self, ingredient_name: &str, matcher: &M) -> Option<&str>
    where
        M: IngredientMatcher + ?Sized,
    {
        self.excluded_ingredients
            .iter()
            .find(|pattern| {
                matcher.contains(ingredient_name, pattern) || matcher.contains(pattern, ingredient_name)
            })
            .map(String::as_str)
    }

    pub fn needs_substitution<M>(&self, ingredient_name: &str, matcher: &M) -> bool
    where
        M: IngredientMatcher + ?Sized,
    {
        self.matched_pattern(ingredient_name, matcher).is_some()
    }

    /// Candidate substitutes for `ingredient_name`, primary first. Never empty.
    pub fn substitutions_for<M>(&self, ingredient_name: &str, matcher: &M) -> Vec<String>
    where
        M: IngredientMatcher + ?Sized,
    {
        self.matched_pattern(ingredient_name, matcher)
            .and_then(|pattern| self.substitutions.get(pattern))
            .filter(|candidates| !candidates.is_empty())
            .cloned()
            .unwrap_or_else(|| vec![FALLBACK_SUBSTITUTE.to_string()])
    }

    pub fn summary(&self) -> DietaryTypeSummary {
        DietaryTypeSummary {
            id: self.id.clone(),
            name: self.display_name.clone(),
            description: self.description.clone(),
        }
    }

    fn from_record(id: String, record: RuleSetRecord) -> Result<Self, RulesError> {
        if let Some(position) = record
            .excluded_ingredients
            .iter()
            .position(|pattern| pattern.trim().is_empty())
        {
            return Err(RulesError::BlankPattern { id, position });
        }

        for (pattern, candidates) in &record.substitutions {
            if !record.excluded_ingredients.contains(pattern) {
                warn!(dietary_type = %id, pattern = %pattern, "substitution registered for a pattern that is never excluded");
            }
            if candidates.is_empty() {
                warn!(dietary_type = %id, pattern = %pattern, "empty substitution list, '{}' will be offered", FALLBACK_SUBSTITUTE);
            }
        }

        Ok(Self {
            id,
            display_name: record.name,
            description: record.description,
            excluded_ingredients: record.excluded_ingredients,
            substitutions: record.substitutions,
        })
    }
}

/// Read-only table of every loaded dietary rule set, in load order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DietaryRules {
    version: Option<u64>,
    rule_sets: Vec<DietaryRuleSet>,
}

impl DietaryRules {
    pub fn new(rule_sets: Vec<DietaryRuleSet>) -> Self {
        Self {
            version: None,
            rule_sets,
        }
    }

    /// Rules compiled into the crate from `data/dietary_preferences.json`.
    pub fn bundled() -> Result<Self, RulesError> {
        Self::from_json_str(BUNDLED_RULES)
    }

    pub fn from_json_str(json: &str) -> Result<Self, RulesError> {
        let document: RulesDocument = serde_json::from_str(json)?;
        if document.dietary_types.is_empty() {
            return Err(RulesError::NoDietaryTypes);
        }

        let mut rule_sets = Vec::with_capacity(document.dietary_types.len());
        for (id, value) in document.dietary_types {
            let record: RuleSetRecord = serde_json::from_value(value)
                .map_err(|source| RulesError::InvalidRuleSet { id: id.clone(), source })?;
            rule_sets.push(DietaryRuleSet::from_record(id, record)?);
        }

        debug!(count = rule_sets.len(), version = ?document.version, "dietary rule sets loaded");
        Ok(Self {
            version: document.version,
            rule_sets,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(anyhow::anyhow!("Dietary rules file not found at: {:?}", path));
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read dietary rules file at {:?}", path))?;
        let rules = Self::from_json_str(&contents)
            .with_context(|| format!("Failed to parse dietary rules file at {:?}", path))?;
        Ok(rules)
    }

    pub fn get(&self, dietary_type: &str) -> Option<&DietaryRuleSet> {
        self.rule_sets.iter().find(|rule_set| rule_set.id == dietary_type)
    }

    /// Exact, case-sensitive lookup.
    pub fn get_rule_set(&self, dietary_type: &str) -> Result<&DietaryRuleSet, AdaptationError> {
        self.get(dietary_type)
            .ok_or_else(|| AdaptationError::UnknownDietaryType(dietary_type.to_string()))
    }

    pub fn available_dietary_types(&self) -> Vec<DietaryTypeSummary> {
        self.rule_sets.iter().map(DietaryRuleSet::summary).collect()
    }

    /// Format version declared by the rule document, if any.
    pub fn version(&self) -> Option<u64> {
        self.version
    }

    pub fn len(&self) -> usize {
        self.rule_sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rule_sets.is_empty()
    }
}
