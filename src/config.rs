use anyhow::{anyhow, Context, Result};
use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use crate::adaptation::RecipeAdapter;
use crate::dietary::{DietaryRules, MatchMode};

pub const RULES_PATH_ENV_VAR: &str = "RECIPE_ADAPT_RULES";
pub const MATCH_MODE_ENV_VAR: &str = "RECIPE_ADAPT_MATCH_MODE";
pub const LOG_FILTER_ENV_VAR: &str = "RECIPE_ADAPT_LOG";

const DEFAULT_LOG_FILTER: &str = "info";

/// Runtime settings for the adapter binary.
#[derive(Debug, Clone, PartialEq)]
pub struct AdapterConfig {
    /// Rule document to load. `None` means the bundled rules.
    pub rules_path: Option<PathBuf>,
    pub match_mode: MatchMode,
    pub log_filter: String,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            rules_path: None,
            match_mode: MatchMode::default(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AdapterConfig {
    /// Reads settings from the process environment, loading `.env` first.
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let match_mode = match lookup(MATCH_MODE_ENV_VAR) {
            Some(raw) => raw
                .parse::<MatchMode>()
                .map_err(|e| anyhow!(e))
                .with_context(|| format!("Invalid value for {}", MATCH_MODE_ENV_VAR))?,
            None => defaults.match_mode,
        };

        Ok(Self {
            rules_path: lookup(RULES_PATH_ENV_VAR)
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
            match_mode,
            log_filter: lookup(LOG_FILTER_ENV_VAR).unwrap_or(defaults.log_filter),
        })
    }

    /// Overrides the rules path when `rules_path` is given.
    pub fn with_rules_path(mut self, rules_path: Option<PathBuf>) -> Self {
        if rules_path.is_some() {
            self.rules_path = rules_path;
        }
        self
    }

    pub fn with_match_mode(mut self, match_mode: Option<MatchMode>) -> Self {
        if let Some(mode) = match_mode {
            self.match_mode = mode;
        }
        self
    }

    pub fn load_rules(&self) -> Result<DietaryRules> {
        match &self.rules_path {
            Some(path) => DietaryRules::from_path(path),
            None => DietaryRules::bundled().context("Failed to load bundled dietary rules"),
        }
    }

    pub fn build_adapter(&self) -> Result<RecipeAdapter<MatchMode>> {
        let rules = self.load_rules()?;
        Ok(RecipeAdapter::with_matcher(Arc::new(rules), self.match_mode))
    }
}
