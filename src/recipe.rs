use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;

/// A recipe ingredient.
///
/// `is_substitute` and `original` are filled in by adaptation; any other
/// fields present in the source record are carried through in `extra`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default)]
    pub is_substitute: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Ingredient {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: None,
            unit: None,
            is_substitute: false,
            original: None,
            extra: Map::new(),
        }
    }

    pub fn with_quantity(mut self, quantity: impl Into<Value>) -> Self {
        self.quantity = Some(quantity.into());
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Copy of this ingredient renamed to `substitute`, remembering the current name.
    pub fn substituted(&self, substitute: &str) -> Self {
        Self {
            name: substitute.to_string(),
            is_substitute: true,
            original: Some(self.name.clone()),
            ..self.clone()
        }
    }

    /// Copy of this ingredient explicitly tagged as not substituted.
    pub fn passed_through(&self) -> Self {
        Self {
            is_substitute: false,
            original: None,
            ..self.clone()
        }
    }

    /// Copy of this ingredient as it was before any substitution.
    pub fn restored(&self) -> Self {
        let name = match (&self.original, self.is_substitute) {
            (Some(original), true) => original.clone(),
            _ => self.name.clone(),
        };
        Self {
            name,
            is_substitute: false,
            original: None,
            ..self.clone()
        }
    }
}

/// Step identifier, either any JSON number or an opaque label.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum StepId {
    Number(Number),
    Label(String),
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepId::Number(n) => write!(f, "{}", n),
            StepId::Label(label) => write!(f, "{}", label),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub id: StepId,
    pub instruction: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_instruction: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Step {
    pub fn new(sequence: u64, instruction: impl Into<String>) -> Self {
        Self::with_id(StepId::Number(sequence.into()), instruction)
    }

    pub fn labelled(label: impl Into<String>, instruction: impl Into<String>) -> Self {
        Self::with_id(StepId::Label(label.into()), instruction)
    }

    fn with_id(id: StepId, instruction: impl Into<String>) -> Self {
        Self {
            id,
            instruction: instruction.into(),
            original_instruction: None,
            extra: Map::new(),
        }
    }

    /// Copy of this step with new instruction text and the given pre-rewrite text.
    pub fn rewritten(&self, instruction: String, original_instruction: String) -> Self {
        Self {
            instruction,
            original_instruction: Some(original_instruction),
            ..self.clone()
        }
    }

    pub fn restored(&self) -> Self {
        Self {
            instruction: self
                .original_instruction
                .clone()
                .unwrap_or_else(|| self.instruction.clone()),
            original_instruction: None,
            ..self.clone()
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(default, alias = "recipe_title")]
    pub title: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary_type: Option<String>,
    #[serde(default)]
    pub is_adapted: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub adaptation_notes: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Recipe {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ingredients: Vec::new(),
            steps: Vec::new(),
            dietary_type: None,
            is_adapted: false,
            adaptation_notes: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_ingredients(mut self, ingredients: Vec<Ingredient>) -> Self {
        self.ingredients = ingredients;
        self
    }

    pub fn with_steps(mut self, steps: Vec<Step>) -> Self {
        self.steps = steps;
        self
    }

    /// Copy of this recipe carrying `notes` and nothing else changed.
    pub fn with_notes(&self, notes: Vec<String>) -> Self {
        Self {
            adaptation_notes: notes,
            ..self.clone()
        }
    }

    /// Rebuilds the recipe as it was before adaptation: substituted ingredients
    /// get their original names back, rewritten steps get their original text
    /// back, and all adaptation metadata is dropped.
    pub fn restore_original(&self) -> Self {
        Self {
            title: self.title.clone(),
            ingredients: self.ingredients.iter().map(Ingredient::restored).collect(),
            steps: self.steps.iter().map(Step::restored).collect(),
            dietary_type: None,
            is_adapted: false,
            adaptation_notes: Vec::new(),
            extra: self.extra.clone(),
        }
    }
}

/// Contents of a recipe input file: one recipe or a list of them.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(untagged)]
pub enum RecipeDocument {
    Single(Box<Recipe>),
    Batch(Vec<Recipe>),
}

impl RecipeDocument {
    pub fn into_recipes(self) -> Vec<Recipe> {
        match self {
            RecipeDocument::Single(recipe) => vec![*recipe],
            RecipeDocument::Batch(recipes) => recipes,
        }
    }

    /// Same shape as `self`, holding `recipes` instead.
    pub fn reshaped(&self, mut recipes: Vec<Recipe>) -> Self {
        match self {
            RecipeDocument::Single(_) if recipes.len() == 1 => {
                RecipeDocument::Single(Box::new(recipes.remove(0)))
            }
            _ => RecipeDocument::Batch(recipes),
        }
    }
}
