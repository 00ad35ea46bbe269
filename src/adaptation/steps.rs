use std::ops::Range;
use tracing::debug;

use crate::dietary::matcher::IngredientMatcher;
use crate::error::AdaptationError;
use crate::recipe::{Ingredient, Step};

/// An ingredient swap applied during adaptation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub original: String,
    pub substitute: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AdaptedSteps {
    pub adapted_steps: Vec<Step>,
    /// One note per (step, substitution) match, grouped by substitution.
    pub notes: Vec<String>,
}

/// Collects the swaps recorded on `adapted_ingredients`, in ingredient order.
pub fn substitution_pairs(
    ingredients: &[Ingredient],
    adapted_ingredients: &[Ingredient],
) -> Result<Vec<Substitution>, AdaptationError> {
    if ingredients.len() != adapted_ingredients.len() {
        return Err(AdaptationError::IngredientCountMismatch {
            expected: ingredients.len(),
            found: adapted_ingredients.len(),
        });
    }

    adapted_ingredients
        .iter()
        .filter(|ingredient| ingredient.is_substitute)
        .map(|ingredient| match ingredient.original.as_deref() {
            Some(original) if !original.trim().is_empty() => Ok(Substitution {
                original: original.to_string(),
                substitute: ingredient.name.clone(),
            }),
            _ => Err(AdaptationError::MissingOriginal {
                name: ingredient.name.clone(),
            }),
        })
        .collect()
}

/// Rewrites instruction text to mention substitutes instead of the ingredients they replace.
///
/// For each substitution, the first occurrence of the original name in each
/// step is replaced by `"<substitute> (substituted for <original>)"`. A step hit
/// by several substitutions accumulates the rewrites, while
/// `original_instruction` always holds the text from before adaptation.
/// Text inserted by an earlier rewrite is never matched again.
pub fn adapt_steps<M>(
    steps: &[Step],
    ingredients: &[Ingredient],
    adapted_ingredients: &[Ingredient],
    matcher: &M,
) -> Result<AdaptedSteps, AdaptationError>
where
    M: IngredientMatcher + ?Sized,
{
    let substitutions = substitution_pairs(ingredients, adapted_ingredients)?;
    let mut adapted = AdaptedSteps {
        adapted_steps: steps.to_vec(),
        notes: Vec::new(),
    };
    if substitutions.is_empty() {
        return Ok(adapted);
    }

    // Per step, sorted disjoint byte spans of inserted replacement text.
    let mut inserted: Vec<Vec<Range<usize>>> = vec![Vec::new(); steps.len()];

    for substitution in &substitutions {
        let replacement = format!(
            "{} (substituted for {})",
            substitution.substitute, substitution.original
        );
        for (index, (step, source)) in adapted.adapted_steps.iter_mut().zip(steps).enumerate() {
            let spans = &mut inserted[index];
            let Some(range) = find_outside(matcher, &step.instruction, &substitution.original, spans) else {
                continue;
            };

            let instruction = format!(
                "{}{}{}",
                &step.instruction[..range.start],
                replacement,
                &step.instruction[range.end..]
            );
            *step = step.rewritten(instruction, source.instruction.clone());

            for span in spans.iter_mut().filter(|span| span.start >= range.end) {
                span.start = span.start - range.len() + replacement.len();
                span.end = span.end - range.len() + replacement.len();
            }
            spans.push(range.start..range.start + replacement.len());
            spans.sort_by_key(|span| span.start);

            debug!(step = %step.id, original = %substitution.original, "rewrote step");
            adapted.notes.push(format!(
                "Step {} has been modified to use {} instead of {}.",
                step.id, substitution.substitute, substitution.original
            ));
        }
    }

    Ok(adapted)
}

/// First match of `term` in `text` lying entirely between the `inserted` spans.
fn find_outside<M>(matcher: &M, text: &str, term: &str, inserted: &[Range<usize>]) -> Option<Range<usize>>
where
    M: IngredientMatcher + ?Sized,
{
    let tail = text.len()..text.len();
    let mut segment_start = 0;
    for span in inserted.iter().chain(std::iter::once(&tail)) {
        if let Some(found) = matcher.find(&text[segment_start..span.start], term) {
            return Some(segment_start + found.start..segment_start + found.end);
        }
        segment_start = span.end;
    }
    None
}
