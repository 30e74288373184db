//! Surface realiser: turns an intent and the ranked concepts into text.

use std::collections::HashMap;

use crate::format::nol::Vocabulary;

/// Response used when an intent has no template.
pub const FALLBACK_RESPONSE: &str = "I'm not sure what to say about that.";

/// Placeholder replaced by the label of the strongest concept.
pub const CONCEPT_PLACEHOLDER: &str = "{concept}";

/// Produce the response for `intent`.
///
/// The first template registered for the intent is used. Every
/// `{concept}` in it becomes the label of `ranked_concepts[0]`.
#[must_use]
pub fn realize(
    intent: &str,
    ranked_concepts: &[String],
    vocab: &Vocabulary,
    labels: &HashMap<&str, &str>,
) -> String {
    let Some(template) = vocab.templates_for(intent).first() else {
        return FALLBACK_RESPONSE.to_string();
    };
    if !template.contains(CONCEPT_PLACEHOLDER) {
        return template.clone();
    }
    template.replace(CONCEPT_PLACEHOLDER, &best_label(ranked_concepts, labels))
}

/// Label of the top concept, or a readable form of its id.
fn best_label(ranked_concepts: &[String], labels: &HashMap<&str, &str>) -> String {
    let Some(top) = ranked_concepts.first() else {
        return "something".to_string();
    };
    match labels.get(top.as_str()) {
        Some(label) => (*label).to_string(),
        None => top.replace("c_", "").replace('_', " "),
    }
}
