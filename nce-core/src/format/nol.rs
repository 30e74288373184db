//! `.nol` vocabulary and template files.
//!
//! ```text
//! @section vocabulary
//! hello | c_hello | synonyms:hi,hey | category:social | sentiment:0.5
//!
//! @section templates
//! greeting | Hello! Nice to talk about {concept}.
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{fields, list, scan, Line};
use crate::error::Result;

/// A vocabulary entry mapping surface words to a concept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptEntry {
    /// Concept (graph node) id.
    pub concept_id: String,
    /// Alternative surface forms.
    pub synonyms: Vec<String>,
    /// Free-form category tag.
    pub category: String,
    /// Sentiment hint, unused by the engine.
    pub sentiment: f64,
}

/// Parsed vocabulary and templates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vocabulary {
    /// Lower-cased surface word (or synonym) → entry.
    pub vocab: HashMap<String, ConceptEntry>,
    /// Intent → templates in file order.
    pub templates: HashMap<String, Vec<String>>,
}

impl Vocabulary {
    /// Create an empty vocabulary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `entry` under `word` and every synonym (all lower-cased).
    pub fn insert_word(&mut self, word: &str, entry: ConceptEntry) {
        for syn in &entry.synonyms {
            self.vocab.insert(syn.to_lowercase(), entry.clone());
        }
        self.vocab.insert(word.to_lowercase(), entry);
    }

    /// Append a template for `intent`.
    pub fn add_template(&mut self, intent: impl Into<String>, template: impl Into<String>) {
        self.templates.entry(intent.into()).or_default().push(template.into());
    }

    /// The entry a (lower-case) token maps to.
    #[must_use]
    pub fn lookup(&self, token: &str) -> Option<&ConceptEntry> {
        self.vocab.get(token)
    }

    /// Templates registered for `intent`.
    #[must_use]
    pub fn templates_for(&self, intent: &str) -> &[String] {
        self.templates.get(intent).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Read and parse a `.nol` file.
///
/// # Errors
/// Returns `NceError::Io` if the file cannot be read and `NceError::Parse`
/// for a malformed section header.
pub fn load(path: &Path) -> Result<Vocabulary> {
    let src = std::fs::read_to_string(path)?;
    let vocab = parse_str(&src, &path.display().to_string())?;
    info!(
        path = %path.display(),
        words = vocab.vocab.len(),
        intents = vocab.templates.len(),
        "Loaded vocabulary"
    );
    Ok(vocab)
}

/// Parse `.nol` source text. `file` is only used in diagnostics.
///
/// # Errors
/// Returns `NceError::Parse` for a malformed section header.
pub fn parse_str(src: &str, file: &str) -> Result<Vocabulary> {
    let mut data = Vocabulary::new();
    let mut section = String::new();

    for (line_no, line) in scan(src, file)? {
        match line {
            Line::Section(name) => section = name,
            Line::Entry(entry) => match section.as_str() {
                "vocabulary" => parse_vocab_line(entry, line_no, &mut data),
                "templates" => parse_template_line(entry, &mut data),
                _ => {}
            },
        }
    }
    Ok(data)
}

/// `word | concept_id | synonyms:s1,s2 | category:cat | sentiment:val`
fn parse_vocab_line(line: &str, line_no: usize, data: &mut Vocabulary) {
    let parts = fields(line);
    if parts.len() < 2 {
        return;
    }

    let mut entry = ConceptEntry {
        concept_id: parts[1].to_string(),
        synonyms: Vec::new(),
        category: String::new(),
        sentiment: 0.0,
    };
    for part in &parts[2..] {
        if let Some(v) = part.strip_prefix("synonyms:") {
            entry.synonyms = list(v);
        } else if let Some(v) = part.strip_prefix("category:") {
            entry.category = v.trim().to_string();
        } else if let Some(v) = part.strip_prefix("sentiment:") {
            entry.sentiment = v.trim().parse().unwrap_or_else(|_| {
                warn!(line = line_no, value = v.trim(), "Unparsable sentiment, using 0.0");
                0.0
            });
        }
    }

    data.insert_word(parts[0], entry);
}

/// `intent | template text` (the text may itself contain `|`).
fn parse_template_line(line: &str, data: &mut Vocabulary) {
    let Some((intent, template)) = line.split_once('|') else {
        return;
    };
    data.add_template(intent.trim(), template.trim());
}
