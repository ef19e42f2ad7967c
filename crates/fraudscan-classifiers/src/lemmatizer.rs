//! Noun lemmatizer
//!
//! Implements WordNet's morphy procedure for nouns: consult the exception
//! list, otherwise detach inflectional suffixes and keep the candidates that
//! exist in the noun lexicon, preferring the shortest. Words with no
//! candidate in the lexicon are returned unchanged.
//!
//! The lexicon and exception list come from a WordNet dictionary directory
//! (`index.noun` and `noun.exc`).

use fraudscan_core::{Error, Result};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::info;

/// Suffix substitutions applied to nouns, in WordNet order
const NOUN_SUBSTITUTIONS: &[(&str, &str)] = &[
    ("s", ""),
    ("ses", "s"),
    ("ves", "f"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
];

/// Noun lemmatizer with no part-of-speech hint
#[derive(Debug, Clone)]
pub struct Lemmatizer {
    exceptions: HashMap<String, Vec<String>>,
    lexicon: HashSet<String>,
}

impl Lemmatizer {
    /// Lemmatizer backed by a WordNet dictionary directory
    ///
    /// Reads `index.noun` for the lemma lexicon and `noun.exc` for irregular
    /// forms.
    pub fn from_wordnet_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let index = read_dict_file(&dir.join("index.noun"))?;
        let exc = read_dict_file(&dir.join("noun.exc"))?;

        let lemmatizer = Self::from_wordnet_data(&index, &exc);
        info!(
            "Loaded WordNet noun lexicon from {} ({} lemmas, {} exceptions)",
            dir.display(),
            lemmatizer.lexicon.len(),
            lemmatizer.exceptions.len()
        );

        Ok(lemmatizer)
    }

    /// Build a lemmatizer from the contents of `index.noun` and `noun.exc`
    pub fn from_wordnet_data(index_noun: &str, noun_exc: &str) -> Self {
        let lexicon = index_noun
            .lines()
            // license header lines start with whitespace
            .filter(|line| !line.starts_with(char::is_whitespace))
            .filter_map(|line| line.split_whitespace().next())
            .map(str::to_string)
            .collect();

        let exceptions = noun_exc
            .lines()
            .filter_map(|line| {
                let mut fields = line.split_whitespace();
                let form = fields.next()?;
                Some((form.to_string(), fields.map(str::to_string).collect()))
            })
            .collect();

        Self { exceptions, lexicon }
    }

    /// Return the noun lemma of a lowercase word, or the word itself
    pub fn lemmatize(&self, word: &str) -> String {
        let known = |forms: Vec<String>| -> Vec<String> {
            let mut seen = HashSet::new();
            forms
                .into_iter()
                .filter(|form| self.lexicon.contains(form) && seen.insert(form.clone()))
                .collect()
        };

        let candidates = if let Some(bases) = self.exceptions.get(word) {
            let mut forms = vec![word.to_string()];
            forms.extend(bases.iter().cloned());
            known(forms)
        } else {
            let mut forms = apply_rules(&[word.to_string()]);
            let mut found = known(std::iter::once(word.to_string()).chain(forms.clone()).collect());

            while found.is_empty() && !forms.is_empty() {
                forms = apply_rules(&forms);
                found = known(forms.clone());
            }
            found
        };

        shortest(candidates).unwrap_or_else(|| word.to_string())
    }
}

fn read_dict_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| Error::io(path.display().to_string(), source))
}

fn apply_rules(forms: &[String]) -> Vec<String> {
    forms
        .iter()
        .flat_map(|form| {
            NOUN_SUBSTITUTIONS.iter().filter_map(move |(old, new)| {
                form.strip_suffix(old).map(|stem| format!("{stem}{new}"))
            })
        })
        .collect()
}

/// First candidate of minimal length
fn shortest(candidates: Vec<String>) -> Option<String> {
    let mut best: Option<String> = None;
    for candidate in candidates {
        match &best {
            Some(current) if current.chars().count() <= candidate.chars().count() => {}
            _ => best = Some(candidate),
        }
    }
    best
}
