//! # Lematizador
//!
//! Dicionário de exceções aprendido do corpus anotado, seguido de regras de
//! sufixo por categoria (plural de substantivos, flexões verbais, graus de
//! adjetivos e advérbios). Toda saída é minúscula.

use std::collections::HashMap;

use crate::corpus::SenseAnnotatedSentence;
use crate::lexical::{category_of, LexicalCategory};
use crate::linguistic::Lemmatizer;

/// Irregulares frequentes que as regras de sufixo não cobrem.
const IRREGULAR: &[(&str, LexicalCategory, &str)] = &[
    ("is", LexicalCategory::Verb, "be"),
    ("are", LexicalCategory::Verb, "be"),
    ("was", LexicalCategory::Verb, "be"),
    ("were", LexicalCategory::Verb, "be"),
    ("been", LexicalCategory::Verb, "be"),
    ("am", LexicalCategory::Verb, "be"),
    ("has", LexicalCategory::Verb, "have"),
    ("had", LexicalCategory::Verb, "have"),
    ("did", LexicalCategory::Verb, "do"),
    ("does", LexicalCategory::Verb, "do"),
    ("done", LexicalCategory::Verb, "do"),
    ("went", LexicalCategory::Verb, "go"),
    ("gone", LexicalCategory::Verb, "go"),
    ("made", LexicalCategory::Verb, "make"),
    ("said", LexicalCategory::Verb, "say"),
    ("took", LexicalCategory::Verb, "take"),
    ("taken", LexicalCategory::Verb, "take"),
    ("came", LexicalCategory::Verb, "come"),
    ("saw", LexicalCategory::Verb, "see"),
    ("seen", LexicalCategory::Verb, "see"),
    ("got", LexicalCategory::Verb, "get"),
    ("gave", LexicalCategory::Verb, "give"),
    ("given", LexicalCategory::Verb, "give"),
    ("found", LexicalCategory::Verb, "find"),
    ("thought", LexicalCategory::Verb, "think"),
    ("told", LexicalCategory::Verb, "tell"),
    ("left", LexicalCategory::Verb, "leave"),
    ("felt", LexicalCategory::Verb, "feel"),
    ("kept", LexicalCategory::Verb, "keep"),
    ("wrote", LexicalCategory::Verb, "write"),
    ("written", LexicalCategory::Verb, "write"),
    ("men", LexicalCategory::Noun, "man"),
    ("women", LexicalCategory::Noun, "woman"),
    ("children", LexicalCategory::Noun, "child"),
    ("people", LexicalCategory::Noun, "person"),
    ("feet", LexicalCategory::Noun, "foot"),
    ("teeth", LexicalCategory::Noun, "tooth"),
    ("better", LexicalCategory::Adjective, "good"),
    ("best", LexicalCategory::Adjective, "good"),
    ("worse", LexicalCategory::Adjective, "bad"),
    ("worst", LexicalCategory::Adjective, "bad"),
];

/// Lematizador de dicionário + regras.
#[derive(Debug, Clone, Default)]
pub struct RuleLemmatizer {
    dictionary: HashMap<(String, LexicalCategory), String>,
}

impl RuleLemmatizer {
    /// Lematizador só com os irregulares embutidos.
    pub fn new() -> Self {
        let dictionary = IRREGULAR
            .iter()
            .map(|(w, c, l)| ((w.to_string(), *c), l.to_string()))
            .collect();
        Self { dictionary }
    }

    /// Acrescenta os pares `(palavra, tag) → lema` observados no corpus.
    pub fn from_corpus(corpus: &[SenseAnnotatedSentence]) -> Self {
        let mut lemmatizer = Self::new();
        for sentence in corpus {
            for (word, tag, lemma) in sentence.tokens {
                lemmatizer.insert(word, category_of(tag), lemma);
            }
        }
        lemmatizer
    }

    pub fn insert(&mut self, word: &str, category: LexicalCategory, lemma: &str) {
        self.dictionary
            .insert((word.to_lowercase(), category), lemma.to_lowercase());
    }

    fn apply_rules(word: &str, tag: &str) -> String {
        let strip = |suffix: &str, replacement: &str| -> Option<String> {
            word.strip_suffix(suffix)
                .filter(|stem| stem.len() >= 2)
                .map(|stem| format!("{stem}{replacement}"))
        };

        let lemma = match tag {
            "NNS" | "NNPS" => strip("ies", "y")
                .or_else(|| strip("sses", "ss"))
                .or_else(|| strip("ches", "ch"))
                .or_else(|| strip("shes", "sh"))
                .or_else(|| strip("xes", "x"))
                .or_else(|| word.ends_with("ss").then(|| word.to_string()))
                .or_else(|| strip("s", "")),
            "VBZ" => strip("ies", "y")
                .or_else(|| strip("ches", "ch"))
                .or_else(|| strip("shes", "sh"))
                .or_else(|| strip("sses", "ss"))
                .or_else(|| strip("s", "")),
            "VBD" | "VBN" => strip("ied", "y").or_else(|| undouble(strip("ed", "")?)),
            "VBG" => strip("ying", "ie")
                .filter(|_| word.len() <= 5)
                .or_else(|| undouble(strip("ing", "")?)),
            "JJR" | "RBR" => strip("ier", "y").or_else(|| undouble(strip("er", "")?)),
            "JJS" | "RBS" => strip("iest", "y").or_else(|| undouble(strip("est", "")?)),
            _ => None,
        };

        lemma.unwrap_or_else(|| word.to_string())
    }
}

/// Desfaz consoante dobrada ("stopped" → "stop", "bigger" → "big").
fn undouble(stem: String) -> Option<String> {
    let bytes = stem.as_bytes();
    let n = bytes.len();
    if n >= 3 && bytes[n - 1].is_ascii_alphabetic() && bytes[n - 1] == bytes[n - 2] && !b"aeiouls".contains(&bytes[n - 1]) {
        return Some(stem[..n - 1].to_string());
    }
    Some(stem)
}

impl Lemmatizer for RuleLemmatizer {
    fn lemmatize(&self, word: &str, tag: &str) -> String {
        let lower = word.to_lowercase();
        let category = category_of(tag);
        if let Some(lemma) = self.dictionary.get(&(lower.clone(), category)) {
            return lemma.clone();
        }
        Self::apply_rules(&lower, tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::get_corpus;

    #[test]
    fn test_irregulars() {
        let lem = RuleLemmatizer::new();
        assert_eq!(lem.lemmatize("was", "VBD"), "be");
        assert_eq!(lem.lemmatize("Children", "NNS"), "child");
    }

    #[test]
    fn test_suffix_rules() {
        let lem = RuleLemmatizer::new();
        assert_eq!(lem.lemmatize("rates", "NNS"), "rate");
        assert_eq!(lem.lemmatize("companies", "NNS"), "company");
        assert_eq!(lem.lemmatize("glasses", "NNS"), "glass");
        assert_eq!(lem.lemmatize("stopped", "VBD"), "stop");
        assert_eq!(lem.lemmatize("carried", "VBN"), "carry");
        assert_eq!(lem.lemmatize("running", "VBG"), "run");
        assert_eq!(lem.lemmatize("watches", "VBZ"), "watch");
        assert_eq!(lem.lemmatize("bigger", "JJR"), "big");
    }

    #[test]
    fn test_untouched_categories() {
        let lem = RuleLemmatizer::new();
        assert_eq!(lem.lemmatize("The", "DT"), "the");
        assert_eq!(lem.lemmatize("highly", "RB"), "highly");
    }

    #[test]
    fn test_corpus_dictionary_wins() {
        let lem = RuleLemmatizer::from_corpus(&get_corpus());
        assert_eq!(lem.lemmatize("pleased", "VBD"), "please");
        assert_eq!(lem.lemmatize("leaves", "NNS"), "leaf");
        assert_eq!(lem.lemmatize("Fishermen", "NNS"), "fisherman");
    }
}
