//! # Colaboradores Linguísticos
//!
//! O motor de desambiguação recebe sentenças já tokenizadas, etiquetadas e
//! lematizadas. Quando o chamador tem apenas texto bruto (a interface web, por
//! exemplo), estas três etapas são feitas por implementações plugáveis dos
//! traits abaixo, agrupadas em um [`LinguisticPipeline`].
//!
//! ```text
//! "The bank raised its rates."
//!        │ Tokenizer
//!        ▼
//! [The, bank, raised, its, rates, .]
//!        │ PosTagger
//!        ▼
//! [DT,  NN,   VBD,    PRP$, NNS,  .]
//!        │ Lemmatizer
//!        ▼
//! [the, bank, raise,  its,  rate, .]
//! ```

use serde::Serialize;

use crate::corpus::get_corpus;
use crate::lemmatizer::RuleLemmatizer;
use crate::tagger::HmmTagger;
use crate::tokenizer::{RuleTokenizer, Token};

/// Divide texto bruto em tokens com offsets.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<Token>;
}

/// Atribui uma tag Penn Treebank a cada token.
pub trait PosTagger: Send + Sync {
    /// Devolve exatamente uma tag por token.
    fn tag(&self, tokens: &[String]) -> Vec<String>;
}

/// Reduz uma palavra flexionada à sua forma de dicionário.
pub trait Lemmatizer: Send + Sync {
    fn lemmatize(&self, word: &str, tag: &str) -> String;
}

/// Sentença analisada: três sequências paralelas de mesmo tamanho.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzedSentence {
    pub tokens: Vec<Token>,
    pub words: Vec<String>,
    pub tags: Vec<String>,
    pub lemmas: Vec<String>,
}

/// Tokenizador + etiquetador + lematizador.
pub struct LinguisticPipeline {
    tokenizer: Box<dyn Tokenizer>,
    tagger: Box<dyn PosTagger>,
    lemmatizer: Box<dyn Lemmatizer>,
}

impl LinguisticPipeline {
    pub fn new(
        tokenizer: Box<dyn Tokenizer>,
        tagger: Box<dyn PosTagger>,
        lemmatizer: Box<dyn Lemmatizer>,
    ) -> Self {
        Self {
            tokenizer,
            tagger,
            lemmatizer,
        }
    }

    /// Pipeline padrão para inglês: regras + HMM treinado no corpus embutido.
    pub fn english() -> Self {
        let corpus = get_corpus();
        let tagger = HmmTagger::train(&corpus);
        let lemmatizer = RuleLemmatizer::from_corpus(&corpus);
        Self::new(Box::new(RuleTokenizer::default()), Box::new(tagger), Box::new(lemmatizer))
    }

    pub fn lemmatizer(&self) -> &dyn Lemmatizer {
        self.lemmatizer.as_ref()
    }

    /// Executa as três etapas sobre um texto bruto.
    pub fn analyze(&self, text: &str) -> AnalyzedSentence {
        let tokens = self.tokenizer.tokenize(text);
        let words: Vec<String> = tokens.iter().map(|t| t.text.clone()).collect();
        let tags = self.tagger.tag(&words);
        let lemmas = words
            .iter()
            .zip(&tags)
            .map(|(w, t)| self.lemmatizer.lemmatize(w, t))
            .collect();

        AnalyzedSentence {
            tokens,
            words,
            tags,
            lemmas,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_parallel_sequences() {
        let pipeline = LinguisticPipeline::english();
        let analyzed = pipeline.analyze("The bank raised its interest rates again.");
        assert_eq!(analyzed.words.len(), analyzed.tags.len());
        assert_eq!(analyzed.words.len(), analyzed.lemmas.len());
        assert_eq!(analyzed.words[1], "bank");
        assert_eq!(analyzed.tags[1], "NN");
        assert_eq!(analyzed.lemmas[5], "rate");
    }

    #[test]
    fn test_empty_text() {
        let pipeline = LinguisticPipeline::english();
        let analyzed = pipeline.analyze("");
        assert!(analyzed.words.is_empty());
        assert!(analyzed.tags.is_empty());
    }
}
