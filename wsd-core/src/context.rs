//! # Contexto da Palavra
//!
//! Um [`WordContext`] é a unidade de trabalho do motor: uma sentença
//! tokenizada, suas tags, o índice da palavra-alvo e, opcionalmente, os
//! sentidos de referência (gold) vindos de um corpus anotado.
//!
//! ```text
//! sentença: [The, bank, raised, its, rates]
//! tags:     [DT,  NN,   VBD,    PRP$, NNS ]
//! alvo:           ^ índice 1 → lema "bank", categoria Noun, chave "bank.n"
//! ```
//!
//! O lema do alvo é a forma base da palavra sob a sua tag ("banks"/NNS →
//! "bank"). Ele vem de um corpus lematizado ([`WordContext::with_lemma`]), de
//! um lematizador dado na construção ([`WordContext::new_with`]) ou, na falta
//! dos dois, das regras embutidas de [`RuleLemmatizer`]. É calculado sob
//! demanda e guardado em cache; trocar a sentença, as tags ou o índice
//! invalida o cache.

use std::sync::{LazyLock, OnceLock};

use serde::Serialize;

use crate::error::{Result, WsdError};
use crate::lexical::{category_of, LexicalCategory};
use crate::lemmatizer::RuleLemmatizer;
use crate::linguistic::Lemmatizer;
use crate::sense::{SenseKey, TaggedSense};

/// Marcador de rótulo ausente nos corpora.
pub const GOLD_ABSENT: &str = "null";
/// Marcador de rótulo deliberadamente não resolvido.
pub const GOLD_UNRESOLVED: &str = "U";

/// Lematizador usado quando o contexto não recebeu lema nem lematizador.
static DEFAULT_LEMMATIZER: LazyLock<RuleLemmatizer> = LazyLock::new(RuleLemmatizer::new);

/// Situação do rótulo de referência de uma amostra.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoldStatus {
    /// Nenhum rótulo (lista vazia, string vazia ou `"null"`).
    Absent,
    /// Rótulo `"U"`: o anotador não conseguiu decidir.
    Unresolved,
    /// Um ou mais sentidos válidos.
    Labeled(Vec<SenseKey>),
}

impl GoldStatus {
    /// Decodifica a lista bruta de rótulos.
    ///
    /// Só a primeira entrada não vazia decide entre `Absent` (`"null"`) e
    /// `Unresolved` (`"U"`, sem distinção de caixa). Nas demais posições esses
    /// marcadores são ignorados. Aceita tanto `please%2:37:00::` quanto a
    /// forma com origem `WORDNET please%2:37:00::`; entradas inválidas são
    /// descartadas.
    pub fn parse(raw: &[String]) -> Self {
        let trimmed: Vec<&str> = raw.iter().map(|s| s.trim()).filter(|s| !s.is_empty()).collect();

        match trimmed.first() {
            None => return GoldStatus::Absent,
            Some(first) if *first == GOLD_ABSENT => return GoldStatus::Absent,
            Some(first) if first.eq_ignore_ascii_case(GOLD_UNRESOLVED) => return GoldStatus::Unresolved,
            Some(_) => {}
        }

        let keys: Vec<SenseKey> = trimmed
            .iter()
            .filter_map(|s| {
                s.parse::<SenseKey>()
                    .ok()
                    .or_else(|| s.parse::<TaggedSense>().ok().map(|t| t.key))
            })
            .collect();

        if keys.is_empty() {
            GoldStatus::Absent
        } else {
            GoldStatus::Labeled(keys)
        }
    }
}

/// Uma palavra-alvo dentro da sua sentença.
#[derive(Debug, Clone, Serialize)]
pub struct WordContext {
    sentence: Vec<String>,
    tags: Vec<String>,
    target_index: usize,
    gold_sense_ids: Vec<String>,
    #[serde(skip)]
    lemma: OnceLock<String>,
}

impl WordContext {
    /// Cria e valida um contexto.
    ///
    /// # Erros
    /// - [`WsdError::LengthMismatch`] se `tags.len() != sentence.len()`
    /// - [`WsdError::OutOfRange`] se `target_index >= sentence.len()`
    ///
    /// # Exemplo
    /// ```rust
    /// use wsd_core::context::WordContext;
    ///
    /// let words = vec!["The".to_string(), "bank".to_string()];
    /// let tags = vec!["DT".to_string(), "NN".to_string()];
    /// let ctx = WordContext::new(words, tags, 1).unwrap().with_lemma("bank");
    /// assert_eq!(ctx.raw_word_key(), "bank.n");
    /// ```
    pub fn new(sentence: Vec<String>, tags: Vec<String>, target_index: usize) -> Result<Self> {
        let ctx = Self {
            sentence,
            tags,
            target_index,
            gold_sense_ids: Vec::new(),
            lemma: OnceLock::new(),
        };
        ctx.validate()?;
        Ok(ctx)
    }

    /// Cria um contexto cujo lema vem de `lemmatizer`.
    ///
    /// ```rust
    /// use wsd_core::context::WordContext;
    /// use wsd_core::lemmatizer::RuleLemmatizer;
    ///
    /// let words = vec!["the".to_string(), "banks".to_string()];
    /// let tags = vec!["DT".to_string(), "NNS".to_string()];
    /// let ctx = WordContext::new_with(words, tags, 1, &RuleLemmatizer::new()).unwrap();
    /// assert_eq!(ctx.raw_word_key(), "bank.n");
    /// ```
    pub fn new_with(
        sentence: Vec<String>,
        tags: Vec<String>,
        target_index: usize,
        lemmatizer: &dyn Lemmatizer,
    ) -> Result<Self> {
        let ctx = Self::new(sentence, tags, target_index)?;
        ctx.lemma_with(lemmatizer);
        Ok(ctx)
    }

    /// Fixa o lema do alvo (ex: vindo de um corpus já lematizado).
    pub fn with_lemma(self, lemma: impl Into<String>) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(lemma.into().to_lowercase());
        Self { lemma: cell, ..self }
    }

    pub fn with_gold(mut self, gold: Vec<String>) -> Self {
        self.gold_sense_ids = gold;
        self
    }

    /// Revalida as invariantes depois de uso dos setters.
    pub fn validate(&self) -> Result<()> {
        if self.tags.len() != self.sentence.len() {
            return Err(WsdError::LengthMismatch {
                what: "tags",
                expected: self.sentence.len(),
                found: self.tags.len(),
            });
        }
        if self.target_index >= self.sentence.len() {
            return Err(WsdError::OutOfRange {
                index: self.target_index,
                len: self.sentence.len(),
            });
        }
        Ok(())
    }

    pub fn sentence(&self) -> &[String] {
        &self.sentence
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn target_index(&self) -> usize {
        self.target_index
    }

    pub fn gold_sense_ids(&self) -> &[String] {
        &self.gold_sense_ids
    }

    pub fn gold_status(&self) -> GoldStatus {
        GoldStatus::parse(&self.gold_sense_ids)
    }

    pub fn target_word(&self) -> &str {
        self.sentence.get(self.target_index).map(String::as_str).unwrap_or("")
    }

    pub fn target_tag(&self) -> &str {
        self.tags.get(self.target_index).map(String::as_str).unwrap_or("")
    }

    /// Categoria derivada da tag do alvo.
    pub fn category(&self) -> LexicalCategory {
        category_of(self.target_tag())
    }

    /// Lema do alvo. Sem lema fixado, aplica as regras do [`RuleLemmatizer`].
    pub fn lemma(&self) -> &str {
        self.lemma_with(&*DEFAULT_LEMMATIZER)
    }

    /// Lema do alvo calculado pelo lematizador (apenas na primeira chamada).
    pub fn lemma_with(&self, lemmatizer: &dyn Lemmatizer) -> &str {
        self.lemma
            .get_or_init(|| lemmatizer.lemmatize(self.target_word(), self.target_tag()))
    }

    /// Chave de palavra `lema + sufixo` (ex: `please.v`); sufixo vazio para tags irrelevantes.
    pub fn raw_word_key(&self) -> String {
        format!("{}{}", self.lemma(), self.category().suffix())
    }

    pub fn set_sentence(&mut self, sentence: Vec<String>) {
        self.sentence = sentence;
        self.lemma = OnceLock::new();
    }

    pub fn set_tags(&mut self, tags: Vec<String>) {
        self.tags = tags;
        self.lemma = OnceLock::new();
    }

    pub fn set_target_index(&mut self, index: usize) {
        self.target_index = index;
        self.lemma = OnceLock::new();
    }

    pub fn set_gold_sense_ids(&mut self, gold: Vec<String>) {
        self.gold_sense_ids = gold;
    }
}

impl PartialEq for WordContext {
    /// Igualdade posicional de sentença e tags (alvo e gold não participam).
    fn eq(&self, other: &Self) -> bool {
        self.sentence == other.sentence && self.tags == other.tags
    }
}

impl Eq for WordContext {}
