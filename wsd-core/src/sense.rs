//! # Identificadores de Sentido
//!
//! Na fronteira do sistema um sentido trafega como string:
//!
//! ```text
//! WORDNET please%2:37:00::
//! └──┬──┘ └─┬──┘│ └┬┘ └┬┘
//!  origem  lema │ lex  id
//!               categoria (1=n, 2=v, 3=a, 4=r)
//! ```
//!
//! Internamente a string é decodificada imediatamente em [`TaggedSense`]
//! (origem + [`SenseKey`]) e só é recodificada na saída. O round-trip
//! `parse → to_string` é exato.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, WsdError};
use crate::lexical::LexicalCategory;

/// Prefixo das respostas que não são sentidos (placeholders).
pub const HELPER_ORIGIN: &str = "WSDHELPER";

/// Chave estruturada de um sentido: `lema%categoria:lex_file:lex_id::`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SenseKey {
    pub lemma: String,
    pub category: LexicalCategory,
    /// Número do arquivo lexicográfico (ex: 37 = `verb.emotion`).
    pub lex_file: u8,
    /// Distingue sentidos do mesmo lema dentro do mesmo arquivo lexicográfico.
    pub lex_id: u8,
}

impl SenseKey {
    /// Cria uma chave. Falha se a categoria não for uma das quatro relevantes.
    pub fn new(lemma: impl Into<String>, category: LexicalCategory, lex_file: u8, lex_id: u8) -> Result<Self> {
        let lemma = lemma.into();
        if lemma.is_empty() || category.code().is_none() {
            return Err(WsdError::InvalidSenseKey(format!("{lemma}%{category}")));
        }
        Ok(Self {
            lemma,
            category,
            lex_file,
            lex_id,
        })
    }

    /// Chave de palavra correspondente (ex: `please.v`).
    pub fn word_key(&self) -> String {
        format!("{}{}", self.lemma, self.category.suffix())
    }
}

impl fmt::Display for SenseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `code()` só é None para `Other`, que o construtor rejeita.
        let code = self.category.code().unwrap_or(0);
        write!(f, "{}%{}:{:02}:{:02}::", self.lemma, code, self.lex_file, self.lex_id)
    }
}

impl FromStr for SenseKey {
    type Err = WsdError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || WsdError::InvalidSenseKey(s.to_string());

        let (lemma, rest) = s.trim().split_once('%').ok_or_else(invalid)?;
        let mut parts = rest.split(':');
        let code: u8 = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
        let lex_file: u8 = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
        let lex_id: u8 = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
        let category = LexicalCategory::from_code(code).ok_or_else(invalid)?;

        SenseKey::new(lemma, category, lex_file, lex_id).map_err(|_| invalid())
    }
}

impl Serialize for SenseKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SenseKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// De onde veio um sentido atribuído.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SenseOrigin {
    /// Obtido do inventário (Lesk ou fallback de sentido mais frequente).
    WordNet,
    /// Predito por um modelo supervisionado treinado.
    Ims,
}

impl SenseOrigin {
    pub fn label(self) -> &'static str {
        match self {
            SenseOrigin::WordNet => "WORDNET",
            SenseOrigin::Ims => "IMS",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        match s {
            "WORDNET" => Some(SenseOrigin::WordNet),
            "IMS" => Some(SenseOrigin::Ims),
            _ => None,
        }
    }
}

/// Sentido com a marca de origem, no formato de fio `ORIGEM chave`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaggedSense {
    pub origin: SenseOrigin,
    pub key: SenseKey,
}

impl fmt::Display for TaggedSense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.origin.label(), self.key)
    }
}

impl FromStr for TaggedSense {
    type Err = WsdError;

    fn from_str(s: &str) -> Result<Self> {
        let (origin, key) = s
            .trim()
            .split_once(' ')
            .ok_or_else(|| WsdError::InvalidSenseKey(s.to_string()))?;
        let origin = SenseOrigin::from_label(origin).ok_or_else(|| WsdError::InvalidSenseKey(s.to_string()))?;
        Ok(Self {
            origin,
            key: key.parse()?,
        })
    }
}

impl Serialize for TaggedSense {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Um sentido candidato vindo do inventário: chave, glosa e exemplos de uso.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSense {
    pub key: SenseKey,
    pub gloss: String,
    #[serde(default)]
    pub examples: Vec<String>,
}

/// Saída das duas estratégias: maior score = mais preferido.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredSense {
    pub key: SenseKey,
    pub score: f64,
}

/// Ordena por score decrescente preservando a ordem original nos empates.
///
/// `sort_by` é estável, então o primeiro candidato devolvido pelo inventário
/// vence qualquer empate.
pub fn rank(scored: &mut [ScoredSense]) {
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
}

/// Resultado da desambiguação de uma posição da sentença.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disambiguation {
    /// Sentido atribuído, com sua origem.
    Sense(TaggedSense),
    /// Palavra deliberadamente não desambiguada (ex: `"determiner"`).
    Placeholder(String),
    /// Palavra relevante, mas sem nenhum sentido no inventário.
    Unknown,
}

impl Disambiguation {
    pub fn sense(&self) -> Option<&TaggedSense> {
        match self {
            Disambiguation::Sense(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Disambiguation::Placeholder(_))
    }
}

impl fmt::Display for Disambiguation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Disambiguation::Sense(s) => write!(f, "{s}"),
            Disambiguation::Placeholder(p) => write!(f, "{HELPER_ORIGIN} {p}"),
            Disambiguation::Unknown => write!(f, "{HELPER_ORIGIN} unknown"),
        }
    }
}

impl Serialize for Disambiguation {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sense_key() {
        let key: SenseKey = "please%2:37:00::".parse().unwrap();
        assert_eq!(key.lemma, "please");
        assert_eq!(key.category, LexicalCategory::Verb);
        assert_eq!(key.lex_file, 37);
        assert_eq!(key.lex_id, 0);
        assert_eq!(key.word_key(), "please.v");
        assert_eq!(key.to_string(), "please%2:37:00::");
    }

    #[test]
    fn test_parse_tagged_sense() {
        let sense: TaggedSense = "WORDNET highly%4:02:01::".parse().unwrap();
        assert_eq!(sense.origin, SenseOrigin::WordNet);
        assert_eq!(sense.key.category, LexicalCategory::Adverb);
        assert_eq!(sense.to_string(), "WORDNET highly%4:02:01::");
    }

    #[test]
    fn test_invalid_keys() {
        assert!("please".parse::<SenseKey>().is_err());
        assert!("please%9:37:00::".parse::<SenseKey>().is_err());
        assert!("%2:37:00::".parse::<SenseKey>().is_err());
        assert!("please%2:xx:00::".parse::<SenseKey>().is_err());
        assert!("ORACLE please%2:37:00::".parse::<TaggedSense>().is_err());
    }

    #[test]
    fn test_rank_is_stable_on_ties() {
        let k = |id| SenseKey::new("bank", LexicalCategory::Noun, 14, id).unwrap();
        let mut scored = vec![
            ScoredSense { key: k(0), score: 1.0 },
            ScoredSense { key: k(1), score: 2.0 },
            ScoredSense { key: k(2), score: 1.0 },
        ];
        rank(&mut scored);
        let ids: Vec<u8> = scored.iter().map(|s| s.key.lex_id).collect();
        assert_eq!(ids, vec![1, 0, 2]);
    }

    #[test]
    fn test_disambiguation_rendering() {
        let p = Disambiguation::Placeholder("determiner".into());
        assert_eq!(p.to_string(), "WSDHELPER determiner");
        assert!(p.is_placeholder());
        assert_eq!(Disambiguation::Unknown.to_string(), "WSDHELPER unknown");
    }
}
