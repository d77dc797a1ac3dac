//! # Extração de Contexto e Features
//!
//! Duas visões do mesmo contexto:
//!
//! 1. **Palavras relevantes** ([`relevant_words`]): a sequência de palavras de
//!    conteúdo ao redor do alvo, usada pelo Lesk para montar a assinatura do
//!    contexto.
//! 2. **Vetor de features** ([`supervised_features`]): features esparsas
//!    para o classificador supervisionado, nos três grupos clássicos do IMS.
//!
//! ## Features Supervisionadas
//!
//! ### Tags vizinhas (janela ±k)
//! `pos[-1]=TO`, `pos[+0]=VB`, `pos[+1]=VB`...
//!
//! ### Colocações locais
//! Sequências de palavras em pares de deslocamento fixos em torno do alvo
//! (o alvo em si é omitido). Para "discuss an important topic , **please**
//! write to me":
//! - `col[-1,-1]=,`
//! - `col[1,2]=write_to`
//! - `col[-2,1]=topic_,_write`
//!
//! ### Palavras ao redor
//! `word=topic`, `word=write`... (palavras relevantes em minúsculas, sem o alvo)
//!
//! ### Negação
//! `neg` quando alguma palavra da janela ao redor (fora o alvo) é de negação
//! (`not`, `never`...).
//!
//! Além disso `lemma=...`, `cat=...` e um `bias` sempre ativo.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::context::WordContext;
use crate::lexical::{is_negation_word, is_relevant_tag, is_stop_word};

/// Marcador de posição fora da sentença.
const PAD: &str = "<pad>";

/// Pares de deslocamento das colocações locais (inclusivos, alvo omitido).
const COLLOCATIONS: [(i32, i32); 11] = [
    (-1, -1),
    (1, 1),
    (-2, -2),
    (2, 2),
    (-2, -1),
    (-1, 1),
    (1, 2),
    (-3, -1),
    (-2, 1),
    (-1, 2),
    (1, 3),
];

/// Uma palavra de conteúdo do contexto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelevantWord {
    pub word: String,
    pub tag: String,
    pub is_target: bool,
}

/// Recorte da sentença considerado como contexto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextWindow {
    /// A sentença inteira.
    #[default]
    Sentence,
    /// `k` posições para cada lado do alvo.
    Around(usize),
}

impl ContextWindow {
    /// Intervalo de índices `[início, fim)` coberto pela janela.
    pub fn bounds(self, target: usize, len: usize) -> (usize, usize) {
        match self {
            ContextWindow::Sentence => (0, len),
            ContextWindow::Around(k) => (
                target.saturating_sub(k),
                target.saturating_add(k).saturating_add(1).min(len),
            ),
        }
    }
}

/// Palavras relevantes do contexto, em ordem de sentença.
///
/// Um token entra se sua tag é de uma das quatro categorias do inventário ou
/// se ele é o alvo; stop-words (comparadas em minúsculas) saem, exceto o alvo.
/// O alvo aparece exatamente uma vez, marcado com `is_target`.
pub fn relevant_words(ctx: &WordContext, window: ContextWindow) -> Vec<RelevantWord> {
    let target = ctx.target_index();
    let (start, end) = window.bounds(target, ctx.sentence().len());

    ctx.sentence()[start..end]
        .iter()
        .zip(&ctx.tags()[start..end])
        .enumerate()
        .filter_map(|(offset, (word, tag))| {
            let is_target = start + offset == target;
            let keep = is_target || (is_relevant_tag(tag) && !is_stop_word(&word.to_lowercase()));
            keep.then(|| RelevantWord {
                word: word.clone(),
                tag: tag.clone(),
                is_target,
            })
        })
        .collect()
}

/// Vetor esparso de features.
///
/// Usamos `BTreeMap` para que a iteração (e portanto a soma em ponto
/// flutuante) seja sempre na mesma ordem: entradas idênticas produzem scores
/// idênticos bit a bit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Features ativas. Ex: `{"bias": 1.0, "word=topic": 1.0}`.
    pub features: BTreeMap<String, f64>,
}

impl FeatureVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adiciona uma feature com valor 1.0 (binária) ou customizado.
    pub fn insert(&mut self, key: impl Into<String>, value: f64) {
        self.features.insert(key.into(), value);
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Produto escalar com um vetor de pesos.
    ///
    /// $$ \text{score} = \sum (w_i \cdot f_i) $$
    pub fn dot(&self, weights: &HashMap<String, f64>) -> f64 {
        self.features
            .iter()
            .map(|(k, v)| v * weights.get(k).unwrap_or(&0.0))
            .sum()
    }
}

/// Quais grupos de features extrair e com que janelas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureTemplate {
    /// Raio da janela de tags vizinhas.
    pub pos_window: usize,
    /// Liga as colocações locais.
    pub collocations: bool,
    /// Janela das palavras ao redor.
    pub surrounding: ContextWindow,
}

impl Default for FeatureTemplate {
    fn default() -> Self {
        Self {
            pos_window: 3,
            collocations: true,
            surrounding: ContextWindow::Sentence,
        }
    }
}

/// Extrai o vetor de features supervisionadas do alvo de `ctx`.
pub fn supervised_features(ctx: &WordContext, lemma: &str, template: &FeatureTemplate) -> FeatureVector {
    let mut fv = FeatureVector::new();
    let target = ctx.target_index() as i64;
    let words = ctx.sentence();
    let tags = ctx.tags();
    let at = |seq: &[String], pos: i64| -> String {
        usize::try_from(pos)
            .ok()
            .and_then(|p| seq.get(p))
            .map(|s| s.to_lowercase())
            .unwrap_or_else(|| PAD.to_string())
    };

    fv.insert("bias", 1.0);
    fv.insert(format!("lemma={}", lemma.to_lowercase()), 1.0);
    fv.insert(format!("cat={}", ctx.category().name()), 1.0);

    // === Passo 1: tags vizinhas ===
    let k = template.pos_window as i64;
    for offset in -k..=k {
        // tags continuam em caixa alta
        let tag = usize::try_from(target + offset)
            .ok()
            .and_then(|p| tags.get(p))
            .map(String::as_str)
            .unwrap_or(PAD);
        fv.insert(format!("pos[{offset:+}]={tag}"), 1.0);
    }

    // === Passo 2: colocações locais ===
    if template.collocations {
        for (from, to) in COLLOCATIONS {
            let span: Vec<String> = (from..=to)
                .filter(|&o| o != 0)
                .map(|o| at(words, target + o as i64))
                .collect();
            fv.insert(format!("col[{from},{to}]={}", span.join("_")), 1.0);
        }
    }

    // === Passo 3: palavras ao redor ===
    for rw in relevant_words(ctx, template.surrounding) {
        if !rw.is_target {
            fv.insert(format!("word={}", rw.word.to_lowercase()), 1.0);
        }
    }

    // === Passo 4: negação ===
    // varre todos os tokens da janela, não só as palavras relevantes
    let (start, end) = template.surrounding.bounds(ctx.target_index(), words.len());
    let negated = (start..end)
        .filter(|&i| i != ctx.target_index())
        .any(|i| is_negation_word(&words[i].to_lowercase()));
    if negated {
        fv.insert("neg", 1.0);
    }

    fv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    fn please_context() -> WordContext {
        WordContext::new(
            strings("We need to discuss an important topic , please write to me soon ."),
            strings("PRP VBP TO VB DT JJ NN , VB VB TO PRP RB ."),
            8,
        )
        .unwrap()
    }

    #[test]
    fn test_relevant_words_flags_target_once() {
        let ctx = please_context();
        let words = relevant_words(&ctx, ContextWindow::Sentence);
        assert_eq!(words.iter().filter(|w| w.is_target).count(), 1);
        let texts: Vec<&str> = words.iter().map(|w| w.word.as_str()).collect();
        // "need" e "soon" são stop-words; "to", "an", "me", "," e "." não são relevantes
        assert_eq!(texts, vec!["discuss", "important", "topic", "please", "write"]);
    }

    #[test]
    fn test_stop_word_target_is_kept() {
        let ctx = WordContext::new(strings("I need it"), strings("PRP VBP PRP"), 1).unwrap();
        let words = relevant_words(&ctx, ContextWindow::Sentence);
        assert_eq!(words.len(), 1);
        assert!(words[0].is_target);
    }

    #[test]
    fn test_window_restricts_context() {
        let ctx = please_context();
        let words = relevant_words(&ctx, ContextWindow::Around(1));
        let texts: Vec<&str> = words.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(texts, vec!["please", "write"]);
    }

    #[test]
    fn test_window_bounds_clamped() {
        assert_eq!(ContextWindow::Around(3).bounds(1, 4), (0, 4));
        assert_eq!(ContextWindow::Sentence.bounds(2, 5), (0, 5));
    }

    #[test]
    fn test_huge_window_saturates() {
        assert_eq!(ContextWindow::Around(usize::MAX).bounds(1, 4), (0, 4));
        let ctx = please_context();
        let words = relevant_words(&ctx, ContextWindow::Around(usize::MAX));
        assert_eq!(words, relevant_words(&ctx, ContextWindow::Sentence));
    }

    #[test]
    fn test_negation_feature() {
        let ctx = WordContext::new(
            strings("I did not go to the beach"),
            strings("PRP VBD RB VB TO DT NN"),
            3,
        )
        .unwrap();
        let fv = supervised_features(&ctx, "go", &FeatureTemplate::default());
        assert!(fv.features.contains_key("neg"));

        let plain = supervised_features(&please_context(), "please", &FeatureTemplate::default());
        assert!(!plain.features.contains_key("neg"));

        // a negação fica fora de uma janela de raio 1 em torno de "beach"
        let far = WordContext::new(ctx.sentence().to_vec(), ctx.tags().to_vec(), 6).unwrap();
        let narrow = FeatureTemplate {
            surrounding: ContextWindow::Around(1),
            ..FeatureTemplate::default()
        };
        assert!(!supervised_features(&far, "beach", &narrow).features.contains_key("neg"));
    }

    #[test]
    fn test_supervised_features_groups() {
        let ctx = please_context();
        let fv = supervised_features(&ctx, "please", &FeatureTemplate::default());
        assert!(fv.features.contains_key("bias"));
        assert!(fv.features.contains_key("lemma=please"));
        assert!(fv.features.contains_key("pos[+0]=VB"));
        assert!(fv.features.contains_key("pos[-1]=,"));
        assert!(fv.features.contains_key("col[1,2]=write_to"));
        assert!(fv.features.contains_key("col[-1,-1]=,"));
        assert!(fv.features.contains_key("word=topic"));
        assert!(!fv.features.contains_key("word=please"));
    }

    #[test]
    fn test_padding_at_sentence_edge() {
        let ctx = WordContext::new(strings("Please sit"), strings("VB VB"), 0).unwrap();
        let fv = supervised_features(&ctx, "please", &FeatureTemplate::default());
        assert!(fv.features.contains_key("pos[-1]=<pad>"));
        assert!(fv.features.contains_key("col[-1,-1]=<pad>"));
    }

    #[test]
    fn test_features_are_deterministic() {
        let ctx = please_context();
        let a = supervised_features(&ctx, "please", &FeatureTemplate::default());
        let b = supervised_features(&ctx, "please", &FeatureTemplate::default());
        assert_eq!(a, b);
    }

    #[test]
    fn test_dot_product() {
        let mut fv = FeatureVector::new();
        fv.insert("a", 1.0);
        fv.insert("b", 2.0);
        let weights: HashMap<String, f64> = [("a".to_string(), 0.5), ("c".to_string(), 9.0)].into_iter().collect();
        assert_eq!(fv.dot(&weights), 0.5);
    }
}
