//! # Lesk: Sobreposição de Glosas
//!
//! Algoritmo não supervisionado: o sentido mais provável é aquele cuja
//! definição (glosa + exemplos de uso) compartilha mais palavras com o
//! contexto da sentença.
//!
//! ```text
//! contexto:  {component, radioactive, point, activated}
//!
//! highly%4:02:00::  "at a high rate or wage"              → ∩ = {}                   → 0
//! highly%4:02:01::  "to a high degree ... radioactive ... point"  → ∩ = {radioactive, point} → 2
//! ```
//!
//! ## Variantes ([`LeskScope`])
//!
//! | Escopo                         | Sentidos relacionados | Pesos        | Contexto |
//! |--------------------------------|-----------------------|--------------|----------|
//! | `Basic`                        | não                   | contagem     | sentença |
//! | `BasicContext`                 | não                   | contagem     | janela   |
//! | `Extended`                     | sim                   | `w^d`        | sentença |
//! | `ExtendedContext`              | sim                   | `w^d`        | janela   |
//! | `ExtendedExponential`          | sim                   | `n^i/(d+1)^e`| sentença |
//! | `ExtendedExponentialContext`   | sim                   | `n^i/(d+1)^e`| janela   |
//!
//! onde `n` é o tamanho da interseção, `d` a profundidade da relação, `w` o
//! `depth_weight`, `i` o `intersection_exponent` e `e` o `depth_exponent`.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use unicode_segmentation::UnicodeSegmentation;

use crate::context::WordContext;
use crate::disambiguator::Disambiguator;
use crate::error::Result;
use crate::features::{relevant_words, ContextWindow};
use crate::inventory::{Relation, SenseInventory};
use crate::lexical::is_stop_word;
use crate::sense::{rank, CandidateSense, ScoredSense, SenseKey, SenseOrigin};

/// Variante do algoritmo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeskScope {
    Basic,
    BasicContext,
    Extended,
    ExtendedContext,
    ExtendedExponential,
    #[default]
    ExtendedExponentialContext,
}

impl LeskScope {
    pub fn is_extended(self) -> bool {
        !matches!(self, LeskScope::Basic | LeskScope::BasicContext)
    }

    pub fn is_exponential(self) -> bool {
        matches!(self, LeskScope::ExtendedExponential | LeskScope::ExtendedExponentialContext)
    }

    /// Variantes `*Context` restringem o contexto à janela configurada.
    pub fn is_windowed(self) -> bool {
        matches!(
            self,
            LeskScope::BasicContext | LeskScope::ExtendedContext | LeskScope::ExtendedExponentialContext
        )
    }
}

/// Fontes de texto ligadas e desligadas individualmente.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeskFeatures {
    /// Usa a glosa na assinatura do sentido.
    pub gloss: bool,
    /// Usa os exemplos de uso na assinatura do sentido.
    pub examples: bool,
    /// Contexto = palavras relevantes; desligado, todos os tokens da janela.
    pub surrounding_context: bool,
    /// Remove stop-words das assinaturas.
    pub stop_word_filter: bool,
    pub synonyms: bool,
    pub hypernyms: bool,
    pub hyponyms: bool,
    pub meronyms: bool,
    pub holonyms: bool,
    pub entailments: bool,
    pub coordinate_terms: bool,
    pub causes: bool,
    pub attributes: bool,
    pub pertainyms: bool,
}

impl Default for LeskFeatures {
    fn default() -> Self {
        Self {
            gloss: true,
            examples: true,
            surrounding_context: true,
            stop_word_filter: true,
            synonyms: true,
            hypernyms: true,
            hyponyms: true,
            meronyms: true,
            holonyms: true,
            entailments: true,
            coordinate_terms: true,
            causes: true,
            attributes: true,
            pertainyms: true,
        }
    }
}

impl LeskFeatures {
    pub fn uses(&self, relation: Relation) -> bool {
        match relation {
            Relation::Synonyms => self.synonyms,
            Relation::Hypernyms => self.hypernyms,
            Relation::Hyponyms => self.hyponyms,
            Relation::Meronyms => self.meronyms,
            Relation::Holonyms => self.holonyms,
            Relation::Entailments => self.entailments,
            Relation::CoordinateTerms => self.coordinate_terms,
            Relation::Causes => self.causes,
            Relation::Attributes => self.attributes,
            Relation::Pertainyms => self.pertainyms,
        }
    }

    pub fn enabled_relations(&self) -> Vec<Relation> {
        Relation::ALL.into_iter().filter(|r| self.uses(*r)).collect()
    }
}

/// Parâmetros do Lesk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeskParameters {
    pub scope: LeskScope,
    pub features: LeskFeatures,
    /// Raio da janela de contexto nas variantes `*Context`.
    pub window: usize,
    /// Profundidade máxima da expansão por relações.
    pub depth: usize,
    pub depth_weight: f64,
    pub intersection_exponent: f64,
    pub depth_exponent: f64,
}

impl Default for LeskParameters {
    fn default() -> Self {
        Self {
            scope: LeskScope::default(),
            features: LeskFeatures::default(),
            window: 10,
            depth: 1,
            depth_weight: 0.8,
            intersection_exponent: 0.3,
            depth_exponent: 0.3,
        }
    }
}

impl LeskParameters {
    /// Lesk básico sobre a sentença inteira.
    pub fn basic() -> Self {
        Self {
            scope: LeskScope::Basic,
            ..Self::default()
        }
    }

    /// Peso de uma interseção de tamanho `overlap` encontrada na profundidade `depth`.
    fn weigh(&self, overlap: usize, depth: usize) -> f64 {
        let n = overlap as f64;
        if self.scope.is_exponential() {
            n.powf(self.intersection_exponent) / ((depth + 1) as f64).powf(self.depth_exponent)
        } else {
            n * self.depth_weight.powi(depth as i32)
        }
    }
}

/// Palavras minúsculas de um texto, opcionalmente sem stop-words.
fn bag_of_words(text: &str, stop_word_filter: bool) -> impl Iterator<Item = String> + '_ {
    text.unicode_words()
        .map(str::to_lowercase)
        .filter(move |w| !(stop_word_filter && is_stop_word(w)))
}

/// Desambiguador por sobreposição de glosas.
pub struct LeskDisambiguator {
    params: LeskParameters,
    inventory: Arc<dyn SenseInventory>,
}

impl LeskDisambiguator {
    pub fn new(params: LeskParameters, inventory: Arc<dyn SenseInventory>) -> Self {
        Self { params, inventory }
    }

    pub fn params(&self) -> &LeskParameters {
        &self.params
    }

    /// Assinatura do contexto: palavras minúsculas, sem o alvo.
    pub fn context_signature(&self, ctx: &WordContext) -> HashSet<String> {
        let window = if self.params.scope.is_windowed() {
            ContextWindow::Around(self.params.window)
        } else {
            ContextWindow::Sentence
        };

        if self.params.features.surrounding_context {
            return relevant_words(ctx, window)
                .into_iter()
                .filter(|w| !w.is_target)
                .map(|w| w.word.to_lowercase())
                .collect();
        }

        let (start, end) = window.bounds(ctx.target_index(), ctx.sentence().len());
        ctx.sentence()[start..end]
            .iter()
            .enumerate()
            .filter(|(offset, _)| start + offset != ctx.target_index())
            .flat_map(|(_, word)| bag_of_words(word, self.params.features.stop_word_filter).collect::<Vec<_>>())
            .collect()
    }

    /// Assinatura de um sentido: glosa e/ou exemplos.
    fn sense_signature(&self, gloss: &str, examples: &[String]) -> HashSet<String> {
        let filter = self.params.features.stop_word_filter;
        let mut signature = HashSet::new();
        if self.params.features.gloss {
            signature.extend(bag_of_words(gloss, filter));
        }
        if self.params.features.examples {
            for example in examples {
                signature.extend(bag_of_words(example, filter));
            }
        }
        signature
    }

    /// Soma ponderada das interseções dos sentidos relacionados, até `depth` níveis.
    fn related_score(&self, key: &SenseKey, context: &HashSet<String>) -> f64 {
        let relations = self.params.features.enabled_relations();
        let mut visited: HashSet<SenseKey> = HashSet::from([key.clone()]);
        let mut frontier = vec![key.clone()];
        let mut score = 0.0;

        for depth in 1..=self.params.depth {
            let mut next = Vec::new();
            for current in &frontier {
                for relation in &relations {
                    for related in self.inventory.related_senses(current, *relation) {
                        if !visited.insert(related.key.clone()) {
                            continue;
                        }
                        let signature = self.sense_signature(&related.gloss, &related.examples);
                        let overlap = signature.intersection(context).count();
                        score += self.params.weigh(overlap, depth);
                        next.push(related.key);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }
        score
    }

    fn score_one(&self, candidate: &CandidateSense, context: &HashSet<String>) -> f64 {
        let gloss = match self.inventory.lookup_gloss(&candidate.key) {
            Ok(gloss) => gloss,
            Err(e) => {
                warn!(sense = %candidate.key, error = %e, "glosa indisponível, score 0");
                return 0.0;
            }
        };

        let signature = self.sense_signature(&gloss, &candidate.examples);
        let overlap = signature.intersection(context).count();
        let mut score = self.params.weigh(overlap, 0);

        if self.params.scope.is_extended() {
            score += self.related_score(&candidate.key, context);
        }
        score
    }
}

impl Disambiguator for LeskDisambiguator {
    fn name(&self) -> &'static str {
        "lesk"
    }

    fn origin(&self) -> SenseOrigin {
        self.inventory.origin()
    }

    fn score_candidates(&self, ctx: &WordContext) -> Result<Vec<ScoredSense>> {
        let category = ctx.category();
        if !category.is_relevant() {
            return Ok(Vec::new());
        }

        let candidates = match self.inventory.lookup_senses(ctx.lemma(), category) {
            Ok(c) => c,
            Err(e) => {
                warn!(word = %ctx.raw_word_key(), error = %e, "inventário indisponível");
                return Ok(Vec::new());
            }
        };
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let context = self.context_signature(ctx);
        let mut scored: Vec<ScoredSense> = candidates
            .iter()
            .map(|c| {
                let score = self.score_one(c, &context);
                debug!(sense = %c.key, score, "candidato pontuado");
                ScoredSense { key: c.key.clone(), score }
            })
            .collect();

        rank(&mut scored);
        Ok(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WsdError;
    use crate::inventory::MemoryInventory;
    use crate::lexical::LexicalCategory;

    fn strings(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    fn radioactive_sentence(index: usize) -> WordContext {
        WordContext::new(
            strings("The component was highly radioactive to the point that it has been activated the second it touched water"),
            strings("DT NN VBD RB JJ TO DT NN IN PRP VBZ VBN VBN DT NN PRP VBD NN"),
            index,
        )
        .unwrap()
    }

    fn lesk(params: LeskParameters) -> LeskDisambiguator {
        LeskDisambiguator::new(params, Arc::new(MemoryInventory::demo()))
    }

    #[test]
    fn test_highly_prefers_degree_sense() {
        let ctx = radioactive_sentence(3);
        let scored = lesk(LeskParameters::default()).score_candidates(&ctx).unwrap();
        assert_eq!(scored.len(), 3);
        assert_eq!(scored[0].key.to_string(), "highly%4:02:01::");
        assert!(scored[0].score > scored[1].score);
    }

    #[test]
    fn test_basic_score_counts_distinct_words() {
        let ctx = radioactive_sentence(3);
        let scored = lesk(LeskParameters::basic()).score_candidates(&ctx).unwrap();
        // sentença inteira: {radioactive, point, water} ∩ assinatura de highly%4:02:01::
        assert_eq!(scored[0].key.to_string(), "highly%4:02:01::");
        assert_eq!(scored[0].score, 3.0);
        assert_eq!(scored[1].score, 0.0);
    }

    #[test]
    fn test_ties_keep_inventory_order() {
        let ctx = WordContext::new(strings("the bank"), strings("DT NN"), 1).unwrap();
        let scored = lesk(LeskParameters::basic()).score_candidates(&ctx).unwrap();
        let keys: Vec<String> = scored.iter().map(|s| s.key.to_string()).collect();
        assert_eq!(keys, vec!["bank%1:14:00::", "bank%1:17:01::", "bank%1:06:00::"]);
    }

    #[test]
    fn test_no_candidates_is_empty() {
        let ctx = WordContext::new(strings("the zebra"), strings("DT NN"), 1).unwrap();
        assert!(lesk(LeskParameters::default()).score_candidates(&ctx).unwrap().is_empty());
    }

    #[test]
    fn test_extended_uses_relations() {
        let ctx = WordContext::new(
            strings("the bank collects funds and invests them"),
            strings("DT NN VBZ NNS CC VBZ PRP"),
            1,
        )
        .unwrap();

        let basic = lesk(LeskParameters::basic()).score_candidates(&ctx).unwrap();
        assert!(basic.iter().all(|s| s.score == 0.0));

        let extended = lesk(LeskParameters {
            scope: LeskScope::Extended,
            ..LeskParameters::default()
        })
        .score_candidates(&ctx)
        .unwrap();
        // o hiperônimo "financial institution ... collects funds ... invests them"
        assert_eq!(extended[0].key.to_string(), "bank%1:14:00::");
        assert!(extended[0].score > 0.0);
    }

    #[test]
    fn test_scores_ignore_word_order() {
        let a = WordContext::new(
            strings("the river bank water"),
            strings("DT NN NN NN"),
            2,
        )
        .unwrap();
        let b = WordContext::new(
            strings("the water bank river"),
            strings("DT NN NN NN"),
            2,
        )
        .unwrap();
        let l = lesk(LeskParameters::basic());
        assert_eq!(l.score_candidates(&a).unwrap(), l.score_candidates(&b).unwrap());
    }

    /// Dois sentidos de "bank" e um hiperônimo para o sentido de margem.
    fn river_inventory() -> Arc<dyn SenseInventory> {
        let sense = |key: &str, gloss: &str, examples: &[&str]| CandidateSense {
            key: key.parse().unwrap(),
            gloss: gloss.to_string(),
            examples: examples.iter().map(|e| e.to_string()).collect(),
        };
        let mut inventory = MemoryInventory::new();
        inventory.add_sense(sense(
            "bank%1:14:00::",
            "financial institution that accepts deposits",
            &["he cashed a check at the bank"],
        ));
        inventory.add_sense(sense(
            "bank%1:17:01::",
            "sloping land along the edge of a river",
            &["they pulled the canoe up on the bank"],
        ));
        inventory.add_sense(sense("slope%1:17:00::", "an elevated geological formation near water", &[]));
        inventory.add_relation(
            "bank%1:17:01::".parse().unwrap(),
            Relation::Hypernyms,
            "slope%1:17:00::".parse().unwrap(),
        );
        Arc::new(inventory)
    }

    fn shore_score(params: LeskParameters, words: &str, tags: &str) -> f64 {
        let words = strings(words);
        let target = words.len() - 1;
        let ctx = WordContext::new(words, strings(tags), target).unwrap();
        LeskDisambiguator::new(params, river_inventory())
            .score_candidates(&ctx)
            .unwrap()
            .into_iter()
            .find(|s| s.key.to_string() == "bank%1:17:01::")
            .map(|s| s.score)
            .unwrap()
    }

    #[test]
    fn test_gloss_and_examples_toggles() {
        let with = |gloss: bool, examples: bool| {
            let mut params = LeskParameters::basic();
            params.features.gloss = gloss;
            params.features.examples = examples;
            shore_score(params, "the canoe river bank", "DT NN NN NN")
        };
        // "river" está na glosa, "canoe" no exemplo
        assert_eq!(with(true, true), 2.0);
        assert_eq!(with(true, false), 1.0);
        assert_eq!(with(false, true), 1.0);
        assert_eq!(with(false, false), 0.0);
    }

    #[test]
    fn test_surrounding_context_off_uses_every_token() {
        let mut params = LeskParameters::basic();
        let sentence = "walk along the river-edge bank";
        let tags = "VB IN DT NN NN";
        assert_eq!(shore_score(params, sentence, tags), 0.0);

        // o token composto vira "river" e "edge" no saco de palavras
        params.features.surrounding_context = false;
        assert_eq!(shore_score(params, sentence, tags), 2.0);

        let l = LeskDisambiguator::new(params, river_inventory());
        let ctx = WordContext::new(strings(sentence), strings(tags), 4).unwrap();
        let signature = l.context_signature(&ctx);
        assert!(signature.contains("edge"));
        assert!(!signature.contains("the"));
        assert!(!signature.contains("bank"));
    }

    #[test]
    fn test_stop_word_filter_toggle() {
        let mut params = LeskParameters::basic();
        params.features.surrounding_context = false;
        let sentence = "walk along the river bank";
        let tags = "VB IN DT NN NN";
        assert_eq!(shore_score(params, sentence, tags), 1.0);

        // sem filtro, "along" e "the" também se sobrepõem à glosa
        params.features.stop_word_filter = false;
        assert_eq!(shore_score(params, sentence, tags), 3.0);
    }

    #[test]
    fn test_depth_weighting_variants() {
        let sentence = "water erodes the bank";
        let tags = "NN VBZ DT NN";

        // só o hiperônimo (profundidade 1) compartilha "water"
        let linear = LeskParameters {
            scope: LeskScope::Extended,
            depth_weight: 0.5,
            ..LeskParameters::default()
        };
        assert_eq!(shore_score(linear, sentence, tags), 0.5);

        let exponential = LeskParameters {
            scope: LeskScope::ExtendedExponential,
            intersection_exponent: 0.3,
            depth_exponent: 0.3,
            ..LeskParameters::default()
        };
        let expected = 1.0 / 2f64.powf(0.3);
        assert!((shore_score(exponential, sentence, tags) - expected).abs() < 1e-12);

        assert_eq!(linear.weigh(4, 2), 1.0);
        let steep = LeskParameters {
            intersection_exponent: 0.5,
            depth_exponent: 1.0,
            ..exponential
        };
        assert!((steep.weigh(4, 2) - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_context_scopes_narrow_the_window() {
        let sentence = "canoe trip ended at the bank";
        let tags = "NN NN VBD IN DT NN";
        let scoped = |scope: LeskScope| {
            let params = LeskParameters {
                scope,
                window: 1,
                ..LeskParameters::default()
            };
            shore_score(params, sentence, tags)
        };
        // "canoe" fica a cinco posições do alvo
        assert_eq!(scoped(LeskScope::Basic), 1.0);
        assert_eq!(scoped(LeskScope::BasicContext), 0.0);
        assert_eq!(scoped(LeskScope::Extended), 1.0);
        assert_eq!(scoped(LeskScope::ExtendedContext), 0.0);
    }

    struct GlosslessInventory(MemoryInventory);

    impl SenseInventory for GlosslessInventory {
        fn lookup_senses(&self, lemma: &str, category: LexicalCategory) -> Result<Vec<CandidateSense>> {
            self.0.lookup_senses(lemma, category)
        }

        fn lookup_gloss(&self, key: &SenseKey) -> Result<String> {
            Err(WsdError::InventoryUnavailable(key.to_string()))
        }
    }

    #[test]
    fn test_gloss_failure_scores_zero() {
        let ctx = radioactive_sentence(3);
        let l = LeskDisambiguator::new(LeskParameters::basic(), Arc::new(GlosslessInventory(MemoryInventory::demo())));
        let scored = l.score_candidates(&ctx).unwrap();
        assert_eq!(scored.len(), 3);
        assert!(scored.iter().all(|s| s.score == 0.0));
    }
}
