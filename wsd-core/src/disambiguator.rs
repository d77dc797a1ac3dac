//! # Orquestrador de Desambiguação
//!
//! O [`WsdEngine`] recebe uma sentença já tokenizada, etiquetada e
//! lematizada e decide, posição por posição, o que devolver:
//!
//! ```text
//! tag não relevante (DT, TO, PRP...) → "WSDHELPER determiner"
//! tag relevante, com candidatos      → "WORDNET highly%4:02:01::"
//! tag relevante, sem candidatos      → "WSDHELPER unknown"
//! ```
//!
//! A escolha do sentido é delegada a uma estratégia plugável
//! ([`Disambiguator`]): Lesk ou IMS.
//!
//! Como no restante do crate, o processamento pode ser observado passo a
//! passo: [`WsdEngine::disambiguate_streaming`] emite [`WsdEvent`]s por um
//! canal `mpsc`, que o servidor web repassa ao cliente via WebSocket.

use std::ops::Range;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::context::WordContext;
use crate::error::{Result, WsdError};
use crate::features::{relevant_words, ContextWindow};
use crate::ims::{ImsDisambiguator, ImsModelSet};
use crate::lesk::{LeskDisambiguator, LeskParameters};
use crate::lexical::placeholder_for;
use crate::resources::WsdResources;
use crate::sense::{Disambiguation, ScoredSense, SenseOrigin, TaggedSense};

/// Estratégia de escolha de sentido.
pub trait Disambiguator: Send + Sync {
    /// Nome curto, usado em logs e na API.
    fn name(&self) -> &'static str;

    /// Origem marcada nos sentidos devolvidos.
    fn origin(&self) -> SenseOrigin;

    /// Candidatos do alvo de `ctx`, do melhor para o pior.
    fn score_candidates(&self, ctx: &WordContext) -> Result<Vec<ScoredSense>>;

    /// Melhor sentido do alvo, ou `None` quando não há candidato algum.
    fn predict(&self, ctx: &WordContext) -> Result<Option<TaggedSense>> {
        let scored = self.score_candidates(ctx)?;
        Ok(scored.into_iter().next().map(|s| TaggedSense {
            origin: self.origin(),
            key: s.key,
        }))
    }
}

/// Estratégias disponíveis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Sobreposição de glosas (não supervisionado).
    #[default]
    Lesk,
    /// Classificador supervisionado por lema.
    Ims,
}

/// Eventos emitidos durante a desambiguação de um span.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum WsdEvent {
    /// **Passo 1**: contexto montado para uma posição relevante.
    ContextExtracted {
        index: usize,
        word: String,
        lemma: String,
        category: String,
        /// Palavras relevantes do contexto (o alvo incluído).
        context: Vec<String>,
    },
    /// **Passo 2**: candidatos pontuados pela estratégia.
    CandidatesScored {
        index: usize,
        word: String,
        scores: Vec<ScoredSense>,
    },
    /// **Passo 3**: resultado final de uma posição.
    SenseAssigned {
        index: usize,
        word: String,
        result: Disambiguation,
    },
    /// **Conclusão**.
    Done {
        results: Vec<Disambiguation>,
        strategy: String,
        processing_ms: u64,
    },
    /// **Falha**: o span inteiro foi abortado.
    Error { message: String },
}

/// Sentença a desambiguar: três sequências paralelas.
struct Sentence<'a> {
    words: &'a [String],
    tags: &'a [String],
    lemmas: &'a [String],
}

impl<'a> Sentence<'a> {
    fn new(words: &'a [String], tags: &'a [String], lemmas: &'a [String]) -> Result<Self> {
        if tags.len() != words.len() {
            return Err(WsdError::LengthMismatch {
                what: "tags",
                expected: words.len(),
                found: tags.len(),
            });
        }
        if lemmas.len() != words.len() {
            return Err(WsdError::LengthMismatch {
                what: "lemas",
                expected: words.len(),
                found: lemmas.len(),
            });
        }
        Ok(Self { words, tags, lemmas })
    }

    fn context(&self, index: usize) -> Result<WordContext> {
        let ctx = WordContext::new(self.words.to_vec(), self.tags.to_vec(), index)?;
        Ok(ctx.with_lemma(self.lemmas[index].as_str()))
    }
}

/// O orquestrador.
pub struct WsdEngine {
    strategy: Option<Box<dyn Disambiguator>>,
    resources: Option<Arc<WsdResources>>,
}

impl WsdEngine {
    pub fn new(strategy: Box<dyn Disambiguator>) -> Self {
        Self {
            strategy: Some(strategy),
            resources: None,
        }
    }

    /// Orquestrador sem estratégia: toda chamada devolve [`WsdError::NotConfigured`].
    pub fn unconfigured() -> Self {
        Self {
            strategy: None,
            resources: None,
        }
    }

    /// Lesk sobre o inventário dos recursos compartilhados.
    pub fn lesk(resources: Arc<WsdResources>, params: LeskParameters) -> Self {
        let lesk = LeskDisambiguator::new(params, Arc::clone(&resources.inventory));
        Self::new(Box::new(lesk)).with_resources(resources)
    }

    /// IMS com os modelos dados e fallback no inventário compartilhado.
    pub fn ims(resources: Arc<WsdResources>, models: ImsModelSet) -> Self {
        let ims = ImsDisambiguator::new(models, Arc::clone(&resources.inventory));
        Self::new(Box::new(ims)).with_resources(resources)
    }

    /// Anexa os recursos usados por [`WsdEngine::disambiguate_text`].
    pub fn with_resources(mut self, resources: Arc<WsdResources>) -> Self {
        self.resources = Some(resources);
        self
    }

    pub fn strategy_name(&self) -> Option<&'static str> {
        self.strategy.as_deref().map(|s| s.name())
    }

    fn strategy(&self) -> Result<&dyn Disambiguator> {
        self.strategy.as_deref().ok_or(WsdError::NotConfigured)
    }

    /// Desambigua um contexto já montado (usado pelo avaliador).
    pub fn disambiguate_context(&self, ctx: &WordContext) -> Result<Disambiguation> {
        let strategy = self.strategy()?;
        ctx.validate()?;
        resolve(strategy, ctx)
    }

    /// Desambigua a palavra na posição `index`.
    ///
    /// # Erros
    /// - [`WsdError::NotConfigured`] sem estratégia
    /// - [`WsdError::LengthMismatch`] se tags ou lemas não acompanham a sentença
    /// - [`WsdError::OutOfRange`] se `index >= sentence.len()`
    pub fn disambiguate_one(
        &self,
        sentence: &[String],
        tags: &[String],
        lemmas: &[String],
        index: usize,
    ) -> Result<Disambiguation> {
        let strategy = self.strategy()?;
        let sentence = Sentence::new(sentence, tags, lemmas)?;
        resolve(strategy, &sentence.context(index)?)
    }

    /// Uma entrada por índice do intervalo semiaberto `span`, em ordem.
    ///
    /// # Exemplo
    /// ```rust
    /// use std::sync::Arc;
    /// use wsd_core::disambiguator::WsdEngine;
    /// use wsd_core::lesk::LeskParameters;
    /// use wsd_core::resources::demo_resources;
    ///
    /// let engine = WsdEngine::lesk(Arc::new(demo_resources()), LeskParameters::default());
    /// let words: Vec<String> = ["the", "bank"].iter().map(|s| s.to_string()).collect();
    /// let tags: Vec<String> = ["DT", "NN"].iter().map(|s| s.to_string()).collect();
    /// let results = engine.disambiguate_span(&words, &tags, &words, 0..2).unwrap();
    /// assert_eq!(results[0].to_string(), "WSDHELPER determiner");
    /// ```
    pub fn disambiguate_span(
        &self,
        sentence: &[String],
        tags: &[String],
        lemmas: &[String],
        span: Range<usize>,
    ) -> Result<Vec<Disambiguation>> {
        self.run_span(sentence, tags, lemmas, span, false, &mut |_| {})
    }

    /// Span que cobre a sentença inteira.
    pub fn disambiguate_all(
        &self,
        sentence: &[String],
        tags: &[String],
        lemmas: &[String],
    ) -> Result<Vec<Disambiguation>> {
        self.disambiguate_span(sentence, tags, lemmas, 0..sentence.len())
    }

    /// Como [`WsdEngine::disambiguate_one`], mas sem lemas: o lema do alvo
    /// vem do lematizador dos recursos anexados (ou das regras embutidas).
    pub fn disambiguate_tagged(&self, sentence: &[String], tags: &[String], index: usize) -> Result<Disambiguation> {
        let strategy = self.strategy()?;
        let ctx = match &self.resources {
            Some(resources) => resources.context(sentence, tags, index)?,
            None => WordContext::new(sentence.to_vec(), tags.to_vec(), index)?,
        };
        resolve(strategy, &ctx)
    }

    /// Texto bruto: analisa com o pipeline linguístico e desambigua tudo.
    pub fn disambiguate_text(&self, text: &str) -> Result<Vec<(String, Disambiguation)>> {
        let resources = self.resources.as_ref().ok_or(WsdError::NotConfigured)?;
        let analyzed = resources.pipeline.analyze(text);
        let results = self.disambiguate_all(&analyzed.words, &analyzed.tags, &analyzed.lemmas)?;
        Ok(analyzed.words.into_iter().zip(results).collect())
    }

    /// Executa o span enviando eventos de progresso pelo canal `tx`.
    ///
    /// # Fluxo de Eventos
    /// 1. `ContextExtracted` e `CandidatesScored` para cada posição relevante
    /// 2. `SenseAssigned` para toda posição
    /// 3. `Done` com o resultado consolidado, ou `Error` se o span falhar
    pub fn disambiguate_streaming(
        &self,
        sentence: &[String],
        tags: &[String],
        lemmas: &[String],
        span: Range<usize>,
        tx: mpsc::Sender<WsdEvent>,
    ) {
        let start = Instant::now();
        let outcome = self.run_span(sentence, tags, lemmas, span, true, &mut |event| {
            let _ = tx.send(event);
        });

        let event = match outcome {
            Ok(results) => WsdEvent::Done {
                results,
                strategy: self.strategy_name().unwrap_or_default().to_string(),
                processing_ms: start.elapsed().as_millis() as u64,
            },
            Err(e) => WsdEvent::Error { message: e.to_string() },
        };
        let _ = tx.send(event);
    }

    fn run_span(
        &self,
        sentence: &[String],
        tags: &[String],
        lemmas: &[String],
        span: Range<usize>,
        verbose: bool,
        emit: &mut dyn FnMut(WsdEvent),
    ) -> Result<Vec<Disambiguation>> {
        let strategy = self.strategy()?;
        let sentence = Sentence::new(sentence, tags, lemmas)?;
        let len = sentence.words.len();
        if span.start > span.end || span.end > len {
            return Err(WsdError::InvalidSpan {
                start: span.start,
                end: span.end,
                len,
            });
        }

        let mut results = Vec::with_capacity(span.len());
        for index in span {
            let ctx = sentence.context(index)?;

            if verbose && ctx.category().is_relevant() {
                emit(WsdEvent::ContextExtracted {
                    index,
                    word: ctx.target_word().to_string(),
                    lemma: ctx.lemma().to_string(),
                    category: ctx.category().name().to_string(),
                    context: relevant_words(&ctx, ContextWindow::Sentence)
                        .into_iter()
                        .map(|w| w.word)
                        .collect(),
                });
                emit(WsdEvent::CandidatesScored {
                    index,
                    word: ctx.target_word().to_string(),
                    scores: strategy.score_candidates(&ctx)?,
                });
            }

            let result = resolve(strategy, &ctx)?;
            emit(WsdEvent::SenseAssigned {
                index,
                word: ctx.target_word().to_string(),
                result: result.clone(),
            });
            results.push(result);
        }
        Ok(results)
    }
}

/// Decide a saída de uma única posição.
fn resolve(strategy: &dyn Disambiguator, ctx: &WordContext) -> Result<Disambiguation> {
    if !ctx.category().is_relevant() {
        let tag = ctx.target_tag();
        let description = placeholder_for(tag)
            .map(String::from)
            .unwrap_or_else(|| tag.to_lowercase());
        return Ok(Disambiguation::Placeholder(description));
    }

    let result = match strategy.predict(ctx)? {
        Some(sense) => Disambiguation::Sense(sense),
        None => Disambiguation::Unknown,
    };
    debug!(word = ctx.target_word(), strategy = strategy.name(), %result, "posição resolvida");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::demo_resources;

    fn strings(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    fn lesk_engine() -> WsdEngine {
        WsdEngine::lesk(Arc::new(demo_resources()), LeskParameters::default())
    }

    #[test]
    fn test_placeholder_for_function_words() {
        let words = strings("the bank");
        let tags = strings("DT NN");
        let result = lesk_engine().disambiguate_one(&words, &tags, &words, 0).unwrap();
        assert_eq!(result, Disambiguation::Placeholder("determiner".into()));
        assert_eq!(result.to_string(), "WSDHELPER determiner");
    }

    #[test]
    fn test_unknown_when_no_candidate() {
        let words = strings("the zebra");
        let tags = strings("DT NN");
        let result = lesk_engine().disambiguate_one(&words, &tags, &words, 1).unwrap();
        assert_eq!(result.to_string(), "WSDHELPER unknown");
    }

    #[test]
    fn test_sense_is_tagged_with_origin() {
        let words = strings("the bank");
        let tags = strings("DT NN");
        let result = lesk_engine().disambiguate_one(&words, &tags, &words, 1).unwrap();
        assert_eq!(result.to_string(), "WORDNET bank%1:14:00::");
    }

    #[test]
    fn test_tagged_input_derives_lemma() {
        let words = strings("the banks");
        let tags = strings("DT NNS");
        let result = lesk_engine().disambiguate_tagged(&words, &tags, 1).unwrap();
        assert_eq!(result.sense().map(|s| s.key.lemma.as_str()), Some("bank"));

        let bare = WsdEngine::new(Box::new(LeskDisambiguator::new(
            LeskParameters::basic(),
            Arc::new(crate::inventory::MemoryInventory::demo()),
        )));
        let result = bare.disambiguate_tagged(&words, &tags, 1).unwrap();
        assert_eq!(result.to_string(), "WORDNET bank%1:14:00::");
    }

    #[test]
    fn test_unconfigured_engine() {
        let words = strings("the bank");
        let tags = strings("DT NN");
        let result = WsdEngine::unconfigured().disambiguate_one(&words, &tags, &words, 1);
        assert!(matches!(result, Err(WsdError::NotConfigured)));
    }

    #[test]
    fn test_lemma_length_mismatch() {
        let words = strings("the bank");
        let tags = strings("DT NN");
        let lemmas = strings("the");
        let result = lesk_engine().disambiguate_all(&words, &tags, &lemmas);
        assert!(matches!(result, Err(WsdError::LengthMismatch { what: "lemas", .. })));
    }

    #[test]
    fn test_invalid_span() {
        let words = strings("the bank");
        let tags = strings("DT NN");
        let engine = lesk_engine();
        #[allow(clippy::reversed_empty_ranges)]
        let reversed = engine.disambiguate_span(&words, &tags, &words, 2..1);
        assert!(matches!(reversed, Err(WsdError::InvalidSpan { .. })));
        let too_long = engine.disambiguate_span(&words, &tags, &words, 0..3);
        assert!(matches!(too_long, Err(WsdError::InvalidSpan { start: 0, end: 3, len: 2 })));
        assert!(engine.disambiguate_span(&words, &tags, &words, 1..1).unwrap().is_empty());
    }

    #[test]
    fn test_out_of_range_index() {
        let words = strings("the bank");
        let tags = strings("DT NN");
        let result = lesk_engine().disambiguate_one(&words, &tags, &words, 5);
        assert!(matches!(result, Err(WsdError::OutOfRange { index: 5, len: 2 })));
    }

    #[test]
    fn test_streaming_matches_sync() {
        let words = strings("the bank");
        let tags = strings("DT NN");
        let engine = lesk_engine();
        let (tx, rx) = mpsc::channel();
        engine.disambiguate_streaming(&words, &tags, &words, 0..2, tx);

        let events: Vec<WsdEvent> = rx.iter().collect();
        assert!(events.iter().any(|e| matches!(e, WsdEvent::CandidatesScored { index: 1, .. })));
        match events.last() {
            Some(WsdEvent::Done { results, strategy, .. }) => {
                assert_eq!(strategy, "lesk");
                assert_eq!(results, &engine.disambiguate_all(&words, &tags, &words).unwrap());
            }
            other => panic!("esperava Done, obtive {other:?}"),
        }
    }

    #[test]
    fn test_streaming_reports_error() {
        let words = strings("the bank");
        let tags = strings("DT NN");
        let (tx, rx) = mpsc::channel();
        WsdEngine::unconfigured().disambiguate_streaming(&words, &tags, &words, 0..2, tx);
        let events: Vec<WsdEvent> = rx.iter().collect();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], WsdEvent::Error { .. }));
    }

    #[test]
    fn test_disambiguate_text() {
        let results = lesk_engine().disambiguate_text("The bank raised its interest rates again.").unwrap();
        assert_eq!(results[0].1.to_string(), "WSDHELPER determiner");
        assert_eq!(results[1].0, "bank");
        assert!(results[1].1.sense().is_some());
    }
}
