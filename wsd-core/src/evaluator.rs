//! # Avaliação
//!
//! Mede a acurácia de uma estratégia contra um corpus anotado.
//!
//! Para cada amostra:
//! 1. Amostras sem rótulo (`"null"`, vazio) ou não resolvidas (`"U"`) são puladas.
//! 2. O motor desambigua o alvo.
//! 3. A predição está correta se coincide com **qualquer** um dos rótulos.
//!
//! Os contadores `correct`/`total` são mantidos por chave de palavra e no
//! agregado:
//!
//! $$ \text{acurácia} = \frac{\text{correct}}{\text{total}} $$
//!
//! Sem nenhuma amostra avaliada a acurácia é indefinida (`None`), não zero.
//!
//! Na avaliação paralela cada worker do rayon acumula seus próprios
//! contadores, que são somados no final por um único dono.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::context::{GoldStatus, WordContext};
use crate::corpus::CorpusReader;
use crate::disambiguator::WsdEngine;
use crate::error::{Result, WsdError};

/// Par de contadores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub correct: usize,
    pub total: usize,
}

impl Tally {
    fn record(&mut self, matched: bool) {
        self.total += 1;
        if matched {
            self.correct += 1;
        }
    }

    fn merge(&mut self, other: Tally) {
        self.correct += other.correct;
        self.total += other.total;
    }

    /// `None` quando nada foi avaliado.
    pub fn accuracy(&self) -> Option<f64> {
        (self.total > 0).then(|| self.correct as f64 / self.total as f64)
    }
}

/// Contadores por chave de palavra e no agregado.
#[derive(Debug, Clone, Default)]
pub struct Accumulator {
    per_lemma: BTreeMap<String, Tally>,
    overall: Tally,
}

impl Accumulator {
    pub fn record(&mut self, word_key: &str, matched: bool) {
        self.per_lemma.entry(word_key.to_string()).or_default().record(matched);
        self.overall.record(matched);
    }

    pub fn merge(&mut self, other: Accumulator) {
        for (word, tally) in other.per_lemma {
            self.per_lemma.entry(word).or_default().merge(tally);
        }
        self.overall.merge(other.overall);
    }

    pub fn overall(&self) -> Tally {
        self.overall
    }

    pub fn lemma(&self, word_key: &str) -> Tally {
        self.per_lemma.get(word_key).copied().unwrap_or_default()
    }
}

/// Linha do relatório.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
    pub accuracy: Option<f64>,
}

impl From<Tally> for Score {
    fn from(t: Tally) -> Self {
        Self {
            correct: t.correct,
            total: t.total,
            accuracy: t.accuracy(),
        }
    }
}

/// Relatório final, pronto para JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub strategy: String,
    pub overall: Score,
    pub per_lemma: BTreeMap<String, Score>,
}

/// Avaliador ligado a um motor configurado.
pub struct Evaluator<'a> {
    engine: &'a WsdEngine,
    accumulator: Accumulator,
}

impl<'a> Evaluator<'a> {
    pub fn new(engine: &'a WsdEngine) -> Self {
        Self {
            engine,
            accumulator: Accumulator::default(),
        }
    }

    pub fn accumulator(&self) -> &Accumulator {
        &self.accumulator
    }

    /// Avalia uma amostra.
    ///
    /// Retorna `Some(acertou)` quando a amostra foi contada e `None` quando
    /// foi pulada por falta de rótulo utilizável.
    pub fn evaluate_sample(&mut self, sample: &WordContext) -> Result<Option<bool>> {
        let outcome = judge(self.engine, sample)?;
        if let Some((word_key, matched)) = &outcome {
            self.accumulator.record(word_key, *matched);
        }
        Ok(outcome.map(|(_, matched)| matched))
    }

    /// Avalia as amostras em paralelo e soma o resultado aos contadores.
    ///
    /// Se alguma amostra falhar, nada é somado.
    pub fn evaluate_parallel(&mut self, samples: &[WordContext]) -> Result<()> {
        let engine = self.engine;
        let partial = samples
            .par_iter()
            .try_fold(Accumulator::default, |mut acc, sample| {
                if let Some((word_key, matched)) = judge(engine, sample)? {
                    acc.record(&word_key, matched);
                }
                Ok::<_, WsdError>(acc)
            })
            .try_reduce(Accumulator::default, |mut a, b| {
                a.merge(b);
                Ok(a)
            })?;
        self.accumulator.merge(partial);
        Ok(())
    }

    /// Avalia todas as amostras de todas as palavras do corpus.
    pub fn evaluate_corpus(&mut self, corpus: &dyn CorpusReader) -> Result<()> {
        let samples: Vec<WordContext> = corpus.words().iter().flat_map(|w| corpus.samples(w)).collect();
        self.evaluate_parallel(&samples)
    }

    pub fn report(&self) -> EvaluationReport {
        let report = EvaluationReport {
            strategy: self.engine.strategy_name().unwrap_or_default().to_string(),
            overall: self.accumulator.overall.into(),
            per_lemma: self
                .accumulator
                .per_lemma
                .iter()
                .map(|(word, tally)| (word.clone(), (*tally).into()))
                .collect(),
        };
        info!(
            strategy = %report.strategy,
            correct = report.overall.correct,
            total = report.overall.total,
            accuracy = ?report.overall.accuracy,
            "avaliação concluída"
        );
        report
    }
}

/// Desambigua uma amostra e compara com os rótulos: `(chave de palavra, acertou)`.
fn judge(engine: &WsdEngine, sample: &WordContext) -> Result<Option<(String, bool)>> {
    let gold = match sample.gold_status() {
        GoldStatus::Labeled(keys) => keys,
        GoldStatus::Absent | GoldStatus::Unresolved => {
            debug!(word = %sample.raw_word_key(), "amostra sem rótulo utilizável");
            return Ok(None);
        }
    };

    let result = engine.disambiguate_context(sample)?;
    let matched = result.sense().is_some_and(|s| gold.contains(&s.key));
    Ok(Some((sample.raw_word_key(), matched)))
}
