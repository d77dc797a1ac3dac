//! # IMS: Classificador Supervisionado por Lema
//!
//! "It Makes Sense": um classificador independente para cada chave de palavra
//! (`please.v`, `bank.n`...), treinado sobre amostras anotadas com o sentido
//! correto. As features vêm de [`crate::features::supervised_features`].
//!
//! ## Modelo
//! Regressão logística multinomial (Máxima Entropia):
//!
//! $$ P(s|x) = \frac{\exp(\sum_i w_{i,s} \cdot f_i(x))}{Z(x)} $$
//!
//! ## Treinamento
//! SGD com regularização L2. A ordem das amostras é embaralhada a cada época
//! por um `ChaCha8Rng` com semente fixa, então o mesmo corpus e os mesmos
//! parâmetros produzem exatamente os mesmos pesos.
//!
//! ## Persistência
//! Um modelo treinado é imutável e serializável em JSON. O cabeçalho
//! `(lemma, category)` identifica para qual chave de palavra ele vale.

use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::context::{GoldStatus, WordContext};
use crate::corpus::CorpusReader;
use crate::disambiguator::Disambiguator;
use crate::error::{Result, WsdError};
use crate::features::{supervised_features, FeatureTemplate, FeatureVector};
use crate::inventory::SenseInventory;
use crate::lexical::{split_word_key, LexicalCategory};
use crate::sense::{rank, ScoredSense, SenseKey, SenseOrigin, TaggedSense};

/// Parâmetros de extração e de treino.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImsParameters {
    pub features: FeatureTemplate,
    /// Número de épocas (passadas completas pelas amostras).
    pub iterations: usize,
    /// Taxa de aprendizado (η).
    pub learning_rate: f64,
    /// Fator de regularização L2 (λ).
    pub lambda: f64,
    /// Semente do embaralhamento.
    pub seed: u64,
}

impl Default for ImsParameters {
    fn default() -> Self {
        Self {
            features: FeatureTemplate::default(),
            iterations: 30,
            learning_rate: 0.1,
            lambda: 0.001,
            seed: 42,
        }
    }
}

/// Modelo treinado para uma chave de palavra.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImsModel {
    lemma: String,
    category: LexicalCategory,
    /// Sentidos possíveis, em ordem crescente de chave.
    labels: Vec<SenseKey>,
    /// Peso de cada feature para cada rótulo (mesma ordem de `labels`).
    weights: HashMap<String, Vec<f64>>,
    params: ImsParameters,
    /// Acurácia na última época de treino.
    training_accuracy: f64,
}

impl ImsModel {
    /// Modelo 0-ário de um lema com um único sentido: sempre prediz `sense`.
    pub fn monosemous(sense: SenseKey, params: ImsParameters) -> Self {
        Self {
            lemma: sense.lemma.clone(),
            category: sense.category,
            labels: vec![sense],
            weights: HashMap::new(),
            params,
            training_accuracy: 1.0,
        }
    }

    pub fn lemma(&self) -> &str {
        &self.lemma
    }

    pub fn category(&self) -> LexicalCategory {
        self.category
    }

    pub fn labels(&self) -> &[SenseKey] {
        &self.labels
    }

    pub fn params(&self) -> &ImsParameters {
        &self.params
    }

    pub fn training_accuracy(&self) -> f64 {
        self.training_accuracy
    }

    pub fn is_monosemous(&self) -> bool {
        self.labels.len() == 1
    }

    /// Chave de palavra do modelo (ex: `please.v`).
    pub fn word_key(&self) -> String {
        format!("{}{}", self.lemma, self.category.suffix())
    }

    fn check_lemma(&self, ctx: &WordContext) -> Result<()> {
        let found = ctx.raw_word_key();
        if found != self.word_key() {
            return Err(WsdError::LemmaMismatch {
                expected: self.word_key(),
                found,
            });
        }
        Ok(())
    }

    fn raw_scores(&self, fv: &FeatureVector) -> Vec<f64> {
        let mut scores = vec![0.0; self.labels.len()];
        for (name, value) in &fv.features {
            if let Some(w) = self.weights.get(name) {
                for (score, weight) in scores.iter_mut().zip(w) {
                    *score += weight * value;
                }
            }
        }
        scores
    }

    /// Probabilidade de cada sentido, do mais para o menos provável.
    pub fn scores(&self, ctx: &WordContext) -> Result<Vec<ScoredSense>> {
        self.check_lemma(ctx)?;
        let fv = supervised_features(ctx, &self.lemma, &self.params.features);
        let probs = softmax(&self.raw_scores(&fv));

        let mut scored: Vec<ScoredSense> = self
            .labels
            .iter()
            .zip(probs)
            .map(|(key, score)| ScoredSense { key: key.clone(), score })
            .collect();
        rank(&mut scored);
        Ok(scored)
    }

    /// Sentido mais provável do alvo de `ctx`.
    ///
    /// # Erros
    /// [`WsdError::LemmaMismatch`] se o alvo não é a chave de palavra do modelo.
    pub fn predict(&self, ctx: &WordContext) -> Result<SenseKey> {
        self.check_lemma(ctx)?;
        if self.is_monosemous() {
            return Ok(self.labels[0].clone());
        }
        let fv = supervised_features(ctx, &self.lemma, &self.params.features);
        let best = argmax(&self.raw_scores(&fv));
        Ok(self.labels[best].clone())
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Lê um modelo persistido e confere sua consistência.
    ///
    /// # Erros
    /// [`WsdError::InsufficientData`] se o artefato não tem rótulos ou se
    /// algum vetor de pesos não tem um peso por rótulo.
    pub fn read_json(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let model: Self = serde_json::from_reader(reader)?;
        model.check_shape()?;
        Ok(model)
    }

    fn check_shape(&self) -> Result<()> {
        let invalid = |reason: String| WsdError::InsufficientData {
            word: self.word_key(),
            reason,
        };
        if self.labels.is_empty() {
            return Err(invalid("modelo sem rótulos".into()));
        }
        if let Some((feature, w)) = self.weights.iter().find(|(_, w)| w.len() != self.labels.len()) {
            return Err(invalid(format!(
                "feature {feature} tem {} pesos para {} rótulos",
                w.len(),
                self.labels.len()
            )));
        }
        Ok(())
    }
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.iter().map(|e| e / sum).collect()
}

/// Índice do maior valor; o primeiro vence empates.
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

/// Treinador de modelos IMS.
pub struct ImsTrainer;

impl ImsTrainer {
    /// Treina um modelo a partir de amostras de uma única chave de palavra.
    ///
    /// Amostras sem rótulo (`"null"`) ou não resolvidas (`"U"`) são ignoradas;
    /// amostras com vários rótulos treinam com o primeiro.
    ///
    /// # Erros
    /// - [`WsdError::InsufficientData`] sem amostras rotuladas ou com menos de
    ///   dois sentidos distintos
    /// - [`WsdError::LemmaMismatch`] se as amostras misturam chaves de palavra
    pub fn train(samples: &[WordContext], params: &ImsParameters) -> Result<ImsModel> {
        let first = samples.first().ok_or_else(|| WsdError::InsufficientData {
            word: String::new(),
            reason: "nenhuma amostra".into(),
        })?;
        let word_key = first.raw_word_key();

        // === Passo 1: rótulos e vetores de features ===
        let mut labeled: Vec<(FeatureVector, SenseKey)> = Vec::new();
        for sample in samples {
            let found = sample.raw_word_key();
            if found != word_key {
                return Err(WsdError::LemmaMismatch {
                    expected: word_key,
                    found,
                });
            }
            if let GoldStatus::Labeled(keys) = sample.gold_status() {
                let fv = supervised_features(sample, sample.lemma(), &params.features);
                labeled.push((fv, keys[0].clone()));
            }
        }

        if labeled.is_empty() {
            return Err(WsdError::InsufficientData {
                word: word_key,
                reason: "nenhuma amostra rotulada".into(),
            });
        }

        let labels: Vec<SenseKey> = labeled
            .iter()
            .map(|(_, k)| k.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if labels.len() < 2 {
            return Err(WsdError::InsufficientData {
                word: word_key,
                reason: format!("apenas um sentido observado ({})", labels[0]),
            });
        }
        let gold: Vec<usize> = labeled
            .iter()
            .filter_map(|(_, k)| labels.iter().position(|l| l == k))
            .collect();

        // === Passo 2: SGD ===
        let n_labels = labels.len();
        let mut weights: HashMap<String, Vec<f64>> = HashMap::new();
        let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
        let mut order: Vec<usize> = (0..labeled.len()).collect();
        let mut accuracy = 0.0;

        for epoch in 0..params.iterations {
            order.shuffle(&mut rng);
            let mut correct = 0;

            for &i in &order {
                let fv = &labeled[i].0;
                let truth = gold[i];

                let mut scores = vec![0.0; n_labels];
                for (name, value) in &fv.features {
                    if let Some(w) = weights.get(name) {
                        for (score, weight) in scores.iter_mut().zip(w) {
                            *score += weight * value;
                        }
                    }
                }
                if argmax(&scores) == truth {
                    correct += 1;
                }
                let probs = softmax(&scores);

                // w = w + η · ((indicador - prob) · f - λ · w)
                for (name, value) in &fv.features {
                    let w = weights.entry(name.clone()).or_insert_with(|| vec![0.0; n_labels]);
                    for (label, prob) in probs.iter().enumerate() {
                        let indicator = if label == truth { 1.0 } else { 0.0 };
                        let error = indicator - prob;
                        w[label] += params.learning_rate * (error * value - params.lambda * w[label]);
                    }
                }
            }

            accuracy = correct as f64 / labeled.len() as f64;
            if epoch % 10 == 0 {
                debug!(word = %word_key, epoch, accuracy, "época de treino");
            }
        }

        info!(
            word = %word_key,
            samples = labeled.len(),
            senses = n_labels,
            features = weights.len(),
            accuracy,
            "modelo IMS treinado"
        );

        Ok(ImsModel {
            lemma: first.lemma().to_string(),
            category: first.category(),
            labels,
            weights,
            params: *params,
            training_accuracy: accuracy,
        })
    }

    /// Treina consultando o inventário: um lema com um único sentido vira um
    /// modelo 0-ário, sem olhar as amostras.
    pub fn train_for_lemma(
        lemma: &str,
        category: LexicalCategory,
        samples: &[WordContext],
        inventory: &dyn SenseInventory,
        params: &ImsParameters,
    ) -> Result<ImsModel> {
        let senses = inventory.lookup_senses(lemma, category)?;
        if let [only] = senses.as_slice() {
            debug!(lemma, "lema monossêmico");
            return Ok(ImsModel::monosemous(only.key.clone(), *params));
        }
        Self::train(samples, params)
    }

    /// Treina um modelo por chave de palavra do corpus, em paralelo.
    ///
    /// Chaves sem dados suficientes são registradas com `warn!` e puladas.
    pub fn train_all(
        corpus: &dyn CorpusReader,
        inventory: &dyn SenseInventory,
        params: &ImsParameters,
    ) -> ImsModelSet {
        let models: Vec<ImsModel> = corpus
            .words()
            .par_iter()
            .filter_map(|word_key| {
                let (lemma, category) = split_word_key(word_key)?;
                let samples = corpus.samples(word_key);
                match Self::train_for_lemma(lemma, category, &samples, inventory, params) {
                    Ok(model) => Some(model),
                    Err(e) => {
                        warn!(word = %word_key, error = %e, "modelo não treinado");
                        None
                    }
                }
            })
            .collect();

        let mut set = ImsModelSet::new();
        for model in models {
            set.insert(model);
        }
        set
    }
}

/// Modelos indexados por chave de palavra.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImsModelSet {
    models: HashMap<String, ImsModel>,
}

impl ImsModelSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, model: ImsModel) {
        self.models.insert(model.word_key(), model);
    }

    pub fn get(&self, word_key: &str) -> Option<&ImsModel> {
        self.models.get(word_key)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Chaves de palavra cobertas, em ordem alfabética.
    pub fn words(&self) -> Vec<&str> {
        let mut words: Vec<&str> = self.models.keys().map(String::as_str).collect();
        words.sort();
        words
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    pub fn read_json(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let set: Self = serde_json::from_reader(reader)?;
        for model in set.models.values() {
            model.check_shape()?;
        }
        Ok(set)
    }
}

/// Estratégia supervisionada com fallback para o sentido mais frequente.
pub struct ImsDisambiguator {
    models: ImsModelSet,
    inventory: Arc<dyn SenseInventory>,
}

impl ImsDisambiguator {
    pub fn new(models: ImsModelSet, inventory: Arc<dyn SenseInventory>) -> Self {
        Self { models, inventory }
    }

    pub fn models(&self) -> &ImsModelSet {
        &self.models
    }

    /// Candidatos do inventário com scores decrescentes na ordem de frequência.
    fn most_frequent_sense(&self, ctx: &WordContext) -> Vec<ScoredSense> {
        match self.inventory.lookup_senses(ctx.lemma(), ctx.category()) {
            Ok(senses) => senses
                .into_iter()
                .enumerate()
                .map(|(i, s)| ScoredSense {
                    key: s.key,
                    score: 1.0 / (i + 1) as f64,
                })
                .collect(),
            Err(e) => {
                warn!(word = %ctx.raw_word_key(), error = %e, "inventário indisponível");
                Vec::new()
            }
        }
    }
}

impl Disambiguator for ImsDisambiguator {
    fn name(&self) -> &'static str {
        "ims"
    }

    fn origin(&self) -> SenseOrigin {
        SenseOrigin::Ims
    }

    fn score_candidates(&self, ctx: &WordContext) -> Result<Vec<ScoredSense>> {
        if !ctx.category().is_relevant() {
            return Ok(Vec::new());
        }
        match self.models.get(&ctx.raw_word_key()) {
            Some(model) => model.scores(ctx),
            None => Ok(self.most_frequent_sense(ctx)),
        }
    }

    fn predict(&self, ctx: &WordContext) -> Result<Option<TaggedSense>> {
        if !ctx.category().is_relevant() {
            return Ok(None);
        }
        if let Some(model) = self.models.get(&ctx.raw_word_key()) {
            let key = model.predict(ctx)?;
            return Ok(Some(TaggedSense {
                origin: SenseOrigin::Ims,
                key,
            }));
        }
        debug!(word = %ctx.raw_word_key(), "sem modelo, usando sentido mais frequente");
        Ok(self.most_frequent_sense(ctx).into_iter().next().map(|s| TaggedSense {
            origin: self.inventory.origin(),
            key: s.key,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::StaticCorpus;
    use crate::inventory::MemoryInventory;

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
        .with_lemma("please")
    }

    fn please_model() -> ImsModel {
        let samples = StaticCorpus::new().samples("please.v");
        ImsTrainer::train(&samples, &ImsParameters::default()).unwrap()
    }

    #[test]
    fn test_train_and_predict() {
        let model = please_model();
        assert_eq!(model.word_key(), "please.v");
        assert_eq!(model.labels().len(), 3);

        let predicted = model.predict(&please_context()).unwrap();
        assert_eq!(predicted.lemma, "please");
        assert_eq!(predicted.category, LexicalCategory::Verb);
        assert!(model.labels().contains(&predicted));
    }

    #[test]
    fn test_training_is_deterministic() {
        let a = please_model();
        let b = please_model();
        let ctx = please_context();
        assert_eq!(a.scores(&ctx).unwrap(), b.scores(&ctx).unwrap());
    }

    #[test]
    fn test_scores_are_probabilities() {
        let scored = please_model().scores(&please_context()).unwrap();
        let total: f64 = scored.iter().map(|s| s.score).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(scored.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_lemma_mismatch() {
        let model = please_model();
        let ctx = WordContext::new(strings("the bank"), strings("DT NN"), 1).unwrap();
        assert!(matches!(model.predict(&ctx), Err(WsdError::LemmaMismatch { .. })));
    }

    #[test]
    fn test_single_label_is_insufficient() {
        let samples: Vec<WordContext> = StaticCorpus::new()
            .samples("please.v")
            .into_iter()
            .filter(|s| s.gold_sense_ids() == ["please%2:42:00::"])
            .collect();
        let result = ImsTrainer::train(&samples, &ImsParameters::default());
        assert!(matches!(result, Err(WsdError::InsufficientData { .. })));
    }

    #[test]
    fn test_empty_samples_are_insufficient() {
        let result = ImsTrainer::train(&[], &ImsParameters::default());
        assert!(matches!(result, Err(WsdError::InsufficientData { .. })));
    }

    #[test]
    fn test_mixed_lemmas_rejected() {
        let corpus = StaticCorpus::new();
        let mut samples = corpus.samples("please.v");
        samples.extend(corpus.samples("bank.n"));
        let result = ImsTrainer::train(&samples, &ImsParameters::default());
        assert!(matches!(result, Err(WsdError::LemmaMismatch { .. })));
    }

    #[test]
    fn test_monosemous_lemma() {
        let inventory = MemoryInventory::demo();
        let model = ImsTrainer::train_for_lemma(
            "radioactive",
            LexicalCategory::Adjective,
            &[],
            &inventory,
            &ImsParameters::default(),
        )
        .unwrap();
        assert!(model.is_monosemous());

        let ctx = WordContext::new(strings("highly radioactive water"), strings("RB JJ NN"), 1).unwrap();
        assert_eq!(model.predict(&ctx).unwrap().to_string(), "radioactive%3:00:00::");
    }

    #[test]
    fn test_train_all_covers_corpus() {
        let set = ImsTrainer::train_all(&StaticCorpus::new(), &MemoryInventory::demo(), &ImsParameters::default());
        assert_eq!(set.words(), vec!["bank.n", "plant.n", "please.v"]);
    }

    #[test]
    fn test_model_persistence() {
        let model = please_model();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("please.v.json");
        model.write_json(&path).unwrap();

        let restored = ImsModel::read_json(&path).unwrap();
        assert_eq!(restored.word_key(), "please.v");
        let ctx = please_context();
        assert_eq!(restored.predict(&ctx).unwrap(), model.predict(&ctx).unwrap());
    }

    #[test]
    fn test_corrupt_artifact_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("please.v.json");
        let mut model: serde_json::Value = serde_json::to_value(please_model()).unwrap();

        model["labels"] = serde_json::json!([]);
        std::fs::write(&path, model.to_string()).unwrap();
        assert!(matches!(ImsModel::read_json(&path), Err(WsdError::InsufficientData { .. })));

        let mut short = serde_json::to_value(please_model()).unwrap();
        short["weights"]["bias"] = serde_json::json!([0.5]);
        std::fs::write(&path, short.to_string()).unwrap();
        assert!(matches!(ImsModel::read_json(&path), Err(WsdError::InsufficientData { .. })));

        let mut set = serde_json::json!({ "models": { "please.v": please_model() } });
        set["models"]["please.v"]["labels"] = serde_json::json!([]);
        std::fs::write(&path, set.to_string()).unwrap();
        assert!(matches!(ImsModelSet::read_json(&path), Err(WsdError::InsufficientData { .. })));
    }

    #[test]
    fn test_fallback_to_most_frequent_sense() {
        let inventory: Arc<dyn SenseInventory> = Arc::new(MemoryInventory::demo());
        let ims = ImsDisambiguator::new(ImsModelSet::new(), inventory);
        let ctx = WordContext::new(strings("the bank"), strings("DT NN"), 1).unwrap();
        let sense = ims.predict(&ctx).unwrap().unwrap();
        assert_eq!(sense.to_string(), "WORDNET bank%1:14:00::");
    }
}
