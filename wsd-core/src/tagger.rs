//! # Etiquetador Morfossintático (HMM)
//!
//! HMM clássico de primeira ordem onde:
//! - **Estados Ocultos**: tags Penn Treebank (NN, VBD, DT...)
//! - **Observações**: tokens
//!
//! O modelo aprende:
//! 1. Probabilidade de Transição: P(tag_atual | tag_anterior)
//! 2. Probabilidade de Emissão: P(palavra | tag)
//! 3. Probabilidade Inicial: P(tag_inicial)
//!
//! A decodificação é feita via algoritmo de Viterbi.
//!
//! ## Palavras Desconhecidas
//! Uma palavra fora do vocabulário é substituída pela sua *assinatura* de forma
//! (`<UNK-ing>`, `<UNK-ly>`, `<UNK-cap>`...). As emissões das assinaturas são
//! estimadas a partir das palavras raras do corpus, então "quickly" tende a RB e
//! "walking" a VBG mesmo sem nunca terem sido vistas.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::corpus::SenseAnnotatedSentence;
use crate::linguistic::PosTagger;

/// Frequência máxima para uma palavra contribuir com sua assinatura.
const RARE_THRESHOLD: u32 = 1;

/// Modelo HMM treinado.
///
/// As probabilidades são armazenadas em **log-space** para evitar underflow
/// ao multiplicar muitas probabilidades pequenas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HmmTagger {
    /// P(y_i | y_{i-1}) em log-space, indexado por `[prev][curr]`.
    transition: Vec<Vec<f64>>,
    /// P(x_i | y_i) em log-space. Chave: palavra ou assinatura; valor por tag.
    emission: HashMap<String, Vec<f64>>,
    /// Emissão de uma observação nunca vista (nem como assinatura).
    unseen: Vec<f64>,
    /// P(y_0) em log-space.
    start: Vec<f64>,
    /// Lista ordenada de todas as tags conhecidas.
    tags: Vec<String>,
    vocab: HashSet<String>,
}

/// Assinatura de forma de uma palavra desconhecida.
fn signature(word: &str) -> &'static str {
    let lower = word.to_lowercase();
    if word.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') && word.chars().any(|c| c.is_ascii_digit()) {
        "<UNK-num>"
    } else if lower.ends_with("ing") {
        "<UNK-ing>"
    } else if lower.ends_with("ed") {
        "<UNK-ed>"
    } else if lower.ends_with("ly") {
        "<UNK-ly>"
    } else if word.chars().next().is_some_and(char::is_uppercase) {
        "<UNK-cap>"
    } else if lower.ends_with('s') {
        "<UNK-s>"
    } else if !word.chars().any(char::is_alphanumeric) {
        "<UNK-punct>"
    } else {
        "<UNK>"
    }
}

impl HmmTagger {
    /// Treina o HMM com o corpus fornecido.
    ///
    /// # Processo de Treinamento
    /// 1. **Contagem** de tags, transições, emissões e assinaturas das palavras raras.
    /// 2. **Smoothing** Add-1 (Laplace), para que nenhuma probabilidade seja zero.
    /// 3. **Log-Probabilidades**, para estabilidade numérica.
    pub fn train(corpus: &[SenseAnnotatedSentence]) -> Self {
        let mut word_counts: HashMap<&str, u32> = HashMap::new();
        for sentence in corpus {
            for (word, _, _) in sentence.tokens {
                *word_counts.entry(*word).or_insert(0) += 1;
            }
        }

        let mut tags: Vec<String> = corpus
            .iter()
            .flat_map(|s| s.tokens.iter().map(|(_, t, _)| t.to_string()))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        tags.sort(); // Garante ordem determinística
        let tag_index: HashMap<&str, usize> = tags.iter().enumerate().map(|(i, t)| (t.as_str(), i)).collect();
        let n = tags.len();

        let mut tag_counts = vec![0u32; n];
        let mut start_counts = vec![0u32; n];
        let mut transition_counts = vec![vec![0u32; n]; n];
        let mut emission_counts: HashMap<String, Vec<u32>> = HashMap::new();

        // === Passo 1: contagem ===
        for sentence in corpus {
            let mut prev: Option<usize> = None;
            for (i, (word, tag, _)) in sentence.tokens.iter().enumerate() {
                let Some(&t) = tag_index.get(tag) else { continue };
                tag_counts[t] += 1;
                emission_counts.entry(word.to_string()).or_insert_with(|| vec![0; n])[t] += 1;

                if word_counts.get(word).copied().unwrap_or(0) <= RARE_THRESHOLD {
                    emission_counts.entry(signature(word).to_string()).or_insert_with(|| vec![0; n])[t] += 1;
                }

                if i == 0 {
                    start_counts[t] += 1;
                } else if let Some(p) = prev {
                    transition_counts[p][t] += 1;
                }
                prev = Some(t);
            }
        }

        // === Passo 2: normalização com Add-1 ===
        let num_tags = n as f64;
        let observations = emission_counts.len() as f64;
        let total_starts = corpus.len() as f64;

        let start = start_counts
            .iter()
            .map(|&c| ((c as f64 + 1.0) / (total_starts + num_tags)).ln())
            .collect();

        let transition = (0..n)
            .map(|p| {
                let prev_total = tag_counts[p] as f64;
                (0..n)
                    .map(|c| ((transition_counts[p][c] as f64 + 1.0) / (prev_total + num_tags)).ln())
                    .collect()
            })
            .collect();

        let emission = emission_counts
            .into_iter()
            .map(|(obs, counts)| {
                let probs = counts
                    .iter()
                    .enumerate()
                    .map(|(t, &c)| ((c as f64 + 1.0) / (tag_counts[t] as f64 + observations + 1.0)).ln())
                    .collect();
                (obs, probs)
            })
            .collect();

        let unseen = tag_counts
            .iter()
            .map(|&c| (1.0 / (c as f64 + observations + 1.0)).ln())
            .collect();

        debug!(tags = n, vocab = word_counts.len(), "HMM treinado");

        Self {
            transition,
            emission,
            unseen,
            start,
            tags,
            vocab: word_counts.keys().map(|w| w.to_string()).collect(),
        }
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Emissões para um token: forma exata, forma minúscula ou assinatura.
    fn emissions(&self, token: &str) -> &[f64] {
        if self.vocab.contains(token) {
            if let Some(e) = self.emission.get(token) {
                return e;
            }
        }
        let lower = token.to_lowercase();
        if let Some(e) = self.emission.get(&lower) {
            return e;
        }
        self.emission.get(signature(token)).unwrap_or(&self.unseen)
    }

    /// Decodifica a melhor sequência de tags com o **Algoritmo de Viterbi**.
    ///
    /// Complexidade O(N·T²), com N tokens e T tags.
    pub fn predict(&self, tokens: &[String]) -> Vec<String> {
        let n_tags = self.tags.len();
        if tokens.is_empty() || n_tags == 0 {
            return Vec::new();
        }
        let n_tokens = tokens.len();

        // viterbi[t][s] = log-prob do melhor caminho terminando em t no estado s
        let mut viterbi = vec![vec![f64::NEG_INFINITY; n_tags]; n_tokens];
        let mut backptr = vec![vec![0usize; n_tags]; n_tokens];

        // 1. Inicialização (t=0)
        let emit = self.emissions(&tokens[0]);
        for s in 0..n_tags {
            viterbi[0][s] = self.start[s] + emit[s];
        }

        // 2. Recursão (t=1..N)
        for t in 1..n_tokens {
            let emit = self.emissions(&tokens[t]);
            for s in 0..n_tags {
                let mut best_prob = f64::NEG_INFINITY;
                let mut best_prev = 0;
                for prev in 0..n_tags {
                    let prob = viterbi[t - 1][prev] + self.transition[prev][s];
                    if prob > best_prob {
                        best_prob = prob;
                        best_prev = prev;
                    }
                }
                viterbi[t][s] = best_prob + emit[s];
                backptr[t][s] = best_prev;
            }
        }

        // 3. Terminação
        let mut curr = 0;
        for s in 1..n_tags {
            if viterbi[n_tokens - 1][s] > viterbi[n_tokens - 1][curr] {
                curr = s;
            }
        }

        // 4. Backtracking
        let mut path = vec![String::new(); n_tokens];
        path[n_tokens - 1] = self.tags[curr].clone();
        for t in (1..n_tokens).rev() {
            curr = backptr[t][curr];
            path[t - 1] = self.tags[curr].clone();
        }
        path
    }
}

impl PosTagger for HmmTagger {
    fn tag(&self, tokens: &[String]) -> Vec<String> {
        self.predict(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::get_corpus;

    fn words(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn test_tags_known_sentence() {
        let tagger = HmmTagger::train(&get_corpus());
        let tags = tagger.predict(&words("The bank raised its interest rates again ."));
        assert_eq!(tags[0], "DT");
        assert_eq!(tags[1], "NN");
        assert_eq!(tags[7], ".");
    }

    #[test]
    fn test_training_accuracy() {
        let corpus = get_corpus();
        let tagger = HmmTagger::train(&corpus);
        let (mut correct, mut total) = (0, 0);
        for sentence in &corpus {
            let predicted = tagger.predict(&sentence.words());
            for (p, g) in predicted.iter().zip(sentence.tags()) {
                correct += usize::from(*p == g);
                total += 1;
            }
        }
        assert!(correct as f64 / total as f64 > 0.8, "{correct}/{total}");
    }

    #[test]
    fn test_unknown_words_do_not_panic() {
        let tagger = HmmTagger::train(&get_corpus());
        let tags = tagger.predict(&words("Zorblax quickly frobnicated the gizmos"));
        assert_eq!(tags.len(), 5);
        assert_eq!(tags[3], "DT");
    }

    #[test]
    fn test_empty_input() {
        let tagger = HmmTagger::train(&get_corpus());
        assert!(tagger.predict(&[]).is_empty());
    }

    #[test]
    fn test_signature() {
        assert_eq!(signature("walking"), "<UNK-ing>");
        assert_eq!(signature("quickly"), "<UNK-ly>");
        assert_eq!(signature("2024"), "<UNK-num>");
        assert_eq!(signature("Paris"), "<UNK-cap>");
    }
}
