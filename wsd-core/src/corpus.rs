//! # Corpus Anotado com Sentidos
//!
//! Pequeno corpus em inglês no estilo SemCor: cada token traz sua tag Penn e
//! seu lema, e algumas posições (os alvos) trazem o sentido de referência.
//! Serve para treinar o classificador supervisionado, para avaliar as
//! estratégias e para treinar o etiquetador HMM padrão.
//!
//! ## Lemas Cobertos
//! - `please.v`: agradar / ser a vontade de / satisfazer
//! - `bank.n`: instituição financeira / margem de rio
//! - `plant.n`: organismo vegetal / instalação industrial
//!
//! ## Convenção de Rótulos
//! Como nos corpora de origem, o campo de sentido pode conter os marcadores
//! `"null"` (sem rótulo) e `"U"` (rótulo deliberadamente não resolvido).
//! O avaliador ignora as duas formas.

use std::collections::BTreeSet;

use crate::context::WordContext;
use crate::lexical::category_of;

/// Uma sentença anotada.
pub struct SenseAnnotatedSentence {
    /// Texto original da sentença.
    pub text: &'static str,
    /// Domínio temático (para análises por área).
    pub domain: &'static str,
    /// Triplas `(palavra, tag Penn, lema)`.
    pub tokens: &'static [(&'static str, &'static str, &'static str)],
    /// Pares `(índice do alvo, sentido de referência)`.
    pub targets: &'static [(usize, &'static str)],
}

impl SenseAnnotatedSentence {
    pub fn words(&self) -> Vec<String> {
        self.tokens.iter().map(|(w, _, _)| w.to_string()).collect()
    }

    pub fn tags(&self) -> Vec<String> {
        self.tokens.iter().map(|(_, t, _)| t.to_string()).collect()
    }

    pub fn lemmas(&self) -> Vec<String> {
        self.tokens.iter().map(|(_, _, l)| l.to_string()).collect()
    }

    /// Chave `lema.sufixo` do token na posição `index`.
    fn word_key_at(&self, index: usize) -> String {
        let (_, tag, lemma) = self.tokens[index];
        format!("{}{}", lemma, category_of(tag).suffix())
    }
}

/// Leitor de corpus: entrega amostras rotuladas por chave de palavra.
///
/// Uma chave desconhecida produz uma lista vazia, nunca um erro.
pub trait CorpusReader: Send + Sync {
    /// Chaves de palavra (`lema.sufixo`) que possuem ao menos uma amostra.
    fn words(&self) -> Vec<String>;

    /// Amostras da chave, na ordem do corpus.
    fn samples(&self, word_key: &str) -> Vec<WordContext>;
}

/// Leitor sobre o corpus embutido.
pub struct StaticCorpus {
    sentences: Vec<SenseAnnotatedSentence>,
}

impl StaticCorpus {
    pub fn new() -> Self {
        Self {
            sentences: get_corpus(),
        }
    }

    pub fn sentences(&self) -> &[SenseAnnotatedSentence] {
        &self.sentences
    }
}

impl Default for StaticCorpus {
    fn default() -> Self {
        Self::new()
    }
}

impl CorpusReader for StaticCorpus {
    fn words(&self) -> Vec<String> {
        let keys: BTreeSet<String> = self
            .sentences
            .iter()
            .flat_map(|s| s.targets.iter().map(move |(i, _)| s.word_key_at(*i)))
            .collect();
        keys.into_iter().collect()
    }

    fn samples(&self, word_key: &str) -> Vec<WordContext> {
        let mut samples = Vec::new();
        for sentence in &self.sentences {
            for (index, sense) in sentence.targets {
                if sentence.word_key_at(*index) != word_key {
                    continue;
                }
                // O corpus embutido é consistente; um alvo inválido seria bug de dados.
                if let Ok(ctx) = WordContext::new(sentence.words(), sentence.tags(), *index) {
                    let ctx = ctx
                        .with_lemma(sentence.tokens[*index].2)
                        .with_gold(vec![sense.to_string()]);
                    samples.push(ctx);
                }
            }
        }
        samples
    }
}

/// Retorna o corpus completo.
pub fn get_corpus() -> Vec<SenseAnnotatedSentence> {
    vec![
        // ===== PLEASE (verbo) =====
        SenseAnnotatedSentence {
            text: "Please write to me when you arrive.",
            domain: "correspondência",
            tokens: &[
                ("Please", "VB", "please"), ("write", "VB", "write"), ("to", "TO", "to"),
                ("me", "PRP", "me"), ("when", "WRB", "when"), ("you", "PRP", "you"),
                ("arrive", "VBP", "arrive"), (".", ".", "."),
            ],
            targets: &[(0, "please%2:37:00::")],
        },
        SenseAnnotatedSentence {
            text: "Please send the report to the office soon.",
            domain: "correspondência",
            tokens: &[
                ("Please", "VB", "please"), ("send", "VB", "send"), ("the", "DT", "the"),
                ("report", "NN", "report"), ("to", "TO", "to"), ("the", "DT", "the"),
                ("office", "NN", "office"), ("soon", "RB", "soon"), (".", ".", "."),
            ],
            targets: &[(0, "please%2:37:00::")],
        },
        SenseAnnotatedSentence {
            text: "The music pleased the audience.",
            domain: "cultura",
            tokens: &[
                ("The", "DT", "the"), ("music", "NN", "music"), ("pleased", "VBD", "please"),
                ("the", "DT", "the"), ("audience", "NN", "audience"), (".", ".", "."),
            ],
            targets: &[(2, "please%2:37:00::")],
        },
        SenseAnnotatedSentence {
            text: "Do as you please.",
            domain: "cotidiano",
            tokens: &[
                ("Do", "VB", "do"), ("as", "IN", "as"), ("you", "PRP", "you"),
                ("please", "VBP", "please"), (".", ".", "."),
            ],
            targets: &[(3, "please%2:42:00::")],
        },
        SenseAnnotatedSentence {
            text: "He comes and goes as he pleases.",
            domain: "cotidiano",
            tokens: &[
                ("He", "PRP", "he"), ("comes", "VBZ", "come"), ("and", "CC", "and"),
                ("goes", "VBZ", "go"), ("as", "IN", "as"), ("he", "PRP", "he"),
                ("pleases", "VBZ", "please"), (".", ".", "."),
            ],
            targets: &[(6, "please%2:42:00::")],
        },
        SenseAnnotatedSentence {
            text: "You may leave whenever you please.",
            domain: "cotidiano",
            tokens: &[
                ("You", "PRP", "you"), ("may", "MD", "may"), ("leave", "VB", "leave"),
                ("whenever", "WRB", "whenever"), ("you", "PRP", "you"), ("please", "VBP", "please"),
                (".", ".", "."),
            ],
            targets: &[(5, "please%2:42:00::")],
        },
        SenseAnnotatedSentence {
            text: "The new waiters aim to please every guest.",
            domain: "serviços",
            tokens: &[
                ("The", "DT", "the"), ("new", "JJ", "new"), ("waiters", "NNS", "waiter"),
                ("aim", "VBP", "aim"), ("to", "TO", "to"), ("please", "VB", "please"),
                ("every", "DT", "every"), ("guest", "NN", "guest"), (".", ".", "."),
            ],
            targets: &[(5, "please%2:41:00::")],
        },
        SenseAnnotatedSentence {
            text: "Her careful answer pleased the strict teacher.",
            domain: "educação",
            tokens: &[
                ("Her", "PRP$", "her"), ("careful", "JJ", "careful"), ("answer", "NN", "answer"),
                ("pleased", "VBD", "please"), ("the", "DT", "the"), ("strict", "JJ", "strict"),
                ("teacher", "NN", "teacher"), (".", ".", "."),
            ],
            targets: &[(3, "please%2:41:00::")],
        },
        SenseAnnotatedSentence {
            text: "They tried to please.",
            domain: "cotidiano",
            tokens: &[
                ("They", "PRP", "they"), ("tried", "VBD", "try"), ("to", "TO", "to"),
                ("please", "VB", "please"), (".", ".", "."),
            ],
            targets: &[(3, "U")],
        },
        SenseAnnotatedSentence {
            text: "We need to discuss an important topic, please write to me soon.",
            domain: "correspondência",
            tokens: &[
                ("We", "PRP", "we"), ("need", "VBP", "need"), ("to", "TO", "to"),
                ("discuss", "VB", "discuss"), ("an", "DT", "an"), ("important", "JJ", "important"),
                ("topic", "NN", "topic"), (",", ",", ","), ("please", "VB", "please"),
                ("write", "VB", "write"), ("to", "TO", "to"), ("me", "PRP", "me"),
                ("soon", "RB", "soon"), (".", ".", "."),
            ],
            targets: &[(8, "please%2:37:00::")],
        },

        // ===== BANK (substantivo) =====
        SenseAnnotatedSentence {
            text: "The bank approved the loan for the new company.",
            domain: "economia",
            tokens: &[
                ("The", "DT", "the"), ("bank", "NN", "bank"), ("approved", "VBD", "approve"),
                ("the", "DT", "the"), ("loan", "NN", "loan"), ("for", "IN", "for"),
                ("the", "DT", "the"), ("new", "JJ", "new"), ("company", "NN", "company"),
                (".", ".", "."),
            ],
            targets: &[(1, "bank%1:14:00::")],
        },
        SenseAnnotatedSentence {
            text: "She deposited the money in the bank on Monday.",
            domain: "economia",
            tokens: &[
                ("She", "PRP", "she"), ("deposited", "VBD", "deposit"), ("the", "DT", "the"),
                ("money", "NN", "money"), ("in", "IN", "in"), ("the", "DT", "the"),
                ("bank", "NN", "bank"), ("on", "IN", "on"), ("Monday", "NNP", "monday"),
                (".", ".", "."),
            ],
            targets: &[(6, "bank%1:14:00::")],
        },
        SenseAnnotatedSentence {
            text: "The bank raised its interest rates again.",
            domain: "economia",
            tokens: &[
                ("The", "DT", "the"), ("bank", "NN", "bank"), ("raised", "VBD", "raise"),
                ("its", "PRP$", "its"), ("interest", "NN", "interest"), ("rates", "NNS", "rate"),
                ("again", "RB", "again"), (".", ".", "."),
            ],
            targets: &[(1, "bank%1:14:00::")],
        },
        SenseAnnotatedSentence {
            text: "We sat on the bank of the river and watched the water.",
            domain: "natureza",
            tokens: &[
                ("We", "PRP", "we"), ("sat", "VBD", "sit"), ("on", "IN", "on"),
                ("the", "DT", "the"), ("bank", "NN", "bank"), ("of", "IN", "of"),
                ("the", "DT", "the"), ("river", "NN", "river"), ("and", "CC", "and"),
                ("watched", "VBD", "watch"), ("the", "DT", "the"), ("water", "NN", "water"),
                (".", ".", "."),
            ],
            targets: &[(4, "bank%1:17:01::")],
        },
        SenseAnnotatedSentence {
            text: "The river overflowed its bank after the heavy rain.",
            domain: "natureza",
            tokens: &[
                ("The", "DT", "the"), ("river", "NN", "river"), ("overflowed", "VBD", "overflow"),
                ("its", "PRP$", "its"), ("bank", "NN", "bank"), ("after", "IN", "after"),
                ("the", "DT", "the"), ("heavy", "JJ", "heavy"), ("rain", "NN", "rain"),
                (".", ".", "."),
            ],
            targets: &[(4, "bank%1:17:01::")],
        },
        SenseAnnotatedSentence {
            text: "Fishermen lined the muddy bank of the lake.",
            domain: "natureza",
            tokens: &[
                ("Fishermen", "NNS", "fisherman"), ("lined", "VBD", "line"), ("the", "DT", "the"),
                ("muddy", "JJ", "muddy"), ("bank", "NN", "bank"), ("of", "IN", "of"),
                ("the", "DT", "the"), ("lake", "NN", "lake"), (".", ".", "."),
            ],
            targets: &[(4, "bank%1:17:01::")],
        },
        SenseAnnotatedSentence {
            text: "The bank was closed for the holiday.",
            domain: "economia",
            tokens: &[
                ("The", "DT", "the"), ("bank", "NN", "bank"), ("was", "VBD", "be"),
                ("closed", "VBN", "close"), ("for", "IN", "for"), ("the", "DT", "the"),
                ("holiday", "NN", "holiday"), (".", ".", "."),
            ],
            targets: &[(1, "null")],
        },

        // ===== PLANT (substantivo) =====
        SenseAnnotatedSentence {
            text: "The plant needs water and sunlight to grow.",
            domain: "natureza",
            tokens: &[
                ("The", "DT", "the"), ("plant", "NN", "plant"), ("needs", "VBZ", "need"),
                ("water", "NN", "water"), ("and", "CC", "and"), ("sunlight", "NN", "sunlight"),
                ("to", "TO", "to"), ("grow", "VB", "grow"), (".", ".", "."),
            ],
            targets: &[(1, "plant%1:03:00::")],
        },
        SenseAnnotatedSentence {
            text: "She watered the green plant in the garden.",
            domain: "natureza",
            tokens: &[
                ("She", "PRP", "she"), ("watered", "VBD", "water"), ("the", "DT", "the"),
                ("green", "JJ", "green"), ("plant", "NN", "plant"), ("in", "IN", "in"),
                ("the", "DT", "the"), ("garden", "NN", "garden"), (".", ".", "."),
            ],
            targets: &[(4, "plant%1:03:00::")],
        },
        SenseAnnotatedSentence {
            text: "The leaves of the plant turned yellow.",
            domain: "natureza",
            tokens: &[
                ("The", "DT", "the"), ("leaves", "NNS", "leaf"), ("of", "IN", "of"),
                ("the", "DT", "the"), ("plant", "NN", "plant"), ("turned", "VBD", "turn"),
                ("yellow", "JJ", "yellow"), (".", ".", "."),
            ],
            targets: &[(4, "plant%1:03:00::")],
        },
        SenseAnnotatedSentence {
            text: "The power plant produces electricity for the city.",
            domain: "indústria",
            tokens: &[
                ("The", "DT", "the"), ("power", "NN", "power"), ("plant", "NN", "plant"),
                ("produces", "VBZ", "produce"), ("electricity", "NN", "electricity"), ("for", "IN", "for"),
                ("the", "DT", "the"), ("city", "NN", "city"), (".", ".", "."),
            ],
            targets: &[(2, "plant%1:06:01::")],
        },
        SenseAnnotatedSentence {
            text: "Workers at the plant assembled new cars.",
            domain: "indústria",
            tokens: &[
                ("Workers", "NNS", "worker"), ("at", "IN", "at"), ("the", "DT", "the"),
                ("plant", "NN", "plant"), ("assembled", "VBD", "assemble"), ("new", "JJ", "new"),
                ("cars", "NNS", "car"), (".", ".", "."),
            ],
            targets: &[(3, "plant%1:06:01::")],
        },
        SenseAnnotatedSentence {
            text: "The chemical plant was closed after the radioactive leak.",
            domain: "indústria",
            tokens: &[
                ("The", "DT", "the"), ("chemical", "JJ", "chemical"), ("plant", "NN", "plant"),
                ("was", "VBD", "be"), ("closed", "VBN", "close"), ("after", "IN", "after"),
                ("the", "DT", "the"), ("radioactive", "JJ", "radioactive"), ("leak", "NN", "leak"),
                (".", ".", "."),
            ],
            targets: &[(2, "plant%1:06:01::")],
        },

        // ===== Sentenças sem alvo (treino do etiquetador) =====
        SenseAnnotatedSentence {
            text: "The component was highly radioactive to the point that it has been activated the second it touched water",
            domain: "ciência",
            tokens: &[
                ("The", "DT", "the"), ("component", "NN", "component"), ("was", "VBD", "be"),
                ("highly", "RB", "highly"), ("radioactive", "JJ", "radioactive"), ("to", "TO", "to"),
                ("the", "DT", "the"), ("point", "NN", "point"), ("that", "IN", "that"),
                ("it", "PRP", "it"), ("has", "VBZ", "have"), ("been", "VBN", "be"),
                ("activated", "VBN", "activate"), ("the", "DT", "the"), ("second", "NN", "second"),
                ("it", "PRP", "it"), ("touched", "VBD", "touch"), ("water", "NN", "water"),
            ],
            targets: &[],
        },
        SenseAnnotatedSentence {
            text: "The summer is almost over and I did not go to the beach even once",
            domain: "cotidiano",
            tokens: &[
                ("The", "DT", "the"), ("summer", "NN", "summer"), ("is", "VBZ", "be"),
                ("almost", "RB", "almost"), ("over", "RB", "over"), ("and", "CC", "and"),
                ("I", "PRP", "i"), ("did", "VBD", "do"), ("not", "RB", "not"),
                ("go", "VB", "go"), ("to", "TO", "to"), ("the", "DT", "the"),
                ("beach", "NN", "beach"), ("even", "RB", "even"), ("once", "RB", "once"),
            ],
            targets: &[],
        },
    ]
}

/// Sentenças de demonstração para a interface web.
pub fn demo_sentences() -> Vec<(&'static str, &'static str)> {
    vec![
        ("Pedido", "We need to discuss an important topic, please write to me soon."),
        ("Ciência", "The component was highly radioactive to the point that it has been activated the second it touched water"),
        ("Cotidiano", "The summer is almost over and I did not go to the beach even once"),
        ("Economia", "The bank raised its interest rates after the loan was approved."),
        ("Natureza", "We walked along the bank of the river and watched the water."),
        ("Indústria", "The power plant near the city produces electricity."),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corpus_alignment() {
        for sentence in get_corpus() {
            for (index, _) in sentence.targets {
                assert!(*index < sentence.tokens.len(), "alvo fora da sentença: {}", sentence.text);
            }
        }
    }

    #[test]
    fn test_words_are_keys() {
        let corpus = StaticCorpus::new();
        let words = corpus.words();
        assert!(words.contains(&"please.v".to_string()));
        assert!(words.contains(&"bank.n".to_string()));
        assert!(words.contains(&"plant.n".to_string()));
    }

    #[test]
    fn test_samples_for_word() {
        let corpus = StaticCorpus::new();
        let samples = corpus.samples("bank.n");
        assert_eq!(samples.len(), 7);
        for s in &samples {
            assert_eq!(s.raw_word_key(), "bank.n");
        }
    }

    #[test]
    fn test_unknown_word_yields_nothing() {
        let corpus = StaticCorpus::new();
        assert!(corpus.samples("zebra.n").is_empty());
    }
}
