//! # Categorias Lexicais, Stop-words e Palavras de Negação
//!
//! O inventário de sentidos só conhece quatro classes gramaticais "abertas":
//! substantivo, verbo, adjetivo e advérbio. Este módulo reduz as tags do
//! Penn Treebank (ex: `NNS`, `VBD`, `JJR`) a uma dessas categorias e decide se
//! um token merece ser desambiguado.
//!
//! ## Tabela de Mapeamento
//!
//! | Tags Penn                          | Categoria   | Sufixo | Código |
//! |------------------------------------|-------------|--------|--------|
//! | NN, NNS, NNP, NNPS                 | Substantivo | `.n`   | 1      |
//! | VB, VBD, VBG, VBN, VBP, VBZ        | Verbo       | `.v`   | 2      |
//! | JJ, JJR, JJS                       | Adjetivo    | `.a`   | 3      |
//! | RB, RBR, RBS                       | Advérbio    | `.r`   | 4      |
//! | (qualquer outra)                   | Nenhuma     | -      | -      |
//!
//! As listas de stop-words e de negação são conjuntos imutáveis construídos
//! uma única vez na primeira consulta.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// Categoria gramatical grossa usada como chave no inventário de sentidos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LexicalCategory {
    Noun,
    Verb,
    Adjective,
    Adverb,
    /// Categoria "NONE": tags fechadas (determinantes, preposições, pronomes...).
    Other,
}

impl LexicalCategory {
    /// As quatro categorias que o inventário cobre, na ordem dos códigos.
    pub const RELEVANT: [LexicalCategory; 4] = [
        LexicalCategory::Noun,
        LexicalCategory::Verb,
        LexicalCategory::Adjective,
        LexicalCategory::Adverb,
    ];

    /// Uma categoria é relevante se o inventário possui sentidos para ela.
    pub fn is_relevant(self) -> bool {
        self != LexicalCategory::Other
    }

    /// Sufixo usado na chave `lema.sufixo` (ex: `please.v`). Vazio para `Other`.
    pub fn suffix(self) -> &'static str {
        match self {
            LexicalCategory::Noun => ".n",
            LexicalCategory::Verb => ".v",
            LexicalCategory::Adjective => ".a",
            LexicalCategory::Adverb => ".r",
            LexicalCategory::Other => "",
        }
    }

    /// Código numérico da categoria no identificador de sentido (`lema%2:...`).
    pub fn code(self) -> Option<u8> {
        match self {
            LexicalCategory::Noun => Some(1),
            LexicalCategory::Verb => Some(2),
            LexicalCategory::Adjective => Some(3),
            LexicalCategory::Adverb => Some(4),
            LexicalCategory::Other => None,
        }
    }

    /// Inverso de [`LexicalCategory::code`].
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(LexicalCategory::Noun),
            2 => Some(LexicalCategory::Verb),
            3 => Some(LexicalCategory::Adjective),
            4 => Some(LexicalCategory::Adverb),
            _ => None,
        }
    }

    /// Parseia o sufixo de uma chave de palavra (`"v"` ou `".v"`).
    pub fn from_suffix(s: &str) -> Option<Self> {
        match s.trim_start_matches('.') {
            "n" => Some(LexicalCategory::Noun),
            "v" => Some(LexicalCategory::Verb),
            "a" => Some(LexicalCategory::Adjective),
            "r" => Some(LexicalCategory::Adverb),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LexicalCategory::Noun => "noun",
            LexicalCategory::Verb => "verb",
            LexicalCategory::Adjective => "adjective",
            LexicalCategory::Adverb => "adverb",
            LexicalCategory::Other => "none",
        }
    }
}

impl std::fmt::Display for LexicalCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

const NOUN_TAGS: &[&str] = &["NN", "NNS", "NNP", "NNPS"];
const VERB_TAGS: &[&str] = &["VB", "VBD", "VBG", "VBN", "VBP", "VBZ"];
const ADJECTIVE_TAGS: &[&str] = &["JJ", "JJR", "JJS"];
const ADVERB_TAGS: &[&str] = &["RB", "RBR", "RBS"];

/// Reduz uma tag Penn à sua categoria grossa.
///
/// A pertença é exata por tabela: `NNX` (inexistente) cai em `Other`.
///
/// # Exemplo
/// ```rust
/// use wsd_core::lexical::{category_of, LexicalCategory};
///
/// assert_eq!(category_of("VBD"), LexicalCategory::Verb);
/// assert_eq!(category_of("DT"), LexicalCategory::Other);
/// ```
pub fn category_of(tag: &str) -> LexicalCategory {
    if NOUN_TAGS.contains(&tag) {
        LexicalCategory::Noun
    } else if VERB_TAGS.contains(&tag) {
        LexicalCategory::Verb
    } else if ADJECTIVE_TAGS.contains(&tag) {
        LexicalCategory::Adjective
    } else if ADVERB_TAGS.contains(&tag) {
        LexicalCategory::Adverb
    } else {
        LexicalCategory::Other
    }
}

/// `true` se a tag pertence a uma das quatro categorias do inventário.
pub fn is_relevant_tag(tag: &str) -> bool {
    category_of(tag).is_relevant()
}

/// Stop-words (comparação exata, sensível a caixa).
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word)
}

/// Palavras de negação (comparação exata, sensível a caixa).
pub fn is_negation_word(word: &str) -> bool {
    NEGATION_WORDS.contains(word)
}

/// Decompõe uma chave de palavra `lema.sufixo` (ex: `please.v`).
pub fn split_word_key(key: &str) -> Option<(&str, LexicalCategory)> {
    let (lemma, suffix) = key.rsplit_once('.')?;
    if lemma.is_empty() {
        return None;
    }
    LexicalCategory::from_suffix(suffix).map(|category| (lemma, category))
}

/// Descrição fixa de uma tag não desambiguável.
///
/// O orquestrador devolve essa descrição no lugar de um sentido
/// (ex: `DT` → `"determiner"`). Tags fora da tabela retornam `None`.
pub fn placeholder_for(tag: &str) -> Option<&'static str> {
    PLACEHOLDERS.get(tag).copied()
}

static NEGATION_WORDS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| ["not", "no", "never", "none", "nor", "non"].into_iter().collect());

static PLACEHOLDERS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    [
        ("CC", "coordinating conjunction"),
        ("CD", "cardinal number"),
        ("DT", "determiner"),
        ("EX", "existential there"),
        ("FW", "foreign word"),
        ("IN", "preposition / subordinating conjunction"),
        ("LS", "list marker"),
        ("MD", "modal"),
        ("PDT", "predeterminer"),
        ("POS", "possessive ending"),
        ("PRP", "personal pronoun"),
        ("PRP$", "possessive pronoun"),
        ("RP", "particle"),
        ("SYM", "symbol"),
        ("TO", "to"),
        ("UH", "interjection"),
        ("WDT", "wh-determiner"),
        ("WP", "wh-pronoun"),
        ("WP$", "possessive wh-pronoun"),
        ("WRB", "wh-adverb"),
        (".", "punctuation"),
        (",", "punctuation"),
        (":", "punctuation"),
        ("``", "punctuation"),
        ("''", "punctuation"),
        ("-LRB-", "punctuation"),
        ("-RRB-", "punctuation"),
    ]
    .into_iter()
    .collect()
});

static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "a", "able", "about", "above", "according", "accordingly", "across", "actually",
        "after", "afterwards", "again", "against", "ain't", "all", "allow", "allows", "almost",
        "alone", "along", "already", "also", "although", "always", "am", "among", "amongst",
        "an", "and", "another", "any", "anybody", "anyhow", "anyone", "anything", "anyway",
        "anyways", "anywhere", "apart", "appear", "appreciate", "appropriate", "are", "aren't",
        "around", "as", "aside", "ask", "asking", "associated", "at", "available", "away",
        "awfully", "be", "became", "because", "become", "becomes", "becoming", "been",
        "before", "beforehand", "behind", "being", "believe", "below", "beside", "besides",
        "best", "better", "between", "beyond", "both", "brief", "but", "by", "came", "can",
        "cannot", "cant", "can't", "cause", "causes", "certain", "certainly", "changes",
        "clearly", "c'mon", "co", "com", "come", "comes", "concerning", "consequently",
        "consider", "considering", "contain", "containing", "contains", "corresponding",
        "could", "couldn't", "course", "c's", "currently", "definitely", "described",
        "despite", "did", "didn't", "different", "do", "does", "doesn't", "doing", "done",
        "don't", "down", "downwards", "during", "each", "edu", "eg", "eight", "either", "else",
        "elsewhere", "enough", "entirely", "especially", "et", "etc", "even", "ever", "every",
        "everybody", "everyone", "everything", "everywhere", "ex", "exactly", "example",
        "except", "far", "few", "fifth", "first", "five", "followed", "following", "follows",
        "for", "former", "formerly", "forth", "four", "from", "further", "furthermore", "get",
        "gets", "getting", "given", "gives", "go", "goes", "going", "gone", "got", "gotten",
        "greetings", "had", "hadn't", "happens", "hardly", "has", "hasn't", "have", "haven't",
        "having", "he", "hello", "help", "hence", "her", "here", "hereafter", "hereby",
        "herein", "here's", "hereupon", "hers", "herself", "he's", "hi", "him", "himself",
        "his", "hither", "hopefully", "how", "howbeit", "however", "i", "i'd", "ie", "if",
        "ignored", "i'll", "i'm", "immediate", "in", "inasmuch", "inc", "indeed", "indicate",
        "indicated", "indicates", "inner", "insofar", "instead", "into", "inward", "is",
        "isn't", "it", "it'd", "it'll", "its", "it's", "itself", "i've", "just", "keep",
        "keeps", "kept", "know", "known", "knows", "last", "lately", "later", "latter",
        "latterly", "least", "less", "lest", "let", "let's", "like", "liked", "likely",
        "little", "look", "looking", "looks", "ltd", "mainly", "many", "may", "maybe", "me",
        "mean", "meanwhile", "merely", "might", "more", "moreover", "most", "mostly", "much",
        "must", "my", "myself", "name", "namely", "nd", "near", "nearly", "necessary", "need",
        "needs", "neither", "never", "nevertheless", "new", "next", "nine", "no", "nobody",
        "non", "none", "noone", "nor", "normally", "not", "nothing", "novel", "now", "nowhere",
        "obviously", "of", "off", "often", "oh", "ok", "okay", "old", "on", "once", "one",
        "ones", "only", "onto", "or", "other", "others", "otherwise", "ought", "our", "ours",
        "ourselves", "out", "outside", "over", "overall", "own", "particular", "particularly",
        "per", "perhaps", "placed", "please", "plus", "possible", "presumably", "probably",
        "provides", "que", "quite", "qv", "rather", "rd", "re", "really", "reasonably",
        "regarding", "regardless", "regards", "relatively", "respectively", "right", "said",
        "same", "saw", "say", "saying", "says", "second", "secondly", "see", "seeing", "seem",
        "seemed", "seeming", "seems", "seen", "self", "selves", "sensible", "sent", "serious",
        "seriously", "seven", "several", "shall", "she", "should", "shouldn't", "since", "six",
        "so", "some", "somebody", "somehow", "someone", "something", "sometime", "sometimes",
        "somewhat", "somewhere", "soon", "sorry", "specified", "specify", "specifying",
        "still", "sub", "such", "sup", "sure", "take", "taken", "tell", "tends", "th", "than",
        "thank", "thanks", "thanx", "that", "thats", "that's", "the", "their", "theirs",
        "them", "themselves", "then", "thence", "there", "thereafter", "thereby", "therefore",
        "therein", "theres", "there's", "thereupon", "these", "they", "they'd", "they'll",
        "they're", "they've", "think", "third", "this", "thorough", "thoroughly", "those",
        "though", "three", "through", "throughout", "thru", "thus", "to", "together", "too",
        "took", "toward", "towards", "tried", "tries", "truly", "try", "trying", "t's",
        "twice", "two", "un", "under", "unfortunately", "unless", "unlikely", "until", "unto",
        "up", "upon", "us", "use", "used", "useful", "uses", "using", "usually", "value",
        "various", "very", "via", "viz", "vs", "want", "wants", "was", "wasn't", "way", "we",
        "we'd", "welcome", "well", "we'll", "went", "were", "we're", "weren't", "we've",
        "what", "whatever", "what's", "when", "whence", "whenever", "where", "whereafter",
        "whereas", "whereby", "wherein", "where's", "whereupon", "wherever", "whether",
        "which", "while", "whither", "who", "whoever", "whole", "whom", "who's", "whose",
        "why", "will", "willing", "wish", "with", "within", "without", "wonder", "won't",
        "would", "wouldn't", "yes", "yet", "you", "you'd", "you'll", "your", "you're", "yours",
        "yourself", "yourselves", "you've", "zero",
    ]
    .into_iter()
    .collect()
});
