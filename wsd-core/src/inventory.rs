//! # Inventário de Sentidos
//!
//! O inventário responde três perguntas:
//! 1. Quais são os sentidos candidatos de `lema` na categoria `c`? (ordem estável)
//! 2. Qual é a glosa de um sentido?
//! 3. Quais sentidos estão ligados a este por uma relação semântica
//!    (hiperônimo, merônimo...)? Usado pela variante estendida do Lesk.
//!
//! A implementação embutida, [`MemoryInventory`], guarda tudo em memória e
//! pode ser carregada de JSON:
//!
//! ```json
//! {
//!   "senses": [
//!     { "key": "bank%1:14:00::", "gloss": "a financial institution ...", "examples": ["..."] }
//!   ],
//!   "relations": [
//!     { "from": "bank%1:14:00::", "relation": "hypernyms", "to": "financial_institution%1:14:00::" }
//!   ]
//! }
//! ```
//!
//! A ordem dos sentidos no arquivo é a ordem de frequência: o primeiro sentido
//! de cada lema é o "sentido mais frequente".

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WsdError};
use crate::lexical::LexicalCategory;
use crate::sense::{CandidateSense, SenseKey, SenseOrigin};

/// Relações semânticas entre sentidos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    Synonyms,
    Hypernyms,
    Hyponyms,
    Meronyms,
    Holonyms,
    Entailments,
    CoordinateTerms,
    Causes,
    Attributes,
    Pertainyms,
}

impl Relation {
    pub const ALL: [Relation; 10] = [
        Relation::Synonyms,
        Relation::Hypernyms,
        Relation::Hyponyms,
        Relation::Meronyms,
        Relation::Holonyms,
        Relation::Entailments,
        Relation::CoordinateTerms,
        Relation::Causes,
        Relation::Attributes,
        Relation::Pertainyms,
    ];
}

/// Fonte de sentidos candidatos, glosas e relações.
///
/// Implementações devem ser somente-leitura após a construção, pois são
/// compartilhadas entre threads durante avaliação e treino.
pub trait SenseInventory: Send + Sync {
    /// Sentidos de `lemma` na `category`, em ordem estável (mais frequente primeiro).
    fn lookup_senses(&self, lemma: &str, category: LexicalCategory) -> Result<Vec<CandidateSense>>;

    /// Glosa de um sentido.
    fn lookup_gloss(&self, key: &SenseKey) -> Result<String>;

    /// Sentidos ligados a `key` pela relação. Inventários sem relações devolvem vazio.
    fn related_senses(&self, _key: &SenseKey, _relation: Relation) -> Vec<CandidateSense> {
        Vec::new()
    }

    /// Marca de origem dos sentidos deste inventário.
    fn origin(&self) -> SenseOrigin {
        SenseOrigin::WordNet
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RelationEntry {
    from: SenseKey,
    relation: Relation,
    to: SenseKey,
}

/// Formato de arquivo do inventário.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryFile {
    pub senses: Vec<CandidateSense>,
    #[serde(default)]
    relations: Vec<RelationEntry>,
}

/// Inventário em memória.
#[derive(Debug, Clone, Default)]
pub struct MemoryInventory {
    senses: Vec<CandidateSense>,
    /// `(lema, categoria)` → índices em `senses`, na ordem de inserção.
    by_lemma: HashMap<(String, LexicalCategory), Vec<usize>>,
    by_key: HashMap<SenseKey, usize>,
    relations: HashMap<(SenseKey, Relation), Vec<SenseKey>>,
}

impl MemoryInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adiciona um sentido. Reinserir uma chave substitui glosa e exemplos.
    pub fn add_sense(&mut self, sense: CandidateSense) {
        if let Some(&i) = self.by_key.get(&sense.key) {
            self.senses[i] = sense;
            return;
        }
        let index = self.senses.len();
        self.by_lemma
            .entry((sense.key.lemma.clone(), sense.key.category))
            .or_default()
            .push(index);
        self.by_key.insert(sense.key.clone(), index);
        self.senses.push(sense);
    }

    pub fn add_relation(&mut self, from: SenseKey, relation: Relation, to: SenseKey) {
        self.relations.entry((from, relation)).or_default().push(to);
    }

    pub fn len(&self) -> usize {
        self.senses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senses.is_empty()
    }

    pub fn from_file_format(file: InventoryFile) -> Self {
        let mut inventory = Self::new();
        for sense in file.senses {
            inventory.add_sense(sense);
        }
        for entry in file.relations {
            inventory.add_relation(entry.from, entry.relation, entry.to);
        }
        inventory
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: InventoryFile = serde_json::from_str(json)?;
        Ok(Self::from_file_format(file))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Exporta no mesmo formato aceito por [`MemoryInventory::from_json_str`].
    pub fn to_json(&self) -> Result<String> {
        let mut relations: Vec<RelationEntry> = self
            .relations
            .iter()
            .flat_map(|((from, relation), targets)| {
                targets.iter().map(move |to| RelationEntry {
                    from: from.clone(),
                    relation: *relation,
                    to: to.clone(),
                })
            })
            .collect();
        relations.sort_by(|a, b| (&a.from, &a.to).cmp(&(&b.from, &b.to)));

        let file = InventoryFile {
            senses: self.senses.clone(),
            relations,
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Léxico de demonstração que cobre o corpus embutido.
    pub fn demo() -> Self {
        let mut inventory = Self::new();
        for (key, gloss, examples) in DEMO_SENSES {
            // As chaves do léxico embutido são literais válidos.
            if let Ok(key) = key.parse::<SenseKey>() {
                inventory.add_sense(CandidateSense {
                    key,
                    gloss: gloss.to_string(),
                    examples: examples.iter().map(|e| e.to_string()).collect(),
                });
            }
        }
        for (from, relation, to) in DEMO_RELATIONS {
            if let (Ok(from), Ok(to)) = (from.parse::<SenseKey>(), to.parse::<SenseKey>()) {
                inventory.add_relation(from, *relation, to);
            }
        }
        inventory
    }
}

impl SenseInventory for MemoryInventory {
    fn lookup_senses(&self, lemma: &str, category: LexicalCategory) -> Result<Vec<CandidateSense>> {
        let senses = self
            .by_lemma
            .get(&(lemma.to_lowercase(), category))
            .map(|indices| indices.iter().map(|&i| self.senses[i].clone()).collect())
            .unwrap_or_default();
        Ok(senses)
    }

    fn lookup_gloss(&self, key: &SenseKey) -> Result<String> {
        self.by_key
            .get(key)
            .map(|&i| self.senses[i].gloss.clone())
            .ok_or_else(|| WsdError::InventoryUnavailable(key.to_string()))
    }

    fn related_senses(&self, key: &SenseKey, relation: Relation) -> Vec<CandidateSense> {
        self.relations
            .get(&(key.clone(), relation))
            .map(|targets| {
                targets
                    .iter()
                    .filter_map(|k| self.by_key.get(k).map(|&i| self.senses[i].clone()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// `(chave, glosa, exemplos)`; para cada lema, o sentido mais frequente vem primeiro.
const DEMO_SENSES: &[(&str, &str, &[&str])] = &[
    // ===== Verbos =====
    ("please%2:37:00::", "give pleasure to or be pleasing to", &["These colors please the senses", "a pleasing sensation", "please write to me soon"]),
    ("please%2:42:00::", "be the will of or have the will (to)", &["he could do many things if he pleased", "do as you please"]),
    ("please%2:41:00::", "give satisfaction", &["the waiters around her aim to please", "the answer pleased the teacher"]),
    ("need%2:42:00::", "require as useful, just, or proper", &["It takes nerve to do what she did", "success usually requires hard work"]),
    ("need%2:34:00::", "have need of", &["This piano wants the attention of a competent tuner"]),
    ("discuss%2:32:00::", "speak with others about (something); talk (something) over in detail; have a discussion", &["We discussed our household budget"]),
    ("discuss%2:32:01::", "to consider or examine in speech or writing", &["The author discusses these ideas in his book"]),
    ("write%2:36:00::", "produce a literary work", &["She composed a poem", "He wrote four novels"]),
    ("write%2:32:00::", "communicate or express by writing", &["Please write to me every week"]),
    ("write%2:32:01::", "communicate (with) in writing", &["Write her soon, please!"]),
    ("activate%2:30:00::", "make active or more active", &["activate an old file", "the water activated the component"]),
    ("activate%2:30:01::", "make more adsorptive", &["activate charcoal"]),
    ("touch%2:35:00::", "make physical contact with, come in contact with", &["Touch the stone for good luck", "She never touched her husband"]),
    ("touch%2:37:00::", "affect emotionally", &["A stirring movie", "I was touched by your kind letter of sympathy"]),
    ("go%2:38:00::", "change location; move, travel, or proceed, also metaphorically", &["How fast does your new car go?", "We went to the beach"]),
    ("go%2:42:00::", "follow a procedure or take a course", &["We should go farther in this matter"]),
    ("be%2:42:03::", "have the quality of being; (copula, used with an adjective or a predicate noun)", &["John is rich", "This is not a good answer"]),
    ("be%2:42:06::", "occupy a certain position or area; be somewhere", &["Where is my umbrella?"]),
    // ===== Substantivos =====
    ("bank%1:14:00::", "a financial institution that accepts deposits and channels the money into lending activities", &["he cashed a check at the bank", "that bank holds the mortgage on my home"]),
    ("bank%1:17:01::", "sloping land (especially the slope beside a body of water)", &["they pulled the canoe up on the bank", "he sat on the bank of the river and watched the currents"]),
    ("bank%1:06:00::", "a building in which the business of banking transacted", &["the bank is on the corner of Nassau and Witherspoon"]),
    ("plant%1:03:00::", "(botany) a living organism lacking the power of locomotion", &["the plant needs sunlight and water to grow"]),
    ("plant%1:06:01::", "buildings for carrying on industrial labor", &["they built a large plant to manufacture automobiles"]),
    ("point%1:09:00::", "a specific identifiable position in a continuum or series or especially in a process", &["a remarkable degree of frankness", "at what stage are the social sciences?"]),
    ("point%1:15:00::", "the precise location of something; a spatially limited location", &["she walked to a point where she could survey the whole street"]),
    ("component%1:06:00::", "an artifact that is one of the individual parts of which a composite entity is made up", &["spare components for cars"]),
    ("water%1:27:00::", "binary compound that occurs at room temperature as a clear colorless odorless tasteless liquid", &["water is essential for life"]),
    ("water%1:17:00::", "the part of the earth's surface covered with water (such as a river or lake or ocean)", &["they invaded our territorial waters", "they were sitting by the water's edge"]),
    ("second%1:28:00::", "1/60 of a minute; the basic unit of time adopted under the Systeme International d'Unites", &[]),
    ("second%1:28:01::", "an indefinitely short time", &["wait just a moment", "it only takes a second"]),
    ("topic%1:10:00::", "the subject matter of a conversation or discussion", &["he didn't want to discuss that subject", "it was a very sensitive topic"]),
    ("summer%1:28:00::", "the warmest season of the year; in the northern hemisphere it extends from the summer solstice to the autumnal equinox", &["they spent a lot of time at the beach in summer"]),
    ("beach%1:17:00::", "an area of sand sloping down to the water of a sea or lake", &[]),
    ("financial_institution%1:14:00::", "an institution (public or private) that collects funds (from the public or other institutions) and invests them in financial assets", &[]),
    ("slope%1:17:00::", "an elevated geological formation", &["he climbed the steep slope", "the lake was surrounded by muddy slopes"]),
    ("depository_financial_institution%1:14:00::", "a financial institution that accepts deposits of money and lends it", &["interest rates on loans and deposits"]),
    ("organism%1:03:00::", "a living thing that has (or can develop) the ability to act or function independently", &[]),
    ("flower%1:20:00::", "reproductive organ of angiosperm plants especially one having showy or colorful parts", &["the garden was full of green leaves and yellow flowers"]),
    ("building_complex%1:06:00::", "a whole structure (as a building) made up of interconnected or related structures", &[]),
    ("factory%1:06:00::", "a plant consisting of one or more buildings with facilities for manufacturing", &["workers assembled cars at the factory", "a power station that produces electricity"]),
    // ===== Adjetivos =====
    ("radioactive%3:00:00::", "exhibiting or caused by radioactivity", &["radioactive material", "radioactive decay"]),
    ("important%3:00:00::", "of great significance or value", &["important people", "the important questions of the day"]),
    ("important%3:00:02::", "of extreme importance; vital to the resolution of a crisis", &["a crucial moment in his career"]),
    // ===== Advérbios =====
    ("highly%4:02:00::", "at a high rate or wage", &["highly paid workers"]),
    ("highly%4:02:01::", "to a high degree or extent; favorably or with much respect", &["highly radioactive water", "a highly unusual point of view"]),
    ("highly%4:02:02::", "in a high position or level or rank", &["he was placed highly in the company"]),
    ("soon%4:02:00::", "in the near future", &["the doctor will soon be here", "the book will appear shortly"]),
    ("almost%4:02:00::", "(of actions or states) slightly short of or not quite accomplished; all but", &["the job is (just) about done", "the baby was almost asleep"]),
    ("once%4:02:00::", "on one occasion", &["once I ran into her"]),
    ("once%4:02:01::", "as soon as", &["once we are home, we can rest"]),
];

const DEMO_RELATIONS: &[(&str, Relation, &str)] = &[
    ("bank%1:14:00::", Relation::Hypernyms, "financial_institution%1:14:00::"),
    ("bank%1:14:00::", Relation::Synonyms, "depository_financial_institution%1:14:00::"),
    ("bank%1:17:01::", Relation::Hypernyms, "slope%1:17:00::"),
    ("plant%1:03:00::", Relation::Hypernyms, "organism%1:03:00::"),
    ("plant%1:03:00::", Relation::Meronyms, "flower%1:20:00::"),
    ("plant%1:06:01::", Relation::Hypernyms, "building_complex%1:06:00::"),
    ("plant%1:06:01::", Relation::Hyponyms, "factory%1:06:00::"),
    ("water%1:27:00::", Relation::CoordinateTerms, "beach%1:17:00::"),
];
