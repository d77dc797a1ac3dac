//! # wsd-core: Desambiguação de Sentido de Palavras (WSD)
//!
//! Este crate atribui a palavras ambíguas de uma sentença um identificador de
//! sentido vindo de um inventário lexical fixo (no formato do WordNet:
//! `please%2:37:00::`). Duas estratégias competem:
//!
//! - **Lesk** ([`lesk`]): não supervisionado. Escolhe o sentido cuja glosa
//!   mais se sobrepõe ao contexto, opcionalmente expandindo por relações
//!   semânticas (hiperônimos, merônimos...).
//! - **IMS** ([`ims`]): supervisionado. Um classificador de Máxima Entropia
//!   por lema, treinado sobre amostras anotadas.
//!
//! ## Arquitetura do Sistema
//!
//! 1.  **Entrada**: sentença tokenizada, com tags Penn e lemas (ou texto
//!     bruto, analisado por [`linguistic::LinguisticPipeline`]).
//! 2.  **Contexto** ([`context`]): a palavra-alvo dentro da sentença.
//! 3.  **Features** ([`features`]): palavras relevantes e vetor esparso.
//! 4.  **Estratégia** ([`disambiguator::Disambiguator`]): pontua os sentidos
//!     candidatos do [`inventory`].
//! 5.  **Orquestrador** ([`disambiguator::WsdEngine`]): sentido, marcador
//!     (`WSDHELPER determiner`) ou `WSDHELPER unknown` por posição.
//! 6.  **Avaliação** ([`evaluator`]): acurácia por lema contra um corpus.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use std::sync::Arc;
//! use wsd_core::{LeskParameters, WsdEngine};
//! use wsd_core::resources::demo_resources;
//!
//! // 1. Recursos embutidos (pipeline inglês + léxico de demonstração)
//! let resources = Arc::new(demo_resources());
//!
//! // 2. Orquestrador com Lesk estendido
//! let engine = WsdEngine::lesk(resources, LeskParameters::default());
//!
//! // 3. Desambigua todas as palavras
//! for (word, result) in engine.disambiguate_text("The bank raised its interest rates again.").unwrap() {
//!     println!("{word}: {result}");
//! }
//! ```
//!
//! ## Módulos Principais
//!
//! - [`disambiguator`]: orquestrador e trait das estratégias.
//! - [`lesk`] e [`ims`]: as duas estratégias.
//! - [`evaluator`]: medição de acurácia.
//! - [`corpus`]: corpus anotado de demonstração.
//! - [`config`]: parâmetros carregáveis de JSON.

pub mod config;
pub mod context;
pub mod corpus;
pub mod disambiguator;
pub mod error;
pub mod evaluator;
pub mod features;
pub mod ims;
pub mod inventory;
pub mod lemmatizer;
pub mod lesk;
pub mod lexical;
pub mod linguistic;
pub mod resources;
pub mod sense;
pub mod tagger;
pub mod tokenizer;

pub use config::WsdConfig;
pub use context::WordContext;
pub use disambiguator::{Disambiguator, StrategyKind, WsdEngine, WsdEvent};
pub use error::{Result, WsdError};
pub use evaluator::{EvaluationReport, Evaluator};
pub use ims::{ImsDisambiguator, ImsModel, ImsModelSet, ImsParameters, ImsTrainer};
pub use inventory::{MemoryInventory, Relation, SenseInventory};
pub use lesk::{LeskDisambiguator, LeskParameters, LeskScope};
pub use lexical::LexicalCategory;
pub use sense::{Disambiguation, SenseKey, SenseOrigin, TaggedSense};
