//! # Recursos Compartilhados
//!
//! Tudo o que o motor consulta mas nunca altera: o pipeline linguístico
//! (tokenizador, etiquetador, lematizador) e o inventário de sentidos.
//! É construído uma vez no início do processo e compartilhado por `Arc`
//! entre as requisições e as threads de avaliação.
//!
//! [`demo_resources`] monta a configuração embutida: pipeline inglês treinado
//! no corpus de demonstração e o léxico de [`MemoryInventory::demo`].

use std::sync::Arc;

use tracing::info;

use crate::context::WordContext;
use crate::corpus::StaticCorpus;
use crate::error::Result;
use crate::ims::{ImsModelSet, ImsParameters, ImsTrainer};
use crate::inventory::{MemoryInventory, SenseInventory};
use crate::linguistic::LinguisticPipeline;

/// Pipeline linguístico + inventário.
pub struct WsdResources {
    pub pipeline: LinguisticPipeline,
    pub inventory: Arc<dyn SenseInventory>,
}

impl WsdResources {
    pub fn new(pipeline: LinguisticPipeline, inventory: Arc<dyn SenseInventory>) -> Self {
        Self { pipeline, inventory }
    }

    /// Contexto cujo lema vem do lematizador do pipeline.
    pub fn context(&self, sentence: &[String], tags: &[String], index: usize) -> Result<WordContext> {
        WordContext::new_with(sentence.to_vec(), tags.to_vec(), index, self.pipeline.lemmatizer())
    }
}

/// Recursos embutidos, sem dependência de arquivos externos.
pub fn demo_resources() -> WsdResources {
    let inventory = MemoryInventory::demo();
    info!(senses = inventory.len(), "inventário de demonstração carregado");
    WsdResources::new(LinguisticPipeline::english(), Arc::new(inventory))
}

/// Treina os modelos IMS de todas as palavras do corpus embutido.
pub fn demo_models(resources: &WsdResources, params: &ImsParameters) -> ImsModelSet {
    let models = ImsTrainer::train_all(&StaticCorpus::new(), resources.inventory.as_ref(), params);
    info!(models = models.len(), "modelos IMS de demonstração treinados");
    models
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::LexicalCategory;

    #[test]
    fn test_demo_resources() {
        let resources = demo_resources();
        let senses = resources.inventory.lookup_senses("please", LexicalCategory::Verb).unwrap();
        assert_eq!(senses.len(), 3);
        let analyzed = resources.pipeline.analyze("Please write soon.");
        assert_eq!(analyzed.words.len(), 4);
    }

    #[test]
    fn test_context_uses_pipeline_lemmatizer() {
        let resources = demo_resources();
        let words: Vec<String> = ["the", "banks", "were", "flooded"].iter().map(|s| s.to_string()).collect();
        let tags: Vec<String> = ["DT", "NNS", "VBD", "VBN"].iter().map(|s| s.to_string()).collect();
        assert_eq!(resources.context(&words, &tags, 1).unwrap().raw_word_key(), "bank.n");
        assert_eq!(resources.context(&words, &tags, 2).unwrap().raw_word_key(), "be.v");
    }

    #[test]
    fn test_demo_models_cover_corpus() {
        let resources = demo_resources();
        let models = demo_models(&resources, &ImsParameters::default());
        assert!(models.get("please.v").is_some());
        assert!(models.get("bank.n").is_some());
    }
}
