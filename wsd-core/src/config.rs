//! # Configuração
//!
//! Todos os parâmetros ajustáveis em um só lugar. Cada campo tem valor
//! padrão, então um arquivo JSON parcial basta:
//!
//! ```json
//! { "strategy": "ims", "ims": { "iterations": 50 } }
//! ```
//!
//! O arquivo é indicado pela variável de ambiente `WSD_CONFIG`; sem ela, vale
//! a configuração padrão.

use std::env;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::disambiguator::{StrategyKind, WsdEngine};
use crate::error::Result;
use crate::ims::ImsParameters;
use crate::lesk::LeskParameters;
use crate::resources::{demo_models, WsdResources};

/// Variável de ambiente com o caminho do arquivo de configuração.
pub const CONFIG_ENV: &str = "WSD_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WsdConfig {
    /// Estratégia padrão do orquestrador.
    pub strategy: StrategyKind,
    pub lesk: LeskParameters,
    pub ims: ImsParameters,
    /// Endereço do servidor web.
    pub bind_addr: String,
}

impl Default for WsdConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            lesk: LeskParameters::default(),
            ims: ImsParameters::default(),
            bind_addr: "0.0.0.0:3000".to_string(),
        }
    }
}

impl WsdConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&json)?;
        info!(path = %path.as_ref().display(), "configuração carregada");
        Ok(config)
    }

    /// Lê o arquivo de `WSD_CONFIG`, ou usa os padrões se a variável não existe.
    pub fn load() -> Result<Self> {
        match env::var(CONFIG_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path.trim()),
            _ => Ok(Self::default()),
        }
    }

    /// Monta o orquestrador da estratégia configurada.
    ///
    /// Para IMS, os modelos são treinados no corpus embutido.
    pub fn build_engine(&self, resources: Arc<WsdResources>) -> WsdEngine {
        self.build_engine_for(self.strategy, resources)
    }

    pub fn build_engine_for(&self, strategy: StrategyKind, resources: Arc<WsdResources>) -> WsdEngine {
        match strategy {
            StrategyKind::Lesk => WsdEngine::lesk(resources, self.lesk),
            StrategyKind::Ims => {
                let models = demo_models(&resources, &self.ims);
                WsdEngine::ims(resources, models)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WsdError;
    use crate::lesk::LeskScope;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = WsdConfig::from_json_str(r#"{ "strategy": "ims", "ims": { "iterations": 50 } }"#).unwrap();
        assert_eq!(config.strategy, StrategyKind::Ims);
        assert_eq!(config.ims.iterations, 50);
        assert_eq!(config.ims.seed, 42);
        assert_eq!(config.lesk, LeskParameters::default());
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
    }

    #[test]
    fn test_lesk_scope_from_json() {
        let config = WsdConfig::from_json_str(r#"{ "lesk": { "scope": "basic_context", "window": 3 } }"#).unwrap();
        assert_eq!(config.lesk.scope, LeskScope::BasicContext);
        assert_eq!(config.lesk.window, 3);
        assert!(config.lesk.features.hypernyms);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wsd.json");
        fs::write(&path, r#"{ "bind_addr": "127.0.0.1:8080" }"#).unwrap();
        let config = WsdConfig::from_file(&path).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:8080");

        let missing = WsdConfig::from_file(dir.path().join("nope.json"));
        assert!(matches!(missing, Err(WsdError::Io(_))));
    }

    #[test]
    fn test_invalid_strategy() {
        let result = WsdConfig::from_json_str(r#"{ "strategy": "oracle" }"#);
        assert!(matches!(result, Err(WsdError::Serialization(_))));
    }
}
