//! # Erros do Motor de Desambiguação
//!
//! Todas as operações falíveis do crate retornam [`Result`], cujo erro é
//! [`WsdError`]. Erros de construção e validação são devolvidos imediatamente;
//! falhas de acesso ao inventário durante a pontuação são absorvidas pelo
//! pontuador (o candidato recebe score 0) e só chegam aqui quando o chamador
//! consulta o inventário diretamente.

use thiserror::Error;

/// Tipo de erro comum a todo o crate.
#[derive(Error, Debug)]
pub enum WsdError {
    /// Índice do alvo fora da sentença.
    #[error("índice {index} fora dos limites da sentença (tamanho {len})")]
    OutOfRange { index: usize, len: usize },

    /// Sequências paralelas (tokens, tags, lemas) com tamanhos diferentes.
    #[error("tamanhos incompatíveis: {expected} tokens, mas {found} {what}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// Span com `start > end` ou além do fim da sentença.
    #[error("span inválido {start}..{end} para sentença de tamanho {len}")]
    InvalidSpan { start: usize, end: usize, len: usize },

    /// O orquestrador foi construído sem estratégia.
    #[error("nenhuma estratégia de desambiguação configurada")]
    NotConfigured,

    /// Dados de treino degenerados (vazio, sem rótulo ou uma única classe).
    #[error("dados insuficientes para treinar '{word}': {reason}")]
    InsufficientData { word: String, reason: String },

    /// O modelo foi treinado para outro lema.
    #[error("modelo treinado para '{expected}', mas o contexto é '{found}'")]
    LemmaMismatch { expected: String, found: String },

    /// O inventário de sentidos não respondeu para a chave pedida.
    #[error("inventário de sentidos indisponível para '{0}'")]
    InventoryUnavailable(String),

    /// Identificador de sentido fora do formato `lema%c:ff:ii::`.
    #[error("identificador de sentido inválido: '{0}'")]
    InvalidSenseKey(String),

    #[error("erro de E/S: {0}")]
    Io(#[from] std::io::Error),

    #[error("erro de serialização: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Atalho para `Result<T, WsdError>`.
pub type Result<T> = std::result::Result<T, WsdError>;
