//! # Tokenizador para Inglês
//!
//! Divide o texto bruto em tokens (palavras e pontuações) no estilo Penn
//! Treebank. Cada token preserva seu offset no texto original, o que permite
//! destacar as palavras desambiguadas na interface web.
//!
//! ## Esquema de Tokenização
//!
//! - **Standard**: palavras separadas por espaços e pontuações; preserva
//!   abreviações comuns ("Dr.", "e.g.") e números decimais.
//! - **SplitClitics**: como o Standard, mas separa contrações
//!   ("didn't" → "did", "n't"; "it's" → "it", "'s"), que é o que o etiquetador
//!   espera.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use wsd_core::tokenizer::{tokenize_with_mode, TokenizerMode};
//!
//! let tokens = tokenize_with_mode("I didn't go.", TokenizerMode::SplitClitics);
//! let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
//! assert_eq!(texts, vec!["I", "did", "n't", "go", "."]);
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::linguistic::Tokenizer;

/// Um token extraído do texto original.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Token {
    /// O texto do token (ex: "bank", ",", "n't").
    pub text: String,
    /// Índice de byte inicial no texto original (inclusive).
    pub start: usize,
    /// Índice de byte final no texto original (exclusivo).
    pub end: usize,
    /// Índice sequencial do token na lista (0, 1, 2...).
    pub index: usize,
}

/// Estratégias de tokenização disponíveis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenizerMode {
    /// Separa por espaços e pontuações, preservando abreviações.
    Standard,
    /// Standard + separação de contrações (padrão do pipeline).
    #[default]
    SplitClitics,
}

/// Abreviações que não devem ter o ponto tratado como fim de sentença.
const ABBREVIATIONS: &[&str] = &[
    "Dr", "Mr", "Mrs", "Ms", "Prof", "Sr", "Jr", "St", "Mt", "Gen", "Gov", "Sen",
    "Rep", "Inc", "Ltd", "Co", "Corp", "vs", "etc", "e.g", "i.e", "Jan", "Feb",
    "Mar", "Apr", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Contração no fim de uma palavra: `n't`, `'s`, `'re`, `'ve`, `'ll`, `'d`, `'m`.
static CLITIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?P<base>.+?)(?P<clitic>n['’]t|['’](?:s|re|ve|ll|d|m))$")
        .expect("regex de clíticos é literal e válida")
});

/// Tokeniza um texto usando o modo padrão do pipeline.
pub fn tokenize(text: &str) -> Vec<Token> {
    tokenize_with_mode(text, TokenizerMode::default())
}

/// Tokeniza um texto com o modo especificado.
pub fn tokenize_with_mode(text: &str, mode: TokenizerMode) -> Vec<Token> {
    let mut tokens = match mode {
        TokenizerMode::Standard => tokenize_standard(text),
        TokenizerMode::SplitClitics => split_clitics(tokenize_standard(text)),
    };

    // Re-indexa os tokens
    for (i, token) in tokens.iter_mut().enumerate() {
        token.index = i;
    }
    tokens
}

fn split_clitics(tokens: Vec<Token>) -> Vec<Token> {
    let mut expanded = Vec::with_capacity(tokens.len());

    for token in tokens {
        let Some(caps) = CLITIC.captures(&token.text) else {
            expanded.push(token);
            continue;
        };
        let (Some(base), Some(clitic)) = (caps.name("base"), caps.name("clitic")) else {
            expanded.push(token);
            continue;
        };
        // "can't" vira "ca" + "n't", como no Penn Treebank.
        expanded.push(Token {
            text: base.as_str().to_string(),
            start: token.start,
            end: token.start + base.end(),
            index: 0,
        });
        expanded.push(Token {
            text: clitic.as_str().to_string(),
            start: token.start + clitic.start(),
            end: token.end,
            index: 0,
        });
    }

    expanded
}

fn tokenize_standard(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current_start = 0;
    let mut current_text = String::new();
    let chars: Vec<(usize, char)> = text.char_indices().collect();

    for (i, &(byte_pos, ch)) in chars.iter().enumerate() {
        if ch.is_alphanumeric() || (ch == '-' && !current_text.is_empty()) {
            if current_text.is_empty() {
                current_start = byte_pos;
            }
            current_text.push(ch);
        } else if ch == '.' && !current_text.is_empty() {
            let is_abbrev = ABBREVIATIONS.contains(&current_text.as_str());
            let current_is_num = current_text.chars().all(char::is_numeric);
            let next_is_num = chars.get(i + 1).map(|(_, c)| c.is_numeric()).unwrap_or(false);
            // "e.g." e "i.e.": ponto seguido de letra minúscula colada
            let next_is_lower = chars.get(i + 1).map(|(_, c)| c.is_lowercase()).unwrap_or(false);

            if is_abbrev || (current_is_num && next_is_num) || (current_text.len() == 1 && next_is_lower) {
                current_text.push('.');
            } else {
                flush_token(&mut tokens, &mut current_text, current_start, byte_pos);
                push_token(&mut tokens, ".".to_string(), byte_pos, byte_pos + 1);
            }
        } else if (ch == '\'' || ch == '\u{2019}') && !current_text.is_empty() {
            current_text.push(ch);
        } else if ch.is_whitespace() {
            flush_token(&mut tokens, &mut current_text, current_start, byte_pos);
        } else {
            flush_token(&mut tokens, &mut current_text, current_start, byte_pos);
            push_token(&mut tokens, ch.to_string(), byte_pos, byte_pos + ch.len_utf8());
        }
    }

    flush_token(&mut tokens, &mut current_text, current_start, text.len());
    tokens
}

/// Fecha o token acumulado e adiciona à lista (se não vazio)
fn flush_token(tokens: &mut Vec<Token>, text: &mut String, start: usize, end: usize) {
    if !text.is_empty() {
        tokens.push(Token {
            text: text.clone(),
            start,
            end,
            index: 0,
        });
        text.clear();
    }
}

fn push_token(tokens: &mut Vec<Token>, text: String, start: usize, end: usize) {
    tokens.push(Token {
        text,
        start,
        end,
        index: 0,
    });
}

/// Tokenizador baseado em regras, plugável no [`crate::linguistic::LinguisticPipeline`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleTokenizer {
    pub mode: TokenizerMode,
}

impl Tokenizer for RuleTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        tokenize_with_mode(text, self.mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_tokenize_sentence() {
        let tokens = tokenize("We need to discuss an important topic, please write to me soon.");
        assert_eq!(tokens.len(), 14);
        assert_eq!(tokens[7].text, ",");
        assert_eq!(tokens[8].text, "please");
        assert_eq!(tokens[13].text, ".");
    }

    #[test]
    fn test_offsets_point_into_text() {
        let text = "The bank raised its rates.";
        for token in tokenize(text) {
            assert_eq!(&text[token.start..token.end], token.text);
        }
    }

    #[test]
    fn test_abbreviation_kept() {
        let tokens = tokenize("Dr. Smith arrived.");
        assert_eq!(texts(&tokens), vec!["Dr.", "Smith", "arrived", "."]);
    }

    #[test]
    fn test_split_clitics() {
        let tokens = tokenize_with_mode("It's what we'll do", TokenizerMode::SplitClitics);
        assert_eq!(texts(&tokens), vec!["It", "'s", "what", "we", "'ll", "do"]);
        assert_eq!(tokens[1].start, 2);

        let standard = tokenize_with_mode("It's", TokenizerMode::Standard);
        assert_eq!(texts(&standard), vec!["It's"]);
    }

    #[test]
    fn test_decimal_number() {
        let tokens = tokenize("Rates rose 2.5 points.");
        assert!(texts(&tokens).contains(&"2.5"));
    }
}
