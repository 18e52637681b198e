//! Token counting per model family, with a character-based fallback.

use std::collections::HashMap;
use std::path::Path;

use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

/// Tokenizer vocabularies the supported model families use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenizerFamily {
    Cl100k,
    O200k,
}

impl TokenizerFamily {
    pub fn for_model(model: &str) -> Self {
        let model = model.to_lowercase();
        if model.starts_with("gpt-4o") || model.starts_with("o1") {
            TokenizerFamily::O200k
        } else {
            TokenizerFamily::Cl100k
        }
    }

    /// File name expected inside `TOKENIZER_DIR`.
    pub fn file_name(&self) -> &'static str {
        match self {
            TokenizerFamily::Cl100k => "cl100k_base.json",
            TokenizerFamily::O200k => "o200k_base.json",
        }
    }
}

/// ceil(chars / 4).
pub fn estimate_tokens(text: &str) -> u32 {
    let chars = text.chars().count() as u32;
    chars.div_ceil(4)
}

#[derive(Default)]
pub struct TokenCounter {
    tokenizers: HashMap<TokenizerFamily, Tokenizer>,
}

impl TokenCounter {
    /// Counter without tokenizers; every count uses the character estimate.
    pub fn heuristic() -> Self {
        Self::default()
    }

    /// Loads whichever family tokenizers exist under `dir`. Missing or broken
    /// files are logged and skipped.
    pub fn from_dir(dir: &Path) -> Self {
        let mut tokenizers = HashMap::new();
        for family in [TokenizerFamily::Cl100k, TokenizerFamily::O200k] {
            let path = dir.join(family.file_name());
            match Tokenizer::from_file(&path) {
                Ok(tokenizer) => {
                    info!("Loaded {:?} tokenizer from {}", family, path.display());
                    tokenizers.insert(family, tokenizer);
                }
                Err(e) => warn!(
                    "Tokenizer {} unavailable ({e}); using character estimate for {:?}",
                    path.display(),
                    family
                ),
            }
        }
        Self { tokenizers }
    }

    pub fn load(dir: Option<&Path>) -> Self {
        dir.map(Self::from_dir).unwrap_or_default()
    }

    pub fn has_tokenizer(&self, family: TokenizerFamily) -> bool {
        self.tokenizers.contains_key(&family)
    }

    pub fn count(&self, model: &str, text: &str) -> u32 {
        let family = TokenizerFamily::for_model(model);
        let Some(tokenizer) = self.tokenizers.get(&family) else {
            return estimate_tokens(text);
        };
        match tokenizer.encode(text, false) {
            Ok(encoding) => encoding.len() as u32,
            Err(e) => {
                debug!("Tokenization failed for {model}: {e}; falling back to estimate");
                estimate_tokens(text)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_rounds_up() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abc"), 1);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
    }

    #[test]
    fn test_family_by_model() {
        assert_eq!(TokenizerFamily::for_model("gpt-4o-mini"), TokenizerFamily::O200k);
        assert_eq!(TokenizerFamily::for_model("gpt-4-turbo"), TokenizerFamily::Cl100k);
        assert_eq!(TokenizerFamily::for_model("gpt-3.5-turbo"), TokenizerFamily::Cl100k);
    }

    #[test]
    fn test_missing_dir_falls_back_to_estimate() {
        let dir = tempfile::tempdir().unwrap();
        let counter = TokenCounter::from_dir(dir.path());
        assert!(!counter.has_tokenizer(TokenizerFamily::Cl100k));
        assert_eq!(counter.count("gpt-4", "twelve chars"), 3);
    }

    #[test]
    fn test_heuristic_counter() {
        assert_eq!(TokenCounter::heuristic().count("gpt-4", "12345678"), 2);
    }
}
