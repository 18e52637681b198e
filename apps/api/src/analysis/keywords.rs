//! Keyword lists — the tunable vocabulary behind extraction and scoring.
//!
//! The default lists ship embedded from `keywords.toml`; deployments can point
//! `KEYWORD_LISTS_PATH` at their own copy to tune matching without a rebuild.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_KEYWORD_LISTS: &str = include_str!("../../keywords.toml");

#[derive(Debug, Error)]
pub enum KeywordListError {
    #[error("failed to read keyword lists from {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid keyword list TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("keyword list '{0}' must not be empty")]
    EmptyList(&'static str),
}

/// Terms that signal work appropriate to each experience level.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelTerms {
    pub entry: Vec<String>,
    pub mid: Vec<String>,
    pub senior: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordLists {
    pub technical_skills: Vec<String>,
    pub soft_skills: Vec<String>,
    pub industry_terms: Vec<String>,
    pub education_terms: Vec<String>,
    #[serde(default)]
    pub acronym_stoplist: Vec<String>,
    #[serde(default)]
    pub level_terms: LevelTerms,
}

impl KeywordLists {
    /// The lists compiled into the binary.
    pub fn embedded() -> Result<Self, KeywordListError> {
        Self::from_toml(DEFAULT_KEYWORD_LISTS)
    }

    pub fn from_toml(source: &str) -> Result<Self, KeywordListError> {
        let lists: KeywordLists = toml::from_str(source)?;
        lists.validate()?;
        Ok(lists)
    }

    pub fn from_file(path: &Path) -> Result<Self, KeywordListError> {
        let source = std::fs::read_to_string(path).map_err(|source| KeywordListError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&source)
    }

    /// Loads from `path` when given, otherwise the embedded defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, KeywordListError> {
        match path {
            Some(p) => Self::from_file(p),
            None => Self::embedded(),
        }
    }

    fn validate(&self) -> Result<(), KeywordListError> {
        if self.technical_skills.is_empty() {
            return Err(KeywordListError::EmptyList("technical_skills"));
        }
        if self.education_terms.is_empty() {
            return Err(KeywordListError::EmptyList("education_terms"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_lists_parse() {
        let lists = KeywordLists::embedded().unwrap();
        assert!(lists.technical_skills.iter().any(|s| s == "React"));
        assert!(lists.soft_skills.iter().any(|s| s == "Leadership"));
        assert!(lists.industry_terms.iter().any(|s| s == "Agile"));
        assert!(!lists.level_terms.senior.is_empty());
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
technical_skills = ["Zig"]
soft_skills = []
industry_terms = []
education_terms = ["Degree"]
"#
        )
        .unwrap();

        let lists = KeywordLists::load(Some(file.path())).unwrap();
        assert_eq!(lists.technical_skills, vec!["Zig".to_string()]);
        assert!(lists.acronym_stoplist.is_empty());
        assert!(lists.level_terms.mid.is_empty());
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = KeywordLists::from_file(Path::new("/nonexistent/keywords.toml")).unwrap_err();
        assert!(matches!(err, KeywordListError::Read { .. }));
    }

    #[test]
    fn test_empty_technical_list_rejected() {
        let err = KeywordLists::from_toml(
            r#"
technical_skills = []
soft_skills = []
industry_terms = []
education_terms = ["Degree"]
"#,
        )
        .unwrap_err();
        assert!(matches!(err, KeywordListError::EmptyList("technical_skills")));
    }
}
