//! Match Scoring — weighted compatibility between a candidate document and a `JobProfile`.
//!
//! Default: `KeywordMatchScorer` (pure-Rust, deterministic, fully testable).
//! `AppState` holds an `Arc<dyn MatchScorer>`.
//!
//! overall = round(0.4·keyword + 0.3·skills + 0.2·experience + 0.1·education)

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::analysis::extractor::contains_term;
use crate::analysis::job_analyzer::{ExperienceLevel, JobProfile};
use crate::analysis::keywords::KeywordLists;

/// Component used when the job lists no keywords at all.
const NEUTRAL_KEYWORD_SCORE: u32 = 70;
/// Component used when the job lists no skills; absence of data is not penalized.
const NO_SKILLS_SCORE: u32 = 80;
const EXPERIENCE_BASELINE: u32 = 80;
const SENIOR_EXPERIENCE_BOOST: u32 = 95;
const LEVEL_EXPERIENCE_BOOST: u32 = 90;
const EDUCATION_FOUND: u32 = 100;
const EDUCATION_MISSING: u32 = 70;
const FALLBACK_COMPONENT: u32 = 70;

/// Components below this produce a suggestion.
const SUGGESTION_THRESHOLD: u32 = 70;
const MAX_SUGGESTED_TERMS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchScore {
    pub overall_score: u32,
    pub keyword_match: u32,
    pub skills_match: u32,
    pub experience_match: u32,
    pub education_match: u32,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub suggestions: Vec<String>,
    /// Set only when scoring failed and the fallback values were used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degraded: Option<String>,
}

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("failed to build term matcher: {0}")]
    Pattern(#[from] regex::Error),
}

/// The match scorer trait. Implement this to swap backends without touching
/// the pipeline or handlers.
pub trait MatchScorer: Send + Sync {
    /// Never fails; degraded results are flagged through `MatchScore::degraded`.
    fn score(&self, content: &str, profile: &JobProfile) -> MatchScore;

    fn backend(&self) -> &'static str;
}

/// Weighted sum of the four components, rounded half up.
pub fn overall_score(keyword: u32, skills: u32, experience: u32, education: u32) -> u32 {
    (4 * keyword + 3 * skills + 2 * experience + education + 5) / 10
}

/// round(100·matched/total), except that any match scores at least 1.
fn percentage(matched: usize, total: usize) -> u32 {
    if matched == 0 || total == 0 {
        return 0;
    }
    let rounded = (200 * matched + total) / (2 * total);
    rounded.clamp(1, 100) as u32
}

fn partition_terms(
    content: &str,
    terms: &[String],
) -> Result<(Vec<String>, Vec<String>), ScoringError> {
    let mut matched = Vec::new();
    let mut missing = Vec::new();
    for term in terms {
        if contains_term(content, term)? {
            matched.push(term.clone());
        } else {
            missing.push(term.clone());
        }
    }
    Ok((matched, missing))
}

fn any_term(content: &str, terms: &[String]) -> Result<bool, ScoringError> {
    for term in terms {
        if contains_term(content, term)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Fixed result used when scoring fails: every component 70, every job keyword missing.
pub fn fallback_score(profile: &JobProfile, reason: String) -> MatchScore {
    MatchScore {
        overall_score: overall_score(
            FALLBACK_COMPONENT,
            FALLBACK_COMPONENT,
            FALLBACK_COMPONENT,
            FALLBACK_COMPONENT,
        ),
        keyword_match: FALLBACK_COMPONENT,
        skills_match: FALLBACK_COMPONENT,
        experience_match: FALLBACK_COMPONENT,
        education_match: FALLBACK_COMPONENT,
        matched_keywords: vec![],
        missing_keywords: profile.keywords.clone(),
        suggestions: vec![],
        degraded: Some(reason),
    }
}

/// Keyword-list scorer. Education and level vocabularies come from `KeywordLists`.
pub struct KeywordMatchScorer {
    lists: KeywordLists,
}

impl KeywordMatchScorer {
    pub fn new(lists: KeywordLists) -> Self {
        Self { lists }
    }

    fn level_terms(&self, level: ExperienceLevel) -> &[String] {
        match level {
            ExperienceLevel::Entry => &self.lists.level_terms.entry,
            ExperienceLevel::Mid => &self.lists.level_terms.mid,
            ExperienceLevel::Senior => &self.lists.level_terms.senior,
        }
    }

    pub fn try_score(&self, content: &str, profile: &JobProfile) -> Result<MatchScore, ScoringError> {
        let (matched_keywords, missing_keywords) = partition_terms(content, &profile.keywords)?;
        let keyword_match = if profile.keywords.is_empty() {
            NEUTRAL_KEYWORD_SCORE
        } else {
            percentage(matched_keywords.len(), profile.keywords.len())
        };

        let skills = profile.all_skills();
        let (matched_skills, missing_skills) = partition_terms(content, &skills)?;
        let skills_match = if skills.is_empty() {
            NO_SKILLS_SCORE
        } else {
            percentage(matched_skills.len(), skills.len())
        };

        let level = profile.experience_level;
        let experience_match = if any_term(content, self.level_terms(level))? {
            match level {
                ExperienceLevel::Senior => SENIOR_EXPERIENCE_BOOST,
                ExperienceLevel::Mid | ExperienceLevel::Entry => LEVEL_EXPERIENCE_BOOST,
            }
        } else {
            EXPERIENCE_BASELINE
        };

        let education_match = if any_term(content, &self.lists.education_terms)? {
            EDUCATION_FOUND
        } else {
            EDUCATION_MISSING
        };

        let suggestions = self.build_suggestions(
            keyword_match,
            skills_match,
            experience_match,
            education_match,
            &missing_keywords,
            &missing_skills,
            level,
        );

        Ok(MatchScore {
            overall_score: overall_score(keyword_match, skills_match, experience_match, education_match),
            keyword_match,
            skills_match,
            experience_match,
            education_match,
            matched_keywords,
            missing_keywords,
            suggestions,
            degraded: None,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn build_suggestions(
        &self,
        keyword_match: u32,
        skills_match: u32,
        experience_match: u32,
        education_match: u32,
        missing_keywords: &[String],
        missing_skills: &[String],
        level: ExperienceLevel,
    ) -> Vec<String> {
        let mut suggestions = Vec::new();

        if keyword_match < SUGGESTION_THRESHOLD && !missing_keywords.is_empty() {
            suggestions.push(format!(
                "Add these missing keywords where they reflect your experience: {}.",
                top_terms(missing_keywords)
            ));
        }
        if skills_match < SUGGESTION_THRESHOLD && !missing_skills.is_empty() {
            suggestions.push(format!(
                "Highlight these job skills if you have them: {}.",
                top_terms(missing_skills)
            ));
        }
        if experience_match < LEVEL_EXPERIENCE_BOOST {
            let examples: Vec<&str> = self
                .level_terms(level)
                .iter()
                .take(3)
                .map(String::as_str)
                .collect();
            suggestions.push(format!(
                "Emphasize achievements that fit a {} role{}.",
                level.label(),
                if examples.is_empty() {
                    String::new()
                } else {
                    format!(", using verbs like {}", examples.join(", "))
                }
            ));
        }
        if education_match < EDUCATION_FOUND {
            suggestions.push(
                "Add an EDUCATION section listing your degree, school or relevant certifications."
                    .to_string(),
            );
        }

        suggestions
    }
}

fn top_terms(terms: &[String]) -> String {
    terms
        .iter()
        .take(MAX_SUGGESTED_TERMS)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ")
}

impl MatchScorer for KeywordMatchScorer {
    fn score(&self, content: &str, profile: &JobProfile) -> MatchScore {
        match self.try_score(content, profile) {
            Ok(score) => score,
            Err(e) => {
                warn!("Match scoring degraded, using fallback score: {e}");
                fallback_score(profile, e.to_string())
            }
        }
    }

    fn backend(&self) -> &'static str {
        "keyword"
    }
}
