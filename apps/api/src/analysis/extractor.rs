//! Text Signal Extractor — keyword, skill and industry-term mining over free text.
//!
//! Matching is list-driven (see `keywords.rs`) plus two regex heuristics:
//! ALL-CAPS acronyms and short phrases following "experience with" and friends.
//! Every operation is pure and infallible once the extractor is built.

use std::collections::HashSet;

use regex::{Regex, RegexSet};

use crate::analysis::keywords::KeywordLists;

/// Characters treated as part of a term when checking term boundaries, so that
/// "Go" does not match inside "Google" and "C" does not match inside "C++".
const TERM_CHAR_CLASS: &str = "A-Za-z0-9+#";

/// Max words kept from an "experience with ..." style capture.
const MAX_PHRASE_WORDS: usize = 3;

/// Words that end a captured phrase early.
const PHRASE_STOP_WORDS: &[&str] = &["and", "or", "to", "for", "in", "with", "as", "is", "a", "the"];

/// Builds the boundary-aware pattern for a single term.
///
/// Terms of two characters or fewer are matched case-sensitively ("Go", "C#"),
/// longer terms case-insensitively.
pub fn term_pattern(term: &str) -> String {
    let flags = if term.chars().count() <= 2 { "" } else { "(?i)" };
    format!(
        "{flags}(?:^|[^{TERM_CHAR_CLASS}]){}(?:$|[^{TERM_CHAR_CLASS}])",
        regex::escape(term)
    )
}

/// Boundary-aware, case-insensitive containment test for a single term.
pub fn contains_term(text: &str, term: &str) -> Result<bool, regex::Error> {
    if term.trim().is_empty() {
        return Ok(false);
    }
    Ok(Regex::new(&term_pattern(term.trim()))?.is_match(text))
}

/// One keyword category compiled into a `RegexSet`; set indices map back to `terms`.
struct TermSet {
    terms: Vec<String>,
    set: RegexSet,
}

impl TermSet {
    fn new(terms: &[String]) -> Result<Self, regex::Error> {
        let terms: Vec<String> = terms
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        let set = RegexSet::new(terms.iter().map(|t| term_pattern(t)))?;
        Ok(Self { terms, set })
    }

    /// Matched terms in list order.
    fn matches(&self, text: &str) -> Vec<String> {
        let hits = self.set.matches(text);
        hits.iter().map(|i| self.terms[i].clone()).collect()
    }
}

/// Compiled extractor. Built once at startup from `KeywordLists` and shared via `AppState`.
pub struct SignalExtractor {
    technical: TermSet,
    soft: TermSet,
    industry: TermSet,
    acronym: Regex,
    phrase: Regex,
    acronym_stoplist: HashSet<String>,
}

impl SignalExtractor {
    pub fn new(lists: &KeywordLists) -> Result<Self, regex::Error> {
        let technical = TermSet::new(&lists.technical_skills)?;
        let soft = TermSet::new(&lists.soft_skills)?;
        let industry = TermSet::new(&lists.industry_terms)?;
        let acronym = Regex::new(r"\b[A-Z]{2,5}\b")?;
        let phrase = Regex::new(
            r"(?i)\b(?:experience with|knowledge of|proficient in)\s+([A-Za-z0-9+#./-]+(?:[ \t]+[A-Za-z0-9+#./-]+){0,4})",
        )?;
        let acronym_stoplist = lists
            .acronym_stoplist
            .iter()
            .map(|s| s.to_uppercase())
            .collect();

        Ok(Self {
            technical,
            soft,
            industry,
            acronym,
            phrase,
            acronym_stoplist,
        })
    }

    /// All signal in `text`: technical skills, soft skills, industry terms,
    /// acronyms, then "experience with" phrases. Deduplicated, first-seen order.
    pub fn extract_keywords(&self, text: &str) -> Vec<String> {
        let mut found = Vec::new();
        found.extend(self.technical.matches(text));
        found.extend(self.soft.matches(text));
        found.extend(self.industry.matches(text));
        found.extend(self.extract_acronyms(text));
        found.extend(self.extract_phrases(text));
        dedup_terms(found)
    }

    /// Technical and soft skills only.
    pub fn extract_skills(&self, text: &str) -> Vec<String> {
        let mut found = self.technical.matches(text);
        found.extend(self.soft.matches(text));
        dedup_terms(found)
    }

    pub fn extract_industry_keywords(&self, text: &str) -> Vec<String> {
        dedup_terms(self.industry.matches(text))
    }

    fn extract_acronyms(&self, text: &str) -> Vec<String> {
        self.acronym
            .find_iter(text)
            .filter(|m| !is_contraction_part(text, m.start(), m.end()))
            .map(|m| m.as_str().to_string())
            .filter(|a| !self.acronym_stoplist.contains(a))
            .collect()
    }

    fn extract_phrases(&self, text: &str) -> Vec<String> {
        self.phrase
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .filter_map(|m| clean_phrase(m.as_str()))
            .collect()
    }
}

/// True for the halves of "YOU'LL" or "DON'T": text touching an apostrophe.
fn is_contraction_part(text: &str, start: usize, end: usize) -> bool {
    let apostrophe = |c: char| matches!(c, '\'' | '’');
    text[..start].chars().next_back().is_some_and(apostrophe)
        || text[end..].chars().next().is_some_and(apostrophe)
}

/// Trims a captured phrase to its leading content words.
fn clean_phrase(raw: &str) -> Option<String> {
    let words: Vec<&str> = raw
        .split_whitespace()
        .take_while(|w| !PHRASE_STOP_WORDS.contains(&w.to_lowercase().as_str()))
        .take(MAX_PHRASE_WORDS)
        .collect();

    let phrase = words
        .join(" ")
        .trim_end_matches(|c: char| matches!(c, '.' | ',' | ';' | ':' | '/' | '-'))
        .to_string();

    if phrase.chars().count() < 2 {
        None
    } else {
        Some(phrase)
    }
}

/// Case-insensitive dedup that keeps the first spelling seen.
pub fn dedup_terms(terms: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    terms
        .into_iter()
        .filter(|t| seen.insert(t.to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> SignalExtractor {
        SignalExtractor::new(&KeywordLists::embedded().unwrap()).unwrap()
    }

    #[test]
    fn test_extracts_listed_skills_case_insensitively() {
        let found = extractor().extract_skills("Built apps with react and NODE.JS; strong communication.");
        assert!(found.contains(&"React".to_string()));
        assert!(found.contains(&"Node.js".to_string()));
        assert!(found.contains(&"Communication".to_string()));
    }

    #[test]
    fn test_short_terms_respect_boundaries_and_case() {
        let ex = extractor();
        let found = ex.extract_skills("Worked at Google, ready to go further");
        assert!(!found.contains(&"Go".to_string()));

        let found = ex.extract_skills("Services written in Go and C#");
        assert!(found.contains(&"Go".to_string()));
        assert!(found.contains(&"C#".to_string()));
    }

    #[test]
    fn test_cpp_does_not_match_plain_c() {
        let found = extractor().extract_skills("Experience in C++ systems");
        assert!(found.contains(&"C++".to_string()));
        assert!(!found.contains(&"C#".to_string()));
    }

    #[test]
    fn test_acronyms_extracted_and_stoplist_applied() {
        let found = extractor().extract_keywords("Familiarity with ETL, OKR planning AND the LLM stack");
        assert!(found.contains(&"ETL".to_string()));
        assert!(found.contains(&"OKR".to_string()));
        assert!(found.contains(&"LLM".to_string()));
        assert!(!found.contains(&"AND".to_string()));
    }

    #[test]
    fn test_posting_headings_and_contractions_are_not_acronyms() {
        let found = extractor().extract_keywords(
            "WHAT YOU'LL DO\nBuild APIs in Python.\nWHO YOU ARE\nNICE TO HAVE: AWS. DON’T apply via EMAIL",
        );
        for junk in ["WHAT", "YOU", "LL", "DO", "WHO", "ARE", "NICE", "TO", "HAVE", "DON", "T"] {
            assert!(!found.contains(&junk.to_string()), "{junk} in {found:?}");
        }
        assert!(found.contains(&"Python".to_string()));
        assert!(found.contains(&"AWS".to_string()));
        assert!(found.contains(&"EMAIL".to_string()));
    }

    #[test]
    fn test_phrase_patterns_capture_capped_length() {
        let found = extractor()
            .extract_keywords("Candidates need experience with event sourcing pipelines at scale and more.");
        assert!(
            found.contains(&"event sourcing pipelines".to_string()),
            "got {found:?}"
        );
    }

    #[test]
    fn test_phrase_stops_at_conjunction() {
        let found = extractor().extract_keywords("Knowledge of Snowflake and dbt is helpful.");
        assert!(found.contains(&"Snowflake".to_string()), "got {found:?}");
    }

    #[test]
    fn test_dedup_is_case_insensitive_and_keeps_first() {
        let found = extractor().extract_keywords("AWS is required. We use aws daily. AWS AWS.");
        let aws: Vec<_> = found.iter().filter(|k| k.eq_ignore_ascii_case("aws")).collect();
        assert_eq!(aws.len(), 1);
        assert_eq!(aws[0], "AWS");
    }

    #[test]
    fn test_industry_keywords() {
        let found = extractor().extract_industry_keywords("A fast-growing fintech SaaS startup using agile.");
        assert_eq!(found, vec!["Agile", "SaaS", "Fintech", "Startup"]);
    }

    #[test]
    fn test_empty_text_yields_nothing() {
        assert!(extractor().extract_keywords("").is_empty());
        assert!(extractor().extract_keywords("nothing relevant here").is_empty());
    }

    #[test]
    fn test_contains_term() {
        assert!(contains_term("Skills: JavaScript, React", "react").unwrap());
        assert!(!contains_term("Skills: JavaScript, React", "Java").unwrap());
        assert!(!contains_term("anything", "   ").unwrap());
    }
}
