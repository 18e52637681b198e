//! ATS Optimizer — plain-text post-processing of generated resumes.
//!
//! Steps, in order:
//! 1. append up to `MAX_INSERTED_KEYWORDS` missing job keywords to the Skills section
//! 2. normalize section header synonyms to canonical headers
//! 3. replace typographic bullets, dashes and quotes with ASCII
//! 4. reduce `MM/YYYY` dates to `YYYY`
//!
//! The transformation is idempotent and fail-open: on any internal error the
//! original content is returned unchanged.

use regex::{Captures, Regex};
use tracing::{debug, warn};

use crate::analysis::extractor::contains_term;
use crate::analysis::job_analyzer::JobProfile;

/// Only the first N job keywords are considered for insertion.
pub const MAX_INSERTED_KEYWORDS: usize = 15;

const EXPERIENCE_HEADER: &str = "PROFESSIONAL EXPERIENCE";
const EDUCATION_HEADER: &str = "EDUCATION";
const SKILLS_HEADER: &str = "SKILLS";
const SUMMARY_HEADER: &str = "PROFESSIONAL SUMMARY";
const PROJECTS_HEADER: &str = "PROJECTS";
const CERTIFICATIONS_HEADER: &str = "CERTIFICATIONS";

/// Lowercased header synonyms → canonical header. Canonical forms map to themselves.
const HEADER_SYNONYMS: &[(&str, &str)] = &[
    ("professional experience", EXPERIENCE_HEADER),
    ("work history", EXPERIENCE_HEADER),
    ("work experience", EXPERIENCE_HEADER),
    ("employment history", EXPERIENCE_HEADER),
    ("employment", EXPERIENCE_HEADER),
    ("experience", EXPERIENCE_HEADER),
    ("career history", EXPERIENCE_HEADER),
    ("relevant experience", EXPERIENCE_HEADER),
    ("education", EDUCATION_HEADER),
    ("academic background", EDUCATION_HEADER),
    ("educational background", EDUCATION_HEADER),
    ("education and training", EDUCATION_HEADER),
    ("skills", SKILLS_HEADER),
    ("technical skills", SKILLS_HEADER),
    ("key skills", SKILLS_HEADER),
    ("core skills", SKILLS_HEADER),
    ("core competencies", SKILLS_HEADER),
    ("areas of expertise", SKILLS_HEADER),
    ("skills summary", SKILLS_HEADER),
    ("professional summary", SUMMARY_HEADER),
    ("summary", SUMMARY_HEADER),
    ("profile", SUMMARY_HEADER),
    ("professional profile", SUMMARY_HEADER),
    ("objective", SUMMARY_HEADER),
    ("career objective", SUMMARY_HEADER),
    ("about me", SUMMARY_HEADER),
    ("projects", PROJECTS_HEADER),
    ("personal projects", PROJECTS_HEADER),
    ("key projects", PROJECTS_HEADER),
    ("certifications", CERTIFICATIONS_HEADER),
    ("certificates", CERTIFICATIONS_HEADER),
    ("licenses and certifications", CERTIFICATIONS_HEADER),
    ("licenses & certifications", CERTIFICATIONS_HEADER),
];

pub struct AtsOptimizer {
    month_year: Regex,
}

impl AtsOptimizer {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            // The leading group rules out the tail of a full M/D/YYYY date.
            month_year: Regex::new(r"(^|[^\d/])(?:0?[1-9]|1[0-2])/((?:19|20)\d{2})\b")?,
        })
    }

    /// Optimizes `content` for ATS parsing. Never fails.
    pub fn optimize(&self, content: &str, profile: &JobProfile) -> String {
        match self.try_optimize(content, profile) {
            Ok(optimized) => optimized,
            Err(e) => {
                warn!("ATS optimization skipped, returning original content: {e}");
                content.to_string()
            }
        }
    }

    fn try_optimize(&self, content: &str, profile: &JobProfile) -> Result<String, regex::Error> {
        let with_keywords = insert_missing_keywords(content, &profile.keywords)?;
        let headers = normalize_headers(&with_keywords);
        let characters = normalize_characters(&headers);
        Ok(self.normalize_dates(&characters))
    }

    /// `MM/YYYY` → `YYYY`. Full dates such as `12/1/2020` are left alone.
    pub fn normalize_dates(&self, content: &str) -> String {
        self.month_year
            .replace_all(content, |caps: &Captures| {
                let whole = &caps[0];
                let end = caps.get(0).map_or(content.len(), |m| m.end());
                if content[end..].starts_with('/') {
                    whole.to_string()
                } else {
                    format!("{}{}", &caps[1], &caps[2])
                }
            })
            .into_owned()
    }
}

fn canonical_header(text: &str) -> Option<&'static str> {
    let key = text
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    HEADER_SYNONYMS
        .iter()
        .find(|(synonym, _)| *synonym == key)
        .map(|(_, canonical)| *canonical)
}

/// If `line` opens a Skills section, returns whatever follows the heading.
fn skills_heading_rest(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    let (head, rest) = match trimmed.find(':') {
        Some(i) => (&trimmed[..i], &trimmed[i + 1..]),
        None => (trimmed, ""),
    };
    (canonical_header(head) == Some(SKILLS_HEADER)).then_some(rest)
}

/// Appends absent keywords to the first Skills heading. No heading, no change.
pub fn insert_missing_keywords(content: &str, keywords: &[String]) -> Result<String, regex::Error> {
    let mut missing: Vec<String> = Vec::new();
    for keyword in keywords.iter().take(MAX_INSERTED_KEYWORDS) {
        let keyword = normalize_characters(keyword.trim());
        if keyword.is_empty() || missing.iter().any(|m| m.eq_ignore_ascii_case(&keyword)) {
            continue;
        }
        if !contains_term(content, &keyword)? {
            missing.push(keyword);
        }
    }

    if missing.is_empty() {
        return Ok(content.to_string());
    }

    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        let body = line.trim_end_matches(['\r', '\n']);
        if let Some(rest) = skills_heading_rest(body) {
            let line_end = offset + body.len();
            let addition = missing.join(", ");
            debug!("Inserting {} missing keywords into skills section", missing.len());

            let mut out = String::with_capacity(content.len() + addition.len() + 2);
            if rest.trim().is_empty() {
                let newline = if line.ends_with("\r\n") { "\r\n" } else { "\n" };
                out.push_str(&content[..line_end]);
                out.push_str(newline);
                out.push_str(&addition);
            } else {
                let kept = body.trim_end_matches([' ', '\t', ',', ';', '.']);
                out.push_str(&content[..offset + kept.len()]);
                out.push_str(", ");
                out.push_str(&addition);
            }
            out.push_str(&content[line_end..]);
            return Ok(out);
        }
        offset += line.len();
    }

    Ok(content.to_string())
}

/// Replaces whole-line section headers (optionally ending in ':') with canonical ones.
pub fn normalize_headers(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for line in content.split_inclusive('\n') {
        let body = line.trim_end_matches(['\r', '\n']);
        let ending = &line[body.len()..];
        let candidate = body.trim().trim_end_matches(':');
        match canonical_header(candidate) {
            Some(canonical) if !candidate.is_empty() => {
                out.push_str(canonical);
                out.push_str(ending);
            }
            _ => out.push_str(line),
        }
    }
    out
}

/// Typographic punctuation → ASCII.
pub fn normalize_characters(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for c in content.chars() {
        match c {
            '•' | '●' | '◦' | '▪' | '■' | '►' | '▸' | '‣' | '⁃' | '✓' | '✔' => out.push('-'),
            '–' | '—' | '―' | '‐' | '‑' => out.push('-'),
            '“' | '”' | '„' | '″' => out.push('"'),
            '‘' | '’' | '‚' | '′' => out.push('\''),
            '…' => out.push_str("..."),
            '\u{00A0}' => out.push(' '),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(keywords: &[&str]) -> JobProfile {
        JobProfile {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            ..Default::default()
        }
    }

    fn optimizer() -> AtsOptimizer {
        AtsOptimizer::new().unwrap()
    }

    #[test]
    fn test_missing_keywords_appended_to_skills_line() {
        let out = optimizer().optimize(
            "Skills: JavaScript, React\nExperience:\nDeveloper at Acme",
            &profile(&["React", "TypeScript", "AWS"]),
        );
        assert_eq!(
            out,
            "Skills: JavaScript, React, TypeScript, AWS\nPROFESSIONAL EXPERIENCE\nDeveloper at Acme"
        );
    }

    #[test]
    fn test_heading_only_gets_new_line() {
        let out = insert_missing_keywords(
            "SKILLS\nPython, SQL\n",
            &["Python".to_string(), "Docker".to_string()],
        )
        .unwrap();
        assert_eq!(out, "SKILLS\nDocker\nPython, SQL\n");
    }

    #[test]
    fn test_no_skills_heading_no_insertion() {
        let content = "Summary\nBuilt things.";
        let out = insert_missing_keywords(content, &["Kafka".to_string()]).unwrap();
        assert_eq!(out, content);
    }

    #[test]
    fn test_only_top_fifteen_keywords_considered() {
        let keywords: Vec<String> = (0..20).map(|i| format!("Tool{i}")).collect();
        let out = insert_missing_keywords("Skills: Rust", &keywords).unwrap();
        assert!(out.contains("Tool14"));
        assert!(!out.contains("Tool15"));
    }

    #[test]
    fn test_header_synonyms_normalized() {
        let out = normalize_headers("Work History\nAcme\neducation:\nState U\nCore Competencies\n");
        assert_eq!(out, "PROFESSIONAL EXPERIENCE\nAcme\nEDUCATION\nState U\nSKILLS\n");
    }

    #[test]
    fn test_header_with_content_untouched() {
        assert_eq!(normalize_headers("Experience: 5 years"), "Experience: 5 years");
    }

    #[test]
    fn test_typographic_characters_replaced() {
        let out = normalize_characters("• Led “Project X” — shipped… it’s done");
        assert_eq!(out, "- Led \"Project X\" - shipped... it's done");
    }

    #[test]
    fn test_month_year_dates_reduced() {
        let out = optimizer().normalize_dates("Acme 01/2019 - 12/2021, 3/2022; 12/31/2020");
        assert_eq!(out, "Acme 2019 - 2021, 2022; 12/31/2020");
    }

    #[test]
    fn test_full_dates_left_alone() {
        let o = optimizer();
        assert_eq!(o.normalize_dates("Certified 12/1/2020"), "Certified 12/1/2020");
        assert_eq!(o.normalize_dates("Started 3/12/2020."), "Started 3/12/2020.");
        assert_eq!(o.normalize_dates("(05/2019)-06/2020"), "(2019)-2020");
        assert_eq!(o.normalize_dates("04/2021/x"), "04/2021/x");
    }

    #[test]
    fn test_optimize_is_idempotent() {
        let content = "Jane Doe\n\nProfessional Summary:\nEngineer.\n\nTechnical Skills:\n• Python, SQL\n\n\
            Work Experience\n• Built ETL – 05/2019 to 08/2021\n\nEducation\nB.S. “CS” 2018\n\
            Certified 12/1/2020, renewed 3/12/2020\n";
        let p = profile(&["Python", "Airflow", "dbt", "AWS", "Spark"]);
        let o = optimizer();
        let once = o.optimize(content, &p);
        let twice = o.optimize(&once, &p);
        assert_eq!(once, twice);
        assert!(once.contains("SKILLS\nAirflow, dbt, AWS, Spark\n"));
        assert!(once.contains("2019 to 2021"));
        assert!(once.contains("Certified 12/1/2020, renewed 3/12/2020"));
    }

    #[test]
    fn test_empty_content_is_returned_unchanged() {
        assert_eq!(optimizer().optimize("", &profile(&["Rust"])), "");
    }
}
