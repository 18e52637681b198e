//! Job Analyzer — turns a raw job posting into a structured `JobProfile`.
//!
//! Heuristic only, no LLM call. Never fails: sections that are absent simply
//! produce empty lists.

use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analysis::extractor::{dedup_terms, SignalExtractor};

/// Structured requirement strings longer than this are not used verbatim as skills.
const MAX_VERBATIM_SKILL_WORDS: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceLevel {
    Entry,
    #[default]
    Mid,
    Senior,
}

impl ExperienceLevel {
    pub fn label(&self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "Entry-Level",
            ExperienceLevel::Mid => "Mid-Level",
            ExperienceLevel::Senior => "Senior-Level",
        }
    }
}

/// A job posting as stored for the user, or supplied inline by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
}

/// Derived, request-scoped view of a job. Never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobProfile {
    pub keywords: Vec<String>,
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub responsibilities: Vec<String>,
    pub qualifications: Vec<String>,
    pub company_name: String,
    pub job_title: String,
    pub experience_level: ExperienceLevel,
    pub industry_keywords: Vec<String>,
}

impl JobProfile {
    /// Required then preferred skills, deduplicated.
    pub fn all_skills(&self) -> Vec<String> {
        dedup_terms(
            self.required_skills
                .iter()
                .chain(self.preferred_skills.iter())
                .cloned()
                .collect(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionKind {
    Requirements,
    Responsibilities,
    Qualifications,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bucket {
    Required,
    Preferred,
}

#[derive(Debug, Default)]
struct Sections<'a> {
    requirements: Vec<&'a str>,
    responsibilities: Vec<&'a str>,
    qualifications: Vec<&'a str>,
    found_any: bool,
}

pub struct JobAnalyzer {
    extractor: Arc<SignalExtractor>,
    section_marker: Regex,
    clause_split: Regex,
    required_marker: Regex,
    preferred_marker: Regex,
    senior_marker: Regex,
    entry_marker: Regex,
    years: Regex,
}

impl JobAnalyzer {
    pub fn new(extractor: Arc<SignalExtractor>) -> Result<Self, regex::Error> {
        Ok(Self {
            extractor,
            section_marker: Regex::new(r"(?i)\b(requirements|responsibilities|qualifications)\s*:")?,
            clause_split: Regex::new(r"\n|[.;]\s+")?,
            required_marker: Regex::new(r"(?i)\b(?:required|must[- ]have|minimum)\b")?,
            preferred_marker: Regex::new(r"(?i)\b(?:preferred|nice[- ]to[- ]have|plus|bonus)\b")?,
            senior_marker: Regex::new(r"(?i)\b(?:senior|lead|principal|staff)\b|\bsr\.?(?:\s|$)")?,
            entry_marker: Regex::new(
                r"(?i)\b(?:entry[- ]level|junior|graduate|intern|internship)\b|\bjr\.?(?:\s|$)",
            )?,
            // A range such as "3-5 years" counts by its lower bound.
            years: Regex::new(r"(?i)\b(\d{1,2})\s*\+?\s*(?:[-–]\s*\d{1,2}\s*)?\+?\s*years?\b")?,
        })
    }

    /// Builds the `JobProfile` for a posting.
    pub fn analyze(&self, posting: &JobPosting) -> JobProfile {
        let sections = self.split_sections(&posting.description);

        // Structured requirement strings first, then the description's own requirement lines.
        let mut required = Vec::new();
        let mut preferred = Vec::new();

        for requirement in &posting.requirements {
            for clause in self.clauses(requirement) {
                let skills = self.skills_for_line(clause, true);
                match self.classify(clause) {
                    Bucket::Required => required.extend(skills),
                    Bucket::Preferred => preferred.extend(skills),
                }
            }
        }

        let description_lines: Vec<&str> = if sections.found_any {
            sections
                .requirements
                .iter()
                .chain(sections.qualifications.iter())
                .copied()
                .collect()
        } else {
            vec![posting.description.as_str()]
        };

        for line in description_lines {
            for clause in self.clauses(line) {
                let skills = self.skills_for_line(clause, false);
                match self.classify(clause) {
                    Bucket::Required => required.extend(skills),
                    Bucket::Preferred => preferred.extend(skills),
                }
            }
        }

        let required_skills = dedup_terms(required);
        let preferred_skills: Vec<String> = dedup_terms(preferred)
            .into_iter()
            .filter(|p| !required_skills.iter().any(|r| r.eq_ignore_ascii_case(p)))
            .collect();

        let full_text = format!("{}\n{}", posting.title, posting.description);
        let requirements_text = posting.requirements.join("\n");

        let mut keywords: Vec<String> = required_skills
            .iter()
            .chain(preferred_skills.iter())
            .cloned()
            .collect();
        keywords.extend(self.extractor.extract_keywords(&full_text));
        keywords.extend(self.extractor.extract_keywords(&requirements_text));

        let level_text = format!("{full_text}\n{requirements_text}");
        let experience_level = self
            .detect_level(&posting.title)
            .unwrap_or_else(|| self.determine_experience_level(&level_text));

        JobProfile {
            keywords: dedup_terms(keywords),
            required_skills,
            preferred_skills,
            responsibilities: sections.responsibilities.iter().map(|s| s.to_string()).collect(),
            qualifications: sections.qualifications.iter().map(|s| s.to_string()).collect(),
            company_name: posting.company.trim().to_string(),
            job_title: posting.title.trim().to_string(),
            experience_level,
            industry_keywords: self.extractor.extract_industry_keywords(&full_text),
        }
    }

    /// Infers the level from phrases such as "senior", "junior" or "5+ years".
    /// Mid when nothing conclusive is found.
    pub fn determine_experience_level(&self, text: &str) -> ExperienceLevel {
        self.detect_level(text).unwrap_or_default()
    }

    fn detect_level(&self, text: &str) -> Option<ExperienceLevel> {
        if self.senior_marker.is_match(text) {
            return Some(ExperienceLevel::Senior);
        }

        let max_years = self
            .years
            .captures_iter(text)
            .filter_map(|c| c.get(1)?.as_str().parse::<u32>().ok())
            .max();

        if matches!(max_years, Some(y) if y >= 5) {
            return Some(ExperienceLevel::Senior);
        }
        if self.entry_marker.is_match(text) {
            return Some(ExperienceLevel::Entry);
        }
        match max_years {
            Some(y) if y <= 2 => Some(ExperienceLevel::Entry),
            Some(_) => Some(ExperienceLevel::Mid),
            None => None,
        }
    }

    /// Required markers win over preferred ones; unmarked lines count as required.
    fn classify(&self, line: &str) -> Bucket {
        if self.required_marker.is_match(line) {
            Bucket::Required
        } else if self.preferred_marker.is_match(line) {
            Bucket::Preferred
        } else {
            Bucket::Required
        }
    }

    fn skills_for_line(&self, line: &str, structured: bool) -> Vec<String> {
        let skills = self.extractor.extract_skills(line);
        if !skills.is_empty() || !structured {
            return skills;
        }

        let verbatim = line.trim().trim_end_matches(['.', ',', ';']);
        let words = verbatim.split_whitespace().count();
        if words > 0 && words <= MAX_VERBATIM_SKILL_WORDS {
            vec![verbatim.to_string()]
        } else {
            Vec::new()
        }
    }

    fn clauses<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.clause_split
            .split(text)
            .map(clean_line)
            .filter(|l| !l.is_empty())
            .collect()
    }

    fn split_sections<'a>(&self, description: &'a str) -> Sections<'a> {
        let markers: Vec<(SectionKind, usize, usize)> = self
            .section_marker
            .captures_iter(description)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let kind = match caps.get(1)?.as_str().to_lowercase().as_str() {
                    "requirements" => SectionKind::Requirements,
                    "responsibilities" => SectionKind::Responsibilities,
                    _ => SectionKind::Qualifications,
                };
                Some((kind, whole.start(), whole.end()))
            })
            .collect();

        let mut sections = Sections {
            found_any: !markers.is_empty(),
            ..Default::default()
        };

        for (i, (kind, _, body_start)) in markers.iter().enumerate() {
            let body_end = markers
                .get(i + 1)
                .map(|(_, next_start, _)| *next_start)
                .unwrap_or(description.len());
            let lines = description[*body_start..body_end]
                .lines()
                .map(clean_line)
                .filter(|l| !l.is_empty());

            match kind {
                SectionKind::Requirements => sections.requirements.extend(lines),
                SectionKind::Responsibilities => sections.responsibilities.extend(lines),
                SectionKind::Qualifications => sections.qualifications.extend(lines),
            }
        }

        sections
    }
}

/// Strips bullets, numbering and surrounding whitespace from a line.
fn clean_line(line: &str) -> &str {
    let line = line
        .trim()
        .trim_start_matches(['-', '*', '•', '·', '◦', '▪', '–'])
        .trim_start();
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 && line[digits..].starts_with(['.', ')']) {
        line[digits + 1..].trim()
    } else {
        line.trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::keywords::KeywordLists;

    fn analyzer() -> JobAnalyzer {
        let extractor = SignalExtractor::new(&KeywordLists::embedded().unwrap()).unwrap();
        JobAnalyzer::new(Arc::new(extractor)).unwrap()
    }

    const SECTIONED_JD: &str = "We build payments infrastructure for fintech companies.\n\
        Responsibilities:\n\
        - Design and ship backend services\n\
        - Mentor engineers\n\
        Requirements:\n\
        - Python and PostgreSQL required\n\
        - Docker experience\n\
        - Kubernetes is a plus\n\
        Qualifications:\n\
        - Bachelor's degree in Computer Science\n";

    #[test]
    fn test_sections_are_localized() {
        let profile = analyzer().analyze(&JobPosting {
            title: "Backend Engineer".to_string(),
            company: "Acme Pay".to_string(),
            description: SECTIONED_JD.to_string(),
            requirements: vec![],
        });

        assert_eq!(
            profile.responsibilities,
            vec!["Design and ship backend services", "Mentor engineers"]
        );
        assert_eq!(profile.qualifications, vec!["Bachelor's degree in Computer Science"]);
        assert_eq!(profile.required_skills, vec!["Python", "PostgreSQL", "Docker"]);
        assert_eq!(profile.preferred_skills, vec!["Kubernetes"]);
        assert_eq!(profile.company_name, "Acme Pay");
        assert!(profile.industry_keywords.contains(&"Fintech".to_string()));
    }

    #[test]
    fn test_missing_sections_yield_empty_lists() {
        let profile = analyzer().analyze(&JobPosting {
            title: "Engineer".to_string(),
            description: "Join us to work on React frontends. TypeScript preferred.".to_string(),
            ..Default::default()
        });
        assert!(profile.responsibilities.is_empty());
        assert!(profile.qualifications.is_empty());
        // Whole-text fallback still buckets skills.
        assert_eq!(profile.required_skills, vec!["React"]);
        assert_eq!(profile.preferred_skills, vec!["TypeScript"]);
    }

    #[test]
    fn test_empty_posting_never_fails() {
        let profile = analyzer().analyze(&JobPosting::default());
        assert!(profile.keywords.is_empty());
        assert!(profile.required_skills.is_empty());
        assert_eq!(profile.experience_level, ExperienceLevel::Mid);
    }

    #[test]
    fn test_structured_requirements_bucketed() {
        let profile = analyzer().analyze(&JobPosting {
            title: "Frontend Developer".to_string(),
            requirements: vec![
                "React".to_string(),
                "Node.js (must have)".to_string(),
                "GraphQL nice to have".to_string(),
                "Storybook".to_string(),
            ],
            ..Default::default()
        });
        assert_eq!(profile.required_skills, vec!["React", "Node.js", "Storybook"]);
        assert_eq!(profile.preferred_skills, vec!["GraphQL"]);
        assert_eq!(profile.keywords[..4], ["React", "Node.js", "Storybook", "GraphQL"]);
    }

    #[test]
    fn test_required_marker_wins_over_preferred() {
        let profile = analyzer().analyze(&JobPosting {
            title: "Engineer".to_string(),
            requirements: vec!["AWS required, Azure a plus".to_string()],
            ..Default::default()
        });
        assert_eq!(profile.required_skills, vec!["AWS", "Azure"]);
        assert!(profile.preferred_skills.is_empty());
    }

    #[test]
    fn test_five_plus_years_is_senior() {
        let a = analyzer();
        assert_eq!(
            a.determine_experience_level("You have 5+ years of backend experience"),
            ExperienceLevel::Senior
        );
    }

    #[test]
    fn test_level_detection_variants() {
        let a = analyzer();
        assert_eq!(a.determine_experience_level("Senior Rust Engineer"), ExperienceLevel::Senior);
        assert_eq!(a.determine_experience_level("Junior developer role"), ExperienceLevel::Entry);
        assert_eq!(a.determine_experience_level("0-2 years of experience"), ExperienceLevel::Entry);
        assert_eq!(a.determine_experience_level("3-4 years with Go"), ExperienceLevel::Mid);
        assert_eq!(a.determine_experience_level("3-5 years of SQL"), ExperienceLevel::Mid);
        assert_eq!(a.determine_experience_level("6 yearly offsites"), ExperienceLevel::Mid);
        assert_eq!(a.determine_experience_level("Software Engineer"), ExperienceLevel::Mid);
    }

    #[test]
    fn test_title_level_takes_precedence() {
        let profile = analyzer().analyze(&JobPosting {
            title: "Junior Data Analyst".to_string(),
            description: "You will support the senior analytics lead.".to_string(),
            ..Default::default()
        });
        assert_eq!(profile.experience_level, ExperienceLevel::Entry);
    }

    #[test]
    fn test_clean_line_strips_bullets_and_numbers() {
        assert_eq!(clean_line("  - Ship code"), "Ship code");
        assert_eq!(clean_line("• Ship code"), "Ship code");
        assert_eq!(clean_line("2. Ship code"), "Ship code");
        assert_eq!(clean_line("2020 was great"), "2020 was great");
    }

    #[test]
    fn test_experience_level_serde() {
        let json = serde_json::to_string(&ExperienceLevel::Senior).unwrap();
        assert_eq!(json, "\"Senior\"");
    }
}
