//! Tone calibration — maps the requested writing tone to prompt guidance.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    #[default]
    Professional,
    Enthusiastic,
    Confident,
    Conversational,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Professional => "professional",
            Tone::Enthusiastic => "enthusiastic",
            Tone::Confident => "confident",
            Tone::Conversational => "conversational",
        }
    }
}

/// Wording guidance for a tone.
#[derive(Debug, Clone)]
pub struct ToneGuide {
    pub description: &'static str,
    pub preferred_verbs: Vec<&'static str>,
    pub avoid: Vec<&'static str>,
}

pub fn tone_guide(tone: Tone) -> ToneGuide {
    match tone {
        Tone::Professional => ToneGuide {
            description: "polished and measured; precise wording, no hype",
            preferred_verbs: vec!["Delivered", "Managed", "Implemented", "Improved", "Coordinated"],
            avoid: vec!["rockstar", "ninja", "passionate", "!"],
        },
        Tone::Enthusiastic => ToneGuide {
            description: "energetic and warm; show genuine interest in the company and role",
            preferred_verbs: vec!["Launched", "Championed", "Grew", "Energized", "Created"],
            avoid: vec!["responsible for", "duties included"],
        },
        Tone::Confident => ToneGuide {
            description: "assertive and results-first; lead every point with impact",
            preferred_verbs: vec!["Led", "Drove", "Owned", "Built", "Accelerated"],
            avoid: vec!["helped", "assisted", "tried", "I think"],
        },
        Tone::Conversational => ToneGuide {
            description: "friendly and direct; plain language, short sentences",
            preferred_verbs: vec!["Built", "Worked with", "Shipped", "Figured out", "Set up"],
            avoid: vec!["synergy", "leverage", "utilize", "heretofore"],
        },
    }
}

/// Renders the guide as a prompt fragment.
pub fn tone_instruction(tone: Tone) -> String {
    let guide = tone_guide(tone);
    format!(
        "TONE: {} ({}). Prefer verbs such as: {}. Avoid: {}.",
        tone.as_str(),
        guide.description,
        guide.preferred_verbs.join(", "),
        guide.avoid.join(", ")
    )
}
