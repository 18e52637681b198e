// Shared prompt constants and prompt-building utilities.
// Each service that needs completions defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Keeps output pasteable into ATS forms: no markdown, tables or columns.
pub const PLAIN_TEXT_INSTRUCTION: &str = "\
    Respond with plain text only. Do NOT use markdown, tables, columns, emojis or code fences. \
    Use simple hyphen bullets and UPPERCASE section headers.";

/// Guards against invented experience.
pub const NO_FABRICATION_INSTRUCTION: &str = "\
    CRITICAL: Use only facts present in the candidate's resume. \
    Do NOT invent employers, titles, dates, degrees, certifications or metrics. \
    You may rephrase, reorder and emphasise, but never add experience the candidate does not have.";

/// Substitutes `{name}` placeholders in one left-to-right pass.
///
/// Substituted values are never rescanned, so user text containing `{resume}`
/// or similar stays literal. Unknown placeholders are kept as written.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
