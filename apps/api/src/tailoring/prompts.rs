// All completion prompt templates for the tailoring module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Resume tailoring prompt.
/// Replace: {plain_text_instruction}, {no_fabrication_instruction}, {tone_instruction},
///          {job_title}, {company}, {experience_level}, {required_skills},
///          {preferred_skills}, {keywords}, {responsibilities}, {resume}
pub const RESUME_TAILOR_PROMPT_TEMPLATE: &str = r#"You are an expert resume writer who optimises resumes for Applicant Tracking Systems.

Rewrite the candidate's resume so it targets the job below.

{no_fabrication_instruction}

{plain_text_instruction}

{tone_instruction}

TARGET JOB:
Title: {job_title}
Company: {company}
Level: {experience_level}
Required skills: {required_skills}
Preferred skills: {preferred_skills}
Keywords to weave in where the resume supports them: {keywords}
Key responsibilities:
{responsibilities}

RULES:
1. Keep sections in this order: PROFESSIONAL SUMMARY, SKILLS, PROFESSIONAL EXPERIENCE, EDUCATION, then any others
2. Start the SKILLS section with "Skills:" followed by a comma-separated list
3. Open every experience bullet with a strong action verb and keep it to one or two lines
4. Keep dates as years only
5. Mirror the job's exact keyword spelling when the candidate genuinely has the skill

CANDIDATE RESUME:
{resume}"#;

/// Cover letter prompt.
/// Replace: {plain_text_instruction}, {no_fabrication_instruction}, {tone_instruction},
///          {job_title}, {company}, {required_skills}, {responsibilities}, {resume}
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"You are an expert career coach writing a one-page cover letter.

{no_fabrication_instruction}

{plain_text_instruction}

{tone_instruction}

TARGET JOB:
Title: {job_title}
Company: {company}
Required skills: {required_skills}
Key responsibilities:
{responsibilities}

RULES:
1. 250 to 350 words, three or four paragraphs
2. Greet the hiring team at the company by name when it is known
3. Highlight three or four strengths from the resume that match the job
4. Close with a short call to action; sign with the candidate's name if it appears in the resume

CANDIDATE RESUME:
{resume}"#;
