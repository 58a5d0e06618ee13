// Prompt template for the ATS evaluation call.
// Placeholders: {resume_text}, {jd_text}. Everything else, JSON braces included,
// is sent as-is.

/// ATS evaluation prompt. Fill with `compose_prompt`, never with chained `replace`.
pub const ATS_PROMPT_TEMPLATE: &str = r#"
You are a highly skilled ATS (Applicant Tracking System) with expertise in:
Software Engineering, AI/ML, Data Science, Data Analysis, and Big Data.

Evaluate the resume against the given job description.
The job market is very competitive, so provide accurate analysis.

Resume:
{resume_text}

Job Description:
{jd_text}

Return the response strictly in the following JSON format:
{
  "JD Match": "XX%",
  "Missing Keywords": [],
  "Profile Summary": ""
}
"#;

/// Fills the ATS template with the resume text and job description.
///
/// Substitution is single-pass: a resume containing the literal `{jd_text}` is
/// inserted verbatim and is not expanded again. No escaping or validation is done.
pub fn compose_prompt(resume_text: &str, job_description: &str) -> String {
    fill_template(
        ATS_PROMPT_TEMPLATE,
        &[("resume_text", resume_text), ("jd_text", job_description)],
    )
}

fn fill_template(template: &str, vars: &[(&str, &str)]) -> String {
    let extra: usize = vars.iter().map(|(_, value)| value.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        let hit = vars.iter().find_map(|(name, value)| {
            let is_placeholder =
                tail[1..].starts_with(name) && tail[1 + name.len()..].starts_with('}');
            is_placeholder.then_some((*value, name.len() + 2))
        });

        match hit {
            Some((value, consumed)) => {
                out.push_str(value);
                rest = &tail[consumed..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}
