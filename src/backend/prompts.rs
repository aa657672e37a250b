/// System prompt for the general career assistant chat.
pub const CAREER_ASSISTANT_PROMPT: &str = "You are a pragmatic career coach helping a job seeker. \
Answer concisely, prefer concrete next steps, and never invent facts about companies.";

/// Build the closing-feedback prompt for a finished mock interview.
pub fn build_session_summary_prompt(
    role: &str,
    company: &str,
    overall_score: f64,
    transcript: &str,
) -> String {
    format!(
        "You are an experienced interviewer giving feedback after a mock interview.\n\
Role: {role}\n\
Company: {company}\n\
Overall score: {overall_score:.1}/100\n\
\n\
Return 3-5 short sentences covering what went well, what to improve, and one exercise to practice.\n\
Use only information present in the transcript.\n\
\n\
Transcript:\n\
{transcript}"
    )
}

/// Build a resume review prompt, optionally targeted at a role.
pub fn build_resume_review_prompt(resume: &str, target_role: Option<&str>) -> String {
    let target = target_role
        .map(|role| format!("Target role: {role}\n"))
        .unwrap_or_default();

    format!(
        "You review resumes for applicant tracking systems and hiring managers.\n\
{target}\
Return Markdown with exactly these sections:\n\
1. ## Strengths\n\
2. ## Gaps\n\
3. ## Suggested Rewrites (up to 3 bullets, quote the original line)\n\
4. ## Missing Keywords\n\
\n\
Resume:\n\
{resume}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resume_prompt_mentions_target_only_when_given() {
        let targeted = build_resume_review_prompt("Rust dev", Some("SRE"));
        assert!(targeted.contains("Target role: SRE"));

        let general = build_resume_review_prompt("Rust dev", None);
        assert!(!general.contains("Target role"));
        assert!(general.ends_with("Rust dev"));
    }

    #[test]
    fn summary_prompt_formats_score() {
        let prompt = build_session_summary_prompt("Backend Engineer", "Acme", 72.25, "Q: hi");
        assert!(prompt.contains("Overall score: 72.2/100") || prompt.contains("Overall score: 72.3/100"));
        assert!(prompt.contains("Company: Acme"));
    }
}
