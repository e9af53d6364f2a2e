//! Statement prompt

/// Word cap requested from the model
pub const MAX_WORDS: usize = 450;

/// One-page legal summary prompt for a worker's issue and evidence
pub fn build_prompt(issue: &str, proof: &str, max_words: usize) -> String {
    format!(
        "SYSTEM: Draft a one-page legal summary. No hallucinations. Keep factual.\n\
         \n\
         WORKER ISSUE:\n\
         {issue}\n\
         \n\
         PROOF (text evidence):\n\
         {proof}\n\
         \n\
         RULES:\n\
         - Sections: HEADER:, FACTS:, LEGAL CONCERNS:, RELIEF SOUGHT:, ATTACHMENTS:\n\
         - Use bullet points\n\
         - Max {max_words} words\n\
         - No markdown formatting",
        issue = issue.trim(),
        proof = proof.trim(),
        max_words = max_words,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_layout() {
        let prompt = build_prompt("  Deactivated on 3 March\n", "Screenshot text: ID blocked", MAX_WORDS);

        assert!(prompt.starts_with("SYSTEM: Draft a one-page legal summary."));
        assert!(prompt.contains("WORKER ISSUE:\nDeactivated on 3 March\n\nPROOF"));
        assert!(prompt.contains("PROOF (text evidence):\nScreenshot text: ID blocked\n"));
        assert!(prompt.contains("HEADER:, FACTS:, LEGAL CONCERNS:, RELIEF SOUGHT:, ATTACHMENTS:"));
        assert!(prompt.contains("- Max 450 words"));
        assert!(prompt.ends_with("- No markdown formatting"));
    }
}
