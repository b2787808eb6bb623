/// Sentence limit requested from the agent unless configured otherwise.
pub const DEFAULT_ANSWER_SENTENCES: u32 = 3;

/// Append the answer-length instruction to the user's task.
pub fn build_prompt(task: &str, max_sentences: u32) -> String {
    format!(
        "{task}\n\nIMPORTANT: Provide your final answer in a maximum of {max_sentences} clear, concise sentences."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_keeps_task_and_adds_limit() {
        let prompt = build_prompt("What is the capital of France?", DEFAULT_ANSWER_SENTENCES);
        assert!(prompt.starts_with("What is the capital of France?\n\n"));
        assert!(prompt.ends_with("maximum of 3 clear, concise sentences."));
    }
}
