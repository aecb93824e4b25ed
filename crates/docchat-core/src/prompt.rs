//! Prompt composition for document-grounded questions.

/// Instruction placed before the document text.
pub const DOCUMENT_FRAMING: &str =
    "You are given the content of a document. Use it to answer the user's question.";

/// Reminder placed after the question.
pub const ANSWER_INSTRUCTION: &str =
    "Please answer the question based on the document content provided above.";

/// Build the text sent to the model.
///
/// With a non-empty `context` the prompt is the framing, the full document
/// text, then the literal question. With an empty context the question is
/// sent verbatim.
pub fn compose_prompt(question: &str, context: &str) -> String {
    if context.is_empty() {
        return question.to_string();
    }

    format!(
        "{DOCUMENT_FRAMING}\n\nDocument Content:\n{context}\n\nUser Question: {question}\n\n{ANSWER_INSTRUCTION}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_context_sends_question_verbatim() {
        assert_eq!(compose_prompt("  Hello there?  ", ""), "  Hello there?  ");
    }

    #[test]
    fn framing_then_document_then_question() {
        let prompt = compose_prompt("What is the summary?", "Alpha Beta Gamma");

        let framing = prompt.find(DOCUMENT_FRAMING).expect("framing");
        let document = prompt.find("Alpha Beta Gamma").expect("document");
        let question = prompt.find("What is the summary?").expect("question");
        assert!(framing < document);
        assert!(document < question);
    }

    #[test]
    fn full_document_is_included() {
        let long: String = "x".repeat(5000);
        let prompt = compose_prompt("q", &long);
        assert!(prompt.contains(&long));
    }

    #[test]
    fn whitespace_document_still_counts_as_context() {
        let prompt = compose_prompt("q", " ");
        assert!(prompt.starts_with(DOCUMENT_FRAMING));
    }
}
