//! Prompt composition for summaries and answers.

use crate::types::{DocType, Exchange};

/// Content characters included in the summary prompt.
pub const SUMMARY_CONTEXT_CHARS: usize = 3_000;

/// Prompt asking for an overview of a freshly uploaded document.
pub fn summary_prompt(doc_type: DocType, filename: &str, content: &str) -> String {
    let head: String = content.chars().take(SUMMARY_CONTEXT_CHARS).collect();
    format!(
        "You are a smart document assistant. A user uploaded the {doc_type} document '{filename}'.\n\
         Please provide a brief overview of what this document contains.\n\n\
         Document content:\n{head}"
    )
}

/// Prompt answering `question` from a document excerpt and recent conversation.
pub fn answer_prompt(
    doc_type: DocType,
    filename: &str,
    excerpt: &str,
    history: &[Exchange],
    question: &str,
) -> String {
    let mut prompt = format!(
        "You are a smart assistant analyzing a {doc_type} document titled '{filename}'.\n\n\
         Relevant document content:\n{excerpt}\n\n"
    );

    if !history.is_empty() {
        prompt.push_str("Previous conversation:\n");
        for exchange in history {
            prompt.push_str(&format!("Q: {}\nA: {}\n", exchange.question, exchange.answer));
        }
        prompt.push('\n');
    }

    prompt.push_str(&format!(
        "User's question: {question}\n\n\
         Answer concisely and use specific values from the document where present. \
         Mention the page or sheet the information comes from when you can."
    ));
    prompt
}
