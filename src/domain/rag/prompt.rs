//! Generation prompt assembly

use crate::domain::llm::Message;
use crate::domain::retrieval::Passage;

/// Formatting rules appended to every generation prompt. The front end
/// renders answers as plain text, so the model is steered away from
/// heavy markdown.
const RESPONSE_INSTRUCTIONS: &str = "\
1. Provide clear, well-structured answers using normal text formatting.
2. Use simple paragraphs separated by line breaks.
3. If listing items, use simple bullet points with dashes (-) or numbers.
4. Do NOT use markdown headers (# ## ###) or excessive bold formatting.
5. Keep the text readable with normal font weight.";

/// Render retrieved passages as numbered document blocks
pub fn format_passages(passages: &[Passage]) -> String {
    passages
        .iter()
        .enumerate()
        .map(|(i, passage)| format!("Document {}: {}", i + 1, passage.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Render prior conversation turns one per line
pub fn format_history(history: &[Message]) -> String {
    history
        .iter()
        .map(|msg| format!("{}: {}", msg.role, msg.content()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Assemble the generation prompt from knowledge base context,
/// conversation history and the user query
pub fn build_prompt(context: &str, history: &[Message], query: &str) -> String {
    format!(
        "\n### Knowledge Base:\n{context}\n\n\
         ### Conversation History:\n{history}\n\n\
         ### User Query:\n{query}\n\n\
         ### Response Instructions:\n{instructions}\n\n\
         ### Response:\n",
        context = context,
        history = format_history(history),
        query = query,
        instructions = RESPONSE_INSTRUCTIONS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_passages() {
        let passages = vec![
            Passage::new("p1", "First passage text.", 0.9),
            Passage::new("p2", "Second passage text.", 0.8),
        ];

        assert_eq!(
            format_passages(&passages),
            "Document 1: First passage text.\n\nDocument 2: Second passage text."
        );
    }

    #[test]
    fn test_format_passages_empty() {
        assert_eq!(format_passages(&[]), "");
    }

    #[test]
    fn test_format_history() {
        let history = vec![
            Message::user("What is the refund policy?"),
            Message::assistant("Refunds are issued within 30 days."),
        ];

        assert_eq!(
            format_history(&history),
            "user: What is the refund policy?\nassistant: Refunds are issued within 30 days."
        );
    }

    #[test]
    fn test_build_prompt_sections() {
        let history = vec![Message::user("earlier question")];
        let prompt = build_prompt("Document 1: context", &history, "current question");

        assert!(prompt.starts_with("\n### Knowledge Base:\nDocument 1: context\n"));
        assert!(prompt.contains("### Conversation History:\nuser: earlier question\n"));
        assert!(prompt.contains("### User Query:\ncurrent question\n"));
        assert!(prompt.contains("### Response Instructions:\n1. Provide clear"));
        assert!(prompt.ends_with("### Response:\n"));
    }

    #[test]
    fn test_build_prompt_empty_context_and_history() {
        let prompt = build_prompt("", &[], "question");

        assert!(prompt.contains("### Knowledge Base:\n\n"));
        assert!(prompt.contains("### Conversation History:\n\n"));
        assert!(prompt.contains("### User Query:\nquestion"));
    }
}
