// Prompt fragments for the portfolio chat assistant.

use crate::llm_client::ChatMessage;

/// How many prior turns of the conversation are forwarded to the model.
pub const HISTORY_TURNS: usize = 6;

/// Persona and style instructions. `{name}` is replaced with the candidate's name.
const SYSTEM_STYLE_TEMPLATE: &str = "You are {name}'s portfolio assistant. \
    Speak warmly and naturally. Use the resume context to answer. \
    If something isn't in the context, say you're not sure and ask a short follow-up. \
    Keep answers concise unless the user asks for detail.";

pub fn system_style(name: &str) -> String {
    let name = if name.trim().is_empty() {
        "the candidate"
    } else {
        name.trim()
    };
    SYSTEM_STYLE_TEMPLATE.replace("{name}", name)
}

/// Renders retrieved snippets as a bulleted context block.
pub fn context_block(snippets: &[String]) -> String {
    let bullets = snippets
        .iter()
        .map(|s| format!("- {s}"))
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("Resume/context snippets:\n{bullets}")
}

/// Persona, context, the tail of the history, then the user's message.
pub fn build_chat_messages(
    name: &str,
    snippets: &[String],
    history: &[ChatMessage],
    message: &str,
) -> Vec<ChatMessage> {
    let recent = &history[history.len().saturating_sub(HISTORY_TURNS)..];

    let mut messages = Vec::with_capacity(recent.len() + 3);
    messages.push(ChatMessage::system(system_style(name)));
    messages.push(ChatMessage::system(context_block(snippets)));
    messages.extend(recent.iter().cloned());
    messages.push(ChatMessage::user(message));
    messages
}
