//! Conversation transcript formatting
//!
//! The underlying model was conditioned on a fixed four-marker delimiter
//! scheme; the framing produced here must be reproduced bit-for-bit. History
//! turns are emitted in chronological order, followed by the current user
//! turn and an open assistant marker.

const SYSTEM_MARKER: &str = "<|system|>";
const USER_MARKER: &str = "<|user|>";
const ASSISTANT_MARKER: &str = "<|assistant|>";
const END_MARKER: &str = "<|end|>";

/// One completed user/assistant exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub user: String,
    pub assistant: String,
}

impl Turn {
    pub fn new(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            assistant: assistant.into(),
        }
    }
}

/// Strip control and NUL characters from prompt text, keeping newlines and
/// tabs, then trim surrounding whitespace.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Format the full conversation transcript for the model.
pub fn format_transcript(system: &str, history: &[Turn], current_user: &str) -> String {
    let mut out = String::new();

    out.push_str(SYSTEM_MARKER);
    out.push('\n');
    out.push_str(system);
    out.push('\n');
    out.push_str(END_MARKER);
    out.push('\n');

    for turn in history {
        out.push_str(USER_MARKER);
        out.push('\n');
        out.push_str(&turn.user);
        out.push('\n');
        out.push_str(END_MARKER);
        out.push('\n');

        out.push_str(ASSISTANT_MARKER);
        out.push('\n');
        out.push_str(&turn.assistant);
        out.push('\n');
        out.push_str(END_MARKER);
        out.push('\n');
    }

    out.push_str(USER_MARKER);
    out.push('\n');
    out.push_str(current_user);
    out.push('\n');
    out.push_str(END_MARKER);
    out.push('\n');

    out.push_str(ASSISTANT_MARKER);
    out
}
