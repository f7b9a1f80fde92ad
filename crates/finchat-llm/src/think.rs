//! Removal of `<think>` spans from model output
//!
//! Reasoning models (qwen3, deepseek-r1 and friends) prefix their replies
//! with an internal monologue wrapped in `<think>...</think>`. That span must
//! be dropped before the reply is parsed as a plan or shown to the user.

const OPEN_TAG: &str = "<think>";
const CLOSE_TAG: &str = "</think>";

/// Strip the first `<think>...</think>` span from model output
///
/// Removes the span from the first opening tag through the end of the first
/// closing tag that follows it, concatenating the text before and after.
/// Input without both markers in that order is returned unchanged, so the
/// transform is a no-op on already-stripped text and never fails.
pub fn strip_thinking(text: &str) -> String {
    let Some(start) = text.find(OPEN_TAG) else {
        return text.to_string();
    };

    // The closing tag must come after the opener; a closer earlier in the
    // text does not terminate anything.
    let Some(close) = text[start..].find(CLOSE_TAG) else {
        return text.to_string();
    };

    let end = start + close + CLOSE_TAG.len();
    let mut stripped = String::with_capacity(text.len() - (end - start));
    stripped.push_str(&text[..start]);
    stripped.push_str(&text[end..]);
    stripped
}
