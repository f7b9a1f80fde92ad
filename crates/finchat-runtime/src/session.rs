//! Process-lifetime conversation history
//!
//! The session owns the ordered user/assistant turns of the chat. It is
//! mutated only at turn boundaries (one user entry when a query arrives, one
//! assistant entry when the answer is produced) and cleared on explicit user
//! command. The planner never reads it; each turn re-derives its context
//! from the query and its own execution trace.

use finchat_llm::Role;
use std::collections::VecDeque;

/// Default cap on retained turns
const MAX_TURNS: usize = 50;

/// One history entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    /// Who said it
    pub role: Role,
    /// What was said
    pub content: String,
}

/// Bounded, ordered conversation history
#[derive(Debug)]
pub struct ChatSession {
    turns: VecDeque<ChatTurn>,
    max_turns: usize,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    /// Create a session with the default retention cap
    pub fn new() -> Self {
        Self {
            turns: VecDeque::with_capacity(MAX_TURNS),
            max_turns: MAX_TURNS,
        }
    }

    /// Create a session with a custom retention cap
    pub fn with_max_turns(max_turns: usize) -> Self {
        Self {
            turns: VecDeque::with_capacity(max_turns),
            max_turns,
        }
    }

    /// Record the user's query for this turn
    pub fn record_user(&mut self, content: impl Into<String>) {
        self.push(ChatTurn {
            role: Role::User,
            content: content.into(),
        });
    }

    /// Record the assistant's final answer for this turn
    pub fn record_assistant(&mut self, content: impl Into<String>) {
        self.push(ChatTurn {
            role: Role::Assistant,
            content: content.into(),
        });
    }

    fn push(&mut self, turn: ChatTurn) {
        self.turns.push_back(turn);
        while self.turns.len() > self.max_turns {
            self.turns.pop_front();
        }
    }

    /// All retained turns, oldest first
    pub fn turns(&self) -> impl Iterator<Item = &ChatTurn> {
        self.turns.iter()
    }

    /// Number of retained turns
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Check whether the history is empty
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Drop the entire history
    pub fn clear(&mut self) {
        self.turns.clear();
    }
}
