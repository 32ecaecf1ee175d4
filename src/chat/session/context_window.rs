//! Bounded window of recent exchanges supplied to the model as context.

use std::collections::VecDeque;

use crate::chat::core::message::Message;

/// One user message and the assistant reply that followed it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Exchange {
    /// User side of the turn.
    pub user: Message,
    /// Assistant side of the turn.
    pub assistant: Message,
}

/// Keeps the last `capacity` exchanges, oldest first.
#[derive(Clone, Debug)]
pub struct ContextWindow {
    capacity: usize,
    exchanges: VecDeque<Exchange>,
}

impl ContextWindow {
    /// Create an empty window holding at most `capacity` exchanges.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            exchanges: VecDeque::with_capacity(capacity),
        }
    }

    /// Record a completed exchange, evicting the oldest when full.
    pub fn push(&mut self, user: Message, assistant: Message) {
        if self.capacity == 0 {
            return;
        }
        while self.exchanges.len() >= self.capacity {
            self.exchanges.pop_front();
        }
        self.exchanges.push_back(Exchange { user, assistant });
    }

    /// Drop every stored exchange.
    pub fn clear(&mut self) {
        self.exchanges.clear();
    }

    /// Number of stored exchanges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    /// Whether the window is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    /// Flatten the window into alternating user/assistant messages.
    #[must_use]
    pub fn messages(&self) -> Vec<Message> {
        self.exchanges
            .iter()
            .flat_map(|e| [e.user.clone(), e.assistant.clone()])
            .collect()
    }
}
