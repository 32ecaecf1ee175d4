//! Chess-only topic filter.
//!
//! A high-recall, low-precision allow-list: generic words such as "game", "move" or
//! "position" let ambiguous sentences through. The vocabulary lives in
//! [`GuardrailPolicy`] so it can be tuned without touching the matching logic.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Fixed reply for inputs the guardrail rejects.
pub const REJECTION_MESSAGE: &str = "🚫 I'm sorry, but I can only answer questions related to chess.

Please ask me about:
• Chess rules and regulations
• Opening strategies and defenses
• Famous players and games
• Chess tactics and strategies
• Tournament history
• Anything else chess-related!";

/// Default chess vocabulary, matched as case-insensitive substrings.
pub const DEFAULT_CHESS_KEYWORDS: &[&str] = &[
    "chess",
    "checkmate",
    "stalemate",
    "draw",
    "resign",
    "pawn",
    "knight",
    "bishop",
    "rook",
    "queen",
    "king",
    "castling",
    "en passant",
    "promotion",
    "capture",
    "opening",
    "middlegame",
    "endgame",
    "gambit",
    "defense",
    "fork",
    "pin",
    "skewer",
    "sacrifice",
    "tactic",
    "strategy",
    "grandmaster",
    "fide",
    "elo",
    "rating",
    "tournament",
    "carlsen",
    "kasparov",
    "fischer",
    "karpov",
    "tal",
    "move",
    "board",
    "square",
    "piece",
    "position",
    "game",
];

/// Tunable vocabulary for the guardrail.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GuardrailPolicy {
    /// Lowercase terms; any substring hit accepts the input.
    pub keywords: Vec<String>,
}

impl Default for GuardrailPolicy {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_CHESS_KEYWORDS
                .iter()
                .map(|k| (*k).to_string())
                .collect(),
        }
    }
}

/// Which rule accepted an input.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Verdict {
    /// Greeting, introduction or farewell; bypasses the topic check.
    Conversational,
    /// Contains a vocabulary term.
    Keyword,
    /// Contains a square, piece move or castling notation.
    Notation,
    /// Nothing matched.
    Rejected,
}

impl Verdict {
    /// Whether the input may reach the model.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        !matches!(self, Self::Rejected)
    }
}

/// Keyword and notation based chess topic classifier.
pub struct ChessGuardrail {
    keywords: Vec<String>,
    conversational: Vec<Regex>,
    notation: Vec<Regex>,
}

impl ChessGuardrail {
    /// Build a guardrail from a policy.
    ///
    /// # Errors
    /// Returns an error if any regex pattern is invalid.
    pub fn new(policy: &GuardrailPolicy) -> Result<Self, regex::Error> {
        // Applied to the lowercased input.
        let conversational = vec![
            Regex::new(r"^(hi|hello|hey|greetings|good morning|good afternoon|good evening)")?,
            Regex::new(r"(i am|i'm|my name is|this is|call me)\s+[a-zA-Z]+")?,
            Regex::new(r"^(thank you|thanks|bye|goodbye)")?,
        ];

        // Applied to the original input; piece letters are uppercase.
        let notation = vec![
            Regex::new(r"\b[a-h][1-8]\b")?,
            Regex::new(r"\b[KQRBN][a-h]?[1-8]?\b")?,
            Regex::new(r"\bO-O(-O)?\b")?,
        ];

        let keywords = policy
            .keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        Ok(Self {
            keywords,
            conversational,
            notation,
        })
    }

    /// Build a guardrail with the default vocabulary.
    ///
    /// # Errors
    /// Returns an error if any regex pattern is invalid.
    pub fn with_defaults() -> Result<Self, regex::Error> {
        Self::new(&GuardrailPolicy::default())
    }

    /// Check whether the input is chess-related.
    #[must_use]
    pub fn is_chess_related(&self, text: &str) -> bool {
        self.classify(text).is_allowed()
    }

    /// Classify the input, reporting the first rule that matched.
    #[must_use]
    pub fn classify(&self, text: &str) -> Verdict {
        let lowered = text.trim().to_lowercase();

        let verdict = if self.conversational.iter().any(|p| p.is_match(&lowered)) {
            Verdict::Conversational
        } else if self.keywords.iter().any(|k| lowered.contains(k.as_str())) {
            Verdict::Keyword
        } else if self.notation.iter().any(|p| p.is_match(text)) {
            Verdict::Notation
        } else {
            Verdict::Rejected
        };

        debug!(?verdict, "guardrail classified input");
        verdict
    }
}
