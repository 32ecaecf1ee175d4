//! Input screening: topic guardrail, greeting detection and name extraction.

pub mod classifier;
pub mod greeting;
pub mod name_extractor;

pub use classifier::{ChessGuardrail, GuardrailPolicy, REJECTION_MESSAGE, Verdict};
pub use greeting::{greeting_response, is_greeting};
pub use name_extractor::NameExtractor;
