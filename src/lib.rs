//! Chess Q&A chatbot built on a hosted LLM, in a strictly linted crate.

// Forbid unsafe or non-idiomatic practices
#![deny(warnings)] // Every warning is an error
#![deny(unsafe_code)] // No unsafe code
#![deny(missing_docs)] // Every public item must be documented
#![deny(dead_code)] // No unused code
#![deny(non_camel_case_types)]

// Extra options so nothing slips through
#![deny(unused_imports)]
#![deny(unused_variables)]
#![deny(unused_must_use)] // Results and Options must be handled explicitly
#![deny(non_snake_case)]
#![deny(non_upper_case_globals)]
#![deny(nonstandard_style)]
#![forbid(unsafe_op_in_unsafe_fn)]

// Clippy discipline
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::print_stdout)] // Terminal output goes through `writeln!`
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![deny(clippy::missing_const_for_fn)]
#![deny(clippy::unwrap_in_result)]
#![deny(clippy::module_inception)]
#![deny(clippy::redundant_clone)]
#![deny(clippy::shadow_unrelated)]
#![deny(clippy::too_many_arguments)]
#![deny(clippy::cognitive_complexity)]

#![deny(overflowing_literals)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

/// Conversation engine: guardrail, session state, prompts and turn routing.
pub mod chat;
/// Chat model seam and the Groq-backed implementation.
pub mod llm;
/// Interactive terminal chat loop.
pub mod repl;
/// HTTP server and API routes.
#[allow(
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::unused_async
)]
pub mod server;
/// Entry helpers to start the chess agent.
pub mod start_chess_agent;
