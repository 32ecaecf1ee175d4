//! Prompt construction modules.

pub mod prompt_builder;

pub use prompt_builder::{SYSTEM_PROMPT, build_completion_prompt, build_system_prompt};
