//! Terminal chat loop driving a single session.

pub mod input_source;

pub use input_source::InputSource;

use std::io::Write;
use std::ops::ControlFlow;
use std::path::PathBuf;

use anyhow::Context;
use chrono::Local;

use crate::chat::orchestrator::ResponseOrchestrator;
use crate::chat::session::conversation::ConversationSession;
use crate::chat::session::export::{export_file_name, export_transcript};

/// Slash commands understood by the REPL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReplCommand {
    /// Leave the chat.
    Quit,
    /// Clear history, name and counters.
    Reset,
    /// Show session counters.
    Stats,
    /// Show a short preview of the conversation.
    History,
    /// Write the transcript to a file.
    Export(Option<PathBuf>),
    /// Anything else starting with `/`.
    Unknown(String),
}

/// Parse a slash command. Returns `None` for ordinary chat input.
#[must_use]
pub fn parse_command(line: &str) -> Option<ReplCommand> {
    let line = line.trim();
    let rest = line.strip_prefix('/')?;
    let mut parts = rest.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default().to_lowercase();
    let arg = parts.next().map(str::trim).filter(|a| !a.is_empty());

    Some(match name.as_str() {
        "quit" | "exit" => ReplCommand::Quit,
        "reset" | "clear" => ReplCommand::Reset,
        "stats" => ReplCommand::Stats,
        "history" => ReplCommand::History,
        "export" => ReplCommand::Export(arg.map(PathBuf::from)),
        _ => ReplCommand::Unknown(line.to_string()),
    })
}

const PROMPT: &str = "You: ";

/// Run the chat loop until end of input or `/quit`.
///
/// # Errors
/// Returns an error if reading input, writing output or saving an export fails.
pub async fn run_repl<W: Write>(
    orchestrator: &ResponseOrchestrator,
    session: &mut ConversationSession,
    input: &mut InputSource,
    out: &mut W,
) -> anyhow::Result<()> {
    if let Some(seed) = session.messages().first() {
        writeln!(out, "Bot: {}\n", seed.content())?;
    }
    writeln!(out, "Commands: /stats /history /export [path] /reset /quit\n")?;
    out.flush()?;

    loop {
        let Some(line) = input.read_line(PROMPT).context("failed to read input")? else {
            writeln!(out)?;
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match parse_command(&line) {
            Some(command) => {
                if handle_command(session, &command, out)?.is_break() {
                    break;
                }
            }
            None => {
                let reply = orchestrator.respond(session, &line).await;
                tracing::debug!(outcome = reply.outcome.as_str(), "turn complete");
                writeln!(out, "Bot: {}\n", reply.text)?;
            }
        }
        out.flush()?;
    }

    Ok(())
}

fn handle_command<W: Write>(
    session: &mut ConversationSession,
    command: &ReplCommand,
    out: &mut W,
) -> anyhow::Result<ControlFlow<()>> {
    match command {
        ReplCommand::Quit => {
            writeln!(out, "👋 Goodbye!")?;
            return Ok(ControlFlow::Break(()));
        }
        ReplCommand::Reset => {
            session.reset();
            writeln!(out, "✅ Chat cleared! Session reset.\n")?;
        }
        ReplCommand::Stats => {
            let stats = session.stats();
            match &stats.user_name {
                Some(name) => writeln!(out, "👤 User: {name}")?,
                None => writeln!(out, "👤 User: Not introduced yet")?,
            }
            writeln!(out, "Questions Asked: {}", stats.question_count)?;
            writeln!(out, "Total Messages: {}\n", stats.message_count)?;
        }
        ReplCommand::History => {
            let preview = session.history_preview();
            if preview.is_empty() {
                writeln!(out, "No messages yet. Start chatting!\n")?;
            } else {
                for line in preview {
                    writeln!(out, "{line}")?;
                }
                writeln!(out)?;
            }
        }
        ReplCommand::Export(path) => {
            if !session.has_conversation() {
                writeln!(out, "Nothing to export yet.\n")?;
                return Ok(ControlFlow::Continue(()));
            }
            let path = path
                .clone()
                .unwrap_or_else(|| PathBuf::from(export_file_name(session)));
            std::fs::write(&path, export_transcript(session, Local::now()))
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!("Exported transcript to {}", path.display());
            writeln!(out, "💾 Saved chat history to {}\n", path.display())?;
        }
        ReplCommand::Unknown(raw) => {
            writeln!(out, "Unknown command: {raw}\n")?;
        }
    }
    Ok(ControlFlow::Continue(()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::chat::core::config::AgentConfig;
    use crate::chat::orchestrator::tests::ScriptedModel;
    use crate::llm::ChatModel;

    fn orchestrator() -> (ResponseOrchestrator, Arc<ScriptedModel>) {
        let model = ScriptedModel::new(Vec::new());
        let dyn_model: Arc<dyn ChatModel> = model.clone();
        let orch = ResponseOrchestrator::new(dyn_model, &AgentConfig::default()).unwrap();
        (orch, model)
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("/quit"), Some(ReplCommand::Quit));
        assert_eq!(parse_command("  /RESET "), Some(ReplCommand::Reset));
        assert_eq!(
            parse_command("/export out.txt"),
            Some(ReplCommand::Export(Some(PathBuf::from("out.txt"))))
        );
        assert_eq!(parse_command("/export"), Some(ReplCommand::Export(None)));
        assert_eq!(
            parse_command("/dance"),
            Some(ReplCommand::Unknown("/dance".to_string()))
        );
        assert_eq!(parse_command("what is a fork?"), None);
    }

    #[tokio::test]
    async fn test_repl_session_flow() {
        let (orch, model) = orchestrator();
        let mut session = orch.new_session();
        let mut input =
            InputSource::new_mock(&["hello", "", "I'm Magnus", "/stats", "/quit", "never read"]);
        let mut out = Vec::new();

        run_repl(&orch, &mut session, &mut input, &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("👋 Goodbye!\n"));
        assert!(!text.contains("never read"));
        assert!(text.contains("Bot: Hello! 👋 Welcome to the Chess Q&A Bot!"));
        assert!(text.contains("👤 User: Magnus"));
        assert!(text.contains("Questions Asked: 1"));
        assert_eq!(model.calls(), 1);
        assert_eq!(session.message_count(), 5);
    }

    #[tokio::test]
    async fn test_repl_reset_and_empty_history() {
        let (orch, _) = orchestrator();
        let mut session = orch.new_session();
        let mut input = InputSource::new_mock(&["what is a skewer?", "/reset", "/history", "/export"]);
        let mut out = Vec::new();

        run_repl(&orch, &mut session, &mut input, &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("✅ Chat cleared! Session reset."));
        assert!(text.contains("No messages yet. Start chatting!"));
        assert!(text.contains("Nothing to export yet."));
        assert_eq!(session.message_count(), 1);
    }

    #[tokio::test]
    async fn test_repl_export_writes_file() {
        let (orch, _) = orchestrator();
        let mut session = orch.new_session();
        let path = std::env::temp_dir().join(format!("chess_chat_{}.txt", uuid::Uuid::new_v4()));
        let export = format!("/export {}", path.display());
        let mut input = InputSource::new_mock(&["what is en passant?", &export]);
        let mut out = Vec::new();

        run_repl(&orch, &mut session, &mut input, &mut out).await.unwrap();

        let saved = std::fs::read_to_string(&path).unwrap();
        assert!(saved.contains("2. [USER]\nwhat is en passant?"));
        assert!(saved.contains("# Total Questions: 1"));
        std::fs::remove_file(&path).unwrap();
    }
}
