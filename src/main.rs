//! Interactive terminal chat with the chess Q&A agent.

use std::process::ExitCode;

use chess_qa_agent::start_chess_agent;

fn main() -> ExitCode {
    start_chess_agent::run_repl()
}
