//! Chess Q&A agent HTTP server.
//! Run with: cargo run --bin chess-agent-server

use std::process::ExitCode;

use chess_qa_agent::start_chess_agent;

fn main() -> ExitCode {
    start_chess_agent::run_server()
}
