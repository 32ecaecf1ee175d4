//! Line input for the terminal chat.

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

/// Where REPL lines come from.
pub struct InputSource {
    inner: Inner,
}

#[allow(clippy::large_enum_variant)]
enum Inner {
    Readline(DefaultEditor),
    #[cfg(test)]
    Mock { index: usize, lines: Vec<String> },
}

impl InputSource {
    /// Interactive editor on the controlling terminal, with in-memory history.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be set up.
    pub fn new() -> Result<Self, ReadlineError> {
        Ok(Self {
            inner: Inner::Readline(DefaultEditor::new()?),
        })
    }

    /// Read the next line. `Ok(None)` means end of input (Ctrl+D or Ctrl+C).
    ///
    /// # Errors
    /// Returns an error if reading from the terminal fails.
    pub fn read_line(&mut self, prompt: &str) -> Result<Option<String>, ReadlineError> {
        match &mut self.inner {
            Inner::Readline(rl) => match rl.readline(prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = rl.add_history_entry(line.as_str());
                    }
                    Ok(Some(line))
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
                Err(err) => Err(err),
            },
            #[cfg(test)]
            Inner::Mock { index, lines } => {
                *index += 1;
                Ok(lines.get(*index - 1).cloned())
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn new_mock(lines: &[&str]) -> Self {
        Self {
            inner: Inner::Mock {
                index: 0,
                lines: lines.iter().map(|l| (*l).to_string()).collect(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_yields_lines_then_end() {
        let mut input = InputSource::new_mock(&["first", ""]);
        assert_eq!(input.read_line("You: ").unwrap().as_deref(), Some("first"));
        assert_eq!(input.read_line("You: ").unwrap().as_deref(), Some(""));
        assert_eq!(input.read_line("You: ").unwrap(), None);
    }
}
