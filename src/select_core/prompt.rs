use crate::select_core::error::Result;
use std::io::{self, BufRead, Write};

/// Asks the operator before a file is written or deleted.
pub trait Prompt {
    /// Returns `true` to go ahead, `false` to leave this file alone.
    fn confirm(&mut self, message: &str) -> Result<bool>;
}

/// Prompt on the terminal, blocking until a line is entered.
pub struct StdinPrompt<R, W> {
    input: R,
    output: W,
}

impl StdinPrompt<io::StdinLock<'static>, io::Stdout> {
    pub fn new() -> Self {
        StdinPrompt {
            input: io::stdin().lock(),
            output: io::stdout(),
        }
    }
}

impl Default for StdinPrompt<io::StdinLock<'static>, io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: BufRead, W: Write> StdinPrompt<R, W> {
    pub fn with_io(input: R, output: W) -> Self {
        StdinPrompt { input, output }
    }
}

impl<R: BufRead, W: Write> Prompt for StdinPrompt<R, W> {
    fn confirm(&mut self, message: &str) -> Result<bool> {
        write!(self.output, "- {} [Y/n] ", message)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            // stdin closed, nobody left to say yes
            return Ok(false);
        }
        Ok(parse_answer(&line))
    }
}

/// ENTER or anything starting with 'y' means yes.
fn parse_answer(line: &str) -> bool {
    let answer = line.trim().to_lowercase();
    answer.is_empty() || answer.starts_with('y')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_answer() {
        assert!(parse_answer("\n"));
        assert!(parse_answer("y\n"));
        assert!(parse_answer("YES"));
        assert!(!parse_answer("n\n"));
        assert!(!parse_answer("no"));
        assert!(!parse_answer("q"));
    }

    #[test]
    fn test_stdin_prompt_reads_one_line_per_question() {
        let input = io::Cursor::new("\nn\n");
        let mut output = Vec::new();
        {
            let mut prompt = StdinPrompt::with_io(input, &mut output);
            assert!(prompt.confirm("copy a.jpg?").unwrap());
            assert!(!prompt.confirm("copy b.jpg?").unwrap());
            // input exhausted
            assert!(!prompt.confirm("copy c.jpg?").unwrap());
        }
        let shown = String::from_utf8(output).unwrap();
        assert!(shown.contains("copy a.jpg? [Y/n]"));
        assert!(shown.contains("copy c.jpg?"));
    }
}
