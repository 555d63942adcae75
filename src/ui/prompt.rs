//! Reading answers from the terminal.

use crate::errors::AppResult;
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Blocking `[y/N]` question for one-shot commands.
pub fn ask_confirmation(question: &str) -> AppResult<bool> {
    eprint!("⚠️  {question} [y/N]: ");
    io::stderr().flush().ok();

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// What to do with a workout left unfinished by an earlier run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeChoice {
    Resume,
    End,
    /// Keep the snapshot and decide on a later sign-in.
    Later,
}

impl ResumeChoice {
    /// Anything unrecognized means later.
    pub fn parse(answer: &str) -> Self {
        match answer.trim().to_ascii_lowercase().as_str() {
            "r" | "resume" => Self::Resume,
            "e" | "end" => Self::End,
            _ => Self::Later,
        }
    }
}

/// Line-oriented async reader over stdin. Used by the interactive workout
/// so the elapsed-time ticker keeps running while a line is awaited.
///
/// Keep a single instance for the whole command: it buffers ahead.
pub struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Default for Prompt {
    fn default() -> Self {
        Self::stdin()
    }
}

impl Prompt {
    pub fn stdin() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Print `prompt` and wait for the next line; `None` at end of input.
    pub async fn read_line(&mut self, prompt: &str) -> AppResult<Option<String>> {
        print!("{prompt}");
        io::stdout().flush().ok();
        Ok(self.lines.next_line().await?)
    }

    pub async fn resume_choice(&mut self) -> AppResult<ResumeChoice> {
        let answer = self
            .read_line("Resume it, end and save it, or decide later? [r]esume/[e]nd/[l]ater: ")
            .await?;
        Ok(answer.as_deref().map(ResumeChoice::parse).unwrap_or(ResumeChoice::Later))
    }
}
