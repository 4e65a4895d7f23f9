//! The overwrite confirmation.
//!
//! With the `interactive` feature and a terminal on stdin the question is a
//! `dialoguer` prompt; otherwise a `y`/`yes` line is read from stdin.
//! Either way the answer defaults to no.

use std::io::{self, BufRead, Write};
use std::path::Path;

use indicatif::ProgressBar;
use mattergen_core::{
    application::{ApplicationError, ports::Confirmer},
    error::CoreResult,
};

/// Asks before the content directory is replaced, pausing the spinner.
pub struct TerminalConfirmer {
    progress: ProgressBar,
}

impl TerminalConfirmer {
    pub fn new(progress: ProgressBar) -> Self {
        Self { progress }
    }
}

impl Confirmer for TerminalConfirmer {
    fn confirm(&self, target: &Path) -> CoreResult<bool> {
        let question = format!("Overwrite the {} directory?", target.display());
        self.progress.suspend(|| ask(&question)).map_err(|e| {
            ApplicationError::PromptFailed {
                reason: e.to_string(),
            }
            .into()
        })
    }
}

#[cfg(feature = "interactive")]
fn ask(question: &str) -> io::Result<bool> {
    use std::io::IsTerminal as _;

    if !io::stdin().is_terminal() {
        return read_answer(question, &mut io::stdin().lock(), &mut io::stderr());
    }
    dialoguer::Confirm::new()
        .with_prompt(question)
        .default(false)
        .interact()
        .map_err(io::Error::other)
}

#[cfg(not(feature = "interactive"))]
fn ask(question: &str) -> io::Result<bool> {
    read_answer(question, &mut io::stdin().lock(), &mut io::stderr())
}

fn read_answer(question: &str, input: &mut impl BufRead, out: &mut impl Write) -> io::Result<bool> {
    write!(out, "{question} [y/N] ")?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let answer = line.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn answer(text: &str) -> (bool, String) {
        let mut out = Vec::new();
        let accepted = read_answer("Overwrite?", &mut Cursor::new(text), &mut out).unwrap();
        (accepted, String::from_utf8(out).unwrap())
    }

    #[test]
    fn yes_answers_accept() {
        assert!(answer("y\n").0);
        assert!(answer("YES\n").0);
    }

    #[test]
    fn anything_else_declines() {
        assert!(!answer("\n").0);
        assert!(!answer("n\n").0);
        assert!(!answer("sure\n").0);
        // closed stdin
        assert!(!answer("").0);
    }

    #[test]
    fn question_is_written_with_default_hint() {
        assert_eq!(answer("n\n").1, "Overwrite? [y/N] ");
    }
}
