//! Overwrite policy and the decision source for interactive moves.

use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};

use hdfsutils_core::{FsError, Result};

/// What to do when a move target of the same type already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OverwritePolicy {
    /// Always replace the existing target.
    Force,
    /// Never replace; skip silently.
    NoOverwrite,
    /// Ask the [`OverwritePrompt`] for each existing target.
    Interactive,
    /// No flag given: behaves as [`OverwritePolicy::NoOverwrite`].
    #[default]
    Default,
}

impl OverwritePolicy {
    /// Resolve command-line flags with the precedence force > no-clobber > interactive.
    pub fn from_flags(force: bool, no_overwrite: bool, interactive: bool) -> Self {
        if force {
            Self::Force
        } else if no_overwrite {
            Self::NoOverwrite
        } else if interactive {
            Self::Interactive
        } else {
            Self::Default
        }
    }
}

/// A synchronous yes/no decision source for overwriting an existing target.
pub trait OverwritePrompt {
    /// Return `true` to replace `target`.
    fn confirm(&mut self, target: &str) -> Result<bool>;
}

impl<F> OverwritePrompt for F
where
    F: FnMut(&str) -> Result<bool>,
{
    fn confirm(&mut self, target: &str) -> Result<bool> {
        self(target)
    }
}

/// A prompt that always gives the same answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedAnswer(pub bool);

impl OverwritePrompt for FixedAnswer {
    fn confirm(&mut self, _target: &str) -> Result<bool> {
        Ok(self.0)
    }
}

/// Line-based prompt: writes `overwrite <target>? (y/n) ` and reads answers
/// until one starts with `y` or `n` (case-insensitive).
#[derive(Debug)]
pub struct LinePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    /// Create a prompt over the given reader and writer.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> OverwritePrompt for LinePrompt<R, W> {
    fn confirm(&mut self, target: &str) -> Result<bool> {
        let prompt_error = |e: std::io::Error| FsError::Prompt {
            message: e.to_string(),
        };

        loop {
            write!(self.output, "overwrite {target}? (y/n) ").map_err(prompt_error)?;
            self.output.flush().map_err(prompt_error)?;

            let mut line = String::new();
            if self.input.read_line(&mut line).map_err(prompt_error)? == 0 {
                return Err(FsError::Prompt {
                    message: "end of input".to_string(),
                });
            }

            match line.trim().chars().next().map(|c| c.to_ascii_lowercase()) {
                Some('y') => return Ok(true),
                Some('n') => return Ok(false),
                _ => writeln!(self.output, "Please enter y or n.").map_err(prompt_error)?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_policy_precedence() {
        assert_eq!(OverwritePolicy::from_flags(true, true, true), OverwritePolicy::Force);
        assert_eq!(OverwritePolicy::from_flags(false, true, true), OverwritePolicy::NoOverwrite);
        assert_eq!(OverwritePolicy::from_flags(false, false, true), OverwritePolicy::Interactive);
        assert_eq!(OverwritePolicy::from_flags(false, false, false), OverwritePolicy::Default);
    }

    #[test]
    fn test_line_prompt_retries_until_valid() {
        let mut output = Vec::new();
        let mut prompt = LinePrompt::new(Cursor::new("maybe\n\nY\n"), &mut output);

        assert!(prompt.confirm("/a/foo.txt").unwrap());
        let text = String::from_utf8(output).unwrap();
        assert_eq!(text.matches("overwrite /a/foo.txt? (y/n) ").count(), 3);
    }

    #[test]
    fn test_line_prompt_no_and_eof() {
        let mut prompt = LinePrompt::new(Cursor::new("no\n"), Vec::new());
        assert!(!prompt.confirm("/a").unwrap());
        assert!(matches!(prompt.confirm("/a"), Err(FsError::Prompt { .. })));
    }

    #[test]
    fn test_closure_prompt() {
        let mut asked = Vec::new();
        let mut prompt = |target: &str| -> Result<bool> {
            asked.push(target.to_string());
            Ok(false)
        };
        assert!(!prompt.confirm("/x").unwrap());
        drop(prompt);
        assert_eq!(asked, ["/x"]);
    }
}
