//! Operator questions
//!
//! Node config generation asks a few questions. The [`Prompter`] trait keeps
//! that independent of where the answers come from: a terminal, a pipe, or a
//! fixed script.

use crate::error::{RecordingError, RecordingResult};
use std::collections::VecDeque;
use std::io::{BufRead, Write};

/// Source of answers to operator questions
pub trait Prompter {
    /// Show `question` and return the answer, or `default` when it is blank
    fn ask(&mut self, question: &str, default: &str) -> RecordingResult<String>;
}

/// Pick the trimmed answer, falling back to `default` when it is empty
pub fn answer_or_default(answer: &str, default: &str) -> String {
    let answer = answer.trim();
    if answer.is_empty() {
        default.to_string()
    } else {
        answer.to_string()
    }
}

/// Reads one line per question from any buffered reader
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl LinePrompter<std::io::StdinLock<'static>, std::io::Stdout> {
    /// Prompt on stdout, read answers from stdin
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn ask(&mut self, question: &str, default: &str) -> RecordingResult<String> {
        self.output
            .write_all(question.as_bytes())
            .and_then(|_| self.output.flush())
            .map_err(|err| RecordingError::Prompt(err.to_string()))?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|err| RecordingError::Prompt(err.to_string()))?;
        if read == 0 {
            return Err(RecordingError::PromptClosed);
        }

        Ok(answer_or_default(&line, default))
    }
}

/// Answers questions from a fixed list.
///
/// Once the list runs out every question takes its default, so an empty
/// script accepts all defaults.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    /// Accept every default
    pub fn defaults() -> Self {
        Self::default()
    }

    /// Questions asked so far
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, question: &str, default: &str) -> RecordingResult<String> {
        self.asked.push(question.to_string());
        let answer = self.answers.pop_front().unwrap_or_default();
        Ok(answer_or_default(&answer, default))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_line_prompter_reads_answers() {
        let input = Cursor::new("custom.json\n\n");
        let mut output = Vec::new();
        {
            let mut prompter = LinePrompter::new(input, &mut output);
            assert_eq!(prompter.ask("File? [a.json]> ", "a.json").unwrap(), "custom.json");
            assert_eq!(prompter.ask("Prefix? [agent]>", "agent").unwrap(), "agent");
        }
        assert_eq!(String::from_utf8(output).unwrap(), "File? [a.json]> Prefix? [agent]>");
    }

    #[test]
    fn test_line_prompter_closed_input() {
        let mut prompter = LinePrompter::new(Cursor::new(""), Vec::new());
        let err = prompter.ask("File?> ", "a.json").unwrap_err();
        assert!(matches!(err, RecordingError::PromptClosed));
    }

    #[test]
    fn test_scripted_prompter() {
        let mut prompter = ScriptedPrompter::new(["  first  ", ""]);
        assert_eq!(prompter.ask("one", "d1").unwrap(), "first");
        assert_eq!(prompter.ask("two", "d2").unwrap(), "d2");
        assert_eq!(prompter.ask("three", "d3").unwrap(), "d3");
        assert_eq!(prompter.asked(), ["one", "two", "three"]);
    }
}
