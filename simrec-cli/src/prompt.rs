//! Terminal prompting backed by rustyline

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use simrec_core::prompt::answer_or_default;
use simrec_core::{Prompter, RecordingError, RecordingResult};

/// Line-editing prompter for interactive terminals
pub struct ReadlinePrompter {
    editor: DefaultEditor,
}

impl ReadlinePrompter {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl Prompter for ReadlinePrompter {
    fn ask(&mut self, question: &str, default: &str) -> RecordingResult<String> {
        // The editor redraws only the last line of a prompt
        let prompt = match question.rsplit_once('\n') {
            Some((preamble, prompt)) => {
                println!("{}", preamble);
                prompt
            }
            None => question,
        };

        match self.editor.readline(prompt) {
            Ok(line) => Ok(answer_or_default(&line, default)),
            Err(ReadlineError::Interrupted) => Err(RecordingError::Prompt(
                "interrupted by user".to_string(),
            )),
            Err(ReadlineError::Eof) => Err(RecordingError::PromptClosed),
            Err(err) => Err(RecordingError::Prompt(err.to_string())),
        }
    }
}
