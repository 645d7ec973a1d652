//! Validated interactive input
//!
//! All interactive reads go through a [`Prompter`]: raw lines pass an
//! interceptor chain first (the assistant trigger lives there), then the
//! field's own validation. Invalid answers are retried in place, without
//! bound — a wrong choice is a conversation, not an error. The console is
//! injected so tests can drive whole sessions from a scripted transcript.

use std::collections::VecDeque;
use std::fmt;
use std::io::{self, BufRead, Write};

use thiserror::Error;

/// Errors raised while reading from the console.
#[derive(Debug, Error)]
pub enum InputError {
    /// The underlying reader or writer failed.
    #[error("console I/O failed")]
    Io(#[from] io::Error),

    /// The input source ended before the session finished.
    #[error("input closed before the session finished")]
    Closed,
}

/// Bidirectional text console used by every interactive component.
pub trait Console {
    /// Prints one line of output.
    ///
    /// # Errors
    ///
    /// Returns an [`InputError`] if the underlying writer fails.
    fn say(&mut self, line: &str) -> Result<(), InputError>;

    /// Shows `prompt` (no trailing newline) and reads one line of input.
    ///
    /// # Errors
    ///
    /// Returns an [`InputError`] if the underlying reader or writer fails,
    /// or [`InputError::Closed`] on end of input.
    fn ask(&mut self, prompt: &str) -> Result<String, InputError>;
}

/// Console over process stdin/stdout.
#[derive(Debug, Default)]
pub struct StdConsole;

impl Console for StdConsole {
    fn say(&mut self, line: &str) -> Result<(), InputError> {
        let mut out = io::stdout().lock();
        writeln!(out, "{line}")?;

        Ok(())
    }

    fn ask(&mut self, prompt: &str) -> Result<String, InputError> {
        let mut out = io::stdout().lock();
        write!(out, "{prompt}")?;
        out.flush()?;
        drop(out);

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;

        if read == 0 {
            return Err(InputError::Closed);
        }

        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Scripted console for tests: answers are popped from a queue and every
/// prompt and output line is recorded in a transcript.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    answers: VecDeque<String>,
    transcript: Vec<String>,
}

impl ScriptedConsole {
    /// Creates a console that will answer prompts with `answers`, in order.
    pub fn with_answers<I>(answers: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }

    /// Everything printed or prompted so far, in order.
    #[must_use]
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    /// Returns `true` when some transcript line contains `needle`.
    #[must_use]
    pub fn printed(&self, needle: &str) -> bool {
        self.transcript.iter().any(|line| line.contains(needle))
    }

    /// Answers not yet consumed.
    #[must_use]
    pub fn remaining_answers(&self) -> usize {
        self.answers.len()
    }
}

impl Console for ScriptedConsole {
    fn say(&mut self, line: &str) -> Result<(), InputError> {
        self.transcript.push(line.to_string());

        Ok(())
    }

    fn ask(&mut self, prompt: &str) -> Result<String, InputError> {
        self.transcript.push(prompt.to_string());

        self.answers.pop_front().ok_or(InputError::Closed)
    }
}

/// Examines raw input before field validation.
///
/// Returning `Ok(true)` means the line was consumed (e.g. it opened a chat
/// sub-session) and the prompt must be asked again; the field never sees it.
pub trait Interceptor {
    /// Inspects one trimmed input line.
    ///
    /// # Errors
    ///
    /// Returns an [`InputError`] if console I/O fails while handling the
    /// interception.
    fn intercept(&mut self, raw: &str, console: &mut dyn Console) -> Result<bool, InputError>;
}

/// Validated field reader with an interceptor chain around a basic
/// line reader.
pub struct Prompter<'a, 'i, C: Console> {
    console: &'a mut C,
    interceptors: Vec<Box<dyn Interceptor + 'i>>,
}

impl<C: Console> fmt::Debug for Prompter<'_, '_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prompter")
            .field("interceptors", &self.interceptors.len())
            .finish_non_exhaustive()
    }
}

impl<'a, 'i, C: Console> Prompter<'a, 'i, C> {
    /// Creates a prompter over a console with the given interceptor chain.
    pub fn new(console: &'a mut C, interceptors: Vec<Box<dyn Interceptor + 'i>>) -> Self {
        Self {
            console,
            interceptors,
        }
    }

    /// Prints one line of output through the underlying console.
    ///
    /// # Errors
    ///
    /// Returns an [`InputError`] if the underlying writer fails.
    pub fn say(&mut self, line: &str) -> Result<(), InputError> {
        self.console.say(line)
    }

    /// Reads one free-form field: trimmed, no validation, empty allowed.
    ///
    /// # Errors
    ///
    /// Returns an [`InputError`] if console I/O fails.
    pub fn read(&mut self, prompt: &str) -> Result<String, InputError> {
        loop {
            let raw = self.console.ask(prompt)?;
            let trimmed = raw.trim().to_string();

            if self.run_interceptors(&trimmed)? {
                continue;
            }

            return Ok(trimmed);
        }
    }

    /// Reads a field constrained to a closed choice set.
    ///
    /// A choice matches exactly or case-insensitively; the canonically-cased
    /// choice is returned. Anything else prints the valid choices and
    /// re-prompts, without bound.
    ///
    /// # Errors
    ///
    /// Returns an [`InputError`] if console I/O fails.
    pub fn read_choice(&mut self, prompt: &str, choices: &[&str]) -> Result<String, InputError> {
        loop {
            let answer = self.read(prompt)?;
            let lowered = answer.to_lowercase();

            let matched = choices
                .iter()
                .find(|choice| **choice == answer || choice.to_lowercase() == lowered);

            if let Some(choice) = matched {
                return Ok((*choice).to_string());
            }

            self.console
                .say(&format!("Input tidak valid. Pilihan: {}", choices.join(", ")))?;
        }
    }

    /// Reads an integer, re-prompting on parse failure like choice
    /// validation does. An optional minimum is enforced the same way.
    ///
    /// # Errors
    ///
    /// Returns an [`InputError`] if console I/O fails.
    pub fn read_i64(&mut self, prompt: &str, min: Option<i64>) -> Result<i64, InputError> {
        loop {
            let answer = self.read(prompt)?;

            let Ok(value) = answer.parse::<i64>() else {
                self.console.say("Masukan harus berupa angka.")?;
                continue;
            };

            if let Some(min) = min {
                if value < min {
                    self.console.say(&format!("Nilai minimal {min}."))?;
                    continue;
                }
            }

            return Ok(value);
        }
    }

    /// Reads a positive day count.
    ///
    /// # Errors
    ///
    /// Returns an [`InputError`] if console I/O fails.
    pub fn read_days(&mut self, prompt: &str) -> Result<u32, InputError> {
        loop {
            let value = self.read_i64(prompt, Some(1))?;

            if let Ok(days) = u32::try_from(value) {
                return Ok(days);
            }

            self.console.say("Jumlah hari terlalu besar.")?;
        }
    }

    fn run_interceptors(&mut self, raw: &str) -> Result<bool, InputError> {
        for interceptor in &mut self.interceptors {
            if interceptor.intercept(raw, self.console)? {
                return Ok(true);
            }
        }

        Ok(false)
    }
}
