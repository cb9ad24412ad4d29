//! Two-step overwrite confirmation.
//!
//! The guard only decides; it never touches the file or the terminal. Each
//! step returns the text to show, so the same machine drives a terminal, a
//! test script or anything else that yields lines.

use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationState {
    AwaitingFirst,
    AwaitingSecond,
    Confirmed,
    Aborted,
}

impl ConfirmationState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Confirmed | Self::Aborted)
    }
}

/// Text produced by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// Printed with a trailing newline.
    Line(String),
    /// Printed as-is; the answer follows on the same line.
    Prompt(String),
}

impl Output {
    pub fn write_to(&self, out: &mut impl Write) -> io::Result<()> {
        match self {
            Self::Line(text) => writeln!(out, "{text}"),
            Self::Prompt(text) => {
                write!(out, "{text}")?;
                out.flush()
            }
        }
    }
}

fn first_prompt(filename: &str) -> Output {
    Output::Prompt(format!("Do you want to overwrite {filename}? (y/n) "))
}

fn second_prompt(filename: &str) -> Output {
    Output::Prompt(format!("Are you sure you want to overwrite {filename}? (y/n) "))
}

fn aborted() -> Output {
    Output::Line("aborted".to_string())
}

/// One transition. Terminal states absorb all input.
pub fn transition(
    state: ConfirmationState,
    input: &str,
    filename: &str,
) -> (ConfirmationState, Vec<Output>) {
    use ConfirmationState::*;

    let answer = input.trim().to_ascii_lowercase();
    match (state, answer.as_str()) {
        (AwaitingFirst, "y") => (AwaitingSecond, vec![second_prompt(filename)]),
        (AwaitingFirst, "n") | (AwaitingSecond, "n") => (Aborted, vec![aborted()]),
        (AwaitingFirst, _) => (AwaitingFirst, vec![first_prompt(filename)]),
        (AwaitingSecond, "y") => (Confirmed, Vec::new()),
        (AwaitingSecond, _) => (AwaitingSecond, vec![second_prompt(filename)]),
        (terminal, _) => (terminal, Vec::new()),
    }
}

/// Confirmation session for one existing file.
#[derive(Debug)]
pub struct OverwriteGuard {
    filename: String,
    state: ConfirmationState,
}

impl OverwriteGuard {
    /// Start a session, returning the guard and the opening text.
    pub fn new(filename: impl Into<String>) -> (Self, Vec<Output>) {
        let filename = filename.into();
        let outputs = vec![
            Output::Line(format!("ERROR: {filename} already exists.")),
            first_prompt(&filename),
        ];
        (
            Self {
                filename,
                state: ConfirmationState::AwaitingFirst,
            },
            outputs,
        )
    }

    pub fn state(&self) -> ConfirmationState {
        self.state
    }

    /// Feed one line of input.
    pub fn step(&mut self, input: &str) -> Vec<Output> {
        let (next, outputs) = transition(self.state, input, &self.filename);
        self.state = next;
        outputs
    }

    /// Input ended. An undecided session counts as a refusal.
    pub fn close(&mut self) -> Vec<Output> {
        if self.state.is_terminal() {
            return Vec::new();
        }
        self.step("n")
    }
}
