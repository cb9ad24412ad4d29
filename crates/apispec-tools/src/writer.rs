//! Writes a spec to the configured docs file.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use apispec_spec::{Encoding, SpecError, Specification};
use apispec_telemetry::{log_docs_written, log_overwrite_aborted};
use thiserror::Error;

use crate::config::{ConfigError, DocsConfig};
use crate::guard::{ConfirmationState, Output, OverwriteGuard};

#[derive(Debug, Error)]
pub enum WriteError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Encode(#[from] SpecError),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading answers or printing prompts failed.
    #[error("terminal I/O failed: {0}")]
    Prompt(#[source] io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Created(PathBuf),
    Aborted,
}

/// A validated docs destination.
#[derive(Debug, Clone)]
pub struct DocsWriter {
    encoding: Encoding,
    filename: String,
    target: PathBuf,
}

impl DocsWriter {
    /// Validate the encoding and fix the target path.
    ///
    /// Nothing on disk is inspected here, so a bad `docs_type` is reported
    /// whether or not the file exists.
    pub fn new(config: &DocsConfig) -> Result<Self, ConfigError> {
        let encoding = config.validate()?;
        Ok(Self {
            encoding,
            filename: config.filename(encoding),
            target: config.target(encoding),
        })
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Write `spec`, asking on `input`/`output` before replacing a file.
    pub fn write(
        &self,
        spec: &Specification,
        input: &mut impl BufRead,
        output: &mut impl Write,
    ) -> Result<WriteOutcome, WriteError> {
        let encoded = self.encoding.encode(spec)?;

        if self.target.exists() && !self.confirm_overwrite(input, output)? {
            log_overwrite_aborted!(file = %self.target.display(), "overwrite declined");
            return Ok(WriteOutcome::Aborted);
        }

        self.write_file(&encoded)?;
        log_docs_written!(
            file = %self.target.display(),
            encoding = %self.encoding,
            "docs written"
        );

        Output::Line(format!("{} created.", self.filename))
            .write_to(output)
            .map_err(WriteError::Prompt)?;
        Ok(WriteOutcome::Created(self.target.clone()))
    }

    fn confirm_overwrite(
        &self,
        input: &mut impl BufRead,
        output: &mut impl Write,
    ) -> Result<bool, WriteError> {
        let (mut guard, opening) = OverwriteGuard::new(self.filename.as_str());
        emit(&opening, output)?;

        let mut line = String::new();
        while !guard.state().is_terminal() {
            line.clear();
            let read = input.read_line(&mut line).map_err(WriteError::Prompt)?;
            let outputs = if read == 0 {
                guard.close()
            } else {
                guard.step(&line)
            };
            emit(&outputs, output)?;
        }

        Ok(guard.state() == ConfirmationState::Confirmed)
    }

    fn write_file(&self, contents: &str) -> Result<(), WriteError> {
        let io_err = |source| WriteError::Io {
            path: self.target.clone(),
            source,
        };
        if let Some(dir) = self.target.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(io_err)?;
        }
        std::fs::write(&self.target, contents).map_err(io_err)
    }
}

fn emit(outputs: &[Output], out: &mut impl Write) -> Result<(), WriteError> {
    for output in outputs {
        output.write_to(out).map_err(WriteError::Prompt)?;
    }
    Ok(())
}
