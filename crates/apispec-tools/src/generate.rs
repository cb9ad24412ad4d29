//! `generate-api-docs`: write the spec to the docs directory.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use apispec_spec::Specification;

use crate::app::ApiDocs;
use crate::config::{ConfigError, DocsConfig};
use crate::writer::{DocsWriter, WriteError, WriteOutcome};

#[derive(Debug, Clone, Default, clap::Args)]
pub struct GenerateApiDocs {
    #[arg(
        short = 'a',
        long = "all",
        help = "Include endpoints marked 'Exclude From Spec'."
    )]
    pub all: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    Created(PathBuf),
    Aborted,
    /// `docs_type` was rejected; nothing was read or written.
    InvalidConfig,
}

impl GenerateApiDocs {
    pub fn run(
        &self,
        docs: &ApiDocs,
        input: &mut impl BufRead,
        output: &mut impl Write,
    ) -> Result<GenerateOutcome, WriteError> {
        generate_docs(docs.config(), || docs.spec(self.all), input, output)
    }
}

/// Validate `config`, then build and write the spec.
///
/// A rejected `docs_type` is printed to `output` and reported as
/// [`GenerateOutcome::InvalidConfig`]; the spec is never built in that case.
pub fn generate_docs(
    config: &DocsConfig,
    build: impl FnOnce() -> Arc<Specification>,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<GenerateOutcome, WriteError> {
    let writer = match DocsWriter::new(config) {
        Ok(writer) => writer,
        Err(err @ ConfigError::InvalidDocsType) => {
            writeln!(output, "{err}").map_err(WriteError::Prompt)?;
            return Ok(GenerateOutcome::InvalidConfig);
        }
        Err(err) => return Err(err.into()),
    };

    let spec = build();
    Ok(match writer.write(&spec, input, output)? {
        WriteOutcome::Created(path) => GenerateOutcome::Created(path),
        WriteOutcome::Aborted => GenerateOutcome::Aborted,
    })
}
