//! OpenAPI documentation tooling for web applications.
//!
//! An application registers its endpoints in an [`EndpointRegistry`]; the
//! [`ApiDocs`] context adds the built-in `/docs`, `/docs/json` and
//! `/version` endpoints and builds the spec on demand. From there the spec
//! can be written to disk ([`generate`]), served ([`endpoints`]) or used to
//! check every response the application produces ([`middleware`]).
//!
//! [`EndpointRegistry`]: apispec_spec::EndpointRegistry

pub mod app;
pub mod app_file;
pub mod config;
pub mod endpoints;
pub mod generate;
pub mod guard;
pub mod middleware;
pub mod server;
pub mod writer;

pub use app::{ApiDocs, DocsEndpoints, InitError, InitOptions};
pub use app_file::{AppFile, AppFileError, EndpointDef, MockResponse};
pub use config::{ConfigError, DocsConfig};
pub use generate::{generate_docs, GenerateApiDocs, GenerateOutcome};
pub use guard::{ConfirmationState, Output, OverwriteGuard};
pub use writer::{DocsWriter, WriteError, WriteOutcome};
