//! OpenAPI specification model and read-only structural index.
//!
//! A [`Specification`] is built from an [`EndpointRegistry`] by the
//! [`SpecBuilder`], cached per inclusion flag in [`SpecSnapshots`], and
//! navigated through [`SpecIndex`] as `path -> method -> responses ->
//! status code -> content -> media type`. It serializes losslessly to JSON
//! or YAML.

pub mod builder;
pub mod encoding;
pub mod error;
pub mod index;
pub mod model;
pub mod snapshot;

pub use builder::{Endpoint, EndpointRegistry, SpecBuilder, SpecPlugin};
pub use encoding::Encoding;
pub use error::SpecError;
pub use index::{Content, MethodSpec, Responses, SpecIndex, StatusSpec};
pub use model::{Info, PathItem, Specification, OPENAPI_VERSION};
pub use snapshot::SpecSnapshots;
