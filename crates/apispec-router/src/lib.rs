//! Prefix-trie endpoint router.
//!
//! Resolves a concrete request path and method to the endpoint registered
//! under a path template (`/users/{id}`). A lookup yields one of three
//! outcomes: the endpoint matched, the path matched but the method is not
//! allowed, or nothing matched. Static segments win over parameters.

pub mod trie;

pub use trie::{normalize_path, RouteEntry, RouteMatch, Router};
