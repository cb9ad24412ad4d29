//! Test harnesses for apispec-tools.
//!
//! Provides `TestApp` for driving an application through the full router
//! in-process, plus CLI regression tests for the `apispec-tools` binary.

pub mod app;
#[cfg(test)]
mod cli;
#[cfg(test)]
mod validator;

pub use app::{scripted_response, TestApp, TestError, TestResponse};
