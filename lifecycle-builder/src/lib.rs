#![doc = include_str!("../README.md")]

pub mod build;
pub mod cli;
pub mod compat;
pub mod config;
pub mod engine;
mod env;
pub mod error;
pub mod exit_code;
pub mod paths;
pub mod persist;
pub mod privilege;

pub use build::Builder;
pub use env::Env;
pub use error::{Error, ExitClassification};

// Suppress warnings due to the `unused_crate_dependencies` lint not handling dev-dependencies well.
#[cfg(test)]
use assert_cmd as _;
